//! Password reset tokens.
//!
//! A token has the form `{uid}.{timestamp}-{signature}`:
//!
//! - `uid` is the base64url-encoded user id
//! - `timestamp` is seconds since 2001-01-01 in base 36
//! - `signature` is an HMAC-SHA256 over the user id, the current password
//!   hash, the last login time and the timestamp, keyed by a digest of a
//!   fixed salt and the server secret
//!
//! Because the password hash and last login feed the signature, a token
//! stops verifying as soon as the password changes or the user logs in.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chrono::{DateTime, TimeZone, Utc};
use hmac::{digest::KeyInit, Hmac, Mac};
use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;
use uuid::Uuid;

use super::User;

const KEY_SALT: &str = "cooling_api.password_reset";

/// Token split into its user id and the signed remainder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PasswordResetToken {
    pub uid: Uuid,
    pub signed: String,
}

impl PasswordResetToken {
    /// Split `{uid}.{timestamp}-{signature}` and decode the uid.
    ///
    /// Returns `None` for anything malformed.
    pub fn parse(token: &str) -> Option<Self> {
        let (uid, signed) = token.split_once('.')?;
        if signed.is_empty() {
            return None;
        }
        let uid = decode_uid(uid)?;
        Some(Self {
            uid,
            signed: signed.to_string(),
        })
    }
}

/// Encode a user id for use in links.
pub fn encode_uid(id: Uuid) -> String {
    URL_SAFE_NO_PAD.encode(id.to_string())
}

/// Decode a uid produced by [`encode_uid`].
pub fn decode_uid(uid: &str) -> Option<Uuid> {
    let bytes = URL_SAFE_NO_PAD.decode(uid.as_bytes()).ok()?;
    let text = String::from_utf8(bytes).ok()?;
    Uuid::parse_str(&text).ok()
}

/// Makes and checks reset tokens for a secret and a validity window.
#[derive(Clone)]
pub struct ResetTokenGenerator {
    /// SHA-256 of salt and secret, zero-padded to the HMAC block size
    key: [u8; 64],
    timeout_seconds: i64,
}

impl ResetTokenGenerator {
    pub fn new(secret: &[u8], timeout_seconds: i64) -> Self {
        let digest = Sha256::new()
            .chain_update(KEY_SALT.as_bytes())
            .chain_update(secret)
            .finalize();

        let mut key = [0u8; 64];
        key[..digest.len()].copy_from_slice(&digest);

        Self {
            key,
            timeout_seconds,
        }
    }

    /// Full token `{uid}.{timestamp}-{signature}` for the user.
    pub fn make_token(&self, user: &User, now: DateTime<Utc>) -> String {
        format!(
            "{}.{}",
            encode_uid(user.id),
            self.make_signed(user, seconds_since_epoch(now))
        )
    }

    /// Check the part after the `.` against the user's current state.
    pub fn check_token(&self, user: &User, signed: &str, now: DateTime<Utc>) -> bool {
        let Some((ts_b36, _)) = signed.split_once('-') else {
            return false;
        };
        let Some(ts) = from_base36(ts_b36) else {
            return false;
        };

        let expected = self.make_signed(user, ts);
        if !bool::from(expected.as_bytes().ct_eq(signed.as_bytes())) {
            return false;
        }

        seconds_since_epoch(now) - ts <= self.timeout_seconds
    }

    fn make_signed(&self, user: &User, ts: i64) -> String {
        let login_ts = user
            .last_login
            .map(|t| t.timestamp_micros().to_string())
            .unwrap_or_default();

        let mut mac = <Hmac<Sha256> as KeyInit>::new(&self.key.into());
        mac.update(user.id.as_bytes());
        mac.update(user.password_hash.as_bytes());
        mac.update(login_ts.as_bytes());
        mac.update(ts.to_string().as_bytes());
        let signature = mac.finalize().into_bytes();

        format!("{}-{}", to_base36(ts), URL_SAFE_NO_PAD.encode(&signature[..20]))
    }
}

/// Seconds since 2001-01-01T00:00:00Z, keeps the base36 timestamp short.
fn seconds_since_epoch(now: DateTime<Utc>) -> i64 {
    let epoch = Utc
        .with_ymd_and_hms(2001, 1, 1, 0, 0, 0)
        .single()
        .map(|t| t.timestamp())
        .unwrap_or(978_307_200);
    now.timestamp() - epoch
}

fn to_base36(mut value: i64) -> String {
    const DIGITS: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    if value <= 0 {
        return "0".to_string();
    }
    let mut out = Vec::new();
    while value > 0 {
        out.push(DIGITS[(value % 36) as usize]);
        value /= 36;
    }
    out.reverse();
    String::from_utf8(out).unwrap_or_default()
}

fn from_base36(text: &str) -> Option<i64> {
    if text.is_empty() || text.len() > 13 {
        return None;
    }
    i64::from_str_radix(text, 36).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    const SECRET: &[u8] = b"test-secret-key-for-testing-only-32chars";

    fn user() -> User {
        User {
            id: Uuid::new_v4(),
            email: "ada@example.com".to_string(),
            password_hash: "$argon2id$original".to_string(),
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            is_staff: false,
            is_superuser: false,
            is_active: true,
            date_joined: Utc::now(),
            last_login: None,
        }
    }

    fn signed_part(token: &str) -> String {
        PasswordResetToken::parse(token).unwrap().signed
    }

    #[test]
    fn test_base36() {
        assert_eq!(to_base36(0), "0");
        assert_eq!(to_base36(35), "z");
        assert_eq!(to_base36(36), "10");
        assert_eq!(from_base36("10"), Some(36));
        assert_eq!(from_base36(""), None);
        assert_eq!(from_base36("!!"), None);
    }

    #[test]
    fn test_uid_encoding() {
        let id = Uuid::new_v4();
        assert_eq!(decode_uid(&encode_uid(id)), Some(id));
        assert_eq!(decode_uid("not base64!"), None);
    }

    #[test]
    fn test_fresh_token_verifies() {
        let generator = ResetTokenGenerator::new(SECRET, 3600);
        let user = user();
        let now = Utc::now();
        let token = generator.make_token(&user, now);

        let parsed = PasswordResetToken::parse(&token).unwrap();
        assert_eq!(parsed.uid, user.id);
        assert!(generator.check_token(&user, &parsed.signed, now));
    }

    #[test]
    fn test_token_expires() {
        let generator = ResetTokenGenerator::new(SECRET, 3600);
        let user = user();
        let issued = Utc::now();
        let token = generator.make_token(&user, issued);

        let later = issued + Duration::seconds(3601);
        assert!(!generator.check_token(&user, &signed_part(&token), later));
    }

    #[test]
    fn test_password_change_invalidates() {
        let generator = ResetTokenGenerator::new(SECRET, 3600);
        let mut user = user();
        let now = Utc::now();
        let token = generator.make_token(&user, now);

        user.password_hash = "$argon2id$changed".to_string();
        assert!(!generator.check_token(&user, &signed_part(&token), now));
    }

    #[test]
    fn test_login_invalidates() {
        let generator = ResetTokenGenerator::new(SECRET, 3600);
        let mut user = user();
        let now = Utc::now();
        let token = generator.make_token(&user, now);

        user.last_login = Some(now);
        assert!(!generator.check_token(&user, &signed_part(&token), now));
    }

    #[test]
    fn test_other_secret_rejected() {
        let user = user();
        let now = Utc::now();
        let token = ResetTokenGenerator::new(SECRET, 3600).make_token(&user, now);
        let other = ResetTokenGenerator::new(b"another-secret-of-sufficient-length!!", 3600);
        assert!(!other.check_token(&user, &signed_part(&token), now));
    }

    #[test]
    fn test_signature_is_hmac_sha256() {
        let generator = ResetTokenGenerator::new(SECRET, 3600);
        let user = user();
        let ts = 1_000;

        let mut key = Sha256::new()
            .chain_update(KEY_SALT.as_bytes())
            .chain_update(SECRET)
            .finalize()
            .to_vec();
        key.resize(64, 0);
        let mut mac = <Hmac<Sha256> as Mac>::new_from_slice(&key).unwrap();
        mac.update(user.id.as_bytes());
        mac.update(user.password_hash.as_bytes());
        mac.update(ts.to_string().as_bytes());
        let expected = mac.finalize().into_bytes();

        assert_eq!(
            generator.make_signed(&user, ts),
            format!("rs-{}", URL_SAFE_NO_PAD.encode(&expected[..20]))
        );
    }

    #[test]
    fn test_malformed_tokens() {
        assert!(PasswordResetToken::parse("no-dot-here").is_none());
        assert!(PasswordResetToken::parse("abc.").is_none());
        assert!(PasswordResetToken::parse("!!!.1-abc").is_none());

        let generator = ResetTokenGenerator::new(SECRET, 3600);
        assert!(!generator.check_token(&user(), "missing_separator", Utc::now()));
    }
}

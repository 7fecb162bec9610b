//! Cooling configuration record.
//!
//! A record holds five arrays of opaque JSON blobs. The arrays may be
//! absent (null) and so may their elements; nothing about their content is
//! validated.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;
use uuid::Uuid;

use super::{User, UserResponse};

/// Nullable array of opaque JSON values
pub type JsonBlobs = Option<Vec<Value>>;

/// Cooling domain entity
#[derive(Debug, Clone, PartialEq)]
pub struct Cooling {
    pub id: i64,
    pub name: Option<String>,
    pub data: CoolingData,
    /// Nulled when the owning user is deleted
    pub owner_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// The five blob arrays making up a configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct CoolingData {
    #[schema(value_type = Option<Vec<Object>>)]
    #[serde(default)]
    pub components: JsonBlobs,
    #[schema(value_type = Option<Vec<Object>>)]
    #[serde(default)]
    pub losses: JsonBlobs,
    #[schema(value_type = Option<Vec<Object>>)]
    #[serde(default)]
    pub faces: JsonBlobs,
    #[schema(value_type = Option<Vec<Object>>)]
    #[serde(default)]
    pub passages: JsonBlobs,
    #[schema(value_type = Option<Vec<Object>>)]
    #[serde(default)]
    pub fluids: JsonBlobs,
}

/// Values written on create and full replace.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CoolingDraft {
    pub name: Option<String>,
    pub data: CoolingData,
    pub owner_id: Option<Uuid>,
}

/// A record together with its owner, if any.
#[derive(Debug, Clone, PartialEq)]
pub struct CoolingRecord {
    pub cooling: Cooling,
    pub owner: Option<User>,
}

/// Cooling record as returned to clients
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CoolingResponse {
    #[schema(example = 1)]
    pub id: i64,
    #[schema(example = "Inverter cold plate")]
    pub name: Option<String>,
    #[serde(flatten)]
    pub data: CoolingData,
    /// Nested public view of the owner
    pub owner: Option<UserResponse>,
}

impl From<CoolingRecord> for CoolingResponse {
    fn from(record: CoolingRecord) -> Self {
        Self {
            id: record.cooling.id,
            name: record.cooling.name,
            data: record.cooling.data,
            owner: record.owner.map(UserResponse::from),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_missing_arrays_deserialize_as_null() {
        let data: CoolingData =
            serde_json::from_value(json!({"components": [{"kind": "pump"}, null]})).unwrap();
        assert_eq!(data.components.as_ref().map(Vec::len), Some(2));
        assert!(data.losses.is_none());
        assert!(data.fluids.is_none());
    }

    #[test]
    fn test_response_flattens_arrays_and_nests_owner() {
        let owner = User {
            id: Uuid::new_v4(),
            email: "owner@example.com".to_string(),
            password_hash: "hash".to_string(),
            first_name: "Grace".to_string(),
            last_name: "Hopper".to_string(),
            is_staff: false,
            is_superuser: false,
            is_active: true,
            date_joined: Utc::now(),
            last_login: None,
        };
        let record = CoolingRecord {
            cooling: Cooling {
                id: 7,
                name: Some("loop".to_string()),
                data: CoolingData {
                    faces: Some(vec![json!({"area": 0.02})]),
                    ..Default::default()
                },
                owner_id: Some(owner.id),
                created_at: Utc::now(),
                updated_at: Utc::now(),
            },
            owner: Some(owner.clone()),
        };

        let body = serde_json::to_value(CoolingResponse::from(record)).unwrap();
        assert_eq!(body["id"], 7);
        assert_eq!(body["faces"][0]["area"], 0.02);
        assert!(body["components"].is_null());
        assert_eq!(body["owner"]["email"], "owner@example.com");
        assert!(body["owner"].get("password_hash").is_none());
    }

    #[test]
    fn test_orphaned_record_has_null_owner() {
        let record = CoolingRecord {
            cooling: Cooling {
                id: 1,
                name: None,
                data: CoolingData::default(),
                owner_id: None,
                created_at: Utc::now(),
                updated_at: Utc::now(),
            },
            owner: None,
        };
        let body = serde_json::to_value(CoolingResponse::from(record)).unwrap();
        assert!(body["owner"].is_null());
    }
}

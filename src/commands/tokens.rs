//! Tokens command - Refresh-token blacklist maintenance.

use chrono::Utc;

use crate::cli::args::{TokensAction, TokensArgs};
use crate::config::Config;
use crate::errors::AppResult;
use crate::infra::{Database, TokenBlacklistRepository, TokenBlacklistStore};

/// Execute the tokens command
pub async fn execute(args: TokensArgs, config: Config) -> AppResult<()> {
    let db = Database::connect(&config).await?;
    let blacklist = TokenBlacklistStore::new(db.get_connection());

    match args.action {
        TokensAction::FlushExpired => {
            let removed = blacklist.flush_expired(Utc::now()).await?;
            tracing::info!(removed, "Expired blacklist entries flushed");
            println!("Removed {} expired token(s).", removed);
        }
    }

    Ok(())
}

//! Users command - Account creation from the command line.

use std::sync::Arc;

use crate::cli::args::{NewAccountArgs, UsersAction, UsersArgs};
use crate::config::Config;
use crate::domain::NewUser;
use crate::errors::AppResult;
use crate::infra::{Database, Persistence};
use crate::jobs::PostgresEmailQueue;
use crate::services::{AccountManager, AccountService};

/// Execute the users command
pub async fn execute(args: UsersArgs, config: Config) -> AppResult<()> {
    let db = Database::connect(&config).await?;
    let emails = PostgresEmailQueue::connect(&config).await?;
    let accounts = AccountManager::new(
        Arc::new(Persistence::new(db.get_connection())),
        Arc::new(emails),
        config,
    );

    let user = match args.action {
        UsersAction::CreateSuperuser(account) => {
            accounts.create_superuser(new_user(account)).await?
        }
        UsersAction::Create(account) => accounts.create_user(new_user(account)).await?,
    };

    tracing::info!(user_id = %user.id, email = %user.email, is_staff = user.is_staff, "Account created");
    println!("Created {} ({})", user.email, user.id);

    Ok(())
}

fn new_user(args: NewAccountArgs) -> NewUser {
    NewUser {
        email: args.email,
        password: args.password,
        first_name: args.first_name,
        last_name: args.last_name,
        ..Default::default()
    }
}

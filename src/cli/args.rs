//! CLI argument definitions.

use clap::{Args, Parser, Subcommand};

/// Cooling API - configuration records with JWT authentication
#[derive(Parser, Debug)]
#[command(name = "cooling-api")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the HTTP server
    Serve(ServeArgs),

    /// Run database migrations
    Migrate(MigrateArgs),

    /// Manage background jobs
    Jobs(JobsArgs),

    /// Manage user accounts
    Users(UsersArgs),

    /// Maintain the refresh-token blacklist
    Tokens(TokensArgs),
}

/// Arguments for the serve command
#[derive(Parser, Debug)]
pub struct ServeArgs {
    /// Host to bind to
    #[arg(short = 'H', long, default_value = "0.0.0.0", env = "SERVER_HOST")]
    pub host: String,

    /// Port to listen on
    #[arg(short, long, default_value = "3000", env = "SERVER_PORT")]
    pub port: u16,
}

/// Arguments for the migrate command
#[derive(Parser, Debug)]
pub struct MigrateArgs {
    #[command(subcommand)]
    pub action: MigrateAction,
}

/// Migration actions
#[derive(Subcommand, Debug)]
pub enum MigrateAction {
    /// Run pending migrations
    Up,
    /// Rollback last migration
    Down,
    /// Show migration status
    Status,
    /// Reset and re-run all migrations
    Fresh,
}

/// Arguments for the jobs command
#[derive(Parser, Debug)]
pub struct JobsArgs {
    #[command(subcommand)]
    pub action: JobsAction,
}

/// Job management actions
#[derive(Subcommand, Debug)]
pub enum JobsAction {
    /// Start the email worker
    Work,
    /// Show queue counts by status
    List,
    /// Clear failed jobs
    Clear,
}

/// Arguments for the users command
#[derive(Parser, Debug)]
pub struct UsersArgs {
    #[command(subcommand)]
    pub action: UsersAction,
}

/// Account management actions
#[derive(Subcommand, Debug)]
pub enum UsersAction {
    /// Create an account with staff and superuser rights
    CreateSuperuser(NewAccountArgs),
    /// Create a regular account
    Create(NewAccountArgs),
}

/// Fields for a new account
#[derive(Args, Debug)]
pub struct NewAccountArgs {
    #[arg(long)]
    pub email: String,

    /// Read from the environment when omitted
    #[arg(long, env = "ACCOUNT_PASSWORD", hide_env_values = true)]
    pub password: String,

    #[arg(long, default_value = "")]
    pub first_name: String,

    #[arg(long, default_value = "")]
    pub last_name: String,
}

/// Arguments for the tokens command
#[derive(Parser, Debug)]
pub struct TokensArgs {
    #[command(subcommand)]
    pub action: TokensAction,
}

/// Blacklist maintenance actions
#[derive(Subcommand, Debug)]
pub enum TokensAction {
    /// Delete blacklist entries whose token has expired
    FlushExpired,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_create_superuser() {
        let cli = Cli::try_parse_from([
            "cooling-api",
            "users",
            "create-superuser",
            "--email",
            "root@example.com",
            "--password",
            "Thermal-Flow-42",
            "--first-name",
            "Ada",
        ])
        .unwrap();

        match cli.command {
            Commands::Users(UsersArgs {
                action: UsersAction::CreateSuperuser(args),
            }) => {
                assert_eq!(args.email, "root@example.com");
                assert_eq!(args.first_name, "Ada");
                assert_eq!(args.last_name, "");
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_parse_flush_expired_with_verbose() {
        let cli = Cli::try_parse_from(["cooling-api", "-v", "tokens", "flush-expired"]).unwrap();
        assert!(cli.verbose);
        assert!(matches!(
            cli.command,
            Commands::Tokens(TokensArgs {
                action: TokensAction::FlushExpired
            })
        ));
    }
}

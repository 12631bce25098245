//! Construct CLI - database migrations and management tools.
//!
//! # Usage
//!
//! ```bash
//! # Run database migrations
//! construct-cli migrate
//!
//! # Create a user directly (bootstrap)
//! construct-cli user create -e admin@example.com -n "Admin Name" -r admin -p <password>
//!
//! # Create an invitation and print the registration link
//! construct-cli user invite -e member@example.com -n "New Member"
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "construct-cli")]
#[command(author, version, about = "Construct CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Manage users
    User {
        #[command(subcommand)]
        action: UserAction,
    },
}

#[derive(Subcommand)]
enum UserAction {
    /// Create a user directly, bypassing the invitation flow
    Create {
        /// Email address
        #[arg(short, long)]
        email: String,

        /// Display name
        #[arg(short, long)]
        name: String,

        /// Role (`admin`, `user`)
        #[arg(short, long, default_value = "user")]
        role: String,

        /// Initial password
        #[arg(short, long)]
        password: String,
    },
    /// Create an invitation and print the registration link
    Invite {
        /// Email address to invite
        #[arg(short, long)]
        email: String,

        /// Display name for the invited user
        #[arg(short, long)]
        name: String,

        /// Role to assign on acceptance (`admin`, `user`)
        #[arg(short, long, default_value = "user")]
        role: String,
    },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Migrate => commands::migrate::run().await?,
        Commands::User { action } => match action {
            UserAction::Create {
                email,
                name,
                role,
                password,
            } => {
                commands::user::create(&email, &name, &role, &password).await?;
            }
            UserAction::Invite { email, name, role } => {
                commands::user::invite(&email, &name, &role).await?;
            }
        },
    }
    Ok(())
}

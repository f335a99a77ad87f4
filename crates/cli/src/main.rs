//! Greengrocer CLI - Database migrations and admin management tools.
//!
//! # Usage
//!
//! ```bash
//! # Run admin database migrations
//! gg-cli migrate
//!
//! # Create the first admin
//! gg-cli admin create -e owner@greengrocer.example -n "Olive Owner" -p <password>
//!
//! # List admins (the edit command's selection input)
//! gg-cli admin list
//!
//! # Edit an admin's credentials; forces their session to terminate
//! gg-cli admin edit -i 1 --name "New Name"
//!
//! # Obtain a token and watch it for forced invalidation
//! gg-cli admin login -e owner@greengrocer.example -p <password>
//! gg-cli admin watch
//! ```
//!
//! # Commands
//!
//! - `migrate` - Run admin database migrations
//! - `admin create` - Create admin credential records
//! - `admin list` - List admin credential records
//! - `admin edit` - Edit a record and invalidate its sessions
//! - `admin login` - Log in against a running server, store the token
//! - `admin watch` - Poll token validity against a running server

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "gg-cli")]
#[command(author, version, about = "Greengrocer CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run admin database migrations
    Migrate,
    /// Manage admin credential records
    Admin {
        #[command(subcommand)]
        action: AdminAction,
    },
}

#[derive(Subcommand)]
enum AdminAction {
    /// Create a new admin credential record
    Create {
        /// Admin email address
        #[arg(short, long)]
        email: String,

        /// Admin display name
        #[arg(short, long)]
        name: String,

        /// Admin password (min 8 characters)
        #[arg(short, long)]
        password: String,
    },
    /// List admin credential records
    List,
    /// Edit an admin's credentials and force their session to terminate
    Edit {
        /// Admin ID (see `gg-cli admin list`)
        #[arg(short, long)]
        id: i32,

        /// New display name
        #[arg(long)]
        name: Option<String>,

        /// New email address
        #[arg(long)]
        email: Option<String>,

        /// New password (min 8 characters)
        #[arg(long)]
        password: Option<String>,
    },
    /// Log in against a running admin server and store the token
    Login {
        /// Admin email address
        #[arg(short, long)]
        email: String,

        /// Admin password
        #[arg(short, long)]
        password: String,

        /// File the token is written to
        #[arg(long, default_value = commands::session::DEFAULT_TOKEN_FILE)]
        token_file: String,
    },
    /// Poll the stored token against a running admin server
    Watch {
        /// File the token is read from
        #[arg(long, default_value = commands::session::DEFAULT_TOKEN_FILE)]
        token_file: String,

        /// Poll interval in seconds
        #[arg(long, default_value_t = 5)]
        interval: u64,
    },
}

#[tokio::main]
async fn main() {
    // Initialize tracing
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
        Commands::Migrate => commands::migrate::admin().await?,
        Commands::Admin { action } => match action {
            AdminAction::Create {
                email,
                name,
                password,
            } => {
                commands::admin::create_user(&email, &name, &password).await?;
            }
            AdminAction::List => commands::admin::list().await?,
            AdminAction::Edit {
                id,
                name,
                email,
                password,
            } => {
                commands::admin::edit(id, name, email, password).await?;
            }
            AdminAction::Login {
                email,
                password,
                token_file,
            } => {
                commands::session::login(&email, &password, &token_file).await?;
            }
            AdminAction::Watch {
                token_file,
                interval,
            } => {
                commands::session::watch(&token_file, interval).await?;
            }
        },
    }
    Ok(())
}

//! Command-line entry point for the ledger client.
//!
//! This file loads configuration, wires the session store into the API
//! services and runs a single command, printing the JSON result.
//! Credentials are checked with the form validators before anything is sent.

use anyhow::{Result, bail};
use clap::{Parser, Subcommand};
use ledger_client::validation::{FieldRules, FormRules};
use ledger_client::{
    ApiClient, AuthService, BlockchainService, ClientError, Config, FileStorage, MemoryStorage,
    SessionStorage,
};
use serde_json::{Value, json};
use std::process::ExitCode;
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::fmt::init;

/// Command-line client for the ledger service
#[derive(Parser, Debug)]
#[command(name = "ledger-client")]
#[command(about = "Query the ledger service and manage the local session")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Chain statistics
    Stats,

    /// Every block in the chain
    Blocks,

    /// A single block by height
    Block {
        /// Block height
        index: u64,
    },

    /// The latest block
    Latest,

    /// Ask the server to validate the chain
    Validate,

    /// Log in and save the session
    Login { email: String, password: String },

    /// Create an account and save the session
    Register {
        username: String,
        email: String,
        password: String,
    },

    /// Profile of the logged-in user
    Me,

    /// Log out and clear the session
    Logout,

    /// Show the locally stored session
    Whoami,
}

#[tokio::main]
async fn main() -> ExitCode {
    init();

    let cli = Cli::parse();
    match run(cli).await {
        Ok(output) => {
            println!("{output}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            match e.downcast_ref::<ClientError>().and_then(ClientError::status) {
                Some(status) => error!(status, "Request rejected by the server: {}", e),
                None => error!("{:#}", e),
            }
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<String> {
    let config = Config::from_env()?;
    let storage: Arc<dyn SessionStorage> = match &config.session_store_path {
        Some(path) => Arc::new(FileStorage::new(path.clone())),
        None => Arc::new(MemoryStorage::new()),
    };

    let api = ApiClient::new(&config, storage)?;
    info!("Using API at {}", api.base_url());

    let auth = AuthService::new(api.clone());
    let ledger = BlockchainService::new(api);

    let output = match cli.command {
        Commands::Stats => ledger.get_stats().await?,
        Commands::Blocks => ledger.get_blocks().await?,
        Commands::Block { index } => ledger.get_block(index).await?,
        Commands::Latest => ledger.get_latest_block().await?,
        Commands::Validate => ledger.validate().await?,
        Commands::Login { email, password } => {
            let credentials = json!({ "email": email, "password": password });
            check_form(&login_rules(), &credentials)?;
            auth.login(&credentials).await?.into_payload()
        }
        Commands::Register {
            username,
            email,
            password,
        } => {
            let user_data = json!({ "username": username, "email": email, "password": password });
            check_form(&register_rules(), &user_data)?;
            auth.register(&user_data).await?.into_payload()
        }
        Commands::Me => auth.get_profile().await?,
        Commands::Logout => {
            auth.logout().await?;
            json!({ "loggedOut": true })
        }
        Commands::Whoami => json!({
            "authenticated": auth.is_authenticated().await,
            "user": auth.get_current_user().await,
        }),
    };

    Ok(serde_json::to_string_pretty(&output)?)
}

fn login_rules() -> FormRules {
    FormRules::new()
        .field("email", FieldRules::new().required().email())
        .field("password", FieldRules::new().required())
}

fn register_rules() -> FormRules {
    FormRules::new()
        .field("username", FieldRules::new().required().username())
        .field("email", FieldRules::new().required().email())
        .field("password", FieldRules::new().required().password())
}

fn check_form(rules: &FormRules, data: &Value) -> Result<()> {
    let errors = rules.validate(data);
    if errors.is_empty() {
        return Ok(());
    }

    let mut messages: Vec<String> = errors
        .into_iter()
        .map(|(field, message)| format!("{field}: {message}"))
        .collect();
    messages.sort();
    bail!("Validation failed: {}", messages.join(", "))
}

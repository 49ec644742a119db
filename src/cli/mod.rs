//! Command-line surface of the admin client.
//!
//! Each page of the original admin console maps to a subcommand group:
//! session management at the top level, then `account`, `tx`, `fraud`, and
//! `users`. API responses are printed as pretty JSON; failures propagate and
//! are reported once at top level.

use crate::api::accounts::{AdjustBalanceRequest, CreateAccountRequest};
use crate::api::auth::{HttpAuthBackend, LoginRequest, RegisterRequest};
use crate::api::fraud::FraudCheckRequest;
use crate::api::transactions::CreateTransferRequest;
use crate::api::ApiClient;
use crate::config::Config;
use crate::session::SessionStore;
use crate::store::SqliteKvStore;
use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use dialoguer::{Input, Password};
use std::sync::Arc;

#[derive(Parser)]
#[command(
    name = "finpayctl",
    version,
    about = "Administrative client for the FinPay payments platform"
)]
pub struct Cli {
    /// Override the API gateway URL (defaults to config / FINPAY_API_URL).
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Log in and persist the session.
    Login {
        /// Username; prompted for when omitted.
        #[arg(long)]
        username: Option<String>,
    },
    /// Create a new operator account and log in.
    Register,
    /// Clear the local session (the token stays valid remotely until expiry).
    Logout,
    /// Show the current session.
    Whoami,
    /// Account lookups and balance operations.
    #[command(subcommand)]
    Account(AccountCommand),
    /// Transaction history and transfer submission.
    #[command(subcommand)]
    Tx(TxCommand),
    /// Fraud check review.
    #[command(subcommand)]
    Fraud(FraudCommand),
    /// List registered users.
    Users,
    /// Generate shell completions.
    Completions { shell: Shell },
}

#[derive(Subcommand)]
pub enum AccountCommand {
    /// Account of the logged-in user.
    Mine,
    /// Look up an account by id.
    Show { account_id: String },
    /// Open a new account.
    Create {
        #[arg(long)]
        owner_email: String,
        #[arg(long, default_value_t = 0.0)]
        initial_balance: f64,
    },
    /// Withdraw from an account.
    Debit {
        #[arg(long)]
        account: String,
        #[arg(long)]
        amount: f64,
    },
    /// Deposit into an account.
    Credit {
        #[arg(long)]
        account: String,
        #[arg(long)]
        amount: f64,
    },
}

#[derive(Subcommand)]
pub enum TxCommand {
    /// Transactions of the logged-in user.
    Mine,
    /// Transactions touching an account.
    List { account_id: String },
    /// Look up a transaction by id.
    Show { transaction_id: String },
    /// Submit a transfer (a fresh idempotency key is generated).
    Transfer {
        #[arg(long)]
        from: String,
        #[arg(long)]
        to: String,
        #[arg(long)]
        amount: f64,
    },
}

#[derive(Subcommand)]
pub enum FraudCommand {
    /// Run a fraud check against a transaction.
    Check {
        #[arg(long)]
        transaction: String,
        #[arg(long)]
        amount: f64,
    },
    /// Stored fraud outcome for a transaction.
    Show { transaction_id: String },
}

/// Entry point called from `main` after argument parsing. Completions are
/// emitted without touching config or local state; every other command runs
/// against a built [`App`].
pub async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Completions { shell } => {
            let mut cmd = Cli::command();
            clap_complete::generate(shell, &mut cmd, "finpayctl", &mut std::io::stdout());
            Ok(())
        }
        Command::Login { username } => App::new(cli.api_url)?.login(username).await,
        Command::Register => App::new(cli.api_url)?.register().await,
        Command::Logout => App::new(cli.api_url)?.logout(),
        Command::Whoami => App::new(cli.api_url)?.whoami(),
        Command::Account(cmd) => App::new(cli.api_url)?.account(cmd).await,
        Command::Tx(cmd) => App::new(cli.api_url)?.tx(cmd).await,
        Command::Fraud(cmd) => App::new(cli.api_url)?.fraud(cmd).await,
        Command::Users => App::new(cli.api_url)?.users().await,
    }
}

/// Session store + gateway client wired from config, shared by all
/// session-bearing commands.
struct App {
    session: Arc<SessionStore>,
    client: ApiClient,
}

impl App {
    fn new(api_url: Option<String>) -> Result<Self> {
        let mut config = Config::load()?;
        if let Some(url) = api_url {
            config.api_base_url = url;
        }

        let kv = Arc::new(SqliteKvStore::open(&config.session_db_path()?)?);
        let backend = Arc::new(HttpAuthBackend::new(&config)?);
        let session = Arc::new(SessionStore::open(backend, kv)?);
        let client = ApiClient::new(&config, session.clone())?;
        Ok(Self { session, client })
    }

    async fn login(&self, username: Option<String>) -> Result<()> {
        let username = match username {
            Some(username) => username,
            None => Input::new().with_prompt("Username").interact_text()?,
        };
        let password = Password::new().with_prompt("Password").interact()?;
        self.session
            .login(&LoginRequest { username: username.clone(), password })
            .await?;
        println!("Logged in as {username}.");
        Ok(())
    }

    async fn register(&self) -> Result<()> {
        let profile = prompt_profile()?;
        let username = profile.username.clone();
        self.session.register(&profile).await?;
        let role = self.session.role().unwrap_or_else(|| "USER".into());
        println!("Registered and logged in as {username} ({role}).");
        Ok(())
    }

    fn logout(&self) -> Result<()> {
        self.session.logout()?;
        println!("Logged out.");
        Ok(())
    }

    fn whoami(&self) -> Result<()> {
        let current = self.session.current();
        if current.is_authenticated() {
            println!("username: {}", current.username.as_deref().unwrap_or("<unknown>"));
            println!("role:     {}", current.role.as_deref().unwrap_or("<unknown>"));
        } else {
            println!("Not logged in.");
        }
        Ok(())
    }

    async fn account(&self, cmd: AccountCommand) -> Result<()> {
        match cmd {
            AccountCommand::Mine => print_json(&self.client.my_account().await?),
            AccountCommand::Show { account_id } => {
                print_json(&self.client.account(&account_id).await?)
            }
            AccountCommand::Create { owner_email, initial_balance } => {
                let account = self
                    .client
                    .create_account(&CreateAccountRequest { owner_email, initial_balance })
                    .await?;
                print_json(&account)
            }
            AccountCommand::Debit { account, amount } => {
                let account = self
                    .client
                    .debit(&AdjustBalanceRequest { account_id: account, amount })
                    .await?;
                print_json(&account)
            }
            AccountCommand::Credit { account, amount } => {
                let account = self
                    .client
                    .credit(&AdjustBalanceRequest { account_id: account, amount })
                    .await?;
                print_json(&account)
            }
        }
    }

    async fn tx(&self, cmd: TxCommand) -> Result<()> {
        match cmd {
            TxCommand::Mine => print_json(&self.client.my_transactions().await?),
            TxCommand::List { account_id } => {
                print_json(&self.client.transactions_for_account(&account_id).await?)
            }
            TxCommand::Show { transaction_id } => {
                print_json(&self.client.transaction(&transaction_id).await?)
            }
            TxCommand::Transfer { from, to, amount } => {
                let tx = self
                    .client
                    .submit_transfer(&CreateTransferRequest {
                        from_account_id: from,
                        to_account_id: to,
                        amount,
                    })
                    .await?;
                print_json(&tx)
            }
        }
    }

    async fn fraud(&self, cmd: FraudCommand) -> Result<()> {
        match cmd {
            FraudCommand::Check { transaction, amount } => {
                let check = self
                    .client
                    .check_fraud(&FraudCheckRequest { transaction_id: transaction, amount })
                    .await?;
                print_json(&check)
            }
            FraudCommand::Show { transaction_id } => {
                print_json(&self.client.fraud_check_for(&transaction_id).await?)
            }
        }
    }

    async fn users(&self) -> Result<()> {
        print_json(&self.client.list_users().await?)
    }
}

/// Interactive prompts for the registration profile.
fn prompt_profile() -> Result<RegisterRequest> {
    Ok(RegisterRequest {
        first_name: Input::new().with_prompt("First name").interact_text()?,
        last_name: Input::new().with_prompt("Last name").interact_text()?,
        email: Input::new().with_prompt("Email").interact_text()?,
        username: Input::new().with_prompt("Username").interact_text()?,
        password: Password::new()
            .with_prompt("Password")
            .with_confirmation("Confirm password", "Passwords do not match")
            .interact()?,
        role: Input::new()
            .with_prompt("Role")
            .default("USER".to_string())
            .interact_text()?,
        location: Input::new().with_prompt("Location").interact_text()?,
    })
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

//! Command handlers for the ledgerlink CLI.
//!
//! `App` owns the loaded configuration and the authenticated client. Each
//! handler runs one flow from `ledgerlink_core::flows` and prints the result.

use std::io::{self, Write};
use std::path::Path;

use anyhow::{anyhow, Result};
use tracing::debug;

use ledgerlink_core::flows::{account, ledger, profile};
use ledgerlink_core::models::{TransactionKind, User};
use ledgerlink_core::utils::{first_name, format_brl, format_date, signed_amount};
use ledgerlink_core::validation::{LoginForm, RegistrationForm, TransactionForm};
use ledgerlink_core::{ApiClient, Config, FlowError, SessionState};

/// Optional password source for scripted use
const ENV_PASSWORD: &str = "LEDGERLINK_PASSWORD";

pub struct App {
    config: Config,
    api: ApiClient,
}

impl App {
    pub fn new(base_url: Option<String>) -> Result<Self> {
        let mut config = Config::load()?;
        if let Some(url) = base_url {
            config.base_endpoint = url;
        }
        debug!(endpoint = %config.base_endpoint, backend = ?config.token_backend, "Loaded config");

        let api = ApiClient::new(&config.client_config(), config.token_store()?)?;
        Ok(Self { config, api })
    }

    pub async fn login(&mut self, email: Option<String>) -> Result<()> {
        let email = match email {
            Some(email) => email,
            None => self.prompt_email()?,
        };
        let password = Self::password("Password: ")?;

        let form = LoginForm {
            email: email.trim().to_string(),
            password,
        };
        let user = account::login(&self.api, &form).await.map_err(report)?;

        self.config.last_email = Some(form.email);
        self.config.save()?;

        println!("Welcome, {}!", first_name(user.name.as_deref()));
        Ok(())
    }

    pub async fn register(&mut self, name: String, email: String) -> Result<()> {
        let password = Self::password("Password: ")?;
        let password_confirmation = Self::password("Confirm password: ")?;

        let form = RegistrationForm {
            name,
            email,
            password,
            password_confirmation,
        };
        account::register(&self.api, &form).await.map_err(report)?;

        println!("Account created. Run `ledgerlink login` to sign in.");
        Ok(())
    }

    pub async fn home(&self) -> Result<()> {
        let home = ledger::load_home(&self.api).await.map_err(report)?;

        println!("Hello, {}!", first_name(home.user.name.as_deref()));
        println!("Balance: {}", format_brl(home.balance));
        println!();

        if home.transactions.is_empty() {
            println!("No transactions found");
            return Ok(());
        }

        println!("Transactions");
        for tx in &home.transactions {
            let date = tx.created_at.as_deref().map(format_date).unwrap_or_default();
            println!(
                "  #{:<5} {:<10} {:>16}  {:<7}  {}",
                tx.id,
                date,
                signed_amount(tx),
                tx.kind.display_name(),
                tx.description_display()
            );
        }
        Ok(())
    }

    pub async fn add(&self, kind: &str, amount: String, description: String) -> Result<()> {
        let form = TransactionForm {
            kind: TransactionKind::parse(kind),
            amount,
            description,
        };
        let created = ledger::create_transaction(&self.api, &form).await.map_err(report)?;

        match created {
            Some(tx) => println!("Transaction #{} saved: {}", tx.id, signed_amount(&tx)),
            None => println!("Transaction saved."),
        }
        Ok(())
    }

    pub async fn remove(&self, id: i64) -> Result<()> {
        ledger::remove_transaction(&self.api, id).await.map_err(report)?;
        println!("Transaction #{} removed.", id);
        Ok(())
    }

    pub async fn profile(&self) -> Result<()> {
        let user = profile::load_profile(&self.api).await.map_err(report)?;
        print_profile(&user);
        Ok(())
    }

    pub async fn photo(&self, path: &Path) -> Result<()> {
        let user = profile::upload_photo(&self.api, path).await.map_err(report)?;
        println!("Photo updated.");
        print_profile(&user);
        Ok(())
    }

    pub async fn logout(&self) -> Result<()> {
        account::logout(&self.api).await.map_err(report)?;
        println!("Logged out.");
        Ok(())
    }

    pub fn status(&self) -> Result<()> {
        match account::session_state(&self.api).map_err(report)? {
            SessionState::Authenticated { .. } => println!("Logged in ({})", self.api.base_endpoint()),
            SessionState::Unauthenticated => println!("Not logged in"),
        }
        Ok(())
    }

    /// Ask for the email, offering the last one used as default
    fn prompt_email(&self) -> Result<String> {
        match self.config.last_email.as_deref() {
            Some(last) => print!("Email [{}]: ", last),
            None => print!("Email: "),
        }
        io::stdout().flush()?;

        let mut input = String::new();
        io::stdin().read_line(&mut input)?;
        let input = input.trim();

        match (input.is_empty(), self.config.last_email.as_ref()) {
            (true, Some(last)) => Ok(last.clone()),
            _ => Ok(input.to_string()),
        }
    }

    fn password(prompt: &str) -> Result<String> {
        if let Ok(password) = std::env::var(ENV_PASSWORD) {
            return Ok(password);
        }
        Ok(rpassword::prompt_password(prompt)?)
    }
}

fn print_profile(user: &User) {
    println!("Name:    {}", user.name.as_deref().unwrap_or("-"));
    println!("Email:   {}", user.email.as_deref().unwrap_or("-"));
    println!("Balance: {}", format_brl(user.balance()));
    if let Some(photo) = user.foto_perfil.as_deref().filter(|p| !p.is_empty()) {
        println!("Photo:   {}", photo);
    }
}

/// Turn a flow failure into the message the user sees.
fn report(err: FlowError) -> anyhow::Error {
    if err.is_session_expired() {
        anyhow!("Your session has expired. Run `ledgerlink login` to sign in again.")
    } else {
        anyhow!(err.user_message())
    }
}

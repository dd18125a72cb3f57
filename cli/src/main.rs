//! GuestDesk CLI
//!
//! Command-line front end for guest registration.
//!
//! # Usage
//!
//! ```bash
//! guestdesk register --name "Jane Doe" --email jane@x.com \
//!     --phone 0812345678 --id-card 123456789012 --remark Meeting
//! guestdesk validate --email bad --phone 123
//! guestdesk list --format json
//! guestdesk get 7
//! guestdesk delete 7
//! ```

use clap::{Args, Parser, Subcommand};
use guestdesk_client::{DraftState, Field};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod config;
mod output;

#[derive(Parser)]
#[command(name = "guestdesk")]
#[command(author = "GuestDesk")]
#[command(version)]
#[command(about = "GuestDesk Command Line Interface", long_about = None)]
struct Cli {
    /// Guest registry base URL
    #[arg(long, env = "GUESTDESK_API_URL")]
    api_url: Option<String>,

    /// HTTP timeout in seconds
    #[arg(long)]
    timeout_secs: Option<u64>,

    /// Output format
    #[arg(long, short)]
    format: Option<output::OutputFormat>,

    /// Profile name from config file
    #[arg(long, short)]
    profile: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Register a guest
    Register(GuestArgs),
    /// Check guest details without sending them
    Validate(GuestArgs),
    /// List registered guests
    List,
    /// Get guest details
    Get { id: u64 },
    /// Change a guest; omitted fields keep their current value
    Update {
        id: u64,
        #[command(flatten)]
        guest: GuestArgs,
    },
    /// Delete a guest
    Delete { id: u64 },
    /// Configure CLI
    Config {
        #[command(subcommand)]
        action: ConfigCommands,
    },
}

/// Guest form fields
#[derive(Args, Debug, Clone, Default)]
pub struct GuestArgs {
    /// Full name
    #[arg(long)]
    name: Option<String>,
    #[arg(long)]
    email: Option<String>,
    /// Phone number, 10-13 digits
    #[arg(long)]
    phone: Option<String>,
    /// ID card number, 12-20 characters
    #[arg(long)]
    id_card: Option<String>,
    /// Meeting, Interview, Delivery or Other
    #[arg(long)]
    remark: Option<String>,
}

impl GuestArgs {
    /// Write the given flags over `draft`, leaving the others alone
    pub fn apply_to(&self, draft: &mut DraftState) {
        let values = [
            (Field::Name, &self.name),
            (Field::Email, &self.email),
            (Field::Phone, &self.phone),
            (Field::IdCard, &self.id_card),
            (Field::Remark, &self.remark),
        ];
        for (field, value) in values {
            if let Some(value) = value {
                draft.set(field, value.clone());
            }
        }
    }

    pub fn to_draft(&self) -> DraftState {
        let mut draft = DraftState::new();
        self.apply_to(&mut draft);
        draft
    }
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Set configuration value
    Set { key: String, value: String },
    /// Get configuration value
    Get { key: String },
    /// List all configuration
    List,
    /// Initialize configuration
    Init,
}

fn init_tracing(level: &str) {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| level.into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let profile = config::Config::load(cli.profile.as_deref()).unwrap_or_default();
    let client_config = profile.client_config(cli.api_url, cli.timeout_secs);
    init_tracing(&client_config.log_level);

    let format = cli.format.or_else(|| profile.format()).unwrap_or_default();

    let result = match cli.command {
        Commands::Register(guest) => commands::register::register(guest, &client_config, format).await,
        Commands::Validate(guest) => commands::register::validate(guest, format),
        Commands::List => commands::guests::list(&client_config, format).await,
        Commands::Get { id } => commands::guests::get(id, &client_config, format).await,
        Commands::Update { id, guest } => commands::guests::update(id, guest, &client_config, format).await,
        Commands::Delete { id } => commands::guests::delete(id, &client_config).await,
        Commands::Config { action } => commands::config::handle(action, cli.profile.as_deref()),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_register_flags() {
        let cli = Cli::try_parse_from([
            "guestdesk", "register", "--name", "Jane Doe", "--id-card", "123456789012",
        ])
        .unwrap();
        let Commands::Register(guest) = cli.command else {
            panic!("expected register");
        };
        let draft = guest.to_draft();
        assert_eq!(draft.get(Field::Name), Some("Jane Doe"));
        assert_eq!(draft.get(Field::IdCard), Some("123456789012"));
        assert_eq!(draft.get(Field::Email), None);
    }

    #[test]
    fn test_apply_keeps_unset_fields() {
        let mut draft = DraftState::new()
            .with(Field::Name, "Jane Doe")
            .with(Field::Phone, "0812345678");
        let guest = GuestArgs { phone: Some("0899999999".into()), ..Default::default() };
        guest.apply_to(&mut draft);

        assert_eq!(draft.get(Field::Name), Some("Jane Doe"));
        assert_eq!(draft.get(Field::Phone), Some("0899999999"));
    }
}

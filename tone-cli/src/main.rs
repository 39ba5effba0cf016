//! Tone: command-line admin for voice agents, channels and organization members.
//!
//! # Usage
//!
//! ```text
//! tone login --email <email> [--password <password>]
//! tone logout
//! tone whoami [--json]
//! tone agents list|upsert|delete|link-number
//! tone channels list|upsert|delete
//! tone providers list [--type llm|tts|stt]
//! tone members list|set-role
//! tone invitations list|invite
//! tone phone-numbers [--provider twilio]
//! tone watch <resource> [--interval <secs>]
//! ```

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};

use commands::{
    agents::AgentsCommand, channels::ChannelsCommand, invitations::InvitationsCommand,
    login::LoginArgs, members::MembersCommand, phone_numbers::PhoneNumbersArgs,
    providers::ProvidersCommand, watch::WatchArgs, whoami::WhoamiArgs,
};

// ---------------------------------------------------------------------------
// CLI entry point
// ---------------------------------------------------------------------------

#[derive(Parser, Debug)]
#[command(
    name = "tone",
    version,
    about = "Manage voice agents, channel integrations and organization members",
    long_about = None,
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Log in and store the session under ~/.tone.
    Login(LoginArgs),

    /// Forget the stored session.
    Logout,

    /// Show the logged-in user and active organization.
    Whoami(WhoamiArgs),

    /// List, create, update or delete voice agents, or link phone numbers to them.
    Agents {
        #[command(subcommand)]
        command: AgentsCommand,
    },

    /// Manage Twilio channel integrations.
    Channels {
        #[command(subcommand)]
        command: ChannelsCommand,
    },

    /// List LLM / TTS / STT service providers.
    Providers {
        #[command(subcommand)]
        command: ProvidersCommand,
    },

    /// List organization members and change their roles.
    Members {
        #[command(subcommand)]
        command: MembersCommand,
    },

    /// List and send organization invitations.
    Invitations {
        #[command(subcommand)]
        command: InvitationsCommand,
    },

    /// List phone numbers available on the linked telephony account.
    PhoneNumbers(PhoneNumbersArgs),

    /// Follow a resource's state, refetching on an interval until ctrl-c.
    Watch(WatchArgs),
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    match cli.command {
        Commands::Login(args) => args.run(),
        Commands::Logout => commands::logout::run(),
        Commands::Whoami(args) => args.run(),
        Commands::Agents { command } => commands::agents::run(command),
        Commands::Channels { command } => commands::channels::run(command),
        Commands::Providers { command } => commands::providers::run(command),
        Commands::Members { command } => commands::members::run(command),
        Commands::Invitations { command } => commands::invitations::run(command),
        Commands::PhoneNumbers(args) => args.run(),
        Commands::Watch(args) => args.run(),
    }
}

/// Logs go to stderr so table and JSON output stay clean. `RUST_LOG`
/// overrides the default `warn` level.
fn init_tracing() {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

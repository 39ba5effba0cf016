//! `tone channels list|upsert|delete`

use anyhow::Result;
use clap::{Args, Subcommand};
use tabled::Tabled;

use tone_core::{ChannelKind, ChannelPayload, ChannelRow, TwilioMetaData};

use super::{authenticated, block_on, load, mutate, or_dash, print_json, print_table, success, ListArgs};

const ROUTE: &str = "/integrations";

#[derive(Subcommand, Debug)]
pub enum ChannelsCommand {
    /// List channel integrations.
    List(ListArgs),

    /// Create a Twilio integration, or update it when --id is given.
    Upsert(UpsertArgs),

    /// Delete an integration by id.
    Delete {
        /// Channel id.
        id: i64,
    },
}

#[derive(Args, Debug)]
pub struct UpsertArgs {
    /// Existing channel id; omit to create.
    #[arg(long)]
    pub id: Option<i64>,

    #[arg(long)]
    pub name: String,

    /// Twilio account SID.
    #[arg(long)]
    pub account_sid: String,

    /// Twilio auth token.
    #[arg(long)]
    pub auth_token: String,
}

#[derive(Tabled)]
struct ChannelTableRow {
    #[tabled(rename = "id")]
    id: i64,
    #[tabled(rename = "name")]
    name: String,
    #[tabled(rename = "account sid")]
    account_sid: String,
    #[tabled(rename = "auth token")]
    auth_token: String,
    #[tabled(rename = "created")]
    created_at: String,
}

impl From<&ChannelRow> for ChannelTableRow {
    fn from(row: &ChannelRow) -> Self {
        Self {
            id: row.id,
            name: row.name.clone(),
            account_sid: or_dash(Some(&row.account_sid)),
            auth_token: row.auth_token.clone(),
            created_at: row.created_at.clone(),
        }
    }
}

pub fn run(command: ChannelsCommand) -> Result<()> {
    let ctx = authenticated(ROUTE)?;
    let channels = ctx.store.channels();

    block_on(async move {
        match command {
            ChannelsCommand::List(args) => {
                let rows = load(channels).await?;
                render(&args, &rows)
            }
            ChannelsCommand::Upsert(args) => {
                let payload = ChannelPayload {
                    id: args.id,
                    name: args.name,
                    channel_type: ChannelKind::Twilio,
                    meta_data: TwilioMetaData {
                        account_sid: args.account_sid,
                        auth_token: args.auth_token,
                    },
                };
                let verb = if payload.id.is_some() { "updated" } else { "created" };
                let rows = mutate(channels, channels.upsert(&payload)).await?;
                success(format!("channel '{}' {verb}", payload.name));
                render(&ListArgs::default(), &rows)
            }
            ChannelsCommand::Delete { id } => {
                let rows = mutate(channels, channels.delete(id)).await?;
                success(format!("channel {id} deleted"));
                render(&ListArgs::default(), &rows)
            }
        }
    })
}

fn render(args: &ListArgs, rows: &[ChannelRow]) -> Result<()> {
    let matched = args.filter(
        rows,
        &[
            |r: &ChannelRow| Some(r.name.clone()),
            |r: &ChannelRow| Some(r.account_sid.clone()),
        ],
    );
    if args.json {
        return print_json(&matched);
    }
    print_table(
        "channels",
        matched.into_iter().map(ChannelTableRow::from).collect(),
        "No channel integrations configured.",
    );
    Ok(())
}

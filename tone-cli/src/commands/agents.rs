//! `tone agents list|upsert|delete|link-number`

use anyhow::{bail, Context as _, Result};
use clap::{Args, Subcommand};
use serde_json::Value;
use tabled::Tabled;

use tone_core::types::MASKED_TOKEN;
use tone_core::{Agent, AgentPayload, AgentType, ChannelRow, PhoneNumberLink, TwilioMetaData};

use super::{authenticated, block_on, load, mutate, or_dash, print_json, print_table, success, ListArgs};

const ROUTE: &str = "/agents";

#[derive(Subcommand, Debug)]
pub enum AgentsCommand {
    /// List agents.
    List(ListArgs),

    /// Create an agent, or update it when --id is given.
    Upsert(UpsertArgs),

    /// Delete an agent by id.
    Delete {
        /// Agent id.
        id: i64,
    },

    /// Attach phone numbers from a Twilio channel to an agent.
    LinkNumber(LinkArgs),
}

#[derive(Args, Debug)]
pub struct UpsertArgs {
    /// Existing agent id; omit to create.
    #[arg(long)]
    pub id: Option<i64>,

    #[arg(long)]
    pub name: String,

    /// inbound | outbound | widget | chat
    #[arg(long = "type", value_name = "TYPE", default_value = "outbound")]
    pub agent_type: AgentType,

    /// Agent configuration as a JSON object.
    #[arg(long, value_name = "JSON")]
    pub meta_data: Option<String>,
}

#[derive(Args, Debug)]
pub struct LinkArgs {
    /// Agent id.
    pub agent_id: i64,

    /// Channel that owns the numbers.
    #[arg(long)]
    pub channel: i64,

    /// Numbers to link, e.g. +15550100.
    #[arg(required = true, num_args = 1..)]
    pub numbers: Vec<String>,

    /// Account SID to use instead of the channel's.
    #[arg(long)]
    pub account_sid: Option<String>,

    /// Auth token to use when the channel's is masked.
    #[arg(long)]
    pub auth_token: Option<String>,
}

#[derive(Tabled)]
struct AgentRow {
    #[tabled(rename = "id")]
    id: i64,
    #[tabled(rename = "name")]
    name: String,
    #[tabled(rename = "type")]
    agent_type: String,
    #[tabled(rename = "status")]
    status: String,
    #[tabled(rename = "phone number")]
    phone_number: String,
    #[tabled(rename = "updated")]
    updated_at: String,
}

impl From<&Agent> for AgentRow {
    fn from(agent: &Agent) -> Self {
        Self {
            id: agent.id,
            name: agent.name.clone(),
            agent_type: agent.agent_type.to_string(),
            status: or_dash(agent.status.as_deref()),
            phone_number: or_dash(agent.phone_number.as_deref()),
            updated_at: or_dash(agent.updated_at.as_deref()),
        }
    }
}

pub fn run(command: AgentsCommand) -> Result<()> {
    let ctx = authenticated(ROUTE)?;
    let agents = ctx.store.agents();
    let channels = ctx.store.channels();

    block_on(async move {
        match command {
            AgentsCommand::List(args) => {
                let items = load(agents).await?;
                render(&args, &items)
            }
            AgentsCommand::Upsert(args) => {
                let payload = args.payload()?;
                let verb = if payload.id.is_some() { "updated" } else { "created" };
                let items = mutate(agents, agents.upsert(&payload)).await?;
                success(format!("agent '{}' {verb}", payload.name));
                render(&ListArgs::default(), &items)
            }
            AgentsCommand::Delete { id } => {
                let items = mutate(agents, agents.delete(id)).await?;
                success(format!("agent {id} deleted"));
                render(&ListArgs::default(), &items)
            }
            AgentsCommand::LinkNumber(args) => {
                let rows = load(channels).await?;
                let Some(row) = rows.iter().find(|row| row.id == args.channel) else {
                    bail!("channel {} not found", args.channel);
                };
                let links = args.links(row)?;
                let items = mutate(agents, agents.link_phone_numbers(&links)).await?;
                success(format!(
                    "{} number(s) linked to agent {}",
                    links.len(),
                    args.agent_id
                ));
                render(&ListArgs::default(), &items)
            }
        }
    })
}

impl UpsertArgs {
    fn payload(&self) -> Result<AgentPayload> {
        let meta_data = match &self.meta_data {
            Some(raw) => serde_json::from_str(raw).context("--meta-data is not valid JSON")?,
            None => Value::Object(Default::default()),
        };
        Ok(AgentPayload {
            id: self.id,
            name: self.name.clone(),
            agent_type: self.agent_type,
            meta_data,
        })
    }
}

impl LinkArgs {
    fn links(&self, channel: &ChannelRow) -> Result<Vec<PhoneNumberLink>> {
        let account_sid = self
            .account_sid
            .clone()
            .unwrap_or_else(|| channel.account_sid.clone());
        let auth_token = match &self.auth_token {
            Some(token) => token.clone(),
            None if channel.auth_token == MASKED_TOKEN => {
                bail!("channel {} has no readable auth token; pass --auth-token", channel.id)
            }
            None => channel.auth_token.clone(),
        };
        if account_sid.trim().is_empty() {
            bail!("channel {} has no account SID; pass --account-sid", channel.id);
        }
        let credentials = TwilioMetaData { account_sid, auth_token };

        let mut links = Vec::with_capacity(self.numbers.len());
        for number in &self.numbers {
            if number.trim().is_empty() {
                bail!("phone numbers must not be blank");
            }
            links.push(PhoneNumberLink::twilio(self.agent_id, channel.id, &credentials, number));
        }
        Ok(links)
    }
}

fn render(args: &ListArgs, items: &[Agent]) -> Result<()> {
    let matched = args.filter(
        items,
        &[
            |a: &Agent| Some(a.name.clone()),
            |a: &Agent| Some(a.agent_type.to_string()),
            |a: &Agent| a.phone_number.clone(),
        ],
    );
    if args.json {
        return print_json(&matched);
    }
    print_table(
        "agents",
        matched.into_iter().map(AgentRow::from).collect(),
        "No agents found.",
    );
    Ok(())
}

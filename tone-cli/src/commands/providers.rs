//! `tone providers list`

use anyhow::Result;
use clap::{Args, Subcommand};
use tabled::Tabled;

use tone_core::{ProviderType, ServiceProvider};

use super::{authenticated, block_on, load, or_dash, print_json, print_table, ListArgs};

const ROUTE: &str = "/providers";

#[derive(Subcommand, Debug)]
pub enum ProvidersCommand {
    /// List service providers.
    List(ProviderListArgs),
}

#[derive(Args, Debug)]
pub struct ProviderListArgs {
    /// Only providers of this kind: llm | tts | stt.
    #[arg(long = "type", value_name = "TYPE")]
    pub provider_type: Option<ProviderType>,

    #[command(flatten)]
    pub list: ListArgs,
}

#[derive(Tabled)]
struct ProviderRow {
    #[tabled(rename = "id")]
    id: i64,
    #[tabled(rename = "name")]
    name: String,
    #[tabled(rename = "type")]
    provider_type: String,
    #[tabled(rename = "status")]
    status: String,
    #[tabled(rename = "models")]
    models: String,
}

impl From<&ServiceProvider> for ProviderRow {
    fn from(provider: &ServiceProvider) -> Self {
        let name = if provider.display_name.is_empty() {
            provider.name.clone()
        } else {
            provider.display_name.clone()
        };
        let models: Vec<&str> = provider.models.iter().map(|m| m.name.as_str()).collect();
        Self {
            id: provider.id,
            name,
            provider_type: provider.provider_type.to_string(),
            status: or_dash(Some(&provider.status)),
            models: or_dash(Some(&models.join(", "))),
        }
    }
}

pub fn run(command: ProvidersCommand) -> Result<()> {
    let ctx = authenticated(ROUTE)?;
    let providers = ctx.store.providers();

    block_on(async move {
        match command {
            ProvidersCommand::List(args) => {
                let items = load(providers).await?;
                let of_type: Vec<ServiceProvider> = items
                    .iter()
                    .filter(|p| args.provider_type.map_or(true, |t| p.provider_type == t))
                    .cloned()
                    .collect();
                render(&args.list, &of_type)
            }
        }
    })
}

fn render(args: &ListArgs, items: &[ServiceProvider]) -> Result<()> {
    let matched = args.filter(
        items,
        &[
            |p: &ServiceProvider| Some(p.name.clone()),
            |p: &ServiceProvider| Some(p.display_name.clone()),
            |p: &ServiceProvider| Some(p.description.clone()),
        ],
    );
    if args.json {
        return print_json(&matched);
    }
    print_table(
        "service providers",
        matched.into_iter().map(ProviderRow::from).collect(),
        "No service providers found.",
    );
    Ok(())
}

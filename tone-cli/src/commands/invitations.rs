//! `tone invitations list|invite`

use anyhow::Result;
use clap::{Args, Subcommand};
use tabled::Tabled;

use tone_core::{InvitePayload, OrganizationInvite, Role};

use super::{authenticated, block_on, load, mutate, print_json, print_table, success, ListArgs};

const ROUTE: &str = "/settings";

#[derive(Subcommand, Debug)]
pub enum InvitationsCommand {
    /// List invitations sent from the active organization.
    List(ListArgs),

    /// Invite someone by email.
    Invite(InviteArgs),
}

#[derive(Args, Debug)]
pub struct InviteArgs {
    #[arg(long)]
    pub name: String,

    #[arg(long)]
    pub email: String,

    /// owner | admin | member | viewer
    #[arg(long, default_value = "member")]
    pub role: Role,
}

#[derive(Tabled)]
struct InviteRow {
    #[tabled(rename = "id")]
    id: i64,
    #[tabled(rename = "name")]
    name: String,
    #[tabled(rename = "email")]
    email: String,
    #[tabled(rename = "role")]
    role: String,
    #[tabled(rename = "status")]
    status: String,
}

impl From<&OrganizationInvite> for InviteRow {
    fn from(invite: &OrganizationInvite) -> Self {
        Self {
            id: invite.member_id,
            name: invite.name.clone(),
            email: invite.email.clone(),
            role: invite.role.clone(),
            status: invite.status.clone(),
        }
    }
}

pub fn run(command: InvitationsCommand) -> Result<()> {
    let ctx = authenticated(ROUTE)?;
    let invitations = ctx.store.invitations();

    block_on(async move {
        match command {
            InvitationsCommand::List(args) => {
                let items = load(invitations).await?;
                render(&args, &items)
            }
            InvitationsCommand::Invite(args) => {
                let payload = InvitePayload {
                    name: args.name,
                    email: args.email,
                    role: args.role,
                };
                let items = mutate(invitations, invitations.invite(&payload)).await?;
                success(format!("invited {} as {}", payload.email, payload.role));
                render(&ListArgs::default(), &items)
            }
        }
    })
}

fn render(args: &ListArgs, items: &[OrganizationInvite]) -> Result<()> {
    let matched = args.filter(
        items,
        &[
            |i: &OrganizationInvite| Some(i.name.clone()),
            |i: &OrganizationInvite| Some(i.email.clone()),
            |i: &OrganizationInvite| Some(i.role.clone()),
        ],
    );
    if args.json {
        return print_json(&matched);
    }
    print_table(
        "invitations",
        matched.into_iter().map(InviteRow::from).collect(),
        "No invitations found.",
    );
    Ok(())
}

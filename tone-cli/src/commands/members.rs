//! `tone members list|set-role`

use anyhow::{bail, Result};
use clap::{Args, Subcommand};
use tabled::Tabled;

use tone_core::format::format_epoch_date;
use tone_core::{OrganizationMember, Role, RoleUpdate};

use super::{authenticated, block_on, load, mutate, print_json, print_table, success, ListArgs};

const ROUTE: &str = "/settings";

#[derive(Subcommand, Debug)]
pub enum MembersCommand {
    /// List members of the active organization.
    List(ListArgs),

    /// Change a member's role (owners and admins only).
    SetRole(SetRoleArgs),
}

#[derive(Args, Debug)]
pub struct SetRoleArgs {
    /// Member id as shown by `tone members list`.
    pub member_id: i64,

    /// owner | admin | member | viewer
    pub role: Role,
}

#[derive(Tabled)]
struct MemberRow {
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
    #[tabled(rename = "joined")]
    joined: String,
}

impl From<&OrganizationMember> for MemberRow {
    fn from(member: &OrganizationMember) -> Self {
        Self {
            id: member.member_id,
            name: member.display_name(),
            email: member.email.clone(),
            role: member.role.clone(),
            status: member.status.clone(),
            joined: format_epoch_date(member.joined_at),
        }
    }
}

pub fn run(command: MembersCommand) -> Result<()> {
    let ctx = authenticated(ROUTE)?;
    let members = ctx.store.members();

    match command {
        MembersCommand::List(args) => block_on(async move {
            let items = load(members).await?;
            render(&args, &items)
        }),
        MembersCommand::SetRole(args) => {
            let me = ctx.session.current_user();
            if let Some(role) = me.role.filter(|role| !role.can_manage_members()) {
                bail!("your role in this organization ({role}) cannot change member roles");
            }
            block_on(async move {
                let update = RoleUpdate {
                    member_id: args.member_id,
                    role: args.role,
                };
                let items = mutate(members, members.update_role(update)).await?;
                success(format!("member {} is now {}", args.member_id, args.role));
                render(&ListArgs::default(), &items)
            })
        }
    }
}

fn render(args: &ListArgs, items: &[OrganizationMember]) -> Result<()> {
    let matched = args.filter(
        items,
        &[
            |m: &OrganizationMember| Some(m.display_name()),
            |m: &OrganizationMember| Some(m.email.clone()),
            |m: &OrganizationMember| Some(m.role.clone()),
        ],
    );
    if args.json {
        return print_json(&matched);
    }
    print_table(
        "members",
        matched.into_iter().map(MemberRow::from).collect(),
        "No members found.",
    );
    Ok(())
}

//! `tone whoami`

use anyhow::Result;
use clap::Args;
use colored::Colorize;
use serde::Serialize;

use tone_core::format::{format_display_name, initials};

use super::{authenticated, or_dash, print_json};

#[derive(Args, Debug)]
pub struct WhoamiArgs {
    /// Emit machine-readable JSON.
    #[arg(long)]
    pub json: bool,
}

#[derive(Serialize)]
struct WhoamiJson {
    id: String,
    name: String,
    email: String,
    username: String,
    organization: Option<String>,
    tenant_id: Option<i64>,
    role: Option<String>,
    organizations: usize,
}

impl WhoamiArgs {
    pub fn run(self) -> Result<()> {
        let ctx = authenticated("/")?;
        let user = ctx.session.current_user();
        let name = format_display_name(
            Some(user.first_name.as_str()),
            Some(user.last_name.as_str()),
            if user.email.is_empty() {
                user.username.as_str()
            } else {
                user.email.as_str()
            },
        );
        let role = user
            .role
            .map(|r| r.to_string())
            .or_else(|| user.organization.as_ref().map(|o| o.role.clone()));

        if self.json {
            return print_json(&WhoamiJson {
                id: user.id,
                name,
                email: user.email,
                username: user.username,
                organization: user.organization.map(|o| o.name),
                tenant_id: ctx.session.tenant_id,
                role,
                organizations: ctx.session.organizations.len(),
            });
        }

        println!("{} {}", format!("[{}]", initials(&name)).cyan().bold(), name.bold());
        println!("  email         {}", or_dash(Some(&user.email)));
        println!("  username      {}", or_dash(Some(&user.username)));
        println!(
            "  organization  {}",
            or_dash(user.organization.as_ref().map(|o| o.name.as_str()))
        );
        println!("  role          {}", or_dash(role.as_deref()));
        Ok(())
    }
}

//! `tone login`

use std::io::{self, BufRead, Write};

use anyhow::{bail, Context as _, Result};
use clap::Args;

use tone_client::{login_at, Credentials};

use super::{block_on, config, home, success};

const PASSWORD_ENV: &str = "TONE_PASSWORD";

#[derive(Args, Debug)]
pub struct LoginArgs {
    #[arg(long)]
    pub email: String,

    /// Falls back to $TONE_PASSWORD, then a line read from stdin.
    #[arg(long)]
    pub password: Option<String>,
}

impl LoginArgs {
    pub fn run(self) -> Result<()> {
        let home = home()?;
        let config = config(&home)?;
        let credentials = Credentials {
            email: self.email.trim().to_string(),
            password: resolve_password(self.password)?,
        };

        let session = block_on(async {
            login_at(&home, &config, &credentials)
                .await
                .with_context(|| format!("login failed for {}", credentials.email))
        })?;
        let user = session.current_user();
        match user.organization {
            Some(org) => success(format!(
                "logged in as {} ({} in {})",
                user.email,
                user.role.map_or_else(|| org.role.clone(), |r| r.to_string()),
                org.name
            )),
            None => success(format!("logged in as {}", user.email)),
        }
        Ok(())
    }
}

fn resolve_password(flag: Option<String>) -> Result<String> {
    if let Some(password) = flag.or_else(|| std::env::var(PASSWORD_ENV).ok()) {
        return Ok(password);
    }
    eprint!("password: ");
    io::stderr().flush().ok();
    let mut line = String::new();
    io::stdin()
        .lock()
        .read_line(&mut line)
        .context("failed to read password from stdin")?;
    let password = line.trim_end_matches(['\r', '\n']).to_string();
    if password.is_empty() {
        bail!("no password given (use --password, ${PASSWORD_ENV} or stdin)");
    }
    Ok(password)
}

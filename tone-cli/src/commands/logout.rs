//! `tone logout`

use anyhow::{Context as _, Result};

use tone_client::logout_at;

use super::{home, success};

pub fn run() -> Result<()> {
    let home = home()?;
    if logout_at(&home).context("failed to remove stored session")? {
        success("logged out");
    } else {
        println!("not logged in");
    }
    Ok(())
}

//! `tone phone-numbers`

use anyhow::Result;
use clap::Args;
use tabled::Tabled;

use tone_core::TwilioPhoneNumber;
use tone_sync::DEFAULT_PHONE_PROVIDER;

use super::{authenticated, block_on, fetch_failure, or_dash, print_json, print_table};

const ROUTE: &str = "/agents";

#[derive(Args, Debug)]
pub struct PhoneNumbersArgs {
    /// Telephony provider to query.
    #[arg(long, default_value = DEFAULT_PHONE_PROVIDER)]
    pub provider: String,

    /// Emit machine-readable JSON.
    #[arg(long)]
    pub json: bool,
}

#[derive(Tabled)]
struct NumberRow {
    #[tabled(rename = "number")]
    phone_number: String,
    #[tabled(rename = "name")]
    friendly_name: String,
    #[tabled(rename = "sid")]
    sid: String,
}

impl From<&TwilioPhoneNumber> for NumberRow {
    fn from(number: &TwilioPhoneNumber) -> Self {
        Self {
            phone_number: number.phone_number.clone(),
            friendly_name: or_dash(number.friendly_name.as_deref()),
            sid: or_dash(number.sid.as_deref()),
        }
    }
}

impl PhoneNumbersArgs {
    pub fn run(self) -> Result<()> {
        let ctx = authenticated(ROUTE)?;
        let store = &ctx.store;
        block_on(async move {
            let numbers = store
                .phone_numbers(&self.provider)
                .await
                .map_err(fetch_failure)?;
            if self.json {
                return print_json(&numbers);
            }
            print_table(
                &format!("{} numbers", self.provider),
                numbers.iter().map(NumberRow::from).collect(),
                "No phone numbers available.",
            );
            Ok(())
        })
    }
}

//! `tone watch <resource>`: print every view transition, refetching on a timer.

use std::future::Future;
use std::time::Duration;

use anyhow::Result;
use clap::Args;
use colored::Colorize;

use tone_core::ResourceKind;
use tone_sync::{AsyncState, Resource};

use super::{authenticated, block_on};

#[derive(Args, Debug)]
pub struct WatchArgs {
    /// agents | channels | providers | members | invitations
    pub resource: ResourceKind,

    /// Seconds between refetches.
    #[arg(long, default_value_t = 30, value_parser = clap::value_parser!(u64).range(1..))]
    pub interval: u64,
}

impl WatchArgs {
    pub fn run(self) -> Result<()> {
        let ctx = authenticated("/watch")?;
        let store = &ctx.store;
        let every = Duration::from_secs(self.interval);

        block_on(async move {
            let stop = async {
                if let Err(err) = tokio::signal::ctrl_c().await {
                    tracing::warn!(error = %err, "cannot listen for ctrl-c");
                    std::future::pending::<()>().await;
                }
            };
            match self.resource {
                ResourceKind::Agents => follow(store.agents(), every, stop).await,
                ResourceKind::Channels => follow(store.channels(), every, stop).await,
                ResourceKind::Providers => follow(store.providers(), every, stop).await,
                ResourceKind::Members => follow(store.members(), every, stop).await,
                ResourceKind::Invitations => follow(store.invitations(), every, stop).await,
            }
        })
    }
}

/// Print transitions until `stop` resolves or the view closes.
async fn follow<T, S>(resource: &Resource<T>, every: Duration, stop: S) -> Result<()>
where
    T: Send + Sync + 'static,
    S: Future<Output = ()>,
{
    tokio::pin!(stop);

    let mut sub = resource.subscribe();
    print_state(resource, &sub.current());

    let mut ticker = tokio::time::interval(every);
    // The first tick fires immediately; the subscription already fetched.
    ticker.tick().await;

    loop {
        tokio::select! {
            changed = sub.changed() => match changed {
                Some(state) => print_state(resource, &state),
                None => break,
            },
            _ = ticker.tick() => {
                resource.refetch();
            }
            _ = &mut stop => break,
        }
    }
    Ok(())
}

fn print_state<T>(resource: &Resource<T>, state: &AsyncState<T>)
where
    T: Send + Sync + 'static,
{
    let label = match state {
        AsyncState::Loading => "loading".yellow(),
        AsyncState::Ready(items) => format!("ready ({} rows)", items.len()).green(),
        AsyncState::Error(err) => format!("error: {err}").red(),
    };
    println!(
        "{} {} {label}",
        resource.kind().to_string().bold(),
        format!("#{}", resource.refresh_token()).bright_black(),
    );
}

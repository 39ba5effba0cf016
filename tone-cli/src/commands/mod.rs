//! Subcommand implementations and the plumbing they share: the session gate,
//! the async runtime, settling a view, and table/JSON output.

pub mod agents;
pub mod channels;
pub mod invitations;
pub mod login;
pub mod logout;
pub mod members;
pub mod phone_numbers;
pub mod providers;
pub mod watch;
pub mod whoami;

use std::future::Future;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{anyhow, bail, Context as _, Result};
use clap::Args;
use colored::Colorize;
use serde::Serialize;
use tabled::{settings::Style, Table, Tabled};

use tone_client::{Config, HttpTransport};
use tone_core::filter::filter_by_fields;
use tone_core::{session, FetchError, RemoteWriteError, Session};
use tone_sync::{AsyncState, GateDecision, Resource, SessionGate, Store, ViewSubscription};

const LOGIN_HINT: &str = "run `tone login --email <email>` first";

/// Everything an authenticated command needs.
pub struct Context {
    pub session: Session,
    pub store: Store,
}

pub(crate) fn home() -> Result<PathBuf> {
    dirs::home_dir().context("could not determine home directory")
}

pub(crate) fn config(home: &std::path::Path) -> Result<Config> {
    Config::resolve_at(home, |var| std::env::var(var).ok())
        .context("failed to load tone configuration")
}

/// Pass the session gate for `route`, then wire a store to the backend.
pub(crate) fn authenticated(route: &str) -> Result<Context> {
    let home = home()?;
    let stored = session::load_at(&home).context("failed to read stored session")?;

    let mut gate = SessionGate::new(stored);
    if let GateDecision::Redirect { location } = gate.guard(route) {
        tracing::debug!(route, %location, "session gate redirected");
        bail!("not logged in — {LOGIN_HINT}");
    }
    let session = gate
        .into_source()
        .ok_or_else(|| anyhow!("not logged in — {LOGIN_HINT}"))?;

    let transport = HttpTransport::for_session(config(&home)?, &session);
    Ok(Context {
        session,
        store: Store::new(Arc::new(transport)),
    })
}

pub(crate) fn runtime() -> Result<tokio::runtime::Runtime> {
    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("failed to start async runtime")
}

pub(crate) fn block_on<T, F: Future<Output = Result<T>>>(future: F) -> Result<T> {
    runtime()?.block_on(future)
}

// ---------------------------------------------------------------------------
// Views
// ---------------------------------------------------------------------------

/// Wait for the subscription to leave `Loading`.
pub(crate) async fn settle<T>(sub: &mut ViewSubscription<T>) -> Result<Arc<[T]>> {
    match sub.settled().await {
        AsyncState::Ready(items) => Ok(items),
        AsyncState::Error(err) => Err(fetch_failure(err)),
        AsyncState::Loading => bail!("view closed before it settled"),
    }
}

/// Subscribe to `resource` and return its first settled list.
pub(crate) async fn load<T>(resource: &Resource<T>) -> Result<Arc<[T]>>
where
    T: Send + Sync + 'static,
{
    let mut sub = resource.subscribe();
    settle(&mut sub).await
}

/// Run a mutation, then load the refreshed list.
pub(crate) async fn mutate<T, Fut>(resource: &Resource<T>, write: Fut) -> Result<Arc<[T]>>
where
    T: Send + Sync + 'static,
    Fut: Future<Output = Result<(), RemoteWriteError>>,
{
    write.await.map_err(write_failure)?;
    load(resource).await
}

pub(crate) fn fetch_failure(err: FetchError) -> anyhow::Error {
    let expired = matches!(&err, FetchError::Api { source, .. } if source.is_session_expired());
    let err = anyhow::Error::new(err);
    if expired {
        err.context(format!("session expired — {LOGIN_HINT}"))
    } else {
        err
    }
}

pub(crate) fn write_failure(err: RemoteWriteError) -> anyhow::Error {
    let expired = err.source.is_session_expired();
    let err = anyhow::Error::new(err);
    if expired {
        err.context(format!("session expired — {LOGIN_HINT}"))
    } else {
        err
    }
}

// ---------------------------------------------------------------------------
// Output
// ---------------------------------------------------------------------------

/// `--search` / `--json`, shared by every list command.
#[derive(Args, Debug, Clone, Default)]
pub struct ListArgs {
    /// Case-insensitive substring filter over the listed text columns.
    #[arg(long, short = 's')]
    pub search: Option<String>,

    /// Emit machine-readable JSON.
    #[arg(long)]
    pub json: bool,
}

impl ListArgs {
    pub fn filter<'a, T>(
        &self,
        items: &'a [T],
        selectors: &[fn(&T) -> Option<String>],
    ) -> Vec<&'a T> {
        filter_by_fields(items, self.search.as_deref().unwrap_or(""), selectors)
    }
}

pub(crate) fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!(
        "{}",
        serde_json::to_string_pretty(value).context("failed to serialize JSON output")?
    );
    Ok(())
}

pub(crate) fn print_table<R: Tabled>(title: &str, rows: Vec<R>, empty: &str) {
    if rows.is_empty() {
        println!("{empty}");
        return;
    }
    println!("{} ({})", title.to_uppercase().bold(), rows.len());
    let mut table = Table::new(rows);
    table.with(Style::rounded());
    println!("{table}");
}

pub(crate) fn success(message: impl std::fmt::Display) {
    println!("{} {message}", "✓".green().bold());
}

/// `""` and `None` both render as a dash.
pub(crate) fn or_dash<S: AsRef<str>>(value: Option<S>) -> String {
    match value.as_ref().map(|v| v.as_ref().trim()) {
        Some(v) if !v.is_empty() => v.to_string(),
        _ => "-".to_string(),
    }
}

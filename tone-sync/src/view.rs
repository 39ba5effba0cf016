//! Derived async views.
//!
//! A view re-runs its fetcher once per refresh token and publishes the result
//! as an [`AsyncState`] on a `watch` channel.
//!
//! # Ordering
//!
//! Fetches are never cancelled, so several may be in flight at once. Each
//! fetch captures a request epoch when issued; its result is applied only if
//! that epoch is still the newest one. The epoch bump (with the switch to
//! `Loading`) and the epoch check (with the write of the result) both run
//! inside the channel's write lock, so a slow, older fetch can never
//! overwrite a newer `Loading` or a newer result.
//!
//! # Lifecycle
//!
//! The first subscriber starts a fetch. Refreshes are ignored while nobody is
//! subscribed, and a subscriber arriving after the last one left starts over
//! from `Loading` instead of seeing the old snapshot.
//!
//! Fetches run on the runtime the view was last subscribed from, so a counter
//! may be incremented from any thread, inside a runtime or not.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError, Weak};

use tokio::runtime::Handle;
use tokio::sync::watch;

use tone_core::ResourceKind;

use crate::counter::{RefreshCounter, RefreshListener};
use crate::fetcher::Fetcher;
use crate::state::AsyncState;

/// A subscribable, self-refreshing list of `T`.
pub struct AsyncView<T> {
    shared: Arc<ViewShared<T>>,
}

impl<T> Clone for AsyncView<T> {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
        }
    }
}

struct ViewShared<T> {
    resource: ResourceKind,
    counter: Arc<RefreshCounter>,
    fetcher: Arc<dyn Fetcher<T>>,
    state: watch::Sender<AsyncState<T>>,
    epoch: AtomicU64,
    runtime: Mutex<Option<Handle>>,
    subscribe_lock: Mutex<()>,
}

impl<T> AsyncView<T>
where
    T: Send + Sync + 'static,
{
    /// Build a view over `fetcher` that re-fetches whenever `counter` advances.
    pub fn new(counter: Arc<RefreshCounter>, fetcher: Arc<dyn Fetcher<T>>) -> Self {
        let (state, _) = watch::channel(AsyncState::Loading);
        let shared = Arc::new(ViewShared {
            resource: counter.resource(),
            counter: Arc::clone(&counter),
            fetcher,
            state,
            epoch: AtomicU64::new(0),
            runtime: Mutex::new(None),
            subscribe_lock: Mutex::new(()),
        });
        counter.register(Arc::downgrade(&shared) as Weak<dyn RefreshListener>);
        Self { shared }
    }

    pub fn resource(&self) -> ResourceKind {
        self.shared.resource
    }

    /// Subscribe to state changes. The first live subscriber issues a fetch.
    ///
    /// # Panics
    ///
    /// Must be called from within a tokio runtime. Later fetches are spawned
    /// on that runtime.
    pub fn subscribe(&self) -> ViewSubscription<T> {
        let _guard = self
            .shared
            .subscribe_lock
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        *self
            .shared
            .runtime
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = Some(Handle::current());
        let first = self.shared.state.receiver_count() == 0;
        let rx = self.shared.state.subscribe();
        if first {
            tracing::debug!(resource = %self.shared.resource, "first subscriber, starting view");
            self.shared.issue(None);
        }
        ViewSubscription { rx }
    }

    /// Number of live subscriptions.
    pub fn subscriber_count(&self) -> usize {
        self.shared.state.receiver_count()
    }

    /// Epoch of the most recently issued fetch.
    pub fn epoch(&self) -> u64 {
        self.shared.epoch.load(Ordering::SeqCst)
    }

    pub fn refresh_token(&self) -> u64 {
        self.shared.counter.value()
    }
}

impl<T> ViewShared<T>
where
    T: Send + Sync + 'static,
{
    /// Switch to `Loading` under a fresh epoch and spawn the fetch for it.
    fn issue(self: &Arc<Self>, token: Option<u64>) {
        let Some(runtime) = self.runtime() else {
            tracing::warn!(resource = %self.resource, token = ?token, "no runtime to fetch on");
            return;
        };

        let mut epoch = 0;
        self.state.send_modify(|state| {
            epoch = self.epoch.fetch_add(1, Ordering::SeqCst) + 1;
            *state = AsyncState::Loading;
        });
        tracing::debug!(resource = %self.resource, epoch, token = ?token, "fetch issued");

        let shared = Arc::clone(self);
        runtime.spawn(async move {
            let outcome = shared.fetcher.fetch().await;
            shared.settle(epoch, outcome.into());
        });
    }

    /// The subscriber's runtime, else the one the caller is running on.
    fn runtime(&self) -> Option<Handle> {
        self.runtime
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
            .or_else(|| Handle::try_current().ok())
    }

    /// Publish `next` if `epoch` is still current; otherwise drop it.
    fn settle(&self, epoch: u64, next: AsyncState<T>) {
        let label = next.label();
        let applied = self.state.send_if_modified(|state| {
            if self.epoch.load(Ordering::SeqCst) != epoch {
                return false;
            }
            *state = next;
            true
        });

        if applied {
            tracing::debug!(resource = %self.resource, epoch, state = label, "view settled");
        } else {
            tracing::debug!(resource = %self.resource, epoch, "discarding stale fetch result");
        }
    }
}

impl<T> RefreshListener for ViewShared<T>
where
    T: Send + Sync + 'static,
{
    fn on_refresh(self: Arc<Self>, token: u64) {
        if self.state.receiver_count() == 0 {
            tracing::trace!(resource = %self.resource, token, "refresh with no subscribers");
            return;
        }
        self.issue(Some(token));
    }
}

/// A live subscription to an [`AsyncView`]. Dropping the last one puts the
/// view to sleep.
pub struct ViewSubscription<T> {
    rx: watch::Receiver<AsyncState<T>>,
}

impl<T> ViewSubscription<T> {
    /// The state right now.
    pub fn current(&self) -> AsyncState<T> {
        self.rx.borrow().clone()
    }

    /// Wait for the next state change. `None` once the view is gone.
    ///
    /// The returned tag is exact when read, but changes that land close
    /// together are merged, so a slow caller may never see a short `Loading`.
    pub async fn changed(&mut self) -> Option<AsyncState<T>> {
        self.rx.changed().await.ok()?;
        Some(self.rx.borrow_and_update().clone())
    }

    /// Wait until the view is `Ready` or `Error`.
    pub async fn settled(&mut self) -> AsyncState<T> {
        let settled = self
            .rx
            .wait_for(|state| !state.is_loading())
            .await
            .map(|state| state.clone());
        settled.unwrap_or_else(|_| self.rx.borrow().clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    use async_trait::async_trait;
    use tokio::sync::oneshot;
    use tokio_test::{assert_pending, task};
    use tone_core::{ApiError, FetchError};

    type Outcome = Result<Vec<u32>, FetchError>;

    /// Fetcher whose calls block until the test releases them by index.
    #[derive(Default)]
    struct Gated {
        pending: std::sync::Mutex<Vec<Option<oneshot::Sender<Outcome>>>>,
        calls: AtomicUsize,
        completed: AtomicUsize,
    }

    impl Gated {
        fn release(&self, call: usize, outcome: Outcome) {
            let tx = self.pending.lock().unwrap()[call].take().expect("released twice");
            let _ = tx.send(outcome);
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }

        fn completed(&self) -> usize {
            self.completed.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl Fetcher<u32> for Gated {
        async fn fetch(&self) -> Outcome {
            let (tx, rx) = oneshot::channel();
            self.pending.lock().unwrap().push(Some(tx));
            self.calls.fetch_add(1, Ordering::SeqCst);
            let outcome = rx.await.unwrap_or_else(|_| Ok(Vec::new()));
            self.completed.fetch_add(1, Ordering::SeqCst);
            outcome
        }
    }

    fn setup() -> (Arc<RefreshCounter>, Arc<Gated>, AsyncView<u32>) {
        let counter = Arc::new(RefreshCounter::new(ResourceKind::Channels));
        let gated = Arc::new(Gated::default());
        let view = AsyncView::new(Arc::clone(&counter), Arc::clone(&gated) as Arc<dyn Fetcher<u32>>);
        (counter, gated, view)
    }

    async fn wait_until(cond: impl Fn() -> bool) {
        for _ in 0..1000 {
            if cond() {
                return;
            }
            tokio::task::yield_now().await;
        }
        panic!("condition never became true");
    }

    // ─── lifecycle ─────────────────────────────────────────────────────────────

    #[tokio::test]
    async fn first_subscriber_starts_a_fetch() {
        let (_counter, gated, view) = setup();
        let mut sub = view.subscribe();
        assert!(sub.current().is_loading());

        wait_until(|| gated.calls() == 1).await;
        gated.release(0, Ok(vec![7, 8]));
        assert_eq!(sub.settled().await.data(), Some(&[7, 8][..]));
    }

    #[tokio::test]
    async fn second_subscriber_shares_the_running_fetch() {
        let (_counter, gated, view) = setup();
        let _a = view.subscribe();
        let _b = view.subscribe();
        wait_until(|| gated.calls() == 1).await;
        tokio::task::yield_now().await;
        assert_eq!(gated.calls(), 1);
        assert_eq!(view.subscriber_count(), 2);
    }

    #[tokio::test]
    async fn refresh_without_subscribers_is_ignored() {
        let (counter, gated, view) = setup();
        counter.increment();
        counter.increment();
        tokio::task::yield_now().await;
        assert_eq!(gated.calls(), 0);
        assert_eq!(view.epoch(), 0);
    }

    #[tokio::test]
    async fn resubscribing_starts_from_loading() {
        let (counter, gated, view) = setup();
        let mut sub = view.subscribe();
        wait_until(|| gated.calls() == 1).await;
        gated.release(0, Ok(vec![1]));
        assert!(sub.settled().await.is_ready());
        drop(sub);

        counter.increment();
        assert_eq!(gated.calls(), 1);

        let sub = view.subscribe();
        assert!(sub.current().is_loading());
        wait_until(|| gated.calls() == 2).await;
    }

    // ─── refresh ───────────────────────────────────────────────────────────────

    #[tokio::test]
    async fn increment_flips_to_loading_immediately() {
        let (counter, gated, view) = setup();
        let mut sub = view.subscribe();
        wait_until(|| gated.calls() == 1).await;
        gated.release(0, Ok(vec![1]));
        assert!(sub.settled().await.is_ready());

        counter.increment();
        assert!(sub.current().is_loading());
        {
            let mut settled = task::spawn(sub.settled());
            assert_pending!(settled.poll());
        }

        wait_until(|| gated.calls() == 2).await;
        gated.release(1, Ok(vec![1, 2]));
        assert_eq!(sub.settled().await.data(), Some(&[1, 2][..]));
    }

    #[tokio::test]
    async fn increment_from_a_plain_thread_still_refetches() {
        let (counter, gated, view) = setup();
        let mut sub = view.subscribe();
        wait_until(|| gated.calls() == 1).await;
        gated.release(0, Ok(vec![1]));
        assert!(sub.settled().await.is_ready());

        let remote = Arc::clone(&counter);
        let token = std::thread::spawn(move || remote.increment())
            .join()
            .expect("increment off the runtime");
        assert_eq!(token, 1);
        assert!(sub.current().is_loading());

        wait_until(|| gated.calls() == 2).await;
        gated.release(1, Ok(vec![1, 2]));
        assert_eq!(sub.settled().await.data(), Some(&[1, 2][..]));
    }

    #[tokio::test]
    async fn every_increment_issues_its_own_fetch() {
        let (counter, gated, view) = setup();
        let _sub = view.subscribe();
        wait_until(|| gated.calls() == 1).await;
        counter.increment();
        counter.increment();
        wait_until(|| gated.calls() == 3).await;
        assert_eq!(view.epoch(), 3);
    }

    #[tokio::test]
    async fn fetch_failure_becomes_error_state() {
        let (_counter, gated, view) = setup();
        let mut sub = view.subscribe();
        wait_until(|| gated.calls() == 1).await;
        gated.release(
            0,
            Err(FetchError::Api {
                resource: ResourceKind::Channels,
                source: ApiError::Network("connection refused".into()),
            }),
        );
        let state = sub.settled().await;
        assert_eq!(state.error().map(FetchError::resource), Some(ResourceKind::Channels));
    }

    // ─── ordering ──────────────────────────────────────────────────────────────

    #[tokio::test]
    async fn older_fetch_finishing_last_is_discarded() {
        let (counter, gated, view) = setup();
        let mut sub = view.subscribe();
        wait_until(|| gated.calls() == 1).await;
        counter.increment();
        wait_until(|| gated.calls() == 2).await;

        gated.release(1, Ok(vec![2]));
        assert_eq!(sub.settled().await.data(), Some(&[2][..]));

        gated.release(0, Ok(vec![1]));
        wait_until(|| gated.completed() == 2).await;
        assert_eq!(sub.current().data(), Some(&[2][..]));
    }

    #[tokio::test]
    async fn older_fetch_cannot_end_a_newer_loading() {
        let (counter, gated, view) = setup();
        let sub = view.subscribe();
        wait_until(|| gated.calls() == 1).await;
        counter.increment();
        wait_until(|| gated.calls() == 2).await;

        gated.release(0, Ok(vec![1]));
        wait_until(|| gated.completed() == 1).await;
        assert!(sub.current().is_loading());
    }
}

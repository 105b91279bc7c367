use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

struct Pending {
    token: CancellationToken,
    handle: JoinHandle<()>,
}

/// Deferred action with last-write-wins coalescing
///
/// Holds at most one pending action. [`CoalescingTimer::trigger`] cancels
/// whatever is pending and schedules `value` to be delivered on the channel
/// returned by [`CoalescingTimer::new`] once `delay` has elapsed. Intermediate
/// triggers are dropped, not queued.
pub struct CoalescingTimer<T> {
    delay: Duration,
    tx: mpsc::UnboundedSender<T>,
    pending: Option<Pending>,
    generation: Arc<AtomicU64>,
}

impl<T: Send + 'static> CoalescingTimer<T> {
    pub fn new(delay: Duration) -> (Self, mpsc::UnboundedReceiver<T>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let timer = Self { delay, tx, pending: None, generation: Arc::new(AtomicU64::new(0)) };
        (timer, rx)
    }

    /// Cancel any pending action and schedule `value` after the delay
    ///
    /// Outside a tokio runtime there is nothing to defer onto, so the value
    /// is delivered immediately.
    pub fn trigger(&mut self, value: T) {
        self.cancel();
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;

        let Ok(runtime) = Handle::try_current() else {
            tracing::debug!("no runtime available, delivering coalesced value immediately");
            let _ = self.tx.send(value);
            return;
        };

        let token = CancellationToken::new();
        let cancelled = token.clone();
        let tx = self.tx.clone();
        let current = Arc::clone(&self.generation);
        let delay = self.delay;

        let handle = runtime.spawn(async move {
            tokio::select! {
                _ = cancelled.cancelled() => {}
                _ = tokio::time::sleep(delay) => {
                    if current.load(Ordering::SeqCst) == generation {
                        let _ = tx.send(value);
                    }
                }
            }
        });

        self.pending = Some(Pending { token, handle });
    }

    /// Drop the pending action, if any
    ///
    /// The generation moves on as well, so a task already past its sleep
    /// does not deliver.
    pub fn cancel(&mut self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
        if let Some(pending) = self.pending.take() {
            pending.token.cancel();
        }
    }

    /// Whether an action is scheduled and has not fired yet
    pub fn is_pending(&self) -> bool {
        self.pending
            .as_ref()
            .is_some_and(|pending| !pending.token.is_cancelled() && !pending.handle.is_finished())
    }
}

impl<T> Drop for CoalescingTimer<T> {
    fn drop(&mut self) {
        if let Some(pending) = self.pending.take() {
            pending.token.cancel();
        }
    }
}

impl<T> std::fmt::Debug for CoalescingTimer<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CoalescingTimer")
            .field("delay", &self.delay)
            .field("pending", &self.pending.is_some())
            .field("generation", &self.generation.load(Ordering::SeqCst))
            .finish()
    }
}

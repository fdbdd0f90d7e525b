//! Fixed-delay pacing for sequential outbound calls.
//!
//! Both upstream APIs cap requests per second. Calls within one resolution or
//! collection pass are issued one at a time, each preceded by a fixed sleep.

use std::future::Future;
use std::time::Duration;

use tokio::time::sleep;
use tracing::trace;

/// Default delay before each outbound call.
pub const DEFAULT_REQUEST_DELAY: Duration = Duration::from_millis(250);

/// Issues calls sequentially with a fixed delay before each one.
#[derive(Debug, Clone, Copy)]
pub struct Pacer {
    delay: Duration,
}

impl Default for Pacer {
    fn default() -> Self {
        Self::new(DEFAULT_REQUEST_DELAY)
    }
}

impl Pacer {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }

    pub fn from_millis(delay_ms: u64) -> Self {
        Self::new(Duration::from_millis(delay_ms))
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Sleep for the configured delay.
    pub async fn wait(&self) {
        if !self.delay.is_zero() {
            trace!("Pacing outbound call: waiting {:?}", self.delay);
            sleep(self.delay).await;
        }
    }

    /// Run `call` once per item, in order, waiting before every call.
    ///
    /// Returns one result per item in input order. A failed item does not stop
    /// the remaining ones.
    pub async fn run<I, T, O, E, F, Fut>(&self, items: I, mut call: F) -> Vec<Result<O, E>>
    where
        I: IntoIterator<Item = T>,
        F: FnMut(T) -> Fut,
        Fut: Future<Output = Result<O, E>>,
    {
        let items = items.into_iter();
        let mut results = Vec::with_capacity(items.size_hint().0);
        for item in items {
            self.wait().await;
            results.push(call(item).await);
        }
        results
    }
}

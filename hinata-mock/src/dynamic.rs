use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use hinata_core::{AssetClass, FetchCause, FetchError, FetchRequest, Fetcher, RawPayload, Timeframe};

use crate::{SUPPORTED_TIMEFRAMES, check_request};

/// Instruction for how `fetch` should behave for a symbol.
#[derive(Debug, Clone)]
pub enum MockBehavior {
    /// Return the payload (its symbol is replaced by the requested one).
    Return(RawPayload),
    /// Fail with this cause.
    Fail(FetchCause),
    /// Fail with `first` for the next `times` calls, then follow `then`.
    FailTimes {
        /// Cause of the scripted failures.
        first: FetchCause,
        /// How many calls fail.
        times: usize,
        /// Behavior afterwards.
        then: Box<MockBehavior>,
    },
    /// Never complete.
    Hang,
}

#[derive(Default)]
struct InternalState {
    rules: HashMap<String, MockBehavior>,
    requests: Vec<FetchRequest>,
}

/// Controller handle used by tests to drive the dynamic mock from the outside.
pub struct DynamicMockController {
    state: Arc<Mutex<InternalState>>,
}

impl DynamicMockController {
    /// Set the behavior for `fetch` calls for a symbol.
    pub async fn set_behavior(&self, symbol: impl Into<String>, behavior: MockBehavior) {
        self.state.lock().await.rules.insert(symbol.into(), behavior);
    }

    /// Every request received so far, in order.
    pub async fn requests(&self) -> Vec<FetchRequest> {
        self.state.lock().await.requests.clone()
    }

    /// Number of requests received for `symbol`.
    pub async fn calls_for(&self, symbol: &str) -> usize {
        self.state
            .lock()
            .await
            .requests
            .iter()
            .filter(|r| r.symbol == symbol)
            .count()
    }

    /// Clear all configured behaviors and the request log.
    pub async fn clear_all(&self) {
        let mut guard = self.state.lock().await;
        guard.rules.clear();
        guard.requests.clear();
    }
}

/// A fetcher that defers all behavior to an external controller.
///
/// Symbols without a rule fail with `NotFound`.
pub struct DynamicMockFetcher {
    state: Arc<Mutex<InternalState>>,
}

impl DynamicMockFetcher {
    /// Create a new dynamic mock fetcher and its controller.
    #[must_use]
    pub fn new_with_controller() -> (Arc<dyn Fetcher>, DynamicMockController) {
        let state = Arc::new(Mutex::new(InternalState::default()));
        let controller = DynamicMockController {
            state: Arc::clone(&state),
        };
        (Arc::new(Self { state }) as Arc<dyn Fetcher>, controller)
    }
}

#[async_trait]
impl Fetcher for DynamicMockFetcher {
    fn name(&self) -> &'static str {
        "hinata-mock-dynamic"
    }

    fn supported_timeframes(&self, _asset_class: AssetClass) -> &'static [Timeframe] {
        SUPPORTED_TIMEFRAMES
    }

    async fn fetch(&self, req: &FetchRequest) -> Result<RawPayload, FetchError> {
        // Resolve the behavior without holding the lock across the response.
        let behavior = {
            let mut guard = self.state.lock().await;
            guard.requests.push(req.clone());
            match guard.rules.get_mut(&req.symbol) {
                Some(MockBehavior::FailTimes { first, times, then }) => {
                    if *times == 0 {
                        let next = (**then).clone();
                        guard.rules.insert(req.symbol.clone(), next.clone());
                        Some(next)
                    } else {
                        *times -= 1;
                        Some(MockBehavior::Fail(first.clone()))
                    }
                }
                other => other.cloned(),
            }
        };
        check_request(req)?;

        match behavior {
            Some(MockBehavior::Return(mut payload)) => {
                payload.symbol.clone_from(&req.symbol);
                Ok(payload)
            }
            Some(MockBehavior::Fail(cause)) => Err(FetchError::new(req.key(), cause)),
            Some(MockBehavior::Hang) => std::future::pending().await,
            Some(MockBehavior::FailTimes { .. }) | None => Err(FetchError::not_found(req.key())),
        }
    }
}

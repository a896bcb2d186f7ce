//! One-time initialization of the chain client runtime.
//!
//! Gateway implementations typically carry a process-wide bootstrap step
//! (runtime metadata download, WASM engine warm-up) that must run exactly
//! once. This is modelled as explicit init-once state rather than an
//! ad-hoc flag: concurrent callers coalesce onto one in-flight init, a
//! failed init can be retried, and a completed init is never repeated.

use std::future::Future;
use std::sync::OnceLock;
use tokio::sync::OnceCell;

/// Init-once cell for a runtime bootstrap step.
#[derive(Default)]
pub struct RuntimeBootstrap {
    ready: OnceCell<()>,
}

impl RuntimeBootstrap {
    pub fn new() -> Self {
        Self {
            ready: OnceCell::new(),
        }
    }

    /// Run `init` unless a previous call already completed it.
    ///
    /// Concurrent callers wait for the single in-flight attempt. If the
    /// attempt fails the cell stays empty and the next call retries.
    pub async fn ensure_initialized<F, Fut, E>(&self, init: F) -> Result<(), E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<(), E>>,
    {
        self.ready
            .get_or_try_init(|| async {
                tracing::debug!("running chain runtime bootstrap");
                init().await
            })
            .await
            .map(|_| ())
    }

    pub fn is_initialized(&self) -> bool {
        self.ready.initialized()
    }
}

/// Process-wide bootstrap instance for embedders that share one chain
/// client per process.
pub fn global() -> &'static RuntimeBootstrap {
    static GLOBAL: OnceLock<RuntimeBootstrap> = OnceLock::new();
    GLOBAL.get_or_init(RuntimeBootstrap::new)
}

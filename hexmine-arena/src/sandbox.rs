//! Isolated decision calls
//!
//! Each call runs on its own worker thread, which takes ownership of the
//! provider and hands it back along with the answer. The driver waits no
//! longer than the budget. A worker that misses the deadline is abandoned
//! together with its provider; its eventual answer is discarded. Panics are
//! caught and reported as faults.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::mpsc::{self, RecvTimeoutError};
use std::thread;
use std::time::{Duration, Instant};

/// Why a decision call produced no usable answer
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProviderError {
    #[error("timed out after {budget:?}")]
    Timeout { budget: Duration },

    #[error("crashed: {0}")]
    Fault(String),
}

/// A successful call and how long it took
#[derive(Debug)]
pub struct Answer<P, T> {
    pub provider: P,
    pub value: T,
    pub elapsed: Duration,
}

/// Run `call` against `provider` on a worker thread with a hard deadline.
///
/// Threads cannot be killed, so on timeout the worker is detached rather than
/// stopped: it keeps its CPU until `call` returns on its own, and its answer
/// is dropped. Providers that may run long should bound their own work (for
/// example a shallower search depth) to stay inside the budget.
pub fn run_sandboxed<P, T, F>(provider: P, budget: Duration, call: F) -> Result<Answer<P, T>, ProviderError>
where
    P: Send + 'static,
    T: Send + 'static,
    F: FnOnce(&mut P) -> anyhow::Result<T> + Send + 'static,
{
    let (tx, rx) = mpsc::channel();
    let start = Instant::now();

    thread::Builder::new()
        .name("hexmine-provider".to_string())
        .spawn(move || {
            let mut provider = provider;
            let result = panic::catch_unwind(AssertUnwindSafe(|| call(&mut provider)));
            // the driver may have stopped listening
            let _ = tx.send((provider, result));
        })
        .map_err(|e| ProviderError::Fault(format!("failed to start worker: {}", e)))?;

    match rx.recv_timeout(budget) {
        Ok((provider, Ok(Ok(value)))) => {
            let elapsed = start.elapsed();
            if elapsed > budget {
                return Err(ProviderError::Timeout { budget });
            }
            Ok(Answer {
                provider,
                value,
                elapsed,
            })
        }
        Ok((_, Ok(Err(err)))) => Err(ProviderError::Fault(format!("{:#}", err))),
        Ok((_, Err(payload))) => Err(ProviderError::Fault(panic_message(payload.as_ref()))),
        Err(RecvTimeoutError::Timeout) => Err(ProviderError::Timeout { budget }),
        Err(RecvTimeoutError::Disconnected) => {
            Err(ProviderError::Fault("worker exited without answering".to_string()))
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        format!("panicked: {}", s)
    } else if let Some(s) = payload.downcast_ref::<String>() {
        format!("panicked: {}", s)
    } else {
        "panicked".to_string()
    }
}

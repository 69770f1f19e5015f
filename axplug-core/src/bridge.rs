//! Engine worker thread and the blocking call bridge.
//!
//! The host-facing `invoke` must return a plain value, but the engine
//! operation is asynchronous and must run on one designated thread
//! (UI-affine accessibility APIs).  [`EngineHandle`] owns that thread:
//! the engine is *constructed on it* and never leaves it, mirroring how
//! per-thread apartment affinity is usually handled.
//!
//! [`EngineHandle::perform`] schedules exactly one job onto the worker and
//! blocks the calling thread on a one-shot channel until the worker signals
//! completion.  The channel's `recv` provides the happens-before edge, so
//! the result is never read before the worker finished writing it.
//!
//! There is deliberately no timeout and no cancellation: if the worker is
//! wedged or an operation never completes, the calling thread waits
//! indefinitely.  This is a known, accepted gap.

use std::sync::mpsc;
use std::thread;

use parking_lot::Mutex;

use crate::engine::{ActionOptions, ActionRequest, ActionResult, AutomationEngine};
use crate::errors::PluginError;

type Job = Box<dyn FnOnce(&mut dyn AutomationEngine) + Send>;

/// Handle to the engine worker thread.
///
/// Cheap to share behind a reference; callable from any thread.  Dropping
/// the handle closes the job queue and joins the worker.
pub struct EngineHandle {
    sender: Mutex<Option<mpsc::Sender<Job>>>,
    worker: Mutex<Option<thread::JoinHandle<()>>>,
}

impl EngineHandle {
    /// Spawn the worker thread and construct the engine on it.
    ///
    /// `factory` runs on the worker thread, so the engine implementation
    /// itself does not need to be `Send`.
    pub fn spawn<F>(factory: F) -> Result<Self, PluginError>
    where
        F: FnOnce() -> Box<dyn AutomationEngine> + Send + 'static,
    {
        let (sender, receiver) = mpsc::channel::<Job>();

        let worker = thread::Builder::new()
            .name("axplug-engine".to_owned())
            .spawn(move || {
                let mut engine = factory();
                // Runs until every sender is dropped.
                for job in receiver {
                    job(engine.as_mut());
                }
                log::debug!("engine worker shutting down");
            })
            .map_err(|e| PluginError::Bridge(format!("failed to spawn engine worker: {e}")))?;

        Ok(Self {
            sender: Mutex::new(Some(sender)),
            worker: Mutex::new(Some(worker)),
        })
    }

    /// Run one engine operation on the worker thread, blocking the caller
    /// until it completes.
    ///
    /// Exactly one job is scheduled and exactly one completion signal is
    /// consumed per call.  Blocks without timeout.
    pub fn perform(
        &self,
        action: ActionRequest,
        options: ActionOptions,
    ) -> Result<ActionResult, PluginError> {
        let (done_tx, done_rx) = mpsc::channel::<ActionResult>();

        let job: Job = Box::new(move |engine| {
            // The caller may only have given up waiting if the queue was
            // torn down, so a dead receiver is not an error here.
            let _ = done_tx.send(engine.perform_action(action, options));
        });

        {
            let guard = self.sender.lock();
            let sender = guard
                .as_ref()
                .ok_or_else(|| PluginError::Bridge("engine worker stopped".to_owned()))?;
            sender
                .send(job)
                .map_err(|_| PluginError::Bridge("engine worker stopped".to_owned()))?;
        }

        done_rx.recv().map_err(|_| {
            PluginError::Bridge("engine worker exited before completing the operation".to_owned())
        })
    }
}

impl Drop for EngineHandle {
    fn drop(&mut self) {
        // Closing the queue ends the worker's receive loop.
        self.sender.lock().take();
        if let Some(worker) = self.worker.lock().take() {
            let _ = worker.join();
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::thread::ThreadId;

    struct ThreadReporter;

    impl AutomationEngine for ThreadReporter {
        fn perform_action(
            &mut self,
            _action: ActionRequest,
            _options: ActionOptions,
        ) -> ActionResult {
            json!({ "thread": format!("{:?}", thread::current().id()) })
        }
    }

    #[test]
    fn test_perform_runs_on_worker_thread() {
        let handle = EngineHandle::spawn(|| Box::new(ThreadReporter)).unwrap();
        let caller: ThreadId = thread::current().id();
        let result = handle
            .perform(ActionRequest::TraverseOnly, ActionOptions::default())
            .unwrap();
        assert_ne!(result["thread"].as_str().unwrap(), format!("{caller:?}"));
    }

    #[test]
    fn test_perform_returns_engine_result() {
        struct Echo;
        impl AutomationEngine for Echo {
            fn perform_action(
                &mut self,
                action: ActionRequest,
                options: ActionOptions,
            ) -> ActionResult {
                json!({
                    "is_traverse": action == ActionRequest::TraverseOnly,
                    "pid": options.pid_for_traversal,
                })
            }
        }

        let handle = EngineHandle::spawn(|| Box::new(Echo)).unwrap();
        let options = ActionOptions {
            pid_for_traversal: Some(42),
            ..ActionOptions::default()
        };
        let result = handle.perform(ActionRequest::TraverseOnly, options).unwrap();
        assert_eq!(result["is_traverse"], json!(true));
        assert_eq!(result["pid"], json!(42));
    }

    #[test]
    fn test_sequential_calls_share_one_engine() {
        struct Counter(u64);
        impl AutomationEngine for Counter {
            fn perform_action(
                &mut self,
                _action: ActionRequest,
                _options: ActionOptions,
            ) -> ActionResult {
                self.0 += 1;
                json!({ "count": self.0 })
            }
        }

        let handle = EngineHandle::spawn(|| Box::new(Counter(0))).unwrap();
        for expected in 1..=3u64 {
            let result = handle
                .perform(ActionRequest::TraverseOnly, ActionOptions::default())
                .unwrap();
            assert_eq!(result["count"], json!(expected));
        }
    }
}

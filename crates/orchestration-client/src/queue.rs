//! FIFO serialization of asynchronous operations

use futures::channel::oneshot;
use std::sync::Mutex;

/// FIFO queue serializing asynchronous operations
///
/// Every operation submitted through [`run`](CommandQueue::run) waits for
/// all previously submitted operations to settle before its body starts,
/// so exactly one operation executes at a time. A failed operation only
/// fails its own caller; the operations queued behind it still run.
///
/// An operation's queue position is claimed when `run` is *called*, not
/// when the returned future is first polled.
#[derive(Debug)]
pub struct CommandQueue {
    /// Completion signal of the most recently submitted operation
    tail: Mutex<Option<oneshot::Receiver<()>>>,
}

impl CommandQueue {
    /// Create an empty queue
    pub fn new() -> Self {
        Self {
            tail: Mutex::new(None),
        }
    }

    /// Submit an operation behind everything already queued
    ///
    /// The returned future resolves with the operation's own output once
    /// every earlier operation has settled and the operation itself has
    /// run. The queue takes no interest in the output: an error belongs
    /// to this operation's caller alone, and the queue moves on to the
    /// next entry either way.
    pub fn run<F, Fut, T>(&self, op: F) -> impl Future<Output = T>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = T>,
    {
        let (done, next) = oneshot::channel();
        let predecessor = {
            let mut tail = self.tail.lock().unwrap_or_else(|e| e.into_inner());
            tail.replace(next)
        };

        async move {
            if let Some(predecessor) = predecessor {
                // Canceled means the predecessor was dropped or panicked;
                // either way it has settled.
                let _ = predecessor.await;
            }
            let output = op().await;
            let _ = done.send(());
            output
        }
    }
}

impl Default for CommandQueue {
    fn default() -> Self {
        Self::new()
    }
}

//! Cancellable scheduled tasks
//!
//! Every timer fabterm starts lives in a tokio task owned through a
//! [`TaskHandle`]. Dropping the handle aborts the task, so a component that
//! goes away takes its pending timers with it.

use std::future::Future;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

#[derive(Debug)]
pub struct TaskHandle {
    handle: JoinHandle<()>,
}

impl TaskHandle {
    pub fn spawn<F>(future: F) -> Self
    where
        F: Future<Output = ()> + Send + 'static,
    {
        Self {
            handle: tokio::spawn(future),
        }
    }

    /// Abort the task now; a no-op if it already ran to completion
    pub fn cancel(self) {
        drop(self);
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

impl Drop for TaskHandle {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// Deliver `value` on `tx` after `delay`.
///
/// A closed receiver makes the send a silent no-op.
pub fn schedule_after<T>(delay: Duration, tx: mpsc::UnboundedSender<T>, value: T) -> TaskHandle
where
    T: Send + 'static,
{
    TaskHandle::spawn(async move {
        tokio::time::sleep(delay).await;
        let _ = tx.send(value);
    })
}

//! Background task runner.
//!
//! Each submitted operation runs on its own tokio task. The caller keeps a
//! [`TaskHandle`] and takes the single outcome with [`TaskHandle::wait`].

use std::future::Future;

use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::cancel::CancellationToken;
use crate::error::{GitlabError, Result};

/// Lifecycle of a submitted operation.
///
/// Transitions only move forward: `Pending -> Running -> Completed | Failed |
/// Cancelled`, or `Pending -> Cancelled` when the token is already cancelled
/// when the worker picks the task up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskState {
    Pending,
    Running,
    Completed,
    Failed,
    Cancelled,
}

impl TaskState {
    /// Returns true for the three terminal states.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Failed | Self::Cancelled)
    }
}

/// Handle to an operation running in the background.
///
/// Dropping the handle does not stop the operation; call
/// [`cancel`](Self::cancel) for that.
#[derive(Debug)]
pub struct TaskHandle<T> {
    join: JoinHandle<Result<T>>,
    state: watch::Receiver<TaskState>,
    cancel: CancellationToken,
}

/// Submit `operation` to run on a worker task.
///
/// Returns immediately. The operation receives a clone of `cancel` and is
/// expected to check it before each request. If the token is already
/// cancelled when the worker starts, the operation is never invoked and the
/// outcome is [`GitlabError::Cancelled`].
///
/// Must be called from within a tokio runtime.
pub fn spawn<T, F, Fut>(cancel: CancellationToken, operation: F) -> TaskHandle<T>
where
    T: Send + 'static,
    F: FnOnce(CancellationToken) -> Fut + Send + 'static,
    Fut: Future<Output = Result<T>> + Send + 'static,
{
    let (state_tx, state_rx) = watch::channel(TaskState::Pending);
    let token = cancel.clone();

    let join = tokio::spawn(async move {
        if token.is_cancelled() {
            tracing::debug!("task cancelled before start");
            advance(&state_tx, TaskState::Cancelled);
            return Err(GitlabError::Cancelled);
        }

        advance(&state_tx, TaskState::Running);
        let outcome = operation(token).await;

        let terminal = match &outcome {
            Ok(_) => TaskState::Completed,
            Err(GitlabError::Cancelled) => TaskState::Cancelled,
            Err(_) => TaskState::Failed,
        };
        advance(&state_tx, terminal);
        outcome
    });

    TaskHandle {
        join,
        state: state_rx,
        cancel,
    }
}

/// Move the state forward; terminal states are never left.
fn advance(tx: &watch::Sender<TaskState>, next: TaskState) {
    tx.send_if_modified(|current| {
        if current.is_terminal() || *current == next {
            return false;
        }
        *current = next;
        true
    });
}

impl<T> TaskHandle<T> {
    /// Current lifecycle state.
    pub fn state(&self) -> TaskState {
        *self.state.borrow()
    }

    /// Request cooperative cancellation of the operation.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// Token shared with the running operation.
    pub fn cancellation_token(&self) -> &CancellationToken {
        &self.cancel
    }

    /// Returns true once the worker has finished.
    pub fn is_finished(&self) -> bool {
        self.join.is_finished()
    }

    /// Wait for the operation's outcome.
    ///
    /// Consumes the handle, so the outcome is delivered exactly once.
    ///
    /// # Errors
    ///
    /// Returns the operation's error, or [`GitlabError::TaskAborted`] if the
    /// worker panicked or the runtime shut down before it finished.
    pub async fn wait(self) -> Result<T> {
        match self.join.await {
            Ok(outcome) => outcome,
            Err(e) => Err(GitlabError::TaskAborted(e.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;

    use super::*;

    #[tokio::test]
    async fn test_success_outcome() {
        let handle = spawn(CancellationToken::new(), |_| async { Ok(42) });
        assert_eq!(handle.wait().await.unwrap(), 42);
    }

    #[tokio::test]
    async fn test_failure_outcome_sets_failed_state() {
        let handle = spawn(CancellationToken::new(), |_| async {
            Err::<(), _>(GitlabError::decode("bad page"))
        });

        let mut state = handle.state.clone();
        let observed = *state.wait_for(|s| s.is_terminal()).await.unwrap();
        assert_eq!(observed, TaskState::Failed);
        assert!(matches!(handle.wait().await, Err(GitlabError::DecodeError(_))));
    }

    #[tokio::test]
    async fn test_cancelled_before_start_never_runs() {
        let ran = Arc::new(AtomicBool::new(false));
        let flag = ran.clone();

        let cancel = CancellationToken::new();
        cancel.cancel();
        let handle = spawn(cancel, move |_| async move {
            flag.store(true, Ordering::SeqCst);
            Ok(())
        });

        let mut state = handle.state.clone();
        let observed = *state.wait_for(|s| s.is_terminal()).await.unwrap();
        assert_eq!(observed, TaskState::Cancelled);
        assert!(matches!(handle.wait().await, Err(GitlabError::Cancelled)));
        assert!(!ran.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn test_cancel_during_run_is_observed_by_operation() {
        let (started_tx, started_rx) = tokio::sync::oneshot::channel();
        let (resume_tx, resume_rx) = tokio::sync::oneshot::channel::<()>();

        let handle = spawn(CancellationToken::new(), move |token| async move {
            let _ = started_tx.send(());
            let _ = resume_rx.await;
            token.check()?;
            Ok("finished")
        });

        started_rx.await.unwrap();
        assert_eq!(handle.state(), TaskState::Running);
        handle.cancel();
        resume_tx.send(()).unwrap();

        assert!(matches!(handle.wait().await, Err(GitlabError::Cancelled)));
    }

    #[tokio::test]
    async fn test_panicking_worker_reports_aborted() {
        let handle = spawn(CancellationToken::new(), |_| async {
            if true {
                panic!("worker blew up");
            }
            Ok(())
        });
        assert!(matches!(handle.wait().await, Err(GitlabError::TaskAborted(_))));
    }

    #[test]
    fn test_terminal_states_are_sticky() {
        let (tx, rx) = watch::channel(TaskState::Pending);
        advance(&tx, TaskState::Running);
        advance(&tx, TaskState::Completed);
        advance(&tx, TaskState::Running);
        assert_eq!(*rx.borrow(), TaskState::Completed);
    }
}

//! Cooperative cancellation for long-running fetches.

use std::future::Future;

use tokio::sync::watch;

use crate::error::{BufeteError, Result};

/// Triggers cancellation of every request holding one of its signals.
#[derive(Debug)]
pub struct AbortController {
    tx: watch::Sender<bool>,
}

/// Observes an [`AbortController`].
#[derive(Debug, Clone)]
pub struct AbortSignal {
    rx: watch::Receiver<bool>,
}

impl AbortController {
    #[must_use]
    pub fn new() -> Self {
        let (tx, _) = watch::channel(false);
        Self { tx }
    }

    /// A new signal tied to this controller.
    #[must_use]
    pub fn signal(&self) -> AbortSignal {
        AbortSignal {
            rx: self.tx.subscribe(),
        }
    }

    /// Aborts all requests observing this controller. Idempotent.
    pub fn abort(&self) {
        self.tx.send_replace(true);
    }
}

impl Default for AbortController {
    fn default() -> Self {
        Self::new()
    }
}

impl AbortSignal {
    #[must_use]
    pub fn is_aborted(&self) -> bool {
        *self.rx.borrow()
    }

    /// Resolves once the controller aborts. Never resolves if the controller
    /// is dropped without aborting.
    pub async fn aborted(&mut self) {
        let closed = self.rx.wait_for(|aborted| *aborted).await.is_err();
        if closed {
            std::future::pending::<()>().await;
        }
    }
}

/// Runs `fut`, giving up with [`BufeteError::Cancelled`] if `signal` fires first.
pub async fn with_signal<T, F>(signal: Option<&AbortSignal>, fut: F) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    let Some(signal) = signal else {
        return fut.await;
    };

    let mut signal = signal.clone();
    if signal.is_aborted() {
        return Err(BufeteError::Cancelled);
    }

    tokio::select! {
        result = fut => result,
        () = signal.aborted() => {
            tracing::debug!("Request aborted by caller");
            Err(BufeteError::Cancelled)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn completes_without_signal() {
        let value = with_signal(None, async { Ok(5) }).await.unwrap();
        assert_eq!(value, 5);
    }

    #[tokio::test]
    async fn already_aborted_signal_short_circuits() {
        let controller = AbortController::new();
        controller.abort();

        let err = with_signal(Some(&controller.signal()), async { Ok(1) })
            .await
            .unwrap_err();
        assert!(err.is_cancelled());
    }

    #[tokio::test]
    async fn abort_interrupts_pending_request() {
        let controller = AbortController::new();
        let signal = controller.signal();

        let request = tokio::spawn(async move {
            with_signal(Some(&signal), async {
                tokio::time::sleep(Duration::from_secs(30)).await;
                Ok(())
            })
            .await
        });

        tokio::time::sleep(Duration::from_millis(20)).await;
        controller.abort();

        let err = request.await.unwrap().unwrap_err();
        assert!(err.is_cancelled());
    }

    #[tokio::test]
    async fn dropped_controller_does_not_cancel() {
        let controller = AbortController::new();
        let signal = controller.signal();
        drop(controller);

        let value = with_signal(Some(&signal), async {
            tokio::time::sleep(Duration::from_millis(10)).await;
            Ok("done")
        })
        .await
        .unwrap();
        assert_eq!(value, "done");
    }
}

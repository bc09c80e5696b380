use tokio::sync::watch;

/// Receiving side of a cancellation signal. `true` means cancelled.
pub type CancelSignal = watch::Receiver<bool>;
pub type CancelHandle = watch::Sender<bool>;

pub fn cancel_pair() -> (CancelHandle, CancelSignal) {
    watch::channel(false)
}

/// Resolves once the signal is raised or its sender is gone.
pub async fn cancelled(signal: &mut CancelSignal) {
    let _ = signal.wait_for(|cancelled| *cancelled).await;
}

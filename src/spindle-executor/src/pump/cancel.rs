use crossbeam_channel::{bounded, Receiver, Sender, TryRecvError};
use thiserror::Error;

/// Returned to a pipelined producer once the consumer has given up.
///
/// Producers only see this to unwind their loop. It is discarded by
/// the pump and never reaches its caller.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
#[error("the consumer stopped accepting items")]
pub struct Cancelled;

/// Creates a connected pair of [`CancelHandle`] and [`CancelSignal`].
pub(crate) fn signal() -> (CancelHandle, CancelSignal) {
    // Nothing is ever sent. Dropping the sender disconnects the channel,
    // which every receiver observes at once and for good.
    let (tx, rx) = bounded(0);
    (CancelHandle(tx), CancelSignal(rx))
}

/// The raising side of the cancellation signal. Dropping it raises
/// the signal as well, which covers the consumer unwinding.
pub(crate) struct CancelHandle(Sender<()>);

impl CancelHandle {
    pub fn raise(self) {
        log::debug!("Cancelling the producer");
        drop(self.0);
    }
}

/// The observing side of the cancellation signal.
pub(crate) struct CancelSignal(Receiver<()>);

impl CancelSignal {
    pub fn is_raised(&self) -> bool {
        matches!(self.0.try_recv(), Err(TryRecvError::Disconnected))
    }

    /// Gets the channel to `select!` on. It becomes ready once the
    /// signal is raised.
    pub fn receiver(&self) -> &Receiver<()> {
        &self.0
    }
}

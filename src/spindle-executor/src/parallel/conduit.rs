use std::{
    any::Any,
    fmt,
    panic,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    },
};

use crossbeam_channel::Receiver;

pub(super) enum Report<E> {
    Failed(E),
    Panicked(Box<dyn Any + Send + 'static>),
}

/// The read end over which running tasks report their failures.
///
/// Errors arrive in the order the tasks finish, which differs between
/// runs. The conduit yields `None` once every task has returned.
///
/// If a task panicked, reading its report resumes the panic on the
/// reading thread.
#[must_use = "Drain the conduit to find out whether the tasks succeeded"]
pub struct Conduit<E> {
    rx: Receiver<Report<E>>,
    remaining: Arc<AtomicUsize>,
}

impl<E> Conduit<E> {
    pub(super) fn new(rx: Receiver<Report<E>>, remaining: Arc<AtomicUsize>) -> Self {
        Self { rx, remaining }
    }

    /// Blocks until the next task error arrives, or until all tasks
    /// have finished.
    pub fn recv(&self) -> Option<E> {
        match self.rx.recv().ok()? {
            Report::Failed(e) => Some(e),
            Report::Panicked(payload) => panic::resume_unwind(payload),
        }
    }

    /// Gets the number of tasks that have not returned yet.
    pub fn pending(&self) -> usize {
        self.remaining.load(Ordering::Acquire)
    }
}

impl<E> Iterator for Conduit<E> {
    type Item = E;

    fn next(&mut self) -> Option<Self::Item> {
        self.recv()
    }
}

impl<E> fmt::Debug for Conduit<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Conduit")
            .field("pending", &self.pending())
            .field("queued", &self.rx.len())
            .finish()
    }
}

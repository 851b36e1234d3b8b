use std::{
    panic::{self, AssertUnwindSafe},
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    },
};

use crossbeam_channel::{bounded, SendError, Sender};
use threadpool::{Builder, ThreadPool};

use crate::config;

mod conduit;
pub use conduit::Conduit;
use conduit::Report;

mod failure;
pub use failure::{wait, TaskFailure};

const TASK_NAME: &str = "spindle-task";

/// A boxed task for when the closures handed to [`parallel`] differ
/// in type.
pub type Task<E> = Box<dyn FnOnce() -> Result<(), E> + Send + 'static>;

/// A boxed task for [`parallel_with`].
pub type ArgTask<A, E> = Box<dyn FnOnce(A) -> Result<(), E> + Send + 'static>;

fn make_task_pool(ntasks: usize) -> ThreadPool {
    let stack = config::task_stack_size().unwrap_or_else(|e| {
        log::warn!("{e}; falling back to the default stack size");
        config::DEFAULT_TASK_STACK
    });

    Builder::new()
        .num_threads(ntasks)
        .thread_name(TASK_NAME.into())
        .thread_stack_size(stack)
        .build()
}

// Owned by one running task. Dropping it counts the task as finished,
// and the conduit disconnects once the last of these is gone.
struct Completion<E> {
    tx: Sender<Report<E>>,
    remaining: Arc<AtomicUsize>,
}

impl<E> Completion<E> {
    fn run<F>(self, index: usize, task: F)
    where
        F: FnOnce() -> Result<(), E>,
    {
        log::trace!("Task {index} started");

        let report = match panic::catch_unwind(AssertUnwindSafe(task)) {
            Ok(Ok(())) => return,
            Ok(Err(e)) => Report::Failed(e),
            Err(payload) => Report::Panicked(payload),
        };

        // The conduit has room for one report per task, so this never
        // blocks. It only fails when the reader is gone.
        match self.tx.send(report) {
            Ok(()) => {}
            Err(SendError(Report::Panicked(..))) => {
                log::warn!("Task {index} panicked after its conduit was dropped");
            }
            Err(SendError(Report::Failed(..))) => {
                log::debug!("Task {index} failed after its conduit was dropped");
            }
        }
    }
}

impl<E> Drop for Completion<E> {
    fn drop(&mut self) {
        if self.remaining.fetch_sub(1, Ordering::AcqRel) == 1 {
            log::trace!("All tasks completed");
        }
    }
}

fn launch<E, F>(tasks: Vec<F>) -> Conduit<E>
where
    E: Send + 'static,
    F: FnOnce() -> Result<(), E> + Send + 'static,
{
    let count = tasks.len();
    let (tx, rx) = bounded(count);
    let remaining = Arc::new(AtomicUsize::new(count));

    let pool = make_task_pool(count);
    for (index, task) in tasks.into_iter().enumerate() {
        let completion = Completion {
            tx: tx.clone(),
            remaining: remaining.clone(),
        };
        pool.execute(move || completion.run(index, task));
    }

    log::debug!("Launched {count} tasks");
    Conduit::new(rx, remaining)
}

/// Starts every task on its own thread and returns the [`Conduit`]
/// their errors are posted to.
///
/// The conduit disconnects once all tasks have returned. Use [`wait`]
/// to block until then and merge the errors.
///
/// # Panics
///
/// Panics when `tasks` is empty. That is a bug in the caller, not a
/// runtime failure.
pub fn parallel<E, F, I>(tasks: I) -> Conduit<E>
where
    E: Send + 'static,
    F: FnOnce() -> Result<(), E> + Send + 'static,
    I: IntoIterator<Item = F>,
{
    let tasks: Vec<F> = tasks.into_iter().collect();
    assert!(
        !tasks.is_empty(),
        "spindle_executor::parallel: no tasks to run"
    );

    launch(tasks)
}

/// Like [`parallel`], but every task receives its own clone of `arg`.
///
/// A good candidate for `arg` is a shared stop flag that the tasks
/// poll from time to time, since the runner itself offers no way to
/// cancel them.
///
/// # Panics
///
/// Panics when `tasks` is empty.
pub fn parallel_with<A, E, F, I>(arg: A, tasks: I) -> Conduit<E>
where
    A: Clone + Send + 'static,
    E: Send + 'static,
    F: FnOnce(A) -> Result<(), E> + Send + 'static,
    I: IntoIterator<Item = F>,
{
    let tasks: Vec<_> = tasks
        .into_iter()
        .map(|task| {
            let arg = arg.clone();
            move || task(arg)
        })
        .collect();
    assert!(
        !tasks.is_empty(),
        "spindle_executor::parallel_with: no tasks to run"
    );

    launch(tasks)
}

/// Starts a single task on a dedicated thread.
#[inline]
pub fn spawn<E, F>(task: F) -> Conduit<E>
where
    E: Send + 'static,
    F: FnOnce() -> Result<(), E> + Send + 'static,
{
    parallel(Some(task))
}

/// Starts a single task on a dedicated thread, handing it `arg`.
#[inline]
pub fn spawn_with<A, E, F>(arg: A, task: F) -> Conduit<E>
where
    A: Clone + Send + 'static,
    E: Send + 'static,
    F: FnOnce(A) -> Result<(), E> + Send + 'static,
{
    parallel_with(arg, Some(task))
}

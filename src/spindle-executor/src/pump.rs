use std::{cell::Cell, panic, thread};

use crossbeam_channel::{bounded, select, Receiver, Sender};

use crate::config::{self, BadConfiguration};

mod cancel;
pub use cancel::Cancelled;
use cancel::CancelSignal;

mod pipeline;
pub use pipeline::pipeline;

/// A conveyor that runs a producer on its own thread and hands every
/// item it makes to a consumer on the calling thread.
///
/// The two sides are connected by a bounded queue. A producer that
/// runs ahead of the consumer blocks once the queue is full.
///
/// Processing stops at the first error from either side and that
/// error is returned. If both sides fail, the consumer's error wins.
/// When a run returns, the producer thread has terminated.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Pump {
    capacity: usize,
}

impl Default for Pump {
    fn default() -> Self {
        Self::new()
    }
}

impl Pump {
    /// Creates a pump with a queue capacity of 20 items.
    #[inline]
    pub const fn new() -> Self {
        Self {
            capacity: config::DEFAULT_PUMP_CAPACITY,
        }
    }

    /// Creates a pump with a queue holding up to `capacity` items.
    ///
    /// # Panics
    ///
    /// Panics when `capacity` is zero.
    pub fn with_capacity(capacity: usize) -> Self {
        assert!(capacity > 0, "pump queue capacity must be non-zero");
        Self { capacity }
    }

    /// Creates a pump sized by the `SPINDLE_PUMP_CAPACITY` environment
    /// variable, or with the default capacity if it is not set.
    pub fn from_env() -> Result<Self, BadConfiguration> {
        config::pump_capacity().map(|capacity| Self { capacity })
    }

    /// Gets the capacity of the queue between producer and consumer.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Pulls items out of `source` on a producer thread and passes them
    /// to `sink` in the same order.
    ///
    /// The end of `source` is a clean stop. An `Err` item stops the
    /// producer, and is returned after `sink` has processed everything
    /// that was queued before it.
    ///
    /// An error from `sink` cancels the producer at its next attempt
    /// to enqueue an item.
    pub fn run<I, T, E, F>(&self, source: I, sink: F) -> Result<(), E>
    where
        I: IntoIterator<Item = Result<T, E>> + Send,
        T: Send,
        E: Send,
        F: FnMut(T) -> Result<(), E>,
    {
        self.drive(
            move |feeder: &Feeder<T>| {
                for item in source {
                    if feeder.feed(item?).is_err() {
                        break;
                    }
                }

                Ok(())
            },
            sink,
        )
    }

    fn drive<T, E, P, C>(&self, produce: P, mut consume: C) -> Result<(), E>
    where
        T: Send,
        E: Send,
        P: FnOnce(&Feeder<T>) -> Result<(), E> + Send,
        C: FnMut(T) -> Result<(), E>,
    {
        let (queue, items) = bounded(self.capacity);
        let (cancel, signal) = cancel::signal();

        thread::scope(|s| {
            let producer = s.spawn(move || {
                let feeder = Feeder {
                    queue,
                    signal,
                    fed: Cell::new(0),
                };

                let result = produce(&feeder);
                log::trace!("Producer stopped after {} items", feeder.fed.get());

                result
            });

            // If `consume` panics, unwinding drops `cancel` before the
            // scope joins the producer, so it cannot stay blocked.
            let consumed = drain(&items, &mut consume);
            if consumed.is_err() {
                cancel.raise();
            }

            let produced = match producer.join() {
                Ok(result) => result,
                Err(payload) => panic::resume_unwind(payload),
            };

            consumed.and(produced)
        })
    }
}

// The producer's end of the queue.
struct Feeder<T> {
    queue: Sender<T>,
    signal: CancelSignal,
    fed: Cell<usize>,
}

impl<T> Feeder<T> {
    fn feed(&self, item: T) -> Result<(), Cancelled> {
        if self.signal.is_raised() {
            return Err(Cancelled);
        }

        // Block until there is room in the queue or the consumer gives
        // up, whichever comes first.
        select! {
            send(self.queue, item) -> sent => sent.map_err(|_| Cancelled)?,
            recv(self.signal.receiver()) -> _ => return Err(Cancelled),
        }

        self.fed.set(self.fed.get() + 1);
        Ok(())
    }
}

fn drain<T, E, C>(items: &Receiver<T>, consume: &mut C) -> Result<(), E>
where
    C: FnMut(T) -> Result<(), E>,
{
    for item in items {
        consume(item)?;
    }

    Ok(())
}

/// Runs `source` against `sink` through a [`Pump`] with the default
/// capacity.
///
/// See [`Pump::run`] for details.
pub fn pump<I, T, E, F>(source: I, sink: F) -> Result<(), E>
where
    I: IntoIterator<Item = Result<T, E>> + Send,
    T: Send,
    E: Send,
    F: FnMut(T) -> Result<(), E>,
{
    Pump::new().run(source, sink)
}

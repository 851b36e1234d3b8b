use super::{Cancelled, Feeder, Pump};

impl Pump {
    /// Wraps a push-style producer so that it runs on its own thread.
    ///
    /// `iterate` calls the callback it is given once per item and
    /// returns when it is done. The returned function has the same
    /// shape: it takes the consumer callback, runs `iterate` on a
    /// producer thread and feeds the callback on the calling thread.
    ///
    /// When the consumer fails, the producer's callback starts returning
    /// `E::from(Cancelled)` so that `iterate` can unwind with `?`. That
    /// value is dropped; the consumer's error is what the caller gets.
    pub fn pipeline<T, E, I>(
        self,
        iterate: I,
    ) -> impl FnOnce(&mut dyn FnMut(T) -> Result<(), E>) -> Result<(), E>
    where
        T: Send,
        E: Send + From<Cancelled>,
        I: FnOnce(&mut dyn FnMut(T) -> Result<(), E>) -> Result<(), E> + Send,
    {
        move |sink: &mut dyn FnMut(T) -> Result<(), E>| {
            self.drive(
                move |feeder: &Feeder<T>| {
                    iterate(&mut |item: T| feeder.feed(item).map_err(E::from))
                },
                sink,
            )
        }
    }
}

/// Wraps a push-style producer with a [`Pump`] of default capacity.
///
/// See [`Pump::pipeline`] for details.
pub fn pipeline<T, E, I>(
    iterate: I,
) -> impl FnOnce(&mut dyn FnMut(T) -> Result<(), E>) -> Result<(), E>
where
    T: Send,
    E: Send + From<Cancelled>,
    I: FnOnce(&mut dyn FnMut(T) -> Result<(), E>) -> Result<(), E> + Send,
{
    Pump::new().pipeline(iterate)
}

use std::{
    panic::{self, AssertUnwindSafe},
    sync::{
        atomic::{AtomicBool, AtomicUsize, Ordering},
        Arc,
    },
    thread,
    time::Duration,
};

use spindle_executor::{pump, Pump};

fn counting_source(n: usize) -> impl Iterator<Item = Result<usize, String>> + Send {
    (0..n).map(Ok)
}

#[test]
fn pump_all_items() {
    const N: usize = 1_000_000;

    let mut count = 0;
    let result = pump(counting_source(N), |i| {
        if i != count {
            return Err(format!("unexpected parameter: {i} instead of {count}"));
        }

        count += 1;
        Ok(())
    });

    assert_eq!(result, Ok(()));
    assert_eq!(count, N);
}

#[test]
fn empty_source() {
    let mut calls = 0;
    let result = pump(counting_source(0), |_| {
        calls += 1;
        Ok(())
    });

    assert_eq!(result, Ok(()));
    assert_eq!(calls, 0);
}

#[test]
fn sink_error() {
    const N: usize = 1000;

    let produced = Arc::new(AtomicUsize::new(0));
    let p = produced.clone();
    let source = (0..N).map(move |i| {
        p.fetch_add(1, Ordering::SeqCst);
        Ok(i)
    });

    let mut count = 0;
    let result = pump(source, |i| {
        if count >= N / 2 {
            return Err(format!("unexpected call with value {i}"));
        }

        if i != count {
            return Err(format!("unexpected parameter: {i} instead of {count}"));
        }

        count += 1;
        if count == N / 2 {
            return Err(format!("expected error: reached value {count}"));
        }

        Ok(())
    });

    assert_eq!(result, Err("expected error: reached value 500".to_string()));
    assert_eq!(count, N / 2);

    // Whatever fit into the queue, the item stuck in front of it, and
    // at most one more pulled before the cancellation was observed.
    let capacity = Pump::new().capacity();
    assert!(produced.load(Ordering::SeqCst) <= N / 2 + capacity + 2);
}

#[test]
fn source_error() {
    const N: usize = 1000;

    let source = counting_source(N).chain(Some(Err("expected error".to_string())));

    let mut count = 0;
    let result = pump(source, |i| {
        if i != count {
            return Err(format!("unexpected parameter: {i} instead of {count}"));
        }

        count += 1;
        Ok(())
    });

    assert_eq!(result, Err("expected error".to_string()));
    assert_eq!(count, N);
}

#[test]
fn sink_error_wins() {
    let source = counting_source(10).chain(Some(Err("source".to_string())));

    let result = pump(source, |i| {
        if i == 5 {
            Err("sink".to_string())
        } else {
            Ok(())
        }
    });

    assert_eq!(result, Err("sink".to_string()));
}

struct Tracked<I> {
    inner: I,
    dropped: Arc<AtomicBool>,
}

impl<I: Iterator> Iterator for Tracked<I> {
    type Item = I::Item;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }
}

impl<I> Drop for Tracked<I> {
    fn drop(&mut self) {
        self.dropped.store(true, Ordering::SeqCst);
    }
}

#[test]
fn producer_stops_before_return() {
    let dropped = Arc::new(AtomicBool::new(false));
    let source = Tracked {
        inner: counting_source(usize::MAX),
        dropped: dropped.clone(),
    };

    let result = pump(source, |i| {
        if i == 100 {
            Err("enough".to_string())
        } else {
            Ok(())
        }
    });

    assert_eq!(result, Err("enough".to_string()));
    assert!(dropped.load(Ordering::SeqCst));
}

#[test]
fn backpressure() {
    const CAPACITY: usize = 4;

    let produced = Arc::new(AtomicUsize::new(0));
    let consumed = Arc::new(AtomicUsize::new(0));
    let ahead = Arc::new(AtomicUsize::new(0));

    let (p, c, a) = (produced.clone(), consumed.clone(), ahead.clone());
    let source = (0..200).map(move |i| {
        let lead = p.fetch_add(1, Ordering::SeqCst) - c.load(Ordering::SeqCst);
        a.fetch_max(lead, Ordering::SeqCst);
        Ok::<_, String>(i)
    });

    let result = Pump::with_capacity(CAPACITY).run(source, |i| {
        if i % 20 == 0 {
            thread::sleep(Duration::from_millis(2));
        }

        consumed.fetch_add(1, Ordering::SeqCst);
        Ok(())
    });

    assert_eq!(result, Ok(()));
    assert_eq!(consumed.load(Ordering::SeqCst), 200);

    // The queue plus the item the consumer is working on.
    assert!(ahead.load(Ordering::SeqCst) <= CAPACITY + 1);
}

#[test]
fn sink_panic_propagates() {
    let dropped = Arc::new(AtomicBool::new(false));
    let source = Tracked {
        inner: counting_source(usize::MAX),
        dropped: dropped.clone(),
    };

    let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
        pump(source, |i| {
            if i == 10 {
                panic!("sink exploded");
            }

            Ok(())
        })
    }));

    assert!(outcome.is_err());
    assert!(dropped.load(Ordering::SeqCst));
}

#[test]
fn source_panic_propagates() {
    let source = (0..100).map(|i| {
        if i == 50 {
            panic!("source exploded");
        }

        Ok::<_, String>(i)
    });

    let mut count = 0;
    let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
        pump(source, |_| {
            count += 1;
            Ok(())
        })
    }));

    let payload = outcome.unwrap_err();
    assert_eq!(payload.downcast_ref::<&str>(), Some(&"source exploded"));
    assert_eq!(count, 50);
}

#[test]
#[should_panic(expected = "capacity must be non-zero")]
fn zero_capacity() {
    let _ = Pump::with_capacity(0);
}

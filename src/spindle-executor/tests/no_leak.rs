#![cfg(target_os = "linux")]

use std::{
    fs, thread,
    time::{Duration, Instant},
};

use spindle_executor::pump;

fn thread_count() -> usize {
    fs::read_dir("/proc/self/task").map(|d| d.count()).unwrap()
}

// A joined thread may linger in procfs for a moment after it exited.
fn settles_at(limit: usize) -> bool {
    let deadline = Instant::now() + Duration::from_secs(2);
    while Instant::now() < deadline {
        if thread_count() <= limit {
            return true;
        }
        thread::sleep(Duration::from_millis(5));
    }

    false
}

#[test]
fn repeated_pumps_leave_no_threads() {
    let before = thread_count();

    for round in 0..50 {
        let source = (0..10_000).map(Ok);
        let result = pump(source, |i| {
            if round % 2 == 0 && i == 1234 {
                Err(format!("stop at {i}"))
            } else {
                Ok(())
            }
        });

        assert_eq!(result.is_err(), round % 2 == 0);
    }

    assert!(settles_at(before));
}

//! Fork-Join Bursts
//!
//! Independent GPU object creation calls run as short-lived parallel
//! units, joined before any dependent step reads their outputs. This is
//! not a thread pool: every burst spawns exactly as many threads as there
//! are mutually independent creation steps and blocks until all of them
//! return. A unit surfaces its own failures through the log; siblings are
//! never cancelled.

use std::thread;

/// Runs two independent units on their own threads and returns both
/// results after both have finished.
pub(crate) fn join2<A, B>(a: impl FnOnce() -> A + Send, b: impl FnOnce() -> B + Send) -> (A, B)
where
    A: Send,
    B: Send,
{
    thread::scope(|scope| {
        let handle_a = scope.spawn(a);
        let handle_b = scope.spawn(b);
        (join_unit(handle_a), join_unit(handle_b))
    })
}

/// Blocks on one unit. A panicking unit resumes its panic on the
/// initiating thread, matching what an unjoined scoped thread would do.
pub(crate) fn join_unit<T>(handle: thread::ScopedJoinHandle<'_, T>) -> T {
    handle
        .join()
        .unwrap_or_else(|payload| std::panic::resume_unwind(payload))
}

#[cfg(test)]
mod tests {
    use super::join2;

    #[test]
    fn both_units_run_and_results_keep_their_slots() {
        let (a, b) = join2(|| 1 + 1, || "ok");
        assert_eq!(a, 2);
        assert_eq!(b, "ok");
    }

    #[test]
    fn units_run_concurrently() {
        use std::sync::atomic::{AtomicBool, Ordering};
        use std::time::Duration;

        let flag = AtomicBool::new(false);
        let (waited, _) = join2(
            || {
                // Spin until the sibling proves it is running in parallel.
                for _ in 0..1000 {
                    if flag.load(Ordering::SeqCst) {
                        return true;
                    }
                    std::thread::sleep(Duration::from_millis(1));
                }
                false
            },
            || flag.store(true, Ordering::SeqCst),
        );
        assert!(waited);
    }
}

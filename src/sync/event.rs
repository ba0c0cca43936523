//! One-shot event that releases every waiter at once

use std::fmt;
use std::sync::{Condvar, Mutex, MutexGuard};
use std::time::Instant;

/// A flag that goes from unset to set exactly once.
///
/// Any number of threads may block in `wait` or `wait_until`; `set` wakes all of them.
pub struct Event {
    lock: Mutex<bool>,
    cond: Condvar,
}

impl Event {
    /// Create a new, unset `Event`
    pub fn new() -> Event {
        Event {
            lock: Mutex::new(false),
            cond: Condvar::new(),
        }
    }

    // The guarded bool cannot be left half-written by a panic.
    fn guard(&self) -> MutexGuard<bool> {
        self.lock.lock().unwrap_or_else(|err| err.into_inner())
    }

    pub fn is_set(&self) -> bool {
        *self.guard()
    }

    /// Set the flag and wake all waiters. Does nothing if already set.
    pub fn set(&self) {
        let mut guard = self.guard();

        if !*guard {
            *guard = true;
            self.cond.notify_all();
        }
    }

    /// Block until the flag is set
    pub fn wait(&self) {
        let mut guard = self.guard();

        while !*guard {
            guard = self.cond.wait(guard).unwrap_or_else(|err| err.into_inner());
        }
    }

    /// Block until the flag is set or `deadline` passes, returning the flag.
    ///
    /// A `None` deadline waits forever.
    pub fn wait_until(&self, deadline: Option<Instant>) -> bool {
        let deadline = match deadline {
            None => {
                self.wait();
                return true;
            }
            Some(deadline) => deadline,
        };

        let mut guard = self.guard();

        while !*guard {
            let now = Instant::now();
            if now >= deadline {
                break;
            }

            guard = match self.cond.wait_timeout(guard, deadline - now) {
                Ok((guard, _)) => guard,
                Err(err) => err.into_inner().0,
            };
        }

        *guard
    }
}

impl Default for Event {
    fn default() -> Event {
        Event::new()
    }
}

impl fmt::Debug for Event {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.is_set() {
            write!(f, "Event(Set)")
        } else {
            write!(f, "Event(Unset)")
        }
    }
}

#[cfg(test)]
mod test {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::thread;
    use std::time::Duration;

    use super::*;

    #[test]
    fn test_event_set_before_wait() {
        let event = Event::new();
        assert!(!event.is_set());

        event.set();
        event.set();

        assert!(event.is_set());
        event.wait();
        assert!(event.wait_until(Some(Instant::now())));
    }

    #[test]
    fn test_event_thread_notify() {
        let event = Arc::new(Event::new());
        let state = Arc::new(AtomicUsize::new(0));

        let h = {
            let event = event.clone();
            let state = state.clone();

            thread::spawn(move || {
                thread::sleep(Duration::from_millis(10));
                state.store(1, Ordering::SeqCst);
                event.set();
            })
        };

        event.wait();
        assert_eq!(state.load(Ordering::SeqCst), 1);

        h.join().unwrap();
    }

    #[test]
    fn test_event_releases_all_waiters() {
        let event = Arc::new(Event::new());
        let released = Arc::new(AtomicUsize::new(0));

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let event = event.clone();
                let released = released.clone();

                thread::spawn(move || {
                    event.wait();
                    released.fetch_add(1, Ordering::SeqCst);
                })
            })
            .collect();

        thread::sleep(Duration::from_millis(20));
        assert_eq!(released.load(Ordering::SeqCst), 0);

        event.set();

        for h in handles {
            h.join().unwrap();
        }

        assert_eq!(released.load(Ordering::SeqCst), 8);
    }

    #[test]
    fn test_event_wait_until_times_out() {
        let event = Event::new();
        let start = Instant::now();

        assert!(!event.wait_until(Some(start + Duration::from_millis(10))));
        assert!(start.elapsed() >= Duration::from_millis(10));
        assert!(!event.is_set());
    }
}

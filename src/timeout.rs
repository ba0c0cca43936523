// The MIT License (MIT)

// Copyright (c) 2015 Y. T. Chung <zonyitoo@gmail.com>

// Permission is hereby granted, free of charge, to any person obtaining a copy of
// this software and associated documentation files (the "Software"), to deal in
// the Software without restriction, including without limitation the rights to
// use, copy, modify, merge, publish, distribute, sublicense, and/or sell copies of
// the Software, and to permit persons to whom the Software is furnished to do so,
// subject to the following conditions:

// The above copyright notice and this permission notice shall be included in all
// copies or substantial portions of the Software.

// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
// IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY, FITNESS
// FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR
// COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER
// IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN
// CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

//! Absolute deadlines

use std::cmp;
use std::fmt;
use std::thread;
use std::time::{Duration, Instant};

/// A point in time after which waiting is pointless, or "never".
///
/// The relative duration is resolved against `Instant::now()` once, at construction.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Timeout {
    deadline: Option<Instant>,
}

impl Timeout {
    /// Create a `Timeout` that expires `timeout` from now, or never if `None`.
    pub fn new(timeout: Option<Duration>) -> Timeout {
        Timeout { deadline: timeout.map(|dur| Instant::now() + dur) }
    }

    /// A `Timeout` that never expires
    #[inline]
    pub fn never() -> Timeout {
        Timeout { deadline: None }
    }

    #[inline]
    pub fn from_deadline(deadline: Instant) -> Timeout {
        Timeout { deadline: Some(deadline) }
    }

    #[inline]
    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    pub fn expired(&self) -> bool {
        match self.deadline {
            None => false,
            Some(deadline) => Instant::now() >= deadline,
        }
    }

    /// Remaining time until the deadline, `None` if it never expires.
    pub fn time_left(&self) -> Option<Duration> {
        self.deadline.map(|deadline| deadline.saturating_duration_since(Instant::now()))
    }

    /// Put the current thread to sleep for `interval`, but not past the deadline
    pub fn sleep(&self, interval: Duration) {
        let dur = match self.time_left() {
            None => interval,
            Some(left) => cmp::min(left, interval),
        };

        if dur > Duration::from_secs(0) {
            thread::sleep(dur);
        }
    }
}

impl Default for Timeout {
    fn default() -> Timeout {
        Timeout::never()
    }
}

impl From<Option<Duration>> for Timeout {
    fn from(timeout: Option<Duration>) -> Timeout {
        Timeout::new(timeout)
    }
}

impl fmt::Debug for Timeout {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.time_left() {
            None => write!(f, "Timeout(Never)"),
            Some(left) => write!(f, "Timeout({:?} left)", left),
        }
    }
}

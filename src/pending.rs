// The MIT License (MIT)

// Copyright (c) 2015 Y. T. Chung <zonyitoo@gmail.com>

//  Permission is hereby granted, free of charge, to any person obtaining a
//  copy of this software and associated documentation files (the "Software"),
//  to deal in the Software without restriction, including without limitation
//  the rights to use, copy, modify, merge, publish, distribute, sublicense,
//  and/or sell copies of the Software, and to permit persons to whom the
//  Software is furnished to do so, subject to the following conditions:
//
//  The above copyright notice and this permission notice shall be included in
//  all copies or substantial portions of the Software.
//
//  THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS
//  OR IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY,
//  FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE
//  AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER
//  LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING
//  FROM, OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER
//  DEALINGS IN THE SOFTWARE.

//! The eventual outcome of a dispatched call

use std::cmp;
use std::fmt;
use std::mem;
use std::sync::{Arc, Mutex, MutexGuard, Weak};
use std::time::{Duration, Instant};

use crate::connection::Connection;
use crate::error::Error;
use crate::options::Options;
use crate::sync::Event;
use crate::timeout::Timeout;

type Callback<T, E> = Box<dyn FnOnce(&PendingResult<T, E>) + Send + 'static>;

struct State<T, E> {
    outcome: Option<Result<T, E>>,
    callbacks: Vec<Callback<T, E>>,
    // Set while `complete` runs the callbacks outside of the lock.
    // Registrations made meanwhile are queued behind them.
    draining: bool,
    expiry: Timeout,
}

struct Inner<T, E> {
    state: Mutex<State<T, E>>,
    ready: Event,
    conn: Weak<dyn Connection>,
    poll_interval: Duration,
    name: Option<String>,
}

impl<T, E> Inner<T, E> {
    fn lock(&self) -> MutexGuard<State<T, E>> {
        self.state.lock().unwrap_or_else(|err| err.into_inner())
    }

    fn label(&self) -> &str {
        self.name.as_ref().map(|s| &s[..]).unwrap_or("<unnamed>")
    }
}

/// Ends the callback drain of `complete`, also when a callback panics.
struct Drain<'a, T: 'a, E: 'a> {
    inner: &'a Inner<T, E>,
}

impl<'a, T, E> Drop for Drain<'a, T, E> {
    fn drop(&mut self) {
        let stale = {
            let mut state = self.inner.lock();

            if state.draining {
                // Unwinding out of a callback. Whatever is still queued will never run.
                state.draining = false;
                mem::replace(&mut state.callbacks, Vec::new())
            } else {
                Vec::new()
            }
        };

        drop(stale);
        self.inner.ready.set();
    }
}

/// A result that arrives later over a connection.
///
/// The handle is cheap to clone; every clone observes the same outcome. The call
/// dispatcher keeps one clone and calls `complete` when the reply arrives, the caller
/// keeps another and uses `wait`, `is_ready`, `add_callback` or `value`.
///
/// Only a weak reference to the connection is held, so an abandoned result never keeps
/// its connection alive.
pub struct PendingResult<T, E> {
    inner: Arc<Inner<T, E>>,
}

impl<T, E> PendingResult<T, E> {
    /// Create a result bound to `conn`, not ready, never expiring
    pub fn new<C>(conn: &Arc<C>) -> PendingResult<T, E>
        where C: Connection + 'static
    {
        PendingResult::with_options(conn, Options::new())
    }

    /// Create a result bound to `conn` with options
    pub fn with_options<C>(conn: &Arc<C>, opts: Options) -> PendingResult<T, E>
        where C: Connection + 'static
    {
        let conn: Weak<C> = Arc::downgrade(conn);
        let conn: Weak<dyn Connection> = conn;
        PendingResult::from_weak(conn, opts)
    }

    /// Create a result from an already downgraded connection
    pub fn from_weak(conn: Weak<dyn Connection>, opts: Options) -> PendingResult<T, E> {
        PendingResult {
            inner: Arc::new(Inner {
                state: Mutex::new(State {
                    outcome: None,
                    callbacks: Vec::new(),
                    draining: false,
                    expiry: Timeout::new(opts.expiry),
                }),
                ready: Event::new(),
                conn: conn,
                poll_interval: opts.poll_interval,
                name: opts.name,
            }),
        }
    }

    #[inline]
    pub fn name(&self) -> Option<&str> {
        self.inner.name.as_ref().map(|s| &s[..])
    }

    /// Deliver the outcome. `Err` marks the outcome as a remote error.
    ///
    /// Only the first call on a result that has not expired takes effect. Late and
    /// duplicate completions are dropped silently.
    ///
    /// Registered callbacks run on the calling thread in registration order, then every
    /// thread blocked in `wait` is released. A panicking callback propagates to the caller
    /// and discards the callbacks that have not run yet. The result stays completed and
    /// waiters are still released.
    pub fn complete(&self, outcome: Result<T, E>) {
        let mut state = self.inner.lock();

        if state.outcome.is_some() {
            debug!("{}: dropping duplicate completion", self.inner.label());
            return;
        }

        if state.expiry.expired() {
            debug!("{}: dropping completion of expired result", self.inner.label());
            return;
        }

        trace!("{}: completed (error: {})", self.inner.label(), outcome.is_err());

        state.outcome = Some(outcome);
        state.draining = true;
        drop(state);

        let _drain = Drain { inner: &*self.inner };

        loop {
            let callbacks = {
                let mut state = self.inner.lock();
                let callbacks = mem::replace(&mut state.callbacks, Vec::new());

                if callbacks.is_empty() {
                    state.draining = false;
                    break;
                }

                callbacks
            };

            // Callbacks may query this result, so they must not run under the lock
            trace!("{}: running {} callback(s)", self.inner.label(), callbacks.len());
            for cb in callbacks {
                cb(self);
            }
        }
    }

    /// Block until the result arrives or the expiry passes.
    ///
    /// While waiting, the connection is asked to serve inbound messages, one at a time.
    pub fn wait(&self) -> Result<(), Error<E>> {
        loop {
            let expiry = {
                let state = self.inner.lock();
                if state.outcome.is_some() {
                    return Ok(());
                }
                state.expiry
            };

            if expiry.expired() {
                break;
            }

            let conn = match self.inner.conn.upgrade() {
                Some(conn) => conn,
                None => {
                    // Nobody left to serve replies, only a direct `complete` can end this
                    if !self.inner.ready.wait_until(expiry.deadline()) {
                        break;
                    }
                    continue;
                }
            };

            let processed = conn.serve(&expiry);
            drop(conn);

            trace!("{}: served connection (processed: {})", self.inner.label(), processed);

            if processed {
                // Either our reply or one for another call; check again right away
                continue;
            }

            // The reply may be dispatched by another thread, so wait a slice for it
            let slice = Instant::now() + self.inner.poll_interval;
            let until = match expiry.deadline() {
                Some(deadline) => cmp::min(deadline, slice),
                None => slice,
            };
            self.inner.ready.wait_until(Some(until));
        }

        if self.inner.lock().outcome.is_some() {
            return Ok(());
        }

        debug!("{}: result expired", self.inner.label());
        Err(Error::Expired)
    }

    /// Register `f` to run once the result arrives.
    ///
    /// If the result has already arrived, `f` runs immediately on the calling thread.
    ///
    /// While another thread is running the callbacks in `complete`, `f` is queued behind
    /// them instead and runs on that thread, possibly after `add_callback` has returned.
    pub fn add_callback<F>(&self, f: F)
        where F: FnOnce(&PendingResult<T, E>) + Send + 'static
    {
        let mut state = self.inner.lock();

        if state.outcome.is_some() && !state.draining {
            drop(state);
            f(self);
        } else {
            state.callbacks.push(Box::new(f));
        }
    }

    /// Set the expiry relative to now, or `None` to never expire.
    ///
    /// Overwrites any previous expiry.
    pub fn set_expiry(&self, timeout: Option<Duration>) {
        self.inner.lock().expiry = Timeout::new(timeout);
    }

    /// Whether the result has arrived.
    ///
    /// Unless the result has expired, the connection first gets a chance to process
    /// already buffered messages.
    pub fn is_ready(&self) -> bool {
        {
            let state = self.inner.lock();

            if state.outcome.is_some() {
                return true;
            }

            if state.expiry.expired() {
                return false;
            }
        }

        if let Some(conn) = self.inner.conn.upgrade() {
            conn.poll_all();
        }

        self.inner.lock().outcome.is_some()
    }

    /// Whether the result has arrived and is a remote error
    pub fn is_error(&self) -> bool {
        self.is_ready() && match self.inner.lock().outcome {
            Some(Err(..)) => true,
            _ => false,
        }
    }

    /// Whether the expiry passed before the result arrived
    pub fn is_expired(&self) -> bool {
        let state = self.inner.lock();
        state.outcome.is_none() && state.expiry.expired()
    }
}

impl<T, E> PendingResult<T, E>
    where T: Clone,
          E: Clone
{
    /// Wait for the result and return it.
    ///
    /// A remote error is returned as `Error::Remote` holding the delivered error itself.
    pub fn value(&self) -> Result<T, Error<E>> {
        self.wait()?;

        match self.inner.lock().outcome {
            Some(Ok(ref t)) => Ok(t.clone()),
            Some(Err(ref e)) => Err(Error::Remote(e.clone())),
            None => Err(Error::Expired),
        }
    }

    /// The outcome if it has already arrived, without touching the connection
    pub fn try_value(&self) -> Option<Result<T, E>> {
        self.inner.lock().outcome.clone()
    }
}

impl<T, E> Clone for PendingResult<T, E> {
    fn clone(&self) -> PendingResult<T, E> {
        PendingResult { inner: self.inner.clone() }
    }
}

impl<T, E> fmt::Debug for PendingResult<T, E> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let state = self.inner.lock();

        let desc = match state.outcome {
            Some(Ok(..)) => "ready",
            Some(Err(..)) => "error",
            None if state.expiry.expired() => "expired",
            None => "pending",
        };

        write!(f, "PendingResult({}, {})", self.inner.label(), desc)
    }
}

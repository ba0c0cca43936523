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

//! Pending results for calls dispatched over a connection
//!
//! A `PendingResult` is handed to the caller when a call is sent and completed exactly
//! once by the connection's dispatch path when the reply arrives. The caller may poll it,
//! register callbacks, or block on it with an optional expiry. While blocked, the result
//! drives the connection itself, so it works with a dedicated dispatcher thread as well
//! as on a single thread that owns the connection.

#[macro_use]
extern crate log;

use std::sync::Arc;
use std::time::Duration;

pub use crate::connection::Connection;
pub use crate::error::Error;
pub use crate::options::Options;
pub use crate::pending::PendingResult;
pub use crate::timeout::Timeout;

pub mod connection;
pub mod error;
pub mod options;
pub mod pending;
pub mod sync;
pub mod timeout;

/// Pending result configuration. Provides detailed control over how a new result waits.
pub struct Builder {
    opts: Options,
}

impl Builder {
    /// Generates the base configuration, from which configuration methods can be chained.
    pub fn new() -> Builder {
        Builder { opts: Options::new() }
    }

    /// Sets the expiry, relative to the moment the result is built.
    #[inline]
    pub fn expiry(mut self, expiry: Duration) -> Builder {
        self.opts.expiry = Some(expiry);
        self
    }

    /// Sets how long `wait` blocks on the result between two connection rounds.
    #[inline]
    pub fn poll_interval(mut self, interval: Duration) -> Builder {
        self.opts.poll_interval = interval;
        self
    }

    /// Names the result. The name is used for identification in logs and `Debug` output.
    #[inline]
    pub fn name(mut self, name: String) -> Builder {
        self.opts.name = Some(name);
        self
    }

    /// Build a result bound to `conn`
    pub fn build<T, E, C>(self, conn: &Arc<C>) -> PendingResult<T, E>
        where C: Connection + 'static
    {
        PendingResult::with_options(conn, self.opts)
    }
}

impl Default for Builder {
    fn default() -> Builder {
        Builder::new()
    }
}

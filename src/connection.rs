// Copyright 2015 The coio Developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! The connection a result pulls replies through

use crate::timeout::Timeout;

/// Inbound side of a connection, as seen by a waiting result.
///
/// Dispatching a processed reply to the matching `PendingResult::complete` is the
/// implementor's job. A `PendingResult` only holds a weak reference to it.
pub trait Connection: Send + Sync {
    /// Process at most one inbound message, blocking no longer than `timeout`.
    ///
    /// Returns whether a message was processed.
    fn serve(&self, timeout: &Timeout) -> bool;

    /// Process every message that is already buffered, without blocking.
    fn poll_all(&self);
}

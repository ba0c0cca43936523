// Copyright 2015 The coio Developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Errors reported while waiting on a result

use thiserror::Error;

/// Failure observed by `PendingResult::wait` and `PendingResult::value`
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error<E> {
    /// The deadline passed before the result arrived
    #[error("result expired")]
    Expired,

    /// The remote side failed; carries the delivered error untouched
    #[error("remote call failed")]
    Remote(E),
}

impl<E> Error<E> {
    pub fn is_expired(&self) -> bool {
        match *self {
            Error::Expired => true,
            Error::Remote(..) => false,
        }
    }

    /// Take the remote error out, if this is one
    pub fn into_remote(self) -> Option<E> {
        match self {
            Error::Expired => None,
            Error::Remote(err) => Some(err),
        }
    }
}

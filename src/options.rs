// Copyright 2015 The coio Developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Pending result options

use std::default::Default;
use std::time::Duration;

/// Pending result options
#[derive(Debug, Clone)]
pub struct Options {
    pub expiry: Option<Duration>,
    pub poll_interval: Duration,
    pub name: Option<String>,
}

/// Default time `wait` blocks on the readiness signal between two `serve` rounds, 10ms
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(10);

impl Options {
    pub fn new() -> Options {
        Options {
            expiry: None,
            poll_interval: DEFAULT_POLL_INTERVAL,
            name: None,
        }
    }

    pub fn expiry(&mut self, expiry: Option<Duration>) -> &mut Options {
        self.expiry = expiry;
        self
    }

    pub fn poll_interval(&mut self, interval: Duration) -> &mut Options {
        self.poll_interval = interval;
        self
    }

    pub fn name(&mut self, name: String) -> &mut Options {
        self.name = Some(name);
        self
    }
}

impl Default for Options {
    fn default() -> Options {
        Options::new()
    }
}

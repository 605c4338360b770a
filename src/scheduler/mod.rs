// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Per-accessory polling.
//!
//! Every polling accessory owns one [`Poller`] task. A tick is awaited to
//! completion, bounded by a timeout, before the next tick may start, so a
//! slow upstream never produces overlapping requests for the same
//! accessory. Ticks missed while a slow tick was running are delayed rather
//! than fired in a burst.
//!
//! # Example
//!
//! ```no_run
//! use std::time::Duration;
//! use accessory_bridge::scheduler::Poller;
//!
//! # async fn example() {
//! let handle = Poller::new("kitchen", Duration::from_secs(3))
//!     .with_tick_timeout(Duration::from_secs(10))
//!     .spawn(|| async {
//!         // fetch and publish
//!     });
//!
//! handle.stop();
//! # }
//! ```

use std::future::Future;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{MissedTickBehavior, interval, timeout};

/// Repeating timer for one accessory.
#[derive(Debug, Clone)]
pub struct Poller {
    label: String,
    period: Duration,
    tick_timeout: Duration,
}

impl Poller {
    /// Creates a poller firing every `period`. The tick timeout defaults to
    /// the period itself.
    #[must_use]
    pub fn new(label: impl Into<String>, period: Duration) -> Self {
        Self {
            label: label.into(),
            period,
            tick_timeout: period,
        }
    }

    /// Sets the upper bound for a single tick.
    #[must_use]
    pub fn with_tick_timeout(mut self, tick_timeout: Duration) -> Self {
        self.tick_timeout = tick_timeout;
        self
    }

    /// The tick period.
    #[must_use]
    pub fn period(&self) -> Duration {
        self.period
    }

    /// Starts the loop on the current runtime. The first tick fires
    /// immediately.
    pub fn spawn<F, Fut>(self, mut tick: F) -> PollerHandle
    where
        F: FnMut() -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let Self {
            label,
            period,
            tick_timeout,
        } = self;

        tracing::debug!(accessory = %label, period_ms = period.as_millis(), "Starting poller");

        let task = tokio::spawn(async move {
            let mut ticker = interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                if timeout(tick_timeout, tick()).await.is_err() {
                    tracing::warn!(
                        accessory = %label,
                        timeout_ms = tick_timeout.as_millis(),
                        "Poll tick timed out"
                    );
                }
            }
        });

        PollerHandle { task }
    }
}

/// Owner of a running poller. Dropping the handle stops the loop.
#[derive(Debug)]
pub struct PollerHandle {
    task: JoinHandle<()>,
}

impl PollerHandle {
    /// Stops the loop. An in-flight tick is cancelled.
    pub fn stop(&self) {
        self.task.abort();
    }

    /// Whether the loop has ended.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

impl Drop for PollerHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}

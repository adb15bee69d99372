// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Generation tokens for discarding stale view results
//!
//! Every view-producing operation takes a [`Ticket`] when it starts and
//! publishes through [`ViewGeneration::publish`] when it finishes. Starting a
//! newer operation invalidates older tickets, so a slow result that lands
//! after a newer request is dropped instead of shown. In-flight requests are
//! not aborted.

use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::debug;

/// Generation captured when an operation started
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket(u64);

impl Ticket {
    /// Generation number of this ticket
    #[must_use]
    pub fn generation(self) -> u64 {
        self.0
    }
}

/// Monotonic counter of view requests
#[derive(Debug, Default)]
pub struct ViewGeneration {
    current: AtomicU64,
}

impl ViewGeneration {
    /// Counter starting at generation zero
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new operation, invalidating all earlier tickets
    pub fn begin(&self) -> Ticket {
        Ticket(self.current.fetch_add(1, Ordering::SeqCst) + 1)
    }

    /// Latest generation handed out
    pub fn current(&self) -> u64 {
        self.current.load(Ordering::SeqCst)
    }

    /// Whether no newer operation has started since `ticket`
    pub fn is_current(&self, ticket: Ticket) -> bool {
        self.current() == ticket.0
    }

    /// Hand `value` back only if `ticket` is still current
    pub fn publish<T>(&self, ticket: Ticket, value: T) -> Option<T> {
        if self.is_current(ticket) {
            Some(value)
        } else {
            debug!("discarding stale result of generation {} (now {})", ticket.0, self.current());
            None
        }
    }

    /// Run `operation` under a fresh ticket and publish its output
    pub async fn guard<T, Fut>(&self, operation: Fut) -> Option<T>
    where
        Fut: Future<Output = T>,
    {
        let ticket = self.begin();
        let value = operation.await;
        self.publish(ticket, value)
    }
}

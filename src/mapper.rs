// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Bounded concurrent mapping
//!
//! Fan-out against the API goes through [`map_bounded`] so that no more than
//! `limit` requests are in flight at once. Output is index-aligned with the
//! input whatever order the transforms complete in. A failing transform does
//! not cancel its siblings: transforms return their own `Result`/`Option`
//! and callers decide how to treat per-item failures.

use futures::stream::{self, StreamExt};
use std::future::Future;

/// Apply `transform` to every input with at most `limit` transforms in flight
///
/// A `limit` of zero is treated as one.
pub async fn map_bounded<I, O, F, Fut>(
    inputs: impl IntoIterator<Item = I>,
    limit: usize,
    transform: F,
) -> Vec<O>
where
    F: FnMut(I) -> Fut,
    Fut: Future<Output = O>,
{
    stream::iter(inputs)
        .map(transform)
        .buffered(limit.max(1))
        .collect()
        .await
}

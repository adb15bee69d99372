// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Error taxonomy for fetching and resolving catalog records

use thiserror::Error;

/// Failure to retrieve a resource from the upstream API
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    /// The request could not be sent or completed
    #[error("request to {url} failed: {message}")]
    Transport {
        /// Requested URL
        url: String,
        /// Transport-level description
        message: String,
    },

    /// The request completed but upstream answered with a non-success status
    #[error("{url} answered with status {status}")]
    Response {
        /// Requested URL
        url: String,
        /// HTTP status code
        status: u16,
    },

    /// The body was not the expected JSON shape
    #[error("could not decode {url}: {message}")]
    Decode {
        /// Requested URL
        url: String,
        /// Decoder message
        message: String,
    },
}

impl FetchError {
    /// HTTP status for response failures
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Response { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Whether upstream reported the resource as missing
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }
}

/// Failure of a filtered lookup
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LookupError {
    /// Upstream failure while fetching
    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// The record exists but does not satisfy the active filter
    #[error("{name} does not match {filter}")]
    NoMatch {
        /// Record name
        name: String,
        /// Description of the filter that rejected it
        filter: String,
    },
}

impl LookupError {
    /// Whether this is a "no results" signal rather than a failure
    #[must_use]
    pub fn is_no_match(&self) -> bool {
        matches!(self, Self::NoMatch { .. }) || matches!(self, Self::Fetch(e) if e.is_not_found())
    }
}

/// A per-step sub-resolution that failed without aborting the whole operation
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("could not resolve {species}: {reason}")]
pub struct ResolutionGap {
    /// Species whose record is missing
    pub species: String,
    /// Why resolution failed
    pub reason: String,
}

//! Side channel for problems that are recovered locally.
//!
//! Clustering skips malformed entries instead of failing; the skipped entries
//! land here so the presentation layer can still show or count them.

use crate::error::Error;

#[derive(Debug, Default)]
pub struct Diagnostics {
    errors: Vec<Error>,
}

impl Diagnostics {
    pub fn new() -> Self { Self::default() }

    pub fn report(&mut self, error: Error) {
        tracing::warn!(%error, "recovered error");
        self.errors.push(error);
    }

    pub fn len(&self) -> usize { self.errors.len() }

    pub fn is_empty(&self) -> bool { self.errors.is_empty() }

    pub fn errors(&self) -> &[Error] { &self.errors }

    /// Number of reported `MalformedIdentifier` errors.
    pub fn malformed_count(&self) -> usize {
        self.errors.iter().filter(|e| matches!(e, Error::MalformedIdentifier { .. })).count()
    }
}

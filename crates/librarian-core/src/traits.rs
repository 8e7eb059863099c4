use crate::error::Result;
use crate::types::{ParsedUri, RawEntry, RequestHandle, RequestNode};

/// Identifier scheme used to group results by site and edition.
///
/// `parse` must return `Error::MalformedIdentifier` for input it cannot
/// understand; it must never panic.
pub trait UriCanonicalizer: Send + Sync {
    fn parse(&self, uri: &str) -> Result<ParsedUri>;
    /// Short human readable form used when an entry has no title.
    fn display_form(&self, parsed: &ParsedUri) -> String;
}

/// Read access to searches run by an external engine.
pub trait SearchSource: Send + Sync {
    /// Current snapshot of the request tree for `handle`.
    fn snapshot(&self, handle: RequestHandle) -> Result<RequestNode>;
    /// The full result collection of a finished search. Returns
    /// `Error::AbortedSearch` when the engine failed before producing one.
    fn results(&self, handle: RequestHandle) -> Result<Vec<RawEntry>>;
}

//! Domain types shared by the progress and clustering crates.
//!
//! Both the request tree and the result collection are produced by the search
//! engine; this crate only describes their shape so that snapshots can be
//! handed around (and deserialized from JSON) without the engine itself.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::Hasher;
use std::str::FromStr;
use twox_hash::XxHash64;

/// Lifecycle of a request as reported by the search engine.
///
/// Serialized as the engine's state name (`INPROGRESS`, `FINISHED_WITH_ERROR`,
/// ...). Names this crate does not know are kept verbatim in `Other` and
/// treated as still running.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum RequestState {
    Queued,
    InProgress,
    PartialResult,
    Finished,
    FinishedWithError,
    Aborted,
    Other(String),
}

impl RequestState {
    /// Terminal states: no further progress will be reported.
    pub fn is_done(&self) -> bool {
        matches!(self, Self::Finished | Self::FinishedWithError | Self::Aborted)
    }

    /// States in which `current_stage` carries meaningful text.
    pub fn has_stage(&self) -> bool {
        matches!(self, Self::InProgress | Self::PartialResult)
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Queued => "QUEUED",
            Self::InProgress => "INPROGRESS",
            Self::PartialResult => "PARTIALRESULT",
            Self::Finished => "FINISHED",
            Self::FinishedWithError => "FINISHED_WITH_ERROR",
            Self::Aborted => "ABORTED",
            Self::Other(name) => name,
        }
    }
}

impl From<String> for RequestState {
    fn from(name: String) -> Self {
        match name.as_str() {
            "QUEUED" => Self::Queued,
            "INPROGRESS" => Self::InProgress,
            "PARTIALRESULT" => Self::PartialResult,
            "FINISHED" => Self::Finished,
            "FINISHED_WITH_ERROR" => Self::FinishedWithError,
            "ABORTED" => Self::Aborted,
            _ => Self::Other(name),
        }
    }
}

impl From<RequestState> for String {
    fn from(state: RequestState) -> Self {
        match state {
            RequestState::Other(name) => name,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for RequestState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.as_str()) }
}

/// How a fanout node's children should be presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FanoutKind {
    /// One child per named index; each child's subject is `<query>%<index>`.
    PerIndex,
    /// Children are shown one after another with no wrapper.
    Plain,
}

/// Work delegated to sub-requests.
///
/// `kind` is `None` when the engine did not tag the node; consumers then fall
/// back to inspecting the subject.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fanout {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<FanoutKind>,
    pub sub_requests: Vec<RequestNode>,
}

/// One node of the request tree.
///
/// - `subject`: human readable label, may be a composite `<query>%<index>`
/// - `current_stage`: only meaningful while `state.has_stage()`
/// - `parts_done`/`parts_total`: fetch counters, `parts_total == 0` means no
///   quantifiable progress yet
/// - `total_is_final`: whether `parts_total` is exact or a running estimate
/// - `fanout`: `None` for a leaf
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestNode {
    pub subject: String,
    pub state: RequestState,
    #[serde(default)]
    pub current_stage: String,
    #[serde(default)]
    pub parts_done: u64,
    #[serde(default)]
    pub parts_total: u64,
    #[serde(default)]
    pub total_is_final: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fanout: Option<Fanout>,
}

impl RequestNode {
    pub fn leaf(subject: impl Into<String>, state: RequestState) -> Self {
        Self {
            subject: subject.into(),
            state,
            current_stage: String::new(),
            parts_done: 0,
            parts_total: 0,
            total_is_final: false,
            fanout: None,
        }
    }

    pub fn fanout(
        subject: impl Into<String>,
        state: RequestState,
        kind: Option<FanoutKind>,
        sub_requests: Vec<RequestNode>,
    ) -> Self {
        Self { fanout: Some(Fanout { kind, sub_requests }), ..Self::leaf(subject, state) }
    }

    pub fn with_stage(mut self, stage: impl Into<String>) -> Self {
        self.current_stage = stage.into();
        self
    }

    pub fn with_parts(mut self, done: u64, total: u64, total_is_final: bool) -> Self {
        self.parts_done = done;
        self.parts_total = total;
        self.total_is_final = total_is_final;
        self
    }

    pub fn is_done(&self) -> bool { self.state.is_done() }

    pub fn sub_requests(&self) -> Option<&[RequestNode]> {
        self.fanout.as_ref().map(|f| f.sub_requests.as_slice())
    }
}

/// One item of a finished search's result collection.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RawEntry {
    pub uri: String,
    #[serde(default)]
    pub descr: String,
}

impl RawEntry {
    pub fn new(uri: impl Into<String>, descr: impl Into<String>) -> Self {
        Self { uri: uri.into(), descr: descr.into() }
    }
}

/// A result identifier after canonicalization.
///
/// `uri` is the normalized form of the input. When the identifier is an alias
/// of an edition of a mutable site, `edition` holds the edition number and
/// `edition_uri` the rewritten "site + edition" form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ParsedUri {
    pub uri: String,
    pub site_identity: String,
    pub edition: Option<u64>,
    pub edition_uri: Option<String>,
}

impl ParsedUri {
    pub fn is_alias(&self) -> bool { self.edition_uri.is_some() }
}

/// Opaque token used to resume watching an in-flight search across polls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RequestHandle(pub u64);

impl RequestHandle {
    /// Stable handle for a query over an index selection.
    pub fn derive(query: &str, indexes: &str) -> Self {
        let mut hasher = XxHash64::with_seed(0);
        hasher.write(query.trim().as_bytes());
        hasher.write_u8(0);
        hasher.write(indexes.trim().as_bytes());
        Self(hasher.finish())
    }
}

impl fmt::Display for RequestHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "{}", self.0) }
}

impl FromStr for RequestHandle {
    type Err = std::num::ParseIntError;
    fn from_str(s: &str) -> Result<Self, Self::Err> { s.trim().parse().map(Self) }
}

//! Canonicalizer for Freenet-style content keys.
//!
//! Accepted forms (optionally prefixed by `freenet:` or `/`):
//!
//! - `CHK@<routing>,<crypto>,<extra>[/<name>...]`
//! - `SSK@<routing>,<crypto>,<extra>/<docname>[/<meta>...]`
//! - `USK@<routing>,<crypto>,<extra>/<site>/<edition>[/<meta>...]`
//! - `KSK@<name>[/<meta>...]`
//!
//! An SSK whose docname ends in `-<n>` is an alias of edition `n` of the USK
//! `<site>`. The site identity of a key is its type, key material and site
//! name, with edition and metadata path removed.

use regex::Regex;
use std::fmt;
use std::sync::LazyLock;

use librarian_core::error::{Error, Result};
use librarian_core::traits::UriCanonicalizer;
use librarian_core::types::ParsedUri;

static KEY_PART: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[A-Za-z0-9~_\-]+$").expect("key part regex"));
static EDITION_SUFFIX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^(.+)-([0-9]+)$").expect("edition suffix regex"));

/// Characters of the routing key kept in the short display form.
const SHORT_ROUTING_LEN: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum KeyType {
    Chk,
    Ssk,
    Usk,
    Ksk,
}

impl KeyType {
    fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_uppercase().as_str() {
            "CHK" => Some(Self::Chk),
            "SSK" => Some(Self::Ssk),
            "USK" => Some(Self::Usk),
            "KSK" => Some(Self::Ksk),
            _ => None,
        }
    }

    fn as_str(self) -> &'static str {
        match self {
            Self::Chk => "CHK",
            Self::Ssk => "SSK",
            Self::Usk => "USK",
            Self::Ksk => "KSK",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct ContentKey {
    kind: KeyType,
    key: String,
    docname: Option<String>,
    edition: Option<i64>,
    meta: Vec<String>,
}

impl ContentKey {
    fn parse(raw: &str) -> Result<Self> {
        let trimmed = raw.trim();
        let without_scheme = match trimmed.get(..8) {
            Some(prefix) if prefix.eq_ignore_ascii_case("freenet:") => &trimmed[8..],
            _ => trimmed,
        };
        let s = without_scheme.trim_start_matches('/');
        let (kind, rest) = s.split_once('@').ok_or_else(|| Error::malformed(raw, "missing '@'"))?;
        let kind = KeyType::parse(kind).ok_or_else(|| Error::malformed(raw, format!("unknown key type '{}'", kind)))?;

        let mut segments: Vec<&str> = rest.split('/').collect();
        while segments.len() > 1 && segments.last().is_some_and(|s| s.is_empty()) {
            segments.pop();
        }
        let mut segments = segments.into_iter();
        let key = segments.next().unwrap_or_default();
        if key.is_empty() {
            return Err(Error::malformed(raw, "empty key"));
        }
        if kind != KeyType::Ksk {
            let parts: Vec<&str> = key.split(',').collect();
            if parts.len() != 3 || !parts.iter().all(|p| KEY_PART.is_match(p)) {
                return Err(Error::malformed(raw, "key must be three comma separated parts"));
            }
        }

        let docname = match kind {
            KeyType::Ksk => None,
            _ => segments.next().map(str::to_string),
        };
        let edition = if kind == KeyType::Usk {
            if docname.as_deref().map_or(true, str::is_empty) {
                return Err(Error::malformed(raw, "USK without site name"));
            }
            let ed = segments.next().ok_or_else(|| Error::malformed(raw, "USK without edition"))?;
            Some(ed.parse::<i64>().map_err(|_| Error::malformed(raw, format!("bad edition '{}'", ed)))?)
        } else {
            None
        };
        if kind == KeyType::Ssk && docname.as_deref().map_or(true, str::is_empty) {
            return Err(Error::malformed(raw, "SSK without document name"));
        }
        let meta = segments.map(str::to_string).collect();
        Ok(Self { kind, key: key.to_string(), docname, edition, meta })
    }

    /// `(site, edition)` when this SSK stands in for a USK edition.
    fn usk_alias(&self) -> Option<(&str, u64)> {
        if self.kind != KeyType::Ssk {
            return None;
        }
        let caps = EDITION_SUFFIX.captures(self.docname.as_deref()?)?;
        let site = caps.get(1)?.as_str();
        let edition = caps.get(2)?.as_str().parse().ok()?;
        Some((site, edition))
    }

    fn to_usk(&self) -> Option<Self> {
        let (site, edition) = self.usk_alias()?;
        Some(Self {
            kind: KeyType::Usk,
            key: self.key.clone(),
            docname: Some(site.to_string()),
            edition: Some(i64::try_from(edition).ok()?),
            meta: self.meta.clone(),
        })
    }

    fn site_identity(&self) -> String {
        match &self.docname {
            Some(doc) => format!("{}@{}/{}", self.kind.as_str(), self.key, doc),
            None => format!("{}@{}", self.kind.as_str(), self.key),
        }
    }

    fn short_form(&self) -> String {
        let mut out = format!("{}@", self.kind.as_str());
        if self.kind == KeyType::Ksk {
            out.push_str(&self.key);
        } else {
            let routing = self.key.split(',').next().unwrap_or_default();
            out.extend(routing.chars().take(SHORT_ROUTING_LEN));
            out.push_str("...");
        }
        self.write_path(&mut out);
        out
    }

    fn write_path(&self, out: &mut String) {
        if let Some(doc) = &self.docname {
            out.push('/');
            out.push_str(doc);
        }
        if let Some(ed) = self.edition {
            out.push('/');
            out.push_str(&ed.to_string());
        }
        for m in &self.meta {
            out.push('/');
            out.push_str(m);
        }
    }
}

impl fmt::Display for ContentKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut out = format!("{}@{}", self.kind.as_str(), self.key);
        self.write_path(&mut out);
        f.write_str(&out)
    }
}

/// `UriCanonicalizer` for Freenet content keys.
#[derive(Debug, Clone, Copy, Default)]
pub struct FreenetKeys;

impl UriCanonicalizer for FreenetKeys {
    fn parse(&self, uri: &str) -> Result<ParsedUri> {
        let key = ContentKey::parse(uri)?;
        let alias = key.to_usk();
        let site_identity = alias.as_ref().unwrap_or(&key).site_identity();
        Ok(ParsedUri {
            uri: key.to_string(),
            site_identity,
            edition: key.usk_alias().map(|(_, ed)| ed),
            edition_uri: alias.map(|usk| usk.to_string()),
        })
    }

    fn display_form(&self, parsed: &ParsedUri) -> String {
        ContentKey::parse(&parsed.uri).map(|k| k.short_form()).unwrap_or_else(|_| parsed.uri.clone())
    }
}

//! Parsing of the index list a search runs against.
//!
//! The raw form is whatever the user typed plus any ticked bookmarks, joined
//! by spaces or semicolons. Bookmarks are written `<prefix><name>`.

/// Indexes a search runs against, split into known bookmarks and other
/// index URIs. Order of first appearance is kept in both lists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexSelection {
    pub bookmarks: Vec<String>,
    pub others: Vec<String>,
}

impl IndexSelection {
    pub fn parse(raw: &str, bookmark_prefix: &str, known_bookmarks: &[String], default_index: &str) -> Self {
        let mut bookmarks: Vec<String> = Vec::new();
        let mut others: Vec<String> = Vec::new();
        for token in raw.split([' ', ';']).map(str::trim).filter(|t| !t.is_empty()) {
            let is_bookmark = token
                .strip_prefix(bookmark_prefix)
                .is_some_and(|name| known_bookmarks.iter().any(|k| k == name));
            let target = if is_bookmark { &mut bookmarks } else { &mut others };
            if !target.iter().any(|t| t == token) { target.push(token.to_string()); }
        }
        if bookmarks.is_empty() && others.is_empty() {
            others.push(default_index.to_string());
        }
        Self { bookmarks, others }
    }

    /// Names of the selected bookmarks without the prefix.
    pub fn bookmark_names<'a>(&'a self, bookmark_prefix: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.bookmarks.iter().filter_map(move |b| b.strip_prefix(bookmark_prefix))
    }

    pub fn len(&self) -> usize { self.bookmarks.len() + self.others.len() }

    pub fn is_empty(&self) -> bool { self.len() == 0 }

    /// Whether more than one index is searched, i.e. the engine fans out per index.
    pub fn is_multi_index(&self) -> bool { self.len() > 1 }

    pub fn to_index_string(&self) -> String {
        self.bookmarks.iter().chain(self.others.iter()).map(String::as_str).collect::<Vec<_>>().join(" ")
    }
}

/// Whether a search page should poll again: only while a non-empty query is
/// still running and no errors are waiting to be shown.
pub fn should_refresh(query: &str, search_done: bool, pending_errors: usize) -> bool {
    !query.trim().is_empty() && !search_done && pending_errors == 0
}

use crate::error::FilterError;

/// Terms that are always blocked, whatever else is configured.
pub const DEFAULT_BLOCKLIST: &[&str] = &["admin"];

/// Case-insensitive substring blocklist applied to inbound chat.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentFilter {
    /// Lowercased, non-empty terms.
    terms: Vec<String>,
}

impl ContentFilter {
    /// Build a filter from configured terms on top of [`DEFAULT_BLOCKLIST`].
    ///
    /// Terms are trimmed and lowercased, blank entries are dropped and the
    /// result is sorted without duplicates.
    pub fn new<I, S>(terms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let configured = terms
            .into_iter()
            .map(|t| t.as_ref().trim().to_lowercase())
            .filter(|t| !t.is_empty());
        let mut terms: Vec<String> = DEFAULT_BLOCKLIST
            .iter()
            .map(|t| (*t).to_owned())
            .chain(configured)
            .collect();
        terms.sort_unstable();
        terms.dedup();
        Self { terms }
    }

    pub fn terms(&self) -> &[String] {
        &self.terms
    }

    /// Return the first blocklist entry contained in `text`, if any.
    pub fn matched_term(&self, text: &str) -> Option<&str> {
        let lowered = text.to_lowercase();
        self.terms
            .iter()
            .find(|term| lowered.contains(term.as_str()))
            .map(String::as_str)
    }

    /// Reject `text` when it contains a blocked term.
    pub fn check(&self, text: &str) -> Result<(), FilterError> {
        match self.matched_term(text) {
            Some(term) => Err(FilterError::FilteredContent {
                term: term.to_owned(),
            }),
            None => Ok(()),
        }
    }
}

impl Default for ContentFilter {
    fn default() -> Self {
        Self::new(DEFAULT_BLOCKLIST)
    }
}

//! Keyword lexicon used by the OCR classifier.

use std::collections::HashSet;

/// A deduplicated, lowercase set of terms.
///
/// Built once from configuration and never mutated afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeywordLexicon {
    terms: HashSet<String>,
}

impl KeywordLexicon {
    /// Builds a lexicon from any collection of terms.
    ///
    /// Terms are trimmed and lowercased; blank entries are dropped.
    pub fn new<I, S>(terms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let terms = terms
            .into_iter()
            .map(|t| t.as_ref().trim().to_lowercase())
            .filter(|t| !t.is_empty())
            .collect();
        Self { terms }
    }

    /// The union of a type-specific list and the general list.
    pub fn combined<A, B>(specific: &[A], general: &[B]) -> Self
    where
        A: AsRef<str>,
        B: AsRef<str>,
    {
        Self::new(
            specific
                .iter()
                .map(AsRef::as_ref)
                .chain(general.iter().map(AsRef::as_ref)),
        )
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    pub fn contains(&self, term: &str) -> bool {
        self.terms.contains(term)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.terms.iter().map(String::as_str)
    }

    /// Counts the lexicon entries present in `tokens`.
    pub fn count_matches(&self, tokens: &HashSet<String>) -> usize {
        self.terms.iter().filter(|t| tokens.contains(*t)).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_combined_deduplicates_case_insensitively() {
        let lexicon = KeywordLexicon::combined(&["Invoice", "tax"], &["invoice", "TOTAL", " "]);
        assert_eq!(lexicon.len(), 3);
        assert!(lexicon.contains("invoice"));
        assert!(lexicon.contains("total"));
        assert!(!lexicon.contains("TOTAL"));
    }

    #[test]
    fn test_count_matches() {
        let lexicon = KeywordLexicon::new(["tax", "total", "unit price"]);
        let tokens: HashSet<String> = ["tax", "unit", "price"].iter().map(|s| s.to_string()).collect();
        assert_eq!(lexicon.count_matches(&tokens), 1);
    }
}

//! Locating tax names inside OCR text, ignoring case and diacritics.

use serde::{Deserialize, Serialize};

use super::text::fold;

/// Which name occurrence wins when several tax names are found in a line.
///
/// Each name is located at its first occurrence; the policy then decides
/// between names. Ties on position go to the name listed first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchPolicy {
    /// Smallest position wins.
    #[default]
    Earliest,
    /// Largest position wins.
    Latest,
}

/// A tax name located in folded text. Offsets are byte offsets into the
/// folded haystack.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NameMatch {
    /// Index of the matched name in the list the matcher was built from.
    pub name: usize,
    pub start: usize,
    pub end: usize,
}

/// Tax names folded once, reused for every line and word of a document.
#[derive(Debug, Clone)]
pub struct NameMatcher {
    needles: Vec<String>,
    policy: MatchPolicy,
}

impl NameMatcher {
    pub fn new<S: AsRef<str>>(names: &[S], policy: MatchPolicy) -> Self {
        Self {
            needles: names.iter().map(|n| fold(n.as_ref().trim())).collect(),
            policy,
        }
    }

    /// Check if there is at least one usable (non-blank) name.
    pub fn is_empty(&self) -> bool {
        self.needles.iter().all(|n| n.is_empty())
    }

    pub fn policy(&self) -> MatchPolicy {
        self.policy
    }

    /// Locate the winning name occurrence in an already folded haystack.
    pub fn find(&self, folded: &str) -> Option<NameMatch> {
        let mut best: Option<NameMatch> = None;

        for (name, needle) in self.needles.iter().enumerate() {
            if needle.is_empty() {
                continue;
            }
            let Some(start) = folded.find(needle.as_str()) else {
                continue;
            };
            let found = NameMatch {
                name,
                start,
                end: start + needle.len(),
            };

            best = match best {
                None => Some(found),
                Some(current) => {
                    let better = match self.policy {
                        MatchPolicy::Earliest => found.start < current.start,
                        MatchPolicy::Latest => found.start > current.start,
                    };
                    if better { Some(found) } else { Some(current) }
                }
            };
        }

        best
    }

    /// Check if `text` equals one of the names, ignoring case, diacritics and
    /// surrounding whitespace.
    pub fn is_name(&self, text: &str) -> bool {
        let folded = fold(text.trim());
        !folded.is_empty() && self.needles.iter().any(|n| *n == folded)
    }
}

/// Character index of the winning tax name occurrence in `haystack`.
///
/// The index counts characters of the folded haystack (diacritics stripped,
/// lowercased).
pub fn match_index<S: AsRef<str>>(
    haystack: &str,
    needles: &[S],
    policy: MatchPolicy,
) -> Option<usize> {
    let folded = fold(haystack);
    NameMatcher::new(needles, policy)
        .find(&folded)
        .map(|m| folded[..m.start].chars().count())
}

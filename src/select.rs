//! Free-form selection parsing against an ordered candidate list.
//!
//! The prompt layer owns the re-ask loop; this module is the pure contract it
//! drives: feed one line of user text and the candidate listing in, get back
//! either a concrete subset or `None` ("ask again").

/// A resolved, deduplicated subset of candidate names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    names: Vec<String>,
    all_selected: bool,
}

impl Selection {
    /// The chosen names, in first-occurrence order.
    #[must_use]
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// True when the user answered `all`.
    ///
    /// Consumed downstream to skip the finer-grained prompt: selecting `all`
    /// at the database level auto-selects every collection within each
    /// database without a second question.
    #[must_use]
    pub fn all_selected(&self) -> bool {
        self.all_selected
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Consume the selection, yielding the chosen names.
    #[must_use]
    pub fn into_names(self) -> Vec<String> {
        self.names
    }
}

/// Resolve one line of input against an ordered candidate list.
///
/// Accepted forms, comma-separated and mixable:
/// - `all` (case-insensitive): every candidate, in candidate order;
/// - a 1-based index into the listing (out-of-range indices are silently
///   dropped);
/// - a literal candidate name (unknown names are silently dropped).
///
/// Returns `None` when nothing valid was selected - the caller re-prompts.
#[must_use]
pub fn resolve(input: &str, candidates: &[String]) -> Option<Selection> {
    let input = input.trim();

    if input.eq_ignore_ascii_case("all") {
        if candidates.is_empty() {
            return None;
        }
        return Some(Selection {
            names: candidates.to_vec(),
            all_selected: true,
        });
    }

    let mut names: Vec<String> = Vec::new();
    for token in input.split(',').map(str::trim).filter(|t| !t.is_empty()) {
        let resolved = if token.bytes().all(|b| b.is_ascii_digit()) {
            token
                .parse::<usize>()
                .ok()
                .and_then(|n| n.checked_sub(1))
                .and_then(|i| candidates.get(i))
                .cloned()
        } else {
            candidates.iter().find(|c| *c == token).cloned()
        };

        match resolved {
            Some(name) if !names.contains(&name) => names.push(name),
            _ => {}
        }
    }

    if names.is_empty() {
        None
    } else {
        Some(Selection {
            names,
            all_selected: false,
        })
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn candidates() -> Vec<String> {
        vec!["a".to_string(), "b".to_string(), "c".to_string()]
    }

    #[test]
    fn test_all_selects_everything_in_order() {
        let sel = resolve("all", &candidates()).unwrap();
        assert_eq!(sel.names(), ["a", "b", "c"]);
        assert!(sel.all_selected());
    }

    #[test]
    fn test_all_is_case_insensitive() {
        assert!(resolve(" ALL ", &candidates()).unwrap().all_selected());
    }

    #[test]
    fn test_all_with_no_candidates_is_invalid() {
        assert_eq!(resolve("all", &[]), None);
    }

    #[test]
    fn test_mixed_index_and_name_deduplicated() {
        // "2" resolves to "b" first, then the literal "a".
        let sel = resolve("2,a", &candidates()).unwrap();
        assert_eq!(sel.names(), ["b", "a"]);
        assert!(!sel.all_selected());
    }

    #[test]
    fn test_duplicates_keep_first_occurrence() {
        let sel = resolve("b, 2, a, b", &candidates()).unwrap();
        assert_eq!(sel.names(), ["b", "a"]);
    }

    #[test]
    fn test_out_of_range_index_is_dropped() {
        assert_eq!(resolve("9", &["a".to_string(), "b".to_string()]), None);
        assert_eq!(resolve("0", &candidates()), None);
    }

    #[test]
    fn test_empty_input_is_invalid() {
        assert_eq!(resolve("", &candidates()), None);
        assert_eq!(resolve("  ,  , ", &candidates()), None);
    }

    #[test]
    fn test_unknown_names_dropped_but_valid_kept() {
        let sel = resolve("nope,c", &candidates()).unwrap();
        assert_eq!(sel.names(), ["c"]);
    }

    #[test]
    fn test_huge_index_does_not_panic() {
        assert_eq!(resolve("99999999999999999999999999", &candidates()), None);
    }
}

//! Purpose registry
//!
//! Every purpose the current configuration knows about: the default purpose
//! and each value of the mode, name and regexp tables, deduplicated.

use indexmap::IndexSet;

use crate::symbol::Purpose;

/// Union `default` with `values`, keeping first-seen order.
///
/// The default purpose always comes first.
pub fn collect(default: Purpose, values: impl IntoIterator<Item = Purpose>) -> IndexSet<Purpose> {
    let mut known = IndexSet::new();
    known.insert(default);
    known.extend(values);
    known
}

/// The same purposes sorted by name, for prompts and listings.
pub fn sorted(known: &IndexSet<Purpose>) -> Vec<Purpose> {
    let mut purposes: Vec<_> = known.iter().copied().collect();
    purposes.sort();
    purposes
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_comes_first() {
        let known = collect(
            Purpose::new("edit"),
            [Purpose::new("coding"), Purpose::new("edit")],
        );
        let names: Vec<_> = known.iter().map(|p| p.name()).collect();
        assert_eq!(names, vec!["edit", "coding"]);
    }

    #[test]
    fn test_duplicates_collapse() {
        let known = collect(
            Purpose::new("general"),
            ["a", "b", "a", "b", "general"].map(Purpose::new),
        );
        assert_eq!(known.len(), 3);
    }

    #[test]
    fn test_sorted() {
        let known = collect(Purpose::new("m"), ["z", "a"].map(Purpose::new));
        let names: Vec<_> = sorted(&known).iter().map(|p| p.name()).collect();
        assert_eq!(names, vec!["a", "m", "z"]);
    }
}

//! Client-side search over item names.

use pantry_core::ItemName;

/// Case-insensitive substring match of `name` against the search text.
///
/// An empty query matches everything.
pub fn matches_search(name: &ItemName, query: &str) -> bool {
    if query.is_empty() {
        return true;
    }
    name.as_str().to_lowercase().contains(&query.to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn name(s: &str) -> ItemName {
        ItemName::parse(s).unwrap()
    }

    #[test]
    fn substring_match_ignores_case() {
        assert!(matches_search(&name("Banana"), "an"));
        assert!(matches_search(&name("banana"), "AN"));
        assert!(!matches_search(&name("apple"), "an"));
        assert!(!matches_search(&name("grape"), "an"));
    }

    #[test]
    fn empty_query_matches_everything() {
        assert!(matches_search(&name("apple"), ""));
    }
}

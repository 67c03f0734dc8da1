use std::collections::HashSet;

use crate::contacts::Contact;

/// Normalize a free-text query for matching: trim and lowercase.
/// Returns `None` when nothing is left, which matches every contact.
pub fn normalize_query(query: &str) -> Option<String> {
    let trimmed = query.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_lowercase())
    }
}

fn matches_text(contact: &Contact, needle: &str) -> bool {
    [&contact.first_name, &contact.last_name, &contact.email]
        .iter()
        .any(|field| field.to_lowercase().contains(needle))
}

fn matches_tags(contact: &Contact, required: &HashSet<String>) -> bool {
    required
        .iter()
        .all(|id| contact.tags.iter().any(|tag| tag == id))
}

/// Derive the visible subset of `contacts` for a free-text query and a
/// set of required tag ids. The text test is a case-insensitive substring
/// match on first name, last name, or email; the tag test requires every
/// id in `tag_filter` to be on the contact. Repository order is kept.
pub fn filter<'a>(
    contacts: &'a [Contact],
    query: &str,
    tag_filter: &HashSet<String>,
) -> Vec<&'a Contact> {
    let needle = normalize_query(query);
    contacts
        .iter()
        .filter(|contact| {
            needle
                .as_deref()
                .map_or(true, |needle| matches_text(contact, needle))
        })
        .filter(|contact| matches_tags(contact, tag_filter))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn contact(id: &str, first: &str, last: &str, email: &str, tags: &[&str]) -> Contact {
        Contact {
            id: id.to_string(),
            first_name: first.to_string(),
            last_name: last.to_string(),
            email: email.to_string(),
            phone: String::new(),
            tags: tags.iter().map(|tag| tag.to_string()).collect(),
        }
    }

    fn sample() -> Vec<Contact> {
        vec![
            contact("a", "Ada", "Lovelace", "ada@analytical.org", &["x", "y"]),
            contact("b", "Alan", "Turing", "alan@bletchley.uk", &["x"]),
            contact("c", "Grace", "Hopper", "grace@navy.mil", &[]),
        ]
    }

    fn ids(result: &[&Contact]) -> Vec<String> {
        result.iter().map(|contact| contact.id.clone()).collect()
    }

    #[test]
    fn test_normalize_query() {
        assert_eq!(normalize_query("  Ada  "), Some("ada".to_string()));
        assert_eq!(normalize_query("   "), None);
        assert_eq!(normalize_query(""), None);
    }

    #[test]
    fn test_identity_filter_preserves_order() {
        let contacts = sample();
        let result = filter(&contacts, "", &HashSet::new());
        assert_eq!(ids(&result), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_text_match_is_case_insensitive_substring() {
        let contacts = sample();
        assert_eq!(ids(&filter(&contacts, "ADA", &HashSet::new())), vec!["a"]);
        assert_eq!(ids(&filter(&contacts, "urin", &HashSet::new())), vec!["b"]);
        assert_eq!(
            ids(&filter(&contacts, "navy.mil", &HashSet::new())),
            vec!["c"]
        );
    }

    #[test]
    fn test_query_is_trimmed_before_matching() {
        let contacts = sample();
        assert_eq!(ids(&filter(&contacts, "  ada ", &HashSet::new())), vec!["a"]);
    }

    #[test]
    fn test_tag_filter_requires_every_tag() {
        let contacts = sample();
        let both: HashSet<String> = ["x", "y"].iter().map(|s| s.to_string()).collect();
        assert_eq!(ids(&filter(&contacts, "", &both)), vec!["a"]);

        let x_only: HashSet<String> = ["x"].iter().map(|s| s.to_string()).collect();
        assert_eq!(ids(&filter(&contacts, "", &x_only)), vec!["a", "b"]);
    }

    #[test]
    fn test_text_and_tags_combine() {
        let contacts = sample();
        let x_only: HashSet<String> = ["x"].iter().map(|s| s.to_string()).collect();
        assert_eq!(ids(&filter(&contacts, "alan", &x_only)), vec!["b"]);
        assert!(filter(&contacts, "grace", &x_only).is_empty());
    }

    #[test]
    fn test_unknown_tag_matches_nothing() {
        let contacts = sample();
        let ghost: HashSet<String> = ["ghost"].iter().map(|s| s.to_string()).collect();
        assert!(filter(&contacts, "", &ghost).is_empty());
    }
}

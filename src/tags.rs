use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A user-defined contact category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    pub id: String,
    pub name: String,
}

/// Tags seeded into a fresh store. The ids are stable; only the display
/// names are localized.
pub fn default_tags() -> Vec<Tag> {
    vec![
        Tag {
            id: "family".to_string(),
            name: "Family".to_string(),
        },
        Tag {
            id: "friends".to_string(),
            name: "Friends".to_string(),
        },
        Tag {
            id: "coworkers".to_string(),
            name: "Coworkers".to_string(),
        },
    ]
}

/// Ordered tag collection. Append, rename in place, and remove are the
/// only operations; there is no reordering.
///
/// Serialized transparently as a bare array, the shape the application
/// has always persisted.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TagRegistry {
    tags: Vec<Tag>,
}

impl TagRegistry {
    pub fn new(tags: Vec<Tag>) -> Self {
        Self { tags }
    }

    pub fn tags(&self) -> &[Tag] {
        &self.tags
    }

    pub fn len(&self) -> usize {
        self.tags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Tag> {
        self.tags.iter().find(|tag| tag.id == id)
    }

    /// Display name for a tag id. Ids with no registry entry (a tag
    /// deleted after being assigned) fall back to the raw id.
    pub fn display_name<'a>(&'a self, id: &'a str) -> &'a str {
        match self.get(id) {
            Some(tag) => &tag.name,
            None => id,
        }
    }

    /// Append a new tag with a fresh id. Names are trimmed; a name that
    /// trims to nothing is ignored. Duplicate names are allowed.
    pub fn add(&mut self, name: &str) -> bool {
        let name = name.trim();
        if name.is_empty() {
            return false;
        }
        self.tags.push(Tag {
            id: Uuid::new_v4().to_string(),
            name: name.to_string(),
        });
        true
    }

    /// Rename a tag in place, keeping its id and position. Unknown ids
    /// are ignored; a replacement that trims to nothing keeps the
    /// current name.
    pub fn rename(&mut self, id: &str, new_name: &str) -> bool {
        let Some(tag) = self.tags.iter_mut().find(|tag| tag.id == id) else {
            return false;
        };
        let new_name = new_name.trim();
        if new_name.is_empty() || new_name == tag.name {
            return false;
        }
        tag.name = new_name.to_string();
        true
    }

    /// Remove the tag with the given id. Unknown ids are ignored.
    /// Contacts referencing the id keep the stale reference.
    pub fn remove(&mut self, id: &str) -> bool {
        let before = self.tags.len();
        self.tags.retain(|tag| tag.id != id);
        self.tags.len() != before
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_trims_and_generates_id() {
        let mut registry = TagRegistry::default();
        assert!(registry.add("  VIP  "));
        assert_eq!(registry.len(), 1);
        let tag = &registry.tags()[0];
        assert_eq!(tag.name, "VIP");
        assert!(!tag.id.is_empty());
    }

    #[test]
    fn test_add_empty_name_is_ignored() {
        let mut registry = TagRegistry::default();
        assert!(!registry.add("   "));
        assert!(registry.is_empty());
    }

    #[test]
    fn test_add_allows_duplicate_names() {
        let mut registry = TagRegistry::default();
        registry.add("work");
        registry.add("work");
        assert_eq!(registry.len(), 2);
        assert_ne!(registry.tags()[0].id, registry.tags()[1].id);
    }

    #[test]
    fn test_rename_replaces_in_place() {
        let mut registry = TagRegistry::new(default_tags());
        assert!(registry.rename("friends", "Pals"));
        assert_eq!(registry.tags()[1].id, "friends");
        assert_eq!(registry.tags()[1].name, "Pals");
    }

    #[test]
    fn test_rename_to_empty_keeps_old_name() {
        let mut registry = TagRegistry::new(default_tags());
        assert!(!registry.rename("friends", "   "));
        assert_eq!(registry.get("friends").unwrap().name, "Friends");
    }

    #[test]
    fn test_rename_unknown_id_is_noop() {
        let mut registry = TagRegistry::new(default_tags());
        assert!(!registry.rename("nope", "Anything"));
        assert_eq!(registry.len(), 3);
    }

    #[test]
    fn test_remove_by_id() {
        let mut registry = TagRegistry::new(default_tags());
        assert!(registry.remove("family"));
        assert!(registry.get("family").is_none());
        assert_eq!(registry.len(), 2);
        assert!(!registry.remove("family"));
    }

    #[test]
    fn test_display_name_falls_back_to_raw_id() {
        let registry = TagRegistry::new(default_tags());
        assert_eq!(registry.display_name("family"), "Family");
        assert_eq!(registry.display_name("gone-id"), "gone-id");
    }
}

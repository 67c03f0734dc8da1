use std::collections::HashSet;

use crate::contacts::{Contact, ContactPayload, ContactRepository};
use crate::query;
use crate::selection::Selection;
use crate::store::{Store, CONTACTS_KEY, TAGS_KEY};
use crate::tags::{default_tags, TagRegistry};

/// Top-level application state: the contact repository, the tag registry,
/// and the transient selection, with both collections mirrored to the
/// store after every mutation.
///
/// Mutations that turn out to be no-ops (stale ids, empty tag names) do
/// not touch the store.
pub struct Workspace {
    store: Store,
    contacts: ContactRepository,
    tags: TagRegistry,
    pub selection: Selection,
}

impl Workspace {
    /// Load both collections from the store. A missing or unreadable
    /// contacts entry yields an empty repository; a missing or unreadable
    /// tags entry yields the seeded defaults.
    pub fn load(store: Store) -> Self {
        let contacts = store.load(CONTACTS_KEY, ContactRepository::default());
        let tags = store.load(TAGS_KEY, TagRegistry::new(default_tags()));
        Self {
            store,
            contacts,
            tags,
            selection: Selection::default(),
        }
    }

    pub fn contacts(&self) -> &[Contact] {
        self.contacts.contacts()
    }

    pub fn contact(&self, id: &str) -> Option<&Contact> {
        self.contacts.get(id)
    }

    pub fn contact_count(&self) -> usize {
        self.contacts.len()
    }

    pub fn tags(&self) -> &TagRegistry {
        &self.tags
    }

    /// The visible subset for a free-text query and required tag ids, in
    /// repository order. Pure; callers re-derive it after every change.
    pub fn filtered(&self, query: &str, tag_filter: &HashSet<String>) -> Vec<&Contact> {
        query::filter(self.contacts.contacts(), query, tag_filter)
    }

    pub fn add_contact(&mut self, payload: ContactPayload) -> String {
        let id = self.contacts.add(payload);
        self.persist_contacts();
        id
    }

    pub fn update_contact(&mut self, id: &str, payload: ContactPayload) {
        if self.contacts.update(id, payload) {
            self.persist_contacts();
        }
    }

    pub fn delete_contact(&mut self, id: &str) {
        if self.contacts.remove(id) {
            self.persist_contacts();
        }
    }

    /// Remove every contact whose id is in `ids`, then drop the whole
    /// selection, including entries that matched nothing.
    pub fn bulk_delete(&mut self, ids: &HashSet<String>) -> usize {
        let removed = self.contacts.remove_all(ids);
        self.selection.clear();
        if removed > 0 {
            self.persist_contacts();
        }
        removed
    }

    pub fn add_tag(&mut self, name: &str) -> bool {
        let added = self.tags.add(name);
        if added {
            self.persist_tags();
        }
        added
    }

    pub fn rename_tag(&mut self, id: &str, new_name: &str) {
        if self.tags.rename(id, new_name) {
            self.persist_tags();
        }
    }

    /// Remove a tag from the registry. Contact records keep any stale
    /// reference to the removed id.
    pub fn remove_tag(&mut self, id: &str) {
        if self.tags.remove(id) {
            self.persist_tags();
        }
    }

    fn persist_contacts(&self) {
        self.store.save(CONTACTS_KEY, &self.contacts);
    }

    fn persist_tags(&self) {
        self.store.save(TAGS_KEY, &self.tags);
    }
}

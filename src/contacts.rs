use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A single address book record.
///
/// `tags` holds tag ids, not names; it may reference ids that no longer
/// exist in the registry, which the UI renders as the raw id. Field names
/// are serialized in camelCase so existing store entries keep parsing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Contact {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl Contact {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// The form fields of a contact, everything except the identity.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactPayload {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub tags: Vec<String>,
}

/// Ordered contact collection, most recent first.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContactRepository {
    contacts: Vec<Contact>,
}

impl ContactRepository {
    pub fn new(contacts: Vec<Contact>) -> Self {
        Self { contacts }
    }

    pub fn contacts(&self) -> &[Contact] {
        &self.contacts
    }

    pub fn len(&self) -> usize {
        self.contacts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.contacts.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Contact> {
        self.contacts.iter().find(|contact| contact.id == id)
    }

    /// Insert a new record at the front and return its generated id.
    /// The collection stays newest-first.
    pub fn add(&mut self, payload: ContactPayload) -> String {
        let id = Uuid::new_v4().to_string();
        self.contacts.insert(
            0,
            Contact {
                id: id.clone(),
                first_name: payload.first_name,
                last_name: payload.last_name,
                email: payload.email,
                phone: payload.phone,
                tags: payload.tags,
            },
        );
        id
    }

    /// Replace the form fields of an existing record, keeping its id and
    /// position. Unknown ids are ignored.
    pub fn update(&mut self, id: &str, payload: ContactPayload) -> bool {
        let Some(contact) = self.contacts.iter_mut().find(|contact| contact.id == id) else {
            return false;
        };
        contact.first_name = payload.first_name;
        contact.last_name = payload.last_name;
        contact.email = payload.email;
        contact.phone = payload.phone;
        contact.tags = payload.tags;
        true
    }

    /// Remove the record with the given id. Unknown ids are ignored.
    pub fn remove(&mut self, id: &str) -> bool {
        let before = self.contacts.len();
        self.contacts.retain(|contact| contact.id != id);
        self.contacts.len() != before
    }

    /// Remove every record whose id is in `ids`. Ids with no matching
    /// record are ignored. Returns how many records were removed.
    pub fn remove_all(&mut self, ids: &HashSet<String>) -> usize {
        let before = self.contacts.len();
        self.contacts.retain(|contact| !ids.contains(&contact.id));
        before - self.contacts.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload(first: &str, last: &str) -> ContactPayload {
        ContactPayload {
            first_name: first.to_string(),
            last_name: last.to_string(),
            email: format!("{}@example.com", first.to_lowercase()),
            phone: String::new(),
            tags: Vec::new(),
        }
    }

    #[test]
    fn test_add_prepends_with_fresh_id() {
        let mut repo = ContactRepository::default();
        let first = repo.add(payload("Ada", "Lovelace"));
        let second = repo.add(payload("Alan", "Turing"));
        assert_ne!(first, second);
        assert_eq!(repo.contacts()[0].first_name, "Alan");
        assert_eq!(repo.contacts()[1].first_name, "Ada");
    }

    #[test]
    fn test_update_keeps_id_and_position() {
        let mut repo = ContactRepository::default();
        repo.add(payload("Ada", "Lovelace"));
        let id = repo.add(payload("Alan", "Turing"));
        let mut changed = payload("Alan", "Turing");
        changed.phone = "020 7946 0321".to_string();
        assert!(repo.update(&id, changed));
        assert_eq!(repo.contacts()[0].id, id);
        assert_eq!(repo.contacts()[0].phone, "020 7946 0321");
    }

    #[test]
    fn test_update_unknown_id_is_noop() {
        let mut repo = ContactRepository::default();
        repo.add(payload("Ada", "Lovelace"));
        assert!(!repo.update("missing", payload("X", "Y")));
        assert_eq!(repo.contacts()[0].first_name, "Ada");
    }

    #[test]
    fn test_remove_ignores_unknown_id() {
        let mut repo = ContactRepository::default();
        let id = repo.add(payload("Ada", "Lovelace"));
        assert!(!repo.remove("missing"));
        assert!(repo.remove(&id));
        assert!(repo.is_empty());
    }

    #[test]
    fn test_remove_all_ignores_stale_ids() {
        let mut repo = ContactRepository::default();
        let a = repo.add(payload("Ada", "Lovelace"));
        let b = repo.add(payload("Alan", "Turing"));
        repo.add(payload("Grace", "Hopper"));
        let ids: HashSet<String> =
            [a.clone(), b.clone(), "stale".to_string()].into_iter().collect();
        assert_eq!(repo.remove_all(&ids), 2);
        assert_eq!(repo.len(), 1);
        assert_eq!(repo.contacts()[0].first_name, "Grace");
    }

    #[test]
    fn test_serde_round_trip_uses_camel_case() {
        let mut repo = ContactRepository::default();
        let mut record = payload("Ali", "Rezaei");
        record.tags = vec!["friends".to_string()];
        repo.add(record);

        let raw = serde_json::to_string(&repo).unwrap();
        assert!(raw.contains("\"firstName\""));
        assert!(raw.contains("\"lastName\""));

        let restored: ContactRepository = serde_json::from_str(&raw).unwrap();
        assert_eq!(restored.contacts(), repo.contacts());
    }
}

use std::collections::BTreeMap;

use crate::contacts::ContactPayload;

/// Minimum trimmed length for a phone number, when one is given at all.
pub const MIN_PHONE_LEN: usize = 8;

/// Form fields that can fail validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Field {
    FirstName,
    LastName,
    Email,
    Phone,
}

impl Field {
    pub fn label(self) -> &'static str {
        match self {
            Field::FirstName => "First name",
            Field::LastName => "Last name",
            Field::Email => "Email",
            Field::Phone => "Phone",
        }
    }
}

/// Field-level errors; an empty map means the draft may be submitted.
pub type Errors = BTreeMap<Field, &'static str>;

/// Check a draft against the form rules. Every rule is evaluated, so the
/// result carries an entry for each failing field, not just the first.
pub fn validate(draft: &ContactPayload) -> Errors {
    let mut errors = Errors::new();

    if draft.first_name.trim().is_empty() {
        errors.insert(Field::FirstName, "first name is required");
    }
    if draft.last_name.trim().is_empty() {
        errors.insert(Field::LastName, "last name is required");
    }

    if draft.email.trim().is_empty() {
        errors.insert(Field::Email, "email is required");
    } else if !email_is_valid(&draft.email) {
        errors.insert(Field::Email, "email format is invalid");
    }

    // Phone is optional, but a non-empty value must trim to a usable
    // length. The raw value gates the check, the trimmed value is
    // measured, so whitespace-only input is rejected.
    if !draft.phone.is_empty() && draft.phone.trim().chars().count() < MIN_PHONE_LEN {
        errors.insert(Field::Phone, "phone must be at least 8 characters");
    }

    errors
}

/// `local@domain.tld`: a non-empty local part, exactly one split at the
/// first `@`, a dot inside the domain with text on both sides, and no
/// whitespace anywhere.
fn email_is_valid(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || local.chars().any(char::is_whitespace) {
        return false;
    }
    if domain.contains('@') || domain.chars().any(char::is_whitespace) {
        return false;
    }
    match domain.rsplit_once('.') {
        Some((host, tld)) => !host.is_empty() && !tld.is_empty(),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_draft() -> ContactPayload {
        ContactPayload {
            first_name: "Ali".to_string(),
            last_name: "Rezaei".to_string(),
            email: "a@b.com".to_string(),
            phone: String::new(),
            tags: Vec::new(),
        }
    }

    #[test]
    fn test_valid_draft_has_no_errors() {
        assert!(validate(&valid_draft()).is_empty());
    }

    #[test]
    fn test_required_fields() {
        let draft = ContactPayload::default();
        let errors = validate(&draft);
        assert_eq!(errors.len(), 3);
        assert!(errors.contains_key(&Field::FirstName));
        assert!(errors.contains_key(&Field::LastName));
        assert!(errors.contains_key(&Field::Email));
    }

    #[test]
    fn test_whitespace_only_names_are_required() {
        let mut draft = valid_draft();
        draft.first_name = "   ".to_string();
        draft.last_name = "\t".to_string();
        let errors = validate(&draft);
        assert!(errors.contains_key(&Field::FirstName));
        assert!(errors.contains_key(&Field::LastName));
    }

    #[test]
    fn test_email_shapes() {
        for good in ["a@b.com", "first.last@mail.example.org", "x@y.z.co"] {
            let mut draft = valid_draft();
            draft.email = good.to_string();
            assert!(validate(&draft).is_empty(), "expected {good} to pass");
        }
        for bad in [
            "plainaddress",
            "no-domain@",
            "@no-local.com",
            "two@@signs.com",
            "no-dot@domain",
            "spaces in@local.com",
            "trailing@dot.",
            "a@.com",
            " a@b.com",
        ] {
            let mut draft = valid_draft();
            draft.email = bad.to_string();
            assert_eq!(
                validate(&draft).get(&Field::Email),
                Some(&"email format is invalid"),
                "expected {bad} to fail"
            );
        }
    }

    #[test]
    fn test_empty_phone_is_valid() {
        assert!(validate(&valid_draft()).is_empty());
    }

    #[test]
    fn test_short_phone_is_rejected() {
        let mut draft = valid_draft();
        draft.phone = "1234567".to_string();
        assert_eq!(
            validate(&draft).get(&Field::Phone),
            Some(&"phone must be at least 8 characters")
        );
    }

    #[test]
    fn test_whitespace_only_phone_is_rejected() {
        let mut draft = valid_draft();
        draft.phone = "   ".to_string();
        assert!(validate(&draft).contains_key(&Field::Phone));
    }

    #[test]
    fn test_phone_length_counts_trimmed_chars() {
        let mut draft = valid_draft();
        draft.phone = "  12345678  ".to_string();
        assert!(validate(&draft).is_empty());
    }

    #[test]
    fn test_errors_are_collected_not_short_circuited() {
        let draft = ContactPayload {
            first_name: String::new(),
            last_name: String::new(),
            email: "broken".to_string(),
            phone: "123".to_string(),
            tags: Vec::new(),
        };
        assert_eq!(validate(&draft).len(), 4);
    }
}

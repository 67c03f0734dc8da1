use crossterm::event::{Event, KeyCode, KeyEvent};
use tui_input::backend::crossterm::EventHandler;
use tui_input::Input;

use crate::contacts::{Contact, ContactPayload};
use crate::tags::TagRegistry;
use crate::validate::{self, Errors, Field};

/// Text fields in their tab order.
pub const TEXT_FIELDS: [Field; 4] = [Field::FirstName, Field::LastName, Field::Email, Field::Phone];

/// Which form control currently has focus. The tag checkboxes come after
/// the text fields in the tab order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormFocus {
    FirstName,
    LastName,
    Email,
    Phone,
    Tags,
}

impl FormFocus {
    fn next(self) -> Self {
        match self {
            FormFocus::FirstName => FormFocus::LastName,
            FormFocus::LastName => FormFocus::Email,
            FormFocus::Email => FormFocus::Phone,
            FormFocus::Phone => FormFocus::Tags,
            FormFocus::Tags => FormFocus::FirstName,
        }
    }

    fn prev(self) -> Self {
        match self {
            FormFocus::FirstName => FormFocus::Tags,
            FormFocus::LastName => FormFocus::FirstName,
            FormFocus::Email => FormFocus::LastName,
            FormFocus::Phone => FormFocus::Email,
            FormFocus::Tags => FormFocus::Phone,
        }
    }

    fn for_field(field: Field) -> Self {
        match field {
            Field::FirstName => FormFocus::FirstName,
            Field::LastName => FormFocus::LastName,
            Field::Email => FormFocus::Email,
            Field::Phone => FormFocus::Phone,
        }
    }
}

/// State of the add/edit contact modal.
pub struct ContactForm {
    /// Id of the contact being edited; None when adding a new one.
    pub editing: Option<String>,
    pub first_name: Input,
    pub last_name: Input,
    pub email: Input,
    pub phone: Input,
    /// Checked tag ids, in the order they were toggled on.
    pub tag_ids: Vec<String>,
    pub focus: FormFocus,
    pub tag_cursor: usize,
    pub errors: Errors,
}

impl ContactForm {
    pub fn blank() -> Self {
        Self {
            editing: None,
            first_name: Input::default(),
            last_name: Input::default(),
            email: Input::default(),
            phone: Input::default(),
            tag_ids: Vec::new(),
            focus: FormFocus::FirstName,
            tag_cursor: 0,
            errors: Errors::new(),
        }
    }

    /// Prefill the form from an existing record.
    pub fn for_contact(contact: &Contact) -> Self {
        Self {
            editing: Some(contact.id.clone()),
            first_name: Input::new(contact.first_name.clone()),
            last_name: Input::new(contact.last_name.clone()),
            email: Input::new(contact.email.clone()),
            phone: Input::new(contact.phone.clone()),
            tag_ids: contact.tags.clone(),
            focus: FormFocus::FirstName,
            tag_cursor: 0,
            errors: Errors::new(),
        }
    }

    pub fn title(&self) -> &'static str {
        if self.editing.is_some() {
            "EDIT CONTACT"
        } else {
            "ADD CONTACT"
        }
    }

    pub fn input(&self, field: Field) -> &Input {
        match field {
            Field::FirstName => &self.first_name,
            Field::LastName => &self.last_name,
            Field::Email => &self.email,
            Field::Phone => &self.phone,
        }
    }

    pub fn is_focused(&self, field: Field) -> bool {
        self.focus == FormFocus::for_field(field)
    }

    fn focused_input_mut(&mut self) -> Option<&mut Input> {
        match self.focus {
            FormFocus::FirstName => Some(&mut self.first_name),
            FormFocus::LastName => Some(&mut self.last_name),
            FormFocus::Email => Some(&mut self.email),
            FormFocus::Phone => Some(&mut self.phone),
            FormFocus::Tags => None,
        }
    }

    pub fn focus_next(&mut self) {
        self.focus = self.focus.next();
    }

    pub fn focus_prev(&mut self) {
        self.focus = self.focus.prev();
    }

    pub fn tag_checked(&self, id: &str) -> bool {
        self.tag_ids.iter().any(|tag| tag == id)
    }

    /// Check or uncheck a tag, keeping checked ids in toggle order.
    pub fn toggle_tag(&mut self, id: &str) {
        if let Some(index) = self.tag_ids.iter().position(|tag| tag == id) {
            self.tag_ids.remove(index);
        } else {
            self.tag_ids.push(id.to_string());
        }
    }

    /// Route a key to the focused control. Returns true when consumed.
    pub fn handle_key(&mut self, key: KeyEvent, tags: &TagRegistry) -> bool {
        if self.focus == FormFocus::Tags {
            return match key.code {
                KeyCode::Left | KeyCode::Char('h') => {
                    self.tag_cursor = self.tag_cursor.saturating_sub(1);
                    true
                }
                KeyCode::Right | KeyCode::Char('l') => {
                    if self.tag_cursor + 1 < tags.len() {
                        self.tag_cursor += 1;
                    }
                    true
                }
                KeyCode::Char(' ') => {
                    if let Some(tag) = tags.tags().get(self.tag_cursor) {
                        let id = tag.id.clone();
                        self.toggle_tag(&id);
                    }
                    true
                }
                _ => false,
            };
        }

        match self.focused_input_mut() {
            Some(input) => input.handle_event(&Event::Key(key)).is_some(),
            None => false,
        }
    }

    pub fn payload(&self) -> ContactPayload {
        ContactPayload {
            first_name: self.first_name.value().to_string(),
            last_name: self.last_name.value().to_string(),
            email: self.email.value().to_string(),
            phone: self.phone.value().to_string(),
            tags: self.tag_ids.clone(),
        }
    }

    /// Validate the current draft. Returns the payload when it is clean;
    /// otherwise records the per-field errors for inline display.
    pub fn submit(&mut self) -> Option<ContactPayload> {
        let payload = self.payload();
        self.errors = validate::validate(&payload);
        if self.errors.is_empty() {
            Some(payload)
        } else {
            None
        }
    }
}

use std::collections::HashSet;
use std::io::stdout;
use std::time::Duration;

use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyModifiers};
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use crossterm::ExecutableCommand;
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use tui_input::backend::crossterm::EventHandler;
use tui_input::Input;
use tui_widgets::popup::PopupState;

use crate::config::{Config, UiColors};
use crate::contacts::Contact;
use crate::workspace::Workspace;

use super::draw;
use super::form::ContactForm;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaneFocus {
    Search,
    Contacts,
    Tags,
}

#[derive(Debug, Clone)]
pub struct ConfirmModal {
    pub title: String,
    pub message: String,
    pub action: ConfirmAction,
}

/// Action to perform when the confirm modal is accepted
#[derive(Debug, Clone)]
pub enum ConfirmAction {
    /// Delete a single contact
    DeleteContact { id: String },
    /// Delete every selected contact
    DeleteSelected,
}

/// Add-or-rename tag modal
#[derive(Debug, Clone)]
pub struct TagEditor {
    /// Tag id being renamed; None when adding a new tag.
    pub target: Option<String>,
    pub input: Input,
}

pub struct App<'a> {
    workspace: &'a mut Workspace,
    config: &'a Config,
    pub search_input: Input,
    /// Tag ids a contact must carry to stay visible.
    pub tag_filter: HashSet<String>,
    pub focused_pane: PaneFocus,
    /// Ids of the contacts currently visible, in display order.
    pub visible: Vec<String>,
    pub selected_row: usize,
    pub tag_cursor: usize,
    pub form: Option<ContactForm>,
    pub confirm_modal: Option<ConfirmModal>,
    pub tag_editor: Option<TagEditor>,
    // Popup state for modal dialogs (tui-widgets popup)
    pub modal_popup: PopupState,
    pub status: Option<String>,
}

impl<'a> App<'a> {
    pub fn new(workspace: &'a mut Workspace, config: &'a Config) -> Self {
        let mut app = Self {
            workspace,
            config,
            search_input: Input::default(),
            tag_filter: HashSet::new(),
            focused_pane: PaneFocus::Contacts,
            visible: Vec::new(),
            selected_row: 0,
            tag_cursor: 0,
            form: None,
            confirm_modal: None,
            tag_editor: None,
            modal_popup: PopupState::default(),
            status: None,
        };
        app.refresh();
        app
    }

    pub fn run(&mut self) -> Result<()> {
        enable_raw_mode()?;
        let mut stdout = stdout();
        stdout.execute(EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;
        terminal.clear()?;

        let result = self.event_loop(&mut terminal);

        disable_raw_mode()?;
        terminal.backend_mut().execute(LeaveAlternateScreen)?;
        terminal.show_cursor()?;

        result
    }

    fn event_loop<B>(&mut self, terminal: &mut Terminal<B>) -> Result<()>
    where
        B: ratatui::backend::Backend,
    {
        loop {
            draw::render(terminal, self)?;

            if event::poll(Duration::from_millis(250))? {
                match event::read()? {
                    Event::Key(key) => {
                        if self.handle_key(key) {
                            break;
                        }
                    }
                    Event::Resize(_, _) => {}
                    _ => {}
                }
            }
        }
        Ok(())
    }

    pub fn workspace(&self) -> &Workspace {
        self.workspace
    }

    pub fn ui_colors(&self) -> &UiColors {
        &self.config.ui.colors
    }

    /// The contacts currently on screen, in display order.
    pub fn visible_contacts(&self) -> Vec<&Contact> {
        self.visible
            .iter()
            .filter_map(|id| self.workspace.contact(id))
            .collect()
    }

    /// Re-derive the visible list from the committed state, keeping the
    /// cursor on the same contact where possible. Called after every
    /// mutation and every filter change.
    pub fn refresh(&mut self) {
        let previous = self.visible.get(self.selected_row).cloned();
        self.visible = self
            .workspace
            .filtered(self.search_input.value(), &self.tag_filter)
            .iter()
            .map(|contact| contact.id.clone())
            .collect();

        if let Some(id) = previous {
            if let Some(index) = self.visible.iter().position(|visible| *visible == id) {
                self.selected_row = index;
            }
        }
        if self.visible.is_empty() {
            self.selected_row = 0;
        } else if self.selected_row >= self.visible.len() {
            self.selected_row = self.visible.len() - 1;
        }

        let tag_count = self.workspace.tags().len();
        if tag_count == 0 {
            self.tag_cursor = 0;
        } else if self.tag_cursor >= tag_count {
            self.tag_cursor = tag_count - 1;
        }
    }

    fn handle_key(&mut self, key: KeyEvent) -> bool {
        // Ctrl+C always quits (hardcoded for safety)
        if key.modifiers.contains(KeyModifiers::CONTROL)
            && matches!(key.code, KeyCode::Char('c') | KeyCode::Char('C'))
        {
            return true;
        }

        // Route to modal handlers first
        if self.confirm_modal.is_some() {
            self.handle_confirm_modal_key(key);
            return false;
        }

        if self.tag_editor.is_some() {
            self.handle_tag_editor_key(key);
            return false;
        }

        if self.form.is_some() {
            self.handle_form_key(key);
            return false;
        }

        match self.focused_pane {
            PaneFocus::Search => {
                self.handle_search_key(key);
                false
            }
            PaneFocus::Contacts => self.handle_contacts_key(key),
            PaneFocus::Tags => self.handle_tags_key(key),
        }
    }

    fn handle_search_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc | KeyCode::Enter | KeyCode::Down | KeyCode::Tab => {
                self.focused_pane = PaneFocus::Contacts;
            }
            _ => {
                if self.search_input.handle_event(&Event::Key(key)).is_some() {
                    self.refresh();
                }
            }
        }
    }

    fn handle_contacts_key(&mut self, key: KeyEvent) -> bool {
        match key.code {
            KeyCode::Char('q') => return true,
            KeyCode::Char('/') => self.focused_pane = PaneFocus::Search,
            KeyCode::Tab | KeyCode::Char('t') => self.focused_pane = PaneFocus::Tags,
            KeyCode::Down | KeyCode::Char('j') => self.select_next_row(),
            KeyCode::Up | KeyCode::Char('k') => self.select_prev_row(),
            KeyCode::Char(' ') => self.toggle_current_row(),
            KeyCode::Char('a') => self.toggle_all_visible(),
            KeyCode::Char('n') => self.form = Some(ContactForm::blank()),
            KeyCode::Char('e') | KeyCode::Enter => self.open_edit_form(),
            KeyCode::Char('d') | KeyCode::Delete => self.ask_delete_current(),
            KeyCode::Char('x') => self.ask_delete_selected(),
            _ => {}
        }
        false
    }

    fn handle_tags_key(&mut self, key: KeyEvent) -> bool {
        match key.code {
            KeyCode::Char('q') => return true,
            KeyCode::Esc => self.focused_pane = PaneFocus::Contacts,
            KeyCode::Tab => self.focused_pane = PaneFocus::Search,
            KeyCode::Char('/') => self.focused_pane = PaneFocus::Search,
            KeyCode::Left | KeyCode::Char('h') => {
                self.tag_cursor = self.tag_cursor.saturating_sub(1);
            }
            KeyCode::Right | KeyCode::Char('l') => {
                if self.tag_cursor + 1 < self.workspace.tags().len() {
                    self.tag_cursor += 1;
                }
            }
            KeyCode::Char(' ') => self.toggle_tag_filter(),
            KeyCode::Char('n') => {
                self.modal_popup = PopupState::default();
                self.tag_editor = Some(TagEditor {
                    target: None,
                    input: Input::default(),
                });
            }
            KeyCode::Char('r') => self.open_rename_tag(),
            KeyCode::Char('x') | KeyCode::Delete => self.remove_current_tag(),
            _ => {}
        }
        false
    }

    fn select_next_row(&mut self) {
        if !self.visible.is_empty() && self.selected_row + 1 < self.visible.len() {
            self.selected_row += 1;
        }
    }

    fn select_prev_row(&mut self) {
        self.selected_row = self.selected_row.saturating_sub(1);
    }

    fn toggle_current_row(&mut self) {
        let Some(id) = self.visible.get(self.selected_row).cloned() else {
            return;
        };
        let checked = !self.workspace.selection.is_checked(&id);
        self.workspace.selection.toggle(&id, checked);
    }

    /// Select-all scopes to the contacts currently in view; rows hidden
    /// by the filter are never selected.
    fn toggle_all_visible(&mut self) {
        let ids = self.visible.clone();
        let all = self
            .workspace
            .selection
            .all_checked(ids.iter().map(String::as_str));
        self.workspace
            .selection
            .toggle_all(!all, ids.iter().map(String::as_str));
    }

    fn open_edit_form(&mut self) {
        let Some(id) = self.visible.get(self.selected_row) else {
            return;
        };
        if let Some(contact) = self.workspace.contact(id) {
            self.form = Some(ContactForm::for_contact(contact));
        }
    }

    fn ask_delete_current(&mut self) {
        let Some(id) = self.visible.get(self.selected_row) else {
            return;
        };
        let Some(contact) = self.workspace.contact(id) else {
            return;
        };
        self.modal_popup = PopupState::default();
        self.confirm_modal = Some(ConfirmModal {
            title: "DELETE CONTACT".to_string(),
            message: format!("Delete {}?", contact.full_name()),
            action: ConfirmAction::DeleteContact { id: id.clone() },
        });
    }

    fn ask_delete_selected(&mut self) {
        if !self.workspace.selection.any_checked() {
            self.set_status("Nothing selected");
            return;
        }
        self.modal_popup = PopupState::default();
        self.confirm_modal = Some(ConfirmModal {
            title: "DELETE SELECTED".to_string(),
            message: "Delete all selected contacts?".to_string(),
            action: ConfirmAction::DeleteSelected,
        });
    }

    fn handle_confirm_modal_key(&mut self, key: KeyEvent) {
        let Some(modal) = self.confirm_modal.take() else {
            return;
        };

        match key.code {
            // Cancel: close without running the action
            KeyCode::Esc | KeyCode::Char('n') | KeyCode::Char('N') => {}
            KeyCode::Enter | KeyCode::Char('y') | KeyCode::Char('Y') => {
                match modal.action {
                    ConfirmAction::DeleteContact { id } => {
                        self.workspace.delete_contact(&id);
                        self.set_status("Contact deleted");
                    }
                    ConfirmAction::DeleteSelected => {
                        let ids = self.workspace.selection.checked_ids();
                        let removed = self.workspace.bulk_delete(&ids);
                        self.set_status(format!("{} contacts deleted", removed));
                    }
                }
                self.refresh();
            }
            _ => {
                // Put the modal back if the key wasn't handled
                self.confirm_modal = Some(modal);
            }
        }
    }

    fn open_rename_tag(&mut self) {
        let Some(tag) = self.workspace.tags().tags().get(self.tag_cursor) else {
            return;
        };
        self.modal_popup = PopupState::default();
        self.tag_editor = Some(TagEditor {
            target: Some(tag.id.clone()),
            input: Input::new(tag.name.clone()),
        });
    }

    fn remove_current_tag(&mut self) {
        let Some(tag) = self.workspace.tags().tags().get(self.tag_cursor) else {
            return;
        };
        let id = tag.id.clone();
        self.workspace.remove_tag(&id);
        self.tag_filter.remove(&id);
        self.set_status("Tag removed");
        self.refresh();
    }

    fn toggle_tag_filter(&mut self) {
        let Some(tag) = self.workspace.tags().tags().get(self.tag_cursor) else {
            return;
        };
        let id = tag.id.clone();
        if !self.tag_filter.remove(&id) {
            self.tag_filter.insert(id);
        }
        self.refresh();
    }

    fn handle_tag_editor_key(&mut self, key: KeyEvent) {
        let Some(mut editor) = self.tag_editor.take() else {
            return;
        };

        match key.code {
            KeyCode::Esc => {}
            KeyCode::Enter => {
                match &editor.target {
                    Some(id) => {
                        self.workspace.rename_tag(id, editor.input.value());
                        self.set_status("Tag renamed");
                    }
                    None => {
                        if self.workspace.add_tag(editor.input.value()) {
                            self.set_status("Tag added");
                        }
                    }
                }
                self.refresh();
            }
            _ => {
                editor.input.handle_event(&Event::Key(key));
                self.tag_editor = Some(editor);
            }
        }
    }

    fn handle_form_key(&mut self, key: KeyEvent) {
        let Some(mut form) = self.form.take() else {
            return;
        };

        match key.code {
            KeyCode::Esc => {}
            KeyCode::Enter => match form.submit() {
                Some(payload) => {
                    match form.editing.as_deref() {
                        Some(id) => {
                            self.workspace.update_contact(id, payload);
                            self.set_status("Contact updated");
                        }
                        None => {
                            self.workspace.add_contact(payload);
                            self.set_status("Contact added");
                        }
                    }
                    self.refresh();
                }
                // Invalid: keep the form open with inline errors
                None => self.form = Some(form),
            },
            KeyCode::Tab | KeyCode::Down => {
                form.focus_next();
                self.form = Some(form);
            }
            KeyCode::BackTab | KeyCode::Up => {
                form.focus_prev();
                self.form = Some(form);
            }
            _ => {
                let tags = self.workspace.tags();
                form.handle_key(key, tags);
                self.form = Some(form);
            }
        }
    }

    fn set_status<S: Into<String>>(&mut self, message: S) {
        self.status = Some(message.into());
    }
}

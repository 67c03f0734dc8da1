use anyhow::Result;
use ratatui::backend::Backend;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table, TableState};
use ratatui::{Frame, Terminal};
// Use Popup from tui-widgets to render modals
use tui_widgets::popup::Popup;

use crate::config::RgbColor;
use crate::validate::Field;

use super::app::{App, PaneFocus};
use super::form::{ContactForm, FormFocus, TEXT_FIELDS};

const SEARCH_HELP: &str = "Type to filter  Enter/Esc: back to list";
const CONTACTS_HELP: &str =
    "j/k: nav  Space: select  a: select all  n: new  e: edit  d: delete  x: delete selected  /: search  t: tags  q: quit";
const TAGS_HELP: &str = "h/l: nav  Space: filter  n: new  r: rename  x: remove  Esc: back";
const FORM_HELP: &str = "Tab: next field  Enter: save  Esc: cancel";
const FORM_TAGS_HELP: &str = "h/l: nav  Space: toggle tag  Tab: next  Enter: save  Esc: cancel";
const TAG_EDITOR_HELP: &str = "Type name  Enter: apply  Esc: cancel";
const CONFIRM_HELP: &str = "Y/Enter: confirm  N/Esc: cancel";
const EMPTY_LIST: &str = "No contacts found";

const FORM_LABEL_WIDTH: usize = 12;

pub fn render<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<()> {
    terminal.draw(|frame| draw_frame(frame, app))?;
    Ok(())
}

fn draw_frame(frame: &mut Frame<'_>, app: &mut App) {
    let size = frame.area();
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(4),
            Constraint::Length(1),
        ])
        .split(size);

    draw_header(frame, layout[0], app);
    draw_search(frame, layout[1], app);
    draw_contacts(frame, layout[2], app);
    draw_tag_bar(frame, layout[3], app);
    draw_footer(frame, layout[4], app);
    draw_form_modal(frame, size, app);
    draw_tag_editor_modal(frame, size, app);
    draw_confirm_modal(frame, size, app);
}

fn draw_header(frame: &mut Frame<'_>, area: Rect, app: &App) {
    let total = app.workspace().contact_count();
    let shown = app.visible.len();
    let selected = app
        .visible
        .iter()
        .filter(|id| app.workspace().selection.is_checked(id))
        .count();

    let mut text = format!("CARDFILE  {shown}/{total} contacts");
    if selected > 0 {
        text.push_str(&format!("  {selected} selected"));
    }
    frame.render_widget(
        Paragraph::new(Line::from(Span::styled(text, header_text_style(app)))),
        area,
    );
}

fn draw_search(frame: &mut Frame<'_>, area: Rect, app: &App) {
    let focused = app.focused_pane == PaneFocus::Search;
    let block = Block::default()
        .borders(Borders::ALL)
        .title("SEARCH")
        .border_style(border_style(app, focused));
    let inner = block.inner(area);
    frame.render_widget(block, area);
    frame.render_widget(Paragraph::new(app.search_input.value()), inner);

    let modal_open =
        app.form.is_some() || app.confirm_modal.is_some() || app.tag_editor.is_some();
    if focused && !modal_open {
        let x = inner
            .x
            .saturating_add(app.search_input.visual_cursor() as u16);
        frame.set_cursor_position((x, inner.y));
    }
}

fn draw_contacts(frame: &mut Frame<'_>, area: Rect, app: &App) {
    let focused = app.focused_pane == PaneFocus::Contacts;
    let block = Block::default()
        .borders(Borders::ALL)
        .title("CONTACTS")
        .border_style(border_style(app, focused));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let contacts = app.visible_contacts();
    if contacts.is_empty() {
        frame.render_widget(
            Paragraph::new(Line::from(Span::styled(EMPTY_LIST, header_text_style(app)))),
            inner,
        );
        return;
    }

    let selection = &app.workspace().selection;
    let all_mark = if selection.all_checked(app.visible.iter().map(String::as_str)) {
        "[x]"
    } else {
        "[ ]"
    };
    let header = Row::new(vec![
        Cell::from(all_mark),
        Cell::from("FIRST NAME"),
        Cell::from("LAST NAME"),
        Cell::from("EMAIL"),
        Cell::from("PHONE"),
        Cell::from("TAGS"),
    ])
    .style(header_text_style(app));

    let tags = app.workspace().tags();
    let rows: Vec<Row> = contacts
        .iter()
        .map(|contact| {
            let mark = if selection.is_checked(&contact.id) {
                "[x]"
            } else {
                "[ ]"
            };
            let phone = if contact.phone.is_empty() {
                "-".to_string()
            } else {
                contact.phone.clone()
            };
            let tag_names = contact
                .tags
                .iter()
                .map(|id| tags.display_name(id).to_string())
                .collect::<Vec<_>>()
                .join(", ");
            Row::new(vec![
                Cell::from(mark),
                Cell::from(contact.first_name.clone()),
                Cell::from(contact.last_name.clone()),
                Cell::from(contact.email.clone()),
                Cell::from(phone),
                Cell::from(tag_names),
            ])
        })
        .collect();

    let widths = vec![
        Constraint::Length(3),
        Constraint::Percentage(15),
        Constraint::Percentage(15),
        Constraint::Percentage(30),
        Constraint::Percentage(15),
        Constraint::Percentage(25),
    ];
    let table = Table::new(rows, widths)
        .header(header)
        .highlight_style(selection_style(app));

    let mut state = TableState::default();
    if focused {
        state.select(Some(app.selected_row));
    }
    frame.render_stateful_widget(table, inner, &mut state);
}

fn draw_tag_bar(frame: &mut Frame<'_>, area: Rect, app: &App) {
    let focused = app.focused_pane == PaneFocus::Tags;
    let block = Block::default()
        .borders(Borders::ALL)
        .title("TAGS")
        .border_style(border_style(app, focused));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let tags = app.workspace().tags();
    if tags.is_empty() {
        frame.render_widget(
            Paragraph::new(Line::from(Span::styled("No tags", header_text_style(app)))),
            inner,
        );
        return;
    }

    let mut spans: Vec<Span> = Vec::new();
    for (index, tag) in tags.tags().iter().enumerate() {
        if index > 0 {
            spans.push(Span::raw("  "));
        }
        let mark = if app.tag_filter.contains(&tag.id) {
            "[*] "
        } else {
            "[ ] "
        };
        let style = if focused && index == app.tag_cursor {
            selection_style(app)
        } else {
            Style::default()
        };
        spans.push(Span::styled(format!("{}{}", mark, tag.name), style));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), inner);
}

fn draw_footer(frame: &mut Frame<'_>, area: Rect, app: &App) {
    let message: String = if app.tag_editor.is_some() {
        TAG_EDITOR_HELP.to_string()
    } else if app.confirm_modal.is_some() {
        CONFIRM_HELP.to_string()
    } else if let Some(form) = &app.form {
        if form.focus == FormFocus::Tags {
            FORM_TAGS_HELP.to_string()
        } else {
            FORM_HELP.to_string()
        }
    } else if let Some(status) = &app.status {
        status.clone()
    } else {
        match app.focused_pane {
            PaneFocus::Search => SEARCH_HELP.to_string(),
            PaneFocus::Contacts => CONTACTS_HELP.to_string(),
            PaneFocus::Tags => TAGS_HELP.to_string(),
        }
    };

    let colors = app.ui_colors();
    let style = Style::default()
        .fg(color(colors.status_fg))
        .bg(color(colors.status_bg));

    let background = Block::default().style(Style::default().bg(color(colors.status_bg)));
    frame.render_widget(background, area);

    frame.render_widget(Paragraph::new(message).style(style), area);
}

fn draw_form_modal(frame: &mut Frame<'_>, area: Rect, app: &App) {
    let Some(form) = app.form.as_ref() else {
        return;
    };

    let (lines, cursor) = form_lines(app, form);

    let width = area
        .width
        .saturating_mul(2)
        .saturating_div(3)
        .max(46)
        .min(area.width);
    let height = (lines.len() as u16 + 2).min(area.height);
    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;
    let modal_area = Rect::new(x, y, width, height);

    frame.render_widget(Clear, modal_area);

    let block = Block::default()
        .borders(Borders::ALL)
        .title(Line::from(Span::styled(
            form.title(),
            header_text_style(app),
        )))
        .border_style(border_style(app, true));
    let inner = block.inner(modal_area);
    frame.render_widget(block, modal_area);
    frame.render_widget(Paragraph::new(Text::from(lines)), inner);

    if let Some((cursor_x, cursor_y)) = cursor {
        let x = inner.x.saturating_add(cursor_x);
        let y = inner.y.saturating_add(cursor_y);
        frame.set_cursor_position((x, y));
    }
}

/// Build the form body: one line per text field with its error below it,
/// then the tag checkbox row. Returns the lines and, when a text field
/// has focus, the cursor offset inside the body.
fn form_lines(app: &App, form: &ContactForm) -> (Vec<Line<'static>>, Option<(u16, u16)>) {
    let mut lines: Vec<Line> = Vec::new();
    let mut cursor: Option<(u16, u16)> = None;

    for field in TEXT_FIELDS {
        let input = form.input(field);
        let label = format!(
            "{:<width$}",
            format!("{}:", field.label()),
            width = FORM_LABEL_WIDTH
        );
        if form.is_focused(field) {
            cursor = Some((
                (FORM_LABEL_WIDTH + input.visual_cursor()) as u16,
                lines.len() as u16,
            ));
        }
        lines.push(Line::from(vec![
            Span::styled(label, header_text_style(app)),
            Span::raw(input.value().to_string()),
        ]));
        if let Some(error) = error_for(form, field) {
            lines.push(Line::from(Span::styled(
                format!("{:width$}{}", "", error, width = FORM_LABEL_WIDTH),
                error_style(app),
            )));
        }
    }

    lines.push(Line::from(""));

    let tags = app.workspace().tags();
    let mut spans: Vec<Span> = vec![Span::styled(
        format!("{:<width$}", "Tags:", width = FORM_LABEL_WIDTH),
        header_text_style(app),
    )];
    if tags.is_empty() {
        spans.push(Span::raw("(none)"));
    }
    for (index, tag) in tags.tags().iter().enumerate() {
        if index > 0 {
            spans.push(Span::raw("  "));
        }
        let mark = if form.tag_checked(&tag.id) {
            "[x] "
        } else {
            "[ ] "
        };
        let style = if form.focus == FormFocus::Tags && index == form.tag_cursor {
            selection_style(app)
        } else {
            Style::default()
        };
        spans.push(Span::styled(format!("{}{}", mark, tag.name), style));
    }
    lines.push(Line::from(spans));

    (lines, cursor)
}

fn error_for(form: &ContactForm, field: Field) -> Option<&'static str> {
    form.errors.get(&field).copied()
}

fn draw_tag_editor_modal(frame: &mut Frame<'_>, area: Rect, app: &mut App) {
    let Some(editor) = app.tag_editor.as_ref() else {
        return;
    };

    let label = "NAME: ";
    let title = if editor.target.is_some() {
        "RENAME TAG"
    } else {
        "ADD TAG"
    };
    let value = editor.input.value().to_string();

    let lines = vec![
        Line::from(vec![
            Span::styled(label, header_text_style(app)),
            Span::raw(value),
        ]),
        Line::from(String::new()),
        Line::from(TAG_EDITOR_HELP.to_string()),
    ];
    let body_text = Text::from(lines);

    let title_line = Line::from(Span::styled(title.to_string(), header_text_style(app)));
    let popup = Popup::new(body_text)
        .title(title_line)
        .border_style(border_style(app, true));

    frame.render_stateful_widget_ref(popup, area, &mut app.modal_popup);

    if let Some(popup_area) = app.modal_popup.area() {
        let inner = Block::default().borders(Borders::ALL).inner(*popup_area);
        if let Some(editor) = app.tag_editor.as_ref() {
            let x = inner
                .x
                .saturating_add(label.len() as u16 + editor.input.visual_cursor() as u16);
            frame.set_cursor_position((x, inner.y));
        }
    }
}

fn draw_confirm_modal(frame: &mut Frame<'_>, area: Rect, app: &mut App) {
    let Some(modal) = app.confirm_modal.as_ref() else {
        return;
    };

    let lines = vec![
        Line::from(modal.message.clone()),
        Line::from(String::new()),
        Line::from(CONFIRM_HELP.to_string()),
    ];
    let body_text = Text::from(lines);

    let title_line = Line::from(Span::styled(modal.title.clone(), header_text_style(app)));
    let popup = Popup::new(body_text)
        .title(title_line)
        .border_style(border_style(app, true));

    frame.render_stateful_widget_ref(popup, area, &mut app.modal_popup);
}

fn selection_style(app: &App) -> Style {
    let colors = app.ui_colors();
    Style::default()
        .fg(color(colors.selection_fg))
        .bg(color(colors.selection_bg))
}

fn border_style(app: &App, active: bool) -> Style {
    let colors = app.ui_colors();
    if active {
        Style::default().fg(color(colors.selection_fg))
    } else {
        Style::default().fg(color(colors.border))
    }
}

fn header_text_style(app: &App) -> Style {
    let colors = app.ui_colors();
    Style::default()
        .fg(color(colors.status_fg))
        .add_modifier(Modifier::BOLD)
}

fn error_style(app: &App) -> Style {
    let colors = app.ui_colors();
    Style::default().fg(color(colors.error_fg))
}

fn color(rgb: RgbColor) -> Color {
    Color::Rgb(rgb.r, rgb.g, rgb.b)
}

//! Rendering for the candidate picker.
//!
//! Lays out the filter input, the candidate list, and a shortcut bar.
//! Per-field colors come from the label spans recorded by the template
//! formatter; callback-formatted labels render unstyled.

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
};

use crate::format::FieldKind;
use crate::models::Label;

use super::app::Picker;

/// Main rendering function for the picker.
pub fn draw(frame: &mut Frame, picker: &Picker) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Filter input
            Constraint::Min(0),    // Candidate list
            Constraint::Length(1), // Shortcut bar
        ])
        .split(frame.area());

    render_input(frame, picker, chunks[0]);
    render_candidates(frame, picker, chunks[1]);
    render_shortcut_bar(frame, chunks[2]);
}

fn render_input(frame: &mut Frame, picker: &Picker, area: Rect) {
    let title = format!(" Find node ({}/{}) ", picker.visible_len(), picker.total_len());
    let input = Paragraph::new(format!("{}_", picker.input()))
        .block(Block::default().borders(Borders::ALL).title(title));
    frame.render_widget(input, area);
}

fn render_candidates(frame: &mut Frame, picker: &Picker, area: Rect) {
    let items: Vec<ListItem> = picker
        .visible()
        .map(|candidate| ListItem::new(styled_line(candidate.label())))
        .collect();

    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL))
        .highlight_style(
            Style::default()
                .bg(Color::DarkGray)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("> ");

    let mut state = ListState::default();
    state.select(picker.selected_position());
    frame.render_stateful_widget(list, area, &mut state);
}

fn render_shortcut_bar(frame: &mut Frame, area: Rect) {
    let bar = Paragraph::new(" type to filter | up/down navigate | enter select | esc cancel ")
        .style(Style::default().fg(Color::DarkGray));
    frame.render_widget(bar, area);
}

/// Converts a label into a styled line by slicing its text along the
/// recorded field spans. Text outside any span (field separators) and
/// span-free labels render unstyled.
fn styled_line(label: &Label) -> Line<'_> {
    if label.spans().is_empty() {
        return Line::from(label.text());
    }

    let text = label.text();
    let mut pieces = Vec::with_capacity(label.spans().len() * 2);
    let mut cursor = 0;

    for span in label.spans() {
        if span.start > cursor {
            pieces.push(Span::raw(&text[cursor..span.start]));
        }
        pieces.push(Span::styled(
            &text[span.start..span.end],
            field_style(span.field),
        ));
        cursor = span.end;
    }
    if cursor < text.len() {
        pieces.push(Span::raw(&text[cursor..]));
    }

    Line::from(pieces)
}

fn field_style(field: FieldKind) -> Style {
    match field {
        FieldKind::Todo => Style::default().fg(Color::Yellow),
        FieldKind::Tags => Style::default().fg(Color::Green),
        FieldKind::File | FieldKind::Olp => Style::default().fg(Color::DarkGray),
        FieldKind::Title => Style::default().add_modifier(Modifier::BOLD),
        _ => Style::default(),
    }
}

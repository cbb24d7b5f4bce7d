use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::models::Candidate;

/// Result of handling one key event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Keep polling.
    Continue,
    /// The user accepted the current selection.
    Accept,
    /// The user cancelled without selecting.
    Cancel,
}

/// Picker state: the full candidate list, the filtered view, the input
/// buffer, and the current selection.
///
/// Filtering is a case-insensitive substring match on the label text; the
/// relative order of matching candidates is preserved.
#[derive(Debug)]
pub struct Picker {
    candidates: Vec<Candidate>,
    /// Indices into `candidates`, in display order.
    visible: Vec<usize>,
    /// Index into `visible` of the highlighted row.
    selected: Option<usize>,
    input: String,
}

impl Picker {
    /// Creates a picker over the given candidates, all visible, with the
    /// first one selected.
    pub fn new(candidates: Vec<Candidate>) -> Self {
        let visible: Vec<usize> = (0..candidates.len()).collect();
        let selected = if visible.is_empty() { None } else { Some(0) };
        Self {
            candidates,
            visible,
            selected,
            input: String::new(),
        }
    }

    /// Returns the filter input buffer.
    pub fn input(&self) -> &str {
        &self.input
    }

    /// Returns the currently visible candidates in display order.
    pub fn visible(&self) -> impl Iterator<Item = &Candidate> {
        self.visible.iter().map(|&i| &self.candidates[i])
    }

    /// Returns the number of visible candidates.
    pub fn visible_len(&self) -> usize {
        self.visible.len()
    }

    /// Returns the total number of candidates, ignoring the filter.
    pub fn total_len(&self) -> usize {
        self.candidates.len()
    }

    /// Returns the position of the highlighted row within the visible list.
    pub fn selected_position(&self) -> Option<usize> {
        self.selected
    }

    /// Returns the highlighted candidate, if any.
    pub fn selected_candidate(&self) -> Option<&Candidate> {
        self.selected.map(|i| &self.candidates[self.visible[i]])
    }

    /// Consumes the picker, yielding the highlighted candidate.
    pub fn into_selection(self) -> Option<Candidate> {
        let index = self.visible[self.selected?];
        self.candidates.into_iter().nth(index)
    }

    /// Handles one key event, updating state and reporting the outcome.
    pub fn handle_key(&mut self, key: KeyEvent) -> Outcome {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

        match key.code {
            KeyCode::Esc => Outcome::Cancel,
            KeyCode::Char('c' | 'g') if ctrl => Outcome::Cancel,
            KeyCode::Enter => {
                if self.selected.is_some() {
                    Outcome::Accept
                } else {
                    Outcome::Continue
                }
            }
            KeyCode::Down => {
                self.select_next();
                Outcome::Continue
            }
            KeyCode::Char('n') if ctrl => {
                self.select_next();
                Outcome::Continue
            }
            KeyCode::Up => {
                self.select_previous();
                Outcome::Continue
            }
            KeyCode::Char('p') if ctrl => {
                self.select_previous();
                Outcome::Continue
            }
            KeyCode::Backspace => {
                self.input.pop();
                self.apply_filter();
                Outcome::Continue
            }
            KeyCode::Char(c) if !ctrl => {
                self.input.push(c);
                self.apply_filter();
                Outcome::Continue
            }
            _ => Outcome::Continue,
        }
    }

    /// Moves the selection down, wrapping at the end.
    pub fn select_next(&mut self) {
        if self.visible.is_empty() {
            return;
        }
        self.selected = Some(match self.selected {
            Some(i) => (i + 1) % self.visible.len(),
            None => 0,
        });
    }

    /// Moves the selection up, wrapping at the start.
    pub fn select_previous(&mut self) {
        if self.visible.is_empty() {
            return;
        }
        self.selected = Some(match self.selected {
            Some(0) | None => self.visible.len() - 1,
            Some(i) => i - 1,
        });
    }

    /// Recomputes the visible list from the input buffer and resets the
    /// selection to the first match.
    fn apply_filter(&mut self) {
        let query = self.input.to_lowercase();

        self.visible = self
            .candidates
            .iter()
            .enumerate()
            .filter(|(_, candidate)| {
                query.is_empty() || candidate.label().text().to_lowercase().contains(&query)
            })
            .map(|(i, _)| i)
            .collect();

        self.selected = if self.visible.is_empty() { None } else { Some(0) };
    }
}

use std::fmt;

use crate::format::FieldKind;

use super::Node;

/// A styled region within a candidate label.
///
/// `start..end` is a byte range into the label text; `field` names the
/// template field that produced it. Presentation (colors, emphasis) is
/// decided by the consumer, not recorded here.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LabelSpan {
    /// The template field this region was rendered from.
    pub field: FieldKind,
    /// Byte offset of the region's start within the label text.
    pub start: usize,
    /// Byte offset one past the region's end.
    pub end: usize,
}

/// A display label: plain text plus side-channel presentation metadata.
///
/// The text never embeds styling. A selection UI that wants per-field
/// colors slices the text by `spans()`; plain consumers print `text()`
/// as-is. Callback-formatted labels carry no spans.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Label {
    text: String,
    spans: Vec<LabelSpan>,
}

impl Label {
    /// Creates a label with field spans.
    pub fn new(text: impl Into<String>, spans: Vec<LabelSpan>) -> Self {
        Self {
            text: text.into(),
            spans,
        }
    }

    /// Creates a label with no presentation metadata.
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            spans: Vec::new(),
        }
    }

    /// Returns the label text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Returns the field spans, in label order.
    pub fn spans(&self) -> &[LabelSpan] {
        &self.spans
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.text)
    }
}

/// A (label, node) pair offered to an interactive selector.
///
/// Constructed fresh on every retrieval call and owned by the caller once
/// returned; never cached or mutated afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    label: Label,
    node: Node,
}

impl Candidate {
    /// Creates a candidate from a formatted label and its node.
    pub fn new(label: Label, node: Node) -> Self {
        Self { label, node }
    }

    /// Returns the display label.
    pub fn label(&self) -> &Label {
        &self.label
    }

    /// Returns the associated node.
    pub fn node(&self) -> &Node {
        &self.node
    }

    /// Consumes the candidate, yielding its node for the host to act on.
    pub fn into_node(self) -> Node {
        self.node
    }
}

impl fmt::Display for Candidate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label.text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NodeBuilder;

    fn sample_node() -> Node {
        NodeBuilder::new()
            .id("n1")
            .file("inbox.org")
            .title("Sample")
            .build()
    }

    #[test]
    fn plain_label_has_no_spans() {
        let label = Label::plain("Sample");
        assert_eq!(label.text(), "Sample");
        assert!(label.spans().is_empty());
    }

    #[test]
    fn spans_slice_into_label_text() {
        let label = Label::new(
            "TODO Title",
            vec![
                LabelSpan {
                    field: FieldKind::Todo,
                    start: 0,
                    end: 4,
                },
                LabelSpan {
                    field: FieldKind::Title,
                    start: 5,
                    end: 10,
                },
            ],
        );

        let todo = &label.text()[label.spans()[0].start..label.spans()[0].end];
        let title = &label.text()[label.spans()[1].start..label.spans()[1].end];
        assert_eq!(todo, "TODO");
        assert_eq!(title, "Title");
    }

    #[test]
    fn candidate_display_is_label_text() {
        let candidate = Candidate::new(Label::plain("Sample"), sample_node());
        assert_eq!(format!("{}", candidate), "Sample");
    }

    #[test]
    fn into_node_hands_back_the_node() {
        let node = sample_node();
        let candidate = Candidate::new(Label::plain("Sample"), node.clone());
        assert_eq!(candidate.into_node(), node);
    }
}

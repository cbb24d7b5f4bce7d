//! Node-to-label formatting.
//!
//! A [`NodeFormatter`] is configured once and applied to every retained
//! node. The two modes are a tagged variant decided at configuration time:
//! a caller-supplied callback producing the label text verbatim, or a
//! [`DisplayTemplate`] interpreting an ordered list of fixed-width fields.
//!
//! Template output is a [`Label`]: plain text plus one [`LabelSpan`] per
//! field, so presentation stays a side channel the selection UI can use or
//! ignore.

use std::fmt;
use std::path::PathBuf;

use crate::error::FormatError;
use crate::models::{Candidate, Label, LabelSpan, Node};

/// A node field renderable by the template formatter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldKind {
    /// The currently-selected title variant.
    Title,
    /// The display title of the containing file.
    FileTitle,
    /// The containing file path, stripped of the knowledge-base root.
    File,
    /// The outline path, joined with ` > `.
    Olp,
    /// The outline depth.
    Level,
    /// The byte offset of the heading.
    Point,
    /// The TODO keyword, prefixed `t:` when present.
    Todo,
    /// The priority string.
    Priority,
    /// The scheduled date string.
    Scheduled,
    /// The deadline date string.
    Deadline,
    /// The tag set, each tag prefixed `#`, joined with spaces.
    Tags,
    /// The alias set, joined with spaces.
    Aliases,
    /// The reference list as `type:value` pairs, joined with spaces.
    Refs,
}

/// One field of a display template: what to render and at what width.
///
/// With a declared width the rendered value occupies exactly that many
/// characters: longer values are truncated, shorter ones space-padded.
/// Without a width the value is rendered at its natural length.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TemplateField {
    kind: FieldKind,
    width: Option<usize>,
}

impl TemplateField {
    /// Creates an unconstrained field for the given kind.
    pub fn new(kind: FieldKind) -> Self {
        Self { kind, width: None }
    }

    /// Declares a fixed width in characters.
    pub fn width(mut self, width: usize) -> Self {
        self.width = Some(width);
        self
    }
}

/// A fixed-layout display template.
///
/// Fields are rendered in declared order and joined with single spaces.
/// Rendering is total: missing optional fields become empty strings, never
/// errors.
///
/// # Examples
///
/// ```
/// use knoll::{DisplayTemplate, FieldKind, TemplateField};
///
/// let template = DisplayTemplate::new()
///     .field(TemplateField::new(FieldKind::Title).width(20))
///     .field(TemplateField::new(FieldKind::Tags));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayTemplate {
    fields: Vec<TemplateField>,
    root: Option<PathBuf>,
}

impl DisplayTemplate {
    /// Creates an empty template.
    pub fn new() -> Self {
        Self {
            fields: Vec::new(),
            root: None,
        }
    }

    /// Appends a field to the layout.
    pub fn field(mut self, field: TemplateField) -> Self {
        self.fields.push(field);
        self
    }

    /// Sets the knowledge-base root stripped from `File` fields.
    pub fn root(mut self, root: impl Into<PathBuf>) -> Self {
        self.root = Some(root.into());
        self
    }

    /// Renders a node into a label with one span per field.
    pub fn render(&self, node: &Node) -> Label {
        let mut text = String::new();
        let mut spans = Vec::with_capacity(self.fields.len());

        for (i, field) in self.fields.iter().enumerate() {
            if i > 0 {
                text.push(' ');
            }
            let rendered = fit_width(&self.render_field(field.kind, node), field.width);
            let start = text.len();
            text.push_str(&rendered);
            spans.push(LabelSpan {
                field: field.kind,
                start,
                end: text.len(),
            });
        }

        Label::new(text, spans)
    }

    fn render_field(&self, kind: FieldKind, node: &Node) -> String {
        match kind {
            FieldKind::Title => node.title().to_string(),
            FieldKind::FileTitle => node.file_title().unwrap_or_default().to_string(),
            FieldKind::File => {
                let path = match &self.root {
                    Some(root) => node.file().strip_prefix(root).unwrap_or(node.file()),
                    None => node.file(),
                };
                path.display().to_string()
            }
            FieldKind::Olp => node.olp().join(" > "),
            FieldKind::Level => node.level().to_string(),
            FieldKind::Point => node.point().to_string(),
            FieldKind::Todo => match node.todo() {
                Some(todo) => format!("t:{todo}"),
                None => String::new(),
            },
            FieldKind::Priority => node.priority().unwrap_or_default().to_string(),
            FieldKind::Scheduled => node.scheduled().unwrap_or_default().to_string(),
            FieldKind::Deadline => node.deadline().unwrap_or_default().to_string(),
            FieldKind::Tags => node
                .tags()
                .iter()
                .map(|tag| format!("#{tag}"))
                .collect::<Vec<_>>()
                .join(" "),
            FieldKind::Aliases => node.aliases().join(" "),
            FieldKind::Refs => node
                .refs()
                .iter()
                .map(|r| r.to_string())
                .collect::<Vec<_>>()
                .join(" "),
        }
    }
}

impl Default for DisplayTemplate {
    /// The reference layout: todo (10), tags (30), title (40), file path,
    /// outline path.
    fn default() -> Self {
        Self::new()
            .field(TemplateField::new(FieldKind::Todo).width(10))
            .field(TemplateField::new(FieldKind::Tags).width(30))
            .field(TemplateField::new(FieldKind::Title).width(40))
            .field(TemplateField::new(FieldKind::File))
            .field(TemplateField::new(FieldKind::Olp))
    }
}

/// Truncates or space-pads `value` to exactly `width` characters.
fn fit_width(value: &str, width: Option<usize>) -> String {
    match width {
        None => value.to_string(),
        Some(width) => {
            let truncated: String = value.chars().take(width).collect();
            format!("{truncated:<width$}")
        }
    }
}

/// A caller-supplied label function. The returned text becomes the label
/// verbatim; an `Err` aborts the whole retrieval call.
pub type FormatFn = Box<dyn Fn(&Node) -> anyhow::Result<String>>;

/// How nodes are turned into candidate labels.
///
/// The variant is chosen once when the pipeline is configured, not
/// re-inspected per node.
pub enum NodeFormatter {
    /// Label is the callback's returned text, with no field spans.
    Callback(FormatFn),
    /// Label is the fixed-width field layout rendered by the template.
    Template(DisplayTemplate),
}

impl NodeFormatter {
    /// Wraps a callback function.
    pub fn callback(f: impl Fn(&Node) -> anyhow::Result<String> + 'static) -> Self {
        Self::Callback(Box::new(f))
    }

    /// Wraps a display template.
    pub fn template(template: DisplayTemplate) -> Self {
        Self::Template(template)
    }

    /// Formats a node into a candidate.
    ///
    /// # Errors
    ///
    /// Returns [`FormatError`] naming the node if a callback fails.
    /// Template rendering is total and cannot fail.
    pub fn format(&self, node: Node) -> Result<Candidate, FormatError> {
        match self {
            Self::Callback(f) => {
                let text = f(&node).map_err(|e| FormatError {
                    node_id: node.id().clone(),
                    title: node.title().to_string(),
                    reason: e.to_string(),
                })?;
                Ok(Candidate::new(Label::plain(text), node))
            }
            Self::Template(template) => {
                let label = template.render(&node);
                Ok(Candidate::new(label, node))
            }
        }
    }
}

impl Default for NodeFormatter {
    fn default() -> Self {
        Self::Template(DisplayTemplate::default())
    }
}

impl fmt::Debug for NodeFormatter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Callback(_) => f.write_str("NodeFormatter::Callback(..)"),
            Self::Template(template) => f.debug_tuple("NodeFormatter::Template").field(template).finish(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{NodeBuilder, NodeRef};

    fn sample_node() -> Node {
        NodeBuilder::new()
            .id("n1")
            .file("/home/kb/projects/deep.org")
            .title("Focus blocks")
            .todo("TODO")
            .tags(vec!["work".to_string(), "focus".to_string()])
            .olp(vec!["Projects".to_string(), "Deep Work".to_string()])
            .refs(vec![NodeRef::new("cite", "newport2016")])
            .build()
    }

    #[test]
    fn width_contract_pads_short_values() {
        let template =
            DisplayTemplate::new().field(TemplateField::new(FieldKind::Title).width(10));
        let node = NodeBuilder::new()
            .id("n1")
            .file("a.org")
            .title("Hello")
            .build();

        let label = template.render(&node);
        assert_eq!(label.text(), "Hello     ");
        assert_eq!(label.text().len(), 10);
    }

    #[test]
    fn width_contract_truncates_long_values() {
        let template =
            DisplayTemplate::new().field(TemplateField::new(FieldKind::Title).width(5));
        let node = NodeBuilder::new()
            .id("n1")
            .file("a.org")
            .title("Hello world")
            .build();

        let label = template.render(&node);
        assert_eq!(label.text(), "Hello");
    }

    #[test]
    fn width_is_counted_in_characters_not_bytes() {
        let template =
            DisplayTemplate::new().field(TemplateField::new(FieldKind::Title).width(4));
        let node = NodeBuilder::new()
            .id("n1")
            .file("a.org")
            .title("héllo")
            .build();

        let label = template.render(&node);
        assert_eq!(label.text().chars().count(), 4);
        assert_eq!(label.text(), "héll");
    }

    #[test]
    fn formatting_is_idempotent() {
        let template = DisplayTemplate::default();
        let node = sample_node();

        let first = template.render(&node);
        let second = template.render(&node);
        assert_eq!(first, second);
    }

    #[test]
    fn missing_optional_fields_render_as_padded_blanks() {
        let template = DisplayTemplate::new()
            .field(TemplateField::new(FieldKind::Todo).width(10))
            .field(TemplateField::new(FieldKind::Scheduled).width(8));
        let node = NodeBuilder::new()
            .id("n1")
            .file("a.org")
            .title("No metadata")
            .build();

        let label = template.render(&node);
        assert_eq!(label.text(), " ".repeat(19));
        assert_eq!(label.text().len(), 19, "10 + separator + 8");
    }

    #[test]
    fn default_template_reference_layout() {
        let template = DisplayTemplate::default().root("/home/kb");
        let label = template.render(&sample_node());

        let expected = format!(
            "{:<10} {:<30} {:<40} {} {}",
            "t:TODO",
            "#work #focus",
            "Focus blocks",
            "projects/deep.org",
            "Projects > Deep Work"
        );
        assert_eq!(label.text(), expected);
    }

    #[test]
    fn file_without_matching_root_is_rendered_unstripped() {
        let template = DisplayTemplate::new()
            .field(TemplateField::new(FieldKind::File))
            .root("/elsewhere");
        let label = template.render(&sample_node());
        assert_eq!(label.text(), "/home/kb/projects/deep.org");
    }

    #[test]
    fn spans_cover_each_field_in_order() {
        let template = DisplayTemplate::new()
            .field(TemplateField::new(FieldKind::Todo).width(10))
            .field(TemplateField::new(FieldKind::Title).width(12));
        let label = template.render(&sample_node());

        assert_eq!(label.spans().len(), 2);
        assert_eq!(label.spans()[0].field, FieldKind::Todo);
        assert_eq!(label.spans()[1].field, FieldKind::Title);
        assert_eq!(
            &label.text()[label.spans()[0].start..label.spans()[0].end],
            "t:TODO    "
        );
        assert_eq!(
            &label.text()[label.spans()[1].start..label.spans()[1].end],
            "Focus blocks"
        );
    }

    #[test]
    fn callback_mode_uses_returned_text_verbatim() {
        let formatter = NodeFormatter::callback(|node| Ok(format!("<<{}>>", node.title())));
        let candidate = formatter.format(sample_node()).unwrap();

        assert_eq!(candidate.label().text(), "<<Focus blocks>>");
        assert!(candidate.label().spans().is_empty());
    }

    #[test]
    fn callback_error_becomes_format_error_naming_the_node() {
        let formatter = NodeFormatter::callback(|_| anyhow::bail!("refused"));
        let err = formatter.format(sample_node()).unwrap_err();

        assert_eq!(err.node_id.as_str(), "n1");
        assert_eq!(err.title, "Focus blocks");
        assert!(err.to_string().contains("refused"));
    }

    #[test]
    fn refs_and_aliases_fields_render_joined() {
        let template = DisplayTemplate::new()
            .field(TemplateField::new(FieldKind::Refs))
            .field(TemplateField::new(FieldKind::Aliases));
        let node = NodeBuilder::new()
            .id("n1")
            .file("a.org")
            .title("T")
            .aliases(vec!["One".to_string(), "Two".to_string()])
            .refs(vec![
                NodeRef::new("cite", "a1"),
                NodeRef::new("https", "//x.org"),
            ])
            .build();

        let label = template.render(&node);
        assert_eq!(label.text(), "cite:a1 https://x.org One Two");
    }
}

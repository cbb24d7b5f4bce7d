use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use super::NodeId;

/// An external reference attached to a node, e.g. a citation key or URL.
///
/// Stored as a (type, value) pair: `cite:someKey2024`, `https://example.org`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeRef {
    /// The reference type, e.g. "cite" or "https".
    pub ref_type: String,
    /// The reference value.
    pub value: String,
}

impl NodeRef {
    /// Creates a new reference pair.
    pub fn new(ref_type: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            ref_type: ref_type.into(),
            value: value.into(),
        }
    }
}

impl fmt::Display for NodeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.ref_type, self.value)
    }
}

/// A single note heading with stable identity.
///
/// Nodes are the unit of retrieval and selection. Each node carries its
/// location within the containing file, scalar heading attributes, and the
/// multi-valued relations (tags, aliases, refs) folded in by the
/// aggregating query.
///
/// `title` holds the currently-selected title variant: the heading's
/// primary title, or one of its aliases. Every other field is identical
/// across all candidates expanded from the same node id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    id: NodeId,
    file: PathBuf,
    file_title: Option<String>,
    level: i64,
    point: i64,
    olp: Vec<String>,
    title: String,
    todo: Option<String>,
    priority: Option<String>,
    scheduled: Option<String>,
    deadline: Option<String>,
    properties: BTreeMap<String, String>,
    #[serde(with = "time::serde::rfc3339")]
    file_atime: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    file_mtime: OffsetDateTime,
    tags: Vec<String>,
    aliases: Vec<String>,
    refs: Vec<NodeRef>,
}

impl Node {
    /// Returns the node's stable identifier.
    pub fn id(&self) -> &NodeId {
        &self.id
    }

    /// Returns the path of the containing file.
    pub fn file(&self) -> &Path {
        &self.file
    }

    /// Returns the display title of the containing file, if known.
    pub fn file_title(&self) -> Option<&str> {
        self.file_title.as_deref()
    }

    /// Returns the outline depth of the heading (0 for file-level nodes).
    pub fn level(&self) -> i64 {
        self.level
    }

    /// Returns the byte offset of the heading within its file.
    pub fn point(&self) -> i64 {
        self.point
    }

    /// Returns the outline path from the file root to this heading.
    pub fn olp(&self) -> &[String] {
        &self.olp
    }

    /// Returns the currently-selected title variant.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Returns the TODO keyword, if any.
    pub fn todo(&self) -> Option<&str> {
        self.todo.as_deref()
    }

    /// Returns the priority string, if any.
    pub fn priority(&self) -> Option<&str> {
        self.priority.as_deref()
    }

    /// Returns the scheduled date string, if any.
    pub fn scheduled(&self) -> Option<&str> {
        self.scheduled.as_deref()
    }

    /// Returns the deadline date string, if any.
    pub fn deadline(&self) -> Option<&str> {
        self.deadline.as_deref()
    }

    /// Returns the heading's property drawer entries.
    pub fn properties(&self) -> &BTreeMap<String, String> {
        &self.properties
    }

    /// Returns the last access time of the containing file.
    pub fn file_atime(&self) -> OffsetDateTime {
        self.file_atime
    }

    /// Returns the last modification time of the containing file.
    pub fn file_mtime(&self) -> OffsetDateTime {
        self.file_mtime
    }

    /// Returns the node's tags. The store enforces uniqueness.
    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    /// Returns the node's aliases (alternate titles). The full alias set is
    /// present on every candidate, including those selected via an alias.
    pub fn aliases(&self) -> &[String] {
        &self.aliases
    }

    /// Returns the node's external references in stored order.
    pub fn refs(&self) -> &[NodeRef] {
        &self.refs
    }

    /// Returns a copy of this node with a different title variant.
    ///
    /// Used by candidate expansion: every field except `title` is shared
    /// with the original, so all variants of a node remain interchangeable
    /// once one is selected.
    pub fn retitled(&self, title: impl Into<String>) -> Node {
        Node {
            title: title.into(),
            ..self.clone()
        }
    }
}

/// Builder for constructing `Node` instances with optional fields.
///
/// # Examples
///
/// ```
/// use knoll::NodeBuilder;
///
/// let node = NodeBuilder::new()
///     .id("n1")
///     .file("notes/inbox.org")
///     .title("Weekly review")
///     .tags(vec!["work".to_string()])
///     .build();
///
/// assert_eq!(node.id().as_str(), "n1");
/// assert_eq!(node.title(), "Weekly review");
/// assert!(node.aliases().is_empty());
/// ```
#[derive(Debug, Default)]
pub struct NodeBuilder {
    id: Option<NodeId>,
    file: Option<PathBuf>,
    file_title: Option<String>,
    level: i64,
    point: i64,
    olp: Vec<String>,
    title: Option<String>,
    todo: Option<String>,
    priority: Option<String>,
    scheduled: Option<String>,
    deadline: Option<String>,
    properties: BTreeMap<String, String>,
    file_atime: Option<OffsetDateTime>,
    file_mtime: Option<OffsetDateTime>,
    tags: Vec<String>,
    aliases: Vec<String>,
    refs: Vec<NodeRef>,
}

impl NodeBuilder {
    /// Creates a new `NodeBuilder`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the node id.
    pub fn id(mut self, id: impl Into<NodeId>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Sets the containing file path.
    pub fn file(mut self, file: impl Into<PathBuf>) -> Self {
        self.file = Some(file.into());
        self
    }

    /// Sets the containing file's display title.
    pub fn file_title(mut self, title: impl Into<String>) -> Self {
        self.file_title = Some(title.into());
        self
    }

    /// Sets the outline depth.
    pub fn level(mut self, level: i64) -> Self {
        self.level = level;
        self
    }

    /// Sets the byte offset of the heading.
    pub fn point(mut self, point: i64) -> Self {
        self.point = point;
        self
    }

    /// Sets the outline path.
    pub fn olp(mut self, olp: Vec<String>) -> Self {
        self.olp = olp;
        self
    }

    /// Sets the primary title.
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Sets the TODO keyword.
    pub fn todo(mut self, todo: impl Into<String>) -> Self {
        self.todo = Some(todo.into());
        self
    }

    /// Sets the priority string.
    pub fn priority(mut self, priority: impl Into<String>) -> Self {
        self.priority = Some(priority.into());
        self
    }

    /// Sets the scheduled date string.
    pub fn scheduled(mut self, scheduled: impl Into<String>) -> Self {
        self.scheduled = Some(scheduled.into());
        self
    }

    /// Sets the deadline date string.
    pub fn deadline(mut self, deadline: impl Into<String>) -> Self {
        self.deadline = Some(deadline.into());
        self
    }

    /// Sets the property drawer entries.
    pub fn properties(mut self, properties: BTreeMap<String, String>) -> Self {
        self.properties = properties;
        self
    }

    /// Sets the file access time.
    pub fn file_atime(mut self, atime: OffsetDateTime) -> Self {
        self.file_atime = Some(atime);
        self
    }

    /// Sets the file modification time.
    pub fn file_mtime(mut self, mtime: OffsetDateTime) -> Self {
        self.file_mtime = Some(mtime);
        self
    }

    /// Sets the tag set.
    pub fn tags(mut self, tags: Vec<String>) -> Self {
        self.tags = tags;
        self
    }

    /// Sets the alias set.
    pub fn aliases(mut self, aliases: Vec<String>) -> Self {
        self.aliases = aliases;
        self
    }

    /// Sets the reference list.
    pub fn refs(mut self, refs: Vec<NodeRef>) -> Self {
        self.refs = refs;
        self
    }

    /// Builds the `Node`, using defaults for optional fields.
    ///
    /// # Panics
    ///
    /// Panics if `id`, `file`, or `title` have not been set.
    pub fn build(self) -> Node {
        let now = OffsetDateTime::now_utc();
        Node {
            id: self.id.expect("id is required"),
            file: self.file.expect("file is required"),
            file_title: self.file_title,
            level: self.level,
            point: self.point,
            olp: self.olp,
            title: self.title.expect("title is required"),
            todo: self.todo,
            priority: self.priority,
            scheduled: self.scheduled,
            deadline: self.deadline,
            properties: self.properties,
            file_atime: self.file_atime.unwrap_or(now),
            file_mtime: self.file_mtime.unwrap_or(now),
            tags: self.tags,
            aliases: self.aliases,
            refs: self.refs,
        }
    }
}

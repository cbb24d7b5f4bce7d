//! The aggregating node query and its row decoder.
//!
//! A node relates to three independent one-to-many tables (tags, aliases,
//! refs). Joining all three at once yields T x A x R rows per node, so the
//! query collapses the fan-out with three nested grouping passes, innermost
//! first:
//!
//! 1. group by (node id, tag, alias), concatenating refs - each (tag, alias)
//!    pair sees the full ref list exactly once;
//! 2. group by (node id, tag), concatenating aliases - the refs column is
//!    constant within each group and passes through;
//! 3. group by node id, concatenating tags - aliases and refs pass through.
//!
//! Each concatenated list uses U+001F (`char(31)`) as its element
//! separator, which cannot occur in note text.

use rusqlite::Connection;

use crate::db::Database;
use crate::error::{DecodeError, RetrievalError};
use crate::models::{Node, NodeBuilder, NodeRef};

/// Separator between elements of a concatenated list column.
pub(crate) const LIST_SEPARATOR: char = '\u{1f}';

/// One denormalized row per node, with scalar columns plus the three
/// relation-derived list columns produced by the nested aggregation.
const NODE_LIST_QUERY: &str = r#"
SELECT id, file, file_title, level, point, todo, priority, scheduled,
       deadline, title, properties, olp, atime, mtime,
       group_concat(tag, char(31)) AS tags, aliases, refs
FROM (
    SELECT id, file, file_title, level, point, todo, priority, scheduled,
           deadline, title, properties, olp, atime, mtime, tag,
           group_concat(alias, char(31)) AS aliases, refs
    FROM (
        SELECT nodes.id AS id,
               nodes.file AS file,
               files.title AS file_title,
               nodes.level AS level,
               nodes.point AS point,
               nodes.todo AS todo,
               nodes.priority AS priority,
               nodes.scheduled AS scheduled,
               nodes.deadline AS deadline,
               nodes.title AS title,
               nodes.properties AS properties,
               nodes.olp AS olp,
               files.atime AS atime,
               files.mtime AS mtime,
               tags.tag AS tag,
               aliases.alias AS alias,
               group_concat(refs.type || ':' || refs.ref, char(31)) AS refs
        FROM nodes
        LEFT JOIN files ON files.file = nodes.file
        LEFT JOIN tags ON tags.node_id = nodes.id
        LEFT JOIN aliases ON aliases.node_id = nodes.id
        LEFT JOIN refs ON refs.node_id = nodes.id
        GROUP BY nodes.id, tags.tag, aliases.alias
    )
    GROUP BY id, tag
)
GROUP BY id
"#;

/// A raw denormalized row as returned by the aggregating query.
///
/// Scalar columns are decoded by rusqlite; the list columns (`tags`,
/// `aliases`, `refs`) and the JSON columns (`properties`, `olp`) remain
/// encoded until [`NodeRow::expand`].
#[derive(Debug, Clone)]
pub struct NodeRow {
    id: String,
    file: String,
    file_title: Option<String>,
    level: i64,
    point: i64,
    todo: Option<String>,
    priority: Option<String>,
    scheduled: Option<String>,
    deadline: Option<String>,
    title: String,
    properties: Option<String>,
    olp: Option<String>,
    atime: Option<i64>,
    mtime: Option<i64>,
    tags: Option<String>,
    aliases: Option<String>,
    refs: Option<String>,
}

/// Issues the aggregating query, returning one row per node.
///
/// With `sort_by_mtime` the ordering is pushed down to the store as a
/// trailing `ORDER BY mtime DESC`, which is materially cheaper than a
/// client-side sort on large corpora.
///
/// # Errors
///
/// Returns [`RetrievalError`] if the query cannot be executed or a row
/// cannot be mapped (unreachable store, schema mismatch). No partial
/// results are returned.
pub fn fetch_node_rows(
    db: &Database,
    sort_by_mtime: bool,
) -> Result<Vec<NodeRow>, RetrievalError> {
    fetch_rows(db.connection(), sort_by_mtime)
}

fn fetch_rows(conn: &Connection, sort_by_mtime: bool) -> Result<Vec<NodeRow>, RetrievalError> {
    let sql = if sort_by_mtime {
        format!("{NODE_LIST_QUERY} ORDER BY mtime DESC")
    } else {
        NODE_LIST_QUERY.to_string()
    };

    let mut stmt = conn.prepare(&sql)?;
    let mapped = stmt.query_map([], |row| {
        Ok(NodeRow {
            id: row.get(0)?,
            file: row.get(1)?,
            file_title: row.get(2)?,
            level: row.get(3)?,
            point: row.get(4)?,
            todo: row.get(5)?,
            priority: row.get(6)?,
            scheduled: row.get(7)?,
            deadline: row.get(8)?,
            title: row.get(9)?,
            properties: row.get(10)?,
            olp: row.get(11)?,
            atime: row.get(12)?,
            mtime: row.get(13)?,
            tags: row.get(14)?,
            aliases: row.get(15)?,
            refs: row.get(16)?,
        })
    })?;

    let mut rows = Vec::new();
    for row in mapped {
        rows.push(row?);
    }
    Ok(rows)
}

impl NodeRow {
    /// Decodes this row into one [`Node`] per title variant.
    ///
    /// The variant set is the primary title plus the aliases; the primary
    /// title is emitted first, then aliases in decoded order. Every variant
    /// carries the complete alias set, so a candidate selected via an alias
    /// still knows all its names. An alias equal to the primary title does
    /// not produce a second record.
    ///
    /// Empty relations decode to empty containers.
    ///
    /// # Errors
    ///
    /// Returns [`DecodeError`] for a ref pair missing its `:` separator,
    /// malformed `properties`/`olp` JSON, or an out-of-range timestamp.
    pub fn expand(self) -> Result<Vec<Node>, DecodeError> {
        let tags = decode_list(self.tags.as_deref());
        let aliases = decode_list(self.aliases.as_deref());
        let refs = decode_refs(&self.id, self.refs.as_deref())?;
        let properties = decode_properties(&self.id, self.properties.as_deref())?;
        let olp = decode_olp(&self.id, self.olp.as_deref())?;
        let atime = decode_timestamp(&self.id, "atime", self.atime)?;
        let mtime = decode_timestamp(&self.id, "mtime", self.mtime)?;

        let mut builder = NodeBuilder::new()
            .id(self.id.as_str())
            .file(self.file)
            .level(self.level)
            .point(self.point)
            .olp(olp)
            .title(self.title)
            .properties(properties)
            .file_atime(atime)
            .file_mtime(mtime)
            .tags(tags)
            .aliases(aliases)
            .refs(refs);
        if let Some(file_title) = self.file_title {
            builder = builder.file_title(file_title);
        }
        if let Some(todo) = self.todo {
            builder = builder.todo(todo);
        }
        if let Some(priority) = self.priority {
            builder = builder.priority(priority);
        }
        if let Some(scheduled) = self.scheduled {
            builder = builder.scheduled(scheduled);
        }
        if let Some(deadline) = self.deadline {
            builder = builder.deadline(deadline);
        }
        let primary = builder.build();

        let mut nodes = Vec::with_capacity(1 + primary.aliases().len());
        nodes.push(primary.clone());
        for alias in primary.aliases() {
            if nodes.iter().all(|n| n.title() != alias) {
                nodes.push(primary.retitled(alias.clone()));
            }
        }
        Ok(nodes)
    }
}

fn decode_list(encoded: Option<&str>) -> Vec<String> {
    match encoded {
        None | Some("") => Vec::new(),
        Some(s) => s.split(LIST_SEPARATOR).map(String::from).collect(),
    }
}

fn decode_refs(node_id: &str, encoded: Option<&str>) -> Result<Vec<NodeRef>, DecodeError> {
    decode_list(encoded)
        .into_iter()
        .map(|pair| {
            // Split on the first ':' only; URL-shaped values keep theirs.
            pair.split_once(':')
                .map(|(ref_type, value)| NodeRef::new(ref_type, value))
                .ok_or_else(|| DecodeError {
                    node_id: node_id.to_string(),
                    column: "refs",
                    reason: format!("reference {pair:?} is missing its ':' separator"),
                })
        })
        .collect()
}

fn decode_properties(
    node_id: &str,
    encoded: Option<&str>,
) -> Result<std::collections::BTreeMap<String, String>, DecodeError> {
    match encoded {
        None | Some("") => Ok(Default::default()),
        Some(s) => serde_json::from_str(s).map_err(|e| DecodeError {
            node_id: node_id.to_string(),
            column: "properties",
            reason: e.to_string(),
        }),
    }
}

fn decode_olp(node_id: &str, encoded: Option<&str>) -> Result<Vec<String>, DecodeError> {
    match encoded {
        None | Some("") => Ok(Vec::new()),
        Some(s) => serde_json::from_str(s).map_err(|e| DecodeError {
            node_id: node_id.to_string(),
            column: "olp",
            reason: e.to_string(),
        }),
    }
}

fn decode_timestamp(
    node_id: &str,
    column: &'static str,
    value: Option<i64>,
) -> Result<time::OffsetDateTime, DecodeError> {
    time::OffsetDateTime::from_unix_timestamp(value.unwrap_or(0)).map_err(|e| DecodeError {
        node_id: node_id.to_string(),
        column,
        reason: e.to_string(),
    })
}

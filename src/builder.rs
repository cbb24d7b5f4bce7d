use std::cmp::Ordering;

use crate::db::Database;
use crate::error::Error;
use crate::format::NodeFormatter;
use crate::models::{Candidate, Node};
use crate::query;

/// Default ordering applied when no explicit comparator is supplied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKey {
    /// Most recently modified file first. This is the only key the store
    /// can pre-sort, so it is pushed down into the aggregating query.
    #[default]
    FileMtime,
    /// Most recently accessed file first.
    FileAtime,
    /// Title, ascending.
    Title,
}

/// Predicate deciding whether a node is offered as a candidate.
pub type FilterFn = Box<dyn Fn(&Node) -> bool>;

/// Comparator over formatted candidates.
pub type SortComparator = Box<dyn Fn(&Candidate, &Candidate) -> Ordering>;

/// Assembles the candidate list: retrieval, optional filtering, formatting,
/// and ordering, in one stateless pass per [`list`](Self::list) call.
///
/// The builder borrows the [`Database`] it reads from; the host composes it
/// in explicitly rather than rebinding any global retrieval function. Each
/// call constructs fresh candidates, and the returned list is owned by the
/// caller.
///
/// # Examples
///
/// ```
/// use knoll::{CandidateListBuilder, Database, SortKey};
///
/// # fn main() -> anyhow::Result<()> {
/// let db = Database::in_memory()?;
///
/// let candidates = CandidateListBuilder::new(&db)
///     .filter(|node| node.todo().is_some())
///     .sort_key(SortKey::Title)
///     .list()?;
///
/// assert!(candidates.is_empty());
/// # Ok(())
/// # }
/// ```
pub struct CandidateListBuilder<'db> {
    db: &'db Database,
    filter: Option<FilterFn>,
    comparator: Option<SortComparator>,
    formatter: NodeFormatter,
    sort_key: SortKey,
}

impl<'db> CandidateListBuilder<'db> {
    /// Creates a builder over the given store with the default
    /// configuration: no filter, no comparator, the default display
    /// template, and [`SortKey::FileMtime`] ordering.
    pub fn new(db: &'db Database) -> Self {
        Self {
            db,
            filter: None,
            comparator: None,
            formatter: NodeFormatter::default(),
            sort_key: SortKey::default(),
        }
    }

    /// Keeps only nodes for which the predicate returns true. The relative
    /// order of surviving nodes is preserved.
    pub fn filter(mut self, filter: impl Fn(&Node) -> bool + 'static) -> Self {
        self.filter = Some(Box::new(filter));
        self
    }

    /// Orders the final list with an explicit comparator. Overrides the
    /// sort key, and disables the retrieval-time sort push-down.
    pub fn sort_with(
        mut self,
        compare: impl Fn(&Candidate, &Candidate) -> Ordering + 'static,
    ) -> Self {
        self.comparator = Some(Box::new(compare));
        self
    }

    /// Sets the default sort key used when no comparator is supplied.
    pub fn sort_key(mut self, key: SortKey) -> Self {
        self.sort_key = key;
        self
    }

    /// Sets how nodes are rendered into labels.
    pub fn formatter(mut self, formatter: NodeFormatter) -> Self {
        self.formatter = formatter;
        self
    }

    /// Produces the ordered candidate list.
    ///
    /// Pipeline: retrieve one denormalized row per node (pre-sorted by the
    /// store when no comparator is set and the key is modification time),
    /// expand each row into one node per title variant, apply the filter,
    /// format every retained node, then sort in memory only when the
    /// retrieval-time order is not already correct.
    ///
    /// # Errors
    ///
    /// Any retrieval, decode, or format failure aborts the call; no
    /// partial list is returned.
    pub fn list(&self) -> Result<Vec<Candidate>, Error> {
        let push_down = self.comparator.is_none() && self.sort_key == SortKey::FileMtime;

        let rows = query::fetch_node_rows(self.db, push_down)?;
        let mut nodes = Vec::with_capacity(rows.len());
        for row in rows {
            nodes.extend(row.expand()?);
        }

        if let Some(filter) = &self.filter {
            nodes.retain(|node| filter(node));
        }

        let mut candidates = Vec::with_capacity(nodes.len());
        for node in nodes {
            candidates.push(self.formatter.format(node)?);
        }

        if let Some(compare) = &self.comparator {
            candidates.sort_by(|a, b| compare(a, b));
        } else if !push_down {
            sort_by_key(&mut candidates, self.sort_key);
        }

        Ok(candidates)
    }
}

fn sort_by_key(candidates: &mut [Candidate], key: SortKey) {
    match key {
        SortKey::FileMtime => {
            candidates.sort_by(|a, b| b.node().file_mtime().cmp(&a.node().file_mtime()));
        }
        SortKey::FileAtime => {
            candidates.sort_by(|a, b| b.node().file_atime().cmp(&a.node().file_atime()));
        }
        SortKey::Title => candidates.sort_by(|a, b| a.node().title().cmp(b.node().title())),
    }
}

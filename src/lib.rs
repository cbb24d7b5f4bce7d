pub mod builder;
pub mod db;
pub mod error;
pub mod format;
pub mod models;
pub mod query;
pub mod tui;
pub mod utils;

pub use builder::{CandidateListBuilder, SortKey};
pub use db::Database;
pub use error::{DecodeError, Error, FormatError, RetrievalError};
pub use format::{DisplayTemplate, FieldKind, NodeFormatter, TemplateField};
pub use models::{Candidate, Label, LabelSpan, Node, NodeBuilder, NodeId, NodeRef};

mod candidate;
mod ids;
mod node;

pub use candidate::{Candidate, Label, LabelSpan};
pub use ids::NodeId;
pub use node::{Node, NodeBuilder, NodeRef};

//! Syntax tree storage and traversal for the jscope toolkit.
//!
//! This crate is the tree collaborator of the scope engine: an arena-backed
//! tree with parent links maintained at construction, typed constructors
//! for programmatic tree building, child enumeration with stable edge keys,
//! key-path addressing, and the small in-place mutation surface the
//! re-crawl workflow needs.

pub mod arena;
pub mod node;
pub mod visit;

pub use arena::NodeArena;
pub use node::{
    AccessorKind, AssignOp, BinaryOp, DeclKeyword, LiteralKind, Node, NodeIndex, NodeKind,
    NodeList, SourceKind, SyntaxKind, UnaryOp, UpdateOp,
};
pub use visit::{ChildEdge, children_of, find_at_path, key_path, walk};

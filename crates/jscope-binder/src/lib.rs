//! Scope and binding resolution for ECMAScript-family syntax trees.
//!
//! Given a tree built with `jscope-ast`, [`ScopeTree::crawl`] derives the
//! lexical scope structure: one [`Scope`] per scope-introducing node, a
//! [`Binding`] per declared name, every identifier reference resolved to
//! the binding it denotes (or recorded as an unresolved global), and the
//! host language's duplicate-declaration rules enforced along the way.
//!
//! Derived queries run against the finished tree: collision-free synthetic
//! name generation ([`ScopeTree::generate_uid`]), conservative purity
//! judgment ([`ScopeTree::is_pure`]), and incremental re-analysis after a
//! tree mutation ([`ScopeTree::recrawl`]).

use serde::Serialize;

pub mod error;
pub mod kind;
mod purity;
mod state;
mod state_binding;
mod state_import_export;
mod state_node_binding;
mod state_resolution;
mod uid;

pub use error::{BindError, ValidationError};
pub use kind::{BindingKind, DeclClass, classify, is_legal_pair};
pub use state::{Binding, BindingId, CrawlStats, Scope, ScopeId, ScopeTree};
pub use uid::is_reserved_word;

/// What kind of node introduced a scope.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum ContainerKind {
    /// The tree root.
    Program,
    /// Function declaration/expression, arrow, or method. Parameters and
    /// body-level declarations share this scope; `var` hoists here.
    Function,
    /// Class declaration/expression body (holds the `local` name of class
    /// expressions).
    Class,
    /// Plain block or class static block.
    Block,
    /// Catch clause; the handler block merges into it so the parameter and
    /// block-scoped declarations share one namespace.
    Catch,
    /// `for` / `for-in` / `for-of` head scope.
    Loop,
    /// `switch` statement; all case clauses share it.
    Switch,
}

impl ContainerKind {
    /// True for the scopes `var` and hoisted functions register into.
    pub const fn is_hoist_target(self) -> bool {
        matches!(self, ContainerKind::Program | ContainerKind::Function)
    }
}

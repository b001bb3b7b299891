//! Error types for crawl and post-crawl validation.

use jscope_ast::NodeIndex;
use serde::Serialize;
use std::fmt;

use crate::state::ScopeId;

/// Fatal crawl failure. The tree must be fixed and re-crawled; scopes built
/// before the failure are left intact.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub enum BindError {
    /// Two declarations of the same name violate the legality matrix.
    DuplicateDeclaration {
        name: String,
        /// Declaration node already registered in the scope.
        first: NodeIndex,
        /// Declaration node that collided with it.
        second: NodeIndex,
        scope: ScopeId,
    },
}

impl fmt::Display for BindError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BindError::DuplicateDeclaration {
                name,
                first,
                second,
                scope,
            } => write!(
                f,
                "duplicate declaration of \"{name}\" in scope {} (nodes {} and {})",
                scope.0, first.0, second.0
            ),
        }
    }
}

impl std::error::Error for BindError {}

/// Consistency problems reported by [`crate::ScopeTree::validate`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub enum ValidationError {
    /// A node is mapped to a binding id that does not exist.
    BrokenBindingLink { node_index: u32, binding_id: u32 },
    /// A scope table entry points at a binding owned by another scope.
    StaleScopeLink {
        scope: ScopeId,
        name: String,
        binding_id: u32,
    },
    /// A binding has no declaration node.
    MissingDeclaration { binding_id: u32, name: String },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::BrokenBindingLink {
                node_index,
                binding_id,
            } => write!(f, "node {node_index} maps to missing binding {binding_id}"),
            ValidationError::StaleScopeLink {
                scope,
                name,
                binding_id,
            } => write!(
                f,
                "scope {} entry \"{name}\" points at binding {binding_id} owned elsewhere",
                scope.0
            ),
            ValidationError::MissingDeclaration { binding_id, name } => {
                write!(f, "binding {binding_id} (\"{name}\") has no declaration node")
            }
        }
    }
}

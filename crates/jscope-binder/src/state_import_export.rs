//! Import and export declaration binding.
//!
//! Every import specifier flavor (default, named, aliased, namespace,
//! type-only) produces a `module` binding whose declaration node is the
//! specifier itself. Re-export-only names are bookkeeping and never count
//! as references; local `export { x }` reads the binding it exports.

use jscope_ast::node::{ExportNamedData, ImportData};
use jscope_ast::{NodeArena, NodeKind};
use tracing::debug;

use crate::error::BindError;
use crate::kind::BindingKind;
use crate::state::ScopeTree;

impl ScopeTree {
    pub(crate) fn bind_import_declaration(
        &mut self,
        arena: &NodeArena,
        data: &ImportData,
    ) -> Result<(), BindError> {
        for &spec_idx in &data.specifiers.nodes {
            let Some(spec_node) = arena.get(spec_idx) else {
                continue;
            };
            let local = match &spec_node.kind {
                NodeKind::ImportDefaultSpecifier(spec)
                | NodeKind::ImportNamespaceSpecifier(spec) => spec.local,
                NodeKind::ImportSpecifier(spec) => spec.local,
                _ => continue,
            };
            if let Some(name) = arena.identifier_text(local) {
                debug!(name, spec = spec_idx.0, "bind import specifier");
                if let Some(id) = self.declare(name, BindingKind::Module, spec_idx)? {
                    self.node_bindings.insert(local.0, id);
                }
            }
        }
        Ok(())
    }

    pub(crate) fn bind_export_named(
        &mut self,
        arena: &NodeArena,
        data: &ExportNamedData,
    ) -> Result<(), BindError> {
        if data.declaration.is_some() {
            self.bind_node(arena, data.declaration)?;
        }
        // `export { x } from "y"` re-exports without reading anything in
        // this tree.
        if data.source.is_some() {
            return Ok(());
        }
        for &spec_idx in &data.specifiers.nodes {
            if let Some(spec_node) = arena.get(spec_idx)
                && let NodeKind::ExportSpecifier(spec) = &spec_node.kind
                && let Some(name) = arena.identifier_text(spec.local)
            {
                // The exported alias is not a reference, the local name is.
                self.queue_read(spec.local, name);
            }
        }
        Ok(())
    }
}

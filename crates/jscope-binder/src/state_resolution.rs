//! Deferred reference resolution.
//!
//! The crawl DFS queues every identifier occurrence with its enclosing
//! scope; once the scope tree is complete, each occurrence walks the chain
//! outward to the nearest binding with its name. Deferring resolution is
//! what makes hoisted and block-scoped declarations visible to references
//! that textually precede them.

use tracing::trace;

use crate::kind::BindingKind;
use crate::state::{BindingId, PendingKind, ScopeId, ScopeTree};

impl ScopeTree {
    /// Resolve every queued occurrence in source order. Reads append to the
    /// binding's `reference_paths`; writes record constant violations.
    /// Names that resolve nowhere are recorded as globals at the crawl
    /// root.
    pub(crate) fn resolve_pending(&mut self) {
        let pending = std::mem::take(&mut self.pending);
        for item in pending {
            match self.resolve_name(item.scope, &item.name, item.param_scope) {
                Some(id) => {
                    trace!(
                        name = %item.name,
                        node = item.node.0,
                        binding = id.0,
                        "resolved reference"
                    );
                    self.node_bindings.insert(item.node.0, id);
                    if let Some(binding) = self.binding_mut(id) {
                        match item.kind {
                            PendingKind::Read => binding.reference_paths.push(item.node),
                            PendingKind::Write => {
                                binding.constant = false;
                                binding.constant_violations.push(item.node);
                            }
                        }
                    }
                }
                None => {
                    trace!(name = %item.name, node = item.node.0, "unresolved, recording global");
                    let root = self.root;
                    if let Some(scope) = self.scope_mut(root) {
                        scope.globals.entry(item.name).or_default().push(item.node);
                    }
                }
            }
        }
    }

    /// Walk the scope chain outward from `from`; first match wins. When the
    /// occurrence sits directly in a parameter list (`param_scope`),
    /// non-param/local bindings of that function scope are skipped so
    /// parameter defaults cannot see body-level declarations.
    fn resolve_name(
        &self,
        from: ScopeId,
        name: &str,
        param_scope: Option<ScopeId>,
    ) -> Option<BindingId> {
        let mut current = Some(from);
        while let Some(id) = current {
            let scope = self.scope(id)?;
            if let Some(binding_id) = scope.own_binding(name) {
                let from_params = param_scope == Some(id);
                let visible_from_params = matches!(
                    self.binding(binding_id).map(|b| b.kind),
                    Some(BindingKind::Param | BindingKind::Local)
                );
                if !from_params || visible_from_params {
                    return Some(binding_id);
                }
            }
            current = scope.parent;
        }
        None
    }
}

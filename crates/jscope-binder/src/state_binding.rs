//! Declaration registration: classifier invocation, hoist-target selection,
//! duplicate validation, and destructuring pattern flattening.

use jscope_ast::{NodeArena, NodeIndex, NodeKind};
use tracing::{debug, trace};

use crate::error::BindError;
use crate::kind::{BindingKind, DeclClass, is_legal_pair};
use crate::state::{Binding, BindingId, ScopeId, ScopeTree};

impl ScopeTree {
    /// Register `name` into the scope appropriate for `kind`: the nearest
    /// function/program scope for `var`/hoisted functions, the current
    /// scope for everything else.
    pub(crate) fn declare(
        &mut self,
        name: &str,
        kind: BindingKind,
        path: NodeIndex,
    ) -> Result<Option<BindingId>, BindError> {
        let target = if kind.is_hoisting() {
            self.hoist_target()
        } else {
            self.current_scope_id()
        };
        match target {
            Some(scope) => self.declare_in(scope, name, kind, path).map(Some),
            None => Ok(None),
        }
    }

    pub(crate) fn declare_in(
        &mut self,
        scope: ScopeId,
        name: &str,
        kind: BindingKind,
        path: NodeIndex,
    ) -> Result<BindingId, BindError> {
        if let Some(existing) = self.scope(scope).and_then(|s| s.own_binding(name)) {
            return self.redeclare(scope, existing, name, kind, path);
        }

        let id = BindingId(self.bindings.len() as u32);
        debug!(scope = scope.0, name, ?kind, path = path.0, "declare binding");
        self.bindings.push(Binding {
            name: name.to_string(),
            kind,
            path,
            scope,
            constant: true,
            reference_paths: Vec::new(),
            constant_violations: Vec::new(),
        });
        if let Some(record) = self.scope_mut(scope) {
            record.bindings.insert(name.to_string(), id);
        }
        self.node_bindings.insert(path.0, id);
        Ok(id)
    }

    /// A second declaration of `name` landed in `scope`. Type-space
    /// declarations never conflict with value-space ones; value pairs go
    /// through the legality matrix, and legal repeats merge into the
    /// existing binding.
    fn redeclare(
        &mut self,
        scope: ScopeId,
        existing_id: BindingId,
        name: &str,
        kind: BindingKind,
        path: NodeIndex,
    ) -> Result<BindingId, BindError> {
        let Some(existing) = self.binding(existing_id) else {
            return self.declare_in(scope, name, kind, path);
        };
        let existing_kind = existing.kind;
        let existing_path = existing.path;

        if kind.is_type_space() || existing_kind.is_type_space() {
            // Value bindings stay canonical over type-space ones; a later
            // type-space declaration over an earlier one takes the slot.
            let take_slot = !kind.is_type_space() || existing_kind.is_type_space();
            if take_slot && let Some(binding) = self.binding_mut(existing_id) {
                binding.kind = kind;
                binding.path = path;
            }
            self.node_bindings.insert(path.0, existing_id);
            return Ok(existing_id);
        }

        let existing_class = existing_kind.decl_class().unwrap_or(DeclClass::Var);
        let incoming_class = kind.decl_class().unwrap_or(DeclClass::Var);
        if !is_legal_pair(existing_class, incoming_class) {
            debug!(
                scope = scope.0,
                name,
                ?existing_kind,
                ?kind,
                "illegal duplicate declaration"
            );
            return Err(BindError::DuplicateDeclaration {
                name: name.to_string(),
                first: existing_path,
                second: path,
                scope,
            });
        }

        // Legal repeat. Same-kind var/function repeats keep the later node
        // as canonical, a function wins over a var, and parameter, catch,
        // and local-name bindings stay canonical.
        let take_new = matches!(
            (existing_class, incoming_class),
            (DeclClass::Var, DeclClass::Var | DeclClass::Function)
                | (DeclClass::Function, DeclClass::Function)
        );
        trace!(scope = scope.0, name, take_new, "legal re-declaration");
        if let Some(binding) = self.binding_mut(existing_id) {
            if take_new {
                binding.kind = kind;
                binding.path = path;
            }
            binding.constant = false;
            binding.constant_violations.push(path);
        }
        self.node_bindings.insert(path.0, existing_id);
        Ok(existing_id)
    }

    /// Declare every identifier of a binding pattern with `kind` and
    /// declaration node `path`; nested default expressions and computed
    /// keys are bound as ordinary expressions.
    pub(crate) fn bind_declaration_pattern(
        &mut self,
        arena: &NodeArena,
        pattern: NodeIndex,
        kind: BindingKind,
        path: NodeIndex,
    ) -> Result<(), BindError> {
        let Some(node) = arena.get(pattern) else {
            return Ok(());
        };
        match &node.kind {
            NodeKind::Identifier(data) => {
                if let Some(id) = self.declare(&data.text, kind, path)? {
                    self.node_bindings.insert(pattern.0, id);
                }
            }
            NodeKind::ObjectPattern(data) => {
                for &prop in &data.properties.nodes {
                    let Some(prop_node) = arena.get(prop) else {
                        continue;
                    };
                    match &prop_node.kind {
                        NodeKind::ObjectProperty(p) => {
                            if p.computed {
                                self.bind_node(arena, p.key)?;
                            }
                            self.bind_declaration_pattern(arena, p.value, kind, path)?;
                        }
                        NodeKind::RestElement(r) => {
                            self.bind_declaration_pattern(arena, r.argument, kind, path)?;
                        }
                        _ => {}
                    }
                }
            }
            NodeKind::ArrayPattern(data) => {
                for &element in &data.elements.nodes {
                    self.bind_declaration_pattern(arena, element, kind, path)?;
                }
            }
            NodeKind::AssignmentPattern(data) => {
                self.bind_declaration_pattern(arena, data.target, kind, path)?;
                self.bind_node(arena, data.default)?;
            }
            NodeKind::RestElement(data) => {
                self.bind_declaration_pattern(arena, data.argument, kind, path)?;
            }
            _ => {
                trace!(node = pattern.0, "unexpected node in binding pattern");
            }
        }
        Ok(())
    }

    /// Queue constant violations for every identifier target of an
    /// assignment left-hand side. Member-expression targets and nested
    /// defaults are bound as expressions; they do not violate bindings.
    pub(crate) fn bind_assignment_target(
        &mut self,
        arena: &NodeArena,
        target: NodeIndex,
    ) -> Result<(), BindError> {
        let Some(node) = arena.get(target) else {
            return Ok(());
        };
        match &node.kind {
            NodeKind::Identifier(data) => {
                self.queue_write(target, &data.text);
            }
            NodeKind::ObjectPattern(data) => {
                for &prop in &data.properties.nodes {
                    let Some(prop_node) = arena.get(prop) else {
                        continue;
                    };
                    match &prop_node.kind {
                        NodeKind::ObjectProperty(p) => {
                            if p.computed {
                                self.bind_node(arena, p.key)?;
                            }
                            self.bind_assignment_target(arena, p.value)?;
                        }
                        NodeKind::RestElement(r) => {
                            self.bind_assignment_target(arena, r.argument)?;
                        }
                        _ => {}
                    }
                }
            }
            NodeKind::ArrayPattern(data) => {
                for &element in &data.elements.nodes {
                    self.bind_assignment_target(arena, element)?;
                }
            }
            NodeKind::AssignmentPattern(data) => {
                self.bind_assignment_target(arena, data.target)?;
                self.bind_node(arena, data.default)?;
            }
            NodeKind::RestElement(data) => {
                self.bind_assignment_target(arena, data.argument)?;
            }
            NodeKind::ParenthesizedExpression(data) => {
                self.bind_assignment_target(arena, data.expression)?;
            }
            _ => {
                self.bind_node(arena, target)?;
            }
        }
        Ok(())
    }
}

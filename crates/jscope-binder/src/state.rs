//! Scope tree state: scope and binding records, crawl bookkeeping, and the
//! public query surface.

use indexmap::IndexMap;
use jscope_ast::{NodeArena, NodeIndex, NodeKind, SourceKind};
use jscope_common::limits::MAX_PARENT_WALK;
use rustc_hash::{FxHashMap, FxHashSet};
use serde::Serialize;
use smallvec::SmallVec;
use tracing::debug;

use crate::error::{BindError, ValidationError};
use crate::kind::BindingKind;
use crate::ContainerKind;

/// Index of a scope record within its [`ScopeTree`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct ScopeId(pub u32);

/// Index of a binding record within its [`ScopeTree`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct BindingId(pub u32);

/// The association between a declared name and its declaring node within
/// one scope.
#[derive(Clone, Debug, Serialize)]
pub struct Binding {
    pub name: String,
    pub kind: BindingKind,
    /// The node that introduces the identifier (parameter node, declarator
    /// node, function/class declaration node, import specifier node, ...).
    pub path: NodeIndex,
    /// Owning scope (back-reference).
    pub scope: ScopeId,
    /// False once the binding is assigned, updated, or legally re-declared
    /// anywhere in its scope of visibility.
    pub constant: bool,
    /// Reference nodes resolved to this binding, in source order of
    /// discovery. Never contains the declaration node itself.
    pub reference_paths: Vec<NodeIndex>,
    /// The nodes that caused `constant` to become false.
    pub constant_violations: Vec<NodeIndex>,
}

/// One lexical scope, keyed by its introducing node.
#[derive(Clone, Debug)]
pub struct Scope {
    pub id: ScopeId,
    pub node: NodeIndex,
    pub kind: ContainerKind,
    pub parent: Option<ScopeId>,
    /// Name -> binding, insertion-ordered so iteration is deterministic.
    pub(crate) bindings: IndexMap<String, BindingId>,
    /// Label name -> labeled statement node. A separate namespace from
    /// `bindings`.
    pub(crate) labels: FxHashMap<String, NodeIndex>,
    /// Unresolved reference nodes by name. Populated only on crawl roots.
    pub(crate) globals: FxHashMap<String, Vec<NodeIndex>>,
}

impl Scope {
    pub fn own_binding(&self, name: &str) -> Option<BindingId> {
        self.bindings.get(name).copied()
    }

    pub fn own_label(&self, name: &str) -> Option<NodeIndex> {
        self.labels.get(name).copied()
    }

    /// Binding names in declaration order.
    pub fn binding_names(&self) -> impl Iterator<Item = &str> {
        self.bindings.keys().map(String::as_str)
    }

    pub fn bindings(&self) -> impl Iterator<Item = BindingId> + '_ {
        self.bindings.values().copied()
    }
}

/// Whether a queued identifier occurrence reads the binding or mutates it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum PendingKind {
    Read,
    Write,
}

/// An identifier occurrence queued during the crawl DFS, resolved once the
/// scope tree is complete.
#[derive(Clone, Debug)]
pub(crate) struct PendingRef {
    pub node: NodeIndex,
    pub name: String,
    pub scope: ScopeId,
    /// Set when the occurrence sits directly in the parameter list of the
    /// function owning `scope`'s chain entry; lookups then skip
    /// non-param/local bindings of that scope.
    pub param_scope: Option<ScopeId>,
    pub kind: PendingKind,
}

/// Aggregate counts over the live scope tree.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct CrawlStats {
    pub scopes: usize,
    pub bindings: usize,
    pub references: usize,
    pub globals: usize,
}

/// The scope tree for one syntax tree, produced by [`ScopeTree::crawl`].
#[derive(Clone, Debug)]
pub struct ScopeTree {
    pub(crate) scopes: Vec<Option<Scope>>,
    pub(crate) bindings: Vec<Binding>,
    /// Introducing node -> scope.
    pub(crate) node_scopes: FxHashMap<u32, ScopeId>,
    /// Declaration and reference nodes -> binding.
    pub(crate) node_bindings: FxHashMap<u32, BindingId>,
    pub(crate) root: ScopeId,
    pub(crate) root_node: NodeIndex,
    pub(crate) module_source: bool,
    /// Names handed out by `generate_uid` since the last crawl.
    pub(crate) uid_names: FxHashSet<String>,

    // Transient crawl state.
    pub(crate) scope_stack: SmallVec<[ScopeId; 16]>,
    pub(crate) pending: Vec<PendingRef>,
    pub(crate) param_scope: Option<ScopeId>,
}

impl ScopeTree {
    /// Build scope, binding, and reference data for the tree rooted at
    /// `root` (normally a `Program` node).
    pub fn crawl(arena: &NodeArena, root: NodeIndex) -> Result<ScopeTree, BindError> {
        let mut tree = ScopeTree {
            scopes: Vec::new(),
            bindings: Vec::new(),
            node_scopes: FxHashMap::default(),
            node_bindings: FxHashMap::default(),
            root: ScopeId(0),
            root_node: root,
            module_source: false,
            uid_names: FxHashSet::default(),
            scope_stack: SmallVec::new(),
            pending: Vec::new(),
            param_scope: None,
        };
        tree.build(arena)?;
        Ok(tree)
    }

    /// Rebuild the scope owning `node` (and everything beneath it) from the
    /// current tree state. Stale bindings, references, and globals
    /// contributed by the subtree are discarded before repopulating;
    /// re-crawling the root is a full rebuild.
    pub fn recrawl(&mut self, arena: &NodeArena, node: NodeIndex) -> Result<(), BindError> {
        let base = match self.scope_of(arena, node) {
            Some(scope) if scope != self.root => scope,
            _ => return self.build(arena),
        };
        let Some(base_node) = self.scope(base).map(|s| s.node) else {
            return self.build(arena);
        };
        debug!(base = base.0, base_node = base_node.0, "recrawl subtree");

        let parent = self.scope(base).and_then(|s| s.parent);
        self.prune_subtree(arena, base_node);
        // No stale collision cache survives a rebuild.
        self.uid_names.clear();

        // Seed the stack with the surviving ancestor chain, outermost first.
        let mut chain = Vec::new();
        let mut current = parent;
        while let Some(id) = current {
            chain.push(id);
            current = self.scope(id).and_then(|s| s.parent);
        }
        chain.reverse();
        self.scope_stack = SmallVec::from_vec(chain);
        let result = self.bind_node(arena, base_node);
        self.scope_stack.clear();
        self.param_scope = None;
        result?;
        self.resolve_pending();
        Ok(())
    }

    fn build(&mut self, arena: &NodeArena) -> Result<(), BindError> {
        self.scopes.clear();
        self.bindings.clear();
        self.node_scopes.clear();
        self.node_bindings.clear();
        self.uid_names.clear();
        self.scope_stack.clear();
        self.pending.clear();
        self.param_scope = None;

        self.module_source = matches!(
            arena.get(self.root_node).map(|node| &node.kind),
            Some(NodeKind::Program(data)) if data.source_kind == SourceKind::Module
        );

        let root_scope = self.enter_scope(ContainerKind::Program, self.root_node);
        self.root = root_scope;
        let result = match arena.get(self.root_node).map(|node| &node.kind) {
            Some(NodeKind::Program(data)) => {
                let statements = data.statements.clone();
                let mut out = Ok(());
                for &stmt in &statements.nodes {
                    out = self.bind_node(arena, stmt);
                    if out.is_err() {
                        break;
                    }
                }
                out
            }
            Some(_) => self.bind_node(arena, self.root_node),
            None => Ok(()),
        };
        self.exit_scope();
        self.scope_stack.clear();
        self.param_scope = None;
        result?;
        self.resolve_pending();
        Ok(())
    }

    // ========================================================================
    // Crawl bookkeeping
    // ========================================================================

    pub(crate) fn enter_scope(&mut self, kind: ContainerKind, node: NodeIndex) -> ScopeId {
        let id = ScopeId(self.scopes.len() as u32);
        let parent = self.scope_stack.last().copied();
        debug!(scope = id.0, node = node.0, ?kind, "enter scope");
        self.scopes.push(Some(Scope {
            id,
            node,
            kind,
            parent,
            bindings: IndexMap::new(),
            labels: FxHashMap::default(),
            globals: FxHashMap::default(),
        }));
        self.node_scopes.insert(node.0, id);
        self.scope_stack.push(id);
        id
    }

    pub(crate) fn exit_scope(&mut self) {
        self.scope_stack.pop();
    }

    pub(crate) fn current_scope_id(&self) -> Option<ScopeId> {
        self.scope_stack.last().copied()
    }

    /// The nearest function/program scope on the stack, where `var` and
    /// hoisted functions register.
    pub(crate) fn hoist_target(&self) -> Option<ScopeId> {
        for &id in self.scope_stack.iter().rev() {
            if let Some(scope) = self.scope(id)
                && scope.kind.is_hoist_target()
            {
                return Some(id);
            }
        }
        self.scope_stack.first().copied()
    }

    pub(crate) fn register_label(&mut self, name: &str, node: NodeIndex) {
        if let Some(id) = self.current_scope_id()
            && let Some(scope) = self.scope_mut(id)
        {
            scope.labels.insert(name.to_string(), node);
        }
    }

    pub(crate) fn queue_read(&mut self, node: NodeIndex, name: &str) {
        self.queue(node, name, PendingKind::Read);
    }

    pub(crate) fn queue_write(&mut self, node: NodeIndex, name: &str) {
        self.queue(node, name, PendingKind::Write);
    }

    fn queue(&mut self, node: NodeIndex, name: &str, kind: PendingKind) {
        if let Some(scope) = self.current_scope_id() {
            self.pending.push(PendingRef {
                node,
                name: name.to_string(),
                scope,
                param_scope: self.param_scope,
                kind,
            });
        }
    }

    pub(crate) fn scope_mut(&mut self, id: ScopeId) -> Option<&mut Scope> {
        self.scopes.get_mut(id.0 as usize)?.as_mut()
    }

    pub(crate) fn binding_mut(&mut self, id: BindingId) -> Option<&mut Binding> {
        self.bindings.get_mut(id.0 as usize)
    }

    // ========================================================================
    // Re-crawl pruning
    // ========================================================================

    /// Discard every scope under `base_node`, every binding declared inside
    /// it (including bindings hoisted out of it into surviving scopes), and
    /// every reference, violation, or global contributed by it.
    fn prune_subtree(&mut self, arena: &NodeArena, base_node: NodeIndex) {
        let mut removed_scopes: FxHashSet<ScopeId> = FxHashSet::default();
        for slot in &mut self.scopes {
            let remove = match slot {
                Some(scope) if arena.is_within(scope.node, base_node) => {
                    removed_scopes.insert(scope.id);
                    true
                }
                _ => false,
            };
            if remove {
                *slot = None;
            }
        }
        self.node_scopes
            .retain(|_, id| !removed_scopes.contains(id));

        // Bindings declared inside the subtree, wherever they registered.
        let mut pruned_bindings: FxHashSet<BindingId> = FxHashSet::default();
        for (index, binding) in self.bindings.iter().enumerate() {
            if arena.is_within(binding.path, base_node) {
                pruned_bindings.insert(BindingId(index as u32));
            }
        }
        for slot in &mut self.scopes {
            if let Some(scope) = slot {
                scope
                    .bindings
                    .retain(|_, id| !pruned_bindings.contains(id));
                scope.globals.retain(|_, nodes| {
                    nodes.retain(|&n| !arena.is_within(n, base_node));
                    !nodes.is_empty()
                });
            }
        }
        let bindings = &self.bindings;
        self.node_bindings.retain(|&node, id| {
            if pruned_bindings.contains(id) || arena.is_within(NodeIndex(node), base_node) {
                return false;
            }
            match bindings.get(id.0 as usize) {
                Some(binding) => !removed_scopes.contains(&binding.scope),
                None => false,
            }
        });

        // Surviving bindings lose references and violations that came from
        // inside the subtree.
        for binding in &mut self.bindings {
            binding
                .reference_paths
                .retain(|&n| !arena.is_within(n, base_node));
            binding
                .constant_violations
                .retain(|&n| !arena.is_within(n, base_node));
            binding.constant = binding.constant_violations.is_empty();
        }
    }

    // ========================================================================
    // Query surface
    // ========================================================================

    /// The outermost scope of the last crawl.
    pub fn root(&self) -> ScopeId {
        self.root
    }

    pub fn scope(&self, id: ScopeId) -> Option<&Scope> {
        self.scopes.get(id.0 as usize)?.as_ref()
    }

    pub fn binding(&self, id: BindingId) -> Option<&Binding> {
        self.bindings.get(id.0 as usize)
    }

    /// Scope introduced by `node` itself, if any.
    pub fn scope_at(&self, node: NodeIndex) -> Option<ScopeId> {
        self.node_scopes.get(&node.0).copied()
    }

    /// Nearest scope enclosing `node` (including one introduced by the node
    /// itself).
    pub fn scope_of(&self, arena: &NodeArena, node: NodeIndex) -> Option<ScopeId> {
        let mut current = node;
        for _ in 0..MAX_PARENT_WALK {
            if current.is_none() {
                return None;
            }
            if let Some(&id) = self.node_scopes.get(&current.0) {
                return Some(id);
            }
            current = arena.parent(current);
        }
        None
    }

    /// Walk the scope chain outward from `scope` for a binding named
    /// `name`. First match wins.
    pub fn get_binding(&self, scope: ScopeId, name: &str) -> Option<BindingId> {
        let mut current = Some(scope);
        while let Some(id) = current {
            let record = self.scope(id)?;
            if let Some(binding) = record.own_binding(name) {
                return Some(binding);
            }
            current = record.parent;
        }
        None
    }

    /// Binding resolved for a declaration or reference node during crawl.
    pub fn binding_of(&self, node: NodeIndex) -> Option<BindingId> {
        self.node_bindings.get(&node.0).copied()
    }

    /// Walk the scope chain outward for a label. Labels are a namespace
    /// separate from bindings.
    pub fn get_label(&self, scope: ScopeId, name: &str) -> Option<NodeIndex> {
        let mut current = Some(scope);
        while let Some(id) = current {
            let record = self.scope(id)?;
            if let Some(node) = record.own_label(name) {
                return Some(node);
            }
            current = record.parent;
        }
        None
    }

    /// True iff some reference to `name` under this scope's crawl root
    /// never resolved to any binding.
    pub fn has_global(&self, scope: ScopeId, name: &str) -> bool {
        let mut current = Some(scope);
        while let Some(id) = current {
            let Some(record) = self.scope(id) else {
                return false;
            };
            if record.globals.contains_key(name) {
                return true;
            }
            current = record.parent;
        }
        false
    }

    /// Names recorded as unresolved at the crawl root.
    pub fn global_names(&self) -> impl Iterator<Item = &str> {
        self.scopes
            .iter()
            .flatten()
            .flat_map(|scope| scope.globals.keys().map(String::as_str))
    }

    /// Aggregate counts over live scopes and bindings.
    pub fn stats(&self) -> CrawlStats {
        let mut stats = CrawlStats::default();
        for scope in self.scopes.iter().flatten() {
            stats.scopes += 1;
            stats.bindings += scope.bindings.len();
            stats.globals += scope.globals.len();
            for &id in scope.bindings.values() {
                if let Some(binding) = self.binding(id) {
                    stats.references += binding.reference_paths.len();
                }
            }
        }
        stats
    }

    /// Post-crawl consistency checks over the binding tables.
    pub fn validate(&self) -> Vec<ValidationError> {
        let mut errors = Vec::new();

        for (&node_index, &id) in &self.node_bindings {
            if self.binding(id).is_none() {
                errors.push(ValidationError::BrokenBindingLink {
                    node_index,
                    binding_id: id.0,
                });
            }
        }

        for scope in self.scopes.iter().flatten() {
            for (name, &id) in &scope.bindings {
                if let Some(binding) = self.binding(id)
                    && binding.scope != scope.id
                {
                    errors.push(ValidationError::StaleScopeLink {
                        scope: scope.id,
                        name: name.clone(),
                        binding_id: id.0,
                    });
                }
            }
        }

        for scope in self.scopes.iter().flatten() {
            for &id in scope.bindings.values() {
                if let Some(binding) = self.binding(id)
                    && binding.path.is_none()
                {
                    errors.push(ValidationError::MissingDeclaration {
                        binding_id: id.0,
                        name: binding.name.clone(),
                    });
                }
            }
        }

        errors
    }
}

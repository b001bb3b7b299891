//! Conservative syntactic purity judgment.
//!
//! May answer `false` for an expression that is actually pure, never `true`
//! for one that can observably side-effect or read mutable state.

use jscope_ast::{AccessorKind, NodeArena, NodeIndex, NodeKind, UnaryOp};

use crate::state::ScopeTree;

impl ScopeTree {
    /// True iff evaluating `idx` provably has no observable side effect
    /// and no dependency on mutable state.
    ///
    /// A read of a binding counts as pure only when the binding is
    /// `constant`; unresolved names are mutable state. Property access is
    /// never pure (any access may hit an accessor). A tagged template is
    /// impure unless the tag is the `String.raw` intrinsic with `String`
    /// unshadowed.
    pub fn is_pure(&self, arena: &NodeArena, idx: NodeIndex) -> bool {
        let Some(node) = arena.get(idx) else {
            return false;
        };
        match &node.kind {
            NodeKind::Literal(_) => true,
            NodeKind::Identifier(_) => self
                .binding_of(idx)
                .and_then(|id| self.binding(id))
                .is_some_and(|binding| binding.constant),
            NodeKind::TemplateLiteral(data) => data
                .expressions
                .nodes
                .iter()
                .all(|&expr| self.is_pure(arena, expr)),
            NodeKind::TaggedTemplate(data) => {
                self.is_pure_intrinsic_tag(arena, data.tag) && self.is_pure(arena, data.quasi)
            }
            NodeKind::ObjectExpression(data) => {
                data.properties.nodes.iter().all(|&prop| {
                    match arena.get(prop).map(|node| &node.kind) {
                        Some(NodeKind::ObjectProperty(p)) => {
                            (!p.computed || self.is_pure(arena, p.key))
                                && self.is_pure(arena, p.value)
                        }
                        // Defining an accessor makes the literal a source
                        // of arbitrary code on later access.
                        Some(NodeKind::ObjectMethod(m)) => {
                            m.kind == AccessorKind::Method && !m.computed
                        }
                        Some(NodeKind::SpreadElement(s)) => self.is_pure(arena, s.argument),
                        _ => false,
                    }
                })
            }
            NodeKind::ArrayExpression(data) => data
                .elements
                .nodes
                .iter()
                .filter(|element| element.is_some())
                .all(|&element| self.is_pure(arena, element)),
            NodeKind::SpreadElement(data) => self.is_pure(arena, data.argument),
            NodeKind::ParenthesizedExpression(data) => self.is_pure(arena, data.expression),
            NodeKind::UnaryExpression(data) => {
                data.operator != UnaryOp::Delete && self.is_pure(arena, data.operand)
            }
            NodeKind::BinaryExpression(data) => {
                self.is_pure(arena, data.left) && self.is_pure(arena, data.right)
            }
            NodeKind::ConditionalExpression(data) => {
                self.is_pure(arena, data.condition)
                    && self.is_pure(arena, data.when_true)
                    && self.is_pure(arena, data.when_false)
            }
            // Creating a closure evaluates nothing.
            NodeKind::FunctionExpression(_) | NodeKind::ArrowFunctionExpression(_) => true,
            NodeKind::ClassExpression(class) => {
                class.members.nodes.iter().all(|&member| {
                    match arena.get(member).map(|node| &node.kind) {
                        Some(NodeKind::ClassMethod(m)) => {
                            m.kind == AccessorKind::Method && !m.computed
                        }
                        Some(NodeKind::ClassProperty(p)) => {
                            !p.computed && (p.value.is_none() || self.is_pure(arena, p.value))
                        }
                        _ => false,
                    }
                })
            }
            _ => false,
        }
    }

    /// The allow-list of known-pure intrinsic template tags: `String.raw`
    /// with an unshadowed `String`.
    fn is_pure_intrinsic_tag(&self, arena: &NodeArena, tag: NodeIndex) -> bool {
        let Some(node) = arena.get(tag) else {
            return false;
        };
        if let NodeKind::MemberExpression(member) = &node.kind
            && !member.computed
            && arena.identifier_text(member.property) == Some("raw")
            && arena.identifier_text(member.object) == Some("String")
        {
            // A local binding named String shadows the intrinsic.
            return self.binding_of(member.object).is_none();
        }
        false
    }
}

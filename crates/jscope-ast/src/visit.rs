//! Child enumeration, preorder traversal, and key-path addressing.
//!
//! Every parent/child edge has a stable key (the payload field name, plus a
//! position for list children). Key paths concatenate edge keys from the
//! root, e.g. `statements.1.expression.parameters.0`.

use smallvec::SmallVec;

use crate::arena::NodeArena;
use crate::node::{NodeIndex, NodeKind, NodeList};
use jscope_common::limits::MAX_PARENT_WALK;

/// One parent-to-child edge: field key plus list position for list fields.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ChildEdge {
    pub key: &'static str,
    pub index: Option<u32>,
}

pub type ChildVec = SmallVec<[(ChildEdge, NodeIndex); 8]>;

fn push(out: &mut ChildVec, key: &'static str, idx: NodeIndex) {
    if idx.is_some() {
        out.push((ChildEdge { key, index: None }, idx));
    }
}

fn push_list(out: &mut ChildVec, key: &'static str, list: &NodeList) {
    for (i, &idx) in list.nodes.iter().enumerate() {
        if idx.is_some() {
            out.push((
                ChildEdge {
                    key,
                    index: Some(i as u32),
                },
                idx,
            ));
        }
    }
}

/// Enumerate the direct children of a payload, in source order.
pub fn children_of(kind: &NodeKind) -> ChildVec {
    let mut out = ChildVec::new();
    match kind {
        NodeKind::Identifier(_) | NodeKind::Literal(_) | NodeKind::EmptyStatement => {}
        NodeKind::TemplateLiteral(data) => push_list(&mut out, "expressions", &data.expressions),
        NodeKind::TaggedTemplate(data) => {
            push(&mut out, "tag", data.tag);
            push(&mut out, "quasi", data.quasi);
        }
        NodeKind::ObjectExpression(data) | NodeKind::ObjectPattern(data) => {
            push_list(&mut out, "properties", &data.properties);
        }
        NodeKind::ObjectProperty(data) => {
            push(&mut out, "key", data.key);
            push(&mut out, "value", data.value);
        }
        NodeKind::ObjectMethod(data) => {
            push(&mut out, "key", data.key);
            push_list(&mut out, "parameters", &data.parameters);
            push(&mut out, "body", data.body);
        }
        NodeKind::ArrayExpression(data) | NodeKind::ArrayPattern(data) => {
            push_list(&mut out, "elements", &data.elements);
        }
        NodeKind::SpreadElement(data) | NodeKind::RestElement(data) => {
            push(&mut out, "argument", data.argument);
        }
        NodeKind::AssignmentExpression(data) => {
            push(&mut out, "left", data.left);
            push(&mut out, "right", data.right);
        }
        NodeKind::BinaryExpression(data) => {
            push(&mut out, "left", data.left);
            push(&mut out, "right", data.right);
        }
        NodeKind::UnaryExpression(data) => push(&mut out, "operand", data.operand),
        NodeKind::UpdateExpression(data) => push(&mut out, "operand", data.operand),
        NodeKind::ConditionalExpression(data) => {
            push(&mut out, "condition", data.condition);
            push(&mut out, "when_true", data.when_true);
            push(&mut out, "when_false", data.when_false);
        }
        NodeKind::CallExpression(data) | NodeKind::NewExpression(data) => {
            push(&mut out, "expression", data.expression);
            push_list(&mut out, "arguments", &data.arguments);
        }
        NodeKind::MemberExpression(data) => {
            push(&mut out, "object", data.object);
            push(&mut out, "property", data.property);
        }
        NodeKind::ParenthesizedExpression(data) => push(&mut out, "expression", data.expression),
        NodeKind::FunctionDeclaration(data)
        | NodeKind::FunctionExpression(data)
        | NodeKind::ArrowFunctionExpression(data) => {
            push(&mut out, "name", data.name);
            push_list(&mut out, "parameters", &data.parameters);
            push(&mut out, "body", data.body);
        }
        NodeKind::ClassDeclaration(data) | NodeKind::ClassExpression(data) => {
            push(&mut out, "name", data.name);
            push_list(&mut out, "members", &data.members);
        }
        NodeKind::ClassMethod(data) => {
            push(&mut out, "key", data.key);
            push_list(&mut out, "parameters", &data.parameters);
            push(&mut out, "body", data.body);
        }
        NodeKind::ClassProperty(data) => {
            push(&mut out, "key", data.key);
            push(&mut out, "value", data.value);
        }
        NodeKind::StaticBlock(data) | NodeKind::BlockStatement(data) => {
            push_list(&mut out, "statements", &data.statements);
        }
        NodeKind::Parameter(data) => {
            push(&mut out, "name", data.name);
            push(&mut out, "initializer", data.initializer);
        }
        NodeKind::AssignmentPattern(data) => {
            push(&mut out, "target", data.target);
            push(&mut out, "default", data.default);
        }
        NodeKind::Program(data) => push_list(&mut out, "statements", &data.statements),
        NodeKind::VariableDeclaration(data) => {
            push_list(&mut out, "declarations", &data.declarations);
        }
        NodeKind::VariableDeclarator(data) => {
            push(&mut out, "name", data.name);
            push(&mut out, "initializer", data.initializer);
        }
        NodeKind::IfStatement(data) => {
            push(&mut out, "condition", data.condition);
            push(&mut out, "then_branch", data.then_branch);
            push(&mut out, "else_branch", data.else_branch);
        }
        NodeKind::ForStatement(data) => {
            push(&mut out, "initializer", data.initializer);
            push(&mut out, "condition", data.condition);
            push(&mut out, "incrementor", data.incrementor);
            push(&mut out, "body", data.body);
        }
        NodeKind::ForInStatement(data) | NodeKind::ForOfStatement(data) => {
            push(&mut out, "left", data.left);
            push(&mut out, "right", data.right);
            push(&mut out, "body", data.body);
        }
        NodeKind::WhileStatement(data) | NodeKind::DoWhileStatement(data) => {
            push(&mut out, "condition", data.condition);
            push(&mut out, "body", data.body);
        }
        NodeKind::SwitchStatement(data) => {
            push(&mut out, "discriminant", data.discriminant);
            push_list(&mut out, "cases", &data.cases);
        }
        NodeKind::SwitchCase(data) => {
            push(&mut out, "test", data.test);
            push_list(&mut out, "statements", &data.statements);
        }
        NodeKind::TryStatement(data) => {
            push(&mut out, "block", data.block);
            push(&mut out, "handler", data.handler);
            push(&mut out, "finalizer", data.finalizer);
        }
        NodeKind::CatchClause(data) => {
            push(&mut out, "parameter", data.parameter);
            push(&mut out, "body", data.body);
        }
        NodeKind::LabeledStatement(data) => {
            push(&mut out, "label", data.label);
            push(&mut out, "body", data.body);
        }
        NodeKind::BreakStatement(data) | NodeKind::ContinueStatement(data) => {
            push(&mut out, "label", data.label);
        }
        NodeKind::ReturnStatement(data) | NodeKind::ThrowStatement(data) => {
            push(&mut out, "argument", data.argument);
        }
        NodeKind::ExpressionStatement(data) => push(&mut out, "expression", data.expression),
        NodeKind::ImportDeclaration(data) => {
            push_list(&mut out, "specifiers", &data.specifiers);
            push(&mut out, "source", data.source);
        }
        NodeKind::ImportDefaultSpecifier(data) | NodeKind::ImportNamespaceSpecifier(data) => {
            push(&mut out, "local", data.local);
        }
        NodeKind::ImportSpecifier(data) => {
            push(&mut out, "imported", data.imported);
            push(&mut out, "local", data.local);
        }
        NodeKind::ExportNamedDeclaration(data) => {
            push(&mut out, "declaration", data.declaration);
            push_list(&mut out, "specifiers", &data.specifiers);
            push(&mut out, "source", data.source);
        }
        NodeKind::ExportSpecifier(data) => {
            push(&mut out, "local", data.local);
            push(&mut out, "exported", data.exported);
        }
        NodeKind::ExportDefaultDeclaration(data) => {
            push(&mut out, "declaration", data.declaration);
        }
        NodeKind::ExportAllDeclaration(data) => push(&mut out, "source", data.source),
        NodeKind::TypeAlias(data)
        | NodeKind::OpaqueType(data)
        | NodeKind::InterfaceDeclaration(data)
        | NodeKind::DeclareVariable(data)
        | NodeKind::DeclareFunction(data)
        | NodeKind::DeclareModule(data) => push(&mut out, "name", data.name),
    }
    out
}

/// Preorder depth-first walk of the subtree rooted at `root`.
pub fn walk(arena: &NodeArena, root: NodeIndex, f: &mut impl FnMut(NodeIndex)) {
    let Some(node) = arena.get(root) else {
        return;
    };
    f(root);
    for (_, child) in children_of(&node.kind) {
        walk(arena, child, f);
    }
}

/// Normalized key path of `idx` relative to the tree root, e.g.
/// `statements.1.expression.parameters.0`. The root itself has the empty
/// path. Returns `None` for detached nodes.
pub fn key_path(arena: &NodeArena, idx: NodeIndex) -> Option<String> {
    let mut segments: Vec<String> = Vec::new();
    let mut current = idx;
    for _ in 0..MAX_PARENT_WALK {
        let parent = arena.parent(current);
        if parent.is_none() {
            segments.reverse();
            return Some(segments.join("."));
        }
        let parent_node = arena.get(parent)?;
        let edge = children_of(&parent_node.kind)
            .into_iter()
            .find(|&(_, child)| child == current)?;
        match edge.0.index {
            Some(i) => segments.push(format!("{}.{}", edge.0.key, i)),
            None => segments.push(edge.0.key.to_string()),
        }
        current = parent;
    }
    None
}

/// Resolve a key path produced by [`key_path`] starting from `root`.
pub fn find_at_path(arena: &NodeArena, root: NodeIndex, path: &str) -> Option<NodeIndex> {
    if path.is_empty() {
        return Some(root);
    }
    let mut current = root;
    let mut tokens = path.split('.').peekable();
    while let Some(key) = tokens.next() {
        let node = arena.get(current)?;
        let children = children_of(&node.kind);
        let index = match tokens.peek().and_then(|tok| tok.parse::<u32>().ok()) {
            Some(i) => {
                tokens.next();
                Some(i)
            }
            None => None,
        };
        let (_, child) = children
            .into_iter()
            .find(|(edge, _)| edge.key == key && edge.index == index)?;
        current = child;
    }
    Some(current)
}

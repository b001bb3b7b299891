//! Arena storage, typed constructors, and in-place mutation.
//!
//! Nodes are created bottom-up: children exist before their parent, and the
//! parent link of every child is set when the parent is attached. Mutation
//! helpers edit payloads in place; analysis layers re-derive their data by
//! re-crawling after a structural edit.

use jscope_common::Span;
use jscope_common::limits::{MAX_NODE_PREALLOC, MAX_PARENT_WALK};
use tracing::trace;

use crate::node::*;
use crate::visit::children_of;

#[derive(Clone, Debug, Default)]
pub struct NodeArena {
    nodes: Vec<Node>,
    parents: Vec<NodeIndex>,
}

impl NodeArena {
    pub fn new() -> NodeArena {
        NodeArena::default()
    }

    /// Create an arena with pre-allocated capacity.
    pub fn with_capacity(capacity: usize) -> NodeArena {
        let safe_capacity = capacity.min(MAX_NODE_PREALLOC);
        NodeArena {
            nodes: Vec::with_capacity(safe_capacity),
            parents: Vec::with_capacity(safe_capacity),
        }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn get(&self, idx: NodeIndex) -> Option<&Node> {
        if idx.is_none() {
            return None;
        }
        self.nodes.get(idx.0 as usize)
    }

    /// Parent of `idx`, or `NONE` for roots and detached nodes.
    pub fn parent(&self, idx: NodeIndex) -> NodeIndex {
        if idx.is_none() {
            return NodeIndex::NONE;
        }
        self.parents
            .get(idx.0 as usize)
            .copied()
            .unwrap_or(NodeIndex::NONE)
    }

    pub fn kind_of(&self, idx: NodeIndex) -> Option<SyntaxKind> {
        self.get(idx).map(|node| node.kind.syntax_kind())
    }

    pub fn span_of(&self, idx: NodeIndex) -> Option<Span> {
        self.get(idx).map(|node| node.span)
    }

    /// Identifier text of `idx` if it is an identifier node.
    pub fn identifier_text(&self, idx: NodeIndex) -> Option<&str> {
        match self.get(idx)?.kind {
            NodeKind::Identifier(ref data) => Some(&data.text),
            _ => None,
        }
    }

    /// String literal text of `idx` if it is a string literal node.
    pub fn string_text(&self, idx: NodeIndex) -> Option<&str> {
        match self.get(idx)?.kind {
            NodeKind::Literal(ref data) if data.kind == LiteralKind::String => Some(&data.text),
            _ => None,
        }
    }

    /// True if `node` is `ancestor` or lies underneath it.
    pub fn is_within(&self, node: NodeIndex, ancestor: NodeIndex) -> bool {
        let mut current = node;
        for _ in 0..MAX_PARENT_WALK {
            if current.is_none() {
                return false;
            }
            if current == ancestor {
                return true;
            }
            current = self.parent(current);
        }
        false
    }

    /// Attach a node. Children named by the payload must already exist;
    /// their parent links are set here.
    pub fn add(&mut self, kind: NodeKind, span: Span) -> NodeIndex {
        let idx = NodeIndex(self.nodes.len() as u32);
        for (_, child) in children_of(&kind) {
            self.set_parent(child, idx);
        }
        self.nodes.push(Node { kind, span });
        self.parents.push(NodeIndex::NONE);
        idx
    }

    fn set_parent(&mut self, child: NodeIndex, parent: NodeIndex) {
        if child.is_some()
            && let Some(slot) = self.parents.get_mut(child.0 as usize)
        {
            *slot = parent;
        }
    }

    // ========================================================================
    // Mutation
    // ========================================================================

    /// Replace the payload of `idx` in place. Children of the new payload
    /// are re-parented; children of the old payload become detached.
    pub fn replace(&mut self, idx: NodeIndex, kind: NodeKind) -> bool {
        if idx.is_none() || idx.0 as usize >= self.nodes.len() {
            return false;
        }
        trace!(idx = idx.0, "replace node payload");
        for (_, child) in children_of(&kind) {
            self.set_parent(child, idx);
        }
        self.nodes[idx.0 as usize].kind = kind;
        true
    }

    /// Rewrite the text of an identifier node.
    pub fn rename_identifier(&mut self, idx: NodeIndex, new_text: &str) -> bool {
        if idx.is_none() {
            return false;
        }
        match self.nodes.get_mut(idx.0 as usize) {
            Some(node) => match node.kind {
                NodeKind::Identifier(ref mut data) => {
                    trace!(idx = idx.0, from = %data.text, to = %new_text, "rename identifier");
                    data.text = new_text.to_string();
                    true
                }
                _ => false,
            },
            None => false,
        }
    }

    /// Remove `stmt` from the statement list of `owner` (program, block,
    /// static block, or switch case). The removed subtree stays in the
    /// arena but becomes unreachable.
    pub fn remove_statement(&mut self, owner: NodeIndex, stmt: NodeIndex) -> bool {
        if owner.is_none() {
            return false;
        }
        let Some(node) = self.nodes.get_mut(owner.0 as usize) else {
            return false;
        };
        let statements = match node.kind {
            NodeKind::Program(ref mut data) => &mut data.statements,
            NodeKind::BlockStatement(ref mut data) | NodeKind::StaticBlock(ref mut data) => {
                &mut data.statements
            }
            NodeKind::SwitchCase(ref mut data) => &mut data.statements,
            _ => return false,
        };
        let before = statements.nodes.len();
        statements.nodes.retain(|&s| s != stmt);
        if statements.nodes.len() == before {
            return false;
        }
        self.set_parent(stmt, NodeIndex::NONE);
        true
    }

    // ========================================================================
    // Typed constructors (synthetic spans; use `add` for parsed positions)
    // ========================================================================

    pub fn ident(&mut self, text: &str) -> NodeIndex {
        self.ident_at(text, Span::SYNTHETIC)
    }

    pub fn ident_at(&mut self, text: &str, span: Span) -> NodeIndex {
        self.add(
            NodeKind::Identifier(IdentifierData {
                text: text.to_string(),
            }),
            span,
        )
    }

    fn literal(&mut self, kind: LiteralKind, text: &str) -> NodeIndex {
        self.add(
            NodeKind::Literal(LiteralData {
                kind,
                text: text.to_string(),
            }),
            Span::SYNTHETIC,
        )
    }

    pub fn number(&mut self, text: &str) -> NodeIndex {
        self.literal(LiteralKind::Number, text)
    }

    pub fn string(&mut self, text: &str) -> NodeIndex {
        self.literal(LiteralKind::String, text)
    }

    pub fn bool_lit(&mut self, value: bool) -> NodeIndex {
        self.literal(LiteralKind::Boolean, if value { "true" } else { "false" })
    }

    pub fn null_lit(&mut self) -> NodeIndex {
        self.literal(LiteralKind::Null, "null")
    }

    pub fn regex(&mut self, text: &str) -> NodeIndex {
        self.literal(LiteralKind::Regex, text)
    }

    pub fn template(&mut self, quasis: &[&str], expressions: Vec<NodeIndex>) -> NodeIndex {
        self.add(
            NodeKind::TemplateLiteral(TemplateData {
                quasis: quasis.iter().map(|q| q.to_string()).collect(),
                expressions: expressions.into(),
            }),
            Span::SYNTHETIC,
        )
    }

    pub fn tagged_template(&mut self, tag: NodeIndex, quasi: NodeIndex) -> NodeIndex {
        self.add(
            NodeKind::TaggedTemplate(TaggedTemplateData { tag, quasi }),
            Span::SYNTHETIC,
        )
    }

    pub fn object(&mut self, properties: Vec<NodeIndex>) -> NodeIndex {
        self.add(
            NodeKind::ObjectExpression(ObjectLiteralData {
                properties: properties.into(),
            }),
            Span::SYNTHETIC,
        )
    }

    pub fn property(&mut self, key: NodeIndex, value: NodeIndex) -> NodeIndex {
        self.add(
            NodeKind::ObjectProperty(PropertyData {
                key,
                value,
                computed: false,
            }),
            Span::SYNTHETIC,
        )
    }

    pub fn object_method(
        &mut self,
        kind: AccessorKind,
        key: NodeIndex,
        parameters: Vec<NodeIndex>,
        body: NodeIndex,
    ) -> NodeIndex {
        self.add(
            NodeKind::ObjectMethod(ObjectMethodData {
                kind,
                key,
                computed: false,
                parameters: parameters.into(),
                body,
            }),
            Span::SYNTHETIC,
        )
    }

    pub fn array(&mut self, elements: Vec<NodeIndex>) -> NodeIndex {
        self.add(
            NodeKind::ArrayExpression(ArrayData {
                elements: elements.into(),
            }),
            Span::SYNTHETIC,
        )
    }

    pub fn spread(&mut self, argument: NodeIndex) -> NodeIndex {
        self.add(NodeKind::SpreadElement(SpreadData { argument }), Span::SYNTHETIC)
    }

    pub fn assign(&mut self, operator: AssignOp, left: NodeIndex, right: NodeIndex) -> NodeIndex {
        self.add(
            NodeKind::AssignmentExpression(AssignmentData {
                operator,
                left,
                right,
            }),
            Span::SYNTHETIC,
        )
    }

    pub fn binary(&mut self, operator: BinaryOp, left: NodeIndex, right: NodeIndex) -> NodeIndex {
        self.add(
            NodeKind::BinaryExpression(BinaryData {
                operator,
                left,
                right,
            }),
            Span::SYNTHETIC,
        )
    }

    pub fn unary(&mut self, operator: UnaryOp, operand: NodeIndex) -> NodeIndex {
        self.add(
            NodeKind::UnaryExpression(UnaryData { operator, operand }),
            Span::SYNTHETIC,
        )
    }

    pub fn update(&mut self, operator: UpdateOp, prefix: bool, operand: NodeIndex) -> NodeIndex {
        self.add(
            NodeKind::UpdateExpression(UpdateData {
                operator,
                prefix,
                operand,
            }),
            Span::SYNTHETIC,
        )
    }

    pub fn conditional(
        &mut self,
        condition: NodeIndex,
        when_true: NodeIndex,
        when_false: NodeIndex,
    ) -> NodeIndex {
        self.add(
            NodeKind::ConditionalExpression(ConditionalData {
                condition,
                when_true,
                when_false,
            }),
            Span::SYNTHETIC,
        )
    }

    pub fn call(&mut self, expression: NodeIndex, arguments: Vec<NodeIndex>) -> NodeIndex {
        self.add(
            NodeKind::CallExpression(CallData {
                expression,
                arguments: arguments.into(),
            }),
            Span::SYNTHETIC,
        )
    }

    pub fn new_expr(&mut self, expression: NodeIndex, arguments: Vec<NodeIndex>) -> NodeIndex {
        self.add(
            NodeKind::NewExpression(CallData {
                expression,
                arguments: arguments.into(),
            }),
            Span::SYNTHETIC,
        )
    }

    /// `object.name` member access; the property identifier is created here.
    pub fn member(&mut self, object: NodeIndex, name: &str) -> NodeIndex {
        let property = self.ident(name);
        self.add(
            NodeKind::MemberExpression(MemberData {
                object,
                property,
                computed: false,
            }),
            Span::SYNTHETIC,
        )
    }

    pub fn member_computed(&mut self, object: NodeIndex, property: NodeIndex) -> NodeIndex {
        self.add(
            NodeKind::MemberExpression(MemberData {
                object,
                property,
                computed: true,
            }),
            Span::SYNTHETIC,
        )
    }

    pub fn paren(&mut self, expression: NodeIndex) -> NodeIndex {
        self.add(
            NodeKind::ParenthesizedExpression(ParenthesizedData { expression }),
            Span::SYNTHETIC,
        )
    }

    pub fn function_decl(
        &mut self,
        name: NodeIndex,
        parameters: Vec<NodeIndex>,
        body: NodeIndex,
    ) -> NodeIndex {
        self.add(
            NodeKind::FunctionDeclaration(FunctionData {
                name,
                parameters: parameters.into(),
                body,
            }),
            Span::SYNTHETIC,
        )
    }

    pub fn function_expr(
        &mut self,
        name: NodeIndex,
        parameters: Vec<NodeIndex>,
        body: NodeIndex,
    ) -> NodeIndex {
        self.add(
            NodeKind::FunctionExpression(FunctionData {
                name,
                parameters: parameters.into(),
                body,
            }),
            Span::SYNTHETIC,
        )
    }

    pub fn arrow(&mut self, parameters: Vec<NodeIndex>, body: NodeIndex) -> NodeIndex {
        self.add(
            NodeKind::ArrowFunctionExpression(FunctionData {
                name: NodeIndex::NONE,
                parameters: parameters.into(),
                body,
            }),
            Span::SYNTHETIC,
        )
    }

    pub fn class_decl(&mut self, name: NodeIndex, members: Vec<NodeIndex>) -> NodeIndex {
        self.add(
            NodeKind::ClassDeclaration(ClassData {
                name,
                members: members.into(),
            }),
            Span::SYNTHETIC,
        )
    }

    pub fn class_expr(&mut self, name: NodeIndex, members: Vec<NodeIndex>) -> NodeIndex {
        self.add(
            NodeKind::ClassExpression(ClassData {
                name,
                members: members.into(),
            }),
            Span::SYNTHETIC,
        )
    }

    pub fn class_method(
        &mut self,
        kind: AccessorKind,
        key: NodeIndex,
        parameters: Vec<NodeIndex>,
        body: NodeIndex,
    ) -> NodeIndex {
        self.add(
            NodeKind::ClassMethod(ClassMethodData {
                kind,
                key,
                computed: false,
                is_static: false,
                parameters: parameters.into(),
                body,
            }),
            Span::SYNTHETIC,
        )
    }

    pub fn class_property(&mut self, key: NodeIndex, value: NodeIndex) -> NodeIndex {
        self.add(
            NodeKind::ClassProperty(ClassPropertyData {
                key,
                computed: false,
                is_static: false,
                value,
            }),
            Span::SYNTHETIC,
        )
    }

    pub fn static_block(&mut self, statements: Vec<NodeIndex>) -> NodeIndex {
        self.add(
            NodeKind::StaticBlock(BlockData {
                statements: statements.into(),
            }),
            Span::SYNTHETIC,
        )
    }

    pub fn param(&mut self, name: NodeIndex) -> NodeIndex {
        self.add(
            NodeKind::Parameter(ParameterData {
                name,
                initializer: NodeIndex::NONE,
            }),
            Span::SYNTHETIC,
        )
    }

    pub fn param_with_default(&mut self, name: NodeIndex, initializer: NodeIndex) -> NodeIndex {
        self.add(
            NodeKind::Parameter(ParameterData { name, initializer }),
            Span::SYNTHETIC,
        )
    }

    pub fn object_pattern(&mut self, properties: Vec<NodeIndex>) -> NodeIndex {
        self.add(
            NodeKind::ObjectPattern(ObjectLiteralData {
                properties: properties.into(),
            }),
            Span::SYNTHETIC,
        )
    }

    pub fn array_pattern(&mut self, elements: Vec<NodeIndex>) -> NodeIndex {
        self.add(
            NodeKind::ArrayPattern(ArrayData {
                elements: elements.into(),
            }),
            Span::SYNTHETIC,
        )
    }

    pub fn assignment_pattern(&mut self, target: NodeIndex, default: NodeIndex) -> NodeIndex {
        self.add(
            NodeKind::AssignmentPattern(AssignmentPatternData { target, default }),
            Span::SYNTHETIC,
        )
    }

    pub fn rest(&mut self, argument: NodeIndex) -> NodeIndex {
        self.add(NodeKind::RestElement(SpreadData { argument }), Span::SYNTHETIC)
    }

    pub fn program(&mut self, statements: Vec<NodeIndex>) -> NodeIndex {
        self.program_of_kind(SourceKind::Script, statements)
    }

    pub fn module(&mut self, statements: Vec<NodeIndex>) -> NodeIndex {
        self.program_of_kind(SourceKind::Module, statements)
    }

    pub fn program_of_kind(
        &mut self,
        source_kind: SourceKind,
        statements: Vec<NodeIndex>,
    ) -> NodeIndex {
        self.add(
            NodeKind::Program(ProgramData {
                source_kind,
                statements: statements.into(),
            }),
            Span::SYNTHETIC,
        )
    }

    pub fn var_decl(&mut self, keyword: DeclKeyword, declarations: Vec<NodeIndex>) -> NodeIndex {
        self.add(
            NodeKind::VariableDeclaration(VariableDeclarationData {
                keyword,
                declarations: declarations.into(),
            }),
            Span::SYNTHETIC,
        )
    }

    pub fn declarator(&mut self, name: NodeIndex, initializer: NodeIndex) -> NodeIndex {
        self.add(
            NodeKind::VariableDeclarator(VariableDeclaratorData { name, initializer }),
            Span::SYNTHETIC,
        )
    }

    /// One-declarator `var`/`let`/`const` statement over a fresh identifier.
    pub fn simple_var(&mut self, keyword: DeclKeyword, name: &str, initializer: NodeIndex) -> NodeIndex {
        let id = self.ident(name);
        let decl = self.declarator(id, initializer);
        self.var_decl(keyword, vec![decl])
    }

    pub fn block(&mut self, statements: Vec<NodeIndex>) -> NodeIndex {
        self.add(
            NodeKind::BlockStatement(BlockData {
                statements: statements.into(),
            }),
            Span::SYNTHETIC,
        )
    }

    pub fn if_stmt(
        &mut self,
        condition: NodeIndex,
        then_branch: NodeIndex,
        else_branch: NodeIndex,
    ) -> NodeIndex {
        self.add(
            NodeKind::IfStatement(IfData {
                condition,
                then_branch,
                else_branch,
            }),
            Span::SYNTHETIC,
        )
    }

    pub fn for_stmt(
        &mut self,
        initializer: NodeIndex,
        condition: NodeIndex,
        incrementor: NodeIndex,
        body: NodeIndex,
    ) -> NodeIndex {
        self.add(
            NodeKind::ForStatement(ForData {
                initializer,
                condition,
                incrementor,
                body,
            }),
            Span::SYNTHETIC,
        )
    }

    pub fn for_in(&mut self, left: NodeIndex, right: NodeIndex, body: NodeIndex) -> NodeIndex {
        self.add(
            NodeKind::ForInStatement(ForEachData { left, right, body }),
            Span::SYNTHETIC,
        )
    }

    pub fn for_of(&mut self, left: NodeIndex, right: NodeIndex, body: NodeIndex) -> NodeIndex {
        self.add(
            NodeKind::ForOfStatement(ForEachData { left, right, body }),
            Span::SYNTHETIC,
        )
    }

    pub fn while_stmt(&mut self, condition: NodeIndex, body: NodeIndex) -> NodeIndex {
        self.add(NodeKind::WhileStatement(WhileData { condition, body }), Span::SYNTHETIC)
    }

    pub fn do_while(&mut self, body: NodeIndex, condition: NodeIndex) -> NodeIndex {
        self.add(
            NodeKind::DoWhileStatement(WhileData { condition, body }),
            Span::SYNTHETIC,
        )
    }

    pub fn switch(&mut self, discriminant: NodeIndex, cases: Vec<NodeIndex>) -> NodeIndex {
        self.add(
            NodeKind::SwitchStatement(SwitchData {
                discriminant,
                cases: cases.into(),
            }),
            Span::SYNTHETIC,
        )
    }

    pub fn case(&mut self, test: NodeIndex, statements: Vec<NodeIndex>) -> NodeIndex {
        self.add(
            NodeKind::SwitchCase(CaseData {
                test,
                statements: statements.into(),
            }),
            Span::SYNTHETIC,
        )
    }

    pub fn try_stmt(
        &mut self,
        block: NodeIndex,
        handler: NodeIndex,
        finalizer: NodeIndex,
    ) -> NodeIndex {
        self.add(
            NodeKind::TryStatement(TryData {
                block,
                handler,
                finalizer,
            }),
            Span::SYNTHETIC,
        )
    }

    pub fn catch(&mut self, parameter: NodeIndex, body: NodeIndex) -> NodeIndex {
        self.add(NodeKind::CatchClause(CatchData { parameter, body }), Span::SYNTHETIC)
    }

    pub fn labeled(&mut self, label: NodeIndex, body: NodeIndex) -> NodeIndex {
        self.add(NodeKind::LabeledStatement(LabeledData { label, body }), Span::SYNTHETIC)
    }

    pub fn break_stmt(&mut self, label: NodeIndex) -> NodeIndex {
        self.add(NodeKind::BreakStatement(JumpData { label }), Span::SYNTHETIC)
    }

    pub fn continue_stmt(&mut self, label: NodeIndex) -> NodeIndex {
        self.add(NodeKind::ContinueStatement(JumpData { label }), Span::SYNTHETIC)
    }

    pub fn return_stmt(&mut self, argument: NodeIndex) -> NodeIndex {
        self.add(NodeKind::ReturnStatement(ReturnData { argument }), Span::SYNTHETIC)
    }

    pub fn throw_stmt(&mut self, argument: NodeIndex) -> NodeIndex {
        self.add(NodeKind::ThrowStatement(ReturnData { argument }), Span::SYNTHETIC)
    }

    pub fn expr_stmt(&mut self, expression: NodeIndex) -> NodeIndex {
        self.add(
            NodeKind::ExpressionStatement(ExpressionStatementData { expression }),
            Span::SYNTHETIC,
        )
    }

    pub fn empty(&mut self) -> NodeIndex {
        self.add(NodeKind::EmptyStatement, Span::SYNTHETIC)
    }

    pub fn import_decl(&mut self, specifiers: Vec<NodeIndex>, source: &str) -> NodeIndex {
        let source = self.string(source);
        self.add(
            NodeKind::ImportDeclaration(ImportData {
                specifiers: specifiers.into(),
                source,
            }),
            Span::SYNTHETIC,
        )
    }

    pub fn import_default(&mut self, local: NodeIndex) -> NodeIndex {
        self.add(
            NodeKind::ImportDefaultSpecifier(ImportLocalData { local }),
            Span::SYNTHETIC,
        )
    }

    pub fn import_named(
        &mut self,
        imported: NodeIndex,
        local: NodeIndex,
        type_only: bool,
    ) -> NodeIndex {
        self.add(
            NodeKind::ImportSpecifier(ImportSpecifierData {
                imported,
                local,
                type_only,
            }),
            Span::SYNTHETIC,
        )
    }

    pub fn import_namespace(&mut self, local: NodeIndex) -> NodeIndex {
        self.add(
            NodeKind::ImportNamespaceSpecifier(ImportLocalData { local }),
            Span::SYNTHETIC,
        )
    }

    pub fn export_named(
        &mut self,
        declaration: NodeIndex,
        specifiers: Vec<NodeIndex>,
        source: Option<&str>,
    ) -> NodeIndex {
        let source = match source {
            Some(text) => self.string(text),
            None => NodeIndex::NONE,
        };
        self.add(
            NodeKind::ExportNamedDeclaration(ExportNamedData {
                declaration,
                specifiers: specifiers.into(),
                source,
            }),
            Span::SYNTHETIC,
        )
    }

    pub fn export_specifier(&mut self, local: NodeIndex, exported: NodeIndex) -> NodeIndex {
        self.add(
            NodeKind::ExportSpecifier(ExportSpecifierData { local, exported }),
            Span::SYNTHETIC,
        )
    }

    pub fn export_default(&mut self, declaration: NodeIndex) -> NodeIndex {
        self.add(
            NodeKind::ExportDefaultDeclaration(ExportDefaultData { declaration }),
            Span::SYNTHETIC,
        )
    }

    pub fn export_all(&mut self, source: &str) -> NodeIndex {
        let source = self.string(source);
        self.add(NodeKind::ExportAllDeclaration(ExportAllData { source }), Span::SYNTHETIC)
    }

    pub fn type_alias(&mut self, name: NodeIndex) -> NodeIndex {
        self.add(NodeKind::TypeAlias(TypeNameData { name }), Span::SYNTHETIC)
    }

    pub fn opaque_type(&mut self, name: NodeIndex) -> NodeIndex {
        self.add(NodeKind::OpaqueType(TypeNameData { name }), Span::SYNTHETIC)
    }

    pub fn interface_decl(&mut self, name: NodeIndex) -> NodeIndex {
        self.add(
            NodeKind::InterfaceDeclaration(TypeNameData { name }),
            Span::SYNTHETIC,
        )
    }

    pub fn declare_variable(&mut self, name: NodeIndex) -> NodeIndex {
        self.add(NodeKind::DeclareVariable(TypeNameData { name }), Span::SYNTHETIC)
    }

    pub fn declare_function(&mut self, name: NodeIndex) -> NodeIndex {
        self.add(NodeKind::DeclareFunction(TypeNameData { name }), Span::SYNTHETIC)
    }

    pub fn declare_module(&mut self, name: NodeIndex) -> NodeIndex {
        self.add(NodeKind::DeclareModule(TypeNameData { name }), Span::SYNTHETIC)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::visit::{find_at_path, key_path};

    #[test]
    fn parents_are_set_on_attach() {
        let mut arena = NodeArena::new();
        let id = arena.ident("a");
        let init = arena.number("1");
        let decl = arena.declarator(id, init);
        let stmt = arena.var_decl(DeclKeyword::Var, vec![decl]);
        let program = arena.program(vec![stmt]);

        assert_eq!(arena.parent(id), decl);
        assert_eq!(arena.parent(init), decl);
        assert_eq!(arena.parent(decl), stmt);
        assert_eq!(arena.parent(stmt), program);
        assert_eq!(arena.parent(program), NodeIndex::NONE);
    }

    #[test]
    fn key_paths_round_trip() {
        let mut arena = NodeArena::new();
        let a = arena.ident("a");
        let p = arena.param(a);
        let body = arena.block(vec![]);
        let name = arena.ident("f");
        let func = arena.function_decl(name, vec![p], body);
        let first = arena.empty();
        let program = arena.program(vec![first, func]);

        let path = key_path(&arena, a).unwrap();
        assert_eq!(path, "statements.1.parameters.0.name");
        assert_eq!(find_at_path(&arena, program, &path), Some(a));
        assert_eq!(key_path(&arena, program).unwrap(), "");
    }

    #[test]
    fn remove_statement_detaches() {
        let mut arena = NodeArena::new();
        let stmt = arena.empty();
        let program = arena.program(vec![stmt]);
        assert!(arena.remove_statement(program, stmt));
        assert_eq!(arena.parent(stmt), NodeIndex::NONE);
        assert!(!arena.remove_statement(program, stmt));
    }

    #[test]
    fn is_within_walks_parents() {
        let mut arena = NodeArena::new();
        let a = arena.ident("a");
        let stmt = arena.expr_stmt(a);
        let block = arena.block(vec![stmt]);
        let program = arena.program(vec![block]);
        assert!(arena.is_within(a, program));
        assert!(arena.is_within(a, block));
        assert!(arena.is_within(program, program));
        assert!(!arena.is_within(program, block));
    }
}

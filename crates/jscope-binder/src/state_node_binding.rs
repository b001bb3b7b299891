//! The crawl DFS: scope creation per container node, declaration and label
//! registration, and reference/violation queueing.

use jscope_ast::node::{ClassData, FunctionData};
use jscope_ast::{NodeArena, NodeIndex, NodeKind};
use tracing::{debug, trace};

use crate::ContainerKind;
use crate::error::BindError;
use crate::kind::{BindingKind, classify};
use crate::state::{ScopeId, ScopeTree};

impl ScopeTree {
    /// Bind a node and its children.
    pub(crate) fn bind_node(&mut self, arena: &NodeArena, idx: NodeIndex) -> Result<(), BindError> {
        if idx.is_none() {
            return Ok(());
        }
        let Some(node) = arena.get(idx) else {
            return Ok(());
        };

        match &node.kind {
            // An identifier reached through an expression position is a
            // reference; declaration-site identifiers never reach this arm.
            NodeKind::Identifier(data) => {
                self.queue_read(idx, &data.text);
            }
            NodeKind::Literal(_) | NodeKind::EmptyStatement => {}

            NodeKind::TemplateLiteral(data) => {
                for &expr in &data.expressions.nodes {
                    self.bind_node(arena, expr)?;
                }
            }
            NodeKind::TaggedTemplate(data) => {
                self.bind_node(arena, data.tag)?;
                self.bind_node(arena, data.quasi)?;
            }
            NodeKind::ObjectExpression(data) => {
                for &prop in &data.properties.nodes {
                    self.bind_node(arena, prop)?;
                }
            }
            NodeKind::ObjectProperty(data) => {
                if data.computed {
                    self.bind_node(arena, data.key)?;
                }
                self.bind_node(arena, data.value)?;
            }
            NodeKind::ObjectMethod(data) => {
                if data.computed {
                    self.bind_node(arena, data.key)?;
                }
                self.bind_callable_body(arena, idx, &data.parameters.nodes, data.body)?;
            }
            NodeKind::ArrayExpression(data) => {
                for &element in &data.elements.nodes {
                    self.bind_node(arena, element)?;
                }
            }
            NodeKind::SpreadElement(data) => {
                self.bind_node(arena, data.argument)?;
            }
            NodeKind::AssignmentExpression(data) => {
                self.bind_assignment_target(arena, data.left)?;
                self.bind_node(arena, data.right)?;
            }
            NodeKind::BinaryExpression(data) => {
                self.bind_node(arena, data.left)?;
                self.bind_node(arena, data.right)?;
            }
            NodeKind::UnaryExpression(data) => {
                self.bind_node(arena, data.operand)?;
            }
            // The operand of `++`/`--` is mutated, not read.
            NodeKind::UpdateExpression(data) => {
                if let Some(name) = arena.identifier_text(data.operand) {
                    self.queue_write(data.operand, name);
                } else {
                    self.bind_node(arena, data.operand)?;
                }
            }
            NodeKind::ConditionalExpression(data) => {
                self.bind_node(arena, data.condition)?;
                self.bind_node(arena, data.when_true)?;
                self.bind_node(arena, data.when_false)?;
            }
            NodeKind::CallExpression(data) | NodeKind::NewExpression(data) => {
                self.bind_node(arena, data.expression)?;
                for &arg in &data.arguments.nodes {
                    self.bind_node(arena, arg)?;
                }
            }
            NodeKind::MemberExpression(data) => {
                self.bind_node(arena, data.object)?;
                if data.computed {
                    self.bind_node(arena, data.property)?;
                }
            }
            NodeKind::ParenthesizedExpression(data) => {
                self.bind_node(arena, data.expression)?;
            }

            NodeKind::FunctionDeclaration(func) => {
                self.bind_function_declaration(arena, func, idx)?;
            }
            // Named function expressions bind their name in their own scope
            // (accessible only inside the function body, not outside).
            NodeKind::FunctionExpression(func) => {
                self.bind_function_like(arena, idx, func, true)?;
            }
            NodeKind::ArrowFunctionExpression(func) => {
                self.bind_function_like(arena, idx, func, false)?;
            }
            NodeKind::ClassDeclaration(class) => {
                self.bind_class(arena, idx, class, false)?;
            }
            NodeKind::ClassExpression(class) => {
                self.bind_class(arena, idx, class, true)?;
            }
            NodeKind::ClassMethod(_) | NodeKind::ClassProperty(_) | NodeKind::StaticBlock(_) => {
                self.bind_class_member(arena, idx)?;
            }

            NodeKind::Program(_) => {
                debug!(idx = idx.0, "nested program node ignored");
            }
            NodeKind::VariableDeclaration(decl) => {
                let kind = classify(arena, idx, false, self.module_source)
                    .unwrap_or(BindingKind::Var);
                for &decl_idx in &decl.declarations.nodes {
                    let Some(decl_node) = arena.get(decl_idx) else {
                        continue;
                    };
                    if let NodeKind::VariableDeclarator(declarator) = &decl_node.kind {
                        self.bind_declaration_pattern(arena, declarator.name, kind, decl_idx)?;
                        if declarator.initializer.is_some() {
                            self.bind_node(arena, declarator.initializer)?;
                        }
                    }
                }
            }
            NodeKind::VariableDeclarator(_) => {
                trace!(idx = idx.0, "declarator outside a declaration list ignored");
            }

            NodeKind::BlockStatement(data) => {
                self.enter_scope(ContainerKind::Block, idx);
                let mut result = Ok(());
                for &stmt in &data.statements.nodes {
                    result = self.bind_node(arena, stmt);
                    if result.is_err() {
                        break;
                    }
                }
                self.exit_scope();
                result?;
            }
            NodeKind::IfStatement(data) => {
                self.bind_node(arena, data.condition)?;
                self.bind_node(arena, data.then_branch)?;
                self.bind_node(arena, data.else_branch)?;
            }
            NodeKind::ForStatement(data) => {
                self.enter_scope(ContainerKind::Loop, idx);
                let result = self
                    .bind_node(arena, data.initializer)
                    .and_then(|()| self.bind_node(arena, data.condition))
                    .and_then(|()| self.bind_node(arena, data.incrementor))
                    .and_then(|()| self.bind_node(arena, data.body));
                self.exit_scope();
                result?;
            }
            NodeKind::ForInStatement(data) | NodeKind::ForOfStatement(data) => {
                self.enter_scope(ContainerKind::Loop, idx);
                let result = self
                    .bind_for_each_left(arena, data.left)
                    .and_then(|()| self.bind_node(arena, data.right))
                    .and_then(|()| self.bind_node(arena, data.body));
                self.exit_scope();
                result?;
            }
            NodeKind::WhileStatement(data) | NodeKind::DoWhileStatement(data) => {
                self.bind_node(arena, data.condition)?;
                self.bind_node(arena, data.body)?;
            }
            // All case clauses share one scope.
            NodeKind::SwitchStatement(data) => {
                self.bind_node(arena, data.discriminant)?;
                self.enter_scope(ContainerKind::Switch, idx);
                let mut result = Ok(());
                for &case in &data.cases.nodes {
                    result = self.bind_node(arena, case);
                    if result.is_err() {
                        break;
                    }
                }
                self.exit_scope();
                result?;
            }
            NodeKind::SwitchCase(data) => {
                self.bind_node(arena, data.test)?;
                for &stmt in &data.statements.nodes {
                    self.bind_node(arena, stmt)?;
                }
            }
            NodeKind::TryStatement(data) => {
                self.bind_node(arena, data.block)?;
                self.bind_node(arena, data.handler)?;
                self.bind_node(arena, data.finalizer)?;
            }
            // The handler block shares the catch scope, so a `let` in the
            // block collides with the catch parameter while a `var` hoists
            // past it.
            NodeKind::CatchClause(data) => {
                self.enter_scope(ContainerKind::Catch, idx);
                let mut result = Ok(());
                if data.parameter.is_some() {
                    result =
                        self.bind_declaration_pattern(arena, data.parameter, BindingKind::Catch, idx);
                }
                if result.is_ok() {
                    result = self.bind_scope_body(arena, data.body);
                }
                self.exit_scope();
                result?;
            }
            NodeKind::LabeledStatement(data) => {
                if let Some(name) = arena.identifier_text(data.label) {
                    self.register_label(name, idx);
                }
                self.bind_node(arena, data.body)?;
            }
            // Jump labels are not variable references.
            NodeKind::BreakStatement(_) | NodeKind::ContinueStatement(_) => {}
            NodeKind::ReturnStatement(data) | NodeKind::ThrowStatement(data) => {
                self.bind_node(arena, data.argument)?;
            }
            NodeKind::ExpressionStatement(data) => {
                self.bind_node(arena, data.expression)?;
            }

            NodeKind::ImportDeclaration(data) => {
                self.bind_import_declaration(arena, data)?;
            }
            NodeKind::ImportDefaultSpecifier(_)
            | NodeKind::ImportSpecifier(_)
            | NodeKind::ImportNamespaceSpecifier(_)
            | NodeKind::ExportSpecifier(_) => {
                trace!(idx = idx.0, "specifier outside its declaration ignored");
            }
            NodeKind::ExportNamedDeclaration(data) => {
                self.bind_export_named(arena, data)?;
            }
            NodeKind::ExportDefaultDeclaration(data) => {
                self.bind_node(arena, data.declaration)?;
            }
            NodeKind::ExportAllDeclaration(_) => {}

            NodeKind::TypeAlias(data)
            | NodeKind::OpaqueType(data)
            | NodeKind::InterfaceDeclaration(data)
            | NodeKind::DeclareVariable(data)
            | NodeKind::DeclareFunction(data)
            | NodeKind::DeclareModule(data) => {
                if let Some(kind) = classify(arena, idx, false, self.module_source)
                    && let Some(name) = arena.identifier_text(data.name)
                {
                    if let Some(id) = self.declare(name, kind, idx)? {
                        self.node_bindings.insert(data.name.0, id);
                    }
                }
            }

            // Patterns only occur inside declarations and assignment
            // targets, which are handled by their owners.
            NodeKind::ObjectPattern(_)
            | NodeKind::ArrayPattern(_)
            | NodeKind::AssignmentPattern(_)
            | NodeKind::RestElement(_)
            | NodeKind::Parameter(_) => {
                trace!(idx = idx.0, "pattern outside a binding position ignored");
            }
        }
        Ok(())
    }

    /// Function declarations register their name outside the function
    /// scope: hoisted to the nearest function/program scope, or
    /// block-scoped in module-source blocks (Annex B only applies to
    /// scripts).
    fn bind_function_declaration(
        &mut self,
        arena: &NodeArena,
        func: &FunctionData,
        idx: NodeIndex,
    ) -> Result<(), BindError> {
        let in_block = !self
            .current_scope_id()
            .and_then(|id| self.scope(id))
            .is_some_and(|scope| scope.kind.is_hoist_target());
        let kind =
            classify(arena, idx, in_block, self.module_source).unwrap_or(BindingKind::Hoisted);
        if let Some(name) = arena.identifier_text(func.name) {
            if let Some(id) = self.declare(name, kind, idx)? {
                self.node_bindings.insert(func.name.0, id);
            }
        }
        self.bind_function_like(arena, idx, func, false)
    }

    /// Enter the function scope, register parameters (their defaults see
    /// the parameter-list environment, not the body), then bind the body
    /// merged into the same scope.
    pub(crate) fn bind_function_like(
        &mut self,
        arena: &NodeArena,
        idx: NodeIndex,
        func: &FunctionData,
        register_local_name: bool,
    ) -> Result<(), BindError> {
        let scope = self.enter_scope(ContainerKind::Function, idx);
        let result = self.bind_function_inner(arena, idx, func, register_local_name, scope);
        self.exit_scope();
        result
    }

    fn bind_function_inner(
        &mut self,
        arena: &NodeArena,
        idx: NodeIndex,
        func: &FunctionData,
        register_local_name: bool,
        scope: ScopeId,
    ) -> Result<(), BindError> {
        if register_local_name
            && func.name.is_some()
            && let Some(name) = arena.identifier_text(func.name)
        {
            let id = self.declare_in(scope, name, BindingKind::Local, idx)?;
            self.node_bindings.insert(func.name.0, id);
        }

        let prev_param_scope = self.param_scope;
        self.param_scope = Some(scope);
        let mut result = Ok(());
        for &param_idx in &func.parameters.nodes {
            result = self.bind_parameter(arena, param_idx);
            if result.is_err() {
                break;
            }
        }
        self.param_scope = None;
        if result.is_ok() {
            result = self.bind_scope_body(arena, func.body);
        }
        self.param_scope = prev_param_scope;
        result
    }

    pub(crate) fn bind_parameter(
        &mut self,
        arena: &NodeArena,
        idx: NodeIndex,
    ) -> Result<(), BindError> {
        let Some(node) = arena.get(idx) else {
            return Ok(());
        };
        if let NodeKind::Parameter(param) = &node.kind {
            trace!(param = idx.0, "bind parameter");
            self.bind_declaration_pattern(arena, param.name, BindingKind::Param, idx)?;
            if param.initializer.is_some() {
                self.bind_node(arena, param.initializer)?;
            }
        }
        Ok(())
    }

    /// Methods and accessors: a function scope over parameters and body,
    /// with no name binding of their own.
    fn bind_callable_body(
        &mut self,
        arena: &NodeArena,
        idx: NodeIndex,
        parameters: &[NodeIndex],
        body: NodeIndex,
    ) -> Result<(), BindError> {
        let scope = self.enter_scope(ContainerKind::Function, idx);
        let prev_param_scope = self.param_scope;
        self.param_scope = Some(scope);
        let mut result = Ok(());
        for &param_idx in parameters {
            result = self.bind_parameter(arena, param_idx);
            if result.is_err() {
                break;
            }
        }
        self.param_scope = None;
        if result.is_ok() {
            result = self.bind_scope_body(arena, body);
        }
        self.param_scope = prev_param_scope;
        self.exit_scope();
        result
    }

    /// Bind a function or catch body. A block body merges into the current
    /// scope; an expression body (arrows) binds directly.
    pub(crate) fn bind_scope_body(
        &mut self,
        arena: &NodeArena,
        body: NodeIndex,
    ) -> Result<(), BindError> {
        match arena.get(body).map(|node| &node.kind) {
            Some(NodeKind::BlockStatement(data)) => {
                for &stmt in &data.statements.nodes {
                    self.bind_node(arena, stmt)?;
                }
                Ok(())
            }
            Some(_) => self.bind_node(arena, body),
            None => Ok(()),
        }
    }

    fn bind_class(
        &mut self,
        arena: &NodeArena,
        idx: NodeIndex,
        class: &ClassData,
        is_expression: bool,
    ) -> Result<(), BindError> {
        if !is_expression
            && class.name.is_some()
            && let Some(name) = arena.identifier_text(class.name)
        {
            let kind = classify(arena, idx, false, self.module_source).unwrap_or(BindingKind::Let);
            if let Some(id) = self.declare(name, kind, idx)? {
                self.node_bindings.insert(class.name.0, id);
            }
        }

        let scope = self.enter_scope(ContainerKind::Class, idx);
        let mut result = Ok(());
        if is_expression
            && class.name.is_some()
            && let Some(name) = arena.identifier_text(class.name)
        {
            result = self
                .declare_in(scope, name, BindingKind::Local, idx)
                .map(|id| {
                    self.node_bindings.insert(class.name.0, id);
                });
        }
        if result.is_ok() {
            for &member in &class.members.nodes {
                result = self.bind_class_member(arena, member);
                if result.is_err() {
                    break;
                }
            }
        }
        self.exit_scope();
        result
    }

    pub(crate) fn bind_class_member(
        &mut self,
        arena: &NodeArena,
        idx: NodeIndex,
    ) -> Result<(), BindError> {
        let Some(node) = arena.get(idx) else {
            return Ok(());
        };
        match &node.kind {
            NodeKind::ClassMethod(method) => {
                if method.computed {
                    self.bind_node(arena, method.key)?;
                }
                self.bind_callable_body(arena, idx, &method.parameters.nodes, method.body)
            }
            NodeKind::ClassProperty(prop) => {
                if prop.computed {
                    self.bind_node(arena, prop.key)?;
                }
                self.bind_node(arena, prop.value)
            }
            NodeKind::StaticBlock(block) => {
                self.enter_scope(ContainerKind::Block, idx);
                let mut result = Ok(());
                for &stmt in &block.statements.nodes {
                    result = self.bind_node(arena, stmt);
                    if result.is_err() {
                        break;
                    }
                }
                self.exit_scope();
                result
            }
            _ => Ok(()),
        }
    }

    /// `for (x of y)` / `for ([a, b] in y)` assignment forms mutate their
    /// targets; declaration forms bind normally.
    fn bind_for_each_left(
        &mut self,
        arena: &NodeArena,
        left: NodeIndex,
    ) -> Result<(), BindError> {
        match arena.get(left).map(|node| &node.kind) {
            Some(NodeKind::VariableDeclaration(_)) => self.bind_node(arena, left),
            Some(_) => self.bind_assignment_target(arena, left),
            None => Ok(()),
        }
    }
}

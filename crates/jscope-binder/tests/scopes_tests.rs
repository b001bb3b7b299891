//! Scope construction, binding kinds, reference resolution, labels, and
//! globals.

use jscope_ast::{DeclKeyword, NodeArena, NodeIndex, SyntaxKind};
use jscope_binder::{BindingKind, ScopeTree};

#[test]
fn var_in_block_registers_at_function_scope() {
    // function f() { { var a = 1; } }
    let mut arena = NodeArena::new();
    let one = arena.number("1");
    let var_a = arena.simple_var(DeclKeyword::Var, "a", one);
    let inner = arena.block(vec![var_a]);
    let body = arena.block(vec![inner]);
    let name = arena.ident("f");
    let func = arena.function_decl(name, vec![], body);
    let program = arena.program(vec![func]);

    let tree = ScopeTree::crawl(&arena, program).expect("crawl");
    let fn_scope = tree.scope_at(func).expect("function scope");
    let block_scope = tree.scope_at(inner).expect("block scope");

    let binding = tree.get_binding(fn_scope, "a").expect("a in function scope");
    assert_eq!(tree.binding(binding).unwrap().kind, BindingKind::Var);
    assert!(
        tree.scope(block_scope).unwrap().own_binding("a").is_none(),
        "var must not register in the block scope"
    );
    assert_eq!(tree.get_binding(block_scope, "a"), Some(binding));
}

#[test]
fn let_is_block_scoped_and_invisible_outside() {
    // { let a; } a;
    let mut arena = NodeArena::new();
    let let_a = arena.simple_var(DeclKeyword::Let, "a", NodeIndex::NONE);
    let block = arena.block(vec![let_a]);
    let a_ref = arena.ident("a");
    let use_a = arena.expr_stmt(a_ref);
    let program = arena.program(vec![block, use_a]);

    let tree = ScopeTree::crawl(&arena, program).expect("crawl");
    assert!(tree.get_binding(tree.root(), "a").is_none());
    assert!(tree.has_global(tree.root(), "a"));
    assert!(tree.binding_of(a_ref).is_none());

    let block_scope = tree.scope_at(block).unwrap();
    let binding = tree.get_binding(block_scope, "a").expect("a in block");
    assert_eq!(tree.binding(binding).unwrap().kind, BindingKind::Let);
    assert_eq!(
        arena.kind_of(tree.binding(binding).unwrap().path),
        Some(SyntaxKind::VariableDeclarator)
    );
}

#[test]
fn function_declaration_is_hoisted_and_resolves_before_its_position() {
    // foo(); function foo() {}
    let mut arena = NodeArena::new();
    let callee = arena.ident("foo");
    let call = arena.call(callee, vec![]);
    let call_stmt = arena.expr_stmt(call);
    let body = arena.block(vec![]);
    let name = arena.ident("foo");
    let func = arena.function_decl(name, vec![], body);
    let program = arena.program(vec![call_stmt, func]);

    let tree = ScopeTree::crawl(&arena, program).expect("crawl");
    let binding_id = tree.get_binding(tree.root(), "foo").expect("foo binding");
    let binding = tree.binding(binding_id).unwrap();
    assert_eq!(binding.kind, BindingKind::Hoisted);
    assert_eq!(arena.kind_of(binding.path), Some(SyntaxKind::FunctionDeclaration));
    assert_eq!(binding.reference_paths, vec![callee]);
    assert_eq!(tree.binding_of(callee), Some(binding_id));
    assert!(!tree.has_global(tree.root(), "foo"));
}

#[test]
fn block_function_declaration_hoists_in_scripts_but_not_modules() {
    // { function f() {} } f();
    let build = |arena: &mut NodeArena, module: bool| {
        let body = arena.block(vec![]);
        let name = arena.ident("f");
        let func = arena.function_decl(name, vec![], body);
        let block = arena.block(vec![func]);
        let callee = arena.ident("f");
        let call = arena.call(callee, vec![]);
        let stmt = arena.expr_stmt(call);
        if module {
            arena.module(vec![block, stmt])
        } else {
            arena.program(vec![block, stmt])
        }
    };

    let mut arena = NodeArena::new();
    let script = build(&mut arena, false);
    let tree = ScopeTree::crawl(&arena, script).expect("crawl script");
    assert!(tree.get_binding(tree.root(), "f").is_some());
    assert!(!tree.has_global(tree.root(), "f"));

    let mut arena = NodeArena::new();
    let module = build(&mut arena, true);
    let tree = ScopeTree::crawl(&arena, module).expect("crawl module");
    assert!(tree.get_binding(tree.root(), "f").is_none());
    assert!(tree.has_global(tree.root(), "f"));
}

#[test]
fn destructured_var_pattern_element_binds_at_the_declarator() {
    // var { x, y: [z] } = obj;
    let mut arena = NodeArena::new();
    let x = arena.ident("x");
    let x_key = arena.ident("x");
    let x_prop = arena.property(x_key, x);
    let z = arena.ident("z");
    let inner = arena.array_pattern(vec![z]);
    let y_key = arena.ident("y");
    let y_prop = arena.property(y_key, inner);
    let pattern = arena.object_pattern(vec![x_prop, y_prop]);
    let obj = arena.ident("obj");
    let declarator = arena.declarator(pattern, obj);
    let decl = arena.var_decl(DeclKeyword::Var, vec![declarator]);
    let program = arena.program(vec![decl]);

    let tree = ScopeTree::crawl(&arena, program).expect("crawl");
    for name in ["x", "z"] {
        let binding_id = tree.get_binding(tree.root(), name).expect("binding");
        let binding = tree.binding(binding_id).unwrap();
        assert_eq!(binding.kind, BindingKind::Var, "{name} is a var binding");
        assert_eq!(binding.path, declarator, "{name} binds at the declarator");
    }
    // The destructuring source is a reference; the pattern keys are not.
    assert!(tree.has_global(tree.root(), "obj"));
    assert!(!tree.has_global(tree.root(), "x"));
    assert!(!tree.has_global(tree.root(), "y"));
}

#[test]
fn import_specifiers_bind_at_their_specifier_nodes() {
    // import d, { a, b as c, type T } from "m"; import * as ns from "n";
    let mut arena = NodeArena::new();
    let d = arena.ident("d");
    let default_spec = arena.import_default(d);
    let a = arena.ident("a");
    let a_spec = arena.import_named(NodeIndex::NONE, a, false);
    let b = arena.ident("b");
    let c = arena.ident("c");
    let c_spec = arena.import_named(b, c, false);
    let t = arena.ident("T");
    let t_spec = arena.import_named(NodeIndex::NONE, t, true);
    let import_m = arena.import_decl(vec![default_spec, a_spec, c_spec, t_spec], "m");
    let ns = arena.ident("ns");
    let ns_spec = arena.import_namespace(ns);
    let import_n = arena.import_decl(vec![ns_spec], "n");
    let program = arena.module(vec![import_m, import_n]);

    let tree = ScopeTree::crawl(&arena, program).expect("crawl");
    let expectations = [
        ("d", default_spec, SyntaxKind::ImportDefaultSpecifier),
        ("a", a_spec, SyntaxKind::ImportSpecifier),
        ("c", c_spec, SyntaxKind::ImportSpecifier),
        ("T", t_spec, SyntaxKind::ImportSpecifier),
        ("ns", ns_spec, SyntaxKind::ImportNamespaceSpecifier),
    ];
    for (name, path, kind) in expectations {
        let binding_id = tree.get_binding(tree.root(), name).expect("import binding");
        let binding = tree.binding(binding_id).unwrap();
        assert_eq!(binding.kind, BindingKind::Module, "{name} is a module binding");
        assert_eq!(binding.path, path, "{name} binds at its specifier");
        assert_eq!(arena.kind_of(binding.path), Some(kind));
    }
    // The aliased original name is not a binding.
    assert!(tree.get_binding(tree.root(), "b").is_none());
}

#[test]
fn named_function_expression_name_is_local_to_its_own_scope() {
    // (function foo() { foo; });
    let mut arena = NodeArena::new();
    let inner_ref = arena.ident("foo");
    let use_stmt = arena.expr_stmt(inner_ref);
    let body = arena.block(vec![use_stmt]);
    let name = arena.ident("foo");
    let func = arena.function_expr(name, vec![], body);
    let paren = arena.paren(func);
    let stmt = arena.expr_stmt(paren);
    let program = arena.program(vec![stmt]);

    let tree = ScopeTree::crawl(&arena, program).expect("crawl");
    assert!(tree.get_binding(tree.root(), "foo").is_none());

    let binding_id = tree.binding_of(inner_ref).expect("inner reference resolves");
    let binding = tree.binding(binding_id).unwrap();
    assert_eq!(binding.kind, BindingKind::Local);
    assert_eq!(arena.kind_of(binding.path), Some(SyntaxKind::FunctionExpression));
    assert_eq!(binding.scope, tree.scope_at(func).unwrap());
}

#[test]
fn class_declaration_is_block_scoped_class_expression_name_is_local() {
    // class C {}  (class D {});
    let mut arena = NodeArena::new();
    let c_name = arena.ident("C");
    let class_c = arena.class_decl(c_name, vec![]);
    let d_name = arena.ident("D");
    let class_d = arena.class_expr(d_name, vec![]);
    let paren = arena.paren(class_d);
    let stmt = arena.expr_stmt(paren);
    let program = arena.program(vec![class_c, stmt]);

    let tree = ScopeTree::crawl(&arena, program).expect("crawl");
    let c = tree.get_binding(tree.root(), "C").expect("C binding");
    assert_eq!(tree.binding(c).unwrap().kind, BindingKind::Let);
    assert_eq!(
        arena.kind_of(tree.binding(c).unwrap().path),
        Some(SyntaxKind::ClassDeclaration)
    );

    assert!(tree.get_binding(tree.root(), "D").is_none());
    let class_scope = tree.scope_at(class_d).unwrap();
    let d = tree.get_binding(class_scope, "D").expect("D in class scope");
    assert_eq!(tree.binding(d).unwrap().kind, BindingKind::Local);
}

#[test]
fn catch_parameter_binds_in_the_catch_scope() {
    // try {} catch (e) { e; }
    let mut arena = NodeArena::new();
    let try_block = arena.block(vec![]);
    let e_param = arena.ident("e");
    let e_ref = arena.ident("e");
    let use_stmt = arena.expr_stmt(e_ref);
    let catch_body = arena.block(vec![use_stmt]);
    let handler = arena.catch(e_param, catch_body);
    let try_stmt = arena.try_stmt(try_block, handler, NodeIndex::NONE);
    let program = arena.program(vec![try_stmt]);

    let tree = ScopeTree::crawl(&arena, program).expect("crawl");
    let binding_id = tree.binding_of(e_ref).expect("e resolves");
    let binding = tree.binding(binding_id).unwrap();
    assert_eq!(binding.kind, BindingKind::Catch);
    assert_eq!(arena.kind_of(binding.path), Some(SyntaxKind::CatchClause));
    assert!(tree.get_binding(tree.root(), "e").is_none());
}

#[test]
fn parameter_default_skips_body_declarations() {
    // var a = "outside"; (function foo(b = a) { let a = "inside"; });
    let mut arena = NodeArena::new();
    let outside = arena.string("outside");
    let var_a = arena.simple_var(DeclKeyword::Var, "a", outside);
    let default_ref = arena.ident("a");
    let b = arena.ident("b");
    let param = arena.param_with_default(b, default_ref);
    let inside = arena.string("inside");
    let let_a = arena.simple_var(DeclKeyword::Let, "a", inside);
    let body = arena.block(vec![let_a]);
    let foo = arena.ident("foo");
    let func = arena.function_expr(foo, vec![param], body);
    let paren = arena.paren(func);
    let stmt = arena.expr_stmt(paren);
    let program = arena.program(vec![var_a, stmt]);

    let tree = ScopeTree::crawl(&arena, program).expect("crawl");
    let binding_id = tree.binding_of(default_ref).expect("default resolves");
    let binding = tree.binding(binding_id).unwrap();
    assert_eq!(binding.kind, BindingKind::Var, "default sees the outer var");
    assert_eq!(binding.scope, tree.root());
}

#[test]
fn parameter_default_sees_a_later_parameter_of_the_same_name() {
    // var a = "outside"; (function foo(b = a, a = "inside") {});
    let mut arena = NodeArena::new();
    let outside = arena.string("outside");
    let var_a = arena.simple_var(DeclKeyword::Var, "a", outside);
    let default_ref = arena.ident("a");
    let b = arena.ident("b");
    let param_b = arena.param_with_default(b, default_ref);
    let a_param_name = arena.ident("a");
    let inside = arena.string("inside");
    let param_a = arena.param_with_default(a_param_name, inside);
    let body = arena.block(vec![]);
    let foo = arena.ident("foo");
    let func = arena.function_expr(foo, vec![param_b, param_a], body);
    let paren = arena.paren(func);
    let stmt = arena.expr_stmt(paren);
    let program = arena.program(vec![var_a, stmt]);

    let tree = ScopeTree::crawl(&arena, program).expect("crawl");
    let binding_id = tree.binding_of(default_ref).expect("default resolves");
    let binding = tree.binding(binding_id).unwrap();
    assert_eq!(binding.kind, BindingKind::Param, "later parameter shadows");
    assert_eq!(binding.path, param_a);
}

#[test]
fn function_nested_in_a_default_sees_body_level_names_normally() {
    // (function f(cb = () => x) { let x; });  -- the arrow body is not a
    // parameter-list lookup, so it resolves x like any closure would.
    let mut arena = NodeArena::new();
    let x_ref = arena.ident("x");
    let arrow = arena.arrow(vec![], x_ref);
    let cb = arena.ident("cb");
    let param = arena.param_with_default(cb, arrow);
    let let_x = arena.simple_var(DeclKeyword::Let, "x", NodeIndex::NONE);
    let body = arena.block(vec![let_x]);
    let f = arena.ident("f");
    let func = arena.function_expr(f, vec![param], body);
    let paren = arena.paren(func);
    let stmt = arena.expr_stmt(paren);
    let program = arena.program(vec![stmt]);

    let tree = ScopeTree::crawl(&arena, program).expect("crawl");
    let binding_id = tree.binding_of(x_ref).expect("x resolves from the arrow");
    assert_eq!(tree.binding(binding_id).unwrap().kind, BindingKind::Let);
}

#[test]
fn labels_are_a_namespace_separate_from_bindings() {
    // foo: {}
    let mut arena = NodeArena::new();
    let label = arena.ident("foo");
    let body = arena.block(vec![]);
    let labeled = arena.labeled(label, body);
    let program = arena.program(vec![labeled]);

    let tree = ScopeTree::crawl(&arena, program).expect("crawl");
    assert!(tree.get_binding(tree.root(), "foo").is_none());
    let label_node = tree.get_label(tree.root(), "foo").expect("label foo");
    assert_eq!(label_node, labeled);
    assert_eq!(arena.kind_of(label_node), Some(SyntaxKind::LabeledStatement));
    assert!(tree.get_label(tree.root(), "toString").is_none());
}

#[test]
fn break_and_continue_labels_are_not_references() {
    // outer: while (x) { break outer; }
    let mut arena = NodeArena::new();
    let label = arena.ident("outer");
    let break_label = arena.ident("outer");
    let brk = arena.break_stmt(break_label);
    let loop_body = arena.block(vec![brk]);
    let x = arena.ident("x");
    let while_stmt = arena.while_stmt(x, loop_body);
    let labeled = arena.labeled(label, while_stmt);
    let program = arena.program(vec![labeled]);

    let tree = ScopeTree::crawl(&arena, program).expect("crawl");
    assert!(
        !tree.has_global(tree.root(), "outer"),
        "jump labels must not count as name uses"
    );
    assert!(tree.has_global(tree.root(), "x"));
}

#[test]
fn reexport_only_names_are_not_uses() {
    // export { x } from "y";
    let mut arena = NodeArena::new();
    let x = arena.ident("x");
    let spec = arena.export_specifier(x, NodeIndex::NONE);
    let export = arena.export_named(NodeIndex::NONE, vec![spec], Some("y"));
    let program = arena.module(vec![export]);

    let tree = ScopeTree::crawl(&arena, program).expect("crawl");
    assert!(!tree.has_global(tree.root(), "x"));
    assert!(tree.binding_of(x).is_none());
}

#[test]
fn local_export_reads_the_exported_binding() {
    // var z; export { z };
    let mut arena = NodeArena::new();
    let var_z = arena.simple_var(DeclKeyword::Var, "z", NodeIndex::NONE);
    let z_local = arena.ident("z");
    let spec = arena.export_specifier(z_local, NodeIndex::NONE);
    let export = arena.export_named(NodeIndex::NONE, vec![spec], None);
    let program = arena.module(vec![var_z, export]);

    let tree = ScopeTree::crawl(&arena, program).expect("crawl");
    let binding_id = tree.get_binding(tree.root(), "z").expect("z binding");
    assert_eq!(tree.binding(binding_id).unwrap().reference_paths, vec![z_local]);
    assert!(!tree.has_global(tree.root(), "z"));
}

#[test]
fn constant_tracking_matches_assignment_history() {
    use jscope_ast::AssignOp;

    // var a = 1;            -> constant
    // var b = 1; b = 2;     -> not constant
    // var c = 1, c = 2;     -> not constant
    // let d = 0; d++;       -> not constant
    let mut arena = NodeArena::new();
    let one = arena.number("1");
    let var_a = arena.simple_var(DeclKeyword::Var, "a", one);

    let one_b = arena.number("1");
    let var_b = arena.simple_var(DeclKeyword::Var, "b", one_b);
    let b_target = arena.ident("b");
    let two = arena.number("2");
    let assign_b = arena.assign(AssignOp::Assign, b_target, two);
    let assign_stmt = arena.expr_stmt(assign_b);

    let one_c = arena.number("1");
    let c1 = arena.ident("c");
    let decl_c1 = arena.declarator(c1, one_c);
    let two_c = arena.number("2");
    let c2 = arena.ident("c");
    let decl_c2 = arena.declarator(c2, two_c);
    let var_c = arena.var_decl(DeclKeyword::Var, vec![decl_c1, decl_c2]);

    let zero = arena.number("0");
    let let_d = arena.simple_var(DeclKeyword::Let, "d", zero);
    let d_target = arena.ident("d");
    let incr = arena.update(jscope_ast::UpdateOp::Increment, false, d_target);
    let incr_stmt = arena.expr_stmt(incr);

    let program = arena.program(vec![var_a, var_b, assign_stmt, var_c, let_d, incr_stmt]);
    let tree = ScopeTree::crawl(&arena, program).expect("crawl");

    let binding = |name: &str| {
        let id = tree.get_binding(tree.root(), name).expect("binding");
        tree.binding(id).unwrap()
    };
    assert!(binding("a").constant);
    assert!(!binding("b").constant);
    assert_eq!(binding("b").constant_violations, vec![b_target]);
    assert!(!binding("c").constant);
    assert_eq!(
        binding("c").path,
        decl_c2,
        "the later legal re-declaration is canonical"
    );
    assert!(!binding("d").constant);
    assert_eq!(binding("d").constant_violations, vec![d_target]);
}

#[test]
fn references_resolve_to_the_nearest_enclosing_declaration() {
    // let a; { let a; { a; } }
    let mut arena = NodeArena::new();
    let outer_a = arena.simple_var(DeclKeyword::Let, "a", NodeIndex::NONE);
    let a_ref = arena.ident("a");
    let use_stmt = arena.expr_stmt(a_ref);
    let innermost = arena.block(vec![use_stmt]);
    let middle_a = arena.simple_var(DeclKeyword::Let, "a", NodeIndex::NONE);
    let middle = arena.block(vec![middle_a, innermost]);
    let program = arena.program(vec![outer_a, middle]);

    let tree = ScopeTree::crawl(&arena, program).expect("crawl");
    let middle_scope = tree.scope_at(middle).unwrap();
    let resolved = tree.binding_of(a_ref).expect("a resolves");
    assert_eq!(tree.binding(resolved).unwrap().scope, middle_scope);
}

#[test]
fn for_of_declaration_scopes_to_the_loop_head() {
    // for (const v of arr) { v; }
    let mut arena = NodeArena::new();
    let v = arena.ident("v");
    let declarator = arena.declarator(v, NodeIndex::NONE);
    let decl = arena.var_decl(DeclKeyword::Const, vec![declarator]);
    let arr = arena.ident("arr");
    let v_ref = arena.ident("v");
    let use_stmt = arena.expr_stmt(v_ref);
    let body = arena.block(vec![use_stmt]);
    let for_of = arena.for_of(decl, arr, body);
    let program = arena.program(vec![for_of]);

    let tree = ScopeTree::crawl(&arena, program).expect("crawl");
    let loop_scope = tree.scope_at(for_of).unwrap();
    let binding_id = tree.binding_of(v_ref).expect("v resolves");
    let binding = tree.binding(binding_id).unwrap();
    assert_eq!(binding.kind, BindingKind::Const);
    assert_eq!(binding.scope, loop_scope);
    assert!(tree.get_binding(tree.root(), "v").is_none());
    assert!(tree.has_global(tree.root(), "arr"));
}

#[test]
fn switch_cases_share_one_scope() {
    // switch (x) { case 1: let a; default: let b; }
    let mut arena = NodeArena::new();
    let x = arena.ident("x");
    let one = arena.number("1");
    let let_a = arena.simple_var(DeclKeyword::Let, "a", NodeIndex::NONE);
    let case1 = arena.case(one, vec![let_a]);
    let let_b = arena.simple_var(DeclKeyword::Let, "b", NodeIndex::NONE);
    let default_case = arena.case(NodeIndex::NONE, vec![let_b]);
    let switch = arena.switch(x, vec![case1, default_case]);
    let program = arena.program(vec![switch]);

    let tree = ScopeTree::crawl(&arena, program).expect("crawl");
    let switch_scope = tree.scope_at(switch).expect("switch scope");
    assert!(tree.scope(switch_scope).unwrap().own_binding("a").is_some());
    assert!(tree.scope(switch_scope).unwrap().own_binding("b").is_some());
    let names: Vec<_> = tree.scope(switch_scope).unwrap().binding_names().collect();
    assert_eq!(names, vec!["a", "b"], "binding iteration is deterministic");
}

#[test]
fn stats_and_validation_cover_the_crawled_tree() {
    // var a = 1; a; b;
    let mut arena = NodeArena::new();
    let one = arena.number("1");
    let var_a = arena.simple_var(DeclKeyword::Var, "a", one);
    let a_ref = arena.ident("a");
    let use_a = arena.expr_stmt(a_ref);
    let b_ref = arena.ident("b");
    let use_b = arena.expr_stmt(b_ref);
    let program = arena.program(vec![var_a, use_a, use_b]);

    let tree = ScopeTree::crawl(&arena, program).expect("crawl");
    let stats = tree.stats();
    assert_eq!(stats.scopes, 1);
    assert_eq!(stats.bindings, 1);
    assert_eq!(stats.references, 1);
    assert_eq!(stats.globals, 1);

    let json = serde_json::to_value(stats).expect("stats serialize");
    assert_eq!(json["bindings"], 1);
    assert_eq!(json["globals"], 1);

    assert!(tree.validate().is_empty(), "crawl output must be consistent");
}

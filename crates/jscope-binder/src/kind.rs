//! Binding kind classification and the duplicate-declaration legality
//! matrix.

use jscope_ast::{DeclKeyword, NodeArena, NodeIndex, NodeKind};
use serde::Serialize;

/// How a name was declared. Pure function of the declaring construct's
/// syntactic category; see [`classify`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum BindingKind {
    /// `var` declarator; registers at the nearest function/program scope.
    Var,
    /// `let` declarator, and class declarations (block-scoped, no
    /// use-before-declaration hoisting for the class value).
    Let,
    /// `const` declarator.
    Const,
    /// Function declaration that stays block-scoped (module-source blocks).
    Function,
    /// Function parameter, including destructured parameter bindings.
    Param,
    /// Import specifier binding of any flavor.
    Module,
    /// Catch clause parameter.
    Catch,
    /// Internal name of a function/class expression, visible only inside
    /// that function/class's own scope.
    Local,
    /// Function declaration hoisted to the nearest function/program scope.
    Hoisted,
    /// `type T = ...`
    TypeAlias,
    /// `opaque type T = ...`
    OpaqueType,
    /// `interface I { ... }`
    Interface,
    /// `declare var x`
    DeclareVariable,
    /// `declare function f`
    DeclareFunction,
    /// `declare module M`
    DeclareModule,
}

impl BindingKind {
    /// Declared-only/type-space kinds are exempt from the runtime
    /// duplicate-declaration matrix.
    pub const fn is_type_space(self) -> bool {
        matches!(
            self,
            BindingKind::TypeAlias
                | BindingKind::OpaqueType
                | BindingKind::Interface
                | BindingKind::DeclareVariable
                | BindingKind::DeclareFunction
                | BindingKind::DeclareModule
        )
    }

    /// Kinds that register at the nearest function/program scope instead of
    /// the immediately enclosing scope.
    pub const fn is_hoisting(self) -> bool {
        matches!(self, BindingKind::Var | BindingKind::Hoisted)
    }

    /// Projection into the duplicate-declaration matrix, `None` for
    /// type-space kinds.
    pub const fn decl_class(self) -> Option<DeclClass> {
        match self {
            BindingKind::Var => Some(DeclClass::Var),
            BindingKind::Let => Some(DeclClass::Let),
            BindingKind::Const => Some(DeclClass::Const),
            BindingKind::Function | BindingKind::Hoisted => Some(DeclClass::Function),
            BindingKind::Param => Some(DeclClass::Param),
            BindingKind::Module => Some(DeclClass::Module),
            BindingKind::Catch => Some(DeclClass::Catch),
            BindingKind::Local => Some(DeclClass::Local),
            _ => None,
        }
    }
}

/// Declaration class for the legality matrix. Class declarations project to
/// `Let`, hoisted and block-scoped function declarations both to
/// `Function`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum DeclClass {
    Let,
    Const,
    Var,
    Function,
    Param,
    Module,
    Catch,
    Local,
}

/// The legality matrix over coexisting declarations of one name in one
/// scope. Symmetric over `{let, const, var, function, class}`: only
/// `var`/`function` combinations are legal there. Parameters are always
/// legal to register (they come first in their scope), re-declaring *over*
/// a parameter is legal only for `var`/`function`, the internal name of a
/// function/class expression never conflicts, and a catch parameter only
/// tolerates `var`/`function` (which hoist past the catch scope anyway).
pub const fn is_legal_pair(existing: DeclClass, incoming: DeclClass) -> bool {
    use DeclClass::*;
    match (existing, incoming) {
        (_, Param) => true,
        (Local, _) => true,
        (Param, Var | Function) => true,
        (Catch, Var | Function) => true,
        (Var | Function, Var | Function) => true,
        _ => false,
    }
}

/// Classify a declaration node into its binding kind. A pure function of
/// the declaring construct's category; no tree walking.
///
/// `in_block` and `module_source` decide the Annex-B split for function
/// declarations: at the top of a function/program body, or inside a block
/// of a script source, the declaration hoists (`Hoisted`); inside a block
/// of a module source it stays block-scoped (`Function`).
pub fn classify(
    arena: &NodeArena,
    idx: NodeIndex,
    in_block: bool,
    module_source: bool,
) -> Option<BindingKind> {
    let node = arena.get(idx)?;
    let kind = match &node.kind {
        NodeKind::VariableDeclaration(decl) => match decl.keyword {
            DeclKeyword::Var => BindingKind::Var,
            DeclKeyword::Let => BindingKind::Let,
            DeclKeyword::Const => BindingKind::Const,
        },
        NodeKind::FunctionDeclaration(_) => {
            if in_block && module_source {
                BindingKind::Function
            } else {
                BindingKind::Hoisted
            }
        }
        NodeKind::FunctionExpression(_) | NodeKind::ClassExpression(_) => BindingKind::Local,
        NodeKind::ClassDeclaration(_) => BindingKind::Let,
        NodeKind::Parameter(_) => BindingKind::Param,
        NodeKind::CatchClause(_) => BindingKind::Catch,
        NodeKind::ImportDefaultSpecifier(_)
        | NodeKind::ImportSpecifier(_)
        | NodeKind::ImportNamespaceSpecifier(_) => BindingKind::Module,
        NodeKind::TypeAlias(_) => BindingKind::TypeAlias,
        NodeKind::OpaqueType(_) => BindingKind::OpaqueType,
        NodeKind::InterfaceDeclaration(_) => BindingKind::Interface,
        NodeKind::DeclareVariable(_) => BindingKind::DeclareVariable,
        NodeKind::DeclareFunction(_) => BindingKind::DeclareFunction,
        NodeKind::DeclareModule(_) => BindingKind::DeclareModule,
        _ => return None,
    };
    Some(kind)
}

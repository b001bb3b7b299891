//! Collision-free synthetic identifier generation.

use jscope_common::limits::MAX_UID_ATTEMPTS;
use tracing::debug;

use crate::state::{ScopeId, ScopeTree};

impl ScopeTree {
    /// Produce `_<base>` if that name is free from `scope` outward, else
    /// `_<base>2`, `_<base>3`, ... Collision checking consults bindings and
    /// labels along the whole scope chain, the unresolved globals of the
    /// crawl root, every uid already handed out since the last crawl, and
    /// the reserved-word table. Repeated calls never return the same name
    /// twice absent an intervening crawl.
    pub fn generate_uid(&mut self, scope: ScopeId, base: &str) -> String {
        let stem = sanitize_base(base);
        let mut attempt: u32 = 1;
        let mut candidate = format!("_{stem}");
        while self.uid_collides(scope, &candidate) && attempt < MAX_UID_ATTEMPTS {
            attempt += 1;
            candidate = format!("_{stem}{attempt}");
        }
        debug!(scope = scope.0, base, uid = %candidate, "generated uid");
        self.uid_names.insert(candidate.clone());
        candidate
    }

    fn uid_collides(&self, scope: ScopeId, name: &str) -> bool {
        if is_reserved_word(name) || self.uid_names.contains(name) {
            return true;
        }
        let mut current = Some(scope);
        while let Some(id) = current {
            let Some(record) = self.scope(id) else {
                return false;
            };
            if record.bindings.contains_key(name)
                || record.labels.contains_key(name)
                || record.globals.contains_key(name)
            {
                return true;
            }
            current = record.parent;
        }
        false
    }
}

/// Reduce a requested base name to a usable identifier stem: strip
/// non-identifier characters, leading digits/underscores, and trailing
/// digits. An empty result falls back to `temp`.
fn sanitize_base(base: &str) -> String {
    let cleaned: String = base
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '_' || *c == '$')
        .collect();
    let cleaned = cleaned
        .trim_start_matches(|c: char| c.is_ascii_digit() || c == '_')
        .trim_end_matches(|c: char| c.is_ascii_digit());
    if cleaned.is_empty() {
        "temp".to_string()
    } else {
        cleaned.to_string()
    }
}

/// ECMAScript reserved words, including strict-mode and contextual ones
/// that can never be binding names.
pub fn is_reserved_word(name: &str) -> bool {
    matches!(
        name,
        "break"
            | "case"
            | "catch"
            | "class"
            | "const"
            | "continue"
            | "debugger"
            | "default"
            | "delete"
            | "do"
            | "else"
            | "enum"
            | "export"
            | "extends"
            | "false"
            | "finally"
            | "for"
            | "function"
            | "if"
            | "implements"
            | "import"
            | "in"
            | "instanceof"
            | "interface"
            | "let"
            | "new"
            | "null"
            | "package"
            | "private"
            | "protected"
            | "public"
            | "return"
            | "static"
            | "super"
            | "switch"
            | "this"
            | "throw"
            | "true"
            | "try"
            | "typeof"
            | "var"
            | "void"
            | "while"
            | "with"
            | "yield"
    )
}

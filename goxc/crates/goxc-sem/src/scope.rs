use goxc_par::TypeName;
use rustc_hash::FxHashMap;

/// Scope ID
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScopeId(u32);

/// What a name resolves to.
#[derive(Debug, Clone)]
pub enum Symbol {
    /// A `var` or `const` declaration
    Var { ty: TypeName, is_const: bool },
    /// A function parameter
    Param { ty: TypeName },
    /// A function declaration
    Func {
        params: Vec<TypeName>,
        return_type: TypeName,
        imported: bool,
    },
}

impl Symbol {
    /// The value type a read of this symbol yields, if it is readable.
    pub fn value_type(&self) -> Option<TypeName> {
        match self {
            Symbol::Var { ty, .. } | Symbol::Param { ty } => Some(*ty),
            Symbol::Func { .. } => None,
        }
    }
}

/// A single lexical scope
#[derive(Debug)]
struct Scope {
    /// Bindings in this scope
    bindings: FxHashMap<String, Symbol>,
    /// Parent scope
    parent: Option<ScopeId>,
}

/// Scope tree for name resolution.
///
/// The root scope is the parentless global scope; each function body gets
/// a child scope whose parent is global. GoxLang has function-level
/// scoping, so `if`/`while` bodies share their function's scope.
/// Re-declaration in a scope overwrites the previous binding (last wins).
pub struct ScopeTree {
    scopes: Vec<Scope>,
    current: ScopeId,
}

impl ScopeTree {
    /// Creates a scope tree containing only the global scope.
    pub fn new() -> Self {
        Self {
            scopes: vec![Scope {
                bindings: FxHashMap::default(),
                parent: None,
            }],
            current: ScopeId(0),
        }
    }

    /// Enters a new scope under the current one.
    pub fn enter_scope(&mut self) -> ScopeId {
        let id = ScopeId(self.scopes.len() as u32);
        self.scopes.push(Scope {
            bindings: FxHashMap::default(),
            parent: Some(self.current),
        });
        self.current = id;
        id
    }

    /// Exits the current scope, returning to its parent.
    pub fn exit_scope(&mut self) {
        if let Some(parent) = self.scopes[self.current.0 as usize].parent {
            self.current = parent;
        }
    }

    /// Records a binding in the current scope.
    pub fn define(&mut self, name: impl Into<String>, symbol: Symbol) {
        self.scopes[self.current.0 as usize]
            .bindings
            .insert(name.into(), symbol);
    }

    /// Records a binding in the global scope regardless of the current one.
    pub fn define_global(&mut self, name: impl Into<String>, symbol: Symbol) {
        self.scopes[0].bindings.insert(name.into(), symbol);
    }

    /// Resolves a name, walking parent links.
    pub fn resolve(&self, name: &str) -> Option<&Symbol> {
        let mut scope_id = self.current;
        loop {
            let scope = &self.scopes[scope_id.0 as usize];
            if let Some(symbol) = scope.bindings.get(name) {
                return Some(symbol);
            }
            match scope.parent {
                Some(parent) => scope_id = parent,
                None => return None,
            }
        }
    }
}

impl Default for ScopeTree {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn int_var() -> Symbol {
        Symbol::Var {
            ty: TypeName::Int,
            is_const: false,
        }
    }

    #[test]
    fn test_global_define_and_resolve() {
        let mut scopes = ScopeTree::new();
        scopes.define("x", int_var());
        assert!(scopes.resolve("x").is_some());
        assert!(scopes.resolve("y").is_none());
    }

    #[test]
    fn test_child_scope_sees_parent() {
        let mut scopes = ScopeTree::new();
        scopes.define("g", int_var());
        scopes.enter_scope();
        assert!(scopes.resolve("g").is_some());
    }

    #[test]
    fn test_child_binding_shadows_parent() {
        let mut scopes = ScopeTree::new();
        scopes.define(
            "x",
            Symbol::Var {
                ty: TypeName::Int,
                is_const: false,
            },
        );
        scopes.enter_scope();
        scopes.define(
            "x",
            Symbol::Var {
                ty: TypeName::Float,
                is_const: false,
            },
        );
        match scopes.resolve("x") {
            Some(Symbol::Var { ty, .. }) => assert_eq!(*ty, TypeName::Float),
            other => panic!("unexpected resolution: {:?}", other),
        }
    }

    #[test]
    fn test_exit_scope_restores_parent_binding() {
        let mut scopes = ScopeTree::new();
        scopes.define("x", int_var());
        scopes.enter_scope();
        scopes.define(
            "x",
            Symbol::Param {
                ty: TypeName::Char,
            },
        );
        scopes.exit_scope();
        match scopes.resolve("x") {
            Some(Symbol::Var { ty, .. }) => assert_eq!(*ty, TypeName::Int),
            other => panic!("unexpected resolution: {:?}", other),
        }
    }

    #[test]
    fn test_last_declaration_wins() {
        let mut scopes = ScopeTree::new();
        scopes.define(
            "x",
            Symbol::Var {
                ty: TypeName::Int,
                is_const: false,
            },
        );
        scopes.define(
            "x",
            Symbol::Var {
                ty: TypeName::Bool,
                is_const: true,
            },
        );
        match scopes.resolve("x") {
            Some(Symbol::Var { ty, is_const }) => {
                assert_eq!(*ty, TypeName::Bool);
                assert!(is_const);
            }
            other => panic!("unexpected resolution: {:?}", other),
        }
    }

    #[test]
    fn test_define_global_from_child_scope() {
        let mut scopes = ScopeTree::new();
        scopes.enter_scope();
        scopes.define_global("g", int_var());
        scopes.exit_scope();
        assert!(scopes.resolve("g").is_some());
    }
}

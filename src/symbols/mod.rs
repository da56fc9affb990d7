//! The symbol table: a hierarchical lexical-scope structure pre-populated
//! with built-in function symbols (spec.md §3, §4.4).

pub mod scope;
pub mod symbol;

pub use scope::{Redefinition, ScopeKind, ScopeStack};
pub use symbol::{FunctionSymbol, Symbol, VariableSymbol};

use once_cell::sync::Lazy;

use crate::ast::Type;
use crate::errors::NO_POSITION;

/// The three built-in functions seeded into the global scope at
/// construction (spec.md §3): `println`, `readLine`, `toString`.
static BUILTINS: Lazy<Vec<(&'static str, Type)>> = Lazy::new(|| {
    vec![
        ("println", Type::function(vec![Type::STRING], Type::VOID)),
        ("readLine", Type::function(vec![], Type::STRING)),
        ("toString", Type::function(vec![Type::INT], Type::STRING)),
    ]
});

/// Builds a fresh symbol table with the global scope pre-seeded with the
/// three built-ins.
pub fn new_symbol_table() -> ScopeStack {
    let mut scope = ScopeStack::new();
    for (name, ty) in BUILTINS.iter() {
        let Type::Function { params, .. } = ty.clone() else {
            unreachable!("built-ins are always function-typed");
        };
        scope
            .define(Symbol::Function(FunctionSymbol {
                name: (*name).to_owned(),
                ty: ty.clone(),
                params: params
                    .into_iter()
                    .enumerate()
                    .map(|(i, p)| (format!("arg{i}"), p))
                    .collect(),
                declared_at: NO_POSITION,
                defined: true,
            }))
            .expect("built-in names are distinct and the global scope starts empty");
    }
    scope
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seeds_the_three_built_ins() {
        let table = new_symbol_table();
        assert_eq!(
            table.resolve("println").unwrap().ty(),
            &Type::function(vec![Type::STRING], Type::VOID)
        );
        assert_eq!(
            table.resolve("readLine").unwrap().ty(),
            &Type::function(vec![], Type::STRING)
        );
        assert_eq!(
            table.resolve("toString").unwrap().ty(),
            &Type::function(vec![Type::INT], Type::STRING)
        );
    }

    #[test]
    fn redefining_a_builtin_is_a_redefinition() {
        let mut table = new_symbol_table();
        let result = table.define(Symbol::Function(FunctionSymbol {
            name: "println".to_owned(),
            ty: Type::function(vec![Type::INT], Type::VOID),
            params: vec![],
            declared_at: NO_POSITION,
            defined: true,
        }));
        assert!(result.is_err());
    }
}

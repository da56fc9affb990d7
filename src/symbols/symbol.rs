use crate::ast::Type;
use crate::errors::Position;

/// A named entity resolvable within some scope chain (spec.md §3).
#[derive(Debug, Clone, PartialEq)]
pub enum Symbol {
    Variable(VariableSymbol),
    Function(FunctionSymbol),
}

#[derive(Debug, Clone, PartialEq)]
pub struct VariableSymbol {
    pub name: String,
    pub ty: Type,
    pub declared_at: Position,
    pub initialized: bool,
    pub used: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FunctionSymbol {
    pub name: String,
    pub ty: Type,
    pub params: Vec<(String, Type)>,
    pub declared_at: Position,
    /// `true` from construction for built-ins (spec.md §3, §9).
    pub defined: bool,
}

impl Symbol {
    pub fn name(&self) -> &str {
        match self {
            Symbol::Variable(v) => &v.name,
            Symbol::Function(f) => &f.name,
        }
    }

    pub fn ty(&self) -> &Type {
        match self {
            Symbol::Variable(v) => &v.ty,
            Symbol::Function(f) => &f.ty,
        }
    }

    pub fn declared_at(&self) -> Position {
        match self {
            Symbol::Variable(v) => v.declared_at,
            Symbol::Function(f) => f.declared_at,
        }
    }

    pub fn as_variable(&self) -> Option<&VariableSymbol> {
        match self {
            Symbol::Variable(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_variable_mut(&mut self) -> Option<&mut VariableSymbol> {
        match self {
            Symbol::Variable(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_function(&self) -> Option<&FunctionSymbol> {
        match self {
            Symbol::Function(f) => Some(f),
            _ => None,
        }
    }
}

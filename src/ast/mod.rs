//! The typed abstract syntax tree produced by the AST Builder (spec.md §3,
//! §4.3), collapsed per spec.md §9 into two tagged sum types (`Stmt`, `Expr`)
//! matched exhaustively rather than dispatched through a classical visitor.

pub mod builder;
pub mod expr;
pub mod stmt;
pub mod types;

pub use expr::{BinaryOp, Expr, ExprKind, LambdaBody, UnaryOp};
pub use stmt::{Block, FunctionDecl, Param, Stmt, StmtKind};
pub use types::{Primitive, Type};

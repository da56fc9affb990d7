//! Lowers the parser's concrete syntax tree into the final AST (spec.md
//! §4.3): string-literal escapes are processed exactly once here, dot-method
//! calls are rewritten into ordinary calls, and calls whose callee is not a
//! bare name are rejected as unsupported higher-order calls.

use crate::ast::{
    stmt::{Block, FunctionDecl, Param},
    types::Type,
    BinaryOp, Expr, ExprKind, LambdaBody, Stmt, StmtKind, UnaryOp,
};
use crate::errors::{Position, SemanticError};
use crate::parser::cst::{CBlock, CExpr, CLambdaBody, CParam, CStmt, TypeSyntax};

pub type BuildResult<T> = Result<T, SemanticError>;

/// Processes GP-λ's closed set of string escapes (spec.md §4.1): `\n \r \t
/// \" \\`. Any other backslash escape is retained verbatim, including the
/// backslash, per spec.md's documented caveat.
pub fn unescape(raw: &str) -> String {
    let mut result = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            result.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => result.push('\n'),
            Some('r') => result.push('\r'),
            Some('t') => result.push('\t'),
            Some('"') => result.push('"'),
            Some('\\') => result.push('\\'),
            Some(other) => {
                result.push('\\');
                result.push(other);
            }
            None => result.push('\\'),
        }
    }
    result
}

pub fn build_program(cst: Vec<CStmt>) -> BuildResult<Stmt> {
    let position = cst.first().map(position_of).unwrap_or((1, 1));
    let mut statements = Vec::with_capacity(cst.len());
    for stmt in cst {
        statements.push(build_stmt(stmt)?);
    }
    Ok(Stmt::new(StmtKind::Program(statements), position))
}

fn position_of(stmt: &CStmt) -> Position {
    match stmt {
        CStmt::FunctionDecl { position, .. }
        | CStmt::VarDecl { position, .. }
        | CStmt::Assignment { position, .. }
        | CStmt::If { position, .. }
        | CStmt::Return { position, .. }
        | CStmt::Assert { position, .. }
        | CStmt::ExprStmt(_, position) => *position,
        CStmt::Block(block) => block.position,
    }
}

fn build_stmt(cst: CStmt) -> BuildResult<Stmt> {
    match cst {
        CStmt::FunctionDecl {
            name,
            params,
            return_type,
            body,
            position,
        } => {
            let params = params.into_iter().map(build_param).collect();
            let return_type = return_type.map(build_type);
            let body = build_block(body)?;
            Ok(Stmt::new(
                StmtKind::FunctionDecl(FunctionDecl {
                    name,
                    params,
                    return_type,
                    body,
                    position,
                }),
                position,
            ))
        }
        CStmt::Block(block) => {
            let position = block.position;
            Ok(Stmt::new(StmtKind::Block(build_block(block)?), position))
        }
        CStmt::VarDecl {
            name,
            declared_type,
            initializer,
            position,
        } => {
            let declared_type = declared_type.map(build_type);
            let initializer = initializer.map(build_expr).transpose()?;
            Ok(Stmt::new(
                StmtKind::VarDecl {
                    name,
                    declared_type,
                    initializer,
                },
                position,
            ))
        }
        CStmt::Assignment {
            target,
            value,
            position,
        } => Ok(Stmt::new(
            StmtKind::Assignment {
                target,
                value: build_expr(value)?,
            },
            position,
        )),
        CStmt::If {
            condition,
            then_block,
            else_block,
            position,
        } => {
            let condition = build_expr(condition)?;
            let then_block = build_block(then_block)?;
            let else_block = else_block.map(build_block).transpose()?;
            Ok(Stmt::new(
                StmtKind::If {
                    condition,
                    then_block,
                    else_block,
                },
                position,
            ))
        }
        CStmt::Return { value, position } => {
            let value = value.map(build_expr).transpose()?;
            Ok(Stmt::new(StmtKind::Return { value }, position))
        }
        CStmt::Assert {
            condition,
            message,
            position,
        } => {
            let condition = build_expr(condition)?;
            let message = message.map(|raw| unescape(&raw));
            Ok(Stmt::new(StmtKind::Assert { condition, message }, position))
        }
        CStmt::ExprStmt(expr, position) => {
            Ok(Stmt::new(StmtKind::ExprStmt(build_expr(expr)?), position))
        }
    }
}

fn build_block(cst: CBlock) -> BuildResult<Block> {
    let mut statements = Vec::with_capacity(cst.statements.len());
    for stmt in cst.statements {
        statements.push(build_stmt(stmt)?);
    }
    Ok(Block {
        statements,
        position: cst.position,
    })
}

fn build_param(cst: CParam) -> Param {
    Param {
        name: cst.name,
        ty: build_type(cst.ty),
        position: cst.position,
    }
}

fn build_type(cst: TypeSyntax) -> Type {
    match cst {
        TypeSyntax::Int => Type::INT,
        TypeSyntax::String => Type::STRING,
        TypeSyntax::Bool => Type::BOOL,
        TypeSyntax::Void => Type::VOID,
        TypeSyntax::Func(mut types) => {
            let return_type = build_type(types.pop().expect("grammar guarantees arity >= 1"));
            let params = types.into_iter().map(build_type).collect();
            Type::function(params, return_type)
        }
    }
}

fn build_expr(cst: CExpr) -> BuildResult<Expr> {
    let position = cst.position();
    let kind = match cst {
        CExpr::Int(value, _) => ExprKind::Int(value),
        CExpr::Str(raw, _) => ExprKind::Str(unescape(&raw)),
        CExpr::Bool(value, _) => ExprKind::Bool(value),
        CExpr::Var(name, _) => ExprKind::Var(name),
        CExpr::Lambda { params, body, .. } => ExprKind::Lambda {
            params: params.into_iter().map(build_param).collect(),
            body: build_lambda_body(body)?,
        },
        CExpr::Call { callee, args, .. } => {
            let CExpr::Var(name, _) = *callee else {
                return Err(SemanticError::new(
                    position,
                    "higher-order function calls not yet supported",
                ));
            };
            ExprKind::Call {
                callee: name,
                args: build_expr_list(args)?,
            }
        }
        CExpr::MethodCall {
            receiver,
            method,
            args,
            ..
        } => {
            let receiver = build_expr(*receiver)?;
            let mut call_args = Vec::with_capacity(args.len() + 1);
            call_args.push(receiver);
            call_args.extend(build_expr_list(args)?);
            ExprKind::Call {
                callee: method,
                args: call_args,
            }
        }
        CExpr::Binary { op, left, right, .. } => {
            let op = convert_binary_op(op);
            ExprKind::Binary {
                op,
                left: Box::new(build_expr(*left)?),
                right: Box::new(build_expr(*right)?),
            }
        }
        CExpr::Unary { op, operand, .. } => ExprKind::Unary {
            op: convert_unary_op(op),
            operand: Box::new(build_expr(*operand)?),
        },
    };
    Ok(Expr::new(kind, position))
}

fn build_expr_list(list: Vec<CExpr>) -> BuildResult<Vec<Expr>> {
    list.into_iter().map(build_expr).collect()
}

fn build_lambda_body(cst: CLambdaBody) -> BuildResult<LambdaBody> {
    match cst {
        CLambdaBody::Expr(expr) => Ok(LambdaBody::Expr(Box::new(build_expr(*expr)?))),
        CLambdaBody::Block(block) => Ok(LambdaBody::Block(build_block(block)?)),
    }
}

// The CST reuses `ast::{BinaryOp, UnaryOp}` directly, so converting is the
// identity; kept as explicit functions so a future CST-local operator tag
// doesn't silently change analyzer/emitter semantics.
fn convert_binary_op(op: BinaryOp) -> BinaryOp {
    op
}

fn convert_unary_op(op: UnaryOp) -> UnaryOp {
    op
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unescape_processes_recognized_escapes() {
        assert_eq!(
            unescape("a\\nb\\tc\\r\\\"d\\\\e"),
            "a\nb\tc\r\"d\\e"
        );
    }

    #[test]
    fn unescape_retains_unknown_escapes_verbatim() {
        assert_eq!(unescape("\\q"), "\\q");
    }

    #[test]
    fn rewrites_method_call_into_call_with_receiver_as_first_argument() {
        use crate::lexer::Lexer;
        use crate::parser::parse;

        let tokens = Lexer::new("func main() { x.toString(1); }").lex().unwrap();
        let cst = parse(tokens).unwrap();
        let program = build_program(cst).unwrap();
        let StmtKind::Program(items) = &program.kind else {
            panic!()
        };
        let StmtKind::FunctionDecl(decl) = &items[0].kind else {
            panic!()
        };
        let StmtKind::ExprStmt(expr) = &decl.body.statements[0].kind else {
            panic!()
        };
        let ExprKind::Call { callee, args } = &expr.kind else {
            panic!()
        };
        assert_eq!(callee, "toString");
        assert_eq!(args.len(), 2);
        assert!(matches!(args[0].kind, ExprKind::Var(ref n) if n == "x"));
    }

    #[test]
    fn rejects_higher_order_calls() {
        use crate::lexer::Lexer;
        use crate::parser::parse;

        let tokens = Lexer::new("func main() { (() => 1)(); }").lex().unwrap();
        let cst = parse(tokens).unwrap();
        let err = build_program(cst).unwrap_err();
        assert!(err.message.contains("higher-order"));
    }
}

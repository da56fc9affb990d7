//! Emits C# source text from a fully analyzed AST (spec.md §4.6). Called only
//! when the combined analyzer reported zero errors; calling it otherwise is a
//! contract violation the driver never performs.

use std::fmt::Write as _;

use crate::ast::{
    stmt::{Block, FunctionDecl},
    BinaryOp, Expr, ExprKind, LambdaBody, Primitive, Stmt, StmtKind, Type, UnaryOp,
};
use crate::errors::{InternalError, NO_POSITION};

pub type EmitResult<T> = Result<T, InternalError>;

const INDENT: &str = "    ";

/// Emits a complete `.cs` source file for `program`, an already-analyzed
/// `StmtKind::Program` root.
pub fn emit(program: &Stmt) -> EmitResult<String> {
    let StmtKind::Program(items) = &program.kind else {
        return Err(InternalError::new(
            NO_POSITION,
            "internal error: emit() expects a Program root",
        ));
    };

    let mut out = String::new();
    writeln!(out, "// Generated by gplc. Do not edit by hand.").unwrap();
    writeln!(out).unwrap();
    writeln!(out, "using System;").unwrap();
    writeln!(out).unwrap();
    writeln!(out, "internal static class Program").unwrap();
    writeln!(out, "{{").unwrap();

    emit_builtins(&mut out);

    let top_level_statements: Vec<&Stmt> = items
        .iter()
        .filter(|s| !matches!(s.kind, StmtKind::FunctionDecl(_)))
        .collect();
    if !top_level_statements.is_empty() {
        emit_static_constructor(&mut out, &top_level_statements)?;
    }

    let mut has_main = false;
    for item in items {
        if let StmtKind::FunctionDecl(decl) = &item.kind {
            if decl.name == "main" {
                has_main = true;
            }
            emit_function(&mut out, decl)?;
        }
    }

    if has_main {
        emit_entry_point(&mut out);
    }

    writeln!(out, "}}").unwrap();
    Ok(out)
}

fn emit_builtins(out: &mut String) {
    writeln!(out, "{INDENT}private static void println(string arg0)").unwrap();
    writeln!(out, "{INDENT}{{").unwrap();
    writeln!(out, "{INDENT}{INDENT}Console.WriteLine(arg0);").unwrap();
    writeln!(out, "{INDENT}}}").unwrap();
    writeln!(out).unwrap();

    writeln!(out, "{INDENT}private static string readLine()").unwrap();
    writeln!(out, "{INDENT}{{").unwrap();
    writeln!(out, "{INDENT}{INDENT}return Console.ReadLine() ?? \"\";").unwrap();
    writeln!(out, "{INDENT}}}").unwrap();
    writeln!(out).unwrap();

    writeln!(out, "{INDENT}private static string toString(int arg0)").unwrap();
    writeln!(out, "{INDENT}{{").unwrap();
    writeln!(out, "{INDENT}{INDENT}return arg0.ToString();").unwrap();
    writeln!(out, "{INDENT}}}").unwrap();
    writeln!(out).unwrap();
}

fn emit_static_constructor(out: &mut String, statements: &[&Stmt]) -> EmitResult<()> {
    writeln!(out, "{INDENT}static Program()").unwrap();
    writeln!(out, "{INDENT}{{").unwrap();
    for stmt in statements {
        emit_stmt(out, stmt, 2)?;
    }
    writeln!(out, "{INDENT}}}").unwrap();
    writeln!(out).unwrap();
    Ok(())
}

fn emit_function(out: &mut String, decl: &FunctionDecl) -> EmitResult<()> {
    let return_type = decl.return_type.clone().unwrap_or(Type::VOID);
    let params = decl
        .params
        .iter()
        .map(|p| format!("{} {}", csharp_type(&p.ty), p.name))
        .collect::<Vec<_>>()
        .join(", ");

    writeln!(
        out,
        "{INDENT}private static {} {}({params})",
        csharp_method_return_type(&return_type),
        decl.name
    )
    .unwrap();
    writeln!(out, "{INDENT}{{").unwrap();
    for stmt in &decl.body.statements {
        emit_stmt(out, stmt, 2)?;
    }
    writeln!(out, "{INDENT}}}").unwrap();
    writeln!(out).unwrap();
    Ok(())
}

fn emit_entry_point(out: &mut String) {
    writeln!(out, "{INDENT}public static void Main(string[] args)").unwrap();
    writeln!(out, "{INDENT}{{").unwrap();
    writeln!(out, "{INDENT}{INDENT}main();").unwrap();
    writeln!(out, "{INDENT}}}").unwrap();
}

fn indent(level: usize) -> String {
    INDENT.repeat(level)
}

fn emit_block(out: &mut String, block: &Block, level: usize) -> EmitResult<()> {
    writeln!(out, "{}{{", indent(level - 1)).unwrap();
    for stmt in &block.statements {
        emit_stmt(out, stmt, level)?;
    }
    writeln!(out, "{}}}", indent(level - 1)).unwrap();
    Ok(())
}

fn emit_stmt(out: &mut String, stmt: &Stmt, level: usize) -> EmitResult<()> {
    let pad = indent(level);
    match &stmt.kind {
        StmtKind::Program(_) => {
            return Err(InternalError::new(
                stmt.position,
                "internal error: nested Program node reached the emitter",
            ))
        }
        StmtKind::FunctionDecl(_) => {
            return Err(InternalError::new(
                stmt.position,
                "internal error: nested function declaration reached the emitter",
            ))
        }
        StmtKind::Block(block) => emit_block(out, block, level + 1)?,
        StmtKind::VarDecl {
            name,
            declared_type,
            initializer,
        } => {
            let (ty, value) = match (declared_type, initializer) {
                (Some(ty), Some(expr)) => (ty.clone(), emit_expr(expr)?),
                (Some(ty), None) => (ty.clone(), zero_value(ty)),
                (None, Some(expr)) => {
                    let ty = expr.resolved_type().ok_or_else(|| {
                        InternalError::new(
                            stmt.position,
                            "internal error: unanalyzed initializer reached the emitter",
                        )
                    })?;
                    let value = emit_expr(expr)?;
                    (ty, value)
                }
                (None, None) => {
                    return Err(InternalError::new(
                        stmt.position,
                        "internal error: untyped variable declaration reached the emitter",
                    ))
                }
            };
            writeln!(out, "{pad}{} {name} = {value};", csharp_type(&ty)).unwrap();
        }
        StmtKind::Assignment { target, value } => {
            writeln!(out, "{pad}{target} = {};", emit_expr(value)?).unwrap();
        }
        StmtKind::If {
            condition,
            then_block,
            else_block,
        } => {
            writeln!(out, "{pad}if ({})", emit_expr(condition)?).unwrap();
            emit_block(out, then_block, level + 1)?;
            if let Some(else_block) = else_block {
                writeln!(out, "{pad}else").unwrap();
                emit_block(out, else_block, level + 1)?;
            }
        }
        StmtKind::Return { value } => match value {
            Some(expr) => writeln!(out, "{pad}return {};", emit_expr(expr)?).unwrap(),
            None => writeln!(out, "{pad}return;").unwrap(),
        },
        StmtKind::Assert { condition, message } => {
            let text = message
                .as_deref()
                .map(csharp_string_literal)
                .unwrap_or_else(|| csharp_string_literal("assertion failed"));
            writeln!(out, "{pad}if (!({}))", emit_expr(condition)?).unwrap();
            writeln!(out, "{pad}{{").unwrap();
            writeln!(out, "{pad}{INDENT}throw new Exception({text});").unwrap();
            writeln!(out, "{pad}}}").unwrap();
        }
        StmtKind::ExprStmt(expr) => {
            writeln!(out, "{pad}{};", emit_expr(expr)?).unwrap();
        }
    }
    Ok(())
}

fn zero_value(ty: &Type) -> String {
    match ty {
        Type::Primitive(Primitive::Int) => "0".to_owned(),
        Type::Primitive(Primitive::String) => "\"\"".to_owned(),
        Type::Primitive(Primitive::Bool) => "false".to_owned(),
        Type::Primitive(Primitive::Void) => "null".to_owned(),
        Type::Function { .. } => "null".to_owned(),
    }
}

fn emit_expr(expr: &Expr) -> EmitResult<String> {
    match &expr.kind {
        ExprKind::Int(value) => Ok(value.to_string()),
        ExprKind::Str(value) => Ok(csharp_string_literal(value)),
        ExprKind::Bool(value) => Ok(value.to_string()),
        ExprKind::Var(name) => Ok(name.clone()),
        ExprKind::Lambda { params, body } => {
            let param_list = params
                .iter()
                .map(|p| format!("{} {}", csharp_type(&p.ty), p.name))
                .collect::<Vec<_>>()
                .join(", ");
            match body {
                LambdaBody::Expr(body_expr) => {
                    Ok(format!("(({param_list}) => {})", emit_expr(body_expr)?))
                }
                LambdaBody::Block(_) => Err(InternalError::new(
                    expr.position,
                    "block-bodied lambdas are not supported by the emitter",
                )),
            }
        }
        ExprKind::Call { callee, args } => {
            let args = args
                .iter()
                .map(emit_expr)
                .collect::<EmitResult<Vec<_>>>()?
                .join(", ");
            Ok(format!("{callee}({args})"))
        }
        ExprKind::Binary { op, left, right } => Ok(format!(
            "({} {} {})",
            emit_expr(left)?,
            csharp_binary_symbol(*op),
            emit_expr(right)?
        )),
        ExprKind::Unary { op, operand } => {
            let symbol = match op {
                UnaryOp::Negate => "-",
                UnaryOp::Not => "!",
            };
            Ok(format!("({symbol}{})", emit_expr(operand)?))
        }
    }
}

fn csharp_binary_symbol(op: BinaryOp) -> &'static str {
    match op {
        BinaryOp::Add => "+",
        BinaryOp::Subtract => "-",
        BinaryOp::Multiply => "*",
        BinaryOp::Divide => "/",
        BinaryOp::Modulo => "%",
        BinaryOp::Equal => "==",
        BinaryOp::NotEqual => "!=",
        BinaryOp::LessThan => "<",
        BinaryOp::GreaterThan => ">",
        BinaryOp::LessOrEqual => "<=",
        BinaryOp::GreaterOrEqual => ">=",
        BinaryOp::And => "&&",
        BinaryOp::Or => "||",
    }
}

fn csharp_type(ty: &Type) -> String {
    match ty {
        Type::Primitive(p) => csharp_primitive(*p).to_owned(),
        Type::Function { params, return_type } => csharp_delegate_type(params, return_type),
    }
}

fn csharp_primitive(p: Primitive) -> &'static str {
    match p {
        Primitive::Int => "int",
        Primitive::String => "string",
        Primitive::Bool => "bool",
        Primitive::Void => "void",
    }
}

fn csharp_delegate_type(params: &[Type], return_type: &Type) -> String {
    let mapped_params: Vec<String> = params.iter().map(csharp_type).collect();
    if return_type.is_void() {
        if mapped_params.is_empty() {
            "Action".to_owned()
        } else {
            format!("Action<{}>", mapped_params.join(", "))
        }
    } else {
        let mut all = mapped_params;
        all.push(csharp_type(return_type));
        format!("Func<{}>", all.join(", "))
    }
}

fn csharp_method_return_type(ty: &Type) -> String {
    if ty.is_void() {
        "void".to_owned()
    } else {
        csharp_type(ty)
    }
}

fn csharp_string_literal(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            other => out.push(other),
        }
    }
    out.push('"');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::analyze;
    use crate::ast::builder::build_program;
    use crate::lexer::Lexer;
    use crate::parser::parse;

    fn emit_src(src: &str) -> String {
        let tokens = Lexer::new(src).lex().unwrap();
        let cst = parse(tokens).unwrap();
        let program = build_program(cst).unwrap();
        let result = analyze(&program);
        assert!(result.is_ok(), "{result:?}");
        emit(&program).unwrap()
    }

    #[test]
    fn emits_hello_world() {
        let cs = emit_src(r#"func main() { println("Hello, World!"); }"#);
        assert!(cs.contains(r#"println("Hello, World!");"#));
        assert!(cs.contains("public static void Main(string[] args)"));
        assert!(cs.contains("main();"));
    }

    #[test]
    fn omits_entry_point_when_main_is_absent() {
        let cs = emit_src("func helper() { }");
        assert!(!cs.contains("Main(string[] args)"));
    }

    #[test]
    fn emits_empty_program_shell() {
        let cs = emit_src("");
        assert!(cs.contains("internal static class Program"));
        assert!(cs.contains("private static void println"));
    }

    #[test]
    fn emits_binary_expressions_fully_parenthesized() {
        let cs = emit_src("func main() { let x: Int = 1 + 2 * 3; }");
        assert!(cs.contains("(1 + (2 * 3))"));
    }

    #[test]
    fn emits_lambda_with_typed_params() {
        let cs = emit_src("func main() { let d = (x: Int, y: Int) => x + y; }");
        assert!(cs.contains("Func<int, int, int> d = ((int x, int y) => (x + y));"));
    }

    #[test]
    fn rejects_block_bodied_lambdas_at_emit_time() {
        let tokens = Lexer::new("func main() { let d = (x: Int) => { return x; }; }")
            .lex()
            .unwrap();
        let cst = parse(tokens).unwrap();
        let program = build_program(cst).unwrap();
        let result = analyze(&program);
        assert!(result.is_ok());
        let err = emit(&program).unwrap_err();
        assert!(err.message.contains("block-bodied"));
    }

    #[test]
    fn emits_assert_as_explicit_throw() {
        let cs = emit_src(r#"func main() { assert(1 == 1, "must hold"); }"#);
        assert!(cs.contains("if (!((1 == 1)))"));
        assert!(cs.contains(r#"throw new Exception("must hold");"#));
    }

    #[test]
    fn maps_void_function_type_to_action() {
        let cs = emit_src("func apply(f: Func<Int, Void>, x: Int) { f(x); }");
        assert!(cs.contains("private static void apply(Action<int> f, int x)"));
    }
}

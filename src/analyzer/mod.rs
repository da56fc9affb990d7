//! The combined analyzer: a single traversal of the AST performing both name
//! resolution and type checking/inference, accumulating two separate error
//! lists (spec.md §4.5, §9).

use crate::ast::{
    stmt::{Block, FunctionDecl, Param},
    BinaryOp, Expr, ExprKind, LambdaBody, Stmt, StmtKind, Type, UnaryOp,
};
use crate::errors::{Position, SemanticError, TypeError};
use crate::symbols::{new_symbol_table, FunctionSymbol, ScopeKind, ScopeStack, Symbol, VariableSymbol};

#[derive(Debug, Default)]
pub struct AnalysisResult {
    pub semantic_errors: Vec<SemanticError>,
    pub type_errors: Vec<TypeError>,
}

impl AnalysisResult {
    pub fn is_ok(&self) -> bool {
        self.semantic_errors.is_empty() && self.type_errors.is_empty()
    }
}

/// What a `return` statement is currently checked or inferred against.
enum ReturnContext {
    /// Inside a function with a declared return type: every `return` must
    /// match it exactly.
    Function(Type),
    /// Inside a lambda block body: no declared type exists, so the first
    /// `return` encountered determines the lambda's inferred return type
    /// (spec.md §4.5 "Lambdas"); later returns are not re-checked against it.
    Lambda(Option<Type>),
}

struct Analyzer {
    scope: ScopeStack,
    return_stack: Vec<ReturnContext>,
    semantic_errors: Vec<SemanticError>,
    type_errors: Vec<TypeError>,
}

pub fn analyze(program: &Stmt) -> AnalysisResult {
    let mut analyzer = Analyzer {
        scope: new_symbol_table(),
        return_stack: Vec::new(),
        semantic_errors: Vec::new(),
        type_errors: Vec::new(),
    };
    let StmtKind::Program(items) = &program.kind else {
        panic!("internal error: analyze() expects a Program root");
    };
    for item in items {
        analyzer.analyze_stmt(item);
    }
    AnalysisResult {
        semantic_errors: analyzer.semantic_errors,
        type_errors: analyzer.type_errors,
    }
}

impl Analyzer {
    fn analyze_stmt(&mut self, stmt: &Stmt) {
        match &stmt.kind {
            StmtKind::Program(_) => {
                unreachable!("internal error: nested Program node")
            }
            StmtKind::FunctionDecl(decl) => self.analyze_function_decl(decl, stmt.position),
            StmtKind::Block(block) => self.analyze_block(block),
            StmtKind::VarDecl {
                name,
                declared_type,
                initializer,
            } => self.analyze_var_decl(name, declared_type.as_ref(), initializer.as_ref(), stmt.position),
            StmtKind::Assignment { target, value } => {
                self.analyze_assignment(target, value, stmt.position)
            }
            StmtKind::If {
                condition,
                then_block,
                else_block,
            } => self.analyze_if(condition, then_block, else_block.as_ref()),
            StmtKind::Return { value } => self.analyze_return(value.as_ref(), stmt.position),
            StmtKind::Assert { condition, .. } => self.analyze_assert(condition),
            StmtKind::ExprStmt(expr) => {
                self.analyze_expr(expr);
            }
        }
    }

    fn analyze_function_decl(&mut self, decl: &FunctionDecl, position: Position) {
        if self.scope.is_defined_locally(&decl.name) {
            self.semantic_errors.push(SemanticError::new(
                position,
                format!("Function '{}' is already defined", decl.name),
            ));
            return;
        }

        let param_types: Vec<Type> = decl.params.iter().map(|p| p.ty.clone()).collect();
        let return_type = decl.return_type.clone().unwrap_or(Type::VOID);
        let fn_type = Type::function(param_types, return_type.clone());

        self.scope
            .define(Symbol::Function(FunctionSymbol {
                name: decl.name.clone(),
                ty: fn_type,
                params: decl
                    .params
                    .iter()
                    .map(|p| (p.name.clone(), p.ty.clone()))
                    .collect(),
                declared_at: position,
                defined: true,
            }))
            .expect("checked is_defined_locally above");

        self.scope.enter_scope(ScopeKind::Function);
        self.define_params(&decl.params);
        self.return_stack.push(ReturnContext::Function(return_type.clone()));

        self.analyze_block_statements(&decl.body);

        self.return_stack.pop();
        self.scope.exit_scope();

        if !return_type.is_void() && !block_definitely_returns(&decl.body) {
            self.type_errors.push(TypeError::new(
                position,
                format!(
                    "Function '{}' must return a value of type {}",
                    decl.name, return_type
                ),
            ));
        }
    }

    fn define_params(&mut self, params: &[Param]) {
        for param in params {
            let result = self.scope.define(Symbol::Variable(VariableSymbol {
                name: param.name.clone(),
                ty: param.ty.clone(),
                declared_at: param.position,
                initialized: true,
                used: false,
            }));
            if result.is_err() {
                self.semantic_errors.push(SemanticError::new(
                    param.position,
                    format!("Parameter '{}' is already defined", param.name),
                ));
            }
        }
    }

    /// Pushes a `Block` scope and analyzes `block`'s statements, per spec.md
    /// §4.5's note that block scopes are pushed even when entered from an
    /// already-pushed Function/Lambda scope.
    fn analyze_block(&mut self, block: &Block) {
        self.scope.enter_scope(ScopeKind::Block);
        self.analyze_block_statements(block);
        self.scope.exit_scope();
    }

    fn analyze_block_statements(&mut self, block: &Block) {
        for stmt in &block.statements {
            self.analyze_stmt(stmt);
        }
    }

    fn analyze_var_decl(
        &mut self,
        name: &str,
        declared_type: Option<&Type>,
        initializer: Option<&Expr>,
        position: Position,
    ) {
        let inferred_type = initializer.map(|e| self.analyze_expr(e));

        let recorded_type = match (declared_type, &inferred_type) {
            (Some(declared), Some(inferred)) => {
                if declared != inferred {
                    self.type_errors.push(TypeError::new(
                        position,
                        format!(
                            "Cannot initialize variable '{name}' of type {declared} with value of type {inferred}"
                        ),
                    ));
                }
                Some(declared.clone())
            }
            (Some(declared), None) => Some(declared.clone()),
            (None, Some(inferred)) => Some(inferred.clone()),
            (None, None) => {
                self.semantic_errors.push(SemanticError::new(
                    position,
                    format!("Variable '{name}' must have a type annotation or initializer"),
                ));
                None
            }
        };

        let Some(ty) = recorded_type else {
            return;
        };

        let result = self.scope.define(Symbol::Variable(VariableSymbol {
            name: name.to_owned(),
            ty,
            declared_at: position,
            initialized: initializer.is_some(),
            used: false,
        }));
        if result.is_err() {
            self.semantic_errors.push(SemanticError::new(
                position,
                format!("Variable '{name}' is already defined"),
            ));
        }
    }

    fn analyze_assignment(&mut self, target: &str, value: &Expr, position: Position) {
        let value_type = self.analyze_expr(value);

        match self.scope.resolve(target) {
            None => {
                self.semantic_errors.push(SemanticError::new(
                    position,
                    format!("'{target}' is not defined"),
                ));
                return;
            }
            Some(Symbol::Function(_)) => {
                self.semantic_errors.push(SemanticError::new(
                    position,
                    format!("'{target}' is not a variable"),
                ));
                return;
            }
            Some(Symbol::Variable(var)) => {
                if var.ty != value_type {
                    self.type_errors.push(TypeError::new(
                        position,
                        format!(
                            "Cannot assign value of type {value_type} to variable '{target}' of type {}",
                            var.ty
                        ),
                    ));
                }
            }
        }

        if let Some(Symbol::Variable(var)) = self.scope.resolve_mut(target) {
            var.initialized = true;
        }
    }

    fn analyze_if(&mut self, condition: &Expr, then_block: &Block, else_block: Option<&Block>) {
        let condition_type = self.analyze_expr(condition);
        if condition_type != Type::BOOL {
            self.type_errors.push(TypeError::new(
                condition.position,
                format!("condition must have type Bool, found {condition_type}"),
            ));
        }
        self.analyze_block(then_block);
        if let Some(else_block) = else_block {
            self.analyze_block(else_block);
        }
    }

    fn analyze_return(&mut self, value: Option<&Expr>, position: Position) {
        let value_type = match value {
            Some(expr) => self.analyze_expr(expr),
            None => Type::VOID,
        };

        match self.return_stack.last_mut() {
            None => {
                self.type_errors.push(TypeError::new(
                    position,
                    "'return' used outside of a function".to_owned(),
                ));
            }
            Some(ReturnContext::Function(declared)) => {
                if *declared != value_type {
                    self.type_errors.push(TypeError::new(
                        position,
                        format!(
                            "Cannot return value of type {value_type}, expected {declared}"
                        ),
                    ));
                }
            }
            Some(ReturnContext::Lambda(slot)) => {
                if slot.is_none() {
                    *slot = Some(value_type);
                }
            }
        }
    }

    fn analyze_assert(&mut self, condition: &Expr) {
        let condition_type = self.analyze_expr(condition);
        if condition_type != Type::BOOL {
            self.type_errors.push(TypeError::new(
                condition.position,
                format!("condition must have type Bool, found {condition_type}"),
            ));
        }
    }

    fn analyze_expr(&mut self, expr: &Expr) -> Type {
        let ty = match &expr.kind {
            ExprKind::Int(_) => Type::INT,
            ExprKind::Str(_) => Type::STRING,
            ExprKind::Bool(_) => Type::BOOL,
            ExprKind::Var(name) => self.analyze_identifier(name, expr.position),
            ExprKind::Lambda { params, body } => self.analyze_lambda(params, body),
            ExprKind::Call { callee, args } => self.analyze_call(callee, args, expr.position),
            ExprKind::Binary { op, left, right } => self.analyze_binary(*op, left, right),
            ExprKind::Unary { op, operand } => self.analyze_unary(*op, operand),
        };
        expr.set_resolved_type(ty.clone());
        ty
    }

    fn analyze_identifier(&mut self, name: &str, position: Position) -> Type {
        let Some(symbol) = self.scope.resolve(name) else {
            self.semantic_errors
                .push(SemanticError::new(position, format!("'{name}' is not defined")));
            return Type::VOID;
        };
        let ty = symbol.ty().clone();

        if let Symbol::Variable(var) = symbol {
            if !var.initialized {
                self.semantic_errors.push(SemanticError::new(
                    position,
                    format!("Variable '{name}' may not be initialized"),
                ));
            }
        }

        if let Some(Symbol::Variable(var)) = self.scope.resolve_mut(name) {
            var.used = true;
        }

        ty
    }

    fn analyze_lambda(&mut self, params: &[Param], body: &LambdaBody) -> Type {
        self.scope.enter_scope(ScopeKind::Lambda);
        self.define_params(params);

        let return_type = match body {
            LambdaBody::Expr(expr) => self.analyze_expr(expr),
            LambdaBody::Block(block) => {
                self.return_stack.push(ReturnContext::Lambda(None));
                self.analyze_block(block);
                match self.return_stack.pop() {
                    Some(ReturnContext::Lambda(inferred)) => inferred.unwrap_or(Type::VOID),
                    _ => unreachable!("internal error: return context stack corrupted"),
                }
            }
        };

        self.scope.exit_scope();

        let param_types = params.iter().map(|p| p.ty.clone()).collect();
        Type::function(param_types, return_type)
    }

    fn analyze_call(&mut self, callee: &str, args: &[Expr], position: Position) -> Type {
        let arg_types: Vec<Type> = args.iter().map(|a| self.analyze_expr(a)).collect();

        let fn_type = match self.scope.resolve(callee) {
            Some(Symbol::Function(f)) => Some(f.ty.clone()),
            Some(Symbol::Variable(v)) if matches!(v.ty, Type::Function { .. }) => {
                Some(v.ty.clone())
            }
            _ => None,
        };

        let Some(Type::Function { params, return_type }) = fn_type else {
            self.semantic_errors.push(SemanticError::new(
                position,
                format!("'{callee}' is not a function"),
            ));
            return Type::VOID;
        };

        if params.len() != arg_types.len() {
            self.type_errors.push(TypeError::new(
                position,
                format!(
                    "Function '{callee}' expects {} argument(s) but got {}",
                    params.len(),
                    arg_types.len()
                ),
            ));
        }

        for (i, (expected, actual)) in params.iter().zip(arg_types.iter()).enumerate() {
            if expected != actual {
                self.type_errors.push(TypeError::new(
                    position,
                    format!(
                        "Argument {} to '{callee}' has type {actual} but expected {expected}",
                        i + 1
                    ),
                ));
            }
        }

        *return_type
    }

    fn analyze_binary(&mut self, op: BinaryOp, left: &Expr, right: &Expr) -> Type {
        let left_ty = self.analyze_expr(left);
        let right_ty = self.analyze_expr(right);
        let position = left.position;

        match op {
            BinaryOp::Add => {
                if left_ty == Type::INT && right_ty == Type::INT {
                    Type::INT
                } else if left_ty == Type::STRING || right_ty == Type::STRING {
                    Type::STRING
                } else {
                    self.binary_type_error("+", left_ty, right_ty, position);
                    Type::VOID
                }
            }
            BinaryOp::Subtract | BinaryOp::Multiply | BinaryOp::Divide | BinaryOp::Modulo => {
                if left_ty == Type::INT && right_ty == Type::INT {
                    Type::INT
                } else {
                    self.binary_type_error(symbol_of(op), left_ty, right_ty, position);
                    Type::VOID
                }
            }
            BinaryOp::LessThan
            | BinaryOp::GreaterThan
            | BinaryOp::LessOrEqual
            | BinaryOp::GreaterOrEqual => {
                if left_ty == Type::INT && right_ty == Type::INT {
                    Type::BOOL
                } else {
                    self.binary_type_error(symbol_of(op), left_ty, right_ty, position);
                    Type::VOID
                }
            }
            BinaryOp::Equal | BinaryOp::NotEqual => {
                if left_ty == right_ty {
                    Type::BOOL
                } else {
                    self.binary_type_error(symbol_of(op), left_ty, right_ty, position);
                    Type::VOID
                }
            }
            BinaryOp::And | BinaryOp::Or => {
                if left_ty == Type::BOOL && right_ty == Type::BOOL {
                    Type::BOOL
                } else {
                    self.binary_type_error(symbol_of(op), left_ty, right_ty, position);
                    Type::VOID
                }
            }
        }
    }

    fn binary_type_error(&mut self, op: &str, left: Type, right: Type, position: Position) {
        self.type_errors.push(TypeError::new(
            position,
            format!("operator '{op}' cannot be applied to operands of type {left} and {right}"),
        ));
    }

    fn analyze_unary(&mut self, op: UnaryOp, operand: &Expr) -> Type {
        let operand_ty = self.analyze_expr(operand);
        match op {
            UnaryOp::Negate => {
                if operand_ty == Type::INT {
                    Type::INT
                } else {
                    self.type_errors.push(TypeError::new(
                        operand.position,
                        format!("operator '-' cannot be applied to an operand of type {operand_ty}"),
                    ));
                    Type::VOID
                }
            }
            UnaryOp::Not => {
                if operand_ty == Type::BOOL {
                    Type::BOOL
                } else {
                    self.type_errors.push(TypeError::new(
                        operand.position,
                        format!("operator '!' cannot be applied to an operand of type {operand_ty}"),
                    ));
                    Type::VOID
                }
            }
        }
    }
}

fn symbol_of(op: BinaryOp) -> &'static str {
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

/// A block definitely returns if any statement in it definitely returns; a
/// `return` statement definitely returns; an `if` definitely returns iff it
/// has an else branch and both branches definitely return. Every other
/// statement kind does not (spec.md §4.5), including a bare nested block.
fn block_definitely_returns(block: &Block) -> bool {
    block.statements.iter().any(stmt_definitely_returns)
}

fn stmt_definitely_returns(stmt: &Stmt) -> bool {
    match &stmt.kind {
        StmtKind::Return { .. } => true,
        StmtKind::If {
            then_block,
            else_block: Some(else_block),
            ..
        } => block_definitely_returns(then_block) && block_definitely_returns(else_block),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::builder::build_program;
    use crate::lexer::Lexer;
    use crate::parser::parse;

    fn analyze_src(src: &str) -> AnalysisResult {
        let tokens = Lexer::new(src).lex().unwrap();
        let cst = parse(tokens).unwrap();
        let program = build_program(cst).unwrap();
        analyze(&program)
    }

    #[test]
    fn accepts_hello_world() {
        let result = analyze_src(r#"func main() { println("Hello, World!"); }"#);
        assert!(result.is_ok(), "{result:?}");
    }

    #[test]
    fn infers_lambda_type_from_params_and_body() {
        let result =
            analyze_src("func main() { let d = (x: Int, y: Int) => x + y; println(toString(d(7, 3))); }");
        assert!(result.is_ok(), "{result:?}");
    }

    #[test]
    fn reports_duplicate_function_definition_once() {
        let result = analyze_src("func f() { } func f() { }");
        assert_eq!(result.semantic_errors.len(), 1);
        assert!(result.semantic_errors[0].message.contains("already defined"));
    }

    #[test]
    fn reports_missing_return_in_non_void_function() {
        let result = analyze_src("func getValue(c: Bool) -> Int { if (c) { return 5; } }");
        assert_eq!(result.type_errors.len(), 1);
        assert!(result.type_errors[0]
            .message
            .contains("Function 'getValue' must return a value of type Int"));
    }

    #[test]
    fn reports_initializer_type_mismatch() {
        let result = analyze_src(r#"func main() { let x: Int = "hello"; }"#);
        assert_eq!(result.type_errors.len(), 1);
        assert!(result.type_errors[0]
            .message
            .contains("Cannot initialize variable 'x' of type Int with value of type String"));
    }

    #[test]
    fn reports_use_before_initialization() {
        let result = analyze_src("func main() { let x: Int; println(toString(x)); }");
        assert!(result
            .semantic_errors
            .iter()
            .any(|e| e.message.contains("may not be initialized")));
    }

    #[test]
    fn shadowing_does_not_leak_across_blocks() {
        let result = analyze_src(
            "func main() { let x: Int = 1; { let x: String = \"a\"; } let y: Int = x; }",
        );
        assert!(result.is_ok(), "{result:?}");
    }

    #[test]
    fn rejects_argument_count_mismatch() {
        let result = analyze_src("func add(x: Int, y: Int) -> Int { return x + y; } func main() { add(1); }");
        assert!(result.type_errors.iter().any(|e| e.message.contains("expects 2")));
    }

    #[test]
    fn string_equality_is_allowed_but_ordering_is_not() {
        let ok = analyze_src(r#"func main() { let b: Bool = "a" == "b"; }"#);
        assert!(ok.is_ok(), "{ok:?}");
        let bad = analyze_src(r#"func main() { let b: Bool = "a" < "b"; }"#);
        assert!(!bad.type_errors.is_empty());
    }
}

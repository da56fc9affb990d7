//! Pipeline-level tests asserting against emitted C# text and collected
//! diagnostics (spec.md §8's literal end-to-end scenarios). Invoking a C#
//! toolchain is out of scope, so these stop at "the emitted source is
//! correct", not "the emitted source runs".

use gplc::analyzer::analyze;
use gplc::ast::builder::build_program;
use gplc::emitter::emit;
use gplc::errors::CompileError;
use gplc::lexer::Lexer;
use gplc::parser::parse;

/// Runs the full compile pipeline and returns either the emitted C# text or
/// the formatted diagnostics that would have gone to standard error.
fn compile(src: &str) -> Result<String, Vec<String>> {
    let tokens = Lexer::new(src)
        .lex()
        .map_err(|e| vec![CompileError::from(e).to_string()])?;
    let cst = parse(tokens).map_err(|e| vec![CompileError::from(e).to_string()])?;
    let program = build_program(cst).map_err(|e| vec![CompileError::from(e).to_string()])?;

    let analysis = analyze(&program);
    if !analysis.is_ok() {
        let messages = analysis
            .semantic_errors
            .into_iter()
            .map(|e| CompileError::from(e).to_string())
            .chain(
                analysis
                    .type_errors
                    .into_iter()
                    .map(|e| CompileError::from(e).to_string()),
            )
            .collect();
        return Err(messages);
    }

    emit(&program).map_err(|e| vec![CompileError::from(e).to_string()])
}

#[test]
fn scenario_1_hello_world() {
    let cs = compile(r#"func main() { println("Hello, World!"); }"#).unwrap();
    assert!(cs.contains(r#"println("Hello, World!");"#));
    assert!(cs.contains("main();"));
}

#[test]
fn scenario_2_function_call() {
    let cs = compile(
        "func add(x: Int, y: Int) -> Int { return x + y; }\n\
         func main() { println(toString(add(15, 25))); }",
    )
    .unwrap();
    assert!(cs.contains("private static int add(int x, int y)"));
    assert!(cs.contains("return (x + y);"));
    assert!(cs.contains("println(toString(add(15, 25)));"));
}

#[test]
fn scenario_3_lambda() {
    let cs = compile(
        "func main() {\n\
           let d = (x: Int, y: Int) => x + y;\n\
           println(toString(d(7, 3)));\n\
         }",
    )
    .unwrap();
    assert!(cs.contains("Func<int, int, int> d = ((int x, int y) => (x + y));"));
    assert!(cs.contains("println(toString(d(7, 3)));"));
}

#[test]
fn scenario_4_if_else() {
    let cs = compile(
        "func main() {\n\
           if (10 > 5) { println(\"yes\"); } else { println(\"no\"); }\n\
         }",
    )
    .unwrap();
    assert!(cs.contains("if ((10 > 5))"));
    assert!(cs.contains(r#"println("yes");"#));
    assert!(cs.contains(r#"println("no");"#));
}

#[test]
fn scenario_5_initializer_type_mismatch_is_a_type_error() {
    let errors = compile(
        "func main() {\n\
           let x: Int = \"hello\";\n\
         }",
    )
    .unwrap_err();
    assert!(errors.iter().any(|e| e.contains("Type error")
        && e.contains("Cannot initialize variable 'x' of type Int with value of type String")));
}

#[test]
fn scenario_6_missing_return_is_a_type_error() {
    let errors = compile(
        "func getValue(c: Bool) -> Int {\n\
           if (c) { return 5; }\n\
         }",
    )
    .unwrap_err();
    assert!(errors.iter().any(|e| e.contains("Type error")
        && e.contains("Function 'getValue' must return a value of type Int")));
}

#[test]
fn empty_source_produces_shell_with_no_user_functions() {
    let cs = compile("").unwrap();
    assert!(cs.contains("internal static class Program"));
    assert!(cs.contains("private static void println"));
    assert!(!cs.contains("Main(string[] args)"));
}

#[test]
fn main_less_program_has_no_entry_point_shim() {
    let cs = compile("func helper() { }").unwrap();
    assert!(!cs.contains("Main(string[] args)"));
}

#[test]
fn shadowing_does_not_leak_out_of_its_block() {
    let cs = compile(
        "func main() {\n\
           let x: Int = 1;\n\
           { let x: String = \"inner\"; }\n\
           println(toString(x));\n\
         }",
    )
    .unwrap();
    assert!(cs.contains("int x = 1;"));
    assert!(cs.contains("string x = \"inner\";"));
}

#[test]
fn integer_overflow_is_reported_as_a_syntax_error() {
    let errors = compile("func main() { let x: Int = 99999999999; }").unwrap_err();
    assert!(errors.iter().any(|e| e.contains("Syntax error")));
}

#[test]
fn compiling_twice_is_deterministic() {
    let src = "func add(x: Int, y: Int) -> Int { return x + y; }\n\
               func main() { println(toString(add(1, 2))); }";
    assert_eq!(compile(src).unwrap(), compile(src).unwrap());
}

#[test]
fn redefining_a_function_reports_exactly_one_semantic_error() {
    let errors = compile("func f() { } func f() { }").unwrap_err();
    assert_eq!(errors.len(), 1);
    assert!(errors[0].contains("Semantic error"));
    assert!(errors[0].contains("Function 'f' is already defined"));
}

#[test]
fn higher_order_calls_are_rejected() {
    let errors = compile("func main() { (() => 1)(); }").unwrap_err();
    assert!(errors.iter().any(|e| e.contains("higher-order")));
}

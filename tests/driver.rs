//! Driver-level tests: CLI plumbing, output path defaulting, and the
//! "never produce a partial output file" contract (spec.md §4.7, §7).

use std::fs;
use std::path::PathBuf;

use gplc::cli::CompileArgs;
use gplc::driver;

fn temp_path(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("gplc-driver-test-{}-{name}", std::process::id()))
}

#[test]
fn writes_output_next_to_input_by_default() {
    let input = temp_path("default-output.gpl");
    fs::write(&input, r#"func main() { println("hi"); }"#).unwrap();

    let exit_code = driver::run(&CompileArgs {
        input: input.clone(),
        output: None,
        verbose: false,
    });

    let expected_output = input.with_extension("cs");
    assert_eq!(exit_code, 0);
    assert!(expected_output.exists());
    assert!(fs::read_to_string(&expected_output).unwrap().contains("println"));

    fs::remove_file(&input).unwrap();
    fs::remove_file(&expected_output).unwrap();
}

#[test]
fn honors_explicit_output_path() {
    let input = temp_path("explicit-input.gpl");
    let output = temp_path("explicit-output.cs");
    fs::write(&input, "func main() { }").unwrap();

    let exit_code = driver::run(&CompileArgs {
        input: input.clone(),
        output: Some(output.clone()),
        verbose: false,
    });

    assert_eq!(exit_code, 0);
    assert!(output.exists());

    fs::remove_file(&input).unwrap();
    fs::remove_file(&output).unwrap();
}

#[test]
fn writes_no_output_file_on_compile_error() {
    let input = temp_path("bad-input.gpl");
    let output = temp_path("bad-output.cs");
    fs::write(&input, "func main() { let x: Int = \"oops\"; }").unwrap();

    let exit_code = driver::run(&CompileArgs {
        input: input.clone(),
        output: Some(output.clone()),
        verbose: false,
    });

    assert_eq!(exit_code, 1);
    assert!(!output.exists());

    fs::remove_file(&input).unwrap();
}

#[test]
fn missing_input_file_is_a_clean_failure() {
    let exit_code = driver::run(&CompileArgs {
        input: temp_path("does-not-exist.gpl"),
        output: None,
        verbose: false,
    });
    assert_eq!(exit_code, 1);
}

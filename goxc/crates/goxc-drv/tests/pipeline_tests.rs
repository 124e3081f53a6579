//! Full-pipeline integration tests through the library API.
//!
//! Each test compiles GoxLang source and executes the module with a
//! captured writer, checking observable output.

use goxc_drv::{compile, run, CompileError};
use goxc_ir::Instr;

/// Compiles and runs a program, returning its stdout.
fn output_of(source: &str) -> String {
    let module = compile(source).expect("program must compile");
    let mut out = Vec::new();
    run(&module, &mut out).expect("program must run");
    String::from_utf8(out).expect("valid utf-8 output")
}

#[test]
fn test_arithmetic_precedence_scenario() {
    assert_eq!(output_of("print 2+3*4-5;"), "9\n");
}

#[test]
fn test_mutable_variable_scenario() {
    assert_eq!(output_of("var x int = 0; x = 1; x = x+2; print x;"), "3\n");
}

#[test]
fn test_recursive_fibonacci_scenario() {
    let source =
        "func f(n int) int { if n<2 { return n; } else {} return f(n-1)+f(n-2); } print f(7);";
    assert_eq!(output_of(source), "13\n");
}

#[test]
fn test_while_scenario() {
    assert_eq!(
        output_of("var i int = 0; while i<3 { print i; i = i+1; }"),
        "0\n1\n2\n"
    );
}

#[test]
fn test_char_scenario() {
    assert_eq!(output_of("print 'A';"), "A");
}

#[test]
fn test_const_write_diagnostic_scenario() {
    let err = compile("const c int = 1; c = 2;").unwrap_err();
    let CompileError::Semantic(diags) = err else {
        panic!("expected a semantic failure");
    };
    assert!(
        diags.iter().any(|d| d.message.contains("const")),
        "diagnostics: {:?}",
        diags
    );
}

#[test]
fn test_forward_reference_passes_and_runs() {
    assert_eq!(
        output_of("print twice(4); func twice(n int) int { return n + n; }"),
        "8\n"
    );
}

#[test]
fn test_larger_program() {
    // exercises globals, loops, calls, casts, and chars together
    let source = "
        var count int = 0;

        func is_even(n int) bool {
            return n - n / 2 * 2 == 0;
        }

        func half(x float) float {
            return x / 2.0;
        }

        var i int = 0;
        while i < 6 {
            if is_even(i) {
                count = count + 1;
            } else {}
            i = i + 1;
        }
        print count;
        print half(float(count));
        print char(64 + count);
    ";
    assert_eq!(output_of(source), "3\n1.5\nC");
}

#[test]
fn test_every_compiled_function_is_well_formed() {
    let source = "
        var limit int = 4;
        import func host_put(c char) int { }
        func classify(n int) int {
            if n < 0 { return 0 - 1; } else {
                if n == 0 { return 0; } else { return 1; }
            }
        }
        var i int = 0;
        while i < limit {
            print classify(i - 2);
            i = i + 1;
        }
    ";
    let module = compile(source).expect("program must compile");

    for func in module.functions.values() {
        if func.imported {
            assert!(func.code.is_empty());
            continue;
        }

        let mut if_depth = 0i32;
        let mut loop_depth = 0i32;
        let mut if_count = 0;
        let mut else_count = 0;
        let mut endif_count = 0;
        let mut loop_count = 0;
        let mut endloop_count = 0;
        for instr in &func.code {
            match instr {
                Instr::If => {
                    if_depth += 1;
                    if_count += 1;
                }
                Instr::Else => {
                    assert!(if_depth > 0, "{}: ELSE outside IF", func.name);
                    else_count += 1;
                }
                Instr::EndIf => {
                    if_depth -= 1;
                    assert!(if_depth >= 0, "{}: unbalanced ENDIF", func.name);
                    endif_count += 1;
                }
                Instr::Loop => {
                    loop_depth += 1;
                    loop_count += 1;
                }
                Instr::EndLoop => {
                    loop_depth -= 1;
                    assert!(loop_depth >= 0, "{}: unbalanced ENDLOOP", func.name);
                    endloop_count += 1;
                }
                _ => {}
            }
        }
        assert_eq!(if_depth, 0, "{}: unclosed IF", func.name);
        assert_eq!(loop_depth, 0, "{}: unclosed LOOP", func.name);
        assert_eq!(if_count, else_count, "{}: IF/ELSE mismatch", func.name);
        assert_eq!(if_count, endif_count, "{}: IF/ENDIF mismatch", func.name);
        assert_eq!(loop_count, endloop_count, "{}: LOOP/ENDLOOP mismatch", func.name);
        assert_eq!(
            func.code.last(),
            Some(&Instr::Ret),
            "{}: does not end with RET",
            func.name
        );
    }
}

#[test]
fn test_reference_evaluation_property() {
    // side-effect-free integer expressions agree with host evaluation
    let cases: &[(&str, i64)] = &[
        ("1+2*3", 1 + 2 * 3),
        ("(1+2)*3", (1 + 2) * 3),
        ("100/7", 100 / 7),
        ("10-4-3", 10 - 4 - 3),
        ("2*3+4*5", 2 * 3 + 4 * 5),
        ("-(4+5)", -(4 + 5)),
        ("7/2*2", 7 / 2 * 2),
    ];
    for (expr, expected) in cases {
        assert_eq!(
            output_of(&format!("print {};", expr)),
            format!("{}\n", expected),
            "expression {}",
            expr
        );
    }
}

#[test]
fn test_module_dump_is_printable() {
    let module = compile("var x int = 1; print x;").expect("program must compile");
    let dump = module.to_string();
    assert!(dump.contains("global x: I"), "dump: {}", dump);
    assert!(dump.contains("func main() -> I"), "dump: {}", dump);
    assert!(dump.contains("GLOBAL_SET x"), "dump: {}", dump);
    assert!(dump.contains("RET"), "dump: {}", dump);
}

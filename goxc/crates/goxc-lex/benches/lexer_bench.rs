//! Lexer throughput benchmark.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use goxc_lex::Lexer;
use goxc_util::Handler;

fn sample_program() -> String {
    let mut source = String::new();
    source.push_str("var total int = 0;\n");
    for i in 0..200 {
        source.push_str(&format!(
            "func f{i}(n int) int {{\n    var x int = n * 2 + {i};\n    while x > 0 {{\n        x = x - 1;\n    }}\n    return x;\n}}\n"
        ));
    }
    source.push_str("print total;\n");
    source
}

fn bench_tokenize(c: &mut Criterion) {
    let source = sample_program();
    c.bench_function("tokenize_200_functions", |b| {
        b.iter(|| {
            let handler = Handler::new();
            let tokens = Lexer::new(black_box(&source), &handler).tokenize();
            black_box(tokens)
        })
    });
}

criterion_group!(benches, bench_tokenize);
criterion_main!(benches);

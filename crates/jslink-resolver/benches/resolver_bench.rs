//! Resolver Benchmark
//!
//! Measures scope construction plus temporary name resolution over generated
//! programs of varying shape.

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use jslink_ast::ast::{Block, Expr, Function, Statement};
use jslink_ast::names::NameArena;
use jslink_resolver::resolve_temporary_names;

/// One flat scope containing `count` colliding temporaries.
fn wide_program(names: &mut NameArena, count: usize) -> Vec<Statement> {
    (0..count)
        .map(|_| {
            let tmp = names.declare_temporary("tmp");
            Statement::var(tmp, Some(Expr::number("0")))
        })
        .collect()
}

/// `depth` nested functions, each declaring a couple of temporaries and
/// referencing an outer stable name.
fn deep_program(names: &mut NameArena, depth: usize) -> Vec<Statement> {
    let shared = names.declare("shared");
    let mut body = vec![Expr::name_ref(shared).make_stmt()];
    for _ in 0..depth {
        let a = names.declare_temporary("tmp");
        let b = names.declare_temporary("shared");
        body = vec![
            Statement::var(a, None),
            Statement::var(b, None),
            Expr::Function(Function {
                name: None,
                parameters: vec![],
                body: Block::new(body),
            })
            .make_stmt(),
        ];
    }
    let mut stmts = vec![Statement::var(shared, None)];
    stmts.extend(body);
    stmts
}

fn bench_resolve_wide(c: &mut Criterion) {
    let mut group = c.benchmark_group("resolve_wide");
    for count in [100, 1000] {
        group.bench_with_input(BenchmarkId::from_parameter(count), &count, |b, &count| {
            b.iter(|| {
                let mut names = NameArena::new();
                let mut stmts = wide_program(&mut names, count);
                resolve_temporary_names(black_box(&mut stmts), &mut names);
                stmts
            });
        });
    }
    group.finish();
}

fn bench_resolve_deep(c: &mut Criterion) {
    let mut group = c.benchmark_group("resolve_deep");
    for depth in [10, 100] {
        group.bench_with_input(BenchmarkId::from_parameter(depth), &depth, |b, &depth| {
            b.iter(|| {
                let mut names = NameArena::new();
                let mut stmts = deep_program(&mut names, depth);
                resolve_temporary_names(black_box(&mut stmts), &mut names);
                stmts
            });
        });
    }
    group.finish();
}

criterion_group!(benches, bench_resolve_wide, bench_resolve_deep);
criterion_main!(benches);

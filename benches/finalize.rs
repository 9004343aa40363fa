//! Benchmark for the full optimization pipeline.
//!
//! Builds a synthetic method with a chain of diamonds feeding a doubly
//! nested loop, then times `finalize` end to end. Construction happens
//! inside the iteration because the pipeline mutates the graph in place.

use criterion::{criterion_group, criterion_main, Criterion, Throughput};
use std::hint::black_box;

use typeflow::prelude::*;

const DIAMONDS: usize = 32;

fn build_method(symbols: &mut SymbolTable) -> Cfg {
    let x = LocalVariable::new(symbols.intern("x", NameKind::Source));
    let i = LocalVariable::new(symbols.intern("i", NameKind::Source));
    let c = LocalVariable::new(symbols.intern("c", NameKind::Source));
    let m = symbols.intern("m", NameKind::Source);

    let mut cfg = Cfg::new();
    let mut prev = cfg.entry();
    cfg.block_mut(prev).unwrap().bindings =
        vec![Binding::new(i, Instruction::IntLit(0))];

    // A chain of diamonds, each with a temporary copy chain in one arm.
    for d in 0..DIAMONDS {
        let left = cfg.fresh_block(0);
        let right = cfg.fresh_block(0);
        let join = cfg.fresh_block(0);
        cfg.set_exit(prev, Some(c), left, right).unwrap();
        cfg.set_exit(left, None, join, join).unwrap();
        cfg.set_exit(right, None, join, join).unwrap();
        let t1 = LocalVariable::new(
            symbols.intern(&format!("<t>{d}a"), NameKind::Temporary),
        );
        let t2 = LocalVariable::new(
            symbols.intern(&format!("<t>{d}b"), NameKind::Temporary),
        );
        cfg.block_mut(left).unwrap().bindings = vec![
            Binding::new(t1, Instruction::Ident(x)),
            Binding::new(t2, Instruction::Ident(t1)),
            Binding::new(
                i,
                Instruction::Send {
                    recv: t2,
                    name: m,
                    args: vec![],
                },
            ),
        ];
        cfg.block_mut(right).unwrap().bindings = vec![Binding::new(
            c,
            Instruction::Send {
                recv: i,
                name: m,
                args: vec![],
            },
        )];
        prev = join;
    }

    // A doubly nested loop after the chain.
    let outer = cfg.fresh_block(1);
    let inner = cfg.fresh_block(2);
    let body = cfg.fresh_block(2);
    let tail = cfg.fresh_block(1);
    let done = cfg.fresh_block(0);
    cfg.set_exit(prev, None, outer, outer).unwrap();
    cfg.set_exit(outer, Some(c), inner, done).unwrap();
    cfg.set_exit(inner, Some(c), body, tail).unwrap();
    cfg.set_exit(body, None, inner, inner).unwrap();
    cfg.set_exit(tail, None, outer, outer).unwrap();
    cfg.set_exit(done, None, cfg.dead_block(), cfg.dead_block())
        .unwrap();
    for id in [outer, inner, body, tail, done] {
        cfg.block_mut(id).unwrap().bindings = vec![Binding::new(
            i,
            Instruction::Send {
                recv: i,
                name: m,
                args: vec![],
            },
        )];
    }
    cfg.block_mut(outer).unwrap().bindings.push(Binding::new(
        c,
        Instruction::Send {
            recv: i,
            name: m,
            args: vec![],
        },
    ));
    cfg
}

fn bench_finalize(criterion: &mut Criterion) {
    let mut group = criterion.benchmark_group("pipeline");
    group.throughput(Throughput::Elements(DIAMONDS as u64));
    group.bench_function("finalize", |bencher| {
        bencher.iter(|| {
            let mut symbols = SymbolTable::new();
            let mut cfg = build_method(&mut symbols);
            let ctx = Context::new(&symbols);
            let rnw = finalize(ctx, &mut cfg, &NullMetrics);
            black_box((cfg.block_count(), rnw))
        });
    });
    group.finish();
}

criterion_group!(benches, bench_finalize);
criterion_main!(benches);

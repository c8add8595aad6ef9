// Copyright 2026 Johann Kempter
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//
// SPDX-License-Identifier: Apache-2.0

use criterion::{criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion};
use relift::prelude::*;

/// A chain of `n` counting loops where each loop's phi destination feeds the
/// next loop's initial value, so every header needs a repair copy.
fn chained_loops(n: usize) -> ProcedureUnit {
    let mut proc = Procedure::new("chained");
    let entry = proc.add_block();
    let headers: Vec<BlockId> = (0..n).map(|_| proc.add_block()).collect();
    let latches: Vec<BlockId> = (0..n).map(|_| proc.add_block()).collect();
    let exit = proc.add_block();

    let x0 = proc.identifiers_mut().define("x", Storage::StackSlot(-8));
    proc.append(entry, Instruction::Assign { dst: x0, src: Expression::Const(0) })
        .unwrap();
    proc.append(entry, Instruction::Jump { target: headers[0] })
        .unwrap();

    let mut edges = vec![(entry, headers[0])];
    let mut incoming = x0;
    let mut prev_block = entry;
    for k in 0..n {
        let header = headers[k];
        let latch = latches[k];
        let phi_dst = proc.identifiers_mut().define_version("x", Storage::StackSlot(-8));
        let inc = proc.identifiers_mut().define_version("x", Storage::StackSlot(-8));
        proc.append(
            header,
            Instruction::Assign {
                dst: phi_dst,
                src: Expression::Phi(vec![
                    PhiOperand { value: incoming, predecessor: prev_block },
                    PhiOperand { value: inc, predecessor: latch },
                ]),
            },
        )
        .unwrap();
        proc.append(
            header,
            Instruction::Assign {
                dst: inc,
                src: Expression::Binary {
                    op: BinOp::Add,
                    left: Operand::Id(phi_dst),
                    right: Operand::Const(1),
                },
            },
        )
        .unwrap();
        proc.append(
            header,
            Instruction::Branch {
                condition: Expression::Binary {
                    op: BinOp::Lt,
                    left: Operand::Id(inc),
                    right: Operand::Const(10),
                },
                target: latch,
            },
        )
        .unwrap();
        proc.append(latch, Instruction::Jump { target: header }).unwrap();

        let next = if k + 1 < n { headers[k + 1] } else { exit };
        edges.push((header, latch));
        edges.push((header, next));
        edges.push((latch, header));
        incoming = phi_dst;
        prev_block = header;
    }
    proc.append(exit, Instruction::Return { value: Some(Operand::Id(incoming)) })
        .unwrap();

    let mut cfg = Cfg::new(proc.block_count(), entry);
    for (from, to) in edges {
        cfg.add_edge(from, to);
    }
    ProcedureUnit::new(proc, cfg)
}

fn bench_transform(c: &mut Criterion) {
    let mut group = c.benchmark_group("transform");
    for &size in &[4usize, 16, 64] {
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, &size| {
            b.iter_batched(
                || chained_loops(size),
                |mut unit| unit.transform().unwrap(),
                BatchSize::SmallInput,
            );
        });
    }
    group.finish();
}

fn bench_liveness(c: &mut Criterion) {
    let unit = chained_loops(64);
    let header = BlockId::new(1);
    let phi_dst = unit.procedure.identifiers().find_by_name("x_1").unwrap();
    c.bench_function("liveness_query", |b| {
        b.iter(|| {
            let liveness = Liveness::new(&unit.procedure, &unit.cfg);
            liveness.is_live_at(phi_dst, header, 2).unwrap()
        });
    });
}

criterion_group!(benches, bench_transform, bench_liveness);
criterion_main!(benches);

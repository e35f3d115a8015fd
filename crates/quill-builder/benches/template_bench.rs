//! Benchmarks for template replay
//!
//! Run with: cargo bench -p quill-builder

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use quill_builder::{
    CircuitBox, Command, Controlled, Signature, TemplateFactory, circuit_from_commands,
};
use quill_ir::{Circuit, Operand, Qubit};

fn ladder_commands(qubits: &[Qubit]) -> Vec<Command> {
    qubits
        .windows(2)
        .filter_map(|pair| Command::cx(pair[1], pair[0]).ok())
        .chain(qubits.iter().map(|&q| Command::rz("theta", q)))
        .collect()
}

fn ladder_factory(width: usize) -> TemplateFactory {
    let sig = (0..width).fold(Signature::new(), |sig, i| sig.qubit(format!("q{i}")));
    TemplateFactory::circuit_box("ladder", sig, |args| Ok(ladder_commands(&args.qubits())))
        .expect("ladder factory")
}

/// Compare replaying a captured box with boxing from scratch
fn bench_box_replay(c: &mut Criterion) {
    let mut group = c.benchmark_group("box_replay");

    for width in &[2_usize, 5, 10, 20] {
        let factory = ladder_factory(*width);
        let operands: Vec<Operand> = (0..*width).map(|_| Qubit::new().into()).collect();
        group.bench_with_input(BenchmarkId::new("template", width), width, |b, _| {
            b.iter(|| factory.call(black_box(&operands)).unwrap());
        });

        let qubits: Vec<Qubit> = (0..*width).map(|_| Qubit::new()).collect();
        group.bench_with_input(BenchmarkId::new("direct", width), width, |b, _| {
            b.iter(|| {
                let circuit = circuit_from_commands("ladder", &ladder_commands(black_box(&qubits)))
                    .unwrap();
                CircuitBox::from_circuit(&circuit).unwrap()
            });
        });
    }

    group.finish();
}

/// Benchmark substitution of a controlled command
fn bench_controlled_call(c: &mut Criterion) {
    let sig: Signature = "t: qubit, c1: qubit, c2: qubit".parse().unwrap();
    let factory = TemplateFactory::command("ccrz", sig, |args| {
        let inner = Command::crz(0.25, args.qubit("t")?, args.qubit("c1")?)?;
        Ok(Controlled::new(inner, [args.qubit("c2")?])?.into())
    })
    .unwrap();
    let operands: Vec<Operand> = (0..3).map(|_| Qubit::new().into()).collect();

    c.bench_function("controlled_call", |b| {
        b.iter(|| factory.call(black_box(&operands)).unwrap());
    });
}

/// Benchmark appending replayed boxes
fn bench_append(c: &mut Criterion) {
    let factory = ladder_factory(5);
    c.bench_function("append_box", |b| {
        let mut circuit = Circuit::new("bench");
        let q = circuit.add_qreg("q", 5);
        let operands: Vec<Operand> = q.qubits().iter().map(|&q| q.into()).collect();
        b.iter(|| {
            factory
                .call(black_box(&operands))
                .unwrap()
                .append_to(&mut circuit)
                .unwrap();
        });
    });
}

criterion_group!(
    benches,
    bench_box_replay,
    bench_controlled_call,
    bench_append
);
criterion_main!(benches);

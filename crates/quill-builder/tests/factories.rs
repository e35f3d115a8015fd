//! End-to-end tests: factories, boxes and appending into circuits.

use std::cell::Cell;
use std::sync::Arc;

use quill_builder::{
    Command, CommandError, CommandTemplate, Conditional, Controlled, Signature, TemplateFactory,
    TwoQubitGate, circuit_from_commands,
};
use quill_ir::{Angle, Bit, Circuit, OpType, Operand, Operation, Qubit};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn bell_factory() -> TemplateFactory {
    let sig = Signature::new().qubit("a").qubit("b").qubit("c");
    TemplateFactory::circuit_box("ghz", sig, |args| {
        let (a, b, c) = (args.qubit("a")?, args.qubit("b")?, args.qubit("c")?);
        Ok(vec![
            Command::rz(Angle::pi(), a),
            Command::cx(b, a)?,
            Command::cx(c, b)?,
        ])
    })
    .unwrap()
}

fn payload_of(command: &Command) -> &Arc<Circuit> {
    match command {
        Command::Box(b) => b.payload(),
        other => panic!("expected a box, got {other}"),
    }
}

#[test]
fn box_payload_is_binding_independent() {
    init_tracing();
    let factory = bell_factory();
    let [a, b, c, x, y, z]: [Qubit; 6] = std::array::from_fn(|_| Qubit::new());

    let first = factory.call(&[a.into(), b.into(), c.into()]).unwrap();
    let second = factory.call(&[x.into(), y.into(), z.into()]).unwrap();

    assert_eq!(first.qubits(), vec![a, b, c]);
    assert_eq!(second.qubits(), vec![x, y, z]);
    assert!(Arc::ptr_eq(payload_of(&first), payload_of(&second)));
    assert_eq!(
        serde_json::to_string(payload_of(&first).as_ref()).unwrap(),
        serde_json::to_string(payload_of(&second).as_ref()).unwrap()
    );
    assert_eq!(
        payload_of(&first).qubits(),
        &[Qubit::canonical(0), Qubit::canonical(1), Qubit::canonical(2)]
    );
}

#[test]
fn builder_runs_once_across_calls() {
    let runs = Cell::new(0_u32);
    let sig: Signature = "t: qubit, c: qubit".parse().unwrap();
    let factory = TemplateFactory::circuit_box("crz_box", sig, |args| {
        runs.set(runs.get() + 1);
        Ok([Command::crz("phi", args.qubit("t")?, args.qubit("c")?)?])
    })
    .unwrap();

    let mut circuit = Circuit::new("main");
    let q = circuit.add_qreg("q", 4);
    for pair in [(0, 1), (1, 2), (2, 3), (3, 0)] {
        factory
            .call(&[q[pair.0].into(), q[pair.1].into()])
            .unwrap()
            .append_to(&mut circuit)
            .unwrap();
    }
    assert_eq!(runs.get(), 1);
    assert_eq!(circuit.num_ops(), 4);
}

#[test]
fn nested_boxes() {
    let inner = bell_factory();
    let sig = Signature::new()
        .qubit("q0")
        .qubit("q1")
        .qubit("q2")
        .qubit("q3")
        .bit("m");
    let outer = TemplateFactory::circuit_box("outer", sig, |args| {
        let qs = args.qubits();
        let m = args.bit("m")?;
        Ok(vec![
            inner.call(&[qs[0].into(), qs[1].into(), qs[2].into()])?,
            inner.call(&[qs[3].into(), qs[2].into(), qs[1].into()])?,
            Conditional::threshold(Command::rz(0.5, qs[3]), [m], 1)?.into(),
        ])
    })
    .unwrap();

    let mut circuit = Circuit::new("main");
    let q = circuit.add_qreg("q", 4);
    let c = circuit.add_creg("c", 1);
    let cmd = outer
        .call(&[q[3].into(), q[2].into(), q[1].into(), q[0].into(), c[0].into()])
        .unwrap();
    cmd.append_to(&mut circuit).unwrap();

    assert_eq!(circuit.num_ops(), 1);
    let instruction = circuit.instructions().next().unwrap();
    assert_eq!(instruction.qubits, vec![q[3], q[2], q[1], q[0]]);
    assert_eq!(instruction.bits, vec![c[0]]);

    let Operation::CircBox(handle) = &instruction.operation else {
        panic!("expected a circuit box");
    };
    let payload = handle.circuit();
    assert_eq!(payload.num_ops(), 3);
    let types: Vec<OpType> = payload
        .instructions()
        .map(|inst| inst.operation.op_type())
        .collect();
    assert_eq!(types, vec![OpType::CircBox, OpType::CircBox, OpType::Rz]);
    let canonical: Vec<Qubit> = (0..4).map(Qubit::canonical).collect();
    assert_eq!(payload.qubits(), canonical.as_slice());
    assert_eq!(payload.bits(), &[Bit::canonical(0)]);
}

#[test]
fn controlled_template_scenario() {
    let [p0, p1, p2, a, b, c]: [Qubit; 6] = std::array::from_fn(|_| Qubit::new());
    let angle = Angle::symbol("alpha");
    let command = Controlled::new(Command::rz(angle.clone(), p0), [p1, p2]).unwrap();
    let template = CommandTemplate::new(command.into(), [p0, p1, p2], []).unwrap();

    let applied = template.apply_to(&[a, b, c], &[]).unwrap();
    let expected: Command = Controlled::new(Command::rz(angle, a), [b, c]).unwrap().into();
    assert_eq!(applied, expected);
}

#[test]
fn two_qubit_gate_scenario() {
    let [q0, q1, q5]: [Qubit; 3] = std::array::from_fn(|_| Qubit::new());
    let gate = Command::from(TwoQubitGate::cx(q1, q0).unwrap());
    let map = [(q0, q5)].into_iter().collect();
    assert_eq!(
        gate.sub(&map, &Default::default()).unwrap(),
        Command::from(TwoQubitGate::cx(q1, q5).unwrap())
    );
}

fn reads(ones: &[Bit]) -> impl FnMut(Bit) -> bool + '_ {
    move |bit| ones.contains(&bit)
}

#[test]
fn threshold_scenario() {
    let q = Qubit::new();
    let [c0, c1, c2, c5]: [Bit; 4] = std::array::from_fn(|_| Bit::new());
    let cond = Conditional::threshold(Command::rz(1.0, q), [c0, c1, c2], 3).unwrap();

    assert_eq!(cond.executes_under(reads(&[c0, c1])), Some(true));
    assert_eq!(cond.executes_under(reads(&[c0, c1, c2])), Some(false));
    assert_eq!(cond.executes_under(reads(&[c1, c2])), Some(false));

    let cmd = Command::from(cond);
    let map = [(c0, c5)].into_iter().collect();
    let renamed = cmd.sub(&Default::default(), &map).unwrap();
    assert_eq!(renamed.bits(), vec![c5, c1, c2]);
    assert_eq!(renamed.qubits(), vec![q]);
}

#[test]
fn unregistered_threshold_bits_are_named() {
    let q = Qubit::new();
    let [c0, c1, c2]: [Bit; 3] = std::array::from_fn(|_| Bit::new());
    let mut circuit = Circuit::new("main");
    circuit.add_qubit(q);
    circuit.add_bit(c1);

    let cmd: Command = Conditional::threshold(Command::rz(1.0, q), [c0, c1, c2], 5)
        .unwrap()
        .into();
    match cmd.append_to(&mut circuit) {
        Err(CommandError::OperandNotFound { missing }) => {
            assert_eq!(missing, vec![Operand::Bit(c0), Operand::Bit(c2)]);
        }
        other => panic!("unexpected result: {other:?}"),
    }
    assert_eq!(circuit.num_ops(), 0);
}

#[test]
fn assembled_circuit_serializes() {
    let factory = bell_factory();
    let [a, b, c]: [Qubit; 3] = std::array::from_fn(|_| Qubit::new());
    let m = Bit::new();
    let commands = vec![
        factory.call(&[a.into(), b.into(), c.into()]).unwrap(),
        Conditional::expression(Command::rz("theta", a), !m).unwrap().into(),
    ];

    let circuit = circuit_from_commands("main", &commands).unwrap();
    let json = serde_json::to_value(&circuit).unwrap();
    assert_eq!(json["name"], "main");
    assert_eq!(circuit.num_ops(), 2);
    assert_eq!(circuit.bits(), &[m]);
}

#[test]
fn values_are_thread_safe() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<Command>();
    assert_send_sync::<CommandTemplate>();
    assert_send_sync::<TemplateFactory>();

    let factory = Arc::new(bell_factory());
    let handles: Vec<_> = (0..4)
        .map(|_| {
            let factory = Arc::clone(&factory);
            std::thread::spawn(move || {
                let qubits: Vec<Operand> = (0..3).map(|_| Qubit::new().into()).collect();
                factory.call(&qubits).map(|cmd| cmd.qubits().len())
            })
        })
        .collect();
    for handle in handles {
        assert_eq!(handle.join().unwrap().unwrap(), 3);
    }
}

//! Boxed sub-circuits with a canonical, binding-independent payload.

use rustc_hash::FxHashMap;
use std::sync::Arc;
use tracing::debug;

use quill_ir::{Bit, CircBox, Circuit, IrError, Qubit};

use crate::command::{BitMap, QubitMap, ensure_distinct, sub_bit, sub_qubit};
use crate::error::{CommandError, CommandResult};
use crate::native::NativeCell;

fn canonical_index(i: usize) -> CommandResult<u32> {
    u32::try_from(i).map_err(|_| {
        CommandError::Ir(IrError::InvalidOperation(format!(
            "box has more than {} units",
            u32::MAX
        )))
    })
}

/// A sub-circuit used as a single command.
///
/// The payload is stored with canonical units: the i-th registered qubit of the source
/// circuit becomes [`Qubit::canonical(i)`](Qubit::canonical), and likewise for bits.
/// The external operand lists say which real units the canonical ones stand for, so
/// external position `i` always binds canonical operand `i`. Substitution rewrites the
/// external lists only; the payload is shared between every rebinding.
#[derive(Debug, Clone, PartialEq)]
pub struct CircuitBox {
    payload: Arc<Circuit>,
    qubits: Vec<Qubit>,
    bits: Vec<Bit>,
    native: NativeCell<CircBox>,
}

impl CircuitBox {
    /// Box a circuit, binding the payload to the circuit's own units.
    pub fn from_circuit(circuit: &Circuit) -> CommandResult<Self> {
        let qubit_map: FxHashMap<Qubit, Qubit> = circuit
            .qubits()
            .iter()
            .enumerate()
            .map(|(i, &q)| Ok((q, Qubit::canonical(canonical_index(i)?))))
            .collect::<CommandResult<_>>()?;
        let bit_map: FxHashMap<Bit, Bit> = circuit
            .bits()
            .iter()
            .enumerate()
            .map(|(i, &b)| Ok((b, Bit::canonical(canonical_index(i)?))))
            .collect::<CommandResult<_>>()?;

        let payload = circuit.rename_units(&qubit_map, &bit_map)?;
        debug!(
            circuit = circuit.name(),
            qubits = payload.num_qubits(),
            bits = payload.num_bits(),
            ops = payload.num_ops(),
            "canonicalized box payload"
        );
        Ok(Self {
            payload: Arc::new(payload),
            qubits: circuit.qubits().to_vec(),
            bits: circuit.bits().to_vec(),
            native: NativeCell::new(),
        })
    }

    /// Bind an existing canonical payload to external operands.
    pub fn with_operands(
        payload: Arc<Circuit>,
        qubits: impl IntoIterator<Item = Qubit>,
        bits: impl IntoIterator<Item = Bit>,
    ) -> CommandResult<Self> {
        Self::checked(
            payload,
            qubits.into_iter().collect(),
            bits.into_iter().collect(),
            NativeCell::new(),
        )
    }

    /// Bind the payload of an already built native box to external operands.
    pub(crate) fn with_handle(
        handle: Arc<CircBox>,
        qubits: Vec<Qubit>,
        bits: Vec<Bit>,
    ) -> CommandResult<Self> {
        Self::checked(
            Arc::clone(handle.circuit()),
            qubits,
            bits,
            NativeCell::from(handle),
        )
    }

    fn checked(
        payload: Arc<Circuit>,
        qubits: Vec<Qubit>,
        bits: Vec<Bit>,
        native: NativeCell<CircBox>,
    ) -> CommandResult<Self> {
        if qubits.len() != payload.num_qubits() {
            return Err(CommandError::ArityMismatch {
                what: "box qubits",
                expected: payload.num_qubits(),
                got: qubits.len(),
            });
        }
        if bits.len() != payload.num_bits() {
            return Err(CommandError::ArityMismatch {
                what: "box bits",
                expected: payload.num_bits(),
                got: bits.len(),
            });
        }
        ensure_distinct(qubits.iter().copied(), "a box")?;
        ensure_distinct(bits.iter().copied(), "a box")?;
        Ok(Self {
            payload,
            qubits,
            bits,
            native,
        })
    }

    /// Get the canonical payload.
    pub fn payload(&self) -> &Arc<Circuit> {
        &self.payload
    }

    /// Get the external qubits.
    pub fn qubits(&self) -> &[Qubit] {
        &self.qubits
    }

    /// Get the external bits.
    pub fn bits(&self) -> &[Bit] {
        &self.bits
    }

    /// Get the native box handle, building it on first use.
    pub fn native_handle(&self) -> Arc<CircBox> {
        self.native
            .get_or_init(|| CircBox::new(Arc::clone(&self.payload)))
    }

    pub(crate) fn sub(&self, qubit_map: &QubitMap, bit_map: &BitMap) -> CommandResult<Self> {
        Self::checked(
            Arc::clone(&self.payload),
            self.qubits.iter().map(|&q| sub_qubit(q, qubit_map)).collect(),
            self.bits.iter().map(|&b| sub_bit(b, bit_map)).collect(),
            self.native.clone(),
        )
    }
}

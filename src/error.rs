/*!

  Errors raised while building, verifying, or analyzing a circuit.

*/

/// The error type for circuit construction and analysis.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// Both endpoint lists of a wiring call hold several positions, but not the same amount.
    #[error("unmatched amount of inputs ({inputs}) and outputs ({outputs})")]
    ArityMismatch {
        /// Length of the input position list
        inputs: usize,
        /// Length of the output position list
        outputs: usize,
    },
    /// The requested address width can not be synthesized.
    #[error("address width {0} is outside of 1..={}", crate::synth::MAX_ADDRESS_WIDTH)]
    AddressWidth(usize),
    /// A gate drives a slot that does not exist in its circuit.
    #[error("gate {slot} drives slot {target}, but the circuit only has {len} gates")]
    DanglingConnection {
        /// The driving slot
        slot: usize,
        /// The missing target slot
        target: usize,
        /// The number of gates in the circuit
        len: usize,
    },
    /// The wiring of the circuit forms a loop.
    #[error("cycle detected in the circuit")]
    Cycle,
}

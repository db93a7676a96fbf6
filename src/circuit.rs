/*!

  API for a circuit of gates laid out on a 3D grid.

*/

use crate::{
    attribute::Color,
    error::Error,
    gate::{Gate, Operation, Position},
};
use std::collections::HashMap;
use tracing::{debug, trace};

/// An ordered collection of gates together with a spatial index of where they sit.
///
/// Gates are addressed by their slot, the order in which they were placed.
/// The slot doubles as the identifier used by gate connections.
#[derive(Debug, Clone, Default)]
pub struct Circuit {
    /// The gates, indexed by slot
    gates: Vec<Gate>,
    /// Maps a coordinate to the slot of the gate placed there
    index: HashMap<Position, usize>,
}

impl Circuit {
    /// Creates an empty circuit
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` if a gate was placed at `position`
    pub fn occupied(&self, position: Position) -> bool {
        self.index.contains_key(&position)
    }

    /// Returns the slot of the gate at `position`, if there is one
    pub fn slot_at(&self, position: Position) -> Option<usize> {
        self.index.get(&position).copied()
    }

    /// Returns the gate at `position`, if there is one
    pub fn gate_at(&self, position: Position) -> Option<&Gate> {
        self.slot_at(position).map(|slot| &self.gates[slot])
    }

    /// Returns the gate at `slot`
    pub fn get(&self, slot: usize) -> Option<&Gate> {
        self.gates.get(slot)
    }

    /// Returns the number of gates in the circuit
    pub fn len(&self) -> usize {
        self.gates.len()
    }

    /// Returns `true` if no gate was placed yet
    pub fn is_empty(&self) -> bool {
        self.gates.is_empty()
    }

    /// Returns the slot the next placed gate will get
    pub fn next_slot(&self) -> usize {
        self.gates.len()
    }

    /// Appends `gate` and registers its position under the next slot, which is returned.
    ///
    /// Positions are not checked for collisions. Placing a second gate at an occupied
    /// position shadows the first one in the spatial index: lookups resolve to the newest
    /// gate, while the older one stays in the circuit (and in its export) but can no longer
    /// be found or wired by position.
    pub fn place(&mut self, gate: Gate) -> usize {
        let slot = self.next_slot();
        let position = gate.get_position();
        if let Some(shadowed) = self.index.insert(position, slot) {
            debug!(%position, shadowed, slot, "gate position reused");
        }
        self.gates.push(gate);
        slot
    }

    /// Places a new unconnected gate at `position` and returns its slot
    pub fn insert_gate(
        &mut self,
        position: Position,
        operation: impl Into<Operation>,
        color: Color,
    ) -> usize {
        self.place(Gate::new(position, operation, color))
    }

    /// Connects the gate at `source` to the gate at `target`.
    /// Returns `false` and leaves the circuit untouched if either position is unoccupied.
    fn connect(&mut self, source: Position, target: Position) -> bool {
        match (self.slot_at(source), self.slot_at(target)) {
            (Some(s), Some(t)) => {
                self.gates[s].connect_to(t);
                true
            }
            _ => {
                trace!(%source, %target, "skipping connection to an unoccupied position");
                false
            }
        }
    }

    /// Wires the gates at `inputs` to the gates at `outputs`, returning how many connections were made.
    ///
    /// The pattern depends on the lengths of the two lists:
    /// - equal lengths connect `inputs[i]` to `outputs[i]` pairwise,
    /// - a single input fans out to every output,
    /// - a single output is fanned into from every input.
    ///
    /// Pairs with an unoccupied endpoint are skipped silently. A fan-out from an unoccupied
    /// input or a fan-in to an unoccupied output does nothing.
    ///
    /// # Errors
    ///
    /// Returns [Error::ArityMismatch] for any other combination of lengths, without wiring anything.
    pub fn wire(&mut self, inputs: &[Position], outputs: &[Position]) -> Result<usize, Error> {
        let made = if inputs.len() == outputs.len() {
            inputs
                .iter()
                .zip(outputs)
                .filter(|(i, o)| self.connect(**i, **o))
                .count()
        } else if let [input] = inputs {
            if !self.occupied(*input) {
                return Ok(0);
            }
            outputs.iter().filter(|o| self.connect(*input, **o)).count()
        } else if let [output] = outputs {
            if !self.occupied(*output) {
                return Ok(0);
            }
            inputs.iter().filter(|i| self.connect(**i, *output)).count()
        } else {
            return Err(Error::ArityMismatch {
                inputs: inputs.len(),
                outputs: outputs.len(),
            });
        };

        trace!(
            inputs = inputs.len(),
            outputs = outputs.len(),
            made,
            "wired gates"
        );
        Ok(made)
    }

    /// Returns the per-gate records in slot order.
    /// The index of a record in the returned list is the slot its connections refer to.
    pub fn export(&self) -> Vec<GateRecord> {
        self.gates.iter().map(GateRecord::from).collect()
    }

    /// Checks that every connection targets a gate of this circuit
    pub fn verify(&self) -> Result<(), Error> {
        let len = self.len();
        match self.connections().find(|c| c.target() >= len) {
            Some(c) => Err(Error::DanglingConnection {
                slot: c.source(),
                target: c.target(),
                len,
            }),
            None => Ok(()),
        }
    }
}

/// A gate as handed to an export target: color, operation, driven slots, and position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GateRecord {
    /// Cosmetic color
    pub color: Color,
    /// Logic function
    pub operation: Operation,
    /// Slots driven by the gate
    pub outputs: Vec<usize>,
    /// Grid position
    pub position: Position,
}

impl From<&Gate> for GateRecord {
    fn from(gate: &Gate) -> Self {
        Self {
            color: gate.get_color().clone(),
            operation: gate.get_operation(),
            outputs: gate.get_outputs().to_vec(),
            position: gate.get_position(),
        }
    }
}

/// A directed connection from one slot to another
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Connection {
    source: usize,
    target: usize,
}

impl Connection {
    /// Creates a connection from `source` to `target`
    pub fn new(source: usize, target: usize) -> Self {
        Self { source, target }
    }

    /// Returns the driving slot
    pub fn source(&self) -> usize {
        self.source
    }

    /// Returns the driven slot
    pub fn target(&self) -> usize {
        self.target
    }
}

impl std::fmt::Display for Connection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} -> {}", self.source, self.target)
    }
}

/// Iterators over a circuit
pub mod iter {
    use super::{Circuit, Connection};

    /// An iterator over the connections of a circuit, in slot order then wiring order
    pub struct ConnectionIterator<'a> {
        circuit: &'a Circuit,
        index: usize,
        subindex: usize,
    }

    impl<'a> ConnectionIterator<'a> {
        /// Create a new connection iterator for the circuit
        pub fn new(circuit: &'a Circuit) -> Self {
            Self {
                circuit,
                index: 0,
                subindex: 0,
            }
        }
    }

    impl Iterator for ConnectionIterator<'_> {
        type Item = Connection;

        fn next(&mut self) -> Option<Self::Item> {
            while let Some(gate) = self.circuit.get(self.index) {
                if let Some(target) = gate.get_outputs().get(self.subindex) {
                    self.subindex += 1;
                    return Some(Connection::new(self.index, *target));
                }
                self.subindex = 0;
                self.index += 1;
            }
            None
        }
    }
}

impl Circuit {
    /// Returns an iterator over the gates in slot order
    pub fn gates(&self) -> impl Iterator<Item = &Gate> {
        self.gates.iter()
    }

    /// Returns an iterator over every connection in the circuit
    pub fn connections(&self) -> iter::ConnectionIterator<'_> {
        iter::ConnectionIterator::new(self)
    }

    /// Returns an iterator over the slots of the gates matching `filter`
    pub fn matches<F>(&self, filter: F) -> impl Iterator<Item = usize>
    where
        F: Fn(&Gate) -> bool,
    {
        self.gates
            .iter()
            .enumerate()
            .filter(move |(_, g)| filter(g))
            .map(|(slot, _)| slot)
    }
}

impl<'a> IntoIterator for &'a Circuit {
    type Item = &'a Gate;
    type IntoIter = std::slice::Iter<'a, Gate>;

    fn into_iter(self) -> Self::IntoIter {
        self.gates.iter()
    }
}

impl std::fmt::Display for Circuit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (slot, gate) in self.gates.iter().enumerate() {
            let targets = gate
                .get_outputs()
                .iter()
                .map(|t| t.to_string())
                .collect::<Vec<_>>()
                .join(", ");
            writeln!(
                f,
                "{slot}: {} @ {} -> [{targets}]",
                gate.get_operation(),
                gate.get_position()
            )?;
        }
        Ok(())
    }
}

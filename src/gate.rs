/*!

  Logic gates placed on the grid of a circuit.

*/

use crate::attribute::Color;

/// A 3D grid coordinate. Every gate in a circuit sits at one position.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(::serde::Serialize, ::serde::Deserialize))]
pub struct Position {
    /// Column
    pub x: i32,
    /// Row
    pub y: i32,
    /// Layer
    pub z: i32,
}

impl Position {
    /// Creates a new position
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    /// Returns the position on the `z = 0` plane at column `x` and row `y`
    pub const fn planar(x: i32, y: i32) -> Self {
        Self::new(x, y, 0)
    }
}

impl From<(i32, i32, i32)> for Position {
    fn from((x, y, z): (i32, i32, i32)) -> Self {
        Self::new(x, y, z)
    }
}

impl From<Position> for (i32, i32, i32) {
    fn from(value: Position) -> Self {
        (value.x, value.y, value.z)
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}

/// The logic function computed by a gate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Operation {
    /// All inputs high
    #[default]
    And,
    /// Any input high
    Or,
    /// An odd number of inputs high
    Xor,
    /// Not all inputs high
    Nand,
    /// No input high
    Nor,
    /// An even number of inputs high
    Xnor,
}

impl Operation {
    /// Every operation, ordered by code
    pub const ALL: [Operation; 6] = [
        Operation::And,
        Operation::Or,
        Operation::Xor,
        Operation::Nand,
        Operation::Nor,
        Operation::Xnor,
    ];

    /// Looks up an operation by name, ignoring case.
    /// Names that are not recognized fold to [Operation::And].
    pub fn from_name(name: &str) -> Self {
        match name.to_ascii_lowercase().as_str() {
            "or" => Operation::Or,
            "xor" => Operation::Xor,
            "nand" => Operation::Nand,
            "nor" => Operation::Nor,
            "xnor" => Operation::Xnor,
            _ => Operation::And,
        }
    }

    /// Returns the lowercase name of the operation
    pub fn name(&self) -> &'static str {
        match self {
            Operation::And => "and",
            Operation::Or => "or",
            Operation::Xor => "xor",
            Operation::Nand => "nand",
            Operation::Nor => "nor",
            Operation::Xnor => "xnor",
        }
    }

    /// Returns the numeric mode used by the blueprint format
    pub fn code(&self) -> u8 {
        match self {
            Operation::And => 0,
            Operation::Or => 1,
            Operation::Xor => 2,
            Operation::Nand => 3,
            Operation::Nor => 4,
            Operation::Xnor => 5,
        }
    }

    /// Inverse of [Operation::code]. Unknown codes fold to [Operation::And].
    pub fn from_code(code: u8) -> Self {
        Self::ALL
            .get(code as usize)
            .copied()
            .unwrap_or(Operation::And)
    }

    /// Evaluates the operation over the values of the driving gates.
    /// A gate without any driver is unpowered and always low.
    pub fn eval(&self, inputs: impl IntoIterator<Item = bool>) -> bool {
        let mut count = 0usize;
        let mut high = 0usize;
        for value in inputs {
            count += 1;
            high += value as usize;
        }

        if count == 0 {
            return false;
        }

        match self {
            Operation::And => high == count,
            Operation::Or => high > 0,
            Operation::Xor => high % 2 == 1,
            Operation::Nand => high != count,
            Operation::Nor => high == 0,
            Operation::Xnor => high % 2 == 0,
        }
    }
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl std::str::FromStr for Operation {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from_name(s))
    }
}

impl From<&str> for Operation {
    fn from(value: &str) -> Self {
        Self::from_name(value)
    }
}

/// A logic gate at a fixed position on the grid.
/// After creation only its list of driven slots can change, and only by appending.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Gate {
    /// Where the gate sits, immutable
    position: Position,
    /// The logic function of the gate
    operation: Operation,
    /// Cosmetic color
    color: Color,
    /// Slots driven by this gate, in wiring order
    outputs: Vec<usize>,
}

impl Gate {
    /// Creates a new gate without any connections
    pub fn new(position: Position, operation: impl Into<Operation>, color: Color) -> Self {
        Self {
            position,
            operation: operation.into(),
            color,
            outputs: Vec::new(),
        }
    }

    /// Creates a new gate with the neutral color
    pub fn at(position: Position, operation: impl Into<Operation>) -> Self {
        Self::new(position, operation, Color::default())
    }

    /// Appends `slot` to the list of slots driven by this gate.
    /// Duplicates and self-references are kept as is.
    pub fn connect_to(&mut self, slot: usize) {
        self.outputs.push(slot);
    }

    /// Returns the position of the gate
    pub fn get_position(&self) -> Position {
        self.position
    }

    /// Returns the logic function of the gate
    pub fn get_operation(&self) -> Operation {
        self.operation
    }

    /// Returns the color of the gate
    pub fn get_color(&self) -> &Color {
        &self.color
    }

    /// Returns the slots driven by this gate
    pub fn get_outputs(&self) -> &[usize] {
        &self.outputs
    }

    /// Returns `true` if the gate drives `slot` at least once
    pub fn drives(&self, slot: usize) -> bool {
        self.outputs.contains(&slot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn operation_names_fold_to_and() {
        assert_eq!(Operation::from_name("NOR"), Operation::Nor);
        assert_eq!(Operation::from_name("xNoR"), Operation::Xnor);
        assert_eq!(Operation::from_name("buffer"), Operation::And);
        assert_eq!(Operation::from_name(""), Operation::And);
        assert_eq!("Or".parse::<Operation>(), Ok(Operation::Or));
    }

    #[test]
    fn operation_codes() {
        for (i, op) in Operation::ALL.iter().enumerate() {
            assert_eq!(op.code() as usize, i);
            assert_eq!(Operation::from_code(op.code()), *op);
        }
        assert_eq!(Operation::from_code(42), Operation::And);
    }

    #[test]
    fn operation_eval() {
        // Single input NOR is an inverter, single input AND is a buffer
        assert!(Operation::Nor.eval([false]));
        assert!(!Operation::Nor.eval([true]));
        assert!(Operation::And.eval([true]));
        assert!(!Operation::And.eval([true, false]));
        assert!(Operation::Or.eval([false, true, false]));
        assert!(Operation::Xor.eval([true, true, true]));
        assert!(Operation::Xnor.eval([true, true]));
        assert!(Operation::Nand.eval([true, false]));

        for op in Operation::ALL {
            assert!(!op.eval(std::iter::empty()), "{op} without drivers");
        }
    }

    #[test]
    fn gate_defaults() {
        let gate = Gate::default();
        assert_eq!(gate.get_position(), Position::new(0, 0, 0));
        assert_eq!(gate.get_operation(), Operation::And);
        assert_eq!(gate.get_color().as_str(), "eeeeee");
        assert!(gate.get_outputs().is_empty());
    }

    #[test]
    fn connections_are_append_only() {
        let mut gate = Gate::at((1, 2, 3).into(), "xor");
        gate.connect_to(4);
        gate.connect_to(4);
        gate.connect_to(0);
        assert_eq!(gate.get_outputs(), &[4, 4, 0]);
        assert!(gate.drives(0));
        assert!(!gate.drives(1));
    }
}

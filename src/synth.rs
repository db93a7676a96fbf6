/*!

  Synthesis of one-hot address decoders and lookup tables.

  A decoder of width `w` occupies three columns of bit lines and a grid of decode gates:

  - `(0, b, 0)`: the raw input line of address bit `b`, an AND gate driven by the user
  - `(1, b, 0)`: the true line of bit `b`
  - `(2, b, 0)`: the complement line of bit `b`, a NOR fed by the raw line
  - `x >= 3`: one AND gate per address, fed from the true or complement line of every bit

  A lookup table adds one OR accumulator per output bit at `(0, w + j, 0)` and wires every
  decode gate to the accumulators of the bits its function value sets.

*/

use crate::{
    attribute::Color,
    circuit::Circuit,
    error::Error,
    gate::{Operation, Position},
    util::bits_of,
};
use bitvec::{slice::BitSlice, vec::BitVec};
use std::collections::HashMap;
use tracing::debug;

/// The widest address a decoder can be built for. The gate count grows with `2^width`.
pub const MAX_ADDRESS_WIDTH: usize = 20;

/// First column holding decode gates
const FIRST_DECODE_COLUMN: usize = 3;

/// Where the decode gates of a decoder sit on the grid.
///
/// Decode gates fill `split` columns of `rows` gates. Addresses are assigned column by
/// column starting at the rightmost column `split + 2`, and bottom to top within a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecoderLayout {
    width: usize,
    split: usize,
    rows: usize,
}

impl DecoderLayout {
    /// Computes the layout of a decoder for addresses of `width` bits
    pub fn new(width: usize) -> Result<Self, Error> {
        if width == 0 || width > MAX_ADDRESS_WIDTH {
            return Err(Error::AddressWidth(width));
        }

        let n = 1usize << width;
        // round(width - 0.5) with ties to even, at least one
        let divisor = (if width % 2 == 0 { width } else { width - 1 }).max(1);
        let split = n / divisor;
        let rows = n.div_ceil(split);

        Ok(Self { width, split, rows })
    }

    /// Returns the address width in bits
    pub fn width(&self) -> usize {
        self.width
    }

    /// Returns the number of addresses, `2^width`
    pub fn addresses(&self) -> usize {
        1 << self.width
    }

    /// Returns the number of decode columns
    pub fn split(&self) -> usize {
        self.split
    }

    /// Returns the number of decode gates per column
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Returns the raw input line of address bit `bit`
    pub fn input_line(&self, bit: usize) -> Position {
        Position::planar(0, bit as i32)
    }

    /// Returns the true line of address bit `bit`
    pub fn true_line(&self, bit: usize) -> Position {
        Position::planar(1, bit as i32)
    }

    /// Returns the complement line of address bit `bit`
    pub fn complement_line(&self, bit: usize) -> Position {
        Position::planar(2, bit as i32)
    }

    /// Returns the output accumulator of output bit `bit`, stacked above the input lines
    pub fn output_line(&self, bit: usize) -> Position {
        Position::planar(0, (self.width + bit) as i32)
    }

    /// Returns the position of the decode gate of `address`
    pub fn position(&self, address: usize) -> Position {
        let column = address / self.rows;
        Position::planar(
            (self.split + 2 - column) as i32,
            (address % self.rows) as i32,
        )
    }

    /// Returns the address decoded at `position`, if a decode gate sits there
    pub fn address_at(&self, position: Position) -> Option<usize> {
        if position.z != 0 {
            return None;
        }
        let x = usize::try_from(position.x).ok()?;
        let y = usize::try_from(position.y).ok()?;
        if !(FIRST_DECODE_COLUMN..=self.split + 2).contains(&x) || y >= self.rows {
            return None;
        }

        let address = (self.split + 2 - x) * self.rows + y;
        (address < self.addresses()).then_some(address)
    }

    /// Returns the lines feeding the decode gate of `address`, most significant bit first.
    /// A set bit selects its true line, a cleared bit its complement line.
    pub fn select_lines(&self, address: usize) -> impl Iterator<Item = Position> {
        let layout = *self;
        (0..self.width).map(move |off| {
            let bit = layout.width - off - 1;
            if (address >> bit) & 1 == 1 {
                layout.true_line(bit)
            } else {
                layout.complement_line(bit)
            }
        })
    }

    /// Returns every decode column and row in output wiring order:
    /// columns left to right, and top to bottom within a column.
    /// Grid cells past the last address are included.
    pub fn traversal(&self) -> impl Iterator<Item = Position> {
        let first = FIRST_DECODE_COLUMN as i32;
        let last = (self.split + FIRST_DECODE_COLUMN) as i32;
        let rows = self.rows as i32;
        (first..last)
            .flat_map(move |ox| (0..rows).rev().map(move |oy| Position::planar(ox, oy)))
    }
}

/// Places the bit lines and decode gates of `layout` into `circuit`
fn insert_decoder(circuit: &mut Circuit, layout: &DecoderLayout) -> Result<(), Error> {
    for bit in 0..layout.width() {
        let raw = layout.input_line(bit);
        let true_line = layout.true_line(bit);
        let complement = layout.complement_line(bit);
        circuit.insert_gate(raw, Operation::And, Color::input());
        circuit.insert_gate(true_line, Operation::And, Color::logic());
        circuit.insert_gate(complement, Operation::Nor, Color::logic());
        circuit.wire(&[raw], &[true_line, complement])?;
    }

    for address in 0..layout.addresses() {
        let position = layout.position(address);
        circuit.insert_gate(position, Operation::And, Color::logic());
        let inputs: Vec<Position> = layout.select_lines(address).collect();
        circuit.wire(&inputs, &[position])?;
    }

    Ok(())
}

/// Builds a one-hot decoder for addresses of `width` bits.
///
/// The circuit has `3 * width + 2^width` gates. The decode gate of address `a` is in slot
/// `3 * width + a`.
pub fn build_decoder(width: usize) -> Result<Circuit, Error> {
    let layout = DecoderLayout::new(width)?;
    let mut decoder = Circuit::new();
    insert_decoder(&mut decoder, &layout)?;
    debug!(
        width,
        split = layout.split(),
        rows = layout.rows(),
        gates = decoder.len(),
        "built decoder"
    );
    Ok(decoder)
}

/// Builds a lookup table from `address_width` address bits to `output_width` output bits.
///
/// `function(index, output_width)` gives the output bits of address `index`, least significant
/// bit first. Bits past `output_width` are ignored and missing bits read as zero.
pub fn build_lut<F>(
    address_width: usize,
    output_width: usize,
    function: F,
) -> Result<Circuit, Error>
where
    F: Fn(usize, usize) -> BitVec,
{
    let layout = DecoderLayout::new(address_width)?;
    let mut lut = Circuit::new();
    insert_decoder(&mut lut, &layout)?;

    for bit in 0..output_width {
        lut.insert_gate(layout.output_line(bit), Operation::Or, Color::output());
    }

    for position in layout.traversal() {
        let Some(address) = layout.address_at(position) else {
            continue;
        };
        let bits = function(address, output_width);
        let outputs: Vec<Position> = bits
            .iter_ones()
            .take_while(|bit| *bit < output_width)
            .map(|bit| layout.output_line(bit))
            .collect();
        lut.wire(&[position], &outputs)?;
    }

    debug!(
        address_width,
        output_width,
        gates = lut.len(),
        connections = lut.connections().count(),
        "built lookup table"
    );
    Ok(lut)
}

/// Builds a lookup table of the [square] function
pub fn build_square_lut(address_width: usize, output_width: usize) -> Result<Circuit, Error> {
    build_lut(address_width, output_width, square)
}

/// The square of `index`, truncated to `width` bits
pub fn square(index: usize, width: usize) -> BitVec {
    let index = index as u64;
    bits_of(index.wrapping_mul(index), width)
}

/// The cube of `index`, truncated to `width` bits
pub fn cube(index: usize, width: usize) -> BitVec {
    let index = index as u64;
    bits_of(index.wrapping_mul(index).wrapping_mul(index), width)
}

/// `index` itself, truncated to `width` bits
pub fn identity(index: usize, width: usize) -> BitVec {
    bits_of(index as u64, width)
}

/// The number of set bits of `index`, truncated to `width` bits
pub fn popcount(index: usize, width: usize) -> BitVec {
    bits_of(index.count_ones() as u64, width)
}

/// Returns the forced values that put `address` on the raw input lines of a decoder
/// of `width` bits, keyed by slot. Lines missing from `circuit` are left out.
pub fn address_stimulus(
    circuit: &Circuit,
    width: usize,
    address: usize,
) -> HashMap<usize, bool> {
    (0..width)
        .filter_map(|bit| {
            circuit
                .slot_at(Position::planar(0, bit as i32))
                .map(|slot| (slot, (address >> bit) & 1 == 1))
        })
        .collect()
}

/// Reads the output accumulators of a lookup table from a simulated `state`,
/// least significant bit first. Missing accumulators read as zero.
pub fn read_outputs(
    circuit: &Circuit,
    state: &BitSlice,
    address_width: usize,
    output_width: usize,
) -> BitVec {
    (0..output_width)
        .map(|bit| {
            circuit
                .slot_at(Position::planar(0, (address_width + bit) as i32))
                .is_some_and(|slot| state[slot])
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assert_bits_eq;
    use crate::graph::Simulation;

    #[test]
    fn layout_split() {
        // (width, split, rows)
        for (width, split, rows) in [
            (1, 2, 1),
            (2, 2, 2),
            (3, 4, 2),
            (4, 4, 4),
            (5, 8, 4),
            (6, 10, 7),
            (7, 21, 7),
            (8, 32, 8),
        ] {
            let layout = DecoderLayout::new(width).unwrap();
            assert_eq!(layout.split(), split, "split of width {width}");
            assert_eq!(layout.rows(), rows, "rows of width {width}");
        }
    }

    #[test]
    fn layout_rejects_widths() {
        assert_eq!(DecoderLayout::new(0), Err(Error::AddressWidth(0)));
        assert_eq!(
            DecoderLayout::new(MAX_ADDRESS_WIDTH + 1),
            Err(Error::AddressWidth(MAX_ADDRESS_WIDTH + 1))
        );
        assert!(build_decoder(0).is_err());
    }

    #[test]
    fn layout_positions_are_unique() {
        for width in 1..=9 {
            let layout = DecoderLayout::new(width).unwrap();
            for address in 0..layout.addresses() {
                let position = layout.position(address);
                assert!(position.x >= 3);
                assert_eq!(layout.address_at(position), Some(address));
            }
            let visited = layout
                .traversal()
                .filter_map(|p| layout.address_at(p))
                .count();
            assert_eq!(visited, layout.addresses());
        }
    }

    #[test]
    fn first_addresses_fill_rightmost_column() {
        let layout = DecoderLayout::new(3).unwrap();
        assert_eq!(layout.position(0), Position::planar(6, 0));
        assert_eq!(layout.position(1), Position::planar(6, 1));
        assert_eq!(layout.position(2), Position::planar(5, 0));
        assert_eq!(layout.position(7), Position::planar(3, 1));
        assert_eq!(layout.address_at(Position::planar(7, 0)), None);
        assert_eq!(layout.address_at(Position::new(6, 0, 1)), None);
    }

    #[test]
    fn select_lines_msb_first() {
        let layout = DecoderLayout::new(3).unwrap();
        let lines: Vec<_> = layout.select_lines(0b110).collect();
        assert_eq!(
            lines,
            vec![
                Position::planar(1, 2),
                Position::planar(1, 1),
                Position::planar(2, 0),
            ]
        );
    }

    #[test]
    fn decoder_wiring() {
        let decoder = build_decoder(2).unwrap();
        assert_eq!(decoder.len(), 3 * 2 + 4);

        // Raw line feeds both the true and complement lines
        let raw = decoder.gate_at(Position::planar(0, 1)).unwrap();
        assert_eq!(raw.get_outputs(), &[4, 5]);
        assert_eq!(
            decoder.gate_at(Position::planar(2, 1)).unwrap().get_operation(),
            Operation::Nor
        );

        // Address 2 (0b10) is decoded from the true line of bit 1 and the complement of bit 0
        let decode = DecoderLayout::new(2).unwrap().position(2);
        let slot = decoder.slot_at(decode).unwrap();
        assert_eq!(slot, 6 + 2);
        let true_1 = decoder.gate_at(Position::planar(1, 1)).unwrap();
        let complement_0 = decoder.gate_at(Position::planar(2, 0)).unwrap();
        assert!(true_1.drives(slot));
        assert!(complement_0.drives(slot));
        assert!(!decoder.gate_at(Position::planar(1, 0)).unwrap().drives(slot));
    }

    #[test]
    fn bit_functions() {
        assert_bits_eq!(square(5, 8), "00011001");
        assert_bits_eq!(square(15, 4), "0001");
        assert_bits_eq!(cube(3, 6), "011011");
        assert_bits_eq!(identity(6, 3), "110");
        assert_bits_eq!(popcount(7, 2), "11");
    }

    #[test]
    fn lut_accumulators() {
        let lut = build_square_lut(3, 6).unwrap();
        assert_eq!(lut.len(), 3 * 3 + 8 + 6);
        for bit in 0..6 {
            let gate = lut.gate_at(Position::planar(0, 3 + bit)).unwrap();
            assert_eq!(gate.get_operation(), Operation::Or);
            assert_eq!(gate.get_color(), &Color::output());
        }
    }

    #[test]
    fn lut_ignores_extra_bits() {
        let lut = build_lut(2, 2, |_, _| crate::util::bits_from_str("1111")).unwrap();
        let layout = DecoderLayout::new(2).unwrap();
        for address in 0..4 {
            let gate = lut.gate_at(layout.position(address)).unwrap();
            assert_eq!(gate.get_outputs().len(), 2);
        }
    }

    #[test]
    fn lut_simulates_square() {
        let lut = build_square_lut(4, 8).unwrap();
        let sim = lut.get_analysis::<Simulation>().unwrap();
        for address in 0..16 {
            let state = sim.evaluate(&address_stimulus(&lut, 4, address));
            assert_eq!(read_outputs(&lut, &state, 4, 8), square(address, 8));
        }
    }
}

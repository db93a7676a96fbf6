/*!

  Bit-string utilities for lookup table functions.

*/

use bitvec::{order::Lsb0, slice::BitSlice, vec::BitVec, view::BitView};

/// Parses a bit string written most significant bit first, like `"0110"`.
/// Bit `i` of the result is the `i`-th character from the right.
/// Any character other than `'1'` reads as a zero.
pub fn bits_from_str(s: &str) -> BitVec {
    s.chars().rev().map(|c| c == '1').collect()
}

/// Renders bits most significant bit first, the inverse of [bits_from_str]
pub fn bits_to_string(bits: &BitSlice) -> String {
    bits.iter()
        .rev()
        .map(|b| if *b { '1' } else { '0' })
        .collect()
}

/// Returns the low `width` bits of `value`, zero-extended when `width` exceeds 64
pub fn bits_of(value: u64, width: usize) -> BitVec {
    let mut bits: BitVec = value.view_bits::<Lsb0>().iter().by_vals().collect();
    bits.resize(width, false);
    bits
}

/// Compare a bit vector against a bit string written most significant bit first.
#[macro_export]
macro_rules! assert_bits_eq {
    ($bits:expr, $expected:expr $(,)?) => {
        match (&$bits, &$expected) {
            (bits, expected) => {
                assert_eq!(
                    $crate::util::bits_to_string(bits),
                    AsRef::<str>::as_ref(expected)
                );
            }
        }
    };
    ($bits:expr, $expected:expr, $($arg:tt)+) => {
        match (&$bits, &$expected) {
            (bits, expected) => {
                assert_eq!(
                    $crate::util::bits_to_string(bits),
                    AsRef::<str>::as_ref(expected),
                    std::format_args!($($arg)+)
                );
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_msb_first() {
        let bits = bits_from_str("0110");
        assert_eq!(bits.len(), 4);
        assert!(!bits[0]);
        assert!(bits[1]);
        assert!(bits[2]);
        assert!(!bits[3]);
        assert_eq!(bits_to_string(&bits), "0110");
    }

    #[test]
    fn value_bits() {
        assert_bits_eq!(bits_of(9, 6), "001001");
        assert_bits_eq!(bits_of(0xff, 4), "1111");
        assert_eq!(bits_of(1, 70).len(), 70);
        assert_eq!(bits_of(1, 70).count_ones(), 1);
    }
}

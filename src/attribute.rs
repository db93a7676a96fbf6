/*!

  Display attributes carried by gates in a circuit.

*/

/// A cosmetic color attached to a gate, stored as the hex string the blueprint format expects.
/// The value is opaque: it is never parsed or validated, only carried through to the export.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(::serde::Serialize, ::serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct Color(String);

impl Color {
    /// The neutral gray used when no color is given
    pub const NEUTRAL: &'static str = "eeeeee";
    /// Raw address input lines
    pub const INPUT: &'static str = "eeee22";
    /// Internal decoder logic
    pub const LOGIC: &'static str = "222222";
    /// Output accumulators of a lookup table
    pub const OUTPUT: &'static str = "22ee22";

    /// Create a new color from its hex string
    pub fn new(hex: impl Into<String>) -> Self {
        Self(hex.into())
    }

    /// Get the hex string of the color
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The color of raw address input lines
    pub fn input() -> Self {
        Self::new(Self::INPUT)
    }

    /// The color of internal decoder logic
    pub fn logic() -> Self {
        Self::new(Self::LOGIC)
    }

    /// The color of lookup table output accumulators
    pub fn output() -> Self {
        Self::new(Self::OUTPUT)
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::new(Self::NEUTRAL)
    }
}

impl From<&str> for Color {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for Color {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl std::fmt::Display for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

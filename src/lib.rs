#![cfg_attr(docsrs, feature(doc_cfg))]
#![warn(missing_docs, unreachable_pub)]
/*!

`gate-lut`

Builds one-hot address decoders and lookup tables out of logic gates placed on a 3D grid,
and exports them as Scrap Mechanic blueprints.

A [circuit::Circuit] is an ordered list of [gate::Gate]s plus an index from grid positions
to gate slots. Gates are connected by position with [circuit::Circuit::wire], and the
builders in [synth] lay out complete decoders and lookup tables.

*/
#![doc = "## Simple Example\n```"]
#![doc = include_str!("../demos/simple.rs")]
#![doc = "\n```"]

pub mod attribute;
#[cfg(feature = "serde")]
pub mod blueprint;
pub mod circuit;
pub mod error;
pub mod gate;
pub mod graph;
pub mod synth;
pub mod util;

pub use circuit::Circuit;
pub use error::Error;
pub use gate::{Gate, Operation, Position};
pub use synth::{build_decoder, build_lut, build_square_lut};

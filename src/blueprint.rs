/*!

  Serde support for exporting circuits as Scrap Mechanic blueprints.

  A blueprint holds one body whose children are the logic gates of the circuit, in slot
  order. Each gate controls the gates whose controller ids are listed in its `controllers`.

*/

use crate::{
    attribute::Color,
    circuit::{Circuit, GateRecord},
    gate::{Gate, Operation, Position},
};
use serde::{Deserialize, Serialize};

/// The shape of a logic gate part
pub const LOGIC_GATE_SHAPE: &str = "9f0f56e8-2c31-4d83-996c-d00a9b296c3f";

/// The blueprint format version written by [blueprint_serialize]
pub const BLUEPRINT_VERSION: u32 = 3;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct ControllerId {
    id: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct Controller {
    active: bool,
    controllers: Vec<ControllerId>,
    id: usize,
    joints: Option<Vec<serde_json::Value>>,
    mode: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct Child {
    color: Color,
    controller: Controller,
    pos: Position,
    #[serde(rename = "shapeId")]
    shape_id: String,
    xaxis: i32,
    zaxis: i32,
}

impl Child {
    fn new(slot: usize, record: GateRecord) -> Self {
        Child {
            color: record.color,
            controller: Controller {
                active: false,
                controllers: record
                    .outputs
                    .into_iter()
                    .map(|id| ControllerId { id })
                    .collect(),
                id: slot,
                joints: None,
                mode: record.operation.code(),
            },
            pos: record.position,
            shape_id: LOGIC_GATE_SHAPE.to_string(),
            xaxis: 1,
            zaxis: -2,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct Body {
    childs: Vec<Child>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct Blueprint {
    bodies: Vec<Body>,
    version: u32,
}

impl From<&Circuit> for Blueprint {
    fn from(value: &Circuit) -> Self {
        let childs = value
            .export()
            .into_iter()
            .enumerate()
            .map(|(slot, record)| Child::new(slot, record))
            .collect();
        Blueprint {
            bodies: vec![Body { childs }],
            version: BLUEPRINT_VERSION,
        }
    }
}

impl Blueprint {
    /// Convert the blueprint back into a circuit.
    /// Children are placed in order across all bodies; controller ids are remapped to slots.
    fn into_circuit(self) -> Result<Circuit, serde_json::Error> {
        let childs: Vec<Child> = self.bodies.into_iter().flat_map(|b| b.childs).collect();
        let slots: std::collections::HashMap<usize, usize> = childs
            .iter()
            .enumerate()
            .map(|(slot, c)| (c.controller.id, slot))
            .collect();

        let mut circuit = Circuit::new();
        for child in childs {
            let mut gate = Gate::new(
                child.pos,
                Operation::from_code(child.controller.mode),
                child.color,
            );
            for ControllerId { id } in child.controller.controllers {
                let slot = slots.get(&id).ok_or_else(|| {
                    <serde_json::Error as serde::de::Error>::custom(format!(
                        "controller {id} is not a gate of the blueprint"
                    ))
                })?;
                gate.connect_to(*slot);
            }
            circuit.place(gate);
        }
        Ok(circuit)
    }
}

/// Serialize the circuit into the writer as a pretty-printed blueprint.
pub fn blueprint_serialize(
    circuit: &Circuit,
    writer: impl std::io::Write,
) -> Result<(), serde_json::Error> {
    let sobj: Blueprint = circuit.into();
    serde_json::to_writer_pretty(writer, &sobj)
}

/// Deserialize a circuit from a blueprint in the reader.
pub fn blueprint_deserialize(reader: impl std::io::Read) -> Result<Circuit, serde_json::Error> {
    let sobj: Blueprint = serde_json::from_reader(reader)?;
    sobj.into_circuit()
}

impl Circuit {
    /// Serializes the circuit as a blueprint to a writer.
    pub fn serialize(&self, writer: impl std::io::Write) -> Result<(), serde_json::Error> {
        blueprint_serialize(self, writer)
    }

    /// Returns the circuit as a pretty-printed blueprint string.
    pub fn to_blueprint(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(&Blueprint::from(self))
    }
}

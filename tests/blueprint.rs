#![cfg(feature = "serde")]

use gate_lut::blueprint::{LOGIC_GATE_SHAPE, blueprint_deserialize, blueprint_serialize};
use gate_lut::build_square_lut;
use gate_lut::synth::DecoderLayout;
use gate_lut::Position;
use std::io::Cursor;

#[test]
fn test_lut_blueprint() {
    let lut = build_square_lut(3, 6).unwrap();

    let mut buf: Vec<u8> = Vec::new();
    assert!(blueprint_serialize(&lut, &mut buf).is_ok());

    let value: serde_json::Value = serde_json::from_slice(&buf).unwrap();
    assert_eq!(value["version"], 3);
    let childs = value["bodies"][0]["childs"].as_array().unwrap();
    assert_eq!(childs.len(), lut.len());

    for (slot, child) in childs.iter().enumerate() {
        assert_eq!(child["controller"]["id"], slot);
        assert_eq!(child["shapeId"], LOGIC_GATE_SHAPE);
        for target in child["controller"]["controllers"].as_array().unwrap() {
            assert!(target["id"].as_u64().unwrap() < childs.len() as u64);
        }
    }

    // The raw input lines are yellow AND gates, the accumulators green OR gates
    assert_eq!(childs[0]["color"], "eeee22");
    assert_eq!(childs[0]["controller"]["mode"], 0);
    let last = childs.last().unwrap();
    assert_eq!(last["color"], "22ee22");
    assert_eq!(last["controller"]["mode"], 1);
    assert_eq!(last["pos"], serde_json::json!({"x": 0, "y": 8, "z": 0}));
}

#[test]
fn test_blueprint_read_back() {
    let lut = build_square_lut(4, 8).unwrap();
    let text = lut.to_blueprint().unwrap();

    let circuit = blueprint_deserialize(Cursor::new(text)).unwrap();
    assert_eq!(circuit.export(), lut.export());

    // Positions are indexed again on the way in
    let layout = DecoderLayout::new(4).unwrap();
    assert_eq!(
        circuit.slot_at(layout.position(5)),
        lut.slot_at(layout.position(5))
    );
    assert!(circuit.occupied(Position::planar(0, 11)));
}

use gate_lut::Circuit;
use gate_lut::Error;
use gate_lut::Gate;
use gate_lut::Position;
use gate_lut::build_square_lut;
use gate_lut::graph::Simulation;

#[test]
fn lut_has_no_dangling_connections() {
    let lut = build_square_lut(6, 12).unwrap();
    assert!(lut.verify().is_ok());
    let records = lut.export();
    for record in &records {
        for target in &record.outputs {
            assert!(*target < records.len());
        }
    }
}

#[test]
fn dangling_connection() {
    let mut gate = Gate::at(Position::new(0, 0, 0), "and");
    gate.connect_to(5);
    let mut circuit = Circuit::new();
    circuit.place(gate);
    assert_eq!(
        circuit.verify(),
        Err(Error::DanglingConnection {
            slot: 0,
            target: 5,
            len: 1
        })
    );
    // Analyses refuse to run on a broken circuit
    assert!(circuit.get_analysis::<Simulation>().is_err());
}

#[test]
fn invalid_widths() {
    assert_eq!(build_square_lut(0, 4).err(), Some(Error::AddressWidth(0)));
    assert!(build_square_lut(21, 4).is_err());
    assert_eq!(
        Error::AddressWidth(0).to_string(),
        "address width 0 is outside of 1..=20"
    );
}

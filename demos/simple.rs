use gate_lut::{Circuit, Position, attribute::Color};

fn main() {
    let mut circuit = Circuit::new();

    // Add a switch and an inverter next to it
    let a = Position::new(0, 0, 0);
    let y = Position::new(1, 0, 0);
    circuit.insert_gate(a, "and", Color::input());
    circuit.insert_gate(y, "nor", Color::logic());

    // Connect the switch to the inverter
    circuit.wire(&[a], &[y]).unwrap();

    // Print the circuit
    println!("{circuit}");
}

use gate_lut::graph::{CombDepth, Simulation};
use gate_lut::synth::{address_stimulus, read_outputs};
use gate_lut::util::{bits_of, bits_to_string};

fn main() {
    let (address_width, output_width) = (3, 4);

    // A lookup table of 7 * index
    let lut = gate_lut::build_lut(address_width, output_width, |index, width| {
        bits_of(7 * index as u64, width)
    })
    .unwrap();

    let depth = lut.get_analysis::<CombDepth>().unwrap();
    println!("{} gates, {} logic levels", lut.len(), depth.get_max_depth());

    // Flip the input switches to every address and read the outputs back
    let sim = lut.get_analysis::<Simulation>().unwrap();
    for address in 0..1 << address_width {
        let state = sim.evaluate(&address_stimulus(&lut, address_width, address));
        let outputs = read_outputs(&lut, &state, address_width, output_width);
        println!("{address:03b} -> {}", bits_to_string(&outputs));
    }
}

use std::{
    fs::File,
    io::BufWriter,
    path::{Path, PathBuf},
};

use anyhow::{Context, bail};
use bitvec::vec::BitVec;
use clap::{Parser, Subcommand, ValueEnum};
use gate_lut::{
    Circuit,
    graph::{CombDepth, Simulation},
    synth::{self, address_stimulus, read_outputs},
    util::bits_to_string,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(version, about, name = "gate-lut", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// builds a one-hot address decoder.
    Decoder {
        /// Address width in bits.
        #[arg(short, long, default_value = "8")]
        address_width: usize,
        /// Blueprint output path.
        #[arg(short, long, default_value = "blueprint.json")]
        output: PathBuf,
    },
    /// builds a lookup table behind an address decoder.
    Lut {
        /// Address width in bits.
        #[arg(short, long, default_value = "8")]
        address_width: usize,
        /// Output width in bits.
        #[arg(short = 'm', long, default_value = "16")]
        output_width: usize,
        /// Function stored in the table.
        #[arg(short, long, default_value = "square")]
        function: Function,
        /// Blueprint output path.
        #[arg(short, long, default_value = "blueprint.json")]
        output: PathBuf,
        /// Simulate every address and compare the outputs against the function.
        #[arg(long)]
        verify: bool,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Function {
    Square,
    Cube,
    Identity,
    Popcount,
}

impl Function {
    fn eval(self, index: usize, width: usize) -> BitVec {
        match self {
            Function::Square => synth::square(index, width),
            Function::Cube => synth::cube(index, width),
            Function::Identity => synth::identity(index, width),
            Function::Popcount => synth::popcount(index, width),
        }
    }
}

fn write_blueprint(circuit: &Circuit, path: &Path) -> anyhow::Result<()> {
    let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
    circuit
        .serialize(BufWriter::new(file))
        .with_context(|| format!("writing {}", path.display()))?;
    info!(gates = circuit.len(), path = %path.display(), "wrote blueprint");
    Ok(())
}

fn verify_lut(
    lut: &Circuit,
    address_width: usize,
    output_width: usize,
    function: Function,
) -> anyhow::Result<()> {
    let sim = lut.get_analysis::<Simulation>()?;
    for address in 0..1usize << address_width {
        let state = sim.evaluate(&address_stimulus(lut, address_width, address));
        let got = read_outputs(lut, &state, address_width, output_width);
        let expected = function.eval(address, output_width);
        if got != expected {
            bail!(
                "address {address} reads {} instead of {}",
                bits_to_string(&got),
                bits_to_string(&expected)
            );
        }
    }
    let depth = lut.get_analysis::<CombDepth>()?;
    info!(
        addresses = 1usize << address_width,
        levels = depth.get_max_depth(),
        "verified lookup table"
    );
    Ok(())
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    match Cli::parse().command {
        Command::Decoder {
            address_width,
            output,
        } => {
            let decoder = gate_lut::build_decoder(address_width)?;
            write_blueprint(&decoder, &output)
        }
        Command::Lut {
            address_width,
            output_width,
            function,
            output,
            verify,
        } => {
            let lut = gate_lut::build_lut(address_width, output_width, |index, width| {
                function.eval(index, width)
            })?;
            if verify {
                verify_lut(&lut, address_width, output_width, function)?;
            }
            write_blueprint(&lut, &output)
        }
    }
}

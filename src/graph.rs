/*!

  Analyses over a finished circuit.

*/

use crate::circuit::Circuit;
use crate::error::Error;
#[cfg(feature = "graph")]
use crate::gate::Gate;
use bitvec::vec::BitVec;
#[cfg(feature = "graph")]
use petgraph::graph::DiGraph;
use std::collections::{HashMap, VecDeque};

/// A common trait of analyses than can be performed on a circuit.
/// An analysis becomes stale when the circuit is modified.
pub trait Analysis<'a>
where
    Self: Sized + 'a,
{
    /// Construct the analysis to the current state of the circuit.
    fn build(circuit: &'a Circuit) -> Result<Self, Error>;
}

impl Circuit {
    /// Builds the analysis `A` over the current state of the circuit
    pub fn get_analysis<'a, A: Analysis<'a>>(&'a self) -> Result<A, Error> {
        A::build(self)
    }
}

/// A table that maps each slot to the slots driving it
pub struct FanInTable<'a> {
    // A reference to the underlying circuit
    _circuit: &'a Circuit,
    /// Drivers of each slot, one entry per connection
    drivers: Vec<Vec<usize>>,
}

impl FanInTable<'_> {
    /// Returns an iterator to the slots driving `slot`.
    /// A driver wired several times to `slot` is repeated.
    pub fn get_drivers(&self, slot: usize) -> impl Iterator<Item = usize> {
        self.drivers
            .get(slot)
            .into_iter()
            .flat_map(|d| d.iter().copied())
    }

    /// Returns `true` if any gate drives `slot`
    pub fn has_drivers(&self, slot: usize) -> bool {
        self.drivers.get(slot).is_some_and(|d| !d.is_empty())
    }

    /// Returns the slots that no gate drives, the inputs of the circuit
    pub fn sources(&self) -> impl Iterator<Item = usize> {
        self.drivers
            .iter()
            .enumerate()
            .filter(|(_, d)| d.is_empty())
            .map(|(slot, _)| slot)
    }
}

impl<'a> Analysis<'a> for FanInTable<'a> {
    fn build(circuit: &'a Circuit) -> Result<Self, Error> {
        circuit.verify()?;
        let mut drivers = vec![Vec::new(); circuit.len()];
        for c in circuit.connections() {
            drivers[c.target()].push(c.source());
        }

        Ok(FanInTable {
            _circuit: circuit,
            drivers,
        })
    }
}

/// Orders the slots of `circuit` so that every gate comes after its drivers
fn topological_order(circuit: &Circuit, fan_in: &FanInTable<'_>) -> Result<Vec<usize>, Error> {
    let mut pending: Vec<usize> = (0..circuit.len())
        .map(|slot| fan_in.get_drivers(slot).count())
        .collect();
    let mut ready: VecDeque<usize> = fan_in.sources().collect();
    let mut order = Vec::with_capacity(circuit.len());

    while let Some(slot) = ready.pop_front() {
        order.push(slot);
        for target in circuit.get(slot).into_iter().flat_map(|g| g.get_outputs()) {
            pending[*target] -= 1;
            if pending[*target] == 0 {
                ready.push_back(*target);
            }
        }
    }

    if order.len() != circuit.len() {
        return Err(Error::Cycle);
    }
    Ok(order)
}

/// The logic levels of a circuit.
/// Gates without drivers are level 0, every other gate is one more than its deepest driver.
pub struct CombDepth<'a> {
    // A reference to the underlying circuit
    _circuit: &'a Circuit,
    // Logic level of each slot
    comb_depth: Vec<usize>,
    /// The maximum depth of the circuit
    max_depth: usize,
}

impl CombDepth<'_> {
    /// Returns the logic level of the gate at `slot`
    pub fn get_comb_depth(&self, slot: usize) -> Option<usize> {
        self.comb_depth.get(slot).copied()
    }

    /// Returns the maximum logic level of the circuit.
    pub fn get_max_depth(&self) -> usize {
        self.max_depth
    }
}

impl<'a> Analysis<'a> for CombDepth<'a> {
    fn build(circuit: &'a Circuit) -> Result<Self, Error> {
        let fan_in = FanInTable::build(circuit)?;
        let mut comb_depth = vec![0; circuit.len()];

        for slot in topological_order(circuit, &fan_in)? {
            let depth = fan_in
                .get_drivers(slot)
                .map(|d| comb_depth[d] + 1)
                .max()
                .unwrap_or(0);
            comb_depth[slot] = depth;
        }

        let max_depth = comb_depth.iter().max().copied().unwrap_or(0);

        Ok(CombDepth {
            _circuit: circuit,
            comb_depth,
            max_depth,
        })
    }
}

/// Evaluates the steady state of a combinational circuit.
///
/// Gates are evaluated in topological order with every driver settled first,
/// which matches the target game once all signals have propagated.
pub struct Simulation<'a> {
    circuit: &'a Circuit,
    fan_in: FanInTable<'a>,
    order: Vec<usize>,
}

impl Simulation<'_> {
    /// Computes the value of every gate, indexed by slot.
    ///
    /// Slots in `forced` take the given value instead of computing one; this is how
    /// switches on the input lines are modelled. Gates without drivers are low.
    pub fn evaluate(&self, forced: &HashMap<usize, bool>) -> BitVec {
        let mut state = BitVec::repeat(false, self.circuit.len());
        for &slot in &self.order {
            let value = match forced.get(&slot) {
                Some(value) => *value,
                None => match self.circuit.get(slot) {
                    Some(gate) => gate
                        .get_operation()
                        .eval(self.fan_in.get_drivers(slot).map(|d| state[d])),
                    None => false,
                },
            };
            state.set(slot, value);
        }
        state
    }
}

impl<'a> Analysis<'a> for Simulation<'a> {
    fn build(circuit: &'a Circuit) -> Result<Self, Error> {
        let fan_in = FanInTable::build(circuit)?;
        let order = topological_order(circuit, &fan_in)?;
        Ok(Simulation {
            circuit,
            fan_in,
            order,
        })
    }
}

/// Returns a petgraph representation of the circuit as a directed multi-graph.
/// Node `i` of the graph is slot `i` of the circuit.
#[cfg(feature = "graph")]
pub struct MultiDiGraph<'a> {
    _circuit: &'a Circuit,
    graph: DiGraph<&'a Gate, ()>,
}

#[cfg(feature = "graph")]
impl<'a> MultiDiGraph<'a> {
    /// Return a reference to the graph constructed by this analysis
    pub fn get_graph(&self) -> &DiGraph<&'a Gate, ()> {
        &self.graph
    }
}

#[cfg(feature = "graph")]
impl<'a> Analysis<'a> for MultiDiGraph<'a> {
    fn build(circuit: &'a Circuit) -> Result<Self, Error> {
        circuit.verify()?;
        let mut graph = DiGraph::new();
        let ids: Vec<_> = circuit.gates().map(|g| graph.add_node(g)).collect();

        for c in circuit.connections() {
            graph.add_edge(ids[c.source()], ids[c.target()], ());
        }

        Ok(Self {
            _circuit: circuit,
            graph,
        })
    }
}

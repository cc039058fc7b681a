//! The agent whose position drives a population, only its position, current time
//! and timestep are read by the neurons.

use ndarray::{Array1, ArrayView1};


/// Provides the current state of whatever is moving through the environment
pub trait Agent {
    /// Current position, may contain `NaN` if the agent has no valid position yet
    fn pos(&self) -> ArrayView1<f64>;
    /// Current time of the simulation (s)
    fn t(&self) -> f64;
    /// Timestep of the simulation (s)
    fn dt(&self) -> f64;
}

/// A minimal agent that is moved explicitly, each move advances the clock by `dt`
///
/// ```rust
/// # use spatial_cells::agent::{Agent, AgentState};
/// # use ndarray::array;
/// let mut agent = AgentState::new(2, 0.01);
/// assert!(agent.pos().iter().all(|i| i.is_nan()));
///
/// agent.move_to(array![0.5, 0.5]);
/// assert_eq!(agent.t(), 0.01);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct AgentState {
    /// Current position
    pub pos: Array1<f64>,
    /// Current time (s)
    pub t: f64,
    /// Timestep (s)
    pub dt: f64,
}

impl AgentState {
    /// Generates an agent at time `0.` without a valid position
    pub fn new(dimensions: usize, dt: f64) -> Self {
        AgentState {
            pos: Array1::from_elem(dimensions, f64::NAN),
            t: 0.,
            dt,
        }
    }

    /// Generates an agent at time `0.` at the given position
    pub fn at(pos: Array1<f64>, dt: f64) -> Self {
        AgentState { pos, t: 0., dt }
    }

    /// Moves the agent to a new position and advances time by one timestep
    pub fn move_to(&mut self, pos: Array1<f64>) {
        self.pos = pos;
        self.t += self.dt;
    }
}

impl Agent for AgentState {
    fn pos(&self) -> ArrayView1<f64> {
        self.pos.view()
    }

    fn t(&self) -> f64 {
        self.t
    }

    fn dt(&self) -> f64 {
        self.dt
    }
}

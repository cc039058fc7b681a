//! # Neurons
//!
//! A population of spatially tuned neurons is a [`Neurons`] struct holding the state
//! shared by every cell type (firing rates, Ornstein-Uhlenbeck noise and a history of
//! firing rates and spikes) together with a [`TuningCurve`] that determines how each
//! neuron responds to position. Place cells and grid cells are tuning curves found in
//! [`place_cells`] and [`grid_cells`], custom cell types only need to implement
//! [`TuningCurve`] to reuse the update and history lifecycle.

use std::{fmt::{Display, Formatter}, str::FromStr};
use ndarray::{Array1, Array2, ArrayView2, Axis};
use rand::Rng;
use rand_distr::StandardNormal;
use serde::{Deserialize, Serialize};
use tracing::debug;
use crate::{
    agent::Agent,
    environment::Environment,
    error::{NeuronError, SpatialCellsError},
};

pub mod grid_cells;
pub mod place_cells;


/// Parameters shared by every population of neurons
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct NeuronParameters {
    /// Number of neurons, ignored when the tuning parameters fix the population size
    pub n: usize,
    /// Firing rate of a neuron at the bottom of its tuning curve (Hz)
    pub min_fr: f64,
    /// Firing rate of a neuron at the top of its tuning curve (Hz)
    pub max_fr: f64,
    /// Standard deviation of the firing rate noise (Hz), `0.` disables noise
    pub noise_std: f64,
    /// Correlation time of the firing rate noise (s)
    pub noise_coherence_time: f64,
    /// Whether to record firing rates and spikes every update
    pub save_history: bool,
    /// Name of the population, used in logs
    pub name: String,
}

impl Default for NeuronParameters {
    fn default() -> Self {
        NeuronParameters {
            n: 10,
            min_fr: 0.,
            max_fr: 1.,
            noise_std: 0.,
            noise_coherence_time: 0.5,
            save_history: true,
            name: String::from("Neurons"),
        }
    }
}

/// Computes how a population responds to position, the rate is expected to be
/// within `[0, 1]` and is scaled into `[min_fr, max_fr]` by [`Neurons`]
pub trait TuningCurve: Send + Sync {
    /// Environment the tuning curve is defined over
    type E: Environment;
    /// Gets the environment
    fn environment(&self) -> &Self::E;
    /// Number of neurons described by the tuning curve
    fn n(&self) -> usize;
    /// Calculates the unscaled firing rate of every neuron at each of the given
    /// `N × D` positions, returns an `n × N` matrix
    fn firing_rate_at(&self, _positions: ArrayView2<f64>) -> Result<Array2<f64>, SpatialCellsError> {
        Err(NeuronError::GetStateNotImplemented.into())
    }
}

/// Positions to evaluate a population at
#[derive(Clone, Copy)]
pub enum PositionSelection<'a> {
    /// Current position of the agent
    Agent(&'a dyn Agent),
    /// Every position of the discretised environment
    All,
    /// Explicit `N × D` positions
    Explicit(ArrayView2<'a, f64>),
}

/// A selection of neurons from a population
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NeuronSelection {
    /// Every neuron in order
    All,
    /// Given number of neurons evenly spaced across the population
    Count(usize),
    /// Explicit (zero based) neuron indices
    Indices(Vec<usize>),
}

impl Display for NeuronSelection {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        match self {
            NeuronSelection::All => write!(f, "all"),
            NeuronSelection::Count(k) => write!(f, "{}", k),
            NeuronSelection::Indices(indices) => write!(f, "{:?}", indices),
        }
    }
}

impl FromStr for NeuronSelection {
    type Err = NeuronError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let value = value.trim();
        if value == "all" {
            return Ok(NeuronSelection::All);
        }

        value.parse::<usize>()
            .map(NeuronSelection::Count)
            .map_err(|_| NeuronError::InvalidNeuronSelection(value.to_string()))
    }
}

impl From<usize> for NeuronSelection {
    fn from(count: usize) -> Self {
        NeuronSelection::Count(count)
    }
}

impl From<Vec<usize>> for NeuronSelection {
    fn from(indices: Vec<usize>) -> Self {
        NeuronSelection::Indices(indices)
    }
}

impl From<&[usize]> for NeuronSelection {
    fn from(indices: &[usize]) -> Self {
        NeuronSelection::Indices(indices.to_vec())
    }
}

/// Record of a population over time, one entry per saved update
#[derive(Debug, Clone, Default, PartialEq)]
pub struct History {
    /// Time of each entry (s)
    pub t: Vec<f64>,
    /// Firing rate of every neuron at each entry (Hz)
    pub firingrate: Vec<Array1<f64>>,
    /// Whether each neuron spiked at each entry
    pub spikes: Vec<Array1<bool>>,
}

impl History {
    /// Number of entries
    pub fn len(&self) -> usize {
        self.t.len()
    }

    pub fn is_empty(&self) -> bool {
        self.t.is_empty()
    }

    fn push(&mut self, t: f64, firingrate: Array1<f64>, spikes: Array1<bool>) {
        self.t.push(t);
        self.firingrate.push(firingrate);
        self.spikes.push(spikes);
    }

    fn clear(&mut self) {
        self.t.clear();
        self.firingrate.clear();
        self.spikes.clear();
    }

    fn to_arrays(&self, n: usize) -> HistoryArrays {
        let length = self.len();

        HistoryArrays {
            t: Array1::from(self.t.clone()),
            firingrate: Array2::from_shape_fn((length, n), |(i, j)| self.firingrate[i][j]),
            spikes: Array2::from_shape_fn((length, n), |(i, j)| self.spikes[i][j]),
        }
    }
}

/// History of a population as arrays, rows are entries and columns are neurons
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryArrays {
    /// `T` times (s)
    pub t: Array1<f64>,
    /// `T × n` firing rates (Hz)
    pub firingrate: Array2<f64>,
    /// `T × n` spikes
    pub spikes: Array2<bool>,
}

/// A population of neurons whose firing rate is determined by a [`TuningCurve`]
/// evaluated at the position of an agent
///
/// Each call to [`Neurons::update`] advances the noise by one Euler-Maruyama step of
/// an Ornstein-Uhlenbeck process, evaluates the tuning curve at the agent's position,
/// adds the noise and (if `save_history` is set) records the firing rate alongside
/// spikes drawn with probability `dt * firingrate`
#[derive(Debug, Clone)]
pub struct Neurons<T: TuningCurve> {
    tuning: T,
    n: usize,
    /// Firing rate at the bottom of the tuning curve (Hz)
    pub min_fr: f64,
    /// Firing rate at the top of the tuning curve (Hz)
    pub max_fr: f64,
    /// Standard deviation of the noise (Hz)
    pub noise_std: f64,
    /// Correlation time of the noise (s)
    pub noise_coherence_time: f64,
    /// Whether to save history every update
    pub save_history: bool,
    /// Name of the population
    pub name: String,
    firingrate: Array1<f64>,
    noise: Array1<f64>,
    history: History,
    history_version: u64,
    history_cache: Option<(u64, HistoryArrays)>,
}

impl<T: TuningCurve> Neurons<T> {
    /// Generates a population from a tuning curve, the number of neurons
    /// is taken from the tuning curve
    pub fn from_tuning(tuning: T, params: &NeuronParameters) -> Result<Self, SpatialCellsError> {
        let n = tuning.n();
        if n == 0 {
            return Err(NeuronError::EmptyPopulation.into());
        }

        debug!(name = %params.name, n, "created neuron population");

        Ok(Neurons {
            tuning,
            n,
            min_fr: params.min_fr,
            max_fr: params.max_fr,
            noise_std: params.noise_std,
            noise_coherence_time: params.noise_coherence_time,
            save_history: params.save_history,
            name: params.name.clone(),
            firingrate: Array1::zeros(n),
            noise: Array1::zeros(n),
            history: History::default(),
            history_version: 0,
            history_cache: None,
        })
    }

    /// Number of neurons
    pub fn n(&self) -> usize {
        self.n
    }

    /// Gets the tuning curve
    pub fn tuning(&self) -> &T {
        &self.tuning
    }

    /// Gets the environment the population is bound to
    pub fn environment(&self) -> &T::E {
        self.tuning.environment()
    }

    /// Current firing rate of every neuron (Hz)
    pub fn firingrate(&self) -> &Array1<f64> {
        &self.firingrate
    }

    /// Current noise offset of every neuron (Hz)
    pub fn noise(&self) -> &Array1<f64> {
        &self.noise
    }

    /// Gets the recorded history
    pub fn history(&self) -> &History {
        &self.history
    }

    /// Evaluates the tuning curve at the selected positions and scales it into
    /// `[min_fr, max_fr]`, returns an `n × N` matrix without noise
    pub fn get_state(&self, selection: PositionSelection) -> Result<Array2<f64>, SpatialCellsError> {
        let positions = match selection {
            PositionSelection::Agent(agent) => agent.pos().insert_axis(Axis(0)).to_owned(),
            PositionSelection::All => self.environment().discretised_coords(),
            PositionSelection::Explicit(positions) => positions.to_owned(),
        };

        let rates = self.tuning.firing_rate_at(positions.view())?;
        if rates.dim() != (self.n, positions.nrows()) {
            return Err(NeuronError::StateShapeMismatch.into());
        }

        let (min_fr, max_fr) = (self.min_fr, self.max_fr);

        Ok(rates.mapv(|rate| rate * (max_fr - min_fr) + min_fr))
    }

    /// Firing rate of every neuron over the whole discretised environment, returns
    /// the `N × D` positions and the `n × N` rates evaluated at them
    pub fn rate_map(&self) -> Result<(Array2<f64>, Array2<f64>), SpatialCellsError> {
        let coords = self.environment().discretised_coords();
        let rates = self.get_state(PositionSelection::Explicit(coords.view()))?;

        Ok((coords, rates))
    }

    fn update_noise<R: Rng>(&mut self, dt: f64, rng: &mut R) {
        if self.noise_std == 0. || self.noise_coherence_time == 0. {
            return;
        }

        let (tau, sigma) = (self.noise_coherence_time, self.noise_std);
        let diffusion = sigma * (2. * dt / tau).sqrt();

        self.noise.mapv_inplace(|noise| {
            let z: f64 = rng.sample(StandardNormal);

            noise - noise / tau * dt + diffusion * z
        });
    }

    /// Updates the noise and firing rate from the agent's current position and
    /// saves the result to history if `save_history` is set, if the agent has no
    /// valid position (contains `NaN`) every firing rate is set to `0.`, nothing
    /// is changed if the state cannot be computed
    pub fn update<R: Rng>(&mut self, agent: &dyn Agent, rng: &mut R) -> Result<(), SpatialCellsError> {
        let state = if agent.pos().iter().any(|i| i.is_nan()) {
            None
        } else {
            Some(self.get_state(PositionSelection::Agent(agent))?.index_axis_move(Axis(1), 0))
        };

        self.update_noise(agent.dt(), rng);

        self.firingrate = match state {
            Some(state) => state + &self.noise,
            None => Array1::zeros(self.n),
        };

        if self.save_history {
            self.save_to_history(agent, rng);
        }

        Ok(())
    }

    /// Draws spikes with probability `dt * firingrate` and appends the current time,
    /// firing rate and spikes to the history
    pub fn save_to_history<R: Rng>(&mut self, agent: &dyn Agent, rng: &mut R) {
        let dt = agent.dt();
        let spikes = self.firingrate.mapv(|rate| rng.gen::<f64>() < dt * rate);

        self.history.push(agent.t(), self.firingrate.clone(), spikes);
        self.history_version += 1;
    }

    /// Clears the history
    pub fn reset_history(&mut self) {
        self.history.clear();
        self.history_version += 1;
        self.history_cache = None;
    }

    /// Returns the history as arrays, the arrays are only rebuilt when the
    /// history has changed since the last call
    pub fn get_history_arrays(&mut self) -> &HistoryArrays {
        let version = self.history_version;
        if !matches!(&self.history_cache, Some((cached, _)) if *cached == version) {
            self.history_cache = None;
        }

        let (n, history) = (self.n, &self.history);

        &self.history_cache.get_or_insert_with(|| (version, history.to_arrays(n))).1
    }

    /// Resolves a selection of neurons into zero based indices
    ///
    /// - `All` : every index in order
    ///
    /// - `Count(k)` : `min(n, k)` indices evenly spaced across `[0, n - 1]`
    ///
    /// - `Indices` : the given indices, errors if any is out of range
    pub fn return_list_of_neurons(&self, selection: &NeuronSelection) -> Result<Vec<usize>, NeuronError> {
        match selection {
            NeuronSelection::All => Ok((0..self.n).collect()),
            NeuronSelection::Count(k) => {
                let count = (*k).min(self.n);

                Ok(match count {
                    0 => Vec::new(),
                    1 => vec![0],
                    _ => {
                        let spacing = (self.n - 1) as f64 / (count - 1) as f64;

                        (0..count).map(|i| (i as f64 * spacing).round() as usize).collect()
                    },
                })
            },
            NeuronSelection::Indices(indices) => {
                if indices.iter().any(|i| *i >= self.n) {
                    return Err(NeuronError::InvalidNeuronSelection(selection.to_string()));
                }

                Ok(indices.clone())
            },
        }
    }
}

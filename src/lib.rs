//! # Spatial Cells
//!
//! `spatial_cells` models populations of spatially tuned neurons, place cells and
//! grid cells, driven by an agent moving through an environment. Each population
//! holds a firing rate per neuron that is recomputed from the agent's position
//! every update, optionally perturbed by Ornstein-Uhlenbeck noise, and recorded
//! alongside Bernoulli spikes in a history.
//!
//! Cell types are built from the generic [`neuron::Neurons`] container and a
//! [`neuron::TuningCurve`] describing how each neuron responds to position, so new
//! cell types can be added by implementing the trait. Environments and agents are
//! consumed through the [`environment::Environment`] and [`agent::Agent`] traits,
//! a rectangular environment and a minimal agent are provided.
//!
//! Every stochastic operation takes an explicit random number generator, so
//! seeding one generator makes a whole simulation reproducible.
//!
//! ## Example Code
//!
//! ### Place cells following an agent
//!
//! ```rust
//! use ndarray::array;
//! use rand::SeedableRng;
//! use spatial_cells::{
//!     agent::AgentState,
//!     environment::RectangularEnvironment,
//!     error::SpatialCellsError,
//!     neuron::{NeuronParameters, place_cells::{PlaceCells, PlaceCellParameters}},
//! };
//!
//! fn main() -> Result<(), SpatialCellsError> {
//!     let mut rng = rand::rngs::StdRng::seed_from_u64(42);
//!
//!     let mut place_cells = PlaceCells::new(
//!         RectangularEnvironment::default_impl(),
//!         PlaceCellParameters {
//!             neurons: NeuronParameters {
//!                 n: 25,
//!                 max_fr: 10.,
//!                 noise_std: 0.5,
//!                 ..NeuronParameters::default()
//!             },
//!             widths: 0.1,
//!             ..PlaceCellParameters::default()
//!         },
//!         &mut rng,
//!     )?;
//!
//!     let mut agent = AgentState::at(array![0.1, 0.1], 0.01);
//!     for _ in 0..100 {
//!         let next = &agent.pos + &array![0.005, 0.007];
//!         agent.move_to(next);
//!
//!         place_cells.update(&agent, &mut rng)?;
//!     }
//!
//!     let history = place_cells.get_history_arrays();
//!     assert_eq!(history.firingrate.dim(), (100, 25));
//!
//!     Ok(())
//! }
//! ```
//!
//! ### Grid cell rate maps
//!
//! ```rust
//! use rand::SeedableRng;
//! use spatial_cells::{
//!     distribution::Distribution,
//!     environment::{EnvironmentParameters, RectangularEnvironment},
//!     error::SpatialCellsError,
//!     neuron::{NeuronParameters, grid_cells::{GridCells, GridCellParameters}},
//! };
//!
//! fn main() -> Result<(), SpatialCellsError> {
//!     let mut rng = rand::rngs::StdRng::seed_from_u64(0);
//!
//!     let environment = RectangularEnvironment::new(EnvironmentParameters {
//!         dx: 0.05,
//!         ..EnvironmentParameters::default()
//!     })?;
//!
//!     // three modules of grid cells sharing a scale
//!     let grid_cells = GridCells::new(
//!         environment,
//!         GridCellParameters {
//!             neurons: NeuronParameters { n: 6, ..NeuronParameters::default() },
//!             gridscale: Distribution::new("modules", [0.3, 0.5, 0.8]).into(),
//!             ..GridCellParameters::default()
//!         },
//!         &mut rng,
//!     )?;
//!
//!     let (coords, rates) = grid_cells.rate_map()?;
//!     assert_eq!(coords.nrows(), 400);
//!     assert_eq!(rates.dim(), (6, 400));
//!
//!     Ok(())
//! }
//! ```

pub mod agent;
pub mod config;
pub mod distribution;
pub mod environment;
pub mod error;
pub mod neuron;

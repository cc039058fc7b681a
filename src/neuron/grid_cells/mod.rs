//! Grid cells, neurons with periodic firing fields built from a sum of plane waves.
//!
//! The hexagonal layout sums three cosines whose directions are 60° apart, the
//! rectangular layout sums two orthogonal cosines. In 1D a single cosine is used.
//! Scales, orientations and phase offsets are drawn once per neuron from a
//! [`Distribution`] when the population is built.

use std::{
    f64::consts::{PI, TAU},
    fmt::{Display, Formatter},
    str::FromStr,
};
use ndarray::{Array1, Array2, Array3, ArrayView2, Axis};
use rand::Rng;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::warn;
use crate::{
    distribution::Distribution,
    environment::{Dimensionality, Environment},
    error::{EnvironmentError, NeuronError, SpatialCellsError},
};
use super::{NeuronParameters, Neurons, TuningCurve};


const HEXAGONAL_ROTATIONS: [f64; 3] = [0., PI / 3., 2. * PI / 3.];
const RECTANGULAR_ROTATIONS: [f64; 2] = [0., PI / 2.];

/// Normalization applied to the summed cosines
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GridCellDescription {
    /// Cosines shifted down by a threshold set by `width_ratio` and clipped at `0.`,
    /// giving sharp fields separated by silence
    RectifiedCosines,
    /// Cosines shifted and scaled into `[0, 1]`, giving smooth oscillations
    ShiftedCosines,
}

impl GridCellDescription {
    /// Name used in configuration files
    pub fn as_str(&self) -> &'static str {
        match self {
            GridCellDescription::RectifiedCosines => "rectified_cosines",
            GridCellDescription::ShiftedCosines => "shifted_cosines",
        }
    }
}

impl Display for GridCellDescription {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for GridCellDescription {
    type Err = NeuronError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "rectified_cosines" => Ok(GridCellDescription::RectifiedCosines),
            "shifted_cosines" => Ok(GridCellDescription::ShiftedCosines),
            other => Err(NeuronError::UnknownDescription(other.to_string())),
        }
    }
}

/// Arrangement of the plane waves making up a grid cell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GridLayout {
    /// Three cosines at 0°, 60° and 120°, hexagonal fields
    Hexagonal,
    /// Two cosines at 0° and 90°, rectangular fields
    Rectangular,
}

impl GridLayout {
    /// Rotations applied to each neuron's orientation to get its wave directions
    pub fn rotations(&self) -> &'static [f64] {
        match self {
            GridLayout::Hexagonal => &HEXAGONAL_ROTATIONS,
            GridLayout::Rectangular => &RECTANGULAR_ROTATIONS,
        }
    }

    // threshold subtracted from the mean of the cosines before rectifying
    fn threshold(&self, width_ratio: f64) -> f64 {
        match self {
            GridLayout::Hexagonal => (2. * (3_f64.sqrt() * PI * width_ratio / 2.).cos() + 1.) / 3.,
            GridLayout::Rectangular => (2_f64.sqrt() * PI * width_ratio / 2.).cos(),
        }
    }

    fn shift(&self, mean: f64) -> f64 {
        match self {
            GridLayout::Hexagonal => (2. / 3.) * (mean + 0.5),
            GridLayout::Rectangular => 0.5 * (mean + 1.),
        }
    }
}

/// Per neuron values that are either drawn from a distribution or given explicitly
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParameterValues {
    /// One value per neuron drawn from the distribution
    Sampled(Distribution),
    /// One value per neuron
    Explicit(Vec<f64>),
}

impl From<Distribution> for ParameterValues {
    fn from(distribution: Distribution) -> Self {
        ParameterValues::Sampled(distribution)
    }
}

impl From<Vec<f64>> for ParameterValues {
    fn from(values: Vec<f64>) -> Self {
        ParameterValues::Explicit(values)
    }
}

/// Parameters of a population of grid cells
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GridCellParameters {
    /// Parameters shared by every population
    pub neurons: NeuronParameters,
    /// Spatial period of each neuron (m), explicit values set the number of neurons
    pub gridscale: ParameterValues,
    /// Orientation of each neuron (radians), only used in 2D
    pub orientation: ParameterValues,
    /// Phase offset of each neuron in each dimension (radians)
    pub phase_offset: Distribution,
    /// Normalization of the summed cosines
    pub description: GridCellDescription,
    /// Width of the firing fields relative to the scale for rectified cosines, within `(0, 1]`
    pub width_ratio: f64,
}

impl Default for GridCellParameters {
    fn default() -> Self {
        GridCellParameters {
            neurons: NeuronParameters {
                name: String::from("GridCells"),
                ..NeuronParameters::default()
            },
            gridscale: ParameterValues::Sampled(Distribution::new("uniform", [0.5, 1.])),
            orientation: ParameterValues::Sampled(Distribution::new("uniform", [0., TAU])),
            phase_offset: Distribution::new("uniform", [0., TAU]),
            description: GridCellDescription::RectifiedCosines,
            width_ratio: 4. / (3. * 3_f64.sqrt()),
        }
    }
}

/// Tuning curve of a population of grid cells
#[derive(Debug, Clone)]
pub struct GridCellTuning<E: Environment> {
    environment: E,
    layout: GridLayout,
    gridscales: Array1<f64>,
    orientations: Option<Array1<f64>>,
    phase_offsets: Array2<f64>,
    direction_vectors: Option<Array3<f64>>,
    description: GridCellDescription,
    width_ratio: f64,
}

/// Unit vectors `[cos(θ + α), sin(θ + α)]` for each orientation `θ` and rotation `α`,
/// returns an `n × rotations × 2` array
pub fn direction_vectors(orientations: &Array1<f64>, rotations: &[f64]) -> Array3<f64> {
    Array3::from_shape_fn((orientations.len(), rotations.len(), 2), |(i, k, axis)| {
        let angle = orientations[i] + rotations[k];

        match axis {
            0 => angle.cos(),
            _ => angle.sin(),
        }
    })
}

impl<E: Environment> GridCellTuning<E> {
    /// Gets the arrangement of the plane waves
    pub fn layout(&self) -> GridLayout {
        self.layout
    }

    /// Gets the spatial period of each neuron (m)
    pub fn gridscales(&self) -> &Array1<f64> {
        &self.gridscales
    }

    /// Gets the orientation of each neuron (radians), `None` in 1D
    pub fn orientations(&self) -> Option<&Array1<f64>> {
        self.orientations.as_ref()
    }

    /// Gets the `n × D` phase offsets (radians)
    pub fn phase_offsets(&self) -> &Array2<f64> {
        &self.phase_offsets
    }

    /// Gets the `n × K × 2` wave directions, `None` in 1D
    pub fn direction_vectors(&self) -> Option<&Array3<f64>> {
        self.direction_vectors.as_ref()
    }

    /// Gets the normalization applied to the summed cosines
    pub fn description(&self) -> GridCellDescription {
        self.description
    }

    /// Gets the field width relative to the scale used by rectified cosines
    pub fn width_ratio(&self) -> f64 {
        self.width_ratio
    }

    fn normalize(&self, mean: f64, threshold: f64) -> f64 {
        match self.description {
            GridCellDescription::RectifiedCosines => ((mean - threshold) / (1. - threshold)).max(0.),
            GridCellDescription::ShiftedCosines => self.layout.shift(mean),
        }
    }

    fn firing_rate_1d(&self, positions: ArrayView2<f64>) -> Array2<f64> {
        let threshold = (self.width_ratio * PI).cos();

        Array2::from_shape_fn((self.gridscales.len(), positions.nrows()), |(i, j)| {
            let phase = TAU / self.gridscales[i] * positions[[j, 0]] - self.phase_offsets[[i, 0]];
            let raw = phase.cos();

            match self.description {
                GridCellDescription::RectifiedCosines => ((raw - threshold) / (1. - threshold)).max(0.),
                GridCellDescription::ShiftedCosines => 0.5 * (raw + 1.),
            }
        })
    }

    fn firing_rate_2d(
        &self,
        positions: ArrayView2<f64>,
        directions: &Array3<f64>,
    ) -> Result<Array2<f64>, SpatialCellsError> {
        if positions.ncols() != 2 {
            return Err(EnvironmentError::PositionDimensionMismatch {
                expected: 2,
                found: positions.ncols(),
            }.into());
        }

        let n = self.gridscales.len();
        let waves = directions.dim().1;
        let threshold = self.layout.threshold(self.width_ratio);

        // displacement from each neuron's lattice origin, never wrapped at periodic edges
        let rows: Vec<Vec<f64>> = (0..n).into_par_iter()
            .map(|i| {
                let frequency = TAU / self.gridscales[i];
                let origin = [
                    self.gridscales[i] * self.phase_offsets[[i, 0]] / TAU,
                    self.gridscales[i] * self.phase_offsets[[i, 1]] / TAU,
                ];

                positions.axis_iter(Axis(0))
                    .map(|position| {
                        let vector = [origin[0] - position[0], origin[1] - position[1]];

                        let total: f64 = (0..waves)
                            .map(|k| {
                                let projection = vector[0] * directions[[i, k, 0]] +
                                    vector[1] * directions[[i, k, 1]];

                                (frequency * projection).cos()
                            })
                            .sum();

                        self.normalize(total / waves as f64, threshold)
                    })
                    .collect()
            })
            .collect();

        Ok(Array2::from_shape_fn((n, positions.nrows()), |(i, j)| rows[i][j]))
    }
}

impl<E: Environment> TuningCurve for GridCellTuning<E> {
    type E = E;

    fn environment(&self) -> &E {
        &self.environment
    }

    fn n(&self) -> usize {
        self.gridscales.len()
    }

    fn firing_rate_at(&self, positions: ArrayView2<f64>) -> Result<Array2<f64>, SpatialCellsError> {
        match &self.direction_vectors {
            Some(directions) => self.firing_rate_2d(positions, directions),
            None => {
                if positions.ncols() != 1 {
                    return Err(EnvironmentError::PositionDimensionMismatch {
                        expected: 1,
                        found: positions.ncols(),
                    }.into());
                }

                Ok(self.firing_rate_1d(positions))
            },
        }
    }
}

/// A population of grid cells
///
/// ```rust
/// # use spatial_cells::environment::RectangularEnvironment;
/// # use spatial_cells::distribution::Distribution;
/// # use spatial_cells::neuron::{PositionSelection, grid_cells::{GridCells, GridCellParameters}};
/// # use rand::SeedableRng;
/// let mut rng = rand::rngs::StdRng::seed_from_u64(0);
///
/// let grid_cells = GridCells::new(
///     RectangularEnvironment::default_impl(),
///     GridCellParameters {
///         gridscale: vec![0.3, 0.5].into(),
///         ..GridCellParameters::default()
///     },
///     &mut rng,
/// ).unwrap();
///
/// assert_eq!(grid_cells.n(), 2);
/// let (coords, rates) = grid_cells.rate_map().unwrap();
/// assert_eq!(rates.dim(), (2, coords.nrows()));
/// ```
pub type GridCells<E> = Neurons<GridCellTuning<E>>;

impl<E: Environment> Neurons<GridCellTuning<E>> {
    fn build<R: Rng>(
        environment: E,
        params: GridCellParameters,
        layout: GridLayout,
        rng: &mut R,
    ) -> Result<Self, SpatialCellsError> {
        let gridscales = match &params.gridscale {
            ParameterValues::Explicit(values) => Array1::from(values.clone()),
            ParameterValues::Sampled(distribution) => distribution.sample_1d(params.neurons.n, rng)?,
        };
        if let Some(value) = gridscales.iter().find(|i| !(i.is_finite() && **i > 0.)) {
            return Err(NeuronError::NonPositiveParameter { parameter: "gridscale", value: *value }.into());
        }
        let n = gridscales.len();

        let phase_offsets = params.phase_offset.sample(n, environment.dims(), rng)?;

        let (orientations, directions) = match environment.dimensionality() {
            Dimensionality::D1 => (None, None),
            Dimensionality::D2 => {
                let orientations = match &params.orientation {
                    ParameterValues::Explicit(values) => {
                        if values.len() != n {
                            return Err(NeuronError::ParameterLengthMismatch {
                                parameter: "orientation",
                                expected: n,
                                found: values.len(),
                            }.into());
                        }

                        Array1::from(values.clone())
                    },
                    ParameterValues::Sampled(distribution) => distribution.sample_1d(n, rng)?,
                };
                let directions = direction_vectors(&orientations, layout.rotations());

                (Some(orientations), Some(directions))
            },
        };

        if params.description == GridCellDescription::RectifiedCosines &&
            !(params.width_ratio > 0. && params.width_ratio <= 1.) {
            warn!(
                name = %params.neurons.name,
                width_ratio = params.width_ratio,
                "width_ratio should be within (0, 1] for rectified cosines"
            );
        }

        let tuning = GridCellTuning {
            environment,
            layout,
            gridscales,
            orientations,
            phase_offsets,
            direction_vectors: directions,
            description: params.description,
            width_ratio: params.width_ratio,
        };

        Neurons::from_tuning(tuning, &params.neurons)
    }

    /// Generates a population of hexagonal (three cosine) grid cells
    pub fn new<R: Rng>(environment: E, params: GridCellParameters, rng: &mut R) -> Result<Self, SpatialCellsError> {
        Self::build(environment, params, GridLayout::Hexagonal, rng)
    }

    /// Generates a population of rectangular (two cosine) grid cells, errors
    /// if the environment is not 2D
    pub fn new_rectangular<R: Rng>(
        environment: E,
        params: GridCellParameters,
        rng: &mut R,
    ) -> Result<Self, SpatialCellsError> {
        if environment.dimensionality() != Dimensionality::D2 {
            return Err(NeuronError::RequiresTwoDimensions.into());
        }

        Self::build(environment, params, GridLayout::Rectangular, rng)
    }

    /// Gets the spatial period of each neuron (m)
    pub fn gridscales(&self) -> &Array1<f64> {
        self.tuning.gridscales()
    }

    /// Gets the orientation of each neuron (radians), `None` in 1D
    pub fn orientations(&self) -> Option<&Array1<f64>> {
        self.tuning.orientations()
    }

    /// Gets the `n × D` phase offsets (radians)
    pub fn phase_offsets(&self) -> &Array2<f64> {
        self.tuning.phase_offsets()
    }

    /// Gets the `n × K × 2` wave directions, `None` in 1D
    pub fn direction_vectors(&self) -> Option<&Array3<f64>> {
        self.tuning.direction_vectors()
    }

    /// Gets the arrangement of the plane waves
    pub fn layout(&self) -> GridLayout {
        self.tuning.layout()
    }
}

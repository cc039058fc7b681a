//! Place cells, neurons that fire when the agent is near a fixed location (the
//! neuron's centre), with the shape of the receptive field set by a [`PlaceCellDescription`].

use std::{fmt::{Display, Formatter}, str::FromStr};
use ndarray::{Array1, Array2, ArrayView2, Axis};
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::warn;
use crate::{
    environment::{BoundaryConditions, Environment, SamplingMethod, WallGeometry},
    error::{EnvironmentError, NeuronError, SpatialCellsError},
};
use super::{NeuronParameters, Neurons, TuningCurve};


/// Ratio between the widths of the inhibitory and excitatory gaussians
/// of the difference of gaussians receptive field
pub const DIFF_OF_GAUSSIANS_RATIO: f64 = 1.5;

/// Shape of the receptive field of a place cell given the distance `d` from its
/// centre and its width `w`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlaceCellDescription {
    /// `exp(-d² / 2w²)`
    Gaussian,
    /// Gaussian cut off at one width and rescaled back to `[0, 1]`
    GaussianThreshold,
    /// Gaussian minus a wider gaussian, normalized to peak at `1.`
    DiffOfGaussians,
    /// `1.` for whichever neuron is closest to the position, `0.` otherwise
    OneHot,
    /// `1.` within one width of the centre, `0.` otherwise
    TopHat,
}

impl PlaceCellDescription {
    /// Name used in configuration files
    pub fn as_str(&self) -> &'static str {
        match self {
            PlaceCellDescription::Gaussian => "gaussian",
            PlaceCellDescription::GaussianThreshold => "gaussian_threshold",
            PlaceCellDescription::DiffOfGaussians => "diff_of_gaussians",
            PlaceCellDescription::OneHot => "one_hot",
            PlaceCellDescription::TopHat => "top_hat",
        }
    }
}

impl Display for PlaceCellDescription {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for PlaceCellDescription {
    type Err = NeuronError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "gaussian" => Ok(PlaceCellDescription::Gaussian),
            "gaussian_threshold" => Ok(PlaceCellDescription::GaussianThreshold),
            "diff_of_gaussians" => Ok(PlaceCellDescription::DiffOfGaussians),
            "one_hot" => Ok(PlaceCellDescription::OneHot),
            "top_hat" => Ok(PlaceCellDescription::TopHat),
            other => Err(NeuronError::UnknownDescription(other.to_string())),
        }
    }
}

/// Where place cell centres come from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PlaceCellCentres {
    /// Sampled from the environment with the given method
    Sampled(SamplingMethod),
    /// One explicit position per neuron, sets the number of neurons
    Explicit(Vec<Vec<f64>>),
}

/// Parameters of a population of place cells
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PlaceCellParameters {
    /// Parameters shared by every population
    pub neurons: NeuronParameters,
    /// Centres of the place cells, sampled with `uniform_jitter` if not given
    pub place_cell_centres: Option<PlaceCellCentres>,
    /// Width of every receptive field (m)
    pub widths: f64,
    /// Shape of the receptive fields
    pub description: PlaceCellDescription,
    /// Distance metric between centres and positions
    pub wall_geometry: WallGeometry,
}

impl Default for PlaceCellParameters {
    fn default() -> Self {
        PlaceCellParameters {
            neurons: NeuronParameters {
                name: String::from("PlaceCells"),
                ..NeuronParameters::default()
            },
            place_cell_centres: None,
            widths: 0.2,
            description: PlaceCellDescription::Gaussian,
            wall_geometry: WallGeometry::Geodesic,
        }
    }
}

/// Tuning curve of a population of place cells
#[derive(Debug, Clone)]
pub struct PlaceCellTuning<E: Environment> {
    environment: E,
    place_cell_centres: Array2<f64>,
    place_cell_widths: Array1<f64>,
    description: PlaceCellDescription,
    wall_geometry: WallGeometry,
}

impl<E: Environment> PlaceCellTuning<E> {
    /// Gets the `n × D` centres
    pub fn place_cell_centres(&self) -> &Array2<f64> {
        &self.place_cell_centres
    }

    /// Gets the width of each receptive field (m)
    pub fn place_cell_widths(&self) -> &Array1<f64> {
        &self.place_cell_widths
    }

    /// Gets the response shape of the receptive fields
    pub fn description(&self) -> PlaceCellDescription {
        self.description
    }

    /// Gets the distance metric in use, may differ from the requested one
    /// if the environment is periodic
    pub fn wall_geometry(&self) -> WallGeometry {
        self.wall_geometry
    }
}

fn gaussian(distance: f64, width: f64) -> f64 {
    (-distance.powi(2) / (2. * width.powi(2))).exp()
}

fn gaussian_threshold(distance: f64, width: f64) -> f64 {
    let threshold = (-0.5_f64).exp();

    (gaussian(distance, width) - threshold).max(0.) / (1. - threshold)
}

fn diff_of_gaussians(distance: f64, width: f64) -> f64 {
    let ratio = DIFF_OF_GAUSSIANS_RATIO;
    let inhibitory = gaussian(distance, ratio * width) / ratio.powi(2);

    (gaussian(distance, width) - inhibitory) * ratio.powi(2) / (ratio.powi(2) - 1.)
}

fn top_hat(distance: f64, width: f64) -> f64 {
    if distance < width { 1. } else { 0. }
}

// 1 for the closest centre to each position (column), ties go to the lowest index
fn one_hot(distances: &Array2<f64>) -> Array2<f64> {
    let mut firingrate = Array2::zeros(distances.dim());

    for (position, column) in distances.axis_iter(Axis(1)).enumerate() {
        let closest = column.iter()
            .enumerate()
            .fold(None, |closest: Option<(usize, f64)>, (neuron, distance)| match closest {
                Some((_, best)) if best <= *distance => closest,
                _ if distance.is_nan() => closest,
                _ => Some((neuron, *distance)),
            });

        if let Some((neuron, _)) = closest {
            firingrate[[neuron, position]] = 1.;
        }
    }

    firingrate
}

impl<E: Environment> TuningCurve for PlaceCellTuning<E> {
    type E = E;

    fn environment(&self) -> &E {
        &self.environment
    }

    fn n(&self) -> usize {
        self.place_cell_centres.nrows()
    }

    fn firing_rate_at(&self, positions: ArrayView2<f64>) -> Result<Array2<f64>, SpatialCellsError> {
        let distances = self.environment.get_distances_between(
            self.place_cell_centres.view(),
            positions,
            self.wall_geometry,
        )?;

        let response: fn(f64, f64) -> f64 = match self.description {
            PlaceCellDescription::Gaussian => gaussian,
            PlaceCellDescription::GaussianThreshold => gaussian_threshold,
            PlaceCellDescription::DiffOfGaussians => diff_of_gaussians,
            PlaceCellDescription::TopHat => top_hat,
            PlaceCellDescription::OneHot => return Ok(one_hot(&distances)),
        };

        let mut firingrate = distances;
        for (mut row, width) in firingrate.axis_iter_mut(Axis(0)).zip(self.place_cell_widths.iter()) {
            row.mapv_inplace(|distance| response(distance, *width));
        }

        Ok(firingrate)
    }
}

/// A population of place cells
///
/// ```rust
/// # use spatial_cells::environment::RectangularEnvironment;
/// # use spatial_cells::neuron::{PositionSelection, place_cells::{PlaceCells, PlaceCellParameters, PlaceCellCentres}};
/// # use ndarray::array;
/// # use rand::SeedableRng;
/// let mut rng = rand::rngs::StdRng::seed_from_u64(0);
///
/// let place_cells = PlaceCells::new(
///     RectangularEnvironment::default_impl(),
///     PlaceCellParameters {
///         place_cell_centres: Some(PlaceCellCentres::Explicit(vec![vec![0.5, 0.5]])),
///         ..PlaceCellParameters::default()
///     },
///     &mut rng,
/// ).unwrap();
///
/// let positions = array![[0.5, 0.5], [0., 0.]];
/// let rates = place_cells.get_state(PositionSelection::Explicit(positions.view())).unwrap();
/// assert!((rates[[0, 0]] - 1.).abs() < 1e-12);
/// assert!(rates[[0, 1]] < 0.1);
/// ```
pub type PlaceCells<E> = Neurons<PlaceCellTuning<E>>;

impl<E: Environment> Neurons<PlaceCellTuning<E>> {
    /// Generates a population of place cells in the given environment, centres
    /// are sampled with `rng` unless given explicitly
    pub fn new<R: Rng>(
        environment: E,
        params: PlaceCellParameters,
        rng: &mut R,
    ) -> Result<Self, SpatialCellsError> {
        let dims = environment.dims();

        let place_cell_centres = match &params.place_cell_centres {
            None => environment.sample_positions(params.neurons.n, SamplingMethod::UniformJitter, rng),
            Some(PlaceCellCentres::Sampled(method)) => environment.sample_positions(params.neurons.n, *method, rng),
            Some(PlaceCellCentres::Explicit(centres)) => {
                if let Some(row) = centres.iter().find(|row| row.len() != dims) {
                    return Err(EnvironmentError::PositionDimensionMismatch {
                        expected: dims,
                        found: row.len(),
                    }.into());
                }

                Array2::from_shape_fn((centres.len(), dims), |(i, j)| centres[i][j])
            },
        };

        let mut wall_geometry = params.wall_geometry;
        if environment.boundary_conditions() == BoundaryConditions::Periodic &&
            wall_geometry != WallGeometry::Euclidean {
            warn!(
                name = %params.neurons.name,
                requested = %wall_geometry,
                "{} wall geometry only works with solid boundaries, switching to euclidean", wall_geometry
            );
            wall_geometry = WallGeometry::Euclidean;
        }

        let tuning = PlaceCellTuning {
            place_cell_widths: Array1::from_elem(place_cell_centres.nrows(), params.widths),
            place_cell_centres,
            description: params.description,
            wall_geometry,
            environment,
        };

        Neurons::from_tuning(tuning, &params.neurons)
    }

    /// Gets the `n × D` centres
    pub fn place_cell_centres(&self) -> &Array2<f64> {
        self.tuning.place_cell_centres()
    }

    /// Gets the width of each receptive field (m)
    pub fn place_cell_widths(&self) -> &Array1<f64> {
        self.tuning.place_cell_widths()
    }

    /// Replaces every centre with a fresh `uniform_jitter` sample, history is kept
    pub fn remap<R: Rng>(&mut self, rng: &mut R) {
        let tuning = &mut self.tuning;
        tuning.place_cell_centres = tuning.environment.sample_positions(self.n, SamplingMethod::UniformJitter, rng);
    }
}

//! The environment a population is bound to, it provides the discretised positions
//! used for rate maps, position sampling for place cell centres, and the distance
//! and vector computations between sets of positions.

use std::{fmt::{Display, Formatter}, str::FromStr};
use ndarray::{Array2, Array3, ArrayView2, Axis};
use rand::Rng;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::debug;
use crate::error::EnvironmentError;


/// Number of spatial dimensions of an environment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Dimensionality {
    #[serde(rename = "1D")]
    D1,
    #[serde(rename = "2D")]
    D2,
}

impl Dimensionality {
    /// Name used in configuration files
    pub fn as_str(&self) -> &'static str {
        match self {
            Dimensionality::D1 => "1D",
            Dimensionality::D2 => "2D",
        }
    }

    /// Number of columns a position has in this dimensionality
    pub fn dims(&self) -> usize {
        match self {
            Dimensionality::D1 => 1,
            Dimensionality::D2 => 2,
        }
    }
}

impl Display for Dimensionality {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Dimensionality {
    type Err = EnvironmentError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "1D" | "1d" => Ok(Dimensionality::D1),
            "2D" | "2d" => Ok(Dimensionality::D2),
            other => Err(EnvironmentError::UnknownDimensionality(other.to_string())),
        }
    }
}

/// Behavior of the environment at its edges
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BoundaryConditions {
    Solid,
    Periodic,
}

impl BoundaryConditions {
    /// Name used in configuration files
    pub fn as_str(&self) -> &'static str {
        match self {
            BoundaryConditions::Solid => "solid",
            BoundaryConditions::Periodic => "periodic",
        }
    }
}

impl Display for BoundaryConditions {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for BoundaryConditions {
    type Err = EnvironmentError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_lowercase().as_str() {
            "solid" => Ok(BoundaryConditions::Solid),
            "periodic" => Ok(BoundaryConditions::Periodic),
            _ => Err(EnvironmentError::UnknownBoundaryConditions(value.to_string())),
        }
    }
}

/// Method used to scatter positions across the environment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SamplingMethod {
    /// Independent uniform draws over the environment
    Random,
    /// Centres of a regular grid of cells
    Uniform,
    /// Centres of a regular grid of cells, each moved randomly within its cell
    UniformJitter,
}

impl SamplingMethod {
    /// Name used in configuration files
    pub fn as_str(&self) -> &'static str {
        match self {
            SamplingMethod::Random => "random",
            SamplingMethod::Uniform => "uniform",
            SamplingMethod::UniformJitter => "uniform_jitter",
        }
    }
}

impl Display for SamplingMethod {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for SamplingMethod {
    type Err = EnvironmentError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "random" => Ok(SamplingMethod::Random),
            "uniform" => Ok(SamplingMethod::Uniform),
            "uniform_jitter" => Ok(SamplingMethod::UniformJitter),
            other => Err(EnvironmentError::UnknownSamplingMethod(other.to_string())),
        }
    }
}

/// Distance metric between two positions, `line_of_sight` and `geodesic` account
/// for walls and only make sense with solid boundaries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WallGeometry {
    Euclidean,
    LineOfSight,
    Geodesic,
}

impl WallGeometry {
    /// Name used in configuration files
    pub fn as_str(&self) -> &'static str {
        match self {
            WallGeometry::Euclidean => "euclidean",
            WallGeometry::LineOfSight => "line_of_sight",
            WallGeometry::Geodesic => "geodesic",
        }
    }
}

impl Display for WallGeometry {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for WallGeometry {
    type Err = EnvironmentError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "euclidean" => Ok(WallGeometry::Euclidean),
            "line_of_sight" => Ok(WallGeometry::LineOfSight),
            "geodesic" => Ok(WallGeometry::Geodesic),
            other => Err(EnvironmentError::UnknownWallGeometry(other.to_string())),
        }
    }
}

/// Geometry a population of spatially tuned neurons is evaluated in
pub trait Environment: Clone + Send + Sync {
    /// Gets whether the environment is 1D or 2D
    fn dimensionality(&self) -> Dimensionality;
    /// Gets the boundary conditions
    fn boundary_conditions(&self) -> BoundaryConditions;
    /// Every position of the discretised environment as an `N × D` array
    fn discretised_coords(&self) -> Array2<f64>;
    /// Samples `n` positions inside the environment as an `n × D` array
    fn sample_positions<R: Rng>(&self, n: usize, method: SamplingMethod, rng: &mut R) -> Array2<f64>;
    /// Distance from each of the `centres` to each of the `positions`,
    /// returns a `centres × positions` matrix
    fn get_distances_between(
        &self,
        centres: ArrayView2<f64>,
        positions: ArrayView2<f64>,
        wall_geometry: WallGeometry,
    ) -> Result<Array2<f64>, EnvironmentError>;
    /// Vectors `pos1[i] - pos2[j]` for every pair, returns a `pos1 × pos2 × D` array
    fn get_vectors_between(
        &self,
        pos1: ArrayView2<f64>,
        pos2: ArrayView2<f64>,
    ) -> Result<Array3<f64>, EnvironmentError>;

    /// Number of columns a position has in this environment
    fn dims(&self) -> usize {
        self.dimensionality().dims()
    }
}

/// Parameters of a [`RectangularEnvironment`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EnvironmentParameters {
    /// Whether the environment is 1D or 2D
    pub dimensionality: Dimensionality,
    /// Solid or periodic edges
    pub boundary_conditions: BoundaryConditions,
    /// `[min_x, max_x]` in 1D or `[min_x, max_x, min_y, max_y]` in 2D,
    /// defaults to the unit interval or unit square
    pub extent: Option<Vec<f64>>,
    /// Discretisation step (m)
    pub dx: f64,
}

impl Default for EnvironmentParameters {
    fn default() -> Self {
        EnvironmentParameters {
            dimensionality: Dimensionality::D2,
            boundary_conditions: BoundaryConditions::Solid,
            extent: None,
            dx: 0.01,
        }
    }
}

/// A rectangular (or linear in 1D) arena without interior walls, distances
/// are Euclidean and wrap around the edges when boundaries are periodic
///
/// ```rust
/// # use spatial_cells::environment::{Environment, RectangularEnvironment, EnvironmentParameters};
/// let env = RectangularEnvironment::new(EnvironmentParameters {
///     dx: 0.1,
///     ..EnvironmentParameters::default()
/// }).unwrap();
///
/// let coords = env.discretised_coords();
/// assert_eq!(coords.dim(), (100, 2));
/// assert!((coords[[0, 0]] - 0.05).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct RectangularEnvironment {
    dimensionality: Dimensionality,
    boundary_conditions: BoundaryConditions,
    extent: Vec<f64>,
    dx: f64,
}

impl Default for RectangularEnvironment {
    fn default() -> Self {
        RectangularEnvironment {
            dimensionality: Dimensionality::D2,
            boundary_conditions: BoundaryConditions::Solid,
            extent: vec![0., 1., 0., 1.],
            dx: 0.01,
        }
    }
}

impl RectangularEnvironment {
    /// Builds the environment, errors if the extent or discretisation is invalid
    pub fn new(params: EnvironmentParameters) -> Result<Self, EnvironmentError> {
        let extent = match params.extent {
            Some(extent) => extent,
            None => match params.dimensionality {
                Dimensionality::D1 => vec![0., 1.],
                Dimensionality::D2 => vec![0., 1., 0., 1.],
            },
        };

        if extent.len() != 2 * params.dimensionality.dims() ||
            extent.iter().any(|i| !i.is_finite()) ||
            extent.chunks(2).any(|bounds| bounds[0] >= bounds[1]) {
            return Err(EnvironmentError::InvalidExtent);
        }
        if !(params.dx > 0.) || !params.dx.is_finite() {
            return Err(EnvironmentError::InvalidDiscretisation);
        }

        debug!(
            dimensionality = %params.dimensionality,
            boundary_conditions = %params.boundary_conditions,
            ?extent,
            dx = params.dx,
            "created rectangular environment"
        );

        Ok(RectangularEnvironment {
            dimensionality: params.dimensionality,
            boundary_conditions: params.boundary_conditions,
            extent,
            dx: params.dx,
        })
    }

    /// Returns the default 2D unit square with solid walls
    pub fn default_impl() -> Self {
        RectangularEnvironment::default()
    }

    /// Gets the extent of the environment
    pub fn extent(&self) -> &[f64] {
        &self.extent
    }

    /// Gets the discretisation step (m)
    pub fn dx(&self) -> f64 {
        self.dx
    }

    fn bounds(&self, axis: usize) -> (f64, f64) {
        (self.extent[2 * axis], self.extent[2 * axis + 1])
    }

    fn length(&self, axis: usize) -> f64 {
        let (min, max) = self.bounds(axis);

        max - min
    }

    /// Number of discretised cells along each axis (x first)
    pub fn discretised_shape(&self) -> Vec<usize> {
        (0..self.dims())
            .map(|axis| ((self.length(axis) / self.dx).round() as usize).max(1))
            .collect()
    }

    fn check_dims(&self, positions: &ArrayView2<f64>) -> Result<(), EnvironmentError> {
        if positions.ncols() != self.dims() {
            return Err(EnvironmentError::PositionDimensionMismatch {
                expected: self.dims(),
                found: positions.ncols(),
            });
        }

        Ok(())
    }

    // shortest displacement along one axis, wrapping across the edges if periodic
    fn displacement(&self, difference: f64, axis: usize) -> f64 {
        match self.boundary_conditions {
            BoundaryConditions::Solid => difference,
            BoundaryConditions::Periodic => {
                let length = self.length(axis);

                difference - length * (difference / length).round()
            }
        }
    }

    fn steps(&self, counts: &[usize]) -> Vec<f64> {
        counts.iter()
            .enumerate()
            .map(|(axis, count)| self.length(axis) / (*count).max(1) as f64)
            .collect()
    }

    // centres of a regular grid with `counts[axis]` cells per axis, first axis varies fastest
    fn grid_centres(&self, counts: &[usize]) -> Vec<Vec<f64>> {
        let steps = self.steps(counts);
        let total: usize = counts.iter().product();

        (0..total).map(|index| {
            let mut remainder = index;

            counts.iter()
                .enumerate()
                .map(|(axis, count)| {
                    let cell = remainder % count;
                    remainder /= count;

                    self.bounds(axis).0 + steps[axis] * (cell as f64 + 0.5)
                })
                .collect()
        })
        .collect()
    }

    fn random_position<R: Rng>(&self, rng: &mut R) -> Vec<f64> {
        (0..self.dims())
            .map(|axis| {
                let (min, max) = self.bounds(axis);

                rng.gen_range(min..=max)
            })
            .collect()
    }
}

fn to_array(positions: Vec<Vec<f64>>, dims: usize) -> Array2<f64> {
    Array2::from_shape_fn((positions.len(), dims), |(i, j)| positions[i][j])
}

impl Environment for RectangularEnvironment {
    fn dimensionality(&self) -> Dimensionality {
        self.dimensionality
    }

    fn boundary_conditions(&self) -> BoundaryConditions {
        self.boundary_conditions
    }

    fn discretised_coords(&self) -> Array2<f64> {
        to_array(self.grid_centres(&self.discretised_shape()), self.dims())
    }

    fn sample_positions<R: Rng>(&self, n: usize, method: SamplingMethod, rng: &mut R) -> Array2<f64> {
        let mut positions = match method {
            SamplingMethod::Random => Vec::with_capacity(n),
            SamplingMethod::Uniform | SamplingMethod::UniformJitter => {
                let counts = match self.dimensionality {
                    Dimensionality::D1 => vec![n],
                    Dimensionality::D2 => {
                        if n == 0 {
                            vec![0, 0]
                        } else {
                            let aspect = self.length(0) / self.length(1);
                            let nx = ((n as f64 * aspect).sqrt().floor() as usize).clamp(1, n);
                            let ny = (n / nx).max(1);

                            vec![nx, ny]
                        }
                    },
                };

                let mut positions = self.grid_centres(&counts);
                if method == SamplingMethod::UniformJitter {
                    let steps = self.steps(&counts);
                    for position in positions.iter_mut() {
                        for (value, step) in position.iter_mut().zip(steps.iter()) {
                            *value += rng.gen_range(-0.45 * step..=0.45 * step);
                        }
                    }
                }

                positions
            },
        };

        // whatever does not fit on the grid is scattered randomly
        while positions.len() < n {
            positions.push(self.random_position(rng));
        }

        to_array(positions, self.dims())
    }

    fn get_distances_between(
        &self,
        centres: ArrayView2<f64>,
        positions: ArrayView2<f64>,
        _wall_geometry: WallGeometry,
    ) -> Result<Array2<f64>, EnvironmentError> {
        // no interior walls, so every wall geometry reduces to the straight line distance
        let vectors = self.get_vectors_between(centres, positions)?;

        Ok(vectors.map_axis(Axis(2), |vector| vector.dot(&vector).sqrt()))
    }

    fn get_vectors_between(
        &self,
        pos1: ArrayView2<f64>,
        pos2: ArrayView2<f64>,
    ) -> Result<Array3<f64>, EnvironmentError> {
        self.check_dims(&pos1)?;
        self.check_dims(&pos2)?;

        let dims = self.dims();
        let (n1, n2) = (pos1.nrows(), pos2.nrows());

        let rows: Vec<Vec<f64>> = (0..n1).into_par_iter()
            .map(|i| {
                let mut row = Vec::with_capacity(n2 * dims);
                for j in 0..n2 {
                    for axis in 0..dims {
                        row.push(self.displacement(pos1[[i, axis]] - pos2[[j, axis]], axis));
                    }
                }

                row
            })
            .collect();

        Ok(Array3::from_shape_fn((n1, n2, dims), |(i, j, axis)| rows[i][j * dims + axis]))
    }
}

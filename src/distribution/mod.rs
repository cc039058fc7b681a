//! Samplers that draw per neuron parameters (scales, orientations, phases) from
//! named distributions.

use std::{fmt::{Display, Formatter}, str::FromStr};
use ndarray::{Array1, Array2, Axis};
use rand::Rng;
use serde::{Deserialize, Serialize};
use crate::error::DistributionError;


/// The distributions that can be sampled from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DistributionKind {
    /// Cycles through a small set of discrete values
    Modules,
    /// Independent uniform draws between a lower and upper bound
    Uniform,
    /// Every neuron takes the same value
    Delta,
}

impl DistributionKind {
    /// Name used in configuration files
    pub fn as_str(&self) -> &'static str {
        match self {
            DistributionKind::Modules => "modules",
            DistributionKind::Uniform => "uniform",
            DistributionKind::Delta => "delta",
        }
    }
}

impl Display for DistributionKind {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for DistributionKind {
    type Err = DistributionError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "modules" => Ok(DistributionKind::Modules),
            "uniform" => Ok(DistributionKind::Uniform),
            "delta" => Ok(DistributionKind::Delta),
            other => Err(DistributionError::UnknownDistribution(other.to_string())),
        }
    }
}

/// Parameters of a distribution, either a single scalar or an ordered list of values
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DistributionParams {
    Scalar(f64),
    Values(Vec<f64>),
}

impl From<f64> for DistributionParams {
    fn from(value: f64) -> Self {
        DistributionParams::Scalar(value)
    }
}

impl From<Vec<f64>> for DistributionParams {
    fn from(values: Vec<f64>) -> Self {
        DistributionParams::Values(values)
    }
}

impl<const N: usize> From<[f64; N]> for DistributionParams {
    fn from(values: [f64; N]) -> Self {
        DistributionParams::Values(values.to_vec())
    }
}

/// A named distribution with its parameters, sampled once per neuron
///
/// - `modules` : `params` is an ordered list of values that are assigned to neurons
/// round robin, so neuron `i` takes `params[i % params.len()]`
///
/// - `uniform` : `params` is either `[low, high]` or a scalar `s` which is
/// interpreted as `[0.5 * s, 1.5 * s]`
///
/// - `delta` : `params` is either a scalar given to every neuron or a vector
/// with one value per dimension given to every neuron
///
/// ```rust
/// # use spatial_cells::distribution::Distribution;
/// # use rand::SeedableRng;
/// let mut rng = rand::rngs::StdRng::seed_from_u64(0);
///
/// let modules = Distribution::new("modules", vec![1., 2., 3.]);
/// let values = modules.sample_1d(5, &mut rng).unwrap();
/// assert_eq!(values.to_vec(), vec![1., 2., 3., 1., 2.]);
///
/// let delta = Distribution::new("delta", 5.);
/// assert_eq!(delta.sample_1d(4, &mut rng).unwrap().to_vec(), vec![5.; 4]);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Distribution {
    /// Name of the distribution (`modules`, `uniform` or `delta`)
    pub name: String,
    /// Parameters of the distribution
    pub params: DistributionParams,
}

impl Distribution {
    pub fn new(name: &str, params: impl Into<DistributionParams>) -> Self {
        Distribution { name: name.to_string(), params: params.into() }
    }

    /// Draws one row of `dimension` values per neuron, returns an `n × dimension` array
    pub fn sample<R: Rng>(
        &self, n: usize, dimension: usize, rng: &mut R,
    ) -> Result<Array2<f64>, DistributionError> {
        sample_distribution(&self.name, &self.params, n, dimension, rng)
    }

    /// Draws one value per neuron, the `dimension == 1` case of [`Distribution::sample`]
    /// squeezed to a plain vector
    pub fn sample_1d<R: Rng>(&self, n: usize, rng: &mut R) -> Result<Array1<f64>, DistributionError> {
        Ok(self.sample(n, 1, rng)?.index_axis_move(Axis(1), 0))
    }
}

fn modules_values(params: &DistributionParams) -> Result<&[f64], DistributionError> {
    match params {
        DistributionParams::Values(values) if !values.is_empty() => Ok(values),
        _ => Err(DistributionError::MalformedParameters {
            distribution: "modules",
            expected: "a non-empty list of module values",
        }),
    }
}

fn scalar_bounds(s: f64) -> (f64, f64) {
    // a negative scalar flips the bounds
    ((0.5 * s).min(1.5 * s), (0.5 * s).max(1.5 * s))
}

fn uniform_bounds(params: &DistributionParams) -> Result<(f64, f64), DistributionError> {
    let malformed = DistributionError::MalformedParameters {
        distribution: "uniform",
        expected: "a scalar s (sampling [0.5s, 1.5s]) or [low, high] with low <= high",
    };

    let (low, high) = match params {
        DistributionParams::Scalar(s) => scalar_bounds(*s),
        DistributionParams::Values(values) => match values.as_slice() {
            [s] => scalar_bounds(*s),
            [low, high] => (*low, *high),
            _ => return Err(malformed),
        },
    };

    if !(low.is_finite() && high.is_finite()) || low > high {
        return Err(malformed);
    }

    Ok((low, high))
}

fn delta_row(params: &DistributionParams, dimension: usize) -> Result<Vec<f64>, DistributionError> {
    match params {
        DistributionParams::Scalar(value) => Ok(vec![*value; dimension]),
        DistributionParams::Values(values) if values.len() == 1 => Ok(vec![values[0]; dimension]),
        DistributionParams::Values(values) if values.len() == dimension => Ok(values.clone()),
        _ => Err(DistributionError::MalformedParameters {
            distribution: "delta",
            expected: "a scalar or a vector with one value per dimension",
        }),
    }
}

/// Samples `n` rows of `dimension` values from the named distribution, see [`Distribution`]
/// for the accepted parameters of each distribution
pub fn sample_distribution<R: Rng>(
    name: &str,
    params: &DistributionParams,
    n: usize,
    dimension: usize,
    rng: &mut R,
) -> Result<Array2<f64>, DistributionError> {
    let kind = DistributionKind::from_str(name)?;

    match kind {
        DistributionKind::Modules => {
            let values = modules_values(params)?;

            Ok(Array2::from_shape_fn((n, dimension), |(i, _)| values[i % values.len()]))
        },
        DistributionKind::Uniform => {
            let (low, high) = uniform_bounds(params)?;

            Ok(Array2::from_shape_simple_fn((n, dimension), || rng.gen_range(low..=high)))
        },
        DistributionKind::Delta => {
            let row = delta_row(params, dimension)?;

            Ok(Array2::from_shape_fn((n, dimension), |(_, j)| row[j]))
        },
    }
}

use std::fmt::{Display, Debug, Formatter, Result};


/// Error set for potential distribution sampling errors
#[derive(Clone, PartialEq)]
pub enum DistributionError {
    /// Distribution name is not one of `modules`, `uniform` or `delta`
    UnknownDistribution(String),
    /// Parameters do not have the shape the distribution expects
    MalformedParameters {
        /// Name of the distribution being sampled
        distribution: &'static str,
        /// Description of the expected parameter shape
        expected: &'static str,
    },
}

impl Display for DistributionError {
    fn fmt(&self, f: &mut Formatter) -> Result {
        match self {
            DistributionError::UnknownDistribution(name) => write!(
                f, "Unknown distribution '{}', expected one of 'modules', 'uniform' or 'delta'", name,
            ),
            DistributionError::MalformedParameters { distribution, expected } => write!(
                f, "Malformed parameters for '{}' distribution, expected {}", distribution, expected,
            ),
        }
    }
}

impl Debug for DistributionError {
    fn fmt(&self, f: &mut Formatter) -> Result {
        write!(f, "file: {}, line: {}, error: {}", file!(), line!(), self)
    }
}

/// Error set for potential environment errors
#[derive(Clone, PartialEq)]
pub enum EnvironmentError {
    /// Dimensionality is not `1D` or `2D`
    UnknownDimensionality(String),
    /// Boundary conditions are not `solid` or `periodic`
    UnknownBoundaryConditions(String),
    /// Position sampling method is not `random`, `uniform` or `uniform_jitter`
    UnknownSamplingMethod(String),
    /// Wall geometry is not `euclidean`, `line_of_sight` or `geodesic`
    UnknownWallGeometry(String),
    /// Extent does not contain 2 values for 1D or 4 values for 2D, or has no area
    InvalidExtent,
    /// Discretisation step must be positive
    InvalidDiscretisation,
    /// Positions do not have the same number of columns as the environment has dimensions
    PositionDimensionMismatch {
        /// Dimensions of the environment
        expected: usize,
        /// Columns of the given positions
        found: usize,
    },
}

impl Display for EnvironmentError {
    fn fmt(&self, f: &mut Formatter) -> Result {
        match self {
            EnvironmentError::UnknownDimensionality(value) => write!(
                f, "Unsupported dimensionality '{}', expected '1D' or '2D'", value,
            ),
            EnvironmentError::UnknownBoundaryConditions(value) => write!(
                f, "Unsupported boundary conditions '{}', expected 'solid' or 'periodic'", value,
            ),
            EnvironmentError::UnknownSamplingMethod(value) => write!(
                f, "Unsupported sampling method '{}', expected 'random', 'uniform' or 'uniform_jitter'", value,
            ),
            EnvironmentError::UnknownWallGeometry(value) => write!(
                f, "Unsupported wall geometry '{}', expected 'euclidean', 'line_of_sight' or 'geodesic'", value,
            ),
            EnvironmentError::InvalidExtent => write!(
                f, "Extent must be [min_x, max_x] in 1D or [min_x, max_x, min_y, max_y] in 2D with min < max",
            ),
            EnvironmentError::InvalidDiscretisation => write!(f, "Discretisation step dx must be positive"),
            EnvironmentError::PositionDimensionMismatch { expected, found } => write!(
                f, "Positions must have {} columns, found {}", expected, found,
            ),
        }
    }
}

impl Debug for EnvironmentError {
    fn fmt(&self, f: &mut Formatter) -> Result {
        write!(f, "file: {}, line: {}, error: {}", file!(), line!(), self)
    }
}

/// Error set for potential neuron population errors
#[derive(Clone, PartialEq)]
pub enum NeuronError {
    /// The tuning curve does not implement a firing rate computation
    GetStateNotImplemented,
    /// Neuron selection is not `all`, a count or a list of valid indices
    InvalidNeuronSelection(String),
    /// Description is not a known response shape for the population
    UnknownDescription(String),
    /// Rectangular (two cosine) grid cells only exist in 2D environments
    RequiresTwoDimensions,
    /// Population must contain at least one neuron
    EmptyPopulation,
    /// Explicit per-neuron parameters do not match the number of neurons
    ParameterLengthMismatch {
        /// Name of the parameter
        parameter: &'static str,
        /// Number of neurons in the population
        expected: usize,
        /// Number of values given
        found: usize,
    },
    /// Tuning curve returned a matrix that is not `n × positions`
    StateShapeMismatch,
    /// Per-neuron parameter must be positive and finite
    NonPositiveParameter {
        /// Name of the parameter
        parameter: &'static str,
        /// First offending value
        value: f64,
    },
}

impl Display for NeuronError {
    fn fmt(&self, f: &mut Formatter) -> Result {
        match self {
            NeuronError::GetStateNotImplemented => write!(
                f, "get_state is not implemented for this tuning curve, it must be implemented by a concrete population",
            ),
            NeuronError::InvalidNeuronSelection(selection) => write!(
                f, "Invalid neuron selection '{}', expected 'all', a number of neurons or a list of neuron indices", selection,
            ),
            NeuronError::UnknownDescription(description) => write!(f, "Unknown description '{}'", description),
            NeuronError::RequiresTwoDimensions => write!(f, "Rectangular grid cells require a 2D environment"),
            NeuronError::EmptyPopulation => write!(f, "Population must contain at least one neuron"),
            NeuronError::ParameterLengthMismatch { parameter, expected, found } => write!(
                f, "Expected {} values for '{}', found {}", expected, parameter, found,
            ),
            NeuronError::StateShapeMismatch => write!(
                f, "Tuning curve must return one row per neuron and one column per position",
            ),
            NeuronError::NonPositiveParameter { parameter, value } => write!(
                f, "Values of '{}' must be positive and finite, found {}", parameter, value,
            ),
        }
    }
}

impl Debug for NeuronError {
    fn fmt(&self, f: &mut Formatter) -> Result {
        write!(f, "file: {}, line: {}, error: {}", file!(), line!(), self)
    }
}

/// Error set for potential configuration loading errors
#[derive(Clone, PartialEq)]
pub enum ConfigError {
    /// Configuration file could not be read
    CannotReadFile(String),
    /// Configuration could not be parsed, includes unknown keys
    CannotParse(String),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter) -> Result {
        match self {
            ConfigError::CannotReadFile(msg) => write!(f, "Cannot read config: {}", msg),
            ConfigError::CannotParse(msg) => write!(f, "Cannot parse config: {}", msg),
        }
    }
}

impl Debug for ConfigError {
    fn fmt(&self, f: &mut Formatter) -> Result {
        write!(f, "file: {}, line: {}, error: {}", file!(), line!(), self)
    }
}

/// A set of errors that may occur when using the library
#[derive(Clone, PartialEq)]
pub enum SpatialCellsError {
    /// Errors related to distribution sampling
    DistributionRelatedError(DistributionError),
    /// Errors related to the environment
    EnvironmentRelatedError(EnvironmentError),
    /// Errors related to neuron populations
    NeuronRelatedError(NeuronError),
    /// Errors related to configuration loading
    ConfigRelatedError(ConfigError),
}

impl Display for SpatialCellsError {
    fn fmt(&self, f: &mut Formatter) -> Result {
        match self {
            SpatialCellsError::DistributionRelatedError(err) => write!(f, "{}", err),
            SpatialCellsError::EnvironmentRelatedError(err) => write!(f, "{}", err),
            SpatialCellsError::NeuronRelatedError(err) => write!(f, "{}", err),
            SpatialCellsError::ConfigRelatedError(err) => write!(f, "{}", err),
        }
    }
}

impl Debug for SpatialCellsError {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "file: {}, line: {}, error: {}", file!(), line!(), self)
    }
}

impl std::error::Error for SpatialCellsError {}

impl From<DistributionError> for SpatialCellsError {
    fn from(err: DistributionError) -> SpatialCellsError {
        SpatialCellsError::DistributionRelatedError(err)
    }
}

impl From<EnvironmentError> for SpatialCellsError {
    fn from(err: EnvironmentError) -> SpatialCellsError {
        SpatialCellsError::EnvironmentRelatedError(err)
    }
}

impl From<NeuronError> for SpatialCellsError {
    fn from(err: NeuronError) -> SpatialCellsError {
        SpatialCellsError::NeuronRelatedError(err)
    }
}

impl From<ConfigError> for SpatialCellsError {
    fn from(err: ConfigError) -> SpatialCellsError {
        SpatialCellsError::ConfigRelatedError(err)
    }
}

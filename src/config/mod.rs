//! Loading of environment and population parameters from TOML.
//!
//! Every parameter struct rejects keys it does not recognize, so a typo in a
//! config fails loudly instead of silently falling back to a default.
//!
//! ```toml
//! [environment]
//! dimensionality = "2D"
//! boundary_conditions = "solid"
//! dx = 0.02
//!
//! [place_cells]
//! widths = 0.1
//! description = "gaussian"
//!
//! [place_cells.neurons]
//! n = 20
//! max_fr = 10.0
//!
//! [grid_cells]
//! gridscale = { name = "modules", params = [0.3, 0.5, 0.8] }
//! description = "shifted_cosines"
//! ```

use std::{fs::read_to_string, path::Path};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use crate::{
    environment::EnvironmentParameters,
    error::ConfigError,
    neuron::{grid_cells::GridCellParameters, place_cells::PlaceCellParameters},
};


/// Environment plus any populations to build in it
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SimulationConfig {
    pub environment: EnvironmentParameters,
    pub place_cells: Option<PlaceCellParameters>,
    pub grid_cells: Option<GridCellParameters>,
}

/// Parses any parameter struct from a TOML string
pub fn from_toml_str<T: DeserializeOwned>(content: &str) -> Result<T, ConfigError> {
    toml::from_str(content).map_err(|e| ConfigError::CannotParse(e.to_string()))
}

/// Reads and parses any parameter struct from a TOML file
pub fn from_toml_file<T: DeserializeOwned, P: AsRef<Path>>(path: P) -> Result<T, ConfigError> {
    let content = read_to_string(path.as_ref())
        .map_err(|e| ConfigError::CannotReadFile(format!("{}: {}", path.as_ref().display(), e)))?;

    from_toml_str(&content)
}

use std::{
    env,
    fs::File,
    io::{BufWriter, Error, ErrorKind, Result, Write},
};
extern crate spatial_cells;
use ndarray::array;
use rand::{Rng, SeedableRng};
use spatial_cells::{
    agent::AgentState,
    config::{from_toml_file, SimulationConfig},
    environment::{Environment, RectangularEnvironment},
    neuron::{grid_cells::GridCells, place_cells::PlaceCells, HistoryArrays},
};


fn invalid_data<E: ToString>(error: E) -> Error {
    Error::new(ErrorKind::InvalidData, error.to_string())
}

fn write_history(filename: &str, history: &HistoryArrays) -> Result<()> {
    let mut file = BufWriter::new(File::create(filename)?);

    let header: Vec<String> = (0..history.firingrate.ncols()).map(|i| format!("neuron_{}", i)).collect();
    writeln!(file, "t,{}", header.join(","))?;

    for (row, t) in history.firingrate.rows().into_iter().zip(history.t.iter()) {
        let rates: Vec<String> = row.iter().map(|i| i.to_string()).collect();
        writeln!(file, "{},{}", t, rates.join(","))?;
    }

    Ok(())
}

// Reads an environment and populations from the given .toml file, moves an agent on a
// random walk through the environment and writes the firing rate history of each
// population to a .csv in the working directory
//
// cargo run --example simulate_from_config -- simulation.toml
fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        println!("Requires .toml argument file");
        return Err(Error::new(ErrorKind::InvalidInput, "Requires .toml argument file"));
    }

    let config: SimulationConfig = from_toml_file(&args[1]).map_err(invalid_data)?;
    let environment = RectangularEnvironment::new(config.environment).map_err(invalid_data)?;

    let mut rng = rand::rngs::StdRng::seed_from_u64(0);

    let mut place_cells = match config.place_cells {
        Some(params) => Some(PlaceCells::new(environment.clone(), params, &mut rng).map_err(invalid_data)?),
        None => None,
    };
    let mut grid_cells = match config.grid_cells {
        Some(params) => Some(GridCells::new(environment.clone(), params, &mut rng).map_err(invalid_data)?),
        None => None,
    };

    let iterations = 10000;
    let step_size = 0.005;
    let start = environment.discretised_coords().row(0).to_owned();
    let mut agent = AgentState::at(start, 0.01);

    let extent = environment.extent().to_vec();
    let dims = environment.dims();
    for _ in 0..iterations {
        let next = if dims == 1 {
            let step = if rng.gen::<bool>() { step_size } else { -step_size };

            array![(agent.pos[0] + step).clamp(extent[0], extent[1])]
        } else {
            let angle: f64 = rng.gen_range(0. ..std::f64::consts::TAU);

            array![
                (agent.pos[0] + step_size * angle.cos()).clamp(extent[0], extent[1]),
                (agent.pos[1] + step_size * angle.sin()).clamp(extent[2], extent[3]),
            ]
        };
        agent.move_to(next);

        if let Some(place_cells) = place_cells.as_mut() {
            place_cells.update(&agent, &mut rng).map_err(invalid_data)?;
        }
        if let Some(grid_cells) = grid_cells.as_mut() {
            grid_cells.update(&agent, &mut rng).map_err(invalid_data)?;
        }
    }

    if let Some(place_cells) = place_cells.as_mut() {
        write_history("place_cells.csv", place_cells.get_history_arrays())?;
    }
    if let Some(grid_cells) = grid_cells.as_mut() {
        write_history("grid_cells.csv", grid_cells.get_history_arrays())?;
    }

    Ok(())
}

use std::{
    fs::File,
    io::{BufWriter, Write},
};
extern crate spatial_cells;
use ndarray::array;
use rand::SeedableRng;
use spatial_cells::{
    agent::AgentState,
    environment::RectangularEnvironment,
    neuron::{
        NeuronParameters, NeuronSelection,
        place_cells::{PlaceCells, PlaceCellParameters},
    },
};


// Moves an agent around a circle in the unit square and records the firing rate
// and spikes of a population of place cells, .csv containing the history of a few
// of the neurons is written to a file in the working directory when the simulation is finished
fn main() {
    let mut rng = rand::rngs::StdRng::seed_from_u64(0);

    let mut place_cells = PlaceCells::new(
        RectangularEnvironment::default_impl(),
        PlaceCellParameters {
            neurons: NeuronParameters {
                n: 36,
                max_fr: 10.,
                noise_std: 0.5,
                noise_coherence_time: 0.2,
                ..NeuronParameters::default()
            },
            widths: 0.15,
            ..PlaceCellParameters::default()
        },
        &mut rng,
    ).expect("Could not create place cells");

    let iterations = 5000;
    let mut agent = AgentState::new(2, 0.01);

    for step in 0..iterations {
        let angle = step as f64 * 0.005;
        agent.move_to(array![0.5 + 0.35 * angle.cos(), 0.5 + 0.35 * angle.sin()]);

        place_cells.update(&agent, &mut rng).expect("Could not update place cells");
    }

    let neurons = place_cells.return_list_of_neurons(&NeuronSelection::Count(5))
        .expect("Could not select neurons");
    let history = place_cells.get_history_arrays();

    let mut file = BufWriter::new(File::create("place_cell_trajectory.csv")
        .expect("Could not create file"));

    let header: Vec<String> = neurons.iter()
        .flat_map(|i| [format!("firingrate_{}", i), format!("spikes_{}", i)])
        .collect();
    writeln!(file, "t,{}", header.join(",")).expect("Could not write to file");

    for (step, t) in history.t.iter().enumerate() {
        let row: Vec<String> = neurons.iter()
            .flat_map(|i| [
                history.firingrate[[step, *i]].to_string(),
                (history.spikes[[step, *i]] as u8).to_string(),
            ])
            .collect();

        writeln!(file, "{},{}", t, row.join(",")).expect("Could not write to file");
    }
}

use std::{
    fs::File,
    io::{BufWriter, Write},
};
extern crate spatial_cells;
use rand::SeedableRng;
use spatial_cells::{
    distribution::Distribution,
    environment::{EnvironmentParameters, RectangularEnvironment},
    neuron::{
        NeuronParameters,
        grid_cells::{GridCells, GridCellParameters},
    },
};


// Generates hexagonal and rectangular grid cells from three modules of scales and
// writes the rate map of every neuron over the discretised environment to a .csv
// in the working directory
fn main() {
    let mut rng = rand::rngs::StdRng::seed_from_u64(0);

    let environment = RectangularEnvironment::new(EnvironmentParameters {
        dx: 0.02,
        ..EnvironmentParameters::default()
    }).expect("Could not create environment");

    let params = GridCellParameters {
        neurons: NeuronParameters { n: 6, max_fr: 5., ..NeuronParameters::default() },
        gridscale: Distribution::new("modules", [0.2, 0.35, 0.6]).into(),
        ..GridCellParameters::default()
    };

    let hexagonal = GridCells::new(environment.clone(), params.clone(), &mut rng)
        .expect("Could not create grid cells");
    let rectangular = GridCells::new_rectangular(environment, params, &mut rng)
        .expect("Could not create grid cells");

    let (coords, hexagonal_rates) = hexagonal.rate_map().expect("Could not get rate map");
    let (_, rectangular_rates) = rectangular.rate_map().expect("Could not get rate map");

    let mut file = BufWriter::new(File::create("grid_cell_rate_maps.csv")
        .expect("Could not create file"));

    writeln!(file, "layout,neuron,gridscale,x,y,firingrate").expect("Could not write to file");
    for (layout, cells, rates) in [
        ("hexagonal", &hexagonal, &hexagonal_rates),
        ("rectangular", &rectangular, &rectangular_rates),
    ] {
        for (neuron, gridscale) in cells.gridscales().iter().enumerate() {
            for (position, coord) in coords.rows().into_iter().enumerate() {
                writeln!(
                    file,
                    "{},{},{},{},{},{}",
                    layout,
                    neuron,
                    gridscale,
                    coord[0],
                    coord[1],
                    rates[[neuron, position]],
                ).expect("Could not write to file");
            }
        }
    }
}

#![feature(test)]
extern crate test;


mod tests {
    use test::Bencher;
    extern crate ndarray;
    extern crate rand;
    extern crate spatial_cells;
    use ndarray::array;
    use rand::SeedableRng;
    use spatial_cells::{
        agent::AgentState,
        environment::RectangularEnvironment,
        neuron::{
            NeuronParameters,
            grid_cells::{GridCells, GridCellParameters},
            place_cells::{PlaceCells, PlaceCellParameters},
        },
    };

    fn noisy_params(n: usize) -> NeuronParameters {
        NeuronParameters { n, noise_std: 0.5, ..NeuronParameters::default() }
    }

    #[bench]
    fn bench_place_cells_update(b: &mut Bencher) {
        let mut rng = rand::rngs::StdRng::seed_from_u64(0);
        let mut place_cells = PlaceCells::new(
            RectangularEnvironment::default_impl(),
            PlaceCellParameters { neurons: noisy_params(100), ..PlaceCellParameters::default() },
            &mut rng,
        ).expect("Could not create place cells");
        let mut agent = AgentState::at(array![0.5, 0.5], 0.01);

        b.iter(|| {
            agent.move_to(array![0.5, 0.5]);
            place_cells.update(&agent, &mut rng).expect("Could not update place cells");
        })
    }

    #[bench]
    fn bench_grid_cells_update(b: &mut Bencher) {
        let mut rng = rand::rngs::StdRng::seed_from_u64(0);
        let mut grid_cells = GridCells::new(
            RectangularEnvironment::default_impl(),
            GridCellParameters { neurons: noisy_params(100), ..GridCellParameters::default() },
            &mut rng,
        ).expect("Could not create grid cells");
        let mut agent = AgentState::at(array![0.5, 0.5], 0.01);

        b.iter(|| {
            agent.move_to(array![0.5, 0.5]);
            grid_cells.update(&agent, &mut rng).expect("Could not update grid cells");
        })
    }
}

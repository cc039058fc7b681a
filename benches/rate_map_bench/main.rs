#![feature(test)]
extern crate test;


mod tests {
    use test::Bencher;
    extern crate rand;
    extern crate spatial_cells;
    use rand::SeedableRng;
    use spatial_cells::{
        environment::RectangularEnvironment,
        neuron::{
            NeuronParameters,
            grid_cells::{GridCells, GridCellParameters},
            place_cells::{PlaceCells, PlaceCellParameters},
        },
    };

    fn population_params(n: usize) -> NeuronParameters {
        NeuronParameters { n, ..NeuronParameters::default() }
    }

    #[bench]
    fn bench_place_cells_rate_map(b: &mut Bencher) {
        let mut rng = rand::rngs::StdRng::seed_from_u64(0);
        let place_cells = PlaceCells::new(
            RectangularEnvironment::default_impl(),
            PlaceCellParameters { neurons: population_params(100), ..PlaceCellParameters::default() },
            &mut rng,
        ).expect("Could not create place cells");

        b.iter(|| {
            place_cells.rate_map().expect("Could not get rate map")
        })
    }

    #[bench]
    fn bench_grid_cells_rate_map(b: &mut Bencher) {
        let mut rng = rand::rngs::StdRng::seed_from_u64(0);
        let grid_cells = GridCells::new(
            RectangularEnvironment::default_impl(),
            GridCellParameters { neurons: population_params(100), ..GridCellParameters::default() },
            &mut rng,
        ).expect("Could not create grid cells");

        b.iter(|| {
            grid_cells.rate_map().expect("Could not get rate map")
        })
    }

    #[bench]
    fn bench_rectangular_grid_cells_rate_map(b: &mut Bencher) {
        let mut rng = rand::rngs::StdRng::seed_from_u64(0);
        let grid_cells = GridCells::new_rectangular(
            RectangularEnvironment::default_impl(),
            GridCellParameters { neurons: population_params(100), ..GridCellParameters::default() },
            &mut rng,
        ).expect("Could not create grid cells");

        b.iter(|| {
            grid_cells.rate_map().expect("Could not get rate map")
        })
    }
}

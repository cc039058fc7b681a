#[cfg(test)]
mod tests {
    use std::f64::consts::TAU;
    use ndarray::{array, Array2};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use spatial_cells::{
        distribution::Distribution,
        environment::{BoundaryConditions, Dimensionality, EnvironmentParameters, RectangularEnvironment},
        error::{EnvironmentError, NeuronError, SpatialCellsError},
        neuron::{
            NeuronParameters, PositionSelection,
            grid_cells::{GridCellDescription, GridCellParameters, GridCells, GridLayout},
        },
    };


    const TOLERANCE: f64 = 1e-9;

    fn one_dimensional() -> Result<RectangularEnvironment, EnvironmentError> {
        RectangularEnvironment::new(EnvironmentParameters {
            dimensionality: Dimensionality::D1,
            ..EnvironmentParameters::default()
        })
    }

    fn min_max(values: &Array2<f64>) -> (f64, f64) {
        values.iter().fold((f64::INFINITY, f64::NEG_INFINITY), |(min, max), i| (min.min(*i), max.max(*i)))
    }

    // single neuron with its lattice origin on a point of the discretised grid
    fn aligned_params(description: GridCellDescription) -> GridCellParameters {
        let phase = TAU * 0.505 / 0.2;

        GridCellParameters {
            neurons: NeuronParameters { min_fr: 0.5, max_fr: 2., ..NeuronParameters::default() },
            gridscale: vec![0.2].into(),
            orientation: vec![0.].into(),
            phase_offset: Distribution::new("delta", phase),
            description,
            ..GridCellParameters::default()
        }
    }

    #[test]
    fn test_hexagonal_rate_map_spans_firing_range() -> Result<(), SpatialCellsError> {
        let mut rng = ChaCha8Rng::seed_from_u64(0);

        let cells = GridCells::new(
            RectangularEnvironment::default_impl(),
            aligned_params(GridCellDescription::RectifiedCosines),
            &mut rng,
        )?;

        let (_, rates) = cells.rate_map()?;
        let (min, max) = min_max(&rates);

        assert!((max - 2.).abs() < TOLERANCE, "max: {}", max);
        assert!((min - 0.5).abs() < TOLERANCE, "min: {}", min);

        Ok(())
    }

    #[test]
    fn test_rectangular_rate_map_spans_firing_range() -> Result<(), SpatialCellsError> {
        let mut rng = ChaCha8Rng::seed_from_u64(0);

        let cells = GridCells::new_rectangular(
            RectangularEnvironment::default_impl(),
            aligned_params(GridCellDescription::RectifiedCosines),
            &mut rng,
        )?;

        let (_, rates) = cells.rate_map()?;
        let (min, max) = min_max(&rates);

        assert!((max - 2.).abs() < TOLERANCE, "max: {}", max);
        assert!((min - 0.5).abs() < TOLERANCE, "min: {}", min);

        Ok(())
    }

    #[test]
    fn test_shifted_cosines_within_range() -> Result<(), SpatialCellsError> {
        let params = GridCellParameters {
            neurons: NeuronParameters { n: 5, min_fr: 1., max_fr: 3., ..NeuronParameters::default() },
            gridscale: Distribution::new("uniform", [0.15, 0.3]).into(),
            description: GridCellDescription::ShiftedCosines,
            ..GridCellParameters::default()
        };
        let environment = RectangularEnvironment::new(EnvironmentParameters {
            dx: 0.02,
            ..EnvironmentParameters::default()
        })?;

        let hexagonal = GridCells::new(environment.clone(), params.clone(), &mut ChaCha8Rng::seed_from_u64(1))?;
        let rectangular = GridCells::new_rectangular(environment, params, &mut ChaCha8Rng::seed_from_u64(1))?;

        for cells in [hexagonal, rectangular] {
            let (_, rates) = cells.rate_map()?;
            let (min, max) = min_max(&rates);

            assert!(min >= 1. - TOLERANCE, "min: {}", min);
            assert!(max <= 3. + TOLERANCE, "max: {}", max);
            // smooth oscillation, not a flat map
            assert!(max - min > 1.);
        }

        Ok(())
    }

    #[test]
    fn test_one_dimensional_periodicity() -> Result<(), SpatialCellsError> {
        for description in [GridCellDescription::RectifiedCosines, GridCellDescription::ShiftedCosines] {
            let mut rng = ChaCha8Rng::seed_from_u64(4);

            let cells = GridCells::new(
                one_dimensional()?,
                GridCellParameters {
                    gridscale: vec![0.25, 0.4].into(),
                    description,
                    ..GridCellParameters::default()
                },
                &mut rng,
            )?;

            let positions = array![[0.13], [0.38], [0.53]];
            let state = cells.get_state(PositionSelection::Explicit(positions.view()))?;

            assert_eq!(state.dim(), (2, 3));
            assert!((state[[0, 0]] - state[[0, 1]]).abs() < TOLERANCE);
            assert!((state[[1, 0]] - state[[1, 2]]).abs() < TOLERANCE);
        }

        Ok(())
    }

    #[test]
    fn test_one_dimensional_formula() -> Result<(), SpatialCellsError> {
        let mut rng = ChaCha8Rng::seed_from_u64(0);

        let cells = GridCells::new(
            one_dimensional()?,
            GridCellParameters {
                gridscale: vec![0.5].into(),
                phase_offset: Distribution::new("delta", 1.),
                description: GridCellDescription::ShiftedCosines,
                ..GridCellParameters::default()
            },
            &mut rng,
        )?;

        let positions = array![[0.3]];
        let state = cells.get_state(PositionSelection::Explicit(positions.view()))?;

        let expected = 0.5 * ((TAU / 0.5 * 0.3 - 1.).cos() + 1.);
        assert!((state[[0, 0]] - expected).abs() < TOLERANCE);

        Ok(())
    }

    #[test]
    fn test_one_dimensional_has_no_orientation() -> Result<(), SpatialCellsError> {
        let mut rng = ChaCha8Rng::seed_from_u64(0);

        let cells = GridCells::new(one_dimensional()?, GridCellParameters::default(), &mut rng)?;

        assert_eq!(cells.n(), 10);
        assert!(cells.orientations().is_none());
        assert!(cells.direction_vectors().is_none());
        assert_eq!(cells.phase_offsets().dim(), (10, 1));

        let positions = array![[0.1, 0.2]];
        let result = cells.get_state(PositionSelection::Explicit(positions.view()));
        assert_eq!(
            result,
            Err(SpatialCellsError::EnvironmentRelatedError(
                EnvironmentError::PositionDimensionMismatch { expected: 1, found: 2 }
            ))
        );

        Ok(())
    }

    #[test]
    fn test_layouts_differ() -> Result<(), SpatialCellsError> {
        let environment = RectangularEnvironment::new(EnvironmentParameters {
            dx: 0.05,
            ..EnvironmentParameters::default()
        })?;
        let params = GridCellParameters {
            gridscale: vec![0.3].into(),
            orientation: vec![0.2].into(),
            phase_offset: Distribution::new("delta", [0.5, 1.5]),
            ..GridCellParameters::default()
        };

        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let hexagonal = GridCells::new(environment.clone(), params.clone(), &mut rng)?;
        let rectangular = GridCells::new_rectangular(environment, params, &mut rng)?;

        assert_eq!(hexagonal.layout(), GridLayout::Hexagonal);
        assert_eq!(rectangular.layout(), GridLayout::Rectangular);

        let (_, hexagonal_rates) = hexagonal.rate_map()?;
        let (_, rectangular_rates) = rectangular.rate_map()?;

        assert_eq!(hexagonal_rates.dim(), rectangular_rates.dim());
        assert!(
            hexagonal_rates.iter()
                .zip(rectangular_rates.iter())
                .any(|(a, b)| (a - b).abs() > 1e-3)
        );

        Ok(())
    }

    #[test]
    fn test_direction_vectors() -> Result<(), SpatialCellsError> {
        let params = GridCellParameters {
            neurons: NeuronParameters { n: 4, ..NeuronParameters::default() },
            ..GridCellParameters::default()
        };

        let hexagonal = GridCells::new(
            RectangularEnvironment::default_impl(), params.clone(), &mut ChaCha8Rng::seed_from_u64(2),
        )?;
        let rectangular = GridCells::new_rectangular(
            RectangularEnvironment::default_impl(), params, &mut ChaCha8Rng::seed_from_u64(2),
        )?;

        let dot = |directions: &ndarray::Array3<f64>, i: usize, a: usize, b: usize| {
            directions[[i, a, 0]] * directions[[i, b, 0]] + directions[[i, a, 1]] * directions[[i, b, 1]]
        };

        let directions = hexagonal.direction_vectors().ok_or(NeuronError::StateShapeMismatch)?;
        assert_eq!(directions.dim(), (4, 3, 2));
        for i in 0..4 {
            for k in 0..3 {
                assert!((dot(directions, i, k, k) - 1.).abs() < TOLERANCE);
            }
            assert!((dot(directions, i, 0, 1) - 0.5).abs() < TOLERANCE);
            assert!((dot(directions, i, 1, 2) - 0.5).abs() < TOLERANCE);
        }

        let directions = rectangular.direction_vectors().ok_or(NeuronError::StateShapeMismatch)?;
        assert_eq!(directions.dim(), (4, 2, 2));
        for i in 0..4 {
            assert!(dot(directions, i, 0, 1).abs() < TOLERANCE);
        }

        Ok(())
    }

    #[test]
    fn test_module_gridscales() -> Result<(), SpatialCellsError> {
        let mut rng = ChaCha8Rng::seed_from_u64(0);

        let cells = GridCells::new(
            RectangularEnvironment::default_impl(),
            GridCellParameters {
                neurons: NeuronParameters { n: 6, ..NeuronParameters::default() },
                gridscale: Distribution::new("modules", [0.3, 0.5, 0.8]).into(),
                ..GridCellParameters::default()
            },
            &mut rng,
        )?;

        assert_eq!(cells.gridscales().to_vec(), vec![0.3, 0.5, 0.8, 0.3, 0.5, 0.8]);

        Ok(())
    }

    #[test]
    fn test_default_parameter_ranges() -> Result<(), SpatialCellsError> {
        let mut rng = ChaCha8Rng::seed_from_u64(8);

        let cells = GridCells::new(RectangularEnvironment::default_impl(), GridCellParameters::default(), &mut rng)?;

        assert_eq!(cells.n(), 10);
        assert!(cells.gridscales().iter().all(|i| (0.5..=1.).contains(i)));
        let orientations = cells.orientations().ok_or(NeuronError::StateShapeMismatch)?;
        assert!(orientations.iter().all(|i| (0. ..=TAU).contains(i)));
        assert_eq!(cells.phase_offsets().dim(), (10, 2));
        assert!(cells.phase_offsets().iter().all(|i| (0. ..=TAU).contains(i)));
        assert_eq!(cells.tuning().width_ratio(), 4. / (3. * 3_f64.sqrt()));

        Ok(())
    }

    #[test]
    fn test_orientation_length_mismatch() {
        let mut rng = ChaCha8Rng::seed_from_u64(0);

        let result = GridCells::new(
            RectangularEnvironment::default_impl(),
            GridCellParameters {
                gridscale: vec![0.3, 0.5].into(),
                orientation: vec![0.].into(),
                ..GridCellParameters::default()
            },
            &mut rng,
        );

        assert!(matches!(
            result,
            Err(SpatialCellsError::NeuronRelatedError(NeuronError::ParameterLengthMismatch {
                parameter: "orientation", expected: 2, found: 1,
            }))
        ));
    }

    #[test]
    fn test_periodic_lattice_continuous_across_arena() -> Result<(), SpatialCellsError> {
        let params = GridCellParameters {
            neurons: NeuronParameters { min_fr: 0., max_fr: 1., ..NeuronParameters::default() },
            gridscale: vec![0.27].into(),
            orientation: vec![0.3].into(),
            phase_offset: Distribution::new("delta", 0.),
            description: GridCellDescription::ShiftedCosines,
            ..GridCellParameters::default()
        };

        let periodic = GridCells::new(
            RectangularEnvironment::new(EnvironmentParameters {
                boundary_conditions: BoundaryConditions::Periodic,
                ..EnvironmentParameters::default()
            })?,
            params.clone(),
            &mut ChaCha8Rng::seed_from_u64(0),
        )?;
        let solid = GridCells::new(
            RectangularEnvironment::default_impl(),
            params,
            &mut ChaCha8Rng::seed_from_u64(0),
        )?;

        // either side of half an arena length from the lattice origin
        let positions = array![[0.4999, 0.13], [0.5001, 0.13]];
        let periodic_rates = periodic.get_state(PositionSelection::Explicit(positions.view()))?;
        let solid_rates = solid.get_state(PositionSelection::Explicit(positions.view()))?;

        assert!(
            (periodic_rates[[0, 0]] - periodic_rates[[0, 1]]).abs() < 0.01,
            "rates: {} {}", periodic_rates[[0, 0]], periodic_rates[[0, 1]],
        );
        assert!(periodic_rates.iter().zip(solid_rates.iter()).all(|(a, b)| (a - b).abs() < TOLERANCE));

        Ok(())
    }

    #[test]
    fn test_non_positive_gridscale_rejected() {
        for gridscale in [0., -0.3, f64::NAN] {
            let result = GridCells::new(
                RectangularEnvironment::default_impl(),
                GridCellParameters {
                    gridscale: vec![0.3, gridscale].into(),
                    ..GridCellParameters::default()
                },
                &mut ChaCha8Rng::seed_from_u64(0),
            );

            assert!(matches!(
                result,
                Err(SpatialCellsError::NeuronRelatedError(NeuronError::NonPositiveParameter {
                    parameter: "gridscale", ..
                }))
            ));
        }

        let result = GridCells::new(
            RectangularEnvironment::default_impl(),
            GridCellParameters {
                neurons: NeuronParameters { n: 4, ..NeuronParameters::default() },
                gridscale: Distribution::new("uniform", [-1., 0.]).into(),
                ..GridCellParameters::default()
            },
            &mut ChaCha8Rng::seed_from_u64(0),
        );

        assert!(matches!(
            result,
            Err(SpatialCellsError::NeuronRelatedError(NeuronError::NonPositiveParameter { .. }))
        ));
    }

    #[test]
    fn test_rectangular_requires_two_dimensions() -> Result<(), SpatialCellsError> {
        let mut rng = ChaCha8Rng::seed_from_u64(0);

        let result = GridCells::new_rectangular(one_dimensional()?, GridCellParameters::default(), &mut rng);

        assert!(matches!(
            result,
            Err(SpatialCellsError::NeuronRelatedError(NeuronError::RequiresTwoDimensions))
        ));

        Ok(())
    }

    #[test]
    fn test_out_of_range_width_ratio_only_warns() -> Result<(), SpatialCellsError> {
        let mut rng = ChaCha8Rng::seed_from_u64(0);

        for width_ratio in [0., 1.5, -0.2] {
            let cells = GridCells::new(
                RectangularEnvironment::default_impl(),
                GridCellParameters { width_ratio, ..GridCellParameters::default() },
                &mut rng,
            )?;

            assert_eq!(cells.tuning().width_ratio(), width_ratio);
        }

        Ok(())
    }

    #[test]
    fn test_unknown_distribution_fails_construction() {
        let mut rng = ChaCha8Rng::seed_from_u64(0);

        let result = GridCells::new(
            RectangularEnvironment::default_impl(),
            GridCellParameters {
                gridscale: Distribution::new("lognormal", [0.1, 0.2]).into(),
                ..GridCellParameters::default()
            },
            &mut rng,
        );

        assert!(matches!(result, Err(SpatialCellsError::DistributionRelatedError(_))));
    }

    #[test]
    fn test_construction_is_deterministic() -> Result<(), SpatialCellsError> {
        let first = GridCells::new(
            RectangularEnvironment::default_impl(), GridCellParameters::default(), &mut ChaCha8Rng::seed_from_u64(5),
        )?;
        let second = GridCells::new(
            RectangularEnvironment::default_impl(), GridCellParameters::default(), &mut ChaCha8Rng::seed_from_u64(5),
        )?;

        assert_eq!(first.gridscales(), second.gridscales());
        assert_eq!(first.orientations(), second.orientations());
        assert_eq!(first.phase_offsets(), second.phase_offsets());

        Ok(())
    }

    #[test]
    fn test_description_parsing() {
        assert_eq!("shifted_cosines".parse::<GridCellDescription>(), Ok(GridCellDescription::ShiftedCosines));
        assert_eq!(
            "sawtooth".parse::<GridCellDescription>(),
            Err(NeuronError::UnknownDescription(String::from("sawtooth")))
        );
    }
}

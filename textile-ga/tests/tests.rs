#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use float_cmp::approx_eq;
    use itertools::Itertools;
    use test_case::test_case;

    use textile_ga::entities::{Fabric, PieceShape, PieceSource};
    use textile_ga::geometry::BitMask;
    use textile_ga::ga::{DiversityStrategy, GAConfig, GenerationStrategy};
    use textile_ga::io::export::export;
    use textile_ga::textile::{
        CrossoverConfig, CrossoverStrategy, MutationConfig, MutationStrategy, TextileGA, TextileGAConfig,
    };

    fn init_logger() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    fn shapes() -> Vec<Arc<PieceShape>> {
        let masks = [
            BitMask::filled(6, 3).unwrap(),
            BitMask::filled(4, 4).unwrap(),
            BitMask::from_rows(&["#...", "##..", "###.", "####"]).unwrap(),
            BitMask::from_rows(&["#####", "#...#", "#####"]).unwrap(),
            BitMask::filled(2, 5).unwrap(),
        ];
        masks
            .into_iter()
            .enumerate()
            .map(|(id, mask)| Arc::new(PieceShape::new(id, PieceSource::from_mask(mask)).unwrap()))
            .collect()
    }

    fn config(seed: u64) -> TextileGAConfig {
        TextileGAConfig {
            prng_seed: Some(seed),
            ga: GAConfig {
                population_size: 10,
                elite_size: 3,
                diversity_strategy: DiversityStrategy::KMeans,
                kmeans_max_iterations: 20,
                ..GAConfig::default()
            },
            mutation: MutationConfig {
                translation_amplitude: 2,
                n_iterations: 2,
                keep_best_population_size: 4,
                ..MutationConfig::default()
            },
            ..TextileGAConfig::default()
        }
    }

    fn fabric() -> Fabric {
        Fabric::new(30, 15).unwrap()
    }

    #[test_case(MutationStrategy::Smart, CrossoverStrategy::OnePoint, GenerationStrategy::Default; "smart one point")]
    #[test_case(MutationStrategy::Translate, CrossoverStrategy::OnePoint, GenerationStrategy::Default; "translate one point")]
    #[test_case(MutationStrategy::KeepBest, CrossoverStrategy::RandomPieces, GenerationStrategy::Default; "keep best random pieces")]
    #[test_case(MutationStrategy::Translate, CrossoverStrategy::RandomPieces, GenerationStrategy::Smart; "smart generation")]
    fn evolve(mutation: MutationStrategy, crossover: CrossoverStrategy, generation: GenerationStrategy) {
        init_logger();
        let mut config = config(0);
        config.mutation.strategy = mutation;
        config.crossover = CrossoverConfig {
            strategy: crossover,
            min_crossover_fraction: 0.2,
        };
        config.ga.generation_strategy = generation;
        config.enable_rotation = true;

        let mut tga = TextileGA::new(fabric(), shapes(), config).unwrap();
        let n_generations = 6;
        tga.evolve(n_generations).unwrap();

        assert_eq!(tga.population().len(), 10);
        assert_eq!(tga.population().elite.len(), 3);

        let best_scores = tga.best_scores();
        assert_eq!(best_scores.len(), n_generations);
        // fitness is minimized
        assert!(best_scores.windows(2).all(|w| w[1] <= w[0]));

        let stats = tga.stats();
        assert_eq!(stats.run_time.iterations.len(), n_generations);
        assert!(approx_eq!(
            f64,
            stats.run_time.iterations.iter().sum::<f64>(),
            stats.run_time.total,
            epsilon = 1e-9
        ));
        assert_eq!(stats.packings.len(), n_generations);
        assert!(stats.packings.iter().all(|&p| p > 0.0));

        let best = tga.best_gene();
        assert_eq!(best.n_pieces(), 5);
        assert!(best.pieces().iter().all(|p| p.fits_in(tga.fabric())));
        assert!(approx_eq!(f64, best.peek_fitness(), best_scores[n_generations - 1], ulps = 2));

        let elite_scores = tga.elite_scores();
        assert!(elite_scores.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn same_seed_same_run() {
        init_logger();
        let mut a = TextileGA::new(fabric(), shapes(), config(7)).unwrap();
        let mut b = TextileGA::new(fabric(), shapes(), config(7)).unwrap();
        a.evolve(3).unwrap();
        b.evolve(3).unwrap();
        assert_eq!(a.best_scores(), b.best_scores());
        assert_eq!(export(a.best_gene()).placements, export(b.best_gene()).placements);
    }

    #[test]
    fn multiple_cuts() {
        init_logger();
        let config = TextileGAConfig {
            n_cuts: 2,
            ..config(1)
        };
        let tga = TextileGA::new(Fabric::new(40, 20).unwrap(), shapes(), config).unwrap();
        assert_eq!(tga.shapes().len(), 10);
        assert_eq!(tga.best_gene().n_pieces(), 10);
        let ids = tga.best_gene().pieces().iter().map(|p| p.id()).collect_vec();
        assert_eq!(ids, vec![0, 1, 2, 3, 4, 0, 1, 2, 3, 4]);
    }

    #[test]
    fn distances_and_data_vectors() {
        init_logger();
        let tga = TextileGA::new(fabric(), shapes(), config(3)).unwrap();
        let m = tga.distance_matrix().unwrap();
        assert_eq!(m.dim(), (10, 10));
        assert_eq!(m, m.t());
        assert!((0..10).all(|i| m[[i, i]] == 0.0));

        let dv = tga.data_vector(tga.best_gene(), true);
        assert_eq!(dv.len(), 15);
        assert!(dv.iter().all(|&x| (0.0..=1.0).contains(&x)));
    }

    #[test]
    fn pieces_do_not_fit() {
        init_logger();
        // 66 pixels of pieces on a fabric of 64
        assert!(TextileGA::new(Fabric::new(8, 8).unwrap(), shapes(), config(0)).is_err());
        // enough area, but the 6 pixel wide piece is wider than the fabric
        assert!(TextileGA::new(Fabric::new(5, 40).unwrap(), shapes(), config(0)).is_err());
    }

    #[test]
    fn invalid_config() {
        init_logger();
        let zero_cuts = TextileGAConfig {
            n_cuts: 0,
            ..config(0)
        };
        assert!(TextileGA::new(fabric(), shapes(), zero_cuts).is_err());

        let mut large_elite = config(0);
        large_elite.ga.elite_size = 11;
        assert!(TextileGA::new(fabric(), shapes(), large_elite).is_err());
    }
}

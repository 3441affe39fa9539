use codonopt::config::{AppConfig, OptimizerConfig, SamplerKind, TuningConfig};
use codonopt::engines::evaluation::{evaluate, FitnessEvaluator};
use codonopt::engines::generation::{GenerationStats, Population, ProgressCallback, SearchProblem};
use codonopt::genetics::{gc_fraction, translate};
use codonopt::{greedy_sequence, optimize, optimize_with_rng, CodonUsageTable, EndGcBounds};
use rand::rngs::StdRng;
use rand::SeedableRng;

fn mk_table() -> CodonUsageTable {
    CodonUsageTable::new(vec![
        ('M', vec![("ATG", 1.0)]),
        ('K', vec![("AAA", 1.0), ("AAG", 1.0)]),
    ])
    .unwrap()
}

fn small_config(n_trials: usize) -> AppConfig {
    AppConfig {
        optimizer: OptimizerConfig {
            target_gc: 0.5,
            n_iter: 20,
            pop_size: 10,
            end_zone: 3,
            n_trials,
            seed: Some(42),
            ..Default::default()
        },
        tuning: TuningConfig {
            n_startup_trials: 2,
            ..Default::default()
        },
        ..Default::default()
    }
}

/// Collects the best fitness reported after each generation.
struct Recorder {
    best: Vec<f64>,
}

impl ProgressCallback for Recorder {
    fn on_generation_start(&mut self, _generation: usize) {}

    fn on_generation_complete(&mut self, stats: &GenerationStats) {
        self.best.push(stats.best_fitness);
    }
}

#[test]
fn test_mk_population_keeps_length_and_translation() {
    let table = mk_table();
    let evaluator =
        FitnessEvaluator::new("MK", 0.5, 3, EndGcBounds::new(40.0, 70.0), Some(&table)).unwrap();
    let mut rng = StdRng::seed_from_u64(2024);

    let mut population = Population::seed("ATGAAA", 8, &evaluator, &mut rng);
    let mut previous_best = population.best().unwrap().fitness;
    for _ in 0..30 {
        population = population.next_generation(&evaluator, &mut rng);
        for candidate in population.candidates() {
            assert_eq!(candidate.sequence.len(), 6);
            assert_eq!(translate(&candidate.sequence), "MK");
        }
        let best = population.best().unwrap().fitness;
        assert!(best >= previous_best);
        previous_best = best;
    }

    // AAG moves GC from 1/6 to 2/6, closer to the 0.5 target
    let best = population.best().unwrap();
    assert_eq!(best.sequence, "ATGAAG");
    assert!((gc_fraction(&best.sequence) - 2.0 / 6.0).abs() < 1e-12);
}

#[test]
fn test_unreachable_end_bounds_penalised() {
    let evaluator = FitnessEvaluator::new("MK", 0.5, 3, EndGcBounds::new(80.0, 80.0), None).unwrap();
    let breakdown = evaluator.breakdown("ATGAAG").unwrap();
    assert!(breakdown.end_penalty > 0.0);
}

#[test]
fn test_fitness_is_deterministic() {
    let table = mk_table();
    let a = evaluate("ATGAAG", "MK", 0.55, 3, 40.0, 70.0, Some(&table)).unwrap();
    let b = evaluate("ATGAAG", "MK", 0.55, 3, 40.0, 70.0, Some(&table)).unwrap();
    assert_eq!(a, b);
}

#[test]
fn test_mismatch_scores_sentinel_regardless_of_gc() {
    for seq in ["ATGCCC", "GGGGGG", "ATATAT"] {
        assert_eq!(evaluate(seq, "MK", 0.5, 3, 40.0, 70.0, None).unwrap(), -5.0);
    }
}

#[test]
fn test_cai_neutral_without_table() {
    let evaluator = FitnessEvaluator::new("MK", 0.5, 3, EndGcBounds::new(0.0, 100.0), None).unwrap();
    for seq in ["ATGAAA", "ATGAAG"] {
        assert_eq!(evaluator.breakdown(seq).unwrap().cai_score, 1.0);
    }
}

#[test]
fn test_search_history_non_decreasing() {
    let table = mk_table();
    let problem = SearchProblem {
        target: "MK",
        codon_usage: Some(&table),
        target_gc: 0.5,
        end_zone: 3,
        pop_size: 6,
        n_iter: 15,
        weights: Default::default(),
    };
    let mut recorder = Recorder { best: Vec::new() };
    problem
        .search(EndGcBounds::new(40.0, 70.0))
        .unwrap()
        .run("ATGAAA", &mut StdRng::seed_from_u64(9), &mut recorder)
        .unwrap();

    assert_eq!(recorder.best.len(), 15);
    for pair in recorder.best.windows(2) {
        assert!(pair[1] >= pair[0]);
    }
}

#[test]
fn test_single_trial_reports_its_bounds() {
    let result = optimize("ATGAAA", "MK", Some(&mk_table()), &small_config(1)).unwrap();
    assert_eq!(result.trials.len(), 1);
    assert_eq!(result.chosen_bounds, result.trials[0].bounds);
    assert_eq!(translate(&result.best_sequence), "MK");
}

#[test]
fn test_chosen_bounds_maximise_trial_fitness() {
    let result = optimize("ATGAAA", "MK", Some(&mk_table()), &small_config(6)).unwrap();
    let best = result
        .trials
        .iter()
        .map(|t| t.best_fitness)
        .fold(f64::NEG_INFINITY, f64::max);
    let winner = result
        .trials
        .iter()
        .find(|t| t.best_fitness == best)
        .unwrap();
    assert_eq!(result.chosen_bounds, winner.bounds);

    let tuning = TuningConfig::default();
    for trial in &result.trials {
        assert!(tuning.min_end_gc_range.contains(trial.bounds.min_end_gc));
        assert!(tuning.max_end_gc_range.contains(trial.bounds.max_end_gc));
    }
}

#[test]
fn test_same_seed_reproduces_whole_run() {
    let mut config = small_config(4);
    config.tuning.sampler = SamplerKind::Tpe;
    let a = optimize("ATGAAA", "MK", Some(&mk_table()), &config).unwrap();
    let b = optimize("ATGAAA", "MK", Some(&mk_table()), &config).unwrap();
    assert_eq!(a.best_sequence, b.best_sequence);
    assert_eq!(a.trials, b.trials);
    assert_eq!(a.chosen_bounds, b.chosen_bounds);
}

#[test]
fn test_invalid_inputs_fail_before_search() {
    let config = small_config(1);
    let mut rng = StdRng::seed_from_u64(0);
    assert!(optimize_with_rng("ATGAA", "MK", None, &config, &mut rng).is_err());
    assert!(optimize_with_rng("ATGAAAAAA", "MK", None, &config, &mut rng).is_err());
    assert!(optimize_with_rng("ATGAAA", "MJ", None, &config, &mut rng).is_err());
}

#[test]
fn test_longer_protein_with_usage_table() {
    let table = CodonUsageTable::from_codon_frequencies(vec![
        ("ATG", 27.8),
        ("AAA", 33.6),
        ("AAG", 10.3),
        ("CTG", 52.6),
        ("TTA", 13.9),
        ("CTC", 11.1),
        ("GGC", 29.6),
        ("GGT", 24.7),
        ("GCG", 33.6),
        ("GCC", 25.5),
    ])
    .unwrap();
    let protein = "MKLGAKLGAM";
    let initial = greedy_sequence(protein, &table).unwrap();
    let config = AppConfig {
        optimizer: OptimizerConfig {
            target_gc: 0.55,
            n_iter: 30,
            pop_size: 16,
            end_zone: 9,
            n_trials: 3,
            seed: Some(7),
            ..Default::default()
        },
        ..Default::default()
    };

    let result = optimize(&initial, protein, Some(&table), &config).unwrap();
    assert_eq!(translate(&result.best_sequence), protein);
    let cai = result.cai.unwrap();
    assert!(cai > 0.0 && cai <= 1.0);
    assert!(result.best_fitness > config.fitness.failure_score());
}

#[test]
fn test_partial_usage_table_builds_initial_sequence() {
    // W is missing from the table; both the initial guess and mutation use the genetic code
    let table = CodonUsageTable::new(vec![('M', vec![("ATG", 1.0)])]).unwrap();
    let initial = greedy_sequence("MW", &table).unwrap();
    assert_eq!(initial, "ATGTGG");

    let mut config = small_config(2);
    config.optimizer.end_zone = 3;
    let result = optimize(&initial, "MW", Some(&table), &config).unwrap();
    assert_eq!(result.best_sequence, "ATGTGG");
    assert_eq!(result.cai, Some(1.0));
}

#[test]
fn test_default_end_zone_clamped_to_short_sequence() {
    let config = AppConfig {
        optimizer: OptimizerConfig {
            n_iter: 10,
            pop_size: 6,
            n_trials: 2,
            seed: Some(11),
            ..Default::default()
        },
        tuning: TuningConfig {
            n_startup_trials: 2,
            ..Default::default()
        },
        ..Default::default()
    };
    assert_eq!(config.optimizer.end_zone, 70);

    let table = mk_table();
    let result = optimize("ATGAAA", "MK", Some(&table), &config).unwrap();
    assert_eq!(translate(&result.best_sequence), "MK");

    // Both end windows cover the whole 6-nucleotide sequence
    let evaluator = FitnessEvaluator::new(
        "MK",
        config.optimizer.target_gc,
        6,
        result.chosen_bounds,
        Some(&table),
    )
    .unwrap();
    assert_eq!(result.best_fitness, evaluator.evaluate(&result.best_sequence));
}

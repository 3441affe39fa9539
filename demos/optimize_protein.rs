use codonopt::config::FitnessConfig;
use codonopt::engines::generation::{GenerationStats, ProgressCallback, SearchProblem};
use codonopt::genetics::{gc_fraction, translate};
use codonopt::{greedy_sequence, CodonUsageTable, EndGcBounds};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::env;

/// Prints one line per generation with elapsed time.
struct CliProgressCallback {
    start_time: std::time::Instant,
}

impl ProgressCallback for CliProgressCallback {
    fn on_generation_start(&mut self, _generation: usize) {}

    fn on_generation_complete(&mut self, stats: &GenerationStats) {
        println!(
            "Generation {}: best = {:.4}, mean = {:.4}, time = {:.2}s",
            stats.generation,
            stats.best_fitness,
            stats.mean_fitness,
            self.start_time.elapsed().as_secs_f64()
        );
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let protein = args
        .get(1)
        .map(|s| s.to_ascii_uppercase())
        .unwrap_or_else(|| "MAPWMHLLTVLALLALWGPNSVQA".to_string());
    let pop_size = args.get(2).and_then(|s| s.parse().ok()).unwrap_or(50);
    let n_iter = args.get(3).and_then(|s| s.parse().ok()).unwrap_or(120);

    let table = CodonUsageTable::standard();
    let initial = greedy_sequence(&protein, table)?;
    println!("Protein: {}", protein);
    println!("Initial: {} (GC {:.1}%)", initial, gc_fraction(&initial) * 100.0);

    let problem = SearchProblem {
        target: &protein,
        codon_usage: None,
        target_gc: 0.51,
        end_zone: 30.min(initial.len()),
        pop_size,
        n_iter,
        weights: FitnessConfig::default(),
    };

    let mut callback = CliProgressCallback {
        start_time: std::time::Instant::now(),
    };
    let outcome = problem
        .search(EndGcBounds::new(40.0, 60.0))?
        .run(&initial, &mut StdRng::seed_from_u64(42), &mut callback)?;

    println!("Best:    {} (GC {:.1}%)", outcome.best.sequence, gc_fraction(&outcome.best.sequence) * 100.0);
    assert_eq!(translate(&outcome.best.sequence), protein);
    Ok(())
}

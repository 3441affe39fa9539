use super::genetic_search::ProgressCallback;
use super::population::GenerationStats;

/// Forwards generation events to the `log` facade at debug level.
#[derive(Debug, Clone)]
pub struct LogProgressCallback {
    label: String,
    total_generations: usize,
}

impl LogProgressCallback {
    pub fn new(label: impl Into<String>, total_generations: usize) -> Self {
        Self {
            label: label.into(),
            total_generations,
        }
    }
}

impl ProgressCallback for LogProgressCallback {
    fn on_generation_start(&mut self, generation: usize) {
        log::trace!(
            "[{}] generation {}/{} starting",
            self.label,
            generation + 1,
            self.total_generations
        );
    }

    fn on_generation_complete(&mut self, stats: &GenerationStats) {
        log::debug!(
            "[{}] generation {}/{}: best = {:.4}, mean = {:.4}, std = {:.4}{}",
            self.label,
            stats.generation,
            self.total_generations,
            stats.best_fitness,
            stats.mean_fitness,
            stats.fitness_std,
            if stats.degenerate_selection { " (uniform selection)" } else { "" }
        );
    }
}

use super::population::{GenerationStats, Population};
use crate::config::FitnessConfig;
use crate::engines::evaluation::FitnessEvaluator;
use crate::error::{CodonoptError, Result};
use crate::genetics::CodonUsageTable;
use crate::types::{Candidate, EndGcBounds};
use rand::Rng;

pub trait ProgressCallback {
    fn on_generation_start(&mut self, generation: usize);
    fn on_generation_complete(&mut self, stats: &GenerationStats);
}

/// Callback that ignores every event.
impl ProgressCallback for () {
    fn on_generation_start(&mut self, _generation: usize) {}
    fn on_generation_complete(&mut self, _stats: &GenerationStats) {}
}

/// Everything about a search except the end bounds being tuned.
#[derive(Debug, Clone)]
pub struct SearchProblem<'a> {
    pub target: &'a str,
    pub codon_usage: Option<&'a CodonUsageTable>,
    pub target_gc: f64,
    pub end_zone: usize,
    pub pop_size: usize,
    pub n_iter: usize,
    pub weights: FitnessConfig,
}

impl<'a> SearchProblem<'a> {
    pub fn evaluator(&self, bounds: EndGcBounds) -> Result<FitnessEvaluator<'a>> {
        FitnessEvaluator::new(
            self.target,
            self.target_gc,
            self.end_zone,
            bounds,
            self.codon_usage,
        )?
        .with_weights(self.weights)
    }

    pub fn search(&self, bounds: EndGcBounds) -> Result<GeneticSearch<'a>> {
        Ok(GeneticSearch::new(self.evaluator(bounds)?, self.pop_size, self.n_iter))
    }
}

#[derive(Debug, Clone)]
pub struct SearchOutcome {
    pub best: Candidate,
    /// Stats for the seeded population and every generation after it.
    pub history: Vec<GenerationStats>,
}

/// Generational loop with fixed hyperparameters.
#[derive(Debug, Clone)]
pub struct GeneticSearch<'a> {
    evaluator: FitnessEvaluator<'a>,
    pop_size: usize,
    n_iter: usize,
}

impl<'a> GeneticSearch<'a> {
    pub fn new(evaluator: FitnessEvaluator<'a>, pop_size: usize, n_iter: usize) -> Self {
        Self {
            evaluator,
            pop_size,
            n_iter,
        }
    }

    pub fn evaluator(&self) -> &FitnessEvaluator<'a> {
        &self.evaluator
    }

    /// Seed from `initial`, advance `n_iter` generations, return the fittest candidate.
    pub fn run<R, C>(&self, initial: &str, rng: &mut R, callback: &mut C) -> Result<SearchOutcome>
    where
        R: Rng + ?Sized,
        C: ProgressCallback + ?Sized,
    {
        if self.pop_size == 0 {
            return Err(CodonoptError::InvalidInput(
                "population size must be at least 1".to_string(),
            ));
        }
        let expected = self.evaluator.target().len() * 3;
        if initial.len() != expected {
            return Err(CodonoptError::InvalidInput(format!(
                "initial sequence has {} nucleotides, expected {}",
                initial.len(),
                expected
            )));
        }

        let mut population = Population::seed(initial, self.pop_size, &self.evaluator, rng);
        let mut history = Vec::with_capacity(self.n_iter + 1);
        history.push(population.stats());

        for generation in 0..self.n_iter {
            callback.on_generation_start(generation);
            population = population.next_generation(&self.evaluator, rng);
            let stats = population.stats();
            callback.on_generation_complete(&stats);
            history.push(stats);
        }

        let best = population
            .best()
            .cloned()
            .ok_or_else(|| CodonoptError::InvalidInput("population is empty".to_string()))?;

        Ok(SearchOutcome { best, history })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::genetics::translate;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn problem() -> SearchProblem<'static> {
        SearchProblem {
            target: "MKLGR",
            codon_usage: None,
            target_gc: 0.6,
            end_zone: 6,
            pop_size: 12,
            n_iter: 25,
            weights: FitnessConfig::default(),
        }
    }

    #[test]
    fn test_best_fitness_never_decreases() {
        let mut rng = StdRng::seed_from_u64(42);
        let outcome = problem()
            .search(EndGcBounds::new(40.0, 70.0))
            .unwrap()
            .run("ATGAAATTAGGTAGA", &mut rng, &mut ())
            .unwrap();

        assert_eq!(outcome.history.len(), 26);
        for pair in outcome.history.windows(2) {
            assert!(pair[1].best_fitness >= pair[0].best_fitness);
        }
        assert_eq!(translate(&outcome.best.sequence), "MKLGR");
        assert_eq!(outcome.best.fitness, outcome.history[25].best_fitness);
    }

    #[test]
    fn test_same_seed_same_outcome() {
        let search = problem().search(EndGcBounds::new(45.0, 60.0)).unwrap();
        let a = search
            .run("ATGAAATTAGGTAGA", &mut StdRng::seed_from_u64(3), &mut ())
            .unwrap();
        let b = search
            .run("ATGAAATTAGGTAGA", &mut StdRng::seed_from_u64(3), &mut ())
            .unwrap();
        assert_eq!(a.best, b.best);
    }

    #[test]
    fn test_rejects_wrong_initial_length() {
        let err = problem()
            .search(EndGcBounds::new(40.0, 70.0))
            .unwrap()
            .run("ATGAAA", &mut StdRng::seed_from_u64(0), &mut ())
            .unwrap_err();
        assert!(matches!(err, CodonoptError::InvalidInput(_)));
    }

    #[test]
    fn test_out_of_range_bounds_rejected() {
        let err = problem().search(EndGcBounds::new(120.0, 150.0)).unwrap_err();
        assert!(matches!(err, CodonoptError::InvalidInput(_)));
    }

    #[test]
    fn test_callback_sees_every_generation() {
        #[derive(Default)]
        struct Counter {
            started: usize,
            completed: Vec<usize>,
        }
        impl ProgressCallback for Counter {
            fn on_generation_start(&mut self, _generation: usize) {
                self.started += 1;
            }
            fn on_generation_complete(&mut self, stats: &GenerationStats) {
                self.completed.push(stats.generation);
            }
        }

        let mut counter = Counter::default();
        problem()
            .search(EndGcBounds::new(40.0, 70.0))
            .unwrap()
            .run("ATGAAATTAGGTAGA", &mut StdRng::seed_from_u64(5), &mut counter)
            .unwrap();
        assert_eq!(counter.started, 25);
        assert_eq!(counter.completed, (1..=25).collect::<Vec<_>>());
    }
}

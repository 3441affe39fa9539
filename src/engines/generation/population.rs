use super::operators::{elite_index, mutate, SelectionWheel};
use crate::engines::evaluation::FitnessEvaluator;
use crate::types::Candidate;
use rand::Rng;

/// Summary of one generation's fitness scores.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GenerationStats {
    pub generation: usize,
    pub best_fitness: f64,
    pub mean_fitness: f64,
    pub fitness_std: f64,
    /// Parents for the next generation were drawn uniformly.
    pub degenerate_selection: bool,
}

/// One evaluated generation of candidates.
///
/// A population is never edited in place: [`Population::next_generation`]
/// builds the successor and the caller drops the old one.
#[derive(Debug, Clone)]
pub struct Population {
    candidates: Vec<Candidate>,
    generation: usize,
}

impl Population {
    /// The initial sequence plus `pop_size - 1` independent mutants of it, all scored.
    pub fn seed<R: Rng + ?Sized>(
        initial: &str,
        pop_size: usize,
        evaluator: &FitnessEvaluator<'_>,
        rng: &mut R,
    ) -> Self {
        let mut sequences = Vec::with_capacity(pop_size);
        if pop_size > 0 {
            sequences.push(initial.to_string());
        }
        for _ in 1..pop_size {
            sequences.push(mutate(initial, evaluator.target(), evaluator.codon_usage(), rng));
        }
        Self {
            candidates: score(sequences, evaluator),
            generation: 0,
        }
    }

    /// Elite carry-over plus fitness-proportional parents, each mutated once.
    pub fn next_generation<R: Rng + ?Sized>(
        &self,
        evaluator: &FitnessEvaluator<'_>,
        rng: &mut R,
    ) -> Self {
        let pop_size = self.candidates.len();
        let scores = self.scores();
        let mut next = Vec::with_capacity(pop_size);

        if let Some(best) = elite_index(&scores) {
            next.push(self.candidates[best].clone());
        }

        if pop_size > 1 {
            let wheel = SelectionWheel::new(&scores);
            if wheel.is_degenerate() {
                log::debug!(
                    "Generation {}: no positive fitness, selecting parents uniformly",
                    self.generation
                );
            }
            let children: Vec<String> = (1..pop_size)
                .map(|_| {
                    let parent = &self.candidates[wheel.spin(rng)];
                    mutate(&parent.sequence, evaluator.target(), evaluator.codon_usage(), rng)
                })
                .collect();
            next.extend(score(children, evaluator));
        }

        Self {
            candidates: next,
            generation: self.generation + 1,
        }
    }

    /// Highest-scoring candidate, first on ties.
    pub fn best(&self) -> Option<&Candidate> {
        elite_index(&self.scores()).map(|i| &self.candidates[i])
    }

    pub fn stats(&self) -> GenerationStats {
        let scores = self.scores();
        let n = scores.len().max(1) as f64;
        let mean = scores.iter().sum::<f64>() / n;
        let variance = scores.iter().map(|s| (s - mean).powi(2)).sum::<f64>() / n;
        GenerationStats {
            generation: self.generation,
            best_fitness: self.best().map_or(f64::NAN, |c| c.fitness),
            mean_fitness: mean,
            fitness_std: variance.sqrt(),
            degenerate_selection: SelectionWheel::new(&scores).is_degenerate(),
        }
    }

    pub fn candidates(&self) -> &[Candidate] {
        &self.candidates
    }

    pub fn generation(&self) -> usize {
        self.generation
    }

    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    fn scores(&self) -> Vec<f64> {
        self.candidates.iter().map(|c| c.fitness).collect()
    }
}

fn score(sequences: Vec<String>, evaluator: &FitnessEvaluator<'_>) -> Vec<Candidate> {
    sequences
        .into_iter()
        .map(|sequence| {
            let fitness = evaluator.evaluate(&sequence);
            Candidate { sequence, fitness }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::EndGcBounds;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn evaluator() -> FitnessEvaluator<'static> {
        FitnessEvaluator::new("MKLG", 0.6, 3, EndGcBounds::new(40.0, 70.0), None).unwrap()
    }

    #[test]
    fn test_seed_keeps_initial_first() {
        let mut rng = StdRng::seed_from_u64(42);
        let population = Population::seed("ATGAAATTAGGT", 8, &evaluator(), &mut rng);
        assert_eq!(population.len(), 8);
        assert_eq!(population.generation(), 0);
        assert_eq!(population.candidates()[0].sequence, "ATGAAATTAGGT");
    }

    #[test]
    fn test_next_generation_carries_elite() {
        let mut rng = StdRng::seed_from_u64(42);
        let evaluator = evaluator();
        let population = Population::seed("ATGAAATTAGGT", 10, &evaluator, &mut rng);
        let best = population.best().unwrap().clone();

        let next = population.next_generation(&evaluator, &mut rng);
        assert_eq!(next.len(), 10);
        assert_eq!(next.generation(), 1);
        assert_eq!(next.candidates()[0], best);
        assert!(next.best().unwrap().fitness >= best.fitness);
    }

    #[test]
    fn test_single_member_population() {
        let mut rng = StdRng::seed_from_u64(1);
        let evaluator = evaluator();
        let population = Population::seed("ATGAAATTAGGT", 1, &evaluator, &mut rng);
        let next = population.next_generation(&evaluator, &mut rng);
        assert_eq!(next.candidates(), population.candidates());
    }

    #[test]
    fn test_stats_flag_degenerate_generation() {
        // Nothing encodes "WW", so every score is the failure score
        let evaluator = FitnessEvaluator::new("WW", 0.5, 3, EndGcBounds::new(40.0, 70.0), None).unwrap();
        let mut rng = StdRng::seed_from_u64(9);
        let population = Population::seed("ATGAAA", 4, &evaluator, &mut rng);
        let stats = population.stats();
        assert!(stats.degenerate_selection);
        assert_eq!(stats.best_fitness, -5.0);
        assert_eq!(stats.fitness_std, 0.0);
    }
}

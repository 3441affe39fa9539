use super::genetic_search::SearchProblem;
use super::operators::elite_index;
use super::progress::LogProgressCallback;
use crate::config::{ParamRange, SamplerKind, TuningConfig};
use crate::error::{CodonoptError, Result};
use crate::types::{EndGcBounds, HyperparameterTrial};
use rand::{Rng, RngCore};
use statrs::distribution::{Continuous, ContinuousCDF, Normal};

/// Proposes end-zone bounds for the next trial from the trials so far.
pub trait ParameterSampler {
    fn suggest(&mut self, history: &[HyperparameterTrial], rng: &mut dyn RngCore) -> EndGcBounds;
}

/// Independent uniform draws over both ranges.
#[derive(Debug, Clone)]
pub struct RandomSampler {
    min_range: ParamRange,
    max_range: ParamRange,
}

impl RandomSampler {
    pub fn new(min_range: ParamRange, max_range: ParamRange) -> Self {
        Self {
            min_range,
            max_range,
        }
    }
}

impl ParameterSampler for RandomSampler {
    fn suggest(&mut self, _history: &[HyperparameterTrial], rng: &mut dyn RngCore) -> EndGcBounds {
        EndGcBounds::new(
            uniform(self.min_range, rng),
            uniform(self.max_range, rng),
        )
    }
}

fn uniform<R: Rng + ?Sized>(range: ParamRange, rng: &mut R) -> f64 {
    if range.width() <= 0.0 {
        range.low
    } else {
        rng.gen_range(range.low..=range.high)
    }
}

/// Tree-structured Parzen estimator, one independent model per parameter.
///
/// After `n_startup_trials` uniform draws, trials are split into the best
/// `ceil(gamma * n)` and the rest. Each group gets a truncated Gaussian
/// mixture, and the candidate drawn from the good mixture with the highest
/// `l(x) / g(x)` is proposed.
#[derive(Debug, Clone)]
pub struct TpeSampler {
    min_range: ParamRange,
    max_range: ParamRange,
    n_startup_trials: usize,
    n_ei_candidates: usize,
    gamma: f64,
}

impl TpeSampler {
    pub fn new(config: &TuningConfig) -> Self {
        Self {
            min_range: config.min_end_gc_range,
            max_range: config.max_end_gc_range,
            n_startup_trials: config.n_startup_trials,
            n_ei_candidates: config.n_ei_candidates.max(1),
            gamma: config.gamma,
        }
    }

    fn suggest_param(
        &self,
        observations: &[(f64, f64)],
        range: ParamRange,
        rng: &mut dyn RngCore,
    ) -> f64 {
        if observations.len() < self.n_startup_trials.max(1) || range.width() <= 0.0 {
            return uniform(range, rng);
        }

        let mut ranked = observations.to_vec();
        ranked.sort_by(|a, b| b.1.total_cmp(&a.1));
        let n_good = ((self.gamma * ranked.len() as f64).ceil() as usize).clamp(1, ranked.len());
        let (good, bad) = ranked.split_at(n_good);

        let good = ParzenEstimator::fit(good.iter().map(|o| o.0), range);
        let bad = ParzenEstimator::fit(bad.iter().map(|o| o.0), range);

        let mut best: Option<(f64, f64)> = None;
        for _ in 0..self.n_ei_candidates {
            let x = good.sample(rng);
            let ratio = good.log_pdf(x) - bad.log_pdf(x);
            if best.map_or(true, |(_, r)| ratio > r) {
                best = Some((x, ratio));
            }
        }
        best.map_or_else(|| uniform(range, rng), |(x, _)| x)
    }
}

impl ParameterSampler for TpeSampler {
    fn suggest(&mut self, history: &[HyperparameterTrial], rng: &mut dyn RngCore) -> EndGcBounds {
        let min_obs: Vec<(f64, f64)> = history
            .iter()
            .map(|t| (t.bounds.min_end_gc, t.best_fitness))
            .collect();
        let max_obs: Vec<(f64, f64)> = history
            .iter()
            .map(|t| (t.bounds.max_end_gc, t.best_fitness))
            .collect();

        EndGcBounds::new(
            self.suggest_param(&min_obs, self.min_range, rng),
            self.suggest_param(&max_obs, self.max_range, rng),
        )
    }
}

/// Equal-weight mixture of Gaussians truncated to a range, with a wide prior
/// component at the range centre.
#[derive(Debug, Clone)]
struct ParzenEstimator {
    components: Vec<TruncatedNormal>,
    range: ParamRange,
}

#[derive(Debug, Clone)]
struct TruncatedNormal {
    mu: f64,
    normal: Normal,
    cdf_low: f64,
    mass: f64,
}

impl ParzenEstimator {
    fn fit(observations: impl Iterator<Item = f64>, range: ParamRange) -> Self {
        let width = range.width();
        let prior = (range.low + range.high) / 2.0;

        let mut mus: Vec<f64> = observations.map(|x| range.clamp(x)).collect();
        let n_obs = mus.len();
        mus.push(prior);
        mus.sort_by(f64::total_cmp);

        let min_sigma = width / (n_obs as f64 + 1.0).min(100.0);
        let mut prior_seen = false;
        let components = mus
            .iter()
            .enumerate()
            .filter_map(|(i, &mu)| {
                let sigma = if !prior_seen && mu == prior {
                    prior_seen = true;
                    width
                } else {
                    let left = if i == 0 { range.low } else { mus[i - 1] };
                    let right = if i + 1 == mus.len() { range.high } else { mus[i + 1] };
                    (mu - left).max(right - mu).clamp(min_sigma, width)
                };
                TruncatedNormal::new(mu, sigma, range)
            })
            .collect();

        Self { components, range }
    }

    fn sample(&self, rng: &mut dyn RngCore) -> f64 {
        let component = &self.components[rng.gen_range(0..self.components.len())];
        let x = component.sample(rng);
        if x.is_finite() {
            self.range.clamp(x)
        } else {
            self.range.clamp(component.mu)
        }
    }

    fn log_pdf(&self, x: f64) -> f64 {
        let density: f64 = self.components.iter().map(|c| c.pdf(x)).sum();
        (density / self.components.len() as f64).max(f64::MIN_POSITIVE).ln()
    }
}

impl TruncatedNormal {
    fn new(mu: f64, sigma: f64, range: ParamRange) -> Option<Self> {
        let normal = Normal::new(mu, sigma).ok()?;
        let cdf_low = normal.cdf(range.low);
        let mass = normal.cdf(range.high) - cdf_low;
        (mass > 0.0).then_some(Self {
            mu,
            normal,
            cdf_low,
            mass,
        })
    }

    fn sample(&self, rng: &mut dyn RngCore) -> f64 {
        let u: f64 = rng.gen();
        self.normal.inverse_cdf(self.cdf_low + u * self.mass)
    }

    fn pdf(&self, x: f64) -> f64 {
        self.normal.pdf(x) / self.mass
    }
}

/// Result of a tuning loop.
#[derive(Debug, Clone)]
pub struct TuningOutcome {
    pub best: HyperparameterTrial,
    pub trials: Vec<HyperparameterTrial>,
}

/// Black-box search over the end-zone GC bounds.
///
/// Each trial runs a complete, independent objective evaluation; a trial that
/// errors or returns a non-finite value is recorded at the failure score and
/// the loop moves on.
pub struct HyperparameterTuner {
    sampler: Box<dyn ParameterSampler>,
    trials: Vec<HyperparameterTrial>,
}

impl HyperparameterTuner {
    pub fn new(config: &TuningConfig) -> Self {
        let sampler: Box<dyn ParameterSampler> = match config.sampler {
            SamplerKind::Tpe => Box::new(TpeSampler::new(config)),
            SamplerKind::Random => Box::new(RandomSampler::new(
                config.min_end_gc_range,
                config.max_end_gc_range,
            )),
        };
        Self::with_sampler(sampler)
    }

    pub fn with_sampler(sampler: Box<dyn ParameterSampler>) -> Self {
        Self {
            sampler,
            trials: Vec::new(),
        }
    }

    /// Run `n_trials` trials of `objective` and return the maximising bounds.
    pub fn optimize<R, F>(
        &mut self,
        n_trials: usize,
        failure_score: f64,
        rng: &mut R,
        mut objective: F,
    ) -> Result<TuningOutcome>
    where
        R: Rng,
        F: FnMut(EndGcBounds, &mut R) -> Result<f64>,
    {
        if n_trials == 0 {
            return Err(CodonoptError::InvalidInput(
                "tuning needs at least one trial".to_string(),
            ));
        }

        for _ in 0..n_trials {
            let number = self.trials.len();
            let bounds = self.sampler.suggest(&self.trials, &mut *rng);

            let best_fitness = match objective(bounds, rng) {
                Ok(value) if value.is_finite() => value,
                Ok(value) => {
                    log::warn!("Trial {} returned non-finite fitness {}", number, value);
                    failure_score
                }
                Err(e) => {
                    log::warn!("Trial {} failed: {}", number, e);
                    failure_score
                }
            };

            log::info!(
                "Trial {}: min_end_gc = {:.2}, max_end_gc = {:.2}, best fitness = {:.4}",
                number,
                bounds.min_end_gc,
                bounds.max_end_gc,
                best_fitness
            );
            self.trials.push(HyperparameterTrial {
                number,
                bounds,
                best_fitness,
            });
        }

        let scores: Vec<f64> = self.trials.iter().map(|t| t.best_fitness).collect();
        let best = elite_index(&scores)
            .map(|i| self.trials[i])
            .ok_or_else(|| CodonoptError::Trial("no trial produced a score".to_string()))?;

        log::info!(
            "Best bounds after {} trials: min_end_gc = {:.2}, max_end_gc = {:.2} (fitness {:.4})",
            self.trials.len(),
            best.bounds.min_end_gc,
            best.bounds.max_end_gc,
            best.best_fitness
        );

        Ok(TuningOutcome {
            best,
            trials: self.trials.clone(),
        })
    }

    /// Tune the end bounds of `problem`, running a fresh genetic search from `initial` per trial.
    pub fn tune<R: Rng>(
        &mut self,
        problem: &SearchProblem<'_>,
        initial: &str,
        n_trials: usize,
        rng: &mut R,
    ) -> Result<TuningOutcome> {
        let failure_score = problem.weights.failure_score();
        self.optimize(n_trials, failure_score, rng, |bounds, rng| {
            let label = format!("trial {:.1}/{:.1}", bounds.min_end_gc, bounds.max_end_gc);
            let mut progress = LogProgressCallback::new(label, problem.n_iter);
            problem
                .search(bounds)?
                .run(initial, rng, &mut progress)
                .map(|outcome| outcome.best.fitness)
        })
    }
}

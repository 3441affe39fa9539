//! Entry point tying the tuner, the genetic search and the fitness terms together.

use crate::config::AppConfig;
use crate::engines::evaluation::codon_adaptation_index;
use crate::engines::generation::{HyperparameterTuner, LogProgressCallback, SearchProblem};
use crate::error::{CodonoptError, Result};
use crate::genetics::sequence::validate_nucleotides;
use crate::genetics::{gc_fraction, normalize, translate, CodonUsageTable};
use crate::types::OptimizationResult;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Optimise `initial` for `protein`, seeding the random source from the config.
///
/// Without a seed the generator is drawn from OS entropy.
pub fn optimize(
    initial: &str,
    protein: &str,
    codon_usage: Option<&CodonUsageTable>,
    config: &AppConfig,
) -> Result<OptimizationResult> {
    let mut rng = match config.optimizer.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    optimize_with_rng(initial, protein, codon_usage, config, &mut rng)
}

/// Tune the end-zone bounds, then rerun the search once with the winners.
///
/// With `n_trials == 0` tuning is skipped and the configured bounds are used.
pub fn optimize_with_rng<R: Rng>(
    initial: &str,
    protein: &str,
    codon_usage: Option<&CodonUsageTable>,
    config: &AppConfig,
    rng: &mut R,
) -> Result<OptimizationResult> {
    config.validate()?;
    let initial = normalize(initial);
    let protein: String = protein
        .chars()
        .filter(|c| !c.is_whitespace())
        .map(|c| c.to_ascii_uppercase())
        .collect();
    validate_input(&initial, &protein, codon_usage)?;

    let settings = &config.optimizer;
    let end_zone = if settings.end_zone > initial.len() {
        log::warn!(
            "end_zone {} exceeds sequence length {}, using the whole sequence",
            settings.end_zone,
            initial.len()
        );
        initial.len()
    } else {
        settings.end_zone
    };

    let problem = SearchProblem {
        target: &protein,
        codon_usage,
        target_gc: settings.target_gc,
        end_zone,
        pop_size: settings.pop_size,
        n_iter: settings.n_iter,
        weights: config.fitness,
    };

    let (chosen_bounds, trials) = if settings.n_trials == 0 {
        log::info!("Tuning disabled, using configured end bounds");
        (settings.bounds(), Vec::new())
    } else {
        let mut tuner = HyperparameterTuner::new(&config.tuning);
        let outcome = tuner.tune(&problem, &initial, settings.n_trials, rng)?;
        (outcome.best.bounds, outcome.trials)
    };

    let mut progress = LogProgressCallback::new("final", settings.n_iter);
    let outcome = problem
        .search(chosen_bounds)?
        .run(&initial, rng, &mut progress)?;

    let gc_content = gc_fraction(&outcome.best.sequence);
    let cai = codon_usage.map(|table| codon_adaptation_index(&outcome.best.sequence, table));

    log::info!("GC after optimisation: {:.1}%", gc_content * 100.0);
    if let Some(cai) = cai {
        log::info!("CAI: {:.3}", cai);
    }

    Ok(OptimizationResult {
        best_sequence: outcome.best.sequence,
        best_fitness: outcome.best.fitness,
        chosen_bounds,
        gc_content,
        cai,
        trials,
    })
}

/// Fail fast on inputs no generation could repair.
pub fn validate_input(
    initial: &str,
    protein: &str,
    codon_usage: Option<&CodonUsageTable>,
) -> Result<()> {
    if protein.is_empty() {
        return Err(CodonoptError::InvalidInput(
            "target protein is empty".to_string(),
        ));
    }
    validate_nucleotides(initial)?;
    if initial.len() % 3 != 0 {
        return Err(CodonoptError::InvalidInput(format!(
            "sequence length {} is not a multiple of 3",
            initial.len()
        )));
    }
    if initial.len() != protein.len() * 3 {
        return Err(CodonoptError::InvalidInput(format!(
            "sequence has {} codons but the protein has {} residues",
            initial.len() / 3,
            protein.len()
        )));
    }

    let standard = CodonUsageTable::standard();
    for (pos, aa) in protein.chars().enumerate() {
        let listed = codon_usage.is_some_and(|t| t.contains(aa)) || standard.contains(aa);
        if !listed {
            return Err(CodonoptError::InvalidInput(format!(
                "amino acid '{}' at position {} has no codons",
                aa, pos
            )));
        }
    }

    let translated = translate(initial);
    if let Some(pos) = translated
        .chars()
        .zip(protein.chars())
        .position(|(got, want)| got != want)
    {
        return Err(CodonoptError::InvalidInput(format!(
            "initial sequence encodes '{}' at residue {}, expected '{}'",
            translated.chars().nth(pos).unwrap_or('?'),
            pos,
            protein.chars().nth(pos).unwrap_or('?')
        )));
    }

    if let Some(table) = codon_usage {
        for aa in table.empty_groups() {
            if protein.contains(aa) {
                log::warn!(
                    "All usage frequencies for {} are zero, sampling its codons uniformly",
                    aa
                );
            }
        }
    }
    Ok(())
}

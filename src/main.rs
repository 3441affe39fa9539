use anyhow::{bail, Context, Result};
use clap::Parser;
use codonopt::config::ConfigManager;
use codonopt::genetics::gc_profile;
use codonopt::{greedy_sequence, optimize, CodonUsageTable};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Optimise a coding sequence for GC content and codon usage.
#[derive(Debug, Parser)]
#[command(name = "codonopt", version)]
struct Cli {
    /// Target protein as one-letter amino acid codes.
    #[arg(long)]
    protein: String,

    /// Starting coding sequence; built from the most frequent codons when omitted.
    #[arg(long)]
    initial: Option<String>,

    /// JSON codon-usage table, grouped by amino acid or as a flat codon map.
    #[arg(long)]
    codon_usage: Option<PathBuf>,

    /// TOML or JSON configuration file.
    #[arg(long)]
    config: Option<PathBuf>,

    #[arg(long)]
    target_gc: Option<f64>,

    #[arg(long)]
    n_iter: Option<usize>,

    #[arg(long)]
    pop_size: Option<usize>,

    #[arg(long)]
    n_trials: Option<usize>,

    #[arg(long)]
    end_zone: Option<usize>,

    #[arg(long)]
    seed: Option<u64>,

    /// Report the min/max of a sliding-window GC profile of this width.
    #[arg(long)]
    gc_window: Option<usize>,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let mut manager = ConfigManager::new();
    match &cli.config {
        Some(path) => manager
            .load_from_file(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => manager.load_from_env().context("reading environment config")?,
    }
    manager
        .update(|c| {
            let o = &mut c.optimizer;
            o.target_gc = cli.target_gc.unwrap_or(o.target_gc);
            o.n_iter = cli.n_iter.unwrap_or(o.n_iter);
            o.pop_size = cli.pop_size.unwrap_or(o.pop_size);
            o.n_trials = cli.n_trials.unwrap_or(o.n_trials);
            o.end_zone = cli.end_zone.unwrap_or(o.end_zone);
            o.seed = cli.seed.or(o.seed);
        })
        .context("applying command-line overrides")?;

    let codon_usage = cli
        .codon_usage
        .as_deref()
        .map(load_codon_usage)
        .transpose()?;

    let protein = clean_protein(&cli.protein);
    let initial = match &cli.initial {
        Some(seq) => seq.clone(),
        None => {
            let table = codon_usage.as_ref().unwrap_or(CodonUsageTable::standard());
            greedy_sequence(&protein, table).context("building the initial sequence")?
        }
    };

    let result = optimize(&initial, &protein, codon_usage.as_ref(), manager.get())?;

    println!(
        "Optimal bounds: min_end_gc={:.2}, max_end_gc={:.2}",
        result.chosen_bounds.min_end_gc, result.chosen_bounds.max_end_gc
    );
    println!("Fitness: {:.4}", result.best_fitness);
    println!("GC after optimisation: {:.1}%", result.gc_content * 100.0);
    if let Some(cai) = result.cai {
        println!("CAI: {:.3}", cai);
    }
    if let Some(window) = cli.gc_window {
        let profile = gc_profile(&result.best_sequence, window);
        if profile.is_empty() {
            println!("GC profile: sequence shorter than window {}", window);
        } else {
            let min = profile.iter().copied().fold(f64::INFINITY, f64::min);
            let max = profile.iter().copied().fold(f64::NEG_INFINITY, f64::max);
            println!("GC profile (window {}): {:.1}% - {:.1}%", window, min, max);
        }
    }
    println!("Best sequence: {}", result.best_sequence);

    Ok(())
}

fn load_codon_usage(path: &Path) -> Result<CodonUsageTable> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("reading codon usage {}", path.display()))?;

    let grouped_err = match serde_json::from_str::<CodonUsageTable>(&contents) {
        Ok(table) => return Ok(table),
        Err(e) => e,
    };
    match serde_json::from_str::<BTreeMap<String, f64>>(&contents) {
        Ok(flat) => Ok(CodonUsageTable::from_codon_frequencies(flat)?),
        Err(flat_err) => bail!(
            "{} is not a codon usage table: {} (as a flat codon map: {})",
            path.display(),
            grouped_err,
            flat_err
        ),
    }
}

fn clean_protein(protein: &str) -> String {
    protein
        .chars()
        .filter(|c| !c.is_whitespace())
        .map(|c| c.to_ascii_uppercase())
        .collect()
}

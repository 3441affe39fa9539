pub mod operators;
pub mod population;
pub mod genetic_search;
pub mod progress;
pub mod tuner;

pub use operators::{elite_index, mutate, SelectionWheel};
pub use population::{GenerationStats, Population};
pub use genetic_search::{GeneticSearch, ProgressCallback, SearchOutcome, SearchProblem};
pub use progress::LogProgressCallback;
pub use tuner::{HyperparameterTuner, ParameterSampler, RandomSampler, TpeSampler, TuningOutcome};

pub mod traits;
pub mod optimizer;
pub mod fitness;
pub mod tuning;
pub mod manager;

pub use manager::{ConfigManager, AppConfig};
pub use optimizer::OptimizerConfig;
pub use fitness::FitnessConfig;
pub use tuning::{ParamRange, SamplerKind, TuningConfig};
pub use traits::ConfigSection;

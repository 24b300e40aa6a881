mod settings;

pub use settings::{save_log_level, Config, EXAMPLE_CONFIG};

mod settings;

pub use settings::{Bridge, Logger, Settings, DEFAULT_MOVEMENT_DURATION};

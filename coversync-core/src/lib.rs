pub mod configs;
pub mod driver;
pub mod error;
pub mod handles;
pub mod models;
pub mod services;
pub mod store;

pub use error::{BridgeError, DriverError, Result};

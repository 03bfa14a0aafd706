mod controller;
mod debouncer;
mod discovery;
mod dispatcher;
mod estimator;
mod registry;
mod timer;
mod translator;

pub use controller::*;
pub use debouncer::*;
pub use discovery::*;
pub use dispatcher::*;
pub use estimator::*;
pub use registry::*;
pub use timer::*;
pub use translator::*;

mod window_covering;

pub use window_covering::*;

pub mod customer;
pub mod logging;
pub mod metrics;

pub use customer::*;
pub use logging::*;
pub use metrics::*;

pub mod documents;
pub mod health;
pub mod metrics;

pub use documents::*;
pub use health::*;
pub use metrics::*;

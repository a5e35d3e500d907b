pub mod logging;
pub mod resource;

pub use logging::*;
pub use resource::*;

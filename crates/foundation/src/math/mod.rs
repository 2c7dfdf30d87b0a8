pub mod flat;
pub mod precision;

pub use flat::*;
pub use precision::*;

//! driveline - rear-axle differential model (pure types + solver)

pub mod diff;
pub mod load;
pub mod solve;
pub mod types;

pub use solve::step;
pub use types::*;

pub mod fertilizer;
pub mod improvement;
pub mod recommendation;
pub mod schedule;
pub mod soil;
pub mod units;

pub use fertilizer::*;
pub use improvement::*;
pub use recommendation::*;
pub use schedule::*;
pub use soil::*;

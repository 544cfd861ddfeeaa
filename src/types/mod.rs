pub mod chart;
pub mod position;
pub mod signals;

pub use chart::*;
pub use position::*;
pub use signals::*;

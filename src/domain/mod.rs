pub mod air;
pub mod facility;
pub mod geo;

pub use air::*;
pub use facility::*;
pub use geo::*;

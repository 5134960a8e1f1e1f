//! Sensor-backed air-quality estimation
//!
//! [`SensorResolver`] turns sparse, unreliable point readings from a
//! [`SensorLookup`] into an [`AqiEstimate`] for any coordinate.

pub mod error;
pub mod estimate;
pub mod lookup;
pub mod openweather;
pub mod resolver;

pub use error::*;
pub use estimate::*;
pub use lookup::*;
pub use openweather::OpenWeatherClient;
pub use resolver::*;

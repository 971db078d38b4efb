use serde::{Deserialize, Serialize};

/// Offset between the Kelvin and Celsius scales.
pub const KELVIN_OFFSET: f64 = 273.15;

/// Combined temperature for a city, as rendered by the front end.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemperatureReport {
    pub city: String,
    /// Average over all providers that answered in time, in Celsius.
    pub temp: f64,
    /// Wall-clock time spent serving the request, e.g. `"1.0012s"`.
    pub took: String,
}

pub fn kelvin_to_celsius(kelvin: f64) -> f64 {
    kelvin - KELVIN_OFFSET
}

pub mod districts;
pub mod openmeteo;

pub use districts::location_for;
pub use openmeteo::{OpenMeteoClient, WeatherAdvice};

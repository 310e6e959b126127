pub mod error;
pub mod feedback;
pub mod population;
pub mod rng;
pub mod script;

pub use error::{FixtureError, FixtureResult};
pub use population::{generate_population, Population, PopulationParams};

pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliArgs;

pub use adapters::{foursquare::FoursquareClient, headless_map::HeadlessMap};
pub use config::AppConfig;
pub use crate::core::{
    coordinator::{SubmitOutcome, ViewCoordinator},
    map_adapter::MapAdapter,
    query::VenueQuery,
};
pub use domain::model::{Alert, Coordinate, Mode, Venue};
pub use utils::error::{MapError, Result};

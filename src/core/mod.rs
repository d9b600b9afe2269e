pub mod content;
pub mod coordinator;
pub mod filter;
pub mod map_adapter;
pub mod query;
pub mod reveal;

pub use crate::domain::model::{Coordinate, Mode, SearchResults, Venue};
pub use crate::domain::ports::{MapSurface, VenueProvider};
pub use crate::utils::error::Result;

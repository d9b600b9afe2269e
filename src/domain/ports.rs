use crate::core::query::VenueQuery;
use crate::domain::model::{Coordinate, MarkerId, SearchResults, Venue, VenueDetails};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::time::Duration;

/// Primitive surface of the mapping SDK: markers, viewport and info window.
pub trait MapSurface: Send {
    /// Creates a marker detached from the map (not visible).
    fn create_marker(&mut self, position: Coordinate) -> MarkerId;
    fn remove_marker(&mut self, id: MarkerId);
    fn set_marker_visible(&mut self, id: MarkerId, visible: bool);
    fn is_marker_visible(&self, id: MarkerId) -> bool;
    fn center(&self) -> Coordinate;
    fn pan_to(&mut self, center: Coordinate);
    fn pan_by(&mut self, dx: i32, dy: i32);
    fn animate_marker(&mut self, id: MarkerId, duration: Duration);
    fn open_info_window(&mut self, id: MarkerId, html: &str);
}

/// The venue-search HTTP API.
#[async_trait]
pub trait VenueProvider: Send + Sync {
    /// One request, no retry.
    async fn search(&self, query: &VenueQuery) -> Result<SearchResults>;

    /// Secondary lookup. Never fails: unreadable answers degrade to
    /// [`VenueDetails::fallback`].
    async fn venue_details(&self, venue: &Venue) -> VenueDetails;
}

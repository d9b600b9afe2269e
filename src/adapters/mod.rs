// Adapters layer: concrete implementations of the domain ports.

pub mod foursquare;
pub mod headless_map;

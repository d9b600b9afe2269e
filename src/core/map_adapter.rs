use crate::core::content::info_window_html;
use crate::core::reveal::RevealQueue;
use crate::domain::model::{Coordinate, MarkerId, Venue};
use crate::domain::ports::MapSurface;
use std::collections::HashMap;
use std::time::Duration;

pub type MarkerSelectedCallback = Box<dyn FnMut(MarkerId) + Send>;

#[derive(Debug, Clone)]
pub struct MapAdapterOptions {
    /// Pause between two staggered marker reveals.
    pub reveal_delay: Duration,
    pub bounce_duration: Duration,
    /// Pixels the viewport is nudged down after a click so the popup fits.
    pub info_window_offset: i32,
}

impl Default for MapAdapterOptions {
    fn default() -> Self {
        Self {
            reveal_delay: Duration::from_millis(50),
            bounce_duration: Duration::from_millis(2000),
            info_window_offset: 200,
        }
    }
}

/// Registered marker: its position and the click listener's popup content.
#[derive(Debug, Clone)]
struct MarkerEntry {
    position: Coordinate,
    content: String,
}

/// Keeps the on-screen markers in step with a venue list.
pub struct MapAdapter<S: MapSurface> {
    surface: S,
    markers: HashMap<MarkerId, MarkerEntry>,
    reveals: RevealQueue,
    on_selected: Option<MarkerSelectedCallback>,
    options: MapAdapterOptions,
}

impl<S: MapSurface> MapAdapter<S> {
    pub fn new(surface: S) -> Self {
        Self::with_options(surface, MapAdapterOptions::default())
    }

    pub fn with_options(surface: S, options: MapAdapterOptions) -> Self {
        Self {
            surface,
            markers: HashMap::new(),
            reveals: RevealQueue::new(),
            on_selected: None,
            options,
        }
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn set_marker_selected_callback(&mut self, callback: MarkerSelectedCallback) {
        self.on_selected = Some(callback);
    }

    /// Replaces every marker with one per venue, recenters on `center` and
    /// queues the reveals in reverse list order. An empty list only clears.
    pub fn set_locations(&mut self, venues: &mut [Venue], center: Coordinate) {
        self.clear_markers();

        if venues.is_empty() {
            tracing::debug!("no venues to place, leaving viewport as is");
            return;
        }

        for venue in venues.iter_mut() {
            let id = self.surface.create_marker(venue.position);
            venue.marker = Some(id);
            self.markers.insert(
                id,
                MarkerEntry {
                    position: venue.position,
                    content: info_window_html(venue),
                },
            );
        }

        self.surface.pan_to(center);

        for id in venues.iter().rev().filter_map(|v| v.marker) {
            self.reveals.push(id);
        }

        tracing::debug!(markers = self.markers.len(), %center, "placed markers");
    }

    fn clear_markers(&mut self) {
        self.reveals.clear();
        for id in self.markers.keys() {
            self.surface.remove_marker(*id);
        }
        self.markers.clear();
    }

    pub fn pending_reveals(&self) -> usize {
        self.reveals.len()
    }

    /// Reveals the next queued marker, if any.
    pub fn reveal_next(&mut self) -> Option<MarkerId> {
        let id = self.reveals.pop_next()?;
        self.surface.set_marker_visible(id, true);
        Some(id)
    }

    /// Drains the reveal queue, pausing `reveal_delay` before each marker.
    pub async fn reveal_all(&mut self) -> usize {
        let mut revealed = 0;
        while !self.reveals.is_empty() {
            tokio::time::sleep(self.options.reveal_delay).await;
            if self.reveal_next().is_some() {
                revealed += 1;
            }
        }
        revealed
    }

    /// Detaches the marker from the map. The marker and its click listener
    /// stay registered. Returns false for markers this adapter does not own.
    pub fn hide_marker(&mut self, id: MarkerId) -> bool {
        if !self.markers.contains_key(&id) {
            return false;
        }
        self.reveals.remove(id);
        self.surface.set_marker_visible(id, false);
        true
    }

    pub fn show_marker(&mut self, id: MarkerId) -> bool {
        if !self.markers.contains_key(&id) {
            return false;
        }
        self.reveals.remove(id);
        self.surface.set_marker_visible(id, true);
        true
    }

    pub fn is_marker_visible(&self, id: MarkerId) -> bool {
        self.markers.contains_key(&id) && self.surface.is_marker_visible(id)
    }

    /// Runs the marker's click listener: notify, bounce, open the popup and
    /// bring it into view.
    pub fn click_marker(&mut self, id: MarkerId) -> bool {
        let Some(entry) = self.markers.get(&id) else {
            tracing::debug!(?id, "click on unknown marker ignored");
            return false;
        };
        let position = entry.position;
        let content = entry.content.clone();

        if let Some(callback) = self.on_selected.as_mut() {
            callback(id);
        }
        self.surface.animate_marker(id, self.options.bounce_duration);
        self.surface.open_info_window(id, &content);
        self.surface.pan_to(position);
        self.surface.pan_by(0, -self.options.info_window_offset);
        true
    }

    /// Re-renders the popup of the venue's marker, e.g. after a detail lookup.
    pub fn update_content(&mut self, venue: &Venue) {
        if let Some(entry) = venue.marker.and_then(|id| self.markers.get_mut(&id)) {
            entry.content = info_window_html(venue);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::headless_map::HeadlessMap;
    use std::sync::{Arc, Mutex};

    const CENTER: Coordinate = Coordinate::new(30.4583, -91.1403);

    fn venues() -> Vec<Venue> {
        vec![
            Venue::new("a", "Food Mart", Coordinate::new(30.45, -91.14)),
            Venue::new("b", "Joe's Diner", Coordinate::new(30.46, -91.15)),
            Venue::new("c", "Food Truck", Coordinate::new(30.47, -91.13)),
        ]
    }

    #[test]
    fn set_locations_creates_hidden_markers_and_recenters() {
        let mut adapter = MapAdapter::new(HeadlessMap::new(Coordinate::new(0.0, 0.0)));
        let mut list = venues();
        adapter.set_locations(&mut list, CENTER);

        assert!(list.iter().all(|v| v.marker.is_some()));
        assert_eq!(adapter.surface().marker_count(), 3);
        assert_eq!(adapter.surface().visible_markers().len(), 0);
        assert_eq!(adapter.surface().center(), CENTER);
        assert_eq!(adapter.pending_reveals(), 3);
    }

    #[test]
    fn reveals_run_in_reverse_list_order() {
        let mut adapter = MapAdapter::new(HeadlessMap::default());
        let mut list = venues();
        adapter.set_locations(&mut list, CENTER);

        assert_eq!(adapter.reveal_next(), list[2].marker);
        assert_eq!(adapter.reveal_next(), list[1].marker);
        assert_eq!(adapter.reveal_next(), list[0].marker);
        assert_eq!(adapter.reveal_next(), None);
    }

    #[test]
    fn empty_list_clears_without_recentering() {
        let start = Coordinate::new(1.0, 2.0);
        let mut adapter = MapAdapter::new(HeadlessMap::new(start));
        let mut list = venues();
        adapter.set_locations(&mut list, CENTER);
        adapter.surface_mut().pan_to(start);

        adapter.set_locations(&mut [], CENTER);

        assert_eq!(adapter.surface().marker_count(), 0);
        assert_eq!(adapter.pending_reveals(), 0);
        assert_eq!(adapter.surface().center(), start);
    }

    #[test]
    fn new_location_set_cancels_pending_reveals() {
        let mut adapter = MapAdapter::new(HeadlessMap::default());
        let mut first = venues();
        adapter.set_locations(&mut first, CENTER);
        adapter.reveal_next();

        let mut second = vec![Venue::new("d", "Bakery", CENTER)];
        adapter.set_locations(&mut second, CENTER);

        assert_eq!(adapter.pending_reveals(), 1);
        assert_eq!(adapter.reveal_next(), second[0].marker);
        for old in first.iter().filter_map(|v| v.marker) {
            assert!(!adapter.is_marker_visible(old));
            assert!(!adapter.show_marker(old));
        }
    }

    #[test]
    fn hidden_marker_is_not_revealed_later() {
        let mut adapter = MapAdapter::new(HeadlessMap::default());
        let mut list = venues();
        adapter.set_locations(&mut list, CENTER);

        let hidden = list[2].marker.unwrap();
        assert!(adapter.hide_marker(hidden));
        while adapter.reveal_next().is_some() {}

        assert!(!adapter.is_marker_visible(hidden));
        assert_eq!(adapter.surface().visible_markers().len(), 2);
    }

    #[test]
    fn click_keeps_working_after_hide_and_show() {
        let selected = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&selected);

        let mut adapter = MapAdapter::new(HeadlessMap::default());
        adapter.set_marker_selected_callback(Box::new(move |id| {
            sink.lock().unwrap().push(id);
        }));
        let mut list = venues();
        adapter.set_locations(&mut list, CENTER);

        let id = list[1].marker.unwrap();
        adapter.hide_marker(id);
        adapter.show_marker(id);
        assert!(adapter.click_marker(id));

        assert_eq!(*selected.lock().unwrap(), vec![id]);
        let surface = adapter.surface();
        let (opened, html) = surface.info_window().unwrap();
        assert_eq!(opened, id);
        assert!(html.contains("Joe&apos;s Diner"));
        assert_eq!(surface.center(), list[1].position);
        assert_eq!(surface.pan_offset(), (0, -200));
        assert_eq!(surface.bounces(), &[(id, Duration::from_millis(2000))]);
    }

    #[tokio::test]
    async fn reveal_all_drains_the_queue() {
        let mut adapter = MapAdapter::new(HeadlessMap::default());
        let mut list = venues();
        adapter.set_locations(&mut list, CENTER);

        assert_eq!(adapter.reveal_all().await, 3);
        assert_eq!(adapter.surface().visible_markers().len(), 3);
    }
}

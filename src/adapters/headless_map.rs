use crate::domain::model::{Coordinate, MarkerId};
use crate::domain::ports::MapSurface;
use std::collections::BTreeMap;
use std::time::Duration;

#[derive(Debug, Clone)]
struct HeadlessMarker {
    position: Coordinate,
    visible: bool,
}

/// In-memory [`MapSurface`]. Records what a real map would display so the
/// CLI can print it and tests can assert on it.
#[derive(Debug, Clone)]
pub struct HeadlessMap {
    center: Coordinate,
    zoom: u8,
    next_id: u64,
    markers: BTreeMap<MarkerId, HeadlessMarker>,
    pan_offset: (i32, i32),
    info_window: Option<(MarkerId, String)>,
    bounces: Vec<(MarkerId, Duration)>,
}

impl Default for HeadlessMap {
    fn default() -> Self {
        Self::new(Coordinate::new(0.0, 0.0))
    }
}

impl HeadlessMap {
    pub fn new(center: Coordinate) -> Self {
        Self {
            center,
            zoom: 15,
            next_id: 1,
            markers: BTreeMap::new(),
            pan_offset: (0, 0),
            info_window: None,
            bounces: Vec::new(),
        }
    }

    pub fn with_zoom(mut self, zoom: u8) -> Self {
        self.zoom = zoom;
        self
    }

    pub fn zoom(&self) -> u8 {
        self.zoom
    }

    pub fn marker_count(&self) -> usize {
        self.markers.len()
    }

    pub fn marker_position(&self, id: MarkerId) -> Option<Coordinate> {
        self.markers.get(&id).map(|m| m.position)
    }

    pub fn visible_markers(&self) -> Vec<MarkerId> {
        self.markers
            .iter()
            .filter(|(_, m)| m.visible)
            .map(|(id, _)| *id)
            .collect()
    }

    /// Pixel offset accumulated by `pan_by` since the last `pan_to`.
    pub fn pan_offset(&self) -> (i32, i32) {
        self.pan_offset
    }

    pub fn info_window(&self) -> Option<(MarkerId, &str)> {
        self.info_window
            .as_ref()
            .map(|(id, html)| (*id, html.as_str()))
    }

    pub fn bounces(&self) -> &[(MarkerId, Duration)] {
        &self.bounces
    }
}

impl MapSurface for HeadlessMap {
    fn create_marker(&mut self, position: Coordinate) -> MarkerId {
        let id = MarkerId(self.next_id);
        self.next_id += 1;
        self.markers.insert(
            id,
            HeadlessMarker {
                position,
                visible: false,
            },
        );
        id
    }

    fn remove_marker(&mut self, id: MarkerId) {
        self.markers.remove(&id);
        if matches!(self.info_window, Some((open, _)) if open == id) {
            self.info_window = None;
        }
    }

    fn set_marker_visible(&mut self, id: MarkerId, visible: bool) {
        if let Some(marker) = self.markers.get_mut(&id) {
            marker.visible = visible;
        }
    }

    fn is_marker_visible(&self, id: MarkerId) -> bool {
        self.markers.get(&id).is_some_and(|m| m.visible)
    }

    fn center(&self) -> Coordinate {
        self.center
    }

    fn pan_to(&mut self, center: Coordinate) {
        self.center = center;
        self.pan_offset = (0, 0);
    }

    fn pan_by(&mut self, dx: i32, dy: i32) {
        self.pan_offset.0 += dx;
        self.pan_offset.1 += dy;
    }

    fn animate_marker(&mut self, id: MarkerId, duration: Duration) {
        self.bounces.push((id, duration));
    }

    fn open_info_window(&mut self, id: MarkerId, html: &str) {
        self.info_window = Some((id, html.to_string()));
    }
}

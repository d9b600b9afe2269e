//! Mediates between user input, the venue provider and the map.
//!
//! The coordinator is in one of two modes. In [`Mode::Search`] a submit sends
//! the input text to the provider; a successful answer replaces the location
//! list, places markers and switches to [`Mode::Filter`]. In filter mode the
//! input text narrows the fetched list locally and hides the markers of the
//! venues that dropped out.

use crate::core::filter;
use crate::core::map_adapter::MapAdapter;
use crate::core::query::{VenueQuery, VenueQueryBuilder};
use crate::domain::model::{Alert, AlertLevel, Bounds, MarkerId, Mode, SearchResults, Venue};
use crate::domain::ports::{MapSurface, VenueProvider};
use crate::utils::error::Result;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

pub const DEFAULT_INITIAL_QUERY: &str = "Food near Baton Rouge";

#[derive(Debug, Clone)]
pub struct CoordinatorSettings {
    pub query_builder: VenueQueryBuilder,
    /// Text in the input box when the widget starts.
    pub initial_query: String,
}

impl Default for CoordinatorSettings {
    fn default() -> Self {
        Self {
            query_builder: VenueQueryBuilder::new(),
            initial_query: DEFAULT_INITIAL_QUERY.to_string(),
        }
    }
}

/// A search that has been sent but not applied yet.
#[derive(Debug, Clone)]
pub struct PendingSearch {
    generation: u64,
    pub query: VenueQuery,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Filter mode with matches: the first match was selected instead.
    SelectedFirstMatch,
    Applied,
    /// The provider failed; one alert was added.
    Failed,
    /// A newer search started while this one was in flight.
    Discarded,
    /// Filter mode without matches.
    Nothing,
}

pub struct ViewCoordinator<P: VenueProvider, S: MapSurface> {
    provider: P,
    map: MapAdapter<S>,
    query_builder: VenueQueryBuilder,
    locations: Vec<Venue>,
    /// Indices into `locations`, in list order.
    filtered: Vec<usize>,
    filter: String,
    mode: Mode,
    // shared with the marker-selected callback
    list_collapsed: Arc<AtomicBool>,
    alerts: Vec<Alert>,
    generation: u64,
}

impl<P: VenueProvider, S: MapSurface> ViewCoordinator<P, S> {
    pub fn new(provider: P, mut map: MapAdapter<S>, settings: CoordinatorSettings) -> Self {
        let list_collapsed = Arc::new(AtomicBool::new(true));

        let flag = Arc::clone(&list_collapsed);
        map.set_marker_selected_callback(Box::new(move |id: MarkerId| {
            tracing::debug!(?id, "marker selected, collapsing list");
            flag.store(true, Ordering::Relaxed);
        }));

        Self {
            provider,
            map,
            query_builder: settings.query_builder,
            locations: Vec::new(),
            filtered: Vec::new(),
            filter: settings.initial_query,
            mode: Mode::Search,
            list_collapsed,
            alerts: Vec::new(),
            generation: 0,
        }
    }

    /// Runs the first search with the initial input text.
    pub async fn start(&mut self) -> SubmitOutcome {
        self.search_submit().await
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    pub fn map(&self) -> &MapAdapter<S> {
        &self.map
    }

    pub fn map_mut(&mut self) -> &mut MapAdapter<S> {
        &mut self.map
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn filter(&self) -> &str {
        &self.filter
    }

    pub fn locations(&self) -> &[Venue] {
        &self.locations
    }

    pub fn filtered_locations(&self) -> Vec<&Venue> {
        self.filtered.iter().map(|&i| &self.locations[i]).collect()
    }

    pub fn alerts(&self) -> &[Alert] {
        &self.alerts
    }

    /// Venues whose marker is currently shown on the map.
    pub fn visible_locations(&self) -> Vec<&Venue> {
        self.locations
            .iter()
            .filter(|v| v.marker.is_some_and(|id| self.map.is_marker_visible(id)))
            .collect()
    }

    /// Input box changed. In filter mode the list narrows immediately.
    pub fn set_filter(&mut self, text: impl Into<String>) {
        self.filter = text.into();
        if self.mode == Mode::Filter {
            self.filter_locations();
        }
    }

    /// Explicit mode switch. Filter re-runs the filter and expands the list;
    /// search collapses the list.
    pub fn set_action(&mut self, mode: Mode) {
        tracing::debug!(from = %self.mode, to = %mode, "set action");
        self.mode = mode;
        match mode {
            Mode::Filter => self.filter_locations(),
            Mode::Search => self.collapse_list(),
        }
    }

    /// Narrows the fetched list to the venues matching the input text and
    /// syncs marker visibility with the result. No-op in search mode.
    pub fn filter_locations(&mut self) {
        if self.mode == Mode::Search {
            return;
        }

        let matching = filter::matching_indices(&self.locations, &self.filter);
        let mut next = matching.iter().copied().peekable();

        for (i, venue) in self.locations.iter().enumerate() {
            let is_match = next.next_if_eq(&i).is_some();
            let Some(id) = venue.marker else { continue };
            if !is_match {
                self.map.hide_marker(id);
            } else if !self.map.is_marker_visible(id) {
                self.map.show_marker(id);
            }
        }

        tracing::debug!(
            filter = %self.filter,
            matched = matching.len(),
            total = self.locations.len(),
            "filtered locations"
        );
        self.filtered = matching;
        self.expand_list();
    }

    /// Form submit. In filter mode with matches, selects the first match; in
    /// search mode, queries the provider and applies the answer.
    pub async fn search_submit(&mut self) -> SubmitOutcome {
        if self.mode == Mode::Filter {
            if self.filtered.is_empty() {
                return SubmitOutcome::Nothing;
            }
            self.select_location(0);
            return SubmitOutcome::SelectedFirstMatch;
        }

        let Some(pending) = self.begin_search() else {
            return SubmitOutcome::Nothing;
        };
        let result = self.provider.search(&pending.query).await;
        self.apply_search(pending, result)
    }

    /// Captures the input as a query around the current map center and
    /// clears the input. Any search begun earlier becomes stale.
    pub fn begin_search(&mut self) -> Option<PendingSearch> {
        if self.mode != Mode::Search {
            return None;
        }

        let text = self.filter.to_lowercase();
        let query = self.query_builder.build(&text, self.map.surface().center());
        self.filter.clear();
        self.generation += 1;

        tracing::info!(generation = self.generation, query = %query.query, "searching venues");
        Some(PendingSearch {
            generation: self.generation,
            query,
        })
    }

    /// Applies a provider answer unless a newer search has begun since.
    pub fn apply_search(
        &mut self,
        pending: PendingSearch,
        result: Result<SearchResults>,
    ) -> SubmitOutcome {
        if pending.generation != self.generation {
            tracing::warn!(
                stale = pending.generation,
                current = self.generation,
                "discarding result of superseded search"
            );
            return SubmitOutcome::Discarded;
        }

        match result {
            Ok(results) => {
                self.clear_alerts();

                let center = results
                    .center
                    .or_else(|| {
                        Bounds::from_coordinates(results.venues.iter().map(|v| v.position))
                            .map(|b| b.center())
                    })
                    .or_else(|| pending.query.anchor())
                    .unwrap_or_else(|| self.map.surface().center());

                let mut venues = results.venues;
                self.map.set_locations(&mut venues, center);
                tracing::info!(venues = venues.len(), %center, "search applied");

                self.filtered = (0..venues.len()).collect();
                self.locations = venues;
                self.set_action(Mode::Filter);
                SubmitOutcome::Applied
            }
            Err(e) => {
                tracing::error!("venue search failed: {} ({})", e, e.recovery_suggestion());
                self.add_alert(e.user_friendly_message(), AlertLevel::Danger);
                SubmitOutcome::Failed
            }
        }
    }

    /// Collapses the list and triggers the marker of the `index`-th filtered
    /// venue.
    pub fn select_location(&mut self, index: usize) -> bool {
        self.collapse_list();
        let Some(id) = self
            .filtered
            .get(index)
            .and_then(|&i| self.locations[i].marker)
        else {
            return false;
        };
        self.map.click_marker(id)
    }

    /// A marker was clicked on the map.
    pub fn on_marker_clicked(&mut self, id: MarkerId) -> bool {
        self.map.click_marker(id)
    }

    /// Fetches phone and website for the `index`-th location and refreshes
    /// its popup.
    pub async fn load_details(&mut self, index: usize) -> bool {
        let Some(venue) = self.locations.get(index) else {
            return false;
        };
        let details = self.provider.venue_details(venue).await;

        let venue = &mut self.locations[index];
        venue.details = Some(details);
        self.map.update_content(venue);
        true
    }

    pub fn is_list_collapsed(&self) -> bool {
        self.list_collapsed.load(Ordering::Relaxed)
    }

    pub fn toggle_list_collapsed(&mut self) {
        self.list_collapsed.fetch_xor(true, Ordering::Relaxed);
    }

    pub fn expand_list(&mut self) {
        self.list_collapsed.store(false, Ordering::Relaxed);
    }

    pub fn collapse_list(&mut self) {
        self.list_collapsed.store(true, Ordering::Relaxed);
    }

    /// CSS class for the list container.
    pub fn list_css_class(&self) -> &'static str {
        if self.is_list_collapsed() {
            ""
        } else {
            "list-expanded"
        }
    }

    /// Glyph for the list pulldown toggle.
    pub fn pulldown_icon(&self) -> &'static str {
        if self.filtered.is_empty() || self.is_list_collapsed() {
            "glyphicon-chevron-down"
        } else {
            "glyphicon-chevron-up"
        }
    }

    pub fn add_alert(&mut self, message: impl Into<String>, level: AlertLevel) {
        self.alerts.push(Alert::new(message, level));
    }

    pub fn clear_alerts(&mut self) {
        self.alerts.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::headless_map::HeadlessMap;
    use crate::domain::model::{Coordinate, VenueDetails};
    use crate::utils::error::MapError;
    use async_trait::async_trait;
    use std::sync::Mutex;

    const CENTER: Coordinate = Coordinate::new(30.4583, -91.1403);

    /// Answers every search with the same canned result.
    struct StubProvider {
        venues: Vec<Venue>,
        fail: bool,
        queries: Mutex<Vec<VenueQuery>>,
    }

    impl StubProvider {
        fn with(names: &[&str]) -> Self {
            let venues = names
                .iter()
                .enumerate()
                .map(|(i, name)| {
                    Venue::new(
                        format!("v{}", i),
                        *name,
                        Coordinate::new(30.45 + i as f64 * 0.01, -91.14),
                    )
                })
                .collect();
            Self {
                venues,
                fail: false,
                queries: Mutex::new(Vec::new()),
            }
        }

        fn failing() -> Self {
            Self {
                fail: true,
                ..Self::with(&[])
            }
        }
    }

    #[async_trait]
    impl VenueProvider for StubProvider {
        async fn search(&self, query: &VenueQuery) -> Result<SearchResults> {
            self.queries.lock().unwrap().push(query.clone());
            if self.fail {
                return Err(MapError::Provider {
                    code: 500,
                    message: "server_error".to_string(),
                });
            }
            Ok(SearchResults {
                venues: self.venues.clone(),
                center: Some(CENTER),
            })
        }

        async fn venue_details(&self, venue: &Venue) -> VenueDetails {
            VenueDetails::fallback(&venue.name)
        }
    }

    fn coordinator(provider: StubProvider) -> ViewCoordinator<StubProvider, HeadlessMap> {
        ViewCoordinator::new(
            provider,
            MapAdapter::new(HeadlessMap::new(CENTER)),
            CoordinatorSettings::default(),
        )
    }

    fn names(venues: &[&Venue]) -> Vec<String> {
        venues.iter().map(|v| v.name.clone()).collect()
    }

    #[tokio::test]
    async fn start_searches_initial_text_and_enters_filter_mode() {
        let mut vc = coordinator(StubProvider::with(&["Food Mart", "Joe's Diner"]));

        assert_eq!(vc.start().await, SubmitOutcome::Applied);

        let sent = vc.provider().queries.lock().unwrap().clone();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].query, "food");
        assert_eq!(vc.mode(), Mode::Filter);
        assert_eq!(vc.filter(), "");
        assert_eq!(vc.locations().len(), 2);
        assert_eq!(vc.visible_locations().len(), 2);
        assert!(!vc.is_list_collapsed());
    }

    #[tokio::test]
    async fn filtering_hides_non_matching_markers() {
        let mut vc = coordinator(StubProvider::with(&["Food Mart", "Joe's Diner", "Food Truck"]));
        vc.start().await;

        vc.set_filter("food");

        assert_eq!(names(&vc.filtered_locations()), vec!["Food Mart", "Food Truck"]);
        assert_eq!(names(&vc.visible_locations()), vec!["Food Mart", "Food Truck"]);

        vc.set_filter("");
        assert_eq!(vc.visible_locations().len(), 3);
    }

    #[tokio::test]
    async fn submit_in_filter_mode_selects_first_match() {
        let mut vc = coordinator(StubProvider::with(&["Food Mart", "Food Truck"]));
        vc.start().await;
        vc.set_filter("truck");

        assert_eq!(vc.search_submit().await, SubmitOutcome::SelectedFirstMatch);

        assert_eq!(vc.provider().queries.lock().unwrap().len(), 1);
        assert!(vc.is_list_collapsed());
        let (opened, _) = vc.map().surface().info_window().unwrap();
        assert_eq!(Some(opened), vc.locations()[1].marker);
    }

    #[tokio::test]
    async fn failure_adds_one_alert_and_keeps_locations() {
        let mut vc = coordinator(StubProvider::failing());
        vc.locations = vec![Venue::new("old", "Old Place", CENTER)];

        assert_eq!(vc.start().await, SubmitOutcome::Failed);

        assert_eq!(vc.alerts().len(), 1);
        assert_eq!(vc.alerts()[0].css_class(), "alert-danger");
        assert_eq!(vc.locations()[0].name, "Old Place");
        assert_eq!(vc.mode(), Mode::Search);
    }

    #[tokio::test]
    async fn stale_result_is_discarded() {
        let mut vc = coordinator(StubProvider::with(&[]));
        vc.set_filter("tacos");
        let first = vc.begin_search().unwrap();
        vc.set_filter("pizza");
        let second = vc.begin_search().unwrap();

        let stale = SearchResults {
            venues: vec![Venue::new("t", "Taco Stand", CENTER)],
            center: None,
        };
        assert_eq!(vc.apply_search(first, Ok(stale)), SubmitOutcome::Discarded);
        assert!(vc.locations().is_empty());
        assert_eq!(vc.mode(), Mode::Search);

        let fresh = SearchResults {
            venues: vec![Venue::new("p", "Pizza Place", CENTER)],
            center: None,
        };
        assert_eq!(vc.apply_search(second, Ok(fresh)), SubmitOutcome::Applied);
        assert_eq!(vc.locations()[0].name, "Pizza Place");
    }

    #[tokio::test]
    async fn success_clears_previous_alerts() {
        let mut vc = coordinator(StubProvider::with(&["Food Mart"]));
        vc.add_alert("old problem", AlertLevel::Warning);

        vc.start().await;

        assert!(vc.alerts().is_empty());
    }

    #[tokio::test]
    async fn marker_click_collapses_list() {
        let mut vc = coordinator(StubProvider::with(&["Food Mart"]));
        vc.start().await;
        assert!(!vc.is_list_collapsed());

        let id = vc.locations()[0].marker.unwrap();
        assert!(vc.on_marker_clicked(id));
        assert!(vc.is_list_collapsed());
    }

    #[tokio::test]
    async fn load_details_refreshes_popup() {
        let mut vc = coordinator(StubProvider::with(&["Food Mart"]));
        vc.start().await;

        assert!(vc.load_details(0).await);
        assert!(!vc.load_details(5).await);

        let id = vc.locations()[0].marker.unwrap();
        vc.on_marker_clicked(id);
        let (_, html) = vc.map().surface().info_window().unwrap();
        assert!(html.contains("Unlisted"));
    }

    #[test]
    fn list_presentation() {
        let mut vc = coordinator(StubProvider::with(&[]));
        assert_eq!(vc.list_css_class(), "");
        assert_eq!(vc.pulldown_icon(), "glyphicon-chevron-down");

        vc.toggle_list_collapsed();
        assert_eq!(vc.list_css_class(), "list-expanded");
        // still down: nothing to show
        assert_eq!(vc.pulldown_icon(), "glyphicon-chevron-down");

        vc.filtered = vec![0];
        assert_eq!(vc.pulldown_icon(), "glyphicon-chevron-up");
    }
}

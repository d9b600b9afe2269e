//! Turns free-text input into provider query parameters.
//!
//! A text such as `"pizza near downtown"` is split on the first locality
//! keyword into a subject and a locale and searched with `near`; anything
//! else is searched around a fallback center with `ll`.

use crate::domain::model::Coordinate;

/// Locality keywords, checked in this order. The surrounding spaces matter:
/// `"pizza nearby"` must not match ` near `.
pub const LOCALITY_KEYWORDS: [&str; 7] = [
    " near ",
    " nearby ",
    " surrounding ",
    " at ",
    " around ",
    " by ",
    " in ",
];

pub const DEFAULT_RADIUS_METERS: u32 = 3200;
pub const DEFAULT_INTENT: &str = "checkin";

/// Where the provider should look.
#[derive(Debug, Clone, PartialEq)]
pub enum SearchArea {
    /// A free-text locale for the provider to geocode.
    Near(String),
    LatLng(Coordinate),
}

#[derive(Debug, Clone, PartialEq)]
pub struct VenueQuery {
    pub area: SearchArea,
    pub query: String,
    pub intent: String,
    pub radius: u32,
}

impl VenueQuery {
    /// Builds a query with the default intent and radius.
    pub fn from_text(text: &str, fallback_center: Coordinate) -> Self {
        VenueQueryBuilder::new().build(text, fallback_center)
    }

    /// Ordered `(key, value)` pairs, without credentials.
    pub fn params(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::with_capacity(4);
        match &self.area {
            SearchArea::Near(locale) => params.push(("near", locale.clone())),
            SearchArea::LatLng(center) => params.push(("ll", center.to_string())),
        }
        params.push(("query", self.query.clone()));
        params.push(("intent", self.intent.clone()));
        params.push(("radius", self.radius.to_string()));
        params
    }

    pub fn to_query_string(&self) -> String {
        url::form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.params())
            .finish()
    }

    /// The center the query was anchored on, if it was not a free-text locale.
    pub fn anchor(&self) -> Option<Coordinate> {
        match self.area {
            SearchArea::LatLng(center) => Some(center),
            SearchArea::Near(_) => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct VenueQueryBuilder {
    intent: String,
    radius: u32,
}

impl Default for VenueQueryBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl VenueQueryBuilder {
    pub fn new() -> Self {
        Self {
            intent: DEFAULT_INTENT.to_string(),
            radius: DEFAULT_RADIUS_METERS,
        }
    }

    pub fn intent(mut self, intent: impl Into<String>) -> Self {
        self.intent = intent.into();
        self
    }

    pub fn radius(mut self, meters: u32) -> Self {
        self.radius = meters;
        self
    }

    pub fn build(&self, text: &str, fallback_center: Coordinate) -> VenueQuery {
        let (area, query) = match split_locality(text) {
            Some((subject, locale)) => (SearchArea::Near(locale.to_string()), subject.to_string()),
            None => (SearchArea::LatLng(fallback_center), text.to_string()),
        };

        tracing::debug!(?area, query = %query, "built venue query");

        VenueQuery {
            area,
            query,
            intent: self.intent.clone(),
            radius: self.radius,
        }
    }
}

/// Splits `text` on the first keyword (in keyword order) it contains.
/// Returns `(subject, locale)`: the piece before the first occurrence and the
/// piece after the last one.
pub fn split_locality(text: &str) -> Option<(&str, &str)> {
    LOCALITY_KEYWORDS.iter().find_map(|keyword| {
        let first = text.find(keyword)?;
        let last = text.rfind(keyword)?;
        Some((&text[..first], &text[last + keyword.len()..]))
    })
}

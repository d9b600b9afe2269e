//! Raw shapes of the Foursquare v2 JSON answers.

use crate::domain::model::{Coordinate, Rating, Tip, Venue};
use serde::Deserialize;

/// Every answer is wrapped in `{ "meta": {...}, "response": {...} }`.
#[derive(Debug, Deserialize)]
pub struct Envelope<T> {
    pub meta: Meta,
    pub response: Option<T>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Meta {
    pub code: i64,
    pub error_type: Option<String>,
    pub error_detail: Option<String>,
}

impl Meta {
    pub fn describe(&self) -> String {
        self.error_detail
            .clone()
            .or_else(|| self.error_type.clone())
            .unwrap_or_else(|| "no error detail".to_string())
    }
}

/// Payload of `venues/explore` (grouped items) or `venues/search` (flat list).
#[derive(Debug, Default, Deserialize)]
pub struct SearchPayload {
    #[serde(default)]
    pub groups: Vec<Group>,
    #[serde(default)]
    pub venues: Vec<RawVenue>,
    pub geocode: Option<Geocode>,
}

#[derive(Debug, Deserialize)]
pub struct Group {
    #[serde(default)]
    pub items: Vec<Item>,
}

#[derive(Debug, Deserialize)]
pub struct Item {
    pub venue: RawVenue,
    #[serde(default)]
    pub tips: Vec<RawTip>,
}

#[derive(Debug, Deserialize)]
pub struct Geocode {
    pub center: Option<Coordinate>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawVenue {
    pub id: String,
    pub name: String,
    pub location: RawLocation,
    pub rating: Option<f64>,
    pub rating_color: Option<String>,
    pub rating_signals: Option<u32>,
    pub url: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawLocation {
    pub lat: f64,
    pub lng: f64,
    #[serde(default)]
    pub formatted_address: Vec<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawTip {
    pub text: Option<String>,
    pub canonical_url: Option<String>,
    pub user: Option<RawUser>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawUser {
    pub first_name: Option<String>,
}

/// Payload of `venues/<id>`.
#[derive(Debug, Deserialize)]
pub struct DetailPayload {
    pub venue: RawDetailVenue,
}

#[derive(Debug, Deserialize)]
pub struct RawDetailVenue {
    pub contact: Option<Contact>,
    pub url: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Contact {
    pub formatted_phone: Option<String>,
}

impl RawVenue {
    pub fn into_venue(self, tip: Option<RawTip>) -> Venue {
        let position = Coordinate::new(self.location.lat, self.location.lng);
        let mut venue = Venue::new(self.id, self.name, position);

        venue.rating = self.rating.map(|score| Rating {
            score,
            color: self.rating_color,
            signals: self.rating_signals,
        });
        venue.address = self.location.formatted_address;
        venue.url = self.url;
        // a tip without text is useless as a review
        venue.tip = tip.and_then(|t| {
            Some(Tip {
                text: t.text?,
                author: t.user.and_then(|u| u.first_name),
                canonical_url: t.canonical_url,
            })
        });
        venue
    }
}

impl SearchPayload {
    /// Venues of the first group, or the flat list when there are no groups.
    pub fn into_venues(self) -> Vec<Venue> {
        match self.groups.into_iter().next() {
            Some(group) => group
                .items
                .into_iter()
                .map(|item| item.venue.into_venue(item.tips.into_iter().next()))
                .collect(),
            None => self
                .venues
                .into_iter()
                .map(|venue| venue.into_venue(None))
                .collect(),
        }
    }
}

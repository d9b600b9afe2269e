use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::utils::error::MapError;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinate {
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

/// Rendered as `lat,lng`, the format the provider expects for `ll`.
impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.lat, self.lng)
    }
}

/// Min/max bounding box around a set of coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub south: f64,
    pub west: f64,
    pub north: f64,
    pub east: f64,
}

impl Bounds {
    pub fn from_coordinates<I>(coords: I) -> Option<Self>
    where
        I: IntoIterator<Item = Coordinate>,
    {
        let mut iter = coords.into_iter();
        let first = iter.next()?;
        let init = Bounds {
            south: first.lat,
            west: first.lng,
            north: first.lat,
            east: first.lng,
        };
        Some(iter.fold(init, |b, c| Bounds {
            south: b.south.min(c.lat),
            west: b.west.min(c.lng),
            north: b.north.max(c.lat),
            east: b.east.max(c.lng),
        }))
    }

    pub fn center(&self) -> Coordinate {
        Coordinate::new(
            (self.south + self.north) / 2.0,
            (self.west + self.east) / 2.0,
        )
    }
}

/// Handle to a marker owned by the map surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MarkerId(pub u64);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tip {
    pub text: String,
    pub author: Option<String>,
    pub canonical_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rating {
    pub score: f64,
    /// Hex color without the leading `#`.
    pub color: Option<String>,
    pub signals: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VenueDetails {
    pub phone: String,
    pub website: String,
}

impl VenueDetails {
    pub const UNLISTED_PHONE: &'static str = "Unlisted";

    /// Placeholder used when the detail lookup cannot be read.
    pub fn fallback(venue_name: &str) -> Self {
        let query: String = url::form_urlencoded::byte_serialize(venue_name.as_bytes()).collect();
        Self {
            phone: Self::UNLISTED_PHONE.to_string(),
            website: format!("https://www.google.com/search?q={}", query),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Venue {
    pub id: String,
    pub name: String,
    pub position: Coordinate,
    pub rating: Option<Rating>,
    /// Formatted address lines, most specific first.
    pub address: Vec<String>,
    pub tip: Option<Tip>,
    pub url: Option<String>,
    pub details: Option<VenueDetails>,
    #[serde(skip)]
    pub marker: Option<MarkerId>,
}

impl Venue {
    pub fn new(id: impl Into<String>, name: impl Into<String>, position: Coordinate) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            position,
            rating: None,
            address: Vec::new(),
            tip: None,
            url: None,
            details: None,
            marker: None,
        }
    }

    pub fn with_address<I, S>(mut self, lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.address = lines.into_iter().map(Into::into).collect();
        self
    }

    pub fn first_address_line(&self) -> Option<&str> {
        self.address.first().map(String::as_str)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchResults {
    pub venues: Vec<Venue>,
    /// Geocoded center of the searched area, when the provider reports one.
    pub center: Option<Coordinate>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    #[default]
    Search,
    Filter,
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Search => f.write_str("search"),
            Mode::Filter => f.write_str("filter"),
        }
    }
}

impl FromStr for Mode {
    type Err = MapError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "search" => Ok(Mode::Search),
            "filter" => Ok(Mode::Filter),
            other => Err(MapError::ValidationError {
                message: format!("unknown mode '{}', expected 'search' or 'filter'", other),
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertLevel {
    #[default]
    Danger,
    Warning,
    Info,
    Success,
}

impl AlertLevel {
    fn as_str(self) -> &'static str {
        match self {
            AlertLevel::Danger => "danger",
            AlertLevel::Warning => "warning",
            AlertLevel::Info => "info",
            AlertLevel::Success => "success",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    pub message: String,
    pub level: AlertLevel,
    pub raised_at: DateTime<Utc>,
}

impl Alert {
    pub fn new(message: impl Into<String>, level: AlertLevel) -> Self {
        Self {
            message: message.into(),
            level,
            raised_at: Utc::now(),
        }
    }

    pub fn css_class(&self) -> String {
        format!("alert-{}", self.level.as_str())
    }
}

#![allow(dead_code)]

use neighborhood_map::adapters::foursquare::ProviderSettings;
use neighborhood_map::core::coordinator::CoordinatorSettings;
use neighborhood_map::core::map_adapter::MapAdapterOptions;
use neighborhood_map::{Coordinate, FoursquareClient, HeadlessMap, MapAdapter, ViewCoordinator};
use std::time::Duration;

pub const BATON_ROUGE: Coordinate = Coordinate::new(30.4583, -91.1403);

pub fn client_for(base_url: &str) -> FoursquareClient {
    FoursquareClient::new(ProviderSettings::new("test-id", "test-secret").with_base_url(base_url))
        .unwrap()
}

pub fn view_for(base_url: &str) -> ViewCoordinator<FoursquareClient, HeadlessMap> {
    let options = MapAdapterOptions {
        reveal_delay: Duration::from_millis(1),
        ..MapAdapterOptions::default()
    };
    ViewCoordinator::new(
        client_for(base_url),
        MapAdapter::with_options(HeadlessMap::new(BATON_ROUGE), options),
        CoordinatorSettings::default(),
    )
}

/// `venues/explore` answer with three venues in one group.
pub fn explore_body() -> serde_json::Value {
    serde_json::json!({
        "meta": {"code": 200, "requestId": "abc"},
        "response": {
            "geocode": {
                "what": "",
                "where": "baton rouge",
                "center": {"lat": 30.45075, "lng": -91.15455}
            },
            "groups": [{
                "type": "Recommended Places",
                "name": "recommended",
                "items": [
                    {
                        "venue": {
                            "id": "v1",
                            "name": "Food Mart",
                            "location": {
                                "lat": 30.451,
                                "lng": -91.187,
                                "formattedAddress": ["100 Main St", "Baton Rouge, LA 70801"]
                            },
                            "rating": 8.1,
                            "ratingColor": "73CF42",
                            "ratingSignals": 40
                        },
                        "tips": [{
                            "text": "Great boudin",
                            "canonicalUrl": "https://foursquare.com/item/t1",
                            "user": {"firstName": "Ann"}
                        }]
                    },
                    {
                        "venue": {
                            "id": "v2",
                            "name": "Joe's Diner",
                            "location": {
                                "lat": 30.442,
                                "lng": -91.131,
                                "formattedAddress": ["12 Oak St", "Baton Rouge, LA 70802"]
                            }
                        }
                    },
                    {
                        "venue": {
                            "id": "v3",
                            "name": "Food Truck",
                            "location": {"lat": 30.460, "lng": -91.120}
                        },
                        "tips": []
                    }
                ]
            }]
        }
    })
}

pub fn error_body(code: i64) -> serde_json::Value {
    serde_json::json!({
        "meta": {
            "code": code,
            "errorType": "param_error",
            "errorDetail": "Must provide a valid ll or near parameter"
        },
        "response": {}
    })
}

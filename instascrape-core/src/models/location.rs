//! Locations.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::json::{f64_at, flag_at, required_str, str_at};
use crate::error::CoreError;

/// A location page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    /// Facebook location id.
    pub id: String,
    /// Display name.
    pub name: String,
    /// URL slug.
    pub slug: Option<String>,
    /// Latitude.
    pub lat: Option<f64>,
    /// Longitude.
    pub lng: Option<f64>,
    /// Whether the location has a browsable page.
    pub has_public_page: bool,
}

impl Location {
    /// Maps the `location` object of a location page.
    pub fn from_json(location: &Value) -> Result<Self, CoreError> {
        Ok(Self {
            id: required_str(location, "/id")?,
            name: required_str(location, "/name")?,
            slug: str_at(location, "/slug"),
            lat: f64_at(location, "/lat"),
            lng: f64_at(location, "/lng"),
            has_public_page: flag_at(location, "/has_public_page"),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_json() {
        let location = Location::from_json(&json!({
            "id": "1",
            "name": "Berlin",
            "lat": 52.52,
            "lng": "13.40",
            "has_public_page": true
        }))
        .unwrap();
        assert_eq!(location.name, "Berlin");
        assert_eq!(location.lng, Some(13.40));
        assert!(location.has_public_page);
    }
}

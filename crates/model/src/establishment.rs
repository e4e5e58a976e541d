use std::{collections::BTreeMap, error, fmt};

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use utility::{geo, serde::number};

use crate::ExampleData;

/// An establishment as submitted by a caller. Every field is optional so the
/// same type serves creation (where `name`, `lat` and `lon` are required) and
/// partial updates (where presence decides which tags are touched).
#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Establishment {
    pub name: Option<String>,

    #[serde(default, deserialize_with = "number::deserialize_option")]
    pub lat: Option<f64>,

    #[serde(default, deserialize_with = "number::deserialize_option")]
    pub lon: Option<f64>,

    pub accepts_lightning: Option<bool>,
    pub accepts_onchain: Option<bool>,
    pub address: Option<String>,
    pub website: Option<String>,
    pub phone: Option<String>,
    pub description: Option<String>,

    /// Kind of venue, e.g. `cafe` or `store`.
    #[serde(rename = "type")]
    pub kind: Option<String>,

    /// Raw OSM tags, applied after all derived ones.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub tags: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lon: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    MissingField(&'static str),
    LatitudeOutOfRange(f64),
    LongitudeOutOfRange(f64),
    InvalidWebsite(String),
}

impl error::Error for ValidationError {}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::MissingField(field) => write!(f, "Missing required field: {field}"),
            Self::LatitudeOutOfRange(lat) => {
                write!(f, "Latitude must be between -90 and 90 (got {lat})")
            }
            Self::LongitudeOutOfRange(lon) => {
                write!(f, "Longitude must be between -180 and 180 (got {lon})")
            }
            Self::InvalidWebsite(website) => write!(
                f,
                "Website must start with http:// or https:// (got '{website}')"
            ),
        }
    }
}

impl Establishment {
    pub fn new<S: Into<String>>(name: S, lat: f64, lon: f64) -> Self {
        Self {
            name: Some(name.into()),
            lat: Some(lat),
            lon: Some(lon),
            ..Default::default()
        }
    }

    /// Checks everything a new registry entry needs and hands back its
    /// position. Required fields are reported in the order name, lat, lon.
    pub fn validate_for_create(&self) -> Result<Coordinates, ValidationError> {
        if self.name.is_none() {
            return Err(ValidationError::MissingField("name"));
        }
        let lat = self.lat.ok_or(ValidationError::MissingField("lat"))?;
        let lon = self.lon.ok_or(ValidationError::MissingField("lon"))?;

        self.validate_values()?;

        Ok(Coordinates { lat, lon })
    }

    /// Checks only the values that are present.
    pub fn validate_for_update(&self) -> Result<(), ValidationError> {
        self.validate_values()
    }

    fn validate_values(&self) -> Result<(), ValidationError> {
        if let Some(lat) = self.lat {
            if !geo::is_valid_latitude(lat) {
                return Err(ValidationError::LatitudeOutOfRange(lat));
            }
        }
        if let Some(lon) = self.lon {
            if !geo::is_valid_longitude(lon) {
                return Err(ValidationError::LongitudeOutOfRange(lon));
            }
        }
        if let Some(website) = self.website.as_deref().filter(|w| !w.is_empty()) {
            if !(website.starts_with("http://") || website.starts_with("https://")) {
                return Err(ValidationError::InvalidWebsite(website.to_owned()));
            }
        }
        Ok(())
    }
}

impl ExampleData for Establishment {
    fn example_data() -> Self {
        Self {
            name: Some("Café do Bitcoin".to_owned()),
            lat: Some(-25.0945),
            lon: Some(-50.1633),
            accepts_lightning: Some(true),
            accepts_onchain: Some(false),
            address: Some("Rua XV de Novembro, 100, Ponta Grossa".to_owned()),
            website: Some("https://example.com".to_owned()),
            phone: Some("+55 42 99999-0000".to_owned()),
            description: Some("Coffee and snacks".to_owned()),
            kind: Some("cafe".to_owned()),
            tags: BTreeMap::from([("opening_hours".to_owned(), "Mo-Fr 08:00-18:00".to_owned())]),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(Establishment { lat: Some(1.0), lon: Some(1.0), ..Default::default() }, "name")]
    #[case(Establishment { name: Some("x".into()), lon: Some(1.0), ..Default::default() }, "lat")]
    #[case(Establishment { name: Some("x".into()), lat: Some(1.0), ..Default::default() }, "lon")]
    #[case(Establishment::default(), "name")]
    fn create_names_first_missing_field(
        #[case] establishment: Establishment,
        #[case] field: &'static str,
    ) {
        let error = establishment.validate_for_create().unwrap_err();
        assert_eq!(error, ValidationError::MissingField(field));
        assert!(error.to_string().contains(field));
    }

    #[rstest]
    #[case(90.01, 0.0)]
    #[case(-90.01, 0.0)]
    #[case(0.0, 180.01)]
    #[case(0.0, -180.01)]
    fn out_of_range_coordinates_are_rejected(#[case] lat: f64, #[case] lon: f64) {
        let establishment = Establishment::new("Café X", lat, lon);
        let error = establishment.validate_for_create().unwrap_err();
        assert!(matches!(
            error,
            ValidationError::LatitudeOutOfRange(_) | ValidationError::LongitudeOutOfRange(_)
        ));
        assert!(error.to_string().contains("between"));
    }

    #[test]
    fn boundary_coordinates_are_accepted() {
        let coordinates = Establishment::new("Pole", 90.0, -180.0)
            .validate_for_create()
            .unwrap();
        assert_eq!(coordinates, Coordinates { lat: 90.0, lon: -180.0 });
    }

    #[rstest]
    #[case("ftp://example.com", false)]
    #[case("www.example.com", false)]
    #[case("http://example.com", true)]
    #[case("https://example.com", true)]
    #[case("", true)]
    fn website_needs_http_scheme(#[case] website: &str, #[case] valid: bool) {
        let establishment = Establishment {
            website: Some(website.to_owned()),
            ..Establishment::new("Café X", -25.1, -50.15)
        };
        assert_eq!(establishment.validate_for_create().is_ok(), valid);
        assert_eq!(establishment.validate_for_update().is_ok(), valid);
    }

    #[test]
    fn update_does_not_require_fields() {
        let establishment = Establishment {
            accepts_onchain: Some(false),
            ..Default::default()
        };
        assert!(establishment.validate_for_update().is_ok());
    }

    #[test]
    fn deserializes_type_and_string_coordinates() {
        let establishment: Establishment = serde_json::from_str(
            r#"{"name": "Bar", "lat": "-25.1", "lon": -50.15, "type": "bar", "tags": {"a": "b"}}"#,
        )
        .unwrap();
        assert_eq!(establishment.kind.as_deref(), Some("bar"));
        assert_eq!(establishment.lat, Some(-25.1));
        assert_eq!(establishment.tags.get("a").map(String::as_str), Some("b"));
    }
}

use std::{error, fmt, str::FromStr};

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

pub const OSM_BASE_URL: &str = "https://www.openstreetmap.org";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum ElementType {
    Node,
    Way,
    Relation,
}

impl ElementType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Node => "node",
            Self::Way => "way",
            Self::Relation => "relation",
        }
    }
}

impl fmt::Display for ElementType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identifier of an OpenStreetMap element, written `{type}/{id}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct OsmId {
    pub element_type: ElementType,
    pub id: u64,
}

impl OsmId {
    pub fn new(element_type: ElementType, id: u64) -> Self {
        Self { element_type, id }
    }

    /// Public page of the element on openstreetmap.org.
    pub fn url(&self) -> String {
        format!("{OSM_BASE_URL}/{}/{}", self.element_type, self.id)
    }
}

impl fmt::Display for OsmId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}/{}", self.element_type, self.id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseOsmIdError(String);

impl error::Error for ParseOsmIdError {}

impl fmt::Display for ParseOsmIdError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "not an OSM element id: '{}'", self.0)
    }
}

impl FromStr for OsmId {
    type Err = ParseOsmIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let error = || ParseOsmIdError(s.to_owned());
        let (element_type, id) = s.split_once('/').ok_or_else(error)?;
        let element_type = match element_type {
            "node" => ElementType::Node,
            "way" => ElementType::Way,
            "relation" => ElementType::Relation,
            _ => return Err(error()),
        };
        let id = id.parse().map_err(|_| error())?;
        Ok(Self { element_type, id })
    }
}

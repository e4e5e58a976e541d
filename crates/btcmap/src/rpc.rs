use std::fmt;

use model::OsmTags;
use serde::Serialize;
use utility::geo::BoundingBox;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Method {
    AddNode,
    UpdateNode,
    SearchNodes,
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::AddNode => f.write_str("add_node"),
            Self::UpdateNode => f.write_str("update_node"),
            Self::SearchNodes => f.write_str("search_nodes"),
        }
    }
}

/// Envelope of every call: `{"method": ..., "params": {...}}`.
#[derive(Debug, Clone, Serialize)]
pub struct RpcRequest<P> {
    pub method: Method,
    pub params: P,
}

#[derive(Debug, Clone, Serialize)]
pub struct AddNodeParams<'a> {
    pub lat: f64,
    pub lon: f64,
    pub tags: &'a OsmTags,
}

#[derive(Debug, Clone, Serialize)]
pub struct UpdateNodeParams<'a> {
    pub id: &'a str,
    pub tags: &'a OsmTags,
}

#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, Serialize)]
pub struct SearchNodesParams<'a> {
    pub limit: usize,
    pub bounds: Option<BoundingBox>,
    pub query: Option<&'a str>,
}

#[cfg(test)]
mod tests {
    use rstest::rstest;
    use serde_json::json;

    use super::*;

    #[rstest]
    #[case(Method::AddNode, "add_node")]
    #[case(Method::UpdateNode, "update_node")]
    #[case(Method::SearchNodes, "search_nodes")]
    fn method_names_match_wire_names(#[case] method: Method, #[case] name: &str) {
        assert_eq!(method.to_string(), name);
        assert_eq!(serde_json::to_value(method).unwrap(), json!(name));
    }

    #[test]
    fn search_omits_absent_filters() {
        let request = RpcRequest {
            method: Method::SearchNodes,
            params: SearchNodesParams {
                limit: 100,
                bounds: None,
                query: None,
            },
        };
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({"method": "search_nodes", "params": {"limit": 100}})
        );
    }

    #[test]
    fn add_node_carries_position_and_tags() {
        let tags: OsmTags = [("name", "Café X"), ("currency:XBT", "yes")]
            .into_iter()
            .collect();
        let request = RpcRequest {
            method: Method::AddNode,
            params: AddNodeParams {
                lat: -25.1,
                lon: -50.15,
                tags: &tags,
            },
        };
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({
                "method": "add_node",
                "params": {
                    "lat": -25.1,
                    "lon": -50.15,
                    "tags": {"name": "Café X", "currency:XBT": "yes"}
                }
            })
        );
    }
}

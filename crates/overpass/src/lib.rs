use std::{error, fmt, sync::Arc, time::Duration};

use model::{
    osm::{ElementType, OsmId},
    OsmTags,
};
use serde::{Deserialize, Serialize};
use utility::geo::BoundingBox;

pub const OVERPASS_API_URL: &str = "https://overpass-api.de/api/interpreter";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(180);

#[derive(Debug, Clone)]
pub struct OverpassConfig {
    pub api_url: String,
    pub timeout: Duration,
}

#[derive(Debug, Clone)]
pub enum OverpassError {
    RequestError(Arc<reqwest::Error>),
    InvalidResponse {
        status_code: reqwest::StatusCode,
        url: String,
        response: Option<String>,
    },
}

impl error::Error for OverpassError {}

impl fmt::Display for OverpassError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::RequestError(e) => write!(f, "HTTP request error: {}", e),
            Self::InvalidResponse {
                status_code,
                url,
                response,
            } => match response {
                Some(text) => write!(f, "Invalid Response ({}) {}: {}", status_code, url, text),
                None => write!(f, "Invalid Response ({}) {}", status_code, url),
            },
        }
    }
}

impl From<reqwest::Error> for OverpassError {
    fn from(e: reqwest::Error) -> Self {
        Self::RequestError(Arc::new(e))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Center {
    pub lat: f64,
    pub lon: f64,
}

/// A raw element as returned by `out center;`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Element {
    #[serde(rename = "type")]
    pub element_type: ElementType,
    pub id: u64,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
    pub center: Option<Center>,
    #[serde(default)]
    pub tags: OsmTags,
}

impl Element {
    pub fn osm_id(&self) -> OsmId {
        OsmId::new(self.element_type, self.id)
    }

    /// Position used for classification: nodes carry their own coordinates,
    /// ways and relations the center computed by Overpass.
    pub fn position(&self) -> Option<(f64, f64)> {
        match self.element_type {
            ElementType::Node => self.lat.zip(self.lon),
            ElementType::Way | ElementType::Relation => {
                self.center.map(|center| (center.lat, center.lon))
            }
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Response {
    #[serde(default)]
    pub elements: Vec<Element>,
}

/// Overpass QL selecting every node, way and relation with
/// `currency:XBT=yes` inside `bbox`.
pub fn bitcoin_query(bbox: &BoundingBox) -> String {
    let area = format!("{},{},{},{}", bbox.south, bbox.west, bbox.north, bbox.east);
    format!(
        "[out:json];\n(\n  node[\"currency:XBT\"=\"yes\"]({area});\n  way[\"currency:XBT\"=\"yes\"]({area});\n  relation[\"currency:XBT\"=\"yes\"]({area});\n);\nout center;\n"
    )
}

pub struct OverpassClient {
    config: OverpassConfig,
    http: reqwest::Client,
}

impl OverpassClient {
    pub fn new(config: OverpassConfig) -> Result<Self, OverpassError> {
        let http = reqwest::Client::builder().timeout(config.timeout).build()?;
        Ok(Self { config, http })
    }

    pub async fn query(&self, query: &str) -> Result<Vec<Element>, OverpassError> {
        let url = &self.config.api_url;
        log::info!("Querying Overpass API at '{url}'.");

        let response = self.http.post(url).body(query.to_owned()).send().await?;

        match response.status() {
            status if status.is_success() => {
                let response: Response = response.json().await?;
                Ok(response.elements)
            }
            status_code => Err(OverpassError::InvalidResponse {
                status_code,
                url: url.clone(),
                response: response.text().await.ok(),
            }),
        }
    }

    pub async fn bitcoin_elements(&self, bbox: &BoundingBox) -> Result<Vec<Element>, OverpassError> {
        self.query(&bitcoin_query(bbox)).await
    }
}

#[cfg(test)]
mod tests {
    use axum::{http::StatusCode, routing::post, Json, Router};
    use serde_json::{json, Value};
    use tokio::net::TcpListener;

    use super::*;

    #[test]
    fn query_combines_all_element_types() {
        let query = bitcoin_query(&BoundingBox::new(-25.5, -50.5, -24.5, -49.5));
        assert!(query.starts_with("[out:json];"));
        assert!(query.contains("node[\"currency:XBT\"=\"yes\"](-25.5,-50.5,-24.5,-49.5);"));
        assert!(query.contains("way[\"currency:XBT\"=\"yes\"](-25.5,-50.5,-24.5,-49.5);"));
        assert!(query.contains("relation[\"currency:XBT\"=\"yes\"](-25.5,-50.5,-24.5,-49.5);"));
        assert!(query.trim_end().ends_with("out center;"));
    }

    #[test]
    fn position_depends_on_element_type() {
        let response: Response = serde_json::from_value(json!({
            "elements": [
                {"type": "node", "id": 1, "lat": -25.1, "lon": -50.1, "tags": {"name": "A"}},
                {"type": "way", "id": 2, "center": {"lat": -24.9, "lon": -50.0}},
                {"type": "relation", "id": 3}
            ]
        }))
        .unwrap();

        let positions = response
            .elements
            .iter()
            .map(Element::position)
            .collect::<Vec<_>>();
        assert_eq!(
            positions,
            vec![Some((-25.1, -50.1)), Some((-24.9, -50.0)), None]
        );
        assert_eq!(response.elements[1].osm_id().to_string(), "way/2");
        assert!(response.elements[1].tags.is_empty());
    }

    async fn fake_overpass(status: StatusCode, body: Value) -> String {
        let app = Router::new().route(
            "/api/interpreter",
            post(move |query: String| {
                let body = body.clone();
                async move {
                    assert!(query.contains("out center;"));
                    (status, Json(body))
                }
            }),
        );
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let address = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{address}/api/interpreter")
    }

    fn client(api_url: String) -> OverpassClient {
        OverpassClient::new(OverpassConfig {
            api_url,
            timeout: Duration::from_secs(5),
        })
        .unwrap()
    }

    #[tokio::test]
    async fn fetches_elements() {
        let url = fake_overpass(
            StatusCode::OK,
            json!({"elements": [{"type": "node", "id": 7, "lat": 1.0, "lon": 2.0}]}),
        )
        .await;

        let elements = client(url)
            .bitcoin_elements(&BoundingBox::new(0.0, 0.0, 3.0, 3.0))
            .await
            .unwrap();

        assert_eq!(elements.len(), 1);
        assert_eq!(elements[0].id, 7);
    }

    #[tokio::test]
    async fn server_errors_are_reported() {
        let url = fake_overpass(StatusCode::TOO_MANY_REQUESTS, json!({"remark": "slow down"})).await;

        let error = client(url)
            .bitcoin_elements(&BoundingBox::new(0.0, 0.0, 3.0, 3.0))
            .await
            .unwrap_err();

        assert!(matches!(
            error,
            OverpassError::InvalidResponse { status_code, .. }
                if status_code == StatusCode::TOO_MANY_REQUESTS
        ));
    }
}

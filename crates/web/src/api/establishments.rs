use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    Json,
};
use btcmap::DEFAULT_SEARCH_LIMIT;
use model::{osm::OsmId, Establishment};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utility::{geo::BoundingBox, let_also::LetAlso, serde::lenient};

use crate::{RegistryState, RouteResult};

#[serde_with::skip_serializing_none]
#[derive(Debug, Serialize)]
pub struct WriteResponse {
    pub success: bool,
    pub message: &'static str,
    pub data: Value,
    pub osm_url: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SearchResponse {
    pub success: bool,
    pub count: usize,
    pub establishments: Vec<Value>,
}

/// Values that do not parse count as omitted.
#[derive(Debug, Default, Deserialize)]
pub struct SearchParams {
    #[serde(default, deserialize_with = "lenient::deserialize_option")]
    pub south: Option<f64>,
    #[serde(default, deserialize_with = "lenient::deserialize_option")]
    pub west: Option<f64>,
    #[serde(default, deserialize_with = "lenient::deserialize_option")]
    pub north: Option<f64>,
    #[serde(default, deserialize_with = "lenient::deserialize_option")]
    pub east: Option<f64>,
    pub query: Option<String>,
    #[serde(default, deserialize_with = "lenient::deserialize_option")]
    pub limit: Option<usize>,
}

impl SearchParams {
    /// Bounds are only sent when all four edges are given.
    pub fn bounds(&self) -> Option<BoundingBox> {
        match (self.south, self.west, self.north, self.east) {
            (Some(south), Some(west), Some(north), Some(east)) => {
                Some(BoundingBox::new(south, west, north, east))
            }
            _ => None,
        }
    }
}

pub(crate) async fn add(
    State(registry): State<RegistryState>,
    payload: Result<Json<Establishment>, JsonRejection>,
) -> RouteResult<(StatusCode, Json<WriteResponse>)> {
    let client = registry.write_client()?;
    let Json(establishment) = payload?;
    establishment.validate_for_create()?;

    log::info!("Adding establishment {:?}.", establishment.name);
    let data = client.add(&establishment).await.map_err(|why| {
        log::error!("Could not add establishment: {why}");
        why
    })?;

    Ok((
        StatusCode::CREATED,
        Json(WriteResponse {
            success: true,
            message: "Establishment registered successfully",
            data,
            osm_url: None,
        }),
    ))
}

pub(crate) async fn update(
    State(registry): State<RegistryState>,
    Path(id): Path<String>,
    payload: Result<Json<Establishment>, JsonRejection>,
) -> RouteResult<Json<WriteResponse>> {
    let client = registry.write_client()?;
    let Json(establishment) = payload?;
    establishment.validate_for_update()?;

    log::info!("Updating establishment '{id}'.");
    let data = client.update(&id, &establishment).await.map_err(|why| {
        log::error!("Could not update establishment '{id}': {why}");
        why
    })?;

    Ok(Json(WriteResponse {
        success: true,
        message: "Establishment updated successfully",
        data,
        osm_url: id.parse::<OsmId>().ok().map(|osm_id| osm_id.url()),
    }))
}

pub(crate) async fn search(
    State(registry): State<RegistryState>,
    params: Result<Query<SearchParams>, QueryRejection>,
) -> RouteResult<Json<SearchResponse>> {
    let client = registry.client()?;
    let Query(params) = params?;
    let limit = params.limit.unwrap_or(DEFAULT_SEARCH_LIMIT);

    log::info!(
        "Searching establishments (bounds: {:?}, query: {:?}, limit: {limit}).",
        params.bounds(),
        params.query
    );
    client
        .search(params.bounds(), params.query.as_deref(), limit)
        .await
        .map_err(|why| {
            log::error!("Could not search establishments: {why}");
            why
        })?
        .let_owned(|establishments| {
            Ok(Json(SearchResponse {
                success: true,
                count: establishments.len(),
                establishments,
            }))
        })
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case(Some(-26.0), Some(-51.0), Some(-24.0), Some(-49.0), true)]
    #[case(Some(-26.0), Some(-51.0), Some(-24.0), None, false)]
    #[case(None, None, None, None, false)]
    fn bounds_need_all_four_edges(
        #[case] south: Option<f64>,
        #[case] west: Option<f64>,
        #[case] north: Option<f64>,
        #[case] east: Option<f64>,
        #[case] bounded: bool,
    ) {
        let params = SearchParams {
            south,
            west,
            north,
            east,
            ..Default::default()
        };
        assert_eq!(params.bounds().is_some(), bounded);
    }
}

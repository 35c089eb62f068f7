//! Wire shapes of Elasticsearch responses.
//!
//! Responses decode into these DTOs first; repositories then map `_id` plus
//! `_source` into domain entities.

use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub(super) struct IndexResponseDto {
    #[serde(rename = "_id")]
    pub(super) id: String,
}

#[derive(Debug, Deserialize)]
pub(super) struct GetResponseDto<T> {
    #[serde(rename = "_id")]
    pub(super) id: String,
    #[serde(default)]
    pub(super) found: bool,
    #[serde(rename = "_source")]
    pub(super) source: Option<T>,
}

#[derive(Debug, Deserialize)]
pub(super) struct SearchResponseDto<T> {
    pub(super) hits: HitsDto<T>,
}

#[derive(Debug, Deserialize)]
pub(super) struct HitsDto<T> {
    #[serde(default = "Vec::new")]
    pub(super) hits: Vec<HitDto<T>>,
}

#[derive(Debug, Deserialize)]
pub(super) struct HitDto<T> {
    #[serde(rename = "_id")]
    pub(super) id: String,
    #[serde(rename = "_source")]
    pub(super) source: T,
}

#[derive(Debug, Deserialize)]
pub(super) struct CountResponseDto {
    pub(super) count: u64,
}

#[derive(Debug, Deserialize)]
pub(super) struct SumResponseDto {
    pub(super) aggregations: SumAggregationsDto,
}

#[derive(Debug, Deserialize)]
pub(super) struct SumAggregationsDto {
    pub(super) total: SumValueDto,
}

#[derive(Debug, Deserialize)]
pub(super) struct SumValueDto {
    pub(super) value: Option<f64>,
}

/// Error envelope returned on non-2xx responses.
#[derive(Debug, Deserialize)]
pub(super) struct ErrorResponseDto {
    pub(super) error: ErrorCauseDto,
}

#[derive(Debug, Deserialize)]
pub(super) struct ErrorCauseDto {
    #[serde(rename = "type")]
    pub(super) kind: String,
    #[serde(default)]
    pub(super) reason: Option<String>,
}

impl<T> HitDto<T> {
    pub(super) fn into_pair(self) -> (String, T) {
        (self.id, self.source)
    }
}

//! Asset route handler.
//!
//! # Responsibilities
//! - Pull `cache_region` and the raw subpath from the matched route
//! - Decode subpath segments individually
//! - Run the view pipeline on the blocking pool
//! - Record metrics and log the outcome

use std::sync::Arc;
use std::time::Instant;

use axum::{
    body::Body,
    extract::{RawPathParams, State},
    http::{Request, StatusCode},
    response::{IntoResponse, Response},
};
use percent_encoding::percent_decode_str;

use crate::assets::{AssetResponse, AssetView};
use crate::error::AssetError;
use crate::http::request::RequestIdExt;
use crate::http::response::into_http;
use crate::observability::metrics;

/// Per-route state: the view behind one asset spec.
#[derive(Debug, Clone)]
pub struct AssetRoute {
    pub asset_spec: Arc<str>,
    pub view: Arc<AssetView>,
}

/// Split a raw (still percent-encoded) subpath and decode each segment.
///
/// Returns `None` when a segment is not valid UTF-8 once decoded.
pub fn decode_segments(raw: &str) -> Option<Vec<String>> {
    raw.split('/')
        .map(|segment| {
            percent_decode_str(segment)
                .decode_utf8()
                .ok()
                .map(|s| s.into_owned())
        })
        .collect()
}

pub async fn serve_asset(
    State(route): State<AssetRoute>,
    params: RawPathParams,
    request: Request<Body>,
) -> Response {
    let start = Instant::now();
    let request_id = request.request_id().to_string();

    let mut cache_region = None;
    let mut raw_subpath = None;
    for (key, value) in &params {
        match key {
            "cache_region" => cache_region = percent_decode_str(value).decode_utf8().ok(),
            "subpath" => raw_subpath = Some(value),
            _ => {}
        }
    }

    let segments = raw_subpath.and_then(decode_segments);
    let (cache_region, segments) = match (cache_region, segments) {
        (Some(region), Some(segments)) => (region.into_owned(), segments),
        _ => {
            tracing::debug!(request_id = %request_id, "Undecodable asset path");
            metrics::record_request(&route.asset_spec, 404, start);
            return (StatusCode::NOT_FOUND, "Not Found").into_response();
        }
    };

    tracing::debug!(
        request_id = %request_id,
        asset_spec = %route.asset_spec,
        cache_region = %cache_region,
        subpath = %segments.join("/"),
        "Serving asset"
    );

    let (parts, _body) = request.into_parts();
    let view = route.view.clone();
    let outcome = tokio::task::spawn_blocking(move || view.handle(&cache_region, &segments, &parts))
        .await
        .map_err(|e| AssetError::Task(e.to_string()))
        .and_then(|result| result);

    let response = match outcome {
        Ok(outcome) => {
            match &outcome {
                AssetResponse::NotModified { .. } => metrics::record_not_modified(&route.asset_spec),
                AssetResponse::Rendered { .. } => metrics::record_render(&route.asset_spec),
                _ => {}
            }
            into_http(outcome).await
        }
        Err(e) => Err(e),
    };

    // Errors log themselves in `IntoResponse`, inside the request span.
    let response = response.unwrap_or_else(IntoResponse::into_response);

    metrics::record_request(&route.asset_spec, response.status().as_u16(), start);
    response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_segments() {
        assert_eq!(
            decode_segments("js/app%20v2.js").unwrap(),
            vec!["js".to_string(), "app v2.js".to_string()]
        );
        // An encoded slash stays inside its segment.
        assert_eq!(
            decode_segments("a%2F..%2Fb").unwrap(),
            vec!["a/../b".to_string()]
        );
        assert!(decode_segments("bad%FF").is_none());
    }
}

//! Asset route names, patterns and URL building.
//!
//! # Responsibilities
//! - Derive route names and patterns from asset specs
//! - Remember which asset spec each route name serves
//! - Build absolute URLs for a named route against the request's origin
//!
//! # Design Decisions
//! - Immutable after startup (thread-safe without locks)
//! - Subpath segments are percent-encoded one by one
//! - Extra parameters become the query string

use std::collections::HashMap;

use axum::http::{header, request::Parts};
use url::Url;

use crate::assets::CacheRegion;
use crate::error::LookupError;

const X_FORWARDED_PROTO: &str = "x-forwarded-proto";

/// Fixed prefix shared by every asset route.
pub const ROUTE_PREFIX: &str = "__assets";

/// Route name for `asset_spec`.
pub fn route_name(asset_spec: &str) -> String {
    format!("{}_{}", ROUTE_PREFIX, asset_spec)
}

/// axum route pattern for `asset_spec`.
pub fn route_pattern(asset_spec: &str) -> String {
    format!("/{}/{}/{{cache_region}}/{{*subpath}}", ROUTE_PREFIX, asset_spec)
}

/// The routing layer's URL-building facility.
pub trait RouteUrlGenerator {
    fn route_url(
        &self,
        route_name: &str,
        cache_region: CacheRegion,
        subpath: &[String],
        query: &[(String, String)],
    ) -> Result<String, LookupError>;
}

/// Route name → asset spec.
#[derive(Debug, Clone, Default)]
pub struct RouteTable {
    routes: HashMap<String, String>,
}

impl RouteTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the route for `asset_spec`, returning its name.
    pub fn add(&mut self, asset_spec: &str) -> String {
        let name = route_name(asset_spec);
        self.routes
            .entry(name.clone())
            .or_insert_with(|| asset_spec.to_string());
        name
    }

    pub fn asset_spec(&self, route_name: &str) -> Option<&str> {
        self.routes.get(route_name).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// Bind this table to an application URL for building links.
    pub fn bind(&self, application_url: Url) -> BoundRoutes<'_> {
        BoundRoutes {
            table: self,
            base: application_url,
        }
    }
}

/// A [`RouteTable`] paired with the application URL links are built against.
#[derive(Debug, Clone)]
pub struct BoundRoutes<'a> {
    table: &'a RouteTable,
    base: Url,
}

impl RouteUrlGenerator for BoundRoutes<'_> {
    fn route_url(
        &self,
        route_name: &str,
        cache_region: CacheRegion,
        subpath: &[String],
        query: &[(String, String)],
    ) -> Result<String, LookupError> {
        let asset_spec = self
            .table
            .asset_spec(route_name)
            .ok_or_else(|| LookupError::UnknownRoute(route_name.to_string()))?;

        let mut url = self.base.clone();
        url.set_query(None);
        url.set_fragment(None);
        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|_| LookupError::InvalidBase(self.base.to_string()))?;
            segments
                .pop_if_empty()
                .extend([ROUTE_PREFIX, asset_spec, cache_region.as_str()])
                .extend(subpath);
        }
        if !query.is_empty() {
            url.query_pairs_mut().extend_pairs(query);
        }
        Ok(url.into())
    }
}

/// `scheme://host/` the request was addressed to.
///
/// Server-side request URIs carry no scheme, so the scheme comes from
/// `X-Forwarded-Proto` when a proxy set it and is `http` otherwise.
pub fn application_url(request: &Parts) -> Result<Url, LookupError> {
    let scheme = request
        .uri
        .scheme_str()
        .or_else(|| forwarded_proto(request))
        .unwrap_or("http");
    let host = request
        .headers
        .get(header::HOST)
        .and_then(|h| h.to_str().ok())
        .or_else(|| request.uri.authority().map(|a| a.as_str()))
        .unwrap_or("localhost");
    Ok(Url::parse(&format!("{}://{}/", scheme, host))?)
}

fn forwarded_proto(request: &Parts) -> Option<&'static str> {
    let value = request.headers.get(X_FORWARDED_PROTO)?.to_str().ok()?;
    match value.split(',').next().map(str::trim) {
        Some(proto) if proto.eq_ignore_ascii_case("https") => Some("https"),
        Some(proto) if proto.eq_ignore_ascii_case("http") => Some("http"),
        _ => None,
    }
}

//! Shared fixtures for integration tests.

use std::path::Path;
use std::sync::{Arc, Mutex};

use axum::body::{to_bytes, Body, Bytes};
use axum::http::{request::Parts, Request, Response};
use axum::Router;
use tempfile::TempDir;

use asset_view::assets::{PassthroughRenderer, RenderContext, TemplateRef, TemplateRenderer};
use asset_view::config::{parse_config, AssetServerConfig};
use asset_view::http::AssetServer;
use asset_view::lifecycle::build_registry;
use asset_view::error::AssetError;
use asset_view::registry::AssetRegistry;

/// Renders `rendered:<template name>` and remembers every template it saw.
#[allow(dead_code)]
#[derive(Debug, Default)]
pub struct RecordingRenderer {
    pub rendered: Mutex<Vec<String>>,
}

impl TemplateRenderer for RecordingRenderer {
    fn render(
        &self,
        template: TemplateRef<'_>,
        _context: &RenderContext,
        _request: &Parts,
    ) -> Result<Bytes, AssetError> {
        self.rendered.lock().unwrap().push(template.name.to_string());
        Ok(Bytes::from(format!("rendered:{}", template.name)))
    }
}

/// A package directory on disk with a few assets in it.
pub struct SitePackage {
    pub dir: TempDir,
}

impl SitePackage {
    pub fn new() -> Self {
        let pkg = Self {
            dir: tempfile::tempdir().unwrap(),
        };
        pkg.write("static/js/app.js", "console.log('hi');");
        pkg.write("static/css/site.css.gz", "not really gzip");
        pkg.write("static/page.html.mak", "<p>${title}</p>");
        pkg.write("static/template.mak", "no extension");
        pkg.write("secret.txt", "top secret");
        pkg.write("other/js/app.js", "// other");
        pkg
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    pub fn write(&self, relative: &str, contents: &str) {
        let path = self.dir.path().join(relative);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, contents).unwrap();
    }

    /// Config with a `site` package pointing here plus the given `[[assets]]` TOML.
    pub fn config(&self, assets: &str) -> AssetServerConfig {
        let toml = format!(
            "[packages]\nsite = '{}'\n\n{}",
            self.root().display(),
            assets
        );
        parse_config(&toml).unwrap()
    }
}

pub fn registry(config: &AssetServerConfig) -> Arc<AssetRegistry> {
    Arc::new(build_registry(config, Arc::new(PassthroughRenderer)).unwrap())
}

#[allow(dead_code)]
pub fn registry_with(
    config: &AssetServerConfig,
    renderer: Arc<dyn TemplateRenderer>,
) -> Arc<AssetRegistry> {
    Arc::new(build_registry(config, renderer).unwrap())
}

#[allow(dead_code)]
pub fn router(config: &AssetServerConfig) -> Router {
    AssetServer::build_router(config, registry(config))
}

#[allow(dead_code)]
pub fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .header("host", "assets.test")
        .body(Body::empty())
        .unwrap()
}

#[allow(dead_code)]
pub async fn body_string(response: Response<Body>) -> String {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

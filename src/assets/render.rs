//! Template rendering seam.
//!
//! The engine itself lives outside this crate; views only need something
//! that turns a template reference into body bytes.

use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

use axum::body::Bytes;
use axum::http::request::Parts;

use crate::error::AssetError;

/// Values handed to the renderer. Asset views always pass an empty context.
pub type RenderContext = BTreeMap<String, String>;

/// A template selected for rendering.
#[derive(Debug, Clone, Copy)]
pub struct TemplateRef<'a> {
    /// Fully-qualified name: `package:resource_path`, or an absolute path.
    pub name: &'a str,
    /// Physical location of the template source.
    pub file_path: &'a Path,
}

pub trait TemplateRenderer: Send + Sync + fmt::Debug {
    fn render(
        &self,
        template: TemplateRef<'_>,
        context: &RenderContext,
        request: &Parts,
    ) -> Result<Bytes, AssetError>;
}

/// Serves the template source unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct PassthroughRenderer;

impl TemplateRenderer for PassthroughRenderer {
    fn render(
        &self,
        template: TemplateRef<'_>,
        _context: &RenderContext,
        _request: &Parts,
    ) -> Result<Bytes, AssetError> {
        std::fs::read(template.file_path)
            .map(Bytes::from)
            .map_err(|e| AssetError::io(template.file_path, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    #[test]
    fn test_passthrough_returns_source() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("page.html.mak");
        std::fs::write(&path, "<p>${name}</p>").unwrap();

        let parts = Request::builder().body(()).unwrap().into_parts().0;
        let body = PassthroughRenderer
            .render(
                TemplateRef { name: "pkg:page.html.mak", file_path: &path },
                &RenderContext::new(),
                &parts,
            )
            .unwrap();
        assert_eq!(&body[..], b"<p>${name}</p>");
    }
}

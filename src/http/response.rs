//! Pipeline outcome → HTTP response.
//!
//! # Responsibilities
//! - Map `AssetResponse` variants to status codes and headers
//! - Stream static files without buffering them whole
//!
//! # Design Decisions
//! - ETag values go out exactly as computed (no added quotes)
//! - Not-found bodies are opaque
//! - File open failures after resolution are 500s, not 404s

use axum::{
    body::Body,
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use tokio_util::io::ReaderStream;

use crate::assets::content_type::ContentType;
use crate::assets::AssetResponse;
use crate::error::AssetError;

/// Turn a pipeline outcome into a response.
pub async fn into_http(outcome: AssetResponse) -> Result<Response, AssetError> {
    match outcome {
        AssetResponse::NotFound => Ok((StatusCode::NOT_FOUND, "Not Found").into_response()),
        AssetResponse::NotModified { etag } => {
            let mut headers = HeaderMap::new();
            insert_etag(&mut headers, Some(&etag))?;
            Ok((StatusCode::NOT_MODIFIED, headers).into_response())
        }
        AssetResponse::Rendered {
            body,
            content_type,
            etag,
        } => {
            let headers = asset_headers(content_type, etag.as_deref(), Some(body.len() as u64))?;
            // `Body` adds no default Content-Type, unlike `Bytes`.
            Ok((StatusCode::OK, headers, Body::from(body)).into_response())
        }
        AssetResponse::File {
            path,
            content_type,
            etag,
        } => {
            let file = tokio::fs::File::open(&path)
                .await
                .map_err(|e| AssetError::io(&path, e))?;
            let len = file
                .metadata()
                .await
                .map_err(|e| AssetError::io(&path, e))?
                .len();
            let headers = asset_headers(content_type, etag.as_deref(), Some(len))?;
            let body = Body::from_stream(ReaderStream::new(file));
            Ok((StatusCode::OK, headers, body).into_response())
        }
    }
}

fn asset_headers(
    content_type: ContentType,
    etag: Option<&str>,
    content_length: Option<u64>,
) -> Result<HeaderMap, AssetError> {
    let mut headers = HeaderMap::new();
    if let Some(mime) = content_type.mime {
        headers.insert(header::CONTENT_TYPE, HeaderValue::from_static(mime));
    }
    if let Some(encoding) = content_type.encoding {
        headers.insert(header::CONTENT_ENCODING, HeaderValue::from_static(encoding));
    }
    if let Some(len) = content_length {
        headers.insert(header::CONTENT_LENGTH, HeaderValue::from(len));
    }
    insert_etag(&mut headers, etag)?;
    Ok(headers)
}

fn insert_etag(headers: &mut HeaderMap, etag: Option<&str>) -> Result<(), AssetError> {
    if let Some(etag) = etag {
        let value = HeaderValue::from_str(etag)
            .map_err(|_| AssetError::InvalidHeader(format!("etag {:?}", etag)))?;
        headers.insert(header::ETAG, value);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Bytes};

    #[tokio::test]
    async fn test_not_found_and_not_modified() {
        let response = into_http(AssetResponse::NotFound).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let response = into_http(AssetResponse::NotModified { etag: "global-1".into() })
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_MODIFIED);
        assert_eq!(response.headers()[header::ETAG], "global-1");
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert!(body.is_empty());
    }

    #[tokio::test]
    async fn test_rendered_headers() {
        let response = into_http(AssetResponse::Rendered {
            body: Bytes::from_static(b"<p>hi</p>"),
            content_type: ContentType { mime: Some("text/html"), encoding: None },
            etag: Some("user-12.5".into()),
        })
        .await
        .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "text/html");
        assert_eq!(response.headers()[header::ETAG], "user-12.5");
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&body[..], b"<p>hi</p>");
    }

    #[tokio::test]
    async fn test_rendered_without_mime_has_no_content_type() {
        let response = into_http(AssetResponse::Rendered {
            body: Bytes::from_static(b"plain"),
            content_type: ContentType::default(),
            etag: None,
        })
        .await
        .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().get(header::CONTENT_TYPE).is_none());
    }

    #[tokio::test]
    async fn test_file_streamed() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a.js.gz");
        std::fs::write(&path, b"gzipped").unwrap();

        let response = into_http(AssetResponse::File {
            path,
            content_type: ContentType {
                mime: Some("application/javascript"),
                encoding: Some("gzip"),
            },
            etag: None,
        })
        .await
        .unwrap();
        assert_eq!(response.headers()[header::CONTENT_ENCODING], "gzip");
        assert_eq!(response.headers()[header::CONTENT_LENGTH], "7");
        assert!(response.headers().get(header::ETAG).is_none());
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&body[..], b"gzipped");
    }

    #[tokio::test]
    async fn test_vanished_file_is_server_error() {
        let result = into_http(AssetResponse::File {
            path: "/definitely/missing/file.css".into(),
            content_type: ContentType::default(),
            etag: None,
        })
        .await;
        assert!(matches!(result, Err(AssetError::Io { .. })));
    }
}

//! Response descriptors for index polls.
//!
//! The dispatcher decides status, headers and which file to stream; the HTTP
//! layer only turns the descriptor into a response.
//!
//! A served file is opened once and its headers are taken from that handle,
//! so a publish that renames a new index into place afterwards cannot change
//! what is streamed.

use axum::{
    body::Body,
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use chrono::{DateTime, Duration, Utc};
use playout_common::{Error, Result};
use std::path::{Path, PathBuf};
use tokio::fs::File;
use tokio_util::io::ReaderStream;

pub const SMIL_CONTENT_TYPE: &str = "application/smil+xml";
pub const INDEX_DISPOSITION: &str = "attachment; filename=index.smil";
pub const INDEX_CACHE_CONTROL: &str = "public, must-revalidate, max-age=864000, pre-check=864000";
pub const FALLBACK_CACHE_CONTROL: &str = "public, max-age=31536000";

/// An opened index file.
#[derive(Debug)]
pub struct IndexBody {
    pub path: PathBuf,
    pub file: File,
}

#[derive(Debug)]
pub struct IndexResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    /// File streamed as the body; `None` for an empty body.
    pub body: Option<IndexBody>,
}

impl IndexResponse {
    /// Serve `path`, or `304 Not Modified` when the client copy is current.
    pub async fn for_file(path: &Path, if_modified_since: Option<&str>) -> Result<Self> {
        let file = File::open(path).await?;
        let metadata = file.metadata().await?;
        let modified: DateTime<Utc> = metadata.modified()?.into();

        let mut headers = HeaderMap::new();
        headers.insert(header::CACHE_CONTROL, HeaderValue::from_static(INDEX_CACHE_CONTROL));
        headers.insert(header::LAST_MODIFIED, header_value(&http_date(modified))?);

        if not_modified_since(modified, if_modified_since) {
            tracing::debug!(path = %path.display(), "Index not modified");
            return Ok(Self {
                status: StatusCode::NOT_MODIFIED,
                headers,
                body: None,
            });
        }

        headers.insert(header::CONTENT_LENGTH, HeaderValue::from(metadata.len()));
        headers.insert(header::CONTENT_TYPE, HeaderValue::from_static(SMIL_CONTENT_TYPE));
        headers.insert(header::CONTENT_DISPOSITION, HeaderValue::from_static(INDEX_DISPOSITION));

        Ok(Self {
            status: StatusCode::OK,
            headers,
            body: Some(IndexBody {
                path: path.to_path_buf(),
                file,
            }),
        })
    }

    /// Tell the device to keep playing what it has.
    pub fn fallback() -> Self {
        let mut headers = HeaderMap::new();
        headers.insert(header::CACHE_CONTROL, HeaderValue::from_static(FALLBACK_CACHE_CONTROL));
        if let Ok(expires) = header_value(&http_date(Utc::now() + Duration::days(365))) {
            headers.insert(header::EXPIRES, expires);
        }

        Self {
            status: StatusCode::NOT_MODIFIED,
            headers,
            body: None,
        }
    }

    /// Refuse a device that could not be identified.
    pub fn rejected() -> Self {
        Self {
            status: StatusCode::FORBIDDEN,
            headers: HeaderMap::new(),
            body: None,
        }
    }
}

impl IntoResponse for IndexResponse {
    fn into_response(self) -> Response {
        let body = match self.body {
            Some(index) => Body::from_stream(ReaderStream::new(index.file)),
            None => Body::empty(),
        };

        let mut response = Response::new(body);
        *response.status_mut() = self.status;
        *response.headers_mut() = self.headers;
        response
    }
}

/// RFC 7231 IMF-fixdate.
pub fn http_date(at: DateTime<Utc>) -> String {
    at.format("%a, %d %b %Y %H:%M:%S GMT").to_string()
}

/// Compared at second resolution, the precision of HTTP dates.
fn not_modified_since(modified: DateTime<Utc>, if_modified_since: Option<&str>) -> bool {
    if_modified_since
        .and_then(|value| DateTime::parse_from_rfc2822(value.trim()).ok())
        .is_some_and(|since| modified.timestamp() <= since.timestamp())
}

fn header_value(value: &str) -> Result<HeaderValue> {
    HeaderValue::from_str(value).map_err(|e| Error::internal(format!("invalid header value {:?}: {}", value, e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn index_file() -> (tempfile::TempDir, PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("index.smil");
        std::fs::write(&path, "<smil/>").unwrap();
        (dir, path)
    }

    #[tokio::test]
    async fn test_full_response() {
        let (_dir, path) = index_file();

        let response = IndexResponse::for_file(&path, None).await.unwrap();
        assert_eq!(response.status, StatusCode::OK);
        assert_eq!(response.body.as_ref().map(|b| b.path.as_path()), Some(path.as_path()));
        assert_eq!(response.headers[header::CONTENT_LENGTH], "7");
        assert_eq!(response.headers[header::CONTENT_TYPE], SMIL_CONTENT_TYPE);
        assert_eq!(response.headers[header::CONTENT_DISPOSITION], INDEX_DISPOSITION);
        assert_eq!(response.headers[header::CACHE_CONTROL], INDEX_CACHE_CONTROL);
        assert!(response.headers[header::LAST_MODIFIED].to_str().unwrap().ends_with(" GMT"));
    }

    #[tokio::test]
    async fn test_not_modified() {
        let (_dir, path) = index_file();
        let later = http_date(Utc::now() + Duration::hours(1));

        let response = IndexResponse::for_file(&path, Some(later.as_str())).await.unwrap();
        assert_eq!(response.status, StatusCode::NOT_MODIFIED);
        assert!(response.body.is_none());
        assert!(response.headers.contains_key(header::LAST_MODIFIED));
        assert!(!response.headers.contains_key(header::CONTENT_LENGTH));
    }

    #[tokio::test]
    async fn test_own_last_modified_is_not_modified() {
        let (_dir, path) = index_file();

        let first = IndexResponse::for_file(&path, None).await.unwrap();
        let last_modified = first.headers[header::LAST_MODIFIED].to_str().unwrap().to_string();

        let second = IndexResponse::for_file(&path, Some(last_modified.as_str())).await.unwrap();
        assert_eq!(second.status, StatusCode::NOT_MODIFIED);
    }

    #[tokio::test]
    async fn test_stale_or_invalid_if_modified_since() {
        let (_dir, path) = index_file();

        for since in ["Thu, 01 Jan 1970 00:00:00 GMT", "yesterday", ""] {
            let response = IndexResponse::for_file(&path, Some(since)).await.unwrap();
            assert_eq!(response.status, StatusCode::OK, "{:?}", since);
        }
    }

    #[tokio::test]
    async fn test_missing_file() {
        let err = IndexResponse::for_file(Path::new("/nonexistent/index.smil"), None)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Io(_)));
    }

    #[tokio::test]
    async fn test_body_matches_headers_after_republish() {
        use crate::index::IndexPublisher;
        use http_body_util::BodyExt;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("abc-123").join("7.smil");
        let publisher = IndexPublisher::new();
        publisher.publish(&path, "<smil/>").unwrap();

        let index = IndexResponse::for_file(&path, None).await.unwrap();
        publisher
            .publish(&path, "<smil><body><seq/></body></smil>\n")
            .unwrap();

        let response = index.into_response();
        let declared: usize = response.headers()[header::CONTENT_LENGTH]
            .to_str()
            .unwrap()
            .parse()
            .unwrap();
        let body = response.into_body().collect().await.unwrap().to_bytes();

        assert_eq!(declared, body.len());
        assert_eq!(&body[..], b"<smil/>");
    }

    #[tokio::test]
    async fn test_into_response_without_body() {
        use http_body_util::BodyExt;

        let response = IndexResponse::fallback().into_response();
        assert_eq!(response.status(), StatusCode::NOT_MODIFIED);
        assert!(response.headers().contains_key(header::EXPIRES));
        let body = response.into_body().collect().await.unwrap().to_bytes();
        assert!(body.is_empty());
    }

    #[test]
    fn test_fallback() {
        let response = IndexResponse::fallback();
        assert_eq!(response.status, StatusCode::NOT_MODIFIED);
        assert_eq!(response.headers[header::CACHE_CONTROL], FALLBACK_CACHE_CONTROL);

        let expires = response.headers[header::EXPIRES].to_str().unwrap();
        let expires = DateTime::parse_from_rfc2822(expires).unwrap();
        assert!(expires.timestamp() > (Utc::now() + Duration::days(364)).timestamp());
        assert!(response.body.is_none());
    }

    #[test]
    fn test_rejected() {
        let response = IndexResponse::rejected();
        assert_eq!(response.status, StatusCode::FORBIDDEN);
        assert!(response.headers.is_empty());
        assert!(response.body.is_none());
    }

    #[test]
    fn test_http_date() {
        let at = DateTime::parse_from_rfc3339("1994-11-06T08:49:37Z").unwrap().with_timezone(&Utc);
        assert_eq!(http_date(at), "Sun, 06 Nov 1994 08:49:37 GMT");
    }
}

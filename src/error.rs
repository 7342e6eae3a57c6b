// SPDX-License-Identifier: MPL-2.0
//! Error types shared by the gallery core, the iced component and the host.
//!
//! Every error is `Clone` so it can travel inside iced messages; underlying
//! library errors are captured as strings at the boundary.

use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum Error {
    #[error("I/O Error: {0}")]
    Io(String),
    #[error("Config Error: {0}")]
    Config(String),
    #[error("Image Error: {0}")]
    Image(String),
    #[error("Fetch Error: {0}")]
    Fetch(#[from] FetchError),
    #[error("Render Error: {0}")]
    Render(#[from] RenderError),
}

/// Failure of a host page fetch.
///
/// A failed page is retryable: the edge that requested it re-arms and the next
/// proximity signal asks for the same page again.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FetchError {
    /// The host could not read the backing collection.
    #[error("I/O error while fetching page: {0}")]
    Io(String),

    /// The requested page does not exist in the host collection.
    #[error("page {page} is out of range (total pages: {total_pages})")]
    OutOfRange { page: usize, total_pages: usize },

    /// Any other host-reported failure.
    #[error("{0}")]
    Host(String),
}

/// Failure to produce stage content for an item.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RenderError {
    /// Source content could not be read.
    #[error("I/O error while rendering: {0}")]
    Io(String),

    /// Source content could not be decoded or parsed.
    #[error("malformed content: {0}")]
    Malformed(String),

    /// The renderer did not signal readiness in time.
    #[error("content was not ready after {secs} s")]
    Timeout { secs: u64 },

    /// Any other renderer-reported failure.
    #[error("{0}")]
    Host(String),
}

impl RenderError {
    /// Whether this failure came from the stage timeout rather than the renderer.
    #[must_use]
    pub fn is_timeout(&self) -> bool {
        matches!(self, RenderError::Timeout { .. })
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err.to_string())
    }
}

impl From<std::io::Error> for FetchError {
    fn from(err: std::io::Error) -> Self {
        FetchError::Io(err.to_string())
    }
}

impl From<std::io::Error> for RenderError {
    fn from(err: std::io::Error) -> Self {
        RenderError::Io(err.to_string())
    }
}

impl From<image_rs::ImageError> for Error {
    fn from(err: image_rs::ImageError) -> Self {
        Error::Image(err.to_string())
    }
}

impl From<image_rs::ImageError> for RenderError {
    fn from(err: image_rs::ImageError) -> Self {
        RenderError::Malformed(err.to_string())
    }
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for Error {
    fn from(err: toml::ser::Error) -> Self {
        Error::Config(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_formats_io_error() {
        let err = Error::Io("disk failure".to_string());
        assert_eq!(format!("{}", err), "I/O Error: disk failure");
    }

    #[test]
    fn from_io_error_produces_io_variant() {
        let io_error = std::io::Error::other("boom");
        let err: Error = io_error.into();
        match err {
            Error::Io(message) => assert!(message.contains("boom")),
            _ => panic!("expected Io variant"),
        }
    }

    #[test]
    fn config_error_formats_properly() {
        let err = Error::Config("bad field".into());
        assert_eq!(format!("{}", err), "Config Error: bad field");
    }

    #[test]
    fn fetch_error_wraps_into_crate_error() {
        let err: Error = FetchError::OutOfRange {
            page: 7,
            total_pages: 3,
        }
        .into();
        assert!(matches!(err, Error::Fetch(FetchError::OutOfRange { page: 7, .. })));
        assert!(format!("{}", err).contains("page 7 is out of range"));
    }

    #[test]
    fn render_timeout_is_detected() {
        assert!(RenderError::Timeout { secs: 10 }.is_timeout());
        assert!(!RenderError::Malformed("x".into()).is_timeout());
    }

    #[test]
    fn io_error_converts_to_fetch_and_render_errors() {
        let fetch: FetchError = std::io::Error::other("gone").into();
        assert!(matches!(fetch, FetchError::Io(msg) if msg.contains("gone")));

        let render: RenderError = std::io::Error::other("gone").into();
        assert!(matches!(render, RenderError::Io(msg) if msg.contains("gone")));
    }
}

use thiserror::Error;

/// Errors that fail a single tile load.
///
/// A failed load never aborts the frame loop; the texture is marked
/// [`crate::TextureState::Failed`] and its slot falls back to an ancestor.
#[derive(Debug, Error)]
pub enum LoadError {
    /// Network or connection failure before a response arrived.
    #[error("transport error: {0}")]
    Transport(String),

    /// The service answered with a status other than 200 or 404.
    #[error("unexpected HTTP status {0}")]
    Status(u16),

    /// Failed to read the response body.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// The response body is not a decodable image.
    #[error("decode error: {0}")]
    Decode(#[from] image::ImageError),
}

impl From<ureq::Error> for LoadError {
    fn from(err: ureq::Error) -> Self {
        match err {
            ureq::Error::Status(code, _) => LoadError::Status(code),
            ureq::Error::Transport(transport) => LoadError::Transport(transport.to_string()),
        }
    }
}

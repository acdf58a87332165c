use std::fmt;

/// Failures on the audio path.
///
/// All of these are recoverable: they are caught at the boundary of
/// the load/capture operation, turned into a short lowercase status
/// line for the overlay, and never reach the render loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AudioError {
    /// Microphone capture was refused.
    PermissionDenied,
    /// A loaded or dropped file is not audio.
    InvalidFileType,
    /// The audio bytes could not be decoded.
    Decode(String),
}

impl AudioError {
    /// The line shown in the on-screen status block.
    pub fn status_line(&self) -> String {
        format!("error: {}", self.to_string().to_lowercase())
    }
}

impl fmt::Display for AudioError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AudioError::PermissionDenied => write!(f, "permission denied to microphone"),
            AudioError::InvalidFileType => write!(f, "dragged file is not an audio file"),
            AudioError::Decode(msg) => write!(f, "could not decode audio: {msg}"),
        }
    }
}

impl std::error::Error for AudioError {}

use crate::decode::DecodedAudio;
use crate::error::AudioError;

/// Where the playing audio came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    File,
    Microphone,
}

impl SourceKind {
    pub fn name(&self) -> &'static str {
        match self {
            SourceKind::File => "file",
            SourceKind::Microphone => "microphone",
        }
    }
}

/// A newly acquired audio source, whichever of the load paths produced
/// it (file fetch, drag-and-drop, capture). One unifying input type
/// means one attach transition instead of three near-duplicate ones.
pub enum AudioInput {
    /// A decoded audio file played out by the feed.
    File { name: String, audio: DecodedAudio },
    /// A live capture stream; samples arrive via `AudioFeed::push_samples`.
    Microphone { stream: CaptureStream },
}

impl AudioInput {
    pub fn name(&self) -> &str {
        match self {
            AudioInput::File { name, .. } => name,
            AudioInput::Microphone { stream } => &stream.name,
        }
    }

    pub fn kind(&self) -> SourceKind {
        match self {
            AudioInput::File { .. } => SourceKind::File,
            AudioInput::Microphone { .. } => SourceKind::Microphone,
        }
    }
}

/// Handle to a live capture stream.
pub struct CaptureStream {
    pub name: String,
    pub sample_rate: u32,
}

/// Microphone capture contract, implemented by the platform layer.
///
/// A refused permission surfaces as `AudioError::PermissionDenied`;
/// the caller shows the status line and may retry.
pub trait CaptureProvider {
    fn capture(&mut self) -> Result<CaptureStream, AudioError>;
}

/// Gate for dropped files: anything without an `audio/*` media type is
/// rejected before decoding is attempted.
pub fn check_audio_media_type(media_type: &str) -> Result<(), AudioError> {
    if media_type.to_ascii_lowercase().starts_with("audio") {
        Ok(())
    } else {
        Err(AudioError::InvalidFileType)
    }
}

/// Decode dropped file bytes into an attachable input, checking the
/// media type first.
pub fn load_dropped_audio(
    name: &str,
    media_type: &str,
    data: &[u8],
) -> Result<AudioInput, AudioError> {
    check_audio_media_type(media_type)?;
    let audio = crate::decode::decode_audio(data)?;
    Ok(AudioInput::File {
        name: name.to_string(),
        audio,
    })
}

pub mod analyser;
pub mod decode;
pub mod error;
pub mod feed;
pub mod source;

pub use analyser::{Analyser, DEFAULT_FFT_SIZE};
pub use decode::{decode_audio, DecodedAudio};
pub use error::AudioError;
pub use feed::AudioFeed;
pub use source::{AudioInput, CaptureProvider, CaptureStream, SourceKind};

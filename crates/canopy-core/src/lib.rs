pub mod bands;
pub mod color;
pub mod mutator;
pub mod oscillator;
pub mod params;
pub mod rng;

pub use bands::{Band, BandSplit};
pub use color::Rgba;
pub use mutator::{StructuralMutator, SystemClock, WallClock};
pub use oscillator::Oscillator;
pub use params::{BarParams, CompositeMode, SpiralParams, TreeParams, VisualParameters, VizMode};
pub use rng::XorShift32;

pub mod frame;
pub mod input;
pub mod sched;
pub mod surface;
pub mod tree;

pub use frame::render_frame;
pub use input::{apply_event, InputEvent};
pub use sched::{MainLoop, Ticker, VizContext};
pub use surface::{DrawOp, DrawSurface, RecordingSurface, TextBaseline};
pub use tree::{render_tree, TreeContext};

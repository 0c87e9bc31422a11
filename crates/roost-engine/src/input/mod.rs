pub mod pointer;
pub mod queue;

pub use pointer::{Pointer, PointerState};
pub use queue::{InputEvent, InputQueue};

pub mod behavior;
pub mod bus;
pub mod signal;

pub use behavior::{install_pointer_behaviors, pointer_behavior, HitBoxes, POINTER_EVENTS};
pub use bus::{parse_spec, Behavior, Callback, EventBus, ListenerInfo};
pub use signal::{Event, Signal};

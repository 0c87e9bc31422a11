use std::cell::Cell;

use crate::input::queue::InputEvent;

/// Argument passed to every callback of a trigger.
///
/// After each fired listener the bus asks whether propagation was stopped;
/// if so, the remaining listeners for that trigger are skipped.
pub trait Event {
    fn is_propagation_stopped(&self) -> bool {
        false
    }
}

/// Triggers that carry no argument.
impl Event for () {}

/// The engine's event argument: an optional input payload plus the usual
/// DOM-style propagation and default flags. Flags use `Cell` so listeners can
/// set them through a shared reference.
#[derive(Debug, Default)]
pub struct Signal {
    pub input: Option<InputEvent>,
    propagation_stopped: Cell<bool>,
    default_prevented: Cell<bool>,
}

impl Signal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_input(input: InputEvent) -> Self {
        Self {
            input: Some(input),
            ..Self::default()
        }
    }

    /// Keep listeners later in the dispatch order from seeing this signal.
    pub fn stop_propagation(&self) {
        self.propagation_stopped.set(true);
    }

    pub fn prevent_default(&self) {
        self.default_prevented.set(true);
    }

    pub fn is_default_prevented(&self) -> bool {
        self.default_prevented.get()
    }
}

impl Event for Signal {
    fn is_propagation_stopped(&self) -> bool {
        self.propagation_stopped.get()
    }
}

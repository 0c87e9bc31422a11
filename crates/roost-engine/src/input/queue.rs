use glam::Vec2;

/// Input events the engine understands, in canvas coordinates.
/// Each maps onto the DOM event name it is triggered under on the bus.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    PointerDown { pos: Vec2 },
    PointerUp { pos: Vec2 },
    Click { pos: Vec2 },
    PointerMove { pos: Vec2 },
    /// The pointer left the canvas.
    PointerLeave,
    TouchStart { pos: Vec2 },
    TouchEnd { pos: Vec2 },
    TouchMove { pos: Vec2 },
    KeyDown { key_code: u32 },
    KeyUp { key_code: u32 },
    /// A custom event from the page around the canvas (HUD buttons, etc.).
    /// `kind` identifies the event type; `a`, `b`, `c` carry arbitrary data.
    Custom { kind: u32, a: f32, b: f32, c: f32 },
}

impl InputEvent {
    /// Bus event name this input is triggered under.
    pub fn event_name(&self) -> &'static str {
        match self {
            InputEvent::PointerDown { .. } => "mousedown",
            InputEvent::PointerUp { .. } => "mouseup",
            InputEvent::Click { .. } => "click",
            InputEvent::PointerMove { .. } => "mousemove",
            InputEvent::PointerLeave => "mouseleave",
            InputEvent::TouchStart { .. } => "touchstart",
            InputEvent::TouchEnd { .. } => "touchend",
            InputEvent::TouchMove { .. } => "touchmove",
            InputEvent::KeyDown { .. } => "keydown",
            InputEvent::KeyUp { .. } => "keyup",
            InputEvent::Custom { .. } => "custom",
        }
    }

    /// Canvas position carried by pointer and touch events.
    pub fn position(&self) -> Option<Vec2> {
        match *self {
            InputEvent::PointerDown { pos }
            | InputEvent::PointerUp { pos }
            | InputEvent::Click { pos }
            | InputEvent::PointerMove { pos }
            | InputEvent::TouchStart { pos }
            | InputEvent::TouchEnd { pos }
            | InputEvent::TouchMove { pos } => Some(pos),
            _ => None,
        }
    }
}

/// A queue of input events.
/// The platform pushes events as they arrive; the scheduler drains them once per frame.
pub struct InputQueue {
    events: Vec<InputEvent>,
}

impl InputQueue {
    pub fn new() -> Self {
        Self {
            events: Vec::with_capacity(32),
        }
    }

    pub fn push(&mut self, event: InputEvent) {
        self.events.push(event);
    }

    /// Drain all pending events. Returns a Vec and clears the queue.
    pub fn drain(&mut self) -> Vec<InputEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn iter(&self) -> impl Iterator<Item = &InputEvent> {
        self.events.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }
}

impl Default for InputQueue {
    fn default() -> Self {
        Self::new()
    }
}

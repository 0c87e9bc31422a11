use glam::Vec2;

/// The visible window onto a larger world.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    /// World size in world units.
    pub world_size: Vec2,
    /// Canvas size in pixels (one pixel per world unit).
    pub canvas_size: Vec2,
    /// World position of the canvas' top-left corner.
    pub offset: Vec2,
}

impl Viewport {
    pub fn new(world_size: Vec2, canvas_size: Vec2) -> Self {
        Self {
            world_size,
            canvas_size,
            offset: Vec2::ZERO,
        }
    }

    /// Largest offset that keeps the canvas inside the world.
    pub fn max_offset(&self) -> Vec2 {
        (self.world_size - self.canvas_size).max(Vec2::ZERO)
    }

    /// Whether a canvas-space point lies on the canvas.
    pub fn contains_canvas_point(&self, p: Vec2) -> bool {
        p.x >= 0.0 && p.y >= 0.0 && p.x <= self.canvas_size.x && p.y <= self.canvas_size.y
    }

    /// Resize the canvas, keeping the offset inside the world.
    ///
    /// Returns how far the offset moved. The caller owns the drawing surface
    /// and must translate it by the negated amount.
    pub fn resize(&mut self, canvas_size: Vec2) -> Vec2 {
        self.canvas_size = canvas_size;
        let before = self.offset;
        self.offset = self.offset.clamp(Vec2::ZERO, self.max_offset());
        self.offset - before
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollTransition {
    Started,
    Stopped,
}

impl ScrollTransition {
    /// Bus event announcing the transition.
    pub fn event_name(self) -> &'static str {
        match self {
            ScrollTransition::Started => "mousescrollon",
            ScrollTransition::Stopped => "mousescrolloff",
        }
    }
}

/// Result of one scroll update.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ScrollStep {
    /// How far the offset moved this frame.
    pub moved: Vec2,
    pub transition: Option<ScrollTransition>,
}

/// Scrolls the viewport while the pointer rests near a canvas edge.
pub struct EdgeScroll {
    /// Fraction of the canvas size, in `[0, 0.5)`, that counts as the edge.
    threshold: f32,
    /// Maximum scroll speed in pixels per second.
    distance: f32,
    enabled: bool,
    scrolling: bool,
}

impl EdgeScroll {
    pub const DEFAULT_THRESHOLD: f32 = 0.2;
    pub const DEFAULT_DISTANCE: f32 = 350.0;

    pub fn new(threshold: f32, distance: f32) -> Self {
        let mut scroll = Self {
            threshold: Self::DEFAULT_THRESHOLD,
            distance,
            enabled: false,
            scrolling: false,
        };
        scroll.set_threshold(threshold);
        scroll
    }

    pub fn enable(&mut self) {
        self.enabled = true;
    }

    pub fn disable(&mut self) {
        self.enabled = false;
        self.scrolling = false;
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn is_scrolling(&self) -> bool {
        self.scrolling
    }

    pub fn threshold(&self) -> f32 {
        self.threshold
    }

    pub fn set_threshold(&mut self, threshold: f32) {
        self.threshold = threshold.clamp(0.0, 0.499);
    }

    pub fn scroll_distance(&self) -> f32 {
        self.distance
    }

    pub fn set_scroll_distance(&mut self, distance: f32) {
        self.distance = distance.max(0.0);
    }

    /// Advance one frame. `delta` is the frame delta in seconds.
    ///
    /// Each axis moves at most `distance * delta` (rounded to whole pixels)
    /// toward the edge under the pointer, never past the world bounds.
    pub fn update(&mut self, viewport: &mut Viewport, pointer: Vec2, delta: f32) -> ScrollStep {
        if !self.enabled {
            return ScrollStep::default();
        }

        let mut moved = Vec2::ZERO;
        if viewport.contains_canvas_point(pointer) {
            let step = self.distance * delta;
            let max = viewport.max_offset();
            let low = viewport.canvas_size * self.threshold;
            let high = viewport.canvas_size * (1.0 - self.threshold);

            for axis in 0..2 {
                let amount = if pointer[axis] < low[axis] {
                    -viewport.offset[axis].min(step).round()
                } else if pointer[axis] > high[axis] {
                    (max[axis] - viewport.offset[axis]).min(step).round()
                } else {
                    0.0
                };
                moved[axis] = amount;
            }
            viewport.offset = (viewport.offset + moved).clamp(Vec2::ZERO, max);
        }

        let now_scrolling = moved != Vec2::ZERO;
        let transition = match (self.scrolling, now_scrolling) {
            (false, true) => Some(ScrollTransition::Started),
            (true, false) => Some(ScrollTransition::Stopped),
            _ => None,
        };
        self.scrolling = now_scrolling;
        ScrollStep { moved, transition }
    }
}

impl Default for EdgeScroll {
    fn default() -> Self {
        Self::new(Self::DEFAULT_THRESHOLD, Self::DEFAULT_DISTANCE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn viewport() -> Viewport {
        Viewport::new(Vec2::new(2000.0, 600.0), Vec2::new(800.0, 600.0))
    }

    #[test]
    fn disabled_never_moves() {
        let mut vp = viewport();
        let mut scroll = EdgeScroll::default();
        let step = scroll.update(&mut vp, Vec2::new(790.0, 300.0), 1.0);
        assert_eq!(step, ScrollStep::default());
        assert_eq!(vp.offset, Vec2::ZERO);
    }

    #[test]
    fn scrolls_right_at_speed_and_announces_start() {
        let mut vp = viewport();
        let mut scroll = EdgeScroll::default();
        scroll.enable();
        let step = scroll.update(&mut vp, Vec2::new(790.0, 300.0), 0.1);
        assert_eq!(step.moved, Vec2::new(35.0, 0.0));
        assert_eq!(step.transition, Some(ScrollTransition::Started));
        assert!(scroll.is_scrolling());
        assert_eq!(vp.offset.x, 35.0);
    }

    #[test]
    fn clamps_to_world_edge_then_stops() {
        let mut vp = viewport();
        vp.offset.x = 1190.0;
        let mut scroll = EdgeScroll::default();
        scroll.enable();
        let step = scroll.update(&mut vp, Vec2::new(790.0, 300.0), 1.0);
        assert_eq!(step.moved.x, 10.0);
        assert_eq!(vp.offset.x, 1200.0);

        let step = scroll.update(&mut vp, Vec2::new(790.0, 300.0), 1.0);
        assert_eq!(step.moved, Vec2::ZERO);
        assert_eq!(step.transition, Some(ScrollTransition::Stopped));
        assert_eq!(ScrollTransition::Stopped.event_name(), "mousescrolloff");
    }

    #[test]
    fn left_edge_cannot_go_negative() {
        let mut vp = viewport();
        let mut scroll = EdgeScroll::default();
        scroll.enable();
        let step = scroll.update(&mut vp, Vec2::new(5.0, 300.0), 1.0);
        assert_eq!(step.moved, Vec2::ZERO);
        assert_eq!(step.transition, None);
    }

    #[test]
    fn pointer_off_canvas_does_not_scroll() {
        let mut vp = viewport();
        vp.offset.x = 500.0;
        let mut scroll = EdgeScroll::default();
        scroll.enable();
        let step = scroll.update(&mut vp, Vec2::new(-9999.0, -9999.0), 1.0);
        assert_eq!(step.moved, Vec2::ZERO);
    }

    #[test]
    fn threshold_is_clamped() {
        let mut scroll = EdgeScroll::default();
        scroll.set_threshold(0.9);
        assert!(scroll.threshold() < 0.5);
        scroll.set_threshold(-1.0);
        assert_eq!(scroll.threshold(), 0.0);
    }

    #[test]
    fn resize_keeps_offset_in_world() {
        let mut vp = viewport();
        vp.offset.x = 1200.0;
        let moved = vp.resize(Vec2::new(1000.0, 600.0));
        assert_eq!(vp.offset.x, 1000.0);
        assert_eq!(moved, Vec2::new(-200.0, 0.0));
        assert_eq!(vp.resize(Vec2::new(800.0, 600.0)), Vec2::ZERO);
    }
}

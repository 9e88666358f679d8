//! Pan and zoom state of the diagram viewer.
//!
//! The viewport is a scale and an offset applied to the rendered diagram.
//! Discrete zoom steps and pinch gestures are clamped to the configured
//! bounds; panning is unbounded. Gestures follow the pointer model of a
//! touch screen: one pointer drags, two pointers pinch, lifting ends the
//! gesture.

use mermaid_studio_core::geometry::Point;

use crate::config::ViewerConfig;

#[derive(Debug, Clone, Copy, PartialEq)]
enum Gesture {
    Idle,
    Panning {
        last: Point,
    },
    Pinching {
        initial_distance: f32,
        initial_scale: f32,
    },
}

/// Scale and offset of the viewed diagram.
#[derive(Debug, Clone, PartialEq)]
pub struct Viewport {
    scale: f32,
    offset: Point,
    min_zoom: f32,
    max_zoom: f32,
    zoom_step: f32,
    gesture: Gesture,
}

impl Viewport {
    /// Creates an identity viewport with the bounds of `config`.
    pub fn new(config: &ViewerConfig) -> Self {
        let mut viewport = Self {
            scale: 1.0,
            offset: Point::default(),
            min_zoom: config.min_zoom(),
            max_zoom: config.max_zoom(),
            zoom_step: config.zoom_step(),
            gesture: Gesture::Idle,
        };
        viewport.reset();
        viewport
    }

    pub fn scale(&self) -> f32 {
        self.scale
    }

    pub fn offset(&self) -> Point {
        self.offset
    }

    /// Scale as a rounded percentage, for display.
    pub fn scale_percent(&self) -> u32 {
        (self.scale * 100.0).round() as u32
    }

    pub fn is_panning(&self) -> bool {
        matches!(self.gesture, Gesture::Panning { .. })
    }

    pub fn is_pinching(&self) -> bool {
        matches!(self.gesture, Gesture::Pinching { .. })
    }

    pub fn zoom_in(&mut self) {
        self.scale = self.clamp(self.scale + self.zoom_step);
    }

    pub fn zoom_out(&mut self) {
        self.scale = self.clamp(self.scale - self.zoom_step);
    }

    /// Restores scale 1 and a zero offset, and ends any gesture.
    pub fn reset(&mut self) {
        self.scale = self.clamp(1.0);
        self.offset = Point::default();
        self.gesture = Gesture::Idle;
    }

    /// Starts a one-pointer drag at `at`.
    pub fn begin_pan(&mut self, at: Point) {
        self.gesture = Gesture::Panning { last: at };
    }

    /// Moves the dragging pointer to `at`, shifting the offset by the delta.
    ///
    /// Ignored unless a drag is in progress.
    pub fn pan_to(&mut self, at: Point) {
        if let Gesture::Panning { last } = self.gesture {
            self.offset = self.offset.add_point(at.sub_point(last));
            self.gesture = Gesture::Panning { last: at };
        }
    }

    /// Starts a two-pointer pinch.
    ///
    /// Pointers on the same spot give no reference distance, so the gesture
    /// is ignored.
    pub fn begin_pinch(&mut self, first: Point, second: Point) {
        let distance = first.distance(second);
        self.gesture = if distance > 0.0 {
            Gesture::Pinching {
                initial_distance: distance,
                initial_scale: self.scale,
            }
        } else {
            Gesture::Idle
        };
    }

    /// Scales relative to the distance at the start of the pinch.
    ///
    /// Ignored unless a pinch is in progress.
    pub fn pinch_to(&mut self, first: Point, second: Point) {
        if let Gesture::Pinching {
            initial_distance,
            initial_scale,
        } = self.gesture
        {
            let factor = first.distance(second) / initial_distance;
            self.scale = self.clamp(initial_scale * factor);
        }
    }

    /// Ends the current gesture, if any.
    pub fn end_gesture(&mut self) {
        self.gesture = Gesture::Idle;
    }

    fn clamp(&self, scale: f32) -> f32 {
        scale.max(self.min_zoom).min(self.max_zoom)
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(&ViewerConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use float_cmp::approx_eq;
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn test_zoom_steps_and_bounds() {
        let mut viewport = Viewport::default();

        viewport.zoom_in();
        assert!(approx_eq!(f32, viewport.scale(), 1.2, epsilon = 1e-5));
        assert_eq!(viewport.scale_percent(), 120);

        for _ in 0..30 {
            viewport.zoom_in();
        }
        assert_eq!(viewport.scale(), 4.0);

        for _ in 0..30 {
            viewport.zoom_out();
        }
        assert_eq!(viewport.scale(), 0.5);
        assert_eq!(viewport.scale_percent(), 50);
    }

    #[test]
    fn test_pan_accumulates_deltas() {
        let mut viewport = Viewport::default();

        viewport.begin_pan(Point::new(10.0, 10.0));
        viewport.pan_to(Point::new(15.0, 5.0));
        viewport.pan_to(Point::new(25.0, 0.0));
        viewport.end_gesture();
        viewport.pan_to(Point::new(1000.0, 1000.0));

        assert_eq!(viewport.offset(), Point::new(15.0, -10.0));
        assert!(!viewport.is_panning());
    }

    #[test]
    fn test_pinch_scales_from_initial_distance() {
        let mut viewport = Viewport::default();
        viewport.zoom_in();

        viewport.begin_pinch(Point::new(0.0, 0.0), Point::new(100.0, 0.0));
        viewport.pinch_to(Point::new(0.0, 0.0), Point::new(150.0, 0.0));
        assert!(approx_eq!(f32, viewport.scale(), 1.8, epsilon = 1e-5));

        viewport.pinch_to(Point::new(0.0, 0.0), Point::new(1000.0, 0.0));
        assert_eq!(viewport.scale(), 4.0);

        viewport.pinch_to(Point::new(0.0, 0.0), Point::new(1.0, 0.0));
        assert_eq!(viewport.scale(), 0.5);
    }

    #[test]
    fn test_degenerate_pinch_is_ignored() {
        let mut viewport = Viewport::default();
        let spot = Point::new(3.0, 3.0);

        viewport.begin_pinch(spot, spot);
        viewport.pinch_to(spot, Point::new(300.0, 3.0));

        assert!(!viewport.is_pinching());
        assert_eq!(viewport.scale(), 1.0);
    }

    #[test]
    fn test_reset() {
        let mut viewport = Viewport::default();
        viewport.zoom_out();
        viewport.begin_pan(Point::new(0.0, 0.0));
        viewport.pan_to(Point::new(4.0, 4.0));

        viewport.reset();
        assert_eq!(viewport.scale(), 1.0);
        assert!(viewport.offset().is_zero());
        assert!(!viewport.is_panning());
    }

    #[derive(Debug, Clone)]
    enum Op {
        ZoomIn,
        ZoomOut,
        Pinch(f32, f32),
        Pan(f32, f32),
        Reset,
    }

    fn op() -> impl Strategy<Value = Op> {
        prop_oneof![
            Just(Op::ZoomIn),
            Just(Op::ZoomOut),
            (0.0f32..500.0, 0.0f32..5000.0).prop_map(|(a, b)| Op::Pinch(a, b)),
            (-500.0f32..500.0, -500.0f32..500.0).prop_map(|(x, y)| Op::Pan(x, y)),
            Just(Op::Reset),
        ]
    }

    proptest! {
        #[test]
        fn prop_scale_stays_in_bounds(ops in prop::collection::vec(op(), 0..64)) {
            let mut viewport = Viewport::default();
            for op in ops {
                match op {
                    Op::ZoomIn => viewport.zoom_in(),
                    Op::ZoomOut => viewport.zoom_out(),
                    Op::Pinch(start, end) => {
                        let origin = Point::default();
                        viewport.begin_pinch(origin, Point::new(start, 0.0));
                        viewport.pinch_to(origin, Point::new(end, 0.0));
                        viewport.end_gesture();
                    }
                    Op::Pan(x, y) => {
                        viewport.begin_pan(Point::default());
                        viewport.pan_to(Point::new(x, y));
                        viewport.end_gesture();
                    }
                    Op::Reset => viewport.reset(),
                }
                prop_assert!((0.5..=4.0).contains(&viewport.scale()));
            }
        }
    }
}

// Pan/zoom viewport controller for the map quizzes. Pure state and geometry;
// the DOM layer feeds it events, owns the two reset timers, and applies the
// derived CSS output to the transformed surface.

use super::gesture::{ContactPoint, PinchSession, Point, contact_distance, contact_midpoint, two_finger_geometry};

pub const MIN_ZOOM: f64 = 1.0;
pub const MAX_ZOOM: f64 = 20.0;
/// Zoom step for the +/- buttons.
pub const BUTTON_ZOOM_FACTOR: f64 = 1.5;
/// Per-event wheel factors, keyed on the scroll direction.
pub const WHEEL_ZOOM_IN: f64 = 1.1;
pub const WHEEL_ZOOM_OUT: f64 = 0.9;
/// Delay before `has_moved` clears after release, so the browser's trailing
/// synthetic click still sees it and gets ignored.
pub const RELEASE_CLEAR_MS: i32 = 50;
/// Wheel inactivity window after which transition animation is re-enabled.
pub const WHEEL_IDLE_MS: i32 = 150;
/// Pinch sessions that start with the fingers this close are never scaled.
const MIN_PINCH_START_DISTANCE: f64 = 1.0;

pub const TOUCH_TIP: &str = "Nyp för att zooma. Dra kartan för att panorera.";
pub const POINTER_TIP: &str = "Scrolla för att zooma. Dra kartan för att panorera.";

pub fn help_text(touch_primary: bool) -> &'static str {
    if touch_primary { TOUCH_TIP } else { POINTER_TIP }
}

/// Container rectangle in client coordinates, as last measured by the host.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ViewportRect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl ViewportRect {
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self { left, top, width, height }
    }

    fn center(&self) -> Point {
        Point::new(self.left + self.width / 2.0, self.top + self.height / 2.0)
    }
}

/// Copy of the view-relevant state handed to the rendering layer after every
/// handled event; the controller itself stays inside a mutable cell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewSnapshot {
    pub zoom: f64,
    pub pan: Point,
    pub dragging: bool,
    pub pinching: bool,
    pub has_moved: bool,
    pub wheel_zooming: bool,
}

impl Default for ViewSnapshot {
    fn default() -> Self {
        Self {
            zoom: MIN_ZOOM,
            pan: Point::ZERO,
            dragging: false,
            pinching: false,
            has_moved: false,
            wheel_zooming: false,
        }
    }
}

impl ViewSnapshot {
    /// `(scale, translate_x, translate_y)` of the CSS transform.
    pub fn transform(&self) -> (f64, f64, f64) {
        (self.zoom, self.pan.x / self.zoom, self.pan.y / self.zoom)
    }

    pub fn transform_style(&self) -> String {
        let (scale, tx, ty) = self.transform();
        format!(
            "transform: scale({}) translate({}px, {}px); transform-origin: center center; transition: {};",
            scale,
            tx,
            ty,
            self.transition()
        )
    }

    /// Animation is off for the whole duration of a direct-manipulation
    /// gesture, otherwise zoom changes ease over 0.2s.
    pub fn transition(&self) -> &'static str {
        if self.dragging || self.pinching || self.wheel_zooming {
            "none"
        } else {
            "transform 0.2s ease-out"
        }
    }

    pub fn cursor(&self) -> &'static str {
        if self.zoom > MIN_ZOOM {
            if self.dragging { "grabbing" } else { "grab" }
        } else {
            "default"
        }
    }

    pub fn suppress_click(&self) -> bool {
        self.dragging || self.has_moved || self.pinching
    }

    pub fn zoom_percent(&self) -> u32 {
        (self.zoom * 100.0).round() as u32
    }
}

/// Stateful pan/zoom controller. Zoom stays in `[MIN_ZOOM, MAX_ZOOM]`; pan is
/// always clamped so the scaled content fully covers the container, and is
/// `{0,0}` whenever zoom is 1.
#[derive(Debug, Clone)]
pub struct MapViewport {
    zoom: f64,
    pan: Point,
    dragging: bool,
    pinching: bool,
    has_moved: bool,
    wheel_zooming: bool,
    drag_anchor: Point,
    pinch: Option<PinchSession>,
    rect: Option<ViewportRect>,
}

impl Default for MapViewport {
    fn default() -> Self {
        Self {
            zoom: MIN_ZOOM,
            pan: Point::ZERO,
            dragging: false,
            pinching: false,
            has_moved: false,
            wheel_zooming: false,
            drag_anchor: Point::ZERO,
            pinch: None,
            rect: None,
        }
    }
}

impl MapViewport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the container's measured bounds. Re-clamps the current pan so
    /// the coverage invariant survives resizes.
    pub fn set_rect(&mut self, rect: ViewportRect) {
        self.rect = Some(rect);
        self.pan = self.clamp_pan(self.pan, self.zoom);
    }

    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    pub fn pan(&self) -> Point {
        self.pan
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    pub fn is_pinching(&self) -> bool {
        self.pinching
    }

    pub fn has_moved(&self) -> bool {
        self.has_moved
    }

    pub fn is_wheel_zooming(&self) -> bool {
        self.wheel_zooming
    }

    /// True while a trailing click event must not be treated as a guess.
    pub fn suppress_click(&self) -> bool {
        self.snapshot().suppress_click()
    }

    pub fn snapshot(&self) -> ViewSnapshot {
        ViewSnapshot {
            zoom: self.zoom,
            pan: self.pan,
            dragging: self.dragging,
            pinching: self.pinching,
            has_moved: self.has_moved,
            wheel_zooming: self.wheel_zooming,
        }
    }

    pub fn zoom_in(&mut self) {
        let next = (self.zoom * BUTTON_ZOOM_FACTOR).min(MAX_ZOOM);
        self.rescale_to(next);
    }

    pub fn zoom_out(&mut self) {
        let next = (self.zoom / BUTTON_ZOOM_FACTOR).max(MIN_ZOOM);
        self.rescale_to(next);
    }

    pub fn reset_zoom(&mut self) {
        self.zoom = MIN_ZOOM;
        self.pan = Point::ZERO;
    }

    /// Wheel step at the given client position. Scroll down zooms out, up
    /// zooms in; the content point under the pointer stays fixed on screen.
    /// No-op until the container has been measured.
    pub fn wheel_zoom(&mut self, client: Point, delta_y: f64) {
        let Some(rect) = self.rect else { return };
        let factor = if delta_y > 0.0 { WHEEL_ZOOM_OUT } else { WHEEL_ZOOM_IN };
        let new_zoom = (self.zoom * factor).clamp(MIN_ZOOM, MAX_ZOOM);
        let center = rect.center();
        let focal = Point::new(client.x - center.x, client.y - center.y);
        self.pan = self.focal_pan(focal, new_zoom);
        self.zoom = new_zoom;
        self.wheel_zooming = true;
    }

    /// Called by the host's debounced wheel-idle timer.
    pub fn finish_wheel_idle(&mut self) {
        self.wheel_zooming = false;
    }

    /// Mouse (or single-touch) grab. Only possible once zoomed in.
    pub fn begin_drag(&mut self, client: Point) {
        if self.zoom <= MIN_ZOOM {
            return;
        }
        self.dragging = true;
        self.has_moved = false;
        self.drag_anchor = Point::new(client.x - self.pan.x, client.y - self.pan.y);
    }

    pub fn drag_to(&mut self, client: Point) {
        if !self.dragging || self.zoom <= MIN_ZOOM {
            return;
        }
        self.has_moved = true;
        let raw = Point::new(client.x - self.drag_anchor.x, client.y - self.drag_anchor.y);
        self.pan = self.clamp_pan(raw, self.zoom);
    }

    pub fn end_drag(&mut self) {
        self.dragging = false;
    }

    /// Called by the host's release timer, `RELEASE_CLEAR_MS` after the last
    /// pointer or touch left the surface.
    pub fn finish_release(&mut self) {
        self.has_moved = false;
    }

    /// `contacts` is the full set of active touches after a finger landed.
    pub fn touch_start(&mut self, contacts: &[ContactPoint]) {
        match contacts {
            [a, b] => {
                self.pinching = true;
                self.has_moved = true;
                self.dragging = false;
                self.pinch = Some(PinchSession {
                    start_distance: contact_distance(a, b),
                    start_zoom: self.zoom,
                    start_midpoint: contact_midpoint(a, b),
                    start_pan: self.pan,
                });
            }
            [c] if self.zoom > MIN_ZOOM => {
                self.dragging = true;
                self.has_moved = false;
                self.drag_anchor = Point::new(c.x - self.pan.x, c.y - self.pan.y);
            }
            _ => {}
        }
    }

    pub fn touch_move(&mut self, contacts: &[ContactPoint]) {
        if self.pinching && contacts.len() == 2 {
            let Some(session) = self.pinch else { return };
            if session.start_distance < MIN_PINCH_START_DISTANCE {
                return;
            }
            let Some((distance, midpoint)) = two_finger_geometry(contacts) else { return };
            let Some(rect) = self.rect else { return };
            let new_zoom =
                (session.start_zoom * distance / session.start_distance).clamp(MIN_ZOOM, MAX_ZOOM);
            let center = rect.center();
            let focal = Point::new(
                session.start_midpoint.x - center.x,
                session.start_midpoint.y - center.y,
            );
            let zoom_scale = new_zoom / session.start_zoom;
            let mut pan = Point::new(
                focal.x + (session.start_pan.x - focal.x) * zoom_scale
                    + (midpoint.x - session.start_midpoint.x),
                focal.y + (session.start_pan.y - focal.y) * zoom_scale
                    + (midpoint.y - session.start_midpoint.y),
            );
            if new_zoom <= MIN_ZOOM {
                pan = Point::ZERO;
            }
            self.zoom = new_zoom;
            self.pan = self.clamp_pan(pan, new_zoom);
        } else if self.dragging && contacts.len() == 1 && self.zoom > MIN_ZOOM {
            self.has_moved = true;
            let c = &contacts[0];
            let raw = Point::new(c.x - self.drag_anchor.x, c.y - self.drag_anchor.y);
            self.pan = self.clamp_pan(raw, self.zoom);
        }
    }

    /// `remaining` is the set of touches still down after fingers lifted.
    /// Dropping from two fingers to one re-anchors a pan at the current pan
    /// value, so the hand-off is seamless. The host schedules the release
    /// timer when `remaining` is empty.
    pub fn touch_end(&mut self, remaining: &[ContactPoint]) {
        if remaining.len() < 2 {
            self.pinching = false;
            self.pinch = None;
        }
        match remaining {
            [c] if self.zoom > MIN_ZOOM => {
                self.dragging = true;
                self.drag_anchor = Point::new(c.x - self.pan.x, c.y - self.pan.y);
            }
            [] => {
                self.dragging = false;
            }
            _ => {}
        }
    }

    /// Focal-point-preserving pan for a zoom change from the current zoom to
    /// `new_zoom`, anchored at `focal` (relative to the container center).
    fn focal_pan(&self, focal: Point, new_zoom: f64) -> Point {
        let ratio = new_zoom / self.zoom;
        let mut pan = Point::new(
            focal.x * (1.0 - ratio) + self.pan.x * ratio,
            focal.y * (1.0 - ratio) + self.pan.y * ratio,
        );
        if new_zoom <= MIN_ZOOM {
            pan = Point::ZERO;
        }
        self.clamp_pan(pan, new_zoom)
    }

    /// Center-focal zoom used by the buttons: pan scales with the zoom ratio.
    fn rescale_to(&mut self, new_zoom: f64) {
        let ratio = new_zoom / self.zoom;
        let scaled = Point::new(self.pan.x * ratio, self.pan.y * ratio);
        self.pan = self.clamp_pan(scaled, new_zoom);
        self.zoom = new_zoom;
    }

    /// Keeps the scaled content covering the container: at zoom `z` the
    /// allowed excursion per axis is `size * (z - 1) / 2`. Identity pan when
    /// not zoomed in or not yet measured.
    fn clamp_pan(&self, pan: Point, zoom: f64) -> Point {
        if zoom <= MIN_ZOOM {
            return Point::ZERO;
        }
        let Some(rect) = self.rect else { return Point::ZERO };
        let max_x = rect.width * (zoom - 1.0) / 2.0;
        let max_y = rect.height * (zoom - 1.0) / 2.0;
        Point::new(pan.x.clamp(-max_x, max_x), pan.y.clamp(-max_y, max_y))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    fn vp_400x300() -> MapViewport {
        let mut vp = MapViewport::new();
        vp.set_rect(ViewportRect::new(0.0, 0.0, 400.0, 300.0));
        vp
    }

    fn pt(x: f64, y: f64) -> Point {
        Point::new(x, y)
    }

    fn c(id: i32, x: f64, y: f64) -> ContactPoint {
        ContactPoint::new(id, x, y)
    }

    // --- zoom buttons ---

    #[test]
    fn zoom_in_multiplies_by_step() {
        let mut vp = vp_400x300();
        vp.zoom_in();
        assert!(approx(vp.zoom(), 1.5));
        vp.zoom_in();
        assert!(approx(vp.zoom(), 2.25));
    }

    #[test]
    fn zoom_in_saturates_at_max() {
        let mut vp = vp_400x300();
        for _ in 0..40 {
            vp.zoom_in();
        }
        assert_eq!(vp.zoom(), MAX_ZOOM);
        vp.zoom_in();
        assert_eq!(vp.zoom(), MAX_ZOOM);
    }

    #[test]
    fn zoom_out_saturates_at_min_with_zero_pan() {
        let mut vp = vp_400x300();
        for _ in 0..6 {
            vp.zoom_in();
        }
        vp.begin_drag(pt(200.0, 150.0));
        vp.drag_to(pt(350.0, 250.0));
        vp.end_drag();
        for _ in 0..40 {
            vp.zoom_out();
        }
        assert_eq!(vp.zoom(), MIN_ZOOM);
        assert_eq!(vp.pan(), Point::ZERO);
        vp.zoom_out();
        assert_eq!(vp.zoom(), MIN_ZOOM);
        assert_eq!(vp.pan(), Point::ZERO);
    }

    #[test]
    fn button_zoom_rescales_pan_by_ratio() {
        let mut vp = vp_400x300();
        vp.zoom_in();
        vp.zoom_in();
        vp.begin_drag(pt(200.0, 150.0));
        vp.drag_to(pt(240.0, 130.0));
        vp.end_drag();
        assert_eq!(vp.pan(), pt(40.0, -20.0));
        vp.zoom_in();
        assert!(approx(vp.pan().x, 60.0));
        assert!(approx(vp.pan().y, -30.0));
    }

    #[test]
    fn button_zoom_without_measured_rect_keeps_pan_zero() {
        let mut vp = MapViewport::new();
        vp.zoom_in();
        assert!(approx(vp.zoom(), 1.5));
        assert_eq!(vp.pan(), Point::ZERO);
    }

    // --- reset ---

    #[test]
    fn reset_is_deterministic_from_any_state() {
        let mut vp = vp_400x300();
        for _ in 0..5 {
            vp.zoom_in();
        }
        vp.begin_drag(pt(200.0, 150.0));
        vp.drag_to(pt(10.0, 10.0));
        vp.reset_zoom();
        assert_eq!(vp.zoom(), MIN_ZOOM);
        assert_eq!(vp.pan(), Point::ZERO);
    }

    // --- wheel ---

    #[test]
    fn wheel_direction_chooses_factor() {
        let mut vp = vp_400x300();
        vp.wheel_zoom(pt(200.0, 150.0), -1.0);
        assert!(approx(vp.zoom(), WHEEL_ZOOM_IN));
        vp.wheel_zoom(pt(200.0, 150.0), 1.0);
        assert!(approx(vp.zoom(), (WHEEL_ZOOM_IN * WHEEL_ZOOM_OUT).max(MIN_ZOOM)));
    }

    #[test]
    fn wheel_zoom_in_keeps_focal_point_fixed() {
        // Container 400x300, cursor 50px right of center.
        let mut vp = vp_400x300();
        vp.wheel_zoom(pt(250.0, 150.0), -1.0);
        assert!(approx(vp.zoom(), 1.1));
        assert!(approx(vp.pan().x, 50.0 * (1.0 - 1.1)));
        assert!(approx(vp.pan().y, 0.0));
        // The content point under the cursor is (focal - pan) / zoom; it must
        // not move while we keep zooming at the same cursor position.
        let fixed = (50.0 - vp.pan().x) / vp.zoom();
        assert!(approx(fixed, 50.0));
        for _ in 0..3 {
            vp.wheel_zoom(pt(250.0, 150.0), -1.0);
            assert!(approx((50.0 - vp.pan().x) / vp.zoom(), fixed));
        }
    }

    #[test]
    fn wheel_chaining_composes_on_latest_state() {
        let mut vp = vp_400x300();
        for _ in 0..5 {
            vp.wheel_zoom(pt(200.0, 150.0), -1.0);
        }
        assert!(approx(vp.zoom(), WHEEL_ZOOM_IN.powi(5).min(MAX_ZOOM)));
    }

    #[test]
    fn wheel_at_max_zoom_keeps_pan() {
        let mut vp = vp_400x300();
        for _ in 0..10 {
            vp.zoom_in();
        }
        assert_eq!(vp.zoom(), MAX_ZOOM);
        vp.begin_drag(pt(200.0, 150.0));
        vp.drag_to(pt(250.0, 170.0));
        vp.end_drag();
        let pan = vp.pan();
        vp.wheel_zoom(pt(250.0, 150.0), -1.0);
        assert_eq!(vp.zoom(), MAX_ZOOM);
        assert_eq!(vp.pan(), pan);
    }

    #[test]
    fn wheel_out_to_min_zeroes_pan() {
        let mut vp = vp_400x300();
        vp.wheel_zoom(pt(250.0, 150.0), -1.0);
        assert!(vp.pan().x != 0.0);
        vp.wheel_zoom(pt(100.0, 100.0), 1.0);
        assert_eq!(vp.zoom(), MIN_ZOOM);
        assert_eq!(vp.pan(), Point::ZERO);
    }

    #[test]
    fn wheel_without_measured_rect_is_a_no_op() {
        let mut vp = MapViewport::new();
        vp.wheel_zoom(pt(250.0, 150.0), -1.0);
        assert_eq!(vp.zoom(), MIN_ZOOM);
        assert!(!vp.is_wheel_zooming());
    }

    #[test]
    fn wheel_sets_and_idle_clears_animation_flag() {
        let mut vp = vp_400x300();
        vp.wheel_zoom(pt(200.0, 150.0), -1.0);
        assert!(vp.is_wheel_zooming());
        assert_eq!(vp.snapshot().transition(), "none");
        vp.finish_wheel_idle();
        assert!(!vp.is_wheel_zooming());
        assert_eq!(vp.snapshot().transition(), "transform 0.2s ease-out");
    }

    // --- drag & clamp ---

    #[test]
    fn no_drag_at_base_zoom() {
        let mut vp = vp_400x300();
        vp.begin_drag(pt(200.0, 150.0));
        assert!(!vp.is_dragging());
        vp.drag_to(pt(300.0, 200.0));
        assert_eq!(vp.pan(), Point::ZERO);
    }

    #[test]
    fn drag_follows_pointer_within_bounds() {
        let mut vp = vp_400x300();
        vp.zoom_in();
        vp.begin_drag(pt(200.0, 150.0));
        vp.drag_to(pt(230.0, 140.0));
        assert_eq!(vp.pan(), pt(30.0, -10.0));
        assert!(vp.is_dragging());
        assert!(vp.has_moved());
    }

    #[test]
    fn drag_is_clamped_to_coverage_bounds() {
        let mut vp = vp_400x300();
        vp.zoom_in();
        // max excursion at zoom 1.5: 400*0.5/2 = 100, 300*0.5/2 = 75
        vp.begin_drag(pt(200.0, 150.0));
        vp.drag_to(pt(600.0, 400.0));
        assert_eq!(vp.pan(), pt(100.0, 75.0));
        vp.drag_to(pt(-600.0, -400.0));
        assert_eq!(vp.pan(), pt(-100.0, -75.0));
    }

    #[test]
    fn resize_reclamps_pan() {
        let mut vp = vp_400x300();
        vp.zoom_in();
        vp.begin_drag(pt(200.0, 150.0));
        vp.drag_to(pt(600.0, 400.0));
        assert_eq!(vp.pan(), pt(100.0, 75.0));
        vp.set_rect(ViewportRect::new(0.0, 0.0, 200.0, 100.0));
        assert_eq!(vp.pan(), pt(50.0, 25.0));
    }

    // --- click suppression ---

    #[test]
    fn suppression_holds_until_release_window_ends() {
        let mut vp = vp_400x300();
        vp.zoom_in();
        vp.begin_drag(pt(200.0, 150.0));
        assert!(vp.suppress_click());
        vp.drag_to(pt(220.0, 150.0));
        assert!(vp.suppress_click());
        vp.end_drag();
        assert!(!vp.is_dragging());
        assert!(vp.suppress_click());
        vp.finish_release();
        assert!(!vp.suppress_click());
    }

    #[test]
    fn stationary_click_is_never_suppressed() {
        let mut vp = vp_400x300();
        vp.zoom_in();
        vp.begin_drag(pt(200.0, 150.0));
        vp.end_drag();
        assert!(!vp.suppress_click());
    }

    // --- touch ---

    #[test]
    fn single_touch_pans_like_mouse() {
        let mut vp = vp_400x300();
        vp.zoom_in();
        vp.touch_start(&[c(0, 100.0, 100.0)]);
        assert!(vp.is_dragging());
        vp.touch_move(&[c(0, 130.0, 80.0)]);
        assert_eq!(vp.pan(), pt(30.0, -20.0));
        vp.touch_end(&[]);
        assert!(!vp.is_dragging());
        assert!(vp.has_moved());
        vp.finish_release();
        assert!(!vp.has_moved());
    }

    #[test]
    fn single_touch_ignored_at_base_zoom() {
        let mut vp = vp_400x300();
        vp.touch_start(&[c(0, 100.0, 100.0)]);
        assert!(!vp.is_dragging());
    }

    #[test]
    fn pinch_start_suppresses_and_cancels_drag() {
        let mut vp = vp_400x300();
        vp.zoom_in();
        vp.touch_start(&[c(0, 100.0, 100.0)]);
        assert!(vp.is_dragging());
        vp.touch_start(&[c(0, 100.0, 100.0), c(1, 200.0, 100.0)]);
        assert!(vp.is_pinching());
        assert!(!vp.is_dragging());
        assert!(vp.has_moved());
        assert!(vp.suppress_click());
    }

    #[test]
    fn pinch_scales_zoom_by_distance_ratio() {
        let mut vp = vp_400x300();
        vp.touch_start(&[c(0, 180.0, 150.0), c(1, 220.0, 150.0)]);
        vp.touch_move(&[c(0, 160.0, 150.0), c(1, 240.0, 150.0)]);
        assert!(approx(vp.zoom(), 2.0));
        assert_eq!(vp.pan(), Point::ZERO);
    }

    #[test]
    fn pinch_preserves_focal_point_off_center() {
        let mut vp = vp_400x300();
        // Midpoint 100px right of center; spread from 40 to 80 px.
        vp.touch_start(&[c(0, 280.0, 150.0), c(1, 320.0, 150.0)]);
        vp.touch_move(&[c(0, 260.0, 150.0), c(1, 340.0, 150.0)]);
        assert!(approx(vp.zoom(), 2.0));
        assert!(approx(vp.pan().x, -100.0));
        assert!(approx(vp.pan().y, 0.0));
        // Content point under the pinch center stayed put.
        assert!(approx((100.0 - vp.pan().x) / vp.zoom(), 100.0));
    }

    #[test]
    fn pinch_midpoint_drift_pans_content() {
        let mut vp = vp_400x300();
        vp.touch_start(&[c(0, 180.0, 150.0), c(1, 220.0, 150.0)]);
        vp.touch_move(&[c(0, 160.0, 150.0), c(1, 240.0, 150.0)]);
        vp.touch_end(&[]);
        vp.finish_release();
        assert!(approx(vp.zoom(), 2.0));
        // Second session: constant spread, both fingers slide 30px right.
        vp.touch_start(&[c(0, 180.0, 150.0), c(1, 220.0, 150.0)]);
        vp.touch_move(&[c(0, 210.0, 150.0), c(1, 250.0, 150.0)]);
        assert!(approx(vp.zoom(), 2.0));
        assert!(approx(vp.pan().x, 30.0));
        assert!(approx(vp.pan().y, 0.0));
    }

    #[test]
    fn near_zero_start_distance_ignores_moves() {
        let mut vp = vp_400x300();
        vp.touch_start(&[c(0, 200.0, 150.0), c(1, 200.0, 150.0)]);
        assert!(vp.is_pinching());
        vp.touch_move(&[c(0, 100.0, 150.0), c(1, 300.0, 150.0)]);
        assert_eq!(vp.zoom(), MIN_ZOOM);
        assert_eq!(vp.pan(), Point::ZERO);
    }

    #[test]
    fn pinch_clamps_at_max_zoom() {
        let mut vp = vp_400x300();
        vp.touch_start(&[c(0, 195.0, 150.0), c(1, 205.0, 150.0)]);
        vp.touch_move(&[c(0, 50.0, 150.0), c(1, 350.0, 150.0)]);
        assert_eq!(vp.zoom(), MAX_ZOOM);
    }

    #[test]
    fn three_finger_touch_is_ignored() {
        let mut vp = vp_400x300();
        vp.touch_start(&[c(0, 100.0, 100.0), c(1, 200.0, 100.0), c(2, 300.0, 100.0)]);
        assert!(!vp.is_pinching());
        assert!(!vp.is_dragging());
    }

    #[test]
    fn pinch_to_pan_handoff_has_no_jump() {
        let mut vp = vp_400x300();
        vp.touch_start(&[c(0, 180.0, 150.0), c(1, 220.0, 150.0)]);
        vp.touch_move(&[c(0, 120.0, 150.0), c(1, 280.0, 150.0)]);
        assert!(approx(vp.zoom(), 4.0));
        let pan_at_lift = vp.pan();
        vp.touch_end(&[c(0, 120.0, 150.0)]);
        assert!(!vp.is_pinching());
        assert!(vp.is_dragging());
        // The remaining finger has not moved, so the first pan update must
        // reproduce the pinch's final pan exactly.
        vp.touch_move(&[c(0, 120.0, 150.0)]);
        assert_eq!(vp.pan(), pan_at_lift);
        vp.touch_move(&[c(0, 140.0, 160.0)]);
        assert_eq!(vp.pan(), pt(pan_at_lift.x + 20.0, pan_at_lift.y + 10.0));
    }

    #[test]
    fn pinch_to_pan_handoff_with_offset_focal() {
        let mut vp = vp_400x300();
        vp.touch_start(&[c(0, 280.0, 150.0), c(1, 320.0, 150.0)]);
        vp.touch_move(&[c(0, 260.0, 150.0), c(1, 340.0, 150.0)]);
        let pan_at_lift = vp.pan();
        assert!(approx(pan_at_lift.x, -100.0));
        vp.touch_end(&[c(0, 260.0, 150.0)]);
        vp.touch_move(&[c(0, 260.0, 150.0)]);
        assert_eq!(vp.pan(), pan_at_lift);
    }

    // --- derived output ---

    #[test]
    fn transform_divides_translation_by_zoom() {
        let mut vp = vp_400x300();
        vp.touch_start(&[c(0, 180.0, 150.0), c(1, 220.0, 150.0)]);
        vp.touch_move(&[c(0, 160.0, 150.0), c(1, 240.0, 150.0)]);
        vp.touch_end(&[]);
        vp.finish_release();
        vp.touch_start(&[c(0, 180.0, 150.0)]);
        vp.touch_move(&[c(0, 210.0, 140.0)]);
        vp.touch_end(&[]);
        let snap = vp.snapshot();
        let (scale, tx, ty) = snap.transform();
        assert!(approx(scale, 2.0));
        assert!(approx(tx, 15.0));
        assert!(approx(ty, -5.0));
        let style = snap.transform_style();
        assert!(style.contains("scale(2)"));
        assert!(style.contains("translate(15px, -5px)"));
        assert!(style.contains("transform-origin: center center"));
    }

    #[test]
    fn cursor_reflects_zoom_and_drag() {
        let mut vp = vp_400x300();
        assert_eq!(vp.snapshot().cursor(), "default");
        vp.zoom_in();
        assert_eq!(vp.snapshot().cursor(), "grab");
        vp.begin_drag(pt(200.0, 150.0));
        assert_eq!(vp.snapshot().cursor(), "grabbing");
        vp.end_drag();
        assert_eq!(vp.snapshot().cursor(), "grab");
    }

    #[test]
    fn zoom_percent_rounds() {
        let mut vp = vp_400x300();
        assert_eq!(vp.snapshot().zoom_percent(), 100);
        vp.wheel_zoom(pt(200.0, 150.0), -1.0);
        assert_eq!(vp.snapshot().zoom_percent(), 110);
    }

    #[test]
    fn help_text_picks_device_tip() {
        assert_eq!(help_text(true), TOUCH_TIP);
        assert_eq!(help_text(false), POINTER_TIP);
        assert_ne!(TOUCH_TIP, POINTER_TIP);
    }

    // --- invariant over arbitrary sequences ---

    #[derive(Debug, Clone)]
    enum Op {
        ZoomIn,
        ZoomOut,
        Reset,
        Wheel { x: f64, y: f64, dy: f64 },
        BeginDrag { x: f64, y: f64 },
        DragTo { x: f64, y: f64 },
        EndDrag,
        FinishRelease,
        FinishWheelIdle,
        TouchStart(Vec<ContactPoint>),
        TouchMove(Vec<ContactPoint>),
        TouchEnd(Vec<ContactPoint>),
        SetRect { w: f64, h: f64 },
    }

    fn arb_contacts() -> impl Strategy<Value = Vec<ContactPoint>> {
        prop::collection::vec((0..4i32, -200.0..800.0f64, -200.0..800.0f64), 0..3)
            .prop_map(|v| v.into_iter().map(|(id, x, y)| ContactPoint::new(id, x, y)).collect())
    }

    fn arb_op() -> impl Strategy<Value = Op> {
        prop_oneof![
            Just(Op::ZoomIn),
            Just(Op::ZoomOut),
            Just(Op::Reset),
            Just(Op::EndDrag),
            Just(Op::FinishRelease),
            Just(Op::FinishWheelIdle),
            (-200.0..800.0f64, -200.0..800.0f64, -3.0..3.0f64)
                .prop_map(|(x, y, dy)| Op::Wheel { x, y, dy }),
            (-200.0..800.0f64, -200.0..800.0f64).prop_map(|(x, y)| Op::BeginDrag { x, y }),
            (-200.0..800.0f64, -200.0..800.0f64).prop_map(|(x, y)| Op::DragTo { x, y }),
            arb_contacts().prop_map(Op::TouchStart),
            arb_contacts().prop_map(Op::TouchMove),
            arb_contacts().prop_map(Op::TouchEnd),
            (50.0..1200.0f64, 50.0..1200.0f64).prop_map(|(w, h)| Op::SetRect { w, h }),
        ]
    }

    proptest! {
        #[test]
        fn clamp_invariant_over_random_sequences(
            ops in prop::collection::vec(arb_op(), 1..120)
        ) {
            let mut vp = MapViewport::new();
            let (mut w, mut h) = (400.0f64, 300.0f64);
            vp.set_rect(ViewportRect::new(0.0, 0.0, w, h));
            for op in ops {
                match op {
                    Op::ZoomIn => vp.zoom_in(),
                    Op::ZoomOut => vp.zoom_out(),
                    Op::Reset => vp.reset_zoom(),
                    Op::Wheel { x, y, dy } => vp.wheel_zoom(Point::new(x, y), dy),
                    Op::BeginDrag { x, y } => vp.begin_drag(Point::new(x, y)),
                    Op::DragTo { x, y } => vp.drag_to(Point::new(x, y)),
                    Op::EndDrag => vp.end_drag(),
                    Op::FinishRelease => vp.finish_release(),
                    Op::FinishWheelIdle => vp.finish_wheel_idle(),
                    Op::TouchStart(contacts) => vp.touch_start(&contacts),
                    Op::TouchMove(contacts) => vp.touch_move(&contacts),
                    Op::TouchEnd(contacts) => vp.touch_end(&contacts),
                    Op::SetRect { w: nw, h: nh } => {
                        w = nw;
                        h = nh;
                        vp.set_rect(ViewportRect::new(0.0, 0.0, nw, nh));
                    }
                }
                prop_assert!(vp.zoom() >= MIN_ZOOM && vp.zoom() <= MAX_ZOOM);
                if vp.zoom() <= MIN_ZOOM {
                    prop_assert_eq!(vp.pan(), Point::ZERO);
                } else {
                    prop_assert!(vp.pan().x.abs() <= w * (vp.zoom() - 1.0) / 2.0 + 1e-9);
                    prop_assert!(vp.pan().y.abs() <= h * (vp.zoom() - 1.0) / 2.0 + 1e-9);
                }
            }
        }
    }
}

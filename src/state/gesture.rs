// Touch contact geometry shared by the viewport controller and the DOM layer.

/// A 2D point in client-pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const ZERO: Point = Point { x: 0.0, y: 0.0 };

    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// One active touch contact, as reported by the platform.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContactPoint {
    pub id: i32,
    pub x: f64,
    pub y: f64,
}

impl ContactPoint {
    pub fn new(id: i32, x: f64, y: f64) -> Self {
        Self { id, x, y }
    }
}

pub fn contact_distance(a: &ContactPoint, b: &ContactPoint) -> f64 {
    (b.x - a.x).hypot(b.y - a.y)
}

pub fn contact_midpoint(a: &ContactPoint, b: &ContactPoint) -> Point {
    Point::new((a.x + b.x) / 2.0, (a.y + b.y) / 2.0)
}

/// Distance and midpoint of the first two contacts, if at least two are down.
pub fn two_finger_geometry(contacts: &[ContactPoint]) -> Option<(f64, Point)> {
    match contacts {
        [a, b, ..] => Some((contact_distance(a, b), contact_midpoint(a, b))),
        _ => None,
    }
}

/// Reference frame captured when a two-finger pinch begins; everything a
/// pinch-move update is computed against lives here, so in-between view
/// updates cannot skew the gesture.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PinchSession {
    pub start_distance: f64,
    pub start_zoom: f64,
    pub start_midpoint: Point,
    pub start_pan: Point,
}

pub mod gesture;
pub mod viewport;

pub use gesture::{ContactPoint, PinchSession, Point};
pub use viewport::{MapViewport, ViewSnapshot, ViewportRect};

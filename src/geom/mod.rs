mod core;

pub use self::core::{Point2, Point3, Tolerance, Vec2};

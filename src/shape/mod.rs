//! Shapes supported by fleche3d.

pub use self::segment::Segment;
pub use self::triangle::Triangle;

mod segment;
mod triangle;

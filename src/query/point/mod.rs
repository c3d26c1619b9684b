//! Point distance computations.

mod point_segment;
mod point_triangle;

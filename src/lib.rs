/*!
fleche3d
========

**fleche3d** is a 3-dimensional nearest-point search library written with
the rust programming language. It indexes a static set of triangles into a
binary tree of axis-aligned bounding boxes built with a binned
surface-area heuristic, then answers "which item is nearest to this
point?" queries without scanning the whole set.

*/

#![deny(non_camel_case_types)]
#![deny(unused_parens)]
#![deny(non_upper_case_globals)]
#![deny(unused_results)]
#![warn(missing_docs)]
#![warn(unused_imports)]
#![allow(missing_copy_implementations)]
#![allow(clippy::module_inception)]
#![doc(html_root_url = "https://docs.rs/fleche3d/0.1.0")]

#[cfg(feature = "serde")]
#[macro_use]
extern crate serde;
#[cfg(test)]
#[macro_use]
extern crate approx;

pub extern crate nalgebra as na;

pub mod bounding_volume;
pub mod io;
pub mod partitioning;
pub mod query;
pub mod shape;

/// Aliases for the mathematical types used throughout this crate.
pub mod math {
    /// The scalar type used throughout this crate.
    pub type Real = f64;

    /// The default tolerance used for geometric operations.
    pub const DEFAULT_EPSILON: Real = Real::EPSILON;

    /// The dimension of the space.
    pub const DIM: usize = 3;

    /// The point type.
    pub use na::Point3 as Point;

    /// The vector type.
    pub use na::Vector3 as Vector;
}

//! Non-persistent geometric queries.
//!
//! The distance computations exported here are implemented as inherent
//! methods on the shapes themselves: [`Triangle::distance_squared_to_point`]
//! and [`Segment::distance_squared_to_point`].
//!
//! [`Triangle::distance_squared_to_point`]: crate::shape::Triangle::distance_squared_to_point
//! [`Segment::distance_squared_to_point`]: crate::shape::Segment::distance_squared_to_point

pub mod point;

//! Axis Aligned Bounding Box.

use crate::math::{Point, Real, Vector, DIM};
use na;

/// An Axis-Aligned Bounding Box (AABB).
///
/// The box is defined by its minimal corner `mins` and its maximal corner
/// `maxs`: `mins.x ≤ maxs.x`, `mins.y ≤ maxs.y`, `mins.z ≤ maxs.z` for any
/// well-formed box. Boxes are treated as closed sets: a point lying exactly
/// on a face is contained, and two boxes sharing a face intersect.
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
#[derive(Debug, PartialEq, Copy, Clone)]
#[repr(C)]
pub struct Aabb {
    /// The point with the smallest coordinates.
    pub mins: Point<Real>,
    /// The point with the greatest coordinates.
    pub maxs: Point<Real>,
}

impl Aabb {
    /// The vertex indices of each edge of this `Aabb`.
    ///
    /// This gives, for each edge of this `Aabb`, the indices of its
    /// vertices when taken from the `self.vertices()` array.
    /// Here is how the vertices are numbered, assuming
    /// a right-handed coordinate system:
    ///
    /// ```text
    ///    y             3 - 2
    ///    |           7 − 6 |
    ///    ___ x       |   | 1  (the zero is below 3 and on the left of 1,
    ///   /            4 - 5     hidden by the 4-5-6-7 face.)
    ///  z
    /// ```
    pub const EDGES_VERTEX_IDS: [(usize, usize); 12] = [
        (0, 1),
        (1, 2),
        (3, 2),
        (0, 3),
        (4, 5),
        (5, 6),
        (7, 6),
        (4, 7),
        (0, 4),
        (1, 5),
        (2, 6),
        (3, 7),
    ];

    /// Creates a new AABB.
    ///
    /// `mins` must be componentwise smaller than `maxs`.
    #[inline]
    pub fn new(mins: Point<Real>, maxs: Point<Real>) -> Aabb {
        Aabb { mins, maxs }
    }

    /// Creates an invalid AABB with `mins` components set to `Real::MAX` and `maxs`
    /// components set to `-Real::MAX`.
    ///
    /// This is often used as the initial value of some AABB merging algorithms.
    #[inline]
    pub fn new_invalid() -> Self {
        Self::new(
            Vector::repeat(Real::MAX).into(),
            Vector::repeat(-Real::MAX).into(),
        )
    }

    /// Computes the AABB of a set of points.
    pub fn from_points<'a, I>(pts: I) -> Aabb
    where
        I: IntoIterator<Item = &'a Point<Real>>,
    {
        let mut result = Aabb::new_invalid();

        for pt in pts {
            result.take_point(*pt);
        }

        result
    }

    /// The center of this AABB.
    #[inline]
    pub fn center(&self) -> Point<Real> {
        na::center(&self.mins, &self.maxs)
    }

    /// The half extents of this AABB.
    #[inline]
    pub fn half_extents(&self) -> Vector<Real> {
        (self.maxs - self.mins) * 0.5
    }

    /// The extents of this AABB.
    #[inline]
    pub fn extents(&self) -> Vector<Real> {
        self.maxs - self.mins
    }

    /// The volume of this AABB.
    #[inline]
    pub fn volume(&self) -> Real {
        let extents = self.extents();
        extents.x * extents.y * extents.z
    }

    /// Computes the vertices of this AABB.
    ///
    /// The vertices are given in the order shown by the diagram on
    /// [`Self::EDGES_VERTEX_IDS`].
    #[inline]
    pub fn vertices(&self) -> [Point<Real>; 8] {
        [
            Point::new(self.mins.x, self.mins.y, self.mins.z),
            Point::new(self.maxs.x, self.mins.y, self.mins.z),
            Point::new(self.maxs.x, self.maxs.y, self.mins.z),
            Point::new(self.mins.x, self.maxs.y, self.mins.z),
            Point::new(self.mins.x, self.mins.y, self.maxs.z),
            Point::new(self.maxs.x, self.mins.y, self.maxs.z),
            Point::new(self.maxs.x, self.maxs.y, self.maxs.z),
            Point::new(self.mins.x, self.maxs.y, self.maxs.z),
        ]
    }

    /// Enlarges this AABB so it also contains the point `pt`.
    pub fn take_point(&mut self, pt: Point<Real>) {
        self.mins = self.mins.coords.inf(&pt.coords).into();
        self.maxs = self.maxs.coords.sup(&pt.coords).into();
    }

    /// Merges this AABB with `other`, in-place.
    #[inline]
    pub fn merge(&mut self, other: &Aabb) {
        *self = self.merged(other);
    }

    /// Computes the AABB bounding both `self` and `other`.
    #[inline]
    pub fn merged(&self, other: &Aabb) -> Aabb {
        Aabb {
            mins: self.mins.inf(&other.mins),
            maxs: self.maxs.sup(&other.maxs),
        }
    }

    /// Checks whether this AABB intersects `other`.
    #[inline]
    pub fn intersects(&self, other: &Aabb) -> bool {
        for i in 0..DIM {
            if self.mins[i] > other.maxs[i] || self.maxs[i] < other.mins[i] {
                return false;
            }
        }

        true
    }

    /// Checks whether this AABB contains the point `pt`.
    #[inline]
    pub fn contains_local_point(&self, pt: &Point<Real>) -> bool {
        for i in 0..DIM {
            if pt[i] < self.mins[i] || pt[i] > self.maxs[i] {
                return false;
            }
        }

        true
    }

    /// Checks whether the ball centered at `center` with radius `radius` lies
    /// strictly inside this AABB.
    ///
    /// The test is strict: a ball touching a face of the box is not contained.
    /// A `true` result guarantees that no point outside of the box can be
    /// closer than `radius` to `center`.
    #[inline]
    pub fn contains_ball(&self, center: &Point<Real>, radius: Real) -> bool {
        for i in 0..DIM {
            if self.mins[i] >= center[i] - radius || self.maxs[i] <= center[i] + radius {
                return false;
            }
        }

        true
    }

    /// Tests whether the ball centered at `center` with radius `radius` touches
    /// this AABB.
    ///
    /// The test is conservative: it may return `true` for a few configurations
    /// where the ball misses the box near an edge, but it never returns `false`
    /// when the ball actually touches the box.
    #[inline]
    pub fn intersects_ball(&self, center: &Point<Real>, radius: Real) -> bool {
        let half_extents = self.half_extents();
        let dist_to_mid = (center - self.center()).abs();

        for i in 0..DIM {
            if half_extents[i] + radius < dist_to_mid[i] {
                return false;
            }
        }

        for i in 0..DIM {
            if dist_to_mid[i] <= half_extents[i] {
                return true;
            }
        }

        // The center lies past the box on every axis: compare against the
        // nearest corner.
        let dist_to_corner = dist_to_mid - half_extents;
        dist_to_corner.norm_squared() <= radius * radius
    }
}

#[cfg(test)]
mod test {
    use super::Aabb;
    use crate::math::{Point, Real};

    fn unit_box() -> Aabb {
        Aabb::new(Point::origin(), Point::new(1.0, 1.0, 1.0))
    }

    #[test]
    fn merge_and_from_points() {
        let pts = [
            Point::new(1.0, 2.0, 3.0),
            Point::new(-1.0, 4.0, 2.0),
            Point::new(0.0, 0.0, 5.0),
        ];
        let aabb = Aabb::from_points(&pts);
        assert_eq!(aabb.mins, Point::new(-1.0, 0.0, 2.0));
        assert_eq!(aabb.maxs, Point::new(1.0, 4.0, 5.0));

        let mut merged = Aabb::new_invalid();
        merged.merge(&aabb);
        merged.merge(&unit_box());
        assert_eq!(merged.mins, Point::new(-1.0, 0.0, 0.0));
        assert_eq!(merged.maxs, Point::new(1.0, 4.0, 5.0));
    }

    #[test]
    fn ball_containment_is_strict() {
        let aabb = unit_box();
        let center = Point::new(0.5, 0.5, 0.5);

        assert!(aabb.contains_ball(&center, 0.25));
        // Touching every face is not strict containment.
        assert!(!aabb.contains_ball(&center, 0.5));
        assert!(!aabb.contains_ball(&Point::new(0.1, 0.5, 0.5), 0.2));
    }

    #[test]
    fn ball_intersection() {
        let aabb = unit_box();

        // Center inside the box.
        assert!(aabb.intersects_ball(&Point::new(0.5, 0.5, 0.5), 0.01));
        // Touching a face from the outside.
        assert!(aabb.intersects_ball(&Point::new(1.5, 0.5, 0.5), 0.5));
        // Clearly separated along one axis.
        assert!(!aabb.intersects_ball(&Point::new(3.0, 0.5, 0.5), 0.5));
        // Near a corner: reachable only through the corner-distance check.
        let corner_dist = (3.0 as Real).sqrt() * 0.5;
        assert!(aabb.intersects_ball(&Point::new(1.5, 1.5, 1.5), corner_dist + 1.0e-9));
        assert!(!aabb.intersects_ball(&Point::new(1.5, 1.5, 1.5), corner_dist - 1.0e-3));
    }

    #[test]
    fn edges_join_valid_vertices() {
        let aabb = unit_box();
        let vertices = aabb.vertices();

        for (i1, i2) in Aabb::EDGES_VERTEX_IDS {
            // Each edge must be axis-aligned: exactly one coordinate differs.
            let differing = (0..3).filter(|&k| vertices[i1][k] != vertices[i2][k]).count();
            assert_eq!(differing, 1);
        }
    }
}

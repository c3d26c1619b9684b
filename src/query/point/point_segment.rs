use crate::math::{Point, Real};
use crate::shape::Segment;
use na;

impl Segment {
    /// Computes the squared distance between this segment and `pt`.
    pub fn distance_squared_to_point(&self, pt: &Point<Real>) -> Real {
        let ab = self.scaled_direction();
        let ap = pt - self.a;
        let ab_ap = ab.dot(&ap);
        let sqnab = ab.norm_squared();

        if ab_ap <= 0.0 {
            // Voronoï region of vertex 'a'. Also covers degenerate
            // zero-length segments, for which `ab_ap` is zero.
            na::distance_squared(&self.a, pt)
        } else if ab_ap >= sqnab {
            // Voronoï region of vertex 'b'.
            na::distance_squared(&self.b, pt)
        } else {
            // Voronoï region of the segment interior.
            let u = ab_ap / sqnab;
            na::distance_squared(&(self.a + ab * u), pt)
        }
    }

    /// Computes the distance between this segment and `pt`.
    #[inline]
    pub fn distance_to_point(&self, pt: &Point<Real>) -> Real {
        self.distance_squared_to_point(pt).sqrt()
    }
}

#[cfg(test)]
mod test {
    use crate::math::Point;
    use crate::shape::Segment;

    #[test]
    fn distance_in_each_voronoi_region() {
        let segment = Segment::new(Point::new(0.0, 0.0, 0.0), Point::new(2.0, 0.0, 0.0));

        // Behind 'a'.
        assert_relative_eq!(
            segment.distance_to_point(&Point::new(-3.0, 4.0, 0.0)),
            5.0
        );
        // Past 'b'.
        assert_relative_eq!(segment.distance_to_point(&Point::new(5.0, 0.0, 4.0)), 5.0);
        // Above the interior.
        assert_relative_eq!(segment.distance_to_point(&Point::new(1.0, 2.0, 0.0)), 2.0);
        // On the segment.
        assert_relative_eq!(segment.distance_to_point(&Point::new(0.5, 0.0, 0.0)), 0.0);
    }

    #[test]
    fn zero_length_segment() {
        let segment = Segment::new(Point::new(1.0, 1.0, 1.0), Point::new(1.0, 1.0, 1.0));
        assert_relative_eq!(segment.distance_to_point(&Point::new(1.0, 1.0, 3.0)), 2.0);
    }
}

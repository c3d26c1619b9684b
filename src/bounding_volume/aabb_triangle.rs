use crate::math::DIM;
use crate::{bounding_volume::Aabb, shape::Triangle};

impl Triangle {
    /// Computes the local-space [`Aabb`] of this triangle.
    #[inline]
    pub fn local_aabb(&self) -> Aabb {
        let mut mins = self.a;
        let mut maxs = self.a;

        for d in 0..DIM {
            mins[d] = mins[d].min(self.b[d]).min(self.c[d]);
            maxs[d] = maxs[d].max(self.b[d]).max(self.c[d]);
        }

        Aabb::new(mins, maxs)
    }
}

#[cfg(test)]
mod test {
    use crate::math::Point;
    use crate::shape::Triangle;

    #[test]
    fn triangle_aabb_takes_componentwise_extremes() {
        let t = Triangle::new(
            Point::new(0.3, -0.1, 0.2),
            Point::new(-0.7, 1.0, 0.0),
            Point::new(0.5, 1.5, -0.3),
        );

        let aabb = t.local_aabb();
        assert_eq!(aabb.mins, Point::new(-0.7, -0.1, -0.3));
        assert_eq!(aabb.maxs, Point::new(0.5, 1.5, 0.2));
    }

    #[test]
    fn degenerate_triangle_aabb_can_be_flat() {
        let t = Triangle::new(
            Point::new(0.0, 1.0, 0.0),
            Point::new(2.0, 1.0, 0.0),
            Point::new(1.0, 1.0, 3.0),
        );

        let aabb = t.local_aabb();
        assert_eq!(aabb.mins.y, 1.0);
        assert_eq!(aabb.maxs.y, 1.0);
        assert_eq!(aabb.extents().y, 0.0);
    }
}

use crate::math::{Point, Real};
use crate::shape::Triangle;
use na;

impl Triangle {
    /// Computes the squared distance between this triangle and `pt`.
    ///
    /// The point is classified against the Voronoï regions of the triangle
    /// (vertices, then edges, then the face) and projected on the closest
    /// feature. Degenerate triangles are handled by falling back to the
    /// nearest of the three edges.
    pub fn distance_squared_to_point(&self, pt: &Point<Real>) -> Real {
        let a = self.a;
        let b = self.b;
        let c = self.c;

        let ab = b - a;
        let ac = c - a;
        let ap = pt - a;

        let ab_ap = ab.dot(&ap);
        let ac_ap = ac.dot(&ap);

        if ab_ap <= 0.0 && ac_ap <= 0.0 {
            // Voronoï region of `a`.
            return na::distance_squared(&a, pt);
        }

        let bp = pt - b;
        let ab_bp = ab.dot(&bp);
        let ac_bp = ac.dot(&bp);

        if ab_bp >= 0.0 && ac_bp <= ab_bp {
            // Voronoï region of `b`.
            return na::distance_squared(&b, pt);
        }

        let cp = pt - c;
        let ab_cp = ab.dot(&cp);
        let ac_cp = ac.dot(&cp);

        if ac_cp >= 0.0 && ab_cp <= ac_cp {
            // Voronoï region of `c`.
            return na::distance_squared(&c, pt);
        }

        // Edge regions, checked with explicit cross products for numerical
        // stability.
        let bc = c - b;
        let n = ab.cross(&ac);

        let vc = n.dot(&ab.cross(&ap));
        if vc < 0.0 && ab_ap >= 0.0 && ab_bp <= 0.0 {
            // Voronoï region of `ab`.
            let v = ab_ap / ab.norm_squared();
            return na::distance_squared(&(a + ab * v), pt);
        }

        let vb = -n.dot(&ac.cross(&cp));
        if vb < 0.0 && ac_ap >= 0.0 && ac_cp <= 0.0 {
            // Voronoï region of `ac`.
            let w = ac_ap / ac.norm_squared();
            return na::distance_squared(&(a + ac * w), pt);
        }

        let va = n.dot(&bc.cross(&bp));
        if va < 0.0 && ac_bp - ab_bp >= 0.0 && ab_cp - ac_cp >= 0.0 {
            // Voronoï region of `bc`.
            let u = bc.dot(&bp) / bc.norm_squared();
            return na::distance_squared(&(b + bc * u), pt);
        }

        // Voronoï region of the face. A nearly degenerate triangle may zero
        // the denominator; the point is then treated as facing a flat
        // triangle and measured against its edges.
        let denom = va + vb + vc;
        if denom != 0.0 {
            let denom = 1.0 / denom;
            let v = vb * denom;
            let w = vc * denom;
            return na::distance_squared(&(a + ab * v + ac * w), pt);
        }

        self.edges()
            .iter()
            .map(|edge| edge.distance_squared_to_point(pt))
            .fold(Real::MAX, Real::min)
    }

    /// Computes the distance between this triangle and `pt`.
    #[inline]
    pub fn distance_to_point(&self, pt: &Point<Real>) -> Real {
        self.distance_squared_to_point(pt).sqrt()
    }
}

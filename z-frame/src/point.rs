/// A point-like memory layout to achieve zero copy.
///
/// Angles are in degrees, and the Y axis points down as in screen space.
pub trait Point: Sized + Copy {
    /// Create a new point.
    fn new(x: f64, y: f64) -> Self;
    /// X coordinate.
    fn x(&self) -> f64;
    /// Y coordinate.
    fn y(&self) -> f64;

    /// Point at distance `d0` along the direction `a0` (degrees).
    fn pla(&self, d0: f64, a0: f64) -> Self {
        let (s, c) = a0.to_radians().sin_cos();
        Self::new(self.x() + d0 * c, self.y() + d0 * s)
    }

    /// Bearing from this point to `rhs` in degrees, in (-180, 180].
    fn bearing(&self, rhs: &Self) -> f64 {
        f64::atan2(rhs.y() - self.y(), rhs.x() - self.x()).to_degrees()
    }

    /// Euclidean distance to `rhs`.
    fn dist(&self, rhs: &Self) -> f64 {
        (rhs.x() - self.x()).hypot(rhs.y() - self.y())
    }

    /// Distance from this point to the segment `start`-`end`.
    ///
    /// A zero-length segment degrades to the distance to `start`.
    fn seg_dist(&self, start: &Self, end: &Self) -> f64 {
        let [a, b] = [self.x() - start.x(), self.y() - start.y()];
        let [c, d] = [end.x() - start.x(), end.y() - start.y()];
        let len2 = c * c + d * d;
        let t = if len2 > 0. {
            ((a * c + b * d) / len2).clamp(0., 1.)
        } else {
            0.
        };
        (a - t * c).hypot(b - t * d)
    }
}

impl Point for [f64; 2] {
    #[inline(always)]
    fn new(x: f64, y: f64) -> Self {
        [x, y]
    }
    #[inline(always)]
    fn x(&self) -> f64 {
        self[0]
    }
    #[inline(always)]
    fn y(&self) -> f64 {
        self[1]
    }
}

impl Point for (f64, f64) {
    #[inline(always)]
    fn new(x: f64, y: f64) -> Self {
        (x, y)
    }
    #[inline(always)]
    fn x(&self) -> f64 {
        self.0
    }
    #[inline(always)]
    fn y(&self) -> f64 {
        self.1
    }
}

//! Vector math operations for `Vec2`.
//!
//! Provides magnitude, normalization, dot product, distance helpers, and the
//! velocity-magnitude clamp used by `Boid::act`.

use super::Vec2;

impl Vec2 {
    /// Squared magnitude of the vector.
    ///
    /// Cheaper than `norm()` since it skips the square root — used everywhere
    /// in the hot neighbour-scan loop where only a radius *comparison* is
    /// needed, never the exact distance.
    ///
    /// # Examples
    /// ```
    /// # use flocking_lib::vector::Vec2;
    /// let v = Vec2::new(3.0, 4.0);
    /// assert_eq!(v.norm_squared(), 25.0);
    /// ```
    #[inline]
    pub fn norm_squared(&self) -> f64 {
        self.x * self.x + self.y * self.y
    }

    /// Euclidean magnitude of the vector: `sqrt(x^2 + y^2)`.
    #[inline]
    pub fn norm(&self) -> f64 {
        self.norm_squared().sqrt()
    }

    /// Returns a unit vector in the same direction as this vector, or the
    /// zero vector if the magnitude is within `f64::EPSILON` of zero.
    ///
    /// # Examples
    /// ```
    /// # use flocking_lib::vector::Vec2;
    /// let v = Vec2::new(3.0, 4.0);
    /// let normalized = v.normalize();
    /// assert!((normalized.norm() - 1.0).abs() < f64::EPSILON);
    /// assert_eq!(Vec2::zero().normalize(), Vec2::zero());
    /// ```
    pub fn normalize(&self) -> Self {
        let norm_sq = self.norm_squared();
        if norm_sq > f64::EPSILON * f64::EPSILON {
            let inv_norm = norm_sq.sqrt().recip();
            Vec2 {
                x: self.x * inv_norm,
                y: self.y * inv_norm,
            }
        } else {
            Vec2::zero()
        }
    }

    /// Dot product: `a.x*b.x + a.y*b.y`.
    #[inline]
    pub fn dot(&self, other: &Self) -> f64 {
        self.x * other.x + self.y * other.y
    }

    /// Squared Euclidean distance to another vector. Prefer this over
    /// `distance_to` whenever only a radius comparison is needed.
    #[inline]
    pub fn distance_squared(&self, other: &Self) -> f64 {
        (*self - *other).norm_squared()
    }

    /// Euclidean distance to another vector.
    #[inline]
    pub fn distance_to(&self, other: &Self) -> f64 {
        (*self - *other).norm()
    }

    /// Rotates this vector by `angle` radians (counter-clockwise, standard
    /// planar rotation matrix). Used by the frame sink to draw a boid's
    /// heading line.
    pub fn rotate(&self, angle: f64) -> Self {
        let (sin_a, cos_a) = angle.sin_cos();
        Vec2 {
            x: cos_a * self.x - sin_a * self.y,
            y: sin_a * self.x + cos_a * self.y,
        }
    }

    /// Returns this vector clamped to at most `max_mag` in magnitude,
    /// direction preserved. Used by `Boid::act` to enforce `MaxVel`.
    ///
    /// # Examples
    /// ```
    /// # use flocking_lib::vector::Vec2;
    /// let v = Vec2::new(30.0, 40.0); // magnitude 50
    /// let clamped = v.clamp_magnitude(10.0);
    /// assert!((clamped.norm() - 10.0).abs() < 1e-9);
    /// ```
    pub fn clamp_magnitude(&self, max_mag: f64) -> Self {
        let norm_sq = self.norm_squared();
        if norm_sq > max_mag * max_mag {
            self.normalize() * max_mag
        } else {
            *self
        }
    }

    /// Componentwise approximate equality within `epsilon`.
    #[inline]
    pub fn approx_eq(&self, other: &Self, epsilon: f64) -> bool {
        let epsilon = epsilon.max(f64::EPSILON);
        (self.x - other.x).abs() < epsilon && (self.y - other.y).abs() < epsilon
    }
}

//! # Operator overloads for `Vec2`
//!
//! Implements `Add`, `Sub`, `Mul`, `Div`, and `Neg` for both value and
//! reference operands so accumulator-heavy code (e.g. `Boid::sense_and_plan`)
//! can choose whichever avoids an unnecessary copy.

use super::Vec2;
use std::ops::{Add, AddAssign, Div, Mul, Neg, Sub, SubAssign};

/// Vector addition.
///
/// # Examples
/// ```
/// # use flocking_lib::vector::Vec2;
/// let a = Vec2::new(1.0, 2.0);
/// let b = Vec2::new(4.0, 5.0);
/// assert_eq!(a + b, Vec2::new(5.0, 7.0));
/// ```
impl Add for Vec2 {
    type Output = Self;
    #[inline]
    fn add(self, rhs: Self) -> Self::Output {
        Vec2 {
            x: self.x + rhs.x,
            y: self.y + rhs.y,
        }
    }
}

impl Add for &Vec2 {
    type Output = Vec2;
    #[inline]
    fn add(self, rhs: &Vec2) -> Self::Output {
        Vec2 {
            x: self.x + rhs.x,
            y: self.y + rhs.y,
        }
    }
}

impl AddAssign for Vec2 {
    #[inline]
    fn add_assign(&mut self, rhs: Self) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

/// Vector subtraction: the displacement from `rhs` to `self`.
///
/// # Examples
/// ```
/// # use flocking_lib::vector::Vec2;
/// let a = Vec2::new(5.0, 7.0);
/// let b = Vec2::new(1.0, 2.0);
/// assert_eq!(a - b, Vec2::new(4.0, 5.0));
/// ```
impl Sub for Vec2 {
    type Output = Self;
    #[inline]
    fn sub(self, rhs: Self) -> Self::Output {
        Vec2 {
            x: self.x - rhs.x,
            y: self.y - rhs.y,
        }
    }
}

impl Sub for &Vec2 {
    type Output = Vec2;
    #[inline]
    fn sub(self, rhs: &Vec2) -> Self::Output {
        Vec2 {
            x: self.x - rhs.x,
            y: self.y - rhs.y,
        }
    }
}

impl SubAssign for Vec2 {
    #[inline]
    fn sub_assign(&mut self, rhs: Self) {
        self.x -= rhs.x;
        self.y -= rhs.y;
    }
}

/// Scalar multiplication, e.g. scaling a velocity by a timestep.
///
/// # Examples
/// ```
/// # use flocking_lib::vector::Vec2;
/// let velocity = Vec2::new(2.0, -1.0);
/// let displacement = velocity * 0.1;
/// assert_eq!(displacement, Vec2::new(0.2, -0.1));
/// ```
impl Mul<f64> for Vec2 {
    type Output = Self;
    #[inline]
    fn mul(self, rhs: f64) -> Self::Output {
        Vec2 {
            x: self.x * rhs,
            y: self.y * rhs,
        }
    }
}

impl Mul<f64> for &Vec2 {
    type Output = Vec2;
    #[inline]
    fn mul(self, rhs: f64) -> Self::Output {
        Vec2 {
            x: self.x * rhs,
            y: self.y * rhs,
        }
    }
}

/// Commutative scalar multiplication, e.g. `weight * vector`.
impl Mul<Vec2> for f64 {
    type Output = Vec2;
    #[inline]
    fn mul(self, rhs: Vec2) -> Self::Output {
        Vec2 {
            x: self * rhs.x,
            y: self * rhs.y,
        }
    }
}

impl Mul<&Vec2> for f64 {
    type Output = Vec2;
    #[inline]
    fn mul(self, rhs: &Vec2) -> Self::Output {
        Vec2 {
            x: self * rhs.x,
            y: self * rhs.y,
        }
    }
}

/// Scalar division. Implemented via multiplication by the reciprocal.
///
/// # Examples
/// ```
/// # use flocking_lib::vector::Vec2;
/// let com_sum = Vec2::new(10.0, 20.0);
/// let mean = com_sum / 2.0;
/// assert_eq!(mean, Vec2::new(5.0, 10.0));
/// ```
impl Div<f64> for Vec2 {
    type Output = Self;
    #[inline]
    fn div(self, rhs: f64) -> Self::Output {
        let inv = rhs.recip();
        Vec2 {
            x: self.x * inv,
            y: self.y * inv,
        }
    }
}

impl Div<f64> for &Vec2 {
    type Output = Vec2;
    #[inline]
    fn div(self, rhs: f64) -> Self::Output {
        let inv = rhs.recip();
        Vec2 {
            x: self.x * inv,
            y: self.y * inv,
        }
    }
}

/// Vector negation.
impl Neg for Vec2 {
    type Output = Self;
    #[inline]
    fn neg(self) -> Self::Output {
        Vec2 {
            x: -self.x,
            y: -self.y,
        }
    }
}

impl Neg for &Vec2 {
    type Output = Vec2;
    #[inline]
    fn neg(self) -> Self::Output {
        Vec2 {
            x: -self.x,
            y: -self.y,
        }
    }
}

//! Numeric contract shared by every field type.
//!
//! Constraint values and field amplitudes are either real (`f64`) or complex
//! (`Complex64`). The engine is written once against [`Scalar`].

use std::fmt;
use std::ops::{Add, AddAssign, Div, DivAssign, Mul, MulAssign, Neg, Sub, SubAssign};

use num_complex::Complex64;

/// A real or complex field amplitude.
pub trait Scalar:
    Copy
    + fmt::Debug
    + PartialEq
    + Send
    + Sync
    + 'static
    + Add<Output = Self>
    + Sub<Output = Self>
    + Mul<Output = Self>
    + Div<Output = Self>
    + Neg<Output = Self>
    + AddAssign
    + SubAssign
    + MulAssign
    + DivAssign
{
    fn zero() -> Self;

    fn one() -> Self;

    /// Lift a real number into this scalar type.
    fn from_real(value: f64) -> Self;

    /// Complex conjugate (identity for reals).
    fn conj(self) -> Self;

    /// Real part.
    fn re(self) -> f64;

    /// Imaginary part (always zero for reals).
    fn im(self) -> f64;

    /// Absolute value / complex modulus.
    fn modulus(self) -> f64;

    /// True if every component is finite.
    fn is_finite(self) -> bool;
}

impl Scalar for f64 {
    fn zero() -> Self {
        0.0
    }

    fn one() -> Self {
        1.0
    }

    fn from_real(value: f64) -> Self {
        value
    }

    fn conj(self) -> Self {
        self
    }

    fn re(self) -> f64 {
        self
    }

    fn im(self) -> f64 {
        0.0
    }

    fn modulus(self) -> f64 {
        self.abs()
    }

    fn is_finite(self) -> bool {
        f64::is_finite(self)
    }
}

impl Scalar for Complex64 {
    fn zero() -> Self {
        Complex64::new(0.0, 0.0)
    }

    fn one() -> Self {
        Complex64::new(1.0, 0.0)
    }

    fn from_real(value: f64) -> Self {
        Complex64::new(value, 0.0)
    }

    fn conj(self) -> Self {
        Complex64::conj(&self)
    }

    fn re(self) -> f64 {
        self.re
    }

    fn im(self) -> f64 {
        self.im
    }

    fn modulus(self) -> f64 {
        self.norm()
    }

    fn is_finite(self) -> bool {
        self.re.is_finite() && self.im.is_finite()
    }
}

// Copyright 2020-2021 Kevin Reid under the terms of the MIT License as detailed
// in the accompanying file README.md or <http://opensource.org/licenses/MIT>.

//! Color data types. This module is private but reexported by its parent.

use cgmath::{ElementWise as _, Vector3};
pub use ordered_float::{FloatIsNan, NotNan};
use std::convert::TryFrom;
use std::ops::{Add, AddAssign, Mul};

/// A linear RGB radiosity/reflectance value.
///
/// * Each component may be considered to have a nominal range of 0 to 1, but
///   larger values are permitted — emitters are routinely given values like
///   `(2.0, 2.0, 2.0)` to represent an overexposed light source.
/// * NaN is banned so that [`PartialEq`] is meaningful on accumulated sums;
///   an operation that would otherwise produce one is a bug in the caller,
///   not a state this type represents.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rgb(Vector3<NotNan<f64>>);

const NN0: NotNan<f64> = unsafe { NotNan::unchecked_new(0.0) };

impl Rgb {
    /// Black.
    pub const ZERO: Rgb = Rgb(Vector3::new(NN0, NN0, NN0));

    /// Constructs a colour from components. Panics if any component is NaN.
    #[inline]
    pub fn new(r: f64, g: f64, b: f64) -> Self {
        Self::try_from(Vector3::new(r, g, b)).expect("color components may not be NaN")
    }

    /// Returns the red component.
    #[inline]
    pub fn red(self) -> f64 {
        self.0.x.into_inner()
    }
    /// Returns the green component.
    #[inline]
    pub fn green(self) -> f64 {
        self.0.y.into_inner()
    }
    /// Returns the blue component.
    #[inline]
    pub fn blue(self) -> f64 {
        self.0.z.into_inner()
    }

    /// Rec. 709 relative luminance, `0.2126·r + 0.7152·g + 0.0722·b`.
    #[inline]
    pub fn as_grey(self) -> f64 {
        0.2126 * self.red() + 0.7152 * self.green() + 0.0722 * self.blue()
    }

    /// The largest of the three components.
    #[inline]
    pub fn max_component(self) -> f64 {
        self.red().max(self.green()).max(self.blue())
    }

    /// Componentwise maximum with zero; clamps away any negative component
    /// produced by upstream numerical error.
    #[inline]
    pub fn clamped_non_negative(self) -> Self {
        Self::new(self.red().max(0.0), self.green().max(0.0), self.blue().max(0.0))
    }
}

impl TryFrom<Vector3<f64>> for Rgb {
    type Error = FloatIsNan;
    fn try_from(value: Vector3<f64>) -> Result<Self, Self::Error> {
        Ok(Self(Vector3::new(
            NotNan::new(value.x)?,
            NotNan::new(value.y)?,
            NotNan::new(value.z)?,
        )))
    }
}

impl Add<Rgb> for Rgb {
    type Output = Self;
    #[inline]
    fn add(self, other: Self) -> Self {
        Self(self.0 + other.0)
    }
}
impl AddAssign<Rgb> for Rgb {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}
/// Multiplies two colour values componentwise (material modulation).
impl Mul<Rgb> for Rgb {
    type Output = Self;
    #[inline]
    fn mul(self, other: Rgb) -> Self {
        Self(self.0.mul_element_wise(other.0))
    }
}
/// Multiplies this colour value by a scalar. Panics if the scalar is NaN.
impl Mul<f64> for Rgb {
    type Output = Self;
    #[inline]
    fn mul(self, scalar: f64) -> Self {
        Self(self.0 * NotNan::new(scalar).expect("scalar may not be NaN"))
    }
}

impl Default for Rgb {
    fn default() -> Self {
        Self::ZERO
    }
}

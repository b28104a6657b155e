#![doc(html_logo_url = "https://raw.githubusercontent.com/georust/meta/master/logo/logo.png")]
// Copyright 2017 The Spade Developers.
// Copyright 2020 The GeoRust Project Developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! # Sign-Exact Orientation, Volume and In-Sphere Predicates
//! Adaptive-precision geometric predicates after Jonathan Richard Shewchuk
//! ([https://www.cs.cmu.edu/~quake/robust.html](https://www.cs.cmu.edu/~quake/robust.html)),
//! extended to any dimension and paired with an exact determinant oracle.
//!
//! Every predicate returns an `f64` whose **sign** is the exact sign of a determinant:
//! - [`orientation2d`] / [`orientation3d`] / [`volume`]: "on which side of a line (2d), plane (3d)
//!   or hyperplane does a point lie?", i.e. the signed volume of a simplex.
//! - [`incircle`] / [`insphere3d`] / [`insphere`]: "is a point inside the circle / sphere through
//!   the other points?", i.e. the signed volume of the simplex lifted onto a paraboloid.
//! - [`sign_exact_determinant`]: the sign of an arbitrary square determinant, computed exactly
//!   without any shortcut.
//!
//! A result is `0.0` if and only if the configuration is exactly degenerate (collinear,
//! coplanar, cospherical, singular). Each predicate first evaluates its determinant with
//! ordinary floating-point arithmetic and a static error bound; only when the bound cannot
//! certify the sign is the determinant re-evaluated with exact [`Expansion`] arithmetic.
//!
//! ## Sign conventions
//! All predicates share the convention of the homogenised determinant whose rows are
//! `[1, p_i]` for orientation and `[1, p_i, |p_i|²]` for in-sphere tests, which is exactly
//! what [`sign_exact_determinant`] computes when given those rows:
//! - the orientation of `p0, p1, p2` is positive when they are in counterclockwise order;
//! - the volume of `p0..p3` is `det(p1 - p0, p2 - p0, p3 - p0)`;
//! - when the first `D + 1` points of an in-sphere test have positive orientation, the result
//!   is negative for a last point strictly inside their circumsphere and positive outside.
//!
//! ## Input
//! Coordinates must be finite; NaN and infinities are rejected with
//! [`PredicateError::NonFiniteInput`]. Every other `f64` is accepted, subnormal and huge values
//! included: when the coordinates span more exponents than floating-point products can carry
//! without underflow or overflow, the determinant is evaluated in rational arithmetic instead.
//!
//! `f32` coordinates are accepted by the typed entry points and converted to `f64` exactly
//! ([IEEE-754](https://drive.google.com/file/d/0B3O3Ys97VjtxYXBCY08wanNoZ1U/view), section 5.3).

mod adaptive;
mod arith;
mod constants;
mod determinant;
mod error;
mod expansion;
mod input;
mod range;
mod rational;

#[cfg(test)]
mod tests;

pub use crate::error::PredicateError;
pub use crate::expansion::Expansion;

use crate::input::{check_finite, check_order, simplex_dimension, square_order};

/// Largest matrix order accepted by [`sign_exact_determinant`], and hence the largest
/// dimension of [`volume`] (`order - 1`) and [`insphere`] (`order - 2`).
pub const MAX_DETERMINANT_ORDER: usize = 16;

/// A two dimensional coordinate.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Coord<T: Into<f64>> {
    pub x: T,
    pub y: T,
}

/// A three dimensional coordinate.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Coord3D<T: Into<f64>> {
    pub x: T,
    pub y: T,
    pub z: T,
}

impl<T: Into<f64>> Coord<T> {
    fn into_array(self) -> [f64; 2] {
        [self.x.into(), self.y.into()]
    }
}

impl<T: Into<f64>> Coord3D<T> {
    fn into_array(self) -> [f64; 3] {
        [self.x.into(), self.y.into(), self.z.into()]
    }
}

fn finite_points<const D: usize, const N: usize>(
    points: [[f64; D]; N],
) -> Result<[[f64; D]; N], PredicateError> {
    for (index, p) in points.iter().enumerate() {
        check_finite(index, p)?;
    }
    Ok(points)
}

/// Returns a positive value if `p0`, `p1` and `p2` occur in counterclockwise order
/// (`p2` lies to the **left** of the directed line from `p0` to `p1`), a negative value if they
/// occur in clockwise order, and `0` if they are **collinear**.
///
/// ```
/// use exact_predicates::{orientation2d, Coord};
///
/// let o = Coord { x: 0.0, y: 0.0 };
/// let a = Coord { x: 1.0, y: 0.0 };
/// let b = Coord { x: 0.0, y: 1.0 };
/// assert!(orientation2d(o, a, b).unwrap() > 0.0);
/// assert!(orientation2d(o, b, a).unwrap() < 0.0);
/// ```
pub fn orientation2d<T: Into<f64>>(
    p0: Coord<T>,
    p1: Coord<T>,
    p2: Coord<T>,
) -> Result<f64, PredicateError> {
    let [p0, p1, p2] = finite_points([p0.into_array(), p1.into_array(), p2.into_array()])?;
    Ok(adaptive::orient2d(p0, p1, p2))
}

/// Returns `det(p1 - p0, p2 - p0, p3 - p0)` up to a positive factor: positive if the
/// tetrahedron `p0, p1, p2, p3` has positive signed volume (`p3` lies on the side of the plane
/// through `p0, p1, p2` from which those appear in counterclockwise order), negative for the
/// opposite side, and `0` if the four points are **coplanar**.
pub fn orientation3d<T: Into<f64>>(
    p0: Coord3D<T>,
    p1: Coord3D<T>,
    p2: Coord3D<T>,
    p3: Coord3D<T>,
) -> Result<f64, PredicateError> {
    let [p0, p1, p2, p3] = finite_points([
        p0.into_array(),
        p1.into_array(),
        p2.into_array(),
        p3.into_array(),
    ])?;
    Ok(adaptive::volume3(p0, p1, p2, p3))
}

/// For counterclockwise `p0`, `p1`, `p2`: returns a negative value if `p3` lies inside the circle
/// through them, a positive value if it lies outside, and `0` if the four points are **cocircular**.
/// The sign flips when `p0`, `p1`, `p2` are in clockwise order.
///
/// ```
/// use exact_predicates::{incircle, Coord};
///
/// let a = Coord { x: -1.0, y: -1.0 };
/// let b = Coord { x: 1.0, y: -1.0 };
/// let c = Coord { x: 1.0, y: 1.0 };
/// assert!(incircle(a, b, c, Coord { x: 0.0, y: 0.0 }).unwrap() < 0.0);
/// assert_eq!(incircle(a, b, c, Coord { x: -1.0, y: 1.0 }).unwrap(), 0.0);
/// ```
pub fn incircle<T: Into<f64>>(
    p0: Coord<T>,
    p1: Coord<T>,
    p2: Coord<T>,
    p3: Coord<T>,
) -> Result<f64, PredicateError> {
    let [p0, p1, p2, p3] = finite_points([
        p0.into_array(),
        p1.into_array(),
        p2.into_array(),
        p3.into_array(),
    ])?;
    Ok(adaptive::incircle(p0, p1, p2, p3))
}

/// For positively oriented `p0..p3` (see [`orientation3d`]): returns a negative value if `p4` lies
/// inside the sphere through them, a positive value if it lies outside, and `0` if the five points
/// are **cospherical**. The sign flips when `p0..p3` are negatively oriented.
pub fn insphere3d<T: Into<f64>>(
    p0: Coord3D<T>,
    p1: Coord3D<T>,
    p2: Coord3D<T>,
    p3: Coord3D<T>,
    p4: Coord3D<T>,
) -> Result<f64, PredicateError> {
    let [p0, p1, p2, p3, p4] = finite_points([
        p0.into_array(),
        p1.into_array(),
        p2.into_array(),
        p3.into_array(),
        p4.into_array(),
    ])?;
    Ok(adaptive::insphere3(p0, p1, p2, p3, p4))
}

/// Signed volume predicate of `D + 1` points with `D` coordinates each, `D` being the length of
/// the first point: the sign of the determinant with rows `[1, p_i]`.
///
/// For `D = 2` this is [`orientation2d`], for `D = 3` [`orientation3d`].
///
/// # Errors
/// [`PredicateError::InvalidArity`] unless exactly `D + 1` points are given,
/// [`PredicateError::DimensionMismatch`] if the points differ in length,
/// [`PredicateError::NonFiniteInput`] for NaN or infinite coordinates,
/// [`PredicateError::UnsupportedOrder`] for `D >= MAX_DETERMINANT_ORDER`.
///
/// ```
/// use exact_predicates::volume;
///
/// let z = f64::from_bits(0.5f64.to_bits() + 1);
/// assert!(volume(&[[0.5, z], [12.0, 12.0], [24.0, 24.0]]).unwrap() > 0.0);
/// assert_eq!(volume(&[[z, z], [12.0, 12.0], [24.0, 24.0]]).unwrap(), 0.0);
/// ```
pub fn volume<P: AsRef<[f64]>>(points: &[P]) -> Result<f64, PredicateError> {
    let dim = simplex_dimension(points, 1)?;
    check_order(dim + 1)?;
    Ok(match points {
        [p0, p1, p2] if dim == 2 => adaptive::orient2d(array(p0), array(p1), array(p2)),
        [p0, p1, p2, p3] if dim == 3 => {
            adaptive::volume3(array(p0), array(p1), array(p2), array(p3))
        }
        _ => determinant::volume(points, dim),
    })
}

/// In-sphere predicate of `D + 2` points with `D` coordinates each: the sign of the determinant
/// with rows `[1, p_i, |p_i|²]`.
///
/// When the first `D + 1` points have positive [`volume`], the result is negative iff the last
/// point lies strictly inside their circumsphere, zero iff it lies on it. For `D = 2` this is
/// [`incircle`], for `D = 3` [`insphere3d`].
///
/// # Errors
/// As for [`volume`], with `D + 2` points expected.
pub fn insphere<P: AsRef<[f64]>>(points: &[P]) -> Result<f64, PredicateError> {
    let dim = simplex_dimension(points, 2)?;
    check_order(dim + 2)?;
    Ok(match points {
        [p0, p1, p2, p3] if dim == 2 => {
            adaptive::incircle(array(p0), array(p1), array(p2), array(p3))
        }
        [p0, p1, p2, p3, p4] if dim == 3 => {
            adaptive::insphere3(array(p0), array(p1), array(p2), array(p3), array(p4))
        }
        _ => determinant::insphere(points, dim),
    })
}

/// Sign-exact determinant of a square matrix given as rows.
///
/// The determinant is always evaluated exactly, with expansion arithmetic (or rationals for
/// extreme magnitudes); its sign is exact and it is `0.0` iff the matrix is singular. Use it as a ground truth: for points `p_i`, the rows `[1, p_i]` give the same
/// sign as [`volume`] and the rows `[1, p_i, |p_i|²]` the same sign as [`insphere`].
///
/// # Errors
/// [`PredicateError::DimensionMismatch`] if a row's length differs from the number of rows,
/// [`PredicateError::NonFiniteInput`] for NaN or infinite entries,
/// [`PredicateError::UnsupportedOrder`] beyond [`MAX_DETERMINANT_ORDER`] rows.
///
/// ```
/// use exact_predicates::sign_exact_determinant;
///
/// let z = f64::from_bits(0.5f64.to_bits() + 1);
/// let m = [[1.0, 1.0, 1.0], [0.5, 12.0, 24.0], [z, 12.0, 24.0]];
/// assert!(sign_exact_determinant(&m).unwrap() > 0.0);
/// ```
pub fn sign_exact_determinant<R: AsRef<[f64]>>(matrix: &[R]) -> Result<f64, PredicateError> {
    square_order(matrix)?;
    Ok(determinant::sign_exact(matrix))
}

/// Copies a validated point of known dimension into an array.
fn array<const D: usize>(p: &impl AsRef<[f64]>) -> [f64; D] {
    let coords = p.as_ref();
    core::array::from_fn(|i| coords[i])
}

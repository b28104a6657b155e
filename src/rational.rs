// Copyright 2017 The Spade Developers.
// Copyright 2020 The GeoRust Project Developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Rational fallback for coordinates outside the range of expansion arithmetic.
//!
//! Every finite `f64` is a rational number, so evaluating the homogenised determinant in
//! [`BigRational`] is exact regardless of magnitude. It is much slower than expansions and
//! only runs when [`ExponentRange`](crate::range::ExponentRange) rejects the input.

use num_rational::BigRational;
use num_traits::{One, Signed, ToPrimitive, Zero};
use tracing::trace;

use crate::determinant::exact_determinant;

fn rational(x: f64) -> BigRational {
    BigRational::from_float(x).unwrap_or_else(BigRational::zero)
}

/// An `f64` with the sign of `value`: its nearest double when that is finite and nonzero,
/// otherwise the smallest or largest double of that sign.
fn signed_f64(value: &BigRational) -> f64 {
    if value.is_zero() {
        return 0.0;
    }
    let magnitude = match value.abs().to_f64() {
        Some(x) if x.is_infinite() => f64::MAX,
        Some(x) if x > 0.0 => x,
        _ => f64::from_bits(1),
    };
    if value.is_negative() {
        -magnitude
    } else {
        magnitude
    }
}

/// Sign-carrying determinant of a square matrix given as rows.
pub(crate) fn determinant<R: AsRef<[f64]>>(rows: &[R]) -> f64 {
    trace!(order = rows.len(), "determinant: evaluating with rationals");
    let entries: Vec<BigRational> = rows
        .iter()
        .flat_map(|row| row.as_ref().iter().map(|&x| rational(x)))
        .collect();
    signed_f64(&exact_determinant(&entries, rows.len()))
}

/// Sign-carrying determinant with rows `[1, p]`.
pub(crate) fn volume<P: AsRef<[f64]>>(points: &[P]) -> f64 {
    trace!(points = points.len(), "volume: evaluating with rationals");
    let entries: Vec<BigRational> = points
        .iter()
        .flat_map(|p| {
            core::iter::once(BigRational::one()).chain(p.as_ref().iter().map(|&x| rational(x)))
        })
        .collect();
    signed_f64(&exact_determinant(&entries, points.len()))
}

/// Sign-carrying determinant with rows `[1, p, |p|²]`.
pub(crate) fn insphere<P: AsRef<[f64]>>(points: &[P]) -> f64 {
    trace!(points = points.len(), "insphere: evaluating with rationals");
    let entries: Vec<BigRational> = points
        .iter()
        .flat_map(|p| {
            let coords: Vec<BigRational> = p.as_ref().iter().map(|&x| rational(x)).collect();
            let lift = coords
                .iter()
                .fold(BigRational::zero(), |acc, x| acc + x * x);
            core::iter::once(BigRational::one())
                .chain(coords)
                .chain(core::iter::once(lift))
        })
        .collect();
    signed_f64(&exact_determinant(&entries, points.len()))
}

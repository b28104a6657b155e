// Copyright 2017 The Spade Developers.
// Copyright 2020 The GeoRust Project Developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Error-free transformations.
//!
//! Every function returns `(x, y)` where `x` is the rounded result of one floating-point
//! operation and `y` the exact rounding error, so that `x + y` equals the real result.
//! The pairs are the building blocks of [`Expansion`](crate::Expansion).

use crate::constants::SPLITTER;

/// `a + b` with its rounding error.
#[inline]
pub(crate) fn two_sum(a: f64, b: f64) -> (f64, f64) {
    let x = a + b;
    let b_virtual = x - a;
    let a_virtual = x - b_virtual;
    let b_roundoff = b - b_virtual;
    let a_roundoff = a - a_virtual;
    (x, a_roundoff + b_roundoff)
}

/// `a + b` with its rounding error. Requires `|a| >= |b|` (or `a == 0`).
#[inline]
pub(crate) fn fast_two_sum(a: f64, b: f64) -> (f64, f64) {
    let x = a + b;
    let b_virtual = x - a;
    (x, b - b_virtual)
}

/// `a - b` with its rounding error.
#[inline]
pub(crate) fn two_diff(a: f64, b: f64) -> (f64, f64) {
    let x = a - b;
    let b_virtual = a - x;
    let a_virtual = x + b_virtual;
    let b_roundoff = b_virtual - b;
    let a_roundoff = a - a_virtual;
    (x, a_roundoff + b_roundoff)
}

/// Splits `a` into a high half and a low half, each with at most 26 significant bits.
#[inline]
pub(crate) fn split(a: f64) -> (f64, f64) {
    let c = SPLITTER * a;
    let a_big = c - a;
    let hi = c - a_big;
    (hi, a - hi)
}

/// `a * b` with its rounding error, reusing an existing split of `b`.
#[inline]
pub(crate) fn two_product_presplit(a: f64, b: f64, b_hi: f64, b_lo: f64) -> (f64, f64) {
    let x = a * b;
    let (a_hi, a_lo) = split(a);
    let err1 = x - a_hi * b_hi;
    let err2 = err1 - a_lo * b_hi;
    let err3 = err2 - a_hi * b_lo;
    (x, a_lo * b_lo - err3)
}

/// `a * b` with its rounding error.
#[inline]
pub(crate) fn two_product(a: f64, b: f64) -> (f64, f64) {
    let (b_hi, b_lo) = split(b);
    two_product_presplit(a, b, b_hi, b_lo)
}

/// `a * a` with its rounding error; one split cheaper than `two_product(a, a)`.
#[inline]
pub(crate) fn square(a: f64) -> (f64, f64) {
    let x = a * a;
    let (hi, lo) = split(a);
    let err1 = x - hi * hi;
    let err3 = err1 - (hi + hi) * lo;
    (x, lo * lo - err3)
}

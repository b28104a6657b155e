// Copyright 2017 The Spade Developers.
// Copyright 2020 The GeoRust Project Developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Machine constants and static error-bound coefficients.
//!
//! Shewchuk's `exactinit` derives these at runtime. They are identical in every IEEE-754
//! binary64 environment with round-to-nearest-even, so they are plain constants here.

/// Unit roundoff: the largest relative error of a single rounded `f64` operation (2⁻⁵³).
pub(crate) const EPSILON: f64 = f64::EPSILON / 2.0;

/// 2²⁷ + 1, used to split a double into two non-overlapping 26-bit halves.
pub(crate) const SPLITTER: f64 = 134_217_729f64;

// Coefficients of the fast-path bounds. Each is multiplied by the permanent of the
// expression (the same expression evaluated on absolute values).
pub(crate) const ORIENT2D_BOUND: f64 = (3.0 + 16.0 * EPSILON) * EPSILON;
pub(crate) const VOLUME3_BOUND: f64 = (7.0 + 56.0 * EPSILON) * EPSILON;
pub(crate) const INCIRCLE_BOUND: f64 = (10.0 + 96.0 * EPSILON) * EPSILON;
pub(crate) const INSPHERE3_BOUND: f64 = (16.0 + 224.0 * EPSILON) * EPSILON;

/// Bound coefficient for a determinant evaluated by cofactor expansion whose rounding
/// error accumulates through `operations` chained roundings, i.e. `|error| <= γ(operations) * permanent`.
///
/// The factor two absorbs both the `1 / (1 - operations * EPSILON)` term of γ and
/// the rounding incurred while computing the permanent itself.
#[inline]
pub(crate) fn cofactor_bound(operations: usize) -> f64 {
    2.0 * operations as f64 * EPSILON
}

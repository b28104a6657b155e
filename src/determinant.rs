// Copyright 2017 The Spade Developers.
// Copyright 2020 The GeoRust Project Developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Determinants of arbitrary order.
//!
//! The determinant is expanded along its rows from the bottom up: the minor formed by the
//! last `k` rows and a subset of `k` columns is computed once per column subset and reused
//! by every larger minor that contains it. This costs `O(2ⁿ · n)` multiplications instead
//! of the `O(n!)` of a naive cofactor expansion, and, unlike elimination, never divides.
//!
//! The same recurrence runs on `f64` (with a running permanent for the error bound), on
//! [`Expansion`]s and on rationals (both exact).

use core::ops::{Mul, Sub};

use num_traits::{One, Zero};
use smallvec::SmallVec;
use tracing::trace;

use crate::constants::cofactor_bound;
use crate::expansion::Expansion;
use crate::range::ExponentRange;
use crate::rational;

/// Entries of the fast path, inline up to order 8.
type Entries = SmallVec<[f64; 64]>;

/// Minors of the fast path with their permanents, inline up to order 6.
type Minors = SmallVec<[(f64, f64); 64]>;

/// Position of `column` among the set bits of `mask`, i.e. the sign index of its cofactor.
#[inline]
fn rank_in(mask: usize, column: usize) -> u32 {
    (mask & ((1 << column) - 1)).count_ones()
}

/// Exact determinant of the `order × order` row-major matrix `entries`.
pub(crate) fn exact_determinant<T>(entries: &[T], order: usize) -> T
where
    T: Zero + One + Sub<Output = T>,
    for<'a> &'a T: Mul<&'a T, Output = T>,
{
    debug_assert_eq!(entries.len(), order * order);

    let mut minors: Vec<T> = Vec::with_capacity(1 << order);
    minors.push(T::one());
    for mask in 1usize..(1 << order) {
        let row = order - mask.count_ones() as usize;
        let mut det = T::zero();
        for column in (0..order).filter(|&c| mask & (1 << c) != 0) {
            let entry = &entries[row * order + column];
            let minor = &minors[mask & !(1 << column)];
            if entry.is_zero() || minor.is_zero() {
                continue;
            }
            let term = entry * minor;
            det = if rank_in(mask, column) % 2 == 0 {
                det + term
            } else {
                det - term
            };
        }
        minors.push(det);
    }
    minors.pop().unwrap_or_else(T::one)
}

/// Floating-point determinant of the `order × order` row-major matrix `entries`, together
/// with the permanent of its absolute values (the same recurrence without signs).
pub(crate) fn approximate_determinant(entries: &[f64], order: usize) -> (f64, f64) {
    debug_assert_eq!(entries.len(), order * order);

    let mut minors = Minors::with_capacity(1 << order);
    minors.push((1.0, 1.0));
    for mask in 1usize..(1 << order) {
        let row = order - mask.count_ones() as usize;
        let (mut det, mut permanent) = (0.0, 0.0);
        for column in (0..order).filter(|&c| mask & (1 << c) != 0) {
            let entry = entries[row * order + column];
            let (minor_det, minor_permanent) = minors[mask & !(1 << column)];
            if rank_in(mask, column) % 2 == 0 {
                det += entry * minor_det;
            } else {
                det -= entry * minor_det;
            }
            permanent += entry.abs() * minor_permanent;
        }
        minors.push((det, permanent));
    }
    minors.pop().unwrap_or((1.0, 1.0))
}

/// Number of chained roundings in [`approximate_determinant`] for a matrix of this order:
/// a `k × k` minor adds `k` to the count of the `(k - 1) × (k - 1)` minors it uses, and
/// `1 × 1` minors are exact.
fn cofactor_operations(order: usize) -> usize {
    (2..=order).sum()
}

fn coordinates<P: AsRef<[f64]>>(points: &[P]) -> impl Iterator<Item = f64> + '_ {
    points.iter().flat_map(|p| p.as_ref().iter().copied())
}

/// Row-major entries of the rows `[1, p]`, followed by `|p|²` when `lifted`.
fn homogenised_entries<P: AsRef<[f64]>>(points: &[P], lifted: bool) -> Entries {
    let mut entries = Entries::new();
    for p in points {
        let coords = p.as_ref();
        entries.push(1.0);
        entries.extend_from_slice(coords);
        if lifted {
            entries.push(coords.iter().map(|x| x * x).sum());
        }
    }
    entries
}

/// Sign-exact determinant of a validated square matrix.
pub(crate) fn sign_exact<R: AsRef<[f64]>>(matrix: &[R]) -> f64 {
    let order = matrix.len();
    if !ExponentRange::of(coordinates(matrix)).supports_degree(order) {
        return rational::determinant(matrix);
    }
    let entries: Vec<Expansion> = coordinates(matrix).map(Expansion::from_f64).collect();
    exact_determinant(&entries, order).most_significant()
}

/// Adaptive sign of the homogenised orientation determinant of `dim + 1` points.
pub(crate) fn volume(points: &[impl AsRef<[f64]>], dim: usize) -> f64 {
    if !ExponentRange::of(coordinates(points)).supports_degree(dim) {
        return rational::volume(points);
    }

    let order = dim + 1;
    let entries = homogenised_entries(points, false);
    let (det, permanent) = approximate_determinant(&entries, order);
    let errbound = cofactor_bound(cofactor_operations(order)) * permanent;
    if det > errbound || -det > errbound {
        return det;
    }

    trace!(det, errbound, dim, "volume: fast filter inconclusive");
    let exact: Vec<Expansion> = entries.into_iter().map(Expansion::from_f64).collect();
    exact_determinant(&exact, order).most_significant()
}

/// Adaptive sign of the orientation of `dim + 2` points lifted onto the paraboloid
/// `x_{dim+1} = |x|²`.
pub(crate) fn insphere(points: &[impl AsRef<[f64]>], dim: usize) -> f64 {
    // every term holds one lifted entry, of degree two
    if !ExponentRange::of(coordinates(points)).supports_degree(dim + 2) {
        return rational::insphere(points);
    }

    let order = dim + 2;
    let entries = homogenised_entries(points, true);

    // the lifted entries carry a relative error of at most γ(dim)
    let (det, permanent) = approximate_determinant(&entries, order);
    let errbound = cofactor_bound(cofactor_operations(order) + dim) * permanent;
    if det > errbound || -det > errbound {
        return det;
    }

    trace!(det, errbound, dim, "insphere: fast filter inconclusive");
    exact_determinant(&exact_lifted_entries(points), order).most_significant()
}

/// Exact entries of the lifted matrix with rows `[1, p, |p|²]`.
pub(crate) fn exact_lifted_entries(points: &[impl AsRef<[f64]>]) -> Vec<Expansion> {
    points
        .iter()
        .flat_map(|p| {
            let coords = p.as_ref();
            let lift = coords
                .iter()
                .fold(Expansion::zero(), |acc, &x| acc + Expansion::square(x));
            core::iter::once(Expansion::one())
                .chain(coords.iter().map(|&x| Expansion::from_f64(x)))
                .chain(core::iter::once(lift))
        })
        .collect()
}

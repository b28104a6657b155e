// Copyright 2017 The Spade Developers.
// Copyright 2020 The GeoRust Project Developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Adaptive kernels for the fixed-size predicates.
//!
//! Each kernel evaluates its determinant relative to the first point, compares the
//! result against a static bound on the rounding error, and only when the comparison
//! is inconclusive re-evaluates the whole expression with [`Expansion`]s. Coordinates too
//! small or too large for either of those go straight to rational arithmetic.
//! All kernels use the sign convention of the homogenised determinant with rows
//! `[1, p]` (orientation) or `[1, p, |p|²]` (in-circle / in-sphere).

use num_traits::Zero;
use tracing::trace;

use crate::constants::{INCIRCLE_BOUND, INSPHERE3_BOUND, ORIENT2D_BOUND, VOLUME3_BOUND};
use crate::expansion::Expansion;
use crate::range::ExponentRange;
use crate::rational;

/// `det(p1 - p0, p2 - p0)`: positive iff the points are in counterclockwise order.
pub(crate) fn orient2d(p0: [f64; 2], p1: [f64; 2], p2: [f64; 2]) -> f64 {
    if !ExponentRange::of(p0.into_iter().chain(p1).chain(p2)).supports_degree(2) {
        return rational::volume(&[p0, p1, p2]);
    }

    let left = (p1[0] - p0[0]) * (p2[1] - p0[1]);
    let right = (p1[1] - p0[1]) * (p2[0] - p0[0]);
    let det = left - right;

    let errbound = ORIENT2D_BOUND * (left.abs() + right.abs());
    if det > errbound || -det > errbound {
        return det;
    }

    trace!(det, errbound, "orient2d: fast filter inconclusive");
    orient2d_exact(p0, p1, p2)
}

fn orient2d_exact(p0: [f64; 2], p1: [f64; 2], p2: [f64; 2]) -> f64 {
    let [ax, ay] = relative(p1, p0);
    let [bx, by] = relative(p2, p0);
    minor2(&ax, &ay, &bx, &by).most_significant()
}

/// `det(p1 - p0, p2 - p0, p3 - p0)`: the signed volume of the tetrahedron, times six.
pub(crate) fn volume3(p0: [f64; 3], p1: [f64; 3], p2: [f64; 3], p3: [f64; 3]) -> f64 {
    if !ExponentRange::of([p0, p1, p2, p3].into_iter().flatten()).supports_degree(3) {
        return rational::volume(&[p0, p1, p2, p3]);
    }

    let [ax, ay, az] = [p1[0] - p0[0], p1[1] - p0[1], p1[2] - p0[2]];
    let [bx, by, bz] = [p2[0] - p0[0], p2[1] - p0[1], p2[2] - p0[2]];
    let [cx, cy, cz] = [p3[0] - p0[0], p3[1] - p0[1], p3[2] - p0[2]];

    let bxcy = bx * cy;
    let cxby = cx * by;
    let cxay = cx * ay;
    let axcy = ax * cy;
    let axby = ax * by;
    let bxay = bx * ay;

    let det = az * (bxcy - cxby) + bz * (cxay - axcy) + cz * (axby - bxay);
    let permanent = (bxcy.abs() + cxby.abs()) * az.abs()
        + (cxay.abs() + axcy.abs()) * bz.abs()
        + (axby.abs() + bxay.abs()) * cz.abs();

    let errbound = VOLUME3_BOUND * permanent;
    if det > errbound || -det > errbound {
        return det;
    }

    trace!(det, errbound, "volume3: fast filter inconclusive");
    volume3_exact(p0, p1, p2, p3)
}

fn volume3_exact(p0: [f64; 3], p1: [f64; 3], p2: [f64; 3], p3: [f64; 3]) -> f64 {
    let a = relative(p1, p0);
    let b = relative(p2, p0);
    let c = relative(p3, p0);
    minor3(&a, &b, &c).most_significant()
}

/// Lifted orientation of four points in the plane.
///
/// For counterclockwise `p0, p1, p2` the result is negative iff `p3` lies strictly inside
/// their circumcircle, zero iff the four points are cocircular.
pub(crate) fn incircle(p0: [f64; 2], p1: [f64; 2], p2: [f64; 2], p3: [f64; 2]) -> f64 {
    if !ExponentRange::of([p0, p1, p2, p3].into_iter().flatten()).supports_degree(4) {
        return rational::insphere(&[p0, p1, p2, p3]);
    }

    let [ax, ay] = [p1[0] - p0[0], p1[1] - p0[1]];
    let [bx, by] = [p2[0] - p0[0], p2[1] - p0[1]];
    let [cx, cy] = [p3[0] - p0[0], p3[1] - p0[1]];

    let bxcy = bx * cy;
    let cxby = cx * by;
    let axcy = ax * cy;
    let cxay = cx * ay;
    let axby = ax * by;
    let bxay = bx * ay;

    let alift = ax * ax + ay * ay;
    let blift = bx * bx + by * by;
    let clift = cx * cx + cy * cy;

    let det = alift * (bxcy - cxby) - blift * (axcy - cxay) + clift * (axby - bxay);
    let permanent = (bxcy.abs() + cxby.abs()) * alift
        + (axcy.abs() + cxay.abs()) * blift
        + (axby.abs() + bxay.abs()) * clift;

    let errbound = INCIRCLE_BOUND * permanent;
    if det > errbound || -det > errbound {
        return det;
    }

    trace!(det, errbound, "incircle: fast filter inconclusive");
    incircle_exact(p0, p1, p2, p3)
}

fn incircle_exact(p0: [f64; 2], p1: [f64; 2], p2: [f64; 2], p3: [f64; 2]) -> f64 {
    let [ax, ay] = relative(p1, p0);
    let [bx, by] = relative(p2, p0);
    let [cx, cy] = relative(p3, p0);

    let alift = &(&ax * &ax) + &(&ay * &ay);
    let blift = &(&bx * &bx) + &(&by * &by);
    let clift = &(&cx * &cx) + &(&cy * &cy);

    let det = alift * minor2(&bx, &by, &cx, &cy) - blift * minor2(&ax, &ay, &cx, &cy)
        + clift * minor2(&ax, &ay, &bx, &by);
    det.most_significant()
}

/// Lifted orientation of five points in space.
///
/// For positively oriented `p0..p3` (see [`volume3`]) the result is negative iff `p4` lies
/// strictly inside their circumsphere, zero iff the five points are cospherical.
pub(crate) fn insphere3(
    p0: [f64; 3],
    p1: [f64; 3],
    p2: [f64; 3],
    p3: [f64; 3],
    p4: [f64; 3],
) -> f64 {
    if !ExponentRange::of([p0, p1, p2, p3, p4].into_iter().flatten()).supports_degree(5) {
        return rational::insphere(&[p0, p1, p2, p3, p4]);
    }

    let rows = [p1, p2, p3, p4].map(|p| [p[0] - p0[0], p[1] - p0[1], p[2] - p0[2]]);
    let [a, b, c, d] = rows;

    // 2x2 minors of the x/y columns, one per pair of rows
    let ab = a[0] * b[1] - b[0] * a[1];
    let ac = a[0] * c[1] - c[0] * a[1];
    let ad = a[0] * d[1] - d[0] * a[1];
    let bc = b[0] * c[1] - c[0] * b[1];
    let bd = b[0] * d[1] - d[0] * b[1];
    let cd = c[0] * d[1] - d[0] * c[1];

    // 3x3 minors, expanded along the z column
    let abc = a[2] * bc - b[2] * ac + c[2] * ab;
    let abd = a[2] * bd - b[2] * ad + d[2] * ab;
    let acd = a[2] * cd - c[2] * ad + d[2] * ac;
    let bcd = b[2] * cd - c[2] * bd + d[2] * bc;

    let [alift, blift, clift, dlift] = rows.map(|r| r[0] * r[0] + r[1] * r[1] + r[2] * r[2]);

    let det = (blift * acd - alift * bcd) + (dlift * abc - clift * abd);

    let pair = |u: &[f64; 3], v: &[f64; 3]| (u[0] * v[1]).abs() + (v[0] * u[1]).abs();
    let (ab_p, ac_p, ad_p) = (pair(&a, &b), pair(&a, &c), pair(&a, &d));
    let (bc_p, bd_p, cd_p) = (pair(&b, &c), pair(&b, &d), pair(&c, &d));
    let [az, bz, cz, dz] = rows.map(|r| r[2].abs());
    let permanent = (cd_p * bz + bd_p * cz + bc_p * dz) * alift
        + (cd_p * az + ad_p * cz + ac_p * dz) * blift
        + (bd_p * az + ad_p * bz + ab_p * dz) * clift
        + (bc_p * az + ac_p * bz + ab_p * cz) * dlift;

    let errbound = INSPHERE3_BOUND * permanent;
    if det > errbound || -det > errbound {
        return det;
    }

    trace!(det, errbound, "insphere3: fast filter inconclusive");
    insphere3_exact(p0, &[p1, p2, p3, p4])
}

fn insphere3_exact(p0: [f64; 3], points: &[[f64; 3]; 4]) -> f64 {
    let [a, b, c, d] = points.map(|p| relative(p, p0));
    let [alift, blift, clift, dlift] = [&a, &b, &c, &d].map(lift);

    let det = (blift * minor3(&a, &c, &d) - alift * minor3(&b, &c, &d))
        + (dlift * minor3(&a, &b, &c) - clift * minor3(&a, &b, &d));
    det.most_significant()
}

/// Exact coordinates of `p - origin`.
fn relative<const D: usize>(p: [f64; D], origin: [f64; D]) -> [Expansion; D] {
    core::array::from_fn(|i| Expansion::difference(p[i], origin[i]))
}

/// Exact squared norm.
fn lift(v: &[Expansion; 3]) -> Expansion {
    v.iter().fold(Expansion::zero(), |acc, c| acc + c * c)
}

/// `| ux uy |`
/// `| vx vy |`
fn minor2(ux: &Expansion, uy: &Expansion, vx: &Expansion, vy: &Expansion) -> Expansion {
    ux * vy - uy * vx
}

/// Determinant of the 3x3 matrix with rows `u`, `v`, `w`, expanded along the z column.
fn minor3(u: &[Expansion; 3], v: &[Expansion; 3], w: &[Expansion; 3]) -> Expansion {
    let vw = minor2(&v[0], &v[1], &w[0], &w[1]);
    let uw = minor2(&u[0], &u[1], &w[0], &w[1]);
    let uv = minor2(&u[0], &u[1], &v[0], &v[1]);
    &u[2] * &vw - &v[2] * &uw + &w[2] * &uv
}

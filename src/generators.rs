//! Utilities for generating examples, benchmarks, and test cases.

use crate::{Paths, Point};

/// A `count x count` grid of squares with side `size`, whose corners are
/// `offset` apart. The first one has its corner at `(x0, y0)`.
///
/// A non-zero `slant` shears them into parallelograms, moving the right-hand
/// side down by `slant`.
fn squares((x0, y0): (i64, i64), size: i64, offset: i64, slant: i64, count: usize) -> Paths {
    let mut ret = Vec::new();
    for i in 0..count as i64 {
        let x = x0 + i * offset;
        for j in 0..count as i64 {
            let y = y0 + j * offset;
            ret.push(vec![
                Point::new(x, y),
                Point::new(x, y + size),
                Point::new(x + size, y + size + slant),
                Point::new(x + size, y + slant),
            ]);
        }
    }

    ret
}

/// Generate an `n` by `n` checkerboard-like pattern with overlapping squares.
/// For `n = 3`, it looks like:
///
/// ```text
/// +----+ +----+ +----+
/// |    | |    | |    |
/// |  +-+-+-++-+-+-+  |
/// +--+-+ +-++-+ +-+--+
/// +--+-+ +-++-+ +-+--+
/// |  +-+-+-++-+-+-+  |
/// |  +-+-+-++-+-+-+  |
/// +--+-+ +-++-+ +-+--+
/// +--+-+ +-++-+ +-+--+
/// |  +-+-+-++-+-+-+  |
/// |    | |    | |    |
/// +----+ +----+ +----+
/// ```
///
/// We return the pattern in two parts: the outer collection of `n x n`
/// non-overlapping squares, and the inner collection of `(n - 1) x (n - 1)`
/// non-overlapping squares.
pub fn checkerboard(n: usize) -> (Paths, Paths) {
    (
        squares((0, 0), 30, 40, 0, n),
        squares((20, 20), 30, 40, 0, n - 1),
    )
}

/// Like [`checkerboard`], but without horizontal edges.
///
/// The sweep treats horizontal edges separately, so this exercises a
/// different path through it.
pub fn slanted_checkerboard(n: usize) -> (Paths, Paths) {
    (
        squares((0, 0), 30, 40, 1, n),
        squares((20, 20), 30, 40, 1, n - 1),
    )
}

/// The "evens" are a bunch of long, skinny parallelograms going from top-left
/// to bottom-right. The "odds" go from top-right to bottom-left.
pub fn slanties(n: usize) -> (Paths, Paths) {
    let n = n as i64;
    let h = 20 * n;

    let mut even = Vec::new();
    let mut odd = Vec::new();
    for i in 0..n {
        let x_off = 20 * i;
        even.push(vec![
            Point::new(x_off, 0),
            Point::new(x_off + h, h),
            Point::new(x_off + h + 10, h),
            Point::new(x_off + 10, 0),
        ]);

        odd.push(vec![
            Point::new(x_off + h, 0),
            Point::new(x_off, h),
            Point::new(x_off + 10, h),
            Point::new(x_off + h + 10, 0),
        ]);
    }

    (even, odd)
}

/// A zig-zag line with `n` teeth, for offsetting as an open path.
///
/// Every corner is sharp, so joins do a lot of the work.
pub fn zigzag(n: usize) -> Paths {
    let path = (0..=2 * n as i64)
        .map(|i| Point::new(10 * i, if i % 2 == 0 { 0 } else { 40 }))
        .collect();
    vec![path]
}

/// A star with `n` points, alternating between radius `r` and `r / 3`.
///
/// Half of its corners are concave, whichever way it's offset.
pub fn star(n: usize, r: i64) -> Paths {
    let path = (0..2 * n)
        .map(|i| {
            let angle = std::f64::consts::PI * i as f64 / n as f64;
            let radius = (if i % 2 == 0 { r } else { r / 3 }) as f64;
            let (s, c) = angle.sin_cos();
            Point::new((radius * c).round() as i64, (radius * s).round() as i64)
        })
        .collect();
    vec![path]
}

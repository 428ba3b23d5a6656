//! Utilities for fuzz and/or property testing using `arbitrary`.

use arbitrary::Unstructured;

use crate::{BinaryOp, EndStyle, FillRule, JoinStyle, Path, Paths, Point};

/// Generate an arbitrary coordinate in `-size..=size`.
pub fn coord(size: i64, u: &mut Unstructured<'_>) -> Result<i64, arbitrary::Error> {
    u.int_in_range(-size..=size)
}

/// Generate a coordinate in some range, but give it a chance to be close to
/// (or equal to) another one.
fn another_coord(orig: i64, size: i64, u: &mut Unstructured<'_>) -> Result<i64, arbitrary::Error> {
    let close: bool = u.arbitrary()?;
    if close {
        let delta: i64 = u.int_in_range(-2..=2)?;
        Ok((orig + delta).clamp(-size, size))
    } else {
        coord(size, u)
    }
}

fn point(size: i64, u: &mut Unstructured<'_>) -> Result<Point, arbitrary::Error> {
    Ok(Point::new(coord(size, u)?, coord(size, u)?))
}

/// Generate a point with a chance of lining up with `orig`, either
/// horizontally, vertically, or both.
fn another_point(orig: Point, size: i64, u: &mut Unstructured<'_>) -> Result<Point, arbitrary::Error> {
    Ok(Point::new(
        another_coord(orig.x, size, u)?,
        another_coord(orig.y, size, u)?,
    ))
}

/// Generate an arbitrary closed path with coordinates in `-size..=size`.
///
/// The paths are biased towards the awkward cases: repeated points,
/// horizontal edges, and vertices that touch earlier vertices.
pub fn polygon(size: i64, u: &mut Unstructured<'_>) -> Result<Path, arbitrary::Error> {
    let len = u.int_in_range(3usize..=10)?;
    let mut ret = Vec::with_capacity(len);
    ret.push(point(size, u)?);
    for _ in 1..len {
        let i = u.choose_index(ret.len())?;
        ret.push(another_point(ret[i], size, u)?);
    }
    Ok(ret)
}

/// Generate a handful of closed paths.
pub fn polygons(size: i64, u: &mut Unstructured<'_>) -> Result<Paths, arbitrary::Error> {
    let count = u.int_in_range(0usize..=4)?;
    (0..count).map(|_| polygon(size, u)).collect()
}

/// Generate an arbitrary fill rule.
pub fn fill_rule(u: &mut Unstructured<'_>) -> Result<FillRule, arbitrary::Error> {
    Ok(*u.choose(&[
        FillRule::EvenOdd,
        FillRule::NonZero,
        FillRule::Positive,
        FillRule::Negative,
    ])?)
}

/// Generate an arbitrary binary operation.
pub fn binary_op(u: &mut Unstructured<'_>) -> Result<BinaryOp, arbitrary::Error> {
    Ok(*u.choose(&[
        BinaryOp::Union,
        BinaryOp::Intersection,
        BinaryOp::Difference,
        BinaryOp::Xor,
    ])?)
}

/// Generate an arbitrary join style.
pub fn join_style(u: &mut Unstructured<'_>) -> Result<JoinStyle, arbitrary::Error> {
    Ok(*u.choose(&[
        JoinStyle::Square,
        JoinStyle::Round,
        JoinStyle::Miter,
        JoinStyle::Bevel,
    ])?)
}

/// Generate an arbitrary end style.
pub fn end_style(u: &mut Unstructured<'_>) -> Result<EndStyle, arbitrary::Error> {
    Ok(*u.choose(&[
        EndStyle::Polygon,
        EndStyle::Joined,
        EndStyle::Butt,
        EndStyle::Square,
        EndStyle::Round,
    ])?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{area, clip, offset, OffsetOptions};

    // Every contour should be a proper polygon, nested consistently.
    fn check(contours: &crate::Contours) {
        for c in contours.contours() {
            assert!(c.points.len() >= 3);
            assert_eq!(area(&c.points) > 0.0, c.outer);
        }
    }

    #[test]
    fn clip_arbitrary_polygons() {
        arbtest::arbtest(|u| {
            let subject = polygons(20, u)?;
            let clip_paths = polygons(20, u)?;
            let op = binary_op(u)?;
            let fill_rule = fill_rule(u)?;
            let out = clip(&subject, &clip_paths, op, fill_rule).unwrap();
            check(&out);
            Ok(())
        });
    }

    #[test]
    fn union_with_self_is_idempotent() {
        arbtest::arbtest(|u| {
            let subject = polygons(20, u)?;
            let fill_rule = fill_rule(u)?;
            let once = clip(&subject, &[], BinaryOp::Union, fill_rule).unwrap();
            let twice = clip(&once.paths(), &[], BinaryOp::Union, FillRule::NonZero).unwrap();
            // Crossings get rounded, so touching contours can overlap a
            // little. The difference is bounded by the total perimeter.
            let perimeter: f64 = once
                .contours()
                .map(|c| {
                    let pts = &c.points;
                    (0..pts.len())
                        .map(|i| pts[i].to_kurbo().distance(pts[(i + 1) % pts.len()].to_kurbo()))
                        .sum::<f64>()
                })
                .sum();
            assert!((once.area() - twice.area()).abs() <= perimeter);
            Ok(())
        });
    }

    #[test]
    fn offset_arbitrary_polygons() {
        arbtest::arbtest(|u| {
            let paths = polygons(50, u)?;
            let join = join_style(u)?;
            let end = end_style(u)?;
            let delta = u.int_in_range(-40i32..=40)? as f64 / 4.0;
            offset(&paths, delta, join, end, &OffsetOptions::default()).unwrap();
            Ok(())
        });
    }
}

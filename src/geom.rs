//! Geometric primitives, like points, paths and the predicates on them.

use crate::num::{coord_in_range, round_coord, Wide};
use crate::Error;

/// A two-dimensional point with integer coordinates.
///
/// Points are sorted in sweep order: the sweep line starts at the largest `y`
/// and moves towards smaller `y`, and ties are broken by increasing `x`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default, serde::Serialize, serde::Deserialize)]
pub struct Point {
    /// Horizontal coordinate.
    pub x: i64,
    /// Vertical coordinate.
    ///
    /// Although it isn't important for functionality, the documentation and
    /// method naming assume that larger values are down, so the sweep goes
    /// from the bottom to the top.
    pub y: i64,
}

impl Ord for Point {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        other.y.cmp(&self.y).then(self.x.cmp(&other.x))
    }
}

impl PartialOrd for Point {
    #[inline(always)]
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl std::fmt::Debug for Point {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

impl Point {
    /// Create a new point.
    pub fn new(x: i64, y: i64) -> Self {
        Point { x, y }
    }

    /// Converts to a floating-point `kurbo` point.
    pub fn to_kurbo(self) -> kurbo::Point {
        kurbo::Point::new(self.x as f64, self.y as f64)
    }

    /// Rounds a floating-point point to the nearest integer point.
    ///
    /// Fails if either coordinate is non-finite or too large to be handled
    /// exactly.
    pub fn from_f64(x: f64, y: f64) -> Result<Self, Error> {
        if !x.is_finite() || !y.is_finite() {
            return Err(Error::PrecisionExceeded { x, y });
        }
        match (round_coord(x), round_coord(y)) {
            (Some(x), Some(y)) => Ok(Point { x, y }),
            _ => Err(Error::PrecisionExceeded { x, y }),
        }
    }

    pub(crate) fn in_range(&self) -> bool {
        coord_in_range(self.x) && coord_in_range(self.y)
    }

    pub(crate) fn check_range(&self) -> Result<(), Error> {
        if self.in_range() {
            Ok(())
        } else {
            Err(Error::PrecisionExceeded {
                x: self.x as f64,
                y: self.y as f64,
            })
        }
    }
}

impl From<(i64, i64)> for Point {
    fn from((x, y): (i64, i64)) -> Self {
        Self { x, y }
    }
}

impl TryFrom<kurbo::Point> for Point {
    type Error = Error;

    fn try_from(p: kurbo::Point) -> Result<Self, Error> {
        if !p.x.is_finite() || !p.y.is_finite() {
            return Err(Error::InvalidInput {
                reason: "non-finite coordinate",
            });
        }
        Point::from_f64(p.x, p.y)
    }
}

/// A sequence of points.
///
/// Paths are implicitly closed for clipping and polygon offsetting, and open
/// when offset with an open end style.
pub type Path = Vec<Point>;

/// A collection of paths.
pub type Paths = Vec<Path>;

/// An axis-aligned rectangle.
///
/// `top` is the smallest `y` and `bottom` the largest.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Rect {
    /// Smallest `x`.
    pub left: i64,
    /// Smallest `y`.
    pub top: i64,
    /// Largest `x`.
    pub right: i64,
    /// Largest `y`.
    pub bottom: i64,
}

impl Default for Rect {
    fn default() -> Self {
        Rect::EMPTY
    }
}

impl Rect {
    /// A rectangle containing nothing, that can be grown by [`Rect::union_point`].
    pub const EMPTY: Rect = Rect {
        left: i64::MAX,
        top: i64::MAX,
        right: i64::MIN,
        bottom: i64::MIN,
    };

    /// The bounding box of a path. Empty paths give [`Rect::EMPTY`].
    pub fn from_path(path: &[Point]) -> Rect {
        path.iter().fold(Rect::EMPTY, |r, p| r.union_point(*p))
    }

    /// The smallest rectangle containing `self` and `p`.
    pub fn union_point(self, p: Point) -> Rect {
        Rect {
            left: self.left.min(p.x),
            top: self.top.min(p.y),
            right: self.right.max(p.x),
            bottom: self.bottom.max(p.y),
        }
    }

    /// Does this rectangle have zero (or negative) area?
    pub fn is_empty(&self) -> bool {
        self.bottom <= self.top || self.right <= self.left
    }

    /// Does this rectangle contain all of `other`?
    pub fn contains_rect(&self, other: &Rect) -> bool {
        other.left >= self.left
            && other.right <= self.right
            && other.top >= self.top
            && other.bottom <= self.bottom
    }

    /// The center, rounded towards negative infinity.
    pub fn mid_point(&self) -> Point {
        Point::new(
            self.left + (self.right - self.left) / 2,
            self.top + (self.bottom - self.top) / 2,
        )
    }

    /// The four corners, as a positively oriented path.
    pub fn as_path(&self) -> Path {
        vec![
            Point::new(self.left, self.top),
            Point::new(self.right, self.top),
            Point::new(self.right, self.bottom),
            Point::new(self.left, self.bottom),
        ]
    }
}

/// The two possible orientations of a closed path.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum Orientation {
    /// The signed area is positive: counter-clockwise when `y` points up.
    Positive,
    /// The signed area is negative (or zero).
    Negative,
}

/// Where a point lies relative to a closed path.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum PointInPolygon {
    /// Not inside.
    Outside,
    /// Strictly inside.
    Inside,
    /// On an edge or a vertex.
    OnBoundary,
}

/// `(b - a) × (c - b)`, exactly.
///
/// Positive when `a -> b -> c` turns in the positive direction, zero when the
/// three points are collinear.
pub fn cross_product(a: Point, b: Point, c: Point) -> Wide {
    let (dx1, dy1) = (Wide::from(b.x) - a.x.into(), Wide::from(b.y) - a.y.into());
    let (dx2, dy2) = (Wide::from(c.x) - b.x.into(), Wide::from(c.y) - b.y.into());
    dx1 * dy2 - dy1 * dx2
}

/// `(b - a) · (c - b)`, exactly.
pub fn dot_product(a: Point, b: Point, c: Point) -> Wide {
    let (dx1, dy1) = (Wide::from(b.x) - a.x.into(), Wide::from(b.y) - a.y.into());
    let (dx2, dy2) = (Wide::from(c.x) - b.x.into(), Wide::from(c.y) - b.y.into());
    dx1 * dx2 + dy1 * dy2
}

/// `(b - a) × (d - c)`, exactly.
pub(crate) fn cross_vec(a: Point, b: Point, c: Point, d: Point) -> Wide {
    let (dx1, dy1) = (Wide::from(b.x) - a.x.into(), Wide::from(b.y) - a.y.into());
    let (dx2, dy2) = (Wide::from(d.x) - c.x.into(), Wide::from(d.y) - c.y.into());
    dx1 * dy2 - dy1 * dx2
}

/// The signed area of a closed path, by the shoelace formula.
pub fn area(path: &[Point]) -> f64 {
    if path.len() < 3 {
        return 0.0;
    }
    let mut exact = Some(Wide::ZERO);
    let mut approx = 0.0;
    let mut prev = path[path.len() - 1];
    for &p in path {
        // Both products lie in `[i64::MIN * i64::MAX, i64::MIN * i64::MIN]`,
        // so their difference is below `2^127` even for unchecked points.
        let term = Wide::from(prev.x) * p.y.into() - Wide::from(p.x) * prev.y.into();
        exact = exact.and_then(|sum| sum.checked_add(term));
        approx += term.to_f64();
        prev = p;
    }
    exact.map_or(approx, |sum| sum.to_f64()) / 2.0
}

/// The orientation of a closed path.
///
/// Paths with zero area don't really have an orientation; they are reported
/// as [`Orientation::Negative`].
pub fn orientation(path: &[Point]) -> Orientation {
    if area(path) > 0.0 {
        Orientation::Positive
    } else {
        Orientation::Negative
    }
}

/// Is this closed path positively oriented?
pub fn is_positive(path: &[Point]) -> bool {
    orientation(path) == Orientation::Positive
}

/// Reverses every path in a collection.
pub fn reverse_paths(paths: &[Path]) -> Paths {
    paths
        .iter()
        .map(|p| p.iter().rev().copied().collect())
        .collect()
}

/// Removes consecutive duplicate points, and (if `closed`) a final point that
/// duplicates the first one.
pub fn strip_duplicates(path: &[Point], closed: bool) -> Path {
    let mut ret: Path = Vec::with_capacity(path.len());
    for &p in path {
        if ret.last() != Some(&p) {
            ret.push(p);
        }
    }
    if closed {
        while ret.len() > 1 && ret.first() == ret.last() {
            ret.pop();
        }
    }
    ret
}

fn on_segment(p: Point, s0: Point, s1: Point) -> bool {
    p.x >= s0.x.min(s1.x)
        && p.x <= s0.x.max(s1.x)
        && p.y >= s0.y.min(s1.y)
        && p.y <= s0.y.max(s1.y)
        && cross_product(s0, s1, p).is_zero()
}

/// Do the segments `a0 -- a1` and `b0 -- b1` intersect?
///
/// If `inclusive` is false, only proper crossings count. If it's true,
/// touching counts too, except for two segments lying along the same line.
///
/// Fails with [`Error::PrecisionExceeded`] if any coordinate is out of range.
pub fn segments_intersect(
    a0: Point,
    a1: Point,
    b0: Point,
    b1: Point,
    inclusive: bool,
) -> Result<bool, Error> {
    for p in [a0, a1, b0, b1] {
        p.check_range()?;
    }
    Ok(segments_cross(a0, a1, b0, b1, inclusive))
}

/// [`segments_intersect`], for points already known to be in range.
pub(crate) fn segments_cross(a0: Point, a1: Point, b0: Point, b1: Point, inclusive: bool) -> bool {
    let r1 = cross_product(a0, b0, b1).signum();
    let r2 = cross_product(a1, b0, b1).signum();
    let r3 = cross_product(b0, a0, a1).signum();
    let r4 = cross_product(b1, a0, a1).signum();
    if inclusive {
        if r1 * r2 > 0 || r3 * r4 > 0 {
            return false;
        }
        r1 != 0 || r2 != 0 || r3 != 0 || r4 != 0
    } else {
        r1 * r2 < 0 && r3 * r4 < 0
    }
}

/// Finds where the closed segments `a0 -- a1` and `b0 -- b1` meet.
///
/// The crossing point is computed exactly and rounded to the nearest integer
/// point. If the segments overlap along a line, the first point of the overlap
/// in sweep order is returned.
///
/// Fails with [`Error::PrecisionExceeded`] if the coordinates are too large
/// for the exact computation.
pub fn segment_intersect(a0: Point, a1: Point, b0: Point, b1: Point) -> Result<Option<Point>, Error> {
    for p in [a0, a1, b0, b1] {
        p.check_range()?;
    }

    let d = cross_vec(a0, a1, b0, b1);
    if d.is_zero() {
        // Parallel (or degenerate). Only collinear pieces can meet, and then
        // they meet at one of the endpoints.
        let candidates = [a0, a1]
            .into_iter()
            .filter(|p| on_segment(*p, b0, b1))
            .chain([b0, b1].into_iter().filter(|p| on_segment(*p, a0, a1)));
        return Ok(candidates.min());
    }

    let t_num = cross_vec(a0, b0, b0, b1);
    let u_num = cross_vec(a0, b0, a0, a1);
    let (d, t_num, u_num) = if d < Wide::ZERO {
        (-d, -t_num, -u_num)
    } else {
        (d, t_num, u_num)
    };
    if t_num < Wide::ZERO || t_num > d || u_num < Wide::ZERO || u_num > d {
        return Ok(None);
    }
    point_along(a0, a1, t_num, d).map(Some)
}

/// Where the infinite lines through `a0 -- a1` and `b0 -- b1` cross, rounded
/// to the nearest integer point. Returns `None` for parallel lines.
pub(crate) fn line_intersection(
    a0: Point,
    a1: Point,
    b0: Point,
    b1: Point,
) -> Result<Option<Point>, Error> {
    let d = cross_vec(a0, a1, b0, b1);
    if d.is_zero() {
        return Ok(None);
    }
    let t_num = cross_vec(a0, b0, b0, b1);
    point_along(a0, a1, t_num, d).map(Some)
}

// a0 + (a1 - a0) * t_num / d
fn point_along(a0: Point, a1: Point, t_num: Wide, d: Wide) -> Result<Point, Error> {
    let exceeded = || Error::PrecisionExceeded {
        x: a0.x as f64,
        y: a0.y as f64,
    };
    let offset = |start: i64, end: i64| -> Result<i64, Error> {
        let delta = Wide::from(end) - start.into();
        let num = delta.checked_mul(t_num).ok_or_else(exceeded)?;
        let q = num.div_round(d).ok_or_else(exceeded)?;
        Wide::from(start)
            .checked_add(q)
            .and_then(Wide::to_coord)
            .ok_or_else(exceeded)
    };
    Ok(Point::new(offset(a0.x, a1.x)?, offset(a0.y, a1.y)?))
}

/// Where is `pt` relative to the closed path?
///
/// Uses the crossing number (even-odd) rule with exact arithmetic. Points on
/// an edge or vertex are reported as [`PointInPolygon::OnBoundary`].
///
/// Fails with [`Error::PrecisionExceeded`] if any coordinate is out of range.
pub fn point_in_polygon(pt: Point, path: &[Point]) -> Result<PointInPolygon, Error> {
    pt.check_range()?;
    for p in path {
        p.check_range()?;
    }
    Ok(locate(pt, path))
}

/// [`point_in_polygon`], for points already known to be in range.
pub(crate) fn locate(pt: Point, path: &[Point]) -> PointInPolygon {
    if path.len() < 3 {
        return PointInPolygon::Outside;
    }
    let mut inside = false;
    let mut prev = path[path.len() - 1];
    for &cur in path {
        if on_segment(pt, prev, cur) {
            return PointInPolygon::OnBoundary;
        }
        if (prev.y > pt.y) != (cur.y > pt.y) {
            // The edge crosses the horizontal line through `pt`; does it cross
            // to the right of `pt`?
            let s = cross_vec(prev, cur, prev, pt).signum();
            let dy = (cur.y - prev.y).signum() as i32;
            if s == dy {
                inside = !inside;
            }
        }
        prev = cur;
    }
    if inside {
        PointInPolygon::Inside
    } else {
        PointInPolygon::Outside
    }
}

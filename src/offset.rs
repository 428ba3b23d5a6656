//! Inflating and deflating paths.
//!
//! Every path is turned into one or more "outlines": closed polygons that
//! trace the path at distance `delta`, with corners filled in according to
//! the [`JoinStyle`] and (for open paths) ends capped according to the
//! [`EndStyle`]. The outlines are allowed to be messy: corners that turn away
//! from the offset side get little backwards loops, and shrinking a feature
//! past nothing turns it inside out. All of that has negative winding, so a
//! single union with the [`FillRule::Positive`] rule cleans it up.

use std::f64::consts::PI;

use kurbo::Vec2;

use crate::geom::{area, strip_duplicates, Path, Paths, Point, Rect};
use crate::topology::Contours;
use crate::{clip_with_options, BinaryOp, ClipOptions, Error, FillRule};

/// How corners are filled in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum JoinStyle {
    /// Cut the corner off flat, at distance `delta` from the vertex.
    Square,
    /// Round the corner with an arc of radius `delta`.
    Round,
    /// Extend the two offset edges until they meet, unless they'd meet too
    /// far away (see [`OffsetOptions::miter_limit`]). In that case, fall back
    /// to [`JoinStyle::Bevel`].
    Miter,
    /// Join the two offset edges with a straight line.
    Bevel,
}

/// How paths are closed off, and whether they're polygons at all.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum EndStyle {
    /// The path is a closed polygon: a positive `delta` grows it and a
    /// negative one shrinks it.
    Polygon,
    /// The path is closed, but offset as a line: the result is a band of
    /// width `2 * |delta|` around it.
    Joined,
    /// Open, with flat ends at the endpoints.
    Butt,
    /// Open, with flat ends `|delta|` past the endpoints.
    Square,
    /// Open, with round ends.
    Round,
}

/// Parameters for offsetting.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct OffsetOptions {
    /// The furthest a miter join may extend from its vertex, as a multiple of
    /// `|delta|`. Must be at least 2.
    pub miter_limit: f64,
    /// The furthest an approximated arc may stray from the true arc. Must be
    /// positive.
    pub arc_tolerance: f64,
    /// Keep collinear vertices in the output.
    pub preserve_collinear: bool,
    /// Output outer contours with negative orientation and holes with
    /// positive orientation.
    pub reverse_solution: bool,
}

impl Default for OffsetOptions {
    fn default() -> Self {
        OffsetOptions {
            miter_limit: 2.0,
            arc_tolerance: 0.25,
            preserve_collinear: false,
            reverse_solution: false,
        }
    }
}

impl OffsetOptions {
    fn validate(&self) -> Result<(), Error> {
        if !self.miter_limit.is_finite() || self.miter_limit < 2.0 {
            return Err(Error::InvalidInput {
                reason: "miter limit must be a finite number, at least 2",
            });
        }
        if !self.arc_tolerance.is_finite() || self.arc_tolerance <= 0.0 {
            return Err(Error::InvalidInput {
                reason: "arc tolerance must be finite and positive",
            });
        }
        Ok(())
    }
}

/// Paths that are offset with the same styles.
#[derive(Clone, Debug)]
struct Group {
    paths: Paths,
    join: JoinStyle,
    end: EndStyle,
    /// For polygons: whether the group's lowest path has negative area, in
    /// which case the whole group is treated as if it were reversed.
    reversed: bool,
    /// For polygons: whether there's any path with area to decide `reversed`.
    has_lowest: bool,
}

impl Group {
    fn new(paths: &[Path], join: JoinStyle, end: EndStyle) -> Self {
        let closed = matches!(end, EndStyle::Polygon | EndStyle::Joined);
        let paths: Paths = paths
            .iter()
            .map(|p| strip_duplicates(p, closed))
            .filter(|p| !p.is_empty())
            .collect();

        let (has_lowest, reversed) = if end == EndStyle::Polygon {
            match lowest_path(&paths) {
                Some(i) => (true, area(&paths[i]) < 0.0),
                None => (false, false),
            }
        } else {
            (false, false)
        };
        Group {
            paths,
            join,
            end,
            reversed,
            has_lowest,
        }
    }

    /// The paths as they'd be if the offset were zero.
    fn unchanged(&self, out: &mut Paths) {
        if self.end != EndStyle::Polygon {
            return;
        }
        for path in &self.paths {
            let mut p = path.clone();
            if self.reversed {
                p.reverse();
            }
            out.push(p);
        }
    }

    fn offset(&self, delta: f64, options: &OffsetOptions, out: &mut Paths) -> Result<(), Error> {
        let delta = match self.end {
            EndStyle::Polygon if !self.has_lowest => delta.abs(),
            EndStyle::Polygon if self.reversed => -delta,
            EndStyle::Polygon => delta,
            _ => delta.abs(),
        };
        let mut st = Outliner::new(delta, self.join, options);
        if self.join == JoinStyle::Round || self.end == EndStyle::Round {
            st.init_arcs(options.arc_tolerance);
        }

        for path in &self.paths {
            if path.len() == 1 {
                if delta >= 1.0 {
                    out.push(st.point_outline(path[0])?);
                }
                continue;
            }

            let end = if path.len() == 2 && self.end == EndStyle::Joined {
                if self.join == JoinStyle::Round {
                    EndStyle::Round
                } else {
                    EndStyle::Square
                }
            } else {
                self.end
            };

            st.build_normals(path);
            match end {
                EndStyle::Polygon => {
                    st.offset_polygon(path);
                    out.push(st.finish(self.reversed)?);
                }
                EndStyle::Joined => {
                    st.offset_polygon(path);
                    out.push(st.finish(false)?);

                    let rev: Path = path.iter().rev().copied().collect();
                    // The normals of the reversed path: reverse, rotate by
                    // one and negate.
                    st.norms.reverse();
                    st.norms.rotate_left(1);
                    for n in &mut st.norms {
                        *n = -*n;
                    }
                    st.offset_polygon(&rev);
                    out.push(st.finish(false)?);
                }
                _ => {
                    st.offset_open_path(path, end);
                    out.push(st.finish(false)?);
                }
            }
        }
        Ok(())
    }
}

/// The index of the path containing the point with the largest `y` (and then
/// smallest `x`), ignoring paths with no area.
fn lowest_path(paths: &[Path]) -> Option<usize> {
    let mut best: Option<(usize, Point)> = None;
    for (i, path) in paths.iter().enumerate() {
        let Some(&bot) = path.iter().min() else {
            continue;
        };
        if best.map_or(true, |(_, b)| bot < b) && area(path) != 0.0 {
            best = Some((i, bot));
        }
    }
    best.map(|(i, _)| i)
}

fn unit_normal(p0: Point, p1: Point) -> Vec2 {
    let d = p1.to_kurbo() - p0.to_kurbo();
    if d.x == 0.0 && d.y == 0.0 {
        return Vec2::ZERO;
    }
    Vec2::new(d.y, -d.x) / d.hypot()
}

/// Where the lines `a0 -- a1` and `b0 -- b1` cross.
fn line_crossing(
    a0: kurbo::Point,
    a1: kurbo::Point,
    b0: kurbo::Point,
    b1: kurbo::Point,
) -> Option<kurbo::Point> {
    let da = a1 - a0;
    let db = b1 - b0;
    let denom = da.cross(db);
    if denom == 0.0 {
        return None;
    }
    let t = (b0 - a0).cross(db) / denom;
    Some(a0 + da * t)
}

/// The state for offsetting the paths of one group.
struct Outliner {
    delta: f64,
    join: JoinStyle,
    /// Miters are used when the cosine of the corner angle exceeds this.
    miter_cos: f64,
    step_sin: f64,
    step_cos: f64,
    steps_per_rad: f64,
    /// `norms[i]` is the unit normal of the edge from `path[i]` to
    /// `path[i + 1]`.
    norms: Vec<Vec2>,
    out: Vec<kurbo::Point>,
}

impl Outliner {
    fn new(delta: f64, join: JoinStyle, options: &OffsetOptions) -> Self {
        Outliner {
            delta,
            join,
            miter_cos: 2.0 / (options.miter_limit * options.miter_limit) - 1.0,
            step_sin: 0.0,
            step_cos: 1.0,
            steps_per_rad: 0.0,
            norms: Vec::new(),
            out: Vec::new(),
        }
    }

    fn init_arcs(&mut self, arc_tolerance: f64) {
        let abs_delta = self.delta.abs();
        let tol = abs_delta.min(arc_tolerance);
        let steps_per_360 = (PI / (1.0 - tol / abs_delta).acos()).min(abs_delta * PI);
        self.step_sin = (2.0 * PI / steps_per_360).sin();
        self.step_cos = (2.0 * PI / steps_per_360).cos();
        if self.delta < 0.0 {
            self.step_sin = -self.step_sin;
        }
        self.steps_per_rad = steps_per_360 / (2.0 * PI);
    }

    fn build_normals(&mut self, path: &[Point]) {
        self.norms.clear();
        self.norms
            .extend(path.windows(2).map(|w| unit_normal(w[0], w[1])));
        if let (Some(&first), Some(&last)) = (path.first(), path.last()) {
            self.norms.push(unit_normal(last, first));
        }
    }

    /// Rounds the current outline to integers, and resets it.
    fn finish(&mut self, reverse: bool) -> Result<Path, Error> {
        let mut path = Vec::with_capacity(self.out.len());
        for p in self.out.drain(..) {
            let p = Point::from_f64(p.x, p.y)?;
            if path.last() != Some(&p) {
                path.push(p);
            }
        }
        if reverse {
            path.reverse();
        }
        Ok(path)
    }

    /// A circle or square around a single point.
    fn point_outline(&self, pt: Point) -> Result<Path, Error> {
        let r = self.delta.abs();
        if self.join == JoinStyle::Round {
            let mut steps = (self.steps_per_rad * 2.0 * PI).ceil();
            if steps <= 2.0 {
                steps = (PI * r.sqrt()).ceil();
            }
            let steps = steps as usize;
            let c = pt.to_kurbo();
            let step = 2.0 * PI / steps as f64;
            let mut path = Vec::with_capacity(steps);
            for i in 0..steps {
                let (s, co) = (step * i as f64).sin_cos();
                let p = Point::from_f64(c.x + r * co, c.y + r * s)?;
                if path.last() != Some(&p) {
                    path.push(p);
                }
            }
            Ok(path)
        } else {
            let d = r.ceil() as i64;
            let rect = Rect {
                left: pt.x.saturating_sub(d),
                top: pt.y.saturating_sub(d),
                right: pt.x.saturating_add(d),
                bottom: pt.y.saturating_add(d),
            };
            for p in [
                Point::new(rect.left, rect.top),
                Point::new(rect.right, rect.bottom),
            ] {
                p.check_range()?;
            }
            Ok(rect.as_path())
        }
    }

    fn perpendicular(&self, pt: Point, norm: Vec2) -> kurbo::Point {
        pt.to_kurbo() + norm * self.delta
    }

    fn offset_polygon(&mut self, path: &[Point]) {
        let mut k = path.len() - 1;
        for j in 0..path.len() {
            self.offset_point(path, j, k);
            k = j;
        }
    }

    fn offset_open_path(&mut self, path: &[Point], end: EndStyle) {
        let high = path.len() - 1;
        self.cap(path, 0, end);

        for j in 1..high {
            self.offset_point(path, j, j - 1);
        }

        // Turn around: the normals now point to the other side.
        for i in (1..=high).rev() {
            self.norms[i] = -self.norms[i - 1];
        }
        self.norms[0] = self.norms[high];

        self.cap(path, high, end);
        for j in (1..high).rev() {
            self.offset_point(path, j, j + 1);
        }
    }

    fn cap(&mut self, path: &[Point], j: usize, end: EndStyle) {
        match end {
            EndStyle::Butt => self.do_bevel(path, j, j),
            EndStyle::Round => self.do_round(path, j, j, PI),
            _ => self.do_square(path, j, j),
        }
    }

    /// Adds the outline around `path[j]`, where `k` is the vertex we came
    /// from.
    fn offset_point(&mut self, path: &[Point], j: usize, k: usize) {
        if path[j] == path[k] {
            return;
        }
        let (nj, nk) = (self.norms[j], self.norms[k]);
        let sin_a = nk.cross(nj).clamp(-1.0, 1.0);
        let cos_a = nj.dot(nk);

        if cos_a > -0.999 && sin_a * self.delta < 0.0 {
            // Concave. The backwards loop this makes is removed by the union.
            self.out.push(self.perpendicular(path[j], nk));
            if cos_a < 0.99 {
                self.out.push(path[j].to_kurbo());
            }
            self.out.push(self.perpendicular(path[j], nj));
        } else if cos_a > 0.999 && self.join != JoinStyle::Round {
            // Almost straight.
            self.do_miter(path, j, k, cos_a);
        } else {
            match self.join {
                JoinStyle::Miter if cos_a > self.miter_cos => self.do_miter(path, j, k, cos_a),
                JoinStyle::Miter | JoinStyle::Bevel => self.do_bevel(path, j, k),
                JoinStyle::Round => self.do_round(path, j, k, sin_a.atan2(cos_a)),
                JoinStyle::Square => self.do_square(path, j, k),
            }
        }
    }

    fn do_bevel(&mut self, path: &[Point], j: usize, k: usize) {
        let p = path[j].to_kurbo();
        if j == k {
            let d = self.norms[j] * self.delta.abs();
            self.out.push(p - d);
            self.out.push(p + d);
        } else {
            self.out.push(p + self.norms[k] * self.delta);
            self.out.push(p + self.norms[j] * self.delta);
        }
    }

    fn do_miter(&mut self, path: &[Point], j: usize, k: usize, cos_a: f64) {
        let q = self.delta / (cos_a + 1.0);
        self.out
            .push(path[j].to_kurbo() + (self.norms[k] + self.norms[j]) * q);
    }

    fn do_square(&mut self, path: &[Point], j: usize, k: usize) {
        let (nj, nk) = (self.norms[j], self.norms[k]);
        // The direction the corner points in.
        let dir = if j == k {
            Vec2::new(nj.y, -nj.x)
        } else {
            let sum = Vec2::new(-nk.y, nk.x) + Vec2::new(nj.y, -nj.x);
            let len = sum.hypot();
            if len == 0.0 {
                sum
            } else {
                sum / len
            }
        };
        let abs_delta = self.delta.abs();
        let tip = path[j].to_kurbo() + dir * abs_delta;
        let across = Vec2::new(dir.y, -dir.x) * self.delta;
        let (p1, p2) = (tip + across, tip - across);

        let p3 = self.perpendicular(path[k], nk);
        let p4 = if j == k {
            p3 + dir * self.delta
        } else {
            self.perpendicular(path[j], nk)
        };
        let pt = line_crossing(p1, p2, p3, p4).unwrap_or(p1);
        let reflected = tip + (tip - pt);
        if j == k {
            self.out.push(reflected);
            self.out.push(pt);
        } else {
            self.out.push(pt);
            self.out.push(reflected);
        }
    }

    fn do_round(&mut self, path: &[Point], j: usize, k: usize, angle: f64) {
        let c = path[j].to_kurbo();
        let mut v = self.norms[k] * self.delta;
        if j == k {
            v = -v;
        }
        self.out.push(c + v);
        let steps = (self.steps_per_rad * angle.abs()).ceil() as usize;
        for _ in 1..steps {
            v = Vec2::new(
                v.x * self.step_cos - self.step_sin * v.y,
                v.x * self.step_sin + v.y * self.step_cos,
            );
            self.out.push(c + v);
        }
        self.out.push(self.perpendicular(path[j], self.norms[j]));
    }
}

/// Collects paths to offset, each with its own styles.
///
/// All the outlines are merged in a single union, so overlapping paths (even
/// with different styles) come out as one set.
#[derive(Clone, Debug, Default)]
pub struct Offsetter {
    groups: Vec<Group>,
    options: OffsetOptions,
}

impl Offsetter {
    /// Creates an empty offsetter.
    pub fn new(options: OffsetOptions) -> Self {
        Offsetter {
            groups: Vec::new(),
            options,
        }
    }

    /// Adds one path.
    pub fn add_path(&mut self, path: &[Point], join: JoinStyle, end: EndStyle) {
        self.groups
            .push(Group::new(&[path.to_vec()], join, end));
    }

    /// Adds some paths that share their styles.
    ///
    /// For [`EndStyle::Polygon`], the paths are considered together: holes
    /// should have the opposite orientation to the outer path.
    pub fn add_paths(&mut self, paths: &[Path], join: JoinStyle, end: EndStyle) {
        self.groups.push(Group::new(paths, join, end));
    }

    /// Forgets all the paths.
    pub fn clear(&mut self) {
        self.groups.clear();
    }

    /// Offsets everything by `delta`, returning the resulting paths.
    pub fn execute(&self, delta: f64) -> Result<Paths, Error> {
        Ok(self.execute_tree(delta)?.paths())
    }

    /// Offsets everything by `delta`, returning the resulting contours with
    /// their nesting.
    pub fn execute_tree(&self, delta: f64) -> Result<Contours, Error> {
        self.options.validate()?;
        if !delta.is_finite() {
            return Err(Error::InvalidInput {
                reason: "non-finite offset",
            });
        }

        let mut outlines = Paths::new();
        if delta.abs() < 0.5 {
            for g in &self.groups {
                g.unchanged(&mut outlines);
            }
        } else {
            for g in &self.groups {
                g.offset(delta, &self.options, &mut outlines)?;
            }
        }

        let options = ClipOptions {
            preserve_collinear: self.options.preserve_collinear,
            reverse_solution: self.options.reverse_solution,
        };
        clip_with_options(
            &outlines,
            &[],
            BinaryOp::Union,
            FillRule::Positive,
            &options,
        )
    }
}

/// Offsets some paths by `delta`.
///
/// With [`EndStyle::Polygon`], positive `delta` grows the polygons and
/// negative `delta` shrinks them. With the other end styles the paths are
/// treated as lines, and the result is the set of points within `|delta|`
/// of them (up to the styles of the corners and ends).
///
/// ```
/// use polyclip::{is_positive, offset, EndStyle, JoinStyle, OffsetOptions, Point};
///
/// let square = vec![Point::new(0, 0), Point::new(0, 5), Point::new(5, 5), Point::new(5, 0)];
/// let grown = offset(&[square], 1.0, JoinStyle::Round, EndStyle::Polygon, &OffsetOptions::default())?;
/// assert_eq!(grown.len(), 1);
/// assert!(is_positive(&grown[0]));
/// # Ok::<(), polyclip::Error>(())
/// ```
pub fn offset(
    paths: &[Path],
    delta: f64,
    join: JoinStyle,
    end: EndStyle,
    options: &OffsetOptions,
) -> Result<Paths, Error> {
    let mut o = Offsetter::new(*options);
    o.add_paths(paths, join, end);
    o.execute(delta)
}

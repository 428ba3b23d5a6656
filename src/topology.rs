//! Turning the sweep's output records into contours.
//!
//! The rings built by the sweep are almost, but not quite, what we want: they
//! can contain collinear runs and spikes, they can touch themselves, and the
//! owner that the sweep guessed for each of them is only a hint. This module
//! cleans each ring, splits it where it crosses itself, and then works out
//! which contour really contains which.

use std::collections::HashMap;

use crate::geom::{
    area, cross_product, dot_product, line_intersection, locate, segments_cross, Path, Paths,
    Point, PointInPolygon, Rect,
};
use crate::sweep::{OutPtIdx, OutRecIdx, Output};
use crate::Error;

/// An index for a [`Contour`] within [`Contours`].
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq, serde::Serialize)]
pub struct ContourIdx(pub usize);

/// A simple, closed polygon.
///
/// A contour has no repeated points and at least three of them, and its edges
/// don't cross one another. Where the boundary of a set touches itself at a
/// vertex, it is split there into separate contours.
#[derive(Clone, Debug, serde::Serialize)]
pub struct Contour {
    /// The points making up this contour.
    ///
    /// If you're drawing a contour with line segments, don't forget to close it: the last point
    /// should be connected to the first point.
    pub points: Path,

    /// A contour can have a parent, so that sets with holes can be represented as nested contours.
    /// For example, the shaded set below:
    ///
    /// ```text
    ///   ----------------------
    ///   |xxxxxxxxxxxxxxxxxxxx|
    ///   |xxxx------------xxxx|
    ///   |xxxx|          |xxxx|
    ///   |xxxx|   ----   |xxxx|
    ///   |xxxx|   |xx|   |xxxx|
    ///   |xxxx|   ----   |xxxx|
    ///   |xxxx|          |xxxx|
    ///   |xxxx------------xxxx|
    ///   |xxxxxxxxxxxxxxxxxxxx|
    ///   ----------------------
    /// ```
    ///
    /// is represented as three contours: the big square has no parent, the
    /// middle square (a hole) has the big square as its parent, and the small
    /// square (an island in the hole) has the middle square as its parent.
    ///
    /// A contour can share vertices with its parent, but its edges never
    /// cross its parent's.
    pub parent: Option<ContourIdx>,

    /// The contours whose parent is this one.
    pub children: Vec<ContourIdx>,

    /// Whether this contour is "outer" or not. A contour with no parent is "outer", and
    /// then they alternate: a contour is "outer" if and only if its parent isn't.
    ///
    /// Outer contours have positive area and the others have negative area,
    /// unless the clip was asked for a reversed solution.
    pub outer: bool,
}

impl Default for Contour {
    fn default() -> Self {
        Self {
            points: Path::default(),
            children: Vec::default(),
            outer: true,
            parent: None,
        }
    }
}

/// A collection of [`Contour`]s.
///
/// Can be indexed with a [`ContourIdx`]. Parents always come before their
/// children.
#[derive(Clone, Debug, serde::Serialize, Default)]
pub struct Contours {
    contours: Vec<Contour>,
}

impl Contours {
    /// Returns all of the contour indices, grouped by containment.
    ///
    /// For each of the inner vecs, the first element is an outer contour with
    /// no parent. All of the other contours in that inner vec lie inside that
    /// outer contour.
    pub fn grouped(&self) -> Vec<Vec<ContourIdx>> {
        let mut ret = Vec::new();
        for (i, c) in self.contours.iter().enumerate() {
            if c.parent.is_none() {
                let mut tree = Vec::new();
                self.visit(ContourIdx(i), &mut tree);
                ret.push(tree);
            }
        }
        ret
    }

    fn visit(&self, idx: ContourIdx, acc: &mut Vec<ContourIdx>) {
        acc.push(idx);
        for &child in &self[idx].children {
            self.visit(child, acc);
        }
    }

    /// Iterates over all of the contours.
    pub fn contours(&self) -> impl Iterator<Item = &Contour> + '_ {
        self.contours.iter()
    }

    /// The contours without a parent.
    pub fn roots(&self) -> impl Iterator<Item = ContourIdx> + '_ {
        self.contours
            .iter()
            .enumerate()
            .filter(|(_, c)| c.parent.is_none())
            .map(|(i, _)| ContourIdx(i))
    }

    /// The number of contours.
    pub fn len(&self) -> usize {
        self.contours.len()
    }

    /// Are there no contours at all?
    pub fn is_empty(&self) -> bool {
        self.contours.is_empty()
    }

    /// All of the contours' points, forgetting the nesting.
    pub fn paths(&self) -> Paths {
        self.contours.iter().map(|c| c.points.clone()).collect()
    }

    /// The total signed area.
    ///
    /// Since holes are oriented opposite to outer contours, this is the area
    /// of the set (or its negative, for a reversed solution).
    pub fn area(&self) -> f64 {
        self.contours.iter().map(|c| area(&c.points)).sum()
    }

    fn push(&mut self, points: Path, parent: Option<ContourIdx>) -> ContourIdx {
        let idx = ContourIdx(self.contours.len());
        let outer = match parent {
            Some(p) => {
                self.contours[p.0].children.push(idx);
                !self.contours[p.0].outer
            }
            None => true,
        };
        self.contours.push(Contour {
            points,
            parent,
            children: Vec::new(),
            outer,
        });
        idx
    }

    /// Draws the contours, with outer contours in one color and holes in
    /// another.
    #[cfg(feature = "debug-svg")]
    pub fn to_svg(&self) -> svg::Document {
        use svg::node::element::{path::Data, Path as SvgPath};

        let bounds = self
            .contours
            .iter()
            .flat_map(|c| c.points.iter())
            .fold(Rect::EMPTY, |r, p| r.union_point(*p));
        let mut doc = svg::Document::new();
        if !bounds.is_empty() {
            let w = (bounds.right - bounds.left) as f64;
            let h = (bounds.bottom - bounds.top) as f64;
            let margin = w.max(h) * 0.05;
            doc = doc.set(
                "viewBox",
                (
                    bounds.left as f64 - margin,
                    bounds.top as f64 - margin,
                    w + 2.0 * margin,
                    h + 2.0 * margin,
                ),
            );
        }
        for c in &self.contours {
            let Some((first, rest)) = c.points.split_first() else {
                continue;
            };
            let mut data = Data::new().move_to((first.x as f64, first.y as f64));
            for p in rest {
                data = data.line_to((p.x as f64, p.y as f64));
            }
            let color = if c.outer { "blue" } else { "red" };
            doc = doc.add(
                SvgPath::new()
                    .set("fill", "none")
                    .set("stroke", color)
                    .set("stroke-width", "1")
                    .set("vector-effect", "non-scaling-stroke")
                    .set("d", data.close()),
            );
        }
        doc
    }
}

impl std::ops::Index<ContourIdx> for Contours {
    type Output = Contour;

    fn index(&self, index: ContourIdx) -> &Self::Output {
        &self.contours[index.0]
    }
}

/// Options for turning output records into contours.
#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct BuildOptions {
    pub preserve_collinear: bool,
    pub reverse_solution: bool,
}

/// Builds contours from the output of a sweep.
pub(crate) fn build_contours(out: Output, options: BuildOptions) -> Result<Contours, Error> {
    let mut builder = Builder {
        out,
        options,
        contours: Contours::default(),
    };
    // Splitting can add records as we go.
    let mut i = 0;
    while i < builder.out.recs.len() {
        let or = OutRecIdx(i);
        i += 1;
        if builder.out.recs[or].pts.is_none() {
            continue;
        }
        if builder.check_bounds(or)? {
            builder.recursive_check_owners(or)?;
        }
    }
    Ok(builder.contours)
}

struct Builder {
    out: Output,
    options: BuildOptions,
    contours: Contours,
}

/// Are two points within one unit of each other in both directions?
fn really_close(a: Point, b: Point) -> bool {
    a.x.abs_diff(b.x) < 2 && a.y.abs_diff(b.y) < 2
}

impl Builder {
    fn next(&self, op: OutPtIdx) -> OutPtIdx {
        self.out.pts[op].next
    }

    fn prev(&self, op: OutPtIdx) -> OutPtIdx {
        self.out.pts[op].prev
    }

    fn pt(&self, op: OutPtIdx) -> Point {
        self.out.pts[op].pt
    }

    fn ring_points(&self, start: OutPtIdx) -> Path {
        let mut ret = Vec::with_capacity(self.out.ring_len(start));
        let mut op = start;
        loop {
            ret.push(self.pt(op));
            op = self.next(op);
            if op == start {
                break;
            }
        }
        ret
    }

    fn is_very_small_triangle(&self, op: OutPtIdx) -> bool {
        let (prev, next) = (self.prev(op), self.next(op));
        self.next(next) == prev
            && (really_close(self.pt(prev), self.pt(next))
                || really_close(self.pt(op), self.pt(next))
                || really_close(self.pt(op), self.pt(prev)))
    }

    fn is_valid_closed_path(&self, op: OutPtIdx) -> bool {
        let next = self.next(op);
        next != op && next != self.prev(op) && !self.is_very_small_triangle(op)
    }

    /// Makes sure a record has a clean path and its bounds, returning `false`
    /// if there's nothing left of it.
    fn check_bounds(&mut self, or: OutRecIdx) -> Result<bool, Error> {
        if self.out.recs[or].pts.is_none() {
            return Ok(false);
        }
        if self.out.recs[or].bounds.is_some() {
            return Ok(true);
        }
        self.clean_collinear(or)?;
        let Some(pts) = self.out.recs[or].pts else {
            return Ok(false);
        };
        let Some(path) = self.build_path(pts) else {
            return Ok(false);
        };
        let rec = &mut self.out.recs[or];
        rec.bounds = Some(Rect::from_path(&path));
        rec.path = path;
        Ok(true)
    }

    /// Reads a ring into a path, without repeated points.
    fn build_path(&self, start: OutPtIdx) -> Option<Path> {
        if self.next(start) == start || self.next(start) == self.prev(start) {
            return None;
        }
        let first = self.next(start);
        let mut last = self.pt(first);
        let mut path = vec![last];
        let mut op = self.next(first);
        while op != first {
            let p = self.pt(op);
            if p != last {
                path.push(p);
                last = p;
            }
            op = self.next(op);
        }
        if path.len() > 1 && path.first() == path.last() {
            path.pop();
        }
        if path.len() < 3 || (path.len() == 3 && self.is_very_small_triangle(first)) {
            return None;
        }
        Some(path)
    }

    /// Removes duplicate points, spikes and (unless we're preserving them)
    /// collinear points, then fixes self-intersections.
    fn clean_collinear(&mut self, or: OutRecIdx) -> Result<(), Error> {
        let Some(or) = self.out.real_outrec(Some(or)) else {
            return Ok(());
        };
        let Some(start) = self.out.recs[or].pts else {
            return Ok(());
        };
        if !self.is_valid_closed_path(start) {
            self.out.recs[or].pts = None;
            return Ok(());
        }

        let mut start = start;
        let mut op = start;
        loop {
            let (prev, next) = (self.prev(op), self.next(op));
            let (a, b, c) = (self.pt(prev), self.pt(op), self.pt(next));
            if cross_product(a, b, c).is_zero()
                && (b == a
                    || b == c
                    || !self.options.preserve_collinear
                    || dot_product(a, b, c).signum() < 0)
            {
                if self.out.recs[or].pts == Some(op) {
                    self.out.recs[or].pts = Some(prev);
                }
                op = self.out.dispose_pt(op);
                if !self.is_valid_closed_path(op) {
                    self.out.recs[or].pts = None;
                    return Ok(());
                }
                start = op;
                continue;
            }
            op = next;
            if op == start {
                break;
            }
        }
        self.fix_self_intersects(or)?;
        if self.split_touching(or) {
            // What's left may have new spikes where the piece came off.
            return self.clean_collinear(or);
        }
        Ok(())
    }

    fn fix_self_intersects(&mut self, or: OutRecIdx) -> Result<(), Error> {
        let Some(mut op) = self.out.recs[or].pts else {
            return Ok(());
        };
        // Triangles can't cross themselves.
        if self.prev(op) == self.next(self.next(op)) {
            return Ok(());
        }
        loop {
            let (prev, next) = (self.prev(op), self.next(op));
            let next_next = self.next(next);
            if segments_cross(
                self.pt(prev),
                self.pt(op),
                self.pt(next),
                self.pt(next_next),
                false,
            ) {
                let pts = self.out.recs[or].pts;
                if pts == Some(op) || pts == Some(next) {
                    let moved = pts.map(|p| self.prev(p));
                    self.out.recs[or].pts = moved;
                }
                self.do_split_op(or, op)?;
                let Some(p) = self.out.recs[or].pts else {
                    break;
                };
                op = p;
                if self.prev(op) == self.next(self.next(op)) {
                    break;
                }
                continue;
            }
            op = next;
            if Some(op) == self.out.recs[or].pts {
                break;
            }
        }
        Ok(())
    }

    /// Splits a ring where the edge before `split` crosses the edge after
    /// `split.next`. The little loop between the crossings becomes a new
    /// record, unless it has no area.
    fn do_split_op(&mut self, or: OutRecIdx, split: OutPtIdx) -> Result<(), Error> {
        let prev = self.prev(split);
        let split_next = self.next(split);
        let next_next = self.next(split_next);
        self.out.recs[or].pts = Some(prev);

        let ip = line_intersection(
            self.pt(prev),
            self.pt(split),
            self.pt(split_next),
            self.pt(next_next),
        )?
        .unwrap_or(self.pt(split));

        let area1 = area(&self.ring_points(prev));
        if area1.abs() < 2.0 {
            self.out.recs[or].pts = None;
            return Ok(());
        }
        let area2 = area(&[ip, self.pt(split), self.pt(split_next)]);

        // Cut out `split` and `split_next`, and put the crossing in their place.
        if ip == self.pt(prev) || ip == self.pt(next_next) {
            self.out.pts[next_next].prev = prev;
            self.out.pts[prev].next = next_next;
        } else {
            let new = self.out.new_pt(ip, or);
            self.out.pts[new].prev = prev;
            self.out.pts[new].next = next_next;
            self.out.pts[next_next].prev = new;
            self.out.pts[prev].next = new;
        }

        // Keep the loop if it's big enough to matter, and either bigger than
        // what's left or wound the same way.
        if area2.abs() <= 0.5 || (area2.abs() <= area1.abs() && (area2 > 0.0) != (area1 > 0.0)) {
            return Ok(());
        }
        let new_or = self.out.new_outrec();
        self.out.recs[new_or].owner = self.out.recs[or].owner;
        self.out.pts[split].outrec = new_or;
        self.out.pts[split_next].outrec = new_or;
        let new_op = self.out.new_pt(ip, new_or);
        self.out.pts[new_op].prev = split_next;
        self.out.pts[new_op].next = split;
        self.out.pts[split].prev = new_op;
        self.out.pts[split_next].next = new_op;
        self.out.recs[new_or].pts = Some(new_op);

        let loop_path = self.ring_points(new_op);
        let rest = self.ring_points(prev);
        if path1_inside_path2(&rest, &loop_path) {
            self.out.recs[new_or].splits.push(or);
        } else {
            self.out.recs[or].splits.push(new_or);
        }
        Ok(())
    }

    /// Splits off a piece of the ring where it passes through the same point
    /// twice. Returns `true` if the ring changed.
    ///
    /// The smaller piece becomes a new record: a hole in what's left if it's
    /// wound the other way and lies inside, and a sibling otherwise. Pieces
    /// without area are dropped.
    fn split_touching(&mut self, or: OutRecIdx) -> bool {
        let Some(start) = self.out.recs[or].pts else {
            return false;
        };
        let mut seen = HashMap::new();
        let mut op = start;
        let (op1, op2) = loop {
            if let Some(&first) = seen.get(&self.pt(op)) {
                break (first, op);
            }
            seen.insert(self.pt(op), op);
            op = self.next(op);
            if op == start {
                return false;
            }
        };

        // Swapping the `next` links of the two copies leaves two rings, each
        // with one copy.
        let (n1, n2) = (self.next(op1), self.next(op2));
        self.out.pts[op1].next = n2;
        self.out.pts[n2].prev = op1;
        self.out.pts[op2].next = n1;
        self.out.pts[n1].prev = op2;

        let path1 = self.ring_points(op1);
        let path2 = self.ring_points(op2);
        let (area1, area2) = (area(&path1), area(&path2));
        let (keep, keep_path, piece, piece_path, piece_area, keep_area) =
            if area1.abs() >= area2.abs() {
                (op1, path1, op2, path2, area2, area1)
            } else {
                (op2, path2, op1, path1, area1, area2)
            };
        self.out.recs[or].pts = Some(keep);
        if keep_path.len() < 3 || keep_area.abs() <= 0.5 {
            // Neither piece has any area.
            self.out.recs[or].pts = None;
            return true;
        }
        if piece_path.len() < 3 || piece_area.abs() <= 0.5 {
            return true;
        }

        let new_or = self.out.new_outrec();
        self.out.recs[new_or].pts = Some(piece);
        let mut op = piece;
        loop {
            self.out.pts[op].outrec = new_or;
            op = self.next(op);
            if op == piece {
                break;
            }
        }
        if (piece_area > 0.0) != (keep_area > 0.0) && path1_inside_path2(&piece_path, &keep_path)
        {
            self.out.recs[new_or].owner = Some(or);
        } else {
            self.out.recs[new_or].owner = self.out.recs[or].owner;
        }
        // Anything the sweep nested in `or` might really be in the new piece.
        self.out.recs[or].splits.push(new_or);
        true
    }

    fn bounds(&self, or: OutRecIdx) -> Rect {
        self.out.recs[or].bounds.unwrap_or(Rect::EMPTY)
    }

    fn is_valid_owner(&self, or: OutRecIdx, test_owner: OutRecIdx) -> bool {
        let mut cur = Some(test_owner);
        while let Some(c) = cur {
            if c == or {
                return false;
            }
            cur = self.out.recs[c].owner;
        }
        true
    }

    /// Does `outer` contain `inner`, as far as the contours built so far can
    /// tell?
    fn contains(&mut self, outer: OutRecIdx, inner: OutRecIdx) -> Result<bool, Error> {
        Ok(self.check_bounds(outer)?
            && self.bounds(outer).contains_rect(&self.bounds(inner))
            && path1_inside_path2(&self.out.recs[inner].path, &self.out.recs[outer].path))
    }

    /// Looks for the owner of `or` among the pieces that were split off
    /// some other record.
    fn check_split_owner(&mut self, or: OutRecIdx, splits: Vec<OutRecIdx>) -> Result<bool, Error> {
        for split in splits {
            if self.out.recs[split].pts.is_none() && !self.out.recs[split].splits.is_empty() {
                let inner = self.out.recs[split].splits.clone();
                if self.check_split_owner(or, inner)? {
                    return Ok(true);
                }
            }
            let Some(split) = self.out.real_outrec(Some(split)) else {
                continue;
            };
            if split == or || self.out.recs[split].recursive_split == Some(or) {
                continue;
            }
            self.out.recs[split].recursive_split = Some(or);
            if !self.out.recs[split].splits.is_empty() {
                let inner = self.out.recs[split].splits.clone();
                if self.check_split_owner(or, inner)? {
                    return Ok(true);
                }
            }
            if !self.contains(split, or)? {
                continue;
            }
            if !self.is_valid_owner(or, split) {
                self.out.recs[split].owner = self.out.recs[or].owner;
            }
            self.out.recs[or].owner = Some(split);
            return Ok(true);
        }
        Ok(false)
    }

    /// Finds the real owner of `or` and adds its contour, after its owner's.
    fn recursive_check_owners(&mut self, or: OutRecIdx) -> Result<(), Error> {
        if self.out.recs[or].contour.is_some() || self.bounds(or).is_empty() {
            return Ok(());
        }
        while let Some(owner) = self.out.recs[or].owner {
            let splits = self.out.recs[owner].splits.clone();
            if !splits.is_empty() && self.check_split_owner(or, splits)? {
                break;
            }
            if self.out.recs[owner].pts.is_some() && self.contains(owner, or)? {
                break;
            }
            self.out.recs[or].owner = self.out.recs[owner].owner;
        }

        let parent = match self.out.recs[or].owner {
            Some(owner) => {
                if self.out.recs[owner].contour.is_none() {
                    self.recursive_check_owners(owner)?;
                }
                self.out.recs[owner].contour
            }
            None => None,
        };

        let mut points = std::mem::take(&mut self.out.recs[or].path);
        let outer = parent.map_or(true, |p| !self.contours[p].outer);
        let want_positive = outer != self.options.reverse_solution;
        if (area(&points) > 0.0) != want_positive {
            points.reverse();
        }
        let idx = self.contours.push(points, parent);
        let rec = &mut self.out.recs[or];
        rec.path = self.contours[idx].points.clone();
        rec.contour = Some(idx);
        Ok(())
    }
}

/// Is `path1` inside `path2`?
///
/// The two paths are assumed not to cross, so we look for a couple of
/// vertices that are clearly on one side. If every vertex is on the
/// boundary, we fall back to checking the middle of `path1`'s bounding box.
fn path1_inside_path2(path1: &[Point], path2: &[Point]) -> bool {
    let mut votes: i32 = 0;
    for &p in path1 {
        match locate(p, path2) {
            PointInPolygon::Outside => votes += 1,
            PointInPolygon::Inside => votes -= 1,
            PointInPolygon::OnBoundary => continue,
        }
        if votes.abs() > 1 {
            break;
        }
    }
    if votes != 0 {
        return votes < 0;
    }
    let mid = Rect::from_path(path1).mid_point();
    locate(mid, path2) != PointInPolygon::Outside
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(x: i64, y: i64) -> Point {
        Point::new(x, y)
    }

    // Builds an output with one ring per path, owned by nothing.
    fn output(paths: &[Vec<Point>]) -> Output {
        let mut out = Output::default();
        for path in paths {
            let or = out.new_outrec();
            let first = out.new_pt(path[0], or);
            let mut last = first;
            for &q in &path[1..] {
                last = out.insert_after(last, q);
            }
            out.recs[or].pts = Some(first);
        }
        out
    }

    fn build(paths: &[Vec<Point>]) -> Contours {
        build_contours(output(paths), BuildOptions::default()).unwrap()
    }

    #[test]
    fn square() {
        let contours = build(&[vec![p(0, 0), p(0, 5), p(5, 5), p(5, 0)]]);
        assert_eq!(contours.len(), 1);
        let c = &contours[ContourIdx(0)];
        assert!(c.outer);
        assert_eq!(c.parent, None);
        assert_eq!(area(&c.points), 25.0);
    }

    #[test]
    fn collinear_points() {
        let path = vec![p(0, 0), p(2, 0), p(4, 0), p(4, 4), p(0, 4)];
        let contours = build(&[path.clone()]);
        assert_eq!(contours[ContourIdx(0)].points.len(), 4);

        let opts = BuildOptions {
            preserve_collinear: true,
            ..Default::default()
        };
        let contours = build_contours(output(&[path]), opts).unwrap();
        assert_eq!(contours[ContourIdx(0)].points.len(), 5);
    }

    #[test]
    fn spikes_are_removed_even_when_preserving() {
        // A spike going out to (8, 0) and back.
        let path = vec![p(0, 0), p(4, 0), p(8, 0), p(4, 0), p(4, 4), p(0, 4)];
        let opts = BuildOptions {
            preserve_collinear: true,
            ..Default::default()
        };
        let contours = build_contours(output(&[path]), opts).unwrap();
        assert_eq!(contours[ContourIdx(0)].points.len(), 4);
    }

    #[test]
    fn tiny_triangles_are_dropped() {
        let contours = build(&[vec![p(0, 0), p(1, 0), p(0, 1)]]);
        assert!(contours.is_empty());
    }

    #[test]
    fn nested_squares() {
        // Records in the order the sweep would make them, with the owner
        // guesses missing.
        let contours = build(&[
            vec![p(-6, -6), p(6, -6), p(6, 6), p(-6, 6)],
            vec![p(-4, -4), p(4, -4), p(4, 4), p(-4, 4)],
            vec![p(-2, -2), p(2, -2), p(2, 2), p(-2, 2)],
        ]);
        // Without owners, nothing is nested.
        assert_eq!(contours.roots().count(), 3);

        let mut out = output(&[
            vec![p(-6, -6), p(6, -6), p(6, 6), p(-6, 6)],
            vec![p(-4, -4), p(4, -4), p(4, 4), p(-4, 4)],
            vec![p(-2, -2), p(2, -2), p(2, 2), p(-2, 2)],
        ]);
        out.recs[OutRecIdx(1)].owner = Some(OutRecIdx(0));
        out.recs[OutRecIdx(2)].owner = Some(OutRecIdx(1));
        let contours = build_contours(out, BuildOptions::default()).unwrap();
        let outers: Vec<bool> = contours.contours().map(|c| c.outer).collect();
        assert_eq!(outers, vec![true, false, true]);
        assert_eq!(contours.area(), 144.0 - 64.0 + 16.0);
        assert_eq!(contours.grouped().len(), 1);
        assert_eq!(contours[ContourIdx(0)].children, vec![ContourIdx(1)]);
    }

    #[test]
    fn wrong_owner_guess() {
        // The second square claims the first as its owner, but they're
        // side by side.
        let mut out = output(&[
            vec![p(0, 0), p(4, 0), p(4, 4), p(0, 4)],
            vec![p(10, 0), p(14, 0), p(14, 4), p(10, 4)],
        ]);
        out.recs[OutRecIdx(1)].owner = Some(OutRecIdx(0));
        let contours = build_contours(out, BuildOptions::default()).unwrap();
        assert_eq!(contours.roots().count(), 2);
        assert!(contours.contours().all(|c| c.outer));
    }

    #[test]
    fn pinched_ring_becomes_two_contours() {
        let contours = build(&[vec![
            p(0, 0),
            p(5, 0),
            p(5, 5),
            p(10, 5),
            p(10, 10),
            p(5, 10),
            p(5, 5),
            p(0, 5),
        ]]);
        assert_eq!(contours.len(), 2);
        assert_eq!(contours.roots().count(), 2);
        assert_eq!(contours.area(), 50.0);
        for c in contours.contours() {
            assert_eq!(c.points.len(), 4);
        }
    }

    #[test]
    fn hole_touching_its_outer_contour() {
        // The ring goes around the square, and then around a triangle inside
        // it that shares the corner at the origin.
        let contours = build(&[vec![
            p(0, 0),
            p(10, 0),
            p(10, 10),
            p(0, 10),
            p(0, 0),
            p(3, 6),
            p(6, 3),
        ]]);
        assert_eq!(contours.len(), 2);
        let hole = contours.contours().find(|c| !c.outer).unwrap();
        assert_eq!(hole.points.len(), 3);
        assert_eq!(area(&hole.points), -13.5);
        assert_eq!(contours[hole.parent.unwrap()].points.len(), 4);
        assert_eq!(contours.area(), 86.5);
    }

    #[test]
    fn reversed_solution() {
        let opts = BuildOptions {
            reverse_solution: true,
            ..Default::default()
        };
        let contours =
            build_contours(output(&[vec![p(0, 0), p(5, 0), p(5, 5), p(0, 5)]]), opts).unwrap();
        assert_eq!(contours.area(), -25.0);
    }

    #[test]
    fn contour_snapshot() {
        let contours = build(&[vec![p(0, 0), p(0, 5), p(5, 5), p(5, 0)]]);
        insta::assert_debug_snapshot!(contours.paths(), @r"
        [
            [
                (0, 0),
                (5, 0),
                (5, 5),
                (0, 5),
            ],
        ]
        ");
    }
}

//! Active edges, and the active edge list (AEL) they live in.

use crate::geom::{cross_product, Point};
use crate::num::Wide;
use crate::vertices::{LocalMinimum, PathType, VertexIdx, Vertices};
use crate::{BinaryOp, FillRule};

use super::out_rec::OutRecIdx;
use super::Sweeper;

typed_arena!(
    /// Every edge that was ever active in a sweep.
    ActiveVec,
    /// An index into [`ActiveVec`].
    ActiveIdx,
    "e"
);

/// Which neighbor an edge was joined to because the two coincide.
///
/// Joined edges stop emitting output until they separate again, at which
/// point a new output record starts between them.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) enum JoinWith {
    #[default]
    None,
    Left,
    Right,
}

/// An edge that is currently crossed by the sweep line.
///
/// An active edge follows one bound of a local minimum upwards: when the sweep
/// reaches its top vertex, it either moves on to the next edge of the bound or
/// (at a local maximum) leaves the AEL.
#[derive(Clone, Debug)]
pub(crate) struct Active {
    pub bot: Point,
    pub top: Point,
    /// The horizontal position where this edge crosses the current scanline.
    pub curr_x: i64,
    /// The inverse slope. Horizontal edges have `-f64::MAX` if they're heading
    /// right and `f64::MAX` if they're heading left.
    pub dx: f64,
    /// +1 if the bound follows the path's `next` links, -1 if it follows
    /// `prev`.
    pub wind_dx: i32,
    /// The winding number (of this edge's path type) of the region on the
    /// "inside" of this edge.
    pub wind_cnt: i32,
    /// The winding number of the other path type at this edge.
    pub wind_cnt2: i32,
    pub outrec: Option<OutRecIdx>,
    pub prev_in_ael: Option<ActiveIdx>,
    pub next_in_ael: Option<ActiveIdx>,
    pub vertex_top: VertexIdx,
    pub local_min: LocalMinimum,
    pub is_left_bound: bool,
    pub join_with: JoinWith,
}

fn inverse_slope(bot: Point, top: Point) -> f64 {
    let dy = (top.y - bot.y) as f64;
    if dy != 0.0 {
        (top.x - bot.x) as f64 / dy
    } else if top.x > bot.x {
        -f64::MAX
    } else {
        f64::MAX
    }
}

impl Active {
    /// Starts a bound at a local minimum. The ascending bound follows `next`
    /// links.
    pub fn new(local_min: LocalMinimum, verts: &Vertices, ascending: bool) -> Active {
        let vertex = &verts[local_min.vertex];
        let vertex_top = if ascending { vertex.next } else { vertex.prev };
        let bot = vertex.pt;
        let top = verts[vertex_top].pt;
        Active {
            bot,
            top,
            curr_x: bot.x,
            dx: inverse_slope(bot, top),
            wind_dx: if ascending { 1 } else { -1 },
            wind_cnt: 0,
            wind_cnt2: 0,
            outrec: None,
            prev_in_ael: None,
            next_in_ael: None,
            vertex_top,
            local_min,
            is_left_bound: false,
            join_with: JoinWith::None,
        }
    }

    pub fn set_dx(&mut self) {
        self.dx = inverse_slope(self.bot, self.top);
    }

    pub fn path_type(&self) -> PathType {
        self.local_min.path_type
    }

    pub fn is_horizontal(&self) -> bool {
        self.top.y == self.bot.y
    }

    pub fn is_joined(&self) -> bool {
        self.join_with != JoinWith::None
    }

    pub fn is_heading_right_horz(&self) -> bool {
        self.dx == -f64::MAX
    }

    pub fn is_heading_left_horz(&self) -> bool {
        self.dx == f64::MAX
    }

    /// The vertex after `vertex_top`, in the direction of this bound.
    pub fn next_vertex(&self, verts: &Vertices) -> VertexIdx {
        if self.wind_dx > 0 {
            verts[self.vertex_top].next
        } else {
            verts[self.vertex_top].prev
        }
    }

    /// The vertex two steps before `vertex_top`, in the direction of this bound.
    pub fn prev_prev_vertex(&self, verts: &Vertices) -> VertexIdx {
        if self.wind_dx > 0 {
            verts[verts[self.vertex_top].prev].prev
        } else {
            verts[verts[self.vertex_top].next].next
        }
    }

    pub fn is_maxima(&self, verts: &Vertices) -> bool {
        verts[self.vertex_top].local_max
    }

    /// Where this edge crosses the horizontal line at `y`, rounded to the
    /// nearest integer.
    pub fn top_x(&self, y: i64) -> i64 {
        if y == self.top.y || self.top.x == self.bot.x {
            return self.top.x;
        }
        if y == self.bot.y || self.top.y == self.bot.y {
            return self.bot.x;
        }
        let num = (Wide::from(self.top.x) - self.bot.x.into()) * (Wide::from(y) - self.bot.y.into());
        let den = Wide::from(self.top.y) - self.bot.y.into();
        num.div_round(den)
            .map_or(self.bot.x, |q| (Wide::from(self.bot.x) + q).into_inner() as i64)
    }
}

impl Sweeper {
    pub(super) fn is_hot(&self, e: ActiveIdx) -> bool {
        self.actives[e].outrec.is_some()
    }

    /// Is this edge the front edge of its output record?
    pub(super) fn is_front(&self, e: ActiveIdx) -> bool {
        self.actives[e]
            .outrec
            .is_some_and(|or| self.out.recs[or].front_edge == Some(e))
    }

    /// Should `newcomer` go to the right of `resident` in the AEL?
    ///
    /// Both edges must currently pass through the same scanline.
    pub(super) fn is_valid_ael_order(&self, resident: ActiveIdx, newcomer: ActiveIdx) -> bool {
        let verts = &self.verts;
        let res = &self.actives[resident];
        let new = &self.actives[newcomer];
        if new.curr_x != res.curr_x {
            return new.curr_x > res.curr_x;
        }

        // Which way do we turn going from the resident's top to the newcomer?
        let d = cross_product(res.top, new.bot, new.top).signum();
        if d != 0 {
            return d < 0;
        }

        // The edges are collinear, so decide by the direction they're about to
        // turn.
        if !res.is_maxima(verts) && res.top.y > new.top.y {
            let next = verts[res.next_vertex(verts)].pt;
            return cross_product(new.bot, res.top, next).signum() <= 0;
        } else if !new.is_maxima(verts) && new.top.y > res.top.y {
            let next = verts[new.next_vertex(verts)].pt;
            return cross_product(new.bot, new.top, next).signum() >= 0;
        }

        let y = new.bot.y;
        let newcomer_is_left = new.is_left_bound;
        if res.bot.y != y || verts[res.local_min.vertex].pt.y != y {
            newcomer_is_left
        } else if res.is_left_bound != newcomer_is_left {
            // The resident was inserted at this scanline too.
            newcomer_is_left
        } else {
            let res_pp = verts[res.prev_prev_vertex(verts)].pt;
            if cross_product(res_pp, res.bot, res.top).is_zero() {
                true
            } else {
                // Compare the turning directions of the other bounds.
                let new_pp = verts[new.prev_prev_vertex(verts)].pt;
                (cross_product(res_pp, new.bot, new_pp).signum() > 0) == newcomer_is_left
            }
        }
    }

    pub(super) fn insert_left_edge(&mut self, e: ActiveIdx) {
        let Some(first) = self.ael_first else {
            self.actives[e].prev_in_ael = None;
            self.actives[e].next_in_ael = None;
            self.ael_first = Some(e);
            return;
        };

        if !self.is_valid_ael_order(first, e) {
            self.actives[e].prev_in_ael = None;
            self.actives[e].next_in_ael = Some(first);
            self.actives[first].prev_in_ael = Some(e);
            self.ael_first = Some(e);
            return;
        }

        let mut e2 = first;
        while let Some(next) = self.actives[e2].next_in_ael {
            if !self.is_valid_ael_order(next, e) {
                break;
            }
            e2 = next;
        }
        let after = self.actives[e2].next_in_ael;
        self.actives[e].next_in_ael = after;
        if let Some(after) = after {
            self.actives[after].prev_in_ael = Some(e);
        }
        self.actives[e].prev_in_ael = Some(e2);
        self.actives[e2].next_in_ael = Some(e);
    }

    /// Inserts `e2` immediately to the right of `e`.
    pub(super) fn insert_right_edge(&mut self, e: ActiveIdx, e2: ActiveIdx) {
        let after = self.actives[e].next_in_ael;
        self.actives[e2].next_in_ael = after;
        if let Some(after) = after {
            self.actives[after].prev_in_ael = Some(e2);
        }
        self.actives[e2].prev_in_ael = Some(e);
        self.actives[e].next_in_ael = Some(e2);
    }

    /// Swaps two edges in the AEL. `e1` must be immediately to the left of `e2`.
    pub(super) fn swap_positions(&mut self, e1: ActiveIdx, e2: ActiveIdx) {
        debug_assert_eq!(self.actives[e1].next_in_ael, Some(e2));
        let next = self.actives[e2].next_in_ael;
        if let Some(next) = next {
            self.actives[next].prev_in_ael = Some(e1);
        }
        let prev = self.actives[e1].prev_in_ael;
        if let Some(prev) = prev {
            self.actives[prev].next_in_ael = Some(e2);
        }
        self.actives[e2].prev_in_ael = prev;
        self.actives[e2].next_in_ael = Some(e1);
        self.actives[e1].prev_in_ael = Some(e2);
        self.actives[e1].next_in_ael = next;
        if prev.is_none() {
            self.ael_first = Some(e2);
        }
    }

    pub(super) fn delete_from_ael(&mut self, e: ActiveIdx) {
        let prev = self.actives[e].prev_in_ael;
        let next = self.actives[e].next_in_ael;
        if prev.is_none() && next.is_none() && self.ael_first != Some(e) {
            // Already gone.
            return;
        }
        match prev {
            Some(prev) => self.actives[prev].next_in_ael = next,
            None => self.ael_first = next,
        }
        if let Some(next) = next {
            self.actives[next].prev_in_ael = prev;
        }
        self.actives[e].prev_in_ael = None;
        self.actives[e].next_in_ael = None;
    }

    /// Computes the winding counts of a newly inserted left bound, from its
    /// neighbors in the AEL.
    ///
    /// `wind_cnt` is the larger (in absolute value) of the winding counts of
    /// the two regions touching the edge; adjacent regions differ by one.
    pub(super) fn set_wind_count_for_closed_path_edge(&mut self, e: ActiveIdx) {
        let path_type = self.actives[e].path_type();
        let wind_dx = self.actives[e].wind_dx;

        // The nearest edge of the same path type, to the left.
        let mut e2 = self.actives[e].prev_in_ael;
        while let Some(prev) = e2 {
            if self.actives[prev].path_type() == path_type {
                break;
            }
            e2 = self.actives[prev].prev_in_ael;
        }

        let mut cursor;
        match e2 {
            None => {
                self.actives[e].wind_cnt = wind_dx;
                cursor = self.ael_first;
            }
            Some(e2) if self.fill_rule == FillRule::EvenOdd => {
                self.actives[e].wind_cnt = wind_dx;
                self.actives[e].wind_cnt2 = self.actives[e2].wind_cnt2;
                cursor = self.actives[e2].next_in_ael;
            }
            Some(e2) => {
                let other = &self.actives[e2];
                let wind_cnt = if other.wind_cnt * other.wind_dx < 0 {
                    // `e` is outside `e2`.
                    if other.wind_cnt.abs() > 1 {
                        // ...but still inside something else.
                        if other.wind_dx * wind_dx < 0 {
                            other.wind_cnt
                        } else {
                            other.wind_cnt + wind_dx
                        }
                    } else {
                        wind_dx
                    }
                } else if other.wind_dx * wind_dx < 0 {
                    // `e` is inside `e2`, and reverses direction.
                    other.wind_cnt
                } else {
                    other.wind_cnt + wind_dx
                };
                let wind_cnt2 = other.wind_cnt2;
                cursor = other.next_in_ael;
                self.actives[e].wind_cnt = wind_cnt;
                self.actives[e].wind_cnt2 = wind_cnt2;
            }
        }

        // Accumulate the other path type's winding count, from the edges
        // between `e2` and `e`.
        let mut wind_cnt2 = self.actives[e].wind_cnt2;
        while let Some(c) = cursor {
            if c == e {
                break;
            }
            let other = &self.actives[c];
            if other.path_type() != path_type {
                if self.fill_rule == FillRule::EvenOdd {
                    wind_cnt2 = if wind_cnt2 == 0 { 1 } else { 0 };
                } else {
                    wind_cnt2 += other.wind_dx;
                }
            }
            cursor = other.next_in_ael;
        }
        self.actives[e].wind_cnt2 = wind_cnt2;
    }

    /// Does this newly inserted edge bound the output region?
    pub(super) fn is_contributing(&self, e: ActiveIdx) -> bool {
        let e = &self.actives[e];
        let own_inside = match self.fill_rule {
            FillRule::EvenOdd => true,
            FillRule::NonZero => e.wind_cnt.abs() == 1,
            FillRule::Positive => e.wind_cnt == 1,
            FillRule::Negative => e.wind_cnt == -1,
        };
        if !own_inside {
            return false;
        }

        // Whether the other path type's region is "empty" at this edge.
        let other_outside = match self.fill_rule {
            FillRule::Positive => e.wind_cnt2 <= 0,
            FillRule::Negative => e.wind_cnt2 >= 0,
            FillRule::EvenOdd | FillRule::NonZero => e.wind_cnt2 == 0,
        };
        match self.op {
            BinaryOp::Intersection => !other_outside,
            BinaryOp::Union => other_outside,
            BinaryOp::Difference => {
                if e.path_type() == PathType::Subject {
                    other_outside
                } else {
                    !other_outside
                }
            }
            BinaryOp::Xor => true,
        }
    }

    /// The closest edge to the left of `e` that is producing output.
    pub(super) fn prev_hot_edge(&self, e: ActiveIdx) -> Option<ActiveIdx> {
        let mut prev = self.actives[e].prev_in_ael;
        while let Some(p) = prev {
            if self.is_hot(p) {
                return Some(p);
            }
            prev = self.actives[p].prev_in_ael;
        }
        None
    }

    /// The edge to the right of `e` that shares its top vertex.
    pub(super) fn maxima_pair(&self, e: ActiveIdx) -> Option<ActiveIdx> {
        let top = self.actives[e].vertex_top;
        let mut e2 = self.actives[e].next_in_ael;
        while let Some(cur) = e2 {
            if self.actives[cur].vertex_top == top {
                return Some(cur);
            }
            e2 = self.actives[cur].next_in_ael;
        }
        None
    }
}

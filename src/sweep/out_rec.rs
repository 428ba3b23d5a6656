//! Output records: the rings of points emitted by the sweep.

use crate::geom::{cross_product, Path, Point, Rect};
use crate::topology::ContourIdx;
use crate::Error;

use super::active::{ActiveIdx, JoinWith};
use super::Sweeper;

typed_arena!(
    /// All the output points emitted by a sweep.
    OutPtVec,
    /// An index into [`OutPtVec`].
    OutPtIdx,
    "op"
);

typed_arena!(
    /// All the output records of a sweep.
    OutRecVec,
    /// An index into [`OutRecVec`].
    OutRecIdx,
    "or"
);

/// An output point, in a circular doubly-linked list.
#[derive(Clone, Debug)]
pub(crate) struct OutPt {
    pub pt: Point,
    pub next: OutPtIdx,
    pub prev: OutPtIdx,
    pub outrec: OutRecIdx,
}

/// One output contour under construction.
///
/// While the sweep is running, an output record that's still open has two
/// hot edges: the front edge adds points at `pts` and the back edge adds
/// points at `pts.next`.
#[derive(Clone, Debug, Default)]
pub(crate) struct OutRec {
    /// The record that (probably) contains this one. This is only a guess
    /// taken from the AEL; the output builder confirms it.
    pub owner: Option<OutRecIdx>,
    pub front_edge: Option<ActiveIdx>,
    pub back_edge: Option<ActiveIdx>,
    /// Any point of the ring, or `None` if the ring was absorbed into another
    /// record or discarded.
    pub pts: Option<OutPtIdx>,
    /// Records that were split off this one because of self-intersections.
    pub splits: Vec<OutRecIdx>,
    pub recursive_split: Option<OutRecIdx>,
    pub bounds: Option<Rect>,
    pub path: Path,
    pub contour: Option<ContourIdx>,
}

/// Output points and records, as produced by the sweep.
#[derive(Debug, Default)]
pub(crate) struct Output {
    pub pts: OutPtVec<OutPt>,
    pub recs: OutRecVec<OutRec>,
}

impl Output {
    pub fn new_outrec(&mut self) -> OutRecIdx {
        self.recs.push(OutRec::default())
    }

    /// Allocates a ring containing a single point.
    pub fn new_pt(&mut self, pt: Point, outrec: OutRecIdx) -> OutPtIdx {
        let idx = OutPtIdx(self.pts.len());
        self.pts.push(OutPt {
            pt,
            next: idx,
            prev: idx,
            outrec,
        })
    }

    /// Follows owners past records that no longer have any points.
    pub fn real_outrec(&self, mut outrec: Option<OutRecIdx>) -> Option<OutRecIdx> {
        while let Some(or) = outrec {
            if self.recs[or].pts.is_some() {
                break;
            }
            outrec = self.recs[or].owner;
        }
        outrec
    }

    /// Makes `new_owner` the owner of `outrec`, without creating ownership
    /// cycles.
    pub fn set_owner(&mut self, outrec: OutRecIdx, new_owner: OutRecIdx) {
        while let Some(o) = self.recs[new_owner].owner {
            if self.recs[o].pts.is_some() {
                break;
            }
            self.recs[new_owner].owner = self.recs[o].owner;
        }
        let mut tmp = Some(new_owner);
        while let Some(t) = tmp {
            if t == outrec {
                break;
            }
            tmp = self.recs[t].owner;
        }
        if tmp.is_some() {
            self.recs[new_owner].owner = self.recs[outrec].owner;
        }
        self.recs[outrec].owner = Some(new_owner);
    }

    /// The number of points in a ring.
    pub fn ring_len(&self, start: OutPtIdx) -> usize {
        let mut n = 1;
        let mut op = self.pts[start].next;
        while op != start {
            n += 1;
            op = self.pts[op].next;
        }
        n
    }

    /// Unlinks a point from its ring, returning the point after it.
    pub fn dispose_pt(&mut self, op: OutPtIdx) -> OutPtIdx {
        let OutPt { next, prev, .. } = self.pts[op];
        self.pts[prev].next = next;
        self.pts[next].prev = prev;
        next
    }

    /// Inserts a new point right after `op`.
    pub fn insert_after(&mut self, op: OutPtIdx, pt: Point) -> OutPtIdx {
        let outrec = self.pts[op].outrec;
        let next = self.pts[op].next;
        let new = self.new_pt(pt, outrec);
        self.pts[new].prev = op;
        self.pts[new].next = next;
        self.pts[next].prev = new;
        self.pts[op].next = new;
        new
    }
}

impl Sweeper {
    /// Adds a point to the end of the output ring that `e` is responsible for.
    pub(super) fn add_out_pt(&mut self, e: ActiveIdx, pt: Point) -> Option<OutPtIdx> {
        let outrec = self.actives[e].outrec?;
        let to_front = self.is_front(e);
        let op_front = self.out.recs[outrec].pts?;
        let op_back = self.out.pts[op_front].next;

        if to_front && pt == self.out.pts[op_front].pt {
            return Some(op_front);
        } else if !to_front && pt == self.out.pts[op_back].pt {
            return Some(op_back);
        }

        let new_op = self.out.new_pt(pt, outrec);
        self.out.pts[op_back].prev = new_op;
        self.out.pts[new_op].prev = op_front;
        self.out.pts[new_op].next = op_back;
        self.out.pts[op_front].next = new_op;
        if to_front {
            self.out.recs[outrec].pts = Some(new_op);
        }
        Some(new_op)
    }

    fn outrec_is_ascending(&self, hot: ActiveIdx) -> bool {
        self.is_front(hot)
    }

    /// Starts a new output record, bounded by `e1` and `e2`.
    pub(super) fn add_local_min_poly(
        &mut self,
        e1: ActiveIdx,
        e2: ActiveIdx,
        pt: Point,
        is_new: bool,
    ) -> OutPtIdx {
        let outrec = self.out.new_outrec();
        self.actives[e1].outrec = Some(outrec);
        self.actives[e2].outrec = Some(outrec);

        // The output orientation is determined by which edge is the front; it
        // has nothing to do with the winding direction of the input.
        let (front, back) = match self.prev_hot_edge(e1) {
            Some(prev_hot) => {
                let owner = self.actives[prev_hot].outrec;
                if let Some(owner) = owner {
                    self.out.set_owner(outrec, owner);
                }
                if self.outrec_is_ascending(prev_hot) == is_new {
                    (e2, e1)
                } else {
                    (e1, e2)
                }
            }
            None => {
                self.out.recs[outrec].owner = None;
                if is_new {
                    (e1, e2)
                } else {
                    (e2, e1)
                }
            }
        };
        self.out.recs[outrec].front_edge = Some(front);
        self.out.recs[outrec].back_edge = Some(back);

        let op = self.out.new_pt(pt, outrec);
        self.out.recs[outrec].pts = Some(op);
        op
    }

    /// Closes off the output bounded by `e1` and `e2`, which meet at `pt`.
    pub(super) fn add_local_max_poly(
        &mut self,
        e1: ActiveIdx,
        e2: ActiveIdx,
        pt: Point,
    ) -> Result<Option<OutPtIdx>, Error> {
        self.split(e1, pt);
        self.split(e2, pt);
        if self.is_front(e1) == self.is_front(e2) {
            return Err(Error::InconsistentTopology { x: pt.x, y: pt.y });
        }

        let result = self.add_out_pt(e1, pt);
        let (Some(or1), Some(or2)) = (self.actives[e1].outrec, self.actives[e2].outrec) else {
            return Ok(result);
        };

        if or1 == or2 {
            self.out.recs[or1].pts = result;
            match self.prev_hot_edge(e1).and_then(|e| self.actives[e].outrec) {
                Some(owner) => self.out.set_owner(or1, owner),
                None => self.out.recs[or1].owner = None,
            }
            self.uncouple_outrec(e1);
            if let Some(owner) = self.out.recs[or1].owner {
                if self.out.recs[owner].front_edge.is_none() {
                    self.out.recs[or1].owner = self.out.real_outrec(Some(owner));
                }
            }
            Ok(self.out.recs[or1].pts)
        } else {
            // Keep the lower index, to preserve the winding orientation.
            if or1.0 < or2.0 {
                self.join_outrec_paths(e1, e2);
            } else {
                self.join_outrec_paths(e2, e1);
            }
            Ok(result)
        }
    }

    /// Appends `e2`'s ring onto `e1`'s, and retires `e2`'s record.
    pub(super) fn join_outrec_paths(&mut self, e1: ActiveIdx, e2: ActiveIdx) {
        let (Some(or1), Some(or2)) = (self.actives[e1].outrec, self.actives[e2].outrec) else {
            return;
        };
        let (Some(p1_st), Some(p2_st)) = (self.out.recs[or1].pts, self.out.recs[or2].pts) else {
            return;
        };
        let p1_end = self.out.pts[p1_st].next;
        let p2_end = self.out.pts[p2_st].next;

        if self.is_front(e1) {
            self.out.pts[p2_end].prev = p1_st;
            self.out.pts[p1_st].next = p2_end;
            self.out.pts[p2_st].next = p1_end;
            self.out.pts[p1_end].prev = p2_st;
            self.out.recs[or1].pts = Some(p2_st);
            let front = self.out.recs[or2].front_edge;
            self.out.recs[or1].front_edge = front;
            if let Some(front) = front {
                self.actives[front].outrec = Some(or1);
            }
        } else {
            self.out.pts[p1_end].prev = p2_st;
            self.out.pts[p2_st].next = p1_end;
            self.out.pts[p1_st].next = p2_end;
            self.out.pts[p2_end].prev = p1_st;
            let back = self.out.recs[or2].back_edge;
            self.out.recs[or1].back_edge = back;
            if let Some(back) = back {
                self.actives[back].outrec = Some(or1);
            }
        }

        // The joined points still claim to belong to `or2`; the output
        // builder doesn't care.
        self.out.recs[or2].front_edge = None;
        self.out.recs[or2].back_edge = None;
        self.out.recs[or2].pts = None;
        self.out.set_owner(or2, or1);

        // Both edges are either maxima about to leave the AEL, or joined and
        // silent until they split.
        self.actives[e1].outrec = None;
        self.actives[e2].outrec = None;
    }

    /// Detaches a finished output record from its two edges.
    fn uncouple_outrec(&mut self, e: ActiveIdx) {
        let Some(outrec) = self.actives[e].outrec else {
            return;
        };
        for side in [self.out.recs[outrec].front_edge, self.out.recs[outrec].back_edge]
            .into_iter()
            .flatten()
        {
            self.actives[side].outrec = None;
        }
        self.out.recs[outrec].front_edge = None;
        self.out.recs[outrec].back_edge = None;
    }

    /// Exchanges the output records of two edges that are crossing.
    pub(super) fn swap_outrecs(&mut self, e1: ActiveIdx, e2: ActiveIdx) {
        let or1 = self.actives[e1].outrec;
        let or2 = self.actives[e2].outrec;
        if or1 == or2 {
            if let Some(or) = or1 {
                let rec = &mut self.out.recs[or];
                std::mem::swap(&mut rec.front_edge, &mut rec.back_edge);
            }
            return;
        }
        if let Some(or1) = or1 {
            let rec = &mut self.out.recs[or1];
            if rec.front_edge == Some(e1) {
                rec.front_edge = Some(e2);
            } else {
                rec.back_edge = Some(e2);
            }
        }
        if let Some(or2) = or2 {
            let rec = &mut self.out.recs[or2];
            if rec.front_edge == Some(e2) {
                rec.front_edge = Some(e1);
            } else {
                rec.back_edge = Some(e1);
            }
        }
        self.actives[e1].outrec = or2;
        self.actives[e2].outrec = or1;
    }

    /// Starts a new output record between `e` and the edge it was joined to,
    /// now that they're going separate ways at `pt`.
    pub(super) fn split(&mut self, e: ActiveIdx, pt: Point) {
        let (left, right) = match self.actives[e].join_with {
            JoinWith::None => return,
            JoinWith::Left => (self.actives[e].prev_in_ael, Some(e)),
            JoinWith::Right => (Some(e), self.actives[e].next_in_ael),
        };
        self.actives[e].join_with = JoinWith::None;
        let (Some(left), Some(right)) = (left, right) else {
            return;
        };
        self.actives[left].join_with = JoinWith::None;
        self.actives[right].join_with = JoinWith::None;
        self.add_local_min_poly(left, right, pt, true);
    }

    /// Joins `e` to the edge on its left if the two coincide at `pt`.
    ///
    /// With `check_curr_x`, the left edge's `curr_x` may be stale and the
    /// test is done against its line instead.
    pub(super) fn check_join_left(
        &mut self,
        e: ActiveIdx,
        pt: Point,
        check_curr_x: bool,
    ) -> Result<(), Error> {
        let Some(prev) = self.actives[e].prev_in_ael else {
            return Ok(());
        };
        if self.coincide(e, prev, pt, check_curr_x) {
            self.join_coincident(prev, e, pt)?;
        }
        Ok(())
    }

    /// Joins `e` to the edge on its right if the two coincide at `pt`.
    pub(super) fn check_join_right(
        &mut self,
        e: ActiveIdx,
        pt: Point,
        check_curr_x: bool,
    ) -> Result<(), Error> {
        let Some(next) = self.actives[e].next_in_ael else {
            return Ok(());
        };
        if self.coincide(e, next, pt, check_curr_x) {
            self.join_coincident(e, next, pt)?;
        }
        Ok(())
    }

    /// Are `e` and its neighbor `other` two hot, non-horizontal edges lying
    /// along the same line through `pt`?
    fn coincide(&self, e: ActiveIdx, other: ActiveIdx, pt: Point, check_curr_x: bool) -> bool {
        if !self.is_hot(e) || !self.is_hot(other) {
            return false;
        }
        let (a, b) = (&self.actives[e], &self.actives[other]);
        if a.is_horizontal() || b.is_horizontal() {
            return false;
        }
        // Edges that only meet near their tops aren't worth joining.
        if (pt.y < a.top.y + 2 || pt.y < b.top.y + 2) && (a.bot.y > pt.y || b.bot.y > pt.y) {
            return false;
        }
        if check_curr_x {
            if perpendicular_dist_sqrd(pt, b.bot, b.top) > 0.25 {
                return false;
            }
        } else if a.curr_x != b.curr_x {
            return false;
        }
        cross_product(a.top, pt, b.top).is_zero()
    }

    /// Merges the outputs of two coincident neighbors, which then stay
    /// joined until one of them moves on.
    fn join_coincident(
        &mut self,
        left: ActiveIdx,
        right: ActiveIdx,
        pt: Point,
    ) -> Result<(), Error> {
        let (Some(or_left), Some(or_right)) =
            (self.actives[left].outrec, self.actives[right].outrec)
        else {
            return Ok(());
        };
        if or_left == or_right {
            self.add_local_max_poly(left, right, pt)?;
        } else if or_left.0 < or_right.0 {
            self.join_outrec_paths(left, right);
        } else {
            self.join_outrec_paths(right, left);
        }
        self.actives[left].join_with = JoinWith::Right;
        self.actives[right].join_with = JoinWith::Left;
        Ok(())
    }
}

/// The squared distance from `pt` to the line through `a` and `b`.
fn perpendicular_dist_sqrd(pt: Point, a: Point, b: Point) -> f64 {
    let (px, py) = ((pt.x - a.x) as f64, (pt.y - a.y) as f64);
    let (dx, dy) = ((b.x - a.x) as f64, (b.y - a.y) as f64);
    if dx == 0.0 && dy == 0.0 {
        return 0.0;
    }
    let cross = px * dy - dx * py;
    cross * cross / (dx * dx + dy * dy)
}

//! Crossing edges: finding the crossings in a scanbeam, and resolving them.

use crate::geom::{line_intersection, Point};
use crate::vertices::PathType;
use crate::{BinaryOp, Error, FillRule};

use super::active::ActiveIdx;
use super::Sweeper;

/// Two edges that cross within the current scanbeam. `left` is to the left of
/// `right` at the bottom of the beam.
#[derive(Clone, Copy, Debug)]
struct IntersectNode {
    left: ActiveIdx,
    right: ActiveIdx,
    pt: Point,
}

impl Sweeper {
    /// Finds and processes all the crossings between the bottom of the
    /// current scanbeam and `top_y`.
    ///
    /// Afterwards, every edge's `curr_x` is its position at `top_y` and the
    /// AEL is sorted by it.
    pub(super) fn do_intersections(&mut self, top_y: i64) -> Result<(), Error> {
        let mut nodes = self.build_intersect_list(top_y)?;
        if nodes.is_empty() {
            return Ok(());
        }

        // Bottom-up, then left to right.
        nodes.sort_by(|a, b| b.pt.y.cmp(&a.pt.y).then(a.pt.x.cmp(&b.pt.x)));

        for i in 0..nodes.len() {
            // Crossings can only be processed between neighbors, so look ahead
            // for one that's ready.
            if !self.adjacent(nodes[i]) {
                let j = (i + 1..nodes.len())
                    .find(|&j| self.adjacent(nodes[j]))
                    .ok_or(Error::InconsistentTopology {
                        x: nodes[i].pt.x,
                        y: nodes[i].pt.y,
                    })?;
                nodes.swap(i, j);
            }

            let IntersectNode { left, right, pt } = nodes[i];
            let (left, right) = if self.actives[left].next_in_ael == Some(right) {
                (left, right)
            } else {
                (right, left)
            };
            self.intersect_edges(left, right, pt)?;
            self.swap_positions(left, right);
            self.actives[left].curr_x = pt.x;
            self.actives[right].curr_x = pt.x;
            self.check_join_left(right, pt, true)?;
            self.check_join_right(left, pt, true)?;
        }
        Ok(())
    }

    fn adjacent(&self, node: IntersectNode) -> bool {
        let e = &self.actives[node.left];
        e.next_in_ael == Some(node.right) || e.prev_in_ael == Some(node.right)
    }

    /// Moves every edge to its position at `top_y`, and records a crossing
    /// for every pair of edges whose order changes.
    ///
    /// This is an insertion sort, so every recorded pair is adjacent at the
    /// moment it's swapped; it records exactly the inversions.
    fn build_intersect_list(&mut self, top_y: i64) -> Result<Vec<IntersectNode>, Error> {
        let mut order = Vec::new();
        let mut e = self.ael_first;
        while let Some(cur) = e {
            let x = self.actives[cur].top_x(top_y);
            self.actives[cur].curr_x = x;
            order.push(cur);
            e = self.actives[cur].next_in_ael;
        }
        if order.len() < 2 {
            return Ok(Vec::new());
        }

        let mut nodes = Vec::new();
        for i in 1..order.len() {
            let mut j = i;
            while j > 0 && self.actives[order[j]].curr_x < self.actives[order[j - 1]].curr_x {
                let node = self.new_intersect_node(order[j - 1], order[j], top_y)?;
                nodes.push(node);
                order.swap(j - 1, j);
                j -= 1;
            }
        }
        Ok(nodes)
    }

    fn new_intersect_node(
        &self,
        left: ActiveIdx,
        right: ActiveIdx,
        top_y: i64,
    ) -> Result<IntersectNode, Error> {
        let e1 = &self.actives[left];
        let e2 = &self.actives[right];
        let mut pt = line_intersection(e1.bot, e1.top, e2.bot, e2.top)?
            .unwrap_or(Point::new(e1.curr_x, top_y));

        // The crossing of the (rounded) edges can land slightly outside the
        // beam. Pull it back in, along the steeper edge.
        if pt.y > self.bot_y || pt.y < top_y {
            pt.y = pt.y.clamp(top_y, self.bot_y);
            pt.x = if e1.dx.abs() < e2.dx.abs() {
                e1.top_x(pt.y)
            } else {
                e2.top_x(pt.y)
            };
        }
        Ok(IntersectNode { left, right, pt })
    }

    /// The winding count of `e`'s own path type, in the form the fill rule
    /// cares about.
    fn effective_wind_cnt(&self, cnt: i32) -> i32 {
        match self.fill_rule {
            FillRule::EvenOdd | FillRule::NonZero => cnt.abs(),
            FillRule::Positive => cnt,
            FillRule::Negative => -cnt,
        }
    }

    /// Handles `e1` crossing over `e2` at `pt`. `e1` must be immediately to
    /// the left of `e2`; the caller swaps them afterwards.
    pub(super) fn intersect_edges(
        &mut self,
        e1: ActiveIdx,
        e2: ActiveIdx,
        pt: Point,
    ) -> Result<(), Error> {
        self.split(e1, pt);
        self.split(e2, pt);

        let even_odd = self.fill_rule == FillRule::EvenOdd;
        let same_type = self.actives[e1].path_type() == self.actives[e2].path_type();
        let (wind_dx1, wind_dx2) = (self.actives[e1].wind_dx, self.actives[e2].wind_dx);

        if same_type {
            if even_odd {
                let a = self.actives[e1].wind_cnt;
                self.actives[e1].wind_cnt = self.actives[e2].wind_cnt;
                self.actives[e2].wind_cnt = a;
            } else {
                let a = &mut self.actives[e1];
                if a.wind_cnt + wind_dx2 == 0 {
                    a.wind_cnt = -a.wind_cnt;
                } else {
                    a.wind_cnt += wind_dx2;
                }
                let b = &mut self.actives[e2];
                if b.wind_cnt - wind_dx1 == 0 {
                    b.wind_cnt = -b.wind_cnt;
                } else {
                    b.wind_cnt -= wind_dx1;
                }
            }
        } else if even_odd {
            let a = &mut self.actives[e1];
            a.wind_cnt2 = if a.wind_cnt2 == 0 { 1 } else { 0 };
            let b = &mut self.actives[e2];
            b.wind_cnt2 = if b.wind_cnt2 == 0 { 1 } else { 0 };
        } else {
            self.actives[e1].wind_cnt2 += wind_dx2;
            self.actives[e2].wind_cnt2 -= wind_dx1;
        }

        let cnt1 = self.effective_wind_cnt(self.actives[e1].wind_cnt);
        let cnt2 = self.effective_wind_cnt(self.actives[e2].wind_cnt);
        let in_01 = |c: i32| c == 0 || c == 1;
        let (hot1, hot2) = (self.is_hot(e1), self.is_hot(e2));

        if (!hot1 && !in_01(cnt1)) || (!hot2 && !in_01(cnt2)) {
            return Ok(());
        }

        if hot1 && hot2 {
            if !in_01(cnt1) || !in_01(cnt2) || (!same_type && self.op != BinaryOp::Xor) {
                self.add_local_max_poly(e1, e2, pt)?;
            } else if self.is_front(e1) || self.actives[e1].outrec == self.actives[e2].outrec {
                // Also splits polygons that only touch at a vertex.
                self.add_local_max_poly(e1, e2, pt)?;
                self.add_local_min_poly(e1, e2, pt, false);
            } else {
                self.add_out_pt(e1, pt);
                self.add_out_pt(e2, pt);
                self.swap_outrecs(e1, e2);
            }
        } else if hot1 {
            self.add_out_pt(e1, pt);
            self.swap_outrecs(e1, e2);
        } else if hot2 {
            self.add_out_pt(e2, pt);
            self.swap_outrecs(e1, e2);
        } else {
            // Neither edge is hot, so a new output region may start here.
            let wc2_1 = self.effective_wind_cnt(self.actives[e1].wind_cnt2);
            let wc2_2 = self.effective_wind_cnt(self.actives[e2].wind_cnt2);

            if !same_type {
                self.add_local_min_poly(e1, e2, pt, false);
            } else if cnt1 == 1 && cnt2 == 1 {
                let starts = match self.op {
                    BinaryOp::Union => wc2_1 <= 0 && wc2_2 <= 0,
                    BinaryOp::Difference => match self.actives[e1].path_type() {
                        PathType::Clip => wc2_1 > 0 && wc2_2 > 0,
                        PathType::Subject => wc2_1 <= 0 && wc2_2 <= 0,
                    },
                    BinaryOp::Xor => true,
                    BinaryOp::Intersection => wc2_1 > 0 && wc2_2 > 0,
                };
                if starts {
                    self.add_local_min_poly(e1, e2, pt, false);
                }
            }
        }
        Ok(())
    }
}

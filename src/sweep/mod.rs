//! The scanline sweep.
//!
//! The sweep line starts at the largest `y` and moves towards smaller `y`,
//! stopping at every `y` where something happens: a local minimum starts two
//! new edges, or an edge ends. Between two such stops (a "scanbeam") the
//! active edges are straight, so their crossings can be found by comparing
//! their order at the bottom and the top of the beam.
//!
//! Every active edge carries winding counts for both operands, and so it
//! knows whether the regions on its two sides are in the output. Edges that
//! separate an output region from a non-output region are "hot": they emit
//! points into an output record as the sweep passes over their vertices and
//! crossings. The output records are turned into contours by
//! [`crate::topology`].

use std::collections::BinaryHeap;

use crate::vertices::{LocalMinimum, Vertices};
use crate::{BinaryOp, Error, FillRule};

mod active;
mod horizontal;
mod intersect;
mod out_rec;

use active::{Active, ActiveIdx, ActiveVec};
pub(crate) use out_rec::{OutPtIdx, OutRecIdx, Output};

/// The state of one sweep.
pub(crate) struct Sweeper {
    verts: Vertices,
    op: BinaryOp,
    fill_rule: FillRule,
    preserve_collinear: bool,
    actives: ActiveVec<Active>,
    /// The leftmost edge of the AEL.
    ael_first: Option<ActiveIdx>,
    /// The `y` coordinates we still need to stop at.
    scanlines: BinaryHeap<i64>,
    /// Horizontal edges waiting to be processed at the current scanline.
    horizontals: Vec<ActiveIdx>,
    /// Index of the first local minimum that hasn't been inserted yet.
    next_minimum: usize,
    /// The bottom of the current scanbeam.
    bot_y: i64,
    out: Output,
}

impl Sweeper {
    pub(crate) fn new(
        verts: Vertices,
        op: BinaryOp,
        fill_rule: FillRule,
        preserve_collinear: bool,
    ) -> Self {
        Sweeper {
            actives: ActiveVec::with_capacity(verts.minima().len() * 2),
            verts,
            op,
            fill_rule,
            preserve_collinear,
            ael_first: None,
            scanlines: BinaryHeap::new(),
            horizontals: Vec::new(),
            next_minimum: 0,
            bot_y: 0,
            out: Output::default(),
        }
    }

    /// Runs the sweep to completion, returning the output records.
    pub(crate) fn run(mut self) -> Result<Output, Error> {
        self.verts.sort_minima();
        let verts = &self.verts;
        self.scanlines
            .extend(verts.minima().iter().map(|lm| verts[lm.vertex].pt.y));

        let Some(mut y) = self.pop_scanline() else {
            return Ok(self.out);
        };
        loop {
            self.insert_local_minima(y)?;
            while let Some(h) = self.horizontals.pop() {
                self.do_horizontal(h)?;
            }
            self.bot_y = y;
            match self.pop_scanline() {
                Some(top) => y = top,
                None => break,
            }
            self.do_intersections(y)?;
            self.do_top_of_scanbeam(y)?;
            while let Some(h) = self.horizontals.pop() {
                self.do_horizontal(h)?;
            }
        }
        debug_assert!(self.ael_first.is_none());
        Ok(self.out)
    }

    fn insert_scanline(&mut self, y: i64) {
        self.scanlines.push(y);
    }

    fn pop_scanline(&mut self) -> Option<i64> {
        let y = self.scanlines.pop()?;
        while self.scanlines.peek() == Some(&y) {
            self.scanlines.pop();
        }
        Some(y)
    }

    fn pop_local_minimum(&mut self, y: i64) -> Option<LocalMinimum> {
        let lm = *self.verts.minima().get(self.next_minimum)?;
        if self.verts[lm.vertex].pt.y != y {
            return None;
        }
        self.next_minimum += 1;
        Some(lm)
    }

    /// Starts the two bounds of every local minimum at `bot_y`.
    fn insert_local_minima(&mut self, bot_y: i64) -> Result<(), Error> {
        while let Some(lm) = self.pop_local_minimum(bot_y) {
            let descending = Active::new(lm, &self.verts, false);
            let ascending = Active::new(lm, &self.verts, true);

            // Decide which bound is on the left.
            let swap = if descending.is_horizontal() {
                descending.is_heading_right_horz()
            } else if ascending.is_horizontal() {
                ascending.is_heading_left_horz()
            } else {
                descending.dx < ascending.dx
            };
            let (mut left, mut right) = if swap {
                (ascending, descending)
            } else {
                (descending, ascending)
            };
            left.is_left_bound = true;
            right.is_left_bound = false;
            let left = self.actives.push(left);
            let right = self.actives.push(right);

            self.insert_left_edge(left);
            self.set_wind_count_for_closed_path_edge(left);
            let contributing = self.is_contributing(left);

            self.actives[right].wind_cnt = self.actives[left].wind_cnt;
            self.actives[right].wind_cnt2 = self.actives[left].wind_cnt2;
            self.insert_right_edge(left, right);
            if contributing {
                let bot = self.actives[left].bot;
                self.add_local_min_poly(left, right, bot, true);
                if !self.actives[left].is_horizontal() {
                    self.check_join_left(left, bot, false)?;
                }
            }

            // The right bound may need to move right past edges that
            // coincide with it at this point.
            while let Some(next) = self.actives[right].next_in_ael {
                if !self.is_valid_ael_order(next, right) {
                    break;
                }
                let bot = self.actives[right].bot;
                self.intersect_edges(right, next, bot)?;
                self.swap_positions(right, next);
            }

            for e in [right, left] {
                if self.actives[e].is_horizontal() {
                    self.horizontals.push(e);
                } else {
                    if e == right {
                        let bot = self.actives[right].bot;
                        self.check_join_right(right, bot, false)?;
                    }
                    let top = self.actives[e].top.y;
                    self.insert_scanline(top);
                }
            }
        }
        Ok(())
    }

    /// Moves every edge to the top of the scanbeam, handling the edges that
    /// end there.
    fn do_top_of_scanbeam(&mut self, y: i64) -> Result<(), Error> {
        let mut e = self.ael_first;
        while let Some(cur) = e {
            // Horizontals were all handled at the bottom of the beam.
            let top = self.actives[cur].top;
            if top.y == y {
                self.actives[cur].curr_x = top.x;
                if self.actives[cur].is_maxima(&self.verts) {
                    e = self.do_maxima(cur)?;
                    continue;
                }
                // An intermediate vertex.
                if self.is_hot(cur) {
                    self.add_out_pt(cur, top);
                }
                self.update_edge_into_ael(cur)?;
                if self.actives[cur].is_horizontal() {
                    self.horizontals.push(cur);
                }
            } else {
                self.actives[cur].curr_x = self.actives[cur].top_x(y);
            }
            e = self.actives[cur].next_in_ael;
        }
        Ok(())
    }

    /// Handles an edge reaching a local maximum. Returns the next edge to
    /// look at.
    fn do_maxima(&mut self, e: ActiveIdx) -> Result<Option<ActiveIdx>, Error> {
        let prev = self.actives[e].prev_in_ael;
        let mut next = self.actives[e].next_in_ael;
        let Some(max_pair) = self.maxima_pair(e) else {
            // The pair is horizontal, and will handle this.
            return Ok(next);
        };
        let top = self.actives[e].top;
        self.split(e, top);
        let pair_top = self.actives[max_pair].top;
        self.split(max_pair, pair_top);

        // Anything between the pair has to cross over the maximum.
        while let Some(n) = next {
            if n == max_pair {
                break;
            }
            let top = self.actives[e].top;
            self.intersect_edges(e, n, top)?;
            self.swap_positions(e, n);
            next = self.actives[e].next_in_ael;
        }

        if self.is_hot(e) {
            let top = self.actives[e].top;
            self.add_local_max_poly(e, max_pair, top)?;
        }
        self.delete_from_ael(e);
        self.delete_from_ael(max_pair);
        Ok(match prev {
            Some(prev) => self.actives[prev].next_in_ael,
            None => self.ael_first,
        })
    }

    /// Moves an edge on to the next edge of its bound.
    fn update_edge_into_ael(&mut self, e: ActiveIdx) -> Result<(), Error> {
        let next = self.actives[e].next_vertex(&self.verts);
        let pt = self.verts[next].pt;
        let a = &mut self.actives[e];
        a.bot = a.top;
        a.vertex_top = next;
        a.top = pt;
        a.curr_x = a.bot.x;
        a.set_dx();
        let bot = a.bot;
        self.split(e, bot);

        if self.actives[e].is_horizontal() {
            self.trim_horz(e);
            return Ok(());
        }
        let y = self.actives[e].top.y;
        self.insert_scanline(y);
        // The right neighbor hasn't been moved up to this scanline yet.
        self.check_join_left(e, bot, false)?;
        self.check_join_right(e, bot, true)
    }

    /// The AEL, left to right.
    #[cfg(test)]
    fn ael(&self) -> Vec<ActiveIdx> {
        let mut ret = Vec::new();
        let mut e = self.ael_first;
        while let Some(cur) = e {
            ret.push(cur);
            e = self.actives[cur].next_in_ael;
        }
        ret
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geom::Point;
    use crate::vertices::PathType;

    fn p(x: i64, y: i64) -> Point {
        Point::new(x, y)
    }

    fn sweeper(subject: Vec<Vec<Point>>, clip: Vec<Vec<Point>>, op: BinaryOp) -> Sweeper {
        let mut verts = Vertices::default();
        verts.add_paths(&subject, PathType::Subject).unwrap();
        verts.add_paths(&clip, PathType::Clip).unwrap();
        Sweeper::new(verts, op, FillRule::NonZero, false)
    }

    // The number of output records that still own points.
    fn live_records(out: &Output) -> usize {
        out.recs.iter().filter(|(_, r)| r.pts.is_some()).count()
    }

    #[test]
    fn empty() {
        let out = sweeper(vec![], vec![], BinaryOp::Union).run().unwrap();
        assert!(out.recs.is_empty());
    }

    #[test]
    fn one_square() {
        let sq = vec![p(0, 0), p(0, 5), p(5, 5), p(5, 0)];
        let out = sweeper(vec![sq], vec![], BinaryOp::Union).run().unwrap();
        assert_eq!(live_records(&out), 1);
    }

    #[test]
    fn ael_starts_sorted() {
        // Two triangles side by side with minima at the same y.
        let left = vec![p(0, 10), p(5, 0), p(10, 10)];
        let right = vec![p(20, 10), p(25, 0), p(30, 10)];
        let mut sw = sweeper(vec![right, left], vec![], BinaryOp::Union);
        sw.verts.sort_minima();
        sw.insert_local_minima(10).unwrap();
        let xs: Vec<i64> = sw.ael().iter().map(|&e| sw.actives[e].curr_x).collect();
        let mut sorted = xs.clone();
        sorted.sort();
        assert_eq!(xs, sorted);
        // The two bottoms are horizontal, so they're queued.
        assert_eq!(sw.horizontals.len(), 2);
    }

    #[test]
    fn coincident_edges_are_joined() {
        let a = vec![p(0, 0), p(10, 0), p(10, 10), p(0, 10)];
        let b = vec![p(10, 0), p(20, 0), p(20, 10), p(10, 10)];
        for subject in [vec![a.clone(), b.clone()], vec![b, a]] {
            let mut sw = sweeper(subject, vec![], BinaryOp::Union);
            sw.verts.sort_minima();
            sw.insert_local_minima(10).unwrap();
            while let Some(h) = sw.horizontals.pop() {
                sw.do_horizontal(h).unwrap();
            }
            // The two edges along x = 10 are now silent.
            let joined = sw.ael().iter().filter(|&&e| sw.actives[e].is_joined()).count();
            assert_eq!(joined, 2);

            let out = Sweeper::new(sw.verts, BinaryOp::Union, FillRule::NonZero, false)
                .run()
                .unwrap();
            assert_eq!(live_records(&out), 1);
        }
    }

    #[test]
    fn disjoint_intersection_is_empty() {
        let a = vec![p(0, 0), p(0, 5), p(5, 5), p(5, 0)];
        let b = vec![p(10, 0), p(10, 5), p(15, 5), p(15, 0)];
        let out = sweeper(vec![a], vec![b], BinaryOp::Intersection)
            .run()
            .unwrap();
        assert_eq!(live_records(&out), 0);
    }
}

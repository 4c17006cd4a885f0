use std::cmp::{Ordering, Reverse};
use std::collections::{BinaryHeap, HashMap, HashSet};

use slotmap::SlotMap;
use tracing::{debug, trace};

use crate::collections::{NodeKey, RbTree};
use crate::error::{OperationError, Result};
use crate::geometry::Segment;
use crate::math::{cmp_points, is_finite, points_eq, Point2, TOLERANCE};

use super::event::{status_order, EventKey, EventKind, Queued, SweepEvent};

/// Finds the crossing points of a set of segments with a Bentley–Ottmann
/// sweep.
///
/// A vertical line sweeps left to right. Segments currently cut by the line
/// are kept in a red-black tree ordered bottom to top, and only segments
/// that become neighbours in that order are tested against each other.
/// When segments cross, they all restart from the crossing point so their
/// order flips.
///
/// Parallel and collinear pairs report nothing. Vertical segments are
/// ordered by their lower endpoint only, so crossings among several vertical
/// segments sharing an `x` may be missed.
pub struct SegmentIntersections {
    segments: Vec<Segment>,
}

impl SegmentIntersections {
    #[must_use]
    pub fn new(segments: Vec<Segment>) -> Self {
        Self { segments }
    }

    /// Executes the sweep, returning the distinct crossing points sorted by
    /// `x`, then `y`.
    ///
    /// # Errors
    ///
    /// Returns [`OperationError::InvalidInput`] if any coordinate is
    /// non-finite.
    pub fn execute(&self) -> Result<Vec<Point2>> {
        let mut points: Vec<Point2> = self
            .execute_pairs()?
            .into_iter()
            .map(|(_, _, p)| p)
            .collect();
        points.sort_by(cmp_points);
        points.dedup_by(|a, b| points_eq(a, b, TOLERANCE));
        Ok(points)
    }

    /// Executes the sweep, returning each crossing as `(i, j, point)` with
    /// `i < j` indexing the input segments.
    ///
    /// Every intersecting pair appears exactly once, sorted by point.
    ///
    /// # Errors
    ///
    /// Returns [`OperationError::InvalidInput`] if any coordinate is
    /// non-finite.
    pub fn execute_pairs(&self) -> Result<Vec<(usize, usize, Point2)>> {
        self.validate()?;

        let mut sweep = Sweep::new(&self.segments);
        sweep.run();
        debug!(
            segments = self.segments.len(),
            events = sweep.events.len(),
            crossings = sweep.found.len(),
            "sweep complete"
        );

        let mut found = sweep.found;
        found.sort_by(|a, b| {
            cmp_points(&a.2, &b.2)
                .then(a.0.cmp(&b.0))
                .then(a.1.cmp(&b.1))
        });
        Ok(found)
    }

    fn validate(&self) -> Result<()> {
        if let Some(i) = self
            .segments
            .iter()
            .position(|s| !is_finite(s.start()) || !is_finite(s.end()))
        {
            return Err(OperationError::InvalidInput(format!(
                "segment {i} has a non-finite coordinate"
            ))
            .into());
        }
        Ok(())
    }
}

/// State of one sweep run.
struct Sweep<'a> {
    segments: &'a [Segment],
    events: SlotMap<EventKey, SweepEvent>,
    queue: BinaryHeap<Reverse<Queued>>,
    /// Active `Left` events, bottom to top.
    status: RbTree<EventKey>,
    /// Tree node currently holding each active `Left` event.
    active: HashMap<EventKey, NodeKey>,
    /// `Right` event of each input segment.
    right_of: Vec<EventKey>,
    visited: HashSet<(usize, usize)>,
    found: Vec<(usize, usize, Point2)>,
    /// Point the latest crossing batch restarted its pieces from.
    last_crossing: Option<Point2>,
}

impl<'a> Sweep<'a> {
    fn new(segments: &'a [Segment]) -> Self {
        let mut sweep = Self {
            segments,
            events: SlotMap::with_capacity_and_key(segments.len() * 2),
            queue: BinaryHeap::with_capacity(segments.len() * 2),
            status: RbTree::new(),
            active: HashMap::new(),
            right_of: Vec::with_capacity(segments.len()),
            visited: HashSet::new(),
            found: Vec::new(),
            last_crossing: None,
        };
        for (i, segment) in segments.iter().enumerate() {
            let left = sweep.events.insert(SweepEvent::left(i, *segment));
            let right = sweep.events.insert(SweepEvent::right(i, *segment, left));
            sweep.events[left].twin = Some(right);
            sweep.right_of.push(right);
            sweep.push(left);
            sweep.push(right);
        }
        sweep
    }

    fn push(&mut self, key: EventKey) {
        self.queue.push(Reverse(Queued::new(key, &self.events[key])));
    }

    fn run(&mut self) {
        while let Some(Reverse(next)) = self.queue.pop() {
            if let Some(event) = self.events.get(next.key) {
                trace!(
                    kind = ?event.kind,
                    x = event.point.x,
                    y = event.point.y,
                    segment = event.segment,
                    "sweep event"
                );
            }
            match next.kind {
                EventKind::Left => self.handle_left(next.key),
                EventKind::Intersection => self.handle_crossings(next.key),
                EventKind::Right => self.handle_right(next.key),
            }
        }
    }

    fn handle_left(&mut self, key: EventKey) {
        let x = self.events[key].point.x;
        let events = &self.events;
        let node = self
            .status
            .insert_by(key, |a, b| status_order(&events[*a], &events[*b], x));
        self.active.insert(key, node);

        if let Some(&below) = self.status.predecessor(node).and_then(|n| self.status.get(n)) {
            self.check(below, key);
        }
        if let Some(&above) = self.status.successor(node).and_then(|n| self.status.get(n)) {
            self.check(key, above);
        }
    }

    fn handle_right(&mut self, key: EventKey) {
        let Some(left) = self.events[key].twin else {
            return;
        };
        let Some(&node) = self.active.get(&left) else {
            return;
        };
        let below = self
            .status
            .predecessor(node)
            .and_then(|n| self.status.get(n))
            .copied();
        let above = self
            .status
            .successor(node)
            .and_then(|n| self.status.get(n))
            .copied();
        if let (Some(below), Some(above)) = (below, above) {
            self.check(below, above);
        }
        self.remove_active(left);
    }

    /// Restarts every segment crossing at this point so they are reinserted
    /// in their order right of it.
    ///
    /// Crossings computed from different pairs may land a few ulps apart.
    /// All crossing events within [`TOLERANCE`] are taken as one batch and
    /// every piece restarts from the same point, so their order there is
    /// decided by slope alone.
    fn handle_crossings(&mut self, key: EventKey) {
        let point = self.events[key].point;
        let mut origins = Vec::new();
        self.collect_pair(key, &mut origins);

        let mut deferred = Vec::new();
        while let Some(&Reverse(next)) = self.queue.peek() {
            if !points_eq(&next.point, &point, TOLERANCE) {
                break;
            }
            self.queue.pop();
            if next.kind == EventKind::Intersection {
                self.collect_pair(next.key, &mut origins);
            } else {
                deferred.push(next);
            }
        }
        origins.sort_unstable();
        origins.dedup();
        trace!(x = point.x, y = point.y, segments = origins.len(), "crossing batch");

        self.last_crossing = Some(point);
        for origin in origins {
            self.restart(origin, point);
        }
        self.queue.extend(deferred.into_iter().map(Reverse));
    }

    fn collect_pair(&self, key: EventKey, origins: &mut Vec<usize>) {
        let event = &self.events[key];
        origins.push(event.segment);
        origins.extend(event.other);
    }

    /// Replaces the active piece of `origin` by the part right of `point`.
    fn restart(&mut self, origin: usize, point: Point2) {
        let right = self.right_of[origin];
        let end = self.events[right].point;
        if cmp_points(&point, &end) == Ordering::Greater {
            return;
        }
        let Some(current) = self.events[right].twin else {
            return;
        };
        if !self.remove_active(current) {
            return;
        }
        let mut restart = SweepEvent::left(origin, Segment::new(point, end));
        restart.twin = Some(right);
        let restart = self.events.insert(restart);
        self.events[right].twin = Some(restart);
        self.push(restart);
    }

    /// Tests two active pieces and schedules their crossing, once per pair
    /// of input segments.
    ///
    /// The reported point is the pair's own crossing. The event is placed on
    /// the last processed crossing instead when the two coincide within
    /// [`TOLERANCE`], so it joins the same batch.
    fn check(&mut self, a: EventKey, b: EventKey) {
        let (i, j) = (self.events[a].segment, self.events[b].segment);
        if i == j {
            return;
        }
        let pair = (i.min(j), i.max(j));
        if self.visited.contains(&pair) {
            return;
        }
        let Some(point) = self.segments[pair.0].intersection(&self.segments[pair.1]) else {
            return;
        };
        self.visited.insert(pair);
        self.found.push((pair.0, pair.1, point));
        let at = match self.last_crossing {
            Some(last) if points_eq(&last, &point, TOLERANCE) => last,
            _ => point,
        };
        let crossing = self
            .events
            .insert(SweepEvent::intersection(at, pair.0, pair.1));
        self.push(crossing);
    }

    /// Removes an active `Left` event from the status tree.
    fn remove_active(&mut self, left: EventKey) -> bool {
        let Some(node) = self.active.remove(&left) else {
            return false;
        };
        self.status.remove_node(node);
        // A two-child removal moves the predecessor's value into `node`.
        if let Some(&moved) = self.status.get(node) {
            self.active.insert(moved, node);
        }
        true
    }
}

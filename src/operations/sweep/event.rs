use std::cmp::Ordering;

use crate::geometry::Segment;
use crate::math::{cmp_points, Point2};

slotmap::new_key_type! {
    /// Handle to an event in a sweep run's event table.
    pub(super) struct EventKey;
}

/// Event kind. At equal points, segments start before crossings are
/// processed, and crossings before segments end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub(super) enum EventKind {
    Left,
    Intersection,
    Right,
}

#[derive(Debug, Clone)]
pub(super) struct SweepEvent {
    pub(super) point: Point2,
    pub(super) kind: EventKind,
    /// Input index of the segment this event belongs to.
    pub(super) segment: usize,
    /// Second input index, for crossings.
    pub(super) other: Option<usize>,
    /// The part of the segment still ahead of the sweep. Only meaningful on
    /// `Left` events.
    pub(super) piece: Segment,
    /// `Left` events link to their `Right` event and back.
    pub(super) twin: Option<EventKey>,
}

impl SweepEvent {
    pub(super) fn left(segment: usize, piece: Segment) -> Self {
        Self {
            point: *piece.start(),
            kind: EventKind::Left,
            segment,
            other: None,
            piece,
            twin: None,
        }
    }

    pub(super) fn right(segment: usize, piece: Segment, twin: EventKey) -> Self {
        Self {
            point: *piece.end(),
            kind: EventKind::Right,
            segment,
            other: None,
            piece,
            twin: Some(twin),
        }
    }

    pub(super) fn intersection(point: Point2, a: usize, b: usize) -> Self {
        Self {
            point,
            kind: EventKind::Intersection,
            segment: a,
            other: Some(b),
            piece: Segment::new(point, point),
            twin: None,
        }
    }
}

/// Priority queue entry, ordered by point, then kind, then insertion key.
#[derive(Debug, Clone, Copy)]
pub(super) struct Queued {
    pub(super) point: Point2,
    pub(super) kind: EventKind,
    pub(super) key: EventKey,
}

impl Queued {
    pub(super) fn new(key: EventKey, event: &SweepEvent) -> Self {
        Self {
            point: event.point,
            kind: event.kind,
            key,
        }
    }
}

impl Ord for Queued {
    fn cmp(&self, other: &Self) -> Ordering {
        cmp_points(&self.point, &other.point)
            .then(self.kind.cmp(&other.kind))
            .then(self.key.cmp(&other.key))
    }
}

impl PartialOrd for Queued {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Queued {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Queued {}

/// Vertical order of two active pieces at sweep position `x`.
///
/// Pieces meeting at `x` are ordered by slope, which is their order just
/// right of the sweep line. Remaining ties fall back to the input index.
pub(super) fn status_order(a: &SweepEvent, b: &SweepEvent, x: f64) -> Ordering {
    a.piece
        .y_at(x)
        .total_cmp(&b.piece.y_at(x))
        .then_with(|| a.piece.slope().total_cmp(&b.piece.slope()))
        .then(a.segment.cmp(&b.segment))
}

#[cfg(test)]
mod tests {
    use std::cmp::Reverse;
    use std::collections::BinaryHeap;

    use slotmap::SlotMap;

    use super::*;

    #[test]
    fn queue_pops_by_point_then_kind() {
        let mut events: SlotMap<EventKey, SweepEvent> = SlotMap::with_key();
        let s = Segment::from_coords(1.0, 1.0, 3.0, 1.0);
        let right = events.insert(SweepEvent::left(0, s));
        let crossing = events.insert(SweepEvent::intersection(Point2::new(1.0, 1.0), 0, 1));
        let left = events.insert(SweepEvent::left(1, Segment::from_coords(1.0, 1.0, 2.0, 5.0)));
        let early = events.insert(SweepEvent::left(2, Segment::from_coords(0.0, 9.0, 2.0, 5.0)));
        events[right] = SweepEvent::right(0, Segment::from_coords(0.0, 0.0, 1.0, 1.0), left);

        let mut heap: BinaryHeap<Reverse<Queued>> = events
            .iter()
            .map(|(k, e)| Reverse(Queued::new(k, e)))
            .collect();
        let order: Vec<EventKey> = std::iter::from_fn(|| heap.pop().map(|Reverse(q)| q.key)).collect();
        assert_eq!(order, vec![early, left, crossing, right]);
    }

    #[test]
    fn status_ties_broken_by_slope() {
        let p = Point2::new(2.0, 2.0);
        let up = SweepEvent::left(0, Segment::new(p, Point2::new(4.0, 4.0)));
        let down = SweepEvent::left(1, Segment::new(p, Point2::new(4.0, 0.0)));
        assert_eq!(status_order(&down, &up, 2.0), Ordering::Less);
        assert_eq!(status_order(&up, &down, 2.0), Ordering::Greater);
        assert_eq!(status_order(&up, &up, 2.0), Ordering::Equal);
    }
}

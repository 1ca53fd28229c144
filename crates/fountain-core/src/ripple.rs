use std::collections::VecDeque;

use glam::Vec2;

/// A droplet impact on the basin surface, used to drive the surface shader.
///
/// `impact_point` is in basin-radius units relative to the basin center, so
/// a hit on the rim has length 1. `start_time` is simulated seconds.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RippleEvent {
    pub impact_point: Vec2,
    pub start_time: f64,
}

impl RippleEvent {
    /// `[x, y, start_time, 0]` layout for a uniform array slot.
    pub fn packed(&self) -> [f32; 4] {
        [
            self.impact_point.x,
            self.impact_point.y,
            self.start_time as f32,
            0.0,
        ]
    }
}

/// Bounded most-recent-first ring of ripple events.
#[derive(Clone, Debug)]
pub struct RippleBuffer {
    events: VecDeque<RippleEvent>,
    capacity: usize,
}

impl RippleBuffer {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            events: VecDeque::with_capacity(capacity + 1),
            capacity,
        }
    }

    /// Record an impact at the front, evicting the oldest when over capacity.
    pub fn push(&mut self, event: RippleEvent) {
        self.events.push_front(event);
        while self.events.len() > self.capacity {
            self.events.pop_back();
        }
    }

    /// Drop events older than `max_age` seconds at simulated time `now`.
    pub fn prune(&mut self, now: f64, max_age: f64) {
        self.events.retain(|e| now - e.start_time <= max_age);
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = &RippleEvent> {
        self.events.iter()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(t: f64) -> RippleEvent {
        RippleEvent {
            impact_point: Vec2::new(t as f32, 0.0),
            start_time: t,
        }
    }

    #[test]
    fn push_keeps_most_recent_first_and_bounded() {
        let mut buf = RippleBuffer::new(3);
        for i in 0..5 {
            buf.push(at(i as f64));
        }
        let times: Vec<f64> = buf.iter().map(|e| e.start_time).collect();
        assert_eq!(times, vec![4.0, 3.0, 2.0]);
        assert_eq!(buf.len(), buf.capacity());
    }

    #[test]
    fn zero_capacity_is_raised_to_one() {
        let mut buf = RippleBuffer::new(0);
        assert_eq!(buf.capacity(), 1);
        buf.push(at(1.0));
        buf.push(at(2.0));
        assert_eq!(buf.len(), 1);
        assert_eq!(buf.iter().next().map(|e| e.start_time), Some(2.0));
    }

    #[test]
    fn prune_drops_events_past_max_age() {
        let mut buf = RippleBuffer::new(6);
        buf.push(at(0.0));
        buf.push(at(1.5));
        buf.push(at(3.0));
        buf.prune(5.0, 4.0);
        let times: Vec<f64> = buf.iter().map(|e| e.start_time).collect();
        assert_eq!(times, vec![3.0, 1.5]);
        buf.prune(100.0, 4.0);
        assert!(buf.is_empty());
    }
}

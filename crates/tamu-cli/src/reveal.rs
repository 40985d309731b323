// Delayed-reveal presentation queue for the live guest display
//
// Bursty check-ins are throttled into a steady cadence: each timer tick
// promotes at most the single newest unrevealed record into the visible
// list. Backlog records bypass the delay entirely.
//
// The queue is synchronous and timer-free; the display loop owns the clock.

use std::collections::HashSet;

use tamu_core::AttendanceNotice;

#[derive(Default)]
pub struct RevealQueue {
    /// Everything received, newest first. Only grows for the life of the view.
    raw: Vec<AttendanceNotice>,
    /// Ids present in `raw`; a record with a known id is discarded on arrival.
    seen: HashSet<i64>,
    /// The visible list, newest first. Always a subset of `raw`.
    presented: Vec<AttendanceNotice>,
    /// Ids already promoted into `presented`.
    revealed: HashSet<i64>,
}

impl RevealQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the initial backlog. Historical records are shown immediately:
    /// they enter both the raw and the presented lists with no delay.
    /// Expects newest-first input and preserves that order.
    pub fn seed_backlog(&mut self, records: impl IntoIterator<Item = AttendanceNotice>) {
        for record in records {
            if !self.seen.insert(record.id) {
                continue;
            }
            self.revealed.insert(record.id);
            self.raw.push(record.clone());
            self.presented.push(record);
        }
    }

    /// Accept a live push. Returns false when the id was already known
    /// (backlog or earlier push) and the record was discarded.
    pub fn push_live(&mut self, notice: AttendanceNotice) -> bool {
        if !self.seen.insert(notice.id) {
            return false;
        }
        self.raw.insert(0, notice);
        true
    }

    /// One reveal tick: promote at most the single newest unrevealed record,
    /// returning it when one was promoted. With N pending records, N ticks
    /// drain them one at a time.
    pub fn tick(&mut self) -> Option<AttendanceNotice> {
        let next = self
            .raw
            .iter()
            .find(|r| !self.revealed.contains(&r.id))?
            .clone();
        self.revealed.insert(next.id);
        self.presented.insert(0, next.clone());
        Some(next)
    }

    /// The visible list, newest first.
    pub fn presented(&self) -> &[AttendanceNotice] {
        &self.presented
    }

    /// Records received but not yet revealed.
    pub fn pending(&self) -> usize {
        self.raw.len() - self.presented.len()
    }

    pub fn total_received(&self) -> usize {
        self.raw.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use tamu_core::GuestCategory;

    fn notice(id: i64, name: &str) -> AttendanceNotice {
        AttendanceNotice {
            id,
            guest_name: name.into(),
            institution: "Universitas Dumai".into(),
            position: None,
            category: GuestCategory::Guest,
            arrival_time: Utc::now(),
            event_name: "Open Campus Day 2024".into(),
            event_slug: "open-campus-day-2024".into(),
        }
    }

    fn ids(records: &[AttendanceNotice]) -> Vec<i64> {
        records.iter().map(|r| r.id).collect()
    }

    #[test]
    fn backlog_is_visible_immediately() {
        let mut queue = RevealQueue::new();
        queue.seed_backlog([notice(3, "c"), notice(2, "b"), notice(1, "a")]);

        assert_eq!(ids(queue.presented()), vec![3, 2, 1]);
        assert_eq!(queue.pending(), 0);
        // Nothing left to promote
        assert!(queue.tick().is_none());
    }

    #[test]
    fn one_promotion_per_tick_regardless_of_backlog_size() {
        let mut queue = RevealQueue::new();
        queue.seed_backlog([notice(1, "a")]);

        // A burst of five check-ins arrives between ticks
        for id in 2..=6 {
            assert!(queue.push_live(notice(id, "guest")));
        }
        assert_eq!(queue.pending(), 5);
        assert_eq!(queue.presented().len(), 1);

        // Each tick reveals exactly one, newest first
        assert_eq!(queue.tick().unwrap().id, 6);
        assert_eq!(queue.presented().len(), 2);
        assert_eq!(queue.tick().unwrap().id, 5);
        assert_eq!(queue.tick().unwrap().id, 4);
        assert_eq!(queue.tick().unwrap().id, 3);
        assert_eq!(queue.tick().unwrap().id, 2);
        assert_eq!(queue.pending(), 0);
        assert!(queue.tick().is_none());
    }

    #[test]
    fn duplicate_ids_are_discarded_across_both_sources() {
        let mut queue = RevealQueue::new();
        queue.seed_backlog([notice(1, "a")]);

        // Same id arriving over the push channel is dropped
        assert!(!queue.push_live(notice(1, "a")));
        // A fresh push is accepted once, then dropped on redelivery
        assert!(queue.push_live(notice(2, "b")));
        assert!(!queue.push_live(notice(2, "b")));

        queue.tick();
        assert!(queue.tick().is_none());
        assert_eq!(ids(queue.presented()), vec![2, 1]);
    }

    #[test]
    fn presented_is_always_a_subset_of_raw() {
        let mut queue = RevealQueue::new();
        queue.seed_backlog([notice(1, "a"), notice(2, "b")]);
        queue.push_live(notice(3, "c"));
        queue.push_live(notice(4, "d"));
        queue.tick();

        let raw_ids: HashSet<i64> = queue.raw.iter().map(|r| r.id).collect();
        for record in queue.presented() {
            assert!(raw_ids.contains(&record.id));
        }
        assert!(queue.presented().len() <= queue.raw.len());
    }

    #[test]
    fn a_record_is_rendered_at_most_once() {
        let mut queue = RevealQueue::new();
        queue.push_live(notice(1, "a"));
        queue.tick();
        // Redelivery after reveal must not re-enter the queue
        assert!(!queue.push_live(notice(1, "a")));
        assert!(queue.tick().is_none());

        let unique: HashSet<i64> = queue.presented().iter().map(|r| r.id).collect();
        assert_eq!(unique.len(), queue.presented().len());
    }

    #[test]
    fn empty_queue_ticks_are_noops() {
        let mut queue = RevealQueue::new();
        assert!(queue.tick().is_none());
        assert_eq!(queue.presented().len(), 0);
        assert_eq!(queue.pending(), 0);
    }
}

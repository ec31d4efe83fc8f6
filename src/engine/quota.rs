use chrono::{Local, NaiveDate};
use std::collections::HashMap;
use std::sync::Mutex;

/// Per-user daily super-like budget
///
/// State is one `(count, day)` pair per user. A stored day older than today
/// lazily resets the count on the next access, so no scheduler runs.
/// Check-and-increment happens inside one critical section; the engine never
/// holds this lock across an await point.
#[derive(Debug)]
pub struct QuotaTracker {
    cap: u32,
    counts: Mutex<HashMap<String, (u32, NaiveDate)>>,
}

impl QuotaTracker {
    pub fn new(cap: u32) -> Self {
        Self {
            cap,
            counts: Mutex::new(HashMap::new()),
        }
    }

    pub fn cap(&self) -> u32 {
        self.cap
    }

    /// Super-likes still available today
    pub fn remaining(&self, username: &str) -> u32 {
        self.remaining_on(username, Local::now().date_naive())
    }

    /// Try to consume one super-like; false once the day's budget is gone
    pub fn try_consume(&self, username: &str) -> bool {
        self.try_consume_on(username, Local::now().date_naive())
    }

    /// Hand one unit back after a failed downstream write
    pub fn refund(&self, username: &str) {
        self.refund_on(username, Local::now().date_naive())
    }

    fn remaining_on(&self, username: &str, today: NaiveDate) -> u32 {
        let counts = self.counts.lock().unwrap();
        match counts.get(username) {
            Some((count, day)) if *day == today => self.cap.saturating_sub(*count),
            _ => self.cap,
        }
    }

    fn try_consume_on(&self, username: &str, today: NaiveDate) -> bool {
        let mut counts = self.counts.lock().unwrap();
        let entry = counts.entry(username.to_string()).or_insert((0, today));

        // Lazy rollover: a stale day never carries its count into today
        if entry.1 != today {
            *entry = (0, today);
        }

        if entry.0 >= self.cap {
            return false;
        }
        entry.0 += 1;
        true
    }

    fn refund_on(&self, username: &str, today: NaiveDate) {
        let mut counts = self.counts.lock().unwrap();
        if let Some(entry) = counts.get_mut(username) {
            if entry.1 == today && entry.0 > 0 {
                entry.0 -= 1;
            }
        }
    }
}

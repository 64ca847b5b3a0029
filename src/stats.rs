//! Session statistics
//!
//! Folds drop outcomes into totals for a play session: how much went in,
//! how much came back and where the balls landed.

use serde::{Deserialize, Serialize};

use crate::sim::{DropOutcome, OutcomeKind};

/// Running tally over a session's drop outcomes
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionStats {
    pub drops: u64,
    pub landed: u64,
    pub expired: u64,
    pub total_wagered: f64,
    pub total_paid: f64,
    /// Landings per bucket index
    pub bucket_hits: Vec<u64>,
    /// Largest single payout so far
    pub best_payout: f64,
}

impl SessionStats {
    /// Create an empty tally sized for `bucket_count` buckets
    pub fn new(bucket_count: usize) -> Self {
        Self {
            bucket_hits: vec![0; bucket_count],
            ..Self::default()
        }
    }

    /// Add one outcome to the tally
    pub fn record(&mut self, outcome: &DropOutcome) {
        self.drops += 1;
        self.total_wagered += outcome.wager;

        match outcome.kind {
            OutcomeKind::Landed { bucket, payout, .. } => {
                self.landed += 1;
                self.total_paid += payout;
                if bucket >= self.bucket_hits.len() {
                    self.bucket_hits.resize(bucket + 1, 0);
                }
                self.bucket_hits[bucket] += 1;
                self.best_payout = self.best_payout.max(payout);
            }
            OutcomeKind::Expired => self.expired += 1,
        }
    }

    /// Merge another tally into this one
    pub fn merge(&mut self, other: &SessionStats) {
        self.drops += other.drops;
        self.landed += other.landed;
        self.expired += other.expired;
        self.total_wagered += other.total_wagered;
        self.total_paid += other.total_paid;
        if other.bucket_hits.len() > self.bucket_hits.len() {
            self.bucket_hits.resize(other.bucket_hits.len(), 0);
        }
        for (hits, extra) in self.bucket_hits.iter_mut().zip(&other.bucket_hits) {
            *hits += extra;
        }
        self.best_payout = self.best_payout.max(other.best_payout);
    }

    /// Player net result (negative when the house is ahead)
    pub fn net(&self) -> f64 {
        self.total_paid - self.total_wagered
    }

    /// Return to player: paid out per unit wagered
    pub fn rtp(&self) -> f64 {
        if self.total_wagered == 0.0 {
            0.0
        } else {
            self.total_paid / self.total_wagered
        }
    }

    pub fn house_edge(&self) -> f64 {
        if self.total_wagered == 0.0 {
            0.0
        } else {
            -self.net() / self.total_wagered
        }
    }

    /// Fraction of landings in the `k` centermost buckets
    pub fn center_share(&self, k: usize) -> f64 {
        let total: u64 = self.bucket_hits.iter().sum();
        let len = self.bucket_hits.len();
        if total == 0 || k == 0 {
            return 0.0;
        }

        let k = k.min(len);
        let start = (len - k) / 2;
        let center: u64 = self.bucket_hits[start..start + k].iter().sum();
        center as f64 / total as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::BallId;

    fn landed(bucket: usize, wager: f64, payout: f64) -> DropOutcome {
        DropOutcome {
            ball: BallId(1),
            wager,
            age_ticks: 300,
            kind: OutcomeKind::Landed {
                bucket,
                multiplier: payout / wager,
                payout,
                profit: payout - wager,
            },
        }
    }

    fn expired(wager: f64) -> DropOutcome {
        DropOutcome {
            ball: BallId(2),
            wager,
            age_ticks: 1200,
            kind: OutcomeKind::Expired,
        }
    }

    #[test]
    fn test_empty_stats() {
        let stats = SessionStats::new(13);
        assert_eq!(stats.bucket_hits.len(), 13);
        assert_eq!(stats.rtp(), 0.0);
        assert_eq!(stats.house_edge(), 0.0);
        assert_eq!(stats.center_share(3), 0.0);
    }

    #[test]
    fn test_record_totals() {
        let mut stats = SessionStats::new(13);
        stats.record(&landed(0, 100.0, 360.0));
        stats.record(&landed(6, 100.0, 40.0));
        stats.record(&expired(100.0));

        assert_eq!(stats.drops, 3);
        assert_eq!(stats.landed, 2);
        assert_eq!(stats.expired, 1);
        assert_eq!(stats.total_wagered, 300.0);
        assert_eq!(stats.total_paid, 400.0);
        assert_eq!(stats.net(), 100.0);
        assert_eq!(stats.best_payout, 360.0);
        assert_eq!(stats.bucket_hits[0], 1);
        assert_eq!(stats.bucket_hits[6], 1);
    }

    #[test]
    fn test_rtp_and_house_edge() {
        let mut stats = SessionStats::new(13);
        for _ in 0..4 {
            stats.record(&landed(6, 100.0, 40.0));
        }
        stats.record(&landed(0, 100.0, 360.0));

        // 520 back on 500 wagered
        assert!((stats.rtp() - 1.04).abs() < 1e-12);
        assert!((stats.house_edge() + 0.04).abs() < 1e-12);
    }

    #[test]
    fn test_center_share() {
        let mut stats = SessionStats::new(13);
        for bucket in [5, 6, 7, 6, 0, 12] {
            stats.record(&landed(bucket, 10.0, 4.0));
        }
        assert!((stats.center_share(3) - 4.0 / 6.0).abs() < 1e-12);
        assert!((stats.center_share(1) - 2.0 / 6.0).abs() < 1e-12);
        assert_eq!(stats.center_share(13), 1.0);
        assert_eq!(stats.center_share(50), 1.0);
    }

    #[test]
    fn test_unknown_bucket_grows_histogram() {
        let mut stats = SessionStats::default();
        stats.record(&landed(4, 10.0, 10.0));
        assert_eq!(stats.bucket_hits, vec![0, 0, 0, 0, 1]);
    }

    #[test]
    fn test_merge() {
        let mut a = SessionStats::new(13);
        a.record(&landed(6, 100.0, 40.0));
        let mut b = SessionStats::new(13);
        b.record(&landed(0, 100.0, 360.0));
        b.record(&expired(50.0));

        a.merge(&b);
        assert_eq!(a.drops, 3);
        assert_eq!(a.expired, 1);
        assert_eq!(a.total_wagered, 250.0);
        assert_eq!(a.best_payout, 360.0);
        assert_eq!(a.bucket_hits[0], 1);
        assert_eq!(a.bucket_hits[6], 1);
    }
}

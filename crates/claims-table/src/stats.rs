use serde::Serialize;

use claims_model::{ClaimRecord, ClaimStatus};

use crate::filter::parse_date;

/// Summary figures over a record set.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ClaimStats {
    pub total: usize,
    pub approved: usize,
    pub pending: usize,
    pub denied: usize,
    pub in_progress: usize,
    pub total_amount: f64,
    pub approved_amount: f64,
    pub pending_amount: f64,
    pub denied_amount: f64,
    /// Mean days between submission and last update, over records where
    /// both dates parse.
    pub average_processing_days: Option<f64>,
}

impl ClaimStats {
    pub fn compute<'a, I>(records: I) -> Self
    where
        I: IntoIterator<Item = &'a ClaimRecord>,
    {
        let mut stats = ClaimStats::default();
        let mut processing_days = 0i64;
        let mut processing_count = 0usize;

        for record in records {
            stats.total += 1;
            let amount = record.total_amount.unwrap_or(0.0);
            stats.total_amount += amount;
            match record.status {
                ClaimStatus::Approved => {
                    stats.approved += 1;
                    stats.approved_amount += amount;
                }
                ClaimStatus::PendingReview => {
                    stats.pending += 1;
                    stats.pending_amount += amount;
                }
                ClaimStatus::Denied => {
                    stats.denied += 1;
                    stats.denied_amount += amount;
                }
                ClaimStatus::InProgress => stats.in_progress += 1,
            }

            let submitted = record.submission_date.as_deref().and_then(parse_date);
            let updated = record.last_updated.as_deref().and_then(parse_date);
            if let (Some(submitted), Some(updated)) = (submitted, updated) {
                processing_days += (updated - submitted).num_days();
                processing_count += 1;
            }
        }

        if processing_count > 0 {
            stats.average_processing_days =
                Some(processing_days as f64 / processing_count as f64);
        }
        stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use claims_standards::load_seed_claims;

    #[test]
    fn seed_statistics() {
        let claims = load_seed_claims().unwrap();
        let stats = ClaimStats::compute(&claims);
        assert_eq!(stats.total, 30);
        assert_eq!(stats.approved, 11);
        assert_eq!(
            stats.approved + stats.pending + stats.denied + stats.in_progress,
            30
        );
        assert!(stats.total_amount > 0.0);
        assert!(stats.average_processing_days.is_some());
    }

    #[test]
    fn empty_set() {
        let stats = ClaimStats::compute(std::iter::empty());
        assert_eq!(stats, ClaimStats::default());
    }

    #[test]
    fn processing_days_use_parseable_dates_only() {
        let mut a = ClaimRecord::new("A");
        a.submission_date = Some("2025-08-01".to_string());
        a.last_updated = Some("2025-08-05".to_string());
        a.status = ClaimStatus::Approved;
        a.total_amount = Some(100.0);
        let mut b = ClaimRecord::new("B");
        b.submission_date = Some("unknown".to_string());
        b.last_updated = Some("2025-08-05".to_string());
        let stats = ClaimStats::compute([&a, &b]);
        assert_eq!(stats.average_processing_days, Some(4.0));
        assert_eq!(stats.approved_amount, 100.0);
        assert_eq!(stats.pending, 1);
    }
}

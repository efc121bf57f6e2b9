use serde::{Deserialize, Serialize};

use vendorclub_core::Money;
use vendorclub_parties::PerformanceScores;

/// Headline figures on a wholesaler's dashboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardStats {
    pub total_products: i64,
    pub pending_orders: i64,
    /// Sum of completed orders created in the current calendar month.
    pub month_revenue: Money,
    /// Distinct vendors that ordered in the current calendar month.
    pub active_customers: i64,
    pub trust_score: f64,
    pub response_rate: f64,
    pub delivery_rate: f64,
}

impl DashboardStats {
    /// Assemble the stats; a missing scores row falls back to the defaults.
    pub fn new(
        total_products: i64,
        pending_orders: i64,
        month_revenue: Money,
        active_customers: i64,
        scores: Option<PerformanceScores>,
    ) -> Self {
        let scores = scores.unwrap_or_default();
        Self {
            total_products,
            pending_orders,
            month_revenue,
            active_customers,
            trust_score: scores.trust_score,
            response_rate: scores.response_rate,
            delivery_rate: scores.delivery_rate,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_scores_use_defaults() {
        let stats = DashboardStats::new(5, 4, Money::from_minor(245_000), 3, None);
        assert_eq!(stats.trust_score, 4.7);
        assert_eq!(stats.response_rate, 95.0);
        assert_eq!(stats.delivery_rate, 92.0);
    }

    #[test]
    fn stored_scores_win() {
        let scores = PerformanceScores {
            trust_score: 3.9,
            response_rate: 80.0,
            delivery_rate: 70.0,
        };
        let stats = DashboardStats::new(0, 0, Money::ZERO, 0, Some(scores));
        assert_eq!(stats.trust_score, 3.9);
        assert_eq!(stats.delivery_rate, 70.0);
    }
}

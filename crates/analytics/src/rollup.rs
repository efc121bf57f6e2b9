use std::collections::HashSet;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use vendorclub_core::{Money, VendorId};

/// How many rollup rows the analytics page shows.
pub const ROLLUP_HISTORY_DAYS: i64 = 30;

/// One wholesaler's order totals for one calendar day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyRollup {
    pub date: NaiveDate,
    pub total_orders: i64,
    pub total_revenue: Money,
    pub active_customers: i64,
}

impl DailyRollup {
    pub fn empty(date: NaiveDate) -> Self {
        Self {
            date,
            total_orders: 0,
            total_revenue: Money::ZERO,
            active_customers: 0,
        }
    }

    /// Tally a day's orders given as `(vendor, total_amount)` pairs.
    pub fn tally(date: NaiveDate, orders: impl IntoIterator<Item = (VendorId, Money)>) -> Self {
        let mut rollup = Self::empty(date);
        let mut vendors = HashSet::new();
        let mut revenue = 0i64;
        for (vendor, amount) in orders {
            rollup.total_orders += 1;
            revenue = revenue.saturating_add(amount.minor());
            vendors.insert(vendor);
        }
        rollup.total_revenue = Money::from_minor(revenue);
        rollup.active_customers = vendors.len() as i64;
        rollup
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tally_counts_distinct_vendors() {
        let date = NaiveDate::from_ymd_opt(2026, 10, 18).unwrap();
        let (a, b) = (VendorId::new(), VendorId::new());
        let rollup = DailyRollup::tally(
            date,
            [
                (a, Money::from_minor(225_000)),
                (a, Money::from_minor(75_000)),
                (b, Money::from_minor(85_000)),
            ],
        );
        assert_eq!(rollup.total_orders, 3);
        assert_eq!(rollup.total_revenue, Money::from_minor(385_000));
        assert_eq!(rollup.active_customers, 2);
    }

    #[test]
    fn no_orders_is_an_empty_day() {
        let date = NaiveDate::from_ymd_opt(2026, 1, 1).unwrap();
        assert_eq!(DailyRollup::tally(date, []), DailyRollup::empty(date));
    }

    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            /// Property: the tally never counts more customers than orders,
            /// and the revenue is the plain sum.
            #[test]
            fn tally_is_consistent(amounts in proptest::collection::vec((0usize..4, 0i64..100_000), 0..40)) {
                let date = NaiveDate::from_ymd_opt(2026, 10, 18).unwrap();
                let vendors: Vec<VendorId> = (0..4).map(|_| VendorId::new()).collect();
                let orders: Vec<(VendorId, Money)> = amounts
                    .iter()
                    .map(|(v, minor)| (vendors[*v], Money::from_minor(*minor)))
                    .collect();

                let rollup = DailyRollup::tally(date, orders.clone());
                prop_assert_eq!(rollup.total_orders, orders.len() as i64);
                prop_assert!(rollup.active_customers <= rollup.total_orders);
                prop_assert_eq!(rollup.total_revenue.minor(), amounts.iter().map(|(_, m)| m).sum::<i64>());
            }
        }
    }
}

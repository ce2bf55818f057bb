//! Offer ranking.

use std::cmp::Ordering;

use crate::domain::RouteOffer;

/// Sort offers cheapest first.
///
/// The sort is stable, so offers at the same price keep their input order.
/// Prices compare numerically: `-0.0` and `0.0` are the same price.
pub fn rank_offers(mut offers: Vec<RouteOffer>) -> Vec<RouteOffer> {
    offers.sort_by(|a, b| {
        a.price
            .amount
            .partial_cmp(&b.price.amount)
            .unwrap_or(Ordering::Equal)
    });
    offers
}

#[cfg(test)]
pub(super) fn offer(id: &str, amount: f64) -> RouteOffer {
    use crate::domain::{BusOperator, BusType, Location, Price};
    use chrono::NaiveDate;

    let at = NaiveDate::from_ymd_opt(2025, 8, 21)
        .unwrap()
        .and_hms_opt(9, 0, 0)
        .unwrap();
    RouteOffer {
        id: id.to_string(),
        from: Location::default(),
        to: Location::default(),
        operator: BusOperator::default(),
        bus_type: BusType::default(),
        departure_time: at,
        arrival_time: at,
        duration: "0h 0m".to_string(),
        price: Price::new(amount, "Test"),
        available_seats: 1,
        booking_url: String::new(),
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    /// Prices drawn from a coarse grid so ties are common.
    fn prices_strategy() -> impl Strategy<Value = Vec<f64>> {
        prop::collection::vec(
            prop_oneof![
                (0u32..40).prop_map(|n| f64::from(n) * 50.0),
                0.0f64..5000.0,
                Just(-0.0f64),
            ],
            0..30,
        )
    }

    fn offers_from(prices: &[f64]) -> Vec<RouteOffer> {
        prices
            .iter()
            .enumerate()
            .map(|(i, p)| offer(&i.to_string(), *p))
            .collect()
    }

    proptest! {
        #[test]
        fn rank_offers_is_sorted(prices in prices_strategy()) {
            let ranked = rank_offers(offers_from(&prices));

            for window in ranked.windows(2) {
                prop_assert!(
                    window[0].price.amount <= window[1].price.amount,
                    "Not sorted: {} before {}",
                    window[0].price.amount,
                    window[1].price.amount
                );
            }
        }

        #[test]
        fn rank_offers_is_a_permutation(prices in prices_strategy()) {
            let input = offers_from(&prices);
            let ranked = rank_offers(input.clone());

            prop_assert_eq!(ranked.len(), input.len());

            let mut before: Vec<_> = input.iter().map(|o| o.id.clone()).collect();
            let mut after: Vec<_> = ranked.iter().map(|o| o.id.clone()).collect();
            before.sort();
            after.sort();
            prop_assert_eq!(before, after);
        }

        #[test]
        fn rank_offers_is_stable(prices in prices_strategy()) {
            let ranked = rank_offers(offers_from(&prices));

            for window in ranked.windows(2) {
                if window[0].price.amount == window[1].price.amount {
                    let a: usize = window[0].id.parse().unwrap();
                    let b: usize = window[1].id.parse().unwrap();
                    prop_assert!(a < b, "tie reordered: {} after {}", a, b);
                }
            }
        }
    }
}

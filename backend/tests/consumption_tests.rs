//! Consumption recording tests
//!
//! Covers the batch contract of the consumption endpoints: line skipping,
//! stock clamping, and the resulting usage totals.

use proptest::prelude::*;

use shared::models::UsageLineInput;
use shared::reorder::consume_stock;
use shared::validation::validate_quantity;

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod unit_tests {
    use super::*;
    use uuid::Uuid;

    /// Mirror of the ad-hoc batch line filter: a line is usable when it
    /// has an item reference and a positive quantity
    fn usable(line: &UsageLineInput) -> bool {
        line.item_id.is_some() && validate_quantity(line.quantity).is_ok()
    }

    #[test]
    fn test_line_without_item_is_skipped() {
        let line = UsageLineInput {
            item_id: None,
            quantity: 3,
        };
        assert!(!usable(&line));
    }

    #[test]
    fn test_non_positive_quantity_is_skipped() {
        let item_id = Some(Uuid::new_v4());
        assert!(!usable(&UsageLineInput {
            item_id,
            quantity: 0
        }));
        assert!(!usable(&UsageLineInput {
            item_id,
            quantity: -4
        }));
    }

    #[test]
    fn test_valid_line_is_usable() {
        assert!(usable(&UsageLineInput {
            item_id: Some(Uuid::new_v4()),
            quantity: 1
        }));
    }

    #[test]
    fn test_skip_count_matches_unusable_lines() {
        let item_id = Some(Uuid::new_v4());
        let lines = vec![
            UsageLineInput { item_id, quantity: 2 },
            UsageLineInput {
                item_id: None,
                quantity: 5,
            },
            UsageLineInput {
                item_id,
                quantity: 0,
            },
            UsageLineInput { item_id, quantity: 1 },
        ];

        let skipped = lines.iter().filter(|line| !usable(line)).count();
        assert_eq!(skipped, 2);
    }

    #[test]
    fn test_stock_decrement_simple() {
        assert_eq!(consume_stock(10, 6), 4);
        assert_eq!(consume_stock(6, 1), 5);
    }

    #[test]
    fn test_stock_clamps_at_zero() {
        assert_eq!(consume_stock(3, 10), 0);
        assert_eq!(consume_stock(0, 1), 0);
    }

    #[test]
    fn test_sequential_consumption_accumulates() {
        let mut stock = 10;
        for quantity in [3, 4, 5] {
            stock = consume_stock(stock, quantity);
        }
        // 10 - 3 - 4 = 3, then 3 - 5 clamps at 0
        assert_eq!(stock, 0);
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================

#[cfg(test)]
mod property_tests {
    use super::*;

    fn quantity_strategy() -> impl Strategy<Value = i32> {
        1i32..=1000
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(200))]

        /// Stock is never negative after any consumption
        #[test]
        fn prop_stock_never_negative(
            stock in 0i32..=1000,
            quantity in quantity_strategy()
        ) {
            prop_assert!(consume_stock(stock, quantity) >= 0);
        }

        /// When enough stock is available the decrement is exact
        #[test]
        fn prop_decrement_exact_when_covered(
            quantity in quantity_strategy(),
            surplus in 0i32..=1000
        ) {
            let stock = quantity + surplus;
            prop_assert_eq!(consume_stock(stock, quantity), surplus);
        }

        /// Overconsumption always lands exactly on zero
        #[test]
        fn prop_overconsumption_lands_on_zero(
            stock in 0i32..=1000,
            excess in 1i32..=1000
        ) {
            prop_assert_eq!(consume_stock(stock, stock + excess), 0);
        }

        /// Consuming line by line ends where consuming the batch total
        /// at once would
        #[test]
        fn prop_sequential_equals_bulk(
            stock in 0i32..=1000,
            quantities in prop::collection::vec(1i32..=50, 1..10)
        ) {
            let sequential = quantities
                .iter()
                .fold(stock, |acc, &quantity| consume_stock(acc, quantity));
            let total: i32 = quantities.iter().sum();
            prop_assert_eq!(sequential, consume_stock(stock, total));
        }
    }
}

//! Reorder aggregation tests
//!
//! Covers the consumption -> reorder pipeline invariants:
//! - one order line per (pending order, item), merged by summing
//! - at most one pending order per supplier within a batch
//! - the two reorder quantity policies stay divergent
//! - stock never goes negative

use proptest::prelude::*;
use std::collections::HashMap;

use shared::reorder::{consume_stock, reorder_triggered, ReorderPolicy};

// ============================================================================
// In-memory model of the consumption -> reorder pipeline
// ============================================================================

mod simulation {
    use super::*;

    #[derive(Debug, Clone)]
    pub struct Item {
        pub minimum_stock: i32,
        pub current_stock: i32,
        pub supplier: Option<usize>,
    }

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub enum Status {
        Pending,
        Sent,
    }

    #[derive(Debug, Clone)]
    pub struct Order {
        pub supplier: usize,
        pub status: Status,
        /// (item index, quantity); at most one entry per item
        pub lines: Vec<(usize, i32)>,
    }

    /// In-memory clinic state driven through the same decision rules the
    /// server runs per batch
    #[derive(Debug, Default)]
    pub struct Clinic {
        pub items: Vec<Item>,
        pub orders: Vec<Order>,
    }

    impl Clinic {
        pub fn add_item(
            &mut self,
            minimum_stock: i32,
            current_stock: i32,
            supplier: Option<usize>,
        ) -> usize {
            self.items.push(Item {
                minimum_stock,
                current_stock,
                supplier,
            });
            self.items.len() - 1
        }

        /// Run one consumption batch. Returns the orders touched, in
        /// first-touch order.
        pub fn consume_batch(
            &mut self,
            lines: &[(usize, i32)],
            policy: ReorderPolicy,
        ) -> Vec<usize> {
            let mut by_supplier: HashMap<usize, usize> = HashMap::new();
            let mut sequence = Vec::new();

            for &(item_idx, quantity) in lines {
                if quantity <= 0 {
                    continue;
                }

                let item = &mut self.items[item_idx];
                item.current_stock = consume_stock(item.current_stock, quantity);
                let (minimum, current, supplier) =
                    (item.minimum_stock, item.current_stock, item.supplier);

                if !reorder_triggered(current, minimum, supplier.is_some()) {
                    continue;
                }
                let supplier = supplier.expect("trigger requires a supplier");

                let order_idx = match by_supplier.get(&supplier) {
                    Some(&idx) => idx,
                    None => {
                        // Newest pending order for the supplier, else a new one
                        let idx = self
                            .orders
                            .iter()
                            .rposition(|o| o.supplier == supplier && o.status == Status::Pending)
                            .unwrap_or_else(|| {
                                self.orders.push(Order {
                                    supplier,
                                    status: Status::Pending,
                                    lines: Vec::new(),
                                });
                                self.orders.len() - 1
                            });
                        by_supplier.insert(supplier, idx);
                        sequence.push(idx);
                        idx
                    }
                };

                let order_quantity = policy.order_quantity(quantity, minimum, current);
                let order = &mut self.orders[order_idx];
                match order.lines.iter_mut().find(|(idx, _)| *idx == item_idx) {
                    Some(line) => line.1 += order_quantity,
                    None => order.lines.push((item_idx, order_quantity)),
                }
            }

            sequence
        }

        /// Document generation side effect: pending orders advance to sent
        pub fn generate_document(&mut self, order_idx: usize) {
            let order = &mut self.orders[order_idx];
            if order.status == Status::Pending {
                order.status = Status::Sent;
            }
        }

        pub fn pending_orders_for(&self, supplier: usize) -> usize {
            self.orders
                .iter()
                .filter(|o| o.supplier == supplier && o.status == Status::Pending)
                .count()
        }
    }
}

use simulation::{Clinic, Status};

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod unit_tests {
    use super::*;

    /// Consume past the threshold: one order, one line, consumed quantity
    #[test]
    fn test_direct_consumption_triggers_reorder() {
        let mut clinic = Clinic::default();
        let item = clinic.add_item(5, 10, Some(0));

        let touched = clinic.consume_batch(&[(item, 6)], ReorderPolicy::ReplenishConsumed);

        assert_eq!(clinic.items[item].current_stock, 4);
        assert_eq!(touched.len(), 1);
        assert_eq!(clinic.orders.len(), 1);
        assert_eq!(clinic.orders[0].lines, vec![(item, 6)]);
        assert_eq!(clinic.orders[0].status, Status::Pending);
    }

    /// Same item twice in one batch: line quantities merge, no second order
    #[test]
    fn test_repeat_trigger_merges_into_one_line() {
        let mut clinic = Clinic::default();
        let item = clinic.add_item(5, 10, Some(0));

        clinic.consume_batch(&[(item, 6), (item, 1)], ReorderPolicy::ReplenishConsumed);

        assert_eq!(clinic.orders.len(), 1);
        assert_eq!(clinic.orders[0].lines, vec![(item, 7)]);
    }

    /// Two items sharing a supplier: one pending order carries both lines
    #[test]
    fn test_shared_supplier_accumulates_into_one_order() {
        let mut clinic = Clinic::default();
        let gloves = clinic.add_item(5, 6, Some(0));
        let swabs = clinic.add_item(10, 11, Some(0));

        let touched = clinic.consume_batch(
            &[(gloves, 2), (swabs, 3)],
            ReorderPolicy::ReplenishConsumed,
        );

        assert_eq!(touched.len(), 1);
        assert_eq!(clinic.pending_orders_for(0), 1);
        assert_eq!(clinic.orders[0].lines.len(), 2);
    }

    /// Two suppliers: one order each, redirect target is the first touched
    #[test]
    fn test_two_suppliers_two_orders() {
        let mut clinic = Clinic::default();
        let gloves = clinic.add_item(5, 6, Some(0));
        let cuffs = clinic.add_item(2, 2, Some(1));

        let touched = clinic.consume_batch(
            &[(gloves, 2), (cuffs, 1)],
            ReorderPolicy::ReplenishConsumed,
        );

        assert_eq!(touched.len(), 2);
        assert_eq!(clinic.orders[touched[0]].supplier, 0);
        assert_eq!(clinic.orders[touched[1]].supplier, 1);
    }

    /// A later batch reuses the still-pending order
    #[test]
    fn test_pending_order_reused_across_batches() {
        let mut clinic = Clinic::default();
        let item = clinic.add_item(5, 6, Some(0));

        clinic.consume_batch(&[(item, 2)], ReorderPolicy::ReplenishConsumed);
        clinic.consume_batch(&[(item, 3)], ReorderPolicy::ReplenishConsumed);

        assert_eq!(clinic.orders.len(), 1);
        assert_eq!(clinic.orders[0].lines, vec![(item, 5)]);
    }

    /// Once the order is sent, the next trigger opens a fresh pending order
    #[test]
    fn test_sent_order_not_amended() {
        let mut clinic = Clinic::default();
        let item = clinic.add_item(5, 6, Some(0));

        let touched = clinic.consume_batch(&[(item, 2)], ReorderPolicy::ReplenishConsumed);
        clinic.generate_document(touched[0]);
        clinic.consume_batch(&[(item, 1)], ReorderPolicy::ReplenishConsumed);

        assert_eq!(clinic.orders.len(), 2);
        assert_eq!(clinic.orders[0].status, Status::Sent);
        assert_eq!(clinic.orders[1].status, Status::Pending);
        assert_eq!(clinic.orders[1].lines, vec![(item, 1)]);
    }

    /// No supplier configured: stock drops but nothing is ordered
    #[test]
    fn test_no_supplier_no_order() {
        let mut clinic = Clinic::default();
        let item = clinic.add_item(5, 6, None);

        let touched = clinic.consume_batch(&[(item, 6)], ReorderPolicy::ReplenishConsumed);

        assert_eq!(clinic.items[item].current_stock, 0);
        assert!(touched.is_empty());
        assert!(clinic.orders.is_empty());
    }

    /// Stock above the threshold: no trigger
    #[test]
    fn test_above_threshold_no_order() {
        let mut clinic = Clinic::default();
        let item = clinic.add_item(5, 20, Some(0));

        clinic.consume_batch(&[(item, 3)], ReorderPolicy::ReplenishConsumed);

        assert!(clinic.orders.is_empty());
    }

    /// Generic-kit policy: restock toward twice the minimum, not the
    /// consumed quantity
    #[test]
    fn test_generic_kit_restock_quantity() {
        let mut clinic = Clinic::default();
        let item = clinic.add_item(5, 6, Some(0));

        clinic.consume_batch(&[(item, 1)], ReorderPolicy::RestockToTarget);

        assert_eq!(clinic.items[item].current_stock, 5);
        // max(1, 5*2 - 5) = 5
        assert_eq!(clinic.orders[0].lines, vec![(item, 5)]);
    }

    /// The two policies produce different quantities from the same state
    #[test]
    fn test_policies_diverge() {
        let mut direct = Clinic::default();
        let a = direct.add_item(5, 6, Some(0));
        direct.consume_batch(&[(a, 1)], ReorderPolicy::ReplenishConsumed);

        let mut generic = Clinic::default();
        let b = generic.add_item(5, 6, Some(0));
        generic.consume_batch(&[(b, 1)], ReorderPolicy::RestockToTarget);

        assert_eq!(direct.orders[0].lines, vec![(a, 1)]);
        assert_eq!(generic.orders[0].lines, vec![(b, 5)]);
    }

    /// Consuming more than is left floors the counter at zero
    #[test]
    fn test_overconsumption_floors_at_zero() {
        let mut clinic = Clinic::default();
        let item = clinic.add_item(2, 3, Some(0));

        clinic.consume_batch(&[(item, 10)], ReorderPolicy::ReplenishConsumed);

        assert_eq!(clinic.items[item].current_stock, 0);
        assert_eq!(clinic.orders[0].lines, vec![(item, 10)]);
    }

    /// Non-positive quantities are skipped, not fatal
    #[test]
    fn test_non_positive_quantities_skipped() {
        let mut clinic = Clinic::default();
        let item = clinic.add_item(5, 10, Some(0));

        clinic.consume_batch(&[(item, 0), (item, -3)], ReorderPolicy::ReplenishConsumed);

        assert_eq!(clinic.items[item].current_stock, 10);
        assert!(clinic.orders.is_empty());
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================

#[cfg(test)]
mod property_tests {
    use super::*;

    /// Strategy for consumption quantities
    fn quantity_strategy() -> impl Strategy<Value = i32> {
        1i32..=50
    }

    /// Strategy for a batch of (item index, quantity) lines over 3 items
    fn batch_strategy() -> impl Strategy<Value = Vec<(usize, i32)>> {
        prop::collection::vec((0usize..3, quantity_strategy()), 1..12)
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(200))]

        /// Stock never goes negative, whatever is consumed
        #[test]
        fn prop_stock_never_negative(batches in prop::collection::vec(batch_strategy(), 1..5)) {
            let mut clinic = Clinic::default();
            clinic.add_item(5, 20, Some(0));
            clinic.add_item(0, 3, Some(1));
            clinic.add_item(10, 10, None);

            for batch in &batches {
                clinic.consume_batch(batch, ReorderPolicy::ReplenishConsumed);
                for item in &clinic.items {
                    prop_assert!(item.current_stock >= 0);
                }
            }
        }

        /// At most one pending order exists per supplier, across batches
        #[test]
        fn prop_single_pending_order_per_supplier(
            batches in prop::collection::vec(batch_strategy(), 1..5)
        ) {
            let mut clinic = Clinic::default();
            clinic.add_item(5, 8, Some(0));
            clinic.add_item(3, 4, Some(0));
            clinic.add_item(2, 2, Some(1));

            for batch in &batches {
                clinic.consume_batch(batch, ReorderPolicy::ReplenishConsumed);
            }

            for supplier in 0..2 {
                prop_assert!(clinic.pending_orders_for(supplier) <= 1);
            }
        }

        /// One line per (order, item), however often the item triggers
        #[test]
        fn prop_one_line_per_order_item(
            batches in prop::collection::vec(batch_strategy(), 1..5)
        ) {
            let mut clinic = Clinic::default();
            clinic.add_item(5, 8, Some(0));
            clinic.add_item(3, 4, Some(0));
            clinic.add_item(2, 2, Some(1));

            for batch in &batches {
                clinic.consume_batch(batch, ReorderPolicy::ReplenishConsumed);
            }

            for order in &clinic.orders {
                let mut seen = std::collections::HashSet::new();
                for (item_idx, quantity) in &order.lines {
                    prop_assert!(seen.insert(*item_idx));
                    prop_assert!(*quantity > 0);
                }
            }
        }

        /// With every line triggering, the replenish policy orders back
        /// exactly what was consumed
        #[test]
        fn prop_replenish_consumed_sums_consumption(batch in batch_strategy()) {
            let mut clinic = Clinic::default();
            // Minimum far above stock: every consumption triggers
            clinic.add_item(1000, 10, Some(0));
            clinic.add_item(1000, 10, Some(0));
            clinic.add_item(1000, 10, Some(0));

            clinic.consume_batch(&batch, ReorderPolicy::ReplenishConsumed);

            let consumed_per_item = batch.iter().fold([0i32; 3], |mut acc, &(idx, qty)| {
                acc[idx] += qty;
                acc
            });

            prop_assert_eq!(clinic.orders.len(), 1);
            for (item_idx, quantity) in &clinic.orders[0].lines {
                prop_assert_eq!(*quantity, consumed_per_item[*item_idx]);
            }
        }

        /// The restock policy always orders at least one unit
        #[test]
        fn prop_restock_orders_at_least_one(
            consumed in quantity_strategy(),
            minimum in 0i32..100,
            current in 0i32..300,
        ) {
            let quantity = ReorderPolicy::RestockToTarget.order_quantity(consumed, minimum, current);
            prop_assert!(quantity >= 1);
        }

        /// The restock policy tops stock up to exactly twice the minimum
        /// whenever stock sits below that target
        #[test]
        fn prop_restock_reaches_target(
            minimum in 1i32..100,
            current in 0i32..100,
        ) {
            prop_assume!(current < minimum * 2);
            let quantity = ReorderPolicy::RestockToTarget.order_quantity(1, minimum, current);
            prop_assert_eq!(current + quantity, minimum * 2);
        }
    }
}

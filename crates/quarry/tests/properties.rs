//! Property coverage for the facade's consistency contracts.

use proptest::prelude::*;
use quarry::prelude::*;
use quarry_core::test_support::{MemoryHost, fixtures};
use quarry_core::test_support::fixtures::Order;

const STATUSES: [&str; 3] = ["PAID", "OPEN", "VOID"];

fn orders_strategy() -> impl Strategy<Value = Vec<Order>> {
    prop::collection::vec((0usize..STATUSES.len(), -500i64..500), 0..40).prop_map(|specs| {
        specs
            .into_iter()
            .enumerate()
            .map(|(i, (status, amount))| {
                Order::new(i as u128 + 1, STATUSES[status], amount, (i % 5) as u128)
            })
            .collect()
    })
}

fn filter_strategy() -> impl Strategy<Value = FilterExpr> {
    prop_oneof![
        (0usize..STATUSES.len()).prop_map(|i| FilterExpr::eq("status", STATUSES[i])),
        (-500i64..500).prop_map(|bound| FilterExpr::gt("amount", bound)),
        (0usize..STATUSES.len(), -500i64..500).prop_map(|(i, bound)| FilterExpr::and(vec![
            FilterExpr::eq("status", STATUSES[i]),
            FilterExpr::lte("amount", bound),
        ])),
    ]
}

proptest! {
    /// Count always equals the length of the list returned by a record
    /// fetch with the same predicate, and the id variant agrees too.
    #[test]
    fn count_equals_fetch_all_len(orders in orders_strategy(), filter in filter_strategy()) {
        let registry = fixtures::registry();
        let host = MemoryHost::new(&registry);
        for order in &orders {
            host.upsert(&registry, order).unwrap();
        }
        let ctx = host.root_context();
        let db = FetchSession::new(&*ctx, &registry);

        let fetched = db.fetch::<Order>().filter(filter.clone()).all().unwrap();
        let ids = db.fetch::<Order>().filter(filter.clone()).all_ids().unwrap();
        let counted = db.fetch::<Order>().filter(filter).count().unwrap();

        prop_assert_eq!(counted as usize, fetched.len());
        prop_assert_eq!(ids.len(), fetched.len());
    }

    /// Rebinding a fetched list into a child context preserves both the
    /// length and the order of the input.
    #[test]
    fn rebind_all_preserves_order_and_length(orders in orders_strategy()) {
        let registry = fixtures::registry();
        let host = MemoryHost::new(&registry);
        for order in &orders {
            host.upsert(&registry, order).unwrap();
        }
        let parent = host.root_context();
        let child = parent.child();
        let parent_db = FetchSession::new(&*parent, &registry);
        let child_db = FetchSession::new(&*child, &registry);

        let fetched = parent_db
            .fetch::<Order>()
            .order_by(SortExpr::asc("amount").then_asc("id"))
            .all()
            .unwrap();
        let rebound = child_db.rebind_all(&fetched).unwrap();

        prop_assert_eq!(rebound.len(), fetched.len());
        let rebound_ids: Vec<Id<Order>> = rebound.iter().map(|r| r.id()).collect();
        let fetched_ids: Vec<Id<Order>> = fetched.iter().map(|r| r.id()).collect();
        prop_assert_eq!(rebound_ids, fetched_ids);
        for record in &rebound {
            prop_assert_eq!(record.context_id(), child_db.context_id());
        }
    }

    /// A limit-1 identifier fetch under explicit ordering agrees with the
    /// head of the full identifier fetch.
    #[test]
    fn one_id_is_the_head_of_all_ids(orders in orders_strategy(), filter in filter_strategy()) {
        let registry = fixtures::registry();
        let host = MemoryHost::new(&registry);
        for order in &orders {
            host.upsert(&registry, order).unwrap();
        }
        let ctx = host.root_context();
        let db = FetchSession::new(&*ctx, &registry);
        let order = SortExpr::desc("amount").then_asc("id");

        let all_ids = db
            .fetch::<Order>()
            .filter(filter.clone())
            .order_by(order.clone())
            .all_ids()
            .unwrap();
        let one = db
            .fetch::<Order>()
            .filter(filter)
            .order_by(order)
            .one_id();

        match all_ids.first() {
            Some(head) => prop_assert_eq!(one.unwrap(), *head),
            None => prop_assert!(one.unwrap_err().is_not_found()),
        }
    }
}

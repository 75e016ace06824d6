use crate::{
    context::HostContext,
    metadata::MetadataRegistry,
    predicate::{CompareOp, Predicate},
    request::{
        AggregateOp, FetchOutcome, FetchRequest, OrderDirection, RequestError, ResultShape,
        SelectField, SelectSpec, SortKey, Staleness,
    },
    test_support::{
        MemoryHost,
        fixtures::{self, Order},
    },
    traits::{EntitySchema, EntityValue},
    value::Value,
};

fn seeded() -> (MetadataRegistry, MemoryHost) {
    let registry = fixtures::registry();
    let host = MemoryHost::new(&registry);

    for order in [
        Order::new(1, "PAID", 100, 10),
        Order::new(2, "PAID", 250, 10),
        Order::new(3, "OPEN", 75, 11),
        Order::new(4, "VOID", 0, 11),
    ] {
        host.upsert(&registry, &order).unwrap();
    }

    (registry, host)
}

fn request(registry: &MetadataRegistry, shape: ResultShape) -> FetchRequest {
    FetchRequest::new(&registry.resolve::<Order>().unwrap(), shape)
}

fn status_eq(status: &str) -> Predicate {
    Predicate::compare("status", CompareOp::Eq, Value::from(status))
}

#[test]
fn count_descriptor_counts_matches_only() {
    let (registry, host) = seeded();
    let ctx = host.root_context();

    let mut req = request(&registry, ResultShape::Count);
    req.predicate = Some(status_eq("PAID"));

    let FetchOutcome::Count(n) = ctx.execute(&req).unwrap() else {
        panic!("expected count outcome");
    };
    assert_eq!(n, 2);
}

#[test]
fn record_descriptor_sorts_and_windows() {
    let (registry, host) = seeded();
    let ctx = host.root_context();

    let mut req = request(&registry, ResultShape::Records);
    req.sort = vec![SortKey {
        field: "amount".to_string(),
        direction: OrderDirection::Desc,
    }];
    req.limit = Some(2);

    let FetchOutcome::Records(rows) = ctx.execute(&req).unwrap() else {
        panic!("expected records outcome");
    };
    let amounts: Vec<i64> = rows
        .iter()
        .map(|row| row.value("amount").unwrap().as_int().unwrap())
        .collect();
    assert_eq!(amounts, vec![250, 100]);
}

#[test]
fn offset_without_order_is_rejected() {
    let (registry, host) = seeded();
    let ctx = host.root_context();

    let mut req = request(&registry, ResultShape::Records);
    req.offset = 3;

    let err = ctx.execute(&req).unwrap_err();
    assert_eq!(err.message, RequestError::OffsetWithoutOrder.to_string());
}

#[test]
fn grouped_projection_applies_having() {
    let (registry, host) = seeded();
    let ctx = host.root_context();

    let mut req = request(&registry, ResultShape::Rows);
    req.select = vec![
        SelectSpec {
            name: "status".to_string(),
            field: SelectField::Field("status".to_string()),
        },
        SelectSpec {
            name: "sum_amount".to_string(),
            field: SelectField::Aggregate {
                op: AggregateOp::Sum,
                field: Some("amount".to_string()),
            },
        },
    ];
    req.group_by = vec!["status".to_string()];
    req.having = Some(Predicate::compare(
        "sum_amount",
        CompareOp::Gt,
        Value::Int(50),
    ));

    let FetchOutcome::Rows(rows) = ctx.execute(&req).unwrap() else {
        panic!("expected rows outcome");
    };
    // VOID sums to 0 and is filtered out; canonical order is by group key.
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].get("status"), Some(&Value::from("OPEN")));
    assert_eq!(rows[0].get("sum_amount"), Some(&Value::Int(75)));
    assert_eq!(rows[1].get("status"), Some(&Value::from("PAID")));
    assert_eq!(rows[1].get("sum_amount"), Some(&Value::Int(350)));
}

#[test]
fn ungrouped_aggregates_over_empty_set_follow_sql() {
    let (registry, host) = seeded();
    let ctx = host.root_context();

    let mut req = request(&registry, ResultShape::Rows);
    req.predicate = Some(status_eq("MISSING"));
    req.select = vec![
        SelectSpec {
            name: "count".to_string(),
            field: SelectField::Aggregate {
                op: AggregateOp::Count,
                field: None,
            },
        },
        SelectSpec {
            name: "sum_amount".to_string(),
            field: SelectField::Aggregate {
                op: AggregateOp::Sum,
                field: Some("amount".to_string()),
            },
        },
    ];

    let FetchOutcome::Rows(rows) = ctx.execute(&req).unwrap() else {
        panic!("expected rows outcome");
    };
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].get("count"), Some(&Value::Uint(0)));
    assert_eq!(rows[0].get("sum_amount"), Some(&Value::Null));
}

#[test]
fn existing_row_serves_cache_until_refresh() {
    let (registry, host) = seeded();
    let ctx = host.root_context();
    let meta = registry.resolve::<Order>().unwrap();
    let id = Order::new(1, "PAID", 100, 10).id().key();

    let first = ctx.existing_row(&meta, id).unwrap().unwrap();
    assert_eq!(first.value("status"), Some(&Value::from("PAID")));

    // Store changes behind the context's back.
    host.upsert(&registry, &Order::new(1, "VOID", 100, 10)).unwrap();

    let stale = ctx.existing_row(&meta, id).unwrap().unwrap();
    assert_eq!(stale.value("status"), Some(&Value::from("PAID")));

    ctx.refresh_all_objects();

    let fresh = ctx.existing_row(&meta, id).unwrap().unwrap();
    assert_eq!(fresh.value("status"), Some(&Value::from("VOID")));
}

#[test]
fn require_fresh_bypasses_cached_rows() {
    let (registry, host) = seeded();
    let ctx = host.root_context();

    // Materialize (and cache) every order.
    let req = request(&registry, ResultShape::Records);
    ctx.execute(&req).unwrap();

    host.upsert(&registry, &Order::new(2, "VOID", 250, 10)).unwrap();

    let mut stale_req = request(&registry, ResultShape::Records);
    stale_req.predicate = Some(Predicate::compare(
        "id",
        CompareOp::Eq,
        Order::new(2, "VOID", 250, 10).id().as_value(),
    ));

    let FetchOutcome::Records(stale) = ctx.execute(&stale_req).unwrap() else {
        panic!("expected records outcome");
    };
    assert_eq!(stale[0].value("status"), Some(&Value::from("PAID")));

    let mut fresh_req = stale_req.clone();
    fresh_req.staleness = Staleness::RequireFresh;

    let FetchOutcome::Records(fresh) = ctx.execute(&fresh_req).unwrap() else {
        panic!("expected records outcome");
    };
    assert_eq!(fresh[0].value("status"), Some(&Value::from("VOID")));
}

#[test]
fn sibling_contexts_keep_independent_caches() {
    let (registry, host) = seeded();
    let parent = host.root_context();
    let left = parent.child();
    let right = parent.child();
    let meta = registry.resolve::<Order>().unwrap();
    let id = Order::new(3, "OPEN", 75, 11).id().key();

    left.existing_row(&meta, id).unwrap().unwrap();
    right.existing_row(&meta, id).unwrap().unwrap();

    left.refresh_all_objects();

    assert_eq!(left.cached_rows(), 0);
    assert_eq!(right.cached_rows(), 1);
    assert_eq!(right.refresh_count(), 0);
}

#[test]
fn unknown_predicate_field_is_rejected() {
    let (registry, host) = seeded();
    let ctx = host.root_context();

    let mut req = request(&registry, ResultShape::Count);
    req.predicate = Some(Predicate::compare("missing", CompareOp::Eq, Value::Int(1)));

    let err = ctx.execute(&req).unwrap_err();
    assert_eq!(
        err.message,
        RequestError::UnknownField {
            entity: Order::MODEL.entity_name,
            field: "missing".to_string(),
        }
        .to_string()
    );
}

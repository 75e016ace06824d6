//! Reference evaluation of fetch descriptors over in-memory rows.
//!
//! Semantics follow the contract documentation: strict predicate
//! comparisons, canonical sort order, SQL-style aggregates over empty sets
//! (`count` is 0, the rest are `Null`).

use super::{MemoryContext, MemoryStore};
use crate::{
    error::InternalError,
    predicate::{CompareOp, ComparePredicate, Predicate},
    request::{
        AggregateOp, FetchOutcome, FetchRequest, OrderDirection, ResultShape, SelectField,
        SelectSpec, SortKey,
    },
    row::{Row, ValueMap},
    value::{Float64, Value},
};
use log::trace;
use std::{cmp::Ordering, collections::HashMap};

pub(super) fn execute(
    ctx: &MemoryContext,
    store: &MemoryStore,
    request: &FetchRequest,
) -> Result<FetchOutcome, InternalError> {
    let matched: Vec<&Row> = store
        .rows_of(request.entity.path)
        .filter(|row| matches(request.predicate.as_ref(), row))
        .collect();

    trace!(
        "{}: {} row(s) match in store '{}'",
        request.entity.entity_name,
        matched.len(),
        request.store,
    );

    let outcome = match request.shape {
        ResultShape::Count => {
            FetchOutcome::Count(ordered_window(matched, request).len() as u64)
        }
        ResultShape::Ids => FetchOutcome::Ids(
            ordered_window(matched, request)
                .into_iter()
                .map(|row| row.id)
                .collect(),
        ),
        ResultShape::Records => FetchOutcome::Records(
            ordered_window(matched, request)
                .into_iter()
                .map(|row| ctx.materialize(request.entity.path, request.staleness, row))
                .collect(),
        ),
        ResultShape::Rows => FetchOutcome::Rows(project(matched, request)),
    };

    Ok(outcome)
}

// ---------------------------------------------------------------------
// Predicate evaluation
// ---------------------------------------------------------------------

fn matches(pred: Option<&Predicate>, row: &Row) -> bool {
    pred.is_none_or(|p| eval(p, &|field| row.value(field).cloned()))
}

fn eval(pred: &Predicate, lookup: &impl Fn(&str) -> Option<Value>) -> bool {
    match pred {
        Predicate::True => true,
        Predicate::False => false,
        Predicate::And(preds) => preds.iter().all(|p| eval(p, lookup)),
        Predicate::Or(preds) => preds.iter().any(|p| eval(p, lookup)),
        Predicate::Not(p) => !eval(p, lookup),
        Predicate::Compare(cmp) => compare(cmp, lookup),
        Predicate::IsNull { field } => lookup(field).is_some_and(|v| v.is_null()),
    }
}

fn compare(cmp: &ComparePredicate, lookup: &impl Fn(&str) -> Option<Value>) -> bool {
    let Some(stored) = lookup(&cmp.field) else {
        return false;
    };

    match cmp.op {
        CompareOp::Eq => stored == cmp.value,
        CompareOp::Ne => stored != cmp.value,
        CompareOp::Lt => ordered(&stored, &cmp.value).is_some_and(Ordering::is_lt),
        CompareOp::Lte => ordered(&stored, &cmp.value).is_some_and(Ordering::is_le),
        CompareOp::Gt => ordered(&stored, &cmp.value).is_some_and(Ordering::is_gt),
        CompareOp::Gte => ordered(&stored, &cmp.value).is_some_and(Ordering::is_ge),
        CompareOp::In => in_list(&stored, &cmp.value),
        CompareOp::NotIn => !in_list(&stored, &cmp.value),
        CompareOp::Contains => contains(&stored, &cmp.value),
        CompareOp::StartsWith => text_pair(&stored, &cmp.value)
            .is_some_and(|(s, needle)| s.starts_with(needle)),
        CompareOp::EndsWith => {
            text_pair(&stored, &cmp.value).is_some_and(|(s, needle)| s.ends_with(needle))
        }
    }
}

// Strict: range comparisons only apply within one kind.
fn ordered(stored: &Value, operand: &Value) -> Option<Ordering> {
    stored.same_kind(operand).then(|| stored.cmp(operand))
}

fn in_list(stored: &Value, operand: &Value) -> bool {
    match operand {
        Value::List(items) => items.contains(stored),
        _ => false,
    }
}

fn contains(stored: &Value, operand: &Value) -> bool {
    match stored {
        Value::List(items) => items.contains(operand),
        Value::Text(_) => {
            text_pair(stored, operand).is_some_and(|(s, needle)| s.contains(needle))
        }
        _ => false,
    }
}

fn text_pair<'a>(stored: &'a Value, operand: &'a Value) -> Option<(&'a str, &'a str)> {
    Some((stored.as_text()?, operand.as_text()?))
}

// ---------------------------------------------------------------------
// Ordering and windowing
// ---------------------------------------------------------------------

fn ordered_window<'a>(mut rows: Vec<&'a Row>, request: &FetchRequest) -> Vec<&'a Row> {
    if !request.sort.is_empty() {
        rows.sort_by(|a, b| cmp_rows(a, b, &request.sort));
    }

    window(rows, request.offset, request.limit)
}

fn window<T>(items: Vec<T>, offset: u32, limit: Option<u32>) -> Vec<T> {
    items
        .into_iter()
        .skip(offset as usize)
        .take(limit.map_or(usize::MAX, |l| l as usize))
        .collect()
}

fn cmp_rows(a: &Row, b: &Row, sort: &[SortKey]) -> Ordering {
    for key in sort {
        let left = a.value(&key.field).cloned().unwrap_or(Value::Null);
        let right = b.value(&key.field).cloned().unwrap_or(Value::Null);

        let ord = match key.direction {
            OrderDirection::Asc => left.cmp(&right),
            OrderDirection::Desc => right.cmp(&left),
        };
        if ord != Ordering::Equal {
            return ord;
        }
    }

    Ordering::Equal
}

fn cmp_maps(a: &ValueMap, b: &ValueMap, sort: &[SortKey]) -> Ordering {
    for key in sort {
        let left = a.get(&key.field).cloned().unwrap_or(Value::Null);
        let right = b.get(&key.field).cloned().unwrap_or(Value::Null);

        let ord = match key.direction {
            OrderDirection::Asc => left.cmp(&right),
            OrderDirection::Desc => right.cmp(&left),
        };
        if ord != Ordering::Equal {
            return ord;
        }
    }

    Ordering::Equal
}

// ---------------------------------------------------------------------
// Projection
// ---------------------------------------------------------------------

fn project(matched: Vec<&Row>, request: &FetchRequest) -> Vec<ValueMap> {
    if !request.group_by.is_empty() {
        return project_grouped(&matched, request);
    }

    let has_aggregate = request
        .select
        .iter()
        .any(|spec| matches!(spec.field, SelectField::Aggregate { .. }));

    if has_aggregate {
        // One output row over the whole matched set.
        let mut map = ValueMap::new();
        for spec in &request.select {
            map.insert(spec.name.clone(), project_item(spec, &matched));
        }

        window(vec![map], request.offset, request.limit)
    } else {
        ordered_window(matched, request)
            .into_iter()
            .map(|row| {
                let mut map = ValueMap::new();
                for spec in &request.select {
                    map.insert(spec.name.clone(), project_item(spec, &[row]));
                }
                map
            })
            .collect()
    }
}

fn project_grouped(matched: &[&Row], request: &FetchRequest) -> Vec<ValueMap> {
    let mut groups: HashMap<Vec<Value>, Vec<&Row>> = HashMap::new();

    for &row in matched {
        let key: Vec<Value> = request
            .group_by
            .iter()
            .map(|field| row.value(field).cloned().unwrap_or(Value::Null))
            .collect();
        groups.entry(key).or_default().push(row);
    }

    // Canonical group order keeps unsorted grouped output deterministic.
    let mut grouped: Vec<(Vec<Value>, Vec<&Row>)> = groups.into_iter().collect();
    grouped.sort_by(|(a, _), (b, _)| a.cmp(b));

    let mut out: Vec<ValueMap> = grouped
        .into_iter()
        .map(|(key, rows)| {
            let mut map = ValueMap::new();
            for (field, value) in request.group_by.iter().zip(key) {
                map.insert(field.clone(), value);
            }
            for spec in &request.select {
                if !map.contains(&spec.name) {
                    map.insert(spec.name.clone(), project_item(spec, &rows));
                }
            }
            map
        })
        .filter(|map| {
            request
                .having
                .as_ref()
                .is_none_or(|pred| eval(pred, &|field| map.get(field).cloned()))
        })
        .collect();

    if !request.sort.is_empty() {
        out.sort_by(|a, b| cmp_maps(a, b, &request.sort));
    }

    window(out, request.offset, request.limit)
}

fn project_item(spec: &SelectSpec, rows: &[&Row]) -> Value {
    match &spec.field {
        SelectField::Field(name) => rows
            .first()
            .and_then(|row| row.value(name).cloned())
            .unwrap_or(Value::Null),
        SelectField::Aggregate { op, field } => aggregate(*op, field.as_deref(), rows),
    }
}

// ---------------------------------------------------------------------
// Aggregates
// ---------------------------------------------------------------------

fn aggregate(op: AggregateOp, field: Option<&str>, rows: &[&Row]) -> Value {
    match op {
        AggregateOp::Count => match field {
            None => Value::Uint(rows.len() as u64),
            Some(name) => Value::Uint(present_values(name, rows).count() as u64),
        },
        AggregateOp::Sum => sum(field, rows),
        AggregateOp::Avg => avg(field, rows),
        AggregateOp::Min => extremum(field, rows, Ordering::Less),
        AggregateOp::Max => extremum(field, rows, Ordering::Greater),
    }
}

fn present_values<'a>(
    field: &'a str,
    rows: &'a [&'a Row],
) -> impl Iterator<Item = &'a Value> + 'a {
    rows.iter()
        .filter_map(move |row| row.value(field))
        .filter(|value| !value.is_null())
}

fn sum(field: Option<&str>, rows: &[&Row]) -> Value {
    let Some(field) = field else {
        return Value::Null;
    };
    let values: Vec<&Value> = present_values(field, rows).collect();
    if values.is_empty() {
        return Value::Null;
    }

    if values.iter().all(|v| matches!(v, Value::Int(_))) {
        let total: i128 = values.iter().filter_map(|v| v.as_int()).map(i128::from).sum();
        return i64::try_from(total)
            .map_or_else(|_| Value::Float64(Float64(total as f64)), Value::Int);
    }
    if values.iter().all(|v| matches!(v, Value::Uint(_))) {
        let total: u128 = values.iter().filter_map(|v| v.as_uint()).map(u128::from).sum();
        return u64::try_from(total)
            .map_or_else(|_| Value::Float64(Float64(total as f64)), Value::Uint);
    }

    numeric_f64s(&values).map_or(Value::Null, |nums| {
        Value::Float64(Float64(nums.into_iter().sum()))
    })
}

fn avg(field: Option<&str>, rows: &[&Row]) -> Value {
    let Some(field) = field else {
        return Value::Null;
    };
    let values: Vec<&Value> = present_values(field, rows).collect();
    if values.is_empty() {
        return Value::Null;
    }

    numeric_f64s(&values).map_or(Value::Null, |nums| {
        let len = nums.len() as f64;
        Value::Float64(Float64(nums.into_iter().sum::<f64>() / len))
    })
}

fn extremum(field: Option<&str>, rows: &[&Row], keep: Ordering) -> Value {
    let Some(field) = field else {
        return Value::Null;
    };

    present_values(field, rows)
        .cloned()
        .reduce(|best, next| if next.cmp(&best) == keep { next } else { best })
        .unwrap_or(Value::Null)
}

fn numeric_f64s(values: &[&Value]) -> Option<Vec<f64>> {
    values.iter().map(|v| numeric_f64(v)).collect()
}

const fn numeric_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Int(v) => Some(*v as f64),
        Value::Uint(v) => Some(*v as f64),
        Value::Float64(v) => Some(v.get()),
        _ => None,
    }
}

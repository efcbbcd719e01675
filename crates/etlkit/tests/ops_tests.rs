// Header, filter, transform, convert, join, union and aggregate operations.

use etlkit::prelude::*;
use pretty_assertions::assert_eq;

fn orders() -> Table {
    table!(
        id          = vec![1, 2, 3],
        customer_id = vec![10, 11, 10],
        total       = vec![Some(500), Some(1500), None],
    ).unwrap()
}
fn customers() -> Table {
    table!(
        customer_id = vec![10, 11],
        name        = vec!["Ana", "Leo"],
    ).unwrap()
}
fn ints(table: &Table, col: &str) -> Vec<Option<i64>> {
    table.column(col).unwrap().values().map(|v| v.as_i64()).collect()
}
fn texts(table: &Table, col: &str) -> Vec<Option<String>> {
    table.column(col).unwrap().values().map(|v| v.to_text()).collect()
}

/* -----------------------------------------------------------------------------
scenarios
----------------------------------------------------------------------------- */
#[test]
fn orders_left_join_customers_then_sum() {
    let joined = join::join(&orders(), &customers(), &JoinKeys::on("customer_id"), JoinKind::Left).unwrap();
    assert_eq!(joined.n_row(), 3);
    assert_eq!(joined.cell("name", 2).unwrap(), Value::from("Ana"));

    let sums = aggregate::group_by_sum(&joined, &["name"], "total").unwrap();
    assert_eq!(texts(&sums, "name"), vec![Some("Ana".to_string()), Some("Leo".to_string())]);
    assert_eq!(ints(&sums, "total"), vec![Some(500), Some(1500)]);
}

#[test]
fn in_range_excludes_missing() {
    let kept = filter::in_range(&orders(), "total", 500, 1500, false).unwrap();
    assert_eq!(ints(&kept, "id"), vec![Some(1), Some(2)]);
}

/* -----------------------------------------------------------------------------
properties
----------------------------------------------------------------------------- */
#[test]
fn left_join_keeps_every_left_row() {
    let dup_customers = table!(
        customer_id = vec![10, 10, 12],
        name        = vec!["Ana", "Ana B", "Eva"],
    ).unwrap();
    let joined = join::join(&orders(), &dup_customers, &JoinKeys::on("customer_id"), JoinKind::Left).unwrap();
    assert!(joined.n_row() >= orders().n_row());
    assert_eq!(ints(&joined, "id"), vec![Some(1), Some(1), Some(2), Some(3), Some(3)]);
    assert_eq!(joined.cell("name", 2).unwrap(), Value::Missing);
}

#[test]
fn union_all_adds_rows_and_unions_columns() {
    let a = orders();
    let b = table!(id = vec![4], region = vec!["norte"]).unwrap();
    let bound = bind::union_all(&[&a, &b]).unwrap();
    assert_eq!(bound.n_row(), a.n_row() + b.n_row());
    assert_eq!(bound.col_names(), &["id", "customer_id", "total", "region"]);
    assert_eq!(bound.cell("region", 0).unwrap(), Value::Missing);
    assert_eq!(bound.cell("customer_id", 3).unwrap(), Value::Missing);
}

#[test]
fn drop_duplicates_keeps_first_occurrence() {
    let deduped = transform::drop_duplicates(&orders(), &["customer_id"]).unwrap();
    assert_eq!(ints(&deduped, "id"), vec![Some(1), Some(2)]);
}

#[test]
fn sort_is_non_decreasing_and_stable() {
    let sorted = transform::sort(&orders(), &["customer_id"], &[true]).unwrap();
    assert_eq!(ints(&sorted, "customer_id"), vec![Some(10), Some(10), Some(11)]);
    assert_eq!(ints(&sorted, "id"), vec![Some(1), Some(3), Some(2)]);
}

#[test]
fn rename_and_drop_are_idempotent() {
    let renamed = header::rename(&orders(), &[("total", "valor")]).unwrap();
    let empty: &[(&str, &str)] = &[];
    assert_eq!(header::rename(&renamed, empty).unwrap(), renamed);

    let dropped = header::drop(&orders(), &["total"]);
    assert_eq!(header::drop(&dropped, &["total"]), dropped);
}

#[test]
fn replace_all_headers_round_trips() {
    let names = ["a", "b", "c"];
    let renamed = header::replace_all_headers(&orders(), &names).unwrap();
    assert_eq!(renamed.col_names(), &names);
}

/* -----------------------------------------------------------------------------
header operations
----------------------------------------------------------------------------- */
#[test]
fn header_errors() {
    assert!(matches!(header::rename(&orders(), &[("nope", "x")]), Err(EtlError::ColumnNotFound(_))));
    assert!(matches!(header::rename(&orders(), &[("id", "total")]), Err(EtlError::DuplicateColumn(_))));
    assert!(matches!(header::replace_all_headers(&orders(), &["a"]), Err(EtlError::Shape(_))));
}

#[test]
fn prefix_suffix_and_select() {
    let t = header::add_suffix(&header::add_prefix(&customers(), "c_"), "_v1");
    assert_eq!(t.col_names(), &["c_customer_id_v1", "c_name_v1"]);

    let picked = header::select(&orders(), &["total", "id"], false).unwrap();
    assert_eq!(picked.col_names(), &["total", "id"]);
    let rest = header::select(&orders(), &["total", "nope"], true).unwrap();
    assert_eq!(rest.col_names(), &["id", "customer_id"]);
    assert!(header::select(&orders(), &["nope"], false).is_err());
}

/* -----------------------------------------------------------------------------
filters
----------------------------------------------------------------------------- */
#[test]
fn complement_is_exact_set_difference() {
    let t = orders();
    let matched = filter::equal(&t, "total", 500, false).unwrap();
    let rest = filter::equal(&t, "total", 500, true).unwrap();
    assert_eq!(ints(&matched, "id"), vec![Some(1)]);
    assert_eq!(ints(&rest, "id"), vec![Some(2), Some(3)]);
    assert_eq!(filter::not_equal(&t, "total", 500, false).unwrap(), rest);
}

#[test]
fn null_filters() {
    let t = orders();
    assert_eq!(ints(&filter::is_null(&t, "total", false).unwrap(), "id"), vec![Some(3)]);
    assert_eq!(ints(&filter::not_null(&t, "total", false).unwrap(), "id"), vec![Some(1), Some(2)]);
    assert_eq!(filter::not_null(&t, "total", true).unwrap(), filter::is_null(&t, "total", false).unwrap());
}

#[test]
fn in_range_rejects_non_numeric_bounds() {
    let err = filter::in_range(&orders(), "total", "a", 10, false).unwrap_err();
    assert!(matches!(err, EtlError::Type(_)));
}

#[test]
fn contains_in_set_and_search() {
    let t = customers();
    assert_eq!(filter::contains(&t, "name", "An", false).unwrap().n_row(), 1);
    assert_eq!(ints(&filter::in_set(&orders(), "id", [1, 3], false).unwrap(), "id"), vec![Some(1), Some(3)]);
    assert_eq!(filter::search_in_table(&t, "Leo", false).unwrap().n_row(), 1);
    assert_eq!(filter::search_in_table(&orders(), "15", false).unwrap().n_row(), 1);
}

#[test]
fn by_operation_skips_missing_cells() {
    let kept = filter::by_operation(&orders(), "total", |cell, value| {
        cell.compare(value).is_some_and(|o| o.is_gt())
    }, 600, false).unwrap();
    assert_eq!(ints(&kept, "id"), vec![Some(2)]);
    let rest = filter::by_operation(&orders(), "total", |_, _| true, 0, true).unwrap();
    assert_eq!(ints(&rest, "id"), vec![Some(3)]);
}

#[test]
fn by_condition_reads_rows() {
    let kept = filter::by_condition(&orders(), |row| {
        Ok(row.get("customer_id")? == Value::Integer(10))
    }, false).unwrap();
    assert_eq!(ints(&kept, "id"), vec![Some(1), Some(3)]);
    assert!(filter::by_condition(&orders(), |row| row.get("nope").map(|_| true), false).is_err());
}

#[test]
fn unique_values_in_first_seen_order() {
    assert_eq!(filter::unique_values(&orders(), "customer_id").unwrap(), vec![Value::Integer(10), Value::Integer(11)]);
}

/* -----------------------------------------------------------------------------
transforms
----------------------------------------------------------------------------- */
#[test]
fn add_and_apply_columns() {
    let t = transform::add_column(&orders(), "double", |row| Ok(row.get("total")? * Value::Integer(2))).unwrap();
    assert_eq!(ints(&t, "double"), vec![Some(1000), Some(3000), None]);

    let t = transform::apply_to_column(&t, "total", |_| Value::Missing).unwrap();
    assert_eq!(t.col_type("total").unwrap(), DataType::Integer);
}

#[test]
fn sort_puts_missing_last_in_both_directions() {
    let desc = transform::sort(&orders(), &["total"], &[false]).unwrap();
    assert_eq!(ints(&desc, "id"), vec![Some(2), Some(1), Some(3)]);
    let asc = transform::sort(&orders(), &["total"], &[true]).unwrap();
    assert_eq!(ints(&asc, "id"), vec![Some(1), Some(2), Some(3)]);
}

#[test]
fn sort_orders_nan_after_numbers() {
    let mut csv = String::from("id,x\n");
    for i in 0..40 {
        let x = if i % 3 == 0 { "NaN".to_string() } else { format!("{}", 40 - i) };
        csv.push_str(&format!("{i},{x}\n"));
    }
    csv.push_str("40,\n");
    let t = Table::read_csv(csv.as_bytes(), b',').unwrap();
    assert_eq!(t.col_type("x").unwrap(), DataType::Numeric);

    let sorted = transform::sort(&t, &["x"], &[true]).unwrap();
    let values: Vec<Value> = sorted.column("x").unwrap().values().collect();
    assert_eq!(values.len(), 41);
    assert_eq!(values[40], Value::Missing);
    let numbers: Vec<f64> = values[..26].iter().map(|v| v.as_f64().unwrap()).collect();
    assert!(numbers.windows(2).all(|w| w[0] <= w[1]));
    assert!(values[26..40].iter().all(|v| v.as_f64().is_some_and(f64::is_nan)));

    let desc = transform::sort(&t, &["x"], &[false]).unwrap();
    assert!(desc.cell("x", 0).unwrap().as_f64().is_some_and(f64::is_nan));
    assert_eq!(desc.cell("x", 40).unwrap(), Value::Missing);
}

#[test]
fn sort_multi_key_and_flag_count() {
    let sorted = transform::sort(&orders(), &["customer_id", "id"], &[true, false]).unwrap();
    assert_eq!(ints(&sorted, "id"), vec![Some(3), Some(1), Some(2)]);
    let err = transform::sort(&orders(), &["customer_id", "id"], &[true, false, true]).unwrap_err();
    assert!(matches!(err, EtlError::Shape(_)));
}

#[test]
fn ordered_categories_sort_by_rank() {
    let t = table!(nivel = vec!["alto", "bajo", "medio"]).unwrap();
    let t = convert::to_ordered_category(&t, "nivel", &["bajo", "medio", "alto"]).unwrap();
    let sorted = transform::sort(&t, &["nivel"], &[true]).unwrap();
    assert_eq!(texts(&sorted, "nivel"), vec![Some("bajo".into()), Some("medio".into()), Some("alto".into())]);
}

#[test]
fn replace_values_pairwise_and_broadcast() {
    let t = transform::replace_values(&customers(), "name", ["Ana", "Leo"], ["A", "L"]).unwrap();
    assert_eq!(texts(&t, "name"), vec![Some("A".into()), Some("L".into())]);
    let t = transform::replace_values(&customers(), "name", ["Ana", "Leo"], ["X"]).unwrap();
    assert_eq!(texts(&t, "name"), vec![Some("X".into()), Some("X".into())]);
    assert!(transform::replace_values(&customers(), "name", ["Ana", "Leo", "Eva"], ["X", "Y"]).is_err());
}

#[test]
fn split_columns() {
    let t = table!(id = vec![1, 2], tags = vec![Some("a, b"), None]).unwrap();
    let rows = transform::split_column_into_rows(&t, "tags", ",").unwrap();
    assert_eq!(ints(&rows, "id"), vec![Some(1), Some(1), Some(2)]);
    assert_eq!(texts(&rows, "tags"), vec![Some("a".into()), Some("b".into()), None]);

    let cols = transform::split_string_column(&t, "tags", ",", &[] as &[&str]).unwrap();
    assert_eq!(texts(&cols, "tags_2"), vec![Some("b".into()), None]);
    assert!(transform::split_string_column(&t, "tags", ",", &["only_one"]).is_err());
}

/* -----------------------------------------------------------------------------
conversions
----------------------------------------------------------------------------- */
#[test]
fn permissive_and_strict_coercion() {
    let t = table!(x = vec![Some("1"), Some("dos"), None]).unwrap();
    let permissive = convert::convert_type(&t, &["x"], DataType::Integer, CoercionPolicy::Permissive).unwrap();
    assert_eq!(ints(&permissive, "x"), vec![Some(1), None, None]);

    let err = convert::convert_type(&t, &["x"], DataType::Integer, CoercionPolicy::Strict).unwrap_err();
    assert!(matches!(err, EtlError::Coercion { value, .. } if value == "dos"));
    assert_eq!("strict".parse::<CoercionPolicy>().unwrap(), CoercionPolicy::Strict);
}

#[test]
fn clean_numeric_and_booleans() {
    let t = table!(price = vec!["$1,200.50", "n/a"], flag = vec![Some(true), None]).unwrap();
    let t = convert::clean_numeric(&t, &["price"]).unwrap();
    assert_eq!(t.cell("price", 0).unwrap(), Value::Numeric(1200.5));
    assert_eq!(t.cell("price", 1).unwrap(), Value::Missing);
    let t = convert::boolean_to_binary(&t, &["flag"]).unwrap();
    assert_eq!(ints(&t, "flag"), vec![Some(1), None]);
}

#[test]
fn date_components() {
    let t = table!(fecha = vec!["2024-03-01 08:15:00", "not a date"]).unwrap();
    let t = convert::extract_date_components(&t, "fecha", &DateComponent::ALL).unwrap();
    assert_eq!(ints(&t, "fecha_year"), vec![Some(2024), None]);
    assert_eq!(ints(&t, "fecha_weekday"), vec![Some(4), None]);
    assert_eq!(ints(&t, "fecha_minute"), vec![Some(15), None]);
}

/* -----------------------------------------------------------------------------
joins and unions
----------------------------------------------------------------------------- */
#[test]
fn join_kinds_and_row_order() {
    let left = table!(k = vec![Some(1), Some(2), None], l = vec!["a", "b", "c"]).unwrap();
    let right = table!(k = vec![Some(3), Some(1), None], r = vec!["x", "y", "z"]).unwrap();
    let keys = JoinKeys::on("k");

    let inner = join::join(&left, &right, &keys, JoinKind::Inner).unwrap();
    assert_eq!(texts(&inner, "r"), vec![Some("y".into())]);

    let right_join = join::join(&left, &right, &keys, JoinKind::Right).unwrap();
    assert_eq!(ints(&right_join, "k"), vec![Some(3), Some(1), None]);
    assert_eq!(texts(&right_join, "l"), vec![None, Some("a".into()), None]);

    let outer = join::join(&left, &right, &keys, JoinKind::Outer).unwrap();
    assert_eq!(outer.n_row(), 5);
    assert_eq!(ints(&outer, "k"), vec![Some(1), Some(2), None, Some(3), None]);
}

#[test]
fn join_on_differently_named_keys_with_collisions() {
    let visits = table!(id_medico = vec![7, 8], nombre = vec!["v1", "v2"]).unwrap();
    let medico = table!(cedula = vec![7], nombre = vec!["Dra. Ruiz"]).unwrap();
    let joined = join::join(&visits, &medico, &JoinKeys::pair("id_medico", "cedula"), JoinKind::Left).unwrap();
    assert_eq!(joined.col_names(), &["id_medico", "nombre_x", "cedula", "nombre_y"]);
    assert_eq!(texts(&joined, "nombre_y"), vec![Some("Dra. Ruiz".into()), None]);
}

#[test]
fn union_all_of_nothing_is_a_type_error() {
    assert!(matches!(bind::union_all(&[]), Err(EtlError::Type(_))));
}

/* -----------------------------------------------------------------------------
aggregation
----------------------------------------------------------------------------- */
#[test]
fn group_by_count_mean_and_empty_groups() {
    let t = table!(
        g = vec![Some("a"), Some("b"), Some("a"), None],
        x = vec![Some(1.0), None, Some(3.0), Some(5.0)],
    ).unwrap();
    let counts = aggregate::group_by_count(&t, &["g"]).unwrap();
    assert_eq!(ints(&counts, "count"), vec![Some(2), Some(1), Some(1)]);
    assert_eq!(texts(&counts, "g"), vec![Some("a".into()), Some("b".into()), None]);

    let means = aggregate::group_by_mean(&t, &["g"], "x").unwrap();
    assert_eq!(means.cell("x", 0).unwrap(), Value::Numeric(2.0));
    assert_eq!(means.cell("x", 1).unwrap(), Value::Missing);

    let sums = aggregate::group_by_sum(&t, &["g"], "x").unwrap();
    assert_eq!(sums.cell("x", 1).unwrap(), Value::Numeric(0.0));
}

#[test]
fn integer_sums_widen_on_overflow() {
    let t = table!(g = vec!["a", "a", "b"], x = vec![i64::MAX, 1, 2]).unwrap();
    let sums = aggregate::group_by_sum(&t, &["g"], "x").unwrap();
    assert_eq!(sums.col_type("x").unwrap(), DataType::Numeric);
    assert_eq!(sums.cell("x", 0).unwrap(), Value::Numeric(i64::MAX as f64 + 1.0));
    assert_eq!(sums.cell("x", 1).unwrap(), Value::Numeric(2.0));
}

#[test]
fn aggregating_text_is_a_type_error() {
    assert!(matches!(aggregate::group_by_sum(&customers(), &["customer_id"], "name"), Err(EtlError::Type(_))));
    assert!(matches!(aggregate::group_by_count(&customers(), &[] as &[&str]), Err(EtlError::Shape(_))));
}

/* -----------------------------------------------------------------------------
date dimension
----------------------------------------------------------------------------- */
#[test]
fn date_dimension_covers_whole_years() {
    use std::collections::HashMap;
    use chrono::NaiveDate;
    let mut holidays = HashMap::new();
    holidays.insert(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(), "Año Nuevo".to_string());
    let dim = date_dimension(2024, 2024, &holidays).unwrap();
    assert_eq!(dim.n_row(), 366);
    assert_eq!(dim.cell_string("day_name", 0).unwrap(), "lunes");
    assert_eq!(dim.cell("is_holiday", 0).unwrap(), Value::Integer(1));
    assert_eq!(dim.cell("holiday_name", 1).unwrap(), Value::Missing);
    assert_eq!(dim.cell("quarter", 365).unwrap(), Value::Integer(4));
    assert!(matches!(date_dimension(2025, 2024, &holidays), Err(EtlError::Shape(_))));
}

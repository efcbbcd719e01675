// Table, Column and Value behavior.

use chrono::NaiveDate;
use etlkit::prelude::*;
use pretty_assertions::assert_eq;

fn orders() -> Table {
    table!(
        id          = vec![1, 2, 3],
        customer_id = vec![10, 11, 10],
        total       = vec![Some(500), Some(1500), None],
    ).unwrap()
}

#[test]
fn table_macro_builds_typed_columns() {
    let t = orders();
    assert_eq!(t.n_row(), 3);
    assert_eq!(t.col_names(), &["id", "customer_id", "total"]);
    assert_eq!(t.col_type("total").unwrap(), DataType::Integer);
    assert_eq!(t.cell("total", 2).unwrap(), Value::Missing);
    assert_eq!(t.cell("total", 1).unwrap(), Value::Integer(1500));
}

#[test]
fn schema_macro_has_zero_rows() {
    let t = table!(id: Integer, label: Text).unwrap();
    assert_eq!(t.n_row(), 0);
    assert_eq!(t.col_type("label").unwrap(), DataType::Text);
}

#[test]
fn single_values_are_recycled() {
    let t = table!(
        id     = vec![1, 2, 3],
        source = vec!["citas"],
    ).unwrap();
    assert_eq!(t.cell_string("source", 2).unwrap(), "citas");
}

#[test]
fn mismatched_lengths_are_a_shape_error() {
    let mut t = orders();
    let err = t.add_col("bad", vec![1, 2]).unwrap_err();
    assert!(matches!(err, EtlError::Shape(_)));
}

#[test]
fn duplicate_column_is_rejected() {
    let mut t = orders();
    let err = t.add_col("id", vec![7, 8, 9]).unwrap_err();
    assert!(matches!(err, EtlError::DuplicateColumn(name) if name == "id"));
}

#[test]
fn unknown_column_is_column_not_found() {
    let t = orders();
    assert!(matches!(t.column("nope"), Err(EtlError::ColumnNotFound(_))));
    assert!(matches!(t.cell("nope", 0), Err(EtlError::ColumnNotFound(_))));
}

#[test]
fn rows_expose_named_values() {
    let t = orders();
    let row = t.row(1).unwrap();
    assert_eq!(row.index(), 1);
    assert_eq!(row.get("customer_id").unwrap(), Value::Integer(11));
    assert!(row.get("nope").is_err());
    assert!(t.row(3).is_err());
}

#[test]
fn all_missing_values_infer_text() {
    let col = Column::from_values(vec![Value::Missing, Value::Missing]);
    assert_eq!(col.data_type(), DataType::Text);
}

#[test]
fn mixed_numbers_widen_to_numeric() {
    let col = Column::from_values(vec![Value::Integer(1), Value::Numeric(2.5), Value::Missing]);
    assert_eq!(col.data_type(), DataType::Numeric);
    assert_eq!(col.cell(0), Value::Numeric(1.0));
}

#[test]
fn missing_propagates_through_arithmetic() {
    assert_eq!(Value::Integer(2) + Value::Missing, Value::Missing);
    assert_eq!(Value::Integer(2) * Value::Integer(3), Value::Integer(6));
    assert_eq!(Value::Integer(3) / Value::Integer(2), Value::Numeric(1.5));
    assert_eq!(Value::Integer(1) / Value::Integer(0), Value::Missing);
    assert_eq!(Value::from("a") + Value::from("b"), Value::from("ab"));
}

#[test]
fn timestamp_difference_is_seconds() {
    let a = Value::parse_timestamp("2024-03-01 10:30:00").unwrap();
    let b = Value::parse_timestamp("2024-03-01 10:00:00").unwrap();
    assert_eq!(Value::Timestamp(a) - Value::Timestamp(b), Value::Numeric(1800.0));
}

#[test]
fn comparisons_with_missing_are_unknown() {
    assert_eq!(Value::Missing.equals(&Value::Integer(1)), None);
    assert_eq!(Value::Integer(1).equals(&Value::Numeric(1.0)), Some(true));
    assert!(Value::Integer(1).compare(&Value::Missing).is_none());
}

#[test]
fn display_shows_dimensions_and_types() {
    let text = orders().head(2);
    assert!(text.contains("Table: 2 rows × 3 columns"));
    assert!(text.contains("total <integer>"));
    assert!(!text.contains("..."));
    assert!(orders().tail(1).contains("NA"));
}

#[test]
fn negative_preview_counts_are_shape_errors() {
    let t = orders();
    assert!(matches!(t.head_signed(-1), Err(EtlError::Shape(_))));
    assert!(matches!(t.tail_signed(-3), Err(EtlError::Shape(_))));
    assert!(t.head_signed(10).unwrap().contains("Table: 3 rows"));
}

#[test]
fn csv_round_trip_keeps_types_and_missing() {
    let mut buf = Vec::new();
    orders().write_csv(&mut buf, b',').unwrap();
    let text = String::from_utf8(buf.clone()).unwrap();
    assert!(text.ends_with("3,10,\n"));
    let read = Table::read_csv(buf.as_slice(), b',').unwrap();
    assert_eq!(read, orders());
}

#[test]
fn csv_read_infers_column_types() {
    let csv = "a,b,c,d,e\n1,1.5,true,2024-01-02 03:04:05,x\nNA,,false,,y\n";
    let t = Table::read_csv(csv.as_bytes(), b',').unwrap();
    let types: Vec<DataType> = t.col_names().iter().map(|n| t.col_type(n).unwrap()).collect();
    assert_eq!(types, vec![
        DataType::Integer, DataType::Numeric, DataType::Logical, DataType::Timestamp, DataType::Text,
    ]);
    assert!(t.cell("a", 1).unwrap().is_missing());
    let ts = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap().and_hms_opt(3, 4, 5).unwrap();
    assert_eq!(t.cell("d", 0).unwrap(), Value::Timestamp(ts));
}

#[test]
fn json_records_use_null_for_missing() {
    let json = orders().to_json_records();
    assert_eq!(json[2]["total"], serde_json::Value::Null);
    assert_eq!(json[0]["customer_id"], serde_json::json!(10));
}

//! A tour of etlkit table operations on a small orders dataset.
//!
//! cargo run --example table_basics

// dependencies
use etlkit::prelude::*;
use etlkit::store::MemoryStore;

fn main() -> etlkit::Result<()> {

    // create tables with the table! macro
    let orders = table!(
        id          = vec![1, 2, 3],
        customer_id = vec![10, 11, 10],
        total       = vec![Some(500), Some(1500), None],
    )?;
    let customers = table!(
        customer_id = vec![10, 11],
        name        = vec!["Ana", "Leo"],
    )?;
    eprintln!("{}", orders);

    // filter, join and aggregate
    let in_range = filter::in_range(&orders, "total", 500, 1500, false)?;
    eprintln!("{}", in_range.head(5));
    let joined = join::join(&orders, &customers, &JoinKeys::on("customer_id"), JoinKind::Left)?;
    let totals = aggregate::group_by_sum(&joined, &["name"], "total")?;
    eprintln!("{}", totals);

    // computed columns and sorting
    let taxed = transform::add_column(&joined, "total_iva", |row| {
        Ok(row.get("total")? * Value::Numeric(1.19))
    })?;
    let sorted = transform::sort(&taxed, &["total_iva"], &[false])?;
    eprintln!("{}", sorted);

    // query a store with SQL, always closing it
    let mut store = MemoryStore::new().with_table("orders", orders);
    let session = Session::open(&mut store)?;
    let big = session.execute_query("SELECT id, total FROM orders WHERE total > 600")?;
    eprintln!("{}", big);
    Ok(())
}

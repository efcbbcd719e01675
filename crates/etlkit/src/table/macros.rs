//! The `table!` macro helps to create (and fill) a new Table.

/* -----------------------------------------------------------------------------
Table constructor macro
----------------------------------------------------------------------------- */
/// Create a new Table from named column vectors, returning `Result<Table>`.
///
/// Column data may be any vector convertible into a `Column`, e.g.,
/// `Vec<i64>`, `Vec<Option<f64>>`, `Vec<&str>` or `Vec<Value>`. All columns
/// must have the same number of rows, or have zero or one rows, which are
/// recycled to the longest column length using missing or the single value.
///
/// Alternatively, provide column names and data types as `name: DataType`
/// to create a Table schema with zero rows.
///
/// # Examples:
///
/// ```
/// use etlkit::prelude::*;
///
/// # fn main() -> etlkit::Result<()> {
/// let customers = table!(
///     customer_id = vec![10, 11],
///     name        = vec!["Ana", "Leo"],
///     active      = vec![Some(true)], // single value repeated to every row
/// )?;
/// assert_eq!(customers.n_row(), 2);
///
/// let schema = table!(id: Integer, label: Text)?;
/// assert_eq!(schema.n_row(), 0);
/// # Ok(())
/// # }
/// ```
#[macro_export]
macro_rules! table {

    // fill a new Table as it is created; types are inferred from input data
    ($($col_name:ident = $col_data:expr),+ $(,)?) => {
        (|| -> $crate::Result<$crate::table::Table> {
            let mut table = $crate::table::Table::new();
            $( table.add_col(stringify!($col_name), $col_data)?; )+
            Ok(table)
        })()
    };

    // create a new, empty Table (i.e., a schema) with specified column names and data types
    ($($col_name:ident: $data_type:ident),+ $(,)?) => {
        (|| -> $crate::Result<$crate::table::Table> {
            let mut table = $crate::table::Table::new();
            $( table.add_col(
                stringify!($col_name),
                $crate::table::Column::missing($crate::table::DataType::$data_type, 0),
            )?; )+
            Ok(table)
        })()
    };

    // empty Table creation (no rows, no columns)
    () => {
        $crate::Result::<$crate::table::Table>::Ok($crate::table::Table::new())
    };
}

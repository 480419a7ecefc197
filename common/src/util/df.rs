use itertools::Itertools;
use polars::datatypes::DataType;
use polars::error::PolarsResult;
use polars::frame::DataFrame;
use polars::io::SerWriter;
use polars::prelude::{col, CsvWriter, IntoLazy, SortMultipleOptions};
use std::fs::{create_dir_all, File};
use std::path::PathBuf;

/// Compare two dataframes without regard to the ordering of columns and/or rows
pub fn equivalent(lhs: &DataFrame, rhs: &DataFrame, ignore_col_order: bool, ignore_row_order: bool) -> PolarsResult<bool> {
    fn normalize_col_order(frame: &DataFrame) -> PolarsResult<DataFrame> {
        frame.clone().lazy()
            .select( // Select all columns, but with a specific order
                frame.get_column_names().into_iter()
                    .sorted() // This sorting step ensures the same ordering
                    .map(|n| col(n.clone()))
                    .collect_vec(),
            )
            .collect()
    }

    fn normalize_row_order(frame: &DataFrame) -> PolarsResult<DataFrame> {
        frame.clone().lazy()
            .sort(
                frame.get_columns().into_iter()
                    .filter(|col| !col.dtype().is_list())
                    .map(|col| col.name()).cloned()
                    .collect_vec(),
                SortMultipleOptions::default()
            )
            .collect()
    }

    let (lhs, rhs) = if ignore_col_order {
        (&normalize_col_order(lhs)?, &normalize_col_order(rhs)?)
    } else { (lhs, rhs) };

    let (lhs, rhs) = if ignore_row_order {
        (&normalize_row_order(lhs)?, &normalize_row_order(rhs)?)
    } else { (lhs, rhs) };

    Ok(lhs.equals_missing(rhs))
}

// Column readers. Values are cast first, since CSV inference may type a column
// of route labels or stop ids as integers in one file and strings in another.

pub fn strings(frame: &DataFrame, name: &str) -> PolarsResult<Vec<Option<String>>> {
    let column = frame.column(name)?.as_materialized_series().cast(&DataType::String)?;
    Ok(column.str()?.into_iter().map(|v| v.map(str::to_owned)).collect())
}

pub fn floats(frame: &DataFrame, name: &str) -> PolarsResult<Vec<Option<f64>>> {
    let column = frame.column(name)?.as_materialized_series().cast(&DataType::Float64)?;
    Ok(column.f64()?.into_iter().collect())
}

/// Like [`floats`], but a value that can not be represented as an integer is an error instead
/// of silently becoming null
pub fn integers(frame: &DataFrame, name: &str) -> PolarsResult<Vec<Option<i64>>> {
    let column = frame.column(name)?.as_materialized_series().strict_cast(&DataType::Int64)?;
    Ok(column.i64()?.into_iter().collect())
}

/// Writes `df` as CSV with a header row
pub fn write_csv(path: PathBuf, mut df: DataFrame) -> PolarsResult<()> {
    let mut file = create_file(path)?;
    CsvWriter::new(&mut file)
        .include_header(true)
        .finish(&mut df)
}

/// Creates (or truncates) the file at `path`, including missing parent directories
pub fn create_file(
    path: PathBuf,
) -> Result<File, std::io::Error> {
    if let Some(parent) = path.parent() {
        create_dir_all(parent)?;
    }

    let file = File::create(path)?;

    Ok(file)
}

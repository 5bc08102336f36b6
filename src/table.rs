//! CSV input and output of measurement tables.
//!
//! A measurement table holds one row per detected centromere followed by a final row that
//! describes the nucleus itself through its Feret measurements.

use std::fs::File;
use std::path::Path;

use nalgebra as na;
use polars::prelude::*;
use thiserror::Error;

use crate::analysis::{PointMetrics, METRIC_NAMES};
use crate::geom::{EllipseError, NucleusEllipse};

pub const X: &str = "X";
pub const Y: &str = "Y";
pub const FERET: &str = "Feret";
pub const MIN_FERET: &str = "MinFeret";
pub const FERET_ANGLE: &str = "FeretAngle";

#[derive(Debug, Error)]
pub enum TableError {
    #[error("Table has no rows, expected the nucleus in the last row")]
    EmptyTable,

    #[error("Missing required column '{0}'")]
    MissingColumn(&'static str),

    #[error("Column '{column}' is not numeric (found {dtype})")]
    NonNumeric { column: &'static str, dtype: String },

    #[error("Column '{column}' has no value in row {row}")]
    NullValue { column: &'static str, row: usize },

    #[error("Column '{column}' has non-finite value {value} in row {row}")]
    NonFinite {
        column: &'static str,
        row: usize,
        value: f64,
    },

    #[error("Expected metrics for {expected} points, got {actual}")]
    RowMismatch { expected: usize, actual: usize },

    #[error("Invalid nucleus ellipse: {0}")]
    Ellipse(#[from] EllipseError),

    #[error(transparent)]
    Polars(#[from] PolarsError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub fn read_table(path: &Path) -> Result<DataFrame, TableError> {
    let df = LazyCsvReader::new(path)
        .with_has_header(true)
        .with_infer_schema_length(Some(100))
        .finish()?
        .collect()?;
    tracing::debug!(rows = df.height(), cols = df.width(), path = %path.display(), "read table");
    Ok(df)
}

fn numeric_column(df: &DataFrame, name: &'static str) -> Result<Float64Chunked, TableError> {
    let series = df.column(name).map_err(|_| TableError::MissingColumn(name))?;
    if !series.dtype().is_numeric() {
        return Err(TableError::NonNumeric {
            column: name,
            dtype: series.dtype().to_string(),
        });
    }
    Ok(series.cast(&DataType::Float64)?.f64()?.clone())
}

fn value_at(ca: &Float64Chunked, column: &'static str, row: usize) -> Result<f64, TableError> {
    ca.get(row).ok_or(TableError::NullValue { column, row })
}

fn finite_at(
    ca: &Float64Chunked,
    column: &'static str,
    row: usize,
) -> Result<f64, TableError> {
    let value = value_at(ca, column, row)?;
    if !value.is_finite() {
        return Err(TableError::NonFinite { column, row, value });
    }
    Ok(value)
}

/// Separates the nucleus (last row) from the centromere positions (all preceding rows).
pub fn split_table(
    df: &DataFrame,
) -> Result<(NucleusEllipse<f64>, Vec<na::Point2<f64>>), TableError> {
    let height = df.height();
    if height == 0 {
        return Err(TableError::EmptyTable);
    }

    let x = numeric_column(df, X)?;
    let y = numeric_column(df, Y)?;
    let feret = numeric_column(df, FERET)?;
    let min_feret = numeric_column(df, MIN_FERET)?;
    let feret_angle = numeric_column(df, FERET_ANGLE)?;

    let last = height - 1;
    let ellipse = NucleusEllipse::from_feret(
        value_at(&x, X, last)?,
        value_at(&y, Y, last)?,
        value_at(&feret, FERET, last)?,
        value_at(&min_feret, MIN_FERET, last)?,
        value_at(&feret_angle, FERET_ANGLE, last)?,
    )?;

    let points = (0..last)
        .map(|row| {
            Ok(na::Point2::new(
                finite_at(&x, X, row)?,
                finite_at(&y, Y, row)?,
            ))
        })
        .collect::<Result<Vec<_>, TableError>>()?;

    Ok((ellipse, points))
}

/// Appends one column per metric. The trailing nucleus row is left null.
pub fn augment_table(
    df: &DataFrame,
    metrics: &[PointMetrics<f64>],
) -> Result<DataFrame, TableError> {
    let height = df.height();
    if height == 0 {
        return Err(TableError::EmptyTable);
    }
    if metrics.len() != height - 1 {
        return Err(TableError::RowMismatch {
            expected: height - 1,
            actual: metrics.len(),
        });
    }

    let rows: Vec<[f64; 4]> = metrics.iter().map(|&m| m.into()).collect();

    let mut out = df.clone();
    for (i, &name) in METRIC_NAMES.iter().enumerate() {
        let values: Vec<Option<f64>> = rows
            .iter()
            .map(|row| Some(row[i]))
            .chain(std::iter::once(None))
            .collect();
        out.with_column(Series::new(name.into(), values))?;
    }
    Ok(out)
}

/// Creates `path` for writing along with any missing parent directories.
pub fn create_file(path: &Path) -> Result<File, TableError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    Ok(File::create(path)?)
}

pub fn write_table(path: &Path, df: &mut DataFrame) -> Result<(), TableError> {
    let mut file = create_file(path)?;
    CsvWriter::new(&mut file).include_header(true).finish(df)?;
    tracing::debug!(rows = df.height(), path = %path.display(), "wrote table");
    Ok(())
}

/// Two-column `X,Y` table of world coordinates.
pub fn points_table(points: &[na::Point2<f64>]) -> Result<DataFrame, TableError> {
    let xs: Vec<f64> = points.iter().map(|p| p.x).collect();
    let ys: Vec<f64> = points.iter().map(|p| p.y).collect();
    Ok(df!(X => xs, Y => ys)?)
}

use crate::geom::ellipse::EllipseError;
use crate::summary::SummaryError;
use crate::table::TableError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Ellipse(#[from] EllipseError),

    #[error(transparent)]
    Summary(#[from] SummaryError),

    #[error(transparent)]
    Table(#[from] TableError),

    #[error("Unknown error: {0}")]
    Unknown(#[from] anyhow::Error),
}

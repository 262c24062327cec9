use thiserror::Error;

use crate::parse::ParseError;
use crate::CatalogError;

/// Unified error type covering catalog parsing, validation, and I/O.
///
/// Returned by convenience methods like
/// [`FieldCatalog::from_dsl()`](crate::FieldCatalog::from_dsl) and
/// [`FieldCatalog::from_file()`](crate::FieldCatalog::from_file).
#[derive(Debug, Error)]
pub enum QualifyError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[cfg(feature = "binary-snapshot")]
    #[error(transparent)]
    Encode(#[from] crate::serial::EncodeError),

    #[cfg(feature = "binary-snapshot")]
    #[error(transparent)]
    Decode(#[from] crate::serial::DecodeError),
}

//! Error types for the fallible edges: catalog, sheet and fragment loading.
//!
//! Resolution itself never fails; everything it cannot satisfy degrades to
//! an empty expansion.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while turning a loaded asset into a fragment tree.
#[derive(Debug, Error)]
pub enum AssetError {
    /// The host loader could not produce the asset.
    #[error("failed to load asset {locator}: {message}")]
    Load { locator: String, message: String },

    /// The asset is not valid fragment JSON.
    #[error("invalid fragment JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// The JSON is well-formed but not a fragment tree.
    #[error("malformed fragment: {message}")]
    Malformed { message: String },
}

/// Errors raised while splitting an aggregate SVG sheet.
#[derive(Debug, Error)]
pub enum SheetError {
    #[error("invalid SVG sheet: {0}")]
    Xml(#[from] roxmltree::Error),

    #[error("sheet root is <{0}>, expected <svg>")]
    NotSvg(String),
}

/// Errors raised while reading an asset catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read catalog {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid catalog JSON: {0}")]
    Json(#[from] serde_json::Error),
}

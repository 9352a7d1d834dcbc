pub mod catalog;
pub mod error;
pub mod id;
pub mod lint;
pub mod model;
pub mod query;
pub mod resolve;
pub mod sheet;
pub mod store;
pub mod style;
pub mod svg;
pub mod vdom;

pub use catalog::{CATALOG_FILE, Catalog, CatalogEntry};
pub use error::{AssetError, CatalogError, SheetError};
pub use id::{CategoryKey, FragmentId, SYMBOL_MARKER};
pub use lint::{LintDiagnostic, LintSeverity, lint_library};
pub use model::*;
pub use query::{collect_path_styles, collect_selections};
pub use resolve::{resolve, resolve_root};
pub use sheet::{SheetFragment, split_sheet};
pub use store::{AssetLoader, AssetStatus, AssetStore, Availability};
pub use style::{apply_overrides, extract_styles};
pub use svg::emit_svg;
pub use vdom::{parse_fragment, to_vdom};

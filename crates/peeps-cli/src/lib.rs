//! CLI logic for the peeps figure generator.
//!
//! `build` turns an aggregate SVG sheet into a fragment library on disk;
//! `generate` loads a library through its catalog and renders random
//! figures from it.

mod args;

pub use args::{BuildArgs, Cli, Command, GenerateArgs};

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use rand::SeedableRng;
use rand::rngs::StdRng;
use thiserror::Error;

use peeps_core::{
    AssetLoader, AssetStore, CATALOG_FILE, Catalog, CatalogError, LintSeverity, SheetError,
    lint_library, split_sheet, to_vdom,
};
use peeps_editor::{Figure, FigureConfig, Gallery};

#[derive(Debug, Error)]
pub enum CliError {
    #[error("cannot read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("cannot write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error(transparent)]
    Catalog(#[from] CatalogError),
    #[error(transparent)]
    Sheet(#[from] SheetError),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error("catalog has no fragments for root category `{0}`")]
    MissingRoot(String),
    #[error("catalog has {0} lint warning(s)")]
    Lint(usize),
}

/// Reads fragments from disk, relative to a base directory.
struct FsLoader {
    base: PathBuf,
}

impl AssetLoader for FsLoader {
    fn load(&self, locator: &str) -> Result<String, String> {
        let path = self.base.join(locator.trim_start_matches('/'));
        fs::read_to_string(&path).map_err(|e| format!("{}: {e}", path.display()))
    }
}

/// Run the subcommand selected on the command line.
///
/// # Errors
///
/// Returns [`CliError`] for unreadable inputs, unwritable outputs, malformed
/// catalogs or sheets, a catalog without the root category, and lint
/// warnings.
pub fn run(cli: &Cli) -> Result<(), CliError> {
    match &cli.command {
        Command::Generate(args) => generate(args),
        Command::Build(args) => build(args).map(|catalog| {
            log::info!("built {} fragments into {}", catalog.len(), args.out.display());
        }),
    }
}

/// Load the catalog's library and render `count` figures, or lint it.
pub fn generate(args: &GenerateArgs) -> Result<(), CliError> {
    let catalog = Catalog::from_path(&args.catalog)?;
    let base = args.base.clone().unwrap_or_else(|| {
        args.catalog
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default()
    });
    let mut store = AssetStore::new(FsLoader { base });
    catalog.populate(&mut store);

    store.prefetch_all();
    let loaded = store.pump();
    log::info!("loaded {loaded} of {} catalog fragments", catalog.len());
    let store = Rc::new(store);

    if args.lint {
        return lint(&store);
    }

    let config = FigureConfig::default().with_root_category(&args.root);
    if store.ids(config.root_category).is_empty() {
        return Err(CliError::MissingRoot(args.root.clone()));
    }

    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };

    let mut gallery = Gallery::new(Rc::clone(&store), config, &mut rng);
    for _ in 0..args.count {
        let index = gallery.adopt_next(&mut rng);
        if args.styles
            && let Some(figure) = gallery.get(index)
        {
            print_state(index, figure)?;
        }
    }

    match &args.out {
        Some(dir) => write_gallery(dir, &gallery),
        None => {
            for svg in gallery.export_svgs() {
                println!("{svg}");
            }
            Ok(())
        }
    }
}

/// Split `args.sheet` into `<out>/<category>/<id>.json` fragments plus a
/// `<out>/directory.json` catalog. Returns the written catalog.
pub fn build(args: &BuildArgs) -> Result<Catalog, CliError> {
    let xml = fs::read_to_string(&args.sheet).map_err(|source| CliError::Read {
        path: args.sheet.clone(),
        source,
    })?;
    let fragments = split_sheet(&xml, &args.root)?;

    let mut catalog = Catalog::default();
    for fragment in &fragments {
        let entry = fragment.catalog_entry();
        let path = args.out.join(&entry.locator);
        if let Some(dir) = path.parent() {
            create_dir(dir)?;
        }
        let json = serde_json::to_string_pretty(&to_vdom(&fragment.fragment))?;
        write_file(&path, &json)?;
        catalog.entries.push(entry);
    }

    create_dir(&args.out)?;
    let json = serde_json::to_string_pretty(&catalog)?;
    write_file(&args.out.join(CATALOG_FILE), &json)?;
    Ok(catalog)
}

/// Write every figure as `<i>.svg` plus an `index.html` showing them all.
pub fn write_gallery(dir: &Path, gallery: &Gallery) -> Result<(), CliError> {
    create_dir(dir)?;
    for (i, svg) in gallery.export_svgs().iter().enumerate() {
        write_file(&dir.join(format!("{i}.svg")), svg)?;
    }
    write_file(&dir.join("index.html"), &gallery.export_index())
}

fn lint(store: &AssetStore) -> Result<(), CliError> {
    let diags = lint_library(store);
    for d in &diags {
        let level = match d.severity {
            LintSeverity::Warning => "warning",
            LintSeverity::Info => "info",
        };
        println!("{level}[{}] {}: {}", d.rule, d.category, d.message);
    }
    match diags.iter().filter(|d| d.severity == LintSeverity::Warning).count() {
        0 => Ok(()),
        n => Err(CliError::Lint(n)),
    }
}

fn print_state(index: usize, figure: &Figure) -> Result<(), CliError> {
    let state = serde_json::json!({
        "figure": index,
        "selections": figure.current_selections(),
        "styles": figure.current_styles(),
    });
    eprintln!("{}", serde_json::to_string_pretty(&state)?);
    Ok(())
}

fn create_dir(dir: &Path) -> Result<(), CliError> {
    fs::create_dir_all(dir).map_err(|source| CliError::Write {
        path: dir.to_path_buf(),
        source,
    })
}

fn write_file(path: &Path, contents: &str) -> Result<(), CliError> {
    fs::write(path, contents).map_err(|source| CliError::Write {
        path: path.to_path_buf(),
        source,
    })?;
    log::info!("wrote {}", path.display());
    Ok(())
}

use std::io;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use tracing::debug;

use crate::opt::EnvVar;

const APP_NAME: &str = "deck-claw";
const APP_AUTHOR: &str = "akio";
const APP_QUALIFIER: &str = "com";

const CACHE_DIR_NAME: &str = "decklists";
const CATALOG_FILE_NAME: &str = "oracle-cards.json";
const INDEX_FILE_NAME: &str = "tournaments.json";

/// Filesystem locations used by a run.
#[derive(Debug, Clone)]
pub struct Context {
    pub cache_dir: PathBuf,
    pub catalog_path: PathBuf,
    pub index_path: PathBuf,
}

/// Resolves paths from the environment, falling back to the platform data
/// directory. The cache directory is created if needed.
pub fn create_context() -> io::Result<Context> {
    let project_dirs = ProjectDirs::from(APP_QUALIFIER, APP_AUTHOR, APP_NAME).ok_or_else(|| {
        io::Error::new(io::ErrorKind::NotFound, "no home directory to store data in")
    })?;
    let data_dir = project_dirs.data_local_dir();
    debug!("Data directory: {:?}", data_dir);

    let context = context_in(
        data_dir,
        EnvVar::CacheDir.read(),
        EnvVar::Catalog.read(),
        EnvVar::Index.read(),
    );
    std::fs::create_dir_all(&context.cache_dir)?;
    Ok(context)
}

fn context_in(
    data_dir: &Path,
    cache_dir: Option<String>,
    catalog: Option<String>,
    index: Option<String>,
) -> Context {
    Context {
        cache_dir: cache_dir
            .map(PathBuf::from)
            .unwrap_or_else(|| data_dir.join(CACHE_DIR_NAME)),
        catalog_path: catalog
            .map(PathBuf::from)
            .unwrap_or_else(|| data_dir.join(CATALOG_FILE_NAME)),
        index_path: index
            .map(PathBuf::from)
            .unwrap_or_else(|| data_dir.join(INDEX_FILE_NAME)),
    }
}

use std::path::{Path, PathBuf};

use tracing::{info, warn};

const ENV_FILES: [&str; 2] = [".env", ".secrets.env"];

/// What happened to one environment file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnvFile {
    Loaded(PathBuf),
    Missing(PathBuf),
}

/// Loads `.env` and then `.secrets.env`, later files overriding earlier ones.
/// Missing files are skipped.
///
/// Runs before tracing is set up, so nothing is logged here; pass the result
/// to [`log_loaded`] once the subscriber is installed.
pub fn load_environment() -> Result<Vec<EnvFile>, dotenvy::Error> {
    load_env_files(&ENV_FILES)
}

pub fn load_env_files<P: AsRef<Path>>(paths: &[P]) -> Result<Vec<EnvFile>, dotenvy::Error> {
    paths.iter().map(|path| load_env_file(path.as_ref())).collect()
}

fn load_env_file(path: &Path) -> Result<EnvFile, dotenvy::Error> {
    if !path.exists() {
        return Ok(EnvFile::Missing(path.to_path_buf()));
    }

    dotenvy::from_filename_override(path)?;
    Ok(EnvFile::Loaded(path.to_path_buf()))
}

pub fn log_loaded(files: &[EnvFile]) {
    for file in files {
        match file {
            EnvFile::Loaded(path) => info!("Loaded environment from: {}", path.display()),
            EnvFile::Missing(path) => {
                warn!("Environment file {} not found, skipping", path.display())
            }
        }
    }
}

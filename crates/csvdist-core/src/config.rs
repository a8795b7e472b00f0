//! Pipeline run configuration

use std::path::PathBuf;

use crate::table::resolve_path;

/// Inputs for one enrichment run.
#[derive(Debug, Clone)]
pub struct Config {
    pub input: PathBuf,
    pub origin_header: String,
    pub destination_header: String,
    pub output: PathBuf,
    /// Base for relative `input`/`output` paths
    pub base_dir: PathBuf,
}

impl Config {
    /// Config writing back over the input file.
    pub fn in_place(
        input: impl Into<PathBuf>,
        origin_header: impl Into<String>,
        destination_header: impl Into<String>,
    ) -> Self {
        let input = input.into();
        Self {
            output: input.clone(),
            input,
            origin_header: origin_header.into(),
            destination_header: destination_header.into(),
            base_dir: default_base_dir(),
        }
    }

    pub fn input_path(&self) -> PathBuf {
        resolve_path(&self.input, &self.base_dir)
    }

    pub fn output_path(&self) -> PathBuf {
        resolve_path(&self.output, &self.base_dir)
    }
}

/// Directory containing the running executable, falling back to the
/// working directory when that cannot be determined.
pub fn default_base_dir() -> PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from("."))
}

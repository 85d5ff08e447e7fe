use std::path::{Path, PathBuf};

use restricted_fs_core::policy::EngineConfig;

/// The directories that bound permitted access, derived once from
/// configuration and fixed for the lifetime of the owning context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RootPaths {
    working_directory: PathBuf,
    output_directory: Option<PathBuf>,
    output_fallback_directory: Option<PathBuf>,
    openout_roots: Vec<PathBuf>,
    paranoid_roots: Vec<PathBuf>,
    absolute_access_roots: Vec<PathBuf>,
}

fn anchored(working_directory: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        working_directory.join(path)
    }
}

impl RootPaths {
    pub(crate) fn derive(config: &EngineConfig) -> Self {
        let working_directory = config.working_directory.clone();
        let output_directory = config
            .output_directory
            .as_deref()
            .map(|dir| anchored(&working_directory, dir));
        let output_fallback_directory = config
            .output_fallback_directory
            .as_deref()
            .map(|dir| anchored(&working_directory, dir));

        // The engine's write-fallback search order: the output directory if
        // configured, else the working directory, then the fallback
        // directory when distinct.
        let mut openout_roots = vec![
            output_directory
                .clone()
                .unwrap_or_else(|| working_directory.clone()),
        ];
        if let Some(fallback) = &output_fallback_directory
            && !openout_roots.contains(fallback)
        {
            openout_roots.push(fallback.clone());
        }

        let mut paranoid_roots = vec![working_directory.clone()];
        let mut absolute_access_roots = Vec::new();
        for root in [&output_directory, &output_fallback_directory]
            .into_iter()
            .flatten()
        {
            if !paranoid_roots.contains(root) {
                paranoid_roots.push(root.clone());
            }
            if !absolute_access_roots.contains(root) {
                absolute_access_roots.push(root.clone());
            }
        }

        Self {
            working_directory,
            output_directory,
            output_fallback_directory,
            openout_roots,
            paranoid_roots,
            absolute_access_roots,
        }
    }

    pub fn working_directory(&self) -> &Path {
        &self.working_directory
    }

    pub fn output_directory(&self) -> Option<&Path> {
        self.output_directory.as_deref()
    }

    pub fn output_fallback_directory(&self) -> Option<&Path> {
        self.output_fallback_directory.as_deref()
    }

    /// Ordered directories the engine will try when opening output files.
    pub fn openout_roots(&self) -> &[PathBuf] {
        &self.openout_roots
    }

    /// Every directory restricted reads and writes may resolve into.
    pub fn paranoid_roots(&self) -> &[PathBuf] {
        &self.paranoid_roots
    }

    /// Directories eligible as absolute-path targets under lexical
    /// validation. The working directory is deliberately absent: relative
    /// paths are already anchored there, and granting blanket access to any
    /// absolute path that happens to share its prefix would over-match.
    pub fn absolute_access_roots(&self) -> &[PathBuf] {
        &self.absolute_access_roots
    }
}

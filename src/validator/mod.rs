mod lexical;
mod resolved;

use std::path::Path;

use restricted_fs_core::Result;
use restricted_fs_core::access::Decision;
use serde::{Deserialize, Serialize};

use crate::context::AccessContext;

/// Which validation strategy judges paths.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    /// Judge access from path structure alone, never consulting the
    /// filesystem. Mirrors the engine's native check; blind to symlinks.
    Lexical,
    /// Resolve symlinks through the filesystem before judging. Costs a
    /// resolution per check, closes the lexical strategy's symlink gap.
    #[default]
    Resolved,
}

pub(crate) trait Validate {
    fn readable_dir(&self, ctx: &AccessContext, path: &Path) -> Result<Decision>;
    fn readable_file(&self, ctx: &AccessContext, path: &Path) -> Result<Decision>;
    fn writable_dir(&self, ctx: &AccessContext, path: &Path) -> Result<Decision>;
    fn writable_file(&self, ctx: &AccessContext, path: &Path) -> Result<Decision>;
}

pub(crate) fn for_strategy(strategy: Strategy) -> &'static dyn Validate {
    match strategy {
        Strategy::Lexical => &lexical::LexicalValidator,
        Strategy::Resolved => &resolved::ResolvedValidator,
    }
}

use std::path::Path;

use restricted_fs_core::Result;
use restricted_fs_core::access::{Decision, Denial};
use restricted_fs_core::path as path_check;

use super::Validate;
use crate::context::AccessContext;

/// Judges paths after fully resolving them through the filesystem. File
/// checks consult both the original and the resolved name: a non-dot name
/// can resolve to a dotfile target and vice versa, and the same holds for
/// prohibited extensions.
pub(crate) struct ResolvedValidator;

impl Validate for ResolvedValidator {
    fn readable_dir(&self, ctx: &AccessContext, path: &Path) -> Result<Decision> {
        if ctx.policy().read_anywhere {
            return Ok(Decision::Allowed);
        }
        let resolved = ctx.resolve(path)?;
        if ctx.within_resolved_paranoid_roots(&resolved)? {
            Ok(Decision::Allowed)
        } else {
            Ok(Decision::Denied(Denial::Location))
        }
    }

    fn readable_file(&self, ctx: &AccessContext, path: &Path) -> Result<Decision> {
        let resolved = ctx.resolve(path)?;
        if !ctx.policy().read_dotfiles
            && (path_check::is_dotfile(path) || path_check::is_dotfile(&resolved))
        {
            return Ok(Decision::Denied(Denial::Dotfile));
        }
        ctx.readable_dir(path_check::lexical_parent(&resolved))
    }

    fn writable_dir(&self, ctx: &AccessContext, path: &Path) -> Result<Decision> {
        if ctx.policy().write_anywhere {
            return Ok(Decision::Allowed);
        }
        let resolved = ctx.resolve(path)?;
        if ctx.within_resolved_paranoid_roots(&resolved)? {
            Ok(Decision::Allowed)
        } else {
            Ok(Decision::Denied(Denial::Location))
        }
    }

    fn writable_file(&self, ctx: &AccessContext, path: &Path) -> Result<Decision> {
        let resolved = ctx.resolve(path)?;
        for ext in &ctx.policy().prohibited_write_extensions {
            if path_check::name_ends_with(path, ext) || path_check::name_ends_with(&resolved, ext)
            {
                return Ok(Decision::Denied(Denial::Extension(ext.clone())));
            }
        }
        if !ctx.policy().write_dotfiles
            && (path_check::is_dotfile(path) || path_check::is_dotfile(&resolved))
        {
            return Ok(Decision::Denied(Denial::Dotfile));
        }
        ctx.writable_dir(path_check::lexical_parent(&resolved))
    }
}

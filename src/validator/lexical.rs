use std::path::Path;

use restricted_fs_core::Result;
use restricted_fs_core::access::{Decision, Denial};
use restricted_fs_core::path as path_check;

use super::Validate;
use crate::context::AccessContext;

/// Judges paths by their structure alone. Relative paths stay anchored at
/// the working directory by construction, so only the explicitly configured
/// output directories are eligible as absolute-path targets. A permitted
/// directory containing a symlink to a forbidden location is not detected;
/// that is the resolved strategy's job.
pub(crate) struct LexicalValidator;

impl Validate for LexicalValidator {
    fn readable_dir(&self, ctx: &AccessContext, path: &Path) -> Result<Decision> {
        if ctx.policy().read_anywhere {
            return Ok(Decision::Allowed);
        }
        Ok(dir_decision(ctx, path))
    }

    fn readable_file(&self, ctx: &AccessContext, path: &Path) -> Result<Decision> {
        if !ctx.policy().read_dotfiles && path_check::is_dotfile(path) {
            return Ok(Decision::Denied(Denial::Dotfile));
        }
        ctx.readable_dir(path_check::lexical_parent(path))
    }

    fn writable_dir(&self, ctx: &AccessContext, path: &Path) -> Result<Decision> {
        if ctx.policy().write_anywhere {
            return Ok(Decision::Allowed);
        }
        Ok(dir_decision(ctx, path))
    }

    fn writable_file(&self, ctx: &AccessContext, path: &Path) -> Result<Decision> {
        for ext in &ctx.policy().prohibited_write_extensions {
            if path_check::name_ends_with(path, ext) {
                return Ok(Decision::Denied(Denial::Extension(ext.clone())));
            }
        }
        if !ctx.policy().write_dotfiles && path_check::is_dotfile(path) {
            return Ok(Decision::Denied(Denial::Dotfile));
        }
        ctx.writable_dir(path_check::lexical_parent(path))
    }
}

fn dir_decision(ctx: &AccessContext, path: &Path) -> Decision {
    if path_check::has_parent_component(path) {
        return Decision::Denied(Denial::ParentTraversal);
    }
    if path.is_absolute() {
        let permitted = ctx
            .roots()
            .absolute_access_roots()
            .iter()
            .any(|root| path_check::is_within(path, root));
        if !permitted {
            return Decision::Denied(Denial::Location);
        }
    }
    Decision::Allowed
}

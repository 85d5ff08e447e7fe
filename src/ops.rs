use std::fs::{File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use restricted_fs_core::access::Decision;
use restricted_fs_core::{Error, Result};

use crate::context::AccessContext;
use crate::validator::Strategy;

/// A path value paired with the context that judges it. Every mutating
/// operation checks the relevant predicate first and fails before touching
/// the filesystem when access is denied.
///
/// Under the resolved strategy, approved filesystem calls are issued
/// against the resolved form of the path, so a symlink swapped in between
/// the check and the call cannot redirect the operation.
#[derive(Debug, Clone)]
pub struct RestrictedPath {
    context: Rc<AccessContext>,
    path: PathBuf,
}

impl RestrictedPath {
    pub fn new(context: &Rc<AccessContext>, path: impl Into<PathBuf>) -> Self {
        Self {
            context: Rc::clone(context),
            path: path.into(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn context(&self) -> &AccessContext {
        &self.context
    }

    pub fn readable_dir(&self) -> Result<Decision> {
        self.context.readable_dir(&self.path)
    }

    pub fn readable_file(&self) -> Result<Decision> {
        self.context.readable_file(&self.path)
    }

    pub fn writable_dir(&self) -> Result<Decision> {
        self.context.writable_dir(&self.path)
    }

    pub fn writable_file(&self) -> Result<Decision> {
        self.context.writable_file(&self.path)
    }

    pub fn open_read(&self) -> Result<File> {
        self.ensure_readable_file("read file")?;
        let target = self.fs_path()?;
        File::open(&target).map_err(|source| io_error(&target, source))
    }

    pub fn open_write(&self) -> Result<File> {
        self.ensure_writable_file("write file")?;
        let target = self.fs_path()?;
        File::create(&target).map_err(|source| io_error(&target, source))
    }

    pub fn open_append(&self) -> Result<File> {
        self.ensure_writable_file("write file")?;
        let target = self.fs_path()?;
        OpenOptions::new()
            .create(true)
            .append(true)
            .open(&target)
            .map_err(|source| io_error(&target, source))
    }

    pub fn read_bytes(&self) -> Result<Vec<u8>> {
        self.ensure_readable_file("read file")?;
        let target = self.fs_path()?;
        std::fs::read(&target).map_err(|source| io_error(&target, source))
    }

    pub fn read_text(&self) -> Result<String> {
        self.ensure_readable_file("read file")?;
        let target = self.fs_path()?;
        std::fs::read_to_string(&target).map_err(|source| io_error(&target, source))
    }

    pub fn write_bytes(&self, contents: &[u8]) -> Result<()> {
        self.ensure_writable_file("write file")?;
        let target = self.fs_path()?;
        std::fs::write(&target, contents).map_err(|source| io_error(&target, source))
    }

    pub fn write_text(&self, contents: &str) -> Result<()> {
        self.write_bytes(contents.as_bytes())
    }

    pub fn create_dir(&self) -> Result<()> {
        self.ensure_writable_dir("create directory")?;
        let target = self.fs_path()?;
        std::fs::create_dir(&target).map_err(|source| io_error(&target, source))
    }

    pub fn create_dir_all(&self) -> Result<()> {
        self.ensure_writable_dir("create directory")?;
        let target = self.fs_path()?;
        std::fs::create_dir_all(&target).map_err(|source| io_error(&target, source))
    }

    pub fn remove_dir(&self) -> Result<()> {
        self.ensure_writable_dir("delete directory")?;
        let target = self.fs_path()?;
        std::fs::remove_dir(&target).map_err(|source| io_error(&target, source))
    }

    pub fn remove_file(&self) -> Result<()> {
        self.ensure_writable_file("delete file")?;
        let target = self.fs_path()?;
        std::fs::remove_file(&target).map_err(|source| io_error(&target, source))
    }

    /// Create the file empty if it does not exist; leave contents alone if
    /// it does.
    pub fn touch(&self) -> Result<()> {
        self.ensure_writable_file("create file")?;
        let target = self.fs_path()?;
        OpenOptions::new()
            .write(true)
            .create(true)
            .open(&target)
            .map(drop)
            .map_err(|source| io_error(&target, source))
    }

    /// Rename to `target`, refusing to overwrite an existing destination.
    /// Both the source and destination writable-file checks must pass
    /// before any filesystem call happens.
    pub fn rename(&self, target: &RestrictedPath) -> Result<()> {
        self.ensure_writable_file("rename file")?;
        target.ensure_writable_file("create renamed file")?;
        let source_path = self.fs_path()?;
        let target_path = target.fs_path()?;
        if std::fs::symlink_metadata(&target_path).is_ok() {
            return Err(io_error(
                &target_path,
                io::Error::new(io::ErrorKind::AlreadyExists, "destination already exists"),
            ));
        }
        std::fs::rename(&source_path, &target_path).map_err(|source| io_error(&target_path, source))
    }

    /// Rename to `target`, overwriting an existing destination. Both
    /// writable-file checks must pass before any filesystem call happens.
    pub fn replace(&self, target: &RestrictedPath) -> Result<()> {
        self.ensure_writable_file("replace file")?;
        target.ensure_writable_file("create replacement file")?;
        let source_path = self.fs_path()?;
        let target_path = target.fs_path()?;
        std::fs::rename(&source_path, &target_path).map_err(|source| io_error(&target_path, source))
    }

    /// Refused under every policy: permission changes could re-expose a
    /// path outside mediated control.
    pub fn set_permissions(&self, _permissions: std::fs::Permissions) -> Result<()> {
        Err(Error::Unsupported("changing file permissions"))
    }

    /// Refused under every policy: a new link re-exposes its target outside
    /// mediated control.
    pub fn symlink_to(&self, _target: &Path) -> Result<()> {
        Err(Error::Unsupported("creating symbolic links"))
    }

    /// Refused under every policy, like [`RestrictedPath::symlink_to`].
    pub fn hardlink_to(&self, _target: &Path) -> Result<()> {
        Err(Error::Unsupported("creating hard links"))
    }

    fn ensure_readable_file(&self, action: &'static str) -> Result<()> {
        let decision = self.context.readable_file(&self.path)?;
        self.guard(decision, action)
    }

    fn ensure_writable_file(&self, action: &'static str) -> Result<()> {
        let decision = self.context.writable_file(&self.path)?;
        self.guard(decision, action)
    }

    fn ensure_writable_dir(&self, action: &'static str) -> Result<()> {
        let decision = self.context.writable_dir(&self.path)?;
        self.guard(decision, action)
    }

    fn guard(&self, decision: Decision, action: &'static str) -> Result<()> {
        match decision {
            Decision::Allowed => Ok(()),
            Decision::Denied(denial) => {
                tracing::warn!(
                    path = %self.path.display(),
                    reason = %denial,
                    "denied filesystem access"
                );
                Err(Error::Security {
                    action,
                    path: self.path.display().to_string(),
                    reason: denial,
                })
            }
        }
    }

    /// The path the underlying filesystem call is issued against: the
    /// anchored form under lexical validation, the resolved form under
    /// resolved validation.
    fn fs_path(&self) -> Result<PathBuf> {
        match self.context.strategy() {
            Strategy::Lexical => Ok(self.context.anchored(&self.path)),
            Strategy::Resolved => self.context.resolve(&self.path),
        }
    }
}

fn io_error(path: &Path, source: io::Error) -> Error {
    Error::Io {
        path: path.display().to_string(),
        source,
    }
}

use std::ffi::OsString;
use std::io;
use std::path::{Component, Path, PathBuf};

const MAX_SYMLINK_HOPS: usize = 40;

/// Fully resolve an absolute path, following symlinks through the existing
/// prefix and appending the non-existing tail. Write targets usually do not
/// exist yet, so plain `fs::canonicalize` is not enough: the deepest
/// existing ancestor is canonicalized and the remaining components are
/// normalized lexically on top of it. A dangling symlink resolves to its
/// target path, so a link cannot smuggle a write past the containment check
/// just because the target is missing.
pub(crate) fn soft_canonicalize(path: &Path) -> io::Result<PathBuf> {
    let mut hops = 0usize;
    resolve_bounded(path, &mut hops)
}

enum Tail {
    Normal(OsString),
    Parent,
}

fn resolve_bounded(path: &Path, hops: &mut usize) -> io::Result<PathBuf> {
    let mut existing = path.to_path_buf();
    let mut tail: Vec<Tail> = Vec::new();

    loop {
        match std::fs::canonicalize(&existing) {
            Ok(base) => return Ok(apply_tail(base, &tail)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                if is_symlink(&existing) {
                    *hops += 1;
                    if *hops > MAX_SYMLINK_HOPS {
                        return Err(io::Error::new(
                            io::ErrorKind::Other,
                            "too many levels of symbolic links",
                        ));
                    }
                    let target = std::fs::read_link(&existing)?;
                    let joined = if target.is_absolute() {
                        target
                    } else {
                        existing.parent().unwrap_or(Path::new("/")).join(target)
                    };
                    let resolved = resolve_bounded(&joined, hops)?;
                    return Ok(apply_tail(resolved, &tail));
                }
                let popped = match existing.components().next_back() {
                    Some(Component::Normal(name)) => Some(Tail::Normal(name.to_os_string())),
                    Some(Component::ParentDir) => Some(Tail::Parent),
                    Some(Component::CurDir) => None,
                    _ => return Err(err),
                };
                if let Some(piece) = popped {
                    tail.push(piece);
                }
                if !existing.pop() {
                    return Err(err);
                }
            }
            Err(err) => return Err(err),
        }
    }
}

fn is_symlink(path: &Path) -> bool {
    std::fs::symlink_metadata(path)
        .map(|meta| meta.file_type().is_symlink())
        .unwrap_or(false)
}

fn apply_tail(base: PathBuf, tail: &[Tail]) -> PathBuf {
    let mut out = base;
    for piece in tail.iter().rev() {
        match piece {
            Tail::Normal(name) => out.push(name),
            Tail::Parent => {
                out.pop();
            }
        }
    }
    out
}

use std::fmt;

/// Why a path was denied. The rendered messages form a closed template set;
/// callers match on the variant, humans read the `Display` form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Denial {
    /// The path contains a parent-reference component.
    ParentTraversal,
    /// The path points outside every permitted root.
    Location,
    /// The file name starts with `.` and dotfile access is disabled.
    Dotfile,
    /// The file name ends with a prohibited write extension.
    Extension(String),
}

impl fmt::Display for Denial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Denial::ParentTraversal => {
                write!(f, "security settings do not permit paths containing \"..\"")
            }
            Denial::Location => {
                write!(f, "security settings do not permit access to this location")
            }
            Denial::Dotfile => {
                write!(f, "security settings do not permit access to dotfiles")
            }
            Denial::Extension(ext) => write!(
                f,
                "security settings prevent writing files with extension \"{ext}\""
            ),
        }
    }
}

/// Outcome of one of the four access predicates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    Allowed,
    Denied(Denial),
}

impl Decision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Decision::Allowed)
    }

    pub fn denial(&self) -> Option<&Denial> {
        match self {
            Decision::Allowed => None,
            Decision::Denied(denial) => Some(denial),
        }
    }
}

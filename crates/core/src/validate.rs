use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetCheck {
    Ready,
    /// Usable, but the permission bits suggest reads may fail. Advisory only.
    MaybeUnreadable,
    Missing,
    NotADirectory,
}

impl TargetCheck {
    pub fn is_usable(self) -> bool {
        matches!(self, TargetCheck::Ready | TargetCheck::MaybeUnreadable)
    }
}

pub fn check_target(path: &Path) -> TargetCheck {
    let Ok(metadata) = fs::metadata(path) else {
        return TargetCheck::Missing;
    };
    if !metadata.is_dir() {
        return TargetCheck::NotADirectory;
    }
    if looks_unreadable(path, &metadata) {
        return TargetCheck::MaybeUnreadable;
    }
    TargetCheck::Ready
}

#[cfg(unix)]
fn looks_unreadable(_path: &Path, metadata: &fs::Metadata) -> bool {
    use std::os::unix::fs::PermissionsExt;
    metadata.permissions().mode() & 0o444 == 0
}

#[cfg(not(unix))]
fn looks_unreadable(path: &Path, _metadata: &fs::Metadata) -> bool {
    fs::read_dir(path).is_err()
}

//! Path resolution for engine-supplied file names
//!
//! Game scripts name files DOS-style (`sound\Boom.wav`), relative to the
//! directory of the loaded game and in whatever case the author typed.
//! Two spellings of the same file must map to the same sound channel, so
//! the channel table is keyed by [`normalize_key`], while the file itself is
//! opened through [`resolve_path`].

use std::path::{Component, Path, PathBuf};

/// Resolve a file name against the game directory.
///
/// Backslashes are treated as separators, `.` and `..` are folded lexically
/// and drive-prefixed or absolute names are kept as they are.
/// Returns `None` for an empty (or whitespace-only) name.
pub fn resolve_path(base_dir: &Path, file: &str) -> Option<PathBuf> {
    let trimmed = file.trim();
    if trimmed.is_empty() {
        return None;
    }

    let unified = trimmed.replace('\\', "/");
    let candidate = Path::new(&unified);
    let joined = if candidate.is_absolute() || has_drive_prefix(&unified) {
        candidate.to_path_buf()
    } else {
        base_dir.join(candidate)
    };

    Some(fold_components(&joined))
}

/// Case- and separator-insensitive identity of a file name
pub fn normalize_key(base_dir: &Path, file: &str) -> Option<String> {
    resolve_path(base_dir, file).map(|path| path.to_string_lossy().to_uppercase())
}

/// `X:/...` or `X:\...`
fn has_drive_prefix(path: &str) -> bool {
    let bytes = path.as_bytes();
    bytes.len() >= 3 && bytes[0].is_ascii_alphabetic() && bytes[1] == b':' && bytes[2] == b'/'
}

fn fold_components(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                let at_root = matches!(
                    out.components().next_back(),
                    Some(Component::RootDir) | Some(Component::Prefix(_))
                );
                let ends_in_parent = matches!(out.components().next_back(), Some(Component::ParentDir));
                if at_root {
                    // ".." above the root stays at the root
                } else if out.as_os_str().is_empty() || ends_in_parent {
                    out.push("..");
                } else {
                    out.pop();
                }
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

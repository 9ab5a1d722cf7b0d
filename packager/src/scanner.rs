//! Skill directory scanner.
//!
//! Walks a skill directory and returns every regular file beneath it, sorted
//! by relative path, ready to be written into an archive. Symlinks are
//! followed only when they resolve to a regular file inside the skill
//! directory; anything else is rejected so an archive can never carry
//! content from outside the skill.

use camino::{Utf8Path, Utf8PathBuf};
use log::{debug, trace, warn};
use std::fs;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while scanning a skill directory.
#[derive(Debug, Error)]
pub enum ScanError {
    /// A directory or entry could not be read.
    #[error("failed to read {path}: {source}")]
    Io {
        /// Path being read.
        path: Utf8PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// A path under the skill directory is not valid UTF-8.
    #[error("path is not valid UTF-8: {}", .path.display())]
    NonUtf8Path {
        /// The offending path.
        path: PathBuf,
    },

    /// The skill path has no final component to name the archive after.
    #[error("{path} has no directory name")]
    Unnamed {
        /// The skill path.
        path: Utf8PathBuf,
    },

    /// A symlink resolves outside the skill directory.
    #[error("symlink {path} points outside the skill directory (to {target})")]
    SymlinkEscapes {
        /// The symlink.
        path: Utf8PathBuf,
        /// Where it resolves to.
        target: Utf8PathBuf,
    },

    /// A symlink resolves to something other than a regular file.
    #[error("symlink {path} must point at a regular file")]
    SymlinkNotFile {
        /// The symlink.
        path: Utf8PathBuf,
    },
}

/// Result type alias using [`ScanError`].
pub type Result<T> = std::result::Result<T, ScanError>;

/// One file to be archived.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkillFile {
    /// Path to read the contents from.
    pub source: Utf8PathBuf,
    /// Path relative to the skill directory, using `/` separators.
    pub relative: String,
}

/// A skill directory and its recursive file listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkillPackage {
    root: Utf8PathBuf,
    name: String,
    files: Vec<SkillFile>,
}

impl SkillPackage {
    /// Return the canonical skill directory.
    #[must_use]
    pub fn root(&self) -> &Utf8Path {
        &self.root
    }

    /// Return the skill directory name, used as the archive's top-level
    /// entry and file stem.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Return the files in archive order.
    #[must_use]
    pub fn files(&self) -> &[SkillFile] {
        &self.files
    }

    /// Return the archive entry name for `file`, rooted at the skill name.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use camino::Utf8Path;
    /// use skillpack_packager::scanner::scan_skill;
    ///
    /// let package = scan_skill(Utf8Path::new("skills/pdf-tools"))?;
    /// for file in package.files() {
    ///     assert!(package.entry_name(file).starts_with("pdf-tools/"));
    /// }
    /// # Ok::<(), skillpack_packager::scanner::ScanError>(())
    /// ```
    #[must_use]
    pub fn entry_name(&self, file: &SkillFile) -> String {
        format!("{}/{}", self.name, file.relative)
    }
}

/// Scan the skill directory at `root`.
///
/// # Errors
///
/// Returns [`ScanError`] when the directory cannot be read, contains a
/// non-UTF-8 path, or holds a symlink that escapes it or does not point at
/// a regular file.
pub fn scan_skill(root: &Utf8Path) -> Result<SkillPackage> {
    scan(root, None)
}

/// Scan `root`, leaving out the `excluded` directory and everything below it.
///
/// Packaging passes its output directory here so archives written into the
/// skill tree are not swept into the next archive. A missing `excluded`
/// directory excludes nothing.
///
/// # Errors
///
/// As [`scan_skill`], plus [`ScanError::Io`] when `excluded` exists but
/// cannot be resolved.
pub fn scan_skill_excluding(root: &Utf8Path, excluded: &Utf8Path) -> Result<SkillPackage> {
    let excluded = if excluded.exists() {
        Some(canonicalize(excluded)?)
    } else {
        None
    };
    scan(root, excluded.as_deref())
}

fn scan(root: &Utf8Path, excluded: Option<&Utf8Path>) -> Result<SkillPackage> {
    let canonical_root = canonicalize(root)?;
    let name = canonical_root
        .file_name()
        .ok_or_else(|| ScanError::Unnamed {
            path: root.to_owned(),
        })?
        .to_owned();

    let mut files = Vec::new();
    let walker = Walker {
        root: &canonical_root,
        excluded,
    };
    walker.walk(&canonical_root, &mut files)?;
    files.sort_by(|left, right| left.relative.cmp(&right.relative));

    Ok(SkillPackage {
        root: canonical_root,
        name,
        files,
    })
}

struct Walker<'a> {
    root: &'a Utf8Path,
    excluded: Option<&'a Utf8Path>,
}

impl Walker<'_> {
    fn walk(&self, dir: &Utf8Path, files: &mut Vec<SkillFile>) -> Result<()> {
        let entries = dir.read_dir_utf8().map_err(|error| io_error(dir, error))?;
        for entry in entries {
            let entry = entry.map_err(|error| io_error(dir, error))?;
            let path = entry.path();
            let file_type = entry.file_type().map_err(|error| io_error(path, error))?;

            if file_type.is_dir() {
                if self.excluded == Some(path) {
                    debug!("skipping output directory {path}");
                    continue;
                }
                self.walk(path, files)?;
            } else if file_type.is_file() {
                files.push(skill_file(self.root, path, path.to_owned()));
            } else if file_type.is_symlink() {
                let target = resolve_symlink(self.root, path)?;
                files.push(skill_file(self.root, path, target));
            } else {
                warn!("skipping {path}: not a regular file");
            }
        }
        Ok(())
    }
}

fn resolve_symlink(root: &Utf8Path, link: &Utf8Path) -> Result<Utf8PathBuf> {
    let target = canonicalize(link)?;
    if !target.starts_with(root) {
        warn!("rejecting {link}: resolves to {target}");
        return Err(ScanError::SymlinkEscapes {
            path: link.to_owned(),
            target,
        });
    }
    let metadata = fs::metadata(&target).map_err(|error| io_error(&target, error))?;
    if !metadata.is_file() {
        return Err(ScanError::SymlinkNotFile {
            path: link.to_owned(),
        });
    }
    trace!("following {link} to {target}");
    Ok(target)
}

fn skill_file(root: &Utf8Path, path: &Utf8Path, source: Utf8PathBuf) -> SkillFile {
    let relative = path
        .strip_prefix(root)
        .unwrap_or(path)
        .components()
        .map(|component| component.as_str())
        .collect::<Vec<_>>()
        .join("/");
    SkillFile { source, relative }
}

fn canonicalize(path: &Utf8Path) -> Result<Utf8PathBuf> {
    let resolved = path
        .as_std_path()
        .canonicalize()
        .map_err(|error| io_error(path, error))?;
    Utf8PathBuf::from_path_buf(resolved).map_err(|path_buf| ScanError::NonUtf8Path { path: path_buf })
}

fn io_error(path: &Utf8Path, source: io::Error) -> ScanError {
    ScanError::Io {
        path: path.to_owned(),
        source,
    }
}

use crate::error;
use crate::error::PathError;
use crate::formats::{destination_path, is_source_image, TargetFormat};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

/// Reporting label for a set of files. Has no effect on processing.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Group {
    /// Loose files directly inside the images root
    Root,
    /// Files inside an immediate subdirectory, named after it
    Named(String),
}

impl Group {
    /// Prefix `file_name` with the group, e.g. `gallery/cat.jpg`. Root files stay bare.
    pub fn qualify(&self, file_name: &str) -> String {
        match self {
            Group::Root => file_name.to_string(),
            Group::Named(name) => format!("{}/{}", name, file_name),
        }
    }
}

/// One source image and where its converted sibling goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkItem {
    pub group: Group,
    pub source: PathBuf,
    pub dest: PathBuf,
}

impl WorkItem {
    pub fn new(group: Group, source: PathBuf, format: TargetFormat) -> Self {
        let dest = destination_path(&source, format);
        Self {
            group,
            source,
            dest,
        }
    }

    pub fn file_name(&self) -> String {
        file_name_of(&self.source)
    }

    pub fn output_name(&self) -> String {
        file_name_of(&self.dest)
    }

    /// `group/file` label used in log lines
    pub fn label(&self) -> String {
        self.group.qualify(&self.file_name())
    }
}

fn file_name_of(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Fails unless `root` exists, is a directory and can be listed. Returns the
/// canonical path.
pub fn validate_root(root: &Path) -> Result<PathBuf, PathError> {
    let access_error = |source: io::Error| match source.kind() {
        io::ErrorKind::NotFound => PathError::NotFound(root.to_path_buf()),
        _ => PathError::Unreadable {
            path: root.to_path_buf(),
            source,
        },
    };

    let canonical = root.canonicalize().map_err(access_error)?;

    let metadata = fs::metadata(&canonical).map_err(access_error)?;
    if !metadata.is_dir() {
        return Err(PathError::NotADirectory(root.to_path_buf()));
    }

    fs::read_dir(&canonical).map_err(access_error)?;

    Ok(canonical)
}

/// Discovers every convertible image one level below `root`, plus the loose
/// images in `root` itself.
///
/// Subdirectory groups come first, then root files, each sorted by file name.
/// Deeper directories are never entered. A subdirectory that cannot be read
/// is skipped with an error line; only an unusable root is an error.
pub fn discover(root: &Path, format: TargetFormat) -> Result<Vec<WorkItem>, PathError> {
    let root = validate_root(root)?;

    let mut groups = Vec::new();
    let mut items = Vec::new();
    let mut loose = Vec::new();

    for entry in list_dir(&root) {
        if entry.file_type().is_dir() {
            groups.push(entry);
        } else if entry.file_type().is_file() && is_source_image(entry.path()) {
            loose.push(WorkItem::new(Group::Root, entry.into_path(), format));
        }
    }

    for dir in groups {
        let group = Group::Named(dir.file_name().to_string_lossy().into_owned());
        for entry in list_dir(dir.path()) {
            if entry.file_type().is_file() && is_source_image(entry.path()) {
                items.push(WorkItem::new(group.clone(), entry.into_path(), format));
            }
        }
    }

    items.extend(loose);
    Ok(items)
}

/// Immediate children of `dir`, links followed. Unreadable entries are skipped,
/// and reported even under `--quiet`.
fn list_dir(dir: &Path) -> Vec<DirEntry> {
    WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .follow_links(true)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(e) => {
                error!("⚠️  Skipping unreadable entry in {}: {}", dir.display(), e);
                None
            }
        })
        .collect()
}

use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{anyhow, Context, Result};
use globset::{Glob, GlobSet, GlobSetBuilder};
use walkdir::WalkDir;

pub const SUPPORTED_EXTENSIONS: &[&str] = &[
    "png", "jpg", "jpeg", "gif", "bmp", "webp", "tiff", "tif",
];

/// How directories dropped or passed on the command line are expanded.
#[derive(Debug, Clone)]
pub struct ScanOptions {
    pub recursive: bool,
    pub exclude: GlobSet,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            recursive: false,
            exclude: GlobSet::empty(),
        }
    }
}

impl ScanOptions {
    pub fn new(recursive: bool, exclude: &[String]) -> Result<Self> {
        Ok(Self {
            recursive,
            exclude: build_globset(exclude)?,
        })
    }

    fn accepts(&self, path: &Path) -> bool {
        is_supported_image(path) && !self.is_excluded(path)
    }

    fn is_excluded(&self, path: &Path) -> bool {
        self.exclude.is_match(path)
            || path
                .file_name()
                .map_or(false, |name| self.exclude.is_match(name))
    }
}

pub fn build_globset(patterns: &[String]) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        builder.add(Glob::new(pattern).with_context(|| format!("Invalid glob {pattern:?}"))?);
    }
    builder.build().context("Unable to build exclude patterns")
}

/// Turns user-provided files and directories into image paths.
///
/// Files are kept as given when they have a supported extension; directories
/// contribute their visible supported images. Missing paths are an error.
pub fn expand_paths(inputs: &[PathBuf], options: &ScanOptions) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for input in inputs {
        let meta = fs::metadata(input)
            .with_context(|| format!("{} does not exist", input.display()))?;
        if meta.is_dir() {
            files.extend(collect_images(input, options)?);
        } else if meta.is_file() && options.accepts(input) {
            files.push(input.clone());
        }
    }
    Ok(files)
}

pub fn collect_images(root: &Path, options: &ScanOptions) -> Result<Vec<PathBuf>> {
    if !root.is_dir() {
        return Err(anyhow!("{} is not a directory", root.display()));
    }

    let mut files = Vec::new();
    if options.recursive {
        let walker = WalkDir::new(root)
            .follow_links(false)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| e.depth() == 0 || !is_hidden(e.path()));
        for entry in walker.filter_map(|e| e.ok()) {
            let path = entry.path();
            if entry.file_type().is_file() && options.accepts(path) {
                files.push(path.to_path_buf());
            }
        }
    } else {
        let entries = fs::read_dir(root)
            .with_context(|| format!("Unable to read directory {}", root.display()))?;
        for entry in entries {
            let entry =
                entry.with_context(|| format!("Unable to read entry in {}", root.display()))?;
            let path = entry.path();
            if path.is_file() && !is_hidden(&path) && options.accepts(&path) {
                files.push(path);
            }
        }
        files.sort();
    }
    Ok(files)
}

pub fn is_supported_image(path: &Path) -> bool {
    matches!(
        path.extension()
            .and_then(|ext| ext.to_str())
            .map(|s| s.to_ascii_lowercase()),
        Some(ref ext) if SUPPORTED_EXTENSIONS.contains(&ext.as_str())
    )
}

pub fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .and_then(|name| name.to_str())
        .map_or(false, |name| name.starts_with('.'))
}

/// Catalog ids are the lossy string form of the path.
pub fn path_id(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}

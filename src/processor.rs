//! Output tree handling for Sprout.
//! Clears and materializes the output directory, selects the files that get
//! token substitution and renders them in place.

use globset::{Glob, GlobBuilder, GlobMatcher};
use indexmap::IndexSet;
use log::debug;
use rayon::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::error::{SproutError, SproutResult};
use crate::renderer::TemplateRenderer;

fn read_file(path: &Path) -> SproutResult<String> {
    fs::read_to_string(path).map_err(SproutError::IoError)
}

fn write_file(path: &Path, content: &str) -> SproutResult<()> {
    fs::write(path, content).map_err(SproutError::IoError)
}

fn copy_file(source: &Path, dest: &Path) -> SproutResult<()> {
    if let Some(parent) = dest.parent() {
        fs::create_dir_all(parent).map_err(SproutError::IoError)?;
    }
    fs::copy(source, dest).map(|_| ()).map_err(SproutError::IoError)
}

/// Whether anything (file, directory or symlink) occupies `path`.
pub fn output_exists<P: AsRef<Path>>(path: P) -> bool {
    fs::symlink_metadata(path.as_ref()).is_ok()
}

/// Removes whatever occupies the output path. No backup is taken.
pub fn remove_output<P: AsRef<Path>>(path: P) -> SproutResult<()> {
    let path = path.as_ref();
    let metadata = fs::symlink_metadata(path)?;
    debug!("Removing existing output {}", path.display());
    if metadata.is_dir() {
        fs::remove_dir_all(path)?;
    } else {
        fs::remove_file(path)?;
    }
    Ok(())
}

/// Recursively copies `source_dir` into `dest_dir`, creating it if needed.
///
/// # Returns
/// * `SproutResult<usize>` - Number of files copied
pub fn copy_tree<P: AsRef<Path>>(source_dir: P, dest_dir: P) -> SproutResult<usize> {
    let source_dir = source_dir.as_ref();
    let dest_dir = dest_dir.as_ref();
    let mut copied = 0;

    for entry in WalkDir::new(source_dir) {
        let entry = entry?;
        let relative_path = entry
            .path()
            .strip_prefix(source_dir)
            .map_err(|e| SproutError::ConfigError(e.to_string()))?;
        let target_path = dest_dir.join(relative_path);

        if entry.file_type().is_dir() {
            fs::create_dir_all(&target_path)?;
        } else {
            debug!("Copying file: {}", target_path.display());
            copy_file(entry.path(), &target_path)?;
            copied += 1;
        }
    }

    Ok(copied)
}

/// A compiled render pattern.
///
/// `*`, `**` and character classes never match a path component starting
/// with a dot. Such a component must be spelled out by a pattern segment
/// that itself starts with a dot, e.g. `**/.env` or `.github/**/*.yml`.
struct RenderPattern {
    matcher: GlobMatcher,
    dot_segments: Vec<GlobMatcher>,
}

impl RenderPattern {
    fn new(pattern: &str) -> SproutResult<Self> {
        let dot_segments = pattern
            .split('/')
            .filter(|segment| segment.starts_with('.') && *segment != "." && *segment != "..")
            .map(compile_glob)
            .collect::<SproutResult<Vec<_>>>()?;

        Ok(Self { matcher: compile_glob(pattern)?, dot_segments })
    }

    fn is_match(&self, path: &Path) -> bool {
        self.matcher.is_match(path)
            && path.components().all(|component| {
                let name = component.as_os_str().to_string_lossy();
                !name.starts_with('.')
                    || self.dot_segments.iter().any(|segment| segment.is_match(&*name))
            })
    }
}

fn compile_glob(pattern: &str) -> SproutResult<GlobMatcher> {
    let glob: Glob = GlobBuilder::new(pattern).literal_separator(true).build()?;
    Ok(glob.compile_matcher())
}

/// Expands `patterns` against the files under `root`.
///
/// Matches are grouped by pattern in declared order and sorted by path within
/// a pattern. A file matched by several patterns appears once, at its first
/// position. Dotfiles and dot-directories are only selected by patterns that
/// name them with a leading dot.
///
/// # Returns
/// * `SproutResult<Vec<PathBuf>>` - Paths relative to `root`
pub fn select_render_files<P: AsRef<Path>, S: AsRef<str>>(
    root: P,
    patterns: &[S],
) -> SproutResult<Vec<PathBuf>> {
    let root = root.as_ref();
    let matchers = patterns
        .iter()
        .map(|pattern| RenderPattern::new(pattern.as_ref()))
        .collect::<SproutResult<Vec<_>>>()?;

    let mut files = Vec::new();
    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = entry?;
        if entry.file_type().is_dir() {
            continue;
        }
        let relative_path = entry
            .path()
            .strip_prefix(root)
            .map_err(|e| SproutError::ConfigError(e.to_string()))?;
        files.push(relative_path.to_path_buf());
    }

    let mut selection = IndexSet::new();
    for matcher in &matchers {
        for file in files.iter().filter(|file| matcher.is_match(file)) {
            selection.insert(file.clone());
        }
    }

    Ok(selection.into_iter().collect())
}

fn render_file<R: TemplateRenderer + ?Sized>(
    root: &Path,
    relative_path: &Path,
    renderer: &R,
    context: &serde_json::Value,
    silent: bool,
) -> SproutResult<()> {
    let file_path = root.join(relative_path);
    let content = read_file(&file_path)?;
    if !silent {
        println!("> rendering: {}", relative_path.display());
    }
    let rendered = renderer.render(&content, context).map_err(|e| {
        SproutError::TemplateError(format!("failed to render '{}': {e}", relative_path.display()))
    })?;
    write_file(&file_path, &rendered)
}

/// Renders every selected file in place.
///
/// Files are processed concurrently on a rayon pool of `jobs` threads (the
/// global pool when `None`). Returns once every file is done; the first
/// failure is returned, and files already rewritten stay rewritten.
pub fn render_files<R: TemplateRenderer + Sync + ?Sized>(
    root: &Path,
    files: &[PathBuf],
    renderer: &R,
    context: &serde_json::Value,
    jobs: Option<usize>,
    silent: bool,
) -> SproutResult<()> {
    let run = || {
        files
            .par_iter()
            .try_for_each(|relative_path| render_file(root, relative_path, renderer, context, silent))
    };

    match jobs {
        Some(jobs) => rayon::ThreadPoolBuilder::new()
            .num_threads(jobs)
            .build()
            .map_err(|e| SproutError::ConfigError(format!("cannot start render workers: {e}")))?
            .install(run),
        None => run(),
    }
}

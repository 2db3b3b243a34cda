// src/assets/mod.rs

//! Post-build copy of static content files into the output directory.
//!
//! The generator only emits what it renders; images and other files that
//! pages reference directly have to be copied across after a build. Matching
//! is case-sensitive, so each configured extension is matched in its
//! all-lowercase and all-uppercase spelling. Files already present at the
//! destination are never overwritten.

use std::fmt;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use globset::{Glob, GlobSet, GlobSetBuilder};
use tracing::{debug, info, warn};

use crate::config::ConfigFile;
use crate::fs::FileSystem;

/// What a copy pass did, with paths relative to the source directory.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CopyReport {
    pub copied: Vec<PathBuf>,
    /// Already present at the destination; left untouched.
    pub skipped: Vec<PathBuf>,
    /// Files that could not be copied, with the reason.
    pub failed: Vec<(PathBuf, String)>,
}

impl CopyReport {
    pub fn is_empty(&self) -> bool {
        self.copied.is_empty() && self.skipped.is_empty() && self.failed.is_empty()
    }
}

/// Copies files matching a set of extensions from `source` to `dest`.
pub struct AssetCopier<'a> {
    fs: &'a dyn FileSystem,
    source: PathBuf,
    dest: PathBuf,
    extensions: Vec<String>,
}

impl fmt::Debug for AssetCopier<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AssetCopier")
            .field("source", &self.source)
            .field("dest", &self.dest)
            .field("extensions", &self.extensions)
            .finish_non_exhaustive()
    }
}

impl<'a> AssetCopier<'a> {
    pub fn new(
        fs: &'a dyn FileSystem,
        source: impl Into<PathBuf>,
        dest: impl Into<PathBuf>,
        extensions: &[String],
    ) -> Self {
        Self {
            fs,
            source: source.into(),
            dest: dest.into(),
            extensions: extensions.iter().map(|e| e.to_lowercase()).collect(),
        }
    }

    /// Copier for `[build]` in the given config.
    pub fn from_config(fs: &'a dyn FileSystem, cfg: &ConfigFile) -> Self {
        let build = cfg.build();
        Self::new(fs, &build.content_dir, &build.dist_dir, cfg.copy_file_exts())
    }

    pub fn extensions(&self) -> &[String] {
        &self.extensions
    }

    /// Glob patterns the copy pass matches against.
    pub fn patterns(&self) -> Vec<String> {
        extension_globs(&self.extensions)
    }

    /// Copy every matching file that is not already present at the destination.
    ///
    /// Per-file failures are recorded in the report rather than aborting the
    /// pass; only setup problems (bad glob, unreadable source tree) are `Err`.
    pub fn copy(&self) -> Result<CopyReport> {
        let mut report = CopyReport::default();

        if self.extensions.is_empty() {
            debug!("no copy_file_exts configured; nothing to copy");
            return Ok(report);
        }

        info!(
            "Copying integrated static content (\"{}\") to {}",
            self.extensions.join("\", \""),
            self.dest.display()
        );

        if !self.fs.is_dir(&self.source) {
            warn!(
                source = %self.source.display(),
                "content directory does not exist; nothing copied"
            );
            return Ok(report);
        }

        let globs = build_globset(&self.patterns())?;
        let files = collect_matching_files(self.fs, &self.source, &globs)?;

        for rel in files {
            let from = self.source.join(&rel);
            let to = self.dest.join(&rel);

            if self.fs.exists(&to) {
                debug!(path = %to.display(), "destination exists; skipping");
                report.skipped.push(rel);
                continue;
            }

            match self.copy_one(&from, &to) {
                Ok(true) => report.copied.push(rel),
                Ok(false) => report.skipped.push(rel),
                Err(e) => {
                    warn!(from = %from.display(), error = %e, "failed to copy asset");
                    report.failed.push((rel, format!("{e:#}")));
                }
            }
        }

        info!(
            copied = report.copied.len(),
            skipped = report.skipped.len(),
            failed = report.failed.len(),
            "static content copy finished"
        );

        Ok(report)
    }

    fn copy_one(&self, from: &Path, to: &Path) -> Result<bool> {
        let bytes = self.fs.read(from)?;
        self.fs.write_new(to, &bytes)
    }
}

/// `**/*.<ext>` for every lowercase spelling followed by every uppercase one.
pub fn extension_globs(extensions: &[String]) -> Vec<String> {
    let lower: Vec<String> = extensions.iter().map(|e| e.to_lowercase()).collect();
    let upper: Vec<String> = lower.iter().map(|e| e.to_uppercase()).collect();

    let mut patterns: Vec<String> = Vec::with_capacity(lower.len() * 2);
    for ext in lower.iter().chain(upper.iter()) {
        let pattern = format!("**/*.{ext}");
        if !patterns.contains(&pattern) {
            patterns.push(pattern);
        }
    }
    patterns
}

fn build_globset(patterns: &[String]) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pat in patterns {
        let glob = Glob::new(pat).with_context(|| format!("invalid glob pattern: {pat}"))?;
        builder.add(glob);
    }
    Ok(builder.build()?)
}

/// All files under `root` matching `globs`, as sorted paths relative to `root`.
fn collect_matching_files(
    fs: &dyn FileSystem,
    root: &Path,
    globs: &GlobSet,
) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    let mut stack = vec![root.to_path_buf()];

    while let Some(dir) = stack.pop() {
        for path in fs.read_dir(&dir)? {
            if fs.is_dir(&path) {
                stack.push(path);
            } else if fs.is_file(&path) {
                if let Ok(rel) = path.strip_prefix(root) {
                    let rel_str = rel.to_string_lossy().replace('\\', "/");
                    if globs.is_match(&rel_str) {
                        files.push(rel.to_path_buf());
                    }
                }
            }
        }
    }

    files.sort();
    Ok(files)
}

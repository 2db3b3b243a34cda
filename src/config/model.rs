// src/config/model.rs

use std::path::PathBuf;

use serde::Deserialize;

/// Configuration as read from a TOML file, before validation.
///
/// ```toml
/// [build]
/// copy_file_exts = ["png", "jpg", "svg"]
/// content_dir = "content"
/// dist_dir = "dist"
///
/// [preprocessor]
/// path = "src/build/preprocess.mjs"
///
/// [generator]
/// name = "gridsome"
/// modules_dir = "node_modules"
/// ```
///
/// All sections are optional and have reasonable defaults.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct RawConfigFile {
    /// `[build]`: post-build asset copy settings.
    #[serde(default)]
    pub build: BuildSection,

    /// `[preprocessor]`: where the content preprocessor lives.
    #[serde(default)]
    pub preprocessor: PreprocessorSection,

    /// `[generator]`: how to find the site generator.
    #[serde(default)]
    pub generator: GeneratorSection,
}

/// `[build]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct BuildSection {
    /// File extensions (without the dot) copied from `content_dir` into
    /// `dist_dir` after a successful build.
    #[serde(default)]
    pub copy_file_exts: Vec<String>,

    /// Source directory of the asset copy, relative to the working directory.
    #[serde(default = "default_content_dir")]
    pub content_dir: PathBuf,

    /// Output directory of the asset copy, relative to the working directory.
    #[serde(default = "default_dist_dir")]
    pub dist_dir: PathBuf,
}

fn default_content_dir() -> PathBuf {
    PathBuf::from("content")
}

fn default_dist_dir() -> PathBuf {
    PathBuf::from("dist")
}

impl Default for BuildSection {
    fn default() -> Self {
        Self {
            copy_file_exts: Vec::new(),
            content_dir: default_content_dir(),
            dist_dir: default_dist_dir(),
        }
    }
}

/// `[preprocessor]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct PreprocessorSection {
    /// Executable script, resolved against the project root when relative.
    #[serde(default = "default_preprocessor_path")]
    pub path: PathBuf,
}

fn default_preprocessor_path() -> PathBuf {
    PathBuf::from("src/build/preprocess.mjs")
}

impl Default for PreprocessorSection {
    fn default() -> Self {
        Self {
            path: default_preprocessor_path(),
        }
    }
}

/// `[generator]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct GeneratorSection {
    /// Bare command name probed on `PATH`; also the package name searched
    /// for in `modules_dir`.
    #[serde(default = "default_generator_name")]
    pub name: String,

    /// Project-local dependency directory, relative to the project root.
    #[serde(default = "default_modules_dir")]
    pub modules_dir: PathBuf,
}

fn default_generator_name() -> String {
    "gridsome".to_string()
}

fn default_modules_dir() -> PathBuf {
    PathBuf::from("node_modules")
}

impl Default for GeneratorSection {
    fn default() -> Self {
        Self {
            name: default_generator_name(),
            modules_dir: default_modules_dir(),
        }
    }
}

/// Validated configuration.
///
/// Only obtainable through `TryFrom<RawConfigFile>` (see `validate.rs`), so
/// holding one means extensions are normalised and names are non-empty.
#[derive(Debug, Clone)]
pub struct ConfigFile {
    build: BuildSection,
    preprocessor: PreprocessorSection,
    generator: GeneratorSection,
    project_root: PathBuf,
}

impl ConfigFile {
    pub(crate) fn new_unchecked(
        build: BuildSection,
        preprocessor: PreprocessorSection,
        generator: GeneratorSection,
    ) -> Self {
        Self {
            build,
            preprocessor,
            generator,
            project_root: PathBuf::from("."),
        }
    }

    /// Anchor relative preprocessor / modules paths at `root`.
    pub fn with_project_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.project_root = root.into();
        self
    }

    pub fn build(&self) -> &BuildSection {
        &self.build
    }

    pub fn generator(&self) -> &GeneratorSection {
        &self.generator
    }

    pub fn project_root(&self) -> &std::path::Path {
        &self.project_root
    }

    /// Normalised (dot-less, lowercase, de-duplicated) extensions for the
    /// asset copier.
    pub fn copy_file_exts(&self) -> &[String] {
        &self.build.copy_file_exts
    }

    /// Preprocessor path with the project root applied.
    pub fn preprocessor_path(&self) -> PathBuf {
        self.project_root.join(&self.preprocessor.path)
    }

    /// Local dependency directory with the project root applied.
    pub fn modules_dir(&self) -> PathBuf {
        self.project_root.join(&self.generator.modules_dir)
    }
}

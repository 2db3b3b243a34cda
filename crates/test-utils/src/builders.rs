use std::path::PathBuf;

use sitelaunch::config::{ConfigFile, RawConfigFile};

/// Builder for `ConfigFile` to simplify test setup.
pub struct ConfigFileBuilder {
    config: RawConfigFile,
    project_root: PathBuf,
}

impl ConfigFileBuilder {
    pub fn new() -> Self {
        Self {
            config: RawConfigFile::default(),
            project_root: PathBuf::from("."),
        }
    }

    pub fn with_copy_ext(mut self, ext: &str) -> Self {
        self.config.build.copy_file_exts.push(ext.to_string());
        self
    }

    pub fn with_content_dir(mut self, dir: &str) -> Self {
        self.config.build.content_dir = PathBuf::from(dir);
        self
    }

    pub fn with_dist_dir(mut self, dir: &str) -> Self {
        self.config.build.dist_dir = PathBuf::from(dir);
        self
    }

    pub fn with_preprocessor(mut self, path: &str) -> Self {
        self.config.preprocessor.path = PathBuf::from(path);
        self
    }

    pub fn with_generator(mut self, name: &str) -> Self {
        self.config.generator.name = name.to_string();
        self
    }

    pub fn with_modules_dir(mut self, dir: &str) -> Self {
        self.config.generator.modules_dir = PathBuf::from(dir);
        self
    }

    pub fn with_project_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.project_root = root.into();
        self
    }

    pub fn build(self) -> ConfigFile {
        ConfigFile::try_from(self.config)
            .expect("Failed to build valid config from builder")
            .with_project_root(self.project_root)
    }
}

impl Default for ConfigFileBuilder {
    fn default() -> Self {
        Self::new()
    }
}

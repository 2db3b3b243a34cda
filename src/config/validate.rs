// src/config/validate.rs

use crate::config::model::{ConfigFile, RawConfigFile};
use crate::errors::{Result, SitelaunchError};

/// Characters that would turn an extension into something other than a
/// literal suffix once it is spliced into `**/*.<ext>`.
const FORBIDDEN_EXT_CHARS: &[char] = &['*', '?', '[', ']', '{', '}', '/', '\\', '!'];

impl TryFrom<RawConfigFile> for ConfigFile {
    type Error = crate::errors::SitelaunchError;

    fn try_from(mut raw: RawConfigFile) -> std::result::Result<Self, Self::Error> {
        raw.build.copy_file_exts = normalise_extensions(&raw.build.copy_file_exts)?;
        validate_generator(&raw)?;
        validate_preprocessor(&raw)?;
        Ok(ConfigFile::new_unchecked(
            raw.build,
            raw.preprocessor,
            raw.generator,
        ))
    }
}

/// Trim, strip one leading dot, lowercase and de-duplicate (keeping first
/// occurrence order).
fn normalise_extensions(exts: &[String]) -> Result<Vec<String>> {
    let mut out: Vec<String> = Vec::with_capacity(exts.len());

    for raw in exts {
        let trimmed = raw.trim();
        let ext = trimmed.strip_prefix('.').unwrap_or(trimmed);

        if ext.is_empty() {
            return Err(SitelaunchError::ConfigError(format!(
                "[build].copy_file_exts contains an empty extension ({raw:?})"
            )));
        }
        if let Some(bad) = ext.chars().find(|c| FORBIDDEN_EXT_CHARS.contains(c)) {
            return Err(SitelaunchError::ConfigError(format!(
                "[build].copy_file_exts entry {raw:?} contains forbidden character '{bad}'"
            )));
        }

        let lower = ext.to_lowercase();
        if !out.contains(&lower) {
            out.push(lower);
        }
    }

    Ok(out)
}

fn validate_generator(cfg: &RawConfigFile) -> Result<()> {
    let name = cfg.generator.name.trim();
    if name.is_empty() {
        return Err(SitelaunchError::ConfigError(
            "[generator].name must not be empty".to_string(),
        ));
    }
    if name.contains(['/', '\\']) {
        return Err(SitelaunchError::ConfigError(format!(
            "[generator].name must be a bare command name (got {name:?})"
        )));
    }
    Ok(())
}

fn validate_preprocessor(cfg: &RawConfigFile) -> Result<()> {
    if cfg.preprocessor.path.as_os_str().is_empty() {
        return Err(SitelaunchError::ConfigError(
            "[preprocessor].path must not be empty".to_string(),
        ));
    }
    Ok(())
}

//! File naming conventions around the container format.
//!
//! The core format never discovers, renames, or deletes files; this
//! module owns the extension convention the CLI maps input files to
//! output files with. Several extensions may be recognized at once
//! (useful when decrypting files produced under a custom `--ext`); the
//! first one listed is the one new encrypted files receive.

use std::path::{Path, PathBuf};

use anyhow::{Result, bail};

/// The set of recognized container file extensions.
pub struct ExtensionMap {
    /// Extension appended to newly encrypted files.
    primary: String,

    /// Every extension treated as "this is a container".
    all: Vec<String>,
}

impl ExtensionMap {
    /// Parses a comma-separated extension list, e.g. `"lky"` or
    /// `"myext,otherext,lky"`. Dots and surrounding whitespace are
    /// trimmed.
    ///
    /// # Errors
    ///
    /// Fails if the list, or any entry in it, is blank.
    pub fn parse(spec: &str) -> Result<Self> {
        let mut all = Vec::new();

        for raw in spec.split(',') {
            let ext = raw.trim().trim_matches('.').trim();
            if ext.is_empty() {
                bail!("file extension can't be blank");
            }
            all.push(ext.to_owned());
        }

        Ok(Self { primary: all[0].clone(), all })
    }

    /// True if `path` carries one of the recognized extensions.
    #[must_use]
    pub fn matches(&self, path: &Path) -> bool {
        path.extension().and_then(|e| e.to_str()).is_some_and(|ext| self.all.iter().any(|known| known == ext))
    }

    /// Output path for encrypting `input`: the primary extension is
    /// appended.
    #[must_use]
    pub fn encrypted_path(&self, input: &Path) -> PathBuf {
        let mut name = input.as_os_str().to_os_string();
        name.push(".");
        name.push(&self.primary);
        PathBuf::from(name)
    }

    /// Output path for decrypting `input`: the trailing extension is
    /// stripped.
    #[must_use]
    pub fn decrypted_path(&self, input: &Path) -> PathBuf {
        input.with_extension("")
    }
}

/// True if `path` names an existing filesystem entry.
#[must_use]
pub fn exists(path: &Path) -> bool {
    path.symlink_metadata().is_ok()
}

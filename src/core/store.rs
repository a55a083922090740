//! On-disk catalog layout: `<root>/<locale>/<namespace>.<ext>`.
//!
//! The store discovers source namespace files and target locales, loads
//! catalogs through the codec selected by extension and persists them
//! atomically, so an interrupted run never leaves a half-written file.

use std::{
    collections::HashMap,
    fs,
    io::{ErrorKind, Write},
    path::{Path, PathBuf},
};

use glob::Pattern;
use tempfile::NamedTempFile;
use tracing::debug;
use walkdir::WalkDir;

use super::{
    catalog::Catalog,
    codec::{Codec, Format},
    error::{Error, Result},
    key::namespace_of,
    locale::is_locale_code,
};

/// An entry of the dicts directory that discovery passed over.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Skipped {
    pub path: PathBuf,
    pub reason: SkipReason,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// Directory name does not look like a locale code.
    NotALocale,
    /// File extension has no codec.
    UnsupportedFormat,
    /// File name matches one of the configured ignore patterns.
    Ignored,
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SkipReason::NotALocale => write!(f, "not a locale directory"),
            SkipReason::UnsupportedFormat => write!(f, "unsupported file format"),
            SkipReason::Ignored => write!(f, "matches an ignore pattern"),
        }
    }
}

#[derive(Debug, Default)]
pub struct Discovery<T> {
    pub found: Vec<T>,
    pub skipped: Vec<Skipped>,
}

#[derive(Debug, Clone)]
pub struct CatalogStore {
    root: PathBuf,
    ignores: Vec<Pattern>,
}

impl CatalogStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            ignores: Vec::new(),
        }
    }

    /// Skip namespace files whose name matches any of `ignores`.
    pub fn with_ignores(mut self, ignores: Vec<Pattern>) -> Self {
        self.ignores = ignores;
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn locale_dir(&self, locale: &str) -> PathBuf {
        self.root.join(locale)
    }

    /// Path of the target catalog mirroring `source_file` in `locale`.
    pub fn target_path(&self, locale: &str, source_file: &Path) -> PathBuf {
        let file_name = source_file.file_name().unwrap_or(source_file.as_os_str());
        self.locale_dir(locale).join(file_name)
    }

    /// Namespace files of the source locale, sorted by file name.
    ///
    /// Two files with the same stem (`common.json` and `common.yaml`) would
    /// define one namespace twice and are a [`Error::StructuralConflict`].
    pub fn source_files(&self, source_locale: &str) -> Result<Discovery<PathBuf>> {
        let dir = self.locale_dir(source_locale);
        if !dir.is_dir() {
            return Err(Error::io(
                &dir,
                std::io::Error::new(
                    ErrorKind::NotFound,
                    format!("source locale directory '{}' does not exist", source_locale),
                ),
            ));
        }

        let mut discovery = Discovery::default();
        for entry in WalkDir::new(&dir)
            .min_depth(1)
            .max_depth(1)
            .sort_by_file_name()
        {
            let entry = entry.map_err(|e| walk_error(&dir, e))?;
            if !entry.file_type().is_file() {
                continue;
            }

            let path = entry.into_path();
            let file_name = path
                .file_name()
                .and_then(|n| n.to_str())
                .unwrap_or_default();

            let reason = if self.ignores.iter().any(|p| p.matches(file_name)) {
                Some(SkipReason::Ignored)
            } else if Format::for_path(&path).is_err() {
                Some(SkipReason::UnsupportedFormat)
            } else {
                None
            };

            match reason {
                Some(reason) => discovery.skipped.push(Skipped { path, reason }),
                None => discovery.found.push(path),
            }
        }

        let mut namespaces: HashMap<String, &Path> = HashMap::new();
        for path in &discovery.found {
            let Some(namespace) = namespace_of(path) else {
                continue;
            };
            if let Some(first) = namespaces.insert(namespace.clone(), path) {
                return Err(Error::conflict(
                    namespace,
                    format!(
                        "namespace is defined by both {} and {}",
                        first.display(),
                        path.display()
                    ),
                ));
            }
        }

        Ok(discovery)
    }

    /// Locale directories other than `source_locale`, sorted by name.
    pub fn target_locales(&self, source_locale: &str) -> Result<Discovery<String>> {
        let mut discovery = Discovery::default();
        for entry in WalkDir::new(&self.root)
            .min_depth(1)
            .max_depth(1)
            .sort_by_file_name()
        {
            let entry = entry.map_err(|e| walk_error(&self.root, e))?;
            if !entry.file_type().is_dir() {
                continue;
            }

            let Some(name) = entry.file_name().to_str().map(|s| s.to_string()) else {
                continue;
            };
            if name == source_locale {
                continue;
            }

            if is_locale_code(&name) {
                discovery.found.push(name);
            } else {
                discovery.skipped.push(Skipped {
                    path: entry.into_path(),
                    reason: SkipReason::NotALocale,
                });
            }
        }

        Ok(discovery)
    }

    /// Load a catalog file. The namespace is the file stem.
    pub fn load(&self, path: &Path) -> Result<Catalog> {
        let format = Format::for_path(path)?;
        let content = fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        parse_catalog(path, format, &content)
    }

    /// Load a target catalog; a missing file is an empty catalog.
    pub fn load_or_empty(&self, path: &Path) -> Result<Catalog> {
        let format = Format::for_path(path)?;
        match fs::read_to_string(path) {
            Ok(content) => parse_catalog(path, format, &content),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %path.display(), "target catalog missing, starting empty");
                Ok(Catalog::new())
            }
            Err(e) => Err(Error::io(path, e)),
        }
    }

    /// Serialize `catalog` and replace `path` atomically.
    pub fn persist(&self, path: &Path, catalog: &Catalog) -> Result<()> {
        let format = Format::for_path(path)?;
        let tree = catalog.to_tree()?;
        let content = format.serialize(&tree).map_err(|message| Error::Serialize {
            path: path.to_path_buf(),
            message,
        })?;

        let dir = path.parent().unwrap_or(Path::new("."));
        fs::create_dir_all(dir).map_err(|e| Error::io(dir, e))?;

        let mut file = NamedTempFile::new_in(dir).map_err(|e| Error::io(dir, e))?;
        file.write_all(content.as_bytes())
            .map_err(|e| Error::io(file.path(), e))?;
        file.persist(path).map_err(|e| Error::io(path, e.error))?;

        debug!(path = %path.display(), entries = catalog.len(), "catalog written");
        Ok(())
    }
}

fn parse_catalog(path: &Path, format: Format, content: &str) -> Result<Catalog> {
    if content.trim().is_empty() {
        return Ok(Catalog::new());
    }

    let tree = format.parse(content).map_err(|message| Error::Parse {
        path: path.to_path_buf(),
        message,
    })?;
    let namespace =
        namespace_of(path).ok_or_else(|| Error::UnsupportedFormat(path.display().to_string()))?;
    Catalog::from_tree(&namespace, &tree)
}

fn walk_error(dir: &Path, err: walkdir::Error) -> Error {
    let path = err.path().unwrap_or(dir).to_path_buf();
    let source = err
        .into_io_error()
        .unwrap_or_else(|| std::io::Error::other("filesystem loop detected"));
    Error::io(path, source)
}

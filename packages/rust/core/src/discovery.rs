//! Discovery of XML documentation files under a working directory.

use std::path::{Path, PathBuf};

use regex::Regex;
use tracing::{debug, instrument};
use walkdir::WalkDir;

use edadoc_shared::{EdaDocError, Result};

/// Include/exclude filter over discovered file paths.
#[derive(Debug, Clone, Default)]
pub struct FileFilter {
    include: Vec<Regex>,
    exclude: Vec<Regex>,
}

impl FileFilter {
    /// Compile the configured patterns. An invalid regex is a config error.
    pub fn new(include: &[String], exclude: &[String]) -> Result<Self> {
        Ok(Self {
            include: compile(include)?,
            exclude: compile(exclude)?,
        })
    }

    /// Whether `path` passes the filter. Paths are matched with `/` separators.
    pub fn matches(&self, path: &Path) -> bool {
        let path = path.to_string_lossy().replace('\\', "/");
        let included = self.include.is_empty() || self.include.iter().any(|re| re.is_match(&path));
        included && !self.exclude.iter().any(|re| re.is_match(&path))
    }
}

fn compile(patterns: &[String]) -> Result<Vec<Regex>> {
    patterns
        .iter()
        .map(|p| {
            Regex::new(p)
                .map_err(|e| EdaDocError::config(format!("invalid file pattern '{p}': {e}")))
        })
        .collect()
}

/// Recursively collect `*.xml` files under `root`, sorted by path.
///
/// Symbolic links are not followed.
#[instrument(skip_all, fields(root = %root.display()))]
pub fn discover_xml_files(root: &Path, filter: &FileFilter) -> Result<Vec<PathBuf>> {
    if !root.is_dir() {
        return Err(EdaDocError::validation(format!(
            "working directory '{}' does not exist or is not a directory",
            root.display()
        )));
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(root).follow_links(false) {
        let entry = entry.map_err(|e| {
            let path = e.path().unwrap_or(root).to_path_buf();
            EdaDocError::io(path, e.into())
        })?;
        if entry.file_type().is_file() && is_xml(entry.path()) {
            files.push(entry.into_path());
        }
    }
    files.sort();

    let total = files.len();
    files.retain(|path| filter.matches(path));
    debug!(found = total, selected = files.len(), "xml discovery complete");

    Ok(files)
}

fn is_xml(path: &Path) -> bool {
    path.extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("xml"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_dir() -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "edadoc-discovery-test-{}",
            uuid::Uuid::now_v7()
        ));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn touch(path: &Path) {
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, "<doc/>").unwrap();
    }

    #[test]
    fn finds_nested_xml_files_sorted() {
        let tmp = temp_dir();
        touch(&tmp.join("b/Api.xml"));
        touch(&tmp.join("a/Domain.XML"));
        touch(&tmp.join("a/readme.md"));
        touch(&tmp.join("Root.xml"));

        let files = discover_xml_files(&tmp, &FileFilter::default()).unwrap();
        let rel: Vec<String> = files
            .iter()
            .map(|p| p.strip_prefix(&tmp).unwrap().to_string_lossy().replace('\\', "/"))
            .collect();
        assert_eq!(rel, vec!["Root.xml", "a/Domain.XML", "b/Api.xml"]);

        let _ = std::fs::remove_dir_all(&tmp);
    }

    #[test]
    fn exclude_patterns_skip_files() {
        let tmp = temp_dir();
        touch(&tmp.join("bin/Release/Shop.xml"));
        touch(&tmp.join("obj/Release/Shop.xml"));

        let filter = FileFilter::new(&[], &["/obj/".to_string()]).unwrap();
        let files = discover_xml_files(&tmp, &filter).unwrap();
        assert_eq!(files.len(), 1);
        assert!(files[0].ends_with("bin/Release/Shop.xml"));

        let _ = std::fs::remove_dir_all(&tmp);
    }

    #[cfg(unix)]
    #[test]
    fn symlinked_directories_are_not_followed() {
        let tmp = temp_dir();
        touch(&tmp.join("a/Shop.xml"));
        std::os::unix::fs::symlink(&tmp, tmp.join("a/loop")).unwrap();
        std::os::unix::fs::symlink(tmp.join("a/Shop.xml"), tmp.join("Linked.xml")).unwrap();

        let files = discover_xml_files(&tmp, &FileFilter::default()).unwrap();
        assert_eq!(files, vec![tmp.join("a/Shop.xml")]);

        let _ = std::fs::remove_dir_all(&tmp);
    }

    #[test]
    fn include_patterns_require_a_match() {
        let filter = FileFilter::new(&[r"Events?\.xml$".to_string()], &[]).unwrap();
        assert!(filter.matches(Path::new("src/Shop.Events.xml")));
        assert!(!filter.matches(Path::new("src/Shop.Web.xml")));
    }

    #[test]
    fn invalid_pattern_is_config_error() {
        let err = FileFilter::new(&["(".to_string()], &[]).unwrap_err();
        assert!(err.to_string().starts_with("config error"));
    }

    #[test]
    fn missing_root_is_validation_error() {
        let missing = std::env::temp_dir().join("edadoc-definitely-missing-root");
        let err = discover_xml_files(&missing, &FileFilter::default()).unwrap_err();
        assert!(err.to_string().contains("does not exist"));
    }
}

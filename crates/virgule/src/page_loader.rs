// File: src/page_loader.rs
// Purpose: Discovers route files under the pages/ directory and builds the route tree

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;
use virgule_router::RouteTree;

use crate::config::RoutingConfig;

/// Walks the pages directory, filters candidate files, and feeds every
/// surviving relative path into a [`RouteTree`].
///
/// Discovery runs once at startup; afterwards the tree is handed out
/// read-only. A route conflict anywhere in the set aborts discovery —
/// there is no partial-success mode, the route set has to be fixed.
pub struct PageLoader {
    pages_dir: PathBuf,
    allowed_extensions: Vec<String>,
    ignored_suffixes: Vec<String>,
    tree: RouteTree,
    routes: Vec<String>,
}

impl PageLoader {
    /// Create a loader with default filtering (`.rs` files, nothing ignored)
    pub fn new(pages_dir: impl Into<PathBuf>) -> Self {
        let defaults = RoutingConfig::default();
        Self {
            pages_dir: pages_dir.into(),
            allowed_extensions: defaults.allowed_extensions,
            ignored_suffixes: defaults.ignored_suffixes,
            tree: RouteTree::new(),
            routes: Vec::new(),
        }
    }

    /// Create a loader from the routing section of the configuration
    pub fn with_config(config: &RoutingConfig) -> Self {
        Self {
            pages_dir: PathBuf::from(&config.pages_dir),
            allowed_extensions: config.allowed_extensions.clone(),
            ignored_suffixes: config.ignored_suffixes.clone(),
            tree: RouteTree::new(),
            routes: Vec::new(),
        }
    }

    /// Walk the pages directory and register every route file found.
    ///
    /// Returns the number of routes registered. A missing pages directory
    /// is not an error — routes can be absent entirely.
    pub fn discover_routes(&mut self) -> Result<usize> {
        let pages_dir = self.pages_dir.clone();
        if !pages_dir.exists() {
            return Ok(0);
        }

        self.scan_directory(&pages_dir)?;
        Ok(self.routes.len())
    }

    /// Recursively scan a directory for route files
    fn scan_directory(&mut self, dir: &Path) -> Result<()> {
        let entries = fs::read_dir(dir)
            .with_context(|| format!("Failed to read directory: {}", dir.display()))?;

        for entry in entries {
            let entry = entry?;
            let path = entry.path();

            if path.is_dir() {
                self.scan_directory(&path)?;
            } else if self.is_route_file(&path) {
                self.register_page(&path)?;
            }
        }

        Ok(())
    }

    /// Insert a single route file into the tree
    fn register_page(&mut self, path: &Path) -> Result<()> {
        let relative = path.strip_prefix(&self.pages_dir).unwrap_or(path);
        let relative = relative.to_string_lossy().replace('\\', "/");

        self.tree
            .insert(&relative)
            .with_context(|| format!("Failed to register route for {}", path.display()))?;

        debug!("Registered route file: {}", relative);
        self.routes.push(relative);
        Ok(())
    }

    /// Whether a file takes part in routing, per the configured extension
    /// allow-list and suffix ignore-list
    fn is_route_file(&self, path: &Path) -> bool {
        let Some(name) = path.file_name().and_then(|name| name.to_str()) else {
            return false;
        };

        if self
            .ignored_suffixes
            .iter()
            .any(|suffix| name.ends_with(suffix.as_str()))
        {
            return false;
        }

        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) => self
                .allowed_extensions
                .iter()
                .any(|allowed| allowed == ext),
            None => false,
        }
    }

    /// The built route tree
    pub fn tree(&self) -> &RouteTree {
        &self.tree
    }

    /// Consume the loader, keeping only the tree
    pub fn into_tree(self) -> RouteTree {
        self.tree
    }

    /// All registered route files, sorted for stable display
    pub fn list_routes(&self) -> Vec<String> {
        let mut routes = self.routes.clone();
        routes.sort();
        routes
    }

    /// Number of registered route files
    pub fn count(&self) -> usize {
        self.routes.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_route_file_filtering() {
        let loader = PageLoader::new("pages");

        assert!(loader.is_route_file(Path::new("pages/index.rs")));
        assert!(loader.is_route_file(Path::new("pages/users/[id].rs")));
        assert!(!loader.is_route_file(Path::new("pages/notes.md")));
        assert!(!loader.is_route_file(Path::new("pages/Makefile")));
    }

    #[test]
    fn test_ignored_suffixes_win_over_extension() {
        let config = RoutingConfig {
            ignored_suffixes: vec!["_test.rs".to_string()],
            ..RoutingConfig::default()
        };
        let loader = PageLoader::with_config(&config);

        assert!(loader.is_route_file(Path::new("pages/users/[id].rs")));
        assert!(!loader.is_route_file(Path::new("pages/users/[id]_test.rs")));
    }

    #[test]
    fn test_custom_extensions() {
        let config = RoutingConfig {
            allowed_extensions: vec!["handler".to_string()],
            ..RoutingConfig::default()
        };
        let loader = PageLoader::with_config(&config);

        assert!(loader.is_route_file(Path::new("pages/index.handler")));
        assert!(!loader.is_route_file(Path::new("pages/index.rs")));
    }
}

//! Service container for dependency injection
//!
//! Wires up all services with their dependencies.

use std::path::Path;
use std::sync::Arc;

use tracing::debug;

use crate::application::services::{BudgetService, TreeLoader};
use crate::config::Settings;
use crate::domain::Tree;
use crate::infrastructure::traits::{FileSystem, RealFileSystem};
use crate::infrastructure::InfraResult;

/// Container holding all application services.
pub struct ServiceContainer {
    /// Application settings
    pub settings: Arc<Settings>,

    /// Filesystem abstraction
    pub fs: Arc<dyn FileSystem>,

    /// Tree document loader
    pub loader: TreeLoader,
}

impl ServiceContainer {
    /// Create a new service container with real implementations.
    pub fn new(settings: Settings) -> Self {
        Self::with_deps(settings, Arc::new(RealFileSystem))
    }

    /// Create a service container with custom dependencies (for testing).
    pub fn with_deps(settings: Settings, fs: Arc<dyn FileSystem>) -> Self {
        let settings = Arc::new(settings);
        let loader = TreeLoader::new(Arc::clone(&fs));

        Self {
            settings,
            fs,
            loader,
        }
    }

    /// Load the tree to edit.
    ///
    /// Precedence: explicit `file`, then the configured `data_file`, then the
    /// built-in sample tree.
    pub fn load_tree(&self, file: Option<&Path>) -> InfraResult<Tree> {
        let path = file.or(self.settings.data_file.as_deref());
        match path {
            Some(path) => Ok(self.loader.load(path)?),
            None => {
                debug!("no tree document configured, using sample tree");
                Ok(Tree::sample())
            }
        }
    }

    /// Budget service over the tree selected by [`load_tree`](Self::load_tree).
    pub fn budget_service(&self, file: Option<&Path>) -> InfraResult<BudgetService> {
        Ok(BudgetService::new(self.load_tree(file)?))
    }
}

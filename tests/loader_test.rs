//! Tests for TreeLoader and ServiceContainer tree selection

use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use tempfile::TempDir;

use budgetree::application::services::TreeLoader;
use budgetree::application::ApplicationError;
use budgetree::config::Settings;
use budgetree::domain::{aggregate, Tree};
use budgetree::infrastructure::di::ServiceContainer;
use budgetree::infrastructure::traits::{FileSystem, RealFileSystem};
use budgetree::infrastructure::InfraError;

/// In-memory filesystem keyed by path.
#[derive(Default)]
struct MemoryFileSystem {
    files: Mutex<HashMap<PathBuf, String>>,
}

impl MemoryFileSystem {
    fn with_file(path: &str, content: &str) -> Arc<Self> {
        let fs = Self::default();
        fs.files
            .lock()
            .unwrap()
            .insert(PathBuf::from(path), content.to_string());
        Arc::new(fs)
    }
}

impl FileSystem for MemoryFileSystem {
    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        self.files
            .lock()
            .unwrap()
            .get(path)
            .cloned()
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "no such file"))
    }

    fn write(&self, path: &Path, content: &str) -> io::Result<()> {
        self.files
            .lock()
            .unwrap()
            .insert(path.to_path_buf(), content.to_string());
        Ok(())
    }

    fn exists(&self, path: &Path) -> bool {
        self.files.lock().unwrap().contains_key(path)
    }

    fn ensure_parent(&self, _path: &Path) -> io::Result<()> {
        Ok(())
    }
}

const BUDGET_JSON: &str = r#"{
  "rows": [
    {
      "id": "travel",
      "label": "Travel",
      "value": 500,
      "children": [
        { "id": "flights", "label": "Flights", "value": 350 },
        { "id": "hotels", "label": "Hotels", "value": 150, "originalValue": 100 }
      ]
    }
  ]
}"#;

#[test]
fn given_json_document_when_loading_then_builds_tree() {
    let fs = MemoryFileSystem::with_file("/budget.json", BUDGET_JSON);
    let loader = TreeLoader::new(fs);

    let tree = loader.load(Path::new("/budget.json")).unwrap();

    assert_eq!(tree.len(), 3);
    let view = aggregate(&tree);
    assert_eq!(view.grand_total(), 500.0);
    assert_eq!(view.find("hotels").unwrap().variance, 50.0);
}

#[test]
fn given_missing_file_when_loading_then_operation_failed() {
    let loader = TreeLoader::new(Arc::new(MemoryFileSystem::default()));

    let err = loader.load(Path::new("/missing.json")).unwrap_err();

    assert!(matches!(err, ApplicationError::OperationFailed { .. }));
    assert!(err.to_string().contains("/missing.json"));
}

#[test]
fn given_duplicate_ids_in_document_when_loading_then_invalid_document() {
    let content = r#"{"rows":[
        {"id":"a","label":"A","value":1,"children":[{"id":"a","label":"A2","value":1}]}
    ]}"#;
    let fs = MemoryFileSystem::with_file("/dup.json", content);

    let err = TreeLoader::new(fs).load(Path::new("/dup.json")).unwrap_err();

    match err {
        ApplicationError::InvalidDocument { message, .. } => {
            assert!(message.contains("duplicate line item id: a"), "{message}")
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn given_serialized_tree_when_loading_from_disk_then_round_trips() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("budget.json");
    std::fs::write(&path, serde_json::to_string_pretty(&Tree::sample()).unwrap()).unwrap();

    let tree = TreeLoader::new(Arc::new(RealFileSystem))
        .load(&path)
        .unwrap();

    assert_eq!(tree, Tree::sample());
}

#[test]
fn given_no_file_and_no_data_file_when_loading_tree_then_uses_sample() {
    let container = ServiceContainer::with_deps(
        Settings::default(),
        Arc::new(MemoryFileSystem::default()),
    );

    assert_eq!(container.load_tree(None).unwrap(), Tree::sample());
}

#[test]
fn given_configured_data_file_when_loading_tree_then_uses_it() {
    let settings = Settings {
        data_file: Some(PathBuf::from("/budget.json")),
        ..Settings::default()
    };
    let container =
        ServiceContainer::with_deps(settings, MemoryFileSystem::with_file("/budget.json", BUDGET_JSON));

    let service = container.budget_service(None).unwrap();

    assert!(service.snapshot().find("travel").is_some());
}

#[test]
fn given_unsupported_extension_when_loading_tree_then_application_error() {
    let container = ServiceContainer::with_deps(
        Settings::default(),
        MemoryFileSystem::with_file("/budget.yaml", "rows: []"),
    );

    let err = container.load_tree(Some(Path::new("/budget.yaml"))).unwrap_err();

    assert!(matches!(
        err,
        InfraError::Application(ApplicationError::UnsupportedFormat(_))
    ));
}

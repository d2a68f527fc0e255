//! brick - Save, organize and apply reusable file templates.
//!
//! brick keeps named templates under a single storage root (`~/.brick` by
//! default). A template is either *local* (its files are copied into the
//! root) or *remote* (a pointer to a directory in a GitHub repository).
//!
//! # Modules
//!
//! - [`store`] - Registry index, per-template metadata, settings and paths
//! - [`template`] - Save, apply, edit, pull and clean templates
//! - [`archive`] - Export and import templates as `.tar.gz` archives
//! - [`remote`] - GitHub coordinates and the remote fetch client
//! - [`cli`] - Command-line interface and argument parsing
//! - [`ui`] - Prompts, spinners, tables and terminal output
//! - [`error`] - Error types and result aliases
//!
//! # Example
//!
//! ```
//! use brick::store::Store;
//! use brick::template::{LocalTemplateEngine, SaveRequest};
//!
//! let root = tempfile::tempdir().unwrap();
//! let project = tempfile::tempdir().unwrap();
//! std::fs::write(project.path().join("a.ts"), "export {}").unwrap();
//!
//! let mut store = Store::open(root.path()).unwrap();
//! LocalTemplateEngine::new(&mut store)
//!     .save(SaveRequest {
//!         name: "demo".into(),
//!         source_dir: project.path().to_path_buf(),
//!         ..SaveRequest::default()
//!     })
//!     .unwrap();
//!
//! assert_eq!(store.load_metadata("demo").unwrap().files, vec!["a.ts"]);
//! ```

pub mod archive;
pub mod cli;
pub mod error;
pub mod remote;
pub mod store;
pub mod template;
pub mod ui;

pub use error::{BrickError, Result};

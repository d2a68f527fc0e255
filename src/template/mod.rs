//! Template engines.
//!
//! - [`local`] - save, add/remove files, delete, clone, rename, tag
//! - [`pull`] - link, pull and refresh remote templates
//! - [`apply`] - write a template into a directory with conflict handling
//! - [`clean`] - strip project-relative imports from saved files
//! - [`source`] - uniform file access for local and remote templates

pub mod apply;
pub mod clean;
pub mod deps;
pub mod local;
pub mod pull;
pub mod report;
pub mod scan;
pub mod source;

pub use apply::{
    ApplyEngine, ApplyOptions, ApplyReport, ConflictDecision, ConflictPolicy, ConflictResolver,
    FileAction, FileOutcome, FixedResolver,
};
pub use clean::{CleanReport, CleanRules};
pub use local::{DetailsUpdate, LocalTemplateEngine, SaveRequest};
pub use pull::LinkRequest;
pub use report::{BatchReport, FileFailure, RemoveReport};
pub use source::FileSource;

//! Dependency capture from `package.json`.

use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PackageJson {
    #[serde(default)]
    dependencies: BTreeMap<String, String>,
    #[serde(default)]
    dev_dependencies: BTreeMap<String, String>,
}

/// Runtime and dev dependency maps of a project.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Dependencies {
    pub dependencies: BTreeMap<String, String>,
    pub dev_dependencies: BTreeMap<String, String>,
}

/// Read dependencies from `<dir>/package.json`, if there is one.
///
/// A missing or malformed file yields empty maps.
pub fn read_package_dependencies(dir: &Path) -> Dependencies {
    let path = dir.join("package.json");
    let Ok(content) = fs::read_to_string(&path) else {
        return Dependencies::default();
    };

    match serde_json::from_str::<PackageJson>(&content) {
        Ok(pkg) => Dependencies {
            dependencies: pkg.dependencies,
            dev_dependencies: pkg.dev_dependencies,
        },
        Err(e) => {
            tracing::warn!("Ignoring malformed {}: {}", path.display(), e);
            Dependencies::default()
        }
    }
}

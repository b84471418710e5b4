#![allow(dead_code)]

use std::path::{Path, PathBuf};

use cnfeat::{Featurizer, Structure};
use cnfeat::io::{JsonStructureParser, StructureParser};

/// Folder containing the structure files used in tests
pub fn structures_folder() -> PathBuf {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("data");
    path.push("structures");
    return path;
}

/// Read the structure in `tests/data/structures/<name>.json`
pub fn load_structure(name: &str) -> Structure {
    let path = structures_folder().join(format!("{}.json", name));
    let parsed = JsonStructureParser.parse(&path).expect("failed to parse structure");
    return Structure::try_from(parsed).expect("invalid structure");
}

/// Copy the given structure files from `tests/data/structures` to `folder`
pub fn copy_structures(names: &[&str], folder: &Path) {
    for name in names {
        let source = structures_folder().join(name);
        std::fs::copy(&source, folder.join(name)).expect("failed to copy file");
    }
}

pub fn featurizer() -> Featurizer {
    Featurizer::from_json(r#"{
        "search_radius": 6.0,
        "relative_tolerance": 0.05,
        "max_gap": 0.3
    }"#).expect("invalid parameters")
}

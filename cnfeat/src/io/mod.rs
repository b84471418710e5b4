//! Reading structures from files: the [`StructureParser`] trait, the parsers
//! implementing it, and [`discover_files`] to list the structure files in a
//! folder.

use std::path::{Path, PathBuf};

use crate::Error;
use crate::structure::ParsedStructure;

mod json;
pub use self::json::JsonStructureParser;

mod chemfiles;
pub use self::chemfiles::ChemfilesParser;

/// A `StructureParser` reads the lattice and sites of a structure from a
/// single file. Parsers are shared between the worker threads of a batch.
pub trait StructureParser: Send + Sync {
    /// Read the structure in the file at `path`. Failures are reported as
    /// [`Error::ParseFailure`].
    fn parse(&self, path: &Path) -> Result<ParsedStructure, Error>;
}

/// Find all the files directly inside `folder` with one of the given
/// `extensions` (with or without leading dot, compared case-sensitively). The
/// paths are returned sorted.
pub fn discover_files(folder: impl AsRef<Path>, extensions: &[&str]) -> Result<Vec<PathBuf>, Error> {
    let folder = folder.as_ref();
    if !folder.is_dir() {
        return Err(Error::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("'{}' is not a directory", folder.display())
        )));
    }

    let folder = glob::Pattern::escape(&folder.to_string_lossy());

    let mut paths = Vec::new();
    for extension in extensions {
        let extension = extension.trim_start_matches('.');
        if extension.is_empty() {
            return Err(Error::InvalidParameter("file extensions can not be empty".into()));
        }

        let pattern = format!("{}/*.{}", folder, glob::Pattern::escape(extension));
        for path in glob::glob(&pattern)? {
            let path = path?;
            if path.is_file() {
                paths.push(path);
            }
        }
    }

    paths.sort();
    paths.dedup();

    return Ok(paths);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn discover() {
        let folder = tempfile::tempdir().unwrap();
        for name in ["b.json", "a.json", "c.cif", "d.JSON", "notes.txt"] {
            std::fs::write(folder.path().join(name), "").unwrap();
        }
        std::fs::create_dir(folder.path().join("nested.json")).unwrap();
        std::fs::create_dir(folder.path().join("sub")).unwrap();
        std::fs::write(folder.path().join("sub").join("e.json"), "").unwrap();

        let paths = discover_files(folder.path(), &["json"]).unwrap();
        let names = paths.iter()
            .map(|path| path.file_name().unwrap().to_string_lossy().into_owned())
            .collect::<Vec<_>>();
        assert_eq!(names, ["a.json", "b.json"]);

        let paths = discover_files(folder.path(), &["cif", ".json"]).unwrap();
        let names = paths.iter()
            .map(|path| path.file_name().unwrap().to_string_lossy().into_owned())
            .collect::<Vec<_>>();
        assert_eq!(names, ["a.json", "b.json", "c.cif"]);

        assert!(discover_files(folder.path(), &["xyz"]).unwrap().is_empty());
        assert!(matches!(discover_files(folder.path(), &[""]), Err(Error::InvalidParameter(_))));
    }

    #[test]
    fn missing_folder() {
        let folder = tempfile::tempdir().unwrap();
        let missing = folder.path().join("missing");
        assert!(matches!(discover_files(missing, &["json"]), Err(Error::Io(_))));
    }
}

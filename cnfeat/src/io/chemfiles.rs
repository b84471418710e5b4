use std::path::Path;

use crate::Error;
use crate::structure::ParsedStructure;
use super::StructureParser;

#[cfg(feature = "chemfiles")]
impl From<chemfiles::Error> for Error {
    fn from(error: chemfiles::Error) -> Error {
        Error::Chemfiles(error.message)
    }
}

/// Parser reading structures with [chemfiles](https://chemfiles.org/).
///
/// This parser can read all [formats supported by
/// chemfiles](https://chemfiles.org/chemfiles/latest/formats.html) which
/// contain a unit cell, such as CIF or POSCAR. Only the first frame of each
/// file is used, and atom names are used as species labels.
///
/// This parser requires the `chemfiles` feature; without it all calls to
/// `parse` fail.
#[derive(Debug, Clone, Copy, Default)]
pub struct ChemfilesParser;

#[cfg(feature = "chemfiles")]
impl StructureParser for ChemfilesParser {
    fn parse(&self, path: &Path) -> Result<ParsedStructure, Error> {
        return read_first_frame(path).map_err(|error| match error {
            Error::Chemfiles(e) => Error::ParseFailure(format!("'{}': {}", path.display(), e)),
            error => error,
        });
    }
}

#[cfg(feature = "chemfiles")]
#[allow(clippy::needless_range_loop)]
fn read_first_frame(path: &Path) -> Result<ParsedStructure, Error> {
    use crate::{Matrix3, Vector3D};
    use crate::structure::Lattice;

    let mut trajectory = chemfiles::Trajectory::open(path, 'r')?;
    if trajectory.nsteps() == 0 {
        return Err(Error::ParseFailure(format!("'{}' does not contain any structure", path.display())));
    }

    let mut frame = chemfiles::Frame::new();
    trajectory.read(&mut frame)?;

    if frame.cell().shape() == chemfiles::CellShape::Infinite {
        return Err(Error::ParseFailure(format!("'{}' does not define a unit cell", path.display())));
    }

    // transpose since chemfiles is using columns for the cell vectors and
    // we want rows as cell vectors
    let matrix = Matrix3::from(frame.cell().matrix()).transposed();
    let lattice = Lattice::new(matrix)?;

    let positions = frame.positions();
    let mut sites = Vec::with_capacity(frame.size());
    for i in 0..frame.size() {
        let fractional = lattice.fractional(Vector3D::from(positions[i]));
        sites.push((frame.atom(i).name(), fractional.into()));
    }

    return Ok(ParsedStructure {
        lattice: [matrix[0], matrix[1], matrix[2]],
        sites: sites,
    });
}

#[cfg(not(feature = "chemfiles"))]
impl StructureParser for ChemfilesParser {
    fn parse(&self, path: &Path) -> Result<ParsedStructure, Error> {
        Err(Error::ParseFailure(format!(
            "can not read '{}': ChemfilesParser is only available with the chemfiles feature enabled",
            path.display()
        )))
    }
}


#[cfg(all(test, not(feature = "chemfiles")))]
mod tests {
    use super::*;

    #[test]
    fn disabled() {
        let error = ChemfilesParser.parse(Path::new("structure.cif")).unwrap_err();
        assert!(matches!(error, Error::ParseFailure(_)));
        assert!(error.to_string().contains("chemfiles feature"));
    }
}

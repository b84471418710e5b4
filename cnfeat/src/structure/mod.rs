use crate::{Error, Matrix3, Vector3D};
use crate::neighbors::CellShift;

mod lattice;
pub use self::lattice::Lattice;

#[cfg(test)]
pub(crate) mod test_utils;

/// A single atomic site in a crystal structure: a species label and a
/// position in fractional coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct Site {
    /// Species label for this site, as found in the input file. This can be
    /// an element symbol (`"Na"`) or a crystallographic site label (`"Na1"`)
    pub species: String,
    /// Position of the site, as a fraction of the lattice basis vectors
    pub fractional: Vector3D,
}

impl Site {
    /// Create a new site with the given `species` label and fractional
    /// coordinates
    pub fn new(species: impl Into<String>, fractional: impl Into<Vector3D>) -> Site {
        Site {
            species: species.into(),
            fractional: fractional.into(),
        }
    }

    /// Get the chemical element for this site, extracted from the species
    /// label. Site labels such as `"Sb1"`, `"SB1"` or `"O2-"` give `"Sb"`,
    /// `"Sb"` and `"O"` respectively. Labels which do not start with a letter
    /// are returned unchanged.
    pub fn element(&self) -> String {
        let mut chars = self.species.chars();
        let first = match chars.next() {
            Some(c) if c.is_ascii_alphabetic() => c.to_ascii_uppercase(),
            _ => return self.species.clone(),
        };

        let mut element = String::from(first);
        // element symbols are at most two letters long
        if let Some(c) = chars.next() {
            if c.is_ascii_alphabetic() {
                element.push(c.to_ascii_lowercase());
            }
        }
        return element;
    }
}

/// Structure data as produced by a structure file parser, before any
/// validation.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedStructure {
    /// Lattice basis vectors, as rows
    pub lattice: [[f64; 3]; 3],
    /// Species label and fractional coordinates of all sites
    pub sites: Vec<(String, [f64; 3])>,
}

/// An immutable, validated crystal structure: a lattice and an ordered list
/// of sites. The position of a site in this list is its index in all the
/// results computed on this structure.
#[derive(Debug, Clone, PartialEq)]
pub struct Structure {
    lattice: Lattice,
    sites: Vec<Site>,
}

impl Structure {
    /// Create a new structure from a lattice and a list of sites.
    ///
    /// All fractional coordinates must be finite. They are wrapped inside the
    /// `[0, 1)` range, which does not change the periodic structure.
    pub fn new(lattice: Lattice, sites: Vec<Site>) -> Result<Structure, Error> {
        let mut sites = sites;
        for (i, site) in sites.iter_mut().enumerate() {
            if !site.fractional.is_finite() {
                return Err(Error::InvalidStructure(format!(
                    "site {} ({}) has non-finite fractional coordinates {:?}",
                    i, site.species, site.fractional.as_array()
                )));
            }

            for xyz in 0..3 {
                site.fractional[xyz] = wrap_fractional(site.fractional[xyz]);
            }
        }

        return Ok(Structure {
            lattice: lattice,
            sites: sites,
        });
    }

    /// Get the lattice of this structure
    pub fn lattice(&self) -> &Lattice {
        &self.lattice
    }

    /// Get the ordered list of sites in this structure
    pub fn sites(&self) -> &[Site] {
        &self.sites
    }

    /// Get the number of sites in this structure
    pub fn size(&self) -> usize {
        self.sites.len()
    }

    /// Get the Cartesian position of the periodic image of the site at
    /// `index`, translated by `image` lattice vectors.
    pub fn cartesian(&self, index: usize, image: CellShift) -> Vector3D {
        self.to_cartesian(self.sites[index].fractional, image)
    }

    /// Convert the `fractional` coordinate, translated by `image` lattice
    /// vectors, to Cartesian coordinates.
    pub fn to_cartesian(&self, fractional: Vector3D, image: CellShift) -> Vector3D {
        self.lattice.cartesian(fractional + image.as_vector())
    }

    /// Get the list of unique chemical elements in this structure, in order
    /// of first appearance.
    pub fn elements(&self) -> Vec<String> {
        let mut elements: Vec<String> = Vec::new();
        for site in &self.sites {
            let element = site.element();
            if !elements.contains(&element) {
                elements.push(element);
            }
        }
        return elements;
    }
}

impl TryFrom<ParsedStructure> for Structure {
    type Error = Error;

    fn try_from(parsed: ParsedStructure) -> Result<Structure, Error> {
        let lattice = Lattice::new(Matrix3::from(parsed.lattice))?;
        let sites = parsed.sites.into_iter()
            .map(|(species, fractional)| Site::new(species, fractional))
            .collect();

        return Structure::new(lattice, sites);
    }
}

/// Wrap a fractional coordinate inside `[0, 1)`
fn wrap_fractional(value: f64) -> f64 {
    let wrapped = value.rem_euclid(1.0);
    // rem_euclid can return exactly 1.0 for tiny negative values
    if wrapped >= 1.0 {
        0.0
    } else {
        wrapped
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_ulps_eq;

    use super::*;

    #[test]
    fn element_from_label() {
        assert_eq!(Site::new("Na", [0.0; 3]).element(), "Na");
        assert_eq!(Site::new("Sb1", [0.0; 3]).element(), "Sb");
        assert_eq!(Site::new("SB12", [0.0; 3]).element(), "Sb");
        assert_eq!(Site::new("O2-", [0.0; 3]).element(), "O");
        assert_eq!(Site::new("c", [0.0; 3]).element(), "C");
        assert_eq!(Site::new("42", [0.0; 3]).element(), "42");
    }

    #[test]
    fn wrapping() {
        let lattice = Lattice::cubic(4.0).unwrap();
        let structure = Structure::new(lattice, vec![
            Site::new("Na", [1.25, -0.25, 0.5]),
            Site::new("Cl", [-1e-18, 3.0, 0.999]),
        ]).unwrap();

        assert_eq!(structure.sites()[0].fractional, Vector3D::new(0.25, 0.75, 0.5));

        let second = structure.sites()[1].fractional;
        assert_eq!(second[0], 0.0);
        assert_eq!(second[1], 0.0);
        assert_ulps_eq!(second[2], 0.999);
    }

    #[test]
    fn invalid_coordinates() {
        let lattice = Lattice::cubic(4.0).unwrap();
        let result = Structure::new(lattice, vec![
            Site::new("Na", [0.0, f64::INFINITY, 0.5]),
        ]);
        assert!(matches!(result, Err(Error::InvalidStructure(_))));
    }

    #[test]
    fn from_parsed() {
        let parsed = ParsedStructure {
            lattice: [[3.0, 0.0, 0.0], [0.0, 3.0, 0.0], [0.0, 0.0, 3.0]],
            sites: vec![("Cs".into(), [0.0, 0.0, 0.0]), ("Cl".into(), [0.5, 0.5, 0.5])],
        };
        let structure = Structure::try_from(parsed).unwrap();
        assert_eq!(structure.size(), 2);
        assert_eq!(structure.elements(), ["Cs", "Cl"]);

        let degenerate = ParsedStructure {
            lattice: [[3.0, 0.0, 0.0], [3.0, 0.0, 0.0], [0.0, 0.0, 3.0]],
            sites: vec![("Cs".into(), [0.0, 0.0, 0.0])],
        };
        assert!(matches!(Structure::try_from(degenerate), Err(Error::InvalidStructure(_))));
    }

    #[test]
    fn cartesian() {
        let lattice = Lattice::orthorhombic(2.0, 3.0, 4.0).unwrap();
        let structure = Structure::new(lattice, vec![
            Site::new("Cs", [0.5, 0.5, 0.5]),
        ]).unwrap();

        assert_eq!(structure.cartesian(0, CellShift::default()), Vector3D::new(1.0, 1.5, 2.0));
        assert_eq!(structure.cartesian(0, CellShift::new([1, 0, -1])), Vector3D::new(3.0, 1.5, -2.0));
    }
}

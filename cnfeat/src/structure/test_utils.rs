use crate::Matrix3;
use super::{Lattice, Site, Structure};

pub fn test_structure(name: &str) -> Structure {
    match name {
        "simple-cubic" => get_simple_cubic(),
        "NaCl" => get_nacl(),
        "CsCl" => get_cscl(),
        "ZnS" => get_zns(),
        "isolated" => get_isolated(),
        _ => panic!("unknown test structure {}", name)
    }
}

/// Polonium-like simple cubic structure, with a single atom in a cubic cell of
/// side 3
fn get_simple_cubic() -> Structure {
    let lattice = Lattice::cubic(3.0).unwrap();
    return Structure::new(lattice, vec![Site::new("Po", [0.0, 0.0, 0.0])]).unwrap();
}

/// NaCl (rock-salt) structure, using the conventional cubic cell of side 4.
/// Every atom sits at the center of an octahedron of the other species, with
/// the closest Na-Cl distance equal to 2.
fn get_nacl() -> Structure {
    let lattice = Lattice::cubic(4.0).unwrap();
    let mut sites = Vec::new();
    let fcc = [[0.0, 0.0, 0.0], [0.5, 0.5, 0.0], [0.5, 0.0, 0.5], [0.0, 0.5, 0.5]];
    for position in fcc {
        sites.push(Site::new("Na1", position));
    }
    for position in fcc {
        let shifted = [position[0] + 0.5, position[1], position[2]];
        sites.push(Site::new("Cl1", shifted));
    }
    return Structure::new(lattice, sites).unwrap();
}

/// CsCl structure
/// The primitive unit cell is the usual cubic cell with side length set to
/// one, and every atom has 8 neighbors at sqrt(3)/2.
fn get_cscl() -> Structure {
    let lattice = Lattice::cubic(1.0).unwrap();
    return Structure::new(lattice, vec![
        Site::new("Cl", [0.0, 0.0, 0.0]),
        Site::new("Cs", [0.5, 0.5, 0.5]),
    ]).unwrap();
}

/// ZnS (zincblende) structure, using a primitive unit cell which makes the
/// lattice parameter of the cubic cell equal to 2. In these units, the
/// closest Zn-S distance is sqrt(3)/2 and every atom is tetrahedrally
/// coordinated.
fn get_zns() -> Structure {
    let cell = Matrix3::new([[0.0, 1.0, 1.0], [1.0, 0.0, 1.0], [1.0, 1.0, 0.0]]);
    let lattice = Lattice::new(cell).unwrap();
    return Structure::new(lattice, vec![
        Site::new("S", [0.0, 0.0, 0.0]),
        Site::new("Zn", [0.25, 0.25, 0.25]),
    ]).unwrap();
}

/// A single atom in a large cubic cell, without any neighbor closer than 20
fn get_isolated() -> Structure {
    let lattice = Lattice::cubic(20.0).unwrap();
    return Structure::new(lattice, vec![Site::new("Ar", [0.5, 0.5, 0.5])]).unwrap();
}

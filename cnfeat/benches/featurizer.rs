#![allow(clippy::needless_return)]
use cnfeat::{Featurizer, Lattice, Site, Structure};

use criterion::{Criterion, criterion_group, criterion_main, SamplingMode};

fn perovskite() -> Structure {
    let lattice = Lattice::cubic(3.905).unwrap();
    return Structure::new(lattice, vec![
        Site::new("Sr", [0.0, 0.0, 0.0]),
        Site::new("Ti", [0.5, 0.5, 0.5]),
        Site::new("O", [0.5, 0.5, 0.0]),
        Site::new("O", [0.5, 0.0, 0.5]),
        Site::new("O", [0.0, 0.5, 0.5]),
    ]).unwrap();
}

fn triclinic() -> Structure {
    let lattice = Lattice::from_parameters(5.1, 6.3, 7.2, 82.0, 97.5, 103.0).unwrap();
    let sites = [
        ("Sb1", [0.112, 0.334, 0.871]),
        ("Sb2", [0.621, 0.902, 0.245]),
        ("Th1", [0.405, 0.117, 0.503]),
        ("Th1", [0.873, 0.668, 0.036]),
        ("Pt1", [0.254, 0.781, 0.392]),
        ("Pt2", [0.748, 0.402, 0.688]),
    ];
    let sites = sites.iter().map(|&(species, position)| Site::new(species, position)).collect();
    return Structure::new(lattice, sites).unwrap();
}

fn featurizer(c: &mut Criterion) {
    let mut group = c.benchmark_group("Featurizer (per site)");
    group.noise_threshold(0.05);
    group.sampling_mode(SamplingMode::Flat);

    let featurizer = Featurizer::from_json(r#"{
        "search_radius": 8.0,
        "relative_tolerance": 0.05,
        "max_gap": 0.3
    }"#).unwrap();

    for (name, structure) in [("SrTiO3", perovskite()), ("triclinic", triclinic())] {
        let n_sites = structure.size();
        group.bench_function(name, |b| b.iter_custom(|repeat| {
            let start = std::time::Instant::now();
            for _ in 0..repeat {
                featurizer.compute(&structure).unwrap();
            }
            start.elapsed() / n_sites as u32
        }));
    }
}

criterion_group!(benches, featurizer);
criterion_main!(benches);

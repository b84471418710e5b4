use cnfeat::{BatchOrchestrator, FeatureTable, Featurizer};
use cnfeat::io::JsonStructureParser;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // featurize all JSON structures in the folder given on the command line
    let folder = std::env::args().nth(1).expect("expected a command line argument");

    // pass parameters as JSON
    let parameters = r#"{
        "search_radius": 6.0,
        "relative_tolerance": 0.05,
        "max_gap": 0.3
    }"#;
    let featurizer = Featurizer::from_json(parameters)?;

    let orchestrator = BatchOrchestrator::new(featurizer);
    let mut table = FeatureTable::new();
    let report = orchestrator.run_folder(&folder, &["json"], &JsonStructureParser, &mut table)?;

    for skipped in &report.skipped {
        eprintln!("skipped {}: {}", skipped.path.display(), skipped.reason);
    }

    // one line per site, with the structure, the site and its species
    for row in table.site_rows() {
        println!(
            "{:<12} {:>4} {:<6} CN = {:>2} <d> = {:.4}",
            row.structure,
            row.site,
            row.species,
            row.features["coordination_number"],
            row.features["distance_mean"],
        );
    }

    // the full table is also available as a dense array or as JSON
    let array = table.to_array();
    println!("feature matrix shape: {:?}", array.shape());

    Ok(())
}

use cnfeat::{BatchOrchestrator, FeatureTable, Featurizer};
use cnfeat::io::JsonStructureParser;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let folder = std::env::args().nth(1).expect("expected a command line argument");

    // enable collection of profiling data
    time_graph::enable_data_collection(true);
    // clear any existing collected data
    time_graph::clear_collected_data();

    // run the calculation
    let table = featurize(&folder)?;
    println!("featurized {} structures", table.len());

    // get the call graph and display it
    let graph = time_graph::get_full_graph();
    // (this requires the "table" feature for the time_graph crate)
    println!("{}", graph.as_short_table());

    // also available for saving profiling data to the disk & future analysis
    // (this requires the "json" feature for the time_graph crate)
    println!("{}", graph.as_json());

    Ok(())
}

/// Featurize all structures in `folder`, this is the same code as the
/// 'featurize' example
fn featurize(folder: &str) -> Result<FeatureTable, Box<dyn std::error::Error>> {
    let parameters = r#"{
        "search_radius": 6.0,
        "relative_tolerance": 0.05,
        "max_gap": 0.3
    }"#;

    let table = time_graph::spanned!("Full calculation", {
        let orchestrator = BatchOrchestrator::new(Featurizer::from_json(parameters)?);
        let mut table = FeatureTable::new();
        orchestrator.run_folder(folder, &["json"], &JsonStructureParser, &mut table)?;
        table
    });

    Ok(table)
}

//! Featurization of many structure files at once.

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use log::{debug, info, warn};
use rayon::prelude::*;

use crate::{Error, Featurizer};
use crate::structure::Structure;
use crate::io::{discover_files, StructureParser};
use crate::table::{FeatureSink, StructureRows};

/// Shared flag used to stop a running batch. Structures which already
/// started are still processed until the end, but no new structure is
/// started after cancellation.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken(Arc<AtomicBool>);

impl CancellationToken {
    /// Create a new, non-cancelled token
    pub fn new() -> CancellationToken {
        CancellationToken::default()
    }

    /// Cancel all batches using this token
    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    /// Was this token cancelled?
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// A structure which could not be featurized
#[derive(Debug)]
pub struct SkippedStructure {
    /// path to the structure file
    pub path: PathBuf,
    /// identifier of the structure
    pub identifier: String,
    /// why the structure was skipped
    pub reason: Error,
}

/// Summary of a batch run
#[derive(Debug, Default)]
pub struct BatchReport {
    /// identifiers of the structures written to the sink, in order
    pub processed: Vec<String>,
    /// structures which could not be featurized
    pub skipped: Vec<SkippedStructure>,
    /// was the batch cancelled before all structures were processed?
    pub cancelled: bool,
}

/// Outcome of processing a single structure file
enum Outcome {
    Computed(StructureRows),
    Skipped(SkippedStructure),
    NotStarted,
}

/// The `BatchOrchestrator` runs a [`Featurizer`] on a list of structure
/// files, in parallel, and sends the resulting rows to a [`FeatureSink`].
///
/// Structures which fail to parse or are invalid are skipped and reported in
/// the [`BatchReport`]. Configuration errors and errors from the sink abort
/// the whole batch.
pub struct BatchOrchestrator {
    featurizer: Featurizer,
    cancellation: CancellationToken,
}

impl BatchOrchestrator {
    /// Create a new orchestrator using the given `featurizer`
    pub fn new(featurizer: Featurizer) -> BatchOrchestrator {
        BatchOrchestrator {
            featurizer: featurizer,
            cancellation: CancellationToken::new(),
        }
    }

    /// Use the given `token` to cancel batches run by this orchestrator
    pub fn with_cancellation(mut self, token: CancellationToken) -> BatchOrchestrator {
        self.cancellation = token;
        return self;
    }

    /// Get the featurizer used by this orchestrator
    pub fn featurizer(&self) -> &Featurizer {
        &self.featurizer
    }

    /// Featurize all the files with one of the given `extensions` in
    /// `folder`, see [`discover_files`] and [`BatchOrchestrator::run`].
    pub fn run_folder(
        &self,
        folder: impl AsRef<Path>,
        extensions: &[&str],
        parser: &dyn StructureParser,
        sink: &mut dyn FeatureSink,
    ) -> Result<BatchReport, Error> {
        let paths = discover_files(folder, extensions)?;
        return self.run(&paths, parser, sink);
    }

    /// Featurize all the structures in `paths`, reading them with `parser`.
    ///
    /// The structures are processed in parallel, and the rows of each
    /// structure are written to `sink` in the order of `paths`. See
    /// [`structure_identifiers`] for the identifiers given to each structure.
    /// Giving the same path twice is an error.
    #[time_graph::instrument(name = "BatchOrchestrator::run")]
    pub fn run(
        &self,
        paths: &[PathBuf],
        parser: &dyn StructureParser,
        sink: &mut dyn FeatureSink,
    ) -> Result<BatchReport, Error> {
        info!("featurizing {} structures", paths.len());

        let identifiers = structure_identifiers(paths)?;
        let outcomes = paths.par_iter()
            .zip(identifiers)
            .map(|(path, identifier)| self.process(path, identifier, parser))
            .collect::<Result<Vec<_>, _>>()?;

        let mut report = BatchReport::default();
        for outcome in outcomes {
            match outcome {
                Outcome::Computed(rows) => {
                    sink.write_structure(&rows)?;
                    report.processed.push(rows.structure);
                }
                Outcome::Skipped(skipped) => {
                    warn!(
                        "skipping structure '{}' ({}): {}",
                        skipped.identifier, skipped.path.display(), skipped.reason
                    );
                    report.skipped.push(skipped);
                }
                Outcome::NotStarted => report.cancelled = true,
            }
        }

        if report.cancelled {
            info!(
                "batch cancelled after {} structures ({} skipped)",
                report.processed.len(), report.skipped.len()
            );
        } else {
            info!(
                "featurized {} structures ({} skipped)",
                report.processed.len(), report.skipped.len()
            );
        }

        return Ok(report);
    }

    /// Parse and featurize a single structure file. Only configuration errors
    /// are returned as `Err`, all other errors skip the structure.
    fn process(&self, path: &Path, identifier: String, parser: &dyn StructureParser) -> Result<Outcome, Error> {
        if self.cancellation.is_cancelled() {
            return Ok(Outcome::NotStarted);
        }

        debug!("featurizing '{}'", identifier);

        let rows = parser.parse(path)
            .and_then(Structure::try_from)
            .and_then(|structure| {
                if structure.size() == 0 {
                    return Err(Error::InvalidStructure("structure has no sites".into()));
                }

                let features = self.featurizer.compute(&structure)?;
                Ok(StructureRows::new(&identifier, &structure, features))
            });

        match rows {
            Ok(rows) => Ok(Outcome::Computed(rows)),
            Err(error) if error.is_configuration_error() => Err(error),
            Err(error) => Ok(Outcome::Skipped(SkippedStructure {
                path: path.to_owned(),
                identifier: identifier,
                reason: error,
            })),
        }
    }
}

/// Get the identifiers of the structures stored at `paths`.
///
/// The identifier of a structure is its file name without extension. When
/// multiple files share the same name without extension (for example
/// `NaCl.json` and `NaCl.cif`), the full paths are used instead, so that
/// identifiers are unique in a batch.
pub fn structure_identifiers(paths: &[PathBuf]) -> Result<Vec<String>, Error> {
    let mut stems_count = BTreeMap::new();
    for path in paths {
        *stems_count.entry(file_stem(path)).or_insert(0_usize) += 1;
    }

    let mut identifiers = Vec::with_capacity(paths.len());
    let mut seen = BTreeSet::new();
    for path in paths {
        let stem = file_stem(path);
        let identifier = if stems_count[&stem] == 1 {
            stem
        } else {
            path.display().to_string()
        };

        if !seen.insert(identifier.clone()) {
            return Err(Error::InvalidParameter(format!(
                "structure file '{}' is given more than once", path.display()
            )));
        }
        identifiers.push(identifier);
    }

    return Ok(identifiers);
}

/// Get the file name without extension of `path`, or the full path if there
/// is no file name.
fn file_stem(path: &Path) -> String {
    match path.file_stem() {
        Some(stem) => stem.to_string_lossy().into_owned(),
        None => path.display().to_string(),
    }
}

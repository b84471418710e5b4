#![warn(clippy::all, clippy::pedantic)]

// disable some style lints
#![allow(clippy::needless_return, clippy::must_use_candidate, clippy::comparison_chain)]
#![allow(clippy::redundant_field_names, clippy::redundant_closure_for_method_calls)]
#![allow(clippy::unreadable_literal, clippy::option_if_let_else, clippy::range_plus_one)]
#![allow(clippy::missing_errors_doc, clippy::missing_panics_doc, clippy::module_name_repetitions)]

#![allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_wrap, clippy::cast_lossless, clippy::cast_sign_loss)]
#![allow(clippy::default_trait_access)]

// Tests lints
#![cfg_attr(test, allow(clippy::float_cmp))]

//! `cnfeat` computes geometric descriptors of the local environment of every
//! site in periodic crystal structures: neighbor distances, coordination
//! numbers and coordination polyhedra shapes.
//!
//! The pipeline for a single structure is
//! [`neighbors::find_neighbors`] → [`coordination::resolve_shell`] →
//! [`features::extract_features`], wrapped in a [`Featurizer`]. The
//! [`batch::BatchOrchestrator`] runs a featurizer over a folder of structure
//! files.

pub mod types;
pub use types::*;

mod errors;
pub use self::errors::Error;

pub mod structure;
pub use self::structure::{Lattice, Site, Structure, ParsedStructure};

pub mod neighbors;
pub use self::neighbors::{CellShift, Neighbor, NeighborList};

pub mod coordination;
pub use self::coordination::{CoordinationParameters, CoordinationShell};

pub mod features;
pub use self::features::{FeatureVector, FEATURE_NAMES};

mod featurizer;
pub use self::featurizer::{Featurizer, EngineParameters};

pub mod io;

pub mod table;
pub use self::table::{FeatureSink, FeatureTable, SiteRow, StructureRows};

pub mod batch;
pub use self::batch::{BatchOrchestrator, BatchReport, CancellationToken, SkippedStructure};

#![deny(unsafe_code)]

pub mod error;
pub mod registry;
pub mod sample;
pub mod seed;
pub mod target;

pub use crate::error::StandardsError;
pub use crate::registry::{
    ColumnDef, ColumnGroup, ColumnType, DEFAULT_EXPANDED_GROUPS, SchemaRegistry, claims_registry,
};
pub use crate::sample::{SAMPLE_FILENAME, sample_import_csv};
pub use crate::seed::{load_seed_claims, parse_claims_csv};
pub use crate::target::{TargetField, TargetFieldType, claim_target_fields};

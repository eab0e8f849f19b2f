//! Validation services.
//!
//! Each pass is its own service; [`ValidationService`] runs them in order.

mod duplicates;
mod extractor;
mod migrate;
mod registry;
mod scanner;
mod stamp;
mod uniqueness;
mod validation;

pub use duplicates::{DuplicateMatch, NearDuplicateDetector};
pub use extractor::{Extraction, MetadataExtractor, REQUIRED_FIELDS, validate};
pub use migrate::{
    BulkMigrator, MigrationAction, MigrationEntry, MigrationManifest, MigrationOutcome,
    MigrationStats,
};
pub use registry::{RegistryBuilder, RegistryWriter, UNKNOWN_BUCKET};
pub use scanner::{DocumentScanner, ScanOutput};
pub use stamp::{FrontMatterStamper, StampOutcome, StampRequest};
pub use uniqueness::CanonicalUniquenessChecker;
pub use validation::{RunMode, ValidationReport, ValidationService};

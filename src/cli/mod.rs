//! CLI support.
//!
//! # Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `validate` | Validate the corpus and regenerate the registry |
//! | `validate --check-only` | Validate without touching the registry (pre-commit) |
//! | `stamp` | Add a front-matter block to a document |
//! | `migrate` | Apply a manifest of stamp, move and archive steps |
//! | `config --show` | Print the effective configuration |
//!
//! # Example Usage
//!
//! ```bash
//! # Full run: validate and write docs/index/registry.json
//! docreg validate
//!
//! # Pre-commit hook
//! docreg validate --pre-commit
//!
//! # Migrate a legacy guide
//! docreg stamp docs/guides/pre-commit.md --doc-id DOC-2025-00067 \
//!     --title "Pre-Commit Hooks Guide" --tag pre-commit --tag git \
//!     --summary "Guide for setting up and using pre-commit hooks."
//! ```

mod report;

pub use report::{
    ReportFormat, render_migration, render_report, write_json, write_migration, write_stats,
    write_text,
};

//! Release providers contributing migration steps
//!
//! Each release owns a contiguous block of step ids. Ids are never reused or
//! renumbered once released; new releases append.

pub mod v00;
pub mod v90;
pub mod v91;

use crate::registry::MigrationStepRegistry;

pub use v00::DbVersion00;
pub use v90::DbVersion90;
pub use v91::DbVersion91;

/// Register every release provider, oldest first.
pub fn register_all(registry: &mut MigrationStepRegistry) {
    registry
        .register(&DbVersion00)
        .register(&DbVersion90)
        .register(&DbVersion91);
}

#[cfg(test)]
#[path = "version_test.rs"]
mod tests;

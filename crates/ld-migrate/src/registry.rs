//! Step catalogue: registration, validation, and execution plans

use crate::error::RegistryError;
use crate::step::{Change, MigrationStep, StepId};

/// A release's contribution to the step catalogue
pub trait DbVersion {
    fn add_steps(&self, registry: &mut MigrationStepRegistry);
}

/// Collects steps from release providers until [`build`](Self::build)
#[derive(Debug, Default)]
pub struct MigrationStepRegistry {
    steps: Vec<MigrationStep>,
}

impl MigrationStepRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, id: u32, description: impl Into<String>, change: Change) -> &mut Self {
        self.steps
            .push(MigrationStep::new(StepId::new(id), description, change));
        self
    }

    pub fn register(&mut self, version: &dyn DbVersion) -> &mut Self {
        version.add_steps(self);
        self
    }

    /// Validate and freeze the catalogue.
    ///
    /// Ids must start at [`StepId::FIRST`] and increase by one with no
    /// duplicate.
    pub fn build(self) -> Result<MigrationSteps, RegistryError> {
        let mut steps = self.steps;
        steps.sort_by_key(MigrationStep::id);

        let Some(first) = steps.first().map(MigrationStep::id) else {
            return Err(RegistryError::Empty);
        };

        for pair in steps.windows(2) {
            let (previous, next) = (pair[0].id(), pair[1].id());
            if previous == next {
                return Err(RegistryError::Duplicate { id: next });
            }
            if previous.next() != Some(next) {
                return Err(RegistryError::Gap { previous, next });
            }
        }

        if first != StepId::FIRST {
            return Err(RegistryError::WrongStart {
                expected: StepId::FIRST,
                found: first,
            });
        }

        log::debug!("Registered {} migration steps", steps.len());
        Ok(MigrationSteps { steps })
    }
}

/// Frozen, ordered, contiguous step catalogue
#[derive(Debug)]
pub struct MigrationSteps {
    steps: Vec<MigrationStep>,
}

impl MigrationSteps {
    pub fn all(&self) -> &[MigrationStep] {
        &self.steps
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Highest registered id
    pub fn max_id(&self) -> StepId {
        self.steps
            .last()
            .map_or(StepId::FIRST, MigrationStep::id)
    }

    /// Steps with an id greater than `last_applied`, ascending.
    ///
    /// `None` means nothing was applied, so every step is returned.
    pub fn steps_after(&self, last_applied: Option<StepId>) -> &[MigrationStep] {
        match last_applied {
            None => &self.steps,
            Some(last) => {
                let start = self.steps.partition_point(|s| s.id() <= last);
                &self.steps[start..]
            }
        }
    }
}

#[cfg(test)]
#[path = "registry_test.rs"]
mod tests;

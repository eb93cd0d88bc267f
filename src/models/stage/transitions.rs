use crate::error::{Result, TrellisError};

use super::types::StageRole;

impl StageRole {
    /// Check if promoting from the current stage to `target` is valid.
    ///
    /// Valid transitions:
    /// - `Playground` -> `Incubator`
    /// - `Incubator` -> `Product` | `Tool`
    /// - `Product` | `Tool` -> `Archive`
    /// - `Archive` is a terminal state
    ///
    /// Archiving through [`StageRole::try_archive`] does not consult this table.
    pub fn can_promote_to(&self, target: &StageRole) -> bool {
        match self {
            StageRole::Playground => matches!(target, StageRole::Incubator),
            StageRole::Incubator => matches!(target, StageRole::Product | StageRole::Tool),
            StageRole::Product | StageRole::Tool => matches!(target, StageRole::Archive),
            StageRole::Resources => false,
            StageRole::Archive => false, // Terminal state
        }
    }

    /// Returns the list of stages this stage can be promoted to.
    pub fn valid_promotions(&self) -> Vec<StageRole> {
        match self {
            StageRole::Playground => vec![StageRole::Incubator],
            StageRole::Incubator => vec![StageRole::Product, StageRole::Tool],
            StageRole::Product | StageRole::Tool => vec![StageRole::Archive],
            StageRole::Resources => vec![],
            StageRole::Archive => vec![], // Terminal state
        }
    }

    /// Attempt a promotion, returning the target or a typed error.
    pub fn try_promote(&self, target: StageRole) -> Result<StageRole> {
        if self.is_terminal() {
            return Err(TrellisError::TerminalStage {
                stage: self.key().to_string(),
            });
        }
        if self.can_promote_to(&target) {
            return Ok(target);
        }
        Err(TrellisError::InvalidTransition {
            from: self.key().to_string(),
            to: target.key().to_string(),
            hint: self.promotion_hint(),
        })
    }

    /// Archive from any non-archived stage.
    pub fn try_archive(&self) -> Result<StageRole> {
        if self.is_terminal() {
            return Err(TrellisError::TerminalStage {
                stage: self.key().to_string(),
            });
        }
        Ok(StageRole::Archive)
    }

    fn promotion_hint(&self) -> String {
        let targets = self.valid_promotions();
        if targets.is_empty() {
            return format!("{self} projects can only be archived.");
        }
        let names: Vec<&str> = targets.iter().map(|t| t.key()).collect();
        match self {
            StageRole::Product | StageRole::Tool => {
                "product/tool projects can only be archived.".to_string()
            }
            _ => format!(
                "{self} projects can only be promoted to {}.",
                names.join(" or ")
            ),
        }
    }
}

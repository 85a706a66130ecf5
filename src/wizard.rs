//! Five-step wizard: choose template, insert photo, arrange stickers, write
//! caption, export.
//!
//! Navigation moves one step at a time and clamps at both ends. The only
//! validation is on the way out of the first step, which needs a template.

#[cfg(test)]
#[path = "wizard_test.rs"]
mod wizard_test;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::ErrorCode;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WizardError {
    #[error("choose a template before continuing")]
    TemplateRequired,
}

impl ErrorCode for WizardError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::TemplateRequired => "E_TEMPLATE_REQUIRED",
        }
    }
}

/// A wizard step. The discriminant is the 1-based step number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Step {
    #[default]
    Template = 1,
    Photo = 2,
    Collage = 3,
    Caption = 4,
    Export = 5,
}

/// Which parts of the composition a step shows and lets the user touch.
#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StepViews {
    pub photo: bool,
    pub stickers: bool,
    /// Stickers take presses and show handles.
    pub stickers_interactive: bool,
    pub caption: bool,
    pub caption_interactive: bool,
}

impl Step {
    pub const ALL: [Step; 5] = [Step::Template, Step::Photo, Step::Collage, Step::Caption, Step::Export];

    #[must_use]
    pub fn number(self) -> u8 {
        self as u8
    }

    #[must_use]
    pub fn from_number(n: u8) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.number() == n)
    }

    /// Following step, clamped to the last.
    #[must_use]
    pub fn next(self) -> Self {
        Self::from_number(self.number() + 1).unwrap_or(Self::Export)
    }

    /// Preceding step, clamped to the first.
    #[must_use]
    pub fn prev(self) -> Self {
        Self::from_number(self.number().saturating_sub(1)).unwrap_or(Self::Template)
    }

    #[must_use]
    pub fn is_first(self) -> bool {
        self == Self::Template
    }

    #[must_use]
    pub fn is_last(self) -> bool {
        self == Self::Export
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Template => "Choose a template",
            Self::Photo => "Insert a photo",
            Self::Collage => "Decorate with stickers",
            Self::Caption => "Write a caption",
            Self::Export => "Share your postcard",
        }
    }

    #[must_use]
    pub fn views(self) -> StepViews {
        let n = self.number();
        StepViews {
            photo: n >= 2,
            stickers: n >= 3,
            stickers_interactive: self == Self::Collage,
            caption: n >= 4,
            caption_interactive: self == Self::Caption,
        }
    }
}

/// Current step plus the navigation rules.
#[derive(Debug, Default, Clone)]
pub struct Wizard {
    step: Step,
}

impl Wizard {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn step(&self) -> Step {
        self.step
    }

    /// Move forward one step.
    ///
    /// # Errors
    ///
    /// [`WizardError::TemplateRequired`] when leaving the first step with no
    /// template chosen. The step is unchanged.
    pub fn advance(&mut self, has_template: bool) -> Result<Step, WizardError> {
        if self.step.is_first() && !has_template {
            warn!("advance refused: no template");
            return Err(WizardError::TemplateRequired);
        }
        let next = self.step.next();
        if next != self.step {
            info!(from = self.step.number(), to = next.number(), "step");
        }
        self.step = next;
        Ok(next)
    }

    /// Move back one step. Always allowed; stops at the first.
    pub fn retreat(&mut self) -> Step {
        let prev = self.step.prev();
        if prev != self.step {
            info!(from = self.step.number(), to = prev.number(), "step");
        }
        self.step = prev;
        prev
    }
}

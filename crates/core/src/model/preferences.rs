use serde::{Deserialize, Serialize};

use crate::threshold::AttendanceSnapshot;

/// Raw text of the quick calculator fields, kept between launches.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CalculatorInput {
    pub total_classes: String,
    pub classes_attended: String,
    pub target_percentage: u8,
}

impl Default for CalculatorInput {
    fn default() -> Self {
        Self {
            total_classes: String::new(),
            classes_attended: String::new(),
            target_percentage: 80,
        }
    }
}

/// Why the calculator cannot produce a result yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CalculatorIssue {
    MissingInput,
    AttendedExceedsTotal,
}

impl CalculatorInput {
    /// Parse the fields into a snapshot.
    ///
    /// # Errors
    ///
    /// Returns `CalculatorIssue` while a field is empty or not a number, or
    /// when attended exceeds total.
    pub fn snapshot(&self) -> Result<AttendanceSnapshot, CalculatorIssue> {
        let total: u32 = self
            .total_classes
            .trim()
            .parse()
            .map_err(|_| CalculatorIssue::MissingInput)?;
        let attended: u32 = self
            .classes_attended
            .trim()
            .parse()
            .map_err(|_| CalculatorIssue::MissingInput)?;
        if attended > total {
            return Err(CalculatorIssue::AttendedExceedsTotal);
        }
        Ok(AttendanceSnapshot::new(
            attended,
            total,
            f64::from(self.target_percentage),
        ))
    }
}

/// Per-device preferences, never synced to the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Preferences {
    pub dark_mode: bool,
    pub calculator: CalculatorInput,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            dark_mode: true,
            calculator: CalculatorInput::default(),
        }
    }
}

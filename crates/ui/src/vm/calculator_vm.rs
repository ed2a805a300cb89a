use attendance_core::model::{CalculatorInput, CalculatorIssue};

use crate::vm::course_vm::{percent_label, tier_class};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CalculatorResultVm {
    pub percentage_str: String,
    pub tier_class: &'static str,
    pub status_label: &'static str,
    pub status_icon: &'static str,
    pub message: String,
}

/// What the quick calculator panel shows for the current input.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CalculatorVm {
    Hint(&'static str),
    Result(CalculatorResultVm),
}

#[must_use]
pub fn map_calculator(input: &CalculatorInput) -> CalculatorVm {
    match input.snapshot() {
        Ok(snapshot) => {
            let status = snapshot.status();
            CalculatorVm::Result(CalculatorResultVm {
                percentage_str: percent_label(snapshot.percentage()),
                tier_class: tier_class(status.tier()),
                status_label: status.label(),
                status_icon: status.icon(),
                message: snapshot.predictive_message(),
            })
        }
        Err(CalculatorIssue::MissingInput) => {
            CalculatorVm::Hint("Enter total and attended classes to see your status.")
        }
        Err(CalculatorIssue::AttendedExceedsTotal) => {
            CalculatorVm::Hint("Attended classes cannot exceed total classes.")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(total: &str, attended: &str) -> CalculatorInput {
        CalculatorInput {
            total_classes: total.into(),
            classes_attended: attended.into(),
            target_percentage: 75,
        }
    }

    #[test]
    fn shows_result_for_valid_input() {
        match map_calculator(&input("100", "90")) {
            CalculatorVm::Result(result) => {
                assert_eq!(result.percentage_str, "90.0%");
                assert_eq!(
                    result.message,
                    "Great! You can miss 20 more classes and still maintain 75% attendance."
                );
            }
            CalculatorVm::Hint(hint) => panic!("unexpected hint: {hint}"),
        }
    }

    #[test]
    fn hints_while_incomplete_or_inconsistent() {
        assert!(matches!(map_calculator(&input("", "3")), CalculatorVm::Hint(_)));
        assert_eq!(
            map_calculator(&input("3", "4")),
            CalculatorVm::Hint("Attended classes cannot exceed total classes.")
        );
    }
}

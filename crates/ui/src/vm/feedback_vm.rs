use attendance_core::model::{
    Feedback, FeedbackCategory, FeedbackDraft, FeedbackKind, FeedbackPriority, FeedbackStatus,
};

use crate::vm::time_fmt::format_datetime;

#[must_use]
pub fn status_class(status: FeedbackStatus) -> &'static str {
    match status {
        FeedbackStatus::Pending => "status-pending",
        FeedbackStatus::UnderReview => "status-review",
        FeedbackStatus::Completed => "status-done",
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FeedbackCardVm {
    pub subject: String,
    pub description: String,
    pub kind_label: &'static str,
    pub priority_label: &'static str,
    pub status_label: &'static str,
    pub status_class: &'static str,
    pub categories: String,
    pub submitted_at: String,
}

impl From<&Feedback> for FeedbackCardVm {
    fn from(item: &Feedback) -> Self {
        Self {
            subject: item.subject.clone(),
            description: item.description.clone(),
            kind_label: item.kind.label(),
            priority_label: item.priority.label(),
            status_label: item.status.label(),
            status_class: status_class(item.status),
            categories: item
                .categories
                .iter()
                .map(|c| c.label())
                .collect::<Vec<_>>()
                .join(", "),
            submitted_at: format_datetime(item.created_at),
        }
    }
}

#[must_use]
pub fn map_feedback_cards(items: &[Feedback]) -> Vec<FeedbackCardVm> {
    items.iter().map(FeedbackCardVm::from).collect()
}

/// Form state of the feedback page.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FeedbackFormVm {
    pub kind: FeedbackKind,
    pub subject: String,
    pub description: String,
    pub categories: Vec<FeedbackCategory>,
    pub priority: FeedbackPriority,
}

impl FeedbackFormVm {
    pub fn toggle_category(&mut self, category: FeedbackCategory) {
        if let Some(pos) = self.categories.iter().position(|c| *c == category) {
            self.categories.remove(pos);
        } else {
            self.categories.push(category);
        }
    }

    #[must_use]
    pub fn to_draft(&self) -> FeedbackDraft {
        FeedbackDraft {
            kind: self.kind,
            subject: self.subject.clone(),
            description: self.description.clone(),
            categories: self.categories.clone(),
            priority: self.priority,
        }
    }

    #[must_use]
    pub fn description_count(&self) -> usize {
        self.description.trim().chars().count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggling_a_category_twice_removes_it() {
        let mut form = FeedbackFormVm::default();
        form.toggle_category(FeedbackCategory::Calendar);
        form.toggle_category(FeedbackCategory::Dashboard);
        form.toggle_category(FeedbackCategory::Calendar);
        assert_eq!(form.categories, vec![FeedbackCategory::Dashboard]);
    }

    #[test]
    fn description_count_ignores_outer_whitespace() {
        let form = FeedbackFormVm {
            description: "  abc  ".into(),
            ..FeedbackFormVm::default()
        };
        assert_eq!(form.description_count(), 3);
    }
}

use dioxus::prelude::*;
use dioxus_router::Link;

use crate::context::{AppContext, use_ui_state};
use crate::routes::Route;
use crate::views::{ViewError, ViewState, view_error, view_state_from_resource};
use crate::vm::map_feedback_cards;

#[component]
pub fn FeedbackHistoryView() -> Element {
    let ctx = use_context::<AppContext>();
    let ui = use_ui_state();
    let feedback = ctx.feedback();

    let resource = use_resource(move || {
        let feedback = feedback.clone();
        let owner = ui.session.read().as_ref().map(|u| u.id);
        async move {
            let owner = owner.ok_or(ViewError::SignedOut)?;
            let items = feedback.history(owner).await.map_err(view_error)?;
            Ok(map_feedback_cards(&items))
        }
    });

    rsx! {
        div { class: "page",
            div { class: "page-header",
                div {
                    h2 { "My Feedback" }
                    p { class: "muted", "Track the status of your reports" }
                }
                Link { class: "btn-primary", to: Route::Feedback {}, "New Feedback" }
            }

            match view_state_from_resource(resource) {
                ViewState::Idle => rsx! {},
                ViewState::Loading => rsx! {
                    p { "Loading..." }
                },
                ViewState::Error(err) => rsx! {
                    p { class: "form-error", "{err.message()}" }
                },
                ViewState::Ready(cards) => rsx! {
                    if cards.is_empty() {
                        div { class: "empty",
                            p { "No feedback submitted yet" }
                        }
                    }
                    for (idx, card) in cards.into_iter().enumerate() {
                        div { key: "{idx}", class: "panel feedback-card",
                            div { class: "course-head",
                                div {
                                    p { class: "course-code", "{card.kind_label} · {card.priority_label}" }
                                    p { class: "course-name", "{card.subject}" }
                                }
                                span { class: "badge {card.status_class}", "{card.status_label}" }
                            }
                            p { "{card.description}" }
                            if !card.categories.is_empty() {
                                p { class: "muted", "{card.categories}" }
                            }
                            p { class: "muted", "Submitted {card.submitted_at}" }
                        }
                    }
                },
            }
        }
    }
}

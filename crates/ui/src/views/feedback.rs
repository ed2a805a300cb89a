use attendance_core::model::{
    DAILY_SUBMISSION_CAP, FeedbackCategory, FeedbackKind, FeedbackPriority, MAX_SUBJECT_LEN,
    MIN_DESCRIPTION_LEN,
};
use dioxus::prelude::*;
use dioxus_router::Link;
use services::{Notice, NoticeKind};

use crate::context::{AppContext, use_ui_state};
use crate::routes::Route;
use crate::views::{ViewError, ViewState, view_error, view_state_from_resource};
use crate::vm::FeedbackFormVm;

#[component]
pub fn FeedbackView() -> Element {
    let ctx = use_context::<AppContext>();
    let ui = use_ui_state();
    let feedback = ctx.feedback();
    let mut form = use_signal(FeedbackFormVm::default);
    let mut error = use_signal(|| None::<String>);
    let mut busy = use_signal(|| false);

    let mut remaining = {
        let feedback = feedback.clone();
        use_resource(move || {
            let feedback = feedback.clone();
            let owner = ui.session.read().as_ref().map(|u| u.id);
            async move {
                let owner = owner.ok_or(ViewError::SignedOut)?;
                feedback.remaining_today(owner).await.map_err(view_error)
            }
        })
    };

    let on_submit = move |evt: FormEvent| {
        evt.prevent_default();
        let Some(owner) = ui.user_id() else { return };
        let feedback = feedback.clone();
        let draft = form.read().to_draft();
        spawn(async move {
            busy.set(true);
            match feedback.submit(owner, draft).await {
                Ok(_) => {
                    form.set(FeedbackFormVm::default());
                    error.set(None);
                    ui.notify(Notice {
                        kind: NoticeKind::Success,
                        message: "Thank you! Your feedback has been submitted.".to_owned(),
                    });
                    remaining.restart();
                }
                Err(err) => error.set(Some(err.to_string())),
            }
            busy.set(false);
        });
    };

    let value = form();
    let subject_len = value.subject.chars().count();
    let description_len = value.description_count();
    let limit_reached = matches!(view_state_from_resource(remaining), ViewState::Ready(0));

    rsx! {
        div { class: "page",
            div { class: "page-header",
                div {
                    h2 { "Feedback" }
                    p { class: "muted", "Help us improve by reporting bugs or suggesting features" }
                }
                Link { class: "btn-secondary", to: Route::FeedbackHistory {}, "My Feedback" }
            }

            match view_state_from_resource(remaining) {
                ViewState::Ready(left) => rsx! {
                    p { class: "muted", "{left} of {DAILY_SUBMISSION_CAP} submissions left today" }
                },
                ViewState::Error(err) => rsx! {
                    p { class: "form-error", "{err.message()}" }
                },
                _ => rsx! {},
            }

            form { class: "panel feedback-form", onsubmit: on_submit,
                if let Some(message) = error() {
                    p { class: "form-error", "{message}" }
                }
                div { class: "kind-picker",
                    for kind in FeedbackKind::ALL {
                        button {
                            key: "{kind.label()}",
                            r#type: "button",
                            class: chip_class(value.kind == kind),
                            onclick: move |_| form.write().kind = kind,
                            "{kind.label()}"
                        }
                    }
                }
                label { "Subject"
                    input {
                        maxlength: "{MAX_SUBJECT_LEN}",
                        value: "{value.subject}",
                        oninput: move |evt| form.write().subject = evt.value(),
                    }
                    span { class: "muted", "{subject_len}/{MAX_SUBJECT_LEN}" }
                }
                label { "Description"
                    textarea {
                        rows: "6",
                        value: "{value.description}",
                        oninput: move |evt| form.write().description = evt.value(),
                    }
                    span { class: "muted", "{description_len} characters (minimum {MIN_DESCRIPTION_LEN})" }
                }
                fieldset { class: "categories",
                    legend { "Related areas" }
                    for category in FeedbackCategory::ALL {
                        label { key: "{category.label()}", class: "checkbox",
                            input {
                                r#type: "checkbox",
                                checked: value.categories.contains(&category),
                                onchange: move |_| form.write().toggle_category(category),
                            }
                            "{category.label()}"
                        }
                    }
                }
                label { "Priority"
                    select {
                        value: "{value.priority.label()}",
                        onchange: move |evt| {
                            if let Ok(priority) = FeedbackPriority::parse(&evt.value()) {
                                form.write().priority = priority;
                            }
                        },
                        for priority in FeedbackPriority::ALL {
                            option { key: "{priority.label()}", value: "{priority.label()}", "{priority.label()}" }
                        }
                    }
                }
                button {
                    r#type: "submit",
                    class: "btn-primary",
                    disabled: busy() || limit_reached,
                    if busy() { "Submitting..." } else { "Submit Feedback" }
                }
            }
        }
    }
}

fn chip_class(active: bool) -> &'static str {
    if active { "chip active" } else { "chip" }
}

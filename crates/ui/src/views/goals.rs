use attendance_core::model::{Course, GoalId, GoalKind};
use dioxus::prelude::*;
use services::{Notice, NoticeKind};

use crate::context::{AppContext, use_ui_state};
use crate::views::{ViewError, ViewState, view_error, view_state_from_resource};
use crate::vm::{GoalCardVm, GoalFormVm, map_goal_cards};

#[derive(Clone, Debug, PartialEq)]
struct GoalsData {
    cards: Vec<GoalCardVm>,
    courses: Vec<Course>,
}

#[component]
pub fn GoalsView() -> Element {
    let ctx = use_context::<AppContext>();
    let ui = use_ui_state();
    let goals = ctx.goals();
    let store = ctx.course_store();
    let today = ctx.attendance().today();
    let mut form = use_signal(|| None::<GoalFormVm>);

    let mut resource = {
        let goals = goals.clone();
        use_resource(move || {
            let goals = goals.clone();
            let store = store.clone();
            let owner = ui.session.read().as_ref().map(|u| u.id);
            async move {
                let owner = owner.ok_or(ViewError::SignedOut)?;
                store.fetch().await;
                let courses = store.courses();
                let list = goals.list(owner).await.map_err(view_error)?;
                Ok(GoalsData {
                    cards: map_goal_cards(&list, &courses, today),
                    courses,
                })
            }
        })
    };

    let report = move |result: Result<(), String>, success: &str| {
        match result {
            Ok(()) => {
                ui.notify(Notice {
                    kind: NoticeKind::Success,
                    message: success.to_owned(),
                });
                resource.restart();
            }
            Err(message) => ui.notify(Notice {
                kind: NoticeKind::Error,
                message,
            }),
        }
    };

    let on_save = {
        let goals = goals.clone();
        move |evt: FormEvent| {
            evt.prevent_default();
            let (Some(owner), Some(value)) = (ui.user_id(), form()) else {
                return;
            };
            let goals = goals.clone();
            let mut report = report;
            spawn(async move {
                let result = match value.to_draft() {
                    Ok(draft) => goals
                        .add(owner, draft)
                        .await
                        .map(|_| ())
                        .map_err(|e| e.to_string()),
                    Err(message) => Err(message.to_owned()),
                };
                if result.is_ok() {
                    form.set(None);
                }
                report(result, "Goal added");
            });
        }
    };

    let on_toggle = {
        let goals = goals.clone();
        move |id: GoalId| {
            let Some(owner) = ui.user_id() else { return };
            let goals = goals.clone();
            let mut report = report;
            spawn(async move {
                let result = goals
                    .toggle_complete(owner, id)
                    .await
                    .map(|_| ())
                    .map_err(|e| e.to_string());
                report(result, "Goal updated");
            });
        }
    };

    let on_delete = {
        let goals = goals.clone();
        move |id: GoalId| {
            let Some(owner) = ui.user_id() else { return };
            let goals = goals.clone();
            let mut report = report;
            spawn(async move {
                let result = goals.delete(owner, id).await.map_err(|e| e.to_string());
                report(result, "Goal deleted");
            });
        }
    };

    rsx! {
        div { class: "page",
            div { class: "page-header",
                div {
                    h2 { "Goals" }
                    p { class: "muted", "Set targets and track your progress" }
                }
                button {
                    class: "btn-primary",
                    onclick: move |_| form.set(Some(GoalFormVm::default())),
                    "New Goal"
                }
            }

            match view_state_from_resource(resource) {
                ViewState::Idle => rsx! {},
                ViewState::Loading => rsx! {
                    p { "Loading..." }
                },
                ViewState::Error(err) => rsx! {
                    p { class: "form-error", "{err.message()}" }
                },
                ViewState::Ready(data) => rsx! {
                    if data.cards.is_empty() {
                        div { class: "empty",
                            p { "No goals yet" }
                            p { class: "muted", "Create a goal to stay motivated." }
                        }
                    } else {
                        div { class: "goal-grid",
                            for card in data.cards.clone() {
                                GoalCard {
                                    key: "{card.id}",
                                    card,
                                    on_toggle: on_toggle.clone(),
                                    on_delete: on_delete.clone(),
                                }
                            }
                        }
                    }

                    if let Some(value) = form() {
                        div { class: "modal-backdrop",
                            form { class: "modal", onsubmit: on_save.clone(),
                                h3 { "New Goal" }
                                label { "Title"
                                    input {
                                        value: "{value.title}",
                                        oninput: move |evt| {
                                            if let Some(f) = form.write().as_mut() {
                                                f.title = evt.value();
                                            }
                                        },
                                    }
                                }
                                label { "Type"
                                    select {
                                        value: "{kind_value(value.kind)}",
                                        onchange: move |evt| {
                                            if let Some(f) = form.write().as_mut() {
                                                f.kind = if evt.value() == "custom" {
                                                    GoalKind::Custom
                                                } else {
                                                    GoalKind::Attendance
                                                };
                                            }
                                        },
                                        option { value: "attendance", "Attendance" }
                                        option { value: "custom", "Custom" }
                                    }
                                }
                                label { "Target (%)"
                                    input {
                                        r#type: "number",
                                        min: "1",
                                        max: "100",
                                        value: "{value.target}",
                                        oninput: move |evt| {
                                            if let Some(f) = form.write().as_mut() {
                                                f.target = evt.value();
                                            }
                                        },
                                    }
                                }
                                if value.kind == GoalKind::Attendance {
                                    label { "Course"
                                        select {
                                            value: "{value.course}",
                                            onchange: move |evt| {
                                                if let Some(f) = form.write().as_mut() {
                                                    f.course = evt.value();
                                                }
                                            },
                                            option { value: "", "Any course" }
                                            for course in data.courses.clone() {
                                                option {
                                                    key: "{course.id()}",
                                                    value: "{course.id()}",
                                                    "{course.code()} - {course.name()}"
                                                }
                                            }
                                        }
                                    }
                                }
                                label { "Deadline (optional)"
                                    input {
                                        r#type: "date",
                                        value: "{value.deadline}",
                                        oninput: move |evt| {
                                            if let Some(f) = form.write().as_mut() {
                                                f.deadline = evt.value();
                                            }
                                        },
                                    }
                                }
                                div { class: "modal-actions",
                                    button {
                                        r#type: "button",
                                        class: "btn-secondary",
                                        onclick: move |_| form.set(None),
                                        "Cancel"
                                    }
                                    button { r#type: "submit", class: "btn-primary", "Save Goal" }
                                }
                            }
                        }
                    }
                },
            }
        }
    }
}

#[component]
fn GoalCard(
    card: GoalCardVm,
    on_toggle: EventHandler<GoalId>,
    on_delete: EventHandler<GoalId>,
) -> Element {
    let id = card.id;
    let state_class = if card.completed {
        "goal-card done"
    } else if card.overdue {
        "goal-card overdue"
    } else {
        "goal-card"
    };
    let deadline_class = if card.overdue { "deadline overdue" } else { "deadline" };
    rsx! {
        div { class: "{state_class}",
            div { class: "course-head",
                div {
                    p { class: "course-code", "{card.kind_label}" }
                    p { class: "course-name", "{card.title}" }
                }
                button { class: "icon-button", onclick: move |_| on_delete.call(id), "Delete" }
            }
            if let Some(course) = card.course_label.clone() {
                p { class: "muted", "{course}" }
            }
            div { class: "bar",
                div { class: "bar-fill tier-safe", style: "width: {card.progress}%" }
            }
            div { class: "course-foot",
                span { "{card.progress_str}" }
                span { "{card.target_str}" }
            }
            if let Some(deadline) = card.deadline.clone() {
                p { class: "{deadline_class}", "Due {deadline}" }
            }
            button {
                class: "btn-secondary",
                onclick: move |_| on_toggle.call(id),
                if card.completed { "Mark as open" } else { "Mark complete" }
            }
        }
    }
}

fn kind_value(kind: GoalKind) -> &'static str {
    match kind {
        GoalKind::Attendance => "attendance",
        GoalKind::Custom => "custom",
    }
}

use attendance_core::model::{Course, CourseId};
use attendance_core::stats::CourseStats;
use dioxus::prelude::*;
use services::{CourseStore, Notice};

use crate::context::{AppContext, UiState, use_ui_state};
use crate::vm::{CourseCardVm, CourseFormVm};

fn refresh(store: &CourseStore, mut courses: Signal<Vec<Course>>) {
    courses.set(store.courses());
}

fn finish(ui: UiState, store: &CourseStore, courses: Signal<Vec<Course>>, notice: Notice) -> bool {
    let ok = !notice.is_error();
    ui.notify(notice);
    refresh(store, courses);
    ok
}

#[component]
pub fn CoursesView() -> Element {
    let ctx = use_context::<AppContext>();
    let ui = use_ui_state();
    let store = ctx.course_store();
    let courses = use_signal(|| store.courses());
    let mut loaded = use_signal(|| false);
    let mut form = use_signal(|| None::<CourseFormVm>);
    let mut form_error = use_signal(|| None::<&'static str>);
    let mut pending_delete = use_signal(|| None::<CourseId>);

    let store_for_fetch = store.clone();
    use_future(move || {
        let store = store_for_fetch.clone();
        async move {
            if let Some(notice) = store.fetch().await {
                ui.notify(notice);
            }
            refresh(&store, courses);
            loaded.set(true);
        }
    });

    let on_save = {
        let store = store.clone();
        move |evt: FormEvent| {
            evt.prevent_default();
            let Some(value) = form() else { return };
            let draft = match value.to_draft() {
                Ok(draft) => draft,
                Err(message) => {
                    form_error.set(Some(message));
                    return;
                }
            };
            form_error.set(None);
            let store = store.clone();
            spawn(async move {
                let notice = match value.editing {
                    Some(id) => store.update(id, draft).await,
                    None => store.add(draft).await,
                };
                if finish(ui, &store, courses, notice) {
                    form.set(None);
                }
            });
        }
    };

    let on_bump = {
        let store = store.clone();
        move |(id, attended): (CourseId, bool)| {
            let store = store.clone();
            spawn(async move {
                let notice = store.increment_attendance(id, attended).await;
                finish(ui, &store, courses, notice);
            });
        }
    };

    let on_confirm_delete = {
        let store = store.clone();
        move |_: MouseEvent| {
            let Some(id) = pending_delete() else { return };
            pending_delete.set(None);
            let store = store.clone();
            spawn(async move {
                let notice = store.remove(id).await;
                finish(ui, &store, courses, notice);
            });
        }
    };

    let cards: Vec<CourseCardVm> = courses
        .read()
        .iter()
        .map(|c| CourseCardVm::from(&CourseStats::from_course(c)))
        .collect();

    rsx! {
        div { class: "page",
            div { class: "page-header",
                div {
                    h2 { "My Courses" }
                    p { class: "muted", "Manage your courses and track attendance" }
                }
                button {
                    class: "btn-primary",
                    onclick: move |_| {
                        form_error.set(None);
                        form.set(Some(CourseFormVm::default()));
                    },
                    "Add Course"
                }
            }

            if !loaded() {
                p { "Loading..." }
            } else if cards.is_empty() {
                div { class: "empty",
                    p { "No courses yet" }
                    p { class: "muted", "Add your first course to start tracking attendance." }
                }
            } else {
                div { class: "course-grid",
                    for card in cards {
                        CourseCard {
                            key: "{card.id}",
                            card: card.clone(),
                            on_bump: on_bump.clone(),
                            on_edit: move |id: CourseId| {
                                let course = courses.read().iter().find(|c| c.id() == id).cloned();
                                if let Some(course) = course {
                                    form_error.set(None);
                                    form.set(Some(CourseFormVm::from_course(&course)));
                                }
                            },
                            on_delete: move |id: CourseId| pending_delete.set(Some(id)),
                        }
                    }
                }
            }

            if let Some(value) = form() {
                div { class: "modal-backdrop",
                    form { class: "modal", onsubmit: on_save,
                        h3 { if value.editing.is_some() { "Edit Course" } else { "Add New Course" } }
                        if let Some(message) = form_error() {
                            p { class: "form-error", "{message}" }
                        }
                        label { "Course code"
                            input {
                                value: "{value.code}",
                                placeholder: "CS101",
                                oninput: move |evt| {
                                    if let Some(f) = form.write().as_mut() {
                                        f.code = evt.value();
                                    }
                                },
                            }
                        }
                        label { "Course name"
                            input {
                                value: "{value.name}",
                                oninput: move |evt| {
                                    if let Some(f) = form.write().as_mut() {
                                        f.name = evt.value();
                                    }
                                },
                            }
                        }
                        label { "Total classes"
                            input {
                                r#type: "number",
                                min: "0",
                                value: "{value.total_classes}",
                                oninput: move |evt| {
                                    if let Some(f) = form.write().as_mut() {
                                        f.total_classes = evt.value();
                                    }
                                },
                            }
                        }
                        label { "Classes attended"
                            input {
                                r#type: "number",
                                min: "0",
                                value: "{value.classes_attended}",
                                oninput: move |evt| {
                                    if let Some(f) = form.write().as_mut() {
                                        f.classes_attended = evt.value();
                                    }
                                },
                            }
                        }
                        label { "Target percentage"
                            input {
                                r#type: "number",
                                min: "1",
                                max: "99",
                                value: "{value.target}",
                                oninput: move |evt| {
                                    if let Some(f) = form.write().as_mut() {
                                        f.target = evt.value();
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
                            button { r#type: "submit", class: "btn-primary",
                                if value.editing.is_some() { "Update" } else { "Add Course" }
                            }
                        }
                    }
                }
            }

            if pending_delete().is_some() {
                div { class: "modal-backdrop",
                    div { class: "modal",
                        h3 { "Delete course?" }
                        p { "Its attendance records will be deleted too." }
                        div { class: "modal-actions",
                            button {
                                class: "btn-secondary",
                                onclick: move |_| pending_delete.set(None),
                                "Cancel"
                            }
                            button { class: "btn-danger", onclick: on_confirm_delete, "Delete" }
                        }
                    }
                }
            }
        }
    }
}

#[component]
fn CourseCard(
    card: CourseCardVm,
    on_bump: EventHandler<(CourseId, bool)>,
    on_edit: EventHandler<CourseId>,
    on_delete: EventHandler<CourseId>,
) -> Element {
    let id = card.id;
    rsx! {
        div { class: "course-card",
            div { class: "course-head",
                div {
                    p { class: "course-code", "{card.code}" }
                    p { class: "course-name", "{card.name}" }
                }
                div { class: "card-actions",
                    button { class: "icon-button", onclick: move |_| on_edit.call(id), "Edit" }
                    button { class: "icon-button", onclick: move |_| on_delete.call(id), "Delete" }
                }
            }
            div { class: "course-stats",
                span { class: "course-pct", "{card.percentage_str}" }
                span { class: "badge {card.tier_class}", "{card.status_icon} {card.status_label}" }
            }
            div { class: "bar",
                div { class: "bar-fill {card.tier_class}", style: "width: {card.bar_width}%" }
            }
            p { class: "muted", "{card.counts_str} classes | {card.target_str}" }
            p { class: "prediction", "{card.message}" }
            div { class: "card-actions",
                button { class: "btn-present", onclick: move |_| on_bump.call((id, true)), "+ Attended" }
                button { class: "btn-absent", onclick: move |_| on_bump.call((id, false)), "+ Missed" }
            }
        }
    }
}

use attendance_core::model::StreakData;
use dioxus::prelude::*;
use services::{LocalDataError, Notice, NoticeKind};

use crate::context::{AppContext, UiState, use_ui_state};
use crate::views::{ViewError, ViewState, view_error, view_state_from_resource};
use crate::vm::{CustomGoalVm, StreaksVm, map_streaks};

#[derive(Clone, Debug, PartialEq)]
struct StreaksData {
    raw: StreakData,
    vm: StreaksVm,
}

#[derive(Clone, Debug, Default, PartialEq)]
struct StreakForm {
    current: String,
    longest: String,
    weekly_goal: String,
    weekly_progress: String,
}

impl StreakForm {
    fn from_data(data: &StreakData) -> Self {
        Self {
            current: data.current_streak.to_string(),
            longest: data.longest_streak.to_string(),
            weekly_goal: data.weekly_goal.to_string(),
            weekly_progress: data.weekly_progress.to_string(),
        }
    }

    fn parse(&self) -> Result<(u32, u32, u32, u32), &'static str> {
        let field = |raw: &str| raw.trim().parse::<u32>().map_err(|_| "Enter whole numbers only");
        Ok((
            field(&self.current)?,
            field(&self.longest)?,
            field(&self.weekly_goal)?,
            field(&self.weekly_progress)?,
        ))
    }
}

/// Run a streak update and reload the page data on success.
fn run_update(
    ui: UiState,
    mut resource: Resource<Result<StreaksData, ViewError>>,
    task: impl Future<Output = Result<StreakData, LocalDataError>> + 'static,
    success: Option<&'static str>,
) {
    spawn(async move {
        match task.await {
            Ok(_) => {
                if let Some(message) = success {
                    ui.notify(Notice {
                        kind: NoticeKind::Success,
                        message: message.to_owned(),
                    });
                }
                resource.restart();
            }
            Err(err) => ui.notify(Notice {
                kind: NoticeKind::Error,
                message: err.to_string(),
            }),
        }
    });
}

fn achievement_class(unlocked: bool) -> &'static str {
    if unlocked {
        "achievement unlocked"
    } else {
        "achievement"
    }
}

#[component]
pub fn StreaksView() -> Element {
    let ctx = use_context::<AppContext>();
    let ui = use_ui_state();
    let streaks = ctx.streaks();
    let stats = ctx.stats();
    let mut editing = use_signal(|| None::<StreakForm>);
    let mut goal_name = use_signal(String::new);
    let mut goal_target = use_signal(|| "100".to_owned());

    let resource = {
        let streaks = streaks.clone();
        use_resource(move || {
            let streaks = streaks.clone();
            let stats = stats.clone();
            let owner = ui.session.read().as_ref().map(|u| u.id);
            async move {
                let owner = owner.ok_or(ViewError::SignedOut)?;
                let raw = streaks.load().await.map_err(view_error)?;
                let dashboard = stats.dashboard(owner).await.map_err(view_error)?;
                let vm = map_streaks(&raw, &dashboard.overall);
                Ok(StreaksData { raw, vm })
            }
        })
    };

    let svc = streaks.clone();
    let on_increment = move |_: MouseEvent| {
        let svc = svc.clone();
        run_update(ui, resource, async move { svc.increment().await }, None);
    };
    let svc = streaks.clone();
    let on_decrement = move |_: MouseEvent| {
        let svc = svc.clone();
        run_update(ui, resource, async move { svc.decrement().await }, None);
    };
    let svc = streaks.clone();
    let on_reset = move |_: MouseEvent| {
        let svc = svc.clone();
        run_update(
            ui,
            resource,
            async move { svc.reset().await },
            Some("Streak data reset"),
        );
    };
    let svc = streaks.clone();
    let on_save_edit = move |evt: FormEvent| {
        evt.prevent_default();
        let Some(form) = editing() else { return };
        match form.parse() {
            Ok((current, longest, goal, progress)) => {
                let svc = svc.clone();
                editing.set(None);
                run_update(
                    ui,
                    resource,
                    async move { svc.edit(current, longest, goal, progress).await },
                    Some("Streak updated"),
                );
            }
            Err(message) => ui.notify(Notice {
                kind: NoticeKind::Error,
                message: message.to_owned(),
            }),
        }
    };
    let svc = streaks.clone();
    let on_add_goal = move |evt: FormEvent| {
        evt.prevent_default();
        let name = goal_name();
        let Ok(target) = goal_target().trim().parse::<u8>() else {
            ui.notify(Notice {
                kind: NoticeKind::Error,
                message: "Target must be between 1 and 100".to_owned(),
            });
            return;
        };
        let svc = svc.clone();
        goal_name.set(String::new());
        run_update(
            ui,
            resource,
            async move { svc.add_custom_goal(&name, target).await },
            Some("Goal added"),
        );
    };
    let svc = streaks.clone();
    let on_adjust = move |(id, delta): (u64, i16)| {
        let svc = svc.clone();
        run_update(ui, resource, async move { svc.adjust_custom_goal(id, delta).await }, None);
    };
    let svc = streaks;
    let on_remove = move |id: u64| {
        let svc = svc.clone();
        run_update(
            ui,
            resource,
            async move { svc.remove_custom_goal(id).await },
            Some("Goal removed"),
        );
    };

    rsx! {
        div { class: "page",
            div { class: "page-header",
                div {
                    h2 { "Streaks & Goals" }
                    p { class: "muted", "Build consistency and level up" }
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
                ViewState::Ready(data) => {
                    let vm = data.vm;
                    let raw = data.raw;
                    rsx! {
                        div { class: "stat-grid",
                            div { class: "stat-card",
                                p { class: "stat-title", "Current Streak" }
                                p { class: "stat-value", "{vm.current} days" }
                            }
                            div { class: "stat-card",
                                p { class: "stat-title", "Longest Streak" }
                                p { class: "stat-value", "{vm.longest} days" }
                            }
                            div { class: "stat-card",
                                p { class: "stat-title", "Weekly Goal" }
                                p { class: "stat-value", "{vm.weekly_str}" }
                                div { class: "bar",
                                    div { class: "bar-fill tier-safe", style: "width: {vm.weekly_percentage}%" }
                                }
                                span { class: "muted", "{vm.weekly_label()}" }
                            }
                            div { class: "stat-card",
                                p { class: "stat-title", "Level {vm.level}" }
                                p { class: "stat-value", "{vm.xp_str}" }
                                div { class: "bar",
                                    div { class: "bar-fill tier-warning", style: "width: {vm.level_progress}%" }
                                }
                            }
                        }
                        p { class: "muted", "Last attended: {vm.last_attended}" }

                        div { class: "quick-actions",
                            button { class: "btn-primary", onclick: on_increment, "+1 Day" }
                            button { class: "btn-secondary", onclick: on_decrement, "-1 Day" }
                            button {
                                class: "btn-secondary",
                                onclick: move |_| editing.set(Some(StreakForm::from_data(&raw))),
                                "Edit"
                            }
                            button { class: "btn-danger", onclick: on_reset, "Reset" }
                        }

                        section { class: "panel",
                            h3 { "Achievements ({vm.unlocked_count}/{vm.achievements.len()})" }
                            div { class: "achievement-grid",
                                for achievement in vm.achievements.clone() {
                                    div {
                                        key: "{achievement.title}",
                                        class: achievement_class(achievement.unlocked),
                                        p { class: "course-name", "{achievement.title}" }
                                        p { class: "muted", "{achievement.description}" }
                                        div { class: "bar",
                                            div { class: "bar-fill tier-safe", style: "width: {achievement.progress}%" }
                                        }
                                    }
                                }
                            }
                        }

                        section { class: "panel",
                            h3 { "Custom Goals" }
                            form { class: "inline-form", onsubmit: on_add_goal,
                                input {
                                    placeholder: "Goal name",
                                    value: "{goal_name}",
                                    oninput: move |evt| goal_name.set(evt.value()),
                                }
                                input {
                                    r#type: "number",
                                    min: "1",
                                    max: "100",
                                    value: "{goal_target}",
                                    oninput: move |evt| goal_target.set(evt.value()),
                                }
                                button { r#type: "submit", class: "btn-primary", "Add" }
                            }
                            if vm.custom_goals.is_empty() {
                                p { class: "muted", "No custom goals yet." }
                            }
                            for goal in vm.custom_goals.clone() {
                                CustomGoalRow {
                                    key: "{goal.id}",
                                    goal,
                                    on_adjust: on_adjust.clone(),
                                    on_remove: on_remove.clone(),
                                }
                            }
                        }
                    }
                }
            }

            if let Some(form) = editing() {
                div { class: "modal-backdrop",
                    form { class: "modal", onsubmit: on_save_edit,
                        h3 { "Edit Streak" }
                        label { "Current streak"
                            input {
                                r#type: "number",
                                min: "0",
                                value: "{form.current}",
                                oninput: move |evt| {
                                    if let Some(f) = editing.write().as_mut() {
                                        f.current = evt.value();
                                    }
                                },
                            }
                        }
                        label { "Longest streak"
                            input {
                                r#type: "number",
                                min: "0",
                                value: "{form.longest}",
                                oninput: move |evt| {
                                    if let Some(f) = editing.write().as_mut() {
                                        f.longest = evt.value();
                                    }
                                },
                            }
                        }
                        label { "Weekly goal"
                            input {
                                r#type: "number",
                                min: "1",
                                value: "{form.weekly_goal}",
                                oninput: move |evt| {
                                    if let Some(f) = editing.write().as_mut() {
                                        f.weekly_goal = evt.value();
                                    }
                                },
                            }
                        }
                        label { "Weekly progress"
                            input {
                                r#type: "number",
                                min: "0",
                                value: "{form.weekly_progress}",
                                oninput: move |evt| {
                                    if let Some(f) = editing.write().as_mut() {
                                        f.weekly_progress = evt.value();
                                    }
                                },
                            }
                        }
                        div { class: "modal-actions",
                            button {
                                r#type: "button",
                                class: "btn-secondary",
                                onclick: move |_| editing.set(None),
                                "Cancel"
                            }
                            button { r#type: "submit", class: "btn-primary", "Save" }
                        }
                    }
                }
            }
        }
    }
}

#[component]
fn CustomGoalRow(
    goal: CustomGoalVm,
    on_adjust: EventHandler<(u64, i16)>,
    on_remove: EventHandler<u64>,
) -> Element {
    let id = goal.id;
    let row_class = if goal.completed { "goal-row done" } else { "goal-row" };
    rsx! {
        div { class: "{row_class}",
            div { class: "goal-row-head",
                span { class: "course-name", "{goal.name}" }
                span { "{goal.progress}% / {goal.target}%" }
            }
            div { class: "bar",
                div { class: "bar-fill tier-safe", style: "width: {goal.progress}%" }
            }
            div { class: "goal-row-actions",
                button { class: "btn-secondary", onclick: move |_| on_adjust.call((id, -10)), "-10%" }
                button { class: "btn-secondary", onclick: move |_| on_adjust.call((id, 10)), "+10%" }
                button { class: "icon-button", onclick: move |_| on_remove.call(id), "Remove" }
            }
        }
    }
}

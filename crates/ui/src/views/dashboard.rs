use dioxus::prelude::*;
use dioxus_router::{Link, use_navigator};

use crate::context::{AppContext, use_ui_state};
use crate::routes::Route;
use crate::views::{ViewError, ViewState, view_error, view_state_from_resource};
use crate::vm::{CourseCardVm, DashboardVm, map_dashboard};

#[component]
pub fn DashboardView() -> Element {
    let ctx = use_context::<AppContext>();
    let ui = use_ui_state();
    let navigator = use_navigator();
    let stats = ctx.stats();

    let resource = use_resource(move || {
        let stats = stats.clone();
        let owner = ui.session.read().as_ref().map(|u| u.id);
        async move {
            let owner = owner.ok_or(ViewError::SignedOut)?;
            let dashboard = stats.dashboard(owner).await.map_err(view_error)?;
            Ok(map_dashboard(&dashboard))
        }
    });
    let state = view_state_from_resource(resource);

    rsx! {
        div { class: "page",
            div { class: "page-header",
                div {
                    h2 { "Dashboard" }
                    p { class: "muted", "Your attendance at a glance" }
                }
                button {
                    class: "btn-secondary",
                    onclick: move |_| {
                        navigator.push(Route::Streaks {});
                    },
                    "View Streaks"
                }
            }

            match state {
                ViewState::Idle => rsx! {},
                ViewState::Loading => rsx! {
                    p { "Loading..." }
                },
                ViewState::Ready(data) => rsx! {
                    DashboardBody { data }
                },
                ViewState::Error(err) => rsx! {
                    p { class: "form-error", "{err.message()}" }
                },
            }
        }
    }
}

#[component]
fn DashboardBody(data: DashboardVm) -> Element {
    let overall = data.overall;
    rsx! {
        div { class: "stat-grid",
            div { class: "stat-card",
                p { class: "stat-title", "Overall Attendance" }
                p { class: "stat-value", "{overall.percentage_str}" }
                span { class: "badge {overall.tier_class}", "{overall.badge}" }
            }
            div { class: "stat-card",
                p { class: "stat-title", "Total Courses" }
                p { class: "stat-value", "{overall.course_count}" }
            }
            div { class: "stat-card",
                p { class: "stat-title", "Classes Attended" }
                p { class: "stat-value", "{overall.attended_str}" }
            }
            div { class: "stat-card",
                p { class: "stat-title", "{overall.margin_title}" }
                p { class: "stat-value", "{overall.margin_value}" }
            }
        }

        section { class: "panel",
            div { class: "panel-header",
                h3 { "Your Courses" }
                Link { to: Route::Courses {}, "View All" }
            }
            if data.courses.is_empty() {
                div { class: "empty",
                    p { "No courses yet. Add one to start tracking." }
                    Link { class: "btn-primary", to: Route::Courses {}, "Add Course" }
                }
            } else {
                div { class: "course-grid",
                    for card in data.courses {
                        CourseSummary { key: "{card.id}", card }
                    }
                }
            }
        }

        section { class: "quick-actions",
            Link { class: "action", to: Route::Courses {}, "Manage Courses" }
            Link { class: "action", to: Route::Calendar {}, "Mark Attendance" }
            Link { class: "action", to: Route::Streaks {}, "Track Streaks" }
        }
    }
}

#[component]
fn CourseSummary(card: CourseCardVm) -> Element {
    rsx! {
        div { class: "course-card",
            div { class: "course-head",
                div {
                    p { class: "course-code", "{card.code}" }
                    p { class: "course-name", "{card.name}" }
                }
                span { class: "badge {card.tier_class}", "{card.status_icon} {card.status_label}" }
            }
            p { class: "course-pct", "{card.percentage_str}" }
            div { class: "bar",
                div { class: "bar-fill {card.tier_class}", style: "width: {card.bar_width}%" }
            }
            div { class: "course-foot",
                span { "{card.target_str}" }
                span { "{card.margin_label}: {card.margin_value}" }
            }
        }
    }
}

use dioxus::prelude::*;

use crate::context::{AppContext, use_ui_state};
use crate::views::{ViewError, ViewState, view_error, view_state_from_resource};
use crate::vm::{StatisticsVm, map_statistics};

#[component]
pub fn StatisticsView() -> Element {
    let ctx = use_context::<AppContext>();
    let ui = use_ui_state();
    let stats = ctx.stats();

    let resource = use_resource(move || {
        let stats = stats.clone();
        let owner = ui.session.read().as_ref().map(|u| u.id);
        async move {
            let owner = owner.ok_or(ViewError::SignedOut)?;
            let report = stats.statistics(owner).await.map_err(view_error)?;
            Ok(map_statistics(&report))
        }
    });

    rsx! {
        div { class: "page",
            h2 { "Statistics" }
            p { class: "muted", "Detailed insights into your attendance" }

            match view_state_from_resource(resource) {
                ViewState::Idle => rsx! {},
                ViewState::Loading => rsx! {
                    p { "Loading..." }
                },
                ViewState::Ready(data) => rsx! {
                    StatisticsBody { data }
                },
                ViewState::Error(err) => rsx! {
                    p { class: "form-error", "{err.message()}" }
                },
            }
        }
    }
}

#[component]
fn StatisticsBody(data: StatisticsVm) -> Element {
    if data.courses.is_empty() {
        return rsx! {
            div { class: "empty",
                p { "No data yet" }
                p { class: "muted", "Add courses to see your statistics." }
            }
        };
    }
    let overall = data.overall;
    let split = data.split;
    // conic-gradient pie: attended share in green, the rest red.
    let pie = format!(
        "background: conic-gradient(var(--safe) 0 {share}%, var(--critical) {share}% 100%)",
        share = split.attended_share
    );

    rsx! {
        div { class: "stat-grid",
            div { class: "stat-card",
                p { class: "stat-title", "Overall" }
                p { class: "stat-value", "{overall.percentage_str}" }
            }
            div { class: "stat-card tier-safe",
                p { class: "stat-title", "Safe" }
                p { class: "stat-value", "{overall.safe}" }
            }
            div { class: "stat-card tier-warning",
                p { class: "stat-title", "Warning" }
                p { class: "stat-value", "{overall.warning}" }
            }
            div { class: "stat-card tier-critical",
                p { class: "stat-title", "Critical" }
                p { class: "stat-value", "{overall.critical}" }
            }
        }

        div { class: "chart-row",
            section { class: "panel",
                h3 { "Course-wise Attendance" }
                div { class: "bar-chart",
                    for card in data.courses {
                        div { key: "{card.id}", class: "bar-row",
                            span { class: "bar-label", "{card.code}" }
                            div { class: "bar",
                                div { class: "bar-fill {card.tier_class}", style: "width: {card.bar_width}%" }
                            }
                            span { "{card.percentage_str}" }
                        }
                    }
                }
            }
            section { class: "panel",
                h3 { "Attendance Distribution" }
                div { class: "pie", style: "{pie}" }
                div { class: "legend",
                    span { class: "tile-good", "Attended: {split.attended}" }
                    span { class: "tile-poor", "Missed: {split.missed}" }
                }
            }
        }

        section { class: "panel",
            h3 { "Monthly Trend" }
            if data.months.is_empty() {
                p { class: "muted", "Mark attendance on the calendar to build a monthly trend." }
            } else {
                div { class: "column-chart",
                    for month in data.months {
                        div { key: "{month.label}", class: "column", title: "{month.counts_str}",
                            div { class: "column-fill", style: "height: {month.height}%" }
                            span { "{month.label}" }
                            span { class: "muted", "{month.percentage_str}" }
                        }
                    }
                }
            }
        }
    }
}

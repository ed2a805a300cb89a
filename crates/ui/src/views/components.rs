//! Floating widgets rendered by the protected layout.

use attendance_core::model::CalculatorInput;
use dioxus::prelude::*;

use crate::context::{AppContext, use_ui_state};
use crate::vm::{CalculatorVm, map_calculator};
use services::NoticeKind;

/// Attendance calculator that works without any saved course.
#[component]
pub fn QuickCalculator() -> Element {
    let ctx = use_context::<AppContext>();
    let ui = use_ui_state();
    let mut input = use_signal(CalculatorInput::default);

    let preferences = ctx.preferences();
    use_future(move || {
        let preferences = preferences.clone();
        async move {
            if let Ok(prefs) = preferences.load().await {
                input.set(prefs.calculator);
            }
        }
    });

    if !(ui.calculator_open)() {
        return rsx! {};
    }

    let persist = move || {
        let preferences = ctx.preferences();
        let value = input();
        spawn(async move {
            if let Err(err) = preferences.save_calculator(value).await {
                tracing::warn!(%err, "could not save calculator input");
            }
        });
    };
    let persist_total = persist.clone();
    let persist_attended = persist.clone();
    let persist_target = persist;

    let result = map_calculator(&input.read());
    let target = input.read().target_percentage;

    rsx! {
        div { class: "calculator",
            div { class: "calculator-head",
                h3 { "Quick Calculator" }
                button {
                    class: "icon-button",
                    onclick: move |_| {
                        let mut open = ui.calculator_open;
                        open.set(false);
                    },
                    "x"
                }
            }
            label { "Total classes"
                input {
                    r#type: "number",
                    min: "0",
                    value: "{input.read().total_classes}",
                    oninput: move |evt| {
                        input.write().total_classes = evt.value();
                        persist_total();
                    },
                }
            }
            label { "Classes attended"
                input {
                    r#type: "number",
                    min: "0",
                    value: "{input.read().classes_attended}",
                    oninput: move |evt| {
                        input.write().classes_attended = evt.value();
                        persist_attended();
                    },
                }
            }
            label { "Target: {target}%"
                input {
                    r#type: "range",
                    min: "50",
                    max: "95",
                    step: "5",
                    value: "{target}",
                    oninput: move |evt| {
                        if let Ok(value) = evt.value().parse() {
                            input.write().target_percentage = value;
                            persist_target();
                        }
                    },
                }
            }
            match result {
                CalculatorVm::Hint(hint) => rsx! {
                    p { class: "muted", "{hint}" }
                },
                CalculatorVm::Result(result) => rsx! {
                    div { class: "calculator-result {result.tier_class}",
                        p { class: "stat-value", "{result.percentage_str}" }
                        p { "{result.status_icon} {result.status_label}" }
                        p { "{result.message}" }
                    }
                },
            }
        }
    }
}

/// Last success/error notice.
#[component]
pub fn Toast() -> Element {
    let ui = use_ui_state();
    let mut toast = ui.toast;
    let Some(notice) = toast() else {
        return rsx! {};
    };
    let class = match notice.kind {
        NoticeKind::Success => "toast toast-success",
        NoticeKind::Error => "toast toast-error",
    };

    rsx! {
        div { class: "{class}", role: "status",
            span { "{notice.message}" }
            button { class: "icon-button", onclick: move |_| toast.set(None), "x" }
        }
    }
}

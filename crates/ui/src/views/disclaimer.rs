use dioxus::prelude::*;
use dioxus_router::Link;

use crate::routes::Route;

#[component]
pub fn DisclaimerView() -> Element {
    rsx! {
        div { class: "page disclaimer",
            h2 { "Disclaimer" }
            p {
                "SAM is a personal tracking tool. The percentages, margins and predictions it shows are "
                "computed from the numbers you enter and are not an official record of your attendance."
            }
            p {
                "Always confirm your standing with your institution before relying on a figure "
                "to skip or attend a class. Attendance rules differ between universities and courses."
            }
            p {
                "Your courses, records and feedback are stored on this device. Streaks, goals and "
                "preferences live in a local key-value store and are not synced anywhere."
            }
            Link { to: Route::Login {}, "Back to sign in" }
        }
    }
}

use dioxus::prelude::*;
use dioxus_router::Router;

use crate::context::{AppContext, use_ui_state_provider};
use crate::routes::Route;

#[component]
pub fn App() -> Element {
    let ctx = use_context::<AppContext>();
    let ui = use_ui_state_provider();
    let mut dark_mode = ui.dark_mode;

    // Theme comes from device preferences; keep the default until it loads.
    use_future(move || {
        let preferences = ctx.preferences();
        async move {
            if let Ok(prefs) = preferences.load().await {
                dark_mode.set(prefs.dark_mode);
            }
        }
    });

    let theme = if dark_mode() { "dark" } else { "light" };

    rsx! {
        document::Stylesheet { href: asset!("/assets/style.css") }

        document::Title { "SAM - Student Attendance Manager" }

        div { class: "app-root {theme}",
            ErrorBoundary {
                handle_error: |errors: ErrorContext| rsx! {
                    div { class: "fatal",
                        h1 { "Something went wrong" }
                        pre { "{errors:?}" }
                    }
                },
                Router::<Route> {}
            }
        }
    }
}

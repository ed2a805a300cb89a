use dioxus::prelude::*;
use dioxus_router::{Link, Outlet, Routable, use_navigator};

use crate::context::{AppContext, use_ui_state};
use crate::views::{
    CalendarView, CoursesView, DashboardView, DisclaimerView, FeedbackHistoryView, FeedbackView,
    GoalsView, LoginView, ProfileView, QuickCalculator, SignupView, StatisticsView, StreaksView,
    Toast,
};

#[derive(Clone, Debug, Routable, PartialEq)]
#[rustfmt::skip]
pub enum Route {
    #[redirect("/", || Route::Dashboard {})]
    #[route("/login", LoginView)] Login {},
    #[route("/signup", SignupView)] Signup {},
    #[route("/disclaimer", DisclaimerView)] Disclaimer {},
    #[layout(Protected)]
        #[layout(Layout)]
            #[route("/dashboard", DashboardView)] Dashboard {},
            #[route("/courses", CoursesView)] Courses {},
            #[route("/calendar", CalendarView)] Calendar {},
            #[route("/statistics", StatisticsView)] Statistics {},
            #[route("/goals", GoalsView)] Goals {},
            #[route("/streaks", StreaksView)] Streaks {},
            #[route("/feedback", FeedbackView)] Feedback {},
            #[route("/feedback-history", FeedbackHistoryView)] FeedbackHistory {},
            #[route("/profile", ProfileView)] Profile {},
        #[end_layout]
    #[end_layout]
    #[route("/:..segments", NotFound)] NotFound { segments: Vec<String> },
}

/// Routes below this layout need a signed-in user.
#[component]
fn Protected() -> Element {
    let ui = use_ui_state();
    let navigator = use_navigator();
    let signed_in = ui.session.read().is_some();

    use_effect(move || {
        if ui.session.read().is_none() {
            navigator.replace(Route::Login {});
        }
    });

    if signed_in {
        rsx! { Outlet::<Route> {} }
    } else {
        rsx! {}
    }
}

#[component]
fn NotFound(segments: Vec<String>) -> Element {
    let navigator = use_navigator();
    tracing::debug!(path = %segments.join("/"), "unknown route");
    use_effect(move || {
        navigator.replace(Route::Dashboard {});
    });
    rsx! {}
}

#[component]
fn Layout() -> Element {
    rsx! {
        div { class: "app",
            Sidebar {}
            div { class: "main",
                Header {}
                main { class: "content",
                    Outlet::<Route> {}
                }
            }
            FloatingButtons {}
            QuickCalculator {}
            Toast {}
        }
    }
}

fn nav_items() -> [(&'static str, Route); 8] {
    [
        ("Dashboard", Route::Dashboard {}),
        ("Courses", Route::Courses {}),
        ("Calendar", Route::Calendar {}),
        ("Statistics", Route::Statistics {}),
        ("Goals", Route::Goals {}),
        ("Streaks", Route::Streaks {}),
        ("Feedback", Route::Feedback {}),
        ("Profile", Route::Profile {}),
    ]
}

#[component]
fn Sidebar() -> Element {
    let ctx = use_context::<AppContext>();
    let ui = use_ui_state();
    let navigator = use_navigator();

    let on_sign_out = move |_: MouseEvent| {
        ctx.auth().sign_out();
        let mut session = ui.session;
        session.set(None);
        navigator.replace(Route::Login {});
    };

    rsx! {
        nav { class: "sidebar",
            div { class: "brand",
                h1 { "SAM" }
                p { "Student Attendance Manager" }
            }
            ul {
                for (label, route) in nav_items() {
                    li { key: "{label}",
                        Link { class: "nav-link", active_class: "active", to: route, "{label}" }
                    }
                }
            }
            div { class: "notice-unofficial",
                p { class: "notice-title", "Not Official" }
                p { "This is a student project, not affiliated with any university." }
                Link { to: Route::Disclaimer {}, "Read more" }
            }
            button { class: "sign-out", onclick: on_sign_out, "Sign Out" }
        }
    }
}

#[component]
fn Header() -> Element {
    let ctx = use_context::<AppContext>();
    let ui = use_ui_state();
    let session = ui.session.read().clone();
    let dark = (ui.dark_mode)();

    let toggle_theme = move |_: MouseEvent| {
        let preferences = ctx.preferences();
        let mut dark_mode = ui.dark_mode;
        let next = !dark_mode();
        dark_mode.set(next);
        spawn(async move {
            if let Err(err) = preferences.set_dark_mode(next).await {
                tracing::warn!(%err, "could not save theme");
            }
        });
    };

    rsx! {
        header { class: "header",
            if let Some(user) = session {
                div { class: "greeting",
                    span { "Welcome back, " }
                    strong { "{user.name}" }
                    span { class: "roll", "{user.roll_number}" }
                }
            }
            button {
                class: "theme-toggle",
                onclick: toggle_theme,
                if dark { "Light mode" } else { "Dark mode" }
            }
        }
    }
}

#[component]
fn FloatingButtons() -> Element {
    let ui = use_ui_state();
    let navigator = use_navigator();

    rsx! {
        div { class: "floating-buttons",
            button {
                class: "fab",
                title: "Quick calculator",
                onclick: move |_| {
                    let mut open = ui.calculator_open;
                    open.set(!open());
                },
                "%"
            }
            button {
                class: "fab",
                title: "Send feedback",
                onclick: move |_| {
                    navigator.push(Route::Feedback {});
                },
                "?"
            }
        }
    }
}

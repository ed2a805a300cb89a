use dioxus::prelude::*;
use dioxus_router::{Link, use_navigator};

use crate::context::{AppContext, use_ui_state};
use crate::routes::Route;

#[component]
pub fn LoginView() -> Element {
    let ctx = use_context::<AppContext>();
    let ui = use_ui_state();
    let navigator = use_navigator();
    let mut email = use_signal(|| ctx.login_email().unwrap_or_default());
    let mut password = use_signal(String::new);
    let mut error = use_signal(|| None::<String>);
    let mut busy = use_signal(|| false);

    let on_submit = move |evt: FormEvent| {
        evt.prevent_default();
        if email().trim().is_empty() || password().is_empty() {
            error.set(Some("Please fill in all fields".into()));
            return;
        }
        let auth = ctx.auth();
        let mut session = ui.session;
        spawn(async move {
            busy.set(true);
            match auth.sign_in(&email(), &password()).await {
                Ok(user) => {
                    session.set(Some(user));
                    navigator.replace(Route::Dashboard {});
                }
                Err(err) => error.set(Some(err.to_string())),
            }
            busy.set(false);
        });
    };

    rsx! {
        div { class: "auth-page",
            form { class: "auth-card", onsubmit: on_submit,
                h1 { "Welcome back" }
                p { class: "muted", "Sign in to track your attendance" }
                if let Some(message) = error() {
                    p { class: "form-error", "{message}" }
                }
                label { "Email"
                    input {
                        r#type: "email",
                        value: "{email}",
                        oninput: move |evt| email.set(evt.value()),
                    }
                }
                label { "Password"
                    input {
                        r#type: "password",
                        value: "{password}",
                        oninput: move |evt| password.set(evt.value()),
                    }
                }
                button { r#type: "submit", disabled: busy(),
                    if busy() { "Signing in..." } else { "Sign In" }
                }
                p { class: "muted",
                    "Don't have an account? "
                    Link { to: Route::Signup {}, "Sign up" }
                }
            }
        }
    }
}

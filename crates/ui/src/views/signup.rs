use attendance_core::model::{ProfileDraft, is_university_email};
use dioxus::prelude::*;
use dioxus_router::{Link, use_navigator};

use crate::context::{AppContext, use_ui_state};
use crate::routes::Route;

#[derive(Clone, Debug, Default, PartialEq)]
struct SignupForm {
    name: String,
    email: String,
    roll_number: String,
    university: String,
    password: String,
    confirm: String,
}

impl SignupForm {
    fn draft(&self) -> ProfileDraft {
        ProfileDraft {
            name: self.name.clone(),
            email: self.email.clone(),
            roll_number: self.roll_number.clone(),
            university: Some(self.university.clone()),
        }
    }
}

#[component]
pub fn SignupView() -> Element {
    let ctx = use_context::<AppContext>();
    let ui = use_ui_state();
    let navigator = use_navigator();
    let mut form = use_signal(SignupForm::default);
    let mut error = use_signal(|| None::<String>);
    let mut busy = use_signal(|| false);

    let university_hint = {
        let email = form.read().email.clone();
        !email.is_empty() && email.contains('@') && !is_university_email(email.trim())
    };

    let on_submit = move |evt: FormEvent| {
        evt.prevent_default();
        let auth = ctx.auth();
        let mut session = ui.session;
        let value = form();
        spawn(async move {
            busy.set(true);
            match auth
                .sign_up(value.draft(), &value.password, &value.confirm)
                .await
            {
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
                h1 { "Create account" }
                p { class: "muted", "Start tracking your attendance today" }
                if let Some(message) = error() {
                    p { class: "form-error", "{message}" }
                }
                label { "Full name"
                    input {
                        value: "{form.read().name}",
                        oninput: move |evt| form.write().name = evt.value(),
                    }
                }
                label { "Email"
                    input {
                        r#type: "email",
                        value: "{form.read().email}",
                        oninput: move |evt| form.write().email = evt.value(),
                    }
                }
                if university_hint {
                    p { class: "hint", "Tip: use your university email if you have one." }
                }
                label { "Roll number"
                    input {
                        value: "{form.read().roll_number}",
                        oninput: move |evt| form.write().roll_number = evt.value(),
                    }
                }
                label { "University (optional)"
                    input {
                        value: "{form.read().university}",
                        oninput: move |evt| form.write().university = evt.value(),
                    }
                }
                label { "Password"
                    input {
                        r#type: "password",
                        value: "{form.read().password}",
                        oninput: move |evt| form.write().password = evt.value(),
                    }
                }
                label { "Confirm password"
                    input {
                        r#type: "password",
                        value: "{form.read().confirm}",
                        oninput: move |evt| form.write().confirm = evt.value(),
                    }
                }
                button { r#type: "submit", disabled: busy(),
                    if busy() { "Creating account..." } else { "Sign Up" }
                }
                p { class: "muted",
                    "Already have an account? "
                    Link { to: Route::Login {}, "Sign in" }
                }
            }
        }
    }
}

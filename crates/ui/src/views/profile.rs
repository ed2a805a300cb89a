use attendance_core::model::{ProfileDraft, is_university_email};
use dioxus::prelude::*;
use services::{Notice, NoticeKind};

use crate::context::{AppContext, use_ui_state};
use crate::vm::format_date;

#[component]
pub fn ProfileView() -> Element {
    let ctx = use_context::<AppContext>();
    let ui = use_ui_state();
    let mut editing = use_signal(|| None::<ProfileDraft>);
    let mut error = use_signal(|| None::<String>);

    let on_save = move |evt: FormEvent| {
        evt.prevent_default();
        let Some(draft) = editing() else { return };
        let auth = ctx.auth();
        let mut session = ui.session;
        spawn(async move {
            match auth.update_profile(draft).await {
                Ok(updated) => {
                    session.set(Some(updated));
                    editing.set(None);
                    error.set(None);
                    ui.notify(Notice {
                        kind: NoticeKind::Success,
                        message: "Profile updated".to_owned(),
                    });
                }
                Err(err) => error.set(Some(err.to_string())),
            }
        });
    };

    let Some(user) = ui.session.read().clone() else {
        return rsx! {
            p { class: "form-error", "Please sign in to continue." }
        };
    };
    let verified = is_university_email(&user.email);
    let university = user.university.clone().unwrap_or_else(|| "Not set".to_owned());
    let joined = format_date(user.created_at.date_naive());
    let draft = user.to_draft();

    rsx! {
        div { class: "page",
            h2 { "Profile" }
            section { class: "panel profile",
                div { class: "avatar", "{initials(&user.name)}" }
                div {
                    p { class: "course-name", "{user.name}" }
                    p { class: "muted", "{user.email}" }
                    if verified {
                        span { class: "badge tier-safe", "University email" }
                    }
                }
                dl {
                    dt { "Roll number" }
                    dd { "{user.roll_number}" }
                    dt { "University" }
                    dd { "{university}" }
                    dt { "Member since" }
                    dd { "{joined}" }
                }
                button {
                    class: "btn-secondary",
                    onclick: move |_| editing.set(Some(draft.clone())),
                    "Edit Profile"
                }
            }

            if let Some(value) = editing() {
                div { class: "modal-backdrop",
                    form { class: "modal", onsubmit: on_save,
                        h3 { "Edit Profile" }
                        if let Some(message) = error() {
                            p { class: "form-error", "{message}" }
                        }
                        label { "Full name"
                            input {
                                value: "{value.name}",
                                oninput: move |evt| {
                                    if let Some(d) = editing.write().as_mut() {
                                        d.name = evt.value();
                                    }
                                },
                            }
                        }
                        label { "Email"
                            input {
                                r#type: "email",
                                value: "{value.email}",
                                oninput: move |evt| {
                                    if let Some(d) = editing.write().as_mut() {
                                        d.email = evt.value();
                                    }
                                },
                            }
                        }
                        label { "Roll number"
                            input {
                                value: "{value.roll_number}",
                                oninput: move |evt| {
                                    if let Some(d) = editing.write().as_mut() {
                                        d.roll_number = evt.value();
                                    }
                                },
                            }
                        }
                        label { "University"
                            input {
                                value: "{value.university.clone().unwrap_or_default()}",
                                oninput: move |evt| {
                                    if let Some(d) = editing.write().as_mut() {
                                        d.university = Some(evt.value());
                                    }
                                },
                            }
                        }
                        div { class: "modal-actions",
                            button {
                                r#type: "button",
                                class: "btn-secondary",
                                onclick: move |_| {
                                    editing.set(None);
                                    error.set(None);
                                },
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

fn initials(name: &str) -> String {
    name.split_whitespace()
        .filter_map(|part| part.chars().next())
        .take(2)
        .flat_map(char::to_uppercase)
        .collect()
}

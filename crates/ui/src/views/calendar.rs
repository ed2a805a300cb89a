use attendance_core::model::{AttendanceRecord, AttendanceStatus, Course, CourseId, RecordId};
use chrono::NaiveDate;
use dioxus::prelude::*;
use services::{AttendanceServiceError, BulkMarkRequest, Notice, NoticeKind};

use crate::context::{AppContext, use_ui_state};
use crate::views::{ViewError, ViewState, view_error, view_state_from_resource};
use crate::vm::{
    CalendarDayVm, CalendarMonthVm, build_month, format_date, month_of, next_month,
    previous_month,
};

#[derive(Clone, Debug, PartialEq)]
struct CalendarData {
    month: CalendarMonthVm,
    records: Vec<AttendanceRecord>,
    courses: Vec<Course>,
}

fn notice(kind: NoticeKind, message: String) -> Notice {
    Notice { kind, message }
}

fn tile_classes(day: &CalendarDayVm, selected: NaiveDate) -> String {
    let mut class = format!("tile {}", day.tile_class);
    if day.date == selected {
        class.push_str(" selected");
    } else if day.is_today {
        class.push_str(" today");
    }
    class
}

fn bulk_error_message(err: &AttendanceServiceError) -> String {
    match err {
        AttendanceServiceError::EmptySelection => "Please select at least one course".into(),
        AttendanceServiceError::AlreadyMarked(codes) => {
            format!("Already marked on this date: {}", codes.join(", "))
        }
        other => other.to_string(),
    }
}

#[component]
pub fn CalendarView() -> Element {
    let ctx = use_context::<AppContext>();
    let ui = use_ui_state();
    let attendance = ctx.attendance();
    let store = ctx.course_store();
    let today = attendance.today();

    let mut selected = use_signal(|| today);
    let mut shown_month = use_signal(|| month_of(today));
    let mut show_bulk = use_signal(|| false);

    let mut resource = {
        let attendance = attendance.clone();
        let store = store.clone();
        use_resource(move || {
            let attendance = attendance.clone();
            let store = store.clone();
            let owner = ui.session.read().as_ref().map(|u| u.id);
            let (year, month) = shown_month();
            let date = selected();
            async move {
                let owner = owner.ok_or(ViewError::SignedOut)?;
                if let Some(notice) = store.fetch().await {
                    tracing::warn!(message = %notice.message, "course list unavailable");
                }
                let tallies = attendance.calendar(owner).await.map_err(view_error)?;
                let records = attendance.records_on(owner, date).await.map_err(view_error)?;
                Ok(CalendarData {
                    month: build_month(year, month, &tallies, today),
                    records,
                    courses: store.courses(),
                })
            }
        })
    };
    let state = view_state_from_resource(resource);

    let on_bulk = {
        let attendance = attendance.clone();
        move |(course_ids, status, note): (Vec<CourseId>, AttendanceStatus, String)| {
            let Some(owner) = ui.user_id() else { return };
            let attendance = attendance.clone();
            let date = selected();
            spawn(async move {
                let count = course_ids.len();
                let request = BulkMarkRequest {
                    course_ids,
                    date,
                    status,
                    note: Some(note),
                };
                match attendance.bulk_mark(owner, request).await {
                    Ok(_) => {
                        ui.notify(notice(
                            NoticeKind::Success,
                            format!("Marked {count} course(s) as {}", status.as_str()),
                        ));
                        show_bulk.set(false);
                        resource.restart();
                    }
                    Err(err) => ui.notify(notice(NoticeKind::Error, bulk_error_message(&err))),
                }
            });
        }
    };

    let on_change_status = {
        let attendance = attendance.clone();
        move |(id, status): (RecordId, AttendanceStatus)| {
            let Some(owner) = ui.user_id() else { return };
            let attendance = attendance.clone();
            spawn(async move {
                let current = attendance
                    .records_on(owner, selected())
                    .await
                    .ok()
                    .and_then(|records| records.into_iter().find(|r| r.id == id));
                let note = current.and_then(|r| r.note);
                match attendance.update_record(owner, id, status, note).await {
                    Ok(_) => resource.restart(),
                    Err(err) => ui.notify(notice(NoticeKind::Error, err.to_string())),
                }
            });
        }
    };

    let on_delete = {
        let attendance = attendance.clone();
        move |id: RecordId| {
            let Some(owner) = ui.user_id() else { return };
            let attendance = attendance.clone();
            spawn(async move {
                match attendance.delete_record(owner, id).await {
                    Ok(()) => {
                        ui.notify(notice(NoticeKind::Success, "Attendance record deleted".into()));
                        resource.restart();
                    }
                    Err(err) => ui.notify(notice(NoticeKind::Error, err.to_string())),
                }
            });
        }
    };

    rsx! {
        div { class: "page",
            div { class: "page-header",
                div {
                    h2 { "Attendance Calendar" }
                    p { class: "muted", "Track and manage your daily attendance" }
                }
            }

            match state {
                ViewState::Idle => rsx! {},
                ViewState::Loading => rsx! {
                    p { "Loading..." }
                },
                ViewState::Error(err) => rsx! {
                    p { class: "form-error", "{err.message()}" }
                },
                ViewState::Ready(data) => rsx! {
                    div { class: "calendar-layout",
                        section { class: "panel calendar",
                            div { class: "calendar-nav",
                                button {
                                    class: "icon-button",
                                    onclick: move |_| {
                                        let (y, m) = shown_month();
                                        shown_month.set(previous_month(y, m));
                                    },
                                    "<"
                                }
                                h3 { "{data.month.title}" }
                                button {
                                    class: "icon-button",
                                    onclick: move |_| {
                                        let (y, m) = shown_month();
                                        shown_month.set(next_month(y, m));
                                    },
                                    ">"
                                }
                            }
                            div { class: "calendar-grid",
                                for name in ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"] {
                                    span { key: "{name}", class: "weekday", "{name}" }
                                }
                                for blank in 0..data.month.leading_blanks {
                                    span { key: "blank-{blank}", class: "tile blank" }
                                }
                                for day in data.month.days.clone() {
                                    button {
                                        key: "{day.date}",
                                        class: tile_classes(&day, selected()),
                                        onclick: move |_| selected.set(day.date),
                                        "{day.day}"
                                    }
                                }
                            }
                            div { class: "legend",
                                span { class: "tile-good", "Present" }
                                span { class: "tile-poor", "Absent" }
                                span { class: "tile-holiday", "Holiday" }
                            }
                        }

                        section { class: "panel",
                            h3 { "Selected Date" }
                            p { class: "muted", "{format_date(selected())}" }
                            h3 { "Attendance Records" }
                            if data.records.is_empty() {
                                p { class: "muted", "No records for this date" }
                            } else {
                                ul { class: "records",
                                    for record in data.records.clone() {
                                        RecordRow {
                                            key: "{record.id}",
                                            code: data
                                                .courses
                                                .iter()
                                                .find(|c| c.id() == record.course_id)
                                                .map_or_else(|| "Unknown course".to_owned(), |c| c.code().to_owned()),
                                            record,
                                            on_change_status: on_change_status.clone(),
                                            on_delete: on_delete.clone(),
                                        }
                                    }
                                }
                            }
                            button {
                                class: "btn-primary",
                                onclick: move |_| show_bulk.set(true),
                                "Mark Attendance"
                            }
                        }
                    }

                    if show_bulk() {
                        BulkMarkModal {
                            date: selected(),
                            courses: data.courses.clone(),
                            on_submit: on_bulk.clone(),
                            on_close: move |()| show_bulk.set(false),
                        }
                    }
                },
            }
        }
    }
}

#[component]
fn RecordRow(
    code: String,
    record: AttendanceRecord,
    on_change_status: EventHandler<(RecordId, AttendanceStatus)>,
    on_delete: EventHandler<RecordId>,
) -> Element {
    let id = record.id;
    rsx! {
        li { class: "record status-{record.status.as_str()}",
            div {
                strong { "{code}" }
                if let Some(note) = record.note.clone() {
                    p { class: "muted", "{note}" }
                }
            }
            select {
                value: "{record.status.as_str()}",
                onchange: move |evt| {
                    if let Ok(status) = AttendanceStatus::parse(&evt.value()) {
                        on_change_status.call((id, status));
                    }
                },
                for status in AttendanceStatus::ALL {
                    option { key: "{status.as_str()}", value: "{status.as_str()}", "{status.as_str()}" }
                }
            }
            button { class: "icon-button", onclick: move |_| on_delete.call(id), "Delete" }
        }
    }
}

#[component]
fn BulkMarkModal(
    date: NaiveDate,
    courses: Vec<Course>,
    on_submit: EventHandler<(Vec<CourseId>, AttendanceStatus, String)>,
    on_close: EventHandler<()>,
) -> Element {
    let mut chosen = use_signal(Vec::<CourseId>::new);
    let mut note = use_signal(String::new);

    rsx! {
        div { class: "modal-backdrop",
            div { class: "modal",
                h3 { "Mark Attendance" }
                p { class: "muted", "{format_date(date)}" }
                if courses.is_empty() {
                    p { "Add a course first." }
                }
                ul { class: "checklist",
                    for course in courses {
                        li { key: "{course.id()}",
                            label {
                                input {
                                    r#type: "checkbox",
                                    checked: chosen.read().contains(&course.id()),
                                    onchange: {
                                        let id = course.id();
                                        move |_| {
                                            let mut list = chosen.write();
                                            if let Some(pos) = list.iter().position(|c| *c == id) {
                                                list.remove(pos);
                                            } else {
                                                list.push(id);
                                            }
                                        }
                                    },
                                }
                                "{course.code()} - {course.name()}"
                            }
                        }
                    }
                }
                label { "Note (optional)"
                    textarea {
                        value: "{note}",
                        oninput: move |evt| note.set(evt.value()),
                    }
                }
                div { class: "modal-actions",
                    for status in AttendanceStatus::ALL {
                        button {
                            key: "{status.as_str()}",
                            class: "btn-{status.as_str()}",
                            onclick: move |_| on_submit.call((chosen(), status, note())),
                            "{status.as_str()}"
                        }
                    }
                    button { class: "btn-secondary", onclick: move |_| on_close.call(()), "Cancel" }
                }
            }
        }
    }
}

use api::{
    Credentials, Dashboard as DashboardData, LeaveClient, LeaveDraft, LeaveRequest, LeaveStatus,
};
use dioxus::prelude::*;
use time::OffsetDateTime;

use crate::core::format::{format_day_month, format_number};
use crate::t;

fn status_badge(status: LeaveStatus) -> (&'static str, String) {
    match status {
        LeaveStatus::Pending => ("leave-status leave-status--pending", t!("leave-status-pending")),
        LeaveStatus::Approved => ("leave-status leave-status--approved", t!("leave-status-approved")),
        LeaveStatus::Rejected => ("leave-status leave-status--rejected", t!("leave-status-rejected")),
        LeaveStatus::Unknown => ("leave-status", t!("leave-status-unknown")),
    }
}

fn today() -> time::Date {
    OffsetDateTime::now_local()
        .unwrap_or_else(|_| OffsetDateTime::now_utc())
        .date()
}

/// Leave balance and requests of the signed-in employee.
///
/// Credentials come from context; the launcher provides them.
#[component]
pub fn Dashboard() -> Element {
    let client = use_hook(|| {
        try_consume_context::<Credentials>()
            .filter(Credentials::has_token)
            .map(LeaveClient::new)
    });
    let mut notice = use_signal(|| None::<String>);
    let mut editing = use_signal(|| None::<LeaveRequest>);

    let mut data = use_resource({
        let client = client.clone();
        move || {
            let client = client.clone();
            async move {
                match client {
                    Some(client) => Some(client.dashboard().await.map_err(|err| err.to_string())),
                    None => None,
                }
            }
        }
    });

    let body = match &*data.read() {
        None => rsx! { p { class: "page-dashboard__notice", {t!("dashboard-loading")} } },
        Some(None) => rsx! { p { class: "page-dashboard__notice", {t!("dashboard-no-token")} } },
        Some(Some(Err(err))) => rsx! { p { class: "report-card__meta report-card__meta--error", "⚠️ {err}" } },
        Some(Some(Ok(dashboard))) => {
            let on_delete = {
                let client = client.clone();
                move |id: u64| {
                    let Some(client) = client.clone() else {
                        return;
                    };
                    spawn(async move {
                        match client.delete(id).await {
                            Ok(()) => {
                                notice.set(Some(t!("dashboard-deleted")));
                                data.restart();
                            }
                            Err(err) => notice.set(Some(err.to_string())),
                        }
                    });
                }
            };
            rsx! {
                DashboardBody {
                    dashboard: dashboard.clone(),
                    on_edit: move |request| editing.set(Some(request)),
                    on_delete,
                }
            }
        }
    };

    rsx! {
        section { class: "page page-dashboard",
            h1 { {t!("dashboard-title")} }
            if let Some(message) = notice() {
                p { class: "report-card__meta", "{message}" }
            }
            {body}
            if let Some(client) = client.clone() {
                LeaveForm {
                    client,
                    existing: editing(),
                    on_saved: move |_| {
                        editing.set(None);
                        notice.set(Some(t!("dashboard-saved")));
                        data.restart();
                    },
                    on_cancel: move |_| editing.set(None),
                }
            }
        }
    }
}

#[component]
fn DashboardBody(
    dashboard: DashboardData,
    on_edit: EventHandler<LeaveRequest>,
    on_delete: EventHandler<u64>,
) -> Element {
    let balance = t!("dashboard-days", days = format_number(dashboard.balance, 1));

    rsx! {
        div { class: "report-card",
            h2 { {t!("dashboard-balance")} }
            p { class: "page-dashboard__balance", "{balance}" }
        }

        div { class: "report-card",
            h2 { {t!("dashboard-requests")} }
            if dashboard.requests.is_empty() {
                p { class: "report-card__placeholder", {t!("dashboard-empty")} }
            } else {
                ul { class: "leave-list",
                    {dashboard.requests.iter().map(|request| {
                        let (class_name, label) = status_badge(request.status);
                        let range = t!("leave-from-to", start = format_day_month(&request.start), end = format_day_month(&request.end));
                        let id = request.id;
                        let kind = request.kind.clone();
                        let editable = request.status.is_editable();
                        let current = request.clone();
                        rsx! {
                            li { key: "{id}", class: "leave-list__item",
                                span { class: "leave-list__kind", "{kind}" }
                                span { class: "leave-list__range", "{range}" }
                                span { class: "{class_name}", "{label}" }
                                if editable {
                                    button {
                                        r#type: "button",
                                        class: "button button--ghost",
                                        onclick: move |_| on_edit.call(current.clone()),
                                        {t!("dashboard-edit")}
                                    }
                                    button {
                                        r#type: "button",
                                        class: "button button--ghost",
                                        onclick: move |_| on_delete.call(id),
                                        {t!("dashboard-delete")}
                                    }
                                }
                            }
                        }
                    })}
                }
            }
        }
    }
}

/// Leave request form, empty for a new request or prefilled from `existing`.
/// Drafts are validated locally before anything is sent; backend rejections
/// are shown message by message.
#[component]
fn LeaveForm(
    client: LeaveClient,
    existing: Option<LeaveRequest>,
    on_saved: EventHandler<()>,
    on_cancel: EventHandler<()>,
) -> Element {
    let mut draft = use_signal(LeaveDraft::new);
    let mut errors = use_signal(Vec::<String>::new);
    let mut busy = use_signal(|| false);

    // Reset the draft whenever a different request is picked for editing.
    use_effect(use_reactive((&existing,), move |(existing,)| {
        draft.set(existing.as_ref().map(LeaveDraft::from_request).unwrap_or_else(LeaveDraft::new));
        errors.set(Vec::new());
    }));

    let editing_id = existing.as_ref().map(|request| request.id);

    let submit = move |evt: FormEvent| {
        evt.prevent_default();
        if busy() {
            return;
        }
        let current = draft();
        if let Err(body) = current.validate(today()) {
            errors.set(body.messages().into_iter().map(str::to_string).collect());
            return;
        }
        errors.set(Vec::new());
        busy.set(true);
        let client = client.clone();
        spawn(async move {
            let saved = match editing_id {
                Some(id) => client.update(id, &current).await,
                None => client.create(&current).await,
            };
            match saved {
                Ok(_) => {
                    draft.set(LeaveDraft::new());
                    on_saved.call(());
                }
                Err(api::ApiError::Rejected(body)) => {
                    errors.set(body.messages().into_iter().map(str::to_string).collect());
                }
                Err(err) => errors.set(vec![err.to_string()]),
            }
            busy.set(false);
        });
    };

    rsx! {
        form { class: "report-card leave-form",
            onsubmit: submit,
            h2 {
                if editing_id.is_some() {
                    {t!("leave-form-edit-title")}
                } else {
                    {t!("leave-form-title")}
                }
            }
            label { {t!("leave-form-start")}
                input {
                    r#type: "date",
                    value: "{draft().start}",
                    oninput: move |evt| draft.write().start = evt.value(),
                }
            }
            label { {t!("leave-form-end")}
                input {
                    r#type: "date",
                    value: "{draft().end}",
                    oninput: move |evt| draft.write().end = evt.value(),
                }
            }
            label { class: "leave-form__inline",
                input {
                    r#type: "checkbox",
                    checked: draft().half_day,
                    oninput: move |evt| draft.write().half_day = evt.checked(),
                }
                {t!("leave-form-half-day")}
            }
            label { {t!("leave-form-comment")}
                textarea {
                    value: "{draft().comment}",
                    oninput: move |evt| draft.write().comment = evt.value(),
                }
            }
            if !errors().is_empty() {
                ul { class: "leave-form__errors",
                    for message in errors() {
                        li { "{message}" }
                    }
                }
            }
            div { class: "leave-form__actions",
                button {
                    r#type: "submit",
                    class: "button button--primary",
                    disabled: busy(),
                    if editing_id.is_some() {
                        {t!("leave-form-update")}
                    } else {
                        {t!("leave-form-submit")}
                    }
                }
                if editing_id.is_some() {
                    button {
                        r#type: "button",
                        class: "button button--ghost",
                        onclick: move |_| on_cancel.call(()),
                        {t!("leave-form-cancel")}
                    }
                }
            }
        }
    }
}

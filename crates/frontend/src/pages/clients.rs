//! Справочник клиентов.

use crate::layout::PageShell;
use crate::shared::api;
use crate::shared::components::context_menu::{ContextMenu, MenuItem, MenuState};
use crate::shared::components::pagination_controls::PaginationControls;
use crate::shared::data_island::read_island;
use crate::shared::forms::{values_from_json, FieldSpec, FormModel};
use crate::shared::hidden_rows;
use crate::shared::modal_stack::ModalStackService;
use crate::shared::paginator::{LoadToken, PagerState};
use crate::shared::table::ingest;
use crate::shared::table::summary::refresh_summary;
use crate::shared::table::view::TableView;
use crate::shared::table::TableState;
use crate::shared::toast::ToastService;
use contracts::list::{ListPage, SimpleContext};
use contracts::lookup::RecordEnvelope;
use contracts::money::{format_percent, parse_percent};
use contracts::mutation::{MutationKind, MutationResult};
use leptos::prelude::*;
use leptos::task::spawn_local;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use super::transactions::confirm_delete;

const TABLE: &str = "clients";

const PERCENT_FIELDS: &[&str] = &["percentage", "bonus_percentage"];

const FORM_SPECS: &[FieldSpec] = &[
    FieldSpec::required("name", "Имя"),
    FieldSpec::text("percentage", "Процент"),
    FieldSpec::text("bonus_percentage", "Бонусный процент"),
];

#[component]
pub fn ClientsPage() -> impl IntoView {
    let toasts = use_context::<ToastService>().expect("ToastService not provided");
    let modals = use_context::<ModalStackService>().expect("ModalStackService not provided");

    let table = RwSignal::new(TableState::new(TABLE));
    let pager = RwSignal::new(PagerState::new(1, 1));
    let failed = RwSignal::new(false);
    let tokens = StoredValue::new(LoadToken::default());
    let hidden = RwSignal::new(HashSet::<i64>::new());
    let show_all = RwSignal::new(hidden_rows::load_show_all(TABLE));
    let menu = RwSignal::new(None::<MenuState>);

    let refresh_totals = move || {
        table.update(|t| refresh_summary(t, &hidden.get_untracked(), show_all.get_untracked()));
    };

    let apply_page = move |page: ListPage<SimpleContext>| match ingest::parse_rows(&page.html) {
        Ok(rows) => {
            table.update(|t| t.replace_rows(rows, &page.context.ids));
            pager.set(PagerState::new(
                page.context.page.current_page,
                page.context.page.total_pages,
            ));
            failed.set(false);
            refresh_totals();
        }
        Err(e) => {
            table.update(|t| t.clear());
            failed.set(true);
            toasts.error(format!("Не удалось разобрать страницу: {e}"));
        }
    };

    let load_page = move |page: u32| {
        let token = tokens.try_update_value(|t| t.issue()).unwrap_or_default();
        spawn_local(async move {
            let result =
                api::get_json::<ListPage<SimpleContext>>(&format!("/{TABLE}/list/?page={page}"))
                    .await;
            if !tokens.with_value(|t| t.is_current(token)) {
                return;
            }
            match result {
                Ok(data) => apply_page(data),
                Err(e) => {
                    table.update(|t| t.clear());
                    failed.set(true);
                    toasts.error(e);
                }
            }
        });
    };

    Effect::new(move |_| {
        if let Some(initial) = read_island::<ListPage<SimpleContext>>("page-context") {
            apply_page(initial);
        } else {
            load_page(1);
        }
        spawn_local(async move {
            hidden.set(hidden_rows::restore(TABLE).await);
            refresh_totals();
        });
    });

    let persist_hidden = move || {
        let ids = hidden.get_untracked();
        spawn_local(async move {
            if let Err(e) = hidden_rows::persist(TABLE, &ids).await {
                toasts.error(e);
            }
        });
    };

    let open_form = move |record_id: Option<i64>| {
        open_client_form(modals, toasts, record_id, move |result| {
            if let Some(html) = &result.html {
                match ingest::parse_single_row(html) {
                    Ok(row) => table.update(|t| t.upsert_row(result.id, row)),
                    Err(e) => log::error!("bad row fragment: {e}"),
                }
            }
            refresh_totals();
        });
    };

    let delete_row = move |id: i64| {
        spawn_local(async move {
            match api::post_form::<MutationResult>(&format!("/{TABLE}/{id}/delete/"), &[]).await {
                Ok(result) if result.kind == MutationKind::Delete => {
                    table.update(|t| t.remove_row(result.id));
                    refresh_totals();
                    toasts.success("Клиент удалён");
                }
                Ok(_) => toasts.error("Неожиданный ответ при удалении"),
                Err(e) => toasts.error(e),
            }
        });
    };

    let open_menu = Callback::new(move |(id, x, y): (i64, i32, i32)| {
        let is_hidden = hidden.get_untracked().contains(&id);
        let items = vec![
            MenuItem::new(if is_hidden { "Показать" } else { "Скрыть" }, move || {
                hidden.update(|set| {
                    if is_hidden {
                        set.remove(&id);
                    } else {
                        set.insert(id);
                    }
                });
                refresh_totals();
                persist_hidden();
            }),
            MenuItem::new("Изменить", move || open_form(Some(id))),
            MenuItem::new("Удалить", move || {
                confirm_delete(modals, "Удалить клиента?", move || delete_row(id));
            }),
        ];
        menu.set(Some(MenuState { items, x, y }));
    });

    let actions = view! {
        <button class="button button--primary" on:click=move |_| open_form(None)>
            "Добавить клиента"
        </button>
        <label class="page__toggle">
            <input
                type="checkbox"
                prop:checked=move || show_all.get()
                on:change=move |ev| {
                    let on = event_target_checked(&ev);
                    show_all.set(on);
                    hidden_rows::save_show_all(TABLE, on);
                    refresh_totals();
                }
            />
            " Показать скрытые"
        </label>
    }
    .into_any();

    view! {
        <PageShell title="Клиенты" actions=actions>
            <TableView
                state=table
                hidden=hidden
                show_all=show_all
                on_row_menu=open_menu
                class="table--clients"
            />
            <PaginationControls
                pager=pager
                failed=failed
                on_page_change=Callback::new(move |page| load_page(page))
            />
            <ContextMenu menu=menu />
        </PageShell>
    }
}

fn open_client_form(
    modals: ModalStackService,
    toasts: ToastService,
    record_id: Option<i64>,
    on_saved: impl Fn(MutationResult) + Send + Sync + Clone + 'static,
) {
    spawn_local(async move {
        let mut initial = match record_id {
            Some(id) => {
                match api::get_json::<RecordEnvelope<HashMap<String, serde_json::Value>>>(&format!(
                    "/{TABLE}/{id}/"
                ))
                .await
                {
                    Ok(envelope) => values_from_json(&envelope.data),
                    Err(e) => {
                        toasts.error(e);
                        return;
                    }
                }
            }
            None => HashMap::new(),
        };
        // Проценты показываются в каноничном виде ("12.5%").
        for key in PERCENT_FIELDS {
            if let Some(value) = initial.get(*key).and_then(|v| parse_percent(v)) {
                initial.insert(key.to_string(), format_percent(value));
            }
        }

        let form = FormModel::with_values(FORM_SPECS, &initial);
        let saving = RwSignal::new(false);

        let guard_form = form.clone();
        let can_close: Arc<dyn Fn() -> bool + Send + Sync> = Arc::new(move || {
            if !guard_form.is_dirty() {
                return true;
            }
            web_sys::window()
                .and_then(|w| w.confirm_with_message("Закрыть без сохранения?").ok())
                .unwrap_or(true)
        });

        modals.push_guarded(Some("modal--form".to_string()), Some(can_close), move |handle| {
            let form = form.clone();
            let on_saved = on_saved.clone();
            let name = form.value("name");
            let percentage = form.value("percentage");
            let bonus = form.value("bonus_percentage");

            let submit = move |_| {
                let missing = form.missing_required();
                if !missing.is_empty() {
                    toasts.error(format!("Заполните поля: {}", missing.join(", ")));
                    return;
                }
                if saving.get_untracked() {
                    return;
                }
                saving.set(true);

                // На сервер проценты уходят голым числом.
                let mut pairs = form.pairs();
                for (key, value) in pairs.iter_mut() {
                    if PERCENT_FIELDS.contains(&key.as_str()) {
                        if let Some(pct) = parse_percent(value) {
                            *value = format!("{pct}");
                        }
                    }
                }
                let path = match record_id {
                    Some(id) => format!("/{TABLE}/{id}/edit/"),
                    None => format!("/{TABLE}/add/"),
                };
                let handle = handle.clone();
                let on_saved = on_saved.clone();
                spawn_local(async move {
                    match api::post_form::<MutationResult>(&path, &pairs).await {
                        Ok(result) => {
                            on_saved(result);
                            toasts.success("Сохранено");
                            handle.close();
                        }
                        Err(e) => toasts.error(e),
                    }
                    saving.set(false);
                });
            };

            view! {
                <div class="form">
                    <h2 class="form__title">
                        {if record_id.is_some() { "Изменить клиента" } else { "Новый клиент" }}
                    </h2>
                    <div class="form__group">
                        <label class="form__label" for="client-name">"Имя"</label>
                        <input
                            type="text"
                            id="client-name"
                            class="form__input"
                            prop:value=move || name.get()
                            on:input=move |ev| name.set(event_target_value(&ev))
                        />
                    </div>
                    <div class="form__group">
                        <label class="form__label" for="client-pct">"Процент"</label>
                        <input
                            type="text"
                            id="client-pct"
                            class="form__input"
                            prop:value=move || percentage.get()
                            on:input=move |ev| percentage.set(event_target_value(&ev))
                        />
                    </div>
                    <div class="form__group">
                        <label class="form__label" for="client-bonus">"Бонусный процент"</label>
                        <input
                            type="text"
                            id="client-bonus"
                            class="form__input"
                            prop:value=move || bonus.get()
                            on:input=move |ev| bonus.set(event_target_value(&ev))
                        />
                    </div>
                    <div class="form__actions">
                        <button
                            class="button button--primary"
                            disabled=move || saving.get()
                            on:click=submit
                        >
                            "Сохранить"
                        </button>
                    </div>
                </div>
            }
            .into_any()
        });
    });
}

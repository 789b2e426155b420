//! Сотрудники: простой список без скрытия строк.

use crate::layout::PageShell;
use crate::shared::api;
use crate::shared::components::context_menu::{ContextMenu, MenuItem, MenuState};
use crate::shared::components::pagination_controls::PaginationControls;
use crate::shared::data_island::read_island;
use crate::shared::forms::{values_from_json, FieldSpec, FormModel};
use crate::shared::modal_stack::ModalStackService;
use crate::shared::paginator::{LoadToken, PagerState};
use crate::shared::table::ingest;
use crate::shared::table::view::TableView;
use crate::shared::table::TableState;
use crate::shared::toast::ToastService;
use contracts::list::{ListPage, SimpleContext};
use contracts::lookup::RecordEnvelope;
use contracts::mutation::{MutationKind, MutationResult};
use leptos::prelude::*;
use leptos::task::spawn_local;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use super::transactions::confirm_delete;

const TABLE: &str = "users";

const FORM_SPECS: &[FieldSpec] = &[
    FieldSpec::required("name", "Имя"),
    FieldSpec::required("login", "Логин"),
    FieldSpec::text("role", "Роль"),
];

#[component]
pub fn UsersPage() -> impl IntoView {
    let toasts = use_context::<ToastService>().expect("ToastService not provided");
    let modals = use_context::<ModalStackService>().expect("ModalStackService not provided");

    let table = RwSignal::new(TableState::new(TABLE));
    let pager = RwSignal::new(PagerState::new(1, 1));
    let failed = RwSignal::new(false);
    let tokens = StoredValue::new(LoadToken::default());
    let menu = RwSignal::new(None::<MenuState>);
    let no_hidden = RwSignal::new(HashSet::<i64>::new());

    let apply_page = move |page: ListPage<SimpleContext>| match ingest::parse_rows(&page.html) {
        Ok(rows) => {
            table.update(|t| t.replace_rows(rows, &page.context.ids));
            pager.set(PagerState::new(
                page.context.page.current_page,
                page.context.page.total_pages,
            ));
            failed.set(false);
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
    });

    let open_form = move |record_id: Option<i64>| {
        open_user_form(modals, toasts, record_id, move |result| {
            if let Some(html) = &result.html {
                match ingest::parse_single_row(html) {
                    Ok(row) => table.update(|t| t.upsert_row(result.id, row)),
                    Err(e) => log::error!("bad row fragment: {e}"),
                }
            }
        });
    };

    let delete_row = move |id: i64| {
        spawn_local(async move {
            match api::post_form::<MutationResult>(&format!("/{TABLE}/{id}/delete/"), &[]).await {
                Ok(result) if result.kind == MutationKind::Delete => {
                    table.update(|t| t.remove_row(result.id));
                    toasts.success("Сотрудник удалён");
                }
                Ok(_) => toasts.error("Неожиданный ответ при удалении"),
                Err(e) => toasts.error(e),
            }
        });
    };

    let open_menu = Callback::new(move |(id, x, y): (i64, i32, i32)| {
        let items = vec![
            MenuItem::new("Изменить", move || open_form(Some(id))),
            MenuItem::new("Удалить", move || {
                confirm_delete(modals, "Удалить сотрудника?", move || delete_row(id));
            }),
        ];
        menu.set(Some(MenuState { items, x, y }));
    });

    let actions = view! {
        <button class="button button--primary" on:click=move |_| open_form(None)>
            "Добавить сотрудника"
        </button>
    }
    .into_any();

    view! {
        <PageShell title="Сотрудники" actions=actions>
            <TableView
                state=table
                hidden=no_hidden
                show_all=Signal::derive(|| false)
                on_row_menu=open_menu
                class="table--users"
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

fn open_user_form(
    modals: ModalStackService,
    toasts: ToastService,
    record_id: Option<i64>,
    on_saved: impl Fn(MutationResult) + Send + Sync + Clone + 'static,
) {
    spawn_local(async move {
        let initial = match record_id {
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
            let login = form.value("login");
            let role = form.value("role");

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

                let pairs = form.pairs();
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
                        {if record_id.is_some() { "Изменить сотрудника" } else { "Новый сотрудник" }}
                    </h2>
                    <div class="form__group">
                        <label class="form__label" for="user-name">"Имя"</label>
                        <input
                            type="text"
                            id="user-name"
                            class="form__input"
                            prop:value=move || name.get()
                            on:input=move |ev| name.set(event_target_value(&ev))
                        />
                    </div>
                    <div class="form__group">
                        <label class="form__label" for="user-login">"Логин"</label>
                        <input
                            type="text"
                            id="user-login"
                            class="form__input"
                            prop:value=move || login.get()
                            on:input=move |ev| login.set(event_target_value(&ev))
                        />
                    </div>
                    <div class="form__group">
                        <label class="form__label" for="user-role">"Роль"</label>
                        <select
                            id="user-role"
                            class="form__select"
                            on:change=move |ev| role.set(event_target_value(&ev))
                        >
                            <option value="manager" selected=move || role.get() != "admin">
                                "Менеджер"
                            </option>
                            <option value="admin" selected=move || role.get() == "admin">
                                "Администратор"
                            </option>
                        </select>
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

//! Движение денег: операции, сгруппированные по дате, с
//! промежуточными итогами по каждому дню.

use crate::layout::PageShell;
use crate::shared::api;
use crate::shared::components::amount_input::AmountInput;
use crate::shared::components::context_menu::{ContextMenu, MenuItem, MenuState};
use crate::shared::components::pagination_controls::PaginationControls;
use crate::shared::components::select_widget::{MultiSelectWidget, SelectWidget};
use crate::shared::data_island::read_island;
use crate::shared::forms::{values_from_json, FieldSpec, FormModel};
use crate::shared::hidden_rows;
use crate::shared::modal_stack::ModalStackService;
use crate::shared::paginator::{LoadToken, PagerState};
use crate::shared::table::ingest;
use crate::shared::table::summary::{grouped_subtotals, refresh_summary};
use crate::shared::table::view::TableView;
use crate::shared::table::TableState;
use crate::shared::toast::ToastService;
use contracts::dates::display_date;
use contracts::list::{ListPage, SimpleContext};
use contracts::lookup::{LookupItem, RecordEnvelope};
use contracts::money::format_amount;
use contracts::mutation::{MutationKind, MutationResult};
use leptos::prelude::*;
use leptos::task::spawn_local;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use super::transactions::confirm_delete;

const TABLE: &str = "cash-flow";

// Колонки: дата, статья, сумма, комментарий.
const COL_DATE: usize = 0;
const COL_CATEGORY: usize = 1;
const COL_AMOUNT: usize = 2;

const FORM_SPECS: &[FieldSpec] = &[
    FieldSpec::required("date", "Дата"),
    FieldSpec::money("amount", "Сумма"),
    FieldSpec::text("comment", "Комментарий"),
];

#[component]
pub fn CashFlowPage() -> impl IntoView {
    let toasts = use_context::<ToastService>().expect("ToastService not provided");
    let modals = use_context::<ModalStackService>().expect("ModalStackService not provided");

    let table = RwSignal::new(TableState::new(TABLE));
    let pager = RwSignal::new(PagerState::new(1, 1));
    let failed = RwSignal::new(false);
    let tokens = StoredValue::new(LoadToken::default());
    let hidden = RwSignal::new(HashSet::<i64>::new());
    let show_all = RwSignal::new(hidden_rows::load_show_all(TABLE));
    let menu = RwSignal::new(None::<MenuState>);

    let categories = RwSignal::new(Vec::<LookupItem>::new());
    let category_filter = RwSignal::new(HashSet::<i64>::new());

    // Фильтр по статьям: строки чужих статей прячутся вместе со
    // скрытыми вручную. Пустой фильтр пропускает всё.
    let effective_hidden = Memo::new(move |_| {
        let mut set = hidden.get();
        let filter = category_filter.get();
        if filter.is_empty() {
            return set;
        }
        let names: HashSet<String> = categories
            .get()
            .iter()
            .filter(|c| filter.contains(&c.id))
            .map(|c| c.name.clone())
            .collect();
        for row in table.get().data_rows() {
            let category = row
                .cells
                .get(COL_CATEGORY)
                .map(|c| c.text.as_str())
                .unwrap_or("");
            if !names.contains(category) {
                set.insert(row.id);
            }
        }
        set
    });

    let refresh_totals = move || {
        let hidden_now = effective_hidden.get_untracked();
        table.update(|t| refresh_summary(t, &hidden_now, show_all.get_untracked()));
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
        spawn_local(async move {
            match api::get_json::<Vec<LookupItem>>(&format!("/{TABLE}/categories/")).await {
                Ok(items) => categories.set(items),
                Err(e) => log::warn!("categories unavailable: {e}"),
            }
        });
    });

    // Смена фильтра пересчитывает итоги.
    Effect::new(move |_| {
        category_filter.track();
        refresh_totals();
    });

    let persist_hidden = move || {
        let ids = hidden.get_untracked();
        spawn_local(async move {
            if let Err(e) = hidden_rows::persist(TABLE, &ids).await {
                toasts.error(e);
            }
        });
    };

    // Итог по каждому дню, по видимым строкам.
    let day_totals = move || {
        let snapshot = table.get();
        let hidden = effective_hidden.get();
        let show_all = show_all.get();
        let visible: Vec<_> = snapshot.visible_rows(&hidden, show_all).cloned().collect();
        grouped_subtotals(&visible, COL_DATE, COL_AMOUNT)
    };

    let open_form = move |record_id: Option<i64>| {
        open_operation_form(modals, toasts, record_id, move |result| {
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
                    toasts.success("Операция удалена");
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
                confirm_delete(modals, "Удалить операцию?", move || delete_row(id));
            }),
        ];
        menu.set(Some(MenuState { items, x, y }));
    });

    let actions = view! {
        <button class="button button--primary" on:click=move |_| open_form(None)>
            "Добавить операцию"
        </button>
        <MultiSelectWidget
            options=categories
            selected=category_filter
            placeholder="Все статьи"
        />
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
        <PageShell title="Движение денег" actions=actions>
            <TableView
                state=table
                hidden=effective_hidden
                show_all=show_all
                on_row_menu=open_menu
                class="table--cash-flow"
            />
            <ul class="day-totals">
                {move || {
                    day_totals()
                        .into_iter()
                        .map(|(day, total)| {
                            view! {
                                <li class="day-totals__item">
                                    <span class="day-totals__date">{display_date(&day)}</span>
                                    <span class="day-totals__amount">{format_amount(total)}</span>
                                </li>
                            }
                        })
                        .collect_view()
                }}
            </ul>
            <PaginationControls
                pager=pager
                failed=failed
                on_page_change=Callback::new(move |page| load_page(page))
            />
            <ContextMenu menu=menu />
        </PageShell>
    }
}

fn open_operation_form(
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
        if record_id.is_none() {
            initial.insert("date".to_string(), crate::shared::forms::today_iso());
        }

        let form = FormModel::with_values(FORM_SPECS, &initial);
        let saving = RwSignal::new(false);
        let category = RwSignal::new(None::<LookupItem>);
        let categories = RwSignal::new(Vec::<LookupItem>::new());
        let initial_category = initial.get("category_id").and_then(|v| v.parse::<i64>().ok());

        spawn_local(async move {
            match api::get_json::<Vec<LookupItem>>(&format!("/{TABLE}/categories/")).await {
                Ok(items) => {
                    if let Some(id) = initial_category {
                        category.set(items.iter().find(|i| i.id == id).cloned());
                    }
                    categories.set(items);
                }
                Err(e) => toasts.error(e),
            }
        });

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
            let date = form.value("date");
            let amount = form.value("amount");
            let comment = form.value("comment");

            let submit = move |_| {
                if category.get_untracked().is_none() {
                    toasts.error("Не выбрана статья");
                    return;
                }
                let missing = form.missing_required();
                if !missing.is_empty() {
                    toasts.error(format!("Заполните поля: {}", missing.join(", ")));
                    return;
                }
                if !contracts::dates::is_valid_iso(&form.get("date")) {
                    toasts.error("Некорректная дата");
                    return;
                }
                if saving.get_untracked() {
                    return;
                }
                saving.set(true);

                let mut pairs = form.pairs();
                if let Some(item) = category.get_untracked() {
                    pairs.push(("category_id".to_string(), item.id.to_string()));
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
                        {if record_id.is_some() { "Изменить операцию" } else { "Новая операция" }}
                    </h2>
                    <div class="form__group">
                        <label class="form__label" for="op-date">"Дата"</label>
                        <input
                            type="date"
                            id="op-date"
                            class="form__input"
                            prop:value=move || date.get()
                            on:input=move |ev| date.set(event_target_value(&ev))
                        />
                    </div>
                    <SelectWidget
                        label="Статья"
                        options=categories
                        selected=category
                        on_select=Callback::new(move |item| category.set(item))
                        placeholder="Выберите статью"
                    />
                    <div class="form__group">
                        <label class="form__label" for="op-amount">"Сумма"</label>
                        <AmountInput value=amount id="op-amount" />
                    </div>
                    <div class="form__group">
                        <label class="form__label" for="op-comment">"Комментарий"</label>
                        <input
                            type="text"
                            id="op-comment"
                            class="form__input"
                            prop:value=move || comment.get()
                            on:input=move |ev| comment.set(event_target_value(&ev))
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

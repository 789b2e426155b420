//! Журнал транзакций: самая нагруженная таблица.
//!
//! Помимо листания и скрытия строк здесь живут долги по строкам,
//! подсветка изменённых процентов, мигание правок других сотрудников
//! и автоскрытие полностью закрытых транзакций.

use crate::layout::PageShell;
use crate::shared::api;
use crate::shared::components::amount_input::AmountInput;
use crate::shared::components::context_menu::{ContextMenu, MenuItem, MenuState};
use crate::shared::components::pagination_controls::PaginationControls;
use crate::shared::components::select_widget::SelectWidget;
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
use contracts::list::{debt_is_zero, ListPage, TransactionContext};
use contracts::lookup::{ClientRates, LookupItem, RecordEnvelope, SupplierRates};
use contracts::money::parse_amount;
use contracts::mutation::{Ack, MutationKind, MutationResult, RowDebts};
use leptos::prelude::*;
use leptos::task::spawn_local;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

const TABLE: &str = "transactions";

// Колонки журнала: дата, клиент, поставщик, сумма, % клиента,
// % поставщика, долг, документы.
const COL_CLIENT_PCT: usize = 4;
const COL_SUPPLIER_PCT: usize = 5;
const COL_DEBT: usize = 6;

const DOCS_ROW_CLASS: &str = "row-docs-checked";
const CHANGED_CELL_CLASS: &str = "back-green";

/// Транзакция скрывается сама, когда закрыта со всех сторон: долг в
/// строке нулевой, документы получены и вторичные долги погашены.
pub fn auto_hidden(debt_cell_zero: bool, documents_checked: bool, debts: &RowDebts) -> bool {
    debt_cell_zero
        && documents_checked
        && debt_is_zero(debts.bonus_debt.as_ref())
        && debt_is_zero(debts.client_debt.as_ref())
        && debt_is_zero(debts.investor_debt.as_ref())
}

fn debts_by_row(ctx: &TransactionContext) -> HashMap<i64, RowDebts> {
    let mut map = HashMap::new();
    for (pos, id) in ctx.ids.iter().enumerate() {
        map.insert(
            *id,
            RowDebts {
                supplier_debt: ctx.debts.supplier_debts.get(pos).cloned().flatten(),
                bonus_debt: ctx.debts.bonus_debt.get(pos).cloned().flatten(),
                client_debt: ctx.debts.client_debt.get(pos).cloned().flatten(),
                investor_debt: ctx.debts.investor_debt.get(pos).cloned().flatten(),
            },
        );
    }
    map
}

const FORM_SPECS: &[FieldSpec] = &[
    FieldSpec::required("date", "Дата"),
    FieldSpec::money("amount", "Сумма"),
    FieldSpec::text("client_percentage", "Процент клиента"),
    FieldSpec::text("supplier_percentage", "Процент поставщика"),
    FieldSpec::text("comment", "Комментарий"),
];

#[component]
pub fn TransactionsPage() -> impl IntoView {
    let toasts = use_context::<ToastService>().expect("ToastService not provided");
    let modals = use_context::<ModalStackService>().expect("ModalStackService not provided");

    let table = RwSignal::new(TableState::new(TABLE));
    let pager = RwSignal::new(PagerState::new(1, 1));
    let failed = RwSignal::new(false);
    let tokens = StoredValue::new(LoadToken::default());

    let hidden = RwSignal::new(HashSet::<i64>::new());
    let show_all = RwSignal::new(hidden_rows::load_show_all(TABLE));
    let debts = RwSignal::new(HashMap::<i64, RowDebts>::new());
    let docs_checked = RwSignal::new(HashSet::<i64>::new());
    let menu = RwSignal::new(None::<MenuState>);

    let refresh_totals = move || {
        table.update(|t| refresh_summary(t, &hidden.get_untracked(), show_all.get_untracked()));
    };

    // Скрывает строки, которые закрылись по правилу автоскрытия,
    // и сохраняет новый список.
    let apply_auto_hide = move || {
        let mut changed = false;
        let current_debts = debts.get_untracked();
        let docs = docs_checked.get_untracked();
        let snapshot = table.get_untracked();
        hidden.update(|set| {
            for row in snapshot.data_rows() {
                let row_debts = current_debts.get(&row.id).cloned().unwrap_or_default();
                let zero = snapshot.cell_is_zero(row.id, COL_DEBT);
                if auto_hidden(zero, docs.contains(&row.id), &row_debts) && set.insert(row.id) {
                    changed = true;
                }
            }
        });
        if changed {
            refresh_totals();
            let ids = hidden.get_untracked();
            spawn_local(async move {
                if let Err(e) = hidden_rows::persist(TABLE, &ids).await {
                    toasts.error(e);
                }
            });
        }
    };

    let apply_page = move |page: ListPage<TransactionContext>| {
        match ingest::parse_rows(&page.html) {
            Ok(rows) => {
                table.update(|t| t.replace_rows(rows, &page.context.ids));
                table.update(|t| {
                    // отметки сервера: изменённые проценты и чужие правки
                    for (id_text, cells) in &page.context.changed_cells {
                        let Ok(id) = id_text.parse::<i64>() else { continue };
                        if let Some(row) = t.row_mut(id) {
                            if cells.client_percentage {
                                if let Some(cell) = row.cells.get_mut(COL_CLIENT_PCT) {
                                    cell.classes.push(CHANGED_CELL_CLASS.to_string());
                                }
                            }
                            if cells.supplier_percentage {
                                if let Some(cell) = row.cells.get_mut(COL_SUPPLIER_PCT) {
                                    cell.classes.push(CHANGED_CELL_CLASS.to_string());
                                }
                            }
                        }
                    }
                    t.mark_blinking(&page.context.modified_ids);
                });
                docs_checked.set(
                    table
                        .get_untracked()
                        .data_rows()
                        .filter(|r| r.has_class(DOCS_ROW_CLASS))
                        .map(|r| r.id)
                        .collect(),
                );
                debts.set(debts_by_row(&page.context));
                pager.set(PagerState::new(
                    page.context.page.current_page,
                    page.context.page.total_pages,
                ));
                failed.set(false);
                refresh_totals();
                apply_auto_hide();
            }
            Err(e) => {
                table.update(|t| t.clear());
                failed.set(true);
                toasts.error(format!("Не удалось разобрать страницу: {e}"));
            }
        }
    };

    let load_page = move |page: u32| {
        let token = tokens.try_update_value(|t| t.issue()).unwrap_or_default();
        spawn_local(async move {
            let result =
                api::get_json::<ListPage<TransactionContext>>(&format!("/{TABLE}/list/?page={page}"))
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

    // Стартовое состояние: контекст из разметки, скрытые строки с сервера.
    Effect::new(move |_| {
        if let Some(initial) = read_island::<ListPage<TransactionContext>>("page-context") {
            apply_page(initial);
        } else {
            load_page(1);
        }
        spawn_local(async move {
            let restored = hidden_rows::restore(TABLE).await;
            hidden.set(restored);
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
        open_transaction_form(modals, toasts, record_id, move |result| {
            apply_mutation(result, table, debts, refresh_totals, apply_auto_hide);
        });
    };

    let record_payment = move |id: i64| {
        open_payment_form(modals, toasts, id, move |result| {
            apply_mutation(result, table, debts, refresh_totals, apply_auto_hide);
        });
    };

    // Мигание снимается разом по всем строкам, не по одной.
    let mark_all_viewed = move |_| {
        spawn_local(async move {
            match api::post_form::<Ack>(&format!("/{TABLE}/clear-modified/"), &[]).await {
                Ok(ack) if ack.is_success() => table.update(|t| t.mark_blinking(&[])),
                Ok(ack) => toasts.error(ack.message.unwrap_or_else(|| "Отказ сервера".into())),
                Err(e) => toasts.error(e),
            }
        });
    };

    let delete_row = move |id: i64| {
        spawn_local(async move {
            match api::post_form::<MutationResult>(&format!("/{TABLE}/{id}/delete/"), &[]).await {
                Ok(result) if result.kind == MutationKind::Delete => {
                    table.update(|t| t.remove_row(result.id));
                    refresh_totals();
                    toasts.success("Транзакция удалена");
                }
                Ok(_) => toasts.error("Неожиданный ответ при удалении"),
                Err(e) => toasts.error(e),
            }
        });
    };

    let toggle_done = move |id: i64| {
        let next = !table.get_untracked().is_done(id);
        spawn_local(async move {
            let body = vec![("done".to_string(), next.to_string())];
            match api::post_form::<Ack>(&format!("/{TABLE}/{id}/toggle-done/"), &body).await {
                Ok(ack) if ack.is_success() => table.update(|t| t.set_done(id, next)),
                Ok(ack) => toasts.error(ack.message.unwrap_or_else(|| "Отказ сервера".into())),
                Err(e) => toasts.error(e),
            }
        });
    };

    let toggle_docs = move |id: i64| {
        let next = !docs_checked.get_untracked().contains(&id);
        spawn_local(async move {
            let body = vec![("checked".to_string(), next.to_string())];
            match api::post_form::<Ack>(&format!("/{TABLE}/{id}/documents/"), &body).await {
                Ok(ack) if ack.is_success() => {
                    docs_checked.update(|set| {
                        if next {
                            set.insert(id);
                        } else {
                            set.remove(&id);
                        }
                    });
                    table.update(|t| {
                        if let Some(row) = t.row_mut(id) {
                            row.set_class(DOCS_ROW_CLASS, next);
                        }
                    });
                    apply_auto_hide();
                }
                Ok(ack) => toasts.error(ack.message.unwrap_or_else(|| "Отказ сервера".into())),
                Err(e) => toasts.error(e),
            }
        });
    };

    // Массовое скрытие: все строки, затронутые выделенными ячейками,
    // уходят в скрытые одним действием.
    let hide_selected = move || {
        let rows = table.get_untracked().selected_row_ids();
        if rows.is_empty() {
            return;
        }
        hidden.update(|set| set.extend(rows));
        table.update(|t| t.clear_selection());
        refresh_totals();
        persist_hidden();
    };

    let open_menu = Callback::new(move |(id, x, y): (i64, i32, i32)| {
        let is_hidden = hidden.get_untracked().contains(&id);
        let is_done = table.get_untracked().is_done(id);
        let docs = docs_checked.get_untracked().contains(&id);
        let selected_cells = table.get_untracked().selected.len();

        let mut items = vec![
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
            MenuItem::new(
                if is_done { "Снять отметку" } else { "Выполнено" },
                move || toggle_done(id),
            ),
            MenuItem::new(
                if docs { "Документы не получены" } else { "Документы получены" },
                move || toggle_docs(id),
            ),
            MenuItem::new("Оплата", move || record_payment(id)),
            MenuItem::new("Изменить", move || open_form(Some(id))),
            MenuItem::new("Удалить", move || {
                confirm_delete(modals, "Удалить транзакцию?", move || delete_row(id));
            }),
        ];
        // пункт появляется, когда выделено больше одной ячейки
        if selected_cells > 1 {
            items.push(MenuItem::new("Скрыть выделенные", move || hide_selected()));
        }
        menu.set(Some(MenuState { items, x, y }));
    });

    let on_cell_click = Callback::new(move |(id, col): (i64, usize)| {
        table.update(|t| t.toggle_selection(id, col));
    });

    let actions = view! {
        <button class="button button--primary" on:click=move |_| open_form(None)>
            "Добавить транзакцию"
        </button>
        <Show when=move || table.get().has_blinking()>
            <button class="button" on:click=mark_all_viewed>
                "Отметить просмотренными"
            </button>
        </Show>
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
        <PageShell title="Транзакции" actions=actions>
            <TableView
                state=table
                hidden=hidden
                show_all=show_all
                on_row_menu=open_menu
                on_cell_click=on_cell_click
                class="table--transactions"
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

/// Применяет ответ мутации к реестру: строка патчится точечно,
/// полная перезагрузка страницы не нужна.
fn apply_mutation(
    result: MutationResult,
    table: RwSignal<TableState>,
    debts: RwSignal<HashMap<i64, RowDebts>>,
    refresh_totals: impl Fn() + 'static,
    apply_auto_hide: impl Fn() + 'static,
) {
    if let Some(html) = &result.html {
        match ingest::parse_single_row(html) {
            Ok(mut row) => {
                if let Some(cells) = result
                    .changed_cells
                    .as_ref()
                    .and_then(|m| m.get(&result.id.to_string()))
                {
                    if cells.client_percentage {
                        if let Some(cell) = row.cells.get_mut(COL_CLIENT_PCT) {
                            cell.classes.push(CHANGED_CELL_CLASS.to_string());
                        }
                    }
                    if cells.supplier_percentage {
                        if let Some(cell) = row.cells.get_mut(COL_SUPPLIER_PCT) {
                            cell.classes.push(CHANGED_CELL_CLASS.to_string());
                        }
                    }
                }
                table.update(|t| t.upsert_row(result.id, row));
            }
            Err(e) => log::error!("bad row fragment in mutation response: {e}"),
        }
    }
    if let Some(row_debts) = result.debts {
        debts.update(|map| {
            map.insert(result.id, row_debts);
        });
    }
    refresh_totals();
    apply_auto_hide();
}

pub(crate) fn confirm_delete(
    modals: ModalStackService,
    prompt: &'static str,
    on_confirm: impl Fn() + Send + Sync + Clone + 'static,
) {
    modals.push(move |handle| {
        let on_confirm = on_confirm.clone();
        let confirm_handle = handle.clone();
        let cancel_handle = handle.clone();
        view! {
            <div class="confirm">
                <p class="confirm__text">{prompt}</p>
                <div class="confirm__actions">
                    <button
                        class="button button--danger"
                        on:click=move |_| {
                            on_confirm();
                            confirm_handle.close();
                        }
                    >
                        "Удалить"
                    </button>
                    <button class="button" on:click=move |_| cancel_handle.close()>
                        "Отмена"
                    </button>
                </div>
            </div>
        }
        .into_any()
    });
}

/// Форма добавления/редактирования транзакции с каскадом
/// клиент/поставщик/счёт.
fn open_transaction_form(
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
        let client = RwSignal::new(None::<LookupItem>);
        let supplier = RwSignal::new(None::<LookupItem>);
        let account = RwSignal::new(None::<LookupItem>);
        let clients = RwSignal::new(Vec::<LookupItem>::new());
        let suppliers = RwSignal::new(Vec::<LookupItem>::new());
        let accounts = RwSignal::new(Vec::<LookupItem>::new());
        let accounts_loading = RwSignal::new(false);
        let account_tokens = StoredValue::new(LoadToken::default());
        let saving = RwSignal::new(false);

        let initial_client = initial.get("client_id").and_then(|v| v.parse::<i64>().ok());
        let initial_supplier = initial.get("supplier_id").and_then(|v| v.parse::<i64>().ok());
        let initial_account = initial.get("account_id").and_then(|v| v.parse::<i64>().ok());

        spawn_local(async move {
            match api::get_json::<Vec<LookupItem>>("/clients/list/all/").await {
                Ok(items) => {
                    if let Some(id) = initial_client {
                        client.set(items.iter().find(|i| i.id == id).cloned());
                    }
                    clients.set(items);
                }
                Err(e) => toasts.error(e),
            }
            match api::get_json::<Vec<LookupItem>>("/suppliers/list/all/").await {
                Ok(items) => {
                    if let Some(id) = initial_supplier {
                        supplier.set(items.iter().find(|i| i.id == id).cloned());
                    }
                    suppliers.set(items);
                }
                Err(e) => toasts.error(e),
            }
        });

        // Каскад: смена поставщика перезагружает счета. Применяется
        // только ответ на последний выданный токен.
        let load_accounts = move |supplier_item: LookupItem, preselect: Option<i64>| {
            let token = account_tokens.try_update_value(|t| t.issue()).unwrap_or_default();
            accounts_loading.set(true);
            spawn_local(async move {
                let result = api::get_json::<Vec<LookupItem>>(&format!(
                    "/accounts/list/?supplier_id={}",
                    supplier_item.id
                ))
                .await;
                if !account_tokens.with_value(|t| t.is_current(token)) {
                    return;
                }
                accounts_loading.set(false);
                match result {
                    Ok(items) => {
                        let chosen = preselect
                            .and_then(|id| items.iter().find(|i| i.id == id).cloned())
                            .or_else(|| {
                                // прочим поставщикам сразу подставляется счёт ВТБ
                                supplier_item
                                    .name
                                    .to_lowercase()
                                    .contains("проч")
                                    .then(|| {
                                        items
                                            .iter()
                                            .find(|i| i.name.to_uppercase().contains("ВТБ"))
                                            .cloned()
                                    })
                                    .flatten()
                            });
                        account.set(chosen);
                        accounts.set(items);
                    }
                    Err(e) => {
                        accounts.set(Vec::new());
                        account.set(None);
                        toasts.error(e);
                    }
                }
            });
        };

        if record_id.is_some() {
            if let Some(id) = initial_supplier {
                // имя поставщика подтянется списком выше; для каскада
                // достаточно id
                load_accounts(LookupItem { id, name: String::new() }, initial_account);
            }
        }

        let on_client = {
            let form = form.clone();
            Callback::new(move |item: Option<LookupItem>| {
                client.set(item.clone());
                let Some(item) = item else { return };
                let form = form.clone();
                spawn_local(async move {
                    match api::get_json::<ClientRates>(&format!("/clients/{}/rates/", item.id)).await
                    {
                        Ok(rates) => {
                            if form.get("client_percentage").is_empty() {
                                if let Some(p) = rates.percentage {
                                    form.set("client_percentage", p.to_string());
                                }
                            }
                        }
                        Err(e) => log::warn!("client rates unavailable: {e}"),
                    }
                });
            })
        };

        let on_supplier = {
            let form = form.clone();
            Callback::new(move |item: Option<LookupItem>| {
                supplier.set(item.clone());
                account.set(None);
                accounts.set(Vec::new());
                let Some(item) = item else { return };
                load_accounts(item.clone(), None);
                let form = form.clone();
                spawn_local(async move {
                    match api::get_json::<SupplierRates>(&format!("/suppliers/{}/rates/", item.id))
                        .await
                    {
                        Ok(rates) => {
                            if form.get("supplier_percentage").is_empty() {
                                if let Some(p) = rates.cost_percentage {
                                    form.set("supplier_percentage", p.to_string());
                                }
                            }
                        }
                        Err(e) => log::warn!("supplier rates unavailable: {e}"),
                    }
                });
            })
        };

        let on_account = Callback::new(move |item: Option<LookupItem>| account.set(item));

        let guard_form = form.clone();
        let can_close: Arc<dyn Fn() -> bool + Send + Sync> = Arc::new(move || {
            if !guard_form.is_dirty() {
                return true;
            }
            web_sys::window()
                .and_then(|w| w.confirm_with_message("Закрыть без сохранения?").ok())
                .unwrap_or(true)
        });

        let on_saved = on_saved.clone();
        modals.push_guarded(Some("modal--form".to_string()), Some(can_close), move |handle| {
            let form = form.clone();
            let on_saved = on_saved.clone();
            let date = form.value("date");
            let client_pct = form.value("client_percentage");
            let supplier_pct = form.value("supplier_percentage");
            let comment = form.value("comment");
            let amount = form.value("amount");
            let submit = move |_| {
                let missing = form.missing_required();
                if client.get_untracked().is_none() {
                    toasts.error("Не выбран клиент");
                    return;
                }
                if supplier.get_untracked().is_none() {
                    toasts.error("Не выбран поставщик");
                    return;
                }
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
                if let Some(item) = client.get_untracked() {
                    pairs.push(("client_id".to_string(), item.id.to_string()));
                }
                if let Some(item) = supplier.get_untracked() {
                    pairs.push(("supplier_id".to_string(), item.id.to_string()));
                }
                if let Some(item) = account.get_untracked() {
                    pairs.push(("account_id".to_string(), item.id.to_string()));
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
                        {if record_id.is_some() { "Изменить транзакцию" } else { "Новая транзакция" }}
                    </h2>
                    <div class="form__group">
                        <label class="form__label" for="tx-date">"Дата"</label>
                        <input
                            type="date"
                            id="tx-date"
                            class="form__input"
                            prop:value=move || date.get()
                            on:input=move |ev| date.set(event_target_value(&ev))
                        />
                    </div>
                    <SelectWidget
                        label="Клиент"
                        options=clients
                        selected=client
                        on_select=on_client
                        placeholder="Выберите клиента"
                    />
                    <SelectWidget
                        label="Поставщик"
                        options=suppliers
                        selected=supplier
                        on_select=on_supplier
                        placeholder="Выберите поставщика"
                    />
                    <SelectWidget
                        label="Счёт"
                        options=accounts
                        selected=account
                        on_select=on_account
                        disabled=Signal::derive(move || {
                            accounts_loading.get() || supplier.get().is_none()
                        })
                        placeholder="Счёт поставщика"
                    />
                    <div class="form__group">
                        <label class="form__label" for="tx-amount">"Сумма"</label>
                        <AmountInput value=amount id="tx-amount" />
                    </div>
                    <div class="form__group">
                        <label class="form__label" for="tx-client-pct">"Процент клиента"</label>
                        <input
                            type="text"
                            id="tx-client-pct"
                            class="form__input"
                            prop:value=move || client_pct.get()
                            on:input=move |ev| client_pct.set(event_target_value(&ev))
                        />
                    </div>
                    <div class="form__group">
                        <label class="form__label" for="tx-supplier-pct">"Процент поставщика"</label>
                        <input
                            type="text"
                            id="tx-supplier-pct"
                            class="form__input"
                            prop:value=move || supplier_pct.get()
                            on:input=move |ev| supplier_pct.set(event_target_value(&ev))
                        />
                    </div>
                    <div class="form__group">
                        <label class="form__label" for="tx-comment">"Комментарий"</label>
                        <input
                            type="text"
                            id="tx-comment"
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

/// Оплата по транзакции: сумма уменьшает долг в строке, сервер
/// возвращает обновлённый фрагмент и долги.
fn open_payment_form(
    modals: ModalStackService,
    toasts: ToastService,
    transaction_id: i64,
    on_paid: impl Fn(MutationResult) + Send + Sync + Clone + 'static,
) {
    let amount = RwSignal::new(String::new());
    let saving = RwSignal::new(false);

    modals.push(move |handle| {
        let on_paid = on_paid.clone();
        let submit = move |_| {
            let raw = amount.get_untracked();
            let Some(value) = parse_amount(&raw).filter(|v| *v > 0.0) else {
                toasts.error("Введите сумму оплаты");
                return;
            };
            if saving.get_untracked() {
                return;
            }
            saving.set(true);

            let pairs = vec![("amount".to_string(), format!("{value:.2}"))];
            let handle = handle.clone();
            let on_paid = on_paid.clone();
            spawn_local(async move {
                match api::post_form::<MutationResult>(
                    &format!("/{TABLE}/{transaction_id}/payment/"),
                    &pairs,
                )
                .await
                {
                    Ok(result) => {
                        on_paid(result);
                        toasts.success("Оплата проведена");
                        handle.close();
                    }
                    Err(e) => toasts.error(e),
                }
                saving.set(false);
            });
        };

        view! {
            <div class="form">
                <h2 class="form__title">"Оплата"</h2>
                <div class="form__group">
                    <label class="form__label" for="payment-amount">"Сумма"</label>
                    <AmountInput value=amount id="payment-amount" />
                </div>
                <div class="form__actions">
                    <button
                        class="button button--primary"
                        disabled=move || saving.get()
                        on:click=submit
                    >
                        "Оплатить"
                    </button>
                </div>
            </div>
        }
        .into_any()
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::list::DebtValue;

    fn debts(bonus: Option<DebtValue>, client: Option<DebtValue>) -> RowDebts {
        RowDebts {
            supplier_debt: None,
            bonus_debt: bonus,
            client_debt: client,
            investor_debt: None,
        }
    }

    #[test]
    fn fully_settled_row_is_auto_hidden() {
        let d = debts(Some(DebtValue::Number(0.0)), Some(DebtValue::Text("0 р.".into())));
        assert!(auto_hidden(true, true, &d));
    }

    #[test]
    fn unchecked_documents_keep_row_visible() {
        let d = debts(None, None);
        assert!(!auto_hidden(true, false, &d));
    }

    #[test]
    fn outstanding_secondary_debt_keeps_row_visible() {
        let d = debts(Some(DebtValue::Text("150 р.".into())), None);
        assert!(!auto_hidden(true, true, &d));
    }

    #[test]
    fn nonzero_debt_cell_keeps_row_visible() {
        let d = debts(None, None);
        assert!(!auto_hidden(false, true, &d));
    }

    #[test]
    fn debts_map_is_positional_by_ids() {
        let ctx: TransactionContext = serde_json::from_str(
            r#"{"current_page": 1, "total_pages": 1, "ids": [5, 6],
                "debts": {"bonus_debt": ["10 р.", 0],
                          "client_debt": [null, "0,00 р."]}}"#,
        )
        .unwrap();
        let map = debts_by_row(&ctx);
        assert!(!debt_is_zero(map[&5].bonus_debt.as_ref()));
        assert!(debt_is_zero(map[&5].client_debt.as_ref()));
        assert!(debt_is_zero(map[&6].bonus_debt.as_ref()));
        assert!(debt_is_zero(map[&6].client_debt.as_ref()));
    }
}

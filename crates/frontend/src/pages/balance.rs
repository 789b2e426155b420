//! Баланс компании: актив и пассив из готовой статистики.
//!
//! Агрегированные строки (должники, кассы) только отображаются; записи
//! с идентификатором (ТМЦ, кредиты, краткосрочные обязательства)
//! добавляются и правятся отсюда, статистика перечитывается после
//! каждой мутации.

use crate::layout::PageShell;
use crate::shared::api;
use crate::shared::components::amount_input::AmountInput;
use crate::shared::data_island::read_island;
use crate::shared::forms::{values_from_json, FieldSpec, FormModel};
use crate::shared::modal_stack::ModalStackService;
use crate::shared::toast::ToastService;
use contracts::balance::{BalanceGroup, BalanceItem, CompanyBalanceStats};
use contracts::lookup::RecordEnvelope;
use contracts::money::format_amount;
use contracts::mutation::{MutationKind, MutationResult};
use leptos::prelude::*;
use leptos::task::spawn_local;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use super::transactions::confirm_delete;

const ENTITY: &str = "balance-items";

const FORM_SPECS: &[FieldSpec] = &[
    FieldSpec::required("name", "Название"),
    FieldSpec::money("amount", "Сумма"),
];

/// Виды записей баланса: (значение для сервера, подпись).
const RECORD_KINDS: &[(&str, &str)] = &[
    ("inventory", "ТМЦ"),
    ("credit", "Кредит"),
    ("short_term", "Краткосрочное обязательство"),
];

fn group_total(group: &BalanceGroup) -> String {
    group
        .formatted_total
        .clone()
        .unwrap_or_else(|| format_amount(group.total))
}

fn item_amount(item: &BalanceItem) -> String {
    item.formatted_total
        .clone()
        .unwrap_or_else(|| format_amount(item.amount))
}

#[component]
pub fn BalancePage() -> impl IntoView {
    let toasts = use_context::<ToastService>().expect("ToastService not provided");
    let modals = use_context::<ModalStackService>().expect("ModalStackService not provided");

    let stats = RwSignal::new(CompanyBalanceStats::default());
    let open_groups = RwSignal::new(HashSet::<String>::new());

    let reload = move || {
        spawn_local(async move {
            match api::get_json::<CompanyBalanceStats>("/company_balance_stats/").await {
                Ok(data) => stats.set(data),
                Err(e) => toasts.error(e),
            }
        });
    };

    Effect::new(move |_| {
        if let Some(initial) = read_island::<CompanyBalanceStats>("page-context") {
            stats.set(initial);
            return;
        }
        reload();
    });

    let open_form = move |record_id: Option<i64>| {
        open_record_form(modals, toasts, record_id, move || reload());
    };

    let delete_record = move |id: i64| {
        confirm_delete(modals, "Удалить запись баланса?", move || {
            spawn_local(async move {
                match api::post_form::<MutationResult>(&format!("/{ENTITY}/{id}/delete/"), &[])
                    .await
                {
                    Ok(result) if result.kind == MutationKind::Delete => {
                        reload();
                        toasts.success("Запись удалена");
                    }
                    Ok(_) => toasts.error("Неожиданный ответ при удалении"),
                    Err(e) => toasts.error(e),
                }
            });
        });
    };

    let toggle = move |key: String| {
        open_groups.update(|set| {
            if !set.remove(&key) {
                set.insert(key);
            }
        });
    };

    let item_row = move |item: &BalanceItem| {
        let amount = item_amount(item);
        let controls = item.id.map(|id| {
            view! {
                <span class="balance__controls">
                    <button class="button button--small" on:click=move |_| open_form(Some(id))>
                        "Изменить"
                    </button>
                    <button class="button button--small" on:click=move |_| delete_record(id)>
                        "Удалить"
                    </button>
                </span>
            }
        });
        view! {
            <li class="balance__item">
                <span>{item.name.clone()}</span>
                <span>{amount}</span>
                {controls}
            </li>
        }
    };

    let group_body = move |group: &BalanceGroup| match group.table_html.clone() {
        Some(html) => view! { <div class="balance__table" inner_html=html></div> }.into_any(),
        None => view! {
            <ul class="balance__items">
                {group.items.iter().map(|item| item_row(item)).collect_view()}
            </ul>
        }
        .into_any(),
    };

    let asset_group = move |key: &'static str, title: &'static str, group: BalanceGroup| {
        let is_open = open_groups.get().contains(key);
        let total = group_total(&group);
        view! {
            <li class="balance__group">
                <div class="balance__header" on:click=move |_| toggle(key.to_string())>
                    <span class="balance__name">{title}</span>
                    <span class="balance__amount">{total}</span>
                </div>
                <Show when=move || is_open>{group_body(&group)}</Show>
            </li>
        }
    };

    let actions = view! {
        <button class="button button--primary" on:click=move |_| open_form(None)>
            "Добавить запись"
        </button>
    }
    .into_any();

    view! {
        <PageShell title="Баланс" actions=actions>
            <div class="balance">
                <div class="balance__column">
                    <h2 class="balance__column-title">
                        {move || format!("Актив: {}", format_amount(stats.get().assets_total))}
                    </h2>
                    <ul class="balance__groups">
                        {move || {
                            let current = stats.get().current_assets;
                            vec![
                                asset_group("inventory", "Товарные остатки", current.inventory),
                                asset_group("debtors", "Должники", current.debtors),
                                asset_group("cash", "Денежные средства", current.cash),
                            ]
                            .into_iter()
                            .collect_view()
                        }}
                    </ul>
                </div>
                <div class="balance__column">
                    <h2 class="balance__column-title">
                        {move || {
                            format!("Пассив: {}", format_amount(stats.get().liabilities.total))
                        }}
                    </h2>
                    <ul class="balance__groups">
                        {move || {
                            stats
                                .get()
                                .liabilities
                                .items
                                .into_iter()
                                .map(|block| {
                                    let group = BalanceGroup {
                                        total: block.amount,
                                        formatted_total: block.formatted_total.clone(),
                                        items: block.items.clone(),
                                        table_html: block.table_html.clone(),
                                    };
                                    let key = block.name.clone();
                                    let is_open = open_groups.get().contains(&key);
                                    let total = group_total(&group);
                                    let toggle_key = key.clone();
                                    view! {
                                        <li class="balance__group">
                                            <div
                                                class="balance__header"
                                                on:click=move |_| toggle(toggle_key.clone())
                                            >
                                                <span class="balance__name">{block.name.clone()}</span>
                                                <span class="balance__amount">{total}</span>
                                            </div>
                                            <Show when=move || is_open>{group_body(&group)}</Show>
                                        </li>
                                    }
                                })
                                .collect_view()
                        }}
                    </ul>
                    {move || {
                        stats
                            .get()
                            .liabilities
                            .capital
                            .map(|capital| {
                                let amount = capital
                                    .formatted
                                    .clone()
                                    .unwrap_or_else(|| format_amount(capital.value));
                                view! {
                                    <div class="balance__capital">
                                        <span>"Собственный капитал"</span>
                                        <span>{amount}</span>
                                    </div>
                                }
                            })
                    }}
                </div>
            </div>
        </PageShell>
    }
}

/// Форма записи баланса: название и сумма. При добавлении дополнительно
/// выбирается вид записи, при правке вид закреплён за записью на сервере.
fn open_record_form(
    modals: ModalStackService,
    toasts: ToastService,
    record_id: Option<i64>,
    on_saved: impl Fn() + Send + Sync + Clone + 'static,
) {
    spawn_local(async move {
        let initial = match record_id {
            Some(id) => {
                match api::get_json::<RecordEnvelope<HashMap<String, serde_json::Value>>>(&format!(
                    "/{ENTITY}/{id}/"
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
        let kind = RwSignal::new(RECORD_KINDS[0].0.to_string());

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
            let amount = form.value("amount");

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

                let mut pairs = form.pairs();
                let path = match record_id {
                    Some(id) => format!("/{ENTITY}/{id}/edit/"),
                    None => {
                        pairs.push(("operation_type".to_string(), kind.get_untracked()));
                        format!("/{ENTITY}/add/")
                    }
                };
                let handle = handle.clone();
                let on_saved = on_saved.clone();
                spawn_local(async move {
                    match api::post_form::<MutationResult>(&path, &pairs).await {
                        Ok(_) => {
                            on_saved();
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
                        {if record_id.is_some() { "Изменить запись" } else { "Новая запись" }}
                    </h2>
                    <Show when=move || record_id.is_none()>
                        <div class="form__group">
                            <label class="form__label" for="bal-kind">"Вид"</label>
                            <select
                                id="bal-kind"
                                class="form__select"
                                on:change=move |ev| kind.set(event_target_value(&ev))
                            >
                                {RECORD_KINDS
                                    .iter()
                                    .map(|(value, label)| {
                                        let value = *value;
                                        view! {
                                            <option
                                                value=value
                                                selected=move || kind.get() == value
                                            >
                                                {*label}
                                            </option>
                                        }
                                    })
                                    .collect_view()}
                            </select>
                        </div>
                    </Show>
                    <div class="form__group">
                        <label class="form__label" for="bal-name">"Название"</label>
                        <input
                            type="text"
                            id="bal-name"
                            class="form__input"
                            prop:value=move || name.get()
                            on:input=move |ev| name.set(event_target_value(&ev))
                        />
                    </div>
                    <div class="form__group">
                        <label class="form__label" for="bal-amount">"Сумма"</label>
                        <AmountInput value=amount id="bal-amount" />
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

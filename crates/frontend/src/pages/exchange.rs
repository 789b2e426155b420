//! Кабинет обмена: переводы "от нас" и "нам" двумя таблицами с
//! сравнением итогов. В итог каждой стороны входят только учитываемые
//! строки.

use crate::layout::PageShell;
use crate::shared::api;
use crate::shared::components::amount_input::AmountInput;
use crate::shared::components::context_menu::{ContextMenu, MenuItem, MenuState};
use crate::shared::data_island::read_island;
use crate::shared::table::ingest;
use crate::shared::table::summary::sides_match;
use crate::shared::table::view::TableView;
use crate::shared::table::TableState;
use crate::shared::toast::ToastService;
use contracts::list::ExchangePage as ExchangePayload;
use contracts::money::{format_amount, parse_amount};
use contracts::mutation::{Ack, MutationKind, MutationResult, TransferSide};
use leptos::prelude::*;
use leptos::task::spawn_local;
use std::collections::HashSet;

use crate::shared::modal_stack::ModalStackService;

use super::money_transfers::open_transfer_form;
use super::transactions::confirm_delete;

// Мутации идут по эндпоинтам переводов, списочный — свой.
const ENTITY: &str = "money-transfers";

// Колонки: дата, контрагент, сумма, комментарий.
const COL_AMOUNT: usize = 2;

fn side_of(result: &MutationResult) -> Option<TransferSide> {
    result.transfer_type
}

#[component]
pub fn ExchangePage() -> impl IntoView {
    let toasts = use_context::<ToastService>().expect("ToastService not provided");
    let modals = use_context::<ModalStackService>().expect("ModalStackService not provided");

    let from_us = RwSignal::new(TableState::new("exchange-from-us"));
    let to_us = RwSignal::new(TableState::new("exchange-to-us"));
    let counted_from = RwSignal::new(HashSet::<i64>::new());
    let counted_to = RwSignal::new(HashSet::<i64>::new());
    let menu = RwSignal::new(None::<MenuState>);
    let no_hidden = RwSignal::new(HashSet::<i64>::new());

    let table_for = move |side: TransferSide| match side {
        TransferSide::FromUs => from_us,
        TransferSide::ToUs => to_us,
    };
    let counted_for = move |side: TransferSide| match side {
        TransferSide::FromUs => counted_from,
        TransferSide::ToUs => counted_to,
    };

    let apply_completed = move |side: TransferSide, completed: &[i64]| {
        let table = table_for(side);
        table.update(|t| {
            let ids: Vec<i64> = t.data_rows().map(|r| r.id).collect();
            for id in ids {
                t.set_done(id, completed.contains(&id));
            }
        });
    };

    let apply_page = move |page: ExchangePayload| {
        let parsed = ingest::parse_rows(&page.from_us_html)
            .and_then(|from| ingest::parse_rows(&page.to_us_html).map(|to| (from, to)));
        match parsed {
            Ok((from_rows, to_rows)) => {
                from_us.update(|t| t.replace_rows(from_rows, &page.context.from_us_ids));
                to_us.update(|t| t.replace_rows(to_rows, &page.context.to_us_ids));
                apply_completed(TransferSide::FromUs, &page.context.from_us_completed);
                apply_completed(TransferSide::ToUs, &page.context.to_us_completed);
                counted_from.set(page.context.counted_from_us.iter().copied().collect());
                counted_to.set(page.context.counted_to_us.iter().copied().collect());
            }
            Err(e) => {
                from_us.update(|t| t.clear());
                to_us.update(|t| t.clear());
                toasts.error(format!("Не удалось разобрать страницу: {e}"));
            }
        }
    };

    let reload = move || {
        spawn_local(async move {
            match api::get_json::<ExchangePayload>("/exchange/list/").await {
                Ok(page) => apply_page(page),
                Err(e) => toasts.error(e),
            }
        });
    };

    Effect::new(move |_| {
        if let Some(initial) = read_island::<ExchangePayload>("page-context") {
            apply_page(initial);
        } else {
            reload();
        }
    });

    // Итог стороны: сумма учитываемых строк.
    let side_total = move |side: TransferSide| {
        let table = table_for(side).get();
        let counted = counted_for(side).get();
        table
            .data_rows()
            .filter(|r| counted.contains(&r.id))
            .filter_map(|r| r.cells.get(COL_AMOUNT))
            .filter_map(|c| parse_amount(&c.text))
            .sum::<f64>()
    };
    let totals_class = move || {
        if sides_match(
            side_total(TransferSide::FromUs),
            side_total(TransferSide::ToUs),
        ) {
            "exchange-totals text-green"
        } else {
            "exchange-totals text-red"
        }
    };

    // Ответ мутации может перенести строку на другую сторону.
    let apply_mutation = move |result: MutationResult| {
        if result.kind == MutationKind::Delete {
            from_us.update(|t| t.remove_row(result.id));
            to_us.update(|t| t.remove_row(result.id));
        } else if let (Some(html), Some(side)) = (&result.html, side_of(&result)) {
            if let Some(old) = result.old_transfer_type.filter(|old| *old != side) {
                table_for(old).update(|t| t.remove_row(result.id));
            }
            match ingest::parse_single_row(html) {
                Ok(row) => table_for(side).update(|t| t.upsert_row(result.id, row)),
                Err(e) => log::error!("bad row fragment: {e}"),
            }
        }
        apply_completed(TransferSide::FromUs, &result.from_us_completed);
        apply_completed(TransferSide::ToUs, &result.to_us_completed);
        counted_from.set(result.counted_from_us.iter().copied().collect());
        counted_to.set(result.counted_to_us.iter().copied().collect());
    };

    let toggle_flag = move |side: TransferSide, id: i64, flag: &'static str| {
        spawn_local(async move {
            let body = vec![("side".to_string(), side_name(side).to_string())];
            match api::post_form::<MutationResult>(&format!("/{ENTITY}/{id}/{flag}/"), &body).await
            {
                Ok(result) => apply_mutation(result),
                Err(e) => toasts.error(e),
            }
        });
    };

    let open_form = move |record_id: Option<i64>| {
        open_transfer_form(modals, toasts, record_id, move |result| apply_mutation(result));
    };

    let open_collection = move || {
        open_collection_form(modals, toasts, move |result| apply_mutation(result));
    };

    // Завершает обе стороны разом, сервер возвращает свежую страницу.
    let complete_all = move |_| {
        spawn_local(async move {
            match api::post_form::<Ack>(&format!("/{ENTITY}/complete_all/"), &[]).await {
                Ok(ack) if ack.is_success() => {
                    reload();
                    toasts.success("Все переводы завершены");
                }
                Ok(ack) => toasts.error(ack.message.unwrap_or_else(|| "Отказ сервера".into())),
                Err(e) => toasts.error(e),
            }
        });
    };

    let delete_row = move |id: i64| {
        spawn_local(async move {
            match api::post_form::<MutationResult>(&format!("/{ENTITY}/{id}/delete/"), &[]).await {
                Ok(result) if result.kind == MutationKind::Delete => {
                    apply_mutation(result);
                    toasts.success("Перевод удалён");
                }
                Ok(_) => toasts.error("Неожиданный ответ при удалении"),
                Err(e) => toasts.error(e),
            }
        });
    };

    let menu_for_side = move |side: TransferSide| {
        Callback::new(move |(id, x, y): (i64, i32, i32)| {
            let done = table_for(side).get_untracked().is_done(id);
            let counted = counted_for(side).get_untracked().contains(&id);
            let items = vec![
                MenuItem::new(
                    if done { "Не завершено" } else { "Завершено" },
                    move || toggle_flag(side, id, "toggle-completed"),
                ),
                MenuItem::new(
                    if counted { "Не учитывать" } else { "Учитывать" },
                    move || toggle_flag(side, id, "toggle-counted"),
                ),
                MenuItem::new("Изменить", move || open_form(Some(id))),
                MenuItem::new("Удалить", move || {
                    confirm_delete(modals, "Удалить перевод?", move || delete_row(id));
                }),
            ];
            menu.set(Some(MenuState { items, x, y }));
        })
    };

    let actions = view! {
        <button class="button button--primary" on:click=move |_| open_form(None)>
            "Добавить перевод"
        </button>
        <button class="button" on:click=move |_| open_collection()>
            "Инкассация"
        </button>
        <button class="button" on:click=complete_all>
            "Завершить все"
        </button>
    }
    .into_any();

    view! {
        <PageShell title="Обмен" actions=actions>
            <div class=totals_class>
                <span class="exchange-totals__side">
                    {move || format!("От нас: {}", format_amount(side_total(TransferSide::FromUs)))}
                </span>
                <span class="exchange-totals__side">
                    {move || format!("Нам: {}", format_amount(side_total(TransferSide::ToUs)))}
                </span>
            </div>
            <div class="exchange">
                <div class="exchange__side">
                    <h2 class="exchange__title">"От нас"</h2>
                    <TableView
                        state=from_us
                        hidden=no_hidden
                        show_all=Signal::derive(|| false)
                        on_row_menu=menu_for_side(TransferSide::FromUs)
                        class="table--transfers"
                    />
                </div>
                <div class="exchange__side">
                    <h2 class="exchange__title">"Нам"</h2>
                    <TableView
                        state=to_us
                        hidden=no_hidden
                        show_all=Signal::derive(|| false)
                        on_row_menu=menu_for_side(TransferSide::ToUs)
                        class="table--transfers"
                    />
                </div>
            </div>
            <ContextMenu menu=menu />
        </PageShell>
    }
}

fn side_name(side: TransferSide) -> &'static str {
    match side {
        TransferSide::FromUs => "from_us",
        TransferSide::ToUs => "to_us",
    }
}

/// Инкассация: снятая сумма оформляется переводом "от нас" за
/// сегодняшнее число.
fn open_collection_form(
    modals: ModalStackService,
    toasts: ToastService,
    on_saved: impl Fn(MutationResult) + Send + Sync + Clone + 'static,
) {
    let amount = RwSignal::new(String::new());
    let saving = RwSignal::new(false);

    modals.push(move |handle| {
        let on_saved = on_saved.clone();
        let submit = move |_| {
            let raw = amount.get_untracked();
            let Some(value) = parse_amount(&raw).filter(|v| *v > 0.0) else {
                toasts.error("Введите сумму инкассации");
                return;
            };
            if saving.get_untracked() {
                return;
            }
            saving.set(true);

            let pairs = vec![
                ("amount".to_string(), format!("{value:.2}")),
                ("date".to_string(), crate::shared::forms::today_iso()),
            ];
            let handle = handle.clone();
            let on_saved = on_saved.clone();
            spawn_local(async move {
                match api::post_form::<MutationResult>(&format!("/{ENTITY}/collection/"), &pairs)
                    .await
                {
                    Ok(result) => {
                        on_saved(result);
                        toasts.success("Инкассация проведена");
                        handle.close();
                    }
                    Err(e) => toasts.error(e),
                }
                saving.set(false);
            });
        };

        view! {
            <div class="form">
                <h2 class="form__title">"Инкассация"</h2>
                <div class="form__group">
                    <label class="form__label" for="collection-amount">"Сумма"</label>
                    <AmountInput value=amount id="collection-amount" />
                </div>
                <div class="form__actions">
                    <button
                        class="button button--primary"
                        disabled=move || saving.get()
                        on:click=submit
                    >
                        "Провести"
                    </button>
                </div>
            </div>
        }
        .into_any()
    });
}

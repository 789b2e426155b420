//! Кабинет должников: группы с раскрытием и общим итогом.

use crate::layout::PageShell;
use crate::shared::api;
use crate::shared::data_island::read_island;
use crate::shared::toast::ToastService;
use contracts::debtors::{DebtorEntry, DebtorsReport};
use contracts::money::format_amount;
use leptos::prelude::*;
use leptos::task::spawn_local;
use std::collections::HashSet;

#[component]
pub fn DebtorsPage() -> impl IntoView {
    let toasts = use_context::<ToastService>().expect("ToastService not provided");

    let report = RwSignal::new(DebtorsReport::default());
    let open_groups = RwSignal::new(HashSet::<String>::new());

    Effect::new(move |_| {
        if let Some(initial) = read_island::<DebtorsReport>("page-context") {
            report.set(initial);
            return;
        }
        spawn_local(async move {
            match api::get_json::<DebtorsReport>("/debtors-office/data/").await {
                Ok(data) => report.set(data),
                Err(e) => toasts.error(e),
            }
        });
    });

    // Состав группы подгружается при первом раскрытии.
    let load_details = move |name: String| {
        spawn_local(async move {
            let path = format!(
                "/suppliers/debtors/details/?group={}",
                urlencoding::encode(&name)
            );
            match api::get_json::<Vec<DebtorEntry>>(&path).await {
                Ok(items) => report.update(|r| {
                    if let Some(group) = r.groups.iter_mut().find(|g| g.name == name) {
                        group.items = items;
                    }
                }),
                Err(e) => toasts.error(e),
            }
        });
    };

    let toggle_group = move |name: String| {
        let opened = open_groups
            .try_update(|set| {
                if set.remove(&name) {
                    false
                } else {
                    set.insert(name.clone());
                    true
                }
            })
            .unwrap_or(false);
        let needs_details = opened
            && report
                .get_untracked()
                .groups
                .iter()
                .any(|g| g.name == name && g.items.is_empty());
        if needs_details {
            load_details(name);
        }
    };

    view! {
        <PageShell title="Кабинет должников">
            <ul class="debtors-office-list">
                {move || {
                    let open = open_groups.get();
                    report
                        .get()
                        .groups
                        .into_iter()
                        .map(|group| {
                            let name = group.name.clone();
                            let is_open = open.contains(&name);
                            let toggle_name = name.clone();
                            let amount_class = if group.total > 0.0 {
                                "debtors-office-list__amount text-red"
                            } else {
                                "debtors-office-list__amount text-green"
                            };
                            view! {
                                <li class="debtors-office-list__group">
                                    <div
                                        class="debtors-office-list__header"
                                        on:click=move |_| toggle_group(toggle_name.clone())
                                    >
                                        <span class="debtors-office-list__name">{name.clone()}</span>
                                        <span class=amount_class>{format_amount(group.total)}</span>
                                    </div>
                                    <Show when=move || is_open>
                                        <ul class="debtors-office-list__items">
                                            {group
                                                .items
                                                .iter()
                                                .map(|entry| {
                                                    view! {
                                                        <li class="debtors-office-list__item">
                                                            <span>{entry.name.clone()}</span>
                                                            <span>{format_amount(entry.amount)}</span>
                                                        </li>
                                                    }
                                                })
                                                .collect_view()}
                                        </ul>
                                    </Show>
                                </li>
                            }
                        })
                        .collect_view()
                }}
            </ul>
            <div class="debtors-office-list__total">
                {move || format!("Всего: {}", format_amount(report.get().total))}
            </div>
        </PageShell>
    }
}

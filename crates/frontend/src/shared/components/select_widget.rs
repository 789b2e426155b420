use contracts::lookup::LookupItem;
use leptos::prelude::*;
use std::collections::HashSet;

/// Фильтр вариантов по подстроке, без учёта регистра.
pub fn filter_options(options: &[LookupItem], query: &str) -> Vec<LookupItem> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return options.to_vec();
    }
    options
        .iter()
        .filter(|o| o.name.to_lowercase().contains(&needle))
        .cloned()
        .collect()
}

/// Выпадающий список с поиском.
///
/// Владеет только открытостью и строкой поиска; варианты и выбранное
/// значение приходят сигналами, так что каскад (поставщик -> счета)
/// собирается на странице. Пока родитель грузит варианты, список
/// блокируется через `disabled`.
#[component]
pub fn SelectWidget(
    #[prop(optional, into)] label: MaybeProp<String>,
    #[prop(into)] options: Signal<Vec<LookupItem>>,
    #[prop(into)] selected: Signal<Option<LookupItem>>,
    on_select: Callback<Option<LookupItem>>,
    #[prop(optional, into)] disabled: MaybeProp<bool>,
    #[prop(optional, into)] placeholder: MaybeProp<String>,
) -> impl IntoView {
    let open = RwSignal::new(false);
    let query = RwSignal::new(String::new());

    let toggle = move |_| {
        if disabled.get_untracked().unwrap_or(false) {
            return;
        }
        open.update(|o| *o = !*o);
        if open.get_untracked() {
            query.set(String::new());
        }
    };

    let visible_options = move || filter_options(&options.get(), &query.get());

    let control_text = move || {
        selected
            .get()
            .map(|item| item.name)
            .or_else(|| placeholder.get())
            .unwrap_or_else(|| "—".to_string())
    };

    view! {
        <div class="select">
            {move || label.get().map(|l| view! { <span class="select__label">{l}</span> })}
            <button
                type="button"
                class=move || {
                    if open.get() { "select__control select__control--open" } else { "select__control" }
                }
                disabled=move || disabled.get().unwrap_or(false)
                on:click=toggle
            >
                {control_text}
            </button>
            <Show when=move || open.get()>
                <div class="select__backdrop" on:click=move |_| open.set(false)></div>
                <div class="select__dropdown">
                    <input
                        type="text"
                        class="select__search"
                        placeholder="Поиск..."
                        prop:value=move || query.get()
                        on:input=move |ev| query.set(event_target_value(&ev))
                    />
                    <ul class="select__list">
                        <li
                            class="select__option select__option--empty"
                            on:click=move |_| {
                                on_select.run(None);
                                open.set(false);
                            }
                        >
                            "—"
                        </li>
                        {move || {
                            visible_options()
                                .into_iter()
                                .map(|item| {
                                    let is_active = selected
                                        .get_untracked()
                                        .map(|s| s.id == item.id)
                                        .unwrap_or(false);
                                    let class = if is_active {
                                        "select__option select__option--active"
                                    } else {
                                        "select__option"
                                    };
                                    let chosen = item.clone();
                                    view! {
                                        <li
                                            class=class
                                            on:click=move |_| {
                                                on_select.run(Some(chosen.clone()));
                                                open.set(false);
                                            }
                                        >
                                            {item.name.clone()}
                                        </li>
                                    }
                                })
                                .collect_view()
                        }}
                    </ul>
                </div>
            </Show>
        </div>
    }
}

/// Клик по варианту в многозначном режиме.
pub fn toggle_choice(set: &mut HashSet<i64>, id: i64) {
    if !set.remove(&id) {
        set.insert(id);
    }
}

/// Подпись на контроле многозначного списка.
pub fn multi_control_text(count: usize, placeholder: Option<String>) -> String {
    if count == 0 {
        placeholder.unwrap_or_else(|| "—".to_string())
    } else {
        format!("Выбрано: {count}")
    }
}

/// Многозначный вариант списка: варианты отмечаются флажками, список
/// не закрывается после клика. Выбор живёт у родителя.
#[component]
pub fn MultiSelectWidget(
    #[prop(optional, into)] label: MaybeProp<String>,
    #[prop(into)] options: Signal<Vec<LookupItem>>,
    selected: RwSignal<HashSet<i64>>,
    #[prop(optional, into)] placeholder: MaybeProp<String>,
) -> impl IntoView {
    let open = RwSignal::new(false);
    let query = RwSignal::new(String::new());

    let toggle = move |_| {
        open.update(|o| *o = !*o);
        if open.get_untracked() {
            query.set(String::new());
        }
    };

    let visible_options = move || filter_options(&options.get(), &query.get());
    let control_text = move || multi_control_text(selected.get().len(), placeholder.get());

    view! {
        <div class="select select--multi">
            {move || label.get().map(|l| view! { <span class="select__label">{l}</span> })}
            <button
                type="button"
                class=move || {
                    if open.get() { "select__control select__control--open" } else { "select__control" }
                }
                on:click=toggle
            >
                {control_text}
            </button>
            <Show when=move || open.get()>
                <div class="select__backdrop" on:click=move |_| open.set(false)></div>
                <div class="select__dropdown">
                    <input
                        type="text"
                        class="select__search"
                        placeholder="Поиск..."
                        prop:value=move || query.get()
                        on:input=move |ev| query.set(event_target_value(&ev))
                    />
                    <ul class="select__list">
                        <li
                            class="select__option select__option--empty"
                            on:click=move |_| selected.set(HashSet::new())
                        >
                            "Сбросить"
                        </li>
                        {move || {
                            visible_options()
                                .into_iter()
                                .map(|item| {
                                    let id = item.id;
                                    view! {
                                        <li
                                            class="select__option select__option--checkbox"
                                            on:click=move |_| {
                                                selected.update(|set| toggle_choice(set, id));
                                            }
                                        >
                                            <input
                                                type="checkbox"
                                                prop:checked=move || selected.get().contains(&id)
                                            />
                                            {item.name.clone()}
                                        </li>
                                    }
                                })
                                .collect_view()
                        }}
                    </ul>
                </div>
            </Show>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn items() -> Vec<LookupItem> {
        vec![
            LookupItem { id: 1, name: "ООО Ромашка".into() },
            LookupItem { id: 2, name: "ИП Иванов".into() },
            LookupItem { id: 3, name: "иванов и партнёры".into() },
        ]
    }

    #[test]
    fn filter_is_case_insensitive_substring() {
        let found = filter_options(&items(), "иванов");
        assert_eq!(found.len(), 2);
        assert_eq!(found[0].id, 2);
    }

    #[test]
    fn empty_query_returns_everything() {
        assert_eq!(filter_options(&items(), "  ").len(), 3);
    }

    #[test]
    fn no_match_yields_empty_list() {
        assert!(filter_options(&items(), "газпром").is_empty());
    }

    #[test]
    fn choices_toggle_in_and_out() {
        let mut set = HashSet::new();
        toggle_choice(&mut set, 1);
        toggle_choice(&mut set, 2);
        assert!(set.contains(&1) && set.contains(&2));

        toggle_choice(&mut set, 1);
        assert!(!set.contains(&1));
        assert!(set.contains(&2));
    }

    #[test]
    fn multi_control_shows_count_or_placeholder() {
        assert_eq!(multi_control_text(0, Some("Все статьи".into())), "Все статьи");
        assert_eq!(multi_control_text(0, None), "—");
        assert_eq!(multi_control_text(3, Some("Все статьи".into())), "Выбрано: 3");
    }
}

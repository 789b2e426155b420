use leptos::prelude::*;

#[derive(Clone)]
pub struct MenuItem {
    pub label: String,
    pub action: Callback<()>,
}

impl MenuItem {
    pub fn new(label: impl Into<String>, action: impl Fn() + Send + Sync + 'static) -> Self {
        Self {
            label: label.into(),
            action: Callback::new(move |_| action()),
        }
    }
}

/// Открытое контекстное меню: пункты и координаты клика.
#[derive(Clone)]
pub struct MenuState {
    pub items: Vec<MenuItem>,
    pub x: i32,
    pub y: i32,
}

/// Контекстное меню строки. Пункт выполняет действие и закрывает
/// меню; клик мимо просто закрывает.
#[component]
pub fn ContextMenu(menu: RwSignal<Option<MenuState>>) -> impl IntoView {
    view! {
        {move || {
            menu.get()
                .map(|state| {
                    let style = format!("left: {}px; top: {}px;", state.x, state.y);
                    view! {
                        <div class="context-menu__backdrop" on:click=move |_| menu.set(None)></div>
                        <ul class="context-menu" style=style>
                            {state
                                .items
                                .into_iter()
                                .map(|item| {
                                    let action = item.action;
                                    view! {
                                        <li
                                            class="context-menu__item"
                                            on:click=move |_| {
                                                action.run(());
                                                menu.set(None);
                                            }
                                        >
                                            {item.label.clone()}
                                        </li>
                                    }
                                })
                                .collect_view()}
                        </ul>
                    }
                })
        }}
    }
}

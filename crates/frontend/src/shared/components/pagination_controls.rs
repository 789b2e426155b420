use crate::shared::icons::icon;
use crate::shared::paginator::PagerState;
use leptos::prelude::*;

/// Кнопки листания. Страницы с единицы; на границах соответствующие
/// кнопки гаснут, при ошибке загрузки гаснут все.
#[component]
pub fn PaginationControls(
    #[prop(into)] pager: Signal<PagerState>,
    /// Ошибка последней загрузки: блокирует всё управление.
    #[prop(into)] failed: Signal<bool>,
    /// Запрос страницы; номер уже нормализован.
    on_page_change: Callback<u32>,
) -> impl IntoView {
    let go = move |requested: i64| {
        let p = pager.get_untracked();
        let page = p.resolve(requested);
        if page != p.current_page {
            on_page_change.run(page);
        }
    };

    view! {
        <div class="pagination-controls">
            <button
                class="pagination-btn"
                on:click=move |_| go(1)
                disabled=move || failed.get() || !pager.get().has_prev()
                title="Первая страница"
            >
                {icon("chevrons-left")}
            </button>
            <button
                class="pagination-btn"
                on:click=move |_| go(pager.get_untracked().current_page as i64 - 1)
                disabled=move || failed.get() || !pager.get().has_prev()
                title="Предыдущая страница"
            >
                {icon("chevron-left")}
            </button>
            <span class="pagination-info">
                {move || {
                    let p = pager.get();
                    format!("{} / {}", p.current_page, p.total_pages)
                }}
            </span>
            <button
                class="pagination-btn"
                on:click=move |_| go(pager.get_untracked().current_page as i64 + 1)
                disabled=move || failed.get() || !pager.get().has_next()
                title="Следующая страница"
            >
                {icon("chevron-right")}
            </button>
            <button
                class="pagination-btn"
                on:click=move |_| go(pager.get_untracked().total_pages as i64)
                disabled=move || failed.get() || !pager.get().has_next()
                title="Последняя страница"
            >
                {icon("chevrons-right")}
            </button>
        </div>
    }
}

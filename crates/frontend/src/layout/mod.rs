use leptos::prelude::*;

/// Каркас раздела: заголовок, панель действий, содержимое.
/// Навигация между разделами остаётся на сервере.
#[component]
pub fn PageShell(
    #[prop(into)] title: String,
    #[prop(optional, into)] actions: Option<AnyView>,
    children: Children,
) -> impl IntoView {
    view! {
        <section class="page">
            <header class="page__header">
                <h1 class="page__title">{title}</h1>
                <div class="page__actions">{actions}</div>
            </header>
            <div class="page__content">{children()}</div>
        </section>
    }
}

use contracts::money::reformat_amount;
use leptos::prelude::*;

/// Поле ввода суммы: во время набора значение не трогается, на blur
/// приводится к каноничному виду ("12 500,50 р."). Нераспознанный
/// ввод остаётся как есть и ловится проверкой формы.
#[component]
pub fn AmountInput(
    value: RwSignal<String>,
    #[prop(optional, into)] id: MaybeProp<String>,
    #[prop(optional, into)] placeholder: MaybeProp<String>,
) -> impl IntoView {
    view! {
        <input
            type="text"
            class="form__input form__input--amount"
            id=move || id.get().unwrap_or_default()
            placeholder=move || placeholder.get().unwrap_or_else(|| "0 р.".to_string())
            prop:value=move || value.get()
            on:input=move |ev| value.set(event_target_value(&ev))
            on:blur=move |_| {
                let raw = value.get_untracked();
                if !raw.trim().is_empty() {
                    value.set(reformat_amount(&raw));
                }
            }
        />
    }
}

use super::state::{TableState, SELECTED_CELL_CLASS};
use leptos::prelude::*;
use std::collections::HashSet;

/// Отрисовка таблицы из реестра.
///
/// Любая правка реестра перерисовывает тело целиком; в режиме
/// "показать все" скрытые строки остаются в наборе и помечаются
/// классом `hidden-row`.
#[component]
pub fn TableView(
    state: RwSignal<TableState>,
    #[prop(into)] hidden: Signal<HashSet<i64>>,
    #[prop(into)] show_all: Signal<bool>,
    /// Правый клик по строке данных: (id, x, y) для контекстного меню.
    #[prop(optional, into)] on_row_menu: Option<Callback<(i64, i32, i32)>>,
    /// Клик по ячейке строки данных.
    #[prop(optional, into)] on_cell_click: Option<Callback<(i64, usize)>>,
    #[prop(optional, into)] class: MaybeProp<String>,
) -> impl IntoView {
    let body = move || {
        let table = state.get();
        let hidden = hidden.get();
        let show_all = show_all.get();

        table
            .visible_rows(&hidden, show_all)
            .map(|row| {
                let row_id = row.id;
                let is_summary = row.is_summary();
                let mut row_classes = row.classes.clone();
                if show_all && hidden.contains(&row_id) {
                    row_classes.push("hidden-row".to_string());
                }

                let cells = row
                    .cells
                    .iter()
                    .enumerate()
                    .map(|(col, cell)| {
                        let mut classes = cell.classes.join(" ");
                        if table.is_selected(row_id, col) {
                            classes.push(' ');
                            classes.push_str(SELECTED_CELL_CLASS);
                        }
                        view! {
                            <td
                                class=classes
                                inner_html=cell.html.clone()
                                on:click=move |_| {
                                    if let Some(cb) = on_cell_click {
                                        if !is_summary {
                                            cb.run((row_id, col));
                                        }
                                    }
                                }
                            ></td>
                        }
                    })
                    .collect_view();

                view! {
                    <tr
                        class=row_classes.join(" ")
                        on:contextmenu=move |ev| {
                            if let Some(cb) = on_row_menu {
                                if !is_summary {
                                    ev.prevent_default();
                                    cb.run((row_id, ev.client_x(), ev.client_y()));
                                }
                            }
                        }
                    >
                        {cells}
                    </tr>
                }
            })
            .collect_view()
    };

    view! {
        <table class=move || format!("table {}", class.get().unwrap_or_default())>
            <tbody>{body}</tbody>
        </table>
    }
}

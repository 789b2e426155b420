//! Разбор серверного HTML-фрагмента в строки реестра.
//!
//! Фрагмент с `<tr>` разбирается ровно один раз на границе; дальше
//! живут только типизированные строки.

use super::state::{Cell, Row};
use wasm_bindgen::JsCast;
use web_sys::{DomParser, SupportedType};

fn class_list(el: &web_sys::Element) -> Vec<String> {
    el.get_attribute("class")
        .unwrap_or_default()
        .split_whitespace()
        .map(|c| c.to_string())
        .collect()
}

/// Разбирает фрагмент тела таблицы. Ошибка парсера отдаётся наверх,
/// страница показывает её как тост.
pub fn parse_rows(html: &str) -> Result<Vec<Row>, String> {
    let parser = DomParser::new().map_err(|e| format!("{e:?}"))?;
    let wrapped = format!("<table><tbody>{html}</tbody></table>");
    let doc = parser
        .parse_from_string(&wrapped, SupportedType::TextHtml)
        .map_err(|e| format!("{e:?}"))?;

    let tr_nodes = doc
        .query_selector_all("tbody > tr")
        .map_err(|e| format!("{e:?}"))?;

    let mut rows = Vec::with_capacity(tr_nodes.length() as usize);
    for i in 0..tr_nodes.length() {
        let Some(tr) = tr_nodes.get(i).and_then(|n| n.dyn_into::<web_sys::Element>().ok())
        else {
            continue;
        };
        let mut cells = Vec::new();
        let tds = tr.query_selector_all("td, th").map_err(|e| format!("{e:?}"))?;
        for j in 0..tds.length() {
            let Some(td) = tds.get(j).and_then(|n| n.dyn_into::<web_sys::Element>().ok())
            else {
                continue;
            };
            cells.push(Cell {
                column: String::new(),
                html: td.inner_html(),
                text: td.text_content().unwrap_or_default().trim().to_string(),
                classes: class_list(&td),
            });
        }
        rows.push(Row {
            id: 0,
            cells,
            classes: class_list(&tr),
        });
    }
    Ok(rows)
}

/// Одна строка из ответа мутации (`html` в `MutationResult`).
pub fn parse_single_row(html: &str) -> Result<Row, String> {
    parse_rows(html)?
        .into_iter()
        .next()
        .ok_or_else(|| "пустой фрагмент строки".to_string())
}

//! Чтение стартового контекста страницы.
//!
//! Сервер кладёт его в `<script type="application/json" id="...">`
//! рядом с отрендеренной таблицей.

use serde::de::DeserializeOwned;

pub fn read_island<T: DeserializeOwned>(id: &str) -> Option<T> {
    let document = web_sys::window()?.document()?;
    let node = document.get_element_by_id(id)?;
    let text = node.text_content()?;
    match serde_json::from_str(&text) {
        Ok(value) => Some(value),
        Err(e) => {
            log::error!("bad data island #{id}: {e}");
            None
        }
    }
}

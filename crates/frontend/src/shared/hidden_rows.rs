//! Скрытые строки таблицы: серверное хранилище с локальным запасом.
//!
//! Источник истины — сервер (`hidden_rows/get|set/`), localStorage
//! ведётся сквозной записью и используется, когда сервер недоступен.

use crate::shared::api;
use contracts::hidden_rows::{HiddenRowsState, HiddenRowsUpdate};
use contracts::mutation::Ack;
use std::collections::HashSet;

fn local_storage() -> Option<web_sys::Storage> {
    web_sys::window()?.local_storage().ok().flatten()
}

fn hidden_key(table: &str) -> String {
    format!("{table}-table-hidden-rows")
}

fn show_all_key(table: &str) -> String {
    format!("{table}-table-show-all")
}

pub fn load_local(table: &str) -> HashSet<i64> {
    let raw = local_storage()
        .and_then(|s| s.get_item(&hidden_key(table)).ok().flatten())
        .unwrap_or_default();
    serde_json::from_str::<Vec<i64>>(&raw)
        .unwrap_or_default()
        .into_iter()
        .collect()
}

fn save_local(table: &str, ids: &HashSet<i64>) {
    let mut sorted: Vec<i64> = ids.iter().copied().collect();
    sorted.sort_unstable();
    if let (Some(storage), Ok(raw)) = (local_storage(), serde_json::to_string(&sorted)) {
        let _ = storage.set_item(&hidden_key(table), &raw);
    }
}

pub fn load_show_all(table: &str) -> bool {
    local_storage()
        .and_then(|s| s.get_item(&show_all_key(table)).ok().flatten())
        .map(|v| v == "true")
        .unwrap_or(false)
}

pub fn save_show_all(table: &str, show_all: bool) {
    if let Some(storage) = local_storage() {
        let _ = storage.set_item(&show_all_key(table), if show_all { "true" } else { "false" });
    }
}

/// Стартовая загрузка: серверный список, при сбое — локальная копия.
pub async fn restore(table: &str) -> HashSet<i64> {
    let path = format!("/hidden_rows/get/?table={}", urlencoding::encode(table));
    match api::get_json::<HiddenRowsState>(&path).await {
        Ok(state) => {
            let ids: HashSet<i64> = state.hidden_ids.into_iter().collect();
            save_local(table, &ids);
            ids
        }
        Err(e) => {
            log::warn!("hidden rows fetch failed, falling back to local copy: {e}");
            load_local(table)
        }
    }
}

/// Сохраняет список: локальная копия пишется всегда, серверный сбой
/// не откатывает уже применённое скрытие.
pub async fn persist(table: &str, ids: &HashSet<i64>) -> Result<(), String> {
    save_local(table, ids);
    let mut hidden_ids: Vec<i64> = ids.iter().copied().collect();
    hidden_ids.sort_unstable();
    let update = HiddenRowsUpdate {
        table: table.to_string(),
        hidden_ids,
    };
    let ack: Ack = api::post_json("/hidden_rows/set/", &update).await?;
    if ack.is_success() {
        Ok(())
    } else {
        Err(ack.message.unwrap_or_else(|| "Не удалось сохранить скрытые строки".to_string()))
    }
}

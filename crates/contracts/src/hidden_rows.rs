//! Серверное хранилище скрытых строк: `GET/POST hidden_rows/get|set/`.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HiddenRowsState {
    #[serde(default)]
    pub hidden_ids: Vec<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HiddenRowsUpdate {
    pub table: String,
    pub hidden_ids: Vec<i64>,
}

//! Справочные списки для выпадающих селектов.

use serde::{Deserialize, Serialize};

/// Элемент списка `{id, name}`, как его отдают lookup-эндпоинты
/// (`clients/list/`, `suppliers/list/`, `accounts/list/?supplier_id=…`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LookupItem {
    pub id: i64,
    pub name: String,
}

/// Данные клиента для автоподстановки процентов в форме транзакции.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientRates {
    #[serde(default)]
    pub percentage: Option<f64>,
    #[serde(default)]
    pub bonus_percentage: Option<f64>,
}

/// Данные поставщика для автоподстановки процента себестоимости.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SupplierRates {
    #[serde(default)]
    pub cost_percentage: Option<f64>,
}

/// Обёртка `{ data: ... }` эндпоинтов записи `GET <entity>/<id>/`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordEnvelope<T> {
    pub data: T,
}

//! Ответ `GET company_balance_stats/` — блоки актива/пассива.

use serde::{Deserialize, Serialize};

/// Строка внутри группы ("филиал — сумма").
///
/// Агрегированные строки приходят без `id`; редактировать и удалять
/// можно только записи с идентификатором.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BalanceItem {
    #[serde(default)]
    pub id: Option<i64>,
    pub name: String,
    #[serde(default)]
    pub amount: f64,
    /// Готовая строка суммы, если сервер уже отформатировал её.
    #[serde(default)]
    pub formatted_total: Option<String>,
}

/// Раскрываемая группа списка баланса.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BalanceGroup {
    #[serde(default)]
    pub total: f64,
    #[serde(default)]
    pub formatted_total: Option<String>,
    #[serde(default)]
    pub items: Vec<BalanceItem>,
    /// Вместо позиций группа может прийти готовой таблицей.
    #[serde(default)]
    pub table_html: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CurrentAssets {
    #[serde(default)]
    pub inventory: BalanceGroup,
    #[serde(default)]
    pub debtors: BalanceGroup,
    #[serde(default)]
    pub cash: BalanceGroup,
}

/// Именованный блок пассивов (кредиты, обязательства, прибыль...).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LiabilityBlock {
    pub name: String,
    #[serde(default)]
    pub amount: f64,
    #[serde(default)]
    pub formatted_total: Option<String>,
    #[serde(default)]
    pub items: Vec<BalanceItem>,
    #[serde(default)]
    pub table_html: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Liabilities {
    #[serde(default)]
    pub total: f64,
    #[serde(default)]
    pub items: Vec<LiabilityBlock>,
    #[serde(default)]
    pub capital: Option<BalanceItemValue>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BalanceItemValue {
    #[serde(default)]
    pub value: f64,
    #[serde(default)]
    pub formatted: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CompanyBalanceStats {
    #[serde(default)]
    pub assets_total: f64,
    #[serde(default)]
    pub current_assets: CurrentAssets,
    #[serde(default)]
    pub liabilities: Liabilities,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn item_id_is_optional() {
        let aggregated: BalanceItem =
            serde_json::from_str(r#"{"name": "Склад", "amount": 100.0}"#).unwrap();
        assert_eq!(aggregated.id, None);

        let editable: BalanceItem =
            serde_json::from_str(r#"{"id": 7, "name": "Кредит", "amount": 50.0}"#).unwrap();
        assert_eq!(editable.id, Some(7));
    }
}

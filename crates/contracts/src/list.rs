//! Ответы списочных эндпоинтов `GET <entity>/list/?page=N`.
//!
//! Сервер отдаёт отрендеренные строки таблицы плюс типизированный
//! контекст; клиент разбирает фрагмент в реестр строк и навешивает
//! идентификаторы из контекста.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::money::is_zero_amount;

/// Общая форма ответа пагинации: HTML-фрагмент тела таблицы + контекст.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListPage<C> {
    pub html: String,
    pub context: C,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PageInfo {
    pub current_page: u32,
    pub total_pages: u32,
}

/// Контекст без доменных дополнений (поставщики, клиенты, пользователи...).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimpleContext {
    #[serde(flatten)]
    pub page: PageInfo,
    #[serde(default)]
    pub ids: Vec<i64>,
}

/// Долговое значение из серверных массивов: число либо денежная строка.
/// Отсутствующее значение трактуется как ноль (как в исходных данных).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DebtValue {
    Number(f64),
    Text(String),
}

impl DebtValue {
    pub fn is_zero(&self) -> bool {
        match self {
            DebtValue::Number(n) => *n == 0.0,
            DebtValue::Text(s) => is_zero_amount(s),
        }
    }
}

/// Отсутствующий долг считается погашенным.
pub fn debt_is_zero(value: Option<&DebtValue>) -> bool {
    value.map(DebtValue::is_zero).unwrap_or(true)
}

/// Позиционные массивы вторичных долгов по строкам таблицы транзакций.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DebtColumns {
    #[serde(default)]
    pub supplier_debts: Vec<Option<DebtValue>>,
    #[serde(default)]
    pub bonus_debt: Vec<Option<DebtValue>>,
    #[serde(default)]
    pub client_debt: Vec<Option<DebtValue>>,
    #[serde(default)]
    pub investor_debt: Vec<Option<DebtValue>>,
}

/// Какие процентные ячейки строки менялись на сервере.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct ChangedCells {
    #[serde(default)]
    pub client_percentage: bool,
    #[serde(default)]
    pub supplier_percentage: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransactionContext {
    #[serde(flatten)]
    pub page: PageInfo,
    #[serde(default)]
    pub ids: Vec<i64>,
    /// id строки -> отметки изменённых ячеек.
    #[serde(default)]
    pub changed_cells: HashMap<String, ChangedCells>,
    #[serde(default)]
    pub debts: DebtColumns,
    /// Транзакции, изменённые с последнего просмотра (мигающие строки).
    #[serde(default)]
    pub modified_ids: Vec<i64>,
}

/// Страница обмена целиком: по фрагменту на каждую сторону.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExchangePage {
    pub from_us_html: String,
    pub to_us_html: String,
    pub context: ExchangeContext,
}

/// Контекст страницы обмена: две таблицы, завершённые и учитываемые id.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExchangeContext {
    #[serde(default)]
    pub from_us_ids: Vec<i64>,
    #[serde(default)]
    pub to_us_ids: Vec<i64>,
    #[serde(default)]
    pub from_us_completed: Vec<i64>,
    #[serde(default)]
    pub to_us_completed: Vec<i64>,
    #[serde(default)]
    pub counted_from_us: Vec<i64>,
    #[serde(default)]
    pub counted_to_us: Vec<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debt_value_zero_forms() {
        assert!(DebtValue::Number(0.0).is_zero());
        assert!(DebtValue::Text("0 р.".into()).is_zero());
        assert!(DebtValue::Text("0,00 р.".into()).is_zero());
        assert!(!DebtValue::Text("15 р.".into()).is_zero());
        assert!(debt_is_zero(None));
    }

    #[test]
    fn transaction_context_decodes_sparse_payload() {
        let ctx: TransactionContext = serde_json::from_str(
            r#"{"current_page": 2, "total_pages": 5, "ids": [10, 11],
                "debts": {"bonus_debt": [0, "0,00 р.", null]},
                "changed_cells": {"10": {"client_percentage": true}}}"#,
        )
        .unwrap();
        assert_eq!(ctx.page.current_page, 2);
        assert_eq!(ctx.ids, vec![10, 11]);
        assert!(ctx.debts.bonus_debt[0].as_ref().unwrap().is_zero());
        assert!(ctx.debts.bonus_debt[2].is_none());
        assert!(ctx.changed_cells["10"].client_percentage);
        assert!(!ctx.changed_cells["10"].supplier_percentage);
    }
}

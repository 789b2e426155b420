//! Ответы мутаций `POST <entity>/add|edit|delete/` и прочих действий.
//!
//! Форма ответа раньше угадывалась по наличию полей; здесь она
//! зафиксирована и проверяется на границе десериализацией.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::list::{ChangedCells, DebtValue};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MutationKind {
    Create,
    Edit,
    Delete,
}

/// Сторона обмена / перевода денег.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransferSide {
    FromUs,
    ToUs,
}

/// Долги одной строки после мутации.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RowDebts {
    #[serde(default)]
    pub supplier_debt: Option<DebtValue>,
    #[serde(default)]
    pub bonus_debt: Option<DebtValue>,
    #[serde(default)]
    pub client_debt: Option<DebtValue>,
    #[serde(default)]
    pub investor_debt: Option<DebtValue>,
}

/// Результат успешной мутации записи.
///
/// `html` — отрендеренная строка для точечного патча таблицы; поля
/// обмена заполняются только эндпоинтами money_transfers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MutationResult {
    #[serde(rename = "type")]
    pub kind: MutationKind,
    pub id: i64,
    #[serde(default)]
    pub html: Option<String>,
    #[serde(default)]
    pub changed_cells: Option<HashMap<String, ChangedCells>>,
    #[serde(default)]
    pub debts: Option<RowDebts>,
    #[serde(default)]
    pub transfer_type: Option<TransferSide>,
    #[serde(default)]
    pub old_transfer_type: Option<TransferSide>,
    #[serde(default)]
    pub from_us_completed: Vec<i64>,
    #[serde(default)]
    pub to_us_completed: Vec<i64>,
    #[serde(default)]
    pub counted_from_us: Vec<i64>,
    #[serde(default)]
    pub counted_to_us: Vec<i64>,
    /// Итоговый долг после погашения (suppliers/settle-debt/).
    #[serde(default)]
    pub total_debt: Option<DebtValue>,
}

/// Подтверждение действия без данных строки.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ack {
    pub status: String,
    #[serde(default)]
    pub message: Option<String>,
}

impl Ack {
    pub fn is_success(&self) -> bool {
        self.status == "success"
    }
}

/// Тело ошибки, которое сервер кладёт в не-2xx ответ.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub message: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mutation_result_tagged_by_type() {
        let res: MutationResult = serde_json::from_str(
            r#"{"type": "edit", "id": 7, "html": "<tr></tr>",
                "transfer_type": "from_us", "old_transfer_type": "to_us",
                "counted_from_us": [7]}"#,
        )
        .unwrap();
        assert_eq!(res.kind, MutationKind::Edit);
        assert_eq!(res.transfer_type, Some(TransferSide::FromUs));
        assert_eq!(res.old_transfer_type, Some(TransferSide::ToUs));
        assert_eq!(res.counted_from_us, vec![7]);
    }

    #[test]
    fn unknown_kind_is_a_decode_error() {
        let res: Result<MutationResult, _> =
            serde_json::from_str(r#"{"type": "upsert", "id": 1}"#);
        assert!(res.is_err());
    }

    #[test]
    fn ack_status() {
        let ack: Ack = serde_json::from_str(r#"{"status": "success"}"#).unwrap();
        assert!(ack.is_success());
        let ack: Ack =
            serde_json::from_str(r#"{"status": "error", "message": "Недостаточно средств"}"#)
                .unwrap();
        assert!(!ack.is_success());
    }
}

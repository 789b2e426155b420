//! Ответ `GET debtors-office/data/` — должники по группам.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DebtorEntry {
    pub name: String,
    #[serde(default)]
    pub amount: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DebtorGroup {
    pub name: String,
    #[serde(default)]
    pub total: f64,
    #[serde(default)]
    pub items: Vec<DebtorEntry>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DebtorsReport {
    #[serde(default)]
    pub groups: Vec<DebtorGroup>,
    #[serde(default)]
    pub total: f64,
}

//! Модель формы записи: значения полей, проверка и сериализация.
//!
//! Поля объявляются заранее, состояние живёт в сигналах, а не в DOM;
//! отправка собирает пары `имя=значение` для urlencoded-тела.

use contracts::money::{format_amount, parse_amount};
use leptos::prelude::*;
use std::collections::HashMap;

#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    pub name: &'static str,
    pub label: &'static str,
    pub required: bool,
    /// Денежное поле: отображается в каноничном формате, на сервер
    /// уходит голым числом.
    pub money: bool,
}

impl FieldSpec {
    pub const fn text(name: &'static str, label: &'static str) -> Self {
        Self {
            name,
            label,
            required: false,
            money: false,
        }
    }

    pub const fn required(name: &'static str, label: &'static str) -> Self {
        Self {
            name,
            label,
            required: true,
            money: false,
        }
    }

    pub const fn money(name: &'static str, label: &'static str) -> Self {
        Self {
            name,
            label,
            required: true,
            money: true,
        }
    }
}

#[derive(Clone)]
struct Field {
    spec: FieldSpec,
    value: RwSignal<String>,
    initial: String,
}

#[derive(Clone)]
pub struct FormModel {
    fields: Vec<Field>,
}

impl FormModel {
    pub fn new(specs: &[FieldSpec]) -> Self {
        Self::with_values(specs, &HashMap::new())
    }

    /// Форма редактирования: стартовые значения приходят с сервера.
    pub fn with_values(specs: &[FieldSpec], values: &HashMap<String, String>) -> Self {
        let fields = specs
            .iter()
            .map(|spec| {
                let mut initial = values.get(spec.name).cloned().unwrap_or_default();
                if spec.money {
                    if let Some(amount) = parse_amount(&initial) {
                        initial = format_amount(amount);
                    }
                }
                Field {
                    spec: *spec,
                    value: RwSignal::new(initial.clone()),
                    initial,
                }
            })
            .collect();
        Self { fields }
    }

    fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.spec.name == name)
    }

    pub fn value(&self, name: &str) -> RwSignal<String> {
        match self.field(name) {
            Some(f) => f.value,
            None => {
                log::error!("form has no field {name}");
                RwSignal::new(String::new())
            }
        }
    }

    pub fn set(&self, name: &str, value: impl Into<String>) {
        if let Some(f) = self.field(name) {
            f.value.set(value.into());
        }
    }

    pub fn get(&self, name: &str) -> String {
        self.field(name)
            .map(|f| f.value.get_untracked())
            .unwrap_or_default()
    }

    /// Есть ли несохранённые правки (охрана закрытия окна).
    pub fn is_dirty(&self) -> bool {
        self.fields
            .iter()
            .any(|f| f.value.get_untracked() != f.initial)
    }

    /// Подписи обязательных полей, оставшихся пустыми.
    pub fn missing_required(&self) -> Vec<&'static str> {
        self.fields
            .iter()
            .filter(|f| f.spec.required && f.value.get_untracked().trim().is_empty())
            .map(|f| f.spec.label)
            .collect()
    }

    /// Пары для отправки. Денежные значения нормализуются в число,
    /// нераспознанная сумма уходит как есть и отклоняется сервером.
    pub fn pairs(&self) -> Vec<(String, String)> {
        self.fields
            .iter()
            .map(|f| {
                let raw = f.value.get_untracked();
                let value = if f.spec.money {
                    match parse_amount(&raw) {
                        Some(amount) => {
                            if amount == amount.trunc() {
                                format!("{}", amount as i64)
                            } else {
                                format!("{amount:.2}")
                            }
                        }
                        None => raw,
                    }
                } else {
                    raw
                };
                (f.spec.name.to_string(), value)
            })
            .collect()
    }
}

/// Сегодняшняя дата в ISO для предзаполнения форм добавления.
pub fn today_iso() -> String {
    let now = js_sys::Date::new_0();
    format!(
        "{:04}-{:02}-{:02}",
        now.get_full_year(),
        now.get_month() + 1,
        now.get_date()
    )
}

/// Значения записи из JSON-ответа сервера в стартовые значения формы.
/// null пропускается, числа и булевы приводятся к строке.
pub fn values_from_json(map: &HashMap<String, serde_json::Value>) -> HashMap<String, String> {
    map.iter()
        .filter_map(|(key, value)| {
            let text = match value {
                serde_json::Value::String(s) => s.clone(),
                serde_json::Value::Number(n) => n.to_string(),
                serde_json::Value::Bool(b) => b.to_string(),
                _ => return None,
            };
            Some((key.clone(), text))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SPECS: &[FieldSpec] = &[
        FieldSpec::required("name", "Название"),
        FieldSpec::money("amount", "Сумма"),
        FieldSpec::text("comment", "Комментарий"),
    ];

    #[test]
    fn missing_required_lists_empty_fields() {
        let form = FormModel::new(SPECS);
        assert_eq!(form.missing_required(), vec!["Название", "Сумма"]);

        form.set("name", "ООО Ромашка");
        form.set("amount", "1 500 р.");
        assert!(form.missing_required().is_empty());
    }

    #[test]
    fn dirty_tracks_changes_from_initial() {
        let mut values = HashMap::new();
        values.insert("name".to_string(), "Иванов".to_string());
        let form = FormModel::with_values(SPECS, &values);
        assert!(!form.is_dirty());

        form.set("comment", "срочно");
        assert!(form.is_dirty());

        form.set("comment", "");
        assert!(!form.is_dirty());
    }

    #[test]
    fn money_fields_are_sent_as_plain_numbers() {
        let form = FormModel::new(SPECS);
        form.set("name", "x");
        form.set("amount", "12 500,50 р.");
        let pairs = form.pairs();
        assert!(pairs.contains(&("amount".to_string(), "12500.50".to_string())));

        form.set("amount", "3 000 р.");
        let pairs = form.pairs();
        assert!(pairs.contains(&("amount".to_string(), "3000".to_string())));
    }

    #[test]
    fn json_values_become_form_strings() {
        let mut map = HashMap::new();
        map.insert("name".to_string(), serde_json::json!("Иванов"));
        map.insert("amount".to_string(), serde_json::json!(1500.5));
        map.insert("account_id".to_string(), serde_json::Value::Null);
        let values = values_from_json(&map);
        assert_eq!(values.get("name").map(String::as_str), Some("Иванов"));
        assert_eq!(values.get("amount").map(String::as_str), Some("1500.5"));
        assert!(!values.contains_key("account_id"));
    }

    #[test]
    fn initial_money_value_is_reformatted() {
        let mut values = HashMap::new();
        values.insert("amount".to_string(), "12500.5".to_string());
        let form = FormModel::with_values(SPECS, &values);
        assert_eq!(form.get("amount"), "12 500,50 р.");
    }
}

//! Даты: сервер отдаёт и принимает ISO (`2026-03-12`), в интерфейсе
//! показывается `12.03.2026`.

use chrono::NaiveDate;

pub const ISO_FORMAT: &str = "%Y-%m-%d";
pub const DISPLAY_FORMAT: &str = "%d.%m.%Y";

pub fn parse_iso(text: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(text.trim(), ISO_FORMAT).ok()
}

/// ISO-строка в отображаемую; невалидная дата возвращается как есть.
pub fn display_date(iso: &str) -> String {
    match parse_iso(iso) {
        Some(date) => date.format(DISPLAY_FORMAT).to_string(),
        None => iso.to_string(),
    }
}

/// Валидна ли дата из `<input type="date">`.
pub fn is_valid_iso(text: &str) -> bool {
    parse_iso(text).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn iso_to_display() {
        assert_eq!(display_date("2026-03-12"), "12.03.2026");
        assert_eq!(display_date("каждый день"), "каждый день");
    }

    #[test]
    fn validation() {
        assert!(is_valid_iso("2026-02-28"));
        assert!(!is_valid_iso("2026-02-30"));
        assert!(!is_valid_iso(""));
    }
}

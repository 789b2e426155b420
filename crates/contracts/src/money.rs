//! Канонический формат денежных значений: "1 234 р." / "1 234,56 р."
//!
//! Парсинг и форматирование должны совпадать с тем, что рендерит сервер,
//! иначе клиентские итоги разойдутся с серверными.

/// Суффикс валюты, как его рендерит сервер.
pub const CURRENCY_SUFFIX: &str = " р.";

/// Разбирает денежную строку в число.
///
/// Убирает пробелы-разделители тысяч и суффикс "р.", запятую считает
/// десятичным разделителем. Нечисловой текст — `None` (такая ячейка
/// пропускается при агрегации, это не ошибка).
pub fn parse_amount(text: &str) -> Option<f64> {
    let cleaned: String = text
        .trim()
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect();
    let cleaned = cleaned.replace("р.", "").replace('р', "").replace(',', ".");
    if cleaned.is_empty() {
        return None;
    }
    cleaned.parse::<f64>().ok()
}

/// Форматирует число в каноническую денежную строку.
///
/// Тысячи разделяются пробелом, дробная часть — запятой; ",00"
/// отбрасывается, суффикс " р." добавляется всегда.
///
/// # Примеры
///
/// ```
/// use contracts::money::format_amount;
/// assert_eq!(format_amount(1234.0), "1 234 р.");
/// assert_eq!(format_amount(-1234.5), "-1 234,50 р.");
/// ```
pub fn format_amount(value: f64) -> String {
    if value == 0.0 {
        return format!("0{}", CURRENCY_SUFFIX);
    }

    let fixed = format!("{:.2}", value);
    let (int_part, dec_part) = match fixed.split_once('.') {
        Some((i, d)) => (i, d),
        None => (fixed.as_str(), "00"),
    };

    // Пробел каждые 3 цифры с конца целой части, знак не отделяем.
    let mut grouped = String::new();
    let reversed: Vec<char> = int_part.chars().rev().collect();
    for (i, c) in reversed.iter().enumerate() {
        if i > 0 && i % 3 == 0 && *c != '-' {
            grouped.push(' ');
        }
        grouped.push(*c);
    }
    let int_grouped: String = grouped.chars().rev().collect();

    if dec_part == "00" {
        format!("{}{}", int_grouped, CURRENCY_SUFFIX)
    } else {
        format!("{},{}{}", int_grouped, dec_part, CURRENCY_SUFFIX)
    }
}

/// Пере-канонизация: текст, который парсится как число, приводится к
/// каноническому виду; остальной текст возвращается как есть.
pub fn reformat_amount(text: &str) -> String {
    match parse_amount(text) {
        Some(num) => format_amount(num),
        None => text.to_string(),
    }
}

/// Нулевая денежная строка: "0", "0 р.", "0,00 р.", "0.00" и т.п.
pub fn is_zero_amount(text: &str) -> bool {
    matches!(parse_amount(text), Some(v) if v == 0.0)
}

/// Процентные поля форм: одна цифра после точки, суффикс "%".
pub fn format_percent(value: f64) -> String {
    format!("{:.1}%", value)
}

pub fn parse_percent(text: &str) -> Option<f64> {
    let cleaned: String = text
        .trim()
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '%')
        .collect();
    let cleaned = cleaned.replace(',', ".");
    if cleaned.is_empty() {
        return None;
    }
    cleaned.parse::<f64>().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_amount() {
        assert_eq!(parse_amount("1 234 р."), Some(1234.0));
        assert_eq!(parse_amount("0,00 р."), Some(0.0));
        assert_eq!(parse_amount("-1 234,56 р."), Some(-1234.56));
        assert_eq!(parse_amount("1234567"), Some(1234567.0));
        assert_eq!(parse_amount("0.00"), Some(0.0));
        assert_eq!(parse_amount("Перевод"), None);
        assert_eq!(parse_amount(""), None);
    }

    #[test]
    fn test_format_amount() {
        assert_eq!(format_amount(1234.0), "1 234 р.");
        assert_eq!(format_amount(1234567.89), "1 234 567,89 р.");
        assert_eq!(format_amount(0.0), "0 р.");
        assert_eq!(format_amount(-0.0), "0 р.");
        assert_eq!(format_amount(-1234.5), "-1 234,50 р.");
        assert_eq!(format_amount(50.0), "50 р.");
    }

    #[test]
    fn test_round_trip_canonical_forms() {
        for canonical in ["1 234 р.", "0 р.", "-1 234,56 р.", "12 р.", "1 000 000 р."] {
            let parsed = parse_amount(canonical).unwrap();
            assert_eq!(format_amount(parsed), canonical);
        }
    }

    #[test]
    fn test_is_zero_amount() {
        assert!(is_zero_amount("0"));
        assert!(is_zero_amount("0 р."));
        assert!(is_zero_amount("0,00 р."));
        assert!(is_zero_amount("0.00"));
        assert!(!is_zero_amount("10 р."));
        assert!(!is_zero_amount("Инкассация"));
    }

    #[test]
    fn test_reformat_amount() {
        assert_eq!(reformat_amount("1234,50"), "1 234,50 р.");
        assert_eq!(reformat_amount("Итого"), "Итого");
    }

    #[test]
    fn test_percent() {
        assert_eq!(format_percent(12.5), "12.5%");
        assert_eq!(parse_percent("12.5%"), Some(12.5));
        assert_eq!(parse_percent("12,5 %"), Some(12.5));
        assert_eq!(parse_percent(""), None);
    }
}

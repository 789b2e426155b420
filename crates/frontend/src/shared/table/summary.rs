//! Пересчёт итоговых строк.
//!
//! Итог считается по видимым строкам: скрытие или удаление строки
//! сразу меняет сумму.

use super::state::{Row, TableState};
use contracts::money::{format_amount, parse_amount};
use std::collections::HashSet;

const NEGATIVE_TOTAL_CLASS: &str = "text-red";
const POSITIVE_TOTAL_CLASS: &str = "text-green";

/// Сумма денежной колонки по видимым строкам данных.
pub fn column_total(
    table: &TableState,
    col: usize,
    hidden: &HashSet<i64>,
    show_all: bool,
) -> f64 {
    table
        .visible_rows(hidden, show_all)
        .filter(|r| !r.is_summary())
        .filter_map(|r| r.cells.get(col))
        .filter_map(|c| parse_amount(&c.text))
        .sum()
}

/// Обновляет итоговую строку: для каждой денежной колонки пишет сумму
/// видимых строк и красит её по знаку (минус красным, плюс зелёным,
/// ноль без подсветки), остальные ячейки итога не трогает.
pub fn refresh_summary(table: &mut TableState, hidden: &HashSet<i64>, show_all: bool) {
    let currency_cols: Vec<usize> = table
        .rows
        .iter()
        .find(|r| !r.is_summary())
        .map(|r| {
            r.cells
                .iter()
                .enumerate()
                .filter(|(_, c)| c.is_currency())
                .map(|(i, _)| i)
                .collect()
        })
        .unwrap_or_default();

    let totals: Vec<(usize, f64)> = currency_cols
        .into_iter()
        .map(|col| (col, column_total(table, col, hidden, show_all)))
        .collect();

    for row in &mut table.rows {
        if !row.is_summary() {
            continue;
        }
        for (col, total) in &totals {
            if let Some(cell) = row.cells.get_mut(*col) {
                let formatted = format_amount(*total);
                cell.text = formatted.clone();
                cell.html = formatted;
                cell.classes
                    .retain(|c| c != NEGATIVE_TOTAL_CLASS && c != POSITIVE_TOTAL_CLASS);
                if *total < 0.0 {
                    cell.classes.push(NEGATIVE_TOTAL_CLASS.to_string());
                } else if *total > 0.0 {
                    cell.classes.push(POSITIVE_TOTAL_CLASS.to_string());
                }
            }
        }
    }
}

/// Промежуточные итоги по группам (движение денег группируется по
/// дате): ключ группы — текст ячейки `group_col`.
pub fn grouped_subtotals(rows: &[Row], group_col: usize, amount_col: usize) -> Vec<(String, f64)> {
    let mut order: Vec<String> = Vec::new();
    let mut totals: Vec<f64> = Vec::new();
    for row in rows.iter().filter(|r| !r.is_summary()) {
        let key = row
            .cells
            .get(group_col)
            .map(|c| c.text.clone())
            .unwrap_or_default();
        let amount = row
            .cells
            .get(amount_col)
            .and_then(|c| parse_amount(&c.text))
            .unwrap_or(0.0);
        match order.iter().position(|k| *k == key) {
            Some(idx) => totals[idx] += amount,
            None => {
                order.push(key);
                totals.push(amount);
            }
        }
    }
    order.into_iter().zip(totals).collect()
}

/// Сошлись ли суммы двух сторон обмена (с копеечным допуском).
pub fn sides_match(from_total: f64, to_total: f64) -> bool {
    (from_total - to_total).abs() < 0.005
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::table::state::{Cell, CURRENCY_CELL_CLASS, SUMMARY_ROW_CLASS};

    fn cell(text: &str, currency: bool) -> Cell {
        Cell {
            column: String::new(),
            html: text.to_string(),
            text: text.to_string(),
            classes: if currency {
                vec![CURRENCY_CELL_CLASS.to_string()]
            } else {
                Vec::new()
            },
        }
    }

    fn data_row(name: &str, amount: &str) -> Row {
        Row {
            id: 0,
            cells: vec![cell(name, false), cell(amount, true)],
            classes: Vec::new(),
        }
    }

    fn sample() -> TableState {
        let mut table = TableState::new("cash-flow");
        let summary = Row {
            id: 0,
            cells: vec![cell("Итого", false), cell("", true)],
            classes: vec![SUMMARY_ROW_CLASS.to_string()],
        };
        table.replace_rows(
            vec![
                data_row("аренда", "1 000 р."),
                data_row("закупка", "2 500,50 р."),
                data_row("бонус", "499,50 р."),
                summary,
            ],
            &[1, 2, 3],
        );
        table
    }

    #[test]
    fn summary_sums_visible_rows() {
        let mut table = sample();
        let hidden = HashSet::new();
        refresh_summary(&mut table, &hidden, false);
        assert_eq!(table.rows[3].cells[1].text, "4 000 р.");
    }

    #[test]
    fn hiding_a_row_shrinks_the_total() {
        let mut table = sample();
        let hidden: HashSet<i64> = [2].into_iter().collect();
        refresh_summary(&mut table, &hidden, false);
        assert_eq!(table.rows[3].cells[1].text, "1 499,50 р.");

        // режим "показать все" возвращает полную сумму
        refresh_summary(&mut table, &hidden, true);
        assert_eq!(table.rows[3].cells[1].text, "4 000 р.");
    }

    #[test]
    fn summary_total_is_colored_by_sign() {
        let mut table = TableState::new("money-transfers");
        let summary = Row {
            id: 0,
            cells: vec![cell("Итого", false), cell("", true)],
            classes: vec![SUMMARY_ROW_CLASS.to_string()],
        };
        table.replace_rows(
            vec![
                data_row("обмен", "100 р."),
                data_row("обмен", "-50 р."),
                data_row("обмен", "0 р."),
                summary,
            ],
            &[1, 2, 3],
        );
        let hidden = HashSet::new();

        refresh_summary(&mut table, &hidden, false);
        assert_eq!(table.rows[3].cells[1].text, "50 р.");
        assert!(table.rows[3].cells[1].has_class("text-green"));

        // знак сменился: красный вытесняет зелёный
        table.set_cell(1, 1, "-100 р.".to_string());
        refresh_summary(&mut table, &hidden, false);
        assert!(table.rows[3].cells[1].has_class("text-red"));
        assert!(!table.rows[3].cells[1].has_class("text-green"));

        // ноль остаётся без подсветки
        table.set_cell(1, 1, "50 р.".to_string());
        refresh_summary(&mut table, &hidden, false);
        assert!(!table.rows[3].cells[1].has_class("text-red"));
        assert!(!table.rows[3].cells[1].has_class("text-green"));
    }

    #[test]
    fn removing_a_row_updates_the_total() {
        let mut table = sample();
        table.remove_row(1);
        let hidden = HashSet::new();
        refresh_summary(&mut table, &hidden, false);
        assert_eq!(table.rows[2].cells[1].text, "3 000 р.");
    }

    #[test]
    fn subtotals_keep_group_order() {
        let rows = vec![
            data_row("12.03.2026", "100 р."),
            data_row("12.03.2026", "50 р."),
            data_row("13.03.2026", "7 р."),
        ];
        let subtotals = grouped_subtotals(&rows, 0, 1);
        assert_eq!(
            subtotals,
            vec![("12.03.2026".to_string(), 150.0), ("13.03.2026".to_string(), 7.0)]
        );
    }

    #[test]
    fn exchange_sides_comparison() {
        assert!(sides_match(100.0, 100.0));
        assert!(sides_match(100.004, 100.0));
        assert!(!sides_match(100.02, 100.0));
    }
}

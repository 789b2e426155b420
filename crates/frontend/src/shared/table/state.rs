//! Реестр строк таблицы.
//!
//! Единственный владелец состояния: строки попадают сюда один раз на
//! границе (разбор серверного фрагмента), дальше всё чтение и правки
//! идут через реестр, а DOM лишь отражает его.

use contracts::money::{is_zero_amount, reformat_amount};
use std::collections::HashSet;

pub const SUMMARY_ROW_CLASS: &str = "table__row--summary";
pub const DONE_ROW_CLASS: &str = "row-done";
pub const BLINKING_ROW_CLASS: &str = "table__row--blinking";
pub const CURRENCY_CELL_CLASS: &str = "table__cell--currency";
pub const SELECTED_CELL_CLASS: &str = "table__cell--selected";

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Cell {
    /// Идентификатор колонки, назначается после разбора фрагмента.
    pub column: String,
    pub html: String,
    pub text: String,
    pub classes: Vec<String>,
}

impl Cell {
    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    pub fn is_currency(&self) -> bool {
        self.has_class(CURRENCY_CELL_CLASS)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Row {
    /// Ноль до привязки идентификаторов из контекста страницы.
    pub id: i64,
    pub cells: Vec<Cell>,
    pub classes: Vec<String>,
}

impl Row {
    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    pub fn is_summary(&self) -> bool {
        self.has_class(SUMMARY_ROW_CLASS)
    }

    pub fn set_class(&mut self, class: &str, on: bool) {
        let present = self.has_class(class);
        if on && !present {
            self.classes.push(class.to_string());
        } else if !on && present {
            self.classes.retain(|c| c != class);
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct TableState {
    pub name: String,
    pub rows: Vec<Row>,
    /// Выбранные ячейки: (id строки, индекс колонки). Набор временный,
    /// живёт до перезагрузки страницы и питает массовое скрытие.
    pub selected: HashSet<(i64, usize)>,
}

impl TableState {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            rows: Vec::new(),
            selected: HashSet::new(),
        }
    }

    /// Заменяет строки новой страницей и навешивает идентификаторы.
    pub fn replace_rows(&mut self, rows: Vec<Row>, ids: &[i64]) {
        self.rows = rows;
        self.selected.clear();
        self.assign_row_ids(ids);
        self.assign_column_ids();
        self.format_currency_cells();
    }

    pub fn clear(&mut self) {
        self.rows.clear();
        self.selected.clear();
    }

    /// Позиционная привязка id из контекста; итоговые строки
    /// идентификаторов не получают. При расхождении числа строк и id
    /// привязка не выполняется вовсе, частичное назначение хуже
    /// отсутствующего.
    pub fn assign_row_ids(&mut self, ids: &[i64]) {
        let data_rows = self.rows.iter().filter(|r| !r.is_summary()).count();
        if data_rows != ids.len() {
            log::error!(
                "table {}: {} rows vs {} ids, skipping id assignment",
                self.name,
                data_rows,
                ids.len()
            );
            return;
        }
        let mut ids = ids.iter().copied();
        for row in &mut self.rows {
            if row.is_summary() {
                continue;
            }
            if let Some(id) = ids.next() {
                row.id = id;
            }
        }
    }

    pub fn has_blinking(&self) -> bool {
        self.rows.iter().any(|r| r.has_class(BLINKING_ROW_CLASS))
    }

    pub fn assign_column_ids(&mut self) {
        let name = self.name.clone();
        for row in &mut self.rows {
            for (idx, cell) in row.cells.iter_mut().enumerate() {
                cell.column = format!("{name}-col-{idx}");
            }
        }
    }

    /// Приводит денежные ячейки к каноничному виду.
    pub fn format_currency_cells(&mut self) {
        for row in &mut self.rows {
            for cell in &mut row.cells {
                if cell.is_currency() {
                    let formatted = reformat_amount(&cell.text);
                    if formatted != cell.text {
                        cell.text = formatted.clone();
                        cell.html = formatted;
                    }
                }
            }
        }
    }

    pub fn row(&self, id: i64) -> Option<&Row> {
        self.rows.iter().find(|r| !r.is_summary() && r.id == id)
    }

    pub fn row_mut(&mut self, id: i64) -> Option<&mut Row> {
        self.rows.iter_mut().find(|r| !r.is_summary() && r.id == id)
    }

    /// Заменяет строку по id либо вставляет новую перед остальными.
    pub fn upsert_row(&mut self, id: i64, mut row: Row) {
        row.id = id;
        let name = self.name.clone();
        for (idx, cell) in row.cells.iter_mut().enumerate() {
            cell.column = format!("{name}-col-{idx}");
            if cell.is_currency() {
                let formatted = reformat_amount(&cell.text);
                if formatted != cell.text {
                    cell.text = formatted.clone();
                    cell.html = formatted;
                }
            }
        }
        if let Some(existing) = self.row_mut(id) {
            *existing = row;
        } else {
            self.rows.insert(0, row);
        }
    }

    pub fn remove_row(&mut self, id: i64) {
        self.rows.retain(|r| r.is_summary() || r.id != id);
        self.selected.retain(|(sel_id, _)| *sel_id != id);
    }

    /// Клик по ячейке: повторный клик снимает выделение с неё, другие
    /// выделенные ячейки не трогаются.
    pub fn toggle_selection(&mut self, row_id: i64, col: usize) {
        if !self.selected.remove(&(row_id, col)) {
            self.selected.insert((row_id, col));
        }
    }

    pub fn is_selected(&self, row_id: i64, col: usize) -> bool {
        self.selected.contains(&(row_id, col))
    }

    /// Строки, затронутые выделением (для массового скрытия).
    pub fn selected_row_ids(&self) -> HashSet<i64> {
        self.selected.iter().map(|(id, _)| *id).collect()
    }

    pub fn clear_selection(&mut self) {
        self.selected.clear();
    }

    pub fn set_done(&mut self, id: i64, done: bool) {
        if let Some(row) = self.row_mut(id) {
            row.set_class(DONE_ROW_CLASS, done);
        }
    }

    pub fn is_done(&self, id: i64) -> bool {
        self.row(id).map(|r| r.has_class(DONE_ROW_CLASS)).unwrap_or(false)
    }

    pub fn mark_blinking(&mut self, ids: &[i64]) {
        let set: HashSet<i64> = ids.iter().copied().collect();
        for row in &mut self.rows {
            if !row.is_summary() {
                let on = set.contains(&row.id);
                row.set_class(BLINKING_ROW_CLASS, on);
            }
        }
    }

    /// Текст ячейки строки, пустая строка если ячейки нет.
    pub fn cell_text(&self, id: i64, col: usize) -> String {
        self.row(id)
            .and_then(|r| r.cells.get(col))
            .map(|c| c.text.clone())
            .unwrap_or_default()
    }

    pub fn set_cell(&mut self, id: i64, col: usize, text: String) {
        if let Some(row) = self.row_mut(id) {
            if let Some(cell) = row.cells.get_mut(col) {
                cell.html = text.clone();
                cell.text = text;
            }
        }
    }

    /// Денежная ячейка строки нулевая (пустая тоже считается нулём).
    pub fn cell_is_zero(&self, id: i64, col: usize) -> bool {
        let text = self.cell_text(id, col);
        text.trim().is_empty() || is_zero_amount(&text)
    }

    /// Строки к показу с учётом скрытых id и режима "показать все".
    pub fn visible_rows<'a>(
        &'a self,
        hidden: &'a HashSet<i64>,
        show_all: bool,
    ) -> impl Iterator<Item = &'a Row> {
        self.rows
            .iter()
            .filter(move |r| show_all || r.is_summary() || !hidden.contains(&r.id))
    }

    pub fn data_rows(&self) -> impl Iterator<Item = &Row> {
        self.rows.iter().filter(|r| !r.is_summary())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cell(text: &str, classes: &[&str]) -> Cell {
        Cell {
            column: String::new(),
            html: text.to_string(),
            text: text.to_string(),
            classes: classes.iter().map(|c| c.to_string()).collect(),
        }
    }

    fn row(cells: Vec<Cell>, classes: &[&str]) -> Row {
        Row {
            id: 0,
            cells,
            classes: classes.iter().map(|c| c.to_string()).collect(),
        }
    }

    fn sample() -> TableState {
        let mut table = TableState::new("transactions");
        table.replace_rows(
            vec![
                row(vec![cell("Иванов", &[]), cell("1500", &[CURRENCY_CELL_CLASS])], &[]),
                row(vec![cell("Петров", &[]), cell("0", &[CURRENCY_CELL_CLASS])], &[]),
                row(
                    vec![cell("Итого", &[]), cell("1500", &[CURRENCY_CELL_CLASS])],
                    &[SUMMARY_ROW_CLASS],
                ),
            ],
            &[10, 11],
        );
        table
    }

    #[test]
    fn ids_skip_summary_rows() {
        let mut table = sample();
        assert_eq!(table.rows[0].id, 10);
        assert_eq!(table.rows[1].id, 11);
        assert_eq!(table.rows[2].id, 0);
        assert!(table.rows[2].is_summary());

        // повторная привязка того же массива ничего не меняет
        table.assign_row_ids(&[10, 11]);
        assert_eq!(table.rows[0].id, 10);
        assert_eq!(table.rows[1].id, 11);
    }

    #[test]
    fn ids_mismatch_assigns_nothing() {
        let mut table = sample();
        // два ряда данных, один id: старые привязки остаются как были
        table.assign_row_ids(&[99]);
        assert_eq!(table.rows[0].id, 10);
        assert_eq!(table.rows[1].id, 11);

        table.assign_row_ids(&[1, 2, 3]);
        assert_eq!(table.rows[0].id, 10);
        assert_eq!(table.rows[1].id, 11);
    }

    #[test]
    fn column_ids_follow_position() {
        let table = sample();
        assert_eq!(table.rows[0].cells[0].column, "transactions-col-0");
        assert_eq!(table.rows[1].cells[1].column, "transactions-col-1");
    }

    #[test]
    fn currency_cells_are_canonicalized() {
        let table = sample();
        assert_eq!(table.rows[0].cells[1].text, "1 500 р.");
        assert_eq!(table.rows[1].cells[1].text, "0 р.");
        // обычная ячейка не трогается
        assert_eq!(table.rows[0].cells[0].text, "Иванов");
    }

    #[test]
    fn selection_accumulates_across_cells() {
        let mut table = sample();
        table.toggle_selection(10, 1);
        table.toggle_selection(11, 0);
        assert!(table.is_selected(10, 1));
        assert!(table.is_selected(11, 0));

        // повторный клик снимает только свою ячейку
        table.toggle_selection(11, 0);
        assert!(table.is_selected(10, 1));
        assert!(!table.is_selected(11, 0));
    }

    #[test]
    fn selected_rows_feed_bulk_hide() {
        let mut table = sample();
        table.toggle_selection(10, 0);
        table.toggle_selection(10, 1);
        table.toggle_selection(11, 1);

        let rows = table.selected_row_ids();
        assert_eq!(rows, [10, 11].into_iter().collect());

        // скрытие выделенных: строки уходят из видимых, выделение снято
        let hidden: HashSet<i64> = rows;
        let visible: Vec<i64> = table.visible_rows(&hidden, false).map(|r| r.id).collect();
        assert_eq!(visible, vec![0]);

        table.clear_selection();
        assert!(table.selected_row_ids().is_empty());
    }

    #[test]
    fn upsert_replaces_or_prepends() {
        let mut table = sample();
        table.upsert_row(11, row(vec![cell("Петров", &[]), cell("250", &[CURRENCY_CELL_CLASS])], &[]));
        assert_eq!(table.cell_text(11, 1), "250 р.");
        assert_eq!(table.data_rows().count(), 2);

        table.upsert_row(12, row(vec![cell("Сидоров", &[]), cell("50", &[CURRENCY_CELL_CLASS])], &[]));
        assert_eq!(table.rows[0].id, 12);
        assert_eq!(table.data_rows().count(), 3);
    }

    #[test]
    fn remove_drops_selection_with_row() {
        let mut table = sample();
        table.toggle_selection(10, 0);
        table.toggle_selection(11, 1);
        table.remove_row(10);
        assert!(table.row(10).is_none());
        assert!(!table.is_selected(10, 0));
        assert!(table.is_selected(11, 1));
    }

    #[test]
    fn hidden_rows_respect_show_all() {
        let table = sample();
        let hidden: HashSet<i64> = [11].into_iter().collect();

        let visible: Vec<i64> = table.visible_rows(&hidden, false).map(|r| r.id).collect();
        assert_eq!(visible, vec![10, 0]); // итоговая строка остаётся

        let visible: Vec<i64> = table.visible_rows(&hidden, true).map(|r| r.id).collect();
        assert_eq!(visible, vec![10, 11, 0]);
    }

    #[test]
    fn blinking_marks_are_cleared_in_bulk() {
        let mut table = sample();
        table.mark_blinking(&[10, 11]);
        assert!(table.has_blinking());
        assert!(table.rows[0].has_class(BLINKING_ROW_CLASS));
        assert!(!table.rows[2].has_class(BLINKING_ROW_CLASS));

        table.mark_blinking(&[]);
        assert!(!table.has_blinking());
    }

    #[test]
    fn zero_cell_detection() {
        let table = sample();
        assert!(table.cell_is_zero(11, 1));
        assert!(!table.cell_is_zero(10, 1));
    }
}

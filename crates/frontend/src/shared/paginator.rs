//! Состояние пагинатора, отделённое от DOM.
//!
//! Номер страницы всегда нормализуется до запроса, поэтому на сервер
//! не уходит ни нулевая страница, ни страница за последней.

/// Положение в списке страниц. Страницы нумеруются с единицы.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PagerState {
    pub current_page: u32,
    pub total_pages: u32,
}

impl PagerState {
    pub fn new(current_page: u32, total_pages: u32) -> Self {
        let total_pages = total_pages.max(1);
        Self {
            current_page: clamp_page(current_page as i64, total_pages),
            total_pages,
        }
    }

    pub fn has_prev(&self) -> bool {
        self.current_page > 1
    }

    pub fn has_next(&self) -> bool {
        self.current_page < self.total_pages
    }

    /// Нормализованный номер для запроса страницы `requested`.
    pub fn resolve(&self, requested: i64) -> u32 {
        clamp_page(requested, self.total_pages)
    }
}

/// Зажимает запрошенный номер в `[1, total_pages]`.
pub fn clamp_page(requested: i64, total_pages: u32) -> u32 {
    let total = total_pages.max(1) as i64;
    requested.clamp(1, total) as u32
}

/// Защита от устаревших ответов: применяется только ответ на последний
/// выданный токен. Тот же механизм используют каскадные селекты.
#[derive(Debug, Default, Clone, Copy)]
pub struct LoadToken {
    issued: u64,
}

impl LoadToken {
    pub fn issue(&mut self) -> u64 {
        self.issued += 1;
        self.issued
    }

    pub fn is_current(&self, token: u64) -> bool {
        token == self.issued
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_is_clamped_to_bounds() {
        assert_eq!(clamp_page(0, 5), 1);
        assert_eq!(clamp_page(-3, 5), 1);
        assert_eq!(clamp_page(3, 5), 3);
        assert_eq!(clamp_page(99, 5), 5);
        // пустой список ведёт себя как одна страница
        assert_eq!(clamp_page(1, 0), 1);
    }

    #[test]
    fn bounds_disable_controls() {
        let first = PagerState::new(1, 4);
        assert!(!first.has_prev());
        assert!(first.has_next());

        let last = PagerState::new(4, 4);
        assert!(last.has_prev());
        assert!(!last.has_next());

        let single = PagerState::new(1, 1);
        assert!(!single.has_prev());
        assert!(!single.has_next());
    }

    #[test]
    fn state_never_leaves_valid_range() {
        let state = PagerState::new(10, 4);
        assert_eq!(state.current_page, 4);
        let state = PagerState::new(0, 4);
        assert_eq!(state.current_page, 1);
    }

    #[test]
    fn only_latest_token_applies() {
        let mut tokens = LoadToken::default();
        let first = tokens.issue();
        let second = tokens.issue();
        assert!(!tokens.is_current(first));
        assert!(tokens.is_current(second));
    }
}

pub mod amount_input;
pub mod context_menu;
pub mod pagination_controls;
pub mod select_widget;

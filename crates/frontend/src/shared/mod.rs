pub mod api;
pub mod components;
pub mod data_island;
pub mod forms;
pub mod hidden_rows;
pub mod icons;
pub mod modal_stack;
pub mod paginator;
pub mod table;
pub mod toast;

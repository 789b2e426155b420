pub mod ingest;
pub mod state;
pub mod summary;
pub mod view;

pub use state::{Cell, Row, TableState};

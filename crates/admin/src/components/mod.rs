//! Reusable view components shared by page templates.

pub mod data_table;
pub mod notice;

pub use data_table::{DataTableConfig, SortDirection, SortState, TableColumn};
pub use notice::{Notice, NoticeKind, NoticeQuery};

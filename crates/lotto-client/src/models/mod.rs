pub mod draw;
pub mod table;

pub use draw::{COLUMNS, DecodeError, DrawRecord, FIELD_COUNT};
pub use table::{DrawTable, TableError};

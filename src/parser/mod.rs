pub mod record;
pub mod row;
pub mod table;


pub use record::{RawRow, Record};
pub use row::parse_row;
pub use table::{FailurePolicy, ParseOutcome, RejectedRow, Table, TableParser};

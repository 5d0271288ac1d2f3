pub mod app;
pub mod cli;
pub mod clock;
pub mod config;
pub mod error;
pub mod loader;
pub mod logging;
pub mod parser;
pub mod report;

pub use clock::TickClock;
pub use error::{DomainError, ParseError};
pub use parser::{RawRow, Record, Table, TableParser};
pub use report::{OutputMode, Reporter};

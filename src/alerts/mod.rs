//! Alert email extraction
//!
//! Turns scanner alert emails ("New symbols: AAPL, MSFT were added to
//! tmo_long") into a deduplicated table of (ticker, date, keyword) rows.

pub mod body;
pub mod cursor;
pub mod extractor;
pub mod mailbox;
pub mod scanner;
pub mod table;
pub mod template;

pub use cursor::ProcessedCursor;
pub use extractor::{AlertExtractor, Extraction};
pub use mailbox::{ImapMailSource, MailQuery, MailSource};
pub use scanner::AlertScanner;
pub use table::AlertTable;
pub use template::AlertTemplate;

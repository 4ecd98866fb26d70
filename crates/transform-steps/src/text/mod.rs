//! Text file steps
//!
//! Line- and occurrence-oriented edits over UTF-8 text files, plus the
//! inspections that feed them. Matching is plain substring matching; each
//! step documents how it behaves when nothing matches.

mod insert_line;
mod line_match;
mod read_text_file;
mod remove_line;
mod replace_text;

pub use insert_line::{InsertLine, InsertPosition};
pub use line_match::LineMatch;
pub use read_text_file::ReadTextFile;
pub use remove_line::RemoveLine;
pub use replace_text::ReplaceText;

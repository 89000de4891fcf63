//! recapsheet - End-of-Day Recap mail digester
//!
//! This crate ingests concatenated plain-text email bodies containing daily
//! "End-of-Day Recap" price-quote tables, extracts structured rows per
//! message, and accumulates them into per-month Excel workbooks organized by
//! calendar week, merging new data with previously saved data while avoiding
//! duplicate entries.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use recapsheet::ProcessorBuilder;
//!
//! fn main() -> Result<(), recapsheet::RecapError> {
//!     let processor = ProcessorBuilder::new()
//!         .with_base_dir("/home/user/Documents")
//!         .build()?;
//!
//!     let input = "...recap message text...---MSG---...another message...";
//!     let summary = processor.process(input)?;
//!     eprintln!("wrote {} block(s)", summary.blocks_written);
//!
//!     Ok(())
//! }
//! ```
//!
//! # Pipeline
//!
//! `segment` → `parser` (per message) → `normalize` (per table) → `group`
//! (across all tables) → `workbook` (per month file). Each month workbook is
//! opened, merged, and closed within one scoped operation; concurrent
//! invocations against the same output directory are not supported and must
//! be serialized by the caller.

pub mod error;
pub mod group;
pub mod layout;
pub mod normalize;
pub mod parser;
pub mod processor;
pub mod segment;
pub mod types;
pub mod workbook;

// 公開API
pub use error::RecapError;
pub use layout::RecapLayout;
pub use processor::{Processor, ProcessorBuilder, RunSummary};

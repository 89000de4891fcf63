//! Workbook Module
//!
//! 月次ワークブックの永続化レイヤー。シートのグリッド表現と、
//! 読み込み・マージ・書き出しを担うリポジトリを提供します。

mod grid;
mod store;

pub use grid::SheetGrid;
pub use store::{MergeOutcome, MonthStore, MonthWorkbook};

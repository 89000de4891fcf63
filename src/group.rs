//! Group Module
//!
//! 正規化済みの表を月とカレンダー週でバケット化するモジュール。
//! リキャップ日付の表示文字列（例: "Tue, January 27, 2026"）を解析し、
//! (月名, 月内週番号1..=5)のキーで時系列順にまとめます。
//!
//! 日付が欠落または解析不能な表はバケット化から除外されます
//! （警告として記録されますが、処理全体は継続します）。

use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate};
use tracing::warn;

use crate::types::NormalizedTable;

/// 月を表すキー（月番号で順序付け、英語の月名を保持）
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MonthKey {
    /// 月番号（1..=12、順序付けに使用）
    pub number: u32,
    /// 英語の月名（例: "January"、ファイル名の元になる）
    pub name: String,
}

impl MonthKey {
    /// 日付から月キーを導出
    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            number: date.month(),
            name: date.format("%B").to_string(),
        }
    }

    /// 月次ワークブックのファイル名（例: "january.xlsx"）
    pub fn file_name(&self) -> String {
        format!("{}.xlsx", self.name.to_lowercase())
    }
}

/// 解析済み日付を持つ正規化テーブル
#[derive(Debug, Clone)]
pub struct DatedTable {
    /// 解析されたリキャップ日付
    pub date: NaiveDate,
    /// 正規化済みの表データ
    pub table: NormalizedTable,
}

/// 月ごと・週ごとにバケット化されたテーブル群
pub type GroupedTables = BTreeMap<MonthKey, BTreeMap<u8, Vec<DatedTable>>>;

/// リキャップ日付の表示文字列を解析する
///
/// 期待形式は "Weekday, Month Day, Year"。元データの曜日ラベルは
/// 実際の日付と矛盾していることがあるため、先頭の曜日部分を捨てて
/// `%B %d, %Y`で解析します（曜日なしの文字列もそのまま受理します）。
pub fn parse_recap_date(label: &str) -> Option<NaiveDate> {
    let trimmed = label.trim();
    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%B %d, %Y") {
        return Some(date);
    }
    let (_, rest) = trimmed.split_once(',')?;
    NaiveDate::parse_from_str(rest.trim(), "%B %d, %Y").ok()
}

/// 月内の週番号を計算する（1〜7日=1、8〜14日=2、…、29日以降=5）
pub fn week_of_month(day: u32) -> u8 {
    ((day - 1) / 7 + 1) as u8
}

/// 1回の実行で得られたすべての表を月・週でバケット化する
///
/// 空の表、日付ラベルのない表、日付が解析できない表は除外されます。
/// 各バケット内のエントリは日付の昇順に整列されます。
pub fn group_tables(tables: Vec<NormalizedTable>) -> GroupedTables {
    let mut grouped: GroupedTables = BTreeMap::new();

    for table in tables {
        if table.is_empty() {
            continue;
        }
        let label = match table.recap_date.as_deref() {
            Some(label) => label,
            None => continue,
        };
        let date = match parse_recap_date(label) {
            Some(date) => date,
            None => {
                warn!(label, "unparseable recap date; dropping table from grouping");
                continue;
            }
        };

        grouped
            .entry(MonthKey::from_date(date))
            .or_default()
            .entry(week_of_month(date.day()))
            .or_default()
            .push(DatedTable { date, table });
    }

    // バケット内を時系列順に整列
    for weeks in grouped.values_mut() {
        for entries in weeks.values_mut() {
            entries.sort_by_key(|entry| entry.date);
        }
    }

    grouped
}

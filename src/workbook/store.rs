//! Month Store Module
//!
//! 月次ワークブックファイルのリポジトリ抽象を提供するモジュール。
//! `load(month) → merge_block(week, table)* → save`の操作列で、
//! ファイルハンドルの生存期間を1か月ぶんの処理に閉じ込めます。
//!
//! 既存ファイルはcalamineで読み込み、全シートをインメモリの
//! `SheetGrid`に展開した上でマージし、rust_xlsxwriterで全体を
//! 書き戻します。ヘッダー行・"Time"列によるDateKey・列順という
//! 永続レイアウトは他ツールが依存しうる安定した契約です。

use std::collections::{BTreeMap, HashSet};
use std::path::{Path, PathBuf};

use calamine::{open_workbook, Data, Range, Reader, Xlsx};
use rust_xlsxwriter::{Format, Workbook};
use tracing::debug;

use crate::error::RecapError;
use crate::group::{DatedTable, MonthKey};
use crate::types::{columns, CellValue};
use crate::workbook::grid::SheetGrid;

/// デイリーブロック間の空き列数
const BLOCK_GAP: u32 = 2;

/// インメモリ表現の月次ワークブック
#[derive(Debug, Clone)]
pub struct MonthWorkbook {
    /// 対象の月
    month: MonthKey,
    /// 永続先のファイルパス
    path: PathBuf,
    /// シート名→セルグリッド
    sheets: BTreeMap<String, SheetGrid>,
}

impl MonthWorkbook {
    /// 対象の月を取得
    pub fn month(&self) -> &MonthKey {
        &self.month
    }

    /// 永続先のファイルパスを取得
    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// `merge_block`の結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MergeOutcome {
    /// 新しいブロックを書き込んだ（DateKey付き）
    Written(String),
    /// 既存のDateKeyを検出してスキップした（冪等動作）
    Skipped(String),
}

/// 月次ワークブックのリポジトリ
///
/// ベースディレクトリ配下の`<月名小文字>.xlsx`ファイル群を管理します。
/// ロックは実装されないため、同一出力ディレクトリへの並行起動は
/// 呼び出し側で直列化する必要があります。
#[derive(Debug, Clone)]
pub struct MonthStore {
    /// 月次ファイルを配置するベースディレクトリ
    base_dir: PathBuf,
}

impl MonthStore {
    /// リポジトリを生成
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    /// 月のファイルパスを取得
    pub fn month_path(&self, month: &MonthKey) -> PathBuf {
        self.base_dir.join(month.file_name())
    }

    /// 月次ワークブックを読み込む（存在しなければ空のワークブック）
    ///
    /// ファイルが存在する場合は全シートを`SheetGrid`に展開します。
    /// ファイルハンドルはこのメソッドのスコープで閉じられます。
    pub fn load(&self, month: &MonthKey) -> Result<MonthWorkbook, RecapError> {
        let path = self.month_path(month);
        let mut sheets = BTreeMap::new();

        if path.exists() {
            let mut workbook: Xlsx<_> = open_workbook(&path)?;
            for name in workbook.sheet_names().to_vec() {
                let range = workbook.worksheet_range(&name)?;
                sheets.insert(name, grid_from_range(&range));
            }
            debug!(path = %path.display(), sheets = sheets.len(), "loaded existing month workbook");
        }

        Ok(MonthWorkbook {
            month: month.clone(),
            path,
            sheets,
        })
    }

    /// デイリーブロックを週シートにマージする
    ///
    /// シートのヘッダー行から既存のDateKey集合を検出し、エントリの
    /// DateKeyが既に存在する場合はスキップします（前回実行でマージ済み）。
    /// 新規ブロックは最後の占有列の3列先（2列の間隔を空けた次の列）から
    /// ヘッダー行＋データ行として書き込まれます。
    pub fn merge_block(
        &self,
        workbook: &mut MonthWorkbook,
        week: u8,
        entry: &DatedTable,
    ) -> MergeOutcome {
        let sheet_name = format!("Week{week}");
        let grid = workbook.sheets.entry(sheet_name.clone()).or_default();

        let existing = existing_date_keys(grid);
        let fallback = entry.date.format("%Y-%m-%d").to_string();
        let key = entry.table.date_key(&fallback);

        if existing.contains(&key) {
            debug!(sheet = %sheet_name, date_key = %key, "daily block already present; skipping");
            return MergeOutcome::Skipped(key);
        }

        let start = grid
            .last_occupied_col()
            .map(|col| col + BLOCK_GAP + 1)
            .unwrap_or(0);

        for (j, name) in entry.table.columns.iter().enumerate() {
            grid.set_value(0, start + j as u32, CellValue::Text(name.clone()));
        }
        for (r, row) in entry.table.rows.iter().enumerate() {
            for (j, cell) in row.iter().enumerate() {
                if !cell.is_empty() {
                    grid.set_value(1 + r as u32, start + j as u32, cell.clone());
                }
            }
        }

        debug!(sheet = %sheet_name, date_key = %key, start_col = start, "wrote daily block");
        MergeOutcome::Written(key)
    }

    /// ワークブックをファイルに永続化する
    ///
    /// シートは`Week<N>`の週番号昇順に並べ替えられ、命名規則に
    /// 一致しないシートは末尾に置かれます。各セルには列ヘッダーに
    /// 応じた表示書式が適用されます。
    pub fn save(&self, workbook: &MonthWorkbook) -> Result<PathBuf, RecapError> {
        let mut output = Workbook::new();

        let mut names: Vec<&String> = workbook.sheets.keys().collect();
        names.sort_by_key(|name| sheet_order(name));

        for name in names {
            let grid = &workbook.sheets[name.as_str()];
            let worksheet = output.add_worksheet();
            worksheet.set_name(name)?;

            for col in 0..grid.cols() {
                // 列の表示書式はその列のヘッダー（行1）から決まる
                let format = match grid.value(0, col) {
                    CellValue::Text(header) => column_format(header),
                    _ => None,
                };

                for row in 0..grid.rows() {
                    let col_idx = col as u16;
                    match grid.value(row, col) {
                        CellValue::Empty => {}
                        CellValue::Number(n) => match (&format, row) {
                            (Some(f), r) if r > 0 => {
                                worksheet.write_number_with_format(row, col_idx, *n, f)?;
                            }
                            _ => {
                                worksheet.write_number(row, col_idx, *n)?;
                            }
                        },
                        CellValue::Text(s) => match (&format, row) {
                            (Some(f), r) if r > 0 => {
                                worksheet.write_string_with_format(row, col_idx, s, f)?;
                            }
                            _ => {
                                worksheet.write_string(row, col_idx, s)?;
                            }
                        },
                    }
                }
            }
        }

        output.save(&workbook.path)?;
        debug!(path = %workbook.path.display(), "saved month workbook");
        Ok(workbook.path.clone())
    }
}

/// calamineのセル範囲をグリッドに展開する
fn grid_from_range(range: &Range<Data>) -> SheetGrid {
    let mut grid = SheetGrid::new();
    let (row0, col0) = range.start().unwrap_or((0, 0));

    for (i, row) in range.rows().enumerate() {
        for (j, cell) in row.iter().enumerate() {
            let value = match cell {
                Data::Empty => continue,
                Data::Float(f) => CellValue::Number(*f),
                Data::Int(n) => CellValue::Number(*n as f64),
                Data::String(s) => CellValue::Text(s.clone()),
                Data::DateTime(dt) => CellValue::Number(dt.as_f64()),
                other => CellValue::Text(other.to_string()),
            };
            grid.set_value(row0 + i as u32, col0 + j as u32, value);
        }
    }
    grid
}

/// シートのヘッダー行から既存ブロックのDateKey集合を検出する
///
/// 行1で値が"Time"と一致するすべての列について、その直下（行2）の
/// 値をDateKeyとして読み取ります。
fn existing_date_keys(grid: &SheetGrid) -> HashSet<String> {
    let mut keys = HashSet::new();
    for col in 0..grid.cols() {
        if grid.value(0, col) == &CellValue::Text(columns::TIME.to_string()) {
            let key = grid.value(1, col).as_key_string();
            if !key.is_empty() {
                keys.insert(key);
            }
        }
    }
    keys
}

/// シートの並べ替えキー（`Week<N>`は週番号昇順、それ以外は末尾）
fn sheet_order(name: &str) -> (bool, u32, String) {
    let week = name
        .strip_prefix("Week")
        .and_then(|n| n.parse::<u32>().ok());
    (week.is_none(), week.unwrap_or(0), name.to_string())
}

/// 列ヘッダーに応じた表示書式を返す
fn column_format(header: &str) -> Option<Format> {
    let code = match header {
        columns::PERCENT_CHANGE => "0.00%",
        columns::TIME => "h:mm AM/PM",
        columns::LATEST | columns::CHANGE | columns::OPEN | columns::HIGH | columns::LOW => "0.00",
        columns::VOLUME => "0",
        _ => return None,
    };
    Some(Format::new().set_num_format(code))
}

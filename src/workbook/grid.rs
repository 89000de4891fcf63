//! Sheet Grid Module
//!
//! 1シートぶんのセルデータを保持する稠密なグリッド構造を提供する
//! モジュール。書き込みに応じて自動的に拡張され、既存ワークブックの
//! 読み込み結果と新規ブロックの配置の両方を同じ表現で扱います。

use crate::types::CellValue;

const EMPTY_CELL: CellValue = CellValue::Empty;

/// シートのセルグリッド（行×列、0始まり）
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SheetGrid {
    /// グリッドデータ（行ごとのセル列、行により長さが異なる）
    cells: Vec<Vec<CellValue>>,
}

impl SheetGrid {
    /// 空のグリッドを生成
    pub fn new() -> Self {
        Self::default()
    }

    /// 行数を取得
    pub fn rows(&self) -> u32 {
        self.cells.len() as u32
    }

    /// 列数を取得（最長の行の長さ）
    pub fn cols(&self) -> u32 {
        self.cells.iter().map(|row| row.len()).max().unwrap_or(0) as u32
    }

    /// セルの値を参照で取得（範囲外は空セル）
    pub fn value(&self, row: u32, col: u32) -> &CellValue {
        self.cells
            .get(row as usize)
            .and_then(|r| r.get(col as usize))
            .unwrap_or(&EMPTY_CELL)
    }

    /// セルに値を設定（必要に応じてグリッドを拡張）
    pub fn set_value(&mut self, row: u32, col: u32, value: CellValue) {
        let row = row as usize;
        let col = col as usize;
        if self.cells.len() <= row {
            self.cells.resize_with(row + 1, Vec::new);
        }
        let cells = &mut self.cells[row];
        if cells.len() <= col {
            cells.resize(col + 1, CellValue::Empty);
        }
        cells[col] = value;
    }

    /// グリッドが空（非空セルなし）かどうかを判定
    pub fn is_empty(&self) -> bool {
        self.last_occupied_col().is_none()
    }

    /// いずれかの行で非空セルを持つ最後の列インデックスを取得
    ///
    /// 次の空き列範囲の検出に使用されます。非空セルがひとつもない
    /// 場合は`None`を返します。
    pub fn last_occupied_col(&self) -> Option<u32> {
        self.cells
            .iter()
            .filter_map(|row| {
                row.iter()
                    .rposition(|cell| !cell.is_empty())
                    .map(|idx| idx as u32)
            })
            .max()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_grid() {
        let grid = SheetGrid::new();
        assert!(grid.is_empty());
        assert_eq!(grid.rows(), 0);
        assert_eq!(grid.cols(), 0);
        assert_eq!(grid.last_occupied_col(), None);
        assert!(grid.value(5, 5).is_empty());
    }

    #[test]
    fn test_set_value_grows_grid() {
        let mut grid = SheetGrid::new();
        grid.set_value(2, 3, CellValue::Number(1.5));

        assert_eq!(grid.rows(), 3);
        assert_eq!(grid.cols(), 4);
        assert_eq!(grid.value(2, 3), &CellValue::Number(1.5));
        // 埋められたセルは空
        assert!(grid.value(0, 0).is_empty());
        assert!(grid.value(2, 2).is_empty());
    }

    #[test]
    fn test_last_occupied_col_spans_rows() {
        let mut grid = SheetGrid::new();
        grid.set_value(0, 1, CellValue::Text("Symbol".to_string()));
        grid.set_value(4, 7, CellValue::Number(2.0));
        assert_eq!(grid.last_occupied_col(), Some(7));
    }

    #[test]
    fn test_last_occupied_col_ignores_trailing_empties() {
        let mut grid = SheetGrid::new();
        grid.set_value(0, 2, CellValue::Text("x".to_string()));
        // 明示的に空を書き込んでも占有扱いにならない
        grid.set_value(0, 9, CellValue::Empty);
        assert_eq!(grid.last_occupied_col(), Some(2));
    }

    #[test]
    fn test_overwrite_value() {
        let mut grid = SheetGrid::new();
        grid.set_value(1, 1, CellValue::Number(1.0));
        grid.set_value(1, 1, CellValue::Number(2.0));
        assert_eq!(grid.value(1, 1), &CellValue::Number(2.0));
    }
}

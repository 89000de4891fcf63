//! Types Module
//!
//! クレート全体で使用する共通データ型を定義するモジュール。
//! リキャップメッセージから抽出される表データの中間表現を提供します。

/// 既知のリキャップレイアウトの列名定数
pub mod columns {
    /// シンボル列（常に先頭）
    pub const SYMBOL: &str = "Symbol";
    /// 最新値列
    pub const LATEST: &str = "Latest";
    /// 変化量列
    pub const CHANGE: &str = "Change";
    /// 変化率列（%表記）
    pub const PERCENT_CHANGE: &str = "%Change";
    /// 始値列
    pub const OPEN: &str = "Open";
    /// 高値列
    pub const HIGH: &str = "High";
    /// 安値列
    pub const LOW: &str = "Low";
    /// 出来高列
    pub const VOLUME: &str = "Volume";
    /// 時刻列（DateKeyの導出元）
    pub const TIME: &str = "Time";

    /// 通常の数値変換を適用する列の集合（%Changeは別規則）
    pub const NUMERIC: [&str; 6] = [LATEST, CHANGE, OPEN, HIGH, LOW, VOLUME];
}

/// セルの値を表す列挙型
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    /// 数値（f64）
    Number(f64),

    /// 文字列
    Text(String),

    /// 空セル（「データなし」を表し、ゼロとは区別される）
    Empty,
}

impl CellValue {
    /// 値が空かどうかを判定
    pub fn is_empty(&self) -> bool {
        matches!(self, CellValue::Empty)
    }

    /// DateKey比較用の文字列表現を取得
    ///
    /// 数値は整数値であれば小数部なしで表現します（"4.0"と"4"の
    /// 不一致を避けるため）。空セルは空文字列になります。
    pub fn as_key_string(&self) -> String {
        match self {
            CellValue::Number(n) => {
                if n.is_finite() && n.fract() == 0.0 && n.abs() < 1e15 {
                    format!("{}", *n as i64)
                } else {
                    n.to_string()
                }
            }
            CellValue::Text(s) => s.clone(),
            CellValue::Empty => String::new(),
        }
    }
}

/// パーサーが1メッセージから抽出した生の表データ
///
/// 不変条件: すべての行は`columns.len()`個のセルを持ちます。
/// 構造が見つからなかった場合、列も行も持たない空の表が有効な
/// （縮退した）結果となります。
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RecapTable {
    /// リキャップ日付の表示文字列（例: "Tue, January 27, 2026"）
    pub recap_date: Option<String>,

    /// 列名の順序付き列（先頭は常に"Symbol"）
    pub columns: Vec<String>,

    /// 行データ（各行は生の文字列セル）
    pub rows: Vec<Vec<String>>,
}

impl RecapTable {
    /// 列を持たない空の表を生成（日付のみ保持）
    pub fn empty(recap_date: Option<String>) -> Self {
        Self {
            recap_date,
            columns: Vec::new(),
            rows: Vec::new(),
        }
    }

    /// 表が空（行なし）かどうかを判定
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// 数値変換適用後の表データ
///
/// `RecapTable`と同じ形状ですが、数値列は`CellValue::Number`に変換され、
/// 変換不能なセルは`CellValue::Empty`（未設定）になります。
#[derive(Debug, Clone, PartialEq, Default)]
pub struct NormalizedTable {
    /// リキャップ日付の表示文字列
    pub recap_date: Option<String>,

    /// 列名の順序付き列
    pub columns: Vec<String>,

    /// 型付きセルの行データ
    pub rows: Vec<Vec<CellValue>>,
}

impl NormalizedTable {
    /// 表が空（行なし）かどうかを判定
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// 列名からインデックスを取得
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// デイリーブロックのDateKeyを導出
    ///
    /// "Time"列の先頭行の値を文字列化したものを返します。"Time"列が
    /// 存在しない、または先頭値が空の場合はフォールバック文字列を
    /// そのまま使用します。
    pub fn date_key(&self, fallback: &str) -> String {
        if let Some(idx) = self.column_index(columns::TIME) {
            if let Some(first) = self.rows.first() {
                let key = first[idx].as_key_string();
                if !key.is_empty() {
                    return key;
                }
            }
        }
        fallback.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // CellValue のテスト
    #[test]
    fn test_cell_value_is_empty() {
        assert!(CellValue::Empty.is_empty());
        assert!(!CellValue::Number(42.0).is_empty());
        assert!(!CellValue::Text("test".to_string()).is_empty());
    }

    #[test]
    fn test_cell_value_as_key_string() {
        assert_eq!(CellValue::Empty.as_key_string(), "");
        assert_eq!(CellValue::Number(42.5).as_key_string(), "42.5");
        assert_eq!(CellValue::Number(42.0).as_key_string(), "42");
        assert_eq!(CellValue::Number(-7.0).as_key_string(), "-7");
        assert_eq!(
            CellValue::Text("01/27/26".to_string()).as_key_string(),
            "01/27/26"
        );
    }

    // RecapTable のテスト
    #[test]
    fn test_recap_table_empty() {
        let table = RecapTable::empty(Some("Tue, January 27, 2026".to_string()));
        assert!(table.is_empty());
        assert!(table.columns.is_empty());
        assert_eq!(table.recap_date.as_deref(), Some("Tue, January 27, 2026"));
    }

    #[test]
    fn test_recap_table_row_width_invariant() {
        let table = RecapTable {
            recap_date: None,
            columns: vec!["Symbol".to_string(), "Latest".to_string()],
            rows: vec![vec!["DOWI".to_string(), "44544.66".to_string()]],
        };
        for row in &table.rows {
            assert_eq!(row.len(), table.columns.len());
        }
    }

    // NormalizedTable のテスト
    #[test]
    fn test_normalized_table_column_index() {
        let table = NormalizedTable {
            recap_date: None,
            columns: vec![
                "Symbol".to_string(),
                "Latest".to_string(),
                "Time".to_string(),
            ],
            rows: vec![],
        };
        assert_eq!(table.column_index("Symbol"), Some(0));
        assert_eq!(table.column_index("Time"), Some(2));
        assert_eq!(table.column_index("Volume"), None);
    }

    #[test]
    fn test_date_key_from_time_column() {
        let table = NormalizedTable {
            recap_date: None,
            columns: vec!["Symbol".to_string(), "Time".to_string()],
            rows: vec![
                vec![
                    CellValue::Text("DOWI".to_string()),
                    CellValue::Text("01/27/26".to_string()),
                ],
                vec![
                    CellValue::Text("SPX".to_string()),
                    CellValue::Text("01/27/26".to_string()),
                ],
            ],
        };
        assert_eq!(table.date_key("2026-01-27"), "01/27/26");
    }

    #[test]
    fn test_date_key_fallback_without_time_column() {
        let table = NormalizedTable {
            recap_date: None,
            columns: vec!["Symbol".to_string(), "Latest".to_string()],
            rows: vec![vec![
                CellValue::Text("DOWI".to_string()),
                CellValue::Number(44544.66),
            ]],
        };
        assert_eq!(table.date_key("2026-01-27"), "2026-01-27");
    }

    #[test]
    fn test_date_key_fallback_on_empty_time_value() {
        let table = NormalizedTable {
            recap_date: None,
            columns: vec!["Symbol".to_string(), "Time".to_string()],
            rows: vec![vec![CellValue::Text("DOWI".to_string()), CellValue::Empty]],
        };
        assert_eq!(table.date_key("2026-01-27"), "2026-01-27");
    }
}

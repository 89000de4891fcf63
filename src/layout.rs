//! Layout Module
//!
//! リキャップメッセージのレイアウト記述子を定義するモジュール。
//! データソース固有のリテラル（タイトルマーカー、終端シンボル、
//! 行開始センチネル）をスキャンアルゴリズムから分離し、将来の
//! 別レイアウト対応をコアの変更なしで可能にします。

/// リキャップメッセージのレイアウト記述子
///
/// メッセージパーサーはこの記述子のみを参照してスキャンを行います。
/// `Default`実装は既知のEnd-of-Dayウォッチリストレイアウトを表します。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecapLayout {
    /// タイトル行に含まれるリキャップタイトルマーカー
    pub title_marker: String,

    /// タイトル行に含まれる日付導入マーカー（この後ろが日付文字列）
    pub quotes_marker: String,

    /// ヘッダー開始を示すリテラル（トリム後の行全体がこれと一致）
    pub header_start: String,

    /// 最終行のシンボル（この行が完成した時点で収集を打ち切る）
    pub terminal_symbol: String,

    /// データ行の先頭文字として扱う文字の集合（数字は常に含む）
    pub sentinel_chars: Vec<char>,
}

impl RecapLayout {
    /// 行がデータ行の開始に見えるかを判定する
    ///
    /// 先頭文字がASCII数字、またはセンチネル文字（既定では`^`・`$`・`N`）
    /// であればデータ行開始とみなします。ヘッダー列名の収集を打ち切る
    /// ヒューリスティックとして使用されます。
    pub fn row_start_sentinel(&self, line: &str) -> bool {
        match line.chars().next() {
            Some(c) => c.is_ascii_digit() || self.sentinel_chars.contains(&c),
            None => false,
        }
    }
}

impl Default for RecapLayout {
    /// 既知のEnd-of-Dayウォッチリストレイアウト
    fn default() -> Self {
        Self {
            title_marker: "End-of-Day Recap".to_string(),
            quotes_marker: "Price quotes for".to_string(),
            header_start: "Symbol".to_string(),
            terminal_symbol: "^USDCHF".to_string(),
            sentinel_chars: vec!['^', '$', 'N'],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_layout_literals() {
        let layout = RecapLayout::default();
        assert_eq!(layout.title_marker, "End-of-Day Recap");
        assert_eq!(layout.quotes_marker, "Price quotes for");
        assert_eq!(layout.header_start, "Symbol");
        assert_eq!(layout.terminal_symbol, "^USDCHF");
    }

    #[test]
    fn test_sentinel_detects_digit_start() {
        let layout = RecapLayout::default();
        assert!(layout.row_start_sentinel("44544.66"));
        assert!(layout.row_start_sentinel("0.28%"));
    }

    #[test]
    fn test_sentinel_detects_marker_chars() {
        let layout = RecapLayout::default();
        // インデックスシンボル
        assert!(layout.row_start_sentinel("^SPX"));
        // 株価指数シンボル
        assert!(layout.row_start_sentinel("$DOWI"));
        // "N/A"系エントリ
        assert!(layout.row_start_sentinel("N/A"));
    }

    #[test]
    fn test_sentinel_rejects_column_names() {
        let layout = RecapLayout::default();
        assert!(!layout.row_start_sentinel("Latest"));
        assert!(!layout.row_start_sentinel("%Change"));
        assert!(!layout.row_start_sentinel("Volume"));
        assert!(!layout.row_start_sentinel("Time"));
        assert!(!layout.row_start_sentinel(""));
    }

    #[test]
    fn test_custom_layout_sentinels() {
        let layout = RecapLayout {
            sentinel_chars: vec!['@'],
            ..RecapLayout::default()
        };
        assert!(layout.row_start_sentinel("@AAPL"));
        assert!(!layout.row_start_sentinel("^SPX"));
    }
}

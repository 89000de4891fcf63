//! Segment Module
//!
//! 連結された入力テキストを個々のメッセージブロックに分割するモジュール。
//! 固定のセパレータトークンで分割し、空のセグメントを捨てるだけの
//! 単純な処理で、エラー条件はありません。

/// メッセージ間の区切りとして使用される固定リテラル
pub const MESSAGE_SEPARATOR: &str = "---MSG---";

/// 入力ブロブをメッセージごとに分割する
///
/// セパレータで分割し、各セグメントの前後空白を除去した上で、
/// 空になったセグメントを捨てます。セパレータを含まない入力は
/// 1セグメント、空の入力は0セグメントになります。
pub fn split_messages(input: &str) -> Vec<&str> {
    input
        .split(MESSAGE_SEPARATOR)
        .map(str::trim)
        .filter(|segment| !segment.is_empty())
        .collect()
}

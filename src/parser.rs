//! Parser Module
//!
//! 1件のリキャップメッセージから日付ラベルと表データを抽出するモジュール。
//! レイアウト固有の2段階スキャン（タイトル行の特定→固定幅の繰り返し
//! グループの収集）を実装します。
//!
//! パーサーはユーザーに見えるエラーを発生させません。構造が見つからない
//! 場合は空の表に縮退し、後段の変換失敗も生文字列のまま保持されます。

use tracing::debug;

use crate::layout::RecapLayout;
use crate::types::RecapTable;

/// メッセージテキストを解析して`RecapTable`を生成する
///
/// # アルゴリズム
///
/// 1. タイトルマーカーと日付導入マーカーの両方を含む行を探し、
///    マーカーの後ろの部分文字列を日付ラベルとして抽出する。
///    見つからない場合は日付なし・空の表を返す。
/// 2. タイトル行の次の行から、トリム後の内容がヘッダー開始リテラルと
///    一致する行を探す。見つからない場合は日付のみ保持した空の表を返す。
/// 3. ヘッダー開始の直後から1行1列名として列名を収集する。空行・
///    データ行開始センチネル・重複列名のいずれかで収集を打ち切る。
/// 4. 残りの非空行を`columns.len()`行ずつの行グループにまとめる。
///    完成した行の先頭セルが終端シンボルと一致した時点で収集を止める。
/// 5. 末尾に残った完成行は、直前の行の重複でなければ追加する。
///
/// 行が1件も得られなかった場合、列を持たない空の表になります。
pub fn parse_message(layout: &RecapLayout, text: &str) -> RecapTable {
    let lines: Vec<&str> = text.lines().map(|l| l.trim_end_matches('\r')).collect();

    // フェーズ1: タイトル行の特定と日付ラベルの抽出
    let (recap_date, scan_from) = match locate_title(layout, &lines) {
        Some((date, idx)) => (date, idx),
        None => {
            debug!("no recap title line found; yielding empty table");
            return RecapTable::empty(None);
        }
    };

    // フェーズ2: ヘッダー開始行の特定
    let header_idx = match lines[scan_from..]
        .iter()
        .position(|l| l.trim() == layout.header_start)
    {
        Some(offset) => scan_from + offset,
        None => {
            debug!("no header start line found; yielding empty table");
            return RecapTable::empty(recap_date);
        }
    };

    // 列名の収集（1行1列名、先頭は常にヘッダー開始リテラル）
    let mut columns = vec![layout.header_start.clone()];
    let mut i = header_idx + 1;
    while i < lines.len() {
        let name = lines[i].trim();
        if name.is_empty() || layout.row_start_sentinel(name) {
            break;
        }
        if columns.iter().any(|c| c == name) {
            break;
        }
        columns.push(name.to_string());
        i += 1;
    }

    // データ行の収集: columns.len()行ずつを1行グループとする
    let width = columns.len();
    let mut rows: Vec<Vec<String>> = Vec::new();
    let mut current: Vec<String> = Vec::new();
    let mut terminated = false;

    for line in &lines[i..] {
        let cell = line.trim();
        if cell.is_empty() {
            continue;
        }

        if current.len() == width {
            rows.push(std::mem::take(&mut current));
        }
        current.push(cell.to_string());

        // 終端シンボルの行が完成したら打ち切り
        if current.len() == width && current[0] == layout.terminal_symbol {
            rows.push(std::mem::take(&mut current));
            terminated = true;
            break;
        }
    }

    // 末尾の完成行（未捕捉かつ直前行の重複でないもの）を追加
    if !terminated && current.len() == width && rows.last() != Some(&current) {
        rows.push(current);
    }

    if rows.is_empty() {
        return RecapTable::empty(recap_date);
    }

    RecapTable {
        recap_date,
        columns,
        rows,
    }
}

/// タイトル行を探し、日付ラベルと次のスキャン開始位置を返す
fn locate_title(layout: &RecapLayout, lines: &[&str]) -> Option<(Option<String>, usize)> {
    for (i, line) in lines.iter().enumerate() {
        if line.contains(&layout.title_marker) && line.contains(&layout.quotes_marker) {
            let date = line.find(&layout.quotes_marker).and_then(|pos| {
                let tail = line[pos + layout.quotes_marker.len()..].trim();
                if tail.is_empty() {
                    None
                } else {
                    Some(tail.to_string())
                }
            });
            return Some((date, i + 1));
        }
    }
    None
}

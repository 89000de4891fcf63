//! Normalize Module
//!
//! 生の表データを列ごとの規則で型付きの値に変換するモジュール。
//! 純粋な変換として実装され、入力の`RecapTable`を消費して新しい
//! `NormalizedTable`を生成します（共有状態の変異なし）。
//!
//! 変換不能なセルはエラーではなく`CellValue::Empty`（未設定）になり、
//! 診断ストリームにデバッグイベントとして記録されます。

use tracing::debug;

use crate::types::{columns, CellValue, NormalizedTable, RecapTable};

/// 「変化なし」を表すテキストトークンかどうかを判定する
///
/// 大文字小文字を区別せず "unch" / "unchanged" を認識します。
fn is_unch_token(value: &str) -> bool {
    let token = value.trim().to_ascii_lowercase();
    token == "unch" || token == "unchanged"
}

/// 通常の数値列（Latest・Change・Open・High・Low・Volume）のセル変換
///
/// トリム→桁区切りカンマ除去→末尾`s`マーカー除去→前後の`+`符号除去の
/// 順に整形し、unchトークンはゼロ、残りをf64として解析します。
/// 解析不能な値は`Empty`になります。
fn clean_numeric(raw: &str) -> CellValue {
    let stripped = raw.trim().replace(',', "");
    let stripped = stripped.trim_end_matches('s').trim_matches('+');

    if stripped.is_empty() {
        return CellValue::Empty;
    }
    if is_unch_token(stripped) {
        return CellValue::Number(0.0);
    }
    match stripped.parse::<f64>() {
        Ok(n) => CellValue::Number(n),
        Err(_) => CellValue::Empty,
    }
}

/// %Change列のセル変換
///
/// `%`・カンマ・`+`を除去して解析した後、絶対値が1を超える間は100で
/// 割り続けることで、「既に小数表現」("0.052")と「パーセント表現」
/// ("5.2%"、"152%")の混在を小数ベースの一貫した表現に揃えます。
/// unchトークンはリスケール結果に関わらず正確に0になります。
fn clean_percent(raw: &str) -> CellValue {
    let stripped: String = raw
        .trim()
        .chars()
        .filter(|c| !matches!(c, '%' | ',' | '+'))
        .collect();

    if stripped.is_empty() {
        return CellValue::Empty;
    }
    // unchはリスケールより優先して正確なゼロに固定する
    if is_unch_token(&stripped) {
        return CellValue::Number(0.0);
    }
    match stripped.parse::<f64>() {
        Ok(mut n) => {
            while n.is_finite() && n.abs() > 1.0 {
                n /= 100.0;
            }
            CellValue::Number(n)
        }
        Err(_) => CellValue::Empty,
    }
}

/// Symbol列のセル変換（`$`と`^`のマーカー文字を除去）
fn clean_symbol(raw: &str) -> CellValue {
    let stripped: String = raw.chars().filter(|c| !matches!(c, '$' | '^')).collect();
    if stripped.is_empty() {
        CellValue::Empty
    } else {
        CellValue::Text(stripped)
    }
}

/// `RecapTable`を列ごとの規則で`NormalizedTable`に変換する
///
/// 規則の適用対象にならない列（Timeなど）はテキストのまま保持されます。
/// 空文字列のセルは`Empty`になり、ワークブック上では空白として
/// 描画されます（ゼロとは区別されます）。
pub fn normalize(table: RecapTable) -> NormalizedTable {
    let RecapTable {
        recap_date,
        columns: names,
        rows,
    } = table;

    let converted = rows
        .into_iter()
        .map(|row| {
            row.into_iter()
                .zip(names.iter())
                .map(|(cell, column)| convert_cell(column, cell))
                .collect()
        })
        .collect();

    NormalizedTable {
        recap_date,
        columns: names,
        rows: converted,
    }
}

/// 列名に応じたセル変換の振り分け
fn convert_cell(column: &str, raw: String) -> CellValue {
    let value = if column == columns::SYMBOL {
        clean_symbol(&raw)
    } else if column == columns::PERCENT_CHANGE {
        clean_percent(&raw)
    } else if columns::NUMERIC.contains(&column) {
        clean_numeric(&raw)
    } else if raw.is_empty() {
        CellValue::Empty
    } else {
        CellValue::Text(raw.clone())
    };

    if value.is_empty() && !raw.trim().is_empty() {
        debug!(column, raw = %raw, "cell conversion failed; leaving unset");
    }
    value
}

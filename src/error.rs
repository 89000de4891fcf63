//! Error Types Module
//!
//! クレート全体で使用する構造化エラー型を定義するモジュール。
//! `thiserror`を使用して、エラーの自動変換とメッセージフォーマットを実現する。

use thiserror::Error;

/// recapsheetクレート全体で使用するエラー型
///
/// ワークブックの読み込み・書き出し処理中に発生するエラーのみがこの型に
/// 集約されます。回復可能な状態（日付の解析失敗、数値セルの変換失敗、
/// 空メッセージなど）はエラーではなく、tracingの診断イベントとして
/// 記録されます。
///
/// # エラーの種類
///
/// - `Io`: I/O操作中に発生したエラー（出力ディレクトリの作成失敗など）
/// - `Workbook`: 既存ワークブックの読み込みに失敗したエラー（calamine由来）
/// - `Write`: ワークブックの書き出しに失敗したエラー（rust_xlsxwriter由来）
/// - `Config`: ビルダー設定の検証に失敗したエラー
#[derive(Error, Debug)]
pub enum RecapError {
    /// I/O操作中に発生したエラー
    ///
    /// `#[from]`属性により、`std::io::Error`から自動的に変換されます。
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// 既存の月次ワークブックの読み込みに失敗したエラー
    ///
    /// ファイル形式が不正、破損したファイルなどが原因となります。
    /// 対象の月のみが失敗扱いとなり、他の月の処理は継続されます。
    #[error("failed to read workbook: {0}")]
    Workbook(#[from] calamine::XlsxError),

    /// ワークブックの書き出しに失敗したエラー
    ///
    /// 書き込み不能なパス、ロックされたファイルなどが原因となります。
    #[error("failed to write workbook: {0}")]
    Write(#[from] rust_xlsxwriter::XlsxError),

    /// 設定の検証に失敗したエラー
    ///
    /// `ProcessorBuilder::build()`時に設定を検証し、無効な設定が検出された
    /// 場合に発生します。
    #[error("configuration error: {0}")]
    Config(String),
}

//! Processor Module
//!
//! Fluent Builder APIを提供し、パイプライン全体（分割→解析→正規化→
//! バケット化→マージ→永続化）を1回の実行として駆動するモジュール。
//!
//! 月単位の永続化失敗はその月のみの失敗として集計され、他の月の
//! 処理は継続されます。すべての月が失敗した場合のみエラーを返します。

use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;

use tracing::{debug, error, info};

use crate::error::RecapError;
use crate::group::{group_tables, DatedTable, MonthKey};
use crate::layout::RecapLayout;
use crate::normalize::normalize;
use crate::parser::parse_message;
use crate::segment::split_messages;
use crate::workbook::{MergeOutcome, MonthStore};

/// 1回の実行の集計結果
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// 分割で得られたメッセージ数
    pub messages: usize,
    /// 1行以上の表が得られたメッセージ数
    pub parsed_tables: usize,
    /// 書き出しに成功した月ファイル数
    pub months_written: usize,
    /// 新規に書き込まれたデイリーブロック数
    pub blocks_written: usize,
    /// 既存DateKeyの検出によりスキップされたブロック数
    pub blocks_skipped: usize,
    /// 永続化に失敗した月名
    pub failed_months: Vec<String>,
}

/// `Processor`を段階的に構築するビルダー
///
/// # 使用例
///
/// ```rust,no_run
/// use recapsheet::{ProcessorBuilder, RecapLayout};
///
/// # fn main() -> Result<(), recapsheet::RecapError> {
/// let processor = ProcessorBuilder::new()
///     .with_layout(RecapLayout::default())
///     .with_base_dir("/tmp/watchlist")
///     .build()?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Default)]
pub struct ProcessorBuilder {
    layout: RecapLayout,
    base_dir: Option<PathBuf>,
}

impl ProcessorBuilder {
    /// デフォルト設定（既知のウォッチリストレイアウト）のビルダーを生成
    pub fn new() -> Self {
        Self::default()
    }

    /// メッセージレイアウト記述子を指定する
    pub fn with_layout(mut self, layout: RecapLayout) -> Self {
        self.layout = layout;
        self
    }

    /// 月次ファイルを配置するベースディレクトリを指定する
    pub fn with_base_dir(mut self, base_dir: impl Into<PathBuf>) -> Self {
        self.base_dir = Some(base_dir.into());
        self
    }

    /// 設定を検証して`Processor`を構築する
    ///
    /// ベースディレクトリが未指定の場合は`RecapError::Config`になります。
    pub fn build(self) -> Result<Processor, RecapError> {
        let base_dir = self
            .base_dir
            .ok_or_else(|| RecapError::Config("output directory is required".to_string()))?;
        if base_dir.as_os_str().is_empty() {
            return Err(RecapError::Config(
                "output directory must not be empty".to_string(),
            ));
        }
        Ok(Processor {
            layout: self.layout,
            base_dir,
        })
    }
}

/// リキャップ処理のパイプライン
#[derive(Debug)]
pub struct Processor {
    layout: RecapLayout,
    base_dir: PathBuf,
}

impl Processor {
    /// 入力ブロブ全体を処理し、月次ワークブックを更新する
    ///
    /// セグメントごとに解析・正規化を行い、月・週でバケット化した上で
    /// 月ごとに`load → merge_block* → save`を実行します。メッセージが
    /// 0件の場合はファイルを一切書かずに空の集計を返します。
    pub fn process(&self, input: &str) -> Result<RunSummary, RecapError> {
        let mut summary = RunSummary::default();

        let messages = split_messages(input);
        summary.messages = messages.len();
        if messages.is_empty() {
            return Ok(summary);
        }

        let tables: Vec<_> = messages
            .iter()
            .map(|message| normalize(parse_message(&self.layout, message)))
            .collect();
        summary.parsed_tables = tables.iter().filter(|t| !t.is_empty()).count();
        debug!(
            messages = summary.messages,
            parsed_tables = summary.parsed_tables,
            "parsed input messages"
        );

        let grouped = group_tables(tables);
        if grouped.is_empty() {
            return Ok(summary);
        }

        fs::create_dir_all(&self.base_dir)?;
        let store = MonthStore::new(&self.base_dir);

        let mut first_error = None;
        for (month, weeks) in &grouped {
            match merge_month(&store, month, weeks) {
                Ok((written, skipped)) => {
                    summary.months_written += 1;
                    summary.blocks_written += written;
                    summary.blocks_skipped += skipped;
                }
                Err(err) => {
                    error!(month = %month.name, error = %err, "failed to persist month workbook");
                    summary.failed_months.push(month.name.clone());
                    first_error.get_or_insert(err);
                }
            }
        }

        // 一部の月の失敗は許容するが、全滅した場合はエラーを返す
        if summary.months_written == 0 {
            if let Some(err) = first_error {
                return Err(err);
            }
        }

        info!(
            months_written = summary.months_written,
            blocks_written = summary.blocks_written,
            blocks_skipped = summary.blocks_skipped,
            "run complete"
        );
        Ok(summary)
    }
}

/// 1か月ぶんのマージと永続化（ファイルの生存期間はこの関数に閉じる）
fn merge_month(
    store: &MonthStore,
    month: &MonthKey,
    weeks: &BTreeMap<u8, Vec<DatedTable>>,
) -> Result<(usize, usize), RecapError> {
    let mut workbook = store.load(month)?;
    let mut written = 0;
    let mut skipped = 0;

    for (week, entries) in weeks {
        for entry in entries {
            match store.merge_block(&mut workbook, *week, entry) {
                MergeOutcome::Written(_) => written += 1,
                MergeOutcome::Skipped(_) => skipped += 1,
            }
        }
    }

    store.save(&workbook)?;
    Ok((written, skipped))
}

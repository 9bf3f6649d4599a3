/// 投票検索ハンドラー
///
/// `{"question": "..."}` を受け取り、投票テーブルから該当アイテムを取得して
/// `{"Items": [...]}` 形式で返す。
use serde_json::Value;
use thiserror::Error;
use tracing::info;

use crate::domain::VoteLookupResult;
use crate::infrastructure::{VoteRepository, VoteRepositoryError};

/// 投票検索ハンドラーのエラー型
#[derive(Debug, Clone, PartialEq, Error)]
pub enum VoteQueryHandlerError {
    /// questionが欠落、または文字列でない
    #[error("Missing question in payload")]
    MissingQuestion,

    /// リポジトリ操作エラー
    #[error("Repository error: {0}")]
    Repository(#[from] VoteRepositoryError),
}

/// 投票検索ハンドラー
pub struct VoteQueryHandler<R>
where
    R: VoteRepository,
{
    vote_repo: R,
}

impl<R> VoteQueryHandler<R>
where
    R: VoteRepository,
{
    pub fn new(vote_repo: R) -> Self {
        Self { vote_repo }
    }

    pub async fn handle(&self, payload: &Value) -> Result<VoteLookupResult, VoteQueryHandlerError> {
        let question = payload
            .get("question")
            .and_then(|q| q.as_str())
            .ok_or(VoteQueryHandlerError::MissingQuestion)?;

        let items = self.vote_repo.find_by_question(question).await?;
        info!(question = %question, item_count = items.len(), "投票検索完了");

        Ok(VoteLookupResult { items })
    }
}

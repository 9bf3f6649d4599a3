/// 投票集計
///
/// 投票テーブルのアイテム（`voteType` ごとの得票数）から賛成・反対の票数を取り出す。
/// voteType 0 が反対、1 が賛成。
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// 反対票のvoteType
pub const VOTE_TYPE_NO: i64 = 0;

/// 賛成票のvoteType
pub const VOTE_TYPE_YES: i64 = 1;

/// 投票集計のエラー型
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VoteTallyError {
    /// 指定したvoteTypeのアイテムが存在しない
    #[error("vote type {0} not found in lookup result")]
    MissingVoteType(i64),
}

/// 投票テーブルの1アイテム
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct VoteItem {
    #[serde(rename = "voteType")]
    pub vote_type: i64,
    pub votes: u64,
}

impl VoteItem {
    pub fn new(vote_type: i64, votes: u64) -> Self {
        Self { vote_type, votes }
    }
}

/// 投票検索結果（`{"Items": [...]}`）
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct VoteLookupResult {
    #[serde(rename = "Items", default)]
    pub items: Vec<VoteItem>,
}

/// 賛成・反対の票数
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VoteTally {
    pub yes: u64,
    pub no: u64,
}

impl VoteTally {
    /// アイテムから集計を作成
    ///
    /// 同じvoteTypeが複数ある場合は先頭を採用する。
    /// どちらかのvoteTypeが欠けている場合は0とみなさずエラーにする。
    pub fn from_items(items: &[VoteItem]) -> Result<Self, VoteTallyError> {
        let votes_of = |vote_type: i64| {
            items
                .iter()
                .find(|item| item.vote_type == vote_type)
                .map(|item| item.votes)
                .ok_or(VoteTallyError::MissingVoteType(vote_type))
        };

        let no = votes_of(VOTE_TYPE_NO)?;
        let yes = votes_of(VOTE_TYPE_YES)?;

        Ok(Self { yes, no })
    }
}

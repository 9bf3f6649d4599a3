/// DynamoDBの投票テーブルを参照するリポジトリ
///
/// テーブルはパーティションキー `question` を持ち、voteTypeごとに1アイテムを保持する。
use async_trait::async_trait;
use aws_sdk_dynamodb::types::AttributeValue;
use aws_sdk_dynamodb::Client as DynamoDbClient;
use thiserror::Error;
use tracing::debug;

use crate::domain::VoteItem;

/// 投票リポジトリのエラー型
#[derive(Debug, Error, Clone, PartialEq)]
pub enum VoteRepositoryError {
    /// クエリ実行に失敗
    #[error("Query execution error: {0}")]
    QueryError(String),

    /// デシリアライズに失敗
    #[error("Deserialization error: {0}")]
    DeserializationError(String),
}

/// 投票リポジトリトレイト
#[async_trait]
pub trait VoteRepository: Send + Sync {
    /// 質問IDに対応する投票アイテムを取得
    async fn find_by_question(&self, question: &str) -> Result<Vec<VoteItem>, VoteRepositoryError>;
}

/// DynamoDB投票リポジトリ
#[derive(Debug, Clone)]
pub struct DynamoVoteRepository {
    client: DynamoDbClient,
    table_name: String,
}

impl DynamoVoteRepository {
    pub fn new(client: DynamoDbClient, table_name: impl Into<String>) -> Self {
        Self {
            client,
            table_name: table_name.into(),
        }
    }

    /// AWS設定からデフォルトのクライアントを作成
    pub async fn from_config(table_name: impl Into<String>) -> Self {
        let config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
        Self::new(DynamoDbClient::new(&config), table_name)
    }
}

#[async_trait]
impl VoteRepository for DynamoVoteRepository {
    async fn find_by_question(&self, question: &str) -> Result<Vec<VoteItem>, VoteRepositoryError> {
        let result = self
            .client
            .query()
            .table_name(&self.table_name)
            .key_condition_expression("#question = :question")
            .expression_attribute_names("#question", "question")
            .expression_attribute_values(":question", AttributeValue::S(question.to_string()))
            .send()
            .await
            .map_err(|e| VoteRepositoryError::QueryError(e.into_service_error().to_string()))?;

        let items = result.items.unwrap_or_default();
        debug!(
            table_name = %self.table_name,
            question = %question,
            item_count = items.len(),
            "投票アイテム取得"
        );

        serde_dynamo::aws_sdk_dynamodb_1::from_items(items)
            .map_err(|e| VoteRepositoryError::DeserializationError(e.to_string()))
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};

    /// テスト用のモック投票リポジトリ
    #[derive(Clone, Default)]
    pub(crate) struct MockVoteRepository {
        /// 質問IDごとの投票アイテム
        items: HashMap<String, Vec<VoteItem>>,
        /// 問い合わせられた質問ID
        queried: Arc<Mutex<Vec<String>>>,
    }

    impl MockVoteRepository {
        pub(crate) fn new() -> Self {
            Self::default()
        }

        pub(crate) fn with_items(mut self, question: &str, items: Vec<VoteItem>) -> Self {
            self.items.insert(question.to_string(), items);
            self
        }

        pub(crate) fn queried(&self) -> Vec<String> {
            self.queried.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl VoteRepository for MockVoteRepository {
        async fn find_by_question(
            &self,
            question: &str,
        ) -> Result<Vec<VoteItem>, VoteRepositoryError> {
            self.queried.lock().unwrap().push(question.to_string());
            Ok(self.items.get(question).cloned().unwrap_or_default())
        }
    }

    #[test]
    fn test_items_deserialize_from_attribute_values() {
        let item: HashMap<String, AttributeValue> = HashMap::from([
            ("question".to_string(), AttributeValue::S("debugroom".to_string())),
            ("voteType".to_string(), AttributeValue::N("1".to_string())),
            ("votes".to_string(), AttributeValue::N("7".to_string())),
        ]);

        let items: Vec<VoteItem> =
            serde_dynamo::aws_sdk_dynamodb_1::from_items(vec![item]).unwrap();

        assert_eq!(items, vec![VoteItem::new(1, 7)]);
    }

    #[test]
    fn test_item_missing_votes_fails_to_deserialize() {
        let item: HashMap<String, AttributeValue> = HashMap::from([(
            "voteType".to_string(),
            AttributeValue::N("0".to_string()),
        )]);

        let result: Result<Vec<VoteItem>, _> =
            serde_dynamo::aws_sdk_dynamodb_1::from_items(vec![item]);

        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_mock_repository_unknown_question_is_empty() {
        let repo = MockVoteRepository::new().with_items("debugroom", vec![VoteItem::new(0, 1)]);

        assert!(repo.find_by_question("other").await.unwrap().is_empty());
        assert_eq!(repo.queried(), vec!["other".to_string()]);
    }
}

// フォローアップ送信クライアント
//
// 遅延応答（type 5）を返したInteractionに対して、
// Discord Webhook `POST {base}/{application_id}/{token}` で実際の応答を送信する。

use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use thiserror::Error;
use tracing::{error, info, instrument};

use crate::domain::CommandResponse;

/// リクエストタイムアウト（秒）
const REQUEST_TIMEOUT_SECS: u64 = 10;

/// 接続タイムアウト（秒）
const CONNECT_TIMEOUT_SECS: u64 = 5;

/// フォローアップ送信のエラー型
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FollowupError {
    /// HTTPエラー（ステータスコード付き）
    #[error("HTTPエラー: status={status}, message={message}")]
    HttpError {
        /// HTTPステータスコード
        status: u16,
        /// レスポンスボディ
        message: String,
    },

    /// ネットワークエラー
    #[error("ネットワークエラー: {0}")]
    NetworkError(String),

    /// シリアライズエラー
    #[error("シリアライズエラー: {0}")]
    SerializationError(String),

    /// HTTPクライアントの構築に失敗
    #[error("HTTPクライアント構築エラー: {0}")]
    ClientBuildError(String),
}

/// フォローアップ送信トレイト
///
/// 実際のDiscord Webhookクライアントとテスト用モックを差し替えるための抽象化。
#[async_trait]
pub trait FollowupSender: Send + Sync {
    /// Interactionトークン宛てに応答を送信
    async fn send(&self, token: &str, response: &CommandResponse) -> Result<(), FollowupError>;
}

/// Discord Webhookクライアント
#[derive(Clone)]
pub struct DiscordFollowupSender {
    /// HTTPクライアント
    client: Client,
    /// WebhookベースURL（例: "https://discord.com/api/webhooks"）
    base_url: String,
    /// DiscordアプリケーションID
    application_id: String,
}

impl std::fmt::Debug for DiscordFollowupSender {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DiscordFollowupSender")
            .field("base_url", &self.base_url)
            .field("application_id", &self.application_id)
            .finish_non_exhaustive()
    }
}

impl DiscordFollowupSender {
    /// 新しいDiscordFollowupSenderを作成
    pub fn new(
        base_url: impl Into<String>,
        application_id: impl Into<String>,
    ) -> Result<Self, FollowupError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
            .build()
            .map_err(|e| FollowupError::ClientBuildError(e.to_string()))?;

        Ok(Self {
            client,
            base_url: base_url.into(),
            application_id: application_id.into(),
        })
    }

    /// フォローアップURLを構築
    ///
    /// # 戻り値
    /// `{base}/{application_id}/{token}`（ベースURL末尾のスラッシュは除去）
    pub fn followup_url(&self, token: &str) -> String {
        format!(
            "{}/{}/{}",
            self.base_url.trim_end_matches('/'),
            self.application_id,
            token
        )
    }
}

#[async_trait]
impl FollowupSender for DiscordFollowupSender {
    #[instrument(skip_all, fields(application_id = %self.application_id))]
    async fn send(&self, token: &str, response: &CommandResponse) -> Result<(), FollowupError> {
        let body = serde_json::to_string(response)
            .map_err(|e| FollowupError::SerializationError(e.to_string()))?;

        let http_response = self
            .client
            .post(self.followup_url(token))
            .header("Content-Type", "application/json")
            .body(body)
            .send()
            .await
            .map_err(|e| {
                error!(error = %e, "フォローアップ送信リクエスト失敗");
                FollowupError::NetworkError(e.to_string())
            })?;

        let status = http_response.status();
        let text = http_response.text().await.unwrap_or_default();

        if status.is_success() {
            info!(status = %status, body = %text, "フォローアップ送信成功");
            return Ok(());
        }

        error!(status = %status, body = %text, "フォローアップ送信エラー");
        Err(FollowupError::HttpError {
            status: status.as_u16(),
            message: text,
        })
    }
}

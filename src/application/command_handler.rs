/// コマンドハンドラー（バックエンド）
///
/// Interaction Lambdaから引き渡されたInteractionに対してコマンドを実行し、
/// 応答をフォローアップURLへ送信する。
use serde_json::Value;
use thiserror::Error;
use tracing::{error, info};

use super::commands::{CommandError, CommandRegistry};
use crate::domain::{CommandResponse, Interaction};
use crate::infrastructure::FollowupSender;

/// コマンドハンドラーのエラー型
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CommandHandlerError {
    /// ペイロードがInteractionとして解釈できない
    #[error("Malformed interaction payload: {0}")]
    MalformedPayload(String),

    /// コマンド実行エラー
    #[error("Command failed: {0}")]
    Command(#[from] CommandError),
}

/// コマンドハンドラー
pub struct CommandHandler<F>
where
    F: FollowupSender,
{
    /// コマンド登録表
    registry: CommandRegistry,
    /// フォローアップ送信
    sender: F,
}

impl<F> CommandHandler<F>
where
    F: FollowupSender,
{
    pub fn new(registry: CommandRegistry, sender: F) -> Self {
        Self { registry, sender }
    }

    /// ペイロードをInteractionに変換
    ///
    /// JSONオブジェクトに加え、Interactionを文字列化したJSON文字列も受け付ける。
    pub fn parse_payload(payload: &Value) -> Result<Interaction, CommandHandlerError> {
        let result = match payload {
            Value::String(encoded) => serde_json::from_str(encoded),
            other => serde_json::from_value(other.clone()),
        };

        result.map_err(|e| CommandHandlerError::MalformedPayload(e.to_string()))
    }

    /// Interactionを処理
    ///
    /// # 処理フロー
    /// 1. ペイロードをInteractionに変換
    /// 2. コマンド名で登録表を引いて応答を生成
    /// 3. フォローアップURLへ応答を送信（失敗はログのみ）
    ///
    /// # 戻り値
    /// * `Ok(CommandResponse)` - 生成した応答（送信の成否によらない）
    /// * `Err(CommandHandlerError)` - ペイロード不正またはコマンド実行失敗（送信しない）
    pub async fn handle(&self, payload: &Value) -> Result<CommandResponse, CommandHandlerError> {
        let interaction = Self::parse_payload(payload)?;

        let response = self.registry.respond(&interaction).await?;

        match self.sender.send(&interaction.token, &response).await {
            Ok(()) => {
                info!(
                    command = interaction.command_name().unwrap_or("(none)"),
                    "フォローアップ送信完了"
                );
            }
            Err(err) => {
                // 呼び出し元は既に遅延応答を受け取っているため伝播しない
                error!(
                    command = interaction.command_name().unwrap_or("(none)"),
                    error = %err,
                    "フォローアップ送信失敗"
                );
            }
        }

        Ok(response)
    }
}

/// Discord Interactionのモデル
///
/// Webhookで受信するInteractionのうち、本システムが参照するフィールドのみを定義する。
/// 未知のフィールドは無視する。
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Interaction種別
///
/// PINGとアプリケーションコマンド以外の値もそのまま保持する。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(from = "u64", into = "u64")]
pub enum InteractionType {
    /// 疎通確認（type = 1）
    Ping,
    /// スラッシュコマンド（type = 2）
    ApplicationCommand,
    /// その他の種別
    Other(u64),
}

impl From<u64> for InteractionType {
    fn from(value: u64) -> Self {
        match value {
            1 => InteractionType::Ping,
            2 => InteractionType::ApplicationCommand,
            other => InteractionType::Other(other),
        }
    }
}

impl From<InteractionType> for u64 {
    fn from(value: InteractionType) -> Self {
        match value {
            InteractionType::Ping => 1,
            InteractionType::ApplicationCommand => 2,
            InteractionType::Other(other) => other,
        }
    }
}

/// コマンド引数
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct CommandOption {
    /// 引数名
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// 引数値（文字列・数値など）
    #[serde(default)]
    pub value: Value,
}

impl CommandOption {
    /// 引数値を文字列として取得
    ///
    /// 文字列はそのまま、それ以外はJSON表現を返す。nullの場合はNone。
    pub fn value_as_string(&self) -> Option<String> {
        match &self.value {
            Value::Null => None,
            Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }
}

/// コマンドデータ
///
/// コンポーネント操作やモーダル送信の `data` には `name` がない。
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct InteractionData {
    /// コマンド名
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// コマンド引数（順序を保持）
    #[serde(default)]
    pub options: Vec<CommandOption>,
}

/// 受信したInteraction
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Interaction {
    /// Interaction種別
    #[serde(rename = "type")]
    pub kind: InteractionType,
    /// コマンドデータ（PINGには存在しない）
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<InteractionData>,
    /// フォローアップ送信用トークン
    #[serde(default)]
    pub token: String,
}

impl Interaction {
    /// PINGかどうか
    pub fn is_ping(&self) -> bool {
        self.kind == InteractionType::Ping
    }

    /// コマンド名を取得
    pub fn command_name(&self) -> Option<&str> {
        self.data.as_ref().and_then(|data| data.name.as_deref())
    }

    /// 指定位置のコマンド引数を取得
    pub fn option(&self, index: usize) -> Option<&CommandOption> {
        self.data.as_ref().and_then(|data| data.options.get(index))
    }
}

/// Interactionへの同期応答
///
/// - type 1: PONG
/// - type 5: 遅延応答（後でフォローアップを送信する）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct InteractionResponse {
    #[serde(rename = "type")]
    pub kind: u8,
}

impl InteractionResponse {
    /// PING応答
    pub const fn pong() -> Self {
        Self { kind: 1 }
    }

    /// 遅延応答（DEFERRED_CHANNEL_MESSAGE_WITH_SOURCE）
    pub const fn deferred() -> Self {
        Self { kind: 5 }
    }
}

/// Lambda関数ごとの設定
///
/// 設定はコールドスタート時に一度だけ読み込み、ハンドラーへ明示的に渡す。
/// ビジネスロジック内では環境変数を参照しない。
use thiserror::Error;
use url::Url;

use super::ssm_ops::{SsmOps, SsmOpsError};

/// 公開鍵パラメータ名のデフォルト
pub const DEFAULT_PUBLIC_KEY_PARAMETER: &str = "/discord/discordApiBotPublicKey";

/// コマンドLambda ARNパラメータ名のデフォルト
pub const DEFAULT_COMMAND_FUNCTION_PARAMETER: &str = "/discord/discordCommandLambdaArn";

/// Discord WebhookベースURLのデフォルト
pub const DEFAULT_WEBHOOK_BASE_URL: &str = "https://discord.com/api/webhooks";

/// 設定のエラー型
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Invalid URL in {var}: {message}")]
    InvalidUrl { var: String, message: String },

    #[error("Failed to resolve secrets: {0}")]
    Ssm(#[from] SsmOpsError),
}

fn required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key)
        .ok()
        .filter(|value| !value.is_empty())
        .ok_or_else(|| ConfigError::MissingEnvVar(key.to_string()))
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key)
        .ok()
        .filter(|value| !value.is_empty())
        .unwrap_or_else(|| default.to_string())
}

// ==================== Interaction Lambda ====================

/// Interaction Lambdaの設定（SSMパラメータ名）
///
/// 環境変数:
/// - PUBLIC_KEY_PARAMETER: 公開鍵のパラメータ名
/// - COMMAND_FUNCTION_PARAMETER: コマンドLambda ARNのパラメータ名
#[derive(Debug, Clone, PartialEq)]
pub struct InteractionConfig {
    public_key_parameter: String,
    command_function_parameter: String,
}

impl Default for InteractionConfig {
    fn default() -> Self {
        Self::new(
            DEFAULT_PUBLIC_KEY_PARAMETER,
            DEFAULT_COMMAND_FUNCTION_PARAMETER,
        )
    }
}

impl InteractionConfig {
    pub fn new(
        public_key_parameter: impl Into<String>,
        command_function_parameter: impl Into<String>,
    ) -> Self {
        Self {
            public_key_parameter: public_key_parameter.into(),
            command_function_parameter: command_function_parameter.into(),
        }
    }

    /// 環境変数から読み込み（未設定の場合はデフォルト）
    pub fn from_env() -> Self {
        Self::new(
            env_or("PUBLIC_KEY_PARAMETER", DEFAULT_PUBLIC_KEY_PARAMETER),
            env_or(
                "COMMAND_FUNCTION_PARAMETER",
                DEFAULT_COMMAND_FUNCTION_PARAMETER,
            ),
        )
    }

    pub fn public_key_parameter(&self) -> &str {
        &self.public_key_parameter
    }

    pub fn command_function_parameter(&self) -> &str {
        &self.command_function_parameter
    }

    /// SSMから秘密情報を取得
    ///
    /// 2つのパラメータを1回のGetParameters呼び出しで取得する。
    pub async fn resolve_secrets<S: SsmOps + ?Sized>(
        &self,
        ssm: &S,
    ) -> Result<InteractionSecrets, ConfigError> {
        let mut values = ssm
            .get_parameters(&[
                self.public_key_parameter.as_str(),
                self.command_function_parameter.as_str(),
            ])
            .await?;

        let mut take = |name: &str| {
            values
                .remove(name)
                .ok_or_else(|| ConfigError::Ssm(SsmOpsError::ParameterNotFound(name.to_string())))
        };

        let public_key = take(self.public_key_parameter.as_str())?;
        let command_function = take(self.command_function_parameter.as_str())?;

        Ok(InteractionSecrets {
            public_key,
            command_function,
        })
    }
}

/// SSMから取得した秘密情報
#[derive(Clone, PartialEq)]
pub struct InteractionSecrets {
    /// アプリケーション公開鍵（16進数）
    public_key: String,
    /// コマンドLambdaの関数名またはARN
    command_function: String,
}

impl std::fmt::Debug for InteractionSecrets {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InteractionSecrets")
            .field("command_function", &self.command_function)
            .finish_non_exhaustive()
    }
}

impl InteractionSecrets {
    pub fn new(public_key: impl Into<String>, command_function: impl Into<String>) -> Self {
        Self {
            public_key: public_key.into(),
            command_function: command_function.into(),
        }
    }

    pub fn public_key(&self) -> &str {
        &self.public_key
    }

    pub fn command_function(&self) -> &str {
        &self.command_function
    }
}

// ==================== Command Lambda ====================

/// コマンドLambdaの設定
///
/// 環境変数:
/// - SLASHBOT_APP_ID: DiscordアプリケーションID（必須）
/// - GET_VOTES_FUNCTION_ARN: 投票検索Lambdaの関数名またはARN（必須）
/// - DISCORD_WEBHOOK_BASE_URL: WebhookのベースURL（任意）
#[derive(Debug, Clone, PartialEq)]
pub struct CommandConfig {
    application_id: String,
    votes_function: String,
    webhook_base_url: String,
}

impl CommandConfig {
    pub fn new(
        application_id: impl Into<String>,
        votes_function: impl Into<String>,
        webhook_base_url: impl Into<String>,
    ) -> Self {
        Self {
            application_id: application_id.into(),
            votes_function: votes_function.into(),
            webhook_base_url: webhook_base_url.into(),
        }
    }

    /// 環境変数から読み込み
    pub fn from_env() -> Result<Self, ConfigError> {
        let application_id = required_env("SLASHBOT_APP_ID")?;
        let votes_function = required_env("GET_VOTES_FUNCTION_ARN")?;
        let webhook_base_url = env_or("DISCORD_WEBHOOK_BASE_URL", DEFAULT_WEBHOOK_BASE_URL);

        Url::parse(&webhook_base_url).map_err(|e| ConfigError::InvalidUrl {
            var: "DISCORD_WEBHOOK_BASE_URL".to_string(),
            message: e.to_string(),
        })?;

        Ok(Self::new(application_id, votes_function, webhook_base_url))
    }

    pub fn application_id(&self) -> &str {
        &self.application_id
    }

    pub fn votes_function(&self) -> &str {
        &self.votes_function
    }

    pub fn webhook_base_url(&self) -> &str {
        &self.webhook_base_url
    }
}

// ==================== Vote Query Lambda ====================

/// 投票検索Lambdaの設定
///
/// 環境変数:
/// - VOTES_TABLE: 投票テーブル名（必須）
#[derive(Debug, Clone, PartialEq)]
pub struct VoteTableConfig {
    table_name: String,
}

impl VoteTableConfig {
    pub fn new(table_name: impl Into<String>) -> Self {
        Self {
            table_name: table_name.into(),
        }
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self::new(required_env("VOTES_TABLE")?))
    }

    pub fn table_name(&self) -> &str {
        &self.table_name
    }
}

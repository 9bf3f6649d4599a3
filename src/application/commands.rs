// スラッシュコマンドの登録と実行
//
// コマンド名から実行するコマンドを引く登録表を提供する。
// コマンドの追加は登録表への登録のみで行い、分岐を書き換えない。
// 未登録のコマンドはエラーにせず固定メッセージを返す。

pub mod get_votes;
pub mod wave;

use std::collections::HashMap;

use async_trait::async_trait;
use thiserror::Error;
use tracing::{info, warn};

use crate::domain::{CommandResponse, Interaction, VoteTallyError};
use crate::infrastructure::{LambdaOps, LambdaOpsError};

pub use get_votes::GetVotesCommand;
pub use wave::WaveCommand;

/// 未登録コマンドへの応答
pub const FALLBACK_CONTENT: &str = "Somehow this command doesn't have a switch for it yet, oops!";

/// コマンド実行のエラー型
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CommandError {
    /// 必要なコマンド引数がない
    #[error("missing command option at index {0}")]
    MissingOption(usize),

    /// 検索Lambdaの呼び出しに失敗
    #[error("lookup invocation failed: {0}")]
    Lookup(#[from] LambdaOpsError),

    /// 検索結果が想定した形式でない
    #[error("malformed lookup result: {0}")]
    MalformedLookupResult(String),

    /// 集計に必要な投票種別が欠けている
    #[error(transparent)]
    Tally(#[from] VoteTallyError),
}

/// スラッシュコマンド
#[async_trait]
pub trait SlashCommand: Send + Sync {
    /// コマンド名（Discord上の `data.name`）
    fn name(&self) -> &'static str;

    /// コマンドを実行して応答を生成
    async fn execute(&self, interaction: &Interaction) -> Result<CommandResponse, CommandError>;
}

/// コマンド登録表
#[derive(Default)]
pub struct CommandRegistry {
    commands: HashMap<&'static str, Box<dyn SlashCommand>>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// 組み込みコマンド（wave, getvotes）を登録した登録表を作成
    pub fn with_builtin_commands<L>(lambda_ops: L, votes_function: impl Into<String>) -> Self
    where
        L: LambdaOps + 'static,
    {
        Self::new()
            .register(WaveCommand)
            .register(GetVotesCommand::new(lambda_ops, votes_function))
    }

    /// コマンドを登録（同名のコマンドは置き換える）
    pub fn register<C>(mut self, command: C) -> Self
    where
        C: SlashCommand + 'static,
    {
        self.commands.insert(command.name(), Box::new(command));
        self
    }

    /// 登録済みかどうか
    pub fn contains(&self, name: &str) -> bool {
        self.commands.contains_key(name)
    }

    /// 登録済みのコマンド名（ソート済み）
    pub fn names(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.commands.keys().copied().collect();
        names.sort_unstable();
        names
    }

    /// Interactionのコマンド名で実行するコマンドを選び、応答を生成
    pub async fn respond(
        &self,
        interaction: &Interaction,
    ) -> Result<CommandResponse, CommandError> {
        let name = interaction.command_name();

        match name.and_then(|name| self.commands.get(name)) {
            Some(command) => {
                info!(command = command.name(), "コマンド実行");
                command.execute(interaction).await
            }
            None => {
                warn!(command = name.unwrap_or("(none)"), "未登録のコマンド");
                Ok(CommandResponse::text(FALLBACK_CONTENT))
            }
        }
    }
}

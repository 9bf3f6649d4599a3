use async_trait::async_trait;

use super::{CommandError, SlashCommand};
use crate::domain::{CommandResponse, Interaction};

/// 挨拶を返すだけのコマンド
pub struct WaveCommand;

#[async_trait]
impl SlashCommand for WaveCommand {
    fn name(&self) -> &'static str {
        "wave"
    }

    async fn execute(&self, _interaction: &Interaction) -> Result<CommandResponse, CommandError> {
        Ok(CommandResponse::text("Hello, world!"))
    }
}

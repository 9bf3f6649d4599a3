/// 投票結果コマンド
///
/// 最初のコマンド引数を質問IDとして投票検索Lambdaを同期呼び出しし、
/// 賛成・反対の票数をEmbedにして返す。
use async_trait::async_trait;
use serde_json::json;
use tracing::info;

use super::{CommandError, SlashCommand};
use crate::domain::{
    CommandResponse, Embed, EmbedAuthor, EmbedField, EmbedFooter, Interaction, VoteLookupResult,
    VoteTally,
};
use crate::infrastructure::LambdaOps;

const CONTENT: &str = "The votes for the debug room are currently....";
const AUTHOR_NAME: &str = "Supergoon♫";
const AUTHOR_URL: &str = "https://jrpg.supergoon.com";
const AUTHOR_ICON_URL: &str = "https://i.imgur.com/R66g1Pe.jpg";
const TITLE: &str = "The votes are in!!!";
const URL: &str = "https://google.com/";
const DESCRIPTION: &str = "The votes for the debug room are as follows.....";
const COLOR: u32 = 15258703;
const DISCLAIMER_NAME: &str =
    "These votes were placed by all players who had an active internet connection and chose a value.";
const DISCLAIMER_VALUE: &str = "okay...";
const FOOTER_TEXT: &str = "This notification will self-destruct";
const FOOTER_ICON_URL: &str = "https://i.imgur.com/fKL31aD.jpg";

/// 投票結果コマンド
pub struct GetVotesCommand<L>
where
    L: LambdaOps,
{
    lambda_ops: L,
    /// 投票検索Lambdaの関数名またはARN
    votes_function: String,
}

impl<L> GetVotesCommand<L>
where
    L: LambdaOps,
{
    pub fn new(lambda_ops: L, votes_function: impl Into<String>) -> Self {
        Self {
            lambda_ops,
            votes_function: votes_function.into(),
        }
    }

    /// 投票検索Lambdaを呼び出して集計を取得
    async fn lookup(&self, question: &str) -> Result<VoteTally, CommandError> {
        let payload = json!({ "question": question }).to_string();

        let body = self
            .lambda_ops
            .invoke_request_response(&self.votes_function, payload.as_bytes())
            .await?;

        let result: VoteLookupResult = serde_json::from_slice(&body)
            .map_err(|e| CommandError::MalformedLookupResult(e.to_string()))?;

        Ok(VoteTally::from_items(&result.items)?)
    }
}

/// 集計から応答を生成
pub fn votes_response(tally: &VoteTally) -> CommandResponse {
    let embed = Embed::new()
        .author(EmbedAuthor {
            name: AUTHOR_NAME.to_string(),
            url: Some(AUTHOR_URL.to_string()),
            icon_url: Some(AUTHOR_ICON_URL.to_string()),
        })
        .title(TITLE)
        .url(URL)
        .description(DESCRIPTION)
        .color(COLOR)
        .field(EmbedField::inline("Yes", tally.yes.to_string()))
        .field(EmbedField::inline("No", tally.no.to_string()))
        .field(EmbedField::new(DISCLAIMER_NAME, DISCLAIMER_VALUE))
        .footer(EmbedFooter {
            text: FOOTER_TEXT.to_string(),
            icon_url: Some(FOOTER_ICON_URL.to_string()),
        });

    CommandResponse::text(CONTENT).with_embed(embed)
}

#[async_trait]
impl<L> SlashCommand for GetVotesCommand<L>
where
    L: LambdaOps,
{
    fn name(&self) -> &'static str {
        "getvotes"
    }

    async fn execute(&self, interaction: &Interaction) -> Result<CommandResponse, CommandError> {
        let question = interaction
            .option(0)
            .and_then(|option| option.value_as_string())
            .ok_or(CommandError::MissingOption(0))?;

        let tally = self.lookup(&question).await?;
        info!(question = %question, yes = tally.yes, no = tally.no, "投票集計取得");

        Ok(votes_response(&tally))
    }
}

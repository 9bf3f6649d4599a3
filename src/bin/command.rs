/// コマンドLambdaエントリポイント
///
/// Interaction LambdaからEvent呼び出しで渡されたInteractionに対してコマンドを実行し、
/// フォローアップURLへ応答を送信する。
use aws_sdk_lambda::Client as LambdaClient;
use lambda_runtime::{service_fn, Error, LambdaEvent};
use serde_json::Value;
use slashbot::application::{CommandHandler, CommandRegistry};
use slashbot::infrastructure::{init_logging, AwsLambdaOps, CommandConfig, DiscordFollowupSender};
use tokio::sync::OnceCell;
use tracing::{error, info};

/// CommandHandlerの静的インスタンス
static COMMAND_HANDLER: OnceCell<CommandHandler<DiscordFollowupSender>> = OnceCell::const_new();

/// CommandHandlerを取得（初期化されていなければ初期化）
async fn get_command_handler() -> Result<&'static CommandHandler<DiscordFollowupSender>, Error> {
    COMMAND_HANDLER
        .get_or_try_init(|| async {
            let config = CommandConfig::from_env()?;
            let aws_config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;

            let registry = CommandRegistry::with_builtin_commands(
                AwsLambdaOps::new(LambdaClient::new(&aws_config)),
                config.votes_function(),
            );
            let sender =
                DiscordFollowupSender::new(config.webhook_base_url(), config.application_id())?;

            info!(
                commands = ?registry.names(),
                votes_function = config.votes_function(),
                "CommandHandlerを初期化"
            );

            Ok::<_, Error>(CommandHandler::new(registry, sender))
        })
        .await
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    // 構造化ログを初期化
    init_logging();

    // Lambda関数を初期化して実行
    let func = service_fn(handler);
    lambda_runtime::run(func).await?;
    Ok(())
}

/// Lambda関数のメインハンドラー
///
/// # 処理フロー
/// 1. CommandHandlerを取得（設定読み込み）
/// 2. コマンドを実行してフォローアップを送信
/// 3. コマンド実行エラーはLambdaのエラーとして返す（フォローアップ送信失敗はログのみ）
async fn handler(event: LambdaEvent<Value>) -> Result<(), Error> {
    let command_handler = get_command_handler().await.map_err(|err| {
        error!(error = %err, "CommandHandlerの初期化に失敗");
        err
    })?;

    match command_handler.handle(&event.payload).await {
        Ok(_) => Ok(()),
        Err(err) => {
            error!(
                request_id = %event.context.request_id,
                error = %err,
                "コマンド処理エラー"
            );
            Err(err.into())
        }
    }
}

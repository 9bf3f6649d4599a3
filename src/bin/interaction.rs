/// Discord Interactionエンドポイント Lambdaエントリポイント
///
/// API Gateway / Lambda Function URL経由でDiscordのWebhookリクエストを受信し、
/// 署名検証・PING応答・コマンドLambdaへの引き渡しを行う。
use aws_sdk_lambda::Client as LambdaClient;
use aws_sdk_ssm::Client as SsmClient;
use lambda_http::{run, service_fn, Body, Error, Request, Response};
use slashbot::application::InteractionHandler;
use slashbot::domain::SignatureVerifier;
use slashbot::infrastructure::{init_logging, AwsLambdaOps, AwsSsmOps, InteractionConfig};
use tokio::sync::OnceCell;
use tracing::{error, info};

/// InteractionHandlerの静的インスタンス
///
/// SSMから取得した公開鍵とコマンドLambda ARNはwarm start時に再利用する。
/// 初期化に失敗した場合は次の呼び出しで再試行される。
static INTERACTION_HANDLER: OnceCell<InteractionHandler<AwsLambdaOps>> = OnceCell::const_new();

/// InteractionHandlerを取得（初期化されていなければ初期化）
async fn get_interaction_handler() -> Result<&'static InteractionHandler<AwsLambdaOps>, Error> {
    INTERACTION_HANDLER
        .get_or_try_init(|| async {
            let config = InteractionConfig::from_env();
            let aws_config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;

            let ssm = AwsSsmOps::new(SsmClient::new(&aws_config));
            let secrets = config.resolve_secrets(&ssm).await?;
            let verifier = SignatureVerifier::from_hex(secrets.public_key())?;

            info!(
                public_key_parameter = config.public_key_parameter(),
                command_function = secrets.command_function(),
                "InteractionHandlerを初期化"
            );

            Ok::<_, Error>(InteractionHandler::new(
                verifier,
                AwsLambdaOps::new(LambdaClient::new(&aws_config)),
                secrets.command_function(),
            ))
        })
        .await
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    // 構造化ログを初期化
    init_logging();

    run(service_fn(handler)).await
}

/// HTTPリクエストハンドラー
///
/// 署名検証失敗は401、それ以外のエラーはLambdaのエラーとして返す。
async fn handler(request: Request) -> Result<Response<Body>, Error> {
    let interaction_handler = get_interaction_handler().await.map_err(|err| {
        error!(error = %err, "InteractionHandlerの初期化に失敗");
        err
    })?;

    match interaction_handler.handle_request(&request).await {
        Ok(response) => {
            info!(status = response.status().as_u16(), "Interaction応答");
            Ok(response)
        }
        Err(err) => {
            error!(error = %err, "Interaction処理エラー");
            Err(err.into())
        }
    }
}

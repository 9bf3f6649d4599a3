/// 投票検索Lambdaエントリポイント
///
/// getvotesコマンドから同期呼び出しされ、投票テーブルの該当アイテムを返す。
use lambda_runtime::{service_fn, Error, LambdaEvent};
use serde_json::Value;
use slashbot::application::VoteQueryHandler;
use slashbot::infrastructure::{init_logging, DynamoVoteRepository, VoteTableConfig};
use tokio::sync::OnceCell;
use tracing::error;

/// DynamoVoteRepositoryの静的インスタンス
static VOTE_REPO: OnceCell<DynamoVoteRepository> = OnceCell::const_new();

async fn get_vote_repo() -> Result<&'static DynamoVoteRepository, Error> {
    VOTE_REPO
        .get_or_try_init(|| async {
            let config = VoteTableConfig::from_env()?;
            Ok::<_, Error>(DynamoVoteRepository::from_config(config.table_name()).await)
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
async fn handler(event: LambdaEvent<Value>) -> Result<Value, Error> {
    let vote_repo = get_vote_repo().await?;
    let handler = VoteQueryHandler::new(vote_repo.clone());

    let result = handler.handle(&event.payload).await.map_err(|err| {
        error!(error = %err, "投票検索エラー");
        err
    })?;

    Ok(serde_json::to_value(result)?)
}

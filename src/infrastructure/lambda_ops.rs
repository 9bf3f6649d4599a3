//! Lambda操作モジュール
//!
//! 他のLambda関数の呼び出しを提供する。
//! - Event呼び出し（一方向送信、結果を待たない）: Interaction → コマンドLambda
//! - RequestResponse呼び出し（同期、結果を受け取る）: getvotes → 投票検索Lambda

use async_trait::async_trait;
use aws_sdk_lambda::primitives::Blob;
use aws_sdk_lambda::types::InvocationType;
use aws_sdk_lambda::Client as LambdaClient;
use thiserror::Error;
use tracing::{info, warn};

/// Lambda操作のエラー型
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LambdaOpsError {
    /// AWS SDK エラー
    #[error("AWS Lambda APIエラー: {0}")]
    AwsSdkError(String),
    /// 呼び出し先関数がエラーを返した（FunctionError）
    #[error("関数エラー ({function_name}): {message}")]
    FunctionError {
        /// 関数名
        function_name: String,
        /// エラー内容（関数が返したペイロード）
        message: String,
    },
}

/// Lambda操作トレイト（テスト用の抽象化）
#[async_trait]
pub trait LambdaOps: Send + Sync {
    /// 関数を非同期（Event）で呼び出す
    ///
    /// 呼び出しはキューに投入されるのみで、関数の実行結果は受け取らない。
    ///
    /// # 引数
    /// * `function_name` - 関数名またはARN
    /// * `payload` - ペイロード（JSONバイト列をそのまま渡す）
    async fn invoke_event(&self, function_name: &str, payload: &[u8]) -> Result<(), LambdaOpsError>;

    /// 関数を同期（RequestResponse）で呼び出し、結果のペイロードを返す
    async fn invoke_request_response(
        &self,
        function_name: &str,
        payload: &[u8],
    ) -> Result<Vec<u8>, LambdaOpsError>;
}

/// 実際のAWS Lambda SDKを使用したLambda操作実装
#[derive(Debug, Clone)]
pub struct AwsLambdaOps {
    client: LambdaClient,
}

impl AwsLambdaOps {
    /// 新しいAwsLambdaOpsを作成
    pub fn new(client: LambdaClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl LambdaOps for AwsLambdaOps {
    async fn invoke_event(
        &self,
        function_name: &str,
        payload: &[u8],
    ) -> Result<(), LambdaOpsError> {
        let result = self
            .client
            .invoke()
            .function_name(function_name)
            .invocation_type(InvocationType::Event)
            .payload(Blob::new(payload.to_vec()))
            .send()
            .await;

        match result {
            Ok(output) => {
                info!(
                    function_name = %function_name,
                    status = output.status_code(),
                    "Event呼び出し成功"
                );
                Ok(())
            }
            Err(err) => {
                warn!(
                    function_name = %function_name,
                    error = %err,
                    "Event呼び出しエラー"
                );
                Err(LambdaOpsError::AwsSdkError(err.into_service_error().to_string()))
            }
        }
    }

    async fn invoke_request_response(
        &self,
        function_name: &str,
        payload: &[u8],
    ) -> Result<Vec<u8>, LambdaOpsError> {
        let output = self
            .client
            .invoke()
            .function_name(function_name)
            .invocation_type(InvocationType::RequestResponse)
            .payload(Blob::new(payload.to_vec()))
            .send()
            .await
            .map_err(|err| {
                warn!(
                    function_name = %function_name,
                    error = %err,
                    "RequestResponse呼び出しエラー"
                );
                LambdaOpsError::AwsSdkError(err.into_service_error().to_string())
            })?;

        let body = output
            .payload()
            .map(|blob| blob.as_ref().to_vec())
            .unwrap_or_default();

        if let Some(function_error) = output.function_error() {
            let message = String::from_utf8_lossy(&body).into_owned();
            warn!(
                function_name = %function_name,
                function_error = %function_error,
                payload = %message,
                "呼び出し先関数がエラーを返却"
            );
            return Err(LambdaOpsError::FunctionError {
                function_name: function_name.to_string(),
                message,
            });
        }

        info!(
            function_name = %function_name,
            status = output.status_code(),
            payload_size = body.len(),
            "RequestResponse呼び出し成功"
        );

        Ok(body)
    }
}

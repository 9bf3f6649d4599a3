/// Interactionハンドラー（エッジ検証）
///
/// DiscordからのWebhookリクエストの署名を検証し、
/// - PING（type 1）には同期的にPONGを返す
/// - それ以外は遅延応答（type 5）を返し、生のボディをコマンドLambdaへEvent呼び出しで引き渡す
///
/// コマンドLambdaへの引き渡しは一方向送信であり、失敗しても応答は変えない。
use lambda_http::http::header::{HeaderValue, CONTENT_TYPE};
use lambda_http::http::StatusCode;
use lambda_http::{Body, Request, Response};
use thiserror::Error;
use tracing::{error, info, warn};

use crate::domain::{
    Interaction, InteractionResponse, SignatureEnvelope, SignatureError, SignatureVerifier,
};
use crate::infrastructure::LambdaOps;

/// 署名ヘッダー
pub const SIGNATURE_HEADER: &str = "x-signature-ed25519";

/// タイムスタンプヘッダー
pub const TIMESTAMP_HEADER: &str = "x-signature-timestamp";

/// 署名検証失敗時のレスポンスボディ
pub const INVALID_SIGNATURE_BODY: &str = "Invalid Signature";

/// Interactionハンドラーのエラー型
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InteractionHandlerError {
    /// 署名検証に失敗（401）
    #[error("Invalid Signature: {0}")]
    Unauthorized(SignatureError),

    /// 署名は正しいがボディがInteractionとして解釈できない
    #[error("Malformed interaction body: {0}")]
    MalformedBody(String),

    /// HTTPレスポンスの構築に失敗
    #[error("Failed to build response: {0}")]
    Response(String),
}

/// Interactionハンドラー
pub struct InteractionHandler<L>
where
    L: LambdaOps,
{
    /// 署名検証器
    verifier: SignatureVerifier,
    /// コマンドLambda呼び出し
    lambda_ops: L,
    /// コマンドLambdaの関数名またはARN
    command_function: String,
}

impl<L> InteractionHandler<L>
where
    L: LambdaOps,
{
    pub fn new(
        verifier: SignatureVerifier,
        lambda_ops: L,
        command_function: impl Into<String>,
    ) -> Self {
        Self {
            verifier,
            lambda_ops,
            command_function: command_function.into(),
        }
    }

    /// 署名情報とボディからInteraction応答を生成
    ///
    /// # 処理フロー
    /// 1. timestamp + 生ボディの署名を検証
    /// 2. ボディをInteractionとしてパース
    /// 3. PINGならPONGを返す
    /// 4. それ以外は生ボディをコマンドLambdaへEvent呼び出しし、遅延応答を返す
    pub async fn handle(
        &self,
        envelope: &SignatureEnvelope<'_>,
    ) -> Result<InteractionResponse, InteractionHandlerError> {
        self.verifier.verify(envelope).map_err(|err| {
            warn!(error = %err, "署名検証失敗");
            InteractionHandlerError::Unauthorized(err)
        })?;

        let interaction: Interaction = serde_json::from_slice(envelope.body)
            .map_err(|e| InteractionHandlerError::MalformedBody(e.to_string()))?;

        if interaction.is_ping() {
            info!("PING受信");
            return Ok(InteractionResponse::pong());
        }

        info!(
            interaction_type = u64::from(interaction.kind),
            command = interaction.command_name().unwrap_or("(none)"),
            function_name = %self.command_function,
            "コマンドLambdaへ引き渡し"
        );

        // 受信したボディをそのまま渡す（再シリアライズしない）
        if let Err(err) = self
            .lambda_ops
            .invoke_event(&self.command_function, envelope.body)
            .await
        {
            error!(
                function_name = %self.command_function,
                error = %err,
                "コマンドLambdaへの引き渡しに失敗"
            );
        }

        Ok(InteractionResponse::deferred())
    }

    /// HTTPリクエストを処理してレスポンスを生成
    ///
    /// 署名ヘッダーが欠けている場合も署名検証失敗として401を返す。
    /// 401以外のエラーは呼び出し元（Lambdaランタイム）へ伝播する。
    pub async fn handle_request(
        &self,
        request: &Request,
    ) -> Result<Response<Body>, InteractionHandlerError> {
        let header = |name: &str| {
            request
                .headers()
                .get(name)
                .and_then(|value| value.to_str().ok())
                .unwrap_or_default()
        };

        let body: &[u8] = request.body();
        let envelope = SignatureEnvelope::new(
            header(SIGNATURE_HEADER),
            header(TIMESTAMP_HEADER),
            body,
        );

        match self.handle(&envelope).await {
            Ok(response) => Self::json_response(&response),
            Err(InteractionHandlerError::Unauthorized(_)) => Self::unauthorized_response(),
            Err(err) => Err(err),
        }
    }

    /// 200 OKのJSONレスポンス
    fn json_response(
        response: &InteractionResponse,
    ) -> Result<Response<Body>, InteractionHandlerError> {
        let json = serde_json::to_string(response)
            .map_err(|e| InteractionHandlerError::Response(e.to_string()))?;

        Response::builder()
            .status(StatusCode::OK)
            .header(CONTENT_TYPE, HeaderValue::from_static("application/json"))
            .body(Body::Text(json))
            .map_err(|e| InteractionHandlerError::Response(e.to_string()))
    }

    /// 401 Unauthorizedレスポンス
    fn unauthorized_response() -> Result<Response<Body>, InteractionHandlerError> {
        Response::builder()
            .status(StatusCode::UNAUTHORIZED)
            .header(CONTENT_TYPE, HeaderValue::from_static("text/plain"))
            .body(Body::Text(INVALID_SIGNATURE_BODY.to_string()))
            .map_err(|e| InteractionHandlerError::Response(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::signature::tests::{sign, test_public_key_hex};
    use crate::infrastructure::lambda_ops::tests::MockLambdaOps;
    use crate::infrastructure::logging::init_test_logging;
    use crate::infrastructure::LambdaOpsError;
    use lambda_http::http::Request as HttpRequest;

    const COMMAND_FUNCTION: &str = "arn:aws:lambda:ap-northeast-1:123456789012:function:command";
    const TIMESTAMP: &str = "1700000000";

    // ==================== テストヘルパー ====================

    fn create_test_handler(lambda_ops: MockLambdaOps) -> InteractionHandler<MockLambdaOps> {
        init_test_logging();
        let verifier = SignatureVerifier::from_hex(&test_public_key_hex()).unwrap();
        InteractionHandler::new(verifier, lambda_ops, COMMAND_FUNCTION)
    }

    fn signed_request(body: &str) -> Request {
        HttpRequest::builder()
            .method("POST")
            .uri("/interactions")
            .header(SIGNATURE_HEADER, sign(TIMESTAMP, body.as_bytes()))
            .header(TIMESTAMP_HEADER, TIMESTAMP)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn body_text(response: &Response<Body>) -> String {
        match response.body() {
            Body::Text(text) => text.clone(),
            Body::Binary(bytes) => String::from_utf8(bytes.clone()).unwrap(),
            Body::Empty => String::new(),
            _ => unreachable!("unexpected Body variant"),
        }
    }

    const PING_BODY: &str = r#"{"type":1,"id":"123","application_id":"456","version":1}"#;
    const COMMAND_BODY: &str =
        r#"{"type": 2, "token": "tok-abc", "data": {"name": "wave", "options": []}}"#;

    // ==================== handle テスト ====================

    #[tokio::test]
    async fn test_ping_returns_pong_without_dispatch() {
        let lambda_ops = MockLambdaOps::new();
        let handler = create_test_handler(lambda_ops.clone());
        let signature = sign(TIMESTAMP, PING_BODY.as_bytes());

        let response = handler
            .handle(&SignatureEnvelope::new(&signature, TIMESTAMP, PING_BODY.as_bytes()))
            .await
            .unwrap();

        assert_eq!(response, InteractionResponse::pong());
        assert!(lambda_ops.events().is_empty());
    }

    #[tokio::test]
    async fn test_command_returns_deferred_and_dispatches_raw_body_once() {
        let lambda_ops = MockLambdaOps::new();
        let handler = create_test_handler(lambda_ops.clone());
        let signature = sign(TIMESTAMP, COMMAND_BODY.as_bytes());

        let response = handler
            .handle(&SignatureEnvelope::new(&signature, TIMESTAMP, COMMAND_BODY.as_bytes()))
            .await
            .unwrap();

        assert_eq!(response, InteractionResponse::deferred());

        let events = lambda_ops.events();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].function_name, COMMAND_FUNCTION);
        // 空白を含む元のバイト列がそのまま渡される
        assert_eq!(events[0].payload, COMMAND_BODY.as_bytes().to_vec());
        assert!(lambda_ops.requests().is_empty());
    }

    #[tokio::test]
    async fn test_unknown_type_is_dispatched() {
        let lambda_ops = MockLambdaOps::new();
        let handler = create_test_handler(lambda_ops.clone());
        let body = r#"{"type":3,"token":"t"}"#;
        let signature = sign(TIMESTAMP, body.as_bytes());

        let response = handler
            .handle(&SignatureEnvelope::new(&signature, TIMESTAMP, body.as_bytes()))
            .await
            .unwrap();

        assert_eq!(response, InteractionResponse::deferred());
        assert_eq!(lambda_ops.events().len(), 1);
    }

    #[tokio::test]
    async fn test_component_interaction_without_name_is_dispatched() {
        let lambda_ops = MockLambdaOps::new();
        let handler = create_test_handler(lambda_ops.clone());
        let body = r#"{"type":3,"token":"t","data":{"custom_id":"btn","component_type":2}}"#;
        let signature = sign(TIMESTAMP, body.as_bytes());

        let response = handler
            .handle(&SignatureEnvelope::new(&signature, TIMESTAMP, body.as_bytes()))
            .await
            .unwrap();

        assert_eq!(response, InteractionResponse::deferred());
        let events = lambda_ops.events();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].payload, body.as_bytes().to_vec());
    }

    #[tokio::test]
    async fn test_request_large_type_value_returns_200_type_5() {
        let lambda_ops = MockLambdaOps::new();
        let handler = create_test_handler(lambda_ops.clone());

        let response = handler
            .handle_request(&signed_request(r#"{"type":300,"token":"t"}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_text(&response), r#"{"type":5}"#);
        assert_eq!(lambda_ops.events().len(), 1);
    }

    #[tokio::test]
    async fn test_dispatch_failure_still_returns_deferred() {
        let lambda_ops = MockLambdaOps::new()
            .with_error(LambdaOpsError::AwsSdkError("throttled".to_string()));
        let handler = create_test_handler(lambda_ops.clone());
        let signature = sign(TIMESTAMP, COMMAND_BODY.as_bytes());

        let response = handler
            .handle(&SignatureEnvelope::new(&signature, TIMESTAMP, COMMAND_BODY.as_bytes()))
            .await
            .unwrap();

        assert_eq!(response, InteractionResponse::deferred());
        assert_eq!(lambda_ops.events().len(), 1);
    }

    #[tokio::test]
    async fn test_invalid_signature_is_unauthorized_without_dispatch() {
        let lambda_ops = MockLambdaOps::new();
        let handler = create_test_handler(lambda_ops.clone());
        let signature = sign(TIMESTAMP, PING_BODY.as_bytes());

        let result = handler
            .handle(&SignatureEnvelope::new(&signature, TIMESTAMP, COMMAND_BODY.as_bytes()))
            .await;

        assert_eq!(
            result,
            Err(InteractionHandlerError::Unauthorized(
                SignatureError::VerificationFailed
            ))
        );
        assert!(lambda_ops.events().is_empty());
    }

    #[tokio::test]
    async fn test_signed_non_json_body_is_malformed() {
        let lambda_ops = MockLambdaOps::new();
        let handler = create_test_handler(lambda_ops.clone());
        let body = "not json";
        let signature = sign(TIMESTAMP, body.as_bytes());

        let result = handler
            .handle(&SignatureEnvelope::new(&signature, TIMESTAMP, body.as_bytes()))
            .await;

        assert!(matches!(result, Err(InteractionHandlerError::MalformedBody(_))));
        assert!(lambda_ops.events().is_empty());
    }

    // ==================== handle_request テスト ====================

    #[tokio::test]
    async fn test_request_ping_returns_200_type_1() {
        let handler = create_test_handler(MockLambdaOps::new());

        let response = handler.handle_request(&signed_request(PING_BODY)).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get(CONTENT_TYPE).unwrap(),
            "application/json"
        );
        assert_eq!(body_text(&response), r#"{"type":1}"#);
    }

    #[tokio::test]
    async fn test_request_command_returns_200_type_5() {
        let lambda_ops = MockLambdaOps::new();
        let handler = create_test_handler(lambda_ops.clone());

        let response = handler
            .handle_request(&signed_request(COMMAND_BODY))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_text(&response), r#"{"type":5}"#);
        assert_eq!(lambda_ops.events().len(), 1);
    }

    #[tokio::test]
    async fn test_request_tampered_body_returns_401() {
        let lambda_ops = MockLambdaOps::new();
        let handler = create_test_handler(lambda_ops.clone());

        let request = HttpRequest::builder()
            .method("POST")
            .uri("/interactions")
            .header(SIGNATURE_HEADER, sign(TIMESTAMP, PING_BODY.as_bytes()))
            .header(TIMESTAMP_HEADER, TIMESTAMP)
            .body(Body::from(COMMAND_BODY.to_string()))
            .unwrap();

        let response = handler.handle_request(&request).await.unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(body_text(&response), INVALID_SIGNATURE_BODY);
        assert!(lambda_ops.events().is_empty());
    }

    #[tokio::test]
    async fn test_request_missing_headers_returns_401() {
        let handler = create_test_handler(MockLambdaOps::new());

        let request = HttpRequest::builder()
            .method("POST")
            .uri("/interactions")
            .body(Body::from(PING_BODY.to_string()))
            .unwrap();

        let response = handler.handle_request(&request).await.unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_request_header_names_are_case_insensitive() {
        let handler = create_test_handler(MockLambdaOps::new());

        let request = HttpRequest::builder()
            .method("POST")
            .uri("/interactions")
            .header("X-Signature-Ed25519", sign(TIMESTAMP, PING_BODY.as_bytes()))
            .header("X-Signature-Timestamp", TIMESTAMP)
            .body(Body::from(PING_BODY.to_string()))
            .unwrap();

        let response = handler.handle_request(&request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_request_malformed_body_propagates_error() {
        let handler = create_test_handler(MockLambdaOps::new());

        let result = handler.handle_request(&signed_request("[]")).await;

        assert!(matches!(result, Err(InteractionHandlerError::MalformedBody(_))));
    }
}

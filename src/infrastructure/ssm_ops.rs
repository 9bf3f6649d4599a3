//! SSM操作モジュール
//!
//! Interaction Lambdaで使用するSSM Parameter Store操作を提供する。
//! - 公開鍵・コマンドLambda ARNを名前指定で取得（復号あり）

use std::collections::HashMap;

use async_trait::async_trait;
use aws_sdk_ssm::Client as SsmClient;
use thiserror::Error;
use tracing::{info, warn};

/// SSM操作のエラー型
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SsmOpsError {
    /// AWS SDK エラー
    #[error("AWS SSM APIエラー: {0}")]
    AwsSdkError(String),
    /// パラメータが存在しない、または値が空
    #[error("パラメータが見つかりません: {0}")]
    ParameterNotFound(String),
}

/// SSM操作トレイト（テスト用の抽象化）
#[async_trait]
pub trait SsmOps: Send + Sync {
    /// 複数のパラメータを復号して取得する
    ///
    /// # 引数
    /// * `names` - パラメータ名のリスト
    ///
    /// # 戻り値
    /// * `Ok(HashMap<String, String>)` - パラメータ名から値へのマップ
    /// * `Err(SsmOpsError)` - API呼び出し失敗、またはいずれかのパラメータが存在しない
    async fn get_parameters(&self, names: &[&str]) -> Result<HashMap<String, String>, SsmOpsError>;

    /// 単一のパラメータを取得する
    async fn get_parameter(&self, name: &str) -> Result<String, SsmOpsError> {
        let mut values = self.get_parameters(&[name]).await?;
        values
            .remove(name)
            .ok_or_else(|| SsmOpsError::ParameterNotFound(name.to_string()))
    }
}

/// 実際のAWS SSM SDKを使用したSSM操作実装
#[derive(Debug, Clone)]
pub struct AwsSsmOps {
    client: SsmClient,
}

impl AwsSsmOps {
    /// 新しいAwsSsmOpsを作成
    pub fn new(client: SsmClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl SsmOps for AwsSsmOps {
    async fn get_parameters(&self, names: &[&str]) -> Result<HashMap<String, String>, SsmOpsError> {
        let response = self
            .client
            .get_parameters()
            .set_names(Some(names.iter().map(|name| name.to_string()).collect()))
            .with_decryption(true)
            .send()
            .await
            .map_err(|err| {
                warn!(error = %err, "GetParametersエラー");
                SsmOpsError::AwsSdkError(err.into_service_error().to_string())
            })?;

        let invalid = response.invalid_parameters();
        if !invalid.is_empty() {
            warn!(invalid_parameters = ?invalid, "存在しないパラメータ");
            return Err(SsmOpsError::ParameterNotFound(invalid.join(", ")));
        }

        let values: HashMap<String, String> = response
            .parameters()
            .iter()
            .filter_map(|parameter| {
                Some((
                    parameter.name()?.to_string(),
                    parameter.value()?.to_string(),
                ))
            })
            .collect();

        // 値が返らなかったパラメータも欠落として扱う
        if let Some(missing) = names.iter().find(|name| !values.contains_key(**name)) {
            return Err(SsmOpsError::ParameterNotFound(missing.to_string()));
        }

        // 値は秘密情報のため名前のみ記録する
        info!(parameter_count = values.len(), "SSMパラメータ取得完了");

        Ok(values)
    }
}

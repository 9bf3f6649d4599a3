/// Discordリクエストの署名検証
///
/// `x-signature-timestamp` と生のリクエストボディを連結したバイト列に対する
/// Ed25519署名を、アプリケーションの公開鍵で検証する。
/// ボディは受信したバイト列そのものを使用すること（再シリアライズすると一致しない）。
use ed25519_dalek::{Signature, Verifier, VerifyingKey};
use thiserror::Error;

/// 署名検証のエラー型
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SignatureError {
    /// 公開鍵が16進数32バイトでない、またはEd25519の点として不正
    #[error("invalid public key: {0}")]
    InvalidPublicKey(String),
    /// 署名が16進数64バイトでない
    #[error("invalid signature format: {0}")]
    InvalidSignature(String),
    /// 署名が一致しない
    #[error("signature verification failed")]
    VerificationFailed,
}

impl SignatureError {
    /// 認証失敗（401で返すべきエラー）かどうか
    ///
    /// 公開鍵の不正は設定エラーであり、認証失敗には含めない。
    pub fn is_authentication_failure(&self) -> bool {
        !matches!(self, SignatureError::InvalidPublicKey(_))
    }
}

/// 1リクエスト分の署名情報
#[derive(Debug, Clone, Copy)]
pub struct SignatureEnvelope<'a> {
    /// `x-signature-ed25519` ヘッダー（16進数）
    pub signature: &'a str,
    /// `x-signature-timestamp` ヘッダー
    pub timestamp: &'a str,
    /// 生のリクエストボディ
    pub body: &'a [u8],
}

impl<'a> SignatureEnvelope<'a> {
    pub fn new(signature: &'a str, timestamp: &'a str, body: &'a [u8]) -> Self {
        Self {
            signature,
            timestamp,
            body,
        }
    }

    /// 署名対象のメッセージ（timestamp + body）
    pub fn message(&self) -> Vec<u8> {
        let mut message = Vec::with_capacity(self.timestamp.len() + self.body.len());
        message.extend_from_slice(self.timestamp.as_bytes());
        message.extend_from_slice(self.body);
        message
    }
}

/// Ed25519署名検証器
#[derive(Debug, Clone)]
pub struct SignatureVerifier {
    public_key: VerifyingKey,
}

impl SignatureVerifier {
    /// 16進数の公開鍵から検証器を作成
    pub fn from_hex(public_key_hex: &str) -> Result<Self, SignatureError> {
        let bytes = hex::decode(public_key_hex.trim())
            .map_err(|e| SignatureError::InvalidPublicKey(e.to_string()))?;

        let bytes: [u8; 32] = bytes.as_slice().try_into().map_err(|_| {
            SignatureError::InvalidPublicKey(format!("expected 32 bytes, got {}", bytes.len()))
        })?;

        let public_key = VerifyingKey::from_bytes(&bytes)
            .map_err(|e| SignatureError::InvalidPublicKey(e.to_string()))?;

        Ok(Self { public_key })
    }

    /// 署名を検証
    pub fn verify(&self, envelope: &SignatureEnvelope<'_>) -> Result<(), SignatureError> {
        let signature_bytes = hex::decode(envelope.signature)
            .map_err(|e| SignatureError::InvalidSignature(e.to_string()))?;

        let signature = Signature::from_slice(&signature_bytes)
            .map_err(|e| SignatureError::InvalidSignature(e.to_string()))?;

        self.public_key
            .verify(&envelope.message(), &signature)
            .map_err(|_| SignatureError::VerificationFailed)
    }
}

// インフラストラクチャ層モジュール
pub mod config;
pub mod followup_sender;
pub mod lambda_ops;
pub mod logging;
pub mod ssm_ops;
pub mod vote_repository;

// 再エクスポート
pub use config::{
    CommandConfig, ConfigError, InteractionConfig, InteractionSecrets, VoteTableConfig,
};
pub use followup_sender::{DiscordFollowupSender, FollowupError, FollowupSender};
pub use lambda_ops::{AwsLambdaOps, LambdaOps, LambdaOpsError};
pub use logging::init_logging;
pub use ssm_ops::{AwsSsmOps, SsmOps, SsmOpsError};
pub use vote_repository::{DynamoVoteRepository, VoteRepository, VoteRepositoryError};

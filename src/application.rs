// アプリケーション層モジュール
pub mod command_handler;
pub mod commands;
pub mod interaction_handler;
pub mod vote_query_handler;

// 再エクスポート
pub use command_handler::{CommandHandler, CommandHandlerError};
pub use commands::{CommandError, CommandRegistry, SlashCommand};
pub use interaction_handler::{InteractionHandler, InteractionHandlerError};
pub use vote_query_handler::{VoteQueryHandler, VoteQueryHandlerError};

// ドメイン層モジュール
pub mod command_response;
pub mod interaction;
pub mod signature;
pub mod vote_tally;

// 再エクスポート
pub use command_response::{CommandResponse, Embed, EmbedAuthor, EmbedField, EmbedFooter};
pub use interaction::{
    CommandOption, Interaction, InteractionData, InteractionResponse, InteractionType,
};
pub use signature::{SignatureEnvelope, SignatureError, SignatureVerifier};
pub use vote_tally::{VoteItem, VoteLookupResult, VoteTally, VoteTallyError};

//! `SeaORM` Entity prelude

pub use super::lottery_draws::Entity as LotteryDraws;
pub use super::lottery_types::Entity as LotteryTypes;
pub use super::sync_status::Entity as SyncStatus;

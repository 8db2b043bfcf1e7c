use crate::model::StatKind;

/// Why a feed, water or pet action was refused. No state changes when one of
/// these is returned.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ActionError {
    #[error("not enough coins: costs {price}, balance is {balance}")]
    InsufficientCurrency { price: u32, balance: u32 },

    #[error("{0} is already full")]
    StatAlreadyMaxed(StatKind),

    #[error("the pet has run away")]
    RanAway,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResetError {
    #[error("the pet is still here; reset is only allowed after it runs away")]
    StillActive,
}

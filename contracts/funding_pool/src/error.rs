use soroban_sdk::contracterror;

#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum Error {
    // ============================================
    // INITIALIZATION ERRORS (1-5)
    // ============================================
    /// Contract already initialized
    AlreadyInitialized = 1,
    /// Contract not initialized
    NotInitialized = 2,

    // ============================================
    // ROUND STATE ERRORS (10-19)
    // ============================================
    /// Deadline not yet passed, exits are not open
    PeriodOngoing = 10,
    /// Deadline passed, no more investments or extensions
    PeriodFinished = 11,
    /// Target was reached, the round cannot be exited
    TargetAlreadyReached = 12,
    /// Bond price can only be fixed once the target is reached
    TargetNotReached = 13,
    /// Bond price already fixed
    BondPriceAlreadySet = 14,
    /// Distribution initiated, the registry is frozen
    DistributionStarted = 15,

    // ============================================
    // AMOUNT ERRORS (20-29)
    // ============================================
    /// Amount must be positive (or arithmetic overflowed)
    InvalidAmount = 20,
    /// Investment would push the total above the target
    TargetExceeded = 21,
    /// First investment below the minimum ticket
    BelowMinimum = 22,
    /// New target must be above the amount already raised
    TargetTooSmall = 23,
    /// Bond price must be positive
    InvalidPrice = 24,
    /// Deadline must be in the future
    InvalidDeadline = 25,
    /// Deadline extension must be a positive number of days
    InvalidDeadlineExtension = 26,

    // ============================================
    // REGISTRY ERRORS (30-39)
    // ============================================
    /// Identity has no active investment
    NoRegisteredFunds = 30,
    /// Refund batch of zero investors
    NoEligibleRefunds = 31,
    /// Refund batch larger than the registry or the configured bound
    RefundBatchTooLarge = 32,
    /// Batch bound must be positive
    InvalidBatchLimit = 33,

    // ============================================
    // COLLABORATOR ERRORS (40-49)
    // ============================================
    /// Caller could not fund the transfer into the pool
    InsufficientCallerBalance = 40,
    /// Transfer out of the pool failed
    TransferFailed = 41,
    /// Reward issuer missing or rejected the issuance
    RewardIssuerUnset = 42,

    // ============================================
    // OPERATIONAL ERRORS (50-59)
    // ============================================
    /// Contract is paused
    Paused = 50,
}

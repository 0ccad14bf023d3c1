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
    // DISTRIBUTION STATE ERRORS (10-19)
    // ============================================
    /// Pool has not fixed its bond price yet
    DistributionNotStarted = 10,
    /// Allocation already recorded for this investor
    AlreadyClaimed = 11,

    // ============================================
    // AMOUNT ERRORS (20-29)
    // ============================================
    /// Investor holds no allocation in the pool
    NothingToClaim = 20,
    /// Allocation overflowed
    InvalidAmount = 21,
    /// Batch limit must be between 1 and MAX_DISTRIBUTION_BATCH
    InvalidBatchLimit = 22,

    // ============================================
    // OPERATIONAL ERRORS (50-59)
    // ============================================
    /// Contract is paused
    ContractPaused = 50,
}

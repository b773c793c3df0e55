use crate::LedgerError;

/// Convenience type to make error mapping cleaner
pub type Result<T = ()> = anyhow::Result<T>;

/// Typed result for ledger operations, so callers can match on the failure kind
pub type LedgerResult<T = ()> = std::result::Result<T, LedgerError>;

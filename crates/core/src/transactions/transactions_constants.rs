/// Transaction kinds
///
/// Each constant is the wire name of one `TransactionKind` variant.

/// Purchase of shares. Adds a lot.
pub const TRANSACTION_TYPE_BUY: &str = "BUY";

/// Sale of shares. Consumes lots oldest first.
pub const TRANSACTION_TYPE_SELL: &str = "SELL";

/// Delivery of shares into the portfolio without a purchase. Adds a lot.
pub const TRANSACTION_TYPE_INBOUND_TRANSFER: &str = "INBOUND_TRANSFER";

/// Delivery of shares out of the portfolio without a sale. Consumes lots.
pub const TRANSACTION_TYPE_OUTBOUND_TRANSFER: &str = "OUTBOUND_TRANSFER";

/// Cash dividend paid for a security.
pub const TRANSACTION_TYPE_DIVIDEND: &str = "DIVIDEND";

/// Interest received (e.g. on a bond held as a security).
pub const TRANSACTION_TYPE_INTEREST: &str = "INTEREST";

/// Interest paid (e.g. on a margin loan).
pub const TRANSACTION_TYPE_INTEREST_CHARGE: &str = "INTEREST_CHARGE";

/// Stand-alone fee, optionally tied to a security.
pub const TRANSACTION_TYPE_FEE: &str = "FEE";

/// Refund of a previously charged fee.
pub const TRANSACTION_TYPE_FEE_REFUND: &str = "FEE_REFUND";

/// Stand-alone tax, optionally tied to a security.
pub const TRANSACTION_TYPE_TAX: &str = "TAX";

/// Refund of previously paid tax.
pub const TRANSACTION_TYPE_TAX_REFUND: &str = "TAX_REFUND";


pub const SIMULATE_PCR_CMD: &str = "simulatepcr";
pub const DEFAULT_OUT: &str = "-";

/// Zero means "no limit" on product length.
pub const DEFAULT_MAX_PRODUCT_LENGTH: usize = 0;

/// Capacity of the bounded site and result channels.
pub const DEFAULT_CHANNEL_CAPACITY: usize = 1024;

/// Default page size for pagination
pub const DEFAULT_PAGE_SIZE: i64 = 10;

/// Maximum page size allowed
pub const MAX_PAGE_SIZE: i64 = 100;

/// Placeholder category name when the relation could not be resolved
pub const UNRESOLVED_CATEGORY_NAME: &str = "N/A";

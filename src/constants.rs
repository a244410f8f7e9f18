//! Defaults, limits and the literal vocabularies of the ledger

// =============================================================================
// SERVER DEFAULTS
// =============================================================================

/// Default server host address
pub const DEFAULT_SERVER_HOST: &str = "0.0.0.0";

/// Default server port
pub const DEFAULT_SERVER_PORT: u16 = 8080;

/// Default upper bound on a single request, in seconds
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

// =============================================================================
// STORAGE DEFAULTS
// =============================================================================

/// Default maximum database connections in the pool
pub const DEFAULT_DATABASE_MAX_CONNECTIONS: u32 = 10;

pub const DEFAULT_REDIS_URL: &str = "redis://localhost:6379";

// =============================================================================
// AUTHENTICATION DEFAULTS
// =============================================================================

/// Default JWT token expiry in hours
pub const DEFAULT_JWT_EXPIRY_HOURS: i64 = 24;

/// Default refresh token expiry in days
pub const DEFAULT_REFRESH_TOKEN_EXPIRY_DAYS: i64 = 7;

/// Length of the opaque refresh token handed to clients
pub const REFRESH_TOKEN_LENGTH: usize = 48;

/// Minimum password length
pub const MIN_PASSWORD_LENGTH: u64 = 6;

/// Maximum password length
pub const MAX_PASSWORD_LENGTH: u64 = 128;

/// Username minimum length
pub const MIN_USERNAME_LENGTH: u64 = 3;

/// Username maximum length
pub const MAX_USERNAME_LENGTH: u64 = 50;

// =============================================================================
// USER ROLES
// =============================================================================

/// User role identifiers
pub mod roles {
    pub const ADMIN: &str = "admin";
    pub const DONOR: &str = "donor";

    /// All user roles
    pub const ALL: &[&str] = &[ADMIN, DONOR];
}

// =============================================================================
// TRANSACTIONS
// =============================================================================

/// Transaction status literals
pub mod statuses {
    pub const PENDING: &str = "pending";
    pub const APPROVED: &str = "approved";
    pub const REJECTED: &str = "rejected";
    pub const COMPLETED: &str = "completed";

    /// Every status a stored transaction may carry
    pub const ALL: &[&str] = &[PENDING, APPROVED, REJECTED, COMPLETED];
}

/// Fund keywords matched against a transaction's category
pub mod funds {
    pub const RABTA: &str = "rabta";
    pub const MADRASSA: &str = "madrassa";

    /// Categories an admin may credit manually
    pub const MANUAL_CATEGORIES: &[&str] = &[RABTA, MADRASSA];
}

/// Category given to transactions created without one
pub const DEFAULT_TRANSACTION_TYPE: &str = "donation";

/// Donor name shown in place of private entries on the public ledger
pub const ANONYMOUS_DONOR_NAME: &str = "Anonymous Donor";

/// Maximum entries returned by the public ledger
pub const PUBLIC_LEDGER_LIMIT: usize = 50;

// =============================================================================
// PAGINATION
// =============================================================================

/// Donor history page size when none is requested
pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// Largest page a client may request
pub const MAX_PAGE_SIZE: u32 = 100;

// =============================================================================
// VALIDATION
// =============================================================================

/// Maximum display name / donor name length
pub const MAX_NAME_LENGTH: u64 = 100;

/// Maximum transaction description length
pub const MAX_DESCRIPTION_LENGTH: u64 = 500;

/// Maximum transaction notes length
pub const MAX_NOTES_LENGTH: u64 = 500;

/// Maximum proof-of-payment URL length
pub const MAX_PROOF_URL_LENGTH: u64 = 2048;

// =============================================================================
// API VERSIONING
// =============================================================================

/// API base path
pub const API_BASE_PATH: &str = "/api/v1";

use crate::reporter::JobIdentity;

pub const TEST_DB_NAME: &str = "sales";
pub const TEST_STAGING_DIR: &str = "/staging/sales";
pub const TEST_POLICY: &str = "p";

/// Returns the identity of a tracked job with the given execution id.
pub fn test_job(execution_id: u64) -> JobIdentity {
    JobIdentity::new(
        TEST_DB_NAME,
        TEST_STAGING_DIR,
        TEST_POLICY,
        execution_id,
        execution_id.saturating_sub(1),
    )
}

/// Returns the identity of a job run outside any replication policy.
pub fn untracked_job(execution_id: u64) -> JobIdentity {
    JobIdentity::new(TEST_DB_NAME, TEST_STAGING_DIR, "", execution_id, 0)
}

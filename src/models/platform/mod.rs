pub mod audit_logs;
pub mod feature_flags;
pub mod integrations;

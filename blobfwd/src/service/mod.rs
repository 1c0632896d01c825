pub mod audit_log;
pub mod events;
pub mod forwarder;

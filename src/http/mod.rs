//! HTTP API module for notihist
//!
//! Provides REST endpoints that decode uploaded artifacts:
//! - History protobuf files
//! - `settings_secure.xml` feature status
//! - `notification_policy.xml` snoozed notifications

pub mod server;

pub use server::{
    create_server, start_server, ApiError, DecodeHistoryParams, ErrorResponse, RowsResponse,
    StatusParams, SuccessResponse, UPLOAD_SOURCE,
};

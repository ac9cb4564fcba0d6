//! Supabase integration for scorecard
//!
//! - `client` - SupabaseClient (PostgREST insert client implementing `SubmissionClient`)
//! - `config` - SupabaseConfig (project URL, key, table, timeout)

pub mod client;
pub mod config;

pub use client::SupabaseClient;
pub use config::SupabaseConfig;

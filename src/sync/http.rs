// src/sync/http.rs

// This module handles HTTP client creation for the organisation API

use std::time::Duration;

use anyhow::{Context, Result};

// Helper to create a client (called once in the sync manager)
pub fn create_http_client(timeout_secs: u64) -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .build()
        .context("Failed to build HTTP client")
}

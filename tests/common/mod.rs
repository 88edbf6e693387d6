//
//  bitbucket-client
//  tests/common/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Shared helpers for the integration tests.

#![allow(dead_code)]

use base64::Engine;
use bitbucket_client::{Client, Credentials};
use tracing_subscriber::EnvFilter;

pub const USERNAME: &str = "jdoe";
pub const PASSWORD: &str = "app-password";

/// Routes `tracing` output to the test harness. Safe to call from every test.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// A Basic-auth client pointed at a mock server.
pub fn basic_client(base_url: &str) -> Client {
    init_tracing();
    Client::new(Credentials::basic(USERNAME, PASSWORD))
        .expect("client")
        .with_base_url(base_url)
}

/// The `Authorization` header value expected for [`basic_client`].
pub fn basic_header() -> String {
    let encoded =
        base64::engine::general_purpose::STANDARD.encode(format!("{}:{}", USERNAME, PASSWORD));
    format!("Basic {}", encoded)
}

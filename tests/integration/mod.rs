//! Shared fixtures for tests against a mock HTTP server

pub mod mock_server;

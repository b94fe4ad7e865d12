//! Unit tests for the transport module

//! Unit tests for error mapping

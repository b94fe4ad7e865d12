//! Unit tests for SMS module

mod create_dispatcher_tests;

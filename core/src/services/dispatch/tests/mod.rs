//! Unit tests for the dispatch service

mod service_tests;

//! Integration tests for Product-Discoverer
//!
//! Renderers and probes are either wiremock-backed or in-memory fakes from
//! `support`, so no test touches the network.

mod crawl_tests;
mod service_tests;
mod support;

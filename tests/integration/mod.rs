//! Integration tests for command resolution, configuration and session stores

mod prefix_properties;
mod resolution_flow;
mod support;
mod session_stores;

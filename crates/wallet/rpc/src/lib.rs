//! # headless-rpc
//!
//! JSON-RPC 2.0 wire types shared by the headless wallet engine and its HTTP server, extended with
//! the [EIP-1193](https://eips.ethereum.org/EIPS/eip-1193) provider error codes.

#![cfg_attr(not(test), warn(unused_crate_dependencies))]

/// JSON-RPC error bindings
pub mod error;

/// JSON-RPC request bindings
pub mod request;

/// JSON-RPC response bindings
pub mod response;

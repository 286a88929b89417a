//! # Integration Tests
//!
//! Flows that cross crate boundaries: the signer and authenticator from
//! cg-01, the dispatcher from cg-02 and the broker from shared-bus.

pub mod bus_flows;
pub mod end_to_end;

//! # Ports Layer
//!
//! - **Inbound (Driving)**: API that the dispatcher and controllers use

pub mod inbound;

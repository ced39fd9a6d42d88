//! Admin session tokens.
//!
//! Sign-in itself happens at an external provider; this module only signs
//! and verifies the HS256 token that provider's callback hands out.

pub mod jwt;

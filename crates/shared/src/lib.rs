//! Wire and domain types shared between the RSA gateway client and its front ends.

pub mod domain;
pub mod protocol;

//
// Copyright (c) The Holo Core Contributors
//
// SPDX-License-Identifier: MIT
//

use serde::{Deserialize, Serialize};

// Type aliases.
pub type DecodeResult<T> = Result<T, DecodeError>;

// Grace-LSA decode errors.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[derive(Deserialize, Serialize)]
pub enum DecodeError {
    InvalidLsaLength(u16),
    InvalidTlvLength(u16),
    MissingRequiredTlv(u16),
    InvalidGracePeriod(u32),
    UnknownGrReason(u8),
}

// ===== impl DecodeError =====

impl std::fmt::Display for DecodeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DecodeError::InvalidLsaLength(lsa_len) => {
                write!(f, "invalid LSA length: {}", lsa_len)
            }
            DecodeError::InvalidTlvLength(tlv_len) => {
                write!(f, "invalid TLV length: {}", tlv_len)
            }
            DecodeError::MissingRequiredTlv(tlv_type) => {
                write!(f, "missing required TLV: {}", tlv_type)
            }
            DecodeError::InvalidGracePeriod(period) => {
                write!(f, "grace period out of range: {}", period)
            }
            DecodeError::UnknownGrReason(reason) => {
                write!(f, "unknown graceful restart reason: {}", reason)
            }
        }
    }
}

impl std::error::Error for DecodeError {}

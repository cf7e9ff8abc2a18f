//
// Copyright (c) The Holo Core Contributors
//
// SPDX-License-Identifier: MIT
//

use bytes::{Buf, BufMut, Bytes, BytesMut};
use derive_new::new;
use num_derive::FromPrimitive;
use num_traits::{FromPrimitive, ToPrimitive};
use serde::{Deserialize, Serialize};

use crate::packet::error::{DecodeError, DecodeResult};

// TLV header size.
pub const TLV_HDR_SIZE: u16 = 4;

// Grace period boundaries in seconds.
pub const GRACE_PERIOD_MIN: u32 = 1;
pub const GRACE_PERIOD_MAX: u32 = 1800;

//
// OSPF Grace-LSA's Grace Period TLV.
//
// Encoding format:
//
//  0                   1                   2                   3
//  0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1
// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
// |              Type             |             Length            |
// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
// |                       Grace Period                            |
// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//
#[derive(Clone, Copy, Debug, Eq, new, PartialEq)]
#[derive(Deserialize, Serialize)]
pub struct GracePeriodTlv(u32);

//
// OSPF Grace-LSA's Graceful Restart reason TLV.
//
// Encoding format:
//
//  0                   1                   2                   3
//  0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1
// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
// |              Type             |             Length            |
// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
// |    Reason     |                  Padding                      |
// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//
#[derive(Clone, Copy, Debug, Eq, new, PartialEq)]
#[derive(Deserialize, Serialize)]
pub struct GrReasonTlv(GrReason);

// OSPF Graceful Restart reason value.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
#[derive(FromPrimitive)]
#[derive(Deserialize, Serialize)]
pub enum GrReason {
    #[default]
    Unknown = 0,
    SoftwareRestart = 1,
    SoftwareUpgrade = 2,
    ControlProcessorSwitchover = 3,
}

#[derive(Clone, Debug, Eq, new, PartialEq)]
#[derive(Deserialize, Serialize)]
pub struct UnknownTlv {
    pub tlv_type: u16,
    pub length: u16,
    pub value: Bytes,
}

// ===== impl GracePeriodTlv =====

impl GracePeriodTlv {
    pub(crate) fn decode(tlv_len: u16, buf: &mut Bytes) -> DecodeResult<Self> {
        // Validate TLV length.
        if tlv_len != 4 {
            return Err(DecodeError::InvalidTlvLength(tlv_len));
        }

        // The grace period must fit within the protocol boundaries.
        let period = buf.get_u32();
        if !(GRACE_PERIOD_MIN..=GRACE_PERIOD_MAX).contains(&period) {
            return Err(DecodeError::InvalidGracePeriod(period));
        }

        Ok(GracePeriodTlv(period))
    }

    pub(crate) fn encode(&self, tlv_type: u16, buf: &mut BytesMut) {
        let start_pos = tlv_encode_start(buf, tlv_type);
        buf.put_u32(self.0);
        tlv_encode_end(buf, start_pos);
    }

    pub fn get(&self) -> u32 {
        self.0
    }
}

// ===== impl GrReasonTlv =====

impl GrReasonTlv {
    pub(crate) fn decode(tlv_len: u16, buf: &mut Bytes) -> DecodeResult<Self> {
        // Validate TLV length.
        if tlv_len != 1 {
            return Err(DecodeError::InvalidTlvLength(tlv_len));
        }

        let reason = buf.get_u8();
        let reason = GrReason::from_u8(reason)
            .ok_or(DecodeError::UnknownGrReason(reason))?;

        Ok(GrReasonTlv(reason))
    }

    pub(crate) fn encode(&self, tlv_type: u16, buf: &mut BytesMut) {
        let start_pos = tlv_encode_start(buf, tlv_type);
        buf.put_u8(self.0 as u8);
        tlv_encode_end(buf, start_pos);
    }

    pub fn get(&self) -> GrReason {
        self.0
    }
}

impl Default for GrReasonTlv {
    fn default() -> GrReasonTlv {
        GrReasonTlv(GrReason::Unknown)
    }
}

// ===== impl GrReason =====

impl GrReason {
    // A planned restart is one initiated by the operator, as opposed to a
    // software reload or a control-processor switchover.
    pub fn is_planned(&self) -> bool {
        matches!(self, GrReason::SoftwareRestart)
    }
}

impl std::fmt::Display for GrReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GrReason::Unknown => {
                write!(f, "unknown")
            }
            GrReason::SoftwareRestart => {
                write!(f, "software restart")
            }
            GrReason::SoftwareUpgrade => {
                write!(f, "software upgrade")
            }
            GrReason::ControlProcessorSwitchover => {
                write!(f, "control plane switchover")
            }
        }
    }
}

// ===== global functions =====

// The TLV length is padded to 4-byte alignment.
//
// Widened to u32 so a length close to u16::MAX can't overflow the padding
// arithmetic.
pub(crate) fn tlv_wire_len(tlv_len: u16) -> u32 {
    (tlv_len as u32 + 3) & !0x03
}

pub(crate) fn tlv_encode_start(
    buf: &mut BytesMut,
    tlv_type: impl ToPrimitive,
) -> usize {
    let start_pos = buf.len();
    buf.put_u16(tlv_type.to_u16().unwrap());
    // The TLV length will be rewritten later.
    buf.put_u16(0);
    start_pos
}

pub(crate) fn tlv_encode_end(buf: &mut BytesMut, start_pos: usize) {
    let tlv_len = (buf.len() - start_pos) as u16 - TLV_HDR_SIZE;

    // Rewrite TLV length.
    buf[start_pos + 2..start_pos + 4].copy_from_slice(&tlv_len.to_be_bytes());

    // Add padding if necessary.
    let tlv_wlen = tlv_wire_len(tlv_len);
    if tlv_wlen != tlv_len as u32 {
        buf.put_bytes(0, (tlv_wlen - tlv_len as u32) as usize);
    }
}

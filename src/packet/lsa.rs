//
// Copyright (c) The Holo Core Contributors
//
// SPDX-License-Identifier: MIT
//

use std::net::Ipv4Addr;

use bytes::{Buf, BufMut, Bytes, BytesMut};
use derive_new::new;
use num_derive::{FromPrimitive, ToPrimitive};
use num_traits::FromPrimitive;
use serde::{Deserialize, Serialize};

use crate::packet::error::{DecodeError, DecodeResult};
use crate::packet::tlv::{
    GracePeriodTlv, GrReasonTlv, TLV_HDR_SIZE, UnknownTlv, tlv_wire_len,
};

// OSPFv3 LSA header size.
pub const LSA_HDR_SIZE: u16 = 20;

// Maximum age of an LSA in seconds.
pub const LSA_MAX_AGE: u16 = 3600;

// OSPFv3 LSA type.
//
// The high-order bits select the flooding scope; the function code occupies
// the remaining 13 bits.
#[derive(Clone, Copy, Debug, Eq, Ord, PartialEq, PartialOrd)]
#[derive(Deserialize, Serialize)]
pub struct LsaType(pub u16);

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[derive(FromPrimitive, ToPrimitive)]
#[derive(Deserialize, Serialize)]
pub enum LsaFunctionCode {
    Grace = 11,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[derive(FromPrimitive, ToPrimitive)]
#[derive(Deserialize, Serialize)]
pub enum LsaScopeCode {
    Link = 0x0000,
    Area = 0x2000,
    As = 0x4000,
}

//
// OSPFv3 LSA header.
//
// Encoding format:
//
//  0                   1                   2                   3
//  0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1
// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
// |           LS Age              |           LS Type             |
// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
// |                       Link State ID                           |
// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
// |                    Advertising Router                         |
// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
// |                    LS Sequence Number                         |
// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
// |        LS Checksum            |            Length             |
// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//
#[derive(Clone, Copy, Debug, Eq, new, PartialEq)]
#[derive(Deserialize, Serialize)]
pub struct LsaHdr {
    pub age: u16,
    pub lsa_type: LsaType,
    pub lsa_id: Ipv4Addr,
    pub adv_rtr: Ipv4Addr,
    pub seq_no: u32,
    pub cksum: u16,
    pub length: u16,
}

// LSDB lookup key.
#[derive(Clone, Copy, Debug, Eq, Ord, PartialEq, PartialOrd, new)]
#[derive(Deserialize, Serialize)]
pub struct LsaKey {
    pub lsa_type: LsaType,
    pub adv_rtr: Ipv4Addr,
    pub lsa_id: Ipv4Addr,
}

// LSA header plus raw body.
//
// The body is kept unparsed; the consumer interested in its contents (e.g.
// the GR helper for Grace-LSAs) decodes it on demand.
#[derive(Clone, Debug, Eq, PartialEq)]
#[derive(Deserialize, Serialize)]
pub struct Lsa {
    pub hdr: LsaHdr,
    pub body: Bytes,
}

// OSPFv3 Grace-LSA TLV types.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[derive(FromPrimitive, ToPrimitive)]
#[derive(Deserialize, Serialize)]
pub enum GraceTlvType {
    GracePeriod = 1,
    GrReason = 2,
}

//
// OSPFv3 Grace Opaque LSA.
//
// Encoding format (LSA body):
//
//  0                   1                   2                   3
//  0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1
// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
// |                                                               |
// +-                            TLVs                             -+
// |                             ...                               |
//
#[derive(Clone, Debug, Eq, PartialEq)]
#[derive(Deserialize, Serialize)]
pub struct LsaGrace {
    pub grace_period: GracePeriodTlv,
    pub gr_reason: GrReasonTlv,
    pub unknown_tlvs: Vec<UnknownTlv>,
}

// ===== impl LsaType =====

impl LsaType {
    pub(crate) fn function_code(&self) -> u16 {
        self.0 & 0x1fff
    }

    pub fn is_grace(&self) -> bool {
        self.function_code() == LsaFunctionCode::Grace as u16
    }
}

// ===== impl LsaHdr =====

impl LsaHdr {
    pub fn decode(buf: &mut Bytes) -> DecodeResult<Self> {
        if buf.remaining() < LSA_HDR_SIZE as usize {
            return Err(DecodeError::InvalidLsaLength(buf.remaining() as u16));
        }

        let age = buf.get_u16();
        let lsa_type = LsaType(buf.get_u16());
        let lsa_id = Ipv4Addr::from(buf.get_u32());
        let adv_rtr = Ipv4Addr::from(buf.get_u32());
        let seq_no = buf.get_u32();
        let cksum = buf.get_u16();
        let length = buf.get_u16();

        Ok(LsaHdr {
            age,
            lsa_type,
            lsa_id,
            adv_rtr,
            seq_no,
            cksum,
            length,
        })
    }

    pub fn encode(&self, buf: &mut BytesMut) {
        buf.put_u16(self.age);
        buf.put_u16(self.lsa_type.0);
        buf.put_u32(self.lsa_id.into());
        buf.put_u32(self.adv_rtr.into());
        buf.put_u32(self.seq_no);
        buf.put_u16(self.cksum);
        buf.put_u16(self.length);
    }

    pub fn key(&self) -> LsaKey {
        LsaKey {
            lsa_type: self.lsa_type,
            adv_rtr: self.adv_rtr,
            lsa_id: self.lsa_id,
        }
    }

    pub fn is_maxage(&self) -> bool {
        self.age >= LSA_MAX_AGE
    }
}

// ===== impl Lsa =====

impl Lsa {
    pub fn decode(buf: &mut Bytes) -> DecodeResult<Self> {
        let hdr = LsaHdr::decode(buf)?;

        // Validate the LSA length from the header.
        let body_len = hdr
            .length
            .checked_sub(LSA_HDR_SIZE)
            .ok_or(DecodeError::InvalidLsaLength(hdr.length))?;
        if body_len as usize > buf.remaining() {
            return Err(DecodeError::InvalidLsaLength(hdr.length));
        }

        let body = buf.copy_to_bytes(body_len as usize);
        Ok(Lsa { hdr, body })
    }

    pub fn encode(&self) -> Bytes {
        let mut buf = BytesMut::with_capacity(self.hdr.length as usize);
        self.hdr.encode(&mut buf);
        buf.put_slice(&self.body);
        buf.freeze()
    }
}

// ===== impl LsaGrace =====

impl LsaGrace {
    pub fn decode(buf: &mut Bytes) -> DecodeResult<Self> {
        let mut grace_period = None;
        let mut gr_reason = None;
        let mut unknown_tlvs = Vec::new();

        while buf.remaining() >= TLV_HDR_SIZE as usize {
            // Parse TLV type.
            let tlv_type = buf.get_u16();
            let tlv_etype = GraceTlvType::from_u16(tlv_type);

            // Parse and validate TLV length.
            let tlv_len = buf.get_u16();
            let tlv_wlen = tlv_wire_len(tlv_len);
            if tlv_wlen as usize > buf.remaining() {
                return Err(DecodeError::InvalidTlvLength(tlv_len));
            }

            // Parse TLV value.
            let mut buf_tlv = buf.copy_to_bytes(tlv_wlen as usize);
            match tlv_etype {
                Some(GraceTlvType::GracePeriod) => {
                    let period = GracePeriodTlv::decode(tlv_len, &mut buf_tlv)?;
                    grace_period.get_or_insert(period);
                }
                Some(GraceTlvType::GrReason) => {
                    let reason = GrReasonTlv::decode(tlv_len, &mut buf_tlv)?;
                    gr_reason.get_or_insert(reason);
                }
                _ => {
                    // Save unknown TLV.
                    let value = buf_tlv.copy_to_bytes(tlv_len as usize);
                    unknown_tlvs.push(UnknownTlv::new(tlv_type, tlv_len, value));
                }
            }
        }

        // A TLV record can't straddle the end of the LSA body.
        if buf.has_remaining() {
            return Err(DecodeError::InvalidTlvLength(buf.remaining() as u16));
        }

        // The grace period TLV is mandatory; the restart reason defaults to
        // "unknown" when absent.
        let grace_period = grace_period.ok_or(DecodeError::MissingRequiredTlv(
            GraceTlvType::GracePeriod as u16,
        ))?;

        Ok(LsaGrace {
            grace_period,
            gr_reason: gr_reason.unwrap_or_default(),
            unknown_tlvs,
        })
    }

    pub fn encode(&self, buf: &mut BytesMut) {
        self.grace_period
            .encode(GraceTlvType::GracePeriod as u16, buf);
        self.gr_reason.encode(GraceTlvType::GrReason as u16, buf);
    }

    pub const fn lsa_type() -> LsaType {
        let scope = LsaScopeCode::Link;
        let function_code = LsaFunctionCode::Grace;
        LsaType(scope as u16 | function_code as u16)
    }
}

//! `$CT0` terminator block.
//!
//! CT0 is header-only, without actual data.

use super::BlockPayload;
use crate::Warning;

pub(crate) fn decode(_payload: &[u8], _warnings: &mut Vec<Warning>) -> BlockPayload {
    BlockPayload::Ct0
}

pub(crate) fn encode(payload: &BlockPayload) -> Option<Vec<u8>> {
    match payload {
        BlockPayload::Ct0 => Some(Vec::new()),
        _ => None,
    }
}

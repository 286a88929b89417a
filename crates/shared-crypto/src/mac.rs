//! # HMAC-SHA256
//!
//! RFC 2104 keyed MAC over the in-house [`Sha256`] engine.
//!
//! ## Secret Hygiene
//!
//! The block-sized key, both masked pads and the inner digest live in
//! `Zeroizing` buffers, so they are wiped when the function returns on any
//! path. The hashers themselves zero their state on drop.

use crate::hashing::{sha256, Digest, Sha256, BLOCK_LEN, DIGEST_LEN};
use zeroize::Zeroizing;

/// MAC output length in bytes.
pub const MAC_LEN: usize = DIGEST_LEN;

const INNER_MASK: u8 = 0x36;
const OUTER_MASK: u8 = 0x5c;

/// Compute `HMAC-SHA256(key, message)`.
///
/// Keys longer than the 64-byte block are first reduced by hashing them;
/// shorter keys are zero-padded to the block size.
pub fn hmac_sha256(key: &[u8], message: &[u8]) -> Digest {
    let block_key = block_sized_key(key);

    let mut inner_pad = Zeroizing::new([0u8; BLOCK_LEN]);
    let mut outer_pad = Zeroizing::new([0u8; BLOCK_LEN]);
    for (i, byte) in block_key.iter().enumerate() {
        inner_pad[i] = byte ^ INNER_MASK;
        outer_pad[i] = byte ^ OUTER_MASK;
    }

    let mut inner = Sha256::new();
    inner.update(&inner_pad[..]).update(message);
    let inner_digest = Zeroizing::new(inner.finalize());

    let mut outer = Sha256::new();
    outer.update(&outer_pad[..]).update(&inner_digest[..]);
    outer.finalize()
}

/// Reduce or pad `key` to exactly one hash block.
fn block_sized_key(key: &[u8]) -> Zeroizing<[u8; BLOCK_LEN]> {
    let mut block_key = Zeroizing::new([0u8; BLOCK_LEN]);
    if key.len() > BLOCK_LEN {
        let reduced = Zeroizing::new(sha256(key));
        block_key[..DIGEST_LEN].copy_from_slice(&reduced[..]);
    } else {
        block_key[..key.len()].copy_from_slice(key);
    }
    block_key
}

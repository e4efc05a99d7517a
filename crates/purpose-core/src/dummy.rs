//! Dummy buffer naming
//!
//! A dummy buffer stands in for a purpose that has no real buffer yet. Its
//! name is the prefix, the purpose name and the suffix, concatenated without
//! escaping. A purpose name containing the suffix character still encodes,
//! but decoding rejects the result, so the round-trip only holds for purpose
//! names without `*`.

use tracing::debug;

use crate::error::{PurposeError, Result};
use crate::host::{BufferId, Buffers, FUNDAMENTAL_MODE};
use crate::symbol::{ModeTag, Purpose};

pub const DUMMY_PREFIX: &str = "*pu-dummy-";
pub const DUMMY_SUFFIX: char = '*';

/// Build the dummy buffer name for `purpose`.
pub fn encode(purpose: Purpose) -> String {
    let mut name = String::with_capacity(DUMMY_PREFIX.len() + purpose.name().len() + 1);
    name.push_str(DUMMY_PREFIX);
    name.push_str(purpose.name());
    name.push(DUMMY_SUFFIX);
    name
}

/// Parse the purpose out of a dummy buffer name.
///
/// Returns `None` when `name` is not shaped like a dummy buffer name. The
/// embedded purpose must be non-empty and must not contain the suffix.
pub fn decode(name: &str) -> Option<Purpose> {
    let inner = name.strip_prefix(DUMMY_PREFIX)?.strip_suffix(DUMMY_SUFFIX)?;
    if inner.is_empty() || inner.contains(DUMMY_SUFFIX) {
        return None;
    }
    Some(Purpose::new(inner))
}

/// Like [`decode`], but a name that is not a dummy name is an error.
pub fn parse(name: &str) -> Result<Purpose> {
    decode(name).ok_or_else(|| PurposeError::NotADummyName {
        name: name.to_string(),
    })
}

/// Return the dummy buffer for `purpose`, creating it if needed.
pub fn dummy_buffer<H: Buffers + ?Sized>(host: &mut H, purpose: Purpose) -> Result<BufferId> {
    let name = encode(purpose);
    if let Some(id) = host.find_buffer(&name) {
        return Ok(id);
    }
    debug!(%purpose, buffer = %name, "creating dummy buffer");
    host.create_buffer(&name, ModeTag::new(FUNDAMENTAL_MODE))
}

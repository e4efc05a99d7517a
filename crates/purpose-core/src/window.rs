//! Window and buffer purpose queries.

use tracing::debug;

use crate::classifier::PurposeClassifier;
use crate::dedication;
use crate::dummy;
use crate::error::Result;
use crate::host::{BufferId, Buffers, WindowId, Windows};
use crate::symbol::Purpose;

/// Purpose of the buffer `window` displays.
pub fn window_purpose<H>(classifier: &PurposeClassifier, host: &H, window: WindowId) -> Result<Purpose>
where
    H: Buffers + Windows + ?Sized,
{
    let buffer = host.window_buffer(window)?;
    classifier.classify(host, buffer)
}

/// Live buffers with `purpose`, in buffer-list order.
pub fn buffers_with_purpose<H>(
    classifier: &PurposeClassifier,
    host: &H,
    purpose: Purpose,
) -> Result<Vec<BufferId>>
where
    H: Buffers + ?Sized,
{
    let mut matching = Vec::new();
    for buffer in host.buffers() {
        if classifier.classify(host, buffer)? == purpose {
            matching.push(buffer);
        }
    }
    Ok(matching)
}

/// Non-minibuffer windows whose buffer has `purpose`.
pub fn windows_with_purpose<H>(
    classifier: &PurposeClassifier,
    host: &H,
    purpose: Purpose,
) -> Result<Vec<WindowId>>
where
    H: Buffers + Windows + ?Sized,
{
    let mut matching = Vec::new();
    for window in host.windows() {
        if host.is_minibuffer(window) {
            continue;
        }
        if window_purpose(classifier, host, window)? == purpose {
            matching.push(window);
        }
    }
    Ok(matching)
}

/// Make `window` show the first buffer with `purpose`, creating the dummy
/// buffer for `purpose` when there is none, then purpose-dedicate the window
/// unless `dont_dedicate`.
///
/// Returns the buffer now shown.
pub fn set_window_purpose<H>(
    classifier: &PurposeClassifier,
    host: &mut H,
    window: WindowId,
    purpose: Purpose,
    dont_dedicate: bool,
) -> Result<BufferId>
where
    H: Buffers + Windows + ?Sized,
{
    // fail on a dead window before creating anything
    host.window_buffer(window)?;

    let buffer = match buffers_with_purpose(classifier, host, purpose)?.first() {
        Some(buffer) => *buffer,
        None => dummy::dummy_buffer(host, purpose)?,
    };
    host.set_window_buffer(window, buffer)?;
    debug!(%window, %buffer, %purpose, "set window purpose");

    if !dont_dedicate {
        dedication::set_dedicated(host, window, true)?;
    }
    Ok(buffer)
}

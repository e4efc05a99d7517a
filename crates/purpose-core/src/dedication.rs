//! Window dedication
//!
//! A purpose-dedicated window only takes buffers of its current purpose.
//! The flag lives in the window's own parameters and goes away with the
//! window. The host's buffer dedication is a separate flag with its own
//! toggle.

use tracing::debug;

use crate::error::Result;
use crate::host::{WindowFlag, WindowId, Windows};

pub fn is_dedicated<H: Windows + ?Sized>(host: &H, window: WindowId) -> Result<bool> {
    host.window_flag(window, WindowFlag::PurposeDedicated)
}

pub fn set_dedicated<H: Windows + ?Sized>(host: &mut H, window: WindowId, dedicated: bool) -> Result<()> {
    host.set_window_flag(window, WindowFlag::PurposeDedicated, dedicated)?;
    debug!(%window, dedicated, "purpose dedication set");
    Ok(())
}

/// Flip the purpose-dedicated flag and refresh indicators.
///
/// Returns the new value.
pub fn toggle_dedicated<H: Windows + ?Sized>(host: &mut H, window: WindowId) -> Result<bool> {
    toggle(host, window, WindowFlag::PurposeDedicated)
}

pub fn is_buffer_dedicated<H: Windows + ?Sized>(host: &H, window: WindowId) -> Result<bool> {
    host.window_flag(window, WindowFlag::BufferDedicated)
}

/// Flip the host's buffer-dedicated flag and refresh indicators.
///
/// Returns the new value.
pub fn toggle_buffer_dedicated<H: Windows + ?Sized>(host: &mut H, window: WindowId) -> Result<bool> {
    toggle(host, window, WindowFlag::BufferDedicated)
}

fn toggle<H: Windows + ?Sized>(host: &mut H, window: WindowId, flag: WindowFlag) -> Result<bool> {
    let value = !host.window_flag(window, flag)?;
    host.set_window_flag(window, flag, value)?;
    host.refresh_indicators();
    debug!(%window, ?flag, value, "toggled dedication");
    Ok(value)
}

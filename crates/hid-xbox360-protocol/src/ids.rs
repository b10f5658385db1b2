//! Xbox 360 USB vendor and product ID constants.
//!
//! Verified against the Linux `xpad` driver device table
//! (`drivers/input/joystick/xpad.c`) and the USB ID registry.

/// Microsoft Corporation USB vendor ID.
pub const MICROSOFT_VENDOR_ID: u16 = 0x045E;

/// Known Xbox 360 product IDs.
pub mod product_ids {
    /// Xbox 360 wired controller.
    pub const WIRED: u16 = 0x028E;
    /// Xbox 360 wireless receiver for Windows.
    pub const WIRELESS_RECEIVER: u16 = 0x0719;
}

/// Return `true` if the identifier pair is a supported Xbox 360 device.
pub fn is_xbox360_device(vendor_id: u16, product_id: u16) -> bool {
    vendor_id == MICROSOFT_VENDOR_ID
        && matches!(
            product_id,
            product_ids::WIRED | product_ids::WIRELESS_RECEIVER
        )
}

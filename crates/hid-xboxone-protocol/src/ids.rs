//! Xbox One / Series USB product ID constants.
//!
//! All first-party controllers share the Microsoft vendor ID; products are
//! distinguished by PID. Table cross-checked against the Linux `xpad`
//! driver device table and SDL's controller database.

/// Microsoft Corporation USB vendor ID.
pub const MICROSOFT_VENDOR_ID: u16 = 0x045E;

/// Known Xbox One / Series product IDs.
pub mod product_ids {
    /// Original Xbox One controller (2013).
    pub const ONE: u16 = 0x02D1;
    /// Xbox One S controller (USB).
    pub const ONE_S_USB: u16 = 0x02EA;
    /// Xbox One S controller (Bluetooth enumeration).
    pub const ONE_S_BT: u16 = 0x02E0;
    /// Xbox Elite controller.
    pub const ELITE: u16 = 0x02E3;
    /// Xbox Elite Series 2 controller.
    pub const ELITE_2: u16 = 0x0B00;
    /// Xbox Adaptive controller.
    pub const ADAPTIVE: u16 = 0x0B0A;
    /// Xbox Series X|S controller (USB).
    pub const SERIES_USB: u16 = 0x0B12;
    /// Xbox Series X|S controller (Bluetooth enumeration).
    pub const SERIES_BT: u16 = 0x0B13;
    /// 2021 revision Xbox controller.
    pub const REV_2021: u16 = 0x0B20;
}

/// Return `true` if the identifier pair is a supported Xbox One family
/// device.
pub fn is_xboxone_device(vendor_id: u16, product_id: u16) -> bool {
    vendor_id == MICROSOFT_VENDOR_ID
        && matches!(
            product_id,
            product_ids::ONE
                | product_ids::ONE_S_USB
                | product_ids::ONE_S_BT
                | product_ids::ELITE
                | product_ids::ELITE_2
                | product_ids::ADAPTIVE
                | product_ids::SERIES_USB
                | product_ids::SERIES_BT
                | product_ids::REV_2021
        )
}

//! USB IDs for supported input-only wired Switch pads.
//!
//! All supported pads are PDP products sharing one vendor ID. Table from
//! SDL's `hidapi_switch` input-only controller list.

/// PDP (Performance Designed Products) USB vendor ID.
pub const PDP_VENDOR_ID: u16 = 0x0E6F;

/// Known input-only wired pad product IDs.
pub mod product_ids {
    /// PDP Faceoff Wired Pro Controller.
    pub const FACEOFF_WIRED_PRO: u16 = 0x0180;
    /// PDP Faceoff Deluxe Wired Pro Controller.
    pub const FACEOFF_DELUXE: u16 = 0x0181;
    /// PDP Wired Fight Pad Pro.
    pub const FIGHT_PAD_PRO: u16 = 0x0185;
    /// PDP Rock Candy Wired Controller.
    pub const ROCK_CANDY: u16 = 0x0187;
}

/// Return `true` if the identifier pair is a supported input-only pad.
pub fn is_switch_input_only_device(vendor_id: u16, product_id: u16) -> bool {
    vendor_id == PDP_VENDOR_ID
        && matches!(
            product_id,
            product_ids::FACEOFF_WIRED_PRO
                | product_ids::FACEOFF_DELUXE
                | product_ids::FIGHT_PAD_PRO
                | product_ids::ROCK_CANDY
        )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_variants() {
        for pid in [0x0180, 0x0181, 0x0185, 0x0187] {
            assert!(is_switch_input_only_device(PDP_VENDOR_ID, pid));
        }
    }

    #[test]
    fn test_unknown_pdp_product_rejected() {
        assert!(!is_switch_input_only_device(PDP_VENDOR_ID, 0x0200));
    }

    #[test]
    fn test_wrong_vendor_rejected() {
        assert!(!is_switch_input_only_device(0x045E, product_ids::ROCK_CANDY));
    }
}

//! # Courier Directory
//!
//! The courier codes the tracking provider accepts, with display names
//! for the API surface.

/// (code, display name) for every supported courier.
pub const COURIERS: &[(&str, &str)] = &[
    ("jne", "JNE (Jalur Nugraha Ekakurir)"),
    ("jnt", "J&T Express"),
    ("sicepat", "SiCepat Express"),
    ("anteraja", "AnterAja"),
    ("pos", "Pos Indonesia"),
    ("lion", "Lion Parcel"),
    ("ninja", "Ninja Express"),
    ("ide", "ID Express"),
    ("sap", "SAP Express"),
    ("wahana", "Wahana Prestasi Logistik"),
    ("spx", "Shopee Express"),
    ("lex", "Lazada Logistics"),
    ("tiki", "TIKI"),
    ("rpx", "RPX One Stop Logistics"),
    ("pcp", "PCP Express"),
    ("jet", "JET Express"),
    ("dse", "DSE (21 Express)"),
    ("first", "First Logistics"),
    ("ncs", "NCS (Nusantara Card Semesta)"),
    ("star", "Star Cargo"),
];

/// Display name for a courier code; unknown codes fall back to the
/// uppercased code.
pub fn courier_name(code: &str) -> String {
    COURIERS
        .iter()
        .find(|(c, _)| *c == code)
        .map(|(_, name)| (*name).to_string())
        .unwrap_or_else(|| code.to_uppercase())
}

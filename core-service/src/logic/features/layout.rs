//! Feature Layout - Centralized Feature Definition
//!
//! **CRITICAL: This file controls the classifier input contract**
//!
//! ## Rules (NEVER break these):
//! 1. Add feature → increment FEATURE_VERSION
//! 2. Change order → increment FEATURE_VERSION
//! 3. Remove feature → increment FEATURE_VERSION
//!
//! The names must byte-match the columns the classifier was trained on.
//! A loaded feature list is checked against this layout with [`validate_schema`].

use crc32fast::Hasher;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::schema::FeatureSchema;

// ============================================================================
// FEATURE VERSION
// ============================================================================

/// Current feature layout version
/// MUST be incremented when layout changes
pub const FEATURE_VERSION: u8 = 1;

// ============================================================================
// FEATURE LAYOUT (Authoritative source)
// ============================================================================

/// Feature names in exact order the classifier expects them
pub const FEATURE_LAYOUT: &[&str] = &[
    // === Flow basics (0-7) ===
    "sport",
    "dur",
    "sbytes",
    "dbytes",
    "sttl",
    "dttl",
    "sloss",
    "dloss",

    // === Load / packets / windows (8-17) ===
    "Sload",
    "Dload",
    "Spkts",
    "Dpkts",
    "swin",
    "dwin",
    "stcpb",
    "dtcpb",
    "smeansz",
    "dmeansz",

    // === Timing (18-23) ===
    "trans_depth",
    "Sjit",
    "Djit",
    "tcprtt",
    "synack",
    "ackdat",

    // === Connection counters (24-31) ===
    "ct_state_ttl",
    "ct_srv_src",
    "ct_srv_dst",
    "ct_dst_ltm",
    "ct_src_ltm",
    "ct_src_dport_ltm",
    "ct_dst_sport_ltm",
    "ct_dst_src_ltm",

    // === Protocol one-hot (32-38) ===
    "proto_any",
    "proto_gre",
    "proto_ospf",
    "proto_sctp",
    "proto_tcp",
    "proto_udp",
    "proto_unas",

    // === State one-hot (39-41) ===
    "state_CON",
    "state_FIN",
    "state_INT",

    // === Service one-hot (42-48) ===
    "service_dns",
    "service_ftp",
    "service_ftp-data",
    "service_http",
    "service_pop3",
    "service_smtp",
    "service_snmp",
];

/// Total number of features
/// IMPORTANT: Must match FEATURE_LAYOUT.len()!
pub const FEATURE_COUNT: usize = 49;

// ============================================================================
// LAYOUT HASH
// ============================================================================

/// CRC32 over version + names, used to detect layout mismatches
pub fn compute_layout_hash<S: AsRef<str>>(version: u8, names: &[S]) -> u32 {
    let mut hasher = Hasher::new();
    hasher.update(&[version]);

    for name in names {
        hasher.update(name.as_ref().as_bytes());
        hasher.update(&[0]); // Separator
    }

    hasher.finalize()
}

/// Hash of the built-in layout
pub fn layout_hash() -> u32 {
    compute_layout_hash(FEATURE_VERSION, FEATURE_LAYOUT)
}

// ============================================================================
// LAYOUT INFO
// ============================================================================

/// Complete layout information for serialization/logging
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayoutInfo {
    pub version: u8,
    pub hash: u32,
    pub feature_count: usize,
    pub feature_names: Vec<String>,
}

impl LayoutInfo {
    pub fn current() -> Self {
        Self {
            version: FEATURE_VERSION,
            hash: layout_hash(),
            feature_count: FEATURE_COUNT,
            feature_names: FEATURE_LAYOUT.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl Default for LayoutInfo {
    fn default() -> Self {
        Self::current()
    }
}

// ============================================================================
// SCHEMA VALIDATION
// ============================================================================

/// Loaded feature schema disagrees with the built-in layout
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error(
    "Feature schema mismatch: expected {expected_count} features (hash: {expected_hash:08x}), \
     got {actual_count} (hash: {actual_hash:08x}); missing: {missing:?}, unexpected: {unexpected:?}, \
     order differs: {order_differs}"
)]
pub struct SchemaMismatchError {
    pub expected_count: usize,
    pub expected_hash: u32,
    pub actual_count: usize,
    pub actual_hash: u32,
    /// In the layout, absent from the schema
    pub missing: Vec<String>,
    /// In the schema, absent from the layout
    pub unexpected: Vec<String>,
    /// Same name set but a different order
    pub order_differs: bool,
}

/// Check that a loaded schema is exactly the built-in layout, names and order
pub fn validate_schema(schema: &FeatureSchema) -> Result<(), SchemaMismatchError> {
    let names = schema.names();
    let actual_hash = compute_layout_hash(FEATURE_VERSION, names);
    let expected_hash = layout_hash();

    if names.len() == FEATURE_COUNT && names.iter().zip(FEATURE_LAYOUT).all(|(a, b)| a == b) {
        return Ok(());
    }

    let missing: Vec<String> = FEATURE_LAYOUT
        .iter()
        .filter(|name| !names.iter().any(|n| n == *name))
        .map(|name| name.to_string())
        .collect();

    let unexpected: Vec<String> = names
        .iter()
        .filter(|name| !FEATURE_LAYOUT.contains(&name.as_str()))
        .cloned()
        .collect();

    let order_differs = missing.is_empty() && unexpected.is_empty();

    Err(SchemaMismatchError {
        expected_count: FEATURE_COUNT,
        expected_hash,
        actual_count: names.len(),
        actual_hash,
        missing,
        unexpected,
        order_differs,
    })
}

// ============================================================================
// FEATURE INDEX LOOKUP
// ============================================================================

/// Get feature index by name
pub fn feature_index(name: &str) -> Option<usize> {
    FEATURE_LAYOUT.iter().position(|&n| n == name)
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_feature_count() {
        assert_eq!(FEATURE_COUNT, 49);
        assert_eq!(FEATURE_LAYOUT.len(), FEATURE_COUNT);
    }

    #[test]
    fn test_layout_names_unique() {
        for (i, name) in FEATURE_LAYOUT.iter().enumerate() {
            assert_eq!(feature_index(name), Some(i), "duplicate feature: {}", name);
        }
    }

    #[test]
    fn test_layout_hash_consistency() {
        assert_eq!(layout_hash(), layout_hash());
        assert_ne!(layout_hash(), 0);
        assert_ne!(
            compute_layout_hash(FEATURE_VERSION + 1, FEATURE_LAYOUT),
            layout_hash()
        );
    }

    #[test]
    fn test_validate_schema_success() {
        let schema = FeatureSchema::builtin();
        assert!(validate_schema(&schema).is_ok());
    }

    #[test]
    fn test_validate_schema_missing_and_unexpected() {
        let mut names: Vec<String> = FEATURE_LAYOUT.iter().map(|s| s.to_string()).collect();
        names[0] = "src_port".to_string();
        let schema = FeatureSchema::new(names);

        let err = validate_schema(&schema).unwrap_err();
        assert_eq!(err.missing, vec!["sport"]);
        assert_eq!(err.unexpected, vec!["src_port"]);
        assert!(!err.order_differs);
    }

    #[test]
    fn test_validate_schema_order() {
        let mut names: Vec<String> = FEATURE_LAYOUT.iter().map(|s| s.to_string()).collect();
        names.swap(0, 1);
        let schema = FeatureSchema::new(names);

        let err = validate_schema(&schema).unwrap_err();
        assert!(err.missing.is_empty());
        assert!(err.unexpected.is_empty());
        assert!(err.order_differs);
    }

    #[test]
    fn test_validate_schema_short() {
        let names: Vec<String> = FEATURE_LAYOUT[..48].iter().map(|s| s.to_string()).collect();
        let err = validate_schema(&FeatureSchema::new(names)).unwrap_err();
        assert_eq!(err.actual_count, 48);
        assert_eq!(err.missing, vec!["service_snmp"]);
    }

    #[test]
    fn test_feature_index() {
        assert_eq!(feature_index("sport"), Some(0));
        assert_eq!(feature_index("service_ftp-data"), Some(44));
        assert_eq!(feature_index("service_snmp"), Some(48));
        assert_eq!(feature_index("srcip"), None);
    }

    #[test]
    fn test_layout_info() {
        let info = LayoutInfo::current();
        assert_eq!(info.version, FEATURE_VERSION);
        assert_eq!(info.feature_count, FEATURE_COUNT);
        assert_eq!(info.feature_names.len(), FEATURE_COUNT);
    }
}

//! Property-based tests using proptest
//!
//! Projection laws that must hold for arbitrary inputs.

use proptest::prelude::*;
use truenas_provider::projection::{
    dataset_id, empty_to_null, in_dataset_scope, normalize_provider_type, numeric_id,
};

proptest! {
    #[test]
    fn test_provider_tag_mapping_is_total(tag in "[A-Za-z0-9_]{0,24}") {
        // Given: Any vendor tag, including a missing one
        // When: Normalizing it
        let normalized = normalize_provider_type(&tag);

        // Then: The result is non-empty and lowercase
        prop_assert!(!normalized.is_empty());
        prop_assert_eq!(normalized.to_lowercase(), normalized);
    }

    #[test]
    fn test_empty_to_null_keeps_non_empty(value in "\\PC+") {
        prop_assert_eq!(empty_to_null(&value), Some(value.clone()));
    }

    #[test]
    fn test_numeric_id_is_decimal(id in any::<u64>()) {
        let rendered = numeric_id(id);

        prop_assert!(rendered.chars().all(|c| c.is_ascii_digit()));
        prop_assert!(rendered == "0" || !rendered.starts_with('0'));
        prop_assert_eq!(rendered.parse::<u64>().unwrap(), id);
    }

    #[test]
    fn test_dataset_id_is_plain_join(
        pool in "[a-z][a-z0-9-]{0,10}",
        path in "[a-z0-9]{1,8}(/[a-z0-9]{1,8}){0,3}"
    ) {
        let id = dataset_id(&pool, &path);
        prop_assert_eq!(id, format!("{}/{}", pool, path));
    }

    #[test]
    fn test_recursive_scope_law(
        base in "[a-z]{1,6}(/[a-z]{1,6}){0,2}",
        other in "[a-z]{1,6}(/[a-z]{1,6}){0,3}",
        recursive in any::<bool>()
    ) {
        // Given: Any dataset name and scope root
        // When: Checking scope membership
        let selected = in_dataset_scope(&other, &base, recursive);

        // Then: Membership follows the boundary rule exactly
        let expected = other == base
            || (recursive && other.starts_with(&format!("{}/", base)));
        prop_assert_eq!(selected, expected);
    }

    #[test]
    fn test_sibling_with_shared_prefix_never_selected(
        base in "[a-z]{1,6}/[a-z]{1,6}",
        suffix in "[a-z0-9]{1,4}"
    ) {
        let sibling = format!("{}{}", base, suffix);
        prop_assert!(!in_dataset_scope(&sibling, &base, true));
    }
}

#[test]
fn test_empty_to_null_on_empty() {
    assert_eq!(empty_to_null(""), None);
}

#[test]
fn test_empty_provider_tag_reports_unknown() {
    assert_eq!(normalize_provider_type(""), "unknown");
}

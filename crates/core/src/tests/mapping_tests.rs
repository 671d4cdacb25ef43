use super::*;
use std::io::Write as _;

fn forward() -> VersionMapping {
    VersionMapping::new("10.98", "12.90")
        .with_item(100, 200)
        .with_name("Demon", "Greater Demon")
}

#[test]
fn translate_item_is_identity_without_mapping() {
    let mut table = VersionTable::new();
    assert_eq!(table.translate_item(100, "10.98", "12.90"), 100);
    assert_eq!(table.translate_name("Demon", "10.98", "12.90"), "Demon");
}

#[test]
fn explicit_mapping_translates_only_known_ids() {
    let mut table = VersionTable::new();
    table.add(forward());
    assert_eq!(table.translate_item(100, "10.98", "12.90"), 200);
    assert_eq!(table.translate_item(101, "10.98", "12.90"), 101);
    assert_eq!(table.translate_name("Demon", "10.98", "12.90"), "Greater Demon");
    assert_eq!(table.translate_name("Rat", "10.98", "12.90"), "Rat");
}

#[test]
fn equal_revisions_short_circuit() {
    let mut table = VersionTable::new();
    table.add(VersionMapping::new("12.90", "12.90").with_item(1, 2));
    assert_eq!(table.translate_item(1, "12.90", "12.90"), 1);
}

#[test]
fn reverse_lookup_is_synthesized_and_cached() {
    let mut table = VersionTable::new();
    table.add(forward());

    let reverse = table.resolve("12.90", "10.98").expect("inverse mapping").clone();
    assert_eq!(reverse.from_revision, "12.90");
    assert_eq!(reverse.to_revision, "10.98");
    assert_eq!(reverse.item_map, BTreeMap::from([(200, 100)]));
    assert_eq!(
        reverse.name_map,
        BTreeMap::from([("Greater Demon".to_string(), "Demon".to_string())])
    );
    assert_eq!(table.cached_inverses(), 1);

    table.resolve("12.90", "10.98").expect("cached inverse");
    assert_eq!(table.cached_inverses(), 1);
    assert_eq!(table.translate_item(200, "12.90", "10.98"), 100);
}

#[test]
fn adding_a_mapping_invalidates_its_cached_inverse() {
    let mut table = VersionTable::new();
    table.add(forward());
    assert_eq!(table.translate_item(200, "12.90", "10.98"), 100);

    table.add(VersionMapping::new("10.98", "12.90").with_item(100, 300));
    assert_eq!(table.cached_inverses(), 0);
    assert_eq!(table.translate_item(300, "12.90", "10.98"), 100);
    assert_eq!(table.translate_item(200, "12.90", "10.98"), 200);
}

#[test]
fn direct_mapping_wins_over_inverse() {
    let mut table = VersionTable::new();
    table.add(forward());
    table.add(VersionMapping::new("12.90", "10.98").with_item(200, 999));
    assert_eq!(table.translate_item(200, "12.90", "10.98"), 999);
}

#[test]
fn inverted_many_to_one_keeps_largest_key() {
    let mapping = VersionMapping::new("a", "b").with_item(1, 5).with_item(2, 5);
    assert_eq!(mapping.inverted().item_map, BTreeMap::from([(5, 2)]));
}

#[test]
fn load_from_file_reads_pairs_and_skips_bad_keys() {
    let mut file = tempfile::NamedTempFile::new().expect("temp file");
    write!(
        file,
        r#"{{
            "10.98 -> 12.90": {{ "items": {{ "2160": 2161 }}, "creatures": {{ "Demon": "Greater Demon" }} }},
            "no separator": {{ "items": {{ "1": 2 }} }}
        }}"#
    )
    .expect("write mapping file");

    let mut table = VersionTable::new();
    assert!(table.load_from_file(file.path()));
    assert_eq!(table.len(), 1);
    assert_eq!(table.translate_item(2160, "10.98", "12.90"), 2161);
    assert_eq!(table.translate_name("Demon", "10.98", "12.90"), "Greater Demon");
}

#[test]
fn non_pair_keys_with_scalar_values_are_skipped() {
    let mut table = VersionTable::new();
    let count = table
        .load_from_str(
            r#"{
                "_comment": "generated by tool",
                "version": 1,
                "10.98->12.90": { "items": { "2160": 2161 } }
            }"#,
        )
        .expect("metadata keys should not reject the file");
    assert_eq!(count, 1);
    assert_eq!(table.translate_item(2160, "10.98", "12.90"), 2161);
}

#[test]
fn malformed_file_leaves_table_untouched() {
    let mut table = VersionTable::new();
    table.add(forward());

    let mut file = tempfile::NamedTempFile::new().expect("temp file");
    write!(
        file,
        r#"{{ "a->b": {{ "items": {{ "7": 8 }} }}, "c->d": {{ "items": {{ "seven": 8 }} }} }}"#
    )
    .expect("write mapping file");

    assert!(!table.load_from_file(file.path()));
    assert_eq!(table.len(), 1);
    assert!(table.resolve("a", "b").is_none());

    let err = table
        .try_load_from_file(file.path())
        .expect_err("non-numeric id must fail");
    assert!(matches!(err, MappingError::InvalidItemId { .. }));
}

#[test]
fn missing_file_reports_failure() {
    let mut table = VersionTable::new();
    let missing = std::env::temp_dir().join("mcm_missing_mapping_file.json");
    assert!(!table.load_from_file(&missing));
    assert!(table.is_empty());
}

#[test]
fn non_json_input_is_a_parse_error() {
    let mut table = VersionTable::new();
    let err = table.load_from_str("not json").expect_err("must fail");
    assert!(matches!(err, MappingError::Parse(_)));
}

use ddlsync_core::{extract_annotations, Ident};

#[test]
fn extracts_renamed_annotation_with_line() {
    let sql = "CREATE TABLE t (\n    id int,\n    full_name varchar(100) -- @renamed from=name\n);\n";
    let (cleaned, annotations) = extract_annotations(sql);

    assert_eq!(annotations.len(), 1);
    assert_eq!(annotations[0].line, 3);
    assert_eq!(annotations[0].from, Ident::new("name"));
    assert!(!cleaned.contains("@renamed"));
    // Line boundaries are preserved for stable error locations.
    assert_eq!(cleaned.lines().count(), sql.lines().count());
}

#[test]
fn quoted_source_identifiers_are_supported() {
    let sql = "-- @renamed from=\"Full Name\"\n";
    let (_, annotations) = extract_annotations(sql);
    assert_eq!(annotations[0].from, Ident::quoted("Full Name"));
}

#[test]
fn dashes_inside_string_literals_are_not_comments() {
    let sql = "INSERT INTO t VALUES ('-- @renamed from=x');\n";
    let (cleaned, annotations) = extract_annotations(sql);
    assert!(annotations.is_empty());
    assert_eq!(cleaned, sql);
}

#[test]
fn unrelated_comments_pass_through() {
    let sql = "CREATE TABLE t (id int); -- plain note\n";
    let (cleaned, annotations) = extract_annotations(sql);
    assert!(annotations.is_empty());
    assert_eq!(cleaned, sql);
}

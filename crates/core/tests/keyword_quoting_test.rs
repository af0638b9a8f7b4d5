use ddlsync_core::{is_reserved, Ident, Mode};

#[test]
fn reserved_words_are_reserved_case_insensitively() {
    assert!(is_reserved(Mode::Mysql, "order"));
    assert!(is_reserved(Mode::Mysql, "ORDER"));
    assert!(is_reserved(Mode::Postgres, "user"));
    assert!(is_reserved(Mode::Mssql, "key"));
    assert!(!is_reserved(Mode::Postgres, "email"));
}

#[test]
fn quoting_uses_the_dialect_delimiters() {
    let order = Ident::new("order");
    assert_eq!(Mode::Mysql.quote_ident(&order), "`order`");
    assert_eq!(Mode::Postgres.quote_ident(&order), "\"order\"");
    assert_eq!(Mode::Mssql.quote_ident(&order), "[order]");
}

#[test]
fn plain_identifiers_pass_through_unquoted() {
    let email = Ident::new("email");
    for mode in Mode::ALL {
        assert_eq!(mode.quote_ident(&email), "email");
    }
}

#[test]
fn explicitly_quoted_identifiers_stay_quoted() {
    let mixed = Ident::quoted("MixedCase");
    assert_eq!(Mode::Postgres.quote_ident(&mixed), "\"MixedCase\"");
}

#[test]
fn identifiers_with_odd_characters_are_quoted() {
    let spaced = Ident::new("odd name");
    assert_eq!(Mode::Mysql.quote_ident(&spaced), "`odd name`");
}

#[test]
fn closing_delimiters_are_escaped() {
    let tricky = Ident::quoted("a]b");
    assert_eq!(Mode::Mssql.quote_ident(&tricky), "[a]]b]");
}

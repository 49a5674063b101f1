//! Unit tests for the DDL analyzers
//!
//! These go through the public parser API the same way the model builder
//! does: simplify the file text, then analyze it.

use dbrepo::model::{ArgumentMode, DatabaseSubObject, FunctionMode, ReturnType};
use dbrepo::parser::{
    extract_tags, parse_field, parse_function, parse_table, simplify_for_analysis,
    split_top_level, Tag, TagValue,
};
use pretty_assertions::assert_eq;

fn table(name: &str, sql: &str) -> dbrepo::model::DatabaseTable {
    parse_table(DatabaseSubObject::new(name), &simplify_for_analysis(sql))
}

// ============================================================================
// Tag Tests
// ============================================================================

#[test]
fn test_tag_with_list_value() {
    let tag = Tag::parse("#roles=['admin','user']").unwrap();
    assert_eq!(tag.name, "roles");
    assert_eq!(tag.value, TagValue::Text("['admin','user']".to_string()));
    assert_eq!(tag.list_values(), vec!["admin", "user"]);
}

#[test]
fn test_tag_flag() {
    let tag = Tag::parse("#ignore").unwrap();
    assert_eq!(tag.name, "ignore");
    assert_eq!(tag.value, TagValue::Flag(true));
}

#[test]
fn test_non_tag_text() {
    assert!(Tag::parse("ignore").is_none());
}

#[test]
fn test_last_tag_occurrence_wins() {
    let tags = extract_tags("/* #service-name=one */ /* #service-name=two */");
    assert_eq!(tags.len(), 1);
    assert_eq!(tags["service-name"].value.as_text(), Some("two"));
}

// ============================================================================
// Field Tests
// ============================================================================

#[test]
fn test_column_list_split() {
    let fragments = split_top_level("a INT, b NUMERIC(10,2) DEFAULT 0, c TEXT REFERENCES x(y)");
    assert_eq!(fragments.len(), 3);
    assert_eq!(fragments[1], "b NUMERIC(10,2) DEFAULT 0");
}

#[test]
fn test_foreign_key_convention_matching_suffix() {
    let field = parse_field("fk_abc_xyz_owner_id integer", "xyz").unwrap();
    assert_eq!(field.camel_cased_name, "ownerId");
}

#[test]
fn test_foreign_key_convention_mismatched_suffix_falls_through() {
    let field = parse_field("fk_abc_xyz_owner_id integer", "qqq").unwrap();
    // Generic branch: nothing to strip, plain snake -> camel conversion
    assert_eq!(field.camel_cased_name, "fkAbcXyzOwnerId");
}

#[test]
fn test_primary_key_convention() {
    let field = parse_field("pk_xyz_id integer primary key", "xyz").unwrap();
    assert!(field.is_primary_key);
    assert!(!field.to_update);
    assert!(field.retrieve_in_list);
    assert_eq!(field.camel_cased_name, "id");
}

#[test]
fn test_camel_cased_name_is_never_empty() {
    for fragment in [
        "x int",
        "pk_a_id int",
        "fk_abc_xyz_a int",
        "usr_ int",
        "\"Quoted\" text",
    ] {
        let field = parse_field(fragment, "usr").unwrap();
        assert!(
            !field.camel_cased_name.is_empty(),
            "empty camelCasedName for {}",
            fragment
        );
    }
}

// ============================================================================
// Table Tests
// ============================================================================

#[test]
fn test_table_with_header_tags() {
    let t = table(
        "shot_customer_cus",
        r#"
-- customers
/* #service-name=customers #roles=['admin','clerk'] #no-delete */
create table shot_customer_cus (
    pk_cus_id serial primary key,
    cus_email text unique /* #list-filter=byEmail */,
    cus_credit numeric(10,2) default 0 not null
);
"#,
    );

    assert_eq!(t.db_prefix, "sho");
    assert_eq!(t.camel_cased_name, "customer");
    assert_eq!(t.table_suffix, "cus");
    assert_eq!(t.service_name(), Some("customers"));
    assert!(!t.is_action_allowed("delete"));
    assert_eq!(t.roles_for("get"), vec!["admin", "clerk"]);
    assert_eq!(t.primary_key_field().unwrap().camel_cased_name, "id");

    let email = t.field("cus_email").unwrap();
    assert!(email.unique);
    assert!(email.is_list_filter);
    assert_eq!(email.list_filter_name.as_deref(), Some("byEmail"));

    let credit = t.field("cus_credit").unwrap();
    assert_eq!(credit.field_type, "numeric(10,2)");
    assert_eq!(credit.default_value.as_deref(), Some("0"));
    assert!(credit.not_null);
}

#[test]
fn test_table_crud_action_tags() {
    let t = table(
        "shot_user_usr",
        r#"
/* #service-name=users #create-roles=['admin'] #update-roles=['admin','owner']
   #no-create #no-delete #ignore */
create table shot_user_usr (
    pk_usr_id serial primary key,
    usr_md5hash text,
    usr_address2_city text
);
"#,
    );

    assert_eq!(t.service_name(), Some("users"));
    assert_eq!(t.roles_for("create"), vec!["admin"]);
    assert_eq!(t.roles_for("update"), vec!["admin", "owner"]);
    assert!(t.roles_for("get").is_empty());
    assert!(!t.is_action_allowed("create"));
    assert!(!t.is_action_allowed("delete"));
    assert!(t.is_action_allowed("update"));
    assert!(t.is_ignored());

    let columns: Vec<&str> = t.fields.iter().map(|f| f.camel_cased_name.as_str()).collect();
    assert_eq!(columns, vec!["id", "md5hash", "address2City"]);
}

#[test]
fn test_table_level_foreign_key_not_modeled() {
    let t = table(
        "shot_order_ord",
        "create table shot_order_ord (
            pk_ord_id serial primary key,
            ord_customer integer,
            foreign key (ord_customer) references shot_customer_cus(pk_cus_id)
        );",
    );
    assert_eq!(t.fields.len(), 2);
    assert!(t.fields.iter().all(|f| f.foreign_key.is_none()));
}

#[test]
fn test_table_without_create_statement() {
    let t = table("shot_customer_cus", "-- placeholder, table dropped\n");
    assert!(t.fields.is_empty());
    assert!(t.tags.is_empty());
    assert_eq!(t.table_suffix, "cus");
}

// ============================================================================
// Function Tests
// ============================================================================

#[test]
fn test_function_signature() {
    let f = parse_function(
        DatabaseSubObject::new("shof_order_total"),
        &simplify_for_analysis(
            r#"
create or replace function shof_order_total(p_order_id integer, inout p_discount numeric default 0)
returns numeric
language plpgsql volatile
as $$
begin
    -- immutable is only mentioned here
    return 0;
end;
$$;
"#,
        ),
    );

    assert!(f.has_or_replace);
    assert_eq!(f.db_prefix, "sho");
    assert_eq!(f.camel_cased_name, "orderTotal");
    assert_eq!(f.mode, Some(FunctionMode::Volatile));
    assert_eq!(f.return_type, ReturnType::Scalar("numeric".to_string()));
    assert_eq!(f.arguments.len(), 2);
    assert_eq!(f.arguments[1].mode, ArgumentMode::InOut);
    assert_eq!(f.arguments[1].name, "p_discount");
    assert_eq!(f.arguments[1].default_value.as_deref(), Some("0"));
}

#[test]
fn test_function_returns_table_columns() {
    let f = parse_function(
        DatabaseSubObject::new("shof_orders"),
        &simplify_for_analysis(
            "create function shof_orders() returns table (ord_id integer, ord_total numeric(10,2)) \
             language sql as $$ select 1, 2 $$;",
        ),
    );
    assert_eq!(f.return_type, ReturnType::Table);
    let columns = f.return_table.unwrap();
    assert_eq!(columns.len(), 2);
    assert_eq!(columns[1].field_type, "numeric(10,2)");
}

//! The statement-boundary grammar.
//!
//! Only the leading keywords and the names needed to classify a statement
//! are parsed; everything else is skipped as opaque tokens up to the
//! terminator.

pub(crate) const RULES: &str = r#"
silent unit_end = statement_end (!unit_slash statement_end)* unit_slash ;

create_table_statement = kw_create WS (kw_global WS kw_temporary WS)? kw_table WS qualified_identifier statement_end ;
create_view_statement = create_or_replace ((kw_no WS)? kw_force WS)? kw_view WS qualified_identifier statement_end ;
create_index_statement = kw_create WS ((kw_unique / kw_bitmap) WS)? kw_index WS qualified_identifier WS kw_on WS qualified_identifier statement_end ;
create_sequence_statement = kw_create WS kw_sequence WS qualified_identifier statement_end ;
create_synonym_statement = create_or_replace (kw_public WS)? kw_synonym WS qualified_identifier WS kw_for WS qualified_identifier statement_end ;
create_role_statement = kw_create WS kw_role WS identifier statement_end ;
create_user_statement = kw_create WS kw_user WS identifier statement_end ;
create_context_statement = create_or_replace kw_context WS identifier WS kw_using WS qualified_identifier statement_end ;

create_package_body_statement = create_or_replace kw_package WS kw_body ^ WS qualified_identifier unit_end ;
create_package_statement = create_or_replace kw_package ^ WS qualified_identifier unit_end ;
create_type_body_statement = create_or_replace kw_type WS kw_body ^ WS qualified_identifier unit_end ;
create_type_statement = create_or_replace kw_type ^ WS qualified_identifier unit_end ;
create_trigger_statement = create_or_replace kw_trigger ^ WS qualified_identifier trigger_target unit_end ;
transparent trigger_target = (!(WS kw_on WS) token)* WS kw_on WS qualified_identifier ;
create_procedure_statement = create_or_replace kw_procedure ^ WS qualified_identifier unit_end ;
create_function_statement = create_or_replace kw_function ^ WS qualified_identifier unit_end ;

add_constraint_statement = kw_alter WS kw_table WS qualified_identifier WS kw_add WS kw_constraint WS identifier WS constraint_kind statement_end ;
transparent constraint_kind = foreign_key_clause / primary_key_clause / unique_clause / check_clause ;
foreign_key_clause = kw_foreign WS kw_key (!kw_references token)* kw_references WS qualified_identifier ;
primary_key_clause = kw_primary WS kw_key ;
unique_clause = kw_unique ;
check_clause = kw_check ;

insert_statement = kw_insert WS kw_into WS qualified_identifier statement_end ;
update_statement = kw_update WS qualified_identifier statement_end ;
delete_statement = kw_delete WS (kw_from WS)? qualified_identifier statement_end ;
merge_statement = kw_merge WS kw_into WS qualified_identifier statement_end ;
query_statement = (kw_select / kw_with) statement_end ;
anonymous_block = (kw_declare / kw_begin) ^ unit_end ;

transparent sql_statement = create_table_statement / create_view_statement / create_index_statement
    / create_sequence_statement / create_synonym_statement / create_role_statement
    / create_user_statement / create_context_statement / create_package_body_statement
    / create_package_statement / create_type_body_statement / create_type_statement
    / create_trigger_statement / create_procedure_statement / create_function_statement
    / create_other_statement / add_constraint_statement / alter_statement / drop_statement
    / truncate_statement / rename_statement / insert_statement / update_statement
    / delete_statement / merge_statement / query_statement / grant_statement / revoke_statement
    / comment_statement / commit_statement / rollback_statement / connect_statement
    / anonymous_block ;

file = (separator sql_statement)* separator ;
"#;

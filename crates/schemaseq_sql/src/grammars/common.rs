//! Rules shared by every SQL grammar.

/// Whitespace, comments, literals, and identifiers.
pub(crate) const LEXICAL: &str = r#"
# whitespace and comments
silent comment = '--' [^\n]* / '/*' (!'*/' .)* '*/' ;
silent WS = ([ \t\r\n] / comment)+ ;
silent ident_tail = [A-Za-z0-9_$#] ;
silent line_end = [ \t\r]* ('\n' / !.) ;

# literals
string_literal = ('\'' [^']* '\'')+ ;
number_literal = [+-]? ([0-9]+ ('.' !'.' [0-9]*)? / '.' [0-9]+) ([eE] [+-]? [0-9]+)? ;
integer_literal = [0-9]+ ;
transparent literal = string_literal / number_literal ;

# identifiers
unquoted_identifier = ':'? [A-Za-z] [A-Za-z0-9_$#]* ;
quoted_identifier = '"' [^"]+ '"' ;
transparent identifier = quoted_identifier / unquoted_identifier ;
identifier_modifier = [%@] identifier ;
qualified_identifier = identifier ('.' identifier)* identifier_modifier? ;
identifier_list = identifier (WS? ',' WS? identifier)* ;

# opaque statement text
silent token = comment / string_literal / quoted_identifier / [A-Za-z0-9_$#]+ / [ \t\r\n]+ / [^;] ;
silent statement_end = token* ';' ;
silent unit_slash = ([ \t\r] / comment)* '\n' ([ \t\r\n] / comment)* '/' &line_end ;
silent separator = (WS / '/' &line_end)* ;
"#;

/// Statements both grammars recognize the same way.
pub(crate) const SHARED_STATEMENTS: &str = r#"
create_or_replace = kw_create WS (kw_or WS kw_replace WS)? ((kw_editionable / kw_noneditionable) WS)? ;

object_type = kw_package WS kw_body / kw_type WS kw_body / kw_public WS kw_synonym
    / kw_materialized WS kw_view / kw_database WS kw_link / object_word ;
object_word = [A-Za-z_]+ ;

create_other_statement = create_or_replace object_type statement_end ;
alter_statement = kw_alter WS object_type WS qualified_identifier statement_end ;
drop_statement = kw_drop WS object_type WS qualified_identifier statement_end ;
truncate_statement = kw_truncate WS kw_table WS qualified_identifier statement_end ;
rename_statement = kw_rename WS identifier WS kw_to WS identifier statement_end ;
comment_statement = kw_comment WS kw_on statement_end ;
commit_statement = kw_commit statement_end ;
rollback_statement = kw_rollback statement_end ;

connect_statement = kw_connect WS identifier ('/' connect_password)? ('@' connect_dsn)? [ \t]* (';' / &line_end) ;
connect_password = [^@ \t\r\n;]+ ;
connect_dsn = [^ \t\r\n;]+ ;

privilege = privilege_word (WS !kw_on !kw_to !kw_from privilege_word)* ;
silent privilege_word = [A-Za-z_]+ ;
privilege_list = privilege (WS? ',' WS? privilege)* ;
grant_clause = privilege_list WS (kw_on WS qualified_identifier WS)? kw_to WS identifier_list ;
revoke_clause = privilege_list WS (kw_on WS qualified_identifier WS)? kw_from WS identifier_list ;
grant_statement = kw_grant WS (grant_clause statement_end / statement_end) ;
revoke_statement = kw_revoke WS (revoke_clause statement_end / statement_end) ;
"#;

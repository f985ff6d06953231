//! The dependency-extraction grammar.
//!
//! Parses expressions, queries, and PL/SQL bodies in enough detail that
//! every qualified name used inside an object can be classified as local
//! or external.

pub(crate) const RULES: &str = r#"
# terminators
silent statement_terminator = WS? ';' ;
silent unit_terminator = WS? ';' unit_slash ;

# operators
operator_keyword = (kw_not WS)? (kw_in / kw_between / kw_like) / kw_and / kw_or / kw_escape / kw_mod ;
silent operator = '||' / '!=' / '^=' / '<=' / '>=' / '<>' / '=' / '<' / '>' / '(+)' WS? '='
    / [+*/-] / operator_keyword WS ;

# expressions
prior_expression = (kw_prior WS)? qualified_identifier ;
count_expression = kw_count WS? '(' WS? ('*' / ((kw_distinct / kw_all) WS)? expression) WS? ')' ;
function_expression = qualified_identifier WS? ('(' WS? expression_list? WS? ')')+ ('.' identifier)* ;
case_clause = kw_when WS expression WS kw_then WS expression ;
case_header = kw_case (WS !kw_when expression)? ;
case_expression = case_header WS case_clause (WS case_clause)* WS (kw_else WS expression WS)? kw_end ;
cast_expression = kw_cast WS? '(' WS? expression WS kw_as WS data_type WS? ')' ;
paren_expression = '(' WS? expression WS? ')' ;
exists_expression = kw_exists WS? subquery ;
transparent simple_expression = literal / count_expression / cast_expression / exists_expression
    / case_expression / function_expression / subquery / paren_expression_list
    / paren_expression / prior_expression ;
unary_operator = (kw_not / [+-]) WS? ;
post_operator = WS kw_is WS (kw_not WS)? kw_null ;
expression = (identifier WS? '=>' WS?)? unary_operator? simple_expression post_operator?
    (WS? operator WS? unary_operator? simple_expression post_operator?)* ;
expression_list = expression (WS? ',' WS? expression)* ;
paren_expression_list = '(' WS? expression_list WS? ')' ;

# queries
silent select_keyword = (kw_from / kw_bulk / kw_cross / kw_into / kw_union / kw_minus / kw_intersect
    / kw_left / kw_right / kw_full / kw_inner / kw_join / kw_where / kw_start / kw_connect / kw_on
    / kw_for / kw_group / kw_order / kw_having / kw_using) WS ;
all_columns = identifier ('.' identifier)* '.' '*' ;
select_clause = all_columns / expression (WS (kw_as WS)? !select_keyword identifier)? ;
select_clause_list = select_clause (WS? ',' WS? select_clause)* ;
transparent subquery = '(' WS? select_statement WS? ')' ;
table_cast_clause = kw_table WS? '(' WS? kw_cast WS? '(' WS? expression WS kw_as WS data_type WS? ')' WS? ')' ;
table_clause = kw_table WS? '(' WS? expression WS? ')' ;
from_clause = (table_cast_clause / table_clause / qualified_identifier / subquery) (WS !select_keyword identifier)? ;
join_type = (kw_left / kw_right / kw_full) WS (kw_outer WS)? / kw_inner WS / kw_cross WS ;
join_clause = join_type? kw_join WS from_clause (WS kw_on WS expression / WS kw_using WS? '(' WS? identifier_list WS? ')')? ;
table_ref = from_clause (WS join_clause)* ;
from_clause_list = table_ref (WS? ',' WS? table_ref)* ;
where_clause = kw_where WS expression ;
start_with_clause = kw_start WS kw_with WS expression (WS connect_by_clause)? / connect_by_clause (WS kw_start WS kw_with WS expression)? ;
connect_by_clause = kw_connect WS kw_by WS (kw_nocycle WS)? expression ;
order_by_clause = kw_order WS (kw_siblings WS)? kw_by WS select_clause_list ;
group_by_clause = kw_group WS kw_by WS expression_list ;
having_clause = kw_having WS expression ;
for_update_clause = kw_for WS kw_update (WS kw_of WS qualified_identifier_list)? (WS (kw_nowait / kw_wait WS integer_literal / kw_skip WS kw_locked))? ;
transparent select_modifier_clause = start_with_clause / where_clause / for_update_clause
    / order_by_clause / group_by_clause / having_clause ;
transparent simple_select_statement = kw_select WS ((kw_distinct / kw_unique / kw_all) WS)?
    ('*' / select_clause_list) WS kw_from WS from_clause_list (WS select_modifier_clause)* ;
set_operation = kw_union (WS kw_all)? / kw_minus / kw_intersect ;
paren_select_statement = '(' WS? select_statement WS? ')' ;
common_table = identifier WS kw_as WS? '(' WS? select_statement WS? ')' ;
with_clause = kw_with WS common_table (WS? ',' WS? common_table)* WS ;
select_statement = with_clause? simple_select_statement
    (WS set_operation WS (simple_select_statement / paren_select_statement))* ;

# PL/SQL definitions
data_size = ('*' / integer_literal) (WS? ',' WS? [+-]? integer_literal / WS (kw_char / kw_byte))? ;
data_type = qualified_identifier (WS? '(' WS? data_size WS? ')')? (WS kw_with (WS kw_local)? WS kw_time WS kw_zone)? ;
silent assign = WS? (':=' WS? / kw_default WS) ;
argument = identifier WS (kw_in WS)? (kw_out WS)? (kw_nocopy WS)? data_type (assign expression)? ;
argument_list = argument (WS? ',' WS? argument)* ;
common_definition = identifier (WS? '(' WS? argument_list WS? ')')? ;
procedure_definition = kw_procedure WS common_definition ;
procedure_body = WS (kw_is / kw_as) WS ^ declaration_list? WS? basic_compound_statement ;
return_clause = kw_return WS qualified_identifier ;
function_modifier = kw_pipelined / kw_deterministic / kw_parallel_enable / kw_result_cache ;
function_definition = kw_function WS common_definition WS return_clause (WS function_modifier)* ;
cursor_definition = kw_cursor WS common_definition (WS kw_return WS data_type)? WS (kw_is / kw_as) WS select_statement ;
range_clause = kw_range WS number_literal WS? '..' WS? number_literal ;

# PL/SQL declarations
exception_declaration = identifier WS kw_exception ;
simple_declaration = !kw_begin !kw_end identifier WS (kw_constant WS)? data_type (WS kw_not WS kw_null)? (assign expression)? ;
subtype_declaration = kw_subtype WS identifier WS kw_is WS qualified_identifier (WS? '(' WS? data_size WS? ')')? (WS range_clause)? (WS kw_not WS kw_null)? ;
record_item_list = simple_declaration (WS? ',' WS? simple_declaration)* ;
record_declaration = kw_type WS identifier WS kw_is WS kw_record WS? '(' WS? record_item_list WS? ')' ;
ref_cursor_declaration = kw_type WS identifier WS kw_is WS kw_ref WS kw_cursor (WS kw_return WS data_type)? ;
index_by_clause = kw_index WS kw_by WS data_type ;
collection_kind = kw_table / (kw_varray / kw_varying WS kw_array) WS? '(' WS? integer_literal WS? ')' ;
array_declaration = kw_type WS identifier WS kw_is WS collection_kind WS kw_of WS data_type (WS kw_not WS kw_null)? (WS index_by_clause)? ;
procedure_declaration = procedure_definition procedure_body? ;
function_declaration = function_definition procedure_body? ;
pragma_declaration = kw_pragma WS identifier (WS? '(' WS? expression_list? WS? ')')? ;
declaration = (procedure_declaration / function_declaration / cursor_definition / subtype_declaration
    / record_declaration / array_declaration / ref_cursor_declaration / pragma_declaration
    / exception_declaration / simple_declaration) WS? ';' ;
declaration_list = declaration (WS !kw_end !kw_begin declaration)* ;

# PL/SQL control statements
range_expression = expression (WS? '..' WS? expression)? ;
elsif_clause = kw_elsif WS expression WS kw_then WS plsql_statement_list WS ;
if_statement = kw_if WS expression WS kw_then WS plsql_statement_list WS elsif_clause*
    (kw_else WS plsql_statement_list WS)? kw_end WS kw_if statement_terminator ;
for_clause = identifier WS kw_in WS (kw_reverse WS)? (subquery / range_expression) ;
loop_statement = kw_loop WS plsql_statement_list WS kw_end WS kw_loop statement_terminator ;
for_statement = kw_for WS for_clause WS kw_loop WS plsql_statement_list WS kw_end WS kw_loop statement_terminator ;
forall_bounds = (kw_indices / kw_values) WS kw_of WS expression / range_expression ;
forall_statement = kw_forall WS identifier WS kw_in WS forall_bounds WS (kw_save WS kw_exceptions WS)?
    (insert_statement / update_statement / delete_statement / merge_statement) ;
while_statement = kw_while WS expression WS kw_loop WS plsql_statement_list WS kw_end WS kw_loop statement_terminator ;

# PL/SQL assignments and queries
assignment_statement = expression WS? ':=' WS? expression statement_terminator ;
into_clause = (kw_bulk WS kw_collect WS)? kw_into WS expression_list ;
select_into_statement = kw_select WS ((kw_distinct / kw_unique) WS)? ('*' / select_clause_list) WS
    into_clause WS kw_from WS from_clause_list (WS select_modifier_clause)* ;
plsql_select_statement = select_into_statement (WS set_operation WS select_statement)* statement_terminator ;

# PL/SQL blocks
declare_section = kw_declare WS (declaration_list WS)? ;
exception_clause = kw_when WS expression WS kw_then WS plsql_statement_list ;
exception_clause_list = exception_clause (WS exception_clause)* ;
exception_section = kw_exception WS exception_clause_list WS ;
basic_compound_statement = kw_begin WS plsql_statement_list WS exception_section? kw_end (WS !kw_if !kw_loop !kw_case identifier)? ;
compound_statement = declare_section? basic_compound_statement ;

# PL/SQL statements
return_statement = kw_return (WS expression)? statement_terminator ;
using_clause = (kw_in WS)? (kw_out WS)? expression ;
using_clause_list = using_clause (WS? ',' WS? using_clause)* ;
execute_immediate_statement = kw_execute WS kw_immediate WS expression (WS into_clause)?
    (WS kw_using WS using_clause_list)? returning_clause? statement_terminator ;
null_statement = kw_null statement_terminator ;
raise_statement = kw_raise (WS qualified_identifier)? statement_terminator ;
close_statement = kw_close WS identifier statement_terminator ;
fetch_statement = kw_fetch WS identifier WS into_clause (WS kw_limit WS expression)? statement_terminator ;
open_statement = kw_open WS identifier (WS? '(' WS? expression_list WS? ')')?
    (WS kw_for WS (select_statement / expression) (WS kw_using WS using_clause_list)?)? statement_terminator ;
function_call = function_expression statement_terminator ;
procedure_call = !kw_end qualified_identifier statement_terminator ;
block_statement = compound_statement statement_terminator ;
plsql_case_clause = kw_when WS expression WS kw_then WS plsql_statement_list ;
case_statement = case_header WS plsql_case_clause (WS plsql_case_clause)* WS
    (kw_else WS plsql_statement_list WS)? kw_end WS kw_case statement_terminator ;
pipe_statement = kw_pipe WS kw_row WS? '(' WS? expression WS? ')' statement_terminator ;
exit_statement = (kw_exit / kw_continue) (WS kw_when WS expression)? statement_terminator ;
plsql_statement = if_statement / for_statement / forall_statement / while_statement / loop_statement
    / plsql_select_statement / block_statement / return_statement / execute_immediate_statement
    / case_statement / pipe_statement / assignment_statement / insert_statement / update_statement
    / delete_statement / merge_statement / function_call / commit_statement / rollback_statement
    / exit_statement / raise_statement / null_statement / close_statement / fetch_statement
    / open_statement / procedure_call ;
plsql_statement_list = plsql_statement (WS plsql_statement)* ;

# data manipulation
qualified_identifier_list = qualified_identifier (WS? ',' WS? qualified_identifier)* ;
columns_list = '(' WS? qualified_identifier_list WS? ')' WS? ;
values_clause = kw_values WS? (paren_expression_list / qualified_identifier) ;
update_columns_clause = (qualified_identifier / '(' WS? qualified_identifier_list WS? ')') WS? '=' WS? expression ;
update_columns_clause_list = update_columns_clause (WS? ',' WS? update_columns_clause)* ;
returning_clause = WS (kw_returning / kw_return) WS expression_list WS into_clause ;
insert_statement = kw_insert WS kw_into WS qualified_identifier WS? columns_list?
    (values_clause / select_statement) returning_clause? statement_terminator ;
update_statement = kw_update WS qualified_identifier WS (!kw_set identifier WS)? kw_set WS
    update_columns_clause_list (WS where_clause)? returning_clause? statement_terminator ;
delete_statement = kw_delete WS (kw_from WS)? qualified_identifier (WS !kw_where !kw_returning identifier)?
    (WS where_clause)? returning_clause? statement_terminator ;
merge_update_clause = kw_when WS kw_matched WS kw_then WS kw_update WS kw_set WS update_columns_clause_list
    (WS where_clause)? (WS kw_delete WS where_clause)? ;
merge_insert_clause = kw_when WS kw_not WS kw_matched WS kw_then WS kw_insert WS? columns_list?
    values_clause (WS? where_clause)? ;
merge_error_logging_clause = kw_log WS kw_errors (WS kw_into WS qualified_identifier)?
    (WS? '(' WS? expression WS? ')')? (WS? kw_reject WS kw_limit WS (kw_unlimited / integer_literal))? ;
merge_header = kw_merge WS kw_into WS qualified_identifier WS (!kw_using identifier WS)? kw_using WS
    (qualified_identifier / subquery) WS (!kw_on identifier WS)? kw_on WS? '(' WS? expression WS? ')' ;
merge_statement = merge_header (WS? merge_update_clause)? (WS? merge_insert_clause)?
    (WS? merge_error_logging_clause)? statement_terminator ;
standalone_select_statement = select_statement statement_terminator ;

# tables
references_clause = kw_references WS qualified_identifier (WS? '(' WS? identifier_list WS? ')')? (WS cascade_clause)? ;
cascade_clause = kw_on WS kw_delete WS (kw_cascade / kw_set WS kw_null) ;
column_constraint = (kw_constraint WS identifier WS)? (kw_not WS kw_null / kw_null / kw_primary WS kw_key
    / kw_unique / references_clause / kw_check WS? '(' WS? expression WS? ')') ;
column_clause = identifier WS data_type (WS kw_default WS expression)? (WS column_constraint)* ;
constraint_option = WS? kw_initially WS (kw_deferred / kw_immediate) / WS? kw_not WS kw_deferrable
    / WS? kw_deferrable / WS? kw_using WS kw_index (WS storage_clause)*
    / WS? (kw_enable / kw_disable) (WS (kw_validate / kw_novalidate))? ;
table_constraint = (kw_constraint WS identifier WS)? (kw_primary WS kw_key WS? columns_list
    / kw_unique WS? columns_list / kw_foreign WS kw_key WS? columns_list references_clause
    / kw_check WS? '(' WS? expression WS? ')') constraint_option* ;
column_clause_list = (table_constraint / column_clause) (WS? ',' WS? (table_constraint / column_clause))* ;
global_temp_clause = kw_on WS kw_commit WS (kw_delete / kw_preserve) WS kw_rows ;
storage_clause = kw_tablespace WS identifier / (kw_enable / kw_disable) WS kw_storage WS kw_in WS kw_row
    / kw_organization WS (kw_index / kw_heap) / (kw_pctfree / kw_pctused / kw_initrans) WS integer_literal
    / kw_compress / kw_nocompress / kw_logging / kw_nologging / kw_cache / kw_nocache ;
lob_clause = kw_lob WS? '(' WS? identifier_list WS? ')' WS kw_store WS kw_as (WS (kw_securefile / kw_basicfile))?
    (WS? '(' (WS? storage_clause)+ WS? ')')? ;
create_table_statement = kw_create WS (kw_global WS kw_temporary WS)? kw_table WS qualified_identifier
    (WS? '(' WS? column_clause_list WS? ')' (WS? (global_temp_clause / storage_clause / lob_clause))*
    / WS kw_as WS select_statement) statement_terminator ;

# constraints
constraint_common_clause = kw_alter WS kw_table WS qualified_identifier WS kw_add WS kw_constraint WS identifier WS ;
primary_key_constraint = constraint_common_clause kw_primary WS kw_key WS? columns_list constraint_option* statement_terminator ;
unique_constraint = constraint_common_clause kw_unique WS? columns_list constraint_option* statement_terminator ;
foreign_key_constraint = constraint_common_clause kw_foreign WS kw_key WS? columns_list kw_references WS
    qualified_identifier WS? columns_list? (WS? cascade_clause)? constraint_option* statement_terminator ;
check_constraint = constraint_common_clause kw_check WS? '(' WS? expression WS? ')' constraint_option* statement_terminator ;

# other objects
create_view_statement = create_or_replace ((kw_no WS)? kw_force WS)? kw_view WS ^ qualified_identifier
    (WS? '(' WS? identifier_list WS? ')')? WS kw_as WS select_statement
    (WS kw_with WS (kw_read WS kw_only / kw_check WS kw_option))? statement_terminator ;
index_column = expression (WS (kw_asc / kw_desc))? ;
index_columns = '(' WS? index_column (WS? ',' WS? index_column)* WS? ')' ;
index_option = storage_clause / kw_local / kw_reverse / kw_online / kw_compute WS kw_statistics / kw_parallel / kw_noparallel ;
create_index_statement = kw_create WS ((kw_unique / kw_bitmap) WS)? kw_index WS qualified_identifier WS kw_on WS
    qualified_identifier WS? index_columns (WS? index_option)* statement_terminator ;
sequence_option = (kw_start WS kw_with / kw_increment WS kw_by / kw_maxvalue / kw_minvalue / kw_cache) WS number_literal
    / kw_nomaxvalue / kw_nominvalue / kw_cycle / kw_nocycle / kw_nocache / kw_order / kw_noorder ;
create_sequence_statement = kw_create WS kw_sequence WS qualified_identifier (WS sequence_option)* statement_terminator ;
create_synonym_statement = create_or_replace (kw_public WS)? kw_synonym WS qualified_identifier WS kw_for WS
    qualified_identifier statement_terminator ;
create_role_statement = kw_create WS kw_role WS identifier (WS kw_not WS kw_identified
    / WS kw_identified WS (kw_by WS identifier / kw_externally / kw_globally))? statement_terminator ;
quota_clause = kw_quota WS (kw_unlimited / [0-9]+ [KkMmGg]?) WS kw_on WS identifier ;
user_option = kw_default WS kw_tablespace WS identifier / kw_temporary WS kw_tablespace WS identifier
    / quota_clause / kw_profile WS identifier / kw_account WS (kw_lock / kw_unlock) / kw_password WS kw_expire ;
create_user_statement = kw_create WS kw_user WS identifier WS kw_identified WS
    (kw_by WS (identifier / string_literal) / kw_externally / kw_globally) (WS user_option)* statement_terminator ;
context_option = kw_accessed WS kw_globally / kw_initialized WS (kw_externally / kw_globally) ;
create_context_statement = create_or_replace kw_context WS identifier WS kw_using WS qualified_identifier
    (WS context_option)? statement_terminator ;

# PL/SQL units
authid_clause = kw_authid WS (kw_current_user / kw_definer) ;
package_init_section = kw_begin WS plsql_statement_list WS exception_section? ;
create_package_body_statement = create_or_replace kw_package WS kw_body WS ^ qualified_identifier WS
    (kw_is / kw_as) WS declaration_list? WS? package_init_section? kw_end (WS identifier)? unit_terminator ;
create_package_statement = create_or_replace kw_package WS ^ qualified_identifier (WS authid_clause)? WS
    (kw_is / kw_as) WS declaration_list? WS? kw_end (WS identifier)? unit_terminator ;

method_spec = (((kw_not WS)? (kw_final / kw_instantiable / kw_overriding) WS)* ((kw_map / kw_order) WS)?
    (kw_member / kw_static / kw_constructor) WS (procedure_definition / function_definition)) ;
transparent type_element = method_spec / column_clause ;
type_element_list = type_element (WS? ',' WS? type_element)* ;
type_object = kw_object WS? '(' WS? type_element_list WS? ')' ;
type_list = collection_kind WS kw_of WS data_type (WS kw_not WS kw_null)? ;
type_under = kw_under WS data_type WS? '(' WS? type_element_list WS? ')' ;
type_modifier = (kw_not WS)? (kw_final / kw_instantiable) ;
create_type_statement = create_or_replace kw_type WS ^ qualified_identifier (WS kw_force)? (WS authid_clause)? WS
    ((kw_as / kw_is) WS (type_object / type_list) / type_under) (WS type_modifier)* unit_terminator ;
method_body = ((kw_map / kw_order) WS)? (kw_member / kw_static / kw_constructor) WS
    (procedure_declaration / function_declaration) WS? ';' ;
create_type_body_statement = create_or_replace kw_type WS kw_body WS ^ qualified_identifier WS (kw_is / kw_as) WS
    method_body (WS method_body)* WS kw_end unit_terminator ;

trigger_timing = kw_before / kw_after / kw_instead WS kw_of ;
triggering_op = kw_insert / kw_update (WS kw_of WS identifier_list)? / kw_delete ;
triggering_op_list = triggering_op (WS kw_or WS triggering_op)* ;
referencing_clause = kw_referencing (WS (kw_new / kw_old / kw_parent) WS (kw_as WS)? identifier)+ ;
trigger_when = kw_when WS? '(' WS? expression WS? ')' ;
create_trigger_statement = create_or_replace kw_trigger WS ^ qualified_identifier WS trigger_timing WS
    triggering_op_list WS kw_on WS qualified_identifier (WS referencing_clause)? (WS kw_for WS kw_each WS kw_row)?
    (WS (kw_enable / kw_disable))? (WS trigger_when)? WS (compound_statement / kw_call WS procedure_call) unit_terminator ;

create_procedure_statement = create_or_replace kw_procedure WS ^ qualified_identifier
    (WS? '(' WS? argument_list WS? ')')? (WS authid_clause)? procedure_body unit_terminator ;
create_function_statement = create_or_replace kw_function WS ^ qualified_identifier
    (WS? '(' WS? argument_list WS? ')')? WS return_clause (WS function_modifier)* (WS authid_clause)?
    procedure_body unit_terminator ;

anonymous_block = &(kw_declare / kw_begin) ^ compound_statement unit_terminator ;

transparent sql_statement = create_table_statement / create_view_statement / create_index_statement
    / create_sequence_statement / create_synonym_statement / create_role_statement
    / create_user_statement / create_context_statement / create_package_body_statement
    / create_package_statement / create_type_body_statement / create_type_statement
    / create_trigger_statement / create_procedure_statement / create_function_statement
    / create_other_statement / primary_key_constraint / unique_constraint / foreign_key_constraint
    / check_constraint / alter_statement / drop_statement / truncate_statement / rename_statement
    / insert_statement / update_statement / delete_statement / merge_statement
    / standalone_select_statement / grant_statement / revoke_statement / comment_statement
    / commit_statement / rollback_statement / connect_statement / anonymous_block ;

file = (separator sql_statement)* separator ;
"#;

//! Lexical scopes for free-identifier analysis.
//!
//! Scopes are a stack of identifier sets. A qualified name is local when any
//! of its prefixes (`A`, `A.B`, `A.B.C`) is declared in any scope on the
//! stack; anything else is collected as an external reference, keyed by its
//! full qualified form.

use std::collections::BTreeSet;

/// Names that are always in scope: built-in types, functions, and
/// pseudo-objects that never resolve to schema objects.
pub const SYSTEM_IDENTIFIERS: &[&str] = &[
    "ABS", "ADD_MONTHS", "ASCII", "AVG", "BFILE", "BINARY_DOUBLE", "BINARY_FLOAT", "BINARY_INTEGER",
    "BLOB", "BOOLEAN", "CAST", "CEIL", "CHAR", "CHR", "CLOB", "COALESCE", "COUNT", "CURRENT_DATE",
    "CURRENT_TIMESTAMP", "DATE", "DBMS_LOB", "DBMS_OUTPUT", "DBMS_SQL", "DECIMAL", "DECODE",
    "DENSE_RANK", "DOUBLE", "DUAL", "DUP_VAL_ON_INDEX", "EXCEPTION", "EXTRACT", "FALSE", "FLOAT",
    "FLOOR", "GREATEST", "INITCAP", "INSTR", "INTEGER", "INTERVAL", "INVALID_NUMBER", "LAST_DAY",
    "LEAST", "LENGTH", "LEVEL", "LISTAGG", "LONG", "LOWER", "LPAD", "LTRIM", "MAX", "MIN", "MOD",
    "MONTHS_BETWEEN", "NATURAL", "NCHAR", "NCLOB", "NEXT_DAY", "NO_DATA_FOUND", "NULL", "NULLIF",
    "NUMBER", "NUMTODSINTERVAL", "NVARCHAR2", "NVL", "NVL2", "OTHERS", "PLS_INTEGER", "POSITIVE",
    "RAISE_APPLICATION_ERROR", "RANK", "RAW", "REAL", "REGEXP_LIKE", "REGEXP_REPLACE",
    "REGEXP_SUBSTR", "REPLACE", "ROUND", "ROWID", "ROWNUM", "ROW_NUMBER", "RPAD", "RTRIM", "SELF",
    "SIGN", "SIMPLE_INTEGER", "SMALLINT", "SQL", "SQLCODE", "SQLERRM", "SQLPLUS", "SUBSTR", "SUM",
    "SYSDATE", "SYSTIMESTAMP", "SYS_CONTEXT", "SYS_GUID", "TABLE", "TIMESTAMP", "TOO_MANY_ROWS",
    "TO_CHAR", "TO_DATE", "TO_NUMBER", "TO_TIMESTAMP", "TRIM", "TRUE", "TRUNC", "UID", "UPPER",
    "USER", "UTL_RAW", "VALUE_ERROR", "VARCHAR", "VARCHAR2", "XMLTYPE", "ZERO_DIVIDE",
];

/// A stack of identifier scopes plus the external references collected so far.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScopeStack {
    scopes: Vec<BTreeSet<Vec<String>>>,
    references: BTreeSet<Vec<String>>,
}

impl Default for ScopeStack {
    fn default() -> Self {
        Self::new(SYSTEM_IDENTIFIERS.iter().copied())
    }
}

impl ScopeStack {
    /// Creates a stack whose outermost scope holds `builtins`.
    pub fn new<S: AsRef<str>>(builtins: impl IntoIterator<Item = S>) -> Self {
        let outer = builtins
            .into_iter()
            .map(|name| vec![name.as_ref().to_ascii_uppercase()])
            .collect();
        Self {
            scopes: vec![outer],
            references: BTreeSet::new(),
        }
    }

    /// Opens a nested scope.
    pub fn push(&mut self) {
        self.scopes.push(BTreeSet::new());
    }

    /// Closes the innermost scope. The outermost scope is never removed.
    pub fn pop(&mut self) {
        if self.scopes.len() > 1 {
            self.scopes.pop();
        }
    }

    /// Returns the number of open scopes, counting the outermost one.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.scopes.len()
    }

    /// Closes scopes until `depth` remain.
    pub fn truncate(&mut self, depth: usize) {
        self.scopes.truncate(depth.max(1));
    }

    /// Declares a simple name in the innermost scope.
    pub fn add_identifier(&mut self, name: &str) {
        self.add_qualified(vec![name.to_string()]);
    }

    /// Declares a qualified name in the innermost scope.
    ///
    /// A reference collected earlier under exactly this name is withdrawn,
    /// since it turned out to be a forward reference to a local.
    pub fn add_qualified(&mut self, parts: Vec<String>) {
        self.references.remove(&parts);
        if let Some(scope) = self.scopes.last_mut() {
            scope.insert(parts);
        }
    }

    /// Returns true if any prefix of `parts` is declared in any open scope.
    #[must_use]
    pub fn is_local(&self, parts: &[String]) -> bool {
        (1..=parts.len()).any(|n| {
            let prefix = &parts[..n];
            self.scopes
                .iter()
                .rev()
                .any(|scope| scope.contains(prefix))
        })
    }

    /// Records `parts` as an external reference unless it is local.
    ///
    /// With `ignore_unqualified`, single-part names are never recorded.
    pub fn add_reference(&mut self, parts: Vec<String>, ignore_unqualified: bool) {
        if parts.is_empty() || (ignore_unqualified && parts.len() == 1) {
            return;
        }
        if self.references.contains(&parts) || self.is_local(&parts) {
            return;
        }
        self.references.insert(parts);
    }

    /// Forgets every collected reference.
    pub fn clear_references(&mut self) {
        self.references.clear();
    }

    /// Returns the collected references in sorted order.
    #[must_use]
    pub fn references(&self) -> Vec<Vec<String>> {
        self.references.iter().cloned().collect()
    }

    /// Returns the names declared in the innermost scope in sorted order.
    #[must_use]
    pub fn local_identifiers(&self) -> Vec<Vec<String>> {
        self.scopes
            .last()
            .map(|scope| scope.iter().cloned().collect())
            .unwrap_or_default()
    }
}

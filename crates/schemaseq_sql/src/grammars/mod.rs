//! Grammar sources and the compiled-grammar cache.
//!
//! Each grammar is assembled from the shared lexical rules, the shared
//! statement rules, and its own rules. Every `kw_<word>` name used in that
//! text gets a generated rule matching `<word>` case-insensitively at a
//! word boundary.

mod common;
mod full;
mod structural;

use std::collections::BTreeSet;
use std::fmt::Write as _;
use std::sync::{Arc, OnceLock};

use schemaseq_foundation::Result;
use schemaseq_grammar::Grammar;
use tracing::debug;

use crate::config::GrammarKind;

const KEYWORD_PREFIX: &str = "kw_";

/// Returns the complete notation text of a grammar.
#[must_use]
pub fn source(kind: GrammarKind) -> String {
    let rules = match kind {
        GrammarKind::Structural => structural::RULES,
        GrammarKind::Full => full::RULES,
    };
    let mut text = String::with_capacity(
        common::LEXICAL.len() + common::SHARED_STATEMENTS.len() + rules.len() + 4096,
    );
    text.push_str(common::LEXICAL);
    text.push_str(common::SHARED_STATEMENTS);
    text.push_str(rules);

    let keywords = keywords(&text);
    text.push_str("\n# keywords\n");
    for word in &keywords {
        let _ = writeln!(text, "{KEYWORD_PREFIX}{word} = i'{word}' !ident_tail ;");
    }
    text
}

/// Returns the compiled grammar, compiling it on first use.
///
/// # Errors
///
/// Returns a grammar error if the notation does not compile.
pub fn grammar(kind: GrammarKind) -> Result<Arc<Grammar>> {
    static STRUCTURAL: OnceLock<Arc<Grammar>> = OnceLock::new();
    static FULL: OnceLock<Arc<Grammar>> = OnceLock::new();

    let cell = match kind {
        GrammarKind::Structural => &STRUCTURAL,
        GrammarKind::Full => &FULL,
    };
    if let Some(grammar) = cell.get() {
        return Ok(Arc::clone(grammar));
    }
    let compiled = Arc::new(Grammar::compile(&source(kind))?);
    debug!(grammar = %kind, rules = compiled.len(), "compiled SQL grammar");
    Ok(Arc::clone(cell.get_or_init(|| compiled)))
}

/// Collects the distinct words of every `kw_<word>` name in `text`.
fn keywords(text: &str) -> BTreeSet<String> {
    let mut words = BTreeSet::new();
    let mut rest = text;
    while let Some(found) = rest.find(KEYWORD_PREFIX) {
        let boundary = rest[..found]
            .chars()
            .next_back()
            .is_none_or(|c| !(c.is_ascii_alphanumeric() || c == '_'));
        let tail = &rest[found + KEYWORD_PREFIX.len()..];
        let len = tail
            .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
            .unwrap_or(tail.len());
        if boundary && len > 0 {
            words.insert(tail[..len].to_ascii_lowercase());
        }
        rest = &tail[len..];
    }
    words
}

//! Grammar composition
//!
//! Splices the template grammar into a host grammar at two nonterminals, the
//! host's expression and its statement, and checks that the result is still
//! parseable.
//!
//! ```text
//!   host rules        template rules
//!       │                   │
//!       └────────┬──────────┘
//!                ▼
//!     compose(host, conflicts, splice points, template)
//!                │
//!       ┌────────┼──────────────┬───────────────┐
//!       ▼        ▼              ▼               ▼
//!     Merge    Splice        Validate        Resolve
//!     rules    expression    references      FIRST-set
//!              + statement   + conflicts     overlaps
//!                │
//!                ▼
//!          ComposedGrammar
//! ```
//!
//! At the expression splice the host alternatives sit next to `{{ expr }}`;
//! at the statement splice every host alternative is raised above the
//! template statements. Any other host/template pair that can start with the
//! same token must differ in precedence or be named in a declared [Conflict],
//! otherwise composition fails with
//! [CompositionError::AmbiguousGrammarConflict].
//!
//! The parser does not read the composed rules. The combinators resolve the
//! same choices at run time (host first, then template), and composition is
//! the authoring-time check that this resolution is the intended one.

pub mod grammar;
pub mod template;

pub use grammar::{
    first_of_sequence, FirstSet, GrammarRules, Origin, Production, Rule, Symbol,
    TEMPLATE_PRECEDENCE,
};
pub use template::{template_conflicts, template_rules, EXPRESSION, STATEMENT};

use serde::Serialize;
use std::collections::BTreeSet;
use std::fmt;

// ============================================================================
// Conflicts and splice points
// ============================================================================

/// A declared ambiguity resolution: the two named productions (or
/// nonterminals) may match the same prefix and are resolved by ordered choice.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Conflict {
    pub left: String,
    pub right: String,
}

impl Conflict {
    pub fn new(left: impl Into<String>, right: impl Into<String>) -> Self {
        Self {
            left: left.into(),
            right: right.into(),
        }
    }

    fn covers(&self, a: &BTreeSet<&str>, b: &BTreeSet<&str>) -> bool {
        let (left, right) = (self.left.as_str(), self.right.as_str());
        (a.contains(left) && b.contains(right)) || (a.contains(right) && b.contains(left))
    }
}

impl fmt::Display for Conflict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.left, self.right)
    }
}

/// The host nonterminals the template grammar is spliced into
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SplicePoints {
    pub expression: String,
    pub statement: String,
}

impl SplicePoints {
    pub fn new(expression: impl Into<String>, statement: impl Into<String>) -> Self {
        Self {
            expression: expression.into(),
            statement: statement.into(),
        }
    }

    fn rename<'a>(&'a self, name: &'a str) -> &'a str {
        match name {
            EXPRESSION => self.expression.as_str(),
            STATEMENT => self.statement.as_str(),
            other => other,
        }
    }
}

impl Default for SplicePoints {
    fn default() -> Self {
        Self::new(EXPRESSION, STATEMENT)
    }
}

// ============================================================================
// CompositionError
// ============================================================================

/// Errors that can occur during grammar composition.
///
/// These are grammar-authoring errors: they say the host and template
/// grammars cannot be combined as declared, not that some input is malformed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompositionError {
    /// A host and a template alternative of a spliced nonterminal can start
    /// with the same token, with equal precedence and no declared conflict.
    AmbiguousGrammarConflict {
        nonterminal: String,
        host_production: String,
        template_production: String,
        shared: Vec<String>,
    },

    /// Both grammars define the same nonterminal.
    DuplicateNonterminal { nonterminal: String },

    /// A production refers to a nonterminal neither grammar defines.
    UndefinedNonterminal {
        production: String,
        nonterminal: String,
    },

    /// A splice point is not a host nonterminal.
    MissingSplicePoint { nonterminal: String },

    /// A declared conflict names something that is neither a production nor
    /// a nonterminal of the composed grammar.
    UnknownConflictSymbol { conflict: String, symbol: String },
}

impl fmt::Display for CompositionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CompositionError::AmbiguousGrammarConflict {
                nonterminal,
                host_production,
                template_production,
                shared,
            } => write!(
                f,
                "ambiguous alternatives of '{}': host production '{}' and template production '{}' can both start with {}",
                nonterminal,
                host_production,
                template_production,
                shared.join(", ")
            ),
            CompositionError::DuplicateNonterminal { nonterminal } => {
                write!(f, "nonterminal '{}' is defined by both grammars", nonterminal)
            }
            CompositionError::UndefinedNonterminal {
                production,
                nonterminal,
            } => write!(
                f,
                "production '{}' references undefined nonterminal '{}'",
                production, nonterminal
            ),
            CompositionError::MissingSplicePoint { nonterminal } => {
                write!(f, "splice point '{}' is not defined by the host grammar", nonterminal)
            }
            CompositionError::UnknownConflictSymbol { conflict, symbol } => write!(
                f,
                "conflict {} names unknown production or nonterminal '{}'",
                conflict, symbol
            ),
        }
    }
}

impl std::error::Error for CompositionError {}

// ============================================================================
// ComposedGrammar
// ============================================================================

/// A validated host + template grammar
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ComposedGrammar {
    rules: GrammarRules,
    conflicts: Vec<Conflict>,
    splice_points: SplicePoints,
}

impl ComposedGrammar {
    pub fn rules(&self) -> &GrammarRules {
        &self.rules
    }

    pub fn conflicts(&self) -> &[Conflict] {
        &self.conflicts
    }

    pub fn splice_points(&self) -> &SplicePoints {
        &self.splice_points
    }

    pub fn summary(&self) -> CompositionSummary {
        let count = |origin: Origin| {
            self.rules
                .productions()
                .filter(|(_, p)| p.origin == origin)
                .count()
        };

        CompositionSummary {
            nonterminals: self.rules.rules().len(),
            host_productions: count(Origin::Host),
            template_productions: count(Origin::Template),
            conflicts: self.conflicts.len(),
            splice_points: self.splice_points.clone(),
        }
    }
}

/// Counts describing a composition
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CompositionSummary {
    pub nonterminals: usize,
    pub host_productions: usize,
    pub template_productions: usize,
    pub conflicts: usize,
    pub splice_points: SplicePoints,
}

impl fmt::Display for CompositionSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} nonterminals, {} host + {} template productions, {} conflicts, spliced at '{}' and '{}'",
            self.nonterminals,
            self.host_productions,
            self.template_productions,
            self.conflicts,
            self.splice_points.expression,
            self.splice_points.statement
        )
    }
}

// ============================================================================
// compose
// ============================================================================

/// Splice `template` into `host`.
///
/// `template` refers to the splice points through the `expression` and
/// `statement` placeholders (see [template_rules] in [crate::templaty::lexer::LexMode::Code]).
///
/// # Errors
///
/// Every violated invariant is reported; the list is empty only on success.
pub fn compose(
    host: &GrammarRules,
    host_conflicts: &[Conflict],
    splice_points: &SplicePoints,
    template: &GrammarRules,
) -> Result<ComposedGrammar, Vec<CompositionError>> {
    let mut errors: Vec<CompositionError> = Vec::new();

    // Step 1: the splice points must be host nonterminals
    for nonterminal in [&splice_points.expression, &splice_points.statement] {
        if !host.contains(nonterminal) {
            errors.push(CompositionError::MissingSplicePoint {
                nonterminal: nonterminal.clone(),
            });
        }
    }
    if !errors.is_empty() {
        return Err(errors);
    }

    // Step 2: merge the rule sets
    let mut rules = GrammarRules::new();
    for rule in host.rules() {
        let productions = rule
            .productions
            .iter()
            .map(|p| p.clone().with_origin(Origin::Host))
            .collect();
        rules.add_productions(rule.name.clone(), productions);
    }
    for rule in template.rules() {
        let name = splice_points.rename(&rule.name);
        if rules.contains(name) {
            errors.push(CompositionError::DuplicateNonterminal {
                nonterminal: name.to_string(),
            });
            continue;
        }
        let productions = rule
            .productions
            .iter()
            .map(|p| rename_production(p, splice_points).with_origin(Origin::Template))
            .collect();
        rules.add_productions(name.to_string(), productions);
    }

    // Step 3: splice the expression nonterminal
    rules.add_productions(
        splice_points.expression.clone(),
        vec![Production::new(
            "template_expression",
            vec![Symbol::nonterminal("template_interpolation")],
        )
        .with_origin(Origin::Template)],
    );

    // Step 4: splice the statement nonterminal, host alternatives first
    if let Some(rule) = rules.get_mut(&splice_points.statement) {
        for production in &mut rule.productions {
            production.precedence = TEMPLATE_PRECEDENCE + 1;
        }
    }
    rules.add_productions(
        splice_points.statement.clone(),
        vec![Production::new(
            "template_statement",
            vec![Symbol::nonterminal("template_statement")],
        )
        .with_origin(Origin::Template)],
    );

    // Step 5: every referenced nonterminal exists
    for (_, production) in rules.productions() {
        for name in production.referenced_nonterminals() {
            if !rules.contains(name) {
                errors.push(CompositionError::UndefinedNonterminal {
                    production: production.label.clone(),
                    nonterminal: name.to_string(),
                });
            }
        }
    }

    // Step 6: declared conflicts name known symbols
    let mut conflicts: Vec<Conflict> = host_conflicts.to_vec();
    conflicts.extend(template_conflicts().into_iter().map(|c| {
        Conflict::new(
            splice_points.rename(&c.left),
            splice_points.rename(&c.right),
        )
    }));
    for conflict in &conflicts {
        for symbol in [&conflict.left, &conflict.right] {
            if !rules.contains(symbol) && !rules.has_production(symbol) {
                errors.push(CompositionError::UnknownConflictSymbol {
                    conflict: conflict.to_string(),
                    symbol: symbol.clone(),
                });
            }
        }
    }

    // Step 7: FIRST-set overlaps at the splice points
    if errors.is_empty() {
        check_ambiguities(&rules, &conflicts, splice_points, &mut errors);
    }

    if errors.is_empty() {
        tracing::debug!(
            nonterminals = rules.rules().len(),
            productions = rules.production_count(),
            conflicts = conflicts.len(),
            "composed grammar"
        );
        Ok(ComposedGrammar {
            rules,
            conflicts,
            splice_points: splice_points.clone(),
        })
    } else {
        tracing::debug!(errors = errors.len(), "grammar composition failed");
        Err(errors)
    }
}

fn rename_production(production: &Production, splice_points: &SplicePoints) -> Production {
    let symbols = production
        .symbols
        .iter()
        .map(|symbol| match symbol {
            Symbol::NonTerminal(name) => Symbol::nonterminal(splice_points.rename(name)),
            other => other.clone(),
        })
        .collect();
    Production {
        symbols,
        ..production.clone()
    }
}

/// Names a conflict declaration may use to refer to a production
fn conflict_names<'a>(nonterminal: &'a str, production: &'a Production) -> BTreeSet<&'a str> {
    let mut names = BTreeSet::from([production.label.as_str()]);
    if let Some(leading) = production.leading_nonterminal() {
        names.insert(leading);
    }
    if production.origin == Origin::Host {
        names.insert(nonterminal);
    }
    names
}

fn check_ambiguities(
    rules: &GrammarRules,
    conflicts: &[Conflict],
    splice_points: &SplicePoints,
    errors: &mut Vec<CompositionError>,
) {
    let sets = rules.first_sets();

    for nonterminal in [&splice_points.expression, &splice_points.statement] {
        let Some(rule) = rules.get(nonterminal) else {
            continue;
        };
        let (host, template): (Vec<&Production>, Vec<&Production>) = rule
            .productions
            .iter()
            .partition(|p| p.origin == Origin::Host);

        for h in &host {
            let host_first = first_of_sequence(&h.symbols, &sets);
            for t in &template {
                let template_first = first_of_sequence(&t.symbols, &sets);
                if !host_first.overlaps(&template_first) || h.precedence != t.precedence {
                    continue;
                }

                let host_names = conflict_names(nonterminal, h);
                let template_names = conflict_names(nonterminal, t);
                if conflicts
                    .iter()
                    .any(|c| c.covers(&host_names, &template_names))
                {
                    continue;
                }

                errors.push(CompositionError::AmbiguousGrammarConflict {
                    nonterminal: nonterminal.clone(),
                    host_production: h.label.clone(),
                    template_production: t.label.clone(),
                    shared: host_first
                        .symbols
                        .intersection(&template_first.symbols)
                        .map(|s| s.to_string())
                        .collect(),
                });
            }
        }
    }
}

//! Declarative grammar description
//!
//! A [GrammarRules] value is a plain data description of a context-free
//! grammar: nonterminals in declaration order, each with its alternative
//! productions. It is what grammar composition reasons about; the parsers
//! themselves are built from combinators and never read it.

use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// Precedence of every template production. Host statements are raised above it.
pub const TEMPLATE_PRECEDENCE: i32 = 0;

/// One grammar symbol
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Symbol {
    /// A literal token, such as `{%` or `endfor`
    Terminal(String),
    /// A token class, such as identifiers or raw text
    Class(String),
    NonTerminal(String),
}

impl Symbol {
    pub fn terminal(text: impl Into<String>) -> Self {
        Symbol::Terminal(text.into())
    }

    pub fn class(name: impl Into<String>) -> Self {
        Symbol::Class(name.into())
    }

    pub fn nonterminal(name: impl Into<String>) -> Self {
        Symbol::NonTerminal(name.into())
    }

    pub fn is_nonterminal(&self) -> bool {
        matches!(self, Symbol::NonTerminal(_))
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Symbol::Terminal(text) => write!(f, "'{}'", text),
            Symbol::Class(name) => write!(f, "{}", name.to_uppercase()),
            Symbol::NonTerminal(name) => write!(f, "{}", name),
        }
    }
}

/// Which grammar a production came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Origin {
    Host,
    Template,
}

/// One alternative of a nonterminal
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Production {
    pub label: String,
    pub symbols: Vec<Symbol>,
    pub precedence: i32,
    pub origin: Origin,
}

impl Production {
    pub fn new(label: impl Into<String>, symbols: Vec<Symbol>) -> Self {
        Self {
            label: label.into(),
            symbols,
            precedence: TEMPLATE_PRECEDENCE,
            origin: Origin::Host,
        }
    }

    pub fn with_precedence(mut self, precedence: i32) -> Self {
        self.precedence = precedence;
        self
    }

    pub(crate) fn with_origin(mut self, origin: Origin) -> Self {
        self.origin = origin;
        self
    }

    /// The nonterminal this production starts with, if any
    pub fn leading_nonterminal(&self) -> Option<&str> {
        match self.symbols.first() {
            Some(Symbol::NonTerminal(name)) => Some(name),
            _ => None,
        }
    }

    /// Nonterminals this production refers to, in order
    pub fn referenced_nonterminals(&self) -> impl Iterator<Item = &str> {
        self.symbols.iter().filter_map(|s| match s {
            Symbol::NonTerminal(name) => Some(name.as_str()),
            _ => None,
        })
    }
}

/// A nonterminal and its alternatives
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Rule {
    pub name: String,
    pub productions: Vec<Production>,
}

/// FIRST set of a nonterminal or symbol sequence
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FirstSet {
    pub symbols: BTreeSet<Symbol>,
    /// Can derive the empty string
    pub nullable: bool,
}

impl FirstSet {
    /// Check if two FIRST sets allow the same input prefix
    pub fn overlaps(&self, other: &FirstSet) -> bool {
        (self.nullable && other.nullable) || !self.symbols.is_disjoint(&other.symbols)
    }
}

/// An ordered set of grammar rules
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GrammarRules {
    rules: Vec<Rule>,
}

impl GrammarRules {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: add alternatives to a nonterminal, declaring it if needed
    pub fn rule(mut self, name: impl Into<String>, productions: Vec<Production>) -> Self {
        self.add_productions(name, productions);
        self
    }

    pub fn add_productions(&mut self, name: impl Into<String>, productions: Vec<Production>) {
        let name = name.into();
        match self.rules.iter_mut().find(|r| r.name == name) {
            Some(rule) => rule.productions.extend(productions),
            None => self.rules.push(Rule { name, productions }),
        }
    }

    pub fn get(&self, name: &str) -> Option<&Rule> {
        self.rules.iter().find(|r| r.name == name)
    }

    pub(crate) fn get_mut(&mut self, name: &str) -> Option<&mut Rule> {
        self.rules.iter_mut().find(|r| r.name == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn nonterminals(&self) -> impl Iterator<Item = &str> {
        self.rules.iter().map(|r| r.name.as_str())
    }

    /// Every production, with the nonterminal it belongs to
    pub fn productions(&self) -> impl Iterator<Item = (&str, &Production)> {
        self.rules
            .iter()
            .flat_map(|r| r.productions.iter().map(move |p| (r.name.as_str(), p)))
    }

    pub fn has_production(&self, label: &str) -> bool {
        self.productions().any(|(_, p)| p.label == label)
    }

    pub fn production_count(&self) -> usize {
        self.rules.iter().map(|r| r.productions.len()).sum()
    }

    /// FIRST sets of every nonterminal, computed to a fixpoint.
    ///
    /// Undefined nonterminals contribute nothing.
    pub fn first_sets(&self) -> BTreeMap<String, FirstSet> {
        let mut sets: BTreeMap<String, FirstSet> = self
            .rules
            .iter()
            .map(|r| (r.name.clone(), FirstSet::default()))
            .collect();

        let mut changed = true;
        while changed {
            changed = false;
            for rule in &self.rules {
                for production in &rule.productions {
                    let first = first_of_sequence(&production.symbols, &sets);
                    if let Some(entry) = sets.get_mut(&rule.name) {
                        let before = (entry.symbols.len(), entry.nullable);
                        entry.symbols.extend(first.symbols);
                        entry.nullable |= first.nullable;
                        if before != (entry.symbols.len(), entry.nullable) {
                            changed = true;
                        }
                    }
                }
            }
        }

        sets
    }
}

/// FIRST set of a symbol sequence, given the nonterminals' FIRST sets
pub fn first_of_sequence(symbols: &[Symbol], sets: &BTreeMap<String, FirstSet>) -> FirstSet {
    let mut first = FirstSet::default();
    for symbol in symbols {
        match symbol {
            Symbol::NonTerminal(name) => {
                let Some(set) = sets.get(name) else {
                    return first;
                };
                first.symbols.extend(set.symbols.iter().cloned());
                if !set.nullable {
                    return first;
                }
            }
            terminal => {
                first.symbols.insert(terminal.clone());
                return first;
            }
        }
    }
    first.nullable = true;
    first
}

impl fmt::Display for GrammarRules {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for rule in &self.rules {
            let indent = " ".repeat(rule.name.len());
            for (i, production) in rule.productions.iter().enumerate() {
                let lead = if i == 0 {
                    format!("{} ::=", rule.name)
                } else {
                    format!("{}   |", indent)
                };
                write!(f, "{}", lead)?;
                if production.symbols.is_empty() {
                    write!(f, " ε")?;
                }
                for symbol in &production.symbols {
                    write!(f, " {}", symbol)?;
                }
                write!(f, "  ; {}", production.label)?;
                if production.precedence != TEMPLATE_PRECEDENCE {
                    write!(f, " (prec {})", production.precedence)?;
                }
                writeln!(f)?;
            }
        }
        Ok(())
    }
}

//! Turtle reader and writer
//!
//! The writer is deterministic: prefixes first, then subjects in sorted order
//! with their predicates grouped by `;`. The reader accepts what the writer
//! emits plus the common hand-written forms (`PREFIX`, comments, object lists,
//! bare numbers and booleans, language tags). Blank nodes and collections are
//! rejected.

use std::collections::BTreeMap;
use std::fmt::Write as _;

use super::error::PersistenceError;
use super::store::Graph;
use super::term::{Datatype, Fact, Iri, Literal, Term};
use super::vocab::{is_valid_local_id, rdf_type, PREFIXES};

pub fn serialize(graph: &Graph) -> String {
    let mut out = String::new();
    for (prefix, ns) in PREFIXES {
        let _ = writeln!(out, "@prefix {prefix}: <{ns}> .");
    }

    let mut blocks: BTreeMap<&Iri, BTreeMap<&Iri, Vec<&Term>>> = BTreeMap::new();
    for (subject, predicate, object) in graph.iter() {
        blocks
            .entry(subject)
            .or_default()
            .entry(predicate)
            .or_default()
            .push(object);
    }

    let type_iri = rdf_type();
    for (subject, predicates) in blocks {
        write_block(&mut out, subject, predicates, &type_iri);
    }
    out
}

fn write_block(
    out: &mut String,
    subject: &Iri,
    predicates: BTreeMap<&Iri, Vec<&Term>>,
    type_iri: &Iri,
) {
    let _ = write!(out, "\n{}", write_iri(subject));

    // rdf:type leads so each block opens with `a Class`.
    let mut entries: Vec<(&Iri, Vec<&Term>)> = predicates.into_iter().collect();
    entries.sort_by_key(|(predicate, _)| *predicate != type_iri);

    let last = entries.len().saturating_sub(1);
    for (idx, (predicate, objects)) in entries.into_iter().enumerate() {
        let verb = if predicate == type_iri {
            "a".to_string()
        } else {
            write_iri(predicate)
        };
        let objects: Vec<String> = objects.into_iter().map(write_term).collect();
        let indent = if idx == 0 { " " } else { "    " };
        let end = if idx == last { " ." } else { " ;" };
        let _ = writeln!(out, "{indent}{verb} {}{end}", objects.join(", "));
    }
}

fn write_iri(iri: &Iri) -> String {
    for (prefix, ns) in PREFIXES {
        if let Some(local) = iri.as_str().strip_prefix(ns) {
            if is_valid_local_id(local) {
                return format!("{prefix}:{local}");
            }
        }
    }
    format!("<{}>", iri.as_str())
}

fn escape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            other => out.push(other),
        }
    }
    out
}

fn write_term(term: &Term) -> String {
    match term {
        Term::Iri(iri) => write_iri(iri),
        Term::Literal(lit) => {
            let body = format!("\"{}\"", escape(&lit.lexical));
            match (&lit.lang, &lit.datatype) {
                (Some(lang), _) => format!("{body}@{lang}"),
                (None, Datatype::String) => body,
                (None, datatype) => format!("{body}^^{}", write_iri(&datatype.iri())),
            }
        }
    }
}

/// Parses a Turtle document into facts.
pub fn parse(input: &str) -> Result<Vec<Fact>, PersistenceError> {
    Parser::new(input).document()
}

struct Parser {
    chars: Vec<char>,
    pos: usize,
    line: usize,
    prefixes: BTreeMap<String, String>,
}

impl Parser {
    fn new(input: &str) -> Self {
        Self {
            chars: input.chars().collect(),
            pos: 0,
            line: 1,
            prefixes: BTreeMap::new(),
        }
    }

    fn error<T>(&self, message: impl Into<String>) -> Result<T, PersistenceError> {
        Err(PersistenceError::Parse {
            line: self.line,
            message: message.into(),
        })
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<char> {
        self.chars.get(self.pos + offset).copied()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += 1;
        if c == '\n' {
            self.line += 1;
        }
        Some(c)
    }

    fn skip_ws(&mut self) {
        while let Some(c) = self.peek() {
            if c.is_whitespace() {
                self.bump();
            } else if c == '#' {
                while let Some(c) = self.peek() {
                    if c == '\n' {
                        break;
                    }
                    self.bump();
                }
            } else {
                break;
            }
        }
    }

    fn expect(&mut self, want: char) -> Result<(), PersistenceError> {
        self.skip_ws();
        match self.peek() {
            Some(c) if c == want => {
                self.bump();
                Ok(())
            }
            Some(c) => self.error(format!("expected '{want}', found '{c}'")),
            None => self.error(format!("expected '{want}', found end of input")),
        }
    }

    fn starts_with_keyword(&self, keyword: &str, case_insensitive: bool) -> bool {
        let len = keyword.chars().count();
        let candidate: String = self.chars.iter().skip(self.pos).take(len).collect();
        let matches = if case_insensitive {
            candidate.eq_ignore_ascii_case(keyword)
        } else {
            candidate == keyword
        };
        matches
            && self
                .peek_at(len)
                .map_or(true, |c| c.is_whitespace() || c == '<')
    }

    fn document(mut self) -> Result<Vec<Fact>, PersistenceError> {
        let mut facts = Vec::new();
        loop {
            self.skip_ws();
            let Some(c) = self.peek() else {
                break;
            };
            if c == '@' {
                if self.starts_with_keyword("@prefix", false) {
                    self.pos += "@prefix".len();
                    self.prefix_directive()?;
                    self.expect('.')?;
                } else {
                    return self.error("unsupported directive");
                }
            } else if self.starts_with_keyword("PREFIX", true) {
                self.pos += "PREFIX".len();
                self.prefix_directive()?;
            } else {
                self.triples(&mut facts)?;
                self.expect('.')?;
            }
        }
        Ok(facts)
    }

    fn prefix_directive(&mut self) -> Result<(), PersistenceError> {
        self.skip_ws();
        let mut name = String::new();
        while let Some(c) = self.peek() {
            if c == ':' {
                break;
            }
            if !(c.is_alphanumeric() || c == '_' || c == '-' || c == '.') {
                return self.error(format!("invalid prefix name character '{c}'"));
            }
            name.push(c);
            self.bump();
        }
        self.expect(':')?;
        self.skip_ws();
        let ns = self.iri_ref()?;
        self.prefixes.insert(name, ns);
        Ok(())
    }

    fn triples(&mut self, facts: &mut Vec<Fact>) -> Result<(), PersistenceError> {
        let subject = self.subject()?;
        loop {
            self.skip_ws();
            let predicate = self.verb()?;
            loop {
                self.skip_ws();
                let object = self.object()?;
                facts.push(Fact::new(subject.clone(), predicate.clone(), object));
                self.skip_ws();
                if self.peek() == Some(',') {
                    self.bump();
                } else {
                    break;
                }
            }
            self.skip_ws();
            if self.peek() != Some(';') {
                return Ok(());
            }
            while self.peek() == Some(';') {
                self.bump();
                self.skip_ws();
            }
            // trailing `;` before the terminating `.`
            if matches!(self.peek(), Some('.') | None) {
                return Ok(());
            }
        }
    }

    fn subject(&mut self) -> Result<Iri, PersistenceError> {
        self.skip_ws();
        match self.peek() {
            Some('[') => self.error("blank nodes are not supported"),
            Some('_') if self.peek_at(1) == Some(':') => {
                self.error("blank nodes are not supported")
            }
            Some('(') => self.error("collections are not supported"),
            _ => self.iri(),
        }
    }

    fn verb(&mut self) -> Result<Iri, PersistenceError> {
        if self.peek() == Some('a')
            && self
                .peek_at(1)
                .map_or(false, |c| c.is_whitespace() || c == '<' || c == '"')
        {
            self.bump();
            return Ok(rdf_type());
        }
        self.iri()
    }

    fn iri(&mut self) -> Result<Iri, PersistenceError> {
        match self.peek() {
            Some('<') => Ok(Iri::new(self.iri_ref()?)),
            Some(_) => self.prefixed_name(),
            None => self.error("expected IRI, found end of input"),
        }
    }

    fn iri_ref(&mut self) -> Result<String, PersistenceError> {
        if self.peek() != Some('<') {
            return self.error("expected '<'");
        }
        self.bump();
        let mut value = String::new();
        loop {
            match self.bump() {
                Some('>') => return Ok(value),
                Some(c) if c.is_whitespace() => return self.error("whitespace inside IRI"),
                Some(c) => value.push(c),
                None => return self.error("unterminated IRI"),
            }
        }
    }

    fn prefixed_name(&mut self) -> Result<Iri, PersistenceError> {
        let mut prefix = String::new();
        while let Some(c) = self.peek() {
            if c == ':' {
                break;
            }
            if !(c.is_alphanumeric() || c == '_' || c == '-') {
                return self.error(format!("unexpected character '{c}'"));
            }
            prefix.push(c);
            self.bump();
        }
        if self.bump() != Some(':') {
            return self.error(format!("expected prefixed name, found '{prefix}'"));
        }
        let mut local = String::new();
        while let Some(c) = self.peek() {
            if c.is_alphanumeric() || matches!(c, '_' | '-' | ':' | '%') {
                local.push(c);
                self.bump();
            } else if c == '.'
                && self
                    .peek_at(1)
                    .is_some_and(|n| n.is_alphanumeric() || matches!(n, '_' | '-' | ':'))
            {
                local.push(c);
                self.bump();
            } else {
                break;
            }
        }
        let Some(ns) = self.prefixes.get(&prefix) else {
            return self.error(format!("undeclared prefix '{prefix}:'"));
        };
        Ok(Iri::new(format!("{ns}{local}")))
    }

    fn object(&mut self) -> Result<Term, PersistenceError> {
        match self.peek() {
            Some('"') | Some('\'') => self.string_literal().map(Term::Literal),
            Some('[') => self.error("blank nodes are not supported"),
            Some('(') => self.error("collections are not supported"),
            Some('_') if self.peek_at(1) == Some(':') => {
                self.error("blank nodes are not supported")
            }
            Some(c) if c.is_ascii_digit() || c == '+' || c == '-' || c == '.' => {
                self.numeric_literal().map(Term::Literal)
            }
            Some(_) if self.starts_with_bare("true") => {
                self.pos += 4;
                Ok(Term::Literal(Literal::boolean(true)))
            }
            Some(_) if self.starts_with_bare("false") => {
                self.pos += 5;
                Ok(Term::Literal(Literal::boolean(false)))
            }
            Some(_) => self.iri().map(Term::Iri),
            None => self.error("expected object, found end of input"),
        }
    }

    fn starts_with_bare(&self, word: &str) -> bool {
        let len = word.len();
        let candidate: String = self.chars.iter().skip(self.pos).take(len).collect();
        candidate == word
            && self
                .peek_at(len)
                .map_or(true, |c| !(c.is_alphanumeric() || c == ':' || c == '_'))
    }

    fn numeric_literal(&mut self) -> Result<Literal, PersistenceError> {
        let mut text = String::new();
        if let Some(sign @ ('+' | '-')) = self.peek() {
            text.push(sign);
            self.bump();
        }
        let mut datatype = Datatype::Integer;
        while let Some(c) = self.peek() {
            if c.is_ascii_digit() {
                text.push(c);
                self.bump();
            } else if c == '.' && self.peek_at(1).is_some_and(|n| n.is_ascii_digit()) {
                datatype = Datatype::Decimal;
                text.push(c);
                self.bump();
            } else if matches!(c, 'e' | 'E') {
                datatype = Datatype::Double;
                text.push(c);
                self.bump();
                if let Some(sign @ ('+' | '-')) = self.peek() {
                    text.push(sign);
                    self.bump();
                }
            } else {
                break;
            }
        }
        if text.parse::<f64>().is_err() {
            return self.error(format!("invalid number '{text}'"));
        }
        Ok(Literal::typed(text, datatype))
    }

    fn string_literal(&mut self) -> Result<Literal, PersistenceError> {
        let Some(quote) = self.bump() else {
            return self.error("expected string");
        };
        let long = self.peek() == Some(quote) && self.peek_at(1) == Some(quote);
        if long {
            self.bump();
            self.bump();
        }

        let mut value = String::new();
        loop {
            let Some(c) = self.bump() else {
                return self.error("unterminated string literal");
            };
            if c == quote {
                if !long {
                    break;
                }
                if self.peek() == Some(quote) && self.peek_at(1) == Some(quote) {
                    self.bump();
                    self.bump();
                    break;
                }
                value.push(c);
            } else if c == '\\' {
                value.push(self.escape()?);
            } else if c == '\n' && !long {
                return self.error("newline in string literal");
            } else {
                value.push(c);
            }
        }

        match self.peek() {
            Some('@') => {
                self.bump();
                let mut lang = String::new();
                while let Some(c) = self.peek() {
                    if c.is_ascii_alphanumeric() || c == '-' {
                        lang.push(c);
                        self.bump();
                    } else {
                        break;
                    }
                }
                if lang.is_empty() {
                    return self.error("empty language tag");
                }
                Ok(Literal::lang_string(value, lang))
            }
            Some('^') if self.peek_at(1) == Some('^') => {
                self.bump();
                self.bump();
                let datatype = self.iri()?;
                Ok(Literal::typed(value, Datatype::from_iri(&datatype)))
            }
            _ => Ok(Literal::string(value)),
        }
    }

    fn escape(&mut self) -> Result<char, PersistenceError> {
        match self.bump() {
            Some('n') => Ok('\n'),
            Some('r') => Ok('\r'),
            Some('t') => Ok('\t'),
            Some('b') => Ok('\u{8}'),
            Some('f') => Ok('\u{c}'),
            Some(c @ ('"' | '\'' | '\\')) => Ok(c),
            Some('u') => self.unicode_escape(4),
            Some('U') => self.unicode_escape(8),
            Some(c) => self.error(format!("invalid escape '\\{c}'")),
            None => self.error("unterminated escape"),
        }
    }

    fn unicode_escape(&mut self, digits: usize) -> Result<char, PersistenceError> {
        let mut hex = String::new();
        for _ in 0..digits {
            match self.bump() {
                Some(c) if c.is_ascii_hexdigit() => hex.push(c),
                _ => return self.error("invalid unicode escape"),
            }
        }
        match u32::from_str_radix(&hex, 16).ok().and_then(char::from_u32) {
            Some(c) => Ok(c),
            None => self.error(format!("invalid code point U+{hex}")),
        }
    }
}

//! Graph terms: IRIs, typed literals and the facts built from them

use chrono::{DateTime, NaiveDateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::vocab::XSD_NS;

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Iri(String);

impl Iri {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Fragment after the last `#` or `/`, or the whole IRI when neither occurs.
    pub fn local_name(&self) -> &str {
        match self.0.rfind(['#', '/']) {
            Some(idx) => &self.0[idx + 1..],
            None => &self.0,
        }
    }
}

impl fmt::Display for Iri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Datatype {
    String,
    Integer,
    Decimal,
    Double,
    DateTime,
    Boolean,
    Other(Iri),
}

impl Datatype {
    pub fn iri(&self) -> Iri {
        match self {
            Datatype::String => Iri::new(format!("{XSD_NS}string")),
            Datatype::Integer => Iri::new(format!("{XSD_NS}integer")),
            Datatype::Decimal => Iri::new(format!("{XSD_NS}decimal")),
            Datatype::Double => Iri::new(format!("{XSD_NS}double")),
            Datatype::DateTime => Iri::new(format!("{XSD_NS}dateTime")),
            Datatype::Boolean => Iri::new(format!("{XSD_NS}boolean")),
            Datatype::Other(iri) => iri.clone(),
        }
    }

    pub fn from_iri(iri: &Iri) -> Self {
        let Some(local) = iri.as_str().strip_prefix(XSD_NS) else {
            return Datatype::Other(iri.clone());
        };
        match local {
            "string" => Datatype::String,
            "integer" => Datatype::Integer,
            "decimal" => Datatype::Decimal,
            "double" => Datatype::Double,
            "dateTime" => Datatype::DateTime,
            "boolean" => Datatype::Boolean,
            _ => Datatype::Other(iri.clone()),
        }
    }

    pub fn is_numeric(&self) -> bool {
        match self {
            Datatype::Integer | Datatype::Decimal | Datatype::Double => true,
            Datatype::Other(iri) => iri
                .as_str()
                .strip_prefix(XSD_NS)
                .map(|local| {
                    matches!(
                        local,
                        "float"
                            | "int"
                            | "long"
                            | "short"
                            | "nonNegativeInteger"
                            | "positiveInteger"
                    )
                })
                .unwrap_or(false),
            _ => false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Literal {
    pub lexical: String,
    pub datatype: Datatype,
    pub lang: Option<String>,
}

impl Literal {
    pub fn typed(lexical: impl Into<String>, datatype: Datatype) -> Self {
        Self {
            lexical: lexical.into(),
            datatype,
            lang: None,
        }
    }

    pub fn string(value: impl Into<String>) -> Self {
        Self::typed(value, Datatype::String)
    }

    pub fn lang_string(value: impl Into<String>, lang: impl Into<String>) -> Self {
        Self {
            lexical: value.into(),
            datatype: Datatype::String,
            lang: Some(lang.into().to_ascii_lowercase()),
        }
    }

    pub fn integer(value: i64) -> Self {
        Self::typed(value.to_string(), Datatype::Integer)
    }

    pub fn decimal(value: f64) -> Self {
        Self::typed(format_decimal(value), Datatype::Decimal)
    }

    pub fn double(value: f64) -> Self {
        Self::typed(value.to_string(), Datatype::Double)
    }

    pub fn boolean(value: bool) -> Self {
        Self::typed(value.to_string(), Datatype::Boolean)
    }

    pub fn date_time(value: DateTime<Utc>) -> Self {
        Self::typed(
            value.to_rfc3339_opts(SecondsFormat::Micros, true),
            Datatype::DateTime,
        )
    }

    pub fn as_f64(&self) -> Option<f64> {
        if !self.datatype.is_numeric() {
            return None;
        }
        self.lexical.trim().parse().ok()
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self.datatype {
            Datatype::Integer => self.lexical.trim().parse().ok(),
            _ => self
                .as_f64()
                .filter(|v| v.fract() == 0.0 && v.is_finite())
                .map(|v| v as i64),
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match (&self.datatype, self.lexical.trim()) {
            (Datatype::Boolean, "true" | "1") => Some(true),
            (Datatype::Boolean, "false" | "0") => Some(false),
            _ => None,
        }
    }

    /// Parses `xsd:dateTime` lexical forms. Values without an offset are read as UTC.
    pub fn as_date_time(&self) -> Option<DateTime<Utc>> {
        if self.datatype != Datatype::DateTime {
            return None;
        }
        parse_date_time(&self.lexical)
    }
}

pub fn parse_date_time(lexical: &str) -> Option<DateTime<Utc>> {
    let trimmed = lexical.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|naive| naive.and_utc())
}

/// Plain decimal notation; integral values keep one fractional digit.
fn format_decimal(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{value:.1}")
    } else {
        value.to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Term {
    Iri(Iri),
    Literal(Literal),
}

impl Term {
    pub fn as_iri(&self) -> Option<&Iri> {
        match self {
            Term::Iri(iri) => Some(iri),
            Term::Literal(_) => None,
        }
    }

    pub fn as_literal(&self) -> Option<&Literal> {
        match self {
            Term::Literal(lit) => Some(lit),
            Term::Iri(_) => None,
        }
    }

    /// IRI text or literal lexical form.
    pub fn lexical(&self) -> &str {
        match self {
            Term::Iri(iri) => iri.as_str(),
            Term::Literal(lit) => &lit.lexical,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        self.as_literal().and_then(Literal::as_f64)
    }

    pub fn as_date_time(&self) -> Option<DateTime<Utc>> {
        self.as_literal().and_then(Literal::as_date_time)
    }
}

impl From<Iri> for Term {
    fn from(iri: Iri) -> Self {
        Term::Iri(iri)
    }
}

impl From<Literal> for Term {
    fn from(lit: Literal) -> Self {
        Term::Literal(lit)
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Term::Iri(iri) => write!(f, "<{iri}>"),
            Term::Literal(lit) => match &lit.lang {
                Some(lang) => write!(f, "{:?}@{}", lit.lexical, lang),
                None if lit.datatype == Datatype::String => write!(f, "{:?}", lit.lexical),
                None => write!(f, "{:?}^^<{}>", lit.lexical, lit.datatype.iri()),
            },
        }
    }
}

/// One subject-predicate-object statement.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Fact {
    pub subject: Iri,
    pub predicate: Iri,
    pub object: Term,
}

impl Fact {
    pub fn new(subject: Iri, predicate: Iri, object: impl Into<Term>) -> Self {
        Self {
            subject,
            predicate,
            object: object.into(),
        }
    }
}

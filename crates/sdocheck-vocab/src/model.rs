//! Vocabulary term model

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Kind of a vocabulary term
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TermKind {
    Class,
    Enumeration,
    DataType,
    Property,
    EnumerationMember,
}

/// A class, enumeration or data type
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassTerm {
    pub id: String,
    pub kind: TermKind,
    /// Declared `rdfs:subClassOf` targets
    pub super_classes: BTreeSet<String>,
    /// Classes declaring this one as their superclass
    pub sub_classes: BTreeSet<String>,
    /// Properties whose domain includes this class
    pub properties: BTreeSet<String>,
    /// Enumeration members typed with this term
    pub members: BTreeSet<String>,
}

impl ClassTerm {
    pub fn new(id: impl Into<String>, kind: TermKind) -> Self {
        Self {
            id: id.into(),
            kind,
            super_classes: BTreeSet::new(),
            sub_classes: BTreeSet::new(),
            properties: BTreeSet::new(),
            members: BTreeSet::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertyTerm {
    pub id: String,
    /// Declared `schema:domainIncludes`
    pub domains: BTreeSet<String>,
    /// Declared `schema:rangeIncludes`
    pub ranges: BTreeSet<String>,
}

impl PropertyTerm {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            domains: BTreeSet::new(),
            ranges: BTreeSet::new(),
        }
    }
}

/// A named individual of an enumeration (`schema:Monday`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnumerationMember {
    pub id: String,
    pub types: BTreeSet<String>,
}

/// Result of a generic term lookup
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Term<'a> {
    Class(&'a ClassTerm),
    Property(&'a PropertyTerm),
    Member(&'a EnumerationMember),
}

impl Term<'_> {
    pub fn id(&self) -> &str {
        match self {
            Term::Class(c) => &c.id,
            Term::Property(p) => &p.id,
            Term::Member(m) => &m.id,
        }
    }

    pub fn kind(&self) -> TermKind {
        match self {
            Term::Class(c) => c.kind,
            Term::Property(_) => TermKind::Property,
            Term::Member(_) => TermKind::EnumerationMember,
        }
    }
}

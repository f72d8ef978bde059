use std::fmt::{self, Display};

use regex::Regex;

use crate::types::*;

lazy_static! {
    static ref PREFIX_RE: Regex = Regex::new(r"^[A-Za-z][A-Za-z0-9_.\-]*$").unwrap();
}

// A concept in an external ontology, eg. HP:0001558 "Decreased fetal movement".
// This is a plain value: the id/label pair isn't checked against any ontology.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Hash)]
pub struct OntologyClass {
    id: Curie,
    label: Label,
}

pub fn ontology_class(id: &str, label: &str) -> OntologyClass {
    OntologyClass::new(id, label)
}

impl OntologyClass {
    pub fn new(id: impl Into<Curie>, label: impl Into<Label>) -> OntologyClass {
        OntologyClass {
            id: id.into(),
            label: label.into(),
        }
    }

    pub fn id(&self) -> &str {
        self.id.as_ref()
    }

    pub fn label(&self) -> &str {
        self.label.as_ref()
    }

    pub fn curie(&self) -> &Curie {
        &self.id
    }

    // The namespace prefix of the id, or None if the id isn't a CURIE.
    // OBO style ids like "UBERON_0001256" are accepted.
    pub fn namespace_prefix(&self) -> Option<&str> {
        namespace_prefix(self.id(), true)
    }
}

impl Display for OntologyClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.label, self.id)
    }
}

fn checked_prefix<'a>(prefix: &'a str, local: &str) -> Option<&'a str> {
    if !local.is_empty() && PREFIX_RE.is_match(prefix) {
        Some(prefix)
    } else {
        None
    }
}

// Split a CURIE like "NCIT:C39853" and return "NCIT".  If allow_obo_style
// is true "PREFIX_LOCAL" ids are split at the first underscore when there is
// no colon.
pub fn namespace_prefix(curie: &str, allow_obo_style: bool) -> Option<&str> {
    if let Some((prefix, local)) = curie.split_once(':') {
        return checked_prefix(prefix, local);
    }

    if allow_obo_style {
        if let Some((prefix, local)) = curie.split_once('_') {
            return checked_prefix(prefix, local);
        }
    }

    None
}

// Something that holds ontology terms.  Used by the validator to find
// every OntologyClass in a container.
pub trait OntologyTerms {
    fn collect_terms<'a>(&'a self, terms: &mut Vec<&'a OntologyClass>);

    fn ontology_terms(&self) -> Vec<&OntologyClass> {
        let mut terms = vec![];
        self.collect_terms(&mut terms);
        terms
    }
}

impl OntologyTerms for OntologyClass {
    fn collect_terms<'a>(&'a self, terms: &mut Vec<&'a OntologyClass>) {
        terms.push(self);
    }
}

impl<T: OntologyTerms> OntologyTerms for Option<T> {
    fn collect_terms<'a>(&'a self, terms: &mut Vec<&'a OntologyClass>) {
        if let Some(ref value) = *self {
            value.collect_terms(terms);
        }
    }
}

impl<T: OntologyTerms> OntologyTerms for Vec<T> {
    fn collect_terms<'a>(&'a self, terms: &mut Vec<&'a OntologyClass>) {
        for value in self {
            value.collect_terms(terms);
        }
    }
}

#[test]
fn test_namespace_prefix() {
    assert_eq!(namespace_prefix("NCIT:C39853", true), Some("NCIT"));
    assert_eq!(namespace_prefix("HP:0001558", false), Some("HP"));
    assert_eq!(namespace_prefix("UBERON_0001256", true), Some("UBERON"));
    assert_eq!(namespace_prefix("UBERON_0001256", false), None);
    assert_eq!(namespace_prefix("obo:HP_0001558", true), Some("obo"));
    assert_eq!(namespace_prefix("HP:", true), None);
    assert_eq!(namespace_prefix(":0001558", true), None);
    assert_eq!(namespace_prefix("0HP:0001558", true), None);
    assert_eq!(namespace_prefix("Mild", true), None);
}

#[test]
fn test_ontology_class() {
    let mild = ontology_class("HP:0012825", "Mild");
    assert_eq!(mild.id(), "HP:0012825");
    assert_eq!(mild.label(), "Mild");
    assert_eq!(mild.namespace_prefix(), Some("HP"));
    assert_eq!(mild.to_string(), "Mild (HP:0012825)");
    assert_eq!(mild.ontology_terms(), vec![&mild]);
}

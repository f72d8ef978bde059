use serde_with::skip_serializing_none;

use flexstr::SharedStr as FlexStr;

use crate::error::BuildError;
use crate::evidence::Evidence;
use crate::ontology::{OntologyClass, OntologyTerms};
use crate::time::TimeElement;
use crate::utils::{push_unique, required};

// An observed (or, if negated, explicitly excluded) clinical feature
#[skip_serializing_none]
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PhenotypicFeature {
    description: Option<FlexStr>,
    #[serde(rename = "type")]
    feature_type: OntologyClass,
    // None and Some(false) are kept distinct so that encoding round trips
    negated: Option<bool>,
    severity: Option<OntologyClass>,
    #[serde(skip_serializing_if="Vec::is_empty", default,
            deserialize_with="crate::utils::deserialize_unique")]
    modifiers: Vec<OntologyClass>,
    onset: Option<TimeElement>,
    resolution: Option<TimeElement>,
    #[serde(skip_serializing_if="Vec::is_empty", default)]
    evidence: Vec<Evidence>,
}

impl PhenotypicFeature {
    pub fn builder() -> PhenotypicFeatureBuilder {
        PhenotypicFeatureBuilder::default()
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_ref().map(|description| description.as_ref())
    }

    pub fn feature_type(&self) -> &OntologyClass {
        &self.feature_type
    }

    pub fn is_negated(&self) -> bool {
        self.negated.unwrap_or(false)
    }

    // the negated flag exactly as it was set
    pub fn negated(&self) -> Option<bool> {
        self.negated
    }

    pub fn severity(&self) -> Option<&OntologyClass> {
        self.severity.as_ref()
    }

    pub fn modifiers(&self) -> &[OntologyClass] {
        &self.modifiers
    }

    pub fn onset(&self) -> Option<&TimeElement> {
        self.onset.as_ref()
    }

    pub fn resolution(&self) -> Option<&TimeElement> {
        self.resolution.as_ref()
    }

    pub fn evidence(&self) -> &[Evidence] {
        &self.evidence
    }
}

impl OntologyTerms for PhenotypicFeature {
    fn collect_terms<'a>(&'a self, terms: &mut Vec<&'a OntologyClass>) {
        terms.push(&self.feature_type);
        self.severity.collect_terms(terms);
        self.modifiers.collect_terms(terms);
        self.onset.collect_terms(terms);
        self.resolution.collect_terms(terms);
        self.evidence.collect_terms(terms);
    }
}

#[derive(Default, Clone, Debug)]
pub struct PhenotypicFeatureBuilder {
    description: Option<FlexStr>,
    feature_type: Option<OntologyClass>,
    negated: Option<bool>,
    severity: Option<OntologyClass>,
    modifiers: Vec<OntologyClass>,
    onset: Option<TimeElement>,
    resolution: Option<TimeElement>,
    evidence: Vec<Evidence>,
}

impl PhenotypicFeatureBuilder {
    pub fn description(mut self, description: impl Into<FlexStr>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn feature_type(mut self, feature_type: OntologyClass) -> Self {
        self.feature_type = Some(feature_type);
        self
    }

    pub fn negated(mut self, negated: bool) -> Self {
        self.negated = Some(negated);
        self
    }

    pub fn severity(mut self, severity: OntologyClass) -> Self {
        self.severity = Some(severity);
        self
    }

    // modifiers are a set: adding one that is already present does nothing
    pub fn add_modifier(mut self, modifier: OntologyClass) -> Self {
        push_unique(&mut self.modifiers, modifier);
        self
    }

    pub fn add_all_modifiers(mut self, modifiers: impl IntoIterator<Item = OntologyClass>) -> Self {
        for modifier in modifiers {
            push_unique(&mut self.modifiers, modifier);
        }
        self
    }

    pub fn onset(mut self, onset: impl Into<TimeElement>) -> Self {
        self.onset = Some(onset.into());
        self
    }

    pub fn resolution(mut self, resolution: impl Into<TimeElement>) -> Self {
        self.resolution = Some(resolution.into());
        self
    }

    pub fn add_evidence(mut self, evidence: Evidence) -> Self {
        self.evidence.push(evidence);
        self
    }

    pub fn add_all_evidence(mut self, evidence: impl IntoIterator<Item = Evidence>) -> Self {
        self.evidence.extend(evidence);
        self
    }

    pub fn build(self) -> Result<PhenotypicFeature, BuildError> {
        Ok(PhenotypicFeature {
            description: self.description,
            feature_type: required(self.feature_type, "PhenotypicFeature", "type")?,
            negated: self.negated,
            severity: self.severity,
            modifiers: self.modifiers,
            onset: self.onset,
            resolution: self.resolution,
            evidence: self.evidence,
        })
    }
}

// Shorthand for a feature that only has a type
pub fn from_finding(id: &str, label: &str) -> PhenotypicFeature {
    PhenotypicFeature {
        description: None,
        feature_type: OntologyClass::new(id, label),
        negated: None,
        severity: None,
        modifiers: vec![],
        onset: None,
        resolution: None,
        evidence: vec![],
    }
}

#[cfg(test)]
use crate::ontology::ontology_class;

#[test]
fn test_build_feature() {
    use crate::time::Age;

    let hematuria = PhenotypicFeature::builder()
        .feature_type(ontology_class("HP:0011463", "Macroscopic hematuria"))
        .onset(Age::iso8601("P14Y").unwrap())
        .add_modifier(ontology_class("HP:0031796", "Recurrent"))
        .add_modifier(ontology_class("HP:0031796", "Recurrent"))
        .add_modifier(ontology_class("HP:0012825", "Mild"))
        .build()
        .unwrap();

    assert_eq!(hematuria.feature_type().id(), "HP:0011463");
    assert!(!hematuria.is_negated());
    assert_eq!(hematuria.negated(), None);
    assert_eq!(hematuria.modifiers().len(), 2);
    assert_eq!(hematuria.modifiers()[1].id(), "HP:0012825");
    assert_eq!(hematuria.onset().and_then(TimeElement::age).map(|age| age.to_string()),
               Some("P14Y".to_owned()));

    let terms: Vec<&str> = hematuria.ontology_terms().iter().map(|term| term.id()).collect();
    assert_eq!(terms, vec!["HP:0011463", "HP:0031796", "HP:0012825"]);
}

#[test]
fn test_missing_type() {
    let result = PhenotypicFeature::builder().negated(true).build();
    assert_eq!(result, Err(BuildError::MissingRequiredField {
        entity: "PhenotypicFeature",
        field: "type",
    }));
}

#[test]
fn test_evidence_order() {
    use crate::evidence::ExternalReference;

    let eco = ontology_class("ECO:0000033", "author statement supported by traceable reference");
    let citation = |pmid: &str| Evidence::new(eco.clone(), ExternalReference::new(pmid, ""));

    let feature = PhenotypicFeature::builder()
        .feature_type(ontology_class("HP:0031910", "Abnormal cranial nerve physiology"))
        .negated(true)
        .add_evidence(citation("PMID:3"))
        .add_all_evidence(vec![citation("PMID:1"), citation("PMID:2")])
        .build()
        .unwrap();

    assert!(feature.is_negated());
    let pmids: Vec<_> = feature.evidence().iter()
        .filter_map(|evidence| evidence.reference().and_then(ExternalReference::id))
        .collect();
    assert_eq!(pmids, vec!["PMID:3", "PMID:1", "PMID:2"]);
}

#[test]
fn test_decode_repeated_modifiers() {
    let json = r#"{"type": {"id": "HP:0011463", "label": "Macroscopic hematuria"},
                   "modifiers": [{"id": "HP:0031796", "label": "Recurrent"},
                                 {"id": "HP:0012825", "label": "Mild"},
                                 {"id": "HP:0031796", "label": "Recurrent"}]}"#;
    let feature: PhenotypicFeature = serde_json::from_str(json).unwrap();

    let modifier_ids: Vec<&str> = feature.modifiers().iter().map(|term| term.id()).collect();
    assert_eq!(modifier_ids, vec!["HP:0031796", "HP:0012825"]);
}

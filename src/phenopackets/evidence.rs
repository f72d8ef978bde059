use serde_with::skip_serializing_none;

use flexstr::SharedStr as FlexStr;

use crate::error::BuildError;
use crate::ontology::{OntologyClass, OntologyTerms};
use crate::utils::required;

// A citation, eg. PMID:30808312
#[skip_serializing_none]
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Hash)]
pub struct ExternalReference {
    id: Option<FlexStr>,
    reference: Option<FlexStr>,
    description: Option<FlexStr>,
}

impl ExternalReference {
    pub fn new(id: impl Into<FlexStr>, description: impl Into<FlexStr>) -> ExternalReference {
        ExternalReference {
            id: Some(id.into()),
            reference: None,
            description: Some(description.into()),
        }
    }

    pub fn builder() -> ExternalReferenceBuilder {
        ExternalReferenceBuilder::default()
    }

    pub fn id(&self) -> Option<&str> {
        self.id.as_ref().map(|id| id.as_ref())
    }

    // usually a URL for the reference
    pub fn reference(&self) -> Option<&str> {
        self.reference.as_ref().map(|reference| reference.as_ref())
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_ref().map(|description| description.as_ref())
    }
}

#[derive(Default, Clone, Debug)]
pub struct ExternalReferenceBuilder {
    id: Option<FlexStr>,
    reference: Option<FlexStr>,
    description: Option<FlexStr>,
}

impl ExternalReferenceBuilder {
    pub fn id(mut self, id: impl Into<FlexStr>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn reference(mut self, reference: impl Into<FlexStr>) -> Self {
        self.reference = Some(reference.into());
        self
    }

    pub fn description(mut self, description: impl Into<FlexStr>) -> Self {
        self.description = Some(description.into());
        self
    }

    // all fields are optional
    pub fn build(self) -> ExternalReference {
        ExternalReference {
            id: self.id,
            reference: self.reference,
            description: self.description,
        }
    }
}

// Provenance for an assertion: an evidence code from ECO plus the source
#[skip_serializing_none]
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub struct Evidence {
    evidence_code: OntologyClass,
    reference: Option<ExternalReference>,
}

impl Evidence {
    pub fn new(evidence_code: OntologyClass, reference: ExternalReference) -> Evidence {
        Evidence {
            evidence_code,
            reference: Some(reference),
        }
    }

    pub fn builder() -> EvidenceBuilder {
        EvidenceBuilder::default()
    }

    pub fn evidence_code(&self) -> &OntologyClass {
        &self.evidence_code
    }

    pub fn reference(&self) -> Option<&ExternalReference> {
        self.reference.as_ref()
    }
}

impl OntologyTerms for Evidence {
    fn collect_terms<'a>(&'a self, terms: &mut Vec<&'a OntologyClass>) {
        terms.push(&self.evidence_code);
    }
}

#[derive(Default, Clone, Debug)]
pub struct EvidenceBuilder {
    evidence_code: Option<OntologyClass>,
    reference: Option<ExternalReference>,
}

impl EvidenceBuilder {
    pub fn evidence_code(mut self, evidence_code: OntologyClass) -> Self {
        self.evidence_code = Some(evidence_code);
        self
    }

    pub fn reference(mut self, reference: ExternalReference) -> Self {
        self.reference = Some(reference);
        self
    }

    pub fn build(self) -> Result<Evidence, BuildError> {
        Ok(Evidence {
            evidence_code: required(self.evidence_code, "Evidence", "evidence_code")?,
            reference: self.reference,
        })
    }
}

#[test]
fn test_build_evidence() {
    use crate::ontology::ontology_class;

    let reference = ExternalReference::builder()
        .id("PMID:30808312")
        .description("COL6A1 mutation leading to Bethlem myopathy with recurrent hematuria: a case report.")
        .build();
    assert_eq!(reference.id(), Some("PMID:30808312"));
    assert_eq!(reference.reference(), None);

    let evidence = Evidence::builder()
        .evidence_code(ontology_class("ECO:0000033", "author statement supported by traceable reference"))
        .reference(reference.clone())
        .build()
        .unwrap();
    assert_eq!(evidence.evidence_code().id(), "ECO:0000033");
    assert_eq!(evidence.reference(), Some(&reference));

    assert_eq!(Evidence::builder().reference(reference).build(),
               Err(BuildError::MissingRequiredField { entity: "Evidence", field: "evidence_code" }));
}

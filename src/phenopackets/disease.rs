use serde_with::skip_serializing_none;

use crate::error::BuildError;
use crate::ontology::{OntologyClass, OntologyTerms};
use crate::time::TimeElement;
use crate::utils::required;

// A diagnosis, eg. NCIT:C39853 "Infiltrating Urothelial Carcinoma"
#[skip_serializing_none]
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Disease {
    term: OntologyClass,
    excluded: Option<bool>,
    onset: Option<TimeElement>,
    resolution: Option<TimeElement>,
    #[serde(skip_serializing_if="Vec::is_empty", default)]
    disease_stage: Vec<OntologyClass>,
    #[serde(skip_serializing_if="Vec::is_empty", default)]
    clinical_tnm_finding: Vec<OntologyClass>,
    primary_site: Option<OntologyClass>,
}

impl Disease {
    pub fn builder() -> DiseaseBuilder {
        DiseaseBuilder::default()
    }

    pub fn term(&self) -> &OntologyClass {
        &self.term
    }

    pub fn is_excluded(&self) -> bool {
        self.excluded.unwrap_or(false)
    }

    pub fn excluded(&self) -> Option<bool> {
        self.excluded
    }

    pub fn onset(&self) -> Option<&TimeElement> {
        self.onset.as_ref()
    }

    pub fn resolution(&self) -> Option<&TimeElement> {
        self.resolution.as_ref()
    }

    pub fn disease_stage(&self) -> &[OntologyClass] {
        &self.disease_stage
    }

    pub fn clinical_tnm_finding(&self) -> &[OntologyClass] {
        &self.clinical_tnm_finding
    }

    pub fn primary_site(&self) -> Option<&OntologyClass> {
        self.primary_site.as_ref()
    }
}

impl OntologyTerms for Disease {
    fn collect_terms<'a>(&'a self, terms: &mut Vec<&'a OntologyClass>) {
        terms.push(&self.term);
        self.onset.collect_terms(terms);
        self.resolution.collect_terms(terms);
        self.disease_stage.collect_terms(terms);
        self.clinical_tnm_finding.collect_terms(terms);
        self.primary_site.collect_terms(terms);
    }
}

#[derive(Default, Clone, Debug)]
pub struct DiseaseBuilder {
    term: Option<OntologyClass>,
    excluded: Option<bool>,
    onset: Option<TimeElement>,
    resolution: Option<TimeElement>,
    disease_stage: Vec<OntologyClass>,
    clinical_tnm_finding: Vec<OntologyClass>,
    primary_site: Option<OntologyClass>,
}

impl DiseaseBuilder {
    pub fn term(mut self, term: OntologyClass) -> Self {
        self.term = Some(term);
        self
    }

    pub fn excluded(mut self, excluded: bool) -> Self {
        self.excluded = Some(excluded);
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

    pub fn add_disease_stage(mut self, stage: OntologyClass) -> Self {
        self.disease_stage.push(stage);
        self
    }

    pub fn add_clinical_tnm_finding(mut self, finding: OntologyClass) -> Self {
        self.clinical_tnm_finding.push(finding);
        self
    }

    pub fn primary_site(mut self, primary_site: OntologyClass) -> Self {
        self.primary_site = Some(primary_site);
        self
    }

    pub fn build(self) -> Result<Disease, BuildError> {
        Ok(Disease {
            term: required(self.term, "Disease", "term")?,
            excluded: self.excluded,
            onset: self.onset,
            resolution: self.resolution,
            disease_stage: self.disease_stage,
            clinical_tnm_finding: self.clinical_tnm_finding,
            primary_site: self.primary_site,
        })
    }
}

#[test]
fn test_build_disease() {
    use crate::ontology::ontology_class;

    let disease = Disease::builder()
        .term(ontology_class("NCIT:C39853", "Infiltrating Urothelial Carcinoma"))
        .add_disease_stage(ontology_class("NCIT:C27971", "Stage IV"))
        .add_clinical_tnm_finding(ontology_class("NCIT:C48766", "pT2b Stage Finding"))
        .add_clinical_tnm_finding(ontology_class("NCIT:C48750", "pN2 Stage Finding"))
        .build()
        .unwrap();

    assert!(!disease.is_excluded());
    assert_eq!(disease.clinical_tnm_finding()[1].id(), "NCIT:C48750");
    assert_eq!(disease.ontology_terms().len(), 4);

    assert!(matches!(Disease::builder().excluded(true).build(),
                     Err(BuildError::MissingRequiredField { field: "term", .. })));
}

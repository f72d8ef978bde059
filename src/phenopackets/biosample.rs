use serde_with::skip_serializing_none;

use flexstr::SharedStr as FlexStr;

use crate::error::BuildError;
use crate::ontology::{OntologyClass, OntologyTerms};
use crate::phenotype::PhenotypicFeature;
use crate::time::{Age, TimeElement};
use crate::types::*;
use crate::utils::required;

// A specimen taken from an individual.  individual_id refers to the
// Individual by id only, the validator checks that it exists.
#[skip_serializing_none]
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Biosample {
    id: BiosampleId,
    individual_id: Option<IndividualId>,
    description: Option<FlexStr>,
    sampled_tissue: Option<OntologyClass>,
    sample_type: Option<OntologyClass>,
    time_of_collection: Option<TimeElement>,
    #[serde(skip_serializing_if="Vec::is_empty", default)]
    phenotypic_features: Vec<PhenotypicFeature>,
    histological_diagnosis: Option<OntologyClass>,
    tumor_progression: Option<OntologyClass>,
    tumor_grade: Option<OntologyClass>,
    pathological_stage: Option<OntologyClass>,
    #[serde(skip_serializing_if="Vec::is_empty", default)]
    pathological_tnm_finding: Vec<OntologyClass>,
    #[serde(skip_serializing_if="Vec::is_empty", default)]
    diagnostic_markers: Vec<OntologyClass>,
    procedure: Option<OntologyClass>,
}

impl Biosample {
    pub fn builder() -> BiosampleBuilder {
        BiosampleBuilder::default()
    }

    pub fn id(&self) -> &str {
        self.id.as_ref()
    }

    pub fn individual_id(&self) -> Option<&str> {
        self.individual_id.as_ref().map(|individual_id| individual_id.as_ref())
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_ref().map(|description| description.as_ref())
    }

    pub fn sampled_tissue(&self) -> Option<&OntologyClass> {
        self.sampled_tissue.as_ref()
    }

    pub fn sample_type(&self) -> Option<&OntologyClass> {
        self.sample_type.as_ref()
    }

    pub fn time_of_collection(&self) -> Option<&TimeElement> {
        self.time_of_collection.as_ref()
    }

    // the age of the individual when the sample was taken, if the collection
    // time was recorded as an age
    pub fn age_at_collection(&self) -> Option<&Age> {
        self.time_of_collection.as_ref().and_then(TimeElement::age)
    }

    pub fn phenotypic_features(&self) -> &[PhenotypicFeature] {
        &self.phenotypic_features
    }

    pub fn histological_diagnosis(&self) -> Option<&OntologyClass> {
        self.histological_diagnosis.as_ref()
    }

    pub fn tumor_progression(&self) -> Option<&OntologyClass> {
        self.tumor_progression.as_ref()
    }

    pub fn tumor_grade(&self) -> Option<&OntologyClass> {
        self.tumor_grade.as_ref()
    }

    pub fn pathological_stage(&self) -> Option<&OntologyClass> {
        self.pathological_stage.as_ref()
    }

    pub fn pathological_tnm_finding(&self) -> &[OntologyClass] {
        &self.pathological_tnm_finding
    }

    pub fn diagnostic_markers(&self) -> &[OntologyClass] {
        &self.diagnostic_markers
    }

    pub fn procedure(&self) -> Option<&OntologyClass> {
        self.procedure.as_ref()
    }

    pub(crate) fn individual_id_flex(&self) -> Option<&IndividualId> {
        self.individual_id.as_ref()
    }

    pub(crate) fn id_flex(&self) -> &BiosampleId {
        &self.id
    }
}

impl OntologyTerms for Biosample {
    fn collect_terms<'a>(&'a self, terms: &mut Vec<&'a OntologyClass>) {
        self.sampled_tissue.collect_terms(terms);
        self.sample_type.collect_terms(terms);
        self.time_of_collection.collect_terms(terms);
        self.phenotypic_features.collect_terms(terms);
        self.histological_diagnosis.collect_terms(terms);
        self.tumor_progression.collect_terms(terms);
        self.tumor_grade.collect_terms(terms);
        self.pathological_stage.collect_terms(terms);
        self.pathological_tnm_finding.collect_terms(terms);
        self.diagnostic_markers.collect_terms(terms);
        self.procedure.collect_terms(terms);
    }
}

#[derive(Default, Clone, Debug)]
pub struct BiosampleBuilder {
    id: Option<BiosampleId>,
    individual_id: Option<IndividualId>,
    description: Option<FlexStr>,
    sampled_tissue: Option<OntologyClass>,
    sample_type: Option<OntologyClass>,
    time_of_collection: Option<TimeElement>,
    phenotypic_features: Vec<PhenotypicFeature>,
    histological_diagnosis: Option<OntologyClass>,
    tumor_progression: Option<OntologyClass>,
    tumor_grade: Option<OntologyClass>,
    pathological_stage: Option<OntologyClass>,
    pathological_tnm_finding: Vec<OntologyClass>,
    diagnostic_markers: Vec<OntologyClass>,
    procedure: Option<OntologyClass>,
}

impl BiosampleBuilder {
    pub fn id(mut self, id: impl Into<BiosampleId>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn individual_id(mut self, individual_id: impl Into<IndividualId>) -> Self {
        self.individual_id = Some(individual_id.into());
        self
    }

    pub fn description(mut self, description: impl Into<FlexStr>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn sampled_tissue(mut self, sampled_tissue: OntologyClass) -> Self {
        self.sampled_tissue = Some(sampled_tissue);
        self
    }

    pub fn sample_type(mut self, sample_type: OntologyClass) -> Self {
        self.sample_type = Some(sample_type);
        self
    }

    pub fn time_of_collection(mut self, time_of_collection: impl Into<TimeElement>) -> Self {
        self.time_of_collection = Some(time_of_collection.into());
        self
    }

    pub fn age_at_collection(self, age: Age) -> Self {
        self.time_of_collection(TimeElement::Age(age))
    }

    pub fn add_phenotypic_feature(mut self, feature: PhenotypicFeature) -> Self {
        self.phenotypic_features.push(feature);
        self
    }

    pub fn add_all_phenotypic_features(mut self,
                                       features: impl IntoIterator<Item = PhenotypicFeature>)
                                       -> Self
    {
        self.phenotypic_features.extend(features);
        self
    }

    pub fn histological_diagnosis(mut self, diagnosis: OntologyClass) -> Self {
        self.histological_diagnosis = Some(diagnosis);
        self
    }

    pub fn tumor_progression(mut self, progression: OntologyClass) -> Self {
        self.tumor_progression = Some(progression);
        self
    }

    pub fn tumor_grade(mut self, grade: OntologyClass) -> Self {
        self.tumor_grade = Some(grade);
        self
    }

    pub fn pathological_stage(mut self, stage: OntologyClass) -> Self {
        self.pathological_stage = Some(stage);
        self
    }

    pub fn add_pathological_tnm_finding(mut self, finding: OntologyClass) -> Self {
        self.pathological_tnm_finding.push(finding);
        self
    }

    pub fn add_diagnostic_marker(mut self, marker: OntologyClass) -> Self {
        self.diagnostic_markers.push(marker);
        self
    }

    pub fn procedure(mut self, procedure: OntologyClass) -> Self {
        self.procedure = Some(procedure);
        self
    }

    pub fn build(self) -> Result<Biosample, BuildError> {
        Ok(Biosample {
            id: required(self.id, "Biosample", "id")?,
            individual_id: self.individual_id,
            description: self.description,
            sampled_tissue: self.sampled_tissue,
            sample_type: self.sample_type,
            time_of_collection: self.time_of_collection,
            phenotypic_features: self.phenotypic_features,
            histological_diagnosis: self.histological_diagnosis,
            tumor_progression: self.tumor_progression,
            tumor_grade: self.tumor_grade,
            pathological_stage: self.pathological_stage,
            pathological_tnm_finding: self.pathological_tnm_finding,
            diagnostic_markers: self.diagnostic_markers,
            procedure: self.procedure,
        })
    }
}

#[test]
fn test_bladder_biopsy() {
    use crate::ontology::ontology_class;
    use crate::phenotype::from_finding;

    let biosample = Biosample::builder()
        .id("sample1")
        .individual_id("patient1")
        .age_at_collection(Age::iso8601("P52Y2M").unwrap())
        .sample_type(ontology_class("UBERON_0001256", "wall of urinary bladder"))
        .add_phenotypic_feature(from_finding("NCIT:C39853", "Infiltrating Urothelial Carcinoma"))
        .add_all_phenotypic_features(vec![from_finding("NCIT:C48766", "pT2b Stage Finding"),
                                          from_finding("NCIT:C48750", "pN2 Stage Finding")])
        .build()
        .unwrap();

    assert_eq!(biosample.id(), "sample1");
    assert_eq!(biosample.individual_id(), Some("patient1"));
    assert_eq!(biosample.age_at_collection().and_then(Age::duration).map(|d| d.years()), Some(52));

    let feature_ids: Vec<&str> = biosample.phenotypic_features().iter()
        .map(|feature| feature.feature_type().id())
        .collect();
    assert_eq!(feature_ids, vec!["NCIT:C39853", "NCIT:C48766", "NCIT:C48750"]);

    // sample type and the three findings
    assert_eq!(biosample.ontology_terms().len(), 4);
}

#[test]
fn test_biosample_without_id() {
    let result = Biosample::builder().individual_id("patient1").build();
    assert_eq!(result, Err(BuildError::MissingRequiredField { entity: "Biosample", field: "id" }));
}

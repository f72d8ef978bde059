use std::fmt::{self, Display};

use serde_with::skip_serializing_none;

use crate::error::BuildError;
use crate::ontology::{OntologyClass, OntologyTerms};
use crate::time::{TimeElement, Timestamp};
use crate::types::*;
use crate::utils::required;

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum Sex {
    #[default]
    #[serde(rename = "UNKNOWN_SEX")]
    Unknown,
    #[serde(rename = "FEMALE")]
    Female,
    #[serde(rename = "MALE")]
    Male,
    #[serde(rename = "OTHER_SEX")]
    Other,
}

impl Display for Sex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match *self {
            Sex::Unknown => "unknown",
            Sex::Female => "female",
            Sex::Male => "male",
            Sex::Other => "other",
        };
        write!(f, "{}", name)
    }
}

// The subject of a phenopacket: a patient or a relative
#[skip_serializing_none]
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Individual {
    id: IndividualId,
    #[serde(skip_serializing_if="Vec::is_empty", default)]
    alternate_ids: Vec<IndividualId>,
    date_of_birth: Option<Timestamp>,
    time_at_last_encounter: Option<TimeElement>,
    sex: Option<Sex>,
    taxonomy: Option<OntologyClass>,
}

impl Individual {
    pub fn builder() -> IndividualBuilder {
        IndividualBuilder::default()
    }

    pub fn id(&self) -> &str {
        self.id.as_ref()
    }

    pub fn alternate_ids(&self) -> &[IndividualId] {
        &self.alternate_ids
    }

    pub fn date_of_birth(&self) -> Option<Timestamp> {
        self.date_of_birth
    }

    pub fn time_at_last_encounter(&self) -> Option<&TimeElement> {
        self.time_at_last_encounter.as_ref()
    }

    // an unset sex reads as unknown
    pub fn sex(&self) -> Sex {
        self.sex.unwrap_or_default()
    }

    pub fn taxonomy(&self) -> Option<&OntologyClass> {
        self.taxonomy.as_ref()
    }

    pub(crate) fn id_flex(&self) -> &IndividualId {
        &self.id
    }
}

impl OntologyTerms for Individual {
    fn collect_terms<'a>(&'a self, terms: &mut Vec<&'a OntologyClass>) {
        self.time_at_last_encounter.collect_terms(terms);
        self.taxonomy.collect_terms(terms);
    }
}

#[derive(Default, Clone, Debug)]
pub struct IndividualBuilder {
    id: Option<IndividualId>,
    alternate_ids: Vec<IndividualId>,
    date_of_birth: Option<Timestamp>,
    time_at_last_encounter: Option<TimeElement>,
    sex: Option<Sex>,
    taxonomy: Option<OntologyClass>,
}

impl IndividualBuilder {
    pub fn id(mut self, id: impl Into<IndividualId>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn add_alternate_id(mut self, alternate_id: impl Into<IndividualId>) -> Self {
        self.alternate_ids.push(alternate_id.into());
        self
    }

    pub fn date_of_birth(mut self, date_of_birth: Timestamp) -> Self {
        self.date_of_birth = Some(date_of_birth);
        self
    }

    pub fn time_at_last_encounter(mut self, time: impl Into<TimeElement>) -> Self {
        self.time_at_last_encounter = Some(time.into());
        self
    }

    pub fn sex(mut self, sex: Sex) -> Self {
        self.sex = Some(sex);
        self
    }

    pub fn taxonomy(mut self, taxonomy: OntologyClass) -> Self {
        self.taxonomy = Some(taxonomy);
        self
    }

    pub fn build(self) -> Result<Individual, BuildError> {
        Ok(Individual {
            id: required(self.id, "Individual", "id")?,
            alternate_ids: self.alternate_ids,
            date_of_birth: self.date_of_birth,
            time_at_last_encounter: self.time_at_last_encounter,
            sex: self.sex,
            taxonomy: self.taxonomy,
        })
    }
}

#[test]
fn test_build_individual() {
    use crate::time::Age;

    let proband = Individual::builder()
        .sex(Sex::Male)
        .id("14 year-old boy")
        .time_at_last_encounter(Age::iso8601("P14Y").unwrap())
        .build()
        .unwrap();

    assert_eq!(proband.id(), "14 year-old boy");
    assert_eq!(proband.sex(), Sex::Male);
    assert!(proband.date_of_birth().is_none());

    let no_sex = Individual::builder().id("patient1").build().unwrap();
    assert_eq!(no_sex.sex(), Sex::Unknown);
}

#[test]
fn test_individual_without_id() {
    let result = Individual::builder().sex(Sex::Female).build();
    assert_eq!(result, Err(BuildError::MissingRequiredField { entity: "Individual", field: "id" }));
    assert_eq!(result.unwrap_err().to_string(), "Individual: missing required field \"id\"");
}

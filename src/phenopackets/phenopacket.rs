use serde_with::skip_serializing_none;

use crate::biosample::Biosample;
use crate::config::ValidationConfig;
use crate::disease::Disease;
use crate::error::{BuildError, UnknownNamespaceError, ValidationError};
use crate::individual::Individual;
use crate::meta_data::MetaData;
use crate::ontology::{OntologyClass, OntologyTerms};
use crate::pedigree::Pedigree;
use crate::phenotype::PhenotypicFeature;
use crate::types::*;
use crate::utils::required;
use crate::validate;
use crate::variation::VariationDescriptor;

// Everything known about one subject.  Immutable: use Phenopacket::builder()
// to make one.
#[skip_serializing_none]
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Phenopacket {
    id: PhenopacketId,
    subject: Option<Individual>,
    #[serde(skip_serializing_if="Vec::is_empty", default)]
    phenotypic_features: Vec<PhenotypicFeature>,
    #[serde(skip_serializing_if="Vec::is_empty", default)]
    biosamples: Vec<Biosample>,
    #[serde(skip_serializing_if="Vec::is_empty", default)]
    diseases: Vec<Disease>,
    #[serde(skip_serializing_if="Vec::is_empty", default)]
    variants: Vec<VariationDescriptor>,
    meta_data: Option<MetaData>,
}

impl Phenopacket {
    pub fn builder() -> PhenopacketBuilder {
        PhenopacketBuilder::default()
    }

    pub fn id(&self) -> &str {
        self.id.as_ref()
    }

    pub fn subject(&self) -> Option<&Individual> {
        self.subject.as_ref()
    }

    pub fn phenotypic_features(&self) -> &[PhenotypicFeature] {
        &self.phenotypic_features
    }

    pub fn biosamples(&self) -> &[Biosample] {
        &self.biosamples
    }

    pub fn biosample(&self, biosample_id: &str) -> Option<&Biosample> {
        self.biosamples.iter().find(|biosample| biosample.id() == biosample_id)
    }

    pub fn diseases(&self) -> &[Disease] {
        &self.diseases
    }

    pub fn variants(&self) -> &[VariationDescriptor] {
        &self.variants
    }

    pub fn meta_data(&self) -> Option<&MetaData> {
        self.meta_data.as_ref()
    }

    // Check the cross references in this phenopacket with the default
    // configuration, reporting every problem found
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.validate_with(&ValidationConfig::default())
    }

    pub fn validate_with(&self, config: &ValidationConfig) -> Result<(), ValidationError> {
        validate::validate_phenopacket(self, config)
    }

    pub fn check_namespaces(&self) -> Result<(), UnknownNamespaceError> {
        let meta_data: Vec<&MetaData> = self.meta_data.iter().collect();
        validate::check_namespaces(self, &meta_data, &ValidationConfig::default())
    }
}

impl OntologyTerms for Phenopacket {
    fn collect_terms<'a>(&'a self, terms: &mut Vec<&'a OntologyClass>) {
        self.subject.collect_terms(terms);
        self.phenotypic_features.collect_terms(terms);
        self.biosamples.collect_terms(terms);
        self.diseases.collect_terms(terms);
        self.variants.collect_terms(terms);
    }
}

#[derive(Default, Clone, Debug)]
pub struct PhenopacketBuilder {
    id: Option<PhenopacketId>,
    subject: Option<Individual>,
    phenotypic_features: Vec<PhenotypicFeature>,
    biosamples: Vec<Biosample>,
    diseases: Vec<Disease>,
    variants: Vec<VariationDescriptor>,
    meta_data: Option<MetaData>,
}

impl PhenopacketBuilder {
    pub fn id(mut self, id: impl Into<PhenopacketId>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn subject(mut self, subject: Individual) -> Self {
        self.subject = Some(subject);
        self
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

    pub fn add_biosample(mut self, biosample: Biosample) -> Self {
        self.biosamples.push(biosample);
        self
    }

    pub fn add_all_biosamples(mut self, biosamples: impl IntoIterator<Item = Biosample>) -> Self {
        self.biosamples.extend(biosamples);
        self
    }

    pub fn add_disease(mut self, disease: Disease) -> Self {
        self.diseases.push(disease);
        self
    }

    pub fn add_variant(mut self, variant: VariationDescriptor) -> Self {
        self.variants.push(variant);
        self
    }

    pub fn meta_data(mut self, meta_data: MetaData) -> Self {
        self.meta_data = Some(meta_data);
        self
    }

    pub fn build(self) -> Result<Phenopacket, BuildError> {
        Ok(Phenopacket {
            id: required(self.id, "Phenopacket", "id")?,
            subject: self.subject,
            phenotypic_features: self.phenotypic_features,
            biosamples: self.biosamples,
            diseases: self.diseases,
            variants: self.variants,
            meta_data: self.meta_data,
        })
    }
}

// A proband and their relatives, with the pedigree connecting them
#[skip_serializing_none]
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Family {
    id: FamilyId,
    proband: Phenopacket,
    #[serde(skip_serializing_if="Vec::is_empty", default)]
    relatives: Vec<Phenopacket>,
    consanguinous_parents: Option<bool>,
    pedigree: Option<Pedigree>,
    meta_data: MetaData,
}

impl Family {
    pub fn builder() -> FamilyBuilder {
        FamilyBuilder::default()
    }

    pub fn id(&self) -> &str {
        self.id.as_ref()
    }

    pub fn proband(&self) -> &Phenopacket {
        &self.proband
    }

    pub fn relatives(&self) -> &[Phenopacket] {
        &self.relatives
    }

    pub fn consanguinous_parents(&self) -> Option<bool> {
        self.consanguinous_parents
    }

    pub fn pedigree(&self) -> Option<&Pedigree> {
        self.pedigree.as_ref()
    }

    pub fn meta_data(&self) -> &MetaData {
        &self.meta_data
    }

    // the proband followed by the relatives
    pub fn members(&self) -> impl Iterator<Item = &Phenopacket> {
        std::iter::once(&self.proband).chain(self.relatives.iter())
    }

    // Ids of the subjects of the proband and relatives phenopackets
    pub fn member_ids(&self) -> Vec<&IndividualId> {
        self.members()
            .filter_map(|phenopacket| phenopacket.subject.as_ref())
            .map(|subject| subject.id_flex())
            .collect()
    }

    // the family metadata followed by any metadata of the members
    pub fn all_meta_data(&self) -> Vec<&MetaData> {
        std::iter::once(&self.meta_data)
            .chain(self.members().filter_map(Phenopacket::meta_data))
            .collect()
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        self.validate_with(&ValidationConfig::default())
    }

    pub fn validate_with(&self, config: &ValidationConfig) -> Result<(), ValidationError> {
        validate::validate_family(self, config)
    }

    pub fn check_namespaces(&self) -> Result<(), UnknownNamespaceError> {
        validate::check_namespaces(self, &self.all_meta_data(), &ValidationConfig::default())
    }
}

impl OntologyTerms for Family {
    fn collect_terms<'a>(&'a self, terms: &mut Vec<&'a OntologyClass>) {
        self.proband.collect_terms(terms);
        self.relatives.collect_terms(terms);
    }
}

#[derive(Default, Clone, Debug)]
pub struct FamilyBuilder {
    id: Option<FamilyId>,
    proband: Option<Phenopacket>,
    relatives: Vec<Phenopacket>,
    consanguinous_parents: Option<bool>,
    pedigree: Option<Pedigree>,
    meta_data: Option<MetaData>,
}

impl FamilyBuilder {
    pub fn id(mut self, id: impl Into<FamilyId>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn proband(mut self, proband: Phenopacket) -> Self {
        self.proband = Some(proband);
        self
    }

    pub fn add_relative(mut self, relative: Phenopacket) -> Self {
        self.relatives.push(relative);
        self
    }

    pub fn add_all_relatives(mut self, relatives: impl IntoIterator<Item = Phenopacket>) -> Self {
        self.relatives.extend(relatives);
        self
    }

    pub fn consanguinous_parents(mut self, consanguinous_parents: bool) -> Self {
        self.consanguinous_parents = Some(consanguinous_parents);
        self
    }

    pub fn pedigree(mut self, pedigree: Pedigree) -> Self {
        self.pedigree = Some(pedigree);
        self
    }

    pub fn meta_data(mut self, meta_data: MetaData) -> Self {
        self.meta_data = Some(meta_data);
        self
    }

    pub fn build(self) -> Result<Family, BuildError> {
        Ok(Family {
            id: required(self.id, "Family", "id")?,
            proband: required(self.proband, "Family", "proband")?,
            relatives: self.relatives,
            consanguinous_parents: self.consanguinous_parents,
            pedigree: self.pedigree,
            meta_data: required(self.meta_data, "Family", "meta_data")?,
        })
    }
}

#[test]
fn test_phenopacket_requires_id() {
    assert_eq!(Phenopacket::builder().build(),
               Err(BuildError::MissingRequiredField { entity: "Phenopacket", field: "id" }));
}

#[test]
fn test_family_requires_proband_and_meta_data() {
    let proband = Phenopacket::builder().id("proband").build().unwrap();

    assert!(matches!(Family::builder().id("family").build(),
                     Err(BuildError::MissingRequiredField { field: "proband", .. })));
    assert!(matches!(Family::builder().id("family").proband(proband).build(),
                     Err(BuildError::MissingRequiredField { field: "meta_data", .. })));
}

#[test]
fn test_family_members() {
    use crate::time::Timestamp;

    let packet = |packet_id: &str, subject_id: Option<&str>| {
        let mut builder = Phenopacket::builder().id(packet_id);
        if let Some(subject_id) = subject_id {
            builder = builder.subject(Individual::builder().id(subject_id).build().unwrap());
        }
        builder.build().unwrap()
    };

    let family = Family::builder()
        .id("family")
        .proband(packet("proband", Some("PROBAND")))
        .add_relative(packet("mother", Some("MOTHER")))
        .add_relative(packet("unknown", None))
        .meta_data(MetaData::builder().created(Timestamp::now()).created_by("test").build().unwrap())
        .build()
        .unwrap();

    assert_eq!(family.members().count(), 3);
    let member_ids: Vec<String> = family.member_ids().iter().map(|id| id.to_string()).collect();
    assert_eq!(member_ids, vec!["PROBAND", "MOTHER"]);
    assert_eq!(family.all_meta_data().len(), 1);
}

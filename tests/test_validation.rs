extern crate phenopackets;

mod util;

use phenopackets::biosample::Biosample;
use phenopackets::config::ValidationConfig;
use phenopackets::individual::{Individual, Sex};
use phenopackets::meta_data::MetaData;
use phenopackets::pedigree::{ParentRole, Pedigree, Person};
use phenopackets::ontology::ontology_class;
use phenopackets::phenopacket::{Family, Phenopacket};
use phenopackets::phenotype::PhenotypicFeature;
use phenopackets::{BuildError, UnknownNamespaceError, ValidationError, Violation};

use util::*;

fn violations(result: Result<(), ValidationError>) -> Vec<Violation> {
    match result {
        Ok(()) => vec![],
        Err(validation_error) => validation_error.violations,
    }
}

fn unknown_namespace_curies(violations: &[Violation]) -> Vec<String> {
    violations.iter()
        .filter_map(|violation| match violation {
            Violation::UnknownNamespace { curie, .. } => Some(curie.to_string()),
            _ => None,
        })
        .collect()
}

fn person(individual_id: &str, sex: Sex, mother: Option<&str>, father: Option<&str>) -> Person {
    let mut builder = Person::builder()
        .family_id("family")
        .individual_id(individual_id)
        .sex(sex);
    if let Some(mother) = mother {
        builder = builder.maternal_id(mother);
    }
    if let Some(father) = father {
        builder = builder.paternal_id(father);
    }
    builder.build().unwrap()
}

fn pedigree_violations(pedigree: Pedigree) -> Vec<Violation> {
    let family = bethlem_family_with(pedigree, vec![eco_resource()]);
    violations(family.validate())
}

fn subject_only(packet_id: &str, subject_id: &str) -> Phenopacket {
    Phenopacket::builder()
        .id(packet_id)
        .subject(Individual::builder().id(subject_id).build().unwrap())
        .meta_data(MetaData::builder().created(test_timestamp()).created_by("test").build().unwrap())
        .build()
        .unwrap()
}

#[test]
fn test_urothelial_undeclared_uberon() {
    let result = urothelial_carcinoma().validate();
    let validation_error = result.unwrap_err();

    assert_eq!(validation_error.len(), 5);
    assert_eq!(unknown_namespace_curies(&validation_error.violations),
               vec!["UBERON_0001256", "UBERON:0002367", "UBERON:0001223",
                    "UBERON:0001222", "UBERON:0015876"]);

    assert!(validation_error.to_string().starts_with("5 validation error(s)"));
}

#[test]
fn test_urothelial_declared_uberon() {
    let phenopacket = urothelial_carcinoma_with_resources(vec![ncit_resource(), uberon_resource()]);
    assert_eq!(phenopacket.validate(), Ok(()));
    assert_eq!(phenopacket.check_namespaces(), Ok(()));
}

#[test]
fn test_implicit_namespaces() {
    let config = ValidationConfig::default().with_implicit_namespace("UBERON");
    assert_eq!(urothelial_carcinoma().validate_with(&config), Ok(()));

    let no_namespaces = ValidationConfig {
        check_namespaces: false,
        ..ValidationConfig::default()
    };
    assert_eq!(urothelial_carcinoma().validate_with(&no_namespaces), Ok(()));
}

#[test]
fn test_obo_style_curies() {
    let phenopacket = urothelial_carcinoma_with_resources(vec![ncit_resource(), uberon_resource()]);

    let strict = ValidationConfig {
        allow_obo_style_curies: false,
        ..ValidationConfig::default()
    };

    let found = violations(phenopacket.validate_with(&strict));
    assert_eq!(found.len(), 1);
    match found[0] {
        Violation::MalformedCurie { ref curie } => assert_eq!(curie.to_string(), "UBERON_0001256"),
        ref other => panic!("expected a malformed CURIE, got {}", other),
    }
}

#[test]
fn test_check_namespaces() {
    let Err(UnknownNamespaceError { curies }) = urothelial_carcinoma().check_namespaces()
    else {
        panic!("expected undeclared UBERON terms");
    };
    assert_eq!(curies.len(), 5);
    assert_eq!(curies[0].to_string(), "UBERON_0001256");

    let Err(family_error) = bethlem_family().check_namespaces()
    else {
        panic!("expected undeclared ECO term");
    };
    assert_eq!(family_error.to_string(),
               "CURIEs with undeclared namespace prefixes: ECO:0000033");
}

#[test]
fn test_unknown_biosample_individual() {
    let biosample = Biosample::builder()
        .id("sample1")
        .individual_id("patient2")
        .build()
        .unwrap();

    let phenopacket = Phenopacket::builder()
        .id("packet")
        .subject(Individual::builder().id(PATIENT_ID).build().unwrap())
        .add_biosample(biosample)
        .add_biosample(bladder_biopsy())
        .meta_data(MetaData::builder()
                   .created(test_timestamp())
                   .created_by("test")
                   .add_resource(ncit_resource())
                   .add_resource(uberon_resource())
                   .build()
                   .unwrap())
        .build()
        .unwrap();

    let found = violations(phenopacket.validate());

    assert_eq!(found, vec![Violation::UnknownBiosampleIndividual {
        biosample_id: "sample1".into(),
        individual_id: "patient2".into(),
    }]);
    assert_eq!(found[0].to_string(), "biosample sample1 refers to unknown individual patient2");

    let no_references = ValidationConfig {
        check_references: false,
        ..ValidationConfig::default()
    };
    assert_eq!(phenopacket.validate_with(&no_references), Ok(()));
}

#[test]
fn test_biosample_without_subject() {
    let phenopacket = Phenopacket::builder()
        .id("packet")
        .add_biosample(Biosample::builder().id("sample1").individual_id("patient1")
                       .build().unwrap())
        .add_biosample(Biosample::builder().id("sample2").build().unwrap())
        .meta_data(MetaData::builder().created(test_timestamp()).created_by("test").build().unwrap())
        .build()
        .unwrap();

    let found = violations(phenopacket.validate());
    assert_eq!(found.len(), 1);
    assert!(matches!(found[0], Violation::UnknownBiosampleIndividual { .. }));
}

#[test]
fn test_duplicate_biosample_ids() {
    let phenopacket = Phenopacket::builder()
        .id("packet")
        .subject(Individual::builder().id(PATIENT_ID).build().unwrap())
        .add_biosample(Biosample::builder().id("sample1").build().unwrap())
        .add_biosample(Biosample::builder().id("sample1").build().unwrap())
        .add_biosample(Biosample::builder().id("sample1").build().unwrap())
        .meta_data(MetaData::builder().created(test_timestamp()).created_by("test").build().unwrap())
        .build()
        .unwrap();

    assert_eq!(violations(phenopacket.validate()),
               vec![Violation::DuplicateBiosampleId { biosample_id: "sample1".into() }]);
}

#[test]
fn test_missing_meta_data() {
    let phenopacket = Phenopacket::builder()
        .id("no-meta-data")
        .subject(Individual::builder().id(PATIENT_ID).build().unwrap())
        .build()
        .unwrap();

    assert_eq!(violations(phenopacket.validate()),
               vec![Violation::MissingMetaData { container_id: "no-meta-data".into() }]);
}

#[test]
fn test_bethlem_family_undeclared_eco() {
    let found = violations(bethlem_family().validate());

    // three features cite the same evidence code, it's reported once
    assert_eq!(found, vec![Violation::UnknownNamespace {
        curie: "ECO:0000033".into(),
        prefix: "ECO".into(),
    }]);

    let family = bethlem_family_with(bethlem_pedigree(), vec![eco_resource()]);
    assert_eq!(family.validate(), Ok(()));
}

#[test]
fn test_member_meta_data_declares_namespaces() {
    let eco_meta_data = MetaData::builder()
        .created(test_timestamp())
        .created_by("curator")
        .add_resource(eco_resource())
        .build()
        .unwrap();

    let mother_with_meta_data = Phenopacket::builder()
        .id(MOTHER_ID)
        .subject(Individual::builder().id(MOTHER_ID).sex(Sex::Female).build().unwrap())
        .meta_data(eco_meta_data)
        .build()
        .unwrap();

    let family = Family::builder()
        .id("family")
        .proband(bethlem_proband())
        .add_relative(mother_with_meta_data)
        .add_relative(relative(FATHER_ID, Sex::Male))
        .pedigree(bethlem_pedigree())
        .meta_data(bethlem_meta_data(vec![]))
        .build()
        .unwrap();

    assert_eq!(family.validate(), Ok(()));
}

#[test]
fn test_family_biosample_refers_to_relative() {
    let mother_sample = Biosample::builder()
        .id("blood")
        .individual_id(MOTHER_ID)
        .build()
        .unwrap();
    let stranger_sample = Biosample::builder()
        .id("saliva")
        .individual_id("STRANGER")
        .build()
        .unwrap();

    let proband = Phenopacket::builder()
        .id("proband")
        .subject(Individual::builder().id(PROBAND_ID).build().unwrap())
        .add_biosample(mother_sample)
        .add_biosample(stranger_sample)
        .build()
        .unwrap();

    let family = Family::builder()
        .id("family")
        .proband(proband)
        .add_relative(relative(MOTHER_ID, Sex::Female))
        .meta_data(bethlem_meta_data(vec![]))
        .build()
        .unwrap();

    assert_eq!(violations(family.validate()),
               vec![Violation::UnknownBiosampleIndividual {
                   biosample_id: "saliva".into(),
                   individual_id: "STRANGER".into(),
               }]);
}

#[test]
fn test_pedigree_cycle() {
    let pedigree = Pedigree::builder()
        .add_person(person(PROBAND_ID, Sex::Male, Some(MOTHER_ID), Some(FATHER_ID)))
        .add_person(person(MOTHER_ID, Sex::Female, None, None))
        .add_person(person(FATHER_ID, Sex::Male, None, Some(PROBAND_ID)))
        .build();

    let found = pedigree_violations(pedigree.clone());
    assert_eq!(found.len(), 1);

    let Violation::PedigreeCycle { ref individual_ids } = found[0]
    else {
        panic!("expected a cycle, got {}", found[0]);
    };
    let individual_ids: Vec<String> = individual_ids.iter().map(|id| id.to_string()).collect();
    assert_eq!(individual_ids, vec![PROBAND_ID, FATHER_ID, PROBAND_ID]);
    assert_eq!(found[0].to_string(),
               "pedigree cycle: 14 year-old boy -> FATHER -> 14 year-old boy");

    let family = bethlem_family_with(pedigree, vec![eco_resource()]);
    let no_pedigree = ValidationConfig {
        check_pedigree: false,
        ..ValidationConfig::default()
    };
    assert_eq!(family.validate_with(&no_pedigree), Ok(()));
}

#[test]
fn test_parent_sex_mismatch() {
    let pedigree = Pedigree::builder()
        .add_person(person(PROBAND_ID, Sex::Male, Some(MOTHER_ID), Some(FATHER_ID)))
        .add_person(person(MOTHER_ID, Sex::Male, None, None))
        .add_person(person(FATHER_ID, Sex::Unknown, None, None))
        .build();

    assert_eq!(pedigree_violations(pedigree),
               vec![Violation::ParentSexMismatch {
                   individual_id: PROBAND_ID.into(),
                   parent_id: MOTHER_ID.into(),
                   role: ParentRole::Mother,
               }]);
}

#[test]
fn test_unknown_parent() {
    let pedigree = Pedigree::builder()
        .add_person(person(PROBAND_ID, Sex::Male, Some(MOTHER_ID), Some(FATHER_ID)))
        .add_person(person(MOTHER_ID, Sex::Female, Some("GRANDMOTHER"), Some("0")))
        .add_person(person(FATHER_ID, Sex::Male, None, None))
        .build();

    let found = pedigree_violations(pedigree);
    assert_eq!(found, vec![Violation::UnknownParent {
        individual_id: MOTHER_ID.into(),
        parent_id: "GRANDMOTHER".into(),
        role: ParentRole::Mother,
    }]);
    assert_eq!(found[0].to_string(), "mother GRANDMOTHER of MOTHER is not in the pedigree");
}

#[test]
fn test_pedigree_members() {
    let pedigree = Pedigree::builder()
        .add_person(person(PROBAND_ID, Sex::Male, Some(MOTHER_ID), Some(FATHER_ID)))
        .add_person(person(MOTHER_ID, Sex::Female, None, None))
        .add_person(person(FATHER_ID, Sex::Male, None, None))
        .add_person(person(FATHER_ID, Sex::Male, None, None))
        .add_person(person("SISTER", Sex::Female, Some(MOTHER_ID), Some(FATHER_ID)))
        .build();

    assert_eq!(pedigree_violations(pedigree),
               vec![Violation::DuplicatePedigreeMember { individual_id: FATHER_ID.into() },
                    Violation::UnknownPedigreeMember { individual_id: "SISTER".into() }]);
}

#[test]
fn test_validation_is_batched() {
    let pedigree = Pedigree::builder()
        .add_person(person("A", Sex::Male, None, Some("B")))
        .add_person(person("B", Sex::Male, None, Some("A")))
        .build();

    let family = Family::builder()
        .id("cycle")
        .proband(subject_only("a", "A"))
        .add_relative(subject_only("b", "B"))
        .pedigree(pedigree)
        .meta_data(MetaData::builder().created(test_timestamp()).created_by("test").build().unwrap())
        .build()
        .unwrap();

    let found = violations(family.validate());
    assert_eq!(found.len(), 1);
    assert!(matches!(found[0], Violation::PedigreeCycle { .. }));

    let urothelial = urothelial_carcinoma();
    let mut broken = Phenopacket::builder()
        .id(urothelial.id())
        .add_biosample(Biosample::builder().id("sample1").individual_id("nobody").build().unwrap());
    for biosample in urothelial.biosamples() {
        broken = broken.add_biosample(biosample.clone());
    }
    let broken = broken.build().unwrap();

    // one unknown individual for each of the six biosamples, one duplicate
    // id and no metadata
    let found = violations(broken.validate());
    assert_eq!(found.len(), 8);
}

#[test]
fn test_individual_without_id() {
    let result = Individual::builder().sex(Sex::Male).build();
    assert_eq!(result.unwrap_err(),
               BuildError::MissingRequiredField { entity: "Individual", field: "id" });
}

fn excluded(id: &str, label: &str) -> PhenotypicFeature {
    PhenotypicFeature::builder()
        .feature_type(ontology_class(id, label))
        .negated(true)
        .build()
        .unwrap()
}

#[test]
fn test_negated_feature_evidence() {
    let strict = ValidationConfig {
        require_negated_evidence: true,
        ..ValidationConfig::default()
    };

    // the excluded cranial nerve abnormality cites its evidence
    let family = bethlem_family_with(bethlem_pedigree(), vec![eco_resource()]);
    assert!(family.validate_with(&strict).is_ok());

    let mother = Phenopacket::builder()
        .id(MOTHER_ID)
        .subject(Individual::builder().id(MOTHER_ID).sex(Sex::Female).build().unwrap())
        .add_phenotypic_feature(excluded("HP:0001558", "Decreased fetal movement"))
        .build()
        .unwrap();
    let family = Family::builder()
        .id("family")
        .proband(bethlem_proband())
        .add_relative(mother)
        .add_relative(relative(FATHER_ID, Sex::Male))
        .pedigree(bethlem_pedigree())
        .meta_data(bethlem_meta_data(vec![eco_resource()]))
        .build()
        .unwrap();

    assert!(family.validate().is_ok());
    assert_eq!(violations(family.validate_with(&strict)),
               vec![Violation::NegatedFeatureWithoutEvidence {
                   container_id: MOTHER_ID.into(),
                   feature_type: "HP:0001558".into(),
               }]);

    let biopsy = Biosample::builder()
        .id("sample1")
        .individual_id(PATIENT_ID)
        .add_phenotypic_feature(excluded("NCIT:C48766", "pT2b Stage Finding"))
        .build()
        .unwrap();
    let phenopacket = Phenopacket::builder()
        .id("biopsy")
        .subject(Individual::builder().id(PATIENT_ID).build().unwrap())
        .add_biosample(biopsy)
        .meta_data(MetaData::builder().created(test_timestamp()).created_by("test")
                   .add_resource(ncit_resource()).build().unwrap())
        .build()
        .unwrap();

    assert!(phenopacket.validate().is_ok());
    assert_eq!(violations(phenopacket.validate_with(&strict)),
               vec![Violation::NegatedFeatureWithoutEvidence {
                   container_id: "biopsy".into(),
                   feature_type: "NCIT:C48766".into(),
               }]);
}

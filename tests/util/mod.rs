use phenopackets::biosample::Biosample;
use phenopackets::disease::Disease;
use phenopackets::evidence::{Evidence, ExternalReference};
use phenopackets::individual::{Individual, Sex};
use phenopackets::meta_data::{MetaData, Resource};
use phenopackets::ontology::{ontology_class, OntologyClass};
use phenopackets::pedigree::{AffectedStatus, Pedigree, Person};
use phenopackets::phenopacket::{Family, Phenopacket};
use phenopackets::phenotype::{from_finding, PhenotypicFeature};
use phenopackets::time::{Age, Timestamp};

pub const PATIENT_ID: &str = "patient1";
pub const AGE_AT_BIOPSY: &str = "P52Y2M";

pub const PROBAND_ID: &str = "14 year-old boy";
pub const MOTHER_ID: &str = "MOTHER";
pub const FATHER_ID: &str = "FATHER";

#[allow(dead_code)]
pub fn test_timestamp() -> Timestamp {
    Timestamp::new(1_551_398_400, 123_000_000).unwrap()
}

#[allow(dead_code)]
pub fn ncit_resource() -> Resource {
    Resource::builder()
        .id("ncit")
        .name("NCI Thesaurus OBO Edition")
        .namespace_prefix("NCIT")
        .url("http://purl.obolibrary.org/obo/ncit.owl")
        .version("18.05d")
        .build()
        .unwrap()
}

#[allow(dead_code)]
pub fn uberon_resource() -> Resource {
    Resource::builder()
        .id("uberon")
        .name("Uber-anatomy ontology")
        .namespace_prefix("UBERON")
        .iri_prefix("http://purl.obolibrary.org/obo/UBERON_")
        .build()
        .unwrap()
}

#[allow(dead_code)]
pub fn eco_resource() -> Resource {
    Resource::builder()
        .id("eco")
        .name("Evidence and Conclusion Ontology")
        .namespace_prefix("ECO")
        .iri_prefix("http://purl.obolibrary.org/obo/ECO_")
        .build()
        .unwrap()
}

fn make_biosample(sample_id: &str, sample_type: OntologyClass,
                  features: Vec<PhenotypicFeature>) -> Biosample {
    Biosample::builder()
        .individual_id(PATIENT_ID)
        .id(sample_id)
        .age_at_collection(Age::iso8601(AGE_AT_BIOPSY).unwrap())
        .sample_type(sample_type)
        .add_all_phenotypic_features(features)
        .build()
        .unwrap()
}

#[allow(dead_code)]
pub fn bladder_biopsy() -> Biosample {
    make_biosample("sample1",
                   ontology_class("UBERON_0001256", "wall of urinary bladder"),
                   vec![from_finding("NCIT:C39853", "Infiltrating Urothelial Carcinoma"),
                        from_finding("NCIT:C48766", "pT2b Stage Finding"),
                        from_finding("NCIT:C48750", "pN2 Stage Finding")])
}

fn urothelial_biosamples() -> Vec<Biosample> {
    vec![
        bladder_biopsy(),
        make_biosample("sample2",
                       ontology_class("UBERON:0002367", "prostate gland"),
                       vec![from_finding("NCIT:C5596", "Prostate Acinar Adenocarcinoma"),
                            from_finding("NCIT:C28091", "Gleason Score 7")]),
        make_biosample("sample3",
                       ontology_class("UBERON:0001223", "left ureter"),
                       vec![from_finding("NCIT:C38757", "Negative Finding")]),
        make_biosample("sample4",
                       ontology_class("UBERON:0001222", "right ureter"),
                       vec![from_finding("NCIT:C38757", "Negative Finding")]),
        make_biosample("sample5",
                       ontology_class("UBERON:0015876", "pelvic lymph node"),
                       vec![from_finding("NCIT:C19151", "Metastasis")]),
    ]
}

// A patient with urothelial carcinoma and five biopsies.  The metadata only
// declares NCIT, the UBERON sample types are undeclared.
#[allow(dead_code)]
pub fn urothelial_carcinoma() -> Phenopacket {
    urothelial_carcinoma_with_resources(vec![ncit_resource()])
}

#[allow(dead_code)]
pub fn urothelial_carcinoma_with_resources(resources: Vec<Resource>) -> Phenopacket {
    let mut meta_data = MetaData::builder()
        .created(test_timestamp())
        .created_by("Peter R.");
    for resource in resources {
        meta_data = meta_data.add_resource(resource);
    }

    let subject = Individual::builder()
        .id(PATIENT_ID)
        .date_of_birth(Timestamp::parse_rfc3339("1964-03-15T00:00:00Z").unwrap())
        .build()
        .unwrap();

    let disease = Disease::builder()
        .term(ontology_class("NCIT:C39853", "Infiltrating Urothelial Carcinoma"))
        .build()
        .unwrap();

    Phenopacket::builder()
        .id("urothelial-carcinoma")
        .subject(subject)
        .add_all_biosamples(urothelial_biosamples())
        .add_disease(disease)
        .meta_data(meta_data.build().unwrap())
        .build()
        .unwrap()
}

fn citation() -> Evidence {
    let reference = ExternalReference::new("PMID:30808312",
        "COL6A1 mutation leading to Bethlem myopathy with recurrent hematuria: a case report.");
    Evidence::new(ontology_class("ECO:0000033",
                                 "author statement supported by traceable reference"),
                  reference)
}

#[allow(dead_code)]
pub fn bethlem_proband() -> Phenopacket {
    let decreased_fetal_movement = PhenotypicFeature::builder()
        .feature_type(ontology_class("HP:0001558", "Decreased fetal movement"))
        .onset(ontology_class("HP:0011461", "Fetal onset"))
        .add_evidence(citation())
        .build()
        .unwrap();

    let absent_cranial_nerve_abnormality = PhenotypicFeature::builder()
        .feature_type(ontology_class("HP:0031910", "Abnormal cranial nerve physiology"))
        .negated(true)
        .add_evidence(citation())
        .build()
        .unwrap();

    let hematuria = PhenotypicFeature::builder()
        .feature_type(ontology_class("HP:0011463", "Macroscopic hematuria"))
        .onset(Age::iso8601("P14Y").unwrap())
        .add_modifier(ontology_class("HP:0031796", "Recurrent"))
        .add_evidence(citation())
        .build()
        .unwrap();

    let motor_delay = PhenotypicFeature::builder()
        .feature_type(ontology_class("HP:0001270", "Motor delay"))
        .onset(ontology_class("HP:0011463", "Childhood onset"))
        .severity(ontology_class("HP:0012825", "Mild"))
        .build()
        .unwrap();

    let proband = Individual::builder()
        .sex(Sex::Male)
        .id(PROBAND_ID)
        .time_at_last_encounter(Age::iso8601("P14Y").unwrap())
        .build()
        .unwrap();

    Phenopacket::builder()
        .id(PROBAND_ID)
        .subject(proband)
        .add_phenotypic_feature(decreased_fetal_movement)
        .add_phenotypic_feature(absent_cranial_nerve_abnormality)
        .add_phenotypic_feature(hematuria)
        .add_phenotypic_feature(motor_delay)
        .build()
        .unwrap()
}

#[allow(dead_code)]
pub fn relative(individual_id: &str, sex: Sex) -> Phenopacket {
    let subject = Individual::builder()
        .sex(sex)
        .id(individual_id)
        .build()
        .unwrap();

    Phenopacket::builder()
        .id(individual_id)
        .subject(subject)
        .build()
        .unwrap()
}

#[allow(dead_code)]
pub fn bethlem_pedigree() -> Pedigree {
    let proband = Person::builder()
        .individual_id(PROBAND_ID)
        .sex(Sex::Male)
        .maternal_id(MOTHER_ID)
        .paternal_id(FATHER_ID)
        .affected_status(AffectedStatus::Affected)
        .build()
        .unwrap();

    let mother = Person::builder()
        .individual_id(MOTHER_ID)
        .sex(Sex::Female)
        .affected_status(AffectedStatus::Unaffected)
        .build()
        .unwrap();

    let father = Person::builder()
        .individual_id(FATHER_ID)
        .sex(Sex::Male)
        .affected_status(AffectedStatus::Unaffected)
        .build()
        .unwrap();

    Pedigree::builder()
        .add_person(proband)
        .add_person(mother)
        .add_person(father)
        .build()
}

#[allow(dead_code)]
pub fn bethlem_meta_data(resources: Vec<Resource>) -> MetaData {
    let hp = Resource::builder()
        .id("hp")
        .name("human phenotype ontology")
        .namespace_prefix("HP")
        .iri_prefix("http://purl.obolibrary.org/obo/HP_")
        .url("http://purl.obolibrary.org/obo/hp.owl")
        .version("2018-03-08")
        .build()
        .unwrap();

    let geno = Resource::builder()
        .id("geno")
        .name("Genotype Ontology")
        .namespace_prefix("GENO")
        .iri_prefix("http://purl.obolibrary.org/obo/GENO_")
        .url("http://purl.obolibrary.org/obo/geno.owl")
        .version("19-03-2018")
        .build()
        .unwrap();

    let pubmed = Resource::builder()
        .id("pubmed")
        .name("PubMed")
        .namespace_prefix("PMID")
        .iri_prefix("https://www.ncbi.nlm.nih.gov/pubmed/")
        .build()
        .unwrap();

    let mut builder = MetaData::builder()
        .add_resource(hp)
        .add_resource(geno)
        .add_resource(pubmed)
        .created_by("Peter R.")
        .created(test_timestamp())
        .add_external_reference(ExternalReference::new("PMID:30808312",
            "Bao M, et al. COL6A1 mutation leading to Bethlem myopathy with recurrent \
             hematuria: a case report. BMC Neurol. 2019;19(1):32."));

    for resource in resources {
        builder = builder.add_resource(resource);
    }

    builder.build().unwrap()
}

// PMID:30808312.  The evidence codes are from ECO, which the metadata
// doesn't declare.
#[allow(dead_code)]
pub fn bethlem_family() -> Family {
    bethlem_family_with(bethlem_pedigree(), vec![])
}

#[allow(dead_code)]
pub fn bethlem_family_with(pedigree: Pedigree, extra_resources: Vec<Resource>) -> Family {
    Family::builder()
        .id("family")
        .proband(bethlem_proband())
        .add_all_relatives(vec![relative(MOTHER_ID, Sex::Female),
                                relative(FATHER_ID, Sex::Male)])
        .pedigree(pedigree)
        .meta_data(bethlem_meta_data(extra_resources))
        .build()
        .unwrap()
}

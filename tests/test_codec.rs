extern crate phenopackets;
extern crate tempfile;

mod util;

use phenopackets::codec::{self, from_binary, from_json, read_file, to_binary, to_json,
                          to_json_pretty, write_file};
use phenopackets::ontology::ontology_class;
use phenopackets::phenotype::PhenotypicFeature;
use phenopackets::time::{Age, Timestamp, MAX_TIMESTAMP_SECONDS, MIN_TIMESTAMP_SECONDS};
use phenopackets::variation::{Allele, GeneDescriptor, LiteralSequenceExpression,
                              SequenceInterval, SequenceLocation, VariationDescriptor};
use phenopackets::{DecodeError, Family, Phenopacket};

use util::*;

fn feature(negated: Option<bool>) -> PhenotypicFeature {
    let mut builder = PhenotypicFeature::builder()
        .feature_type(ontology_class("HP:0031910", "Abnormal cranial nerve physiology"));
    if let Some(negated) = negated {
        builder = builder.negated(negated);
    }
    builder.build().unwrap()
}

fn col6a1_variant() -> VariationDescriptor {
    let allele = Allele::new(SequenceLocation::new("NM_001848.2",
                                                   SequenceInterval::new(876, 877).unwrap()),
                             LiteralSequenceExpression::new("A"));

    VariationDescriptor::builder()
        .id("id:1")
        .variation(allele)
        .gene_context(GeneDescriptor::new("HGNC:2211", "COL6A1"))
        .vrs_ref_allele_seq("G")
        .description("Heterozygous 877G>A transition in COL6A1")
        .allelic_state(ontology_class("GENO:0000135", "heterozygous"))
        .build()
        .unwrap()
}

#[test]
fn test_phenopacket_binary_round_trip() {
    let phenopacket = urothelial_carcinoma();

    let bytes = to_binary(&phenopacket).unwrap();
    let decoded: Phenopacket = from_binary(&bytes).unwrap();

    assert_eq!(decoded, phenopacket);

    let sample_ids: Vec<&str> = decoded.biosamples().iter().map(|biosample| biosample.id()).collect();
    assert_eq!(sample_ids, vec!["sample1", "sample2", "sample3", "sample4", "sample5"]);
}

#[test]
fn test_family_round_trips() {
    let family = Family::builder()
        .id("family")
        .proband(Phenopacket::builder()
                 .id(PROBAND_ID)
                 .add_all_phenotypic_features(bethlem_proband().phenotypic_features().to_vec())
                 .subject(bethlem_proband().subject().unwrap().clone())
                 .add_variant(col6a1_variant())
                 .build()
                 .unwrap())
        .add_relative(relative(MOTHER_ID, phenopackets::individual::Sex::Female))
        .consanguinous_parents(false)
        .pedigree(bethlem_pedigree())
        .meta_data(bethlem_meta_data(vec![]))
        .build()
        .unwrap();

    let decoded: Family = from_binary(&to_binary(&family).unwrap()).unwrap();
    assert_eq!(decoded, family);

    let decoded: Family = from_json(&to_json(&family).unwrap()).unwrap();
    assert_eq!(decoded, family);
    assert_eq!(decoded.consanguinous_parents(), Some(false));

    let decoded: Family = from_json(&to_json_pretty(&family).unwrap()).unwrap();
    assert_eq!(decoded, family);
}

#[test]
fn test_json_field_names() {
    let json = to_json(&bethlem_family()).unwrap();

    assert!(json.contains(r#""phenotypicFeatures":["#));
    assert!(json.contains(r#""timeAtLastEncounter":{"age":{"iso8601duration":"P14Y"}}"#));
    assert!(json.contains(r#""affectedStatus":"AFFECTED""#));
    assert!(json.contains(r#""sex":"MALE""#));
    assert!(json.contains(r#""namespacePrefix":"HP""#));
    assert!(json.contains(r#""created":"2019-03-01T00:00:00.123Z""#));
    assert!(json.contains(r#""type":{"id":"HP:0001558","label":"Decreased fetal movement"}"#));

    // absent optional fields aren't written
    assert!(!json.contains("null"));
    assert!(!json.contains("consanguinousParents"));
}

#[test]
fn test_negated_presence_survives() {
    for negated in [None, Some(false), Some(true)] {
        let original = feature(negated);

        let from_bin: PhenotypicFeature = from_binary(&to_binary(&original).unwrap()).unwrap();
        assert_eq!(from_bin.negated(), negated);

        let json = to_json(&original).unwrap();
        assert_eq!(json.contains("negated"), negated.is_some());
        let from_js: PhenotypicFeature = from_json(&json).unwrap();
        assert_eq!(from_js.negated(), negated);
        assert_eq!(from_js, original);
    }
}

#[test]
fn test_corrupt_bytes() {
    let bytes = to_binary(&urothelial_carcinoma()).unwrap();

    let truncated = &bytes[..bytes.len() / 2];
    assert!(matches!(from_binary::<Phenopacket>(truncated), Err(DecodeError::Binary(_))));

    let garbage = [0xc1u8, 0xff, 0x00, 0x13];
    assert!(from_binary::<Phenopacket>(&garbage).is_err());

    assert!(matches!(from_json::<Phenopacket>("{\"id\": \"x\", "), Err(DecodeError::Json(_))));
}

#[test]
fn test_mismatched_bytes() {
    let family_bytes = to_binary(&bethlem_family()).unwrap();
    assert!(from_binary::<Phenopacket>(&family_bytes).is_err());

    let phenopacket_bytes = to_binary(&urothelial_carcinoma()).unwrap();
    assert!(from_binary::<Family>(&phenopacket_bytes).is_err());

    let family_json = to_json(&bethlem_family()).unwrap();
    assert!(from_json::<Phenopacket>(&family_json).is_err());
}

#[test]
fn test_malformed_values_rejected_at_decode() {
    let good = r#"{"id": "p1", "subject": {"id": "patient1",
                   "timeAtLastEncounter": {"age": {"iso8601duration": "P14Y"}}}}"#;
    let decoded: Phenopacket = from_json(good).unwrap();
    let age = decoded.subject().and_then(|subject| subject.time_at_last_encounter())
        .and_then(|time| time.age());
    assert_eq!(age, Some(&Age::iso8601("P14Y").unwrap()));

    let bad_duration = good.replace("P14Y", "fourteen years");
    assert!(from_json::<Phenopacket>(&bad_duration).is_err());

    let missing_id = r#"{"subject": {"id": "patient1"}}"#;
    assert!(from_json::<Phenopacket>(missing_id).is_err());

    let reversed_interval = r#"{"sequenceId": "NM_001848.2",
                                "sequenceInterval": {"start": 877, "end": 876}}"#;
    assert!(from_json::<SequenceLocation>(reversed_interval).is_err());

    let bad_timestamp = r#""1964-03-15 midnight""#;
    assert!(from_json::<Timestamp>(bad_timestamp).is_err());
}

#[test]
fn test_timestamp_encodings() {
    let timestamp = test_timestamp();

    assert_eq!(to_json(&timestamp).unwrap(), r#""2019-03-01T00:00:00.123Z""#);

    let decoded: Timestamp = from_binary(&to_binary(&timestamp).unwrap()).unwrap();
    assert_eq!(decoded.seconds(), 1_551_398_400);
    assert_eq!(decoded.nanos(), 123_000_000);

    for seconds in [MIN_TIMESTAMP_SECONDS, MAX_TIMESTAMP_SECONDS] {
        let timestamp = Timestamp::new(seconds, 0).unwrap();
        let from_js: Timestamp = from_json(&to_json(&timestamp).unwrap()).unwrap();
        assert_eq!(from_js, timestamp);
        let from_bin: Timestamp = from_binary(&to_binary(&timestamp).unwrap()).unwrap();
        assert_eq!(from_bin, timestamp);
    }

    assert!(from_json::<Timestamp>(r#""+10000-01-01T00:00:00Z""#).is_err());
}

#[test]
fn test_file_round_trips() {
    let dir = tempfile::tempdir().unwrap();
    let family = bethlem_family();

    for file_name in ["family.json", "family.pb", "family.json.zst", "family.bin.gz",
                      "family.msgpack.zst"] {
        let path = dir.path().join(file_name);

        write_file(&family, &path).unwrap();
        let decoded: Family = read_file(&path).unwrap();

        assert_eq!(decoded, family, "round trip through {}", file_name);
    }

    let compressed = std::fs::metadata(dir.path().join("family.json.zst")).unwrap().len();
    let uncompressed = std::fs::metadata(dir.path().join("family.json")).unwrap().len();
    assert!(compressed < uncompressed);
}

#[test]
fn test_read_file_errors() {
    let dir = tempfile::tempdir().unwrap();

    let missing = dir.path().join("missing.json");
    assert!(read_file::<Phenopacket>(&missing).is_err());

    let wrong_format = dir.path().join("packet.pb");
    std::fs::write(&wrong_format, to_json(&urothelial_carcinoma()).unwrap()).unwrap();
    let err = read_file::<Phenopacket>(&wrong_format).unwrap_err();
    assert!(format!("{:#}", err).contains("failed to decode"));

    let unknown_extension = dir.path().join("packet.txt");
    assert!(write_file(&urothelial_carcinoma(), &unknown_extension).is_err());
    assert!(!unknown_extension.exists());

    assert_eq!(codec::file_format(&dir.path().join("packet.msgpack.gz")).unwrap(),
               (codec::FileFormat::Binary, codec::Compression::Gzip));
}

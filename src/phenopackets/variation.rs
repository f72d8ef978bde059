use std::fmt::{self, Display};

use serde_with::skip_serializing_none;

use flexstr::SharedStr as FlexStr;

use crate::error::BuildError;
use crate::ontology::{OntologyClass, OntologyTerms};
use crate::types::*;
use crate::utils::required;

#[derive(Deserialize)]
struct SequenceIntervalFields {
    start: u64,
    end: u64,
}

// Interbase coordinates: the 877G>A substitution in NM_001848.2 is 876..877
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[serde(try_from = "SequenceIntervalFields")]
pub struct SequenceInterval {
    start: u64,
    end: u64,
}

impl SequenceInterval {
    pub fn new(start: u64, end: u64) -> Result<SequenceInterval, BuildError> {
        if end < start {
            return Err(BuildError::InvalidValue {
                entity: "SequenceInterval",
                field: "end",
                reason: format!("{} is less than the start {}", end, start),
            });
        }
        Ok(SequenceInterval { start, end })
    }

    pub fn start(&self) -> u64 {
        self.start
    }

    pub fn end(&self) -> u64 {
        self.end
    }

    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> u64 {
        self.end - self.start
    }
}

impl TryFrom<SequenceIntervalFields> for SequenceInterval {
    type Error = BuildError;

    fn try_from(fields: SequenceIntervalFields) -> Result<SequenceInterval, BuildError> {
        SequenceInterval::new(fields.start, fields.end)
    }
}

impl Display for SequenceInterval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

#[skip_serializing_none]
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub struct SequenceLocation {
    id: Option<FlexStr>,
    sequence_id: SequenceId,
    sequence_interval: SequenceInterval,
}

impl SequenceLocation {
    pub fn new(sequence_id: impl Into<SequenceId>, sequence_interval: SequenceInterval)
               -> SequenceLocation
    {
        SequenceLocation {
            id: None,
            sequence_id: sequence_id.into(),
            sequence_interval,
        }
    }

    pub fn with_id(mut self, id: impl Into<FlexStr>) -> SequenceLocation {
        self.id = Some(id.into());
        self
    }

    pub fn id(&self) -> Option<&str> {
        self.id.as_ref().map(|id| id.as_ref())
    }

    pub fn sequence_id(&self) -> &str {
        self.sequence_id.as_ref()
    }

    pub fn sequence_interval(&self) -> SequenceInterval {
        self.sequence_interval
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Hash)]
pub struct LiteralSequenceExpression {
    sequence: FlexStr,
}

impl LiteralSequenceExpression {
    pub fn new(sequence: impl Into<FlexStr>) -> LiteralSequenceExpression {
        LiteralSequenceExpression {
            sequence: sequence.into(),
        }
    }

    pub fn sequence(&self) -> &str {
        self.sequence.as_ref()
    }
}

// The state of a sequence at a location, eg. "A" at NM_001848.2:876..877
#[skip_serializing_none]
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub struct Allele {
    id: Option<FlexStr>,
    sequence_location: SequenceLocation,
    literal_sequence_expression: LiteralSequenceExpression,
}

impl Allele {
    pub fn new(sequence_location: SequenceLocation,
               literal_sequence_expression: LiteralSequenceExpression) -> Allele {
        Allele {
            id: None,
            sequence_location,
            literal_sequence_expression,
        }
    }

    pub fn with_id(mut self, id: impl Into<FlexStr>) -> Allele {
        self.id = Some(id.into());
        self
    }

    pub fn id(&self) -> Option<&str> {
        self.id.as_ref().map(|id| id.as_ref())
    }

    pub fn sequence_location(&self) -> &SequenceLocation {
        &self.sequence_location
    }

    pub fn literal_sequence_expression(&self) -> &LiteralSequenceExpression {
        &self.literal_sequence_expression
    }
}

impl Display for Allele {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.sequence_location.sequence_id,
               self.sequence_location.sequence_interval,
               self.literal_sequence_expression.sequence)
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub enum Variation {
    Allele(Allele),
}

impl Variation {
    pub fn allele(&self) -> Option<&Allele> {
        match *self {
            Variation::Allele(ref allele) => Some(allele),
        }
    }
}

impl From<Allele> for Variation {
    fn from(allele: Allele) -> Variation {
        Variation::Allele(allele)
    }
}

#[skip_serializing_none]
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub struct GeneDescriptor {
    // eg. HGNC:2211
    value_id: FlexStr,
    symbol: GeneSymbol,
    description: Option<FlexStr>,
    #[serde(skip_serializing_if="Vec::is_empty", default)]
    alternate_ids: Vec<FlexStr>,
}

impl GeneDescriptor {
    pub fn new(value_id: impl Into<FlexStr>, symbol: impl Into<GeneSymbol>) -> GeneDescriptor {
        GeneDescriptor {
            value_id: value_id.into(),
            symbol: symbol.into(),
            description: None,
            alternate_ids: vec![],
        }
    }

    pub fn with_description(mut self, description: impl Into<FlexStr>) -> GeneDescriptor {
        self.description = Some(description.into());
        self
    }

    pub fn add_alternate_id(mut self, alternate_id: impl Into<FlexStr>) -> GeneDescriptor {
        self.alternate_ids.push(alternate_id.into());
        self
    }

    pub fn value_id(&self) -> &str {
        self.value_id.as_ref()
    }

    pub fn symbol(&self) -> &str {
        self.symbol.as_ref()
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_ref().map(|description| description.as_ref())
    }

    pub fn alternate_ids(&self) -> &[FlexStr] {
        &self.alternate_ids
    }
}

#[skip_serializing_none]
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct VariationDescriptor {
    id: VariantId,
    variation: Variation,
    label: Option<FlexStr>,
    description: Option<FlexStr>,
    gene_context: Option<GeneDescriptor>,
    vrs_ref_allele_seq: Option<FlexStr>,
    // zygosity, eg. GENO:0000135 "heterozygous"
    allelic_state: Option<OntologyClass>,
}

impl VariationDescriptor {
    pub fn builder() -> VariationDescriptorBuilder {
        VariationDescriptorBuilder::default()
    }

    pub fn id(&self) -> &str {
        self.id.as_ref()
    }

    pub fn variation(&self) -> &Variation {
        &self.variation
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_ref().map(|label| label.as_ref())
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_ref().map(|description| description.as_ref())
    }

    pub fn gene_context(&self) -> Option<&GeneDescriptor> {
        self.gene_context.as_ref()
    }

    pub fn vrs_ref_allele_seq(&self) -> Option<&str> {
        self.vrs_ref_allele_seq.as_ref().map(|seq| seq.as_ref())
    }

    pub fn allelic_state(&self) -> Option<&OntologyClass> {
        self.allelic_state.as_ref()
    }
}

impl OntologyTerms for VariationDescriptor {
    fn collect_terms<'a>(&'a self, terms: &mut Vec<&'a OntologyClass>) {
        self.allelic_state.collect_terms(terms);
    }
}

#[derive(Default, Clone, Debug)]
pub struct VariationDescriptorBuilder {
    id: Option<VariantId>,
    variation: Option<Variation>,
    label: Option<FlexStr>,
    description: Option<FlexStr>,
    gene_context: Option<GeneDescriptor>,
    vrs_ref_allele_seq: Option<FlexStr>,
    allelic_state: Option<OntologyClass>,
}

impl VariationDescriptorBuilder {
    pub fn id(mut self, id: impl Into<VariantId>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn variation(mut self, variation: impl Into<Variation>) -> Self {
        self.variation = Some(variation.into());
        self
    }

    pub fn label(mut self, label: impl Into<FlexStr>) -> Self {
        self.label = Some(label.into());
        self
    }

    // setting the description again replaces it
    pub fn description(mut self, description: impl Into<FlexStr>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn gene_context(mut self, gene_context: GeneDescriptor) -> Self {
        self.gene_context = Some(gene_context);
        self
    }

    pub fn vrs_ref_allele_seq(mut self, seq: impl Into<FlexStr>) -> Self {
        self.vrs_ref_allele_seq = Some(seq.into());
        self
    }

    pub fn allelic_state(mut self, allelic_state: OntologyClass) -> Self {
        self.allelic_state = Some(allelic_state);
        self
    }

    pub fn build(self) -> Result<VariationDescriptor, BuildError> {
        Ok(VariationDescriptor {
            id: required(self.id, "VariationDescriptor", "id")?,
            variation: required(self.variation, "VariationDescriptor", "variation")?,
            label: self.label,
            description: self.description,
            gene_context: self.gene_context,
            vrs_ref_allele_seq: self.vrs_ref_allele_seq,
            allelic_state: self.allelic_state,
        })
    }
}

#[cfg(test)]
fn col6a1_allele() -> Allele {
    let interval = SequenceInterval::new(876, 877).unwrap();
    Allele::new(SequenceLocation::new("NM_001848.2", interval),
                LiteralSequenceExpression::new("A"))
}

#[test]
fn test_variation_descriptor() {
    let descriptor = VariationDescriptor::builder()
        .id("id:1")
        .variation(col6a1_allele())
        .description("NM_001848.2:c.877G>A")
        .gene_context(GeneDescriptor::new("HGNC:2211", "COL6A1"))
        .vrs_ref_allele_seq("G")
        .description("Heterozygous 877G>A transition in COL6A1")
        .build()
        .unwrap();

    assert_eq!(descriptor.description(), Some("Heterozygous 877G>A transition in COL6A1"));
    assert_eq!(descriptor.gene_context().map(GeneDescriptor::symbol), Some("COL6A1"));

    let allele = descriptor.variation().allele().unwrap();
    assert_eq!(allele.sequence_location().sequence_interval().len(), 1);
    assert_eq!(allele.to_string(), "NM_001848.2:876..877:A");
}

#[test]
fn test_variation_descriptor_requires_variation() {
    assert_eq!(VariationDescriptor::builder().id("id:1").build(),
               Err(BuildError::MissingRequiredField {
                   entity: "VariationDescriptor",
                   field: "variation",
               }));
}

#[test]
fn test_reversed_interval() {
    assert!(SequenceInterval::new(877, 876).is_err());
    assert!(SequenceInterval::new(876, 876).is_ok());
}

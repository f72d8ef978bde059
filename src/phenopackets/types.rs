use flexstr::SharedStr as FlexStr;

pub type Curie = FlexStr;
pub type NamespacePrefix = FlexStr;
pub type Label = FlexStr;

pub type PhenopacketId = FlexStr;
pub type FamilyId = FlexStr;
pub type IndividualId = FlexStr;
pub type BiosampleId = FlexStr;
pub type ResourceId = FlexStr;
pub type VariantId = FlexStr;

pub type SequenceId = FlexStr;
pub type GeneSymbol = FlexStr;

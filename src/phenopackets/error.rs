use std::fmt;

use itertools::Itertools;

use flexstr::SharedStr as FlexStr;

use crate::pedigree::ParentRole;
use crate::types::*;

// Returned by the builders.  Construction errors fail fast: the first problem
// found in an entity is reported.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BuildError {
    #[error("{entity}: missing required field \"{field}\"")]
    MissingRequiredField {
        entity: &'static str,
        field: &'static str,
    },

    #[error("{entity}: invalid value for \"{field}\": {reason}")]
    InvalidValue {
        entity: &'static str,
        field: &'static str,
        reason: String,
    },

    #[error(transparent)]
    MalformedDuration(#[from] MalformedDurationError),
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("malformed ISO-8601 duration: \"{value}\"")]
pub struct MalformedDurationError {
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("CURIEs with undeclared namespace prefixes: {}", .curies.iter().join(", "))]
pub struct UnknownNamespaceError {
    pub curies: Vec<Curie>,
}

// One referential integrity problem found by the validator
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Violation {
    #[error("{container_id}: no metadata, ontology namespaces can't be checked")]
    MissingMetaData { container_id: FlexStr },

    #[error("biosample {biosample_id} refers to unknown individual {individual_id}")]
    UnknownBiosampleIndividual {
        biosample_id: BiosampleId,
        individual_id: IndividualId,
    },

    #[error("biosample id {biosample_id} is used more than once")]
    DuplicateBiosampleId { biosample_id: BiosampleId },

    #[error("pedigree member {individual_id} is not the proband or a relative")]
    UnknownPedigreeMember { individual_id: IndividualId },

    #[error("pedigree member {individual_id} is listed more than once")]
    DuplicatePedigreeMember { individual_id: IndividualId },

    #[error("{role} {parent_id} of {individual_id} is not in the pedigree")]
    UnknownParent {
        individual_id: IndividualId,
        parent_id: IndividualId,
        role: ParentRole,
    },

    #[error("{role} {parent_id} of {individual_id} has an inconsistent sex")]
    ParentSexMismatch {
        individual_id: IndividualId,
        parent_id: IndividualId,
        role: ParentRole,
    },

    #[error("pedigree cycle: {}", .individual_ids.iter().join(" -> "))]
    PedigreeCycle { individual_ids: Vec<IndividualId> },

    #[error("{container_id}: excluded feature {feature_type} has no evidence")]
    NegatedFeatureWithoutEvidence { container_id: FlexStr, feature_type: Curie },

    #[error("malformed CURIE: \"{curie}\"")]
    MalformedCurie { curie: Curie },

    #[error("{curie}: namespace {prefix} is not declared in the metadata resources")]
    UnknownNamespace { curie: Curie, prefix: NamespacePrefix },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub violations: Vec<Violation>,
}

impl ValidationError {
    pub fn len(&self) -> usize {
        self.violations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.violations.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Violation> {
        self.violations.iter()
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} validation error(s)", self.violations.len())?;
        for violation in &self.violations {
            write!(f, "\n  {}", violation)?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationError {}

#[derive(Debug, thiserror::Error)]
pub enum EncodeError {
    #[error("binary encoding failed: {0}")]
    Binary(#[from] rmp_serde::encode::Error),

    #[error("JSON encoding failed: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    #[error("binary decoding failed: {0}")]
    Binary(#[from] rmp_serde::decode::Error),

    #[error("JSON decoding failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{count} trailing byte(s) after the encoded value")]
    TrailingBytes { count: usize },
}

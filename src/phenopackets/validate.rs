use std::collections::HashSet;

use itertools::Itertools;

use tracing::{debug, info, warn};

use crate::config::ValidationConfig;
use crate::error::{UnknownNamespaceError, ValidationError, Violation};
use crate::meta_data::MetaData;
use crate::ontology::{namespace_prefix, OntologyTerms};
use crate::pedigree::{ParentRole, Pedigree};
use crate::phenopacket::{Family, Phenopacket};
use crate::types::*;
use crate::utils::join;

// Check a standalone phenopacket.  Every violation found is returned, not
// just the first.
pub fn validate_phenopacket(phenopacket: &Phenopacket, config: &ValidationConfig)
                            -> Result<(), ValidationError>
{
    debug!("validating phenopacket {}", phenopacket.id());

    let mut violations = vec![];

    if config.check_references {
        let subject_ids: Vec<&IndividualId> =
            phenopacket.subject().map(|subject| subject.id_flex()).into_iter().collect();
        biosample_violations(phenopacket, &subject_ids, &mut violations);
    }

    if config.check_namespaces {
        match phenopacket.meta_data() {
            Some(meta_data) => {
                namespace_violations(phenopacket, &[meta_data], config, &mut violations);
            },
            None => {
                violations.push(Violation::MissingMetaData {
                    container_id: phenopacket.id().into(),
                });
            },
        }
    }

    negated_evidence_violations(phenopacket, config, &mut violations);

    finish(phenopacket.id(), violations)
}

// Check a family: biosamples of every member against the subjects of the
// proband and relatives, the pedigree, and the ontology terms against the
// family metadata plus any metadata of the members.
pub fn validate_family(family: &Family, config: &ValidationConfig)
                       -> Result<(), ValidationError>
{
    debug!("validating family {} with {} relatives", family.id(), family.relatives().len());

    let mut violations = vec![];
    let member_ids = family.member_ids();

    if config.check_references {
        for phenopacket in family.members() {
            biosample_violations(phenopacket, &member_ids, &mut violations);
        }
    }

    if config.check_pedigree {
        if let Some(pedigree) = family.pedigree() {
            pedigree_violations(pedigree, &member_ids, &mut violations);
        }
    }

    if config.check_namespaces {
        namespace_violations(family, &family.all_meta_data(), config, &mut violations);
    }

    for phenopacket in family.members() {
        negated_evidence_violations(phenopacket, config, &mut violations);
    }

    finish(family.id(), violations)
}

// The namespace check on its own: returns the CURIEs whose prefix isn't
// declared by a Resource in any of the meta_data, or that aren't CURIEs.
pub fn check_namespaces<T>(container: &T, meta_data: &[&MetaData], config: &ValidationConfig)
                           -> Result<(), UnknownNamespaceError>
    where T: OntologyTerms + ?Sized
{
    let mut violations = vec![];
    namespace_violations(container, meta_data, config, &mut violations);

    let curies: Vec<Curie> = violations.into_iter()
        .filter_map(|violation| match violation {
            Violation::UnknownNamespace { curie, .. } |
            Violation::MalformedCurie { curie } => Some(curie),
            _ => None,
        })
        .collect();

    if curies.is_empty() {
        Ok(())
    } else {
        Err(UnknownNamespaceError { curies })
    }
}

fn finish(container_id: &str, violations: Vec<Violation>) -> Result<(), ValidationError> {
    if violations.is_empty() {
        info!("{}: valid", container_id);
        Ok(())
    } else {
        warn!("{}: {} violation(s)", container_id, violations.len());
        for violation in &violations {
            debug!("  {}", violation);
        }
        Err(ValidationError { violations })
    }
}

fn biosample_violations(phenopacket: &Phenopacket, known_individual_ids: &[&IndividualId],
                        violations: &mut Vec<Violation>)
{
    let mut seen_ids: HashSet<&str> = HashSet::new();
    let mut reported_duplicates: HashSet<&str> = HashSet::new();

    for biosample in phenopacket.biosamples() {
        if !seen_ids.insert(biosample.id()) && reported_duplicates.insert(biosample.id()) {
            violations.push(Violation::DuplicateBiosampleId {
                biosample_id: biosample.id_flex().clone(),
            });
        }

        let Some(individual_id) = biosample.individual_id_flex()
        else {
            continue;
        };

        if !known_individual_ids.contains(&individual_id) {
            violations.push(Violation::UnknownBiosampleIndividual {
                biosample_id: biosample.id_flex().clone(),
                individual_id: individual_id.clone(),
            });
        }
    }
}

fn pedigree_violations(pedigree: &Pedigree, member_ids: &[&IndividualId],
                       violations: &mut Vec<Violation>)
{
    let duplicate_ids = pedigree.persons().iter()
        .map(|person| person.individual_id_flex())
        .duplicates();

    for individual_id in duplicate_ids {
        violations.push(Violation::DuplicatePedigreeMember {
            individual_id: individual_id.clone(),
        });
    }

    for person in pedigree.persons() {
        let individual_id = person.individual_id_flex();

        if !member_ids.contains(&individual_id) {
            violations.push(Violation::UnknownPedigreeMember {
                individual_id: individual_id.clone(),
            });
        }

        for role in [ParentRole::Mother, ParentRole::Father] {
            let Some(parent_id) = person.parent_id(role)
            else {
                continue;
            };

            match pedigree.person(parent_id.as_ref()) {
                None => {
                    violations.push(Violation::UnknownParent {
                        individual_id: individual_id.clone(),
                        parent_id: parent_id.clone(),
                        role,
                    });
                },
                Some(parent) => {
                    if parent.sex() == role.conflicting_sex() {
                        violations.push(Violation::ParentSexMismatch {
                            individual_id: individual_id.clone(),
                            parent_id: parent_id.clone(),
                            role,
                        });
                    }
                },
            }
        }
    }

    for cycle in pedigree.cycles() {
        debug!("pedigree cycle: {}", join(&cycle, " -> "));
        violations.push(Violation::PedigreeCycle { individual_ids: cycle });
    }
}

fn namespace_violations<T>(container: &T, meta_data: &[&MetaData], config: &ValidationConfig,
                           violations: &mut Vec<Violation>)
    where T: OntologyTerms + ?Sized
{
    let declared_prefixes: HashSet<&str> = meta_data.iter()
        .copied()
        .flat_map(MetaData::namespace_prefixes)
        .chain(config.implicit_namespaces.iter().map(|prefix| -> &str { prefix.as_ref() }))
        .collect();

    let terms = container.ontology_terms();

    for term in terms.into_iter().unique_by(|term| term.curie().clone()) {
        match namespace_prefix(term.id(), config.allow_obo_style_curies) {
            Some(prefix) => {
                if !declared_prefixes.contains(prefix) {
                    violations.push(Violation::UnknownNamespace {
                        curie: term.curie().clone(),
                        prefix: prefix.into(),
                    });
                }
            },
            None => {
                violations.push(Violation::MalformedCurie {
                    curie: term.curie().clone(),
                });
            },
        }
    }
}

// An excluded phenotype should cite what it was excluded on.  Features of
// the biosamples count too.
fn negated_evidence_violations(phenopacket: &Phenopacket, config: &ValidationConfig,
                               violations: &mut Vec<Violation>)
{
    let features = phenopacket.phenotypic_features().iter()
        .chain(phenopacket.biosamples().iter()
               .flat_map(|biosample| biosample.phenotypic_features()));

    for feature in features {
        if !feature.is_negated() || !feature.evidence().is_empty() {
            continue;
        }

        warn!("{}: excluded feature {} has no evidence", phenopacket.id(),
              feature.feature_type().id());

        if config.require_negated_evidence {
            violations.push(Violation::NegatedFeatureWithoutEvidence {
                container_id: phenopacket.id().into(),
                feature_type: feature.feature_type().curie().clone(),
            });
        }
    }
}

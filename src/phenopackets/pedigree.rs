use std::collections::{HashMap, HashSet, VecDeque};
use std::fmt::{self, Display};

use serde_with::skip_serializing_none;

use flexstr::SharedStr as FlexStr;

use crate::error::BuildError;
use crate::individual::Sex;
use crate::types::*;
use crate::utils::{parent_id_is_set, required};

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AffectedStatus {
    #[default]
    Missing,
    Unaffected,
    Affected,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ParentRole {
    Mother,
    Father,
}

impl ParentRole {
    // the sex a parent in this role can't have
    pub fn conflicting_sex(&self) -> Sex {
        match *self {
            ParentRole::Mother => Sex::Male,
            ParentRole::Father => Sex::Female,
        }
    }
}

impl Display for ParentRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            ParentRole::Mother => write!(f, "mother"),
            ParentRole::Father => write!(f, "father"),
        }
    }
}

// A member of a pedigree.  The parent ids refer to other Persons in the same
// pedigree by individual id.
#[skip_serializing_none]
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Person {
    family_id: Option<FamilyId>,
    individual_id: IndividualId,
    paternal_id: Option<IndividualId>,
    maternal_id: Option<IndividualId>,
    sex: Option<Sex>,
    affected_status: Option<AffectedStatus>,
}

fn set_parent_id(parent_id: &Option<IndividualId>) -> Option<&IndividualId> {
    parent_id.as_ref().filter(|parent_id| parent_id_is_set(parent_id.as_ref()))
}

impl Person {
    pub fn builder() -> PersonBuilder {
        PersonBuilder::default()
    }

    pub fn family_id(&self) -> Option<&str> {
        self.family_id.as_ref().map(|family_id| family_id.as_ref())
    }

    pub fn individual_id(&self) -> &str {
        self.individual_id.as_ref()
    }

    // "0" and "" are read as "no father"
    pub fn paternal_id(&self) -> Option<&str> {
        set_parent_id(&self.paternal_id).map(|parent_id| parent_id.as_ref())
    }

    pub fn maternal_id(&self) -> Option<&str> {
        set_parent_id(&self.maternal_id).map(|parent_id| parent_id.as_ref())
    }

    pub fn sex(&self) -> Sex {
        self.sex.unwrap_or_default()
    }

    pub fn affected_status(&self) -> AffectedStatus {
        self.affected_status.unwrap_or_default()
    }

    pub fn is_affected(&self) -> bool {
        self.affected_status() == AffectedStatus::Affected
    }

    pub fn parent_id(&self, role: ParentRole) -> Option<&IndividualId> {
        match role {
            ParentRole::Mother => set_parent_id(&self.maternal_id),
            ParentRole::Father => set_parent_id(&self.paternal_id),
        }
    }

    pub(crate) fn individual_id_flex(&self) -> &IndividualId {
        &self.individual_id
    }
}

#[derive(Default, Clone, Debug)]
pub struct PersonBuilder {
    family_id: Option<FamilyId>,
    individual_id: Option<IndividualId>,
    paternal_id: Option<IndividualId>,
    maternal_id: Option<IndividualId>,
    sex: Option<Sex>,
    affected_status: Option<AffectedStatus>,
}

impl PersonBuilder {
    pub fn family_id(mut self, family_id: impl Into<FamilyId>) -> Self {
        self.family_id = Some(family_id.into());
        self
    }

    pub fn individual_id(mut self, individual_id: impl Into<IndividualId>) -> Self {
        self.individual_id = Some(individual_id.into());
        self
    }

    pub fn paternal_id(mut self, paternal_id: impl Into<IndividualId>) -> Self {
        self.paternal_id = Some(paternal_id.into());
        self
    }

    pub fn maternal_id(mut self, maternal_id: impl Into<IndividualId>) -> Self {
        self.maternal_id = Some(maternal_id.into());
        self
    }

    pub fn sex(mut self, sex: Sex) -> Self {
        self.sex = Some(sex);
        self
    }

    pub fn affected_status(mut self, affected_status: AffectedStatus) -> Self {
        self.affected_status = Some(affected_status);
        self
    }

    pub fn build(self) -> Result<Person, BuildError> {
        Ok(Person {
            family_id: self.family_id,
            individual_id: required(self.individual_id, "Person", "individual_id")?,
            paternal_id: self.paternal_id,
            maternal_id: self.maternal_id,
            sex: self.sex,
            affected_status: self.affected_status,
        })
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum VisitState {
    Unvisited,
    OnPath,
    Done,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Default)]
pub struct Pedigree {
    #[serde(skip_serializing_if="Vec::is_empty", default)]
    persons: Vec<Person>,
}

impl Pedigree {
    pub fn builder() -> PedigreeBuilder {
        PedigreeBuilder::default()
    }

    pub fn persons(&self) -> &[Person] {
        &self.persons
    }

    // the first Person with the given id
    pub fn person(&self, individual_id: &str) -> Option<&Person> {
        self.persons.iter().find(|person| person.individual_id() == individual_id)
    }

    pub fn affected(&self) -> impl Iterator<Item = &Person> {
        self.persons.iter().filter(|person| person.is_affected())
    }

    // Ids of all ancestors of individual_id that are in the pedigree,
    // nearest first.  Terminates for pedigrees with cycles.
    pub fn ancestors(&self, individual_id: &str) -> Vec<IndividualId> {
        let mut seen: HashSet<&str> = HashSet::new();
        let mut queue: VecDeque<&str> = VecDeque::new();
        let mut ancestors = vec![];

        queue.push_back(individual_id);

        while let Some(current_id) = queue.pop_front() {
            let Some(person) = self.person(current_id)
            else {
                continue;
            };

            for role in [ParentRole::Mother, ParentRole::Father] {
                if let Some(parent_id) = person.parent_id(role) {
                    if self.person(parent_id.as_ref()).is_some() &&
                        seen.insert(parent_id.as_ref()) {
                        ancestors.push(parent_id.clone());
                        queue.push_back(parent_id.as_ref());
                    }
                }
            }
        }

        ancestors
    }

    // Find parent links that make someone their own ancestor.  Each cycle
    // is returned once as a path that starts and ends with the same id.
    // Parents that aren't in the pedigree are ignored.
    pub fn cycles(&self) -> Vec<Vec<IndividualId>> {
        let mut index_of: HashMap<&str, usize> = HashMap::new();
        let mut ids: Vec<FlexStr> = vec![];

        for person in &self.persons {
            if !index_of.contains_key(person.individual_id()) {
                index_of.insert(person.individual_id(), ids.len());
                ids.push(person.individual_id_flex().clone());
            }
        }

        let mut parents: Vec<Vec<usize>> = vec![vec![]; ids.len()];

        for person in &self.persons {
            let child_idx = index_of[person.individual_id()];
            for role in [ParentRole::Mother, ParentRole::Father] {
                let Some(parent_id) = person.parent_id(role)
                else {
                    continue;
                };
                let parent_id: &str = parent_id.as_ref();
                if let Some(&parent_idx) = index_of.get(parent_id) {
                    if !parents[child_idx].contains(&parent_idx) {
                        parents[child_idx].push(parent_idx);
                    }
                }
            }
        }

        let mut state = vec![VisitState::Unvisited; ids.len()];
        let mut cycles = vec![];

        for start in 0..ids.len() {
            if state[start] != VisitState::Unvisited {
                continue;
            }

            // depth first: the node and the index of the next parent to visit
            let mut path: Vec<(usize, usize)> = vec![(start, 0)];
            state[start] = VisitState::OnPath;

            while let Some(&(node, next_parent)) = path.last() {
                if next_parent == parents[node].len() {
                    state[node] = VisitState::Done;
                    path.pop();
                    continue;
                }

                if let Some(top) = path.last_mut() {
                    top.1 += 1;
                }

                let parent = parents[node][next_parent];

                match state[parent] {
                    VisitState::Unvisited => {
                        state[parent] = VisitState::OnPath;
                        path.push((parent, 0));
                    },
                    VisitState::OnPath => {
                        let cycle_start = path.iter()
                            .position(|&(path_node, _)| path_node == parent)
                            .unwrap_or(0);
                        let mut cycle: Vec<IndividualId> = path[cycle_start..].iter()
                            .map(|&(path_node, _)| ids[path_node].clone())
                            .collect();
                        cycle.push(ids[parent].clone());
                        cycles.push(cycle);
                    },
                    VisitState::Done => (),
                }
            }
        }

        cycles
    }
}

#[derive(Default, Clone, Debug)]
pub struct PedigreeBuilder {
    persons: Vec<Person>,
}

impl PedigreeBuilder {
    pub fn add_person(mut self, person: Person) -> Self {
        self.persons.push(person);
        self
    }

    pub fn add_all_persons(mut self, persons: impl IntoIterator<Item = Person>) -> Self {
        self.persons.extend(persons);
        self
    }

    pub fn build(self) -> Pedigree {
        Pedigree {
            persons: self.persons,
        }
    }
}

#[cfg(test)]
fn make_person(id: &str, mother: Option<&str>, father: Option<&str>) -> Person {
    let mut builder = Person::builder().individual_id(id);
    if let Some(mother) = mother {
        builder = builder.maternal_id(mother);
    }
    if let Some(father) = father {
        builder = builder.paternal_id(father);
    }
    builder.build().unwrap()
}

#[cfg(test)]
fn id_strings(ids: &[IndividualId]) -> Vec<String> {
    ids.iter().map(|id| id.to_string()).collect()
}

#[test]
fn test_trio() {
    let pedigree = Pedigree::builder()
        .add_person(make_person("PROBAND", Some("MOTHER"), Some("FATHER")))
        .add_person(make_person("MOTHER", Some("GRANDMOTHER"), Some("0")))
        .add_person(make_person("FATHER", None, None))
        .add_person(make_person("GRANDMOTHER", None, None))
        .build();

    assert!(pedigree.cycles().is_empty());
    assert_eq!(id_strings(&pedigree.ancestors("PROBAND")),
               vec!["MOTHER", "FATHER", "GRANDMOTHER"]);
    assert!(pedigree.ancestors("GRANDMOTHER").is_empty());
    assert_eq!(pedigree.person("MOTHER").and_then(Person::paternal_id), None);
}

#[test]
fn test_two_person_cycle() {
    let pedigree = Pedigree::builder()
        .add_person(make_person("A", None, Some("B")))
        .add_person(make_person("B", None, Some("A")))
        .build();

    let cycles = pedigree.cycles();
    assert_eq!(cycles.len(), 1);
    assert_eq!(id_strings(&cycles[0]), vec!["A", "B", "A"]);

    // terminates
    assert_eq!(id_strings(&pedigree.ancestors("A")), vec!["B", "A"]);
}

#[test]
fn test_own_parent() {
    let pedigree = Pedigree::builder()
        .add_person(make_person("A", Some("A"), None))
        .build();

    assert_eq!(pedigree.cycles().iter().map(|cycle| id_strings(cycle)).collect::<Vec<_>>(),
               vec![vec!["A".to_owned(), "A".to_owned()]]);
}

#[test]
fn test_longer_cycle_with_tail() {
    // D -> A -> B -> C -> A
    let pedigree = Pedigree::builder()
        .add_person(make_person("D", Some("A"), None))
        .add_person(make_person("A", Some("B"), None))
        .add_person(make_person("B", None, Some("C")))
        .add_person(make_person("C", Some("A"), Some("UNKNOWN")))
        .build();

    let cycles = pedigree.cycles();
    assert_eq!(cycles.len(), 1);
    assert_eq!(id_strings(&cycles[0]), vec!["A", "B", "C", "A"]);
}

#[test]
fn test_person_without_individual_id() {
    assert_eq!(Person::builder().sex(Sex::Female).build(),
               Err(BuildError::MissingRequiredField { entity: "Person", field: "individual_id" }));
}

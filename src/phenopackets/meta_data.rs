use std::collections::HashSet;

use itertools::Itertools;
use serde::{Deserialize, Deserializer};

use serde_with::skip_serializing_none;

use flexstr::SharedStr as FlexStr;

use crate::constants::PHENOPACKET_SCHEMA_VERSION;
use crate::error::BuildError;
use crate::evidence::ExternalReference;
use crate::ontology::namespace_prefix;
use crate::time::Timestamp;
use crate::types::*;
use crate::utils::required;

// An ontology (or other vocabulary) that CURIEs in a phenopacket may use.
// namespace_prefix is the part of the CURIE before the colon, eg. "HP".
#[skip_serializing_none]
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub struct Resource {
    id: ResourceId,
    name: FlexStr,
    namespace_prefix: NamespacePrefix,
    url: Option<FlexStr>,
    version: Option<FlexStr>,
    iri_prefix: Option<FlexStr>,
}

impl Resource {
    pub fn builder() -> ResourceBuilder {
        ResourceBuilder::default()
    }

    pub fn id(&self) -> &str {
        self.id.as_ref()
    }

    pub fn name(&self) -> &str {
        self.name.as_ref()
    }

    pub fn namespace_prefix(&self) -> &str {
        self.namespace_prefix.as_ref()
    }

    pub fn url(&self) -> Option<&str> {
        self.url.as_ref().map(|url| url.as_ref())
    }

    pub fn version(&self) -> Option<&str> {
        self.version.as_ref().map(|version| version.as_ref())
    }

    pub fn iri_prefix(&self) -> Option<&str> {
        self.iri_prefix.as_ref().map(|iri_prefix| iri_prefix.as_ref())
    }

    // Turn a CURIE from this resource into an IRI, eg. HP:0001558 ->
    // http://purl.obolibrary.org/obo/HP_0001558
    pub fn expand(&self, curie: &str) -> Option<String> {
        let iri_prefix = self.iri_prefix()?;
        let prefix = namespace_prefix(curie, true)?;

        if prefix != self.namespace_prefix() {
            return None;
        }

        let local = &curie[prefix.len() + 1..];
        Some(format!("{}{}", iri_prefix, local))
    }
}

#[derive(Default, Clone, Debug)]
pub struct ResourceBuilder {
    id: Option<ResourceId>,
    name: Option<FlexStr>,
    namespace_prefix: Option<NamespacePrefix>,
    url: Option<FlexStr>,
    version: Option<FlexStr>,
    iri_prefix: Option<FlexStr>,
}

impl ResourceBuilder {
    pub fn id(mut self, id: impl Into<ResourceId>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn name(mut self, name: impl Into<FlexStr>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn namespace_prefix(mut self, namespace_prefix: impl Into<NamespacePrefix>) -> Self {
        self.namespace_prefix = Some(namespace_prefix.into());
        self
    }

    pub fn url(mut self, url: impl Into<FlexStr>) -> Self {
        self.url = Some(url.into());
        self
    }

    pub fn version(mut self, version: impl Into<FlexStr>) -> Self {
        self.version = Some(version.into());
        self
    }

    pub fn iri_prefix(mut self, iri_prefix: impl Into<FlexStr>) -> Self {
        self.iri_prefix = Some(iri_prefix.into());
        self
    }

    pub fn build(self) -> Result<Resource, BuildError> {
        Ok(Resource {
            id: required(self.id, "Resource", "id")?,
            name: required(self.name, "Resource", "name")?,
            namespace_prefix: required(self.namespace_prefix, "Resource", "namespace_prefix")?,
            url: self.url,
            version: self.version,
            iri_prefix: self.iri_prefix,
        })
    }
}

#[skip_serializing_none]
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Update {
    timestamp: Timestamp,
    updated_by: Option<FlexStr>,
    comment: Option<FlexStr>,
}

impl Update {
    pub fn new(timestamp: Timestamp) -> Update {
        Update {
            timestamp,
            updated_by: None,
            comment: None,
        }
    }

    pub fn with_updated_by(mut self, updated_by: impl Into<FlexStr>) -> Update {
        self.updated_by = Some(updated_by.into());
        self
    }

    pub fn with_comment(mut self, comment: impl Into<FlexStr>) -> Update {
        self.comment = Some(comment.into());
        self
    }

    pub fn timestamp(&self) -> Timestamp {
        self.timestamp
    }

    pub fn updated_by(&self) -> Option<&str> {
        self.updated_by.as_ref().map(|updated_by| updated_by.as_ref())
    }

    pub fn comment(&self) -> Option<&str> {
        self.comment.as_ref().map(|comment| comment.as_ref())
    }
}

// the first resource with a given id wins, as in MetaDataBuilder::add_resource()
fn deserialize_resources<'de, D>(deserializer: D) -> Result<Vec<Resource>, D::Error>
    where D: Deserializer<'de>
{
    let resources = Vec::<Resource>::deserialize(deserializer)?;
    Ok(resources.into_iter().unique_by(|resource| resource.id.clone()).collect())
}

// Who made the phenopacket and when, and the ontologies it refers to
#[skip_serializing_none]
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct MetaData {
    created: Timestamp,
    created_by: FlexStr,
    submitted_by: Option<FlexStr>,
    #[serde(skip_serializing_if="Vec::is_empty", default,
            deserialize_with="deserialize_resources")]
    resources: Vec<Resource>,
    #[serde(skip_serializing_if="Vec::is_empty", default)]
    updates: Vec<Update>,
    phenopacket_schema_version: Option<FlexStr>,
    #[serde(skip_serializing_if="Vec::is_empty", default)]
    external_references: Vec<ExternalReference>,
}

impl MetaData {
    pub fn builder() -> MetaDataBuilder {
        MetaDataBuilder {
            phenopacket_schema_version: Some(PHENOPACKET_SCHEMA_VERSION.into()),
            ..MetaDataBuilder::default()
        }
    }

    pub fn created(&self) -> Timestamp {
        self.created
    }

    pub fn created_by(&self) -> &str {
        self.created_by.as_ref()
    }

    pub fn submitted_by(&self) -> Option<&str> {
        self.submitted_by.as_ref().map(|submitted_by| submitted_by.as_ref())
    }

    pub fn resources(&self) -> &[Resource] {
        &self.resources
    }

    pub fn updates(&self) -> &[Update] {
        &self.updates
    }

    pub fn phenopacket_schema_version(&self) -> Option<&str> {
        self.phenopacket_schema_version.as_ref().map(|version| version.as_ref())
    }

    pub fn external_references(&self) -> &[ExternalReference] {
        &self.external_references
    }

    pub fn namespace_prefixes(&self) -> HashSet<&str> {
        self.resources.iter().map(Resource::namespace_prefix).collect()
    }

    pub fn resource_for_prefix(&self, prefix: &str) -> Option<&Resource> {
        self.resources.iter().find(|resource| resource.namespace_prefix() == prefix)
    }

    pub fn expand_curie(&self, curie: &str) -> Option<String> {
        let prefix = namespace_prefix(curie, true)?;
        self.resource_for_prefix(prefix)?.expand(curie)
    }
}

#[derive(Default, Clone, Debug)]
pub struct MetaDataBuilder {
    created: Option<Timestamp>,
    created_by: Option<FlexStr>,
    submitted_by: Option<FlexStr>,
    resources: Vec<Resource>,
    updates: Vec<Update>,
    phenopacket_schema_version: Option<FlexStr>,
    external_references: Vec<ExternalReference>,
}

impl MetaDataBuilder {
    pub fn created(mut self, created: Timestamp) -> Self {
        self.created = Some(created);
        self
    }

    pub fn created_by(mut self, created_by: impl Into<FlexStr>) -> Self {
        self.created_by = Some(created_by.into());
        self
    }

    pub fn submitted_by(mut self, submitted_by: impl Into<FlexStr>) -> Self {
        self.submitted_by = Some(submitted_by.into());
        self
    }

    // resources are a set keyed by id, a second resource with the same id
    // is ignored
    pub fn add_resource(mut self, resource: Resource) -> Self {
        if self.resources.iter().any(|existing| existing.id == resource.id) {
            tracing::debug!("ignoring second declaration of resource {}", resource.id);
        } else {
            self.resources.push(resource);
        }
        self
    }

    pub fn add_update(mut self, update: Update) -> Self {
        self.updates.push(update);
        self
    }

    pub fn phenopacket_schema_version(mut self, version: impl Into<FlexStr>) -> Self {
        self.phenopacket_schema_version = Some(version.into());
        self
    }

    pub fn add_external_reference(mut self, external_reference: ExternalReference) -> Self {
        self.external_references.push(external_reference);
        self
    }

    pub fn build(self) -> Result<MetaData, BuildError> {
        Ok(MetaData {
            created: required(self.created, "MetaData", "created")?,
            created_by: required(self.created_by, "MetaData", "created_by")?,
            submitted_by: self.submitted_by,
            resources: self.resources,
            updates: self.updates,
            phenopacket_schema_version: self.phenopacket_schema_version,
            external_references: self.external_references,
        })
    }
}

#[cfg(test)]
fn hp_resource() -> Resource {
    Resource::builder()
        .id("hp")
        .name("human phenotype ontology")
        .namespace_prefix("HP")
        .iri_prefix("http://purl.obolibrary.org/obo/HP_")
        .url("http://purl.obolibrary.org/obo/hp.owl")
        .version("2018-03-08")
        .build()
        .unwrap()
}

#[test]
fn test_expand_curie() {
    let meta_data = MetaData::builder()
        .created(Timestamp::now())
        .created_by("Peter R.")
        .add_resource(hp_resource())
        .build()
        .unwrap();

    assert_eq!(meta_data.expand_curie("HP:0001558"),
               Some("http://purl.obolibrary.org/obo/HP_0001558".to_owned()));
    assert_eq!(meta_data.expand_curie("NCIT:C39853"), None);
    assert_eq!(meta_data.phenopacket_schema_version(), Some(PHENOPACKET_SCHEMA_VERSION));
}

#[test]
fn test_resources_are_a_set() {
    let duplicate = Resource::builder()
        .id("hp")
        .name("another HP")
        .namespace_prefix("HP")
        .build()
        .unwrap();

    let meta_data = MetaData::builder()
        .created(Timestamp::now())
        .created_by("Peter R.")
        .add_resource(hp_resource())
        .add_resource(duplicate)
        .build()
        .unwrap();

    assert_eq!(meta_data.resources().len(), 1);
    assert_eq!(meta_data.resources()[0].name(), "human phenotype ontology");
    assert!(meta_data.namespace_prefixes().contains("HP"));

    let json = r#"{"created": "2019-03-01T00:00:00Z", "createdBy": "Peter R.",
                   "resources": [{"id": "hp", "name": "human phenotype ontology",
                                  "namespacePrefix": "HP"},
                                 {"id": "hp", "name": "another HP", "namespacePrefix": "HP"}]}"#;
    let decoded: MetaData = serde_json::from_str(json).unwrap();
    assert_eq!(decoded.resources().len(), 1);
    assert_eq!(decoded.resources()[0].name(), "human phenotype ontology");
}

#[test]
fn test_meta_data_required_fields() {
    assert_eq!(MetaData::builder().created_by("Peter R.").build(),
               Err(BuildError::MissingRequiredField { entity: "MetaData", field: "created" }));
    assert_eq!(MetaData::builder().created(Timestamp::now()).build(),
               Err(BuildError::MissingRequiredField { entity: "MetaData", field: "created_by" }));
}

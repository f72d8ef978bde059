extern crate regex;
extern crate chrono;
extern crate serde_json;
extern crate flate2;
#[macro_use] extern crate lazy_static;
#[macro_use] extern crate serde_derive;

pub mod types;
pub mod constants;
pub mod error;
pub mod utils;
pub mod ontology;
pub mod time;
pub mod evidence;
pub mod phenotype;
pub mod disease;
pub mod biosample;
pub mod individual;
pub mod pedigree;
pub mod variation;
pub mod meta_data;
pub mod phenopacket;
pub mod config;
pub mod validate;
pub mod codec;

pub use crate::error::{BuildError, DecodeError, EncodeError, MalformedDurationError,
                       UnknownNamespaceError, ValidationError, Violation};
pub use crate::ontology::{ontology_class, OntologyClass};
pub use crate::phenopacket::{Family, Phenopacket};

pub const PHENOPACKET_SCHEMA_VERSION: &str = "2.0";

// parent id used by PED files for "not in the pedigree"
pub const PED_MISSING_PARENT_ID: &str = "0";

pub const JSON_FILE_EXTENSIONS: &[&str; 1] = &["json"];
pub const BINARY_FILE_EXTENSIONS: &[&str; 3] = &["pb", "bin", "msgpack"];

pub const ZSTD_FILE_EXTENSION: &str = "zst";
pub const GZIP_FILE_EXTENSION: &str = "gz";

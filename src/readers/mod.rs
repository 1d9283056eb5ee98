pub mod metadata_reader;
pub mod sheet_reader;

pub use metadata_reader::{
    build_code_lookup, build_locality_map, build_voivodeship_map, MetadataReader,
};
pub use sheet_reader::{RawRows, SheetReader};

pub mod utils;

pub use utils::text::{URL_PATTERN, extract_url};
pub use utils::unpack::packerjs::{
    PackedOccurrence, detect, extract_first_url, occurrences, unpack, unpack_first,
};
pub use utils::unpack::unbaser::{UnbaseError, Unbaser};

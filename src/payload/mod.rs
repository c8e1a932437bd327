mod encode;
mod raw;
mod split;
mod types;

pub use encode::{NonFinitePolicy, encode_payload};
pub use raw::RawJson;
pub use split::{
    DATAFRAME_SPLIT_KEY, Payload, SplitFrame, build_tabular_payload, example_payload,
    parse_raw_payload,
};
pub use types::{Column, Scalar, Table};

//! Ordering and grouping of hotel records, independent of any rendering.

mod capitals;
mod grouping;
mod normalize;

pub use capitals::{capital_of, is_capital_locality};
pub use grouping::{
    Entry, GroupKey, ProvinceGroup, group_records, provinces_in_index_order, sort_records,
};
pub use normalize::{normalize, parse_stars, province_key, title_case};

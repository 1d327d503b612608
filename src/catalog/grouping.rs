use std::cmp::Reverse;

use super::normalize::normalize;
use crate::model::Record;

/// The master ordering over records: province, capital first, locality,
/// most stars first.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct GroupKey {
    province: String,
    capital: Reverse<bool>,
    locality: String,
    stars: Reverse<u32>,
}

impl GroupKey {
    pub fn of(record: &Record) -> Self {
        GroupKey {
            province: normalize(&record.fields.province),
            capital: Reverse(record.is_capital()),
            locality: normalize(&record.fields.locality),
            stars: Reverse(record.stars()),
        }
    }
}

/// Stable sort by [`GroupKey`]: records with equal keys keep input order.
pub fn sort_records(records: &mut [Record]) {
    records.sort_by_cached_key(GroupKey::of);
}

/// Atomic layout unit.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Entry<'a> {
    LocalityHeader(&'a str),
    Record(&'a Record),
}

/// One run of consecutive records sharing a province, flattened into the
/// entry stream the flow engine consumes.
#[derive(Clone, Debug, PartialEq)]
pub struct ProvinceGroup<'a> {
    pub province: &'a str,
    pub entries: Vec<Entry<'a>>,
}

impl ProvinceGroup<'_> {
    pub fn records(&self) -> impl Iterator<Item = &Record> + '_ {
        self.entries.iter().filter_map(|e| match e {
            Entry::Record(r) => Some(*r),
            Entry::LocalityHeader(_) => None,
        })
    }
}

/// Partition already-sorted records by province, then by locality. Changes
/// are detected on the raw field values in visiting order, so a locality
/// header is emitted once per run of identical localities and never
/// re-sorted independently of the master key.
pub fn group_records(sorted: &[Record]) -> Vec<ProvinceGroup<'_>> {
    let mut groups: Vec<ProvinceGroup<'_>> = Vec::new();
    let mut prev_locality: &str = "";

    for record in sorted {
        let province = record.fields.province.as_str();
        let locality = record.fields.locality.as_str();

        let same_province = groups.last().is_some_and(|g| g.province == province);
        if !same_province {
            groups.push(ProvinceGroup {
                province,
                entries: Vec::new(),
            });
            prev_locality = "";
        }
        let Some(group) = groups.last_mut() else {
            continue;
        };
        if locality != prev_locality {
            group.entries.push(Entry::LocalityHeader(locality));
            prev_locality = locality;
        }
        group.entries.push(Entry::Record(record));
    }

    groups
}

/// Unique raw province names, ordered by their normalized spelling. This is
/// the row order of the province index.
pub fn provinces_in_index_order(records: &[Record]) -> Vec<&str> {
    let mut provinces: Vec<&str> = Vec::new();
    for record in records {
        let p = record.fields.province.as_str();
        if !provinces.contains(&p) {
            provinces.push(p);
        }
    }
    provinces.sort_by_cached_key(|p| normalize(p));
    provinces
}

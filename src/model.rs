use crate::catalog::{is_capital_locality, parse_stars};

/// Raw string fields of one source row, as read from the spreadsheet.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RecordFields {
    pub province: String,
    pub locality: String,
    pub postal_code: String,
    pub name: String,
    pub classification: String,
    pub rooms: String,
    pub address: String,
    pub phone: String,
    pub website: String,
}

/// One hotel row plus the columns derived from it at load time.
#[derive(Clone, Debug, PartialEq)]
pub struct Record {
    pub fields: RecordFields,
    stars: u32,
    is_capital: bool,
}

impl Record {
    pub fn new(fields: RecordFields) -> Self {
        let stars = parse_stars(&fields.classification);
        let is_capital = is_capital_locality(&fields.province, &fields.locality);
        Record {
            fields,
            stars,
            is_capital,
        }
    }

    pub fn stars(&self) -> u32 {
        self.stars
    }

    pub fn is_capital(&self) -> bool {
        self.is_capital
    }

    /// Name used as the hotel index key.
    pub fn index_name(&self) -> &str {
        self.fields.name.trim()
    }
}

impl From<RecordFields> for Record {
    fn from(fields: RecordFields) -> Self {
        Record::new(fields)
    }
}

use super::DrawRecord;

/// Draws in strictly ascending `draw_number` order.
///
/// The ordering is checked on every push, so the last record is always the
/// most recent draw and no draw number appears twice.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DrawTable {
    records: Vec<DrawRecord>,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TableError {
    #[error("draw #{0} is already in the table")]
    DuplicateDraw(u32),
    #[error("draw #{draw_number} is out of order: table already ends at #{last}")]
    OutOfOrder { draw_number: u32, last: u32 },
}

impl DrawTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a table from records that must already be in ascending order.
    pub fn from_records(records: impl IntoIterator<Item = DrawRecord>) -> Result<Self, TableError> {
        let mut table = Self::new();
        for record in records {
            table.push(record)?;
        }
        Ok(table)
    }

    pub fn push(&mut self, record: DrawRecord) -> Result<(), TableError> {
        if self.contains(record.draw_number) {
            return Err(TableError::DuplicateDraw(record.draw_number));
        }
        if let Some(last) = self.records.last() {
            if record.draw_number < last.draw_number {
                return Err(TableError::OutOfOrder {
                    draw_number: record.draw_number,
                    last: last.draw_number,
                });
            }
        }
        self.records.push(record);
        Ok(())
    }

    pub fn contains(&self, draw_number: u32) -> bool {
        self.get(draw_number).is_some()
    }

    pub fn get(&self, draw_number: u32) -> Option<&DrawRecord> {
        self.records
            .binary_search_by_key(&draw_number, |r| r.draw_number)
            .ok()
            .and_then(|i| self.records.get(i))
    }

    pub fn last(&self) -> Option<&DrawRecord> {
        self.records.last()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, DrawRecord> {
        self.records.iter()
    }

    /// Draw numbers in `range` that have no record.
    pub fn missing_in(&self, range: std::ops::RangeInclusive<u32>) -> Vec<u32> {
        range.filter(|&n| !self.contains(n)).collect()
    }
}

impl<'a> IntoIterator for &'a DrawTable {
    type Item = &'a DrawRecord;
    type IntoIter = std::slice::Iter<'a, DrawRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

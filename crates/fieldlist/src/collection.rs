//! Ordered collections of fields.

use std::ops::{Add, Index};

use field_metadata::{MetadataRequest, MetadataResult, MetadataView};

use crate::field::Field;

/// An ordered sequence of fields.
///
/// Derived collections (selection, ordering, concatenation) hold handles to
/// the same fields; payloads are never copied.
#[derive(Debug, Clone, Default)]
pub struct FieldList {
    fields: Vec<Field>,
}

impl FieldList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_fields(fields: Vec<Field>) -> Self {
        Self { fields }
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Field> {
        self.fields.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Field> {
        self.fields.iter()
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    pub fn push(&mut self, field: Field) {
        self.fields.push(field);
    }

    /// Concatenate any number of collections in order.
    pub fn concat<I>(lists: I) -> Self
    where
        I: IntoIterator<Item = FieldList>,
    {
        lists.into_iter().flatten().collect()
    }

    /// Run a metadata query against every field, in order.
    pub fn metadata(&self, request: &MetadataRequest) -> MetadataResult<Vec<MetadataView>> {
        self.iter().map(|f| f.query_metadata(request)).collect()
    }

    /// Whether both collections hold the same field handles in the same order.
    pub fn same_fields(&self, other: &FieldList) -> bool {
        self.len() == other.len()
            && self
                .iter()
                .zip(other.iter())
                .all(|(a, b)| Field::ptr_eq(a, b))
    }
}

impl Index<usize> for FieldList {
    type Output = Field;

    fn index(&self, index: usize) -> &Field {
        &self.fields[index]
    }
}

impl FromIterator<Field> for FieldList {
    fn from_iter<I: IntoIterator<Item = Field>>(iter: I) -> Self {
        Self {
            fields: iter.into_iter().collect(),
        }
    }
}

impl Extend<Field> for FieldList {
    fn extend<I: IntoIterator<Item = Field>>(&mut self, iter: I) {
        self.fields.extend(iter);
    }
}

impl IntoIterator for FieldList {
    type Item = Field;
    type IntoIter = std::vec::IntoIter<Field>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.into_iter()
    }
}

impl<'a> IntoIterator for &'a FieldList {
    type Item = &'a Field;
    type IntoIter = std::slice::Iter<'a, Field>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.iter()
    }
}

impl Add for FieldList {
    type Output = FieldList;

    fn add(mut self, rhs: FieldList) -> FieldList {
        self.fields.extend(rhs.fields);
        self
    }
}

impl Add<&FieldList> for &FieldList {
    type Output = FieldList;

    fn add(self, rhs: &FieldList) -> FieldList {
        self.iter().chain(rhs.iter()).cloned().collect()
    }
}

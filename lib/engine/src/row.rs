use rasqal_model::Term;

/// One solution flowing through a rowsource pipeline.
///
/// The values are aligned with the variables of the rowsource that produced the row. `None`
/// marks an unbound variable. The offset is the position of the row in the output of its
/// producer.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Row {
    values: Vec<Option<Term>>,
    offset: usize,
}

impl Row {
    pub fn new(values: Vec<Option<Term>>) -> Self {
        Self { values, offset: 0 }
    }

    /// A row with `width` unbound values.
    pub fn unbound(width: usize) -> Self {
        Self::new(vec![None; width])
    }

    #[must_use]
    pub fn with_offset(mut self, offset: usize) -> Self {
        self.offset = offset;
        self
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn set_offset(&mut self, offset: usize) {
        self.offset = offset;
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// The value at `position`, or `None` if the position is unbound or out of range.
    pub fn get(&self, position: usize) -> Option<&Term> {
        self.values.get(position).and_then(Option::as_ref)
    }

    pub fn is_bound(&self, position: usize) -> bool {
        self.get(position).is_some()
    }

    /// Sets the value at `position`.
    ///
    /// # Panics
    ///
    /// Panics if `position` is out of range.
    pub fn set(&mut self, position: usize, value: Option<Term>) {
        self.values[position] = value;
    }

    pub fn push(&mut self, value: Option<Term>) {
        self.values.push(value);
    }

    pub fn values(&self) -> &[Option<Term>] {
        &self.values
    }

    pub fn into_values(self) -> Vec<Option<Term>> {
        self.values
    }
}

impl From<Vec<Option<Term>>> for Row {
    fn from(values: Vec<Option<Term>>) -> Self {
        Self::new(values)
    }
}

impl FromIterator<Option<Term>> for Row {
    fn from_iter<T: IntoIterator<Item = Option<Term>>>(iter: T) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

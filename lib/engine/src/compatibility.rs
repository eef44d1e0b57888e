//! Alignment of two variable orderings and the compatibility test for rows.

use crate::row::Row;
use crate::variables::VariableId;
use rasqal_common::CompatibilityPolicy;
use std::sync::Arc;

/// Where a variable of the combined ordering lives in the two input rows.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CompatibilitySlot {
    pub variable: VariableId,
    pub left: Option<usize>,
    pub right: Option<usize>,
}

impl CompatibilitySlot {
    pub fn is_shared(&self) -> bool {
        self.left.is_some() && self.right.is_some()
    }
}

/// Maps the variables of two rowsources onto their union.
///
/// The union keeps the left variables in order, followed by the right variables that do not
/// occur on the left. The map is built once per operator and reused for every pair of rows.
#[derive(Clone, Debug)]
pub struct RowCompatibility {
    variables: Arc<[VariableId]>,
    slots: Vec<CompatibilitySlot>,
    shared_count: usize,
}

impl RowCompatibility {
    pub fn new(left: &[VariableId], right: &[VariableId]) -> Self {
        let mut slots = left
            .iter()
            .enumerate()
            .map(|(position, variable)| CompatibilitySlot {
                variable: *variable,
                left: Some(position),
                right: right.iter().position(|v| v == variable),
            })
            .collect::<Vec<_>>();
        slots.extend(
            right
                .iter()
                .enumerate()
                .filter(|(_, variable)| !left.contains(variable))
                .map(|(position, variable)| CompatibilitySlot {
                    variable: *variable,
                    left: None,
                    right: Some(position),
                }),
        );

        let shared_count = slots.iter().filter(|slot| slot.is_shared()).count();
        let variables = slots.iter().map(|slot| slot.variable).collect();
        Self {
            variables,
            slots,
            shared_count,
        }
    }

    /// The union of both variable orderings.
    pub fn variables(&self) -> &Arc<[VariableId]> {
        &self.variables
    }

    pub fn slots(&self) -> &[CompatibilitySlot] {
        &self.slots
    }

    /// Number of variables that occur on both sides.
    pub fn shared_count(&self) -> usize {
        self.shared_count
    }

    /// Tests whether `left` and `right` are compatible under `policy`.
    ///
    /// Under [`CompatibilityPolicy::Join`], two rows are compatible if every variable bound on
    /// both sides has the same value on both sides. [`CompatibilityPolicy::Minus`] additionally
    /// requires at least one shared variable that is bound on both sides. Values are compared
    /// as RDF terms.
    pub fn is_compatible(&self, left: &Row, right: &Row, policy: CompatibilityPolicy) -> bool {
        if policy == CompatibilityPolicy::Minus && self.shared_count == 0 {
            return false;
        }

        let mut checked = 0;
        for slot in &self.slots {
            let (Some(left_position), Some(right_position)) = (slot.left, slot.right) else {
                continue;
            };
            let (Some(left_value), Some(right_value)) =
                (left.get(left_position), right.get(right_position))
            else {
                continue;
            };
            if left_value != right_value {
                return false;
            }
            checked += 1;
        }

        match policy {
            CompatibilityPolicy::Join => true,
            CompatibilityPolicy::Minus => checked > 0,
        }
    }

    /// Merges two compatible rows into a row aligned with [`Self::variables`].
    ///
    /// For shared variables, the left value is used if it is bound.
    pub fn merge(&self, left: &Row, right: &Row) -> Row {
        self.slots
            .iter()
            .map(|slot| {
                slot.left
                    .and_then(|position| left.get(position))
                    .or_else(|| slot.right.and_then(|position| right.get(position)))
                    .cloned()
            })
            .collect()
    }

    /// Realigns a row of the left input with [`Self::variables`].
    pub fn widen_left(&self, left: &Row) -> Row {
        self.merge(left, &Row::default())
    }

    /// Realigns a row of the right input with [`Self::variables`].
    pub fn widen_right(&self, right: &Row) -> Row {
        self.merge(&Row::default(), right)
    }
}

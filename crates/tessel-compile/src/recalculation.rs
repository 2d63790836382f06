//! Recalculation tables.
//!
//! A recalculation table records, for each slot the rewriter allocated, the
//! expression whose value belongs in that slot. It is produced once at
//! compile time and evaluated before every dispatch.

use rustc_hash::FxHashMap;
use serde::de::{self, MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use tessel_ir::{Expression, MemoryReference};

use crate::error::{CompileError, CompileResult};

/// One slot and the expression that fills it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecalculationRule {
    /// Slot written with the value.
    pub target: MemoryReference,
    /// Expression over declared regions.
    pub expression: Expression,
}

/// Ordered recalculation rules, at most one per slot.
#[derive(Debug, Clone, Default)]
pub struct RecalculationTable {
    rules: Vec<RecalculationRule>,
    index: FxHashMap<MemoryReference, usize>,
}

impl RecalculationTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a rule.
    ///
    /// Fails with [`CompileError::DuplicateRecalculationSlot`] if `target`
    /// already has a rule, and with [`CompileError::NonFiniteLiteral`] if the
    /// expression holds an infinite or NaN literal.
    pub fn push(&mut self, target: MemoryReference, expression: Expression) -> CompileResult<()> {
        if self.index.contains_key(&target) {
            return Err(CompileError::DuplicateRecalculationSlot(target));
        }
        if !expression.literals_are_finite() {
            return Err(CompileError::NonFiniteLiteral(target.to_string()));
        }
        self.index.insert(target.clone(), self.rules.len());
        self.rules.push(RecalculationRule { target, expression });
        Ok(())
    }

    /// The expression for `target`, if any.
    pub fn get(&self, target: &MemoryReference) -> Option<&Expression> {
        self.index.get(target).map(|&i| &self.rules[i].expression)
    }

    /// Rules in insertion order.
    pub fn rules(&self) -> &[RecalculationRule] {
        &self.rules
    }

    /// Iterate rules in insertion order.
    pub fn iter(&self) -> std::slice::Iter<'_, RecalculationRule> {
        self.rules.iter()
    }

    /// Number of rules.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Whether the table has no rules.
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl PartialEq for RecalculationTable {
    fn eq(&self, other: &Self) -> bool {
        self.rules == other.rules
    }
}

impl<'a> IntoIterator for &'a RecalculationTable {
    type Item = &'a RecalculationRule;
    type IntoIter = std::slice::Iter<'a, RecalculationRule>;

    fn into_iter(self) -> Self::IntoIter {
        self.rules.iter()
    }
}

impl Serialize for RecalculationTable {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.rules.len()))?;
        for rule in &self.rules {
            map.serialize_entry(&rule.target.to_string(), &rule.expression.to_string())?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for RecalculationTable {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(TableVisitor)
    }
}

struct TableVisitor;

impl<'de> Visitor<'de> for TableVisitor {
    type Value = RecalculationTable;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a map from memory reference to expression text")
    }

    fn visit_map<M: MapAccess<'de>>(self, mut access: M) -> Result<Self::Value, M::Error> {
        let mut table = RecalculationTable::new();
        while let Some((slot, text)) = access.next_entry::<String, String>()? {
            let target = MemoryReference::from_str(&slot).map_err(de::Error::custom)?;
            let expression = Expression::from_str(&text).map_err(de::Error::custom)?;
            table.push(target, expression).map_err(de::Error::custom)?;
        }
        Ok(table)
    }
}

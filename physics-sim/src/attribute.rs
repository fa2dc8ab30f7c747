//! Additive/multiplicative attribute modifier stack (spec §6,
//! `AttributeValue` helper).
//!
//! Used for the single attribute the simulator reads: movement speed, with
//! the sprint modifier added and removed every tick by stable UUID so the
//! toggle is idempotent (spec §8 invariant 7).

use rustc_hash::FxHashMap;
use uuid::Uuid;

/// How a modifier combines with the base value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    /// `base += amount` (summed with other `Add` modifiers before any
    /// multiplicative modifier runs).
    Add,
    /// `result += base * amount`, applied to the already-`Add`-resolved
    /// base, summed across all `MultiplyBase` modifiers.
    MultiplyBase,
    /// `result *= 1 + amount`, applied sequentially for each
    /// `MultiplyTotal` modifier in insertion order.
    MultiplyTotal,
}

#[derive(Debug, Clone, Copy)]
struct Modifier {
    amount: f64,
    operation: Operation,
}

/// A single attribute's base value plus its stack of named modifiers.
#[derive(Debug, Clone)]
pub struct AttributeValue {
    base: f64,
    modifiers: FxHashMap<Uuid, Modifier>,
    /// Insertion order, since `MultiplyTotal` modifiers apply sequentially
    /// and a `HashMap` does not preserve it.
    order: Vec<Uuid>,
}

/// Creates a fresh attribute value with no modifiers.
#[must_use]
pub fn create_attribute_value(base: f64) -> AttributeValue {
    AttributeValue {
        base,
        modifiers: FxHashMap::default(),
        order: Vec::new(),
    }
}

/// Adds (or replaces) a modifier keyed by `uuid`.
pub fn add_attribute_modifier(value: &mut AttributeValue, uuid: Uuid, amount: f64, operation: Operation) {
    if value.modifiers.insert(uuid, Modifier { amount, operation }).is_none() {
        value.order.push(uuid);
    }
}

/// Overwrites the attribute's base value, leaving its modifier stack intact.
pub fn set_base_value(value: &mut AttributeValue, base: f64) {
    value.base = base;
}

/// Removes a modifier by `uuid`. A no-op if it was not present.
pub fn delete_attribute_modifier(value: &mut AttributeValue, uuid: Uuid) {
    if value.modifiers.remove(&uuid).is_some() {
        value.order.retain(|id| *id != uuid);
    }
}

/// Whether a modifier with the given `uuid` is currently present.
#[must_use]
pub fn check_attribute_modifier(value: &AttributeValue, uuid: Uuid) -> bool {
    value.modifiers.contains_key(&uuid)
}

/// Resolves the final value: additive modifiers first, then
/// `MultiplyBase` (summed against the additive base), then `MultiplyTotal`
/// (sequential, in insertion order).
#[must_use]
pub fn get_attribute_value(value: &AttributeValue) -> f64 {
    let mut base = value.base;
    for id in &value.order {
        let m = &value.modifiers[id];
        if m.operation == Operation::Add {
            base += m.amount;
        }
    }

    let mut result = base;
    for id in &value.order {
        let m = &value.modifiers[id];
        if m.operation == Operation::MultiplyBase {
            result += base * m.amount;
        }
    }

    for id in &value.order {
        let m = &value.modifiers[id];
        if m.operation == Operation::MultiplyTotal {
            result *= 1.0 + m.amount;
        }
    }

    result
}

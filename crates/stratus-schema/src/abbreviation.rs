//! Abbreviation resolution for namespaced resource type names.
//!
//! Every resource type can be addressed by any suffix of its name obtained by
//! dropping leading namespace segments: `AWS::EC2::Instance`, `EC2::Instance`
//! and `Instance`. A short form claimed by more than one type is ambiguous and
//! resolves to nothing; the longer forms of those types stay usable.
//!
//! Resolution is a pure two-pass function over the whole type list, so the
//! result does not depend on the order the types are declared in.

use indexmap::{IndexMap, IndexSet};
use log::debug;

use stratus_core::identifier::TypeName;

/// The outcome of abbreviation resolution.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Abbreviations {
    /// Short form -> the only type that produces it.
    pub unique: IndexMap<String, TypeName>,
    /// Short form -> every type that produces it, in declaration order.
    pub ambiguous: IndexMap<String, Vec<TypeName>>,
}

/// Derives every unambiguous short form of `types`.
///
/// # Example
///
/// ```
/// use stratus_core::identifier::TypeName;
/// use stratus_schema::abbreviation::resolve_abbreviations;
///
/// let abbreviations = resolve_abbreviations([
///     TypeName::new("NS1::Foo::Widget"),
///     TypeName::new("NS2::Bar::Widget"),
/// ]);
/// assert!(abbreviations.unique.contains_key("Foo::Widget"));
/// assert!(!abbreviations.unique.contains_key("Widget"));
/// assert_eq!(abbreviations.ambiguous["Widget"].len(), 2);
/// ```
pub fn resolve_abbreviations(types: impl IntoIterator<Item = TypeName>) -> Abbreviations {
    // Pass 1: every short form with the set of types producing it.
    let mut claims: IndexMap<String, IndexSet<TypeName>> = IndexMap::new();
    for type_name in types {
        for suffix in type_name.suffixes() {
            claims.entry(suffix).or_default().insert(type_name);
        }
    }

    // Pass 2: keep the short forms produced by exactly one type.
    let mut abbreviations = Abbreviations::default();
    for (short, targets) in claims {
        if targets.len() == 1 {
            let target = targets[0];
            abbreviations.unique.insert(short, target);
        } else {
            debug!(
                short = short.as_str(),
                candidates = targets.len();
                "Ambiguous abbreviation disabled",
            );
            abbreviations
                .ambiguous
                .insert(short, targets.into_iter().collect());
        }
    }
    abbreviations
}

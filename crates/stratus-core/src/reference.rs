//! Reference validation.
//!
//! References are not stored anywhere; they are recomputed from the
//! configured values every time a template is validated. The validator walks
//! every resource and output once, builds the reference tables, and checks
//! each mention against the template's declarations:
//!
//! 1. pseudo-parameters are always valid,
//! 2. declared parameters are always valid,
//! 3. declared resources are valid unless the referenced resource refers back
//!    to the referring resource (a direct two-node cycle),
//! 4. anything else is invalid.
//!
//! Longer cycles (`A -> B -> C -> A`) are not detected.

use std::fmt;

use indexmap::{IndexMap, IndexSet};
use log::{debug, trace};

use crate::template::Template;

/// Built-in reference targets that every template may refer to.
pub const PSEUDO_PARAMETERS: &[&str] = &[
    "AWS::NotificationARNs",
    "AWS::Region",
    "AWS::StackId",
    "AWS::StackName",
    "AWS::AccountId",
    "AWS::NoValue",
];

/// Something that can mention logical names of other template entries.
pub trait References {
    /// Adds every logical name this value mentions to `refs`.
    fn collect_references(&self, refs: &mut IndexSet<String>);

    /// Returns the logical names this value mentions, in first-mention order.
    fn references(&self) -> IndexSet<String> {
        let mut refs = IndexSet::new();
        self.collect_references(&mut refs);
        refs
    }
}

/// The kind of template entry a violation originates from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OriginKind {
    Resource,
    Output,
}

impl fmt::Display for OriginKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OriginKind::Resource => write!(f, "Resource"),
            OriginKind::Output => write!(f, "Output"),
        }
    }
}

/// A reference that failed validation.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ReferenceViolation {
    kind: OriginKind,
    origin: String,
    reference: String,
}

impl ReferenceViolation {
    pub fn new(kind: OriginKind, origin: impl Into<String>, reference: impl Into<String>) -> Self {
        Self {
            kind,
            origin: origin.into(),
            reference: reference.into(),
        }
    }

    pub fn kind(&self) -> OriginKind {
        self.kind
    }

    /// Logical name of the resource or output holding the reference.
    pub fn origin(&self) -> &str {
        &self.origin
    }

    /// The referenced logical name.
    pub fn reference(&self) -> &str {
        &self.reference
    }
}

impl fmt::Display for ReferenceViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Invalid Reference: {} {} refers to {}",
            self.kind, self.origin, self.reference
        )
    }
}

/// Reference tables of one template and the violations found in them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReferenceReport {
    resource_refs: IndexMap<String, IndexSet<String>>,
    referrers: IndexMap<String, IndexSet<String>>,
    output_refs: IndexMap<String, IndexSet<String>>,
    violations: Vec<ReferenceViolation>,
}

impl ReferenceReport {
    /// Resource logical name -> names it refers to.
    pub fn resource_refs(&self) -> &IndexMap<String, IndexSet<String>> {
        &self.resource_refs
    }

    /// Referenced name -> resources referring to it.
    pub fn referrers(&self) -> &IndexMap<String, IndexSet<String>> {
        &self.referrers
    }

    /// Output logical name -> names it refers to.
    pub fn output_refs(&self) -> &IndexMap<String, IndexSet<String>> {
        &self.output_refs
    }

    /// Violations, resources first, then outputs, in declaration order.
    pub fn violations(&self) -> &[ReferenceViolation] {
        &self.violations
    }

    pub fn is_clean(&self) -> bool {
        self.violations.is_empty()
    }

    /// Human-readable violation messages, or `None` if there are none.
    pub fn messages(&self) -> Option<Vec<String>> {
        if self.violations.is_empty() {
            None
        } else {
            Some(self.violations.iter().map(ToString::to_string).collect())
        }
    }
}

/// Read-only reference checker over one template.
#[derive(Debug)]
pub struct ReferenceValidator<'a> {
    template: &'a Template,
    resource_refs: IndexMap<String, IndexSet<String>>,
    referrers: IndexMap<String, IndexSet<String>>,
    output_refs: IndexMap<String, IndexSet<String>>,
}

impl<'a> ReferenceValidator<'a> {
    /// Computes the reference tables of `template`.
    pub fn new(template: &'a Template) -> Self {
        let mut resource_refs = IndexMap::new();
        let mut referrers: IndexMap<String, IndexSet<String>> = IndexMap::new();
        for (name, resource) in template.resources() {
            let refs = resource.references();
            for reference in &refs {
                referrers
                    .entry(reference.clone())
                    .or_default()
                    .insert(name.to_string());
            }
            trace!(resource = name, refs:? = refs; "Collected resource references");
            resource_refs.insert(name.to_string(), refs);
        }

        let output_refs = template
            .outputs()
            .map(|(name, output)| (name.to_string(), output.references()))
            .collect();

        Self {
            template,
            resource_refs,
            referrers,
            output_refs,
        }
    }

    /// Decides whether `reference`, mentioned by the resource `origin`, is valid.
    ///
    /// Pass `None` as origin for references held by outputs; those can never
    /// form a cycle.
    pub fn is_valid_ref(&self, reference: &str, origin: Option<&str>) -> bool {
        if PSEUDO_PARAMETERS.contains(&reference) {
            return true;
        }

        if self.template.get_parameter(reference).is_some() {
            return true;
        }

        if self.template.get_resource(reference).is_some() {
            return match origin {
                Some(origin) => !self
                    .resource_refs
                    .get(reference)
                    .is_some_and(|refs| refs.contains(origin)),
                None => true,
            };
        }

        false
    }

    /// Checks every reference and returns the report.
    pub fn check(self) -> ReferenceReport {
        let mut violations = Vec::new();

        for (origin, refs) in &self.resource_refs {
            for reference in refs {
                if !self.is_valid_ref(reference, Some(origin)) {
                    violations.push(ReferenceViolation::new(
                        OriginKind::Resource,
                        origin,
                        reference,
                    ));
                }
            }
        }

        for (origin, refs) in &self.output_refs {
            for reference in refs {
                if !self.is_valid_ref(reference, None) {
                    violations.push(ReferenceViolation::new(
                        OriginKind::Output,
                        origin,
                        reference,
                    ));
                }
            }
        }

        debug!(violations = violations.len(); "Reference check completed");

        ReferenceReport {
            resource_refs: self.resource_refs,
            referrers: self.referrers,
            output_refs: self.output_refs,
            violations,
        }
    }
}

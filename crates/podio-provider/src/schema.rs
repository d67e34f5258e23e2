//! Declared attribute schemas for resources, data sources and the provider.
//!
//! An [`EntitySchema`] is the single source of truth for input validation,
//! replacement detection and generated documentation.

use std::fmt::Write as _;
use std::sync::Arc;

use serde::{Serialize, Serializer};

use podio_core::{AttrType, ProviderError, Record, Violation};

use crate::validators::Validator;

/// Who may author an attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Requirement {
    /// Must be supplied; never defaulted by the server.
    Required,
    /// May be omitted; omitted values are never sent.
    Optional,
    /// Decided by the server; never supplied.
    Computed,
    /// May be supplied; otherwise the server default is adopted.
    OptionalComputed,
}

impl Requirement {
    pub fn is_user_settable(self) -> bool {
        !matches!(self, Self::Computed)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SchemaKind {
    Provider,
    Resource,
    DataSource,
}

impl std::fmt::Display for SchemaKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Provider => write!(f, "Provider"),
            Self::Resource => write!(f, "Resource"),
            Self::DataSource => write!(f, "Data Source"),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct AttributeSpec {
    pub name: &'static str,
    #[serde(rename = "type")]
    pub attr_type: AttrType,
    pub requirement: Requirement,
    pub description: &'static str,
    /// A change forces destroy-and-recreate.
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub force_new: bool,
    /// Tracked locally only, never sent to the remote API.
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub local: bool,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub sensitive: bool,
    #[serde(
        serialize_with = "serialize_validators",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub validators: Vec<Arc<dyn Validator>>,
}

fn serialize_validators<S: Serializer>(
    validators: &[Arc<dyn Validator>],
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.collect_seq(validators.iter().map(|v| v.description()))
}

impl AttributeSpec {
    pub fn new(
        name: &'static str,
        attr_type: AttrType,
        requirement: Requirement,
        description: &'static str,
    ) -> Self {
        Self {
            name,
            attr_type,
            requirement,
            description,
            force_new: false,
            local: false,
            sensitive: false,
            validators: Vec::new(),
        }
    }

    pub fn required(name: &'static str, attr_type: AttrType, description: &'static str) -> Self {
        Self::new(name, attr_type, Requirement::Required, description)
    }

    pub fn optional(name: &'static str, attr_type: AttrType, description: &'static str) -> Self {
        Self::new(name, attr_type, Requirement::Optional, description)
    }

    pub fn computed(name: &'static str, attr_type: AttrType, description: &'static str) -> Self {
        Self::new(name, attr_type, Requirement::Computed, description)
    }

    pub fn optional_computed(
        name: &'static str,
        attr_type: AttrType,
        description: &'static str,
    ) -> Self {
        Self::new(name, attr_type, Requirement::OptionalComputed, description)
    }

    /// The `ignore_delete_errors` tolerance flag shared by every resource.
    pub fn ignore_delete_errors() -> Self {
        Self::optional(
            "ignore_delete_errors",
            AttrType::Bool,
            "Report success when the remote service rejects a delete. Useful when the API key's trust level does not allow deletes. Defaults to `false`.",
        )
        .local()
    }

    pub fn force_new(mut self) -> Self {
        self.force_new = true;
        self
    }

    pub fn local(mut self) -> Self {
        self.local = true;
        self
    }

    pub fn sensitive(mut self) -> Self {
        self.sensitive = true;
        self
    }

    pub fn with_validator(mut self, validator: impl Validator + 'static) -> Self {
        self.validators.push(Arc::new(validator));
        self
    }

    fn type_label(&self) -> &'static str {
        match self.attr_type {
            AttrType::String => "String",
            AttrType::Int64 => "Number",
            AttrType::Bool => "Boolean",
        }
    }
}

/// A group of attributes of which exactly one must be set.
#[derive(Debug, Clone, Serialize)]
pub struct ExactlyOneOf {
    pub attributes: Vec<&'static str>,
    #[serde(skip)]
    when_none: Option<(&'static str, &'static str)>,
    #[serde(skip)]
    when_many: Option<(&'static str, &'static str)>,
}

impl ExactlyOneOf {
    pub fn new(attributes: &[&'static str]) -> Self {
        Self {
            attributes: attributes.to_vec(),
            when_none: None,
            when_many: None,
        }
    }

    /// Overrides the diagnostic reported when none of the attributes is set.
    pub fn when_none(mut self, summary: &'static str, detail: &'static str) -> Self {
        self.when_none = Some((summary, detail));
        self
    }

    /// Overrides the diagnostic reported when more than one attribute is set.
    pub fn when_many(mut self, summary: &'static str, detail: &'static str) -> Self {
        self.when_many = Some((summary, detail));
        self
    }

    fn check(&self, desired: &Record) -> Option<Violation> {
        let set = self
            .attributes
            .iter()
            .filter(|name| desired.contains(name))
            .count();
        let listed = || format!("`{}`", self.attributes.join("`, `"));
        match set {
            1 => None,
            0 => Some(match self.when_none {
                Some((summary, detail)) => Violation::record(summary, detail),
                None => Violation::record(
                    "Invalid Attribute Combination",
                    format!("Exactly one of {} must be specified", listed()),
                ),
            }),
            _ => Some(match self.when_many {
                Some((summary, detail)) => Violation::record(summary, detail),
                None => Violation::record(
                    "Invalid Attribute Combination",
                    format!("Only one of {} may be specified", listed()),
                ),
            }),
        }
    }
}

/// Ordered attribute declaration for one entity type.
#[derive(Debug, Clone, Serialize)]
pub struct EntitySchema {
    pub type_name: &'static str,
    pub kind: SchemaKind,
    pub description: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id_attribute: Option<&'static str>,
    pub attributes: Vec<AttributeSpec>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub exactly_one_of: Vec<ExactlyOneOf>,
}

impl EntitySchema {
    pub fn new(type_name: &'static str, kind: SchemaKind, description: &'static str) -> Self {
        Self {
            type_name,
            kind,
            description,
            id_attribute: None,
            attributes: Vec::new(),
            exactly_one_of: Vec::new(),
        }
    }

    pub fn id_attribute(mut self, name: &'static str) -> Self {
        self.id_attribute = Some(name);
        self
    }

    pub fn attribute(mut self, spec: AttributeSpec) -> Self {
        self.attributes.push(spec);
        self
    }

    pub fn exactly_one_of(mut self, group: ExactlyOneOf) -> Self {
        self.exactly_one_of.push(group);
        self
    }

    pub fn get(&self, name: &str) -> Option<&AttributeSpec> {
        self.attributes.iter().find(|a| a.name == name)
    }

    /// Attributes flagged as tracked-only.
    pub fn local_attributes(&self) -> impl Iterator<Item = &AttributeSpec> {
        self.attributes.iter().filter(|a| a.local)
    }

    /// Validates a desired-state record for creation or lookup.
    ///
    /// Every problem is collected before failing.
    pub fn validate_create(&self, desired: &Record) -> Result<(), ProviderError> {
        self.validate_against(desired, None)
    }

    /// Validates a desired-state record for an update against prior tracked state.
    ///
    /// Computed attributes are tolerated only when they echo the prior value.
    pub fn validate_update(&self, desired: &Record, prior: &Record) -> Result<(), ProviderError> {
        self.validate_against(desired, Some(prior))
    }

    fn validate_against(&self, desired: &Record, prior: Option<&Record>) -> Result<(), ProviderError> {
        let mut violations = Vec::new();

        for (name, value) in desired.iter() {
            let Some(spec) = self.get(name) else {
                violations.push(Violation::attribute(
                    name,
                    "Unsupported argument",
                    format!("An argument named \"{name}\" is not expected here."),
                ));
                continue;
            };

            if spec.requirement == Requirement::Computed {
                let echoes_prior = prior.and_then(|p| p.get(name)) == Some(value);
                if !echoes_prior {
                    violations.push(Violation::attribute(
                        name,
                        "Invalid configuration",
                        format!("\"{name}\" is computed by the server and cannot be set"),
                    ));
                }
                continue;
            }

            if value.attr_type() != spec.attr_type {
                violations.push(Violation::attribute(
                    name,
                    "Incorrect attribute value type",
                    format!("expected {}, got {}", spec.attr_type, value.attr_type()),
                ));
                continue;
            }

            if let Some(s) = value.as_str() {
                for validator in &spec.validators {
                    if let Err(detail) = validator.validate(s) {
                        violations.push(Violation::attribute(
                            name,
                            "Invalid attribute value",
                            detail,
                        ));
                    }
                }
            }
        }

        for spec in &self.attributes {
            if spec.requirement == Requirement::Required && !desired.contains(spec.name) {
                violations.push(Violation::attribute(
                    spec.name,
                    "Missing required argument",
                    format!(
                        "The argument \"{}\" is required, but no definition was found.",
                        spec.name
                    ),
                ));
            }
        }

        violations.extend(self.exactly_one_of.iter().filter_map(|g| g.check(desired)));

        if violations.is_empty() {
            Ok(())
        } else {
            Err(ProviderError::validation(self.type_name, violations))
        }
    }

    /// Immutable attributes whose desired value differs from the prior tracked value.
    pub fn replacement_attributes(&self, desired: &Record, prior: &Record) -> Vec<String> {
        self.attributes
            .iter()
            .filter(|a| a.force_new && desired.get(a.name) != prior.get(a.name))
            .map(|a| a.name.to_string())
            .collect()
    }

    /// Renders reference documentation in Markdown.
    pub fn to_markdown(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "# {} ({})\n", self.type_name, self.kind);
        let _ = writeln!(out, "{}\n", self.description);
        out.push_str("## Schema\n");

        let sections: [(&str, &[Requirement]); 3] = [
            ("Required", &[Requirement::Required]),
            (
                "Optional",
                &[Requirement::Optional, Requirement::OptionalComputed],
            ),
            ("Read-Only", &[Requirement::Computed]),
        ];

        for (title, classes) in sections {
            let attrs: Vec<_> = self
                .attributes
                .iter()
                .filter(|a| classes.contains(&a.requirement))
                .collect();
            if attrs.is_empty() {
                continue;
            }
            let _ = writeln!(out, "\n### {title}\n");
            for attr in attrs {
                let _ = write!(out, "- `{}` ({}", attr.name, attr.type_label());
                if attr.sensitive {
                    out.push_str(", Sensitive");
                }
                let _ = write!(out, ") {}", attr.description);
                for validator in &attr.validators {
                    let _ = write!(out, " Value {}.", validator.markdown_description());
                }
                if attr.force_new {
                    out.push_str(" Changing this forces a new resource.");
                }
                out.push('\n');
            }
        }

        if !self.exactly_one_of.is_empty() {
            out.push_str("\n### Constraints\n\n");
            for group in &self.exactly_one_of {
                let _ = writeln!(
                    out,
                    "- Exactly one of `{}` must be set.",
                    group.attributes.join("`, `")
                );
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validators::OneOf;

    fn schema() -> EntitySchema {
        EntitySchema::new("podio_widget", SchemaKind::Resource, "A widget.")
            .id_attribute("widget_id")
            .attribute(AttributeSpec::computed("widget_id", AttrType::Int64, "ID."))
            .attribute(
                AttributeSpec::required("parent_id", AttrType::Int64, "Parent.").force_new(),
            )
            .attribute(AttributeSpec::required("name", AttrType::String, "Name."))
            .attribute(
                AttributeSpec::optional_computed("privacy", AttrType::String, "Privacy.")
                    .with_validator(OneOf::new(&["open", "closed"])),
            )
            .attribute(AttributeSpec::ignore_delete_errors())
    }

    #[test]
    fn test_valid_record_passes() {
        let desired = Record::new()
            .with("parent_id", 1i64)
            .with("name", "w")
            .with("privacy", "open");
        assert!(schema().validate_create(&desired).is_ok());
    }

    #[test]
    fn test_all_violations_are_reported_together() {
        let desired = Record::new()
            .with("widget_id", 9i64)
            .with("parent_id", "one")
            .with("privacy", "secret")
            .with("colour", "red");

        let err = schema().validate_create(&desired).unwrap_err();
        let attrs: Vec<_> = err
            .violations()
            .iter()
            .filter_map(|v| v.attribute.as_deref())
            .collect();

        assert_eq!(err.violations().len(), 5);
        for expected in ["widget_id", "parent_id", "privacy", "colour", "name"] {
            assert!(attrs.contains(&expected), "missing violation for {expected}");
        }
        assert!(err.to_string().contains("expected int64, got string"));
    }

    #[test]
    fn test_computed_echo_allowed_on_update_only() {
        let prior = Record::new()
            .with("widget_id", 9i64)
            .with("parent_id", 1i64)
            .with("name", "w");
        let desired = prior.clone();

        assert!(schema().validate_update(&desired, &prior).is_ok());
        assert!(schema().validate_create(&desired).is_err());

        let changed = desired.with("widget_id", 10i64);
        assert!(schema().validate_update(&changed, &prior).is_err());
    }

    #[test]
    fn test_replacement_attributes() {
        let prior = Record::new().with("parent_id", 1i64).with("name", "a");
        let desired = Record::new().with("parent_id", 2i64).with("name", "b");
        assert_eq!(
            schema().replacement_attributes(&desired, &prior),
            vec!["parent_id".to_string()]
        );
    }

    #[test]
    fn test_exactly_one_of() {
        let schema = EntitySchema::new("lookup", SchemaKind::DataSource, "Lookup.")
            .attribute(AttributeSpec::optional_computed("a", AttrType::String, "A."))
            .attribute(AttributeSpec::optional_computed("b", AttrType::Int64, "B."))
            .exactly_one_of(
                ExactlyOneOf::new(&["a", "b"]).when_many("Ambiguous", "pick one"),
            );

        assert!(schema.validate_create(&Record::new().with("a", "x")).is_ok());

        let none = schema.validate_create(&Record::new()).unwrap_err();
        assert!(none.to_string().contains("Exactly one of `a`, `b`"));

        let both = schema
            .validate_create(&Record::new().with("a", "x").with("b", 1i64))
            .unwrap_err();
        assert_eq!(both.violations()[0].summary, "Ambiguous");
    }

    #[test]
    fn test_markdown_sections() {
        let md = schema().to_markdown();
        assert!(md.starts_with("# podio_widget (Resource)"));
        assert!(md.contains("### Required"));
        assert!(md.contains("### Optional"));
        assert!(md.contains("### Read-Only"));
        assert!(md.contains("Value must be one of: `open`, `closed`."));
        assert!(md.contains("Changing this forces a new resource."));
    }

    #[test]
    fn test_json_surface() {
        let json = serde_json::to_value(schema()).unwrap();
        assert_eq!(json["type_name"], "podio_widget");
        assert_eq!(json["attributes"][0]["requirement"], "computed");
        assert_eq!(json["attributes"][1]["force_new"], true);
        assert_eq!(
            json["attributes"][3]["validators"][0],
            "must be one of: open, closed"
        );
        assert_eq!(json["attributes"][4]["local"], true);
    }
}

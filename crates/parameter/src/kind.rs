use serde::{Deserialize, Serialize};

/// The kind of a parameter, determining its UI widget and value semantics.
///
/// Phase 1 covers the 14 most common parameter kinds. Composite kinds
/// (Collection, FixedCollection, ResourceLocator, etc.) will be added
/// in a later phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParameterKind {
    Text,
    Textarea,
    Secret,
    Number,
    Checkbox,
    Select,
    MultiSelect,
    DateTime,
    Date,
    Time,
    Code,
    Color,
    Hidden,
    Notice,
    Object,
    List,
    Mode,
    Group,
    Expirable,
}

/// Capabilities that a parameter kind may support.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParameterCapability {
    HasValue,
    Editable,
    Validatable,
    Displayable,
    Requirable,
    SupportsExpressions,
    Container,
    Interactive,
    Serializable,
}

impl ParameterKind {
    /// Returns the set of capabilities for this parameter kind.
    #[must_use]
    pub fn capabilities(&self) -> &'static [ParameterCapability] {
        use ParameterCapability::*;

        // Common capability sets to avoid repetition.
        const VALUE_EDITABLE: &[ParameterCapability] = &[
            HasValue,
            Editable,
            Validatable,
            Displayable,
            Requirable,
            SupportsExpressions,
            Serializable,
        ];
        const SELECTION: &[ParameterCapability] = &[
            HasValue,
            Editable,
            Validatable,
            Displayable,
            Requirable,
            SupportsExpressions,
            Interactive,
            Serializable,
        ];

        match self {
            Self::Text
            | Self::Textarea
            | Self::Number
            | Self::DateTime
            | Self::Date
            | Self::Time
            | Self::Color => VALUE_EDITABLE,
            Self::Secret => &[
                HasValue,
                Editable,
                Validatable,
                Requirable,
                SupportsExpressions,
                Serializable,
            ],
            Self::Checkbox => &[HasValue, Editable, Displayable, Serializable],
            Self::Select | Self::MultiSelect => SELECTION,
            Self::Code => &[
                HasValue,
                Editable,
                Validatable,
                Displayable,
                Requirable,
                SupportsExpressions,
                Interactive,
                Serializable,
            ],
            Self::Hidden => &[HasValue, Serializable],
            Self::Notice => &[Displayable],
            Self::Object => &[
                HasValue, Container, Displayable, Requirable, Validatable, Serializable,
            ],
            Self::List => &[
                HasValue, Container, Editable, Displayable, Requirable, Validatable, Interactive,
                Serializable,
            ],
            Self::Mode => &[
                HasValue, Container, Editable, Displayable, Requirable, Interactive, Serializable,
            ],
            Self::Group => &[Container, Displayable],
            Self::Expirable => &[
                HasValue, Container, Displayable, Requirable, Validatable, Serializable,
            ],
        }
    }

    /// Check whether this kind has a specific capability.
    #[must_use]
    pub fn has_capability(&self, cap: ParameterCapability) -> bool {
        self.capabilities().contains(&cap)
    }

    /// Whether this kind carries a value (as opposed to display-only).
    #[must_use]
    pub fn has_value(&self) -> bool {
        self.has_capability(ParameterCapability::HasValue)
    }

    /// Whether the user can edit this parameter in the UI.
    #[must_use]
    pub fn is_editable(&self) -> bool {
        self.has_capability(ParameterCapability::Editable)
    }

    /// Whether validation rules can be applied.
    #[must_use]
    pub fn is_validatable(&self) -> bool {
        self.has_capability(ParameterCapability::Validatable)
    }

    /// Whether this parameter is shown in the UI.
    #[must_use]
    pub fn is_displayable(&self) -> bool {
        self.has_capability(ParameterCapability::Displayable)
    }

    /// Whether this parameter can be marked as required.
    #[must_use]
    pub fn is_requirable(&self) -> bool {
        self.has_capability(ParameterCapability::Requirable)
    }

    /// Whether expression evaluation is supported for this kind.
    #[must_use]
    pub fn supports_expressions(&self) -> bool {
        self.has_capability(ParameterCapability::SupportsExpressions)
    }

    /// Whether this kind acts as a container for child parameters.
    #[must_use]
    pub fn is_container(&self) -> bool {
        self.has_capability(ParameterCapability::Container)
    }

    /// Whether this kind is text-based (string value).
    #[must_use]
    pub fn is_text_based(&self) -> bool {
        matches!(
            self,
            Self::Text | Self::Textarea | Self::Secret | Self::Code | Self::Color
        )
    }

    /// Whether this kind uses a selection from options.
    #[must_use]
    pub fn is_selection_based(&self) -> bool {
        matches!(self, Self::Select | Self::MultiSelect)
    }

    /// Whether this kind deals with date/time values.
    #[must_use]
    pub fn is_temporal(&self) -> bool {
        matches!(self, Self::DateTime | Self::Date | Self::Time)
    }

    /// String identifier for serialization/logging.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Textarea => "textarea",
            Self::Secret => "secret",
            Self::Number => "number",
            Self::Checkbox => "checkbox",
            Self::Select => "select",
            Self::MultiSelect => "multi_select",
            Self::DateTime => "date_time",
            Self::Date => "date",
            Self::Time => "time",
            Self::Code => "code",
            Self::Color => "color",
            Self::Hidden => "hidden",
            Self::Notice => "notice",
            Self::Object => "object",
            Self::List => "list",
            Self::Mode => "mode",
            Self::Group => "group",
            Self::Expirable => "expirable",
        }
    }

    /// The JSON value type this parameter expects.
    #[must_use]
    pub fn value_type(&self) -> &'static str {
        match self {
            Self::Text | Self::Textarea | Self::Secret | Self::Code | Self::Color => "string",
            Self::Number => "number",
            Self::Checkbox => "boolean",
            Self::Select => "any",
            Self::MultiSelect => "array",
            Self::DateTime | Self::Date | Self::Time => "string",
            Self::Hidden => "any",
            Self::Notice => "none",
            Self::Object => "object",
            Self::List => "array",
            Self::Mode => "object",
            Self::Group => "none",
            Self::Expirable => "any",
        }
    }
}

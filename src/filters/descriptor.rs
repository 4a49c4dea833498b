//! Filter descriptors.
//!
//! A descriptor declares which of the universal parameter kinds a filter
//! honours. It never changes after the registry is built.

use crate::core::types::{ParameterKind, ParameterSet};
use serde::{Deserialize, Serialize};

/// Category for organizing filters in menus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    /// Geometric warps (bump, twirl)
    Distortion,
    /// Blur effects
    Blur,
    /// Sharpening effects
    Sharpen,
    /// Tone and color adjustments
    Color,
    /// Stylizing effects (pixellate, vignette)
    Stylize,
    /// Custom/user-defined
    #[default]
    Custom,
}

impl Category {
    /// Get the display name for this category.
    pub fn display_name(&self) -> &'static str {
        match self {
            Category::Distortion => "Distortion",
            Category::Blur => "Blur",
            Category::Sharpen => "Sharpen",
            Category::Color => "Color",
            Category::Stylize => "Stylize",
            Category::Custom => "Custom",
        }
    }
}

/// Static description of one filter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterDescriptor {
    /// Unique identifier, shared with the kernel's id space (e.g., "vignette")
    pub id: String,
    /// Human-readable name (e.g., "Vignette")
    pub name: String,
    /// Detailed description
    pub description: String,
    /// Category for menu organization
    pub category: Category,
    /// Parameter kinds this filter honours
    pub accepted: ParameterSet,
}

impl FilterDescriptor {
    /// Create a new descriptor builder.
    pub fn builder(id: impl Into<String>, name: impl Into<String>) -> FilterDescriptorBuilder {
        FilterDescriptorBuilder::new(id, name)
    }

    /// Check whether this filter honours `kind`.
    pub fn accepts(&self, kind: ParameterKind) -> bool {
        self.accepted.contains(kind)
    }
}

/// Builder for FilterDescriptor.
pub struct FilterDescriptorBuilder {
    id: String,
    name: String,
    description: String,
    category: Category,
    accepted: ParameterSet,
}

impl FilterDescriptorBuilder {
    /// Create a new builder with required fields.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: String::new(),
            category: Category::Custom,
            accepted: ParameterSet::EMPTY,
        }
    }

    /// Set the description.
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Set the category.
    pub fn category(mut self, category: Category) -> Self {
        self.category = category;
        self
    }

    /// Declare an accepted parameter kind.
    pub fn accepts(mut self, kind: ParameterKind) -> Self {
        self.accepted = self.accepted.with(kind);
        self
    }

    /// Build the descriptor.
    pub fn build(self) -> FilterDescriptor {
        FilterDescriptor {
            id: self.id,
            name: self.name,
            description: self.description,
            category: self.category,
            accepted: self.accepted,
        }
    }
}

//! Node categories and their visual style descriptors.
//!
//! A category is the only "type" a node carries. It is inert in the graph
//! model itself; its sole purpose is to select the visual style the layout
//! engine draws the node with. The set of categories is closed: an
//! unrecognized category name fails at parse time rather than silently
//! falling back to a default look.

use std::{
    fmt::{self, Display},
    str::FromStr,
};

use serde::{Deserialize, Serialize};

/// The closed set of node categories.
///
/// Each variant maps to a fixed [`StyleDescriptor`] through
/// [`Category::style`]. The names match external configuration strings
/// (snake_case).
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    /// A human actor, e.g. a browser user.
    User,
    /// A client-side application.
    Client,
    /// An API gateway or other request router.
    Gateway,
    /// A serverless function.
    Function,
    /// A general compute instance.
    Compute,
    /// A database table or server.
    Database,
    /// An object or blob store.
    Storage,
    /// A message queue or event bus.
    Queue,
    /// A logging/metrics/alarm component.
    Monitoring,
    /// A generic service (default).
    #[default]
    Service,
}

impl Category {
    /// All categories, in declaration order.
    pub const ALL: [Category; 10] = [
        Category::User,
        Category::Client,
        Category::Gateway,
        Category::Function,
        Category::Compute,
        Category::Database,
        Category::Storage,
        Category::Queue,
        Category::Monitoring,
        Category::Service,
    ];

    /// Returns the style descriptor for this category.
    ///
    /// The mapping is total: every category has a style, and there is no
    /// open-ended fallback path.
    pub fn style(self) -> StyleDescriptor {
        match self {
            Category::User => StyleDescriptor::new("ellipse", "#ede7f6", "#311b92"),
            Category::Client => StyleDescriptor::new("component", "#e3f2fd", "#0d47a1"),
            Category::Gateway => StyleDescriptor::new("hexagon", "#fff3e0", "#e65100"),
            Category::Function => StyleDescriptor::new("box", "#fff8e1", "#ff6f00"),
            Category::Compute => StyleDescriptor::new("box3d", "#fbe9e7", "#bf360c"),
            Category::Database => StyleDescriptor::new("cylinder", "#e8f5e9", "#1b5e20"),
            Category::Storage => StyleDescriptor::new("folder", "#e0f2f1", "#004d40"),
            Category::Queue => StyleDescriptor::new("cds", "#fce4ec", "#880e4f"),
            Category::Monitoring => StyleDescriptor::new("note", "#eceff1", "#263238"),
            Category::Service => StyleDescriptor::new("box", "#f5f5f5", "#212121"),
        }
    }
}

impl FromStr for Category {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" => Ok(Self::User),
            "client" => Ok(Self::Client),
            "gateway" => Ok(Self::Gateway),
            "function" => Ok(Self::Function),
            "compute" => Ok(Self::Compute),
            "database" => Ok(Self::Database),
            "storage" => Ok(Self::Storage),
            "queue" => Ok(Self::Queue),
            "monitoring" => Ok(Self::Monitoring),
            "service" => Ok(Self::Service),
            other => Err(UnknownCategory(other.to_string())),
        }
    }
}

impl From<Category> for &'static str {
    fn from(val: Category) -> Self {
        match val {
            Category::User => "user",
            Category::Client => "client",
            Category::Gateway => "gateway",
            Category::Function => "function",
            Category::Compute => "compute",
            Category::Database => "database",
            Category::Storage => "storage",
            Category::Queue => "queue",
            Category::Monitoring => "monitoring",
            Category::Service => "service",
        }
    }
}

impl Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s: &'static str = (*self).into();
        write!(f, "{s}")
    }
}

/// Error returned when a category name is not in the closed set.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown node category \"{0}\"")]
pub struct UnknownCategory(pub String);

/// Visual style selected by a [`Category`].
///
/// The fields use the layout engine's vocabulary directly (shape names and
/// `#rrggbb` colors) so the export stage can pass them through unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StyleDescriptor {
    shape: &'static str,
    fill_color: &'static str,
    font_color: &'static str,
}

impl StyleDescriptor {
    const fn new(shape: &'static str, fill_color: &'static str, font_color: &'static str) -> Self {
        Self {
            shape,
            fill_color,
            font_color,
        }
    }

    /// The layout engine's shape name for this style.
    pub fn shape(&self) -> &'static str {
        self.shape
    }

    /// The fill color, as a `#rrggbb` string.
    pub fn fill_color(&self) -> &'static str {
        self.fill_color
    }

    /// The font color, as a `#rrggbb` string.
    pub fn font_color(&self) -> &'static str {
        self.font_color
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_category_round_trips_through_its_name() {
        for category in Category::ALL {
            let name: &'static str = category.into();
            assert_eq!(name.parse::<Category>(), Ok(category));
            assert_eq!(category.to_string(), name);
        }
    }

    #[test]
    fn unknown_category_is_rejected() {
        let err = "blockchain".parse::<Category>().unwrap_err();
        assert_eq!(err, UnknownCategory("blockchain".to_string()));
        assert!(err.to_string().contains("blockchain"));
    }

    #[test]
    fn styles_are_total_and_well_formed() {
        for category in Category::ALL {
            let style = category.style();
            assert!(!style.shape().is_empty());
            assert!(style.fill_color().starts_with('#'));
            assert!(style.font_color().starts_with('#'));
        }
    }

    #[test]
    fn default_category_is_service() {
        assert_eq!(Category::default(), Category::Service);
    }
}

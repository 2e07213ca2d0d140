//! Page description: sections and what sits inside them

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

const DEMO_PAGE: &str = include_str!("demo.toml");

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageSpec {
    pub title: String,
    /// Location path, used for nav highlighting
    #[serde(default = "default_path")]
    pub path: String,
    #[serde(default)]
    pub nav: Vec<NavLink>,
    pub sections: Vec<SectionSpec>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NavLink {
    pub label: String,
    pub href: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionSpec {
    pub id: String,
    pub title: String,
    /// Static text lines
    #[serde(default)]
    pub body: Vec<String>,
    /// Lines that fade in the first time they scroll into view
    #[serde(default)]
    pub reveals: Vec<String>,
    #[serde(default)]
    pub metrics: Vec<MetricSpec>,
    #[serde(default)]
    pub embeds: Vec<EmbedSpec>,
    /// Embeds run as a looping marquee, duplicated for the seam
    #[serde(default)]
    pub carousel: bool,
    #[serde(default)]
    pub next_button: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricSpec {
    pub label: String,
    /// Final value as written, e.g. "42+" or "7.5"
    pub count: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmbedSpec {
    pub src: String,
    /// Original post, when it cannot be derived from `src`
    #[serde(default)]
    pub href: Option<String>,
}

fn default_path() -> String {
    "/index.html".to_string()
}

impl PageSpec {
    /// Load a page from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let page: PageSpec = toml::from_str(content)?;
        page.validate()?;
        Ok(page)
    }

    /// The bundled demo page
    pub fn demo() -> Result<Self> {
        Self::from_toml(DEMO_PAGE)
    }

    fn validate(&self) -> Result<()> {
        if self.sections.is_empty() {
            return Err(Error::Page("page has no sections".to_string()));
        }
        for (i, section) in self.sections.iter().enumerate() {
            if section.id.is_empty() {
                return Err(Error::Page(format!("section {} has no id", i)));
            }
            if self.sections[..i].iter().any(|s| s.id == section.id) {
                return Err(Error::Page(format!("duplicate section id '{}'", section.id)));
            }
        }
        Ok(())
    }

    /// Index of the section with `id`
    pub fn section_index(&self, id: &str) -> Option<usize> {
        self.sections.iter().position(|s| s.id == id)
    }
}

//! The `ribbon.toml` manifest.
//!
//! ```toml
//! [options]
//! strict = false
//! default_catalogue = "application"
//!
//! [[plugin]]
//! name = "core"
//! files = ["core/ribbon.xml"]
//!
//! [[exclude]]
//! type = "control"
//! target = "id"
//! value = "print"
//! ```

use anyhow::{Context, Result};
use ribbon_config::{BuildOptions, Exclusion};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Manifest {
    #[serde(default)]
    pub options: ManifestOptions,
    #[serde(default, rename = "plugin")]
    pub plugins: Vec<PluginEntry>,
    #[serde(default, rename = "exclude")]
    pub exclusions: Vec<ExclusionEntry>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ManifestOptions {
    #[serde(default)]
    pub strict: bool,
    pub default_catalogue: Option<String>,
}

/// A plugin and the ribbon files it contributes, merged in the listed order.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PluginEntry {
    pub name: String,
    pub extension: Option<String>,
    #[serde(default)]
    pub files: Vec<PathBuf>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ExclusionEntry {
    #[serde(rename = "type")]
    pub kind: String,
    pub target: String,
    pub value: String,
}

impl Manifest {
    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content).context("Invalid ribbon manifest")
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read manifest {}", path.display()))?;
        Self::from_toml(&content).with_context(|| format!("In {}", path.display()))
    }

    /// Options of the merge. `strict` from the command line wins over the
    /// manifest when set.
    pub fn build_options(&self, strict: bool) -> BuildOptions {
        let mut options = BuildOptions {
            strict: strict || self.options.strict,
            ..Default::default()
        };
        if let Some(catalogue) = &self.options.default_catalogue {
            options.default_catalogue = catalogue.clone();
        }
        options
    }

    pub fn exclusions(&self) -> Result<Vec<Exclusion>> {
        self.exclusions
            .iter()
            .map(|entry| {
                Exclusion::parse_parts(&entry.kind, &entry.target, &entry.value).with_context(|| {
                    format!(
                        "Invalid exclusion `{}` {}=`{}` in manifest",
                        entry.kind, entry.target, entry.value
                    )
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ribbon_config::{ExclusionTarget, ExclusionType};

    #[test]
    fn test_full_manifest() {
        let manifest = Manifest::from_toml(
            r#"
[options]
strict = true
default_catalogue = "plugin.web"

[[plugin]]
name = "core"
files = ["core/ribbon.xml", "core/menus.xml"]

[[plugin]]
name = "cms"
extension = "org.ametys.cms.ribbon"
files = ["cms.xml"]

[[exclude]]
type = "tab"
target = "label"
value = "ADMIN"
"#,
        )
        .unwrap();

        assert_eq!(manifest.plugins.len(), 2);
        assert_eq!(manifest.plugins[0].files.len(), 2);
        assert_eq!(manifest.plugins[1].extension.as_deref(), Some("org.ametys.cms.ribbon"));

        let options = manifest.build_options(false);
        assert!(options.strict);
        assert_eq!(options.default_catalogue, "plugin.web");

        let exclusions = manifest.exclusions().unwrap();
        assert_eq!(exclusions[0].kind, ExclusionType::Tab);
        assert_eq!(exclusions[0].target, ExclusionTarget::Label);
        assert_eq!(exclusions[0].value, "ADMIN");
    }

    #[test]
    fn test_empty_manifest_uses_defaults() {
        let manifest = Manifest::from_toml("").unwrap();
        assert!(manifest.plugins.is_empty());
        assert_eq!(manifest.build_options(false), BuildOptions::default());
        assert!(manifest.build_options(true).strict);
    }

    #[test]
    fn test_unknown_keys_are_rejected() {
        let err = Manifest::from_toml("[[plugin]]\nname = \"core\"\npath = \"x.xml\"\n").unwrap_err();
        assert!(format!("{:#}", err).contains("unknown field `path`"));
    }

    #[test]
    fn test_invalid_exclusion() {
        let manifest = Manifest::from_toml(
            "[[exclude]]\ntype = \"control\"\ntarget = \"label\"\nvalue = \"print\"\n",
        )
        .unwrap();
        let err = manifest.exclusions().unwrap_err();
        let message = format!("{:#}", err);
        assert!(message.contains("Invalid exclusion `control` label=`print`"));
        assert!(message.contains("does not apply"));
    }
}

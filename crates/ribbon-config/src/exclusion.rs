//! Exclusions remove contributions before anything is merged.

use crate::error::{Result, RibbonError};
use crate::fragment::{Fragment, FragmentKind, FragmentNode};
use ribbon_source_map::SourceInfo;
use serde::Serialize;
use std::fmt;

/// What an exclusion removes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ExclusionType {
    Import,
    AppMenu,
    UserMenu,
    Tab,
    Control,
}

/// How an exclusion designates what it removes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ExclusionTarget {
    Plugin,
    Extension,
    File,
    Label,
    Id,
}

impl ExclusionType {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "import" => Some(ExclusionType::Import),
            "app-menu" => Some(ExclusionType::AppMenu),
            "user-menu" => Some(ExclusionType::UserMenu),
            "tab" => Some(ExclusionType::Tab),
            "control" => Some(ExclusionType::Control),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ExclusionType::Import => "import",
            ExclusionType::AppMenu => "app-menu",
            ExclusionType::UserMenu => "user-menu",
            ExclusionType::Tab => "tab",
            ExclusionType::Control => "control",
        }
    }

    /// Targets that make sense for this type.
    pub fn targets(&self) -> &'static [ExclusionTarget] {
        use ExclusionTarget::*;
        match self {
            ExclusionType::Import => &[Plugin, Extension, File],
            ExclusionType::Tab => &[Label, Plugin],
            ExclusionType::Control => &[Id],
            ExclusionType::AppMenu | ExclusionType::UserMenu => &[Id, Plugin],
        }
    }

    fn tag(&self) -> String {
        format!("exclude-{}", self.as_str())
    }
}

impl ExclusionTarget {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "plugin" => Some(ExclusionTarget::Plugin),
            "extension" => Some(ExclusionTarget::Extension),
            "file" => Some(ExclusionTarget::File),
            "label" => Some(ExclusionTarget::Label),
            "id" => Some(ExclusionTarget::Id),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ExclusionTarget::Plugin => "plugin",
            ExclusionTarget::Extension => "extension",
            ExclusionTarget::File => "file",
            ExclusionTarget::Label => "label",
            ExclusionTarget::Id => "id",
        }
    }
}

/// A single exclusion rule.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Exclusion {
    pub kind: ExclusionType,
    pub target: ExclusionTarget,
    pub value: String,
    #[serde(skip)]
    pub source_info: Option<SourceInfo>,
}

impl Exclusion {
    pub fn new(kind: ExclusionType, target: ExclusionTarget, value: impl Into<String>) -> Result<Self> {
        Self::checked(kind, target, value.into(), None)
    }

    fn checked(
        kind: ExclusionType,
        target: ExclusionTarget,
        value: String,
        source_info: Option<SourceInfo>,
    ) -> Result<Self> {
        if !kind.targets().contains(&target) {
            return Err(RibbonError::AmbiguousExclusion {
                tag: kind.tag(),
                reason: format!("target `{}` does not apply to this exclusion", target.as_str()),
                source_info,
            });
        }
        if value.trim().is_empty() {
            return Err(RibbonError::AmbiguousExclusion {
                tag: kind.tag(),
                reason: "no value to exclude".to_string(),
                source_info,
            });
        }
        Ok(Self {
            kind,
            target,
            value: value.trim().to_string(),
            source_info,
        })
    }

    /// Build an exclusion from textual parts, as found in a manifest.
    pub fn parse_parts(kind: &str, target: &str, value: &str) -> Result<Self> {
        let ambiguous = |reason: String| RibbonError::AmbiguousExclusion {
            tag: format!("exclude-{}", kind),
            reason,
            source_info: None,
        };
        let kind = ExclusionType::parse(kind)
            .ok_or_else(|| ambiguous(format!("unknown exclusion type `{}`", kind)))?;
        let target = ExclusionTarget::parse(target)
            .ok_or_else(|| ambiguous(format!("unknown target `{}`", target)))?;
        Self::checked(kind, target, value.to_string(), None)
    }

    /// Read an `<exclude-{type}>` fragment.
    ///
    /// Accepted forms are `<exclude-tab target="label">HOME</exclude-tab>`
    /// and `<exclude-tab label="HOME"/>`.
    pub fn from_fragment(node: &FragmentNode) -> Result<Self> {
        let source_info = node.source_info.clone();
        let ambiguous = |reason: String| RibbonError::AmbiguousExclusion {
            tag: node.tag.clone(),
            reason,
            source_info: source_info.clone(),
        };

        let kind = node
            .tag
            .strip_prefix("exclude-")
            .and_then(ExclusionType::parse)
            .ok_or_else(|| ambiguous("unknown exclusion type".to_string()))?;

        if let Some(target_name) = node.attr("target") {
            let target = ExclusionTarget::parse(target_name)
                .ok_or_else(|| ambiguous(format!("unknown target `{}`", target_name)))?;
            let value = node
                .text()
                .ok_or_else(|| ambiguous("no value to exclude".to_string()))?;
            return Self::checked(kind, target, value.to_string(), source_info.clone());
        }

        let candidates: Vec<(ExclusionTarget, &str)> = node
            .attributes
            .iter()
            .filter_map(|(name, attr)| {
                ExclusionTarget::parse(name).map(|t| (t, attr.value.as_str()))
            })
            .collect();

        match candidates.as_slice() {
            [] => Err(ambiguous("no target given".to_string())),
            [(target, value)] => Self::checked(kind, *target, value.to_string(), source_info.clone()),
            several => Err(ambiguous(format!(
                "several targets given ({})",
                several
                    .iter()
                    .map(|(t, _)| t.as_str())
                    .collect::<Vec<_>>()
                    .join(", ")
            ))),
        }
    }

    /// Whether the whole fragment is dropped by this exclusion.
    fn drops(&self, fragment: &Fragment) -> bool {
        let kind = fragment.kind();
        let origin = &fragment.origin;
        match (self.kind, self.target) {
            (ExclusionType::Import, ExclusionTarget::Plugin) => origin.plugin == self.value,
            (ExclusionType::Import, ExclusionTarget::Extension) => {
                origin.extension.as_deref() == Some(self.value.as_str())
            }
            (ExclusionType::Import, ExclusionTarget::File) => {
                origin.file.as_deref() == Some(self.value.as_str())
            }
            (ExclusionType::Tab, ExclusionTarget::Label) => {
                kind == Some(FragmentKind::Tab) && fragment.root.attr("label") == Some(self.value.as_str())
            }
            (ExclusionType::Tab, ExclusionTarget::Plugin) => {
                kind == Some(FragmentKind::Tab) && origin.plugin == self.value
            }
            (ExclusionType::AppMenu, ExclusionTarget::Plugin) => {
                kind == Some(FragmentKind::AppMenu) && origin.plugin == self.value
            }
            (ExclusionType::UserMenu, ExclusionTarget::Plugin) => {
                kind == Some(FragmentKind::UserMenu) && origin.plugin == self.value
            }
            _ => false,
        }
    }

    /// Remove excluded controls from a fragment that is kept.
    fn prune(&self, fragment: &mut Fragment) -> usize {
        if self.target != ExclusionTarget::Id {
            return 0;
        }
        let applies = match self.kind {
            ExclusionType::Control => true,
            ExclusionType::AppMenu => fragment.kind() == Some(FragmentKind::AppMenu),
            ExclusionType::UserMenu => fragment.kind() == Some(FragmentKind::UserMenu),
            _ => false,
        };
        if applies {
            fragment.root.remove_controls(&self.value)
        } else {
            0
        }
    }
}

impl fmt::Display for Exclusion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "exclude-{} {}=`{}`",
            self.kind.as_str(),
            self.target.as_str(),
            self.value
        )
    }
}

/// All exclusions of a build.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ExclusionSet {
    exclusions: Vec<Exclusion>,
}

impl ExclusionSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, exclusion: Exclusion) {
        self.exclusions.push(exclusion);
    }

    pub fn len(&self) -> usize {
        self.exclusions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.exclusions.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Exclusion> {
        self.exclusions.iter()
    }

    /// Drop excluded fragments and strip excluded controls from the rest.
    ///
    /// Exclusion fragments are passed through untouched.
    pub fn apply(&self, fragments: Vec<Fragment>) -> Vec<Fragment> {
        fragments
            .into_iter()
            .filter_map(|mut fragment| {
                if fragment.kind() == Some(FragmentKind::Exclusion) {
                    return Some(fragment);
                }
                if let Some(exclusion) = self.exclusions.iter().find(|e| e.drops(&fragment)) {
                    tracing::debug!(
                        origin = %fragment.origin,
                        tag = %fragment.root.tag,
                        %exclusion,
                        "fragment excluded"
                    );
                    return None;
                }
                for exclusion in &self.exclusions {
                    let removed = exclusion.prune(&mut fragment);
                    if removed > 0 {
                        tracing::debug!(removed, %exclusion, "controls excluded");
                    }
                }
                Some(fragment)
            })
            .collect()
    }
}

impl FromIterator<Exclusion> for ExclusionSet {
    fn from_iter<I: IntoIterator<Item = Exclusion>>(iter: I) -> Self {
        Self {
            exclusions: iter.into_iter().collect(),
        }
    }
}

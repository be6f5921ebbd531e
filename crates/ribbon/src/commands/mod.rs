//! Command implementations for the ribbon CLI
//!
//! Both commands read the manifest and its fragment files the same way,
//! then hand the fragments to ribbon-config.

pub mod build;
pub mod check;

use crate::manifest::Manifest;
use anyhow::{Context, Result};
use ribbon_config::{Origin, RibbonBuilder, fragments_from_document};
use ribbon_error_reporting::DiagnosticMessage;
use ribbon_source_map::SourceContext;
use std::fs;
use std::path::Path;
use tracing::debug;

/// A builder loaded with every fragment of a manifest, and the sources the
/// fragments were read from.
pub struct Prepared {
    pub builder: RibbonBuilder,
    pub sources: SourceContext,
}

/// Read `manifest_path` and every file it lists.
///
/// Files that are not well-formed XML are reported as diagnostics and
/// skipped, or abort in strict mode.
pub fn prepare(manifest_path: &Path, strict: bool) -> Result<Prepared> {
    let manifest = Manifest::load(manifest_path)?;
    let base = manifest_path.parent().unwrap_or_else(|| Path::new("."));
    let options = manifest.build_options(strict);
    let strict = options.strict;

    let mut builder = RibbonBuilder::new(options);
    let mut sources = SourceContext::new();
    for exclusion in manifest.exclusions()? {
        builder.add_exclusion(exclusion);
    }

    for plugin in &manifest.plugins {
        for file in &plugin.files {
            let path = base.join(file);
            let content = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read {} for plugin `{}`", path.display(), plugin.name))?;
            let file_id = sources.add_file(path.display().to_string(), Some(content.clone()));

            let document = match ribbon_xml::parse_with_file_id(&content, file_id) {
                Ok(document) => document,
                Err(err) if strict => {
                    return Err(err).with_context(|| format!("Failed to parse {}", path.display()));
                }
                Err(err) => {
                    builder.add_diagnostics([err.to_diagnostic()]);
                    continue;
                }
            };

            let mut origin = Origin::new(&plugin.name).with_file(file.display().to_string());
            if let Some(extension) = &plugin.extension {
                origin = origin.with_extension(extension);
            }
            let mut diagnostics = Vec::new();
            let fragments = fragments_from_document(&document.root, &origin, &mut diagnostics);
            debug!(%origin, fragments = fragments.len(), "read ribbon file");
            builder.add_fragments(fragments).add_diagnostics(diagnostics);
        }
    }

    Ok(Prepared { builder, sources })
}

/// Print diagnostics to stderr, as text with source snippets or as one JSON
/// object per line.
pub fn print_diagnostics(diagnostics: &[DiagnosticMessage], sources: &SourceContext, json: bool) {
    for diagnostic in diagnostics {
        if json {
            eprintln!("{}", diagnostic.to_json());
        } else {
            eprint!("{}", diagnostic.to_text(Some(sources)));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write(dir: &TempDir, name: &str, content: &str) {
        let path = dir.path().join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, content).unwrap();
    }

    #[test]
    fn test_prepare_reads_files_relative_to_manifest() {
        let dir = TempDir::new().unwrap();
        write(
            &dir,
            "ribbon.toml",
            "[[plugin]]\nname = \"core\"\nfiles = [\"core/tabs.xml\", \"broken.xml\"]\n",
        );
        write(&dir, "core/tabs.xml", r#"<tab label="HOME"><groups><group label="G"><control id="a"/></group></groups></tab>"#);
        write(&dir, "broken.xml", "<tab label=\"X\">");

        let prepared = prepare(&dir.path().join("ribbon.toml"), false).unwrap();
        assert_eq!(prepared.sources.len(), 2);

        let output = prepared.builder.build().unwrap();
        assert_eq!(output.model.tabs().len(), 1);
        assert_eq!(output.diagnostics.len(), 1);
        assert!(output.diagnostics[0].code.as_deref().is_some_and(|c| c.starts_with("R-9-")));
    }

    #[test]
    fn test_prepare_strict_parse_failure() {
        let dir = TempDir::new().unwrap();
        write(&dir, "ribbon.toml", "[[plugin]]\nname = \"core\"\nfiles = [\"broken.xml\"]\n");
        write(&dir, "broken.xml", "<tab label=\"X\">");

        let err = prepare(&dir.path().join("ribbon.toml"), true).err().unwrap();
        assert!(format!("{:#}", err).contains("Failed to parse"));
    }

    #[test]
    fn test_prepare_missing_file() {
        let dir = TempDir::new().unwrap();
        write(&dir, "ribbon.toml", "[[plugin]]\nname = \"core\"\nfiles = [\"missing.xml\"]\n");

        let err = prepare(&dir.path().join("ribbon.toml"), false).err().unwrap();
        assert!(format!("{:#}", err).contains("for plugin `core`"));
    }
}

//! Project manifest: what to generate, read from YAML or JSON.

use crate::error::{Error, Result};
use indexmap::IndexMap;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Manifest file contents. Every field is optional; CLI flags fill the gaps.
#[derive(Debug, Default, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Manifest {
    /// Document / service name
    pub name: Option<String>,
    /// class → endpoint URI, in the order written
    pub classes: IndexMap<String, String>,
    /// Source files, directories or glob patterns
    pub sources: Vec<String>,
    /// Directories searched for `wsdl.xsd`
    pub schema_dirs: Vec<PathBuf>,
    /// Where to write the document
    pub output: Option<PathBuf>,
}

impl Manifest {
    /// Make relative paths relative to `base` (the manifest's directory).
    fn rebase(mut self, base: &Path) -> Self {
        let join = |p: &str| -> String {
            if Path::new(p).is_absolute() {
                p.to_string()
            } else {
                base.join(p).to_string_lossy().to_string()
            }
        };
        self.sources = self.sources.iter().map(|s| join(s)).collect();
        self.schema_dirs = self
            .schema_dirs
            .iter()
            .map(|d| if d.is_absolute() { d.clone() } else { base.join(d) })
            .collect();
        self.output = self
            .output
            .map(|o| if o.is_absolute() { o } else { base.join(o) });
        self
    }
}

/// Load a manifest by extension: `.yaml`/`.yml` or `.json`.
pub fn load_manifest(path: &Path) -> Result<Manifest> {
    let invalid = |reason: String| Error::Config {
        path: path.to_path_buf(),
        reason,
    };

    if !path.exists() {
        return Err(invalid("file does not exist".to_string()));
    }
    let contents = fs::read_to_string(path).map_err(|e| invalid(e.to_string()))?;
    let ext = path
        .extension()
        .and_then(|os| os.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let manifest: Manifest = match ext.as_str() {
        "yaml" | "yml" => serde_yaml::from_str(&contents)
            .map_err(|e| invalid(format!("invalid YAML: {e}")))?,
        "json" => serde_json::from_str(&contents)
            .map_err(|e| invalid(format!("invalid JSON: {e}")))?,
        other => return Err(invalid(format!("unsupported config extension: {other}"))),
    };

    let base = path.parent().unwrap_or_else(|| Path::new(""));
    Ok(manifest.rebase(base))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn yaml_manifest_keeps_class_order() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("wsdlgen.yaml");
        fs::write(
            &path,
            "name: Calc\nclasses:\n  Zeta: http://host/z\n  Alpha: http://host/a\nsources:\n  - src/*.rs\noutput: out/calc.wsdl\n",
        )
        .unwrap();

        let manifest = load_manifest(&path).unwrap();
        assert_eq!(manifest.name.as_deref(), Some("Calc"));
        let classes: Vec<_> = manifest.classes.keys().map(String::as_str).collect();
        assert_eq!(classes, ["Zeta", "Alpha"]);
        assert_eq!(manifest.sources, [dir.path().join("src/*.rs").to_string_lossy().to_string()]);
        assert_eq!(manifest.output, Some(dir.path().join("out/calc.wsdl")));
    }

    #[test]
    fn json_manifest() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("wsdlgen.json");
        fs::write(&path, r#"{"name": "Calc", "classes": {"Calculator": "http://host/calc"}}"#).unwrap();
        let manifest = load_manifest(&path).unwrap();
        assert_eq!(manifest.classes["Calculator"], "http://host/calc");
        assert!(manifest.sources.is_empty());
    }

    #[test]
    fn unknown_fields_rejected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("wsdlgen.yaml");
        fs::write(&path, "nmae: typo\n").unwrap();
        let err = load_manifest(&path).unwrap_err();
        assert!(matches!(err, Error::Config { .. }));
        assert!(err.to_string().contains("invalid YAML"));
    }

    #[test]
    fn unsupported_extension() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("wsdlgen.toml");
        fs::write(&path, "name = 'x'\n").unwrap();
        let err = load_manifest(&path).unwrap_err();
        assert!(err.to_string().contains("unsupported config extension"));
    }

    #[test]
    fn missing_file_names_the_path() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("absent.yaml");
        let err = load_manifest(&path).unwrap_err();
        assert!(matches!(err, Error::Config { .. }));
        assert!(err.to_string().contains("absent.yaml"));
    }
}

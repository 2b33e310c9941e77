use std::collections::BTreeMap;
use std::path::Path;

/// External variables passed to the rule compiler.
///
/// Seeded with six path-derived entries every rule set can rely on, then
/// grown (never shrunk) by the compiler as rules turn out to reference
/// identifiers the caller did not anticipate. A `BTreeMap` keeps the
/// definition order deterministic across runs.
#[derive(Debug, Clone, Default)]
pub struct ExternalVars {
    vars: BTreeMap<String, String>,
}

impl ExternalVars {
    /// Derive the seed entries from the resolved target path.
    ///
    /// This is total: a path with no file name, extension, or parent still
    /// seeds all six variables, with empty strings where the component is
    /// absent. At the filesystem root the grandparent collapses to the
    /// empty string rather than erroring.
    pub fn seed(target: &Path) -> Self {
        let name_of = |p: &Path| {
            p.file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default()
        };

        let extension = target
            .extension()
            .map(|e| e.to_string_lossy().to_lowercase())
            .unwrap_or_default();

        let mut vars = BTreeMap::new();
        vars.insert("filepath".into(), target.display().to_string());
        vars.insert("filename".into(), name_of(target));
        vars.insert("extension".into(), extension.clone());
        vars.insert("filetype".into(), extension);
        vars.insert(
            "parentdir".into(),
            target.parent().map(name_of).unwrap_or_default(),
        );
        vars.insert(
            "grandparentdir".into(),
            target
                .parent()
                .and_then(Path::parent)
                .map(name_of)
                .unwrap_or_default(),
        );

        Self { vars }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.vars.contains_key(name)
    }

    /// Register an undeclared identifier with an empty-string default.
    pub fn define_default(&mut self, name: &str) {
        self.vars.insert(name.to_string(), String::new());
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.vars.get(name).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.vars.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }
}

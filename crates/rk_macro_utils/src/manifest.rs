use std::collections::BTreeMap;
use std::env;
use std::path::{Path, PathBuf};
use std::sync::{PoisonError, RwLock};
use std::time::SystemTime;

use proc_macro2::Span;
use toml_edit::{Document, Item, Table};

/// The parsed `Cargo.toml` of the crate that invoked a proc-macro.
///
/// Generated code must name the runtime crate the way the *caller* sees it,
/// which depends on how the caller depends on recordkit:
///
/// 1. `rk_mapper` listed directly: `::rk_mapper`.
/// 2. The umbrella package `recordkit` listed: `::recordkit::mapper`.
/// 3. The facade package `rk_core` listed: `::rk_core::mapper`.
/// 4. The short alias `rk` listed: `::rk::mapper`.
/// 5. Steps 1-4 again in `dev-dependencies`.
/// 6. Otherwise `::rk_mapper`.
///
/// A crate that runs its own derive in unit tests should add
/// `extern crate self as rk_mapper;` so that rule 6 resolves.
///
/// # Example
///
/// ```rust
/// # use rk_macro_utils::Manifest;
/// let p: syn::Path = Manifest::shared(|m| m.get_crate_path("rk_mapper"));
/// ```
#[derive(Debug)]
pub struct Manifest {
    manifest: Option<Document<Box<str>>>,
    modified_time: Option<SystemTime>,
}

const FULL_KIT_NAME: &str = "recordkit";
const CORE_KIT_NAME: &str = "rk_core";
const SHORT_KIT_NAME: &str = "rk";
const KIT_PREFIX: &str = "rk_";

impl Manifest {
    fn manifest_path() -> Option<PathBuf> {
        let mut path = PathBuf::from(env::var_os("CARGO_MANIFEST_DIR")?);
        path.push("Cargo.toml");
        path.exists().then_some(path)
    }

    fn load(path: &Path) -> Self {
        let modified_time = std::fs::metadata(path).and_then(|m| m.modified()).ok();
        let manifest = std::fs::read_to_string(path)
            .ok()
            .and_then(|text| Document::parse(text.into_boxed_str()).ok());
        Self {
            manifest,
            modified_time,
        }
    }

    fn from_document(manifest: Option<Document<Box<str>>>) -> Self {
        Self {
            manifest,
            modified_time: None,
        }
    }

    /// Parses a manifest from text. Used by tests and tooling.
    pub fn parse(text: &str) -> Self {
        Self::from_document(Document::parse(Box::<str>::from(text)).ok())
    }

    fn absolute(segments: &[&str]) -> syn::Path {
        let mut path = syn::Path {
            leading_colon: Some(Default::default()),
            segments: Default::default(),
        };
        for segment in segments {
            path.segments
                .push(syn::PathSegment::from(syn::Ident::new(segment, Span::call_site())));
        }
        path
    }

    fn find_in_deps(deps: &Table, name: &str) -> Option<syn::Path> {
        if deps.contains_key(name) {
            return Some(Self::absolute(&[name]));
        }
        let module = name.strip_prefix(KIT_PREFIX)?;
        [FULL_KIT_NAME, CORE_KIT_NAME, SHORT_KIT_NAME]
            .into_iter()
            .find(|kit| deps.contains_key(kit))
            .map(|kit| Self::absolute(&[kit, module]))
    }

    /// Returns the path under which the caller can reach the crate `name`.
    pub fn get_crate_path(&self, name: &str) -> syn::Path {
        if let Some(manifest) = &self.manifest {
            for section in ["dependencies", "dev-dependencies"] {
                if let Some(Item::Table(deps)) = manifest.get(section)
                    && let Some(path) = Self::find_in_deps(deps, name)
                {
                    return path;
                }
            }
        }
        Self::absolute(&[name])
    }

    /// Runs `func` against the caller's manifest.
    ///
    /// Manifests are cached per path and re-read only when the file's
    /// modification time changes, so one lookup per macro invocation is cheap.
    pub fn shared<R>(func: impl FnOnce(&Self) -> R) -> R {
        static MANIFESTS: RwLock<BTreeMap<PathBuf, Manifest>> = RwLock::new(BTreeMap::new());

        let Some(path) = Self::manifest_path() else {
            return func(&Self::from_document(None));
        };
        let modified_time = std::fs::metadata(&path).and_then(|m| m.modified()).ok();

        {
            let manifests = MANIFESTS.read().unwrap_or_else(PoisonError::into_inner);
            if let Some(manifest) = manifests.get(&path)
                && manifest.modified_time.is_some()
                && manifest.modified_time == modified_time
            {
                return func(manifest);
            }
        }

        let manifest = Self::load(&path);
        let result = func(&manifest);

        MANIFESTS
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(path, manifest);

        result
    }
}

#[cfg(test)]
mod tests {
    use super::Manifest;

    fn path_string(path: &syn::Path) -> String {
        let segments: Vec<String> = path.segments.iter().map(|s| s.ident.to_string()).collect();
        format!("::{}", segments.join("::"))
    }

    #[test]
    fn direct_dependency() {
        let manifest = Manifest::parse("[dependencies]\nrk_mapper = \"0.1\"\n");
        assert_eq!(path_string(&manifest.get_crate_path("rk_mapper")), "::rk_mapper");
    }

    #[test]
    fn facade_dependency() {
        let manifest = Manifest::parse("[dependencies]\nrk_core = \"0.1\"\n");
        assert_eq!(
            path_string(&manifest.get_crate_path("rk_mapper")),
            "::rk_core::mapper"
        );
    }

    #[test]
    fn dev_dependency_alias() {
        let manifest = Manifest::parse("[dev-dependencies]\nrk = { package = \"rk_core\" }\n");
        assert_eq!(path_string(&manifest.get_crate_path("rk_mapper")), "::rk::mapper");
    }

    #[test]
    fn fallback() {
        let manifest = Manifest::parse("[dependencies]\nserde = \"1\"\n");
        assert_eq!(path_string(&manifest.get_crate_path("rk_mapper")), "::rk_mapper");
    }
}

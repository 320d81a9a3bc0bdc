use std::collections::HashSet;
use std::path::Path;

use anyhow::Context as _;

use crate::foundation::error::{ComposeError, ComposeResult};

/// One named fabric, optionally split into variants.
///
/// Keys are also accepted in the storefront's Spanish spelling (`nombre`, `imagenTela`,
/// `tipoCierre`, `imagenCierre`, `imagenCombinada`, `tipos`).
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CatalogEntry {
    #[serde(alias = "nombre")]
    pub name: String,
    #[serde(default, alias = "imagenTela")]
    pub material_image: Option<String>,
    #[serde(default, alias = "tipoCierre")]
    pub hardware_type: Option<String>,
    #[serde(default, alias = "imagenCierre")]
    pub hardware_image: Option<String>,
    /// Precomputed preview, if one was shot by hand.
    #[serde(default, alias = "imagenCombinada")]
    pub example_image: Option<String>,
    #[serde(default, alias = "tipos")]
    pub variants: Vec<CatalogEntry>,
}

/// Everything needed to render one preview.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PreviewRequest {
    /// `Parent/Variant` display path.
    pub name: String,
    /// File-system-safe version of `name`.
    pub slug: String,
    pub material_image: String,
    pub hardware_image: String,
    pub hardware_type: Option<String>,
    pub example_image: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct Catalog {
    pub entries: Vec<CatalogEntry>,
}

impl Catalog {
    pub fn from_json_str(json: &str) -> ComposeResult<Self> {
        let catalog: Self = serde_json::from_str(json).context("parse catalog json")?;
        catalog.validate()?;
        Ok(catalog)
    }

    pub fn from_path(path: &Path) -> ComposeResult<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("read catalog '{}'", path.display()))?;
        Self::from_json_str(&json)
    }

    fn validate(&self) -> ComposeResult<()> {
        fn walk(entries: &[CatalogEntry]) -> ComposeResult<()> {
            for e in entries {
                if e.name.trim().is_empty() {
                    return Err(ComposeError::validation("catalog entry name must be non-empty"));
                }
                walk(&e.variants)?;
            }
            Ok(())
        }
        walk(&self.entries)
    }

    /// Flatten to the leaf entries that have both images. Variants inherit the material, hardware
    /// image and hardware type of their parent when they leave them out.
    ///
    /// Slugs are unique within the result: a name that slugifies like an earlier one gets a
    /// `-2`, `-3`, ... suffix.
    pub fn preview_requests(&self) -> Vec<PreviewRequest> {
        let mut out = Vec::new();
        for e in &self.entries {
            collect(e, None, &mut out);
        }

        let mut taken = HashSet::with_capacity(out.len());
        for req in &mut out {
            if !taken.insert(req.slug.clone()) {
                let base = std::mem::take(&mut req.slug);
                let mut n = 2u32;
                while !taken.insert(format!("{base}-{n}")) {
                    n += 1;
                }
                req.slug = format!("{base}-{n}");
                tracing::debug!(name = %req.name, slug = %req.slug, "catalog slug collision");
            }
        }
        out
    }
}

fn collect(
    entry: &CatalogEntry,
    parent: Option<(&str, &CatalogEntry)>,
    out: &mut Vec<PreviewRequest>,
) {
    let name = match parent {
        Some((parent_name, _)) => format!("{parent_name}/{}", entry.name),
        None => entry.name.clone(),
    };
    let parent_entry = parent.map(|(_, p)| p);
    let inherit = |own: &Option<String>, from_parent: Option<&String>| {
        own.clone().or_else(|| from_parent.cloned())
    };
    let resolved = CatalogEntry {
        name: entry.name.clone(),
        material_image: inherit(
            &entry.material_image,
            parent_entry.and_then(|p| p.material_image.as_ref()),
        ),
        hardware_type: inherit(
            &entry.hardware_type,
            parent_entry.and_then(|p| p.hardware_type.as_ref()),
        ),
        hardware_image: inherit(
            &entry.hardware_image,
            parent_entry.and_then(|p| p.hardware_image.as_ref()),
        ),
        example_image: entry.example_image.clone(),
        variants: Vec::new(),
    };

    if entry.variants.is_empty() {
        if let (Some(material), Some(hardware)) =
            (&resolved.material_image, &resolved.hardware_image)
        {
            out.push(PreviewRequest {
                slug: slugify(&name),
                name,
                material_image: material.clone(),
                hardware_image: hardware.clone(),
                hardware_type: resolved.hardware_type.clone(),
                example_image: resolved.example_image.clone(),
            });
        }
        return;
    }
    for v in &entry.variants {
        collect(v, Some((&name, &resolved)), out);
    }
}

/// Lowercase alphanumerics with single `-` separators.
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    for c in name.chars() {
        if c.is_alphanumeric() {
            slug.extend(c.to_lowercase());
        } else if !slug.is_empty() && !slug.ends_with('-') {
            slug.push('-');
        }
    }
    while slug.ends_with('-') {
        slug.pop();
    }
    if slug.is_empty() {
        slug.push_str("preview");
    }
    slug
}

#[cfg(test)]
#[path = "../tests/unit/catalog.rs"]
mod tests;

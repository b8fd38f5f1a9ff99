use std::{collections::BTreeMap, path::PathBuf};

use serde::{Deserialize, Deserializer};

/// A volume served by the wrapper daemon under a given export name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VolumeExport {
    /// Name remote clients ask for.
    pub name: String,

    /// Path of the file or block device backing the export.
    pub path: PathBuf,
}

/// The shapes accepted for `volumes` in the wrapper object.
#[derive(Deserialize)]
#[serde(untagged)]
enum VolumesSource {
    /// Format of 0.1.0 pre-releases: a plain list of paths, each exported under its own path.
    List(Vec<String>),

    /// Current format: export name to path.
    Map(BTreeMap<String, PathBuf>),
}

/// Ordered exports of the wrapper daemon, whatever shape they were configured with.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VolumeExports(Vec<VolumeExport>);

impl<'de> Deserialize<'de> for VolumeExports {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(match VolumesSource::deserialize(deserializer)? {
            VolumesSource::List(paths) => VolumeExports(
                paths
                    .into_iter()
                    .map(|path| VolumeExport {
                        path: PathBuf::from(&path),
                        name: path,
                    })
                    .collect(),
            ),
            VolumesSource::Map(exports) => VolumeExports(
                exports
                    .into_iter()
                    .map(|(name, path)| VolumeExport { name, path })
                    .collect(),
            ),
        })
    }
}

impl VolumeExports {
    pub fn iter(&self) -> impl Iterator<Item = &VolumeExport> {
        self.0.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<VolumeExport> for VolumeExports {
    fn from_iter<I: IntoIterator<Item = VolumeExport>>(iter: I) -> Self {
        VolumeExports(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a VolumeExports {
    type Item = &'a VolumeExport;
    type IntoIter = std::slice::Iter<'a, VolumeExport>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use serde_json::json;

    fn pairs(exports: &VolumeExports) -> Vec<(&str, &str)> {
        exports
            .iter()
            .map(|e| (e.name.as_str(), e.path.to_str().unwrap()))
            .collect()
    }

    #[test]
    fn test_list_form() {
        let exports: VolumeExports = serde_json::from_value(json!(["/a", "/b"])).unwrap();
        assert_eq!(pairs(&exports), vec![("/a", "/a"), ("/b", "/b")]);
    }

    #[test]
    fn test_map_form() {
        let exports: VolumeExports =
            serde_json::from_value(json!({"b": "/b", "a": "/a"})).unwrap();
        assert_eq!(pairs(&exports), vec![("a", "/a"), ("b", "/b")]);
    }

    #[test]
    fn test_empty_forms() {
        let exports: VolumeExports = serde_json::from_value(json!([])).unwrap();
        assert!(exports.is_empty());

        let exports: VolumeExports = serde_json::from_value(json!({})).unwrap();
        assert!(exports.is_empty());
    }

    #[test]
    fn test_invalid_forms() {
        serde_json::from_value::<VolumeExports>(json!("/a")).unwrap_err();
        serde_json::from_value::<VolumeExports>(json!([1, 2])).unwrap_err();
        serde_json::from_value::<VolumeExports>(json!({"a": 1})).unwrap_err();
    }
}

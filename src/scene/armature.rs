//! Armature (bone forest) input data.

use crate::util::{Error, Result, Vec3};

use super::MeshData;

/// A single bone.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Bone {
    /// Bone name, matched against vertex groups and clip bone groups.
    pub name: String,
    /// Tail minus head, in armature space.
    pub direction: Vec3,
    /// Index of the parent in the owning armature's bone list.
    pub parent: Option<usize>,
}

impl Bone {
    /// Create a root bone.
    pub fn new(name: impl Into<String>, direction: Vec3) -> Self {
        Self { name: name.into(), direction, parent: None }
    }

    /// Create a root bone from its head and tail positions.
    pub fn from_head_tail(name: impl Into<String>, head: Vec3, tail: Vec3) -> Self {
        Self::new(name, tail - head)
    }

    /// Set the parent index.
    pub fn with_parent(mut self, parent: usize) -> Self {
        self.parent = Some(parent);
        self
    }
}

/// Ordered bone list. Positions in this list are the bone indices used by
/// parent references and skin weights.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ArmatureData {
    pub bones: Vec<Bone>,
}

impl ArmatureData {
    pub fn new(bones: Vec<Bone>) -> Self {
        Self { bones }
    }

    /// Get number of bones.
    pub fn num_bones(&self) -> usize {
        self.bones.len()
    }

    /// Look up a bone index by name.
    pub fn bone_index(&self, name: &str) -> Option<usize> {
        self.bones.iter().position(|b| b.name == name)
    }

    /// Check that every parent reference is in range and the relation is a forest.
    pub fn validate(&self) -> Result<()> {
        let count = self.bones.len();
        for bone in &self.bones {
            let mut current = bone.parent;
            let mut steps = 0;
            while let Some(p) = current {
                if p >= count {
                    return Err(Error::IndexOutOfRange { what: "parent bone", index: p, count });
                }
                steps += 1;
                if steps > count {
                    return Err(Error::InvalidParent(bone.name.clone()));
                }
                current = self.bones[p].parent;
            }
        }
        Ok(())
    }

    /// Keep only bones that influence at least one vertex of `meshes`.
    ///
    /// Bone order is preserved and parent indices are remapped into the kept
    /// list. A kept bone whose parent is dropped is rejected.
    pub fn influencing(&self, meshes: &[&MeshData]) -> Result<ArmatureData> {
        self.validate()?;

        let keep: Vec<bool> = self
            .bones
            .iter()
            .map(|bone| {
                meshes.iter().any(|mesh| {
                    mesh.group_index(&bone.name)
                        .is_some_and(|g| mesh.group_has_influence(g))
                })
            })
            .collect();

        let mut remap = vec![None; self.bones.len()];
        let mut next = 0usize;
        for (i, kept) in keep.iter().enumerate() {
            if *kept {
                remap[i] = Some(next);
                next += 1;
            }
        }

        let mut bones = Vec::with_capacity(next);
        for (i, bone) in self.bones.iter().enumerate() {
            if !keep[i] {
                continue;
            }
            let parent = match bone.parent {
                None => None,
                Some(p) => match remap[p] {
                    Some(np) => Some(np),
                    None => {
                        return Err(Error::DroppedParent {
                            bone: bone.name.clone(),
                            parent: self.bones[p].name.clone(),
                        })
                    }
                },
            };
            bones.push(Bone { name: bone.name.clone(), direction: bone.direction, parent });
        }

        tracing::debug!(
            total = self.bones.len(),
            kept = bones.len(),
            "selected influencing bones"
        );
        Ok(ArmatureData { bones })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::GroupWeight;
    use smallvec::smallvec;

    fn chain() -> ArmatureData {
        ArmatureData::new(vec![
            Bone::new("Root", Vec3::Y),
            Bone::new("Spine", Vec3::Y).with_parent(0),
            Bone::new("Tail", Vec3::NEG_Z).with_parent(0),
            Bone::new("Head", Vec3::Y).with_parent(1),
        ])
    }

    fn weighted(groups: &[&str]) -> MeshData {
        let weights = vec![groups
            .iter()
            .enumerate()
            .map(|(i, _)| GroupWeight::new(i, 0.5))
            .collect()];
        MeshData::new(vec![Vec3::ZERO], vec![])
            .with_weights(groups.iter().map(|s| s.to_string()).collect(), weights)
    }

    #[test]
    fn test_head_tail() {
        let bone = Bone::from_head_tail("B", Vec3::new(1.0, 1.0, 1.0), Vec3::new(1.0, 3.0, 1.0));
        assert_eq!(bone.direction, Vec3::new(0.0, 2.0, 0.0));
        assert_eq!(bone.parent, None);
    }

    #[test]
    fn test_validate() {
        assert!(chain().validate().is_ok());

        let mut cyclic = chain();
        cyclic.bones[0].parent = Some(3);
        assert!(matches!(cyclic.validate(), Err(Error::InvalidParent(_))));

        let mut dangling = chain();
        dangling.bones[2].parent = Some(9);
        assert!(matches!(dangling.validate(), Err(Error::IndexOutOfRange { index: 9, .. })));
    }

    #[test]
    fn test_influencing_remaps_parents() {
        let mesh = weighted(&["Root", "Spine", "Head"]);
        let kept = chain().influencing(&[&mesh]).unwrap();

        let names: Vec<_> = kept.bones.iter().map(|b| b.name.as_str()).collect();
        assert_eq!(names, ["Root", "Spine", "Head"]);
        assert_eq!(kept.bones[2].parent, Some(1));
        assert_eq!(kept.bone_index("Head"), Some(2));
    }

    #[test]
    fn test_influencing_across_meshes() {
        let a = weighted(&["Root"]);
        let b = weighted(&["Tail"]);
        let kept = chain().influencing(&[&a, &b]).unwrap();
        assert_eq!(kept.num_bones(), 2);
        assert_eq!(kept.bones[1].name, "Tail");
        assert_eq!(kept.bones[1].parent, Some(0));
    }

    #[test]
    fn test_influencing_rejects_dropped_parent() {
        let mesh = weighted(&["Root", "Head"]);
        let err = chain().influencing(&[&mesh]).unwrap_err();
        assert!(matches!(err, Error::DroppedParent { ref bone, ref parent } if bone == "Head" && parent == "Spine"));
    }
}

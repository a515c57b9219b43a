//! Integration tests for exporting sch3D files and reading them back.

use sch3d::decode::{read_armature_file, read_mesh_file, read_movements_file};
use sch3d::options::{ArmatureOptions, MeshOptions, MovementOptions, ScaleMode};
use sch3d::prelude::*;
use sch3d::scene::{Axis, ChannelKey, GroupWeight, QuatComponent};

use smallvec::smallvec;
use tempfile::TempDir;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// A two-bone arm: upper and lower, one triangle weighted to each.
fn arm() -> (MeshData, ArmatureData) {
    let mesh = MeshData::new(
        vec![
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(0.2, 0.0, 0.0),
            Vec3::new(0.0, 1.0, 0.0),
            Vec3::new(0.2, 1.0, 0.0),
            Vec3::new(0.0, 2.0, 0.0),
        ],
        vec![smallvec![0, 1, 2], smallvec![1, 3, 2], smallvec![2, 3, 4]],
    )
    .with_weights(
        vec!["Upper".into(), "Lower".into(), "Unused".into()],
        vec![
            smallvec![GroupWeight::new(0, 1.0)],
            smallvec![GroupWeight::new(0, 1.0)],
            smallvec![GroupWeight::new(0, 0.5), GroupWeight::new(1, 0.5)],
            smallvec![GroupWeight::new(0, 0.5), GroupWeight::new(1, 0.5)],
            smallvec![GroupWeight::new(1, 1.0), GroupWeight::new(2, 0.0)],
        ],
    );
    let armature = ArmatureData::new(vec![
        Bone::from_head_tail("Upper", Vec3::ZERO, Vec3::Y),
        Bone::from_head_tail("Lower", Vec3::Y, Vec3::new(0.0, 2.0, 0.0)).with_parent(0),
        Bone::from_head_tail("Hand", Vec3::new(0.0, 2.0, 0.0), Vec3::new(0.0, 2.5, 0.0))
            .with_parent(1),
    ]);
    (mesh, armature)
}

fn wave(frames: usize) -> ActionData {
    let keys = |scale: f32| -> Vec<Keyframe> {
        (1..=frames)
            .map(|f| {
                let t = f as f32 * 10.0;
                Keyframe::new(t, scale * f as f32)
                    .with_handles(Vec2::new(t - 3.0, 0.0), Vec2::new(t + 3.0, 0.0))
            })
            .collect()
    };
    let mut action = ActionData::new("ArmAction.Wave");
    for axis in Axis::ALL {
        action = action.with_channel(ChannelKey::Location(axis), keys(0.0));
    }
    for c in QuatComponent::ALL {
        action = action.with_channel(ChannelKey::Rotation(c), keys(0.1));
        action = action.with_bone_channel("Lower", ChannelKey::Rotation(c), keys(0.2));
    }
    action.with_channel(ChannelKey::ScaleUniform, keys(1.0))
}

#[test]
fn test_roundtrip_skinned_arm() {
    init_tracing();
    let dir = TempDir::new().expect("Failed to create temp dir");
    let (mesh, armature) = arm();

    let used = armature.influencing(&[&mesh]).expect("Failed to filter bones");
    assert_eq!(used.num_bones(), 2, "Hand has no weighted vertices");

    let options = MeshOptions::default().with_armature_indexed(true);
    let report = export_mesh(dir.path(), "arm", &mesh, Some(&used), &options)
        .expect("Failed to export mesh");
    println!("Wrote {} ({} bytes)", report.path.display(), report.bytes_written);

    let decoded = read_mesh_file(&report.path).expect("Failed to read mesh");
    assert_eq!(decoded.num_faces(), 3);
    assert_eq!(decoded.num_vertices(), 5);
    assert_eq!(decoded.positions[13], 2.0);
    assert_eq!(decoded.skin.len(), 5);
    assert_eq!(decoded.skin[2].len(), 2);
    assert_eq!(decoded.skin[4].len(), 1, "Zero weights are dropped");
    assert_eq!(decoded.skin[4][0].bone, 1);
}

#[test]
fn test_roundtrip_armature_and_movements() {
    init_tracing();
    let dir = TempDir::new().expect("Failed to create temp dir");
    let (_, armature) = arm();
    let clips = vec![wave(4), ActionData::new("ArmAction.Rest")];

    let mut batch = ExportBatch::new(dir.path());
    batch
        .add_movements(MovementJob::new("arm", &clips))
        .add_armature(ArmatureJob::new("arm", &armature, &clips));
    let report = batch.run().expect("Batch export failed");
    assert_eq!(report.files.len(), 2);
    assert_eq!(report.warnings().count(), 0);

    let movements = read_movements_file(dir.path().join("arm.sch3Dmovements"))
        .expect("Failed to read movements");
    assert_eq!(movements.len(), 2);
    assert_eq!(movements[0].name, "Wave");
    assert_eq!(movements[0].keyframe_count, Some(4));
    assert_eq!(movements[1].name, "Rest");
    assert_eq!(movements[1].keyframe_count, None);

    let rot_w = movements[0]
        .channel(ChannelKey::Rotation(QuatComponent::W))
        .expect("Missing rotation.w");
    assert_eq!(rot_w[1].handle_left, Some(Vec2::new(17.0, 0.0)));
    assert_eq!(rot_w[1].co, Vec2::new(20.0, 0.2));

    let decoded = read_armature_file(dir.path().join("arm.sch3Darmature"))
        .expect("Failed to read armature");
    assert_eq!(decoded.bones.len(), 3);
    assert_eq!(decoded.bones[2].parent, Some(1));
    assert_eq!(decoded.clips.len(), 2);

    let wave = &decoded.clips[0];
    assert!(wave.bone_rotations[0].is_none());
    assert!(wave.bone_rotations[2].is_none());
    let lower = wave.bone_rotations[1].as_ref().expect("Lower should be animated");
    assert_eq!(lower[0].len(), 4);
    assert_eq!(lower[0][3].co, Vec2::new(40.0, 0.8));

    let rest = &decoded.clips[1];
    assert!(rest.bone_rotations.iter().all(Option::is_none));
}

#[test]
fn test_axis_scale_movements() {
    init_tracing();
    let dir = TempDir::new().expect("Failed to create temp dir");
    let mut action = ActionData::new("Jump");
    for axis in Axis::ALL {
        action = action.with_channel(ChannelKey::Scale(axis), vec![Keyframe::new(1.0, 1.0)]);
    }
    let options = MovementOptions { location: false, rotation: false, scale: ScaleMode::Axis };

    let report = export_movements(dir.path(), "box", &[action], &options)
        .expect("Failed to export movements");
    assert!(report.has_warnings(), "Jump has no clip suffix");
    // version | "Jump\0" | flags | count | 3 single-point curves
    assert_eq!(report.bytes_written, 4 + 5 + 1 + 1 + 3 * 8);

    let decoded = read_movements_file(&report.path).expect("Failed to read movements");
    assert_eq!(decoded[0].flags, [false, false, false, true]);
    assert_eq!(decoded[0].channels.len(), 3);
}

#[test]
fn test_rejected_export_leaves_no_file() {
    init_tracing();
    let dir = TempDir::new().expect("Failed to create temp dir");
    let (_, armature) = arm();
    let mut clip = wave(3);
    clip.bone_channels
        .get_mut("Lower")
        .expect("Lower group")
        .remove(&ChannelKey::Rotation(QuatComponent::Y));

    let err = export_armature(dir.path(), "arm", &armature, &[clip], &ArmatureOptions::default())
        .expect_err("Incomplete rotation must be rejected");
    assert!(matches!(err, Error::IncompleteRotation { found: 3, .. }));
    assert!(err.is_precondition());
    assert_eq!(std::fs::read_dir(dir.path()).expect("read dir").count(), 0);
}

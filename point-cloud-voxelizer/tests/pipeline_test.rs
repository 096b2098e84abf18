use constants::palette::PaletteEntry;
use std::fs;
use tempfile::TempDir;
use voxelizer::laz::MemoryPointSource;
use voxelizer::script_writer::{MemorySink, STAGING_DIR, ScriptWriter};
use voxelizer::{Point, Stage, VoxelConverter, VoxelKey, VoxelizerConfig, VoxelizerError};

static TWO_WOOLS: &[PaletteEntry] = &[
    PaletteEntry::new("WOOL", 0.95, 0.95, 0.95),
    PaletteEntry::new("RED_WOOL", 0.65, 0.17, 0.16),
];

/// Scale 1 with the start height raised by one so world (x, y, z) offsets
/// land on lattice (y, z, x) unchanged
fn unit_config(batch_size: usize) -> VoxelizerConfig {
    VoxelizerConfig {
        scale: 1.0,
        batch_size,
        start_offset: [0, 1, 0],
        ..Default::default()
    }
}

fn four_point_cloud() -> Vec<Point> {
    vec![
        Point::new(0.0, 0.0, 0.0, 255, 0, 0),
        Point::new(0.0, 0.0, 0.0, 0, 255, 0),
        Point::new(0.0, 1.0, 0.0, 0, 0, 255),
        Point::new(0.0, 2.0, 0.0, 255, 255, 255),
    ]
}

#[test]
fn four_points_become_three_labelled_voxels_in_two_batches() {
    let converter = VoxelConverter::with_palette(unit_config(2), TWO_WOOLS).unwrap();
    let mut source = MemoryPointSource::new("four points", four_point_cloud());
    let mut sink = MemorySink::default();

    let summary = converter.run(&mut source, &mut sink).unwrap();
    assert_eq!(summary.voxel_count, 3);
    assert_eq!(summary.batch_count, 2);

    let sizes: Vec<usize> = sink.batches.iter().map(|(_, b)| b.len()).collect();
    assert_eq!(sizes, vec![2, 1]);
    assert_eq!(sink.batches[0].0, 1);
    assert_eq!(sink.batches[1].0, 2);

    let records: Vec<_> = sink.batches.iter().flat_map(|(_, b)| b.clone()).collect();
    assert_eq!(records[0].key, VoxelKey::new(0, 0, 0));
    assert_eq!(records[0].mean_rgb, [127.5, 127.5, 0.0]);
    assert_eq!(records[0].label, "RED_WOOL");
    assert_eq!(records[1].key, VoxelKey::new(1, 0, 0));
    assert_eq!(records[1].label, "RED_WOOL");
    assert_eq!(records[2].key, VoxelKey::new(2, 0, 0));
    assert_eq!(records[2].label, "WOOL");
}

#[test]
fn overexposed_point_is_white_before_averaging() {
    let config = VoxelizerConfig {
        highlight_thresholds: [61440; 3],
        ..unit_config(10)
    };
    let converter = VoxelConverter::with_palette(config, TWO_WOOLS).unwrap();
    let voxelized = converter
        .voxelize(&[Point::new(0.0, 0.0, 0.0, 62000, 10, 10)])
        .unwrap();

    assert_eq!(voxelized.records.len(), 1);
    assert_eq!(voxelized.records[0].mean_rgb, [255.0, 255.0, 255.0]);
    assert_eq!(voxelized.records[0].label, "WOOL");
}

#[test]
fn below_ground_noise_is_dropped() {
    let mut points: Vec<Point> = (0..50)
        .map(|i| Point::new(i as f64 * 0.02, 0.0, 100.0, 30000, 30000, 30000))
        .collect();
    points.push(Point::new(0.0, 0.0, 80.0, 0, 0, 0));
    points.push(Point::new(0.0, 0.0, 94.9, 0, 0, 0));
    points.push(Point::new(0.0, 0.0, 95.1, 0, 0, 0));

    let converter = VoxelConverter::new(unit_config(100)).unwrap();
    let voxelized = converter.voxelize(&points).unwrap();

    assert_eq!(voxelized.ground_z, 100.0);
    assert_eq!(voxelized.discarded_points, 2);
    assert_eq!(voxelized.bounds.min_z, 95.1);
}

#[test]
fn output_is_independent_of_input_order() {
    let points: Vec<Point> = (0..3000)
        .map(|i| {
            let f = i as f64;
            Point::new(
                (f * 0.7).sin() * 3.0,
                (f * 0.3).cos() * 3.0,
                (f * 0.01) % 4.0,
                (i * 37 % 65536) as u16,
                (i * 91 % 65536) as u16,
                (i * 13 % 65536) as u16,
            )
        })
        .collect();

    let mut reversed = points.clone();
    reversed.reverse();

    let converter = VoxelConverter::new(VoxelizerConfig {
        scale: 2.0,
        batch_size: 64,
        ..Default::default()
    })
    .unwrap();

    let forward = converter.voxelize(&points).unwrap();
    let backward = converter.voxelize(&reversed).unwrap();
    assert_eq!(forward.records.len(), backward.records.len());
    for (a, b) in forward.records.iter().zip(&backward.records) {
        assert_eq!(a.key, b.key);
        assert_eq!(a.point_count, b.point_count);
        assert_eq!(a.mean_rgb, b.mean_rgb);
        assert_eq!(a.label, b.label);
    }
    assert!(forward.records.windows(2).all(|w| w[0].key < w[1].key));
}

#[test]
fn failed_run_leaves_previous_output_untouched() {
    let temp_dir = TempDir::new().unwrap();
    let previous = temp_dir.path().join("minecraft_code_part1.py");
    fs::write(&previous, "previous run").unwrap();

    // With no margin below ground every point at the modal level is cut
    let config = VoxelizerConfig {
        ground_offset: 0.0,
        ..unit_config(10)
    };
    let converter = VoxelConverter::new(config).unwrap();
    let points = vec![Point::new(0.0, 0.0, 0.0, 1, 2, 3); 4];
    let mut source = MemoryPointSource::new("flat", points);
    let mut sink = ScriptWriter::new(temp_dir.path());

    let err = converter.run(&mut source, &mut sink).unwrap_err();
    assert_eq!(err.stage, Stage::GroundFilter);
    assert!(matches!(
        err.kind(),
        VoxelizerError::EmptyInput {
            stage: Stage::GroundFilter
        }
    ));
    assert_eq!(fs::read_to_string(&previous).unwrap(), "previous run");
}

#[test]
fn scripts_replace_previous_run() {
    let temp_dir = TempDir::new().unwrap();
    for i in 1..=3 {
        fs::write(
            temp_dir.path().join(format!("minecraft_code_part{}.py", i)),
            "stale",
        )
        .unwrap();
    }

    let converter = VoxelConverter::with_palette(unit_config(2), TWO_WOOLS).unwrap();
    let mut source = MemoryPointSource::new("four points", four_point_cloud());
    let mut sink = ScriptWriter::new(temp_dir.path());
    let summary = converter.run(&mut source, &mut sink).unwrap();

    assert_eq!(
        summary.units,
        vec!["minecraft_code_part1", "minecraft_code_part2"]
    );
    assert!(!temp_dir.path().join("minecraft_code_part3.py").exists());
    assert!(!temp_dir.path().join(STAGING_DIR).exists());

    let first = fs::read_to_string(temp_dir.path().join("minecraft_code_part1.py")).unwrap();
    assert_eq!(
        first,
        "def on_on_chat():\n    \
         blocks.place(RED_WOOL, world(0, 0, 0))\n    \
         blocks.place(RED_WOOL, world(1, 0, 0))\n    \
         player.tell(mobs.target(LOCAL_PLAYER), \"fin\")\n\
         player.on_chat(\"run\", on_on_chat)\n"
    );

    let second = fs::read_to_string(temp_dir.path().join("minecraft_code_part2.py")).unwrap();
    assert!(second.contains("blocks.place(WOOL, world(2, 0, 0))"));
}

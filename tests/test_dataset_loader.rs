extern crate bvr_segment;

use std::path::Path;
use image::{Rgb, RgbImage};
use bvr_segment::data::ConfigSeg;
use bvr_segment::dataset_loader::{ImageDatasetLoader, SegmentationDatasetLoader};
use bvr_segment::Error;


/// Writes `count` inputs as `0000.png..` and labels as `0000_L.png..`.
fn write_dataset(root: &Path, count: usize) -> (String, String) {
    let inputs = root.join("train");
    let labels = root.join("train_labels");
    std::fs::create_dir_all(&inputs).unwrap();
    std::fs::create_dir_all(&labels).unwrap();

    for i in 0..count {
        RgbImage::from_pixel(8, 6, Rgb([i as u8, 10, 20])).save(inputs.join(format!("{:04}.png", i))).unwrap();
        let label = if i % 2 == 0 {
            colours::diagonal_label(8, 6, &[colours::ROAD, colours::SKY])
        } else {
            RgbImage::from_pixel(8, 6, Rgb(colours::SKY))
        };
        colours::save_label(&labels, &format!("{:04}_L.png", i), &label);
    }
    std::fs::write(labels.join("README.txt"), "not an image").unwrap();

    (inputs.to_string_lossy().into_owned(), labels.to_string_lossy().into_owned())
}

fn road_sky_config(inputs: &str, labels: &str) -> ConfigSeg {
    ConfigSeg::new()
        .with_input_path(inputs)
        .with_label_path(labels)
        .with_colour_map(&colours::road_sky_map())
}

#[test]
fn loads_samples_with_masks() {
    let _ = env_logger::builder().is_test(true).try_init();
    let dir = tempfile::tempdir().unwrap();
    let (inputs, labels) = write_dataset(dir.path(), 3);

    let loader = bvr_segment::init_loader(&road_sky_config(&inputs, &labels)).unwrap();
    assert_eq!(loader.len(), 3);
    assert_eq!(loader.classes(), vec!["road", "sky"]);

    let sample = loader.get(1).unwrap();
    assert_eq!(sample.image.dimensions(), (8, 6));
    assert_eq!(sample.image.get_pixel(0, 0), &Rgb([1, 10, 20]));
    assert_eq!(sample.masks.shape(), &[2, 6, 8]);
    assert!(sample.masks.index_axis(ndarray::Axis(0), 0).iter().all(|&v| v == 0));
    assert!(sample.masks.index_axis(ndarray::Axis(0), 1).iter().all(|&v| v == 1));

    let all: Vec<_> = loader.iter().collect::<Result<_, _>>().unwrap();
    assert_eq!(all.len(), 3);
}

#[test]
fn camvid_dataset_needs_no_colour_map() {
    let dir = tempfile::tempdir().unwrap();
    let (inputs, labels) = write_dataset(dir.path(), 1);

    let config = ConfigSeg::new().with_input_path(&inputs).with_label_path(&labels).with_dataset("CAMVID");
    let loader = SegmentationDatasetLoader::new(&config).unwrap();
    assert_eq!(loader.num_classes(), 32);
    assert_eq!(loader.get(0).unwrap().masks.shape(), &[32, 6, 8]);
}

#[test]
fn missing_colour_source_wins_over_missing_directories() {
    let config = ConfigSeg::new().with_input_path("nope").with_label_path("nope_labels");
    assert!(matches!(SegmentationDatasetLoader::new(&config), Err(Error::Configuration(_))));
}

#[test]
fn missing_directory_is_not_found() {
    let dir = tempfile::tempdir().unwrap();
    let (inputs, _) = write_dataset(dir.path(), 1);
    let missing = dir.path().join("missing").to_string_lossy().into_owned();

    let result = SegmentationDatasetLoader::new(&road_sky_config(&inputs, &missing));
    assert!(matches!(result, Err(Error::NotFound(_))));
}

#[test]
fn mismatched_counts_are_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let (inputs, labels) = write_dataset(dir.path(), 2);
    std::fs::remove_file(Path::new(&labels).join("0001_L.png")).unwrap();

    let result = ImageDatasetLoader::new(&inputs, &labels);
    assert!(matches!(result, Err(Error::Configuration(_))));
}

#[test]
fn seeded_shuffle_is_repeatable_and_keeps_pairs() {
    let dir = tempfile::tempdir().unwrap();
    let (inputs, labels) = write_dataset(dir.path(), 6);

    let config = road_sky_config(&inputs, &labels).with_shuffle(true, Some(7));
    let first = SegmentationDatasetLoader::new(&config).unwrap();
    let second = SegmentationDatasetLoader::new(&config).unwrap();
    assert_eq!(first.images().pairs(), second.images().pairs());

    for (input, label) in first.images().pairs() {
        let input_stem = input.file_stem().unwrap().to_string_lossy().into_owned();
        let label_stem = label.file_stem().unwrap().to_string_lossy().into_owned();
        assert_eq!(format!("{}_L", input_stem), label_stem);
    }
}

#[test]
fn labels_pair_by_stem_not_sort_order() {
    let dir = tempfile::tempdir().unwrap();
    let inputs = dir.path().join("seq");
    let labels = dir.path().join("seq_labels");
    std::fs::create_dir_all(&inputs).unwrap();
    std::fs::create_dir_all(&labels).unwrap();

    for stem in ["seq1", "seq10", "seq2"] {
        RgbImage::new(2, 2).save(inputs.join(format!("{}.png", stem))).unwrap();
        colours::save_label(&labels, &format!("{}_L.png", stem), &RgbImage::from_pixel(2, 2, Rgb(colours::SKY)));
    }

    let loader = ImageDatasetLoader::new(&inputs, &labels).unwrap();
    assert_eq!(loader.len(), 3);
    for (input, label) in loader.pairs() {
        let input_stem = input.file_stem().unwrap().to_string_lossy().into_owned();
        let label_stem = label.file_stem().unwrap().to_string_lossy().into_owned();
        assert_eq!(label_stem, format!("{}_L", input_stem));
    }
}

#[test]
fn exact_stem_label_is_accepted() {
    let dir = tempfile::tempdir().unwrap();
    let inputs = dir.path().join("in");
    let labels = dir.path().join("out");
    std::fs::create_dir_all(&inputs).unwrap();
    std::fs::create_dir_all(&labels).unwrap();
    RgbImage::new(2, 2).save(inputs.join("frame.png")).unwrap();
    RgbImage::new(2, 2).save(labels.join("frame.png")).unwrap();

    let loader = ImageDatasetLoader::new(&inputs, &labels).unwrap();
    assert_eq!(loader.label_path(0).unwrap(), labels.join("frame.png"));
}

#[test]
fn input_without_label_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let (inputs, labels) = write_dataset(dir.path(), 2);
    std::fs::rename(Path::new(&labels).join("0001_L.png"), Path::new(&labels).join("other_L.png")).unwrap();

    let result = ImageDatasetLoader::new(&inputs, &labels);
    assert!(matches!(result, Err(Error::Configuration(_))));
}

#[test]
fn out_of_range_index() {
    let dir = tempfile::tempdir().unwrap();
    let (inputs, labels) = write_dataset(dir.path(), 2);
    let loader = SegmentationDatasetLoader::new(&road_sky_config(&inputs, &labels)).unwrap();

    assert!(matches!(loader.get(2), Err(Error::IndexOutOfBounds { index: 2, len: 2 })));
}

#[test]
fn label_size_must_match_input() {
    let dir = tempfile::tempdir().unwrap();
    let (inputs, labels) = write_dataset(dir.path(), 1);
    RgbImage::from_pixel(4, 4, Rgb(colours::ROAD)).save(Path::new(&labels).join("0000_L.png")).unwrap();

    let loader = SegmentationDatasetLoader::new(&road_sky_config(&inputs, &labels)).unwrap();
    assert!(matches!(loader.get(0), Err(Error::Shape { .. })));
}

#[test]
fn config_from_json_file() {
    let dir = tempfile::tempdir().unwrap();
    let (inputs, labels) = write_dataset(dir.path(), 2);

    let config = road_sky_config(&inputs, &labels).with_strict_colours(true);
    let path = dir.path().join("loader.json");
    std::fs::write(&path, config.to_json().unwrap()).unwrap();

    let loaded = ConfigSeg::from_json_file(&path).unwrap();
    assert_eq!(loaded, config);

    let loader = SegmentationDatasetLoader::new(&loaded).unwrap();
    assert!(loader.codec().is_strict());
    assert!(loader.get(0).is_ok());
}

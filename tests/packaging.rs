//! Release packaging and diagram generation on real directories

use std::fs::{self, File};
use std::io::Read;

use greenfoot::diagram::{self, DiagramOptions};
use greenfoot::release::{self, PackageOptions, ReleaseError, ReleaseTag};

fn package_options(root: &std::path::Path, tag: &str) -> PackageOptions {
    PackageOptions {
        source_dir: root.join("pkg"),
        name: String::from("pygreenfoot"),
        tag: ReleaseTag::parse(tag).unwrap(),
        changelog: root.join("CHANGELOG.md"),
        out_dir: root.join("dist"),
    }
}

#[test]
fn test_package_writes_archive_and_manifest() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();
    fs::create_dir_all(root.join("pkg").join("images")).unwrap();
    fs::write(root.join("pkg").join("lib.rs"), "pub struct Rocket;").unwrap();
    fs::write(root.join("pkg").join("images").join("rocket.png"), [0u8, 1, 2]).unwrap();
    fs::write(root.join("CHANGELOG.md"), "## v1.2.3\n- rockets\n").unwrap();

    let manifest = release::package(&package_options(root, "refs/tags/v1.2.3")).unwrap();
    assert_eq!(manifest.tag.as_str(), "v1.2.3");
    assert_eq!(manifest.asset_name, "pygreenfootModule-v1.2.3.zip");
    assert_eq!(manifest.content_type, "application/zip");
    assert_eq!(manifest.body, "## v1.2.3\n- rockets\n");
    assert!(!manifest.draft && !manifest.prerelease);

    let archive_path = root.join("dist").join(&manifest.asset_name);
    let mut archive = zip::ZipArchive::new(File::open(archive_path).unwrap()).unwrap();
    assert!(archive.len() > 0);
    assert!(archive.file_names().all(|name| name.starts_with("pygreenfoot/")));
    let mut bytes = Vec::new();
    archive
        .by_name("pygreenfoot/images/rocket.png")
        .unwrap()
        .read_to_end(&mut bytes)
        .unwrap();
    assert_eq!(bytes, vec![0, 1, 2]);
    assert!(archive.by_name("pygreenfoot/lib.rs").is_ok());
}

#[test]
fn test_package_needs_changelog() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();
    fs::create_dir_all(root.join("pkg")).unwrap();

    let result = release::package(&package_options(root, "v0.1.0"));
    assert_eq!(
        result,
        Err(ReleaseError::MissingChangelog(root.join("CHANGELOG.md")))
    );
    assert!(!root.join("dist").join("pygreenfootModule-v0.1.0.zip").exists());
}

#[test]
fn test_diagram_of_source_tree() {
    let dir = tempfile::tempdir().unwrap();
    let src = dir.path().join("src");
    fs::create_dir_all(&src).unwrap();
    fs::write(
        src.join("rocket.rs"),
        "pub trait Actor { fn act(&mut self); }\n\
         pub struct Rocket { pub speed: f64 }\n\
         impl Actor for Rocket { fn act(&mut self) {} }\n",
    )
    .unwrap();

    let options = DiagramOptions {
        source_dir: src,
        output_dir: dir.path().join("_structure"),
        ..DiagramOptions::default()
    };
    let path = diagram::generate(&options).unwrap();
    assert_eq!(path, options.output_path());

    let text = fs::read_to_string(path).unwrap();
    assert!(text.starts_with("@startuml greenfootClassDiagram"));
    assert!(text.contains("Actor <|.. Rocket"));
    assert!(text.trim_end().ends_with("@enduml"));
}

//! Unit tests for archive writing and hashing.

use super::*;
use crate::scanner::scan_skill;
use rstest::{fixture, rstest};
use tempfile::TempDir;
use zip::ZipArchive;

#[fixture]
fn temp_dir() -> TempDir {
    TempDir::new().expect("temp dir creation succeeds")
}

fn base(temp_dir: &TempDir) -> Utf8PathBuf {
    Utf8Path::from_path(temp_dir.path())
        .expect("utf-8 temp dir")
        .to_owned()
}

fn sample_skill(temp_dir: &TempDir) -> SkillPackage {
    let dir = base(temp_dir).join("pdf-tools");
    fs::create_dir_all(dir.join("scripts")).expect("mkdir scripts");
    fs::write(dir.join("SKILL.md"), "---\nname: pdf-tools\n---\nBody\n").expect("write manifest");
    fs::write(dir.join("scripts/fill.py"), "print('fill')\n").expect("write script");
    scan_skill(&dir).expect("scan succeeds")
}

fn entry_names(path: &Utf8Path) -> Vec<String> {
    let file = fs::File::open(path).expect("open archive");
    let archive = ZipArchive::new(file).expect("read archive");
    archive.file_names().map(str::to_owned).collect()
}

#[rstest]
fn compute_sha256_of_known_content(temp_dir: TempDir) {
    let path = base(&temp_dir).join("empty.bin");
    fs::write(&path, b"").expect("write");

    let digest = compute_sha256(&path).expect("sha256 succeeds");

    assert_eq!(
        digest.to_string(),
        concat!(
            "e3b0c44298fc1c149afbf4c8996fb924",
            "27ae41e4649b934ca495991b7852b855"
        )
    );
}

#[rstest]
fn compute_sha256_reports_missing_files(temp_dir: TempDir) {
    let outcome = compute_sha256(&base(&temp_dir).join("absent.zip"));
    assert!(matches!(outcome, Err(ArchiveError::Io { .. })));
}

#[rstest]
fn archive_entries_are_rooted_at_the_skill_name(temp_dir: TempDir) {
    let package = sample_skill(&temp_dir);
    let output_dir = base(&temp_dir).join("dist");

    let path = write_archive(&package, &output_dir).expect("archive written");

    assert_eq!(path, output_dir.join("pdf-tools.zip"));
    let mut names = entry_names(&path);
    names.sort();
    assert_eq!(names, vec!["pdf-tools/SKILL.md", "pdf-tools/scripts/fill.py"]);
}

#[rstest]
fn archive_contents_match_source_bytes(temp_dir: TempDir) {
    let package = sample_skill(&temp_dir);
    let output_dir = base(&temp_dir).join("dist");
    let path = write_archive(&package, &output_dir).expect("archive written");

    let file = fs::File::open(&path).expect("open archive");
    let mut archive = ZipArchive::new(file).expect("read archive");
    let mut entry = archive
        .by_name("pdf-tools/SKILL.md")
        .expect("manifest entry present");
    let mut contents = Vec::new();
    entry.read_to_end(&mut contents).expect("read entry");

    let source = fs::read(package.root().join("SKILL.md")).expect("read source");
    assert_eq!(contents, source);
    assert_eq!(entry.compression(), CompressionMethod::Deflated);
}

#[rstest]
fn repeated_packaging_is_byte_identical(temp_dir: TempDir) {
    let package = sample_skill(&temp_dir);
    let first_dir = base(&temp_dir).join("first");
    let second_dir = base(&temp_dir).join("second");

    let first = write_archive(&package, &first_dir).expect("first archive");
    let second = write_archive(&package, &second_dir).expect("second archive");

    assert_eq!(
        compute_sha256(&first).expect("first digest"),
        compute_sha256(&second).expect("second digest")
    );
}

#[rstest]
fn creates_missing_output_directories(temp_dir: TempDir) {
    let package = sample_skill(&temp_dir);
    let output_dir = base(&temp_dir).join("nested/out/dir");

    let path = write_archive(&package, &output_dir).expect("archive written");

    assert!(path.is_file());
}

#[rstest]
fn leaves_only_the_final_archive_behind(temp_dir: TempDir) {
    let package = sample_skill(&temp_dir);
    let output_dir = base(&temp_dir).join("dist");

    write_archive(&package, &output_dir).expect("archive written");

    let leftovers: Vec<String> = output_dir
        .read_dir_utf8()
        .expect("list output dir")
        .map(|entry| entry.expect("dir entry").file_name().to_owned())
        .collect();
    assert_eq!(leftovers, vec!["pdf-tools.zip"]);
}

#[rstest]
fn failed_write_leaves_no_archive(temp_dir: TempDir) {
    let package = sample_skill(&temp_dir);
    let output_dir = base(&temp_dir).join("dist");
    fs::remove_file(package.root().join("scripts/fill.py")).expect("remove source");

    let outcome = write_archive(&package, &output_dir);

    assert!(matches!(outcome, Err(ArchiveError::Io { .. })));
    let leftovers = output_dir.read_dir_utf8().expect("list output dir").count();
    assert_eq!(leftovers, 0);
}

#[rstest]
fn output_dir_that_is_a_file_is_reported(temp_dir: TempDir) {
    let package = sample_skill(&temp_dir);
    let blocker = base(&temp_dir).join("dist");
    fs::write(&blocker, "not a directory").expect("write blocker");

    let outcome = write_archive(&package, &blocker);

    assert!(matches!(outcome, Err(ArchiveError::CreateOutputDir { .. })));
}

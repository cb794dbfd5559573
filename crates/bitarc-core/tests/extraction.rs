//! Integration tests for extraction runs driven by the in-memory engine.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::cell::RefCell;
use std::fs;
use std::io::Write;
use std::rc::Rc;
use std::time::Duration;
use std::time::SystemTime;

use bitarc_core::BitError;
use bitarc_core::Library;
use bitarc_core::engine::AskMode;
use bitarc_core::engine::ExtractCallback;
use bitarc_core::engine::InArchive;
use bitarc_core::engine::OperationResult;
use bitarc_core::engine::PasswordCallback;
use bitarc_core::engine::PropertyId;
use bitarc_core::engine::StatusResult;
use bitarc_core::extraction::Callbacks;
use bitarc_core::extraction::Destination;
use bitarc_core::extraction::EMPTY_FILE_ALIAS;
use bitarc_core::extraction::ExtractionSession;
use bitarc_core::extraction::Extractor;
use bitarc_core::formats::ArchiveFormat;
use bitarc_core::test_utils::MemoryArchive;
use bitarc_core::test_utils::MemoryEngine;
use bitarc_core::test_utils::MemoryItem;
use bitarc_core::types::DestDir;
use tempfile::TempDir;

const ARCHIVE: &str = "backup.7z";

fn library_with(archive: MemoryArchive) -> Library {
    Library::new("memory", MemoryEngine::default().with_archive(ARCHIVE, archive))
}

fn sample_archive() -> MemoryArchive {
    MemoryArchive::new(vec![
        MemoryItem::directory("docs"),
        MemoryItem::file("docs/readme.txt", b"read me"),
        MemoryItem::file("docs/nested/deep.txt", b"deep"),
        MemoryItem::file("top.bin", &[0u8, 1, 2, 3]),
    ])
}

#[test]
fn test_extract_materializes_every_item() {
    let temp = TempDir::new().unwrap();
    let library = library_with(sample_archive());
    let mut extractor = Extractor::new(&library, ArchiveFormat::SevenZip);

    let report = extractor.extract(ARCHIVE, temp.path()).unwrap();

    assert_eq!(report.files_extracted, 3);
    assert_eq!(report.directories_created, 1);
    assert_eq!(report.items_failed, 0);
    assert_eq!(report.bytes_written, 7 + 4 + 4);
    assert!(temp.path().join("docs").is_dir());
    assert_eq!(
        fs::read(temp.path().join("docs/readme.txt")).unwrap(),
        b"read me"
    );
    assert_eq!(
        fs::read(temp.path().join("docs/nested/deep.txt")).unwrap(),
        b"deep"
    );
    assert_eq!(fs::read(temp.path().join("top.bin")).unwrap(), [0, 1, 2, 3]);
}

#[test]
fn test_extract_creates_missing_destination() {
    let temp = TempDir::new().unwrap();
    let dest = temp.path().join("not/yet/here");
    let library = library_with(sample_archive());

    Extractor::new(&library, ArchiveFormat::SevenZip)
        .extract(ARCHIVE, &dest)
        .unwrap();

    assert!(dest.join("top.bin").is_file());
}

#[test]
fn test_callbacks_see_totals_progress_and_file_names() {
    let temp = TempDir::new().unwrap();
    let library = library_with(sample_archive());

    let totals = Rc::new(RefCell::new(Vec::new()));
    let progress = Rc::new(RefCell::new(Vec::new()));
    let files = Rc::new(RefCell::new(Vec::new()));
    let callbacks = Callbacks::new()
        .on_total({
            let totals = Rc::clone(&totals);
            move |total| totals.borrow_mut().push(total)
        })
        .on_progress({
            let progress = Rc::clone(&progress);
            move |done| progress.borrow_mut().push(done)
        })
        .on_file({
            let files = Rc::clone(&files);
            move |name| files.borrow_mut().push(name.to_string())
        });

    Extractor::new(&library, ArchiveFormat::SevenZip)
        .with_callbacks(callbacks)
        .extract(ARCHIVE, temp.path())
        .unwrap();

    assert_eq!(*totals.borrow(), vec![15]);
    assert_eq!(progress.borrow().last(), Some(&15));
    assert!(progress.borrow().windows(2).all(|w| w[0] <= w[1]));
    assert_eq!(*files.borrow(), vec!["readme.txt", "deep.txt", "top.bin"]);
}

#[test]
fn test_existing_file_is_replaced() {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join("top.bin"), b"stale content that is longer").unwrap();
    let library = library_with(sample_archive());

    Extractor::new(&library, ArchiveFormat::SevenZip)
        .extract(ARCHIVE, temp.path())
        .unwrap();

    assert_eq!(fs::read(temp.path().join("top.bin")).unwrap(), [0, 1, 2, 3]);
}

#[test]
fn test_undeletable_target_fails_item_but_run_continues() {
    let temp = TempDir::new().unwrap();
    // A non-empty directory where a file should go cannot be removed.
    let blocker = temp.path().join("docs/readme.txt");
    fs::create_dir_all(blocker.join("inner")).unwrap();
    let library = library_with(sample_archive());

    let err = Extractor::new(&library, ArchiveFormat::SevenZip)
        .extract(ARCHIVE, temp.path())
        .unwrap_err();

    match err {
        BitError::Extraction { errors, message } => {
            assert_eq!(errors, 1);
            assert!(message.starts_with("Cannot delete output file"), "{message}");
            assert!(message.contains("readme.txt"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(blocker.is_dir());
    assert_eq!(fs::read(temp.path().join("top.bin")).unwrap(), [0, 1, 2, 3]);
    assert!(temp.path().join("docs/nested/deep.txt").is_file());
}

#[test]
fn test_failures_are_counted_and_last_message_kept() {
    let temp = TempDir::new().unwrap();
    let archive = MemoryArchive::new(vec![
        MemoryItem::file("a.txt", b"a").with_result(OperationResult::CrcError),
        MemoryItem::file("b.txt", b"b"),
        MemoryItem::file("c.txt", b"c").with_result(OperationResult::UnsupportedMethod),
        MemoryItem::file("d.txt", b"d").with_result(OperationResult::DataError),
    ]);
    let library = library_with(archive);

    let err = Extractor::new(&library, ArchiveFormat::SevenZip)
        .extract(ARCHIVE, temp.path())
        .unwrap_err();

    match err {
        BitError::Extraction { errors, message } => {
            assert_eq!(errors, 3);
            assert_eq!(message, "Data Error");
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(fs::read(temp.path().join("b.txt")).unwrap(), b"b");
}

#[test]
fn test_modification_time_is_restored() {
    let temp = TempDir::new().unwrap();
    let mtime = SystemTime::UNIX_EPOCH + Duration::from_secs(1_600_000_000);
    let archive = MemoryArchive::new(vec![MemoryItem::file("dated.txt", b"x").with_modified(mtime)]);
    let library = library_with(archive);

    Extractor::new(&library, ArchiveFormat::SevenZip)
        .extract(ARCHIVE, temp.path())
        .unwrap();

    let modified = fs::metadata(temp.path().join("dated.txt"))
        .unwrap()
        .modified()
        .unwrap();
    assert_eq!(modified, mtime);
}

#[test]
fn test_readonly_attribute_is_restored() {
    let temp = TempDir::new().unwrap();
    let archive = MemoryArchive::new(vec![MemoryItem::file("locked.txt", b"x").with_attributes(0x1)]);
    let library = library_with(archive);

    Extractor::new(&library, ArchiveFormat::SevenZip)
        .extract(ARCHIVE, temp.path())
        .unwrap();

    let permissions = fs::metadata(temp.path().join("locked.txt"))
        .unwrap()
        .permissions();
    assert!(permissions.readonly());
}

#[cfg(unix)]
#[test]
fn test_unix_mode_is_restored() {
    use std::os::unix::fs::PermissionsExt;

    let temp = TempDir::new().unwrap();
    let attrib = (0o100_640 << 16) | 0x8000;
    let archive = MemoryArchive::new(vec![MemoryItem::file("mode.txt", b"x").with_attributes(attrib)]);
    let library = library_with(archive);

    Extractor::new(&library, ArchiveFormat::SevenZip)
        .extract(ARCHIVE, temp.path())
        .unwrap();

    let mode = fs::metadata(temp.path().join("mode.txt"))
        .unwrap()
        .permissions()
        .mode();
    assert_eq!(mode & 0o777, 0o640);
}

#[test]
fn test_traversal_components_are_dropped() {
    let temp = TempDir::new().unwrap();
    let dest = temp.path().join("out");
    let archive = MemoryArchive::new(vec![
        MemoryItem::file("../escape.txt", b"e"),
        MemoryItem::file("/abs/path.txt", b"p"),
        MemoryItem::file("win\\style.txt", b"w"),
    ]);
    let library = library_with(archive);

    Extractor::new(&library, ArchiveFormat::SevenZip)
        .extract(ARCHIVE, &dest)
        .unwrap();

    assert!(dest.join("escape.txt").is_file());
    assert!(dest.join("abs/path.txt").is_file());
    assert!(dest.join("win/style.txt").is_file());
    assert!(!temp.path().join("escape.txt").exists());
}

#[test]
fn test_nameless_item_uses_archive_file_stem() {
    let temp = TempDir::new().unwrap();
    let library = Library::new(
        "memory",
        MemoryEngine::default().with_archive(
            "logs/data.xz",
            MemoryArchive::new(vec![MemoryItem::nameless(b"payload")]),
        ),
    );

    Extractor::new(&library, ArchiveFormat::Xz)
        .extract("logs/data.xz", temp.path())
        .unwrap();

    assert_eq!(fs::read(temp.path().join("data")).unwrap(), b"payload");
    assert!(!temp.path().join("data.xz").exists());
}

#[test]
fn test_nameless_item_next_to_archive_keeps_archive() {
    let temp = TempDir::new().unwrap();
    let archive_path = temp.path().join("notes.txt.gz");
    fs::write(&archive_path, b"ORIGINAL-GZIP-BYTES").unwrap();
    let library = Library::new(
        "memory",
        MemoryEngine::default().with_archive(
            &archive_path,
            MemoryArchive::new(vec![MemoryItem::nameless(b"decompressed")]),
        ),
    );

    let report = Extractor::new(&library, ArchiveFormat::GZip)
        .extract(&archive_path, temp.path())
        .unwrap();

    assert_eq!(report.files_extracted, 1);
    assert_eq!(
        fs::read(temp.path().join("notes.txt")).unwrap(),
        b"decompressed"
    );
    assert_eq!(fs::read(&archive_path).unwrap(), b"ORIGINAL-GZIP-BYTES");
}

#[test]
fn test_nameless_item_without_archive_path_uses_alias() {
    let temp = TempDir::new().unwrap();
    let archive = MemoryArchive::new(vec![MemoryItem::nameless(b"payload")]);
    let mut callbacks = Callbacks::new();
    let dest = DestDir::new(temp.path()).unwrap();

    let mut session = ExtractionSession::new(
        &archive,
        "",
        Destination::Directory(dest),
        &mut callbacks,
    );
    let status = archive.extract(None, false, &mut session);
    let report = session.finish(status).unwrap();

    assert_eq!(report.files_extracted, 1);
    assert_eq!(
        fs::read(temp.path().join(EMPTY_FILE_ALIAS)).unwrap(),
        b"payload"
    );
}

/// Forwards every call to a session while counting Start/Close cycles.
struct CycleRecorder<'s, 'a> {
    session: &'s mut ExtractionSession<'a>,
    starts: usize,
    closes: usize,
    open_dir_sinks: usize,
    dir_starts: Vec<u32>,
}

impl<'s, 'a> CycleRecorder<'s, 'a> {
    fn new(session: &'s mut ExtractionSession<'a>) -> Self {
        Self {
            session,
            starts: 0,
            closes: 0,
            open_dir_sinks: 0,
            dir_starts: Vec::new(),
        }
    }
}

impl PasswordCallback for CycleRecorder<'_, '_> {
    fn crypto_get_text_password(&mut self) -> StatusResult<String> {
        self.session.crypto_get_text_password()
    }
}

impl ExtractCallback for CycleRecorder<'_, '_> {
    fn set_total(&mut self, total: u64) -> StatusResult {
        self.session.set_total(total)
    }

    fn set_completed(&mut self, completed: Option<u64>) -> StatusResult {
        self.session.set_completed(completed)
    }

    fn set_ratio_info(&mut self, in_size: Option<u64>, out_size: Option<u64>) -> StatusResult {
        self.session.set_ratio_info(in_size, out_size)
    }

    fn get_stream(&mut self, index: u32, mode: AskMode) -> StatusResult<Option<Box<dyn Write>>> {
        self.starts += 1;
        let stream = self.session.get_stream(index, mode)?;
        if self.session.current_item().is_some_and(|item| item.is_dir) {
            self.dir_starts.push(index);
            if stream.is_some() {
                self.open_dir_sinks += 1;
            }
        }
        Ok(stream)
    }

    fn prepare_operation(&mut self, mode: AskMode) -> StatusResult {
        self.session.prepare_operation(mode)
    }

    fn set_operation_result(&mut self, result: OperationResult) -> StatusResult {
        self.closes += 1;
        self.session.set_operation_result(result)
    }
}

#[test]
fn test_each_item_gets_one_start_and_close() {
    let temp = TempDir::new().unwrap();
    let archive = MemoryArchive::new(vec![
        MemoryItem::directory("docs"),
        MemoryItem::file("docs/a.txt", b"a"),
        MemoryItem::directory("docs/empty"),
        MemoryItem::file("b.txt", b"bb"),
        MemoryItem::file("bad.txt", b"c").with_result(OperationResult::CrcError),
    ]);
    let mut callbacks = Callbacks::new();
    let dest = DestDir::new(temp.path()).unwrap();
    let mut session = ExtractionSession::new(
        &archive,
        ARCHIVE,
        Destination::Directory(dest),
        &mut callbacks,
    );

    let mut recorder = CycleRecorder::new(&mut session);
    let status = archive.extract(None, false, &mut recorder);
    assert_eq!(recorder.starts, 5);
    assert_eq!(recorder.closes, 5);
    assert_eq!(recorder.dir_starts, vec![0, 2]);
    assert_eq!(recorder.open_dir_sinks, 0);

    let err = session.finish(status).unwrap_err();
    assert!(matches!(err, BitError::Extraction { errors: 1, .. }));
    assert!(temp.path().join("docs/empty").is_dir());
}

#[test]
fn test_directory_start_returns_no_stream() {
    let temp = TempDir::new().unwrap();
    let archive = MemoryArchive::new(vec![
        MemoryItem::directory("docs"),
        MemoryItem::file("docs/a.txt", b"a"),
    ]);
    let mut callbacks = Callbacks::new();
    let dest = DestDir::new(temp.path()).unwrap();
    let mut session = ExtractionSession::new(
        &archive,
        ARCHIVE,
        Destination::Directory(dest),
        &mut callbacks,
    );

    let stream = session.get_stream(0, AskMode::Extract).unwrap();
    assert!(stream.is_none());
    assert!(session.current_item().unwrap().is_dir);
    session.prepare_operation(AskMode::Extract).unwrap();
    session.set_operation_result(OperationResult::Ok).unwrap();

    let stream = session.get_stream(1, AskMode::Extract).unwrap();
    assert!(stream.is_some());
    stream.unwrap().write_all(b"a").unwrap();
    session.prepare_operation(AskMode::Extract).unwrap();
    session.set_operation_result(OperationResult::Ok).unwrap();

    let report = session.finish(Ok(())).unwrap();
    assert_eq!(report.directories_created, 1);
    assert_eq!(report.files_extracted, 1);
    assert_eq!(fs::read(temp.path().join("docs/a.txt")).unwrap(), b"a");
}

#[test]
fn test_session_tracks_errors_while_running() {
    let temp = TempDir::new().unwrap();
    let archive = MemoryArchive::new(vec![
        MemoryItem::file("ok.txt", b"ok"),
        MemoryItem::file("bad.txt", b"bad").with_result(OperationResult::CrcError),
    ]);
    let mut callbacks = Callbacks::new();
    let dest = DestDir::new(temp.path()).unwrap();

    let mut session = ExtractionSession::new(
        &archive,
        "archive.7z",
        Destination::Directory(dest),
        &mut callbacks,
    );
    let status = archive.extract(None, false, &mut session);

    assert_eq!(session.error_count(), 1);
    assert_eq!(session.last_error(), Some("CRC Failed"));
    assert!(session.current_item().is_none());
    assert_eq!(session.report().files_extracted, 1);
    assert!(session.finish(status).is_err());
}

#[test]
fn test_unexpected_property_type_fails_item() {
    let temp = TempDir::new().unwrap();
    let archive = MemoryArchive::new(vec![
        MemoryItem::file("odd.txt", b"x").with_property(PropertyId::Path, 42_u32),
        MemoryItem::file("fine.txt", b"y"),
    ]);
    let library = library_with(archive);

    let err = Extractor::new(&library, ArchiveFormat::SevenZip)
        .extract(ARCHIVE, temp.path())
        .unwrap_err();

    match err {
        BitError::Extraction { errors, message } => {
            assert_eq!(errors, 1);
            assert!(message.contains("Unexpected"), "{message}");
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(temp.path().join("fine.txt").is_file());
}

#[test]
fn test_encrypted_item_without_password() {
    let temp = TempDir::new().unwrap();
    let archive = MemoryArchive::new(vec![MemoryItem::file("secret.txt", b"s").encrypted()])
        .with_password("hunter2");
    let library = library_with(archive);

    let err = Extractor::new(&library, ArchiveFormat::SevenZip)
        .extract(ARCHIVE, temp.path())
        .unwrap_err();

    assert!(matches!(err, BitError::PasswordNotDefined));
}

#[test]
fn test_encrypted_item_with_password() {
    let temp = TempDir::new().unwrap();
    let archive = MemoryArchive::new(vec![MemoryItem::file("secret.txt", b"s").encrypted()])
        .with_password("hunter2");
    let library = library_with(archive);

    Extractor::new(&library, ArchiveFormat::SevenZip)
        .with_callbacks(Callbacks::new().with_password("hunter2"))
        .extract(ARCHIVE, temp.path())
        .unwrap();

    assert_eq!(fs::read(temp.path().join("secret.txt")).unwrap(), b"s");
}

#[test]
fn test_password_provider_is_consulted() {
    let temp = TempDir::new().unwrap();
    let archive = MemoryArchive::new(vec![MemoryItem::file("secret.txt", b"s").encrypted()])
        .with_password("hunter2");
    let library = library_with(archive);
    let asked = Rc::new(RefCell::new(0));

    let callbacks = Callbacks::new().on_password({
        let asked = Rc::clone(&asked);
        move || {
            *asked.borrow_mut() += 1;
            "hunter2".to_string()
        }
    });
    Extractor::new(&library, ArchiveFormat::SevenZip)
        .with_callbacks(callbacks)
        .extract(ARCHIVE, temp.path())
        .unwrap();

    assert_eq!(*asked.borrow(), 1);
}

#[test]
fn test_wrong_password_is_a_data_error() {
    let temp = TempDir::new().unwrap();
    let archive = MemoryArchive::new(vec![MemoryItem::file("secret.txt", b"s").encrypted()])
        .with_password("hunter2");
    let library = library_with(archive);

    let err = Extractor::new(&library, ArchiveFormat::SevenZip)
        .with_callbacks(Callbacks::new().with_password("wrong"))
        .extract(ARCHIVE, temp.path())
        .unwrap_err();

    match err {
        BitError::Extraction { errors, message } => {
            assert_eq!(errors, 1);
            assert_eq!(message, "Data Error");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn test_encrypted_headers_require_password_to_open() {
    let archive = MemoryArchive::new(vec![MemoryItem::file("a.txt", b"a")])
        .with_encrypted_headers("hunter2");
    let library = library_with(archive);

    let err = Extractor::new(&library, ArchiveFormat::SevenZip)
        .test(ARCHIVE)
        .unwrap_err();
    assert!(matches!(err, BitError::PasswordNotDefined));

    let report = Extractor::new(&library, ArchiveFormat::SevenZip)
        .with_callbacks(Callbacks::new().with_password("hunter2"))
        .test(ARCHIVE)
        .unwrap();
    assert_eq!(report.items_tested, 1);
}

#[test]
fn test_test_mode_writes_nothing() {
    let library = library_with(sample_archive());

    let report = Extractor::new(&library, ArchiveFormat::SevenZip)
        .test(ARCHIVE)
        .unwrap();

    assert_eq!(report.items_tested, 4);
    assert_eq!(report.files_extracted, 0);
    assert_eq!(report.bytes_written, 0);
}

#[test]
fn test_test_mode_reports_corruption() {
    let archive = MemoryArchive::new(vec![
        MemoryItem::file("a.txt", b"a").with_result(OperationResult::CrcError),
    ]);
    let library = library_with(archive);

    let err = Extractor::new(&library, ArchiveFormat::SevenZip)
        .test(ARCHIVE)
        .unwrap_err();

    assert!(matches!(err, BitError::Extraction { errors: 1, .. }));
}

#[test]
fn test_selected_items_only() {
    let temp = TempDir::new().unwrap();
    let library = library_with(sample_archive());

    let report = Extractor::new(&library, ArchiveFormat::SevenZip)
        .extract_items(ARCHIVE, temp.path(), &[3])
        .unwrap();

    assert_eq!(report.files_extracted, 1);
    assert!(temp.path().join("top.bin").is_file());
    assert!(!temp.path().join("docs").exists());
}

#[test]
fn test_solid_archive_skips_unselected_items() {
    let temp = TempDir::new().unwrap();
    let library = library_with(sample_archive().solid());

    let report = Extractor::new(&library, ArchiveFormat::SevenZip)
        .extract_items(ARCHIVE, temp.path(), &[1])
        .unwrap();

    assert_eq!(report.files_extracted, 1);
    assert_eq!(report.items_skipped, 3);
    assert!(temp.path().join("docs/readme.txt").is_file());
    assert!(!temp.path().join("top.bin").exists());
}

#[test]
fn test_extract_to_buffer() {
    let library = library_with(sample_archive());
    let mut extractor = Extractor::new(&library, ArchiveFormat::SevenZip);

    assert_eq!(extractor.extract_to_buffer(ARCHIVE, 1).unwrap(), b"read me");
    assert_eq!(extractor.extract_to_buffer(ARCHIVE, 3).unwrap(), [0, 1, 2, 3]);
}

#[test]
fn test_extract_to_buffer_rejects_bad_index() {
    let library = library_with(sample_archive());
    let mut extractor = Extractor::new(&library, ArchiveFormat::SevenZip);

    let err = extractor.extract_to_buffer(ARCHIVE, 0).unwrap_err();
    assert!(matches!(err, BitError::InvalidConfiguration { .. }));

    let err = extractor.extract_to_buffer(ARCHIVE, 99).unwrap_err();
    assert!(matches!(err, BitError::InvalidConfiguration { .. }));
}

#[test]
fn test_panicking_callback_is_contained() {
    let temp = TempDir::new().unwrap();
    let library = library_with(sample_archive());

    let err = Extractor::new(&library, ArchiveFormat::SevenZip)
        .with_callbacks(Callbacks::new().on_progress(|_| panic!("progress bar exploded")))
        .extract(ARCHIVE, temp.path())
        .unwrap_err();

    match err {
        BitError::Extraction { message, .. } => {
            assert!(message.contains("progress callback panicked"), "{message}");
            assert!(message.contains("progress bar exploded"), "{message}");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn test_unknown_archive_is_an_engine_error() {
    let temp = TempDir::new().unwrap();
    let library = library_with(sample_archive());

    let err = Extractor::new(&library, ArchiveFormat::SevenZip)
        .extract("missing.7z", temp.path())
        .unwrap_err();

    assert!(matches!(err, BitError::Engine { .. }));
}

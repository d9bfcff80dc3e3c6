#![expect(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]

use std::time::{Duration, UNIX_EPOCH};

use pretty_assertions::assert_eq;

use super::*;

fn sample() -> Header {
    let modified = UNIX_EPOCH + Duration::from_secs(1_700_000_000);
    Header::new("1.1.2", modified, Path::new("/srv/tpl/index.html"))
}

#[test]
fn prefix_layout() {
    let modified = UNIX_EPOCH + Duration::from_secs(1_700_000_000);
    let local: DateTime<Local> = modified.into();
    assert_eq!(
        sample().prefix(),
        format!(
            "<?php /* Tplus 1.1.2 {} /srv/tpl/index.html ",
            local.format("%Y-%m-%d %H:%M:%S")
        )
    );
}

#[test]
fn stamp_declares_total_size() {
    let header = sample();
    let artifact = header.stamp("<p>hi</p>").unwrap();
    let size_field = &artifact[header.prefix().len()..header.check_len()];
    assert_eq!(size_field.len(), SIZE_PAD);
    assert_eq!(size_field.parse::<usize>().unwrap(), artifact.len());
    assert!(artifact.ends_with(" */ ?>\n<p>hi</p>"));
}

#[test]
fn matches_needs_prefix_and_size() {
    let header = sample();
    let artifact = header.stamp("body").unwrap();
    let head = &artifact.as_bytes()[..header.check_len()];
    let size = u64::try_from(artifact.len()).unwrap();

    assert!(header.matches(head, size));
    assert!(!header.matches(head, size + 1));
    assert!(!header.matches(&head[..head.len() - 1], size));

    let other = Header::new("1.1.3", UNIX_EPOCH, Path::new("/srv/tpl/index.html"));
    assert!(!other.matches(head, size));
}

#[test]
fn parse_reads_back_the_fields() {
    let modified = UNIX_EPOCH + Duration::from_secs(86_400);
    let header = Header::new("1.1.2", modified, Path::new("/srv/my views/a b.html"));
    let artifact = header.stamp("x").unwrap();
    let parsed = ParsedHeader::parse(artifact.lines().next().unwrap()).unwrap();

    assert_eq!(parsed.version, "1.1.2");
    assert_eq!(parsed.source, PathBuf::from("/srv/my views/a b.html"));
    assert_eq!(parsed.size, u64::try_from(artifact.len()).unwrap());
    let local: DateTime<Local> = modified.into();
    assert_eq!(parsed.mtime, local.format("%Y-%m-%d %H:%M:%S").to_string());
}

#[test]
fn parse_rejects_foreign_lines() {
    assert_eq!(ParsedHeader::parse("<?php echo 1; ?>"), None);
    assert_eq!(
        ParsedHeader::parse("<?php /* Tplus 1.1.2 2024-01-01 00:00:00 /a 12 */ ?>"),
        None
    );
}

#[test]
fn missing_source_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let err = Header::for_source(&dir.path().join("nope.html")).unwrap_err();
    assert_eq!(err.code(), ErrorCode::E5009);
    assert!(err.is_fatal());
}

//! Tests for builtin functions

use super::*;
use crate::object::{create, create_integers, create_text};
use crate::RcError;
use core::ffi::CStr;

#[test]
fn test_print_int_writes_decimal_and_newline() {
    let mut out = Vec::new();
    assert_eq!(print_int_to(&mut out, 7).unwrap(), 2);
    assert_eq!(out, b"7\n");
}

#[test]
fn test_print_int_negative() {
    let mut out = Vec::new();
    assert_eq!(print_int_to(&mut out, -120).unwrap(), 5);
    assert_eq!(out, b"-120\n");
}

#[test]
fn test_print_text_scenario() {
    let obj = create(b"[42]").unwrap();
    let mut out = Vec::new();
    assert_eq!(print_text_to(&mut out, &obj).unwrap(), 5);
    assert_eq!(out, b"[42]\n");
}

#[test]
fn test_print_empty_text() {
    let obj = create(b"").unwrap();
    let mut out = Vec::new();
    assert_eq!(print_text_to(&mut out, &obj).unwrap(), 1);
    assert_eq!(out, b"\n");
}

#[test]
fn test_print_text_rejects_arrays() {
    let obj = create_integers(&[1]).unwrap();
    let mut out = Vec::new();
    let err = print_text_to(&mut out, &obj).unwrap_err();
    assert!(matches!(err, RcError::KindMismatch { .. }));
    assert!(out.is_empty());
}

#[test]
fn test_print_legacy_text() {
    let text = create_text(CStr::from_bytes_with_nul(b"hi\0").unwrap()).unwrap();
    let mut out = Vec::new();
    assert_eq!(print_legacy_text_to(&mut out, &text).unwrap(), 3);
    assert_eq!(out, b"hi\n");
}

#[test]
fn test_capture_output_restores_sink() {
    let (written, captured) = capture_output(|| print_int(42).unwrap());
    assert_eq!(written, 3);
    assert_eq!(captured, b"42\n");

    let (_, nested) = capture_output(|| {
        let (_, inner) = capture_output(|| print_int(1).unwrap());
        assert_eq!(inner, b"1\n");
        print_int(2).unwrap()
    });
    assert_eq!(nested, b"2\n");
}

#[test]
fn test_panicking_capture_restores_sink() {
    use std::panic::{catch_unwind, AssertUnwindSafe};

    let (_, outer) = capture_output(|| {
        let caught = catch_unwind(AssertUnwindSafe(|| {
            capture_output(|| {
                print_int(1).unwrap();
                panic!("capture body failed");
            })
        }));
        assert!(caught.is_err());
        print_int(2).unwrap()
    });
    assert_eq!(outer, b"2\n");
}

#[test]
fn test_failing_sink_surfaces_output_error() {
    struct Broken;
    impl Output for Broken {
        fn write_bytes(&mut self, _: &[u8]) -> std::io::Result<()> {
            Err(std::io::Error::new(std::io::ErrorKind::BrokenPipe, "closed"))
        }
    }

    let err = print_int_to(&mut Broken, 1).unwrap_err();
    assert!(matches!(err, RcError::Output(_)));
    assert_eq!(err.code(), -8);
}

//! Line buffer tests

use rust_serial_console::console::line_buffer::LineBuffer;

#[test]
fn test_line_buffer_push() {
    let mut buf: LineBuffer = LineBuffer::new();

    assert!(buf.push(b'h'));
    assert!(buf.push(b'e'));
    assert!(buf.push(b'l'));
    assert!(buf.push(b'p'));

    assert_eq!(buf.as_bytes(), b"help");
    assert_eq!(buf.as_str(), Some("help"));
}

#[test]
fn test_line_buffer_backspace() {
    let mut buf: LineBuffer = LineBuffer::new();

    for c in b"help" {
        buf.push(*c);
    }
    assert!(buf.backspace());
    assert!(buf.backspace());

    assert_eq!(buf.as_bytes(), b"he");
}

#[test]
fn test_line_buffer_backspace_empty() {
    let mut buf: LineBuffer = LineBuffer::new();

    assert!(!buf.backspace()); // should not panic
    assert!(buf.is_empty());
}

#[test]
fn test_line_buffer_clear() {
    let mut buf: LineBuffer = LineBuffer::new();

    for c in b"help" {
        buf.push(*c);
    }
    buf.clear();

    assert_eq!(buf.as_bytes(), b"");
    assert!(buf.is_empty());
}

#[test]
fn test_line_buffer_overflow_reserves_one_slot() {
    let mut buf: LineBuffer<64> = LineBuffer::new();

    // Push 70 characters (buffer is 64, one slot reserved)
    let accepted = (0..70u8).filter(|i| buf.push(b'a' + (i % 26))).count();

    assert_eq!(accepted, 63);
    assert_eq!(buf.len(), 63);
    assert_eq!(buf.capacity(), 63);
    assert!(buf.is_full());
}

#[test]
fn test_line_buffer_room_after_backspace() {
    let mut buf: LineBuffer<4> = LineBuffer::new();

    assert!(buf.push(b'a'));
    assert!(buf.push(b'b'));
    assert!(buf.push(b'c'));
    assert!(!buf.push(b'd'));

    buf.backspace();
    assert!(buf.push(b'z'));
    assert_eq!(buf.as_bytes(), b"abz");
}

#[test]
fn test_line_buffer_non_utf8() {
    let mut buf: LineBuffer<8> = LineBuffer::new();

    buf.push(0xC3);
    assert_eq!(buf.as_str(), None);
    assert_eq!(buf.as_bytes(), &[0xC3]);
}

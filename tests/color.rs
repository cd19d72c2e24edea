//! Background color parsing tests.

use vidsheet::{Color, SheetError};

#[test]
fn parse_rgb_defaults_to_opaque() {
    let color = Color::parse_hex("#FF0000").unwrap();
    assert_eq!(color, Color::opaque(255, 0, 0));
    assert_eq!(color.alpha, 255);
}

#[test]
fn parse_rgba() {
    let color = Color::parse_hex("#00FF0080").unwrap();
    assert_eq!(
        (color.red, color.green, color.blue, color.alpha),
        (0, 255, 0, 128)
    );
}

#[test]
fn parse_without_hash_and_lowercase() {
    let color: Color = "1a2b3c".parse().unwrap();
    assert_eq!(color, Color::opaque(0x1a, 0x2b, 0x3c));

    let padded: Color = "  #ffffff ".parse().unwrap();
    assert_eq!(padded, Color::WHITE);
}

#[test]
fn parse_rejects_non_hex_digits() {
    let result = Color::parse_hex("GGHHII");
    assert!(matches!(result, Err(SheetError::ConfigError(_))));

    // `from_str_radix` would accept a sign.
    assert!(Color::parse_hex("+1+2+3").is_err());
}

#[test]
fn parse_rejects_wrong_length() {
    for value in ["", "#", "#FFF", "#FFFFF", "#FFFFFFF", "#FFFFFFFFF"] {
        assert!(
            matches!(Color::parse_hex(value), Err(SheetError::ConfigError(_))),
            "expected {value:?} to be rejected"
        );
    }
}

#[test]
fn parse_rejects_multibyte_input() {
    assert!(Color::parse_hex("#ééé").is_err());
}

#[test]
fn display_is_rrggbbaa() {
    let color = Color::parse_hex("#0a0B0c").unwrap();
    assert_eq!(color.to_string(), "#0A0B0CFF");
}

#[test]
fn default_is_white() {
    assert_eq!(Color::default(), Color::WHITE);
    assert_eq!(Color::default().to_rgba().0, [255, 255, 255, 255]);
}

#[test]
fn converts_to_rgba_pixel() {
    let pixel: image::Rgba<u8> = Color::parse_hex("#01020304").unwrap().into();
    assert_eq!(pixel.0, [1, 2, 3, 4]);
}

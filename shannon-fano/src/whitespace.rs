// The artifact stores raw symbol bytes; these escapes are only for showing a
// table on the console or in a log line.
pub fn printable(symbol: u8) -> String {
    match symbol {
        b'\t' => "\\u{0009}".to_owned(),
        b'\n' => "\\u{000A}".to_owned(),
        b'\r' => "\\u{000D}".to_owned(),
        b' ' => "\\u{0020}".to_owned(),
        c if c.is_ascii_graphic() => (c as char).to_string(),
        c => format!("\\x{c:02X}"),
    }
}
